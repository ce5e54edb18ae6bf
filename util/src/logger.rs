// Copyright 2021 The Grin Developers
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging wrapper to be used throughout all crates in the workspace
use crate::types::LoggingConfig;
use crate::Mutex;
use std::ops::Deref;

use backtrace::Backtrace;
use std::{panic, thread};

use log::{LevelFilter, Record};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::append::rolling_file::{
	policy::compound::roll::fixed_window::FixedWindowRoller,
	policy::compound::trigger::size::SizeTrigger, policy::compound::CompoundPolicy,
	RollingFileAppender,
};
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::{threshold::ThresholdFilter, Filter, Response};

lazy_static! {
	/// Flag to observe whether logging was explicitly initialised (don't output otherwise)
	static ref WAS_INIT: Mutex<bool> = Mutex::new(false);
	/// Static Logging configuration, should only be set once, before first logging call
	static ref LOGGING_CONFIG: Mutex<LoggingConfig> = Mutex::new(LoggingConfig::default());
}

const LOGGING_PATTERN: &str = "{d(%Y%m%d %H:%M:%S%.3f)} {h({l})} {M} - {m}{n}";

/// This filter is rejecting messages that doesn't start with "nem"
/// in order to save log space for only nem-related records
#[derive(Debug)]
struct NemFilter;

impl Filter for NemFilter {
	fn filter(&self, record: &Record<'_>) -> Response {
		if let Some(module_path) = record.module_path() {
			if module_path.starts_with("nem") {
				return Response::Neutral;
			}
		}

		Response::Reject
	}
}

/// Initialize the logger with the given configuration
pub fn init_logger(config: Option<LoggingConfig>) {
	if let Some(c) = config {
		let mut was_init_ref = WAS_INIT.lock();
		if *was_init_ref.deref() {
			return;
		}

		// Save current logging configuration
		let mut config_ref = LOGGING_CONFIG.lock();
		*config_ref = c.clone();

		let level_stdout = c.stdout_log_level.to_level_filter();
		let level_file = c.file_log_level.to_level_filter();

		// Determine minimum logging level for Root logger
		let level_minimum = match (c.log_to_stdout, c.log_to_file) {
			(true, true) if level_stdout > level_file => level_stdout,
			(true, true) => level_file,
			(true, false) => level_stdout,
			(false, true) => level_file,
			(false, false) => LevelFilter::Off,
		};

		let mut root = Root::builder();
		let mut appenders = vec![];

		if c.log_to_stdout {
			let stdout = ConsoleAppender::builder()
				.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
				.build();
			appenders.push(
				Appender::builder()
					.filter(Box::new(ThresholdFilter::new(level_stdout)))
					.filter(Box::new(NemFilter))
					.build("stdout", Box::new(stdout)),
			);
			root = root.appender("stdout");
		}

		if c.log_to_file {
			// If maximum log size is specified, use rolling file appender
			// or use basic one otherwise
			let filter = Box::new(ThresholdFilter::new(level_file));
			let file: Option<Box<dyn Append>> = match c.log_max_size {
				Some(size) => FixedWindowRoller::builder()
					.build(&format!("{}.{{}}.gz", c.log_file_path), c.log_max_files)
					.ok()
					.and_then(|roller| {
						let trigger = SizeTrigger::new(size);
						let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));
						RollingFileAppender::builder()
							.append(c.log_file_append)
							.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
							.build(&c.log_file_path, Box::new(policy))
							.ok()
					})
					.map(|a| Box::new(a) as Box<dyn Append>),
				None => FileAppender::builder()
					.append(c.log_file_append)
					.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
					.build(&c.log_file_path)
					.ok()
					.map(|a| Box::new(a) as Box<dyn Append>),
			};

			match file {
				Some(file) => {
					appenders.push(
						Appender::builder()
							.filter(filter)
							.filter(Box::new(NemFilter))
							.build("file", file),
					);
					root = root.appender("file");
				}
				None => eprintln!("Unable to create log file at {}", c.log_file_path),
			}
		}

		let config = match Config::builder()
			.appenders(appenders)
			.build(root.build(level_minimum))
		{
			Ok(config) => config,
			Err(e) => {
				eprintln!("Invalid logging configuration: {}", e);
				return;
			}
		};

		if log4rs::init_config(config).is_err() {
			return;
		}

		info!(
			"log4rs is initialized, file level: {:?}, stdout level: {:?}, min. level: {:?}",
			level_file, level_stdout, level_minimum
		);

		// Mark logger as initialized
		*was_init_ref = true;
	}

	send_panic_to_log();
}

/// Initializes the logger for unit and integration tests
pub fn init_test_logger() {
	let mut was_init_ref = WAS_INIT.lock();
	if *was_init_ref.deref() {
		return;
	}
	let level_stdout = LevelFilter::Debug;

	// Start logger
	let stdout = ConsoleAppender::builder()
		.encoder(Box::new(PatternEncoder::default()))
		.build();

	let appenders = vec![Appender::builder()
		.filter(Box::new(ThresholdFilter::new(level_stdout)))
		.filter(Box::new(NemFilter))
		.build("stdout", Box::new(stdout))];

	let config = Config::builder()
		.appenders(appenders)
		.build(Root::builder().appender("stdout").build(level_stdout));

	// Another test harness thread may have won the race to the global logger.
	if let Ok(config) = config {
		let _ = log4rs::init_config(config);
	}

	*was_init_ref = true;
}

/// hook to send panics to logs as well as stderr
fn send_panic_to_log() {
	panic::set_hook(Box::new(|info| {
		let backtrace = Backtrace::new();

		let thread = thread::current();
		let thread = thread.name().unwrap_or("unnamed");

		let msg = match info.payload().downcast_ref::<&'static str>() {
			Some(s) => *s,
			None => match info.payload().downcast_ref::<String>() {
				Some(s) => &**s,
				None => "Box<Any>",
			},
		};

		match info.location() {
			Some(location) => {
				error!(
					"\nthread '{}' panicked at '{}': {}:{}{:?}\n\n",
					thread,
					msg,
					location.file(),
					location.line(),
					backtrace
				);
			}
			None => error!("thread '{}' panicked at '{}'{:?}", thread, msg, backtrace),
		}
		//also print to stderr
		let config = LOGGING_CONFIG.lock();
		eprintln!(
			"Thread '{}' panicked with message:\n\"{}\"\nSee {} for further details.",
			thread, msg, config.log_file_path
		);
	}));
}
