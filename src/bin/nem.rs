// Copyright 2021 The Grin Developers
//
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

//! Main for building the nem binary: fee and wire form of NIS transactions,
//! mosaic definitions and configuration.

#[macro_use]
extern crate log;

use nem_config as config;
use nem_core as core;
use nem_util as util;

use clap::{App, AppSettings, Arg, SubCommand};

use crate::config::{initial_setup, GlobalConfig, CONFIG_FILE_NAME};

mod cmd;

fn main() {
	let exit_code = real_main();
	std::process::exit(exit_code);
}

fn real_main() -> i32 {
	let args = App::new("nem")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Builds, prices and serializes NEM (NIS1) transactions.")
		.setting(AppSettings::SubcommandRequiredElseHelp)
		.arg(
			Arg::with_name("config")
				.short("c")
				.long("config")
				.value_name("FILE.toml")
				.help("Configuration file to use instead of nem.toml")
				.takes_value(true),
		)
		// fee of a transaction DTO
		.subcommand(
			SubCommand::with_name("fee")
				.about("Computes the minimum fee of a transaction")
				.arg(
					Arg::with_name("input")
						.help("Transaction DTO as json, - for stdin")
						.required(true)
						.index(1),
				),
		)
		// wire form of a transaction DTO
		.subcommand(
			SubCommand::with_name("serialize")
				.about("Serializes a transaction into the bytes to sign")
				.arg(
					Arg::with_name("input")
						.help("Transaction DTO as json, - for stdin")
						.required(true)
						.index(1),
				)
				.arg(
					Arg::with_name("full")
						.long("full")
						.help("Appends the signature when the DTO carries one"),
				)
				.arg(
					Arg::with_name("dto")
						.long("dto")
						.help("Also prints the normalized DTO, with its metadata"),
				),
		)
		// registry lookups
		.subcommand(
			SubCommand::with_name("mosaic")
				.about("Shows a known mosaic definition")
				.arg(
					Arg::with_name("fqn")
						.help("Fully qualified mosaic name, e.g. dim:coin")
						.required(true)
						.index(1),
				)
				.arg(
					Arg::with_name("quantity")
						.short("q")
						.long("quantity")
						.help("Also prices a transfer of that many smallest units")
						.takes_value(true),
				),
		)
		.subcommand(
			SubCommand::with_name("config")
				.about("Generates a configuration file in the current directory"),
		)
		.get_matches();

	if let ("config", _) = args.subcommand() {
		return cmd::config_command(CONFIG_FILE_NAME);
	}

	let global_config = match initial_setup(args.value_of("config")) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("Error loading configuration: {}", e);
			return 1;
		}
	};
	init_logging(&global_config);

	let registry = match global_config.mosaic_registry() {
		Ok(r) => r,
		Err(e) => {
			error!("{}", e);
			eprintln!("{}", e);
			return 1;
		}
	};

	match args.subcommand() {
		("fee", Some(fee_args)) => cmd::fee_command(fee_args, &registry),
		("serialize", Some(ser_args)) => cmd::serialize_command(ser_args, &registry),
		("mosaic", Some(mosaic_args)) => cmd::mosaic_command(mosaic_args, &registry),
		_ => {
			eprintln!("Unknown command, use 'nem help' for a list of all commands");
			1
		}
	}
}

fn init_logging(global_config: &GlobalConfig) {
	let members = global_config.members();
	util::init_logger(members.logging);
	if let Some(ref path) = global_config.config_file_path {
		info!("Using configuration file at {}", path.to_string_lossy());
	}
	info!(
		"This is nem version {}, targeting {} at {}",
		env!("CARGO_PKG_VERSION"),
		members.node.network,
		members.node.url()
	);
}
