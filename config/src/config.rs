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

//! Configuration file management

use std::env;
use std::fs::{self, File};
use std::io::prelude::*;
use std::path::{Path, PathBuf};

use crate::comments::insert_comments;
use crate::core::registry::MosaicRegistry;
use crate::types::{ConfigError, ConfigMembers, GlobalConfig, NodeConfig};
use crate::util::LoggingConfig;

/// The default file name to use when trying to derive
/// the config file location
pub const CONFIG_FILE_NAME: &str = "nem.toml";
const NEM_HOME: &str = ".nem";

/// Version written into freshly generated files
const CONFIG_FILE_VERSION: u32 = 1;

/// Directory holding the user wide configuration, `~/.nem`
pub fn get_nem_path() -> Result<PathBuf, ConfigError> {
	let mut nem_path = match dirs::home_dir() {
		Some(p) => p,
		None => PathBuf::new(),
	};
	nem_path.push(NEM_HOME);
	if !nem_path.exists() {
		fs::create_dir_all(nem_path.clone())?;
	}
	Ok(nem_path)
}

fn check_config_current_dir(path: &str) -> Option<PathBuf> {
	let p = env::current_dir();
	let mut c = match p {
		Ok(c) => c,
		Err(_) => {
			return None;
		}
	};
	c.push(path);
	if c.exists() {
		return Some(c);
	}
	None
}

/// Handles setup and detection of paths, which configuration to use
/// etc. An explicit path must exist. Otherwise `nem.toml` is looked up in
/// the working directory, then in `~/.nem`, where a default file is
/// generated if there is none yet.
pub fn initial_setup(config_file_path: Option<&str>) -> Result<GlobalConfig, ConfigError> {
	if let Some(p) = config_file_path {
		return GlobalConfig::new(p);
	}
	if let Some(p) = check_config_current_dir(CONFIG_FILE_NAME) {
		return GlobalConfig::new(path_str(&p)?);
	}

	let mut config_path = get_nem_path()?;
	config_path.push(CONFIG_FILE_NAME);

	// Spit it out if it doesn't exist
	if !config_path.exists() {
		let mut default_config = GlobalConfig::default();
		if let Some(logging) = default_config
			.members
			.as_mut()
			.and_then(|m| m.logging.as_mut())
		{
			let mut log_path = get_nem_path()?;
			log_path.push(&logging.log_file_path);
			logging.log_file_path = path_str(&log_path)?.to_owned();
		}
		default_config.write_to_file(path_str(&config_path)?)?;
	}
	GlobalConfig::new(path_str(&config_path)?)
}

fn path_str(path: &Path) -> Result<&str, ConfigError> {
	path.to_str().ok_or_else(|| {
		ConfigError::FileIOError(
			path.to_string_lossy().into_owned(),
			"Path is not valid unicode:".to_owned(),
		)
	})
}

/// Returns the defaults, as strewn throughout the code
impl Default for ConfigMembers {
	fn default() -> ConfigMembers {
		ConfigMembers {
			config_file_version: Some(CONFIG_FILE_VERSION),
			node: NodeConfig::default(),
			logging: Some(LoggingConfig::default()),
			mosaics: vec![],
		}
	}
}

impl Default for GlobalConfig {
	fn default() -> GlobalConfig {
		GlobalConfig {
			config_file_path: None,
			members: Some(ConfigMembers::default()),
		}
	}
}

impl GlobalConfig {
	/// Requires the path to a config file
	pub fn new(file_path: &str) -> Result<GlobalConfig, ConfigError> {
		let mut return_value = GlobalConfig::default();
		let config_file = PathBuf::from(&file_path);

		// Config file path is given but not valid
		if !config_file.exists() {
			return Err(ConfigError::FileNotFoundError(file_path.to_owned()));
		}
		return_value.config_file_path = Some(config_file);

		// Try to parse the config file if it exists, explode if it does exist but
		// something's wrong with it
		return_value.read_config()
	}

	/// Read config
	fn read_config(mut self) -> Result<GlobalConfig, ConfigError> {
		let path = match self.config_file_path {
			Some(ref p) => p.clone(),
			None => return Ok(self),
		};
		let mut file = File::open(&path)?;
		let mut contents = String::new();
		file.read_to_string(&mut contents)?;
		match toml::from_str::<ConfigMembers>(&contents) {
			Ok(gc) => {
				self.members = Some(gc);
				Ok(self)
			}
			Err(e) => Err(ConfigError::ParseError(
				path.to_string_lossy().into_owned(),
				format!("{}", e),
			)),
		}
	}

	/// Configured members, defaults when none were read
	pub fn members(&self) -> ConfigMembers {
		self.members.clone().unwrap_or_default()
	}

	/// Built-in mosaic definitions plus the configured ones, which replace
	/// built-ins of the same name.
	pub fn mosaic_registry(&self) -> Result<MosaicRegistry, ConfigError> {
		let mut registry = MosaicRegistry::builtin().clone();
		if let Some(ref members) = self.members {
			for mosaic in &members.mosaics {
				registry = registry.with_definition(mosaic.to_definition()?);
			}
		}
		Ok(registry)
	}

	/// Serialize config
	pub fn ser_config(&self) -> Result<String, ConfigError> {
		let members = self.members();
		toml::to_string(&members).map_err(|e| ConfigError::SerializationError(format!("{}", e)))
	}

	/// Write configuration to a file
	pub fn write_to_file(&mut self, name: &str) -> Result<(), ConfigError> {
		let conf_out = self.ser_config()?;
		let conf_out = insert_comments(conf_out);
		let mut file = File::create(name)?;
		file.write_all(conf_out.as_bytes())?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::core::core::{MosaicId, Network};
	use crate::types::{LevyConfig, MosaicConfig};

	fn acme_gold() -> MosaicConfig {
		MosaicConfig {
			namespace_id: "acme".to_owned(),
			name: "gold".to_owned(),
			creator: "a1df5306355766bd2f9a64efdc089eb294be265987b3359093ae474c051d7d5a".to_owned(),
			description: "gold bars".to_owned(),
			divisibility: 2,
			initial_supply: 1_000,
			supply_mutable: false,
			transferable: true,
			levy: Some(LevyConfig {
				levy_type: 1,
				recipient: "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC".to_owned(),
				mosaic: "nem:xem".to_owned(),
				fee: 5,
			}),
		}
	}

	#[test]
	fn defaults_round_trip_through_toml() {
		let config = GlobalConfig::default();
		let toml = config.ser_config().unwrap();
		let back: ConfigMembers = toml::from_str(&toml).unwrap();
		assert_eq!(back, config.members());
		assert_eq!(back.node.network, Network::Testnet);
		assert_eq!(back.node.url(), "http://127.0.0.1:7890");
	}

	#[test]
	fn commented_output_still_parses() {
		let mut config = GlobalConfig::default();
		config.members.as_mut().unwrap().mosaics.push(acme_gold());
		let out = insert_comments(config.ser_config().unwrap());
		assert!(out.contains("# Generated Configuration File for the nem tools"));
		let back: ConfigMembers = toml::from_str(&out).unwrap();
		assert_eq!(back.mosaics, vec![acme_gold()]);
	}

	#[test]
	fn configured_mosaics_join_the_registry() {
		let mut config = GlobalConfig::default();
		config.members.as_mut().unwrap().mosaics.push(acme_gold());
		let registry = config.mosaic_registry().unwrap();
		assert_eq!(registry.len(), MosaicRegistry::builtin().len() + 1);
		let gold = registry.get_definition("acme:gold").unwrap();
		assert_eq!(gold.properties.divisibility, 2);
		assert_eq!(
			gold.levy.as_ref().unwrap().mosaic_id,
			MosaicId::new("nem", "xem")
		);
	}

	#[test]
	fn bad_mosaics_are_reported() {
		let mut config = GlobalConfig::default();
		let mut bad = acme_gold();
		bad.divisibility = 7;
		config.members.as_mut().unwrap().mosaics.push(bad);
		match config.mosaic_registry() {
			Err(ConfigError::InvalidMosaic(fqn, _)) => assert_eq!(fqn, "acme:gold"),
			other => panic!("unexpected {:?}", other),
		}
	}
}
