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

//! Public types for config modules

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::core::core::{
	Address, LevyType, MosaicDefinition, MosaicId, MosaicLevy, MosaicProperties, Network,
	PublicKey,
};
use crate::util::LoggingConfig;

/// Error type wrapping config errors.
#[derive(Debug)]
pub enum ConfigError {
	/// Error with parsing of config file
	ParseError(String, String),

	/// Error with fileIO while reading config file
	FileIOError(String, String),

	/// No file found
	FileNotFoundError(String),

	/// Error serializing config values
	SerializationError(String),

	/// A configured mosaic doesn't make a valid definition
	InvalidMosaic(String, String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			ConfigError::ParseError(ref file_name, ref message) => write!(
				f,
				"Error parsing configuration file at {} - {}",
				file_name, message
			),
			ConfigError::FileIOError(ref file_name, ref message) => {
				write!(f, "{} {}", message, file_name)
			}
			ConfigError::FileNotFoundError(ref file_name) => {
				write!(f, "Configuration file not found: {}", file_name)
			}
			ConfigError::SerializationError(ref message) => {
				write!(f, "Error serializing configuration: {}", message)
			}
			ConfigError::InvalidMosaic(ref fqn, ref message) => {
				write!(f, "Invalid mosaic {} in configuration: {}", fqn, message)
			}
		}
	}
}

impl From<io::Error> for ConfigError {
	fn from(error: io::Error) -> ConfigError {
		ConfigError::FileIOError(
			String::from(""),
			format!("Error loading config file: {}", error),
		)
	}
}

/// Holds the configuration file as a whole, along with where it was read
/// from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
	/// Keep track of the file we've read
	pub config_file_path: Option<PathBuf>,
	/// Global member config
	pub members: Option<ConfigMembers>,
}

/// Sections of the configuration file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigMembers {
	/// Config file version (None == version 1)
	pub config_file_version: Option<u32>,
	/// Node the tools talk to
	#[serde(default)]
	pub node: NodeConfig,
	/// Logging config
	pub logging: Option<LoggingConfig>,
	/// Mosaic definitions known on top of the built-in ones
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub mosaics: Vec<MosaicConfig>,
}

/// NIS node connection details
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
	/// Host name or address of the node
	pub host: String,
	/// NIS API port
	pub port: u16,
	/// http or https
	pub protocol: String,
	/// Network transactions are built for
	pub network: Network,
}

impl Default for NodeConfig {
	fn default() -> NodeConfig {
		NodeConfig {
			host: "127.0.0.1".to_owned(),
			port: 7890,
			protocol: "http".to_owned(),
			network: Network::default(),
		}
	}
}

impl NodeConfig {
	/// Base URL of the node API
	pub fn url(&self) -> String {
		format!("{}://{}:{}", self.protocol, self.host, self.port)
	}
}

/// A mosaic definition as written in the configuration file
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MosaicConfig {
	/// Namespace the mosaic lives in
	pub namespace_id: String,
	/// Mosaic name
	pub name: String,
	/// Creator public key, hex
	pub creator: String,
	/// Free text description
	#[serde(default)]
	pub description: String,
	/// Decimal places, 0 to 6
	pub divisibility: u8,
	/// Initial supply in whole units
	pub initial_supply: u64,
	/// Whether the supply can change
	#[serde(default)]
	pub supply_mutable: bool,
	/// Whether holders can transfer it
	#[serde(default = "default_transferable")]
	pub transferable: bool,
	/// Optional levy
	pub levy: Option<LevyConfig>,
}

fn default_transferable() -> bool {
	true
}

/// Levy of a configured mosaic
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevyConfig {
	/// 1 for an absolute levy, 2 for a percentile one
	pub levy_type: u8,
	/// Account receiving the levy
	pub recipient: String,
	/// Mosaic the levy is paid in, `namespace:name`
	pub mosaic: String,
	/// Levy amount
	pub fee: u64,
}

impl MosaicConfig {
	/// Fully qualified name
	pub fn fqn(&self) -> String {
		format!("{}:{}", self.namespace_id, self.name)
	}

	/// Definition described by this entry
	pub fn to_definition(&self) -> Result<MosaicDefinition, ConfigError> {
		let invalid = |msg: String| ConfigError::InvalidMosaic(self.fqn(), msg);
		let creator = PublicKey::from_hex(&self.creator).map_err(|e| invalid(e.to_string()))?;
		if self.divisibility > 6 {
			return Err(invalid(format!(
				"divisibility {} is above 6",
				self.divisibility
			)));
		}
		let definition = MosaicDefinition::new(
			creator,
			MosaicId::new(&self.namespace_id, &self.name),
			&self.description,
			MosaicProperties {
				divisibility: self.divisibility,
				initial_supply: self.initial_supply,
				supply_mutable: self.supply_mutable,
				transferable: self.transferable,
			},
		);
		match self.levy {
			None => Ok(definition),
			Some(ref levy) => {
				let levy_type = match levy.levy_type {
					1 => LevyType::Absolute,
					2 => LevyType::Percentile,
					n => return Err(invalid(format!("unknown levy type {}", n))),
				};
				Ok(definition.with_levy(MosaicLevy {
					levy_type,
					recipient: levy
						.recipient
						.parse::<Address>()
						.map_err(|e| invalid(e.to_string()))?,
					mosaic_id: MosaicId::parse(&levy.mosaic).map_err(|e| invalid(e.to_string()))?,
					fee: levy.fee,
				}))
			}
		}
	}
}
