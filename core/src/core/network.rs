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

//! Networks a transaction can target and the version word carrying them.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::core::account::Address;
use crate::model;

/// Types of networks a node can run on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
	/// Public network
	Mainnet,
	/// Public test network
	Testnet,
	/// Private chains
	Mijin,
}

impl Default for Network {
	fn default() -> Network {
		Network::Testnet
	}
}

impl Network {
	/// All known networks
	pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Mijin];

	/// Network byte, first byte of every address and high byte of the
	/// transaction version
	pub fn id(self) -> u8 {
		match self {
			Network::Mainnet => 0x68,
			Network::Testnet => 0x98,
			Network::Mijin => 0x60,
		}
	}

	/// Network for a network byte
	pub fn from_id(id: u8) -> Option<Network> {
		Network::ALL.iter().cloned().find(|n| n.id() == id)
	}

	/// First character of every address on the network
	pub fn prefix(self) -> char {
		match self {
			Network::Mainnet => 'N',
			Network::Testnet => 'T',
			Network::Mijin => 'M',
		}
	}

	/// Network for an address prefix
	pub fn from_prefix(c: char) -> Option<Network> {
		Network::ALL
			.iter()
			.cloned()
			.find(|n| n.prefix() == c.to_ascii_uppercase())
	}

	/// Lowercase name, as used in configuration files
	pub fn name(self) -> &'static str {
		match self {
			Network::Mainnet => "mainnet",
			Network::Testnet => "testnet",
			Network::Mijin => "mijin",
		}
	}

	/// Account receiving namespace rental fees
	pub fn namespace_sink(self) -> Address {
		Address::from_static(match self {
			Network::Mainnet => "NAMESPACEWH4MKFMBCVFERDPOOP4FK7MTBXDPZZA",
			Network::Testnet => "TAMESPACEWH4MKFMBCVFERDPOOP4FK7MTDJEYP35",
			Network::Mijin => "MAMESPACEWH4MKFMBCVFERDPOOP4FK7MTCZTG5EA",
		})
	}

	/// Account receiving mosaic creation fees
	pub fn mosaic_sink(self) -> Address {
		Address::from_static(match self {
			Network::Mainnet => "NBMOSAICOD4F54EE5CDMR23CCBGOAM2XSIUX6TRS",
			Network::Testnet => "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC",
			Network::Mijin => "MBMOSAICOD4F54EE5CDMR23CCBGOAM2XSKYHTOJD",
		})
	}

	/// Version word for this network
	pub fn version(self, number: u8) -> Version {
		Version::new(self, number)
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Network {
	type Err = String;

	fn from_str(s: &str) -> Result<Network, String> {
		Network::ALL
			.iter()
			.cloned()
			.find(|n| n.name().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| format!("unknown network '{}'", s))
	}
}

/// Transaction version: network byte in the high byte, version number in
/// the low bits. NIS DTOs carry it as a signed 32 bit integer, so testnet
/// versions show up negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Version(pub u32);

impl Version {
	/// Version `number` on `network`
	pub fn new(network: Network, number: u8) -> Version {
		Version((network.id() as u32) << 24 | number as u32)
	}

	/// Network the version is flavoured with, if a known one
	pub fn network(self) -> Option<Network> {
		Network::from_id((self.0 >> 24) as u8)
	}

	/// Version number without the network byte
	pub fn number(self) -> u32 {
		self.0 & 0x00FF_FFFF
	}

	/// Value as it goes in a DTO and on the wire
	pub fn to_i32(self) -> i32 {
		self.0 as i32
	}

	/// Version number `number` on the same network. A version without a
	/// recognised network byte is replaced by `default`.
	pub fn pin(self, number: u8, default: Version) -> Version {
		match self.network() {
			Some(network) => Version::new(network, number),
			None => {
				debug!("unrecognised version {:#010x}, using {:#010x}", self.0, default.0);
				default
			}
		}
	}

	/// Reads a version from a DTO value, signed or not.
	pub fn from_value(value: &Value) -> Result<Version, model::Error> {
		let n = model::as_i64(value)
			.ok_or_else(|| model::Error::invalid("version", format!("not a version: {}", value)))?;
		if n >= i32::min_value() as i64 && n < 0 {
			Ok(Version(n as i32 as u32))
		} else if n >= 0 && n <= u32::max_value() as i64 {
			Ok(Version(n as u32))
		} else {
			Err(model::Error::invalid("version", format!("out of range: {}", n)))
		}
	}
}

impl From<i32> for Version {
	fn from(n: i32) -> Version {
		Version(n as u32)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	#[test]
	fn version_words() {
		assert_eq!(Version::new(Network::Mainnet, 1).0, 0x6800_0001);
		assert_eq!(Version::new(Network::Testnet, 2).to_i32(), -1_744_830_462);
		assert_eq!(Version::new(Network::Mijin, 1).number(), 1);
		assert_eq!(Version::from(-1_744_830_463).network(), Some(Network::Testnet));
	}

	#[test]
	fn pinning_keeps_the_network() {
		let default = Network::Testnet.version(2);
		let mainnet = Network::Mainnet.version(1);
		assert_eq!(mainnet.pin(2, default), Network::Mainnet.version(2));
		assert_eq!(Version(0).pin(2, default), default);
		assert_eq!(Version(0x1200_0001).pin(1, default), default);
	}

	#[test]
	fn versions_from_dto() {
		assert_eq!(
			Version::from_value(&json!(-1_744_830_463)).unwrap(),
			Network::Testnet.version(1)
		);
		assert_eq!(
			Version::from_value(&json!(2_550_136_833u64)).unwrap(),
			Network::Testnet.version(1)
		);
		assert_eq!(
			Version::from_value(&json!("1744830465")).unwrap(),
			Network::Mainnet.version(1)
		);
		assert!(Version::from_value(&json!("v1")).is_err());
	}

	#[test]
	fn network_names_and_sinks() {
		assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Mainnet);
		assert!("devnet".parse::<Network>().is_err());
		assert_eq!(Network::from_prefix('t'), Some(Network::Testnet));
		for network in Network::ALL.iter() {
			for sink in &[network.namespace_sink(), network.mosaic_sink()] {
				assert_eq!(sink.network(), *network);
				assert_eq!(sink.as_str().parse::<Address>().as_ref(), Ok(sink));
			}
		}
	}
}
