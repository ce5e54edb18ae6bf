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

//! Account identifiers: addresses, public keys and the signatures made with
//! them.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::core::network::Network;
use crate::model;
use crate::ser::{self, Writeable, Writer};
use crate::util;

/// Length of an address in base32 characters
pub const ADDRESS_LENGTH: usize = 40;
/// Length of a public key in bytes
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a signature in bytes
pub const SIGNATURE_LENGTH: usize = 64;

/// Base32 account address, normalised to uppercase without dashes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
	pub(crate) fn from_static(address: &'static str) -> Address {
		debug_assert!(
			address.parse::<Address>().is_ok(),
			"invalid address constant {}",
			address
		);
		Address(address.to_owned())
	}

	/// Normalised address string
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Network the address belongs to
	pub fn network(&self) -> Network {
		self.0
			.chars()
			.next()
			.and_then(Network::from_prefix)
			.unwrap_or_default()
	}

	/// Dash separated form, groups of six characters
	pub fn to_pretty(&self) -> String {
		self.0
			.as_bytes()
			.chunks(6)
			.map(|c| String::from_utf8_lossy(c).into_owned())
			.collect::<Vec<_>>()
			.join("-")
	}

	/// Reads an address from a DTO value
	pub fn from_value(value: &Value) -> Result<Address, model::Error> {
		match value {
			Value::String(s) => s.parse(),
			other => Err(model::Error::invalid(
				"address",
				format!("not an address: {}", other),
			)),
		}
	}
}

impl FromStr for Address {
	type Err = model::Error;

	fn from_str(s: &str) -> Result<Address, model::Error> {
		let normalised: String = s
			.chars()
			.filter(|c| *c != '-' && !c.is_whitespace())
			.map(|c| c.to_ascii_uppercase())
			.collect();
		if normalised.len() != ADDRESS_LENGTH {
			return Err(model::Error::invalid(
				"address",
				format!("'{}' is not {} characters long", s, ADDRESS_LENGTH),
			));
		}
		if let Some(c) = normalised
			.chars()
			.find(|c| !(c.is_ascii_uppercase() || ('2'..='7').contains(c)))
		{
			return Err(model::Error::invalid(
				"address",
				format!("'{}' is not a base32 character", c),
			));
		}
		if normalised.chars().next().and_then(Network::from_prefix).is_none() {
			return Err(model::Error::invalid(
				"address",
				format!("'{}' has no known network prefix", s),
			));
		}
		Ok(Address(normalised))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Addresses go on the wire as their 40 ascii characters.
impl Writeable for Address {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_str(&self.0)
	}
}

fn fixed_bytes(hex: &str, size: usize, what: &str) -> Result<Vec<u8>, ser::Error> {
	let bytes = util::from_hex(hex)
		.map_err(|e| ser::Error::Encoding(format!("invalid {} '{}': {}", what, hex, e)))?;
	if bytes.len() != size {
		return Err(ser::Error::Encoding(format!(
			"a {} is {} bytes, got {}",
			what,
			size,
			bytes.len()
		)));
	}
	Ok(bytes)
}

/// Ed25519 public key of an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
	/// Parses 32 bytes of hex
	pub fn from_hex(hex: &str) -> Result<PublicKey, ser::Error> {
		let bytes = fixed_bytes(hex, PUBLIC_KEY_LENGTH, "public key")?;
		let mut key = [0; PUBLIC_KEY_LENGTH];
		key.copy_from_slice(&bytes);
		Ok(PublicKey(key))
	}

	/// Lowercase hex
	pub fn to_hex(&self) -> String {
		util::to_hex(&self.0)
	}

	/// Reads a public key from a DTO value
	pub fn from_value(value: &Value) -> Result<PublicKey, model::Error> {
		match value {
			Value::String(s) => PublicKey::from_hex(s)
				.map_err(|e| model::Error::invalid("publicKey", e.to_string())),
			other => Err(model::Error::invalid(
				"publicKey",
				format!("not a public key: {}", other),
			)),
		}
	}
}

impl fmt::Debug for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PublicKey({})", self.to_hex())
	}
}

impl fmt::Display for PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl AsRef<[u8]> for PublicKey {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Writeable for PublicKey {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_bytes(&self.0)
	}
}

/// Signature over a transaction pre-image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; SIGNATURE_LENGTH]);

impl Signature {
	/// Parses 64 bytes of hex
	pub fn from_hex(hex: &str) -> Result<Signature, ser::Error> {
		Signature::from_slice(&fixed_bytes(hex, SIGNATURE_LENGTH, "signature")?)
	}

	/// Signature from raw bytes, as returned by a signer
	pub fn from_slice(bytes: &[u8]) -> Result<Signature, ser::Error> {
		if bytes.len() != SIGNATURE_LENGTH {
			return Err(ser::Error::Encoding(format!(
				"a signature is {} bytes, got {}",
				SIGNATURE_LENGTH,
				bytes.len()
			)));
		}
		let mut sig = [0; SIGNATURE_LENGTH];
		sig.copy_from_slice(bytes);
		Ok(Signature(sig))
	}

	/// Lowercase hex
	pub fn to_hex(&self) -> String {
		util::to_hex(&self.0)
	}

	/// Reads a signature from a DTO value
	pub fn from_value(value: &Value) -> Result<Signature, model::Error> {
		match value {
			Value::String(s) => Signature::from_hex(s)
				.map_err(|e| model::Error::invalid("signature", e.to_string())),
			other => Err(model::Error::invalid(
				"signature",
				format!("not a signature: {}", other),
			)),
		}
	}
}

impl fmt::Debug for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Signature({})", self.to_hex())
	}
}

impl AsRef<[u8]> for Signature {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Writeable for Signature {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_bytes(&self.0[..])
	}
}
