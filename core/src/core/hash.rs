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

//! Hash Function
//!
//! Transactions are identified by the Keccak-256 hash of their signing
//! pre-image.

use std::convert::AsRef;
use std::{fmt, ops};

use serde_json::{json, Value};
use tiny_keccak::{Hasher as KeccakHasher, Keccak};

use crate::model;
use crate::ser::{self, SerializationMode, Writeable, Writer};
use crate::util;

/// A hash consisting of all zeroes, used as a sentinel. No known preimage.
pub const ZERO_HASH: Hash = Hash([0; 32]);

/// Keccak-256 digest identifying a transaction.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Hash(pub [u8; 32]);

impl fmt::Debug for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for i in self.0[..].iter().cloned() {
			write!(f, "{:02x}", i)?;
		}
		Ok(())
	}
}

impl fmt::Display for Hash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

impl Hash {
	/// Keccak-256 of arbitrary data
	pub fn keccak(data: &[u8]) -> Hash {
		let mut hasher = HashWriter::default();
		hasher.state.update(data);
		hasher.into_hash()
	}

	/// Parses 32 bytes of hex
	pub fn from_hex(hex: &str) -> Result<Hash, ser::Error> {
		let bytes = util::from_hex(hex)
			.map_err(|e| ser::Error::Encoding(format!("invalid hash '{}': {}", hex, e)))?;
		if bytes.len() != 32 {
			return Err(ser::Error::Encoding(format!(
				"a hash is 32 bytes, got {}",
				bytes.len()
			)));
		}
		let mut a = [0; 32];
		a.copy_from_slice(&bytes);
		Ok(Hash(a))
	}

	/// Lowercase hex
	pub fn to_hex(&self) -> String {
		util::to_hex(&self.0)
	}

	/// Converts the hash to a byte vector
	pub fn to_vec(&self) -> Vec<u8> {
		self.0.to_vec()
	}

	/// NIS hash object, `{"data": hex}`
	pub fn to_value(&self) -> Value {
		json!({ "data": self.to_hex() })
	}

	/// Reads either the NIS hash object or a bare hex string.
	pub fn from_value(value: &Value) -> Result<Hash, model::Error> {
		let hex = match value {
			Value::String(s) => s.as_str(),
			Value::Object(map) => match map.get("data") {
				Some(Value::String(s)) => s.as_str(),
				_ => return Err(model::Error::invalid("hash", "object without 'data'")),
			},
			other => return Err(model::Error::invalid("hash", format!("not a hash: {}", other))),
		};
		Hash::from_hex(hex).map_err(|e| model::Error::invalid("hash", e.to_string()))
	}
}

impl ops::Index<usize> for Hash {
	type Output = u8;

	fn index(&self, idx: usize) -> &u8 {
		&self.0[idx]
	}
}

impl ops::Index<ops::RangeFull> for Hash {
	type Output = [u8];

	fn index(&self, idx: ops::RangeFull) -> &[u8] {
		&self.0[idx]
	}
}

impl AsRef<[u8]> for Hash {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

/// Hashes go on the wire as length prefixed 32 byte strings.
impl Writeable for Hash {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_bytes(&self.0)
	}
}

/// Serializer that outputs a hash of the serialized object
pub struct HashWriter {
	state: Keccak,
}

impl HashWriter {
	/// Consume the `HashWriter`, outputting its current hash into a 32-byte
	/// array
	pub fn finalize(self, output: &mut [u8]) {
		self.state.finalize(output);
	}

	/// Consume the `HashWriter`, outputting a `Hash` corresponding to its
	/// current state
	pub fn into_hash(self) -> Hash {
		let mut new_hash = ZERO_HASH;
		self.state.finalize(&mut new_hash.0[..]);
		new_hash
	}
}

impl Default for HashWriter {
	fn default() -> HashWriter {
		HashWriter {
			state: Keccak::v256(),
		}
	}
}

impl Writer for HashWriter {
	fn serialization_mode(&self) -> SerializationMode {
		SerializationMode::SigHash
	}

	fn write_fixed_bytes<T: AsRef<[u8]> + ?Sized>(&mut self, bytes: &T) -> Result<(), ser::Error> {
		self.state.update(bytes.as_ref());
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn keccak_of_empty_input() {
		// Keccak-256, not the FIPS SHA3-256 padding
		assert_eq!(
			Hash::keccak(&[]).to_hex(),
			"c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
		);
	}

	#[test]
	fn writer_hashes_like_keccak() {
		let mut hasher = HashWriter::default();
		hasher.write_i32(1).unwrap();
		hasher.write_str("a").unwrap();
		assert_eq!(hasher.into_hash(), Hash::keccak(&[1, 0, 0, 0, 1, 0, 0, 0, b'a']));
	}

	#[test]
	fn hash_values() {
		let h = Hash::keccak(b"nem");
		assert_eq!(Hash::from_value(&h.to_value()).unwrap(), h);
		assert_eq!(Hash::from_value(&Value::String(h.to_hex())).unwrap(), h);
		assert!(Hash::from_value(&json!({"data": "00"})).is_err());
		assert!(Hash::from_value(&json!(3)).is_err());
	}
}
