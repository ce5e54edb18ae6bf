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

/// Implements hex-encoding from bytes to string and decoding of strings
/// to bytes. NIS speaks lowercase hex everywhere (keys, hashes, message
/// payloads), so that is what we produce.
use std::fmt::{self, Write};

/// Reasons a string can fail to decode as hex
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexError {
	/// Hex strings always hold two characters per byte
	OddLength(usize),
	/// A character outside of [0-9a-fA-F] at the given position
	InvalidDigit(usize),
}

impl fmt::Display for HexError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			HexError::OddLength(len) => write!(f, "odd hex length {}", len),
			HexError::InvalidDigit(pos) => write!(f, "invalid hex digit at {}", pos),
		}
	}
}

impl std::error::Error for HexError {}

/// Encode the provided bytes into a hex string
pub fn to_hex(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len() * 2);
	for byte in bytes {
		write!(&mut s, "{:02x}", byte).expect("Unable to write");
	}
	s
}

/// Decode a hex string into bytes. An optional `0x` prefix and surrounding
/// whitespace are ignored.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
	let hex_trim = hex_str.trim();
	let hex_trim = if hex_trim.starts_with("0x") || hex_trim.starts_with("0X") {
		&hex_trim[2..]
	} else {
		hex_trim
	};
	if hex_trim.len() % 2 != 0 {
		return Err(HexError::OddLength(hex_trim.len()));
	}
	hex_trim
		.as_bytes()
		.chunks(2)
		.enumerate()
		.map(|(i, pair)| {
			let hi = hex_digit(pair[0]).ok_or(HexError::InvalidDigit(i * 2))?;
			let lo = hex_digit(pair[1]).ok_or(HexError::InvalidDigit(i * 2 + 1))?;
			Ok(hi << 4 | lo)
		})
		.collect()
}

fn hex_digit(c: u8) -> Option<u8> {
	match c {
		b'0'..=b'9' => Some(c - b'0'),
		b'a'..=b'f' => Some(c - b'a' + 10),
		b'A'..=b'F' => Some(c - b'A' + 10),
		_ => None,
	}
}
