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

//! Fixed width byte container. A buffer has a logical size (the width the
//! protocol declares for a field, 4 bytes for an int, 32 for a public key)
//! and holds content that may be shorter, in which case the content is
//! left-padded with zero bytes.

use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigUint;

use crate::ser::{Error, Writeable, Writer};
use crate::util;

/// Immutable byte sequence of a declared logical size. Two buffers are
/// equal when their logical sizes and padded bytes are.
#[derive(Clone)]
pub struct Buffer {
	/// Padded representation, always exactly the logical size.
	bytes: Vec<u8>,
	content_size: usize,
}

impl PartialEq for Buffer {
	fn eq(&self, other: &Buffer) -> bool {
		self.bytes == other.bytes
	}
}

impl Eq for Buffer {}

impl Hash for Buffer {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.bytes.hash(state);
	}
}

impl fmt::Debug for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Buffer({}, {})", self.size(), self.get_hex())
	}
}

impl fmt::Display for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.get_hex())
	}
}

impl Buffer {
	/// Builds a buffer from raw content. Without a size the buffer is exactly
	/// as large as its content.
	pub fn from_bytes(content: &[u8], size: Option<usize>) -> Result<Buffer, Error> {
		let size = size.unwrap_or_else(|| content.len());
		if content.len() > size {
			return Err(Error::Encoding(format!(
				"{} bytes of content exceed the declared size of {} bytes",
				content.len(),
				size
			)));
		}
		let mut bytes = vec![0; size - content.len()];
		bytes.extend_from_slice(content);
		Ok(Buffer {
			bytes,
			content_size: content.len(),
		})
	}

	/// Parses an hexadecimal string, optionally padded to `size` bytes.
	pub fn from_hex(hex: &str, size: Option<usize>) -> Result<Buffer, Error> {
		let content = util::from_hex(hex)
			.map_err(|e| Error::Encoding(format!("invalid hex '{}': {}", hex, e)))?;
		Buffer::from_bytes(&content, size)
	}

	/// Encodes a non-negative integer in exactly `size` bytes, most
	/// significant byte first.
	pub fn from_int(value: u128, size: usize) -> Result<Buffer, Error> {
		let be = value.to_be_bytes();
		let first = be.iter().position(|b| *b != 0).unwrap_or_else(|| be.len());
		Buffer::from_significant(&be[first..], size, || value.to_string())
	}

	/// Same as `from_int` for a decimal string of arbitrary precision, used
	/// for widths beyond 128 bits.
	pub fn from_decimal(decimal: &str, size: usize) -> Result<Buffer, Error> {
		let value = BigUint::parse_bytes(decimal.trim().as_bytes(), 10)
			.ok_or_else(|| Error::Encoding(format!("invalid decimal '{}'", decimal)))?;
		let be = value.to_bytes_be();
		// BigUint encodes zero as a single zero byte
		let first = be.iter().position(|b| *b != 0).unwrap_or_else(|| be.len());
		Buffer::from_significant(&be[first..], size, || value.to_str_radix(10))
	}

	fn from_significant<F>(content: &[u8], size: usize, value: F) -> Result<Buffer, Error>
	where
		F: Fn() -> String,
	{
		if content.len() > size {
			return Err(Error::IntegerOverflow {
				value: value(),
				width: size,
			});
		}
		Buffer::from_bytes(content, Some(size))
	}

	/// Logical size in bytes.
	pub fn size(&self) -> usize {
		self.bytes.len()
	}

	/// Number of significant bytes the buffer was built from.
	pub fn content_size(&self) -> usize {
		self.content_size
	}

	/// Padded bytes, most significant first.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Padded bytes in wire order for integers.
	pub fn to_le_bytes(&self) -> Vec<u8> {
		self.bytes.iter().rev().cloned().collect()
	}

	/// Lowercase hex of the padded representation.
	pub fn get_hex(&self) -> String {
		util::to_hex(&self.bytes)
	}

	/// Unsigned decimal value of the padded representation.
	pub fn get_decimal(&self) -> String {
		BigUint::from_bytes_be(&self.bytes).to_str_radix(10)
	}

	/// Bit string of the padded representation, eight digits per byte.
	pub fn get_binary(&self) -> String {
		self.bytes.iter().map(|b| format!("{:08b}", b)).collect()
	}

	/// Sub-buffer over the padded representation, `end` excluded.
	pub fn slice(&self, start: usize, end: usize) -> Result<Buffer, Error> {
		if start > end || end > self.size() {
			return Err(Error::Encoding(format!(
				"slice {}..{} out of a buffer of {} bytes",
				start,
				end,
				self.size()
			)));
		}
		Buffer::from_bytes(&self.bytes[start..end], None)
	}

	/// Same content left-padded to a larger logical size.
	pub fn pad(&self, size: usize) -> Result<Buffer, Error> {
		let mut padded = Buffer::from_bytes(&self.bytes, Some(size))?;
		padded.content_size = self.content_size;
		Ok(padded)
	}
}

impl AsRef<[u8]> for Buffer {
	fn as_ref(&self) -> &[u8] {
		&self.bytes
	}
}

/// Buffers go on the wire as length-prefixed byte strings.
impl Writeable for Buffer {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		writer.write_bytes(&self.bytes)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn hex_is_left_padded() {
		let buf = Buffer::from_hex("41", Some(4)).unwrap();
		assert_eq!(buf.get_hex(), "00000041");
		assert_eq!(buf.size(), 4);
		assert_eq!(buf.content_size(), 1);
		assert_eq!(buf.get_decimal(), "65");
		assert_eq!(
			buf.get_binary(),
			"00000000000000000000000001000001"
		);
	}

	#[test]
	fn hex_round_trips() {
		for h in &["", "00", "0a0b", "deadbeef", "00ff00ff00ff"] {
			let buf = Buffer::from_hex(h, None).unwrap();
			assert_eq!(buf.get_hex(), *h);
			let padded = Buffer::from_hex(h, Some(8)).unwrap();
			assert_eq!(padded.get_hex(), format!("{:0>16}", h));
		}
	}

	#[test]
	fn bad_hex_is_an_encoding_error() {
		assert!(matches!(Buffer::from_hex("abc", None), Err(Error::Encoding(_))));
		assert!(matches!(Buffer::from_hex("zz", None), Err(Error::Encoding(_))));
		assert!(matches!(
			Buffer::from_hex("0102030405", Some(4)),
			Err(Error::Encoding(_))
		));
	}

	#[test]
	fn ints_are_big_endian_with_le_wire_view() {
		let buf = Buffer::from_int(0x0101, 4).unwrap();
		assert_eq!(buf.get_hex(), "00000101");
		assert_eq!(buf.to_le_bytes(), vec![1, 1, 0, 0]);
		assert_eq!(Buffer::from_int(0, 4).unwrap().get_hex(), "00000000");
		assert_eq!(
			Buffer::from_int(0x1_0000_0000, 4),
			Err(Error::IntegerOverflow {
				value: "4294967296".to_owned(),
				width: 4,
			})
		);
	}

	#[test]
	fn decimals_beyond_u128() {
		let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
		let buf = Buffer::from_decimal(max, 32).unwrap();
		assert_eq!(buf.get_hex(), "ff".repeat(32));
		assert_eq!(buf.get_decimal(), max);
		assert!(matches!(
			Buffer::from_decimal(max, 31),
			Err(Error::IntegerOverflow { width: 31, .. })
		));
		assert!(matches!(
			Buffer::from_decimal("12a", 4),
			Err(Error::Encoding(_))
		));
	}

	#[test]
	fn slices_read_the_padded_bytes() {
		let buf = Buffer::from_hex("4142", Some(4)).unwrap();
		assert_eq!(buf.slice(0, 2).unwrap().get_hex(), "0000");
		assert_eq!(buf.slice(2, 4).unwrap().get_hex(), "4142");
		assert_eq!(buf.slice(1, 3).unwrap().get_hex(), "0041");
		assert!(buf.slice(3, 5).is_err());
		assert!(buf.slice(3, 2).is_err());
	}

	#[test]
	fn equality_needs_same_size() {
		let a = Buffer::from_hex("41", Some(4)).unwrap();
		let b = Buffer::from_hex("00000041", None).unwrap();
		let c = Buffer::from_hex("41", Some(8)).unwrap();
		assert_eq!(a, b);
		assert_ne!(a.content_size(), b.content_size());
		assert_ne!(a, c);
		assert_eq!(a.pad(8).unwrap(), c);
	}
}
