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

//! Serialization layer producing the binary layout NIS verifies signatures
//! against. Every integer is little-endian, every variable length field is
//! prefixed with its byte count as a 32 bit integer.
//!
//! To use it simply implement `Writeable` and then use the `serialize` or
//! `ser_vec` functions on it.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};

/// Length prefix written in place of an absent optional field. NIS tells
/// "no data" apart from "empty data" with it.
pub const NULL_SENTINEL: u32 = 0xFFFF_FFFF;

/// Possible errors deriving from serializing.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum Error {
	/// Wraps an io error produced when writing
	#[error("IO error: {0}, {1:?}")]
	IOErr(String, io::ErrorKind),
	/// Hex input or buffer sizes that can't be represented
	#[error("encoding error: {0}")]
	Encoding(String),
	/// Value too large for the fixed width it has to be written in
	#[error("integer overflow: {value} does not fit in {width} bytes")]
	IntegerOverflow {
		/// Decimal representation of the offending value
		value: String,
		/// Width of the target field in bytes
		width: usize,
	},
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::IOErr(format!("{}", e), e.kind())
	}
}

/// Signal to a serializable object how much of its data should be serialized
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SerializationMode {
	/// Serialize everything, including a signature when one is known
	Full,
	/// Serialize everything that a signer of the object should know
	SigHash,
}

/// Implementations defined how different numbers and binary structures are
/// written to an underlying stream or container (depending on implementation).
pub trait Writer {
	/// The mode this serializer is writing in
	fn serialization_mode(&self) -> SerializationMode;

	/// Writes a u8 as bytes
	fn write_u8(&mut self, n: u8) -> Result<(), Error> {
		self.write_fixed_bytes(&[n])
	}

	/// Writes a u32 as bytes
	fn write_u32(&mut self, n: u32) -> Result<(), Error> {
		let mut bytes = [0; 4];
		LittleEndian::write_u32(&mut bytes, n);
		self.write_fixed_bytes(&bytes)
	}

	/// Writes a i32 as bytes
	fn write_i32(&mut self, n: i32) -> Result<(), Error> {
		let mut bytes = [0; 4];
		LittleEndian::write_i32(&mut bytes, n);
		self.write_fixed_bytes(&bytes)
	}

	/// Writes a u64 as a NIS long. NIS longs are signed, anything above
	/// `i64::MAX` is refused rather than wrapped.
	fn write_u64(&mut self, n: u64) -> Result<(), Error> {
		if n > i64::max_value() as u64 {
			return Err(Error::IntegerOverflow {
				value: n.to_string(),
				width: 8,
			});
		}
		self.write_i64(n as i64)
	}

	/// Writes a i64 as bytes
	fn write_i64(&mut self, n: i64) -> Result<(), Error> {
		let mut bytes = [0; 8];
		LittleEndian::write_i64(&mut bytes, n);
		self.write_fixed_bytes(&bytes)
	}

	/// Writes a variable number of bytes. The length is encoded as a 32-bit
	/// prefix holding the byte count.
	fn write_bytes<T: AsRef<[u8]> + ?Sized>(&mut self, bytes: &T) -> Result<(), Error> {
		let bytes = bytes.as_ref();
		if bytes.len() >= NULL_SENTINEL as usize {
			return Err(Error::IntegerOverflow {
				value: bytes.len().to_string(),
				width: 4,
			});
		}
		self.write_u32(bytes.len() as u32)?;
		self.write_fixed_bytes(bytes)
	}

	/// Writes an optional variable number of bytes, absent data being
	/// written as the `NULL_SENTINEL` length alone.
	fn write_optional_bytes<T: AsRef<[u8]> + ?Sized>(
		&mut self,
		bytes: Option<&T>,
	) -> Result<(), Error> {
		match bytes {
			Some(bytes) => self.write_bytes(bytes),
			None => self.write_u32(NULL_SENTINEL),
		}
	}

	/// Writes an utf-8 string, byte count first.
	fn write_str(&mut self, s: &str) -> Result<(), Error> {
		self.write_bytes(s.as_bytes())
	}

	/// Writes a nested structure prefixed with the length of its own
	/// serialization.
	fn write_sized<T: Writeable>(&mut self, thing: &T) -> Result<(), Error> {
		let bytes = ser_vec(thing, self.serialization_mode())?;
		self.write_bytes(&bytes)
	}

	/// Writes a fixed number of bytes. The reader is expected to know the
	/// actual length on read.
	fn write_fixed_bytes<T: AsRef<[u8]> + ?Sized>(&mut self, bytes: &T) -> Result<(), Error>;
}

/// Trait that every type that can be serialized as binary must implement.
/// Writes directly to a Writer, a utility type thinly wrapping an
/// underlying Write implementation.
pub trait Writeable {
	/// Write the data held by this Writeable to the provided writer
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error>;
}

/// Serializes a Writeable into any std::io::Write implementation.
pub fn serialize<W: Writeable>(
	sink: &mut dyn Write,
	mode: SerializationMode,
	thing: &W,
) -> Result<(), Error> {
	let mut writer = BinWriter::new(sink, mode);
	thing.write(&mut writer)
}

/// Utility function to serialize a writeable directly in memory using a
/// Vec<u8>.
pub fn ser_vec<W: Writeable>(thing: &W, mode: SerializationMode) -> Result<Vec<u8>, Error> {
	let mut vec = vec![];
	serialize(&mut vec, mode, thing)?;
	Ok(vec)
}

/// A 32 bit integer as NIS writes it.
pub fn serialize_int(n: i32) -> [u8; 4] {
	let mut bytes = [0; 4];
	LittleEndian::write_i32(&mut bytes, n);
	bytes
}

/// A 64 bit integer as NIS writes it, refusing values NIS can't read back.
pub fn serialize_long(n: u64) -> Result<[u8; 8], Error> {
	let mut vec = Vec::with_capacity(8);
	BinWriter::new(&mut vec, SerializationMode::Full).write_u64(n)?;
	let mut bytes = [0; 8];
	bytes.copy_from_slice(&vec);
	Ok(bytes)
}

/// A length prefixed byte string. `None` is written as the null sentinel,
/// an empty slice as a zero length.
pub fn serialize_string(bytes: Option<&[u8]>) -> Result<Vec<u8>, Error> {
	let mut vec = vec![];
	BinWriter::new(&mut vec, SerializationMode::Full).write_optional_bytes(bytes)?;
	Ok(vec)
}

/// Utility wrapper for an underlying byte Writer. Defines higher level methods
/// to write numbers, byte vectors, hashes, etc.
pub struct BinWriter<'a> {
	sink: &'a mut dyn Write,
	mode: SerializationMode,
}

impl<'a> BinWriter<'a> {
	/// Wraps a standard Write in a new BinWriter
	pub fn new(sink: &'a mut dyn Write, mode: SerializationMode) -> BinWriter<'a> {
		BinWriter { sink, mode }
	}
}

impl<'a> Writer for BinWriter<'a> {
	fn serialization_mode(&self) -> SerializationMode {
		self.mode
	}

	fn write_fixed_bytes<T: AsRef<[u8]> + ?Sized>(&mut self, bytes: &T) -> Result<(), Error> {
		self.sink.write_all(bytes.as_ref())?;
		Ok(())
	}
}

macro_rules! impl_int {
	($int:ty, $w_fn:ident) => {
		impl Writeable for $int {
			fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
				writer.$w_fn(*self)
			}
		}
	};
}

impl_int!(u8, write_u8);
impl_int!(u32, write_u32);
impl_int!(i32, write_i32);
impl_int!(u64, write_u64);
impl_int!(i64, write_i64);

/// Collections are written as their element count followed by every
/// element in order.
impl<T> Writeable for Vec<T>
where
	T: Writeable,
{
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		if self.len() >= NULL_SENTINEL as usize {
			return Err(Error::IntegerOverflow {
				value: self.len().to_string(),
				width: 4,
			});
		}
		writer.write_u32(self.len() as u32)?;
		for elmt in self {
			elmt.write(writer)?;
		}
		Ok(())
	}
}

impl<'a, A: Writeable> Writeable for &'a A {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		Writeable::write(*self, writer)
	}
}

impl<A: Writeable, B: Writeable> Writeable for (A, B) {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		Writeable::write(&self.0, writer)?;
		Writeable::write(&self.1, writer)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn ints_are_little_endian() {
		assert_eq!(serialize_int(1), [1, 0, 0, 0]);
		assert_eq!(serialize_int(0x0101), [1, 1, 0, 0]);
		assert_eq!(serialize_int(-1), [0xff, 0xff, 0xff, 0xff]);
		assert_eq!(
			serialize_long(1_000_000).unwrap(),
			[0x40, 0x42, 0x0f, 0, 0, 0, 0, 0]
		);
	}

	#[test]
	fn longs_beyond_i64_are_refused() {
		assert_eq!(
			serialize_long(i64::max_value() as u64).unwrap(),
			[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f]
		);
		assert_eq!(
			serialize_long(u64::max_value()),
			Err(Error::IntegerOverflow {
				value: u64::max_value().to_string(),
				width: 8,
			})
		);
	}

	#[test]
	fn strings_carry_byte_count() {
		assert_eq!(
			serialize_string(Some("né".as_bytes())).unwrap(),
			vec![3, 0, 0, 0, b'n', 0xc3, 0xa9]
		);
		assert_eq!(serialize_string(Some(&[][..])).unwrap(), vec![0, 0, 0, 0]);
		assert_eq!(
			serialize_string(None).unwrap(),
			vec![0xff, 0xff, 0xff, 0xff]
		);
	}

	#[test]
	fn vec_is_count_prefixed() {
		let v: Vec<u32> = vec![7, 9];
		assert_eq!(
			ser_vec(&v, SerializationMode::Full).unwrap(),
			vec![2, 0, 0, 0, 7, 0, 0, 0, 9, 0, 0, 0]
		);
	}

	#[test]
	fn sized_structures_carry_their_length() {
		let mut vec = vec![];
		{
			let mut writer = BinWriter::new(&mut vec, SerializationMode::Full);
			writer.write_sized(&(1u32, 2u64)).unwrap();
		}
		assert_eq!(vec.len(), 4 + 12);
		assert_eq!(&vec[..4], &[12, 0, 0, 0]);
	}
}
