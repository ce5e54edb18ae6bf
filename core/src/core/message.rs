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

//! Message attached to a transfer.

use serde_json::{json, Value};

use crate::model;
use crate::ser::{self, Writeable, Writer};
use crate::util;

/// How a message payload is to be read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
	/// Payload is the message itself
	Plain = 1,
	/// Payload is encrypted for the recipient
	Secure = 2,
}

impl MessageType {
	fn from_i64(n: i64) -> Option<MessageType> {
		match n {
			1 => Some(MessageType::Plain),
			2 => Some(MessageType::Secure),
			_ => None,
		}
	}
}

/// Transfer message. Secure payloads are produced by the caller, only
/// their bytes are handled here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
	/// Raw payload bytes
	pub payload: Vec<u8>,
	/// Payload kind
	pub kind: MessageType,
}

impl Message {
	/// Plain text message
	pub fn plain(text: &str) -> Message {
		Message {
			payload: text.as_bytes().to_vec(),
			kind: MessageType::Plain,
		}
	}

	/// Encrypted message payload
	pub fn secure(payload: Vec<u8>) -> Message {
		Message {
			payload,
			kind: MessageType::Secure,
		}
	}

	/// Whether there's anything to send
	pub fn is_empty(&self) -> bool {
		self.payload.is_empty()
	}

	/// NIS message object, payload as hex
	pub fn to_value(&self) -> Value {
		json!({
			"payload": util::to_hex(&self.payload),
			"type": self.kind as i32,
		})
	}

	/// Reads a NIS message object. Null, `{}` and an object without payload
	/// all mean no message.
	pub fn from_value(value: &Value) -> Result<Option<Message>, model::Error> {
		let map = match value {
			Value::Null => return Ok(None),
			Value::Object(map) => map,
			other => {
				return Err(model::Error::invalid(
					"message",
					format!("not a message: {}", other),
				))
			}
		};
		let payload = match map.get("payload") {
			None | Some(Value::Null) => return Ok(None),
			Some(Value::String(hex)) => util::from_hex(hex)
				.map_err(|e| model::Error::invalid("message", format!("payload: {}", e)))?,
			Some(other) => {
				return Err(model::Error::invalid(
					"message",
					format!("payload is not hex: {}", other),
				))
			}
		};
		let kind = match map.get("type") {
			None | Some(Value::Null) => MessageType::Plain,
			Some(t) => model::as_i64(t)
				.and_then(MessageType::from_i64)
				.ok_or_else(|| model::Error::invalid("message", format!("unknown type {}", t)))?,
		};
		Ok(Some(Message { payload, kind }))
	}
}

/// A message is written as its own length, its type and its payload. An
/// empty message is written as a zero length alone, same as no message.
impl Writeable for Message {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		if self.is_empty() {
			return writer.write_i32(0);
		}
		let len = 4 + 4 + self.payload.len();
		if len > i32::max_value() as usize {
			return Err(ser::Error::IntegerOverflow {
				value: len.to_string(),
				width: 4,
			});
		}
		ser_multiwrite!(
			writer,
			[write_i32, len as i32],
			[write_i32, self.kind as i32],
			[write_bytes, &self.payload]
		);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ser::{ser_vec, SerializationMode};

	#[test]
	fn empty_message_is_a_zero_length() {
		let bytes = ser_vec(&Message::plain(""), SerializationMode::Full).unwrap();
		assert_eq!(bytes, vec![0, 0, 0, 0]);
	}

	#[test]
	fn message_layout() {
		let bytes = ser_vec(&Message::plain("hi"), SerializationMode::Full).unwrap();
		assert_eq!(
			bytes,
			vec![10, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, b'h', b'i']
		);
	}

	#[test]
	fn message_values() {
		assert_eq!(Message::from_value(&json!({})).unwrap(), None);
		assert_eq!(Message::from_value(&Value::Null).unwrap(), None);
		let msg = Message::from_value(&json!({"payload": "6869", "type": 1}))
			.unwrap()
			.unwrap();
		assert_eq!(msg, Message::plain("hi"));
		assert_eq!(msg.to_value(), json!({"payload": "6869", "type": 1}));
		assert!(Message::from_value(&json!({"payload": "68", "type": 7})).is_err());
	}
}
