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

//! Transfers of XEM, with an optional message, and of mosaics.

use serde_json::{Map, Value};

use super::{fragment, pinned, Error, Extension, TransactionType};
use crate::core::{Address, Amount, Message, MosaicAttachment, Version};
use crate::fee;
use crate::model::Model;
use crate::registry::MosaicResolver;
use crate::ser::{Writeable, Writer};

/// Transfer of XEM to a recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
	/// Account credited
	pub recipient: Address,
	/// Micro XEM transferred
	pub amount: u64,
	/// Attached message
	pub message: Option<Message>,
}

impl Transfer {
	/// Transfer of `amount` micro XEM
	pub fn new(recipient: Address, amount: u64, message: Option<Message>) -> Transfer {
		Transfer {
			recipient,
			amount,
			message,
		}
	}

	/// Reads the transfer fields of a transaction model
	pub fn from_model(model: &Model) -> Result<Transfer, Error> {
		Ok(Transfer {
			recipient: model.related("recipient")?,
			amount: model.related::<Amount>("amount")?.micro(),
			message: model.related("message")?,
		})
	}

	fn extend_into(&self, map: &mut Map<String, Value>) {
		map.insert("recipient".to_owned(), Value::from(self.recipient.as_str()));
		map.insert("amount".to_owned(), Value::from(self.amount));
		let message = match self.message {
			Some(ref m) => m.to_value(),
			None => Value::Object(Map::new()),
		};
		map.insert("message".to_owned(), message);
	}

	fn write_transfer<W: Writer>(&self, writer: &mut W) -> Result<(), Error> {
		self.recipient.write(writer)?;
		writer.write_u64(self.amount)?;
		match self.message {
			Some(ref m) => m.write(writer)?,
			None => writer.write_i32(0)?,
		}
		Ok(())
	}
}

impl Extension for Transfer {
	fn tx_type(&self) -> TransactionType {
		TransactionType::Transfer
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		self.extend_into(&mut map);
		Ok(map)
	}

	fn extend_fee(&self, resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		fee::transfer(self.amount, self.message.as_ref(), &[], resolver)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		self.write_transfer(writer)
	}
}

/// Transfer carrying mosaics, always a version 2 transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicTransfer {
	/// Recipient, XEM amount and message
	pub transfer: Transfer,
	/// Attached mosaics, in the order given
	pub mosaics: Vec<MosaicAttachment>,
}

impl MosaicTransfer {
	/// Transfer of `mosaics` along with an XEM amount
	pub fn new(transfer: Transfer, mosaics: Vec<MosaicAttachment>) -> MosaicTransfer {
		MosaicTransfer { transfer, mosaics }
	}

	/// Same transfer with one more mosaic
	pub fn with_mosaic(mut self, mosaic: MosaicAttachment) -> MosaicTransfer {
		self.mosaics.push(mosaic);
		self
	}

	/// Reads the mosaic transfer fields of a transaction model
	pub fn from_model(model: &Model) -> Result<MosaicTransfer, Error> {
		Ok(MosaicTransfer {
			transfer: Transfer::from_model(model)?,
			mosaics: model.related("mosaics")?,
		})
	}
}

impl Extension for MosaicTransfer {
	fn tx_type(&self) -> TransactionType {
		TransactionType::Transfer
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		self.transfer.extend_into(&mut map);
		map.insert(
			"mosaics".to_owned(),
			MosaicAttachment::list_to_value(&self.mosaics),
		);
		Ok(map)
	}

	fn extend_fee(&self, resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		fee::transfer(
			self.transfer.amount,
			self.transfer.message.as_ref(),
			&self.mosaics,
			resolver,
		)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 2)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		self.transfer.write_transfer(writer)?;
		writer.write_u32(self.mosaics.len() as u32)?;
		for mosaic in &self.mosaics {
			writer.write_sized(mosaic)?;
		}
		Ok(())
	}
}
