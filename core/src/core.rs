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

//! Core types

pub mod account;
pub mod hash;
pub mod message;
pub mod mosaic;
pub mod network;
pub mod transaction;

use std::fmt;

use serde_json::Value;

use crate::consensus::{XEM_BASE, XEM_DIVISIBILITY};
use crate::model;

pub use self::account::{Address, PublicKey, Signature};
pub use self::hash::Hash;
pub use self::message::{Message, MessageType};
pub use self::mosaic::*;
pub use self::network::{Network, Version};
pub use self::transaction::{
	Cosignature, CosignatoryModification, Extension, ImportanceMode, ImportanceTransfer,
	ModificationType, MosaicDefinitionCreation, MosaicSupplyChange, MosaicTransfer, Multisig,
	MultisigAggregateModification, NamespaceProvision, SupplyType, Transaction, TransactionBody,
	TransactionType, Transfer,
};

/// Common errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// Human readable represenation of amount is invalid
	#[error("Amount string was invalid")]
	InvalidAmountString,
}

/// Amount of XEM in micro XEM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub u64);

impl Amount {
	/// Amount of whole XEM
	pub fn from_xem(xem: u64) -> Amount {
		Amount(xem.saturating_mul(XEM_BASE))
	}

	/// Micro XEM
	pub fn micro(self) -> u64 {
		self.0
	}

	/// Whole XEM, fraction dropped
	pub fn xem(self) -> u64 {
		self.0 / XEM_BASE
	}

	/// Human readable amount, see `amount_to_hr_string`
	pub fn to_hr_string(self, truncate: bool) -> String {
		amount_to_hr_string(self.0, truncate)
	}

	/// Reads an amount from a DTO value, a number or a numeric string.
	/// Null is a zero amount.
	pub fn from_value(value: &Value) -> Result<Amount, model::Error> {
		if value.is_null() {
			return Ok(Amount(0));
		}
		model::as_u64(value)
			.map(Amount)
			.ok_or_else(|| model::Error::invalid("amount", format!("not an amount: {}", value)))
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hr_string(true))
	}
}

impl From<u64> for Amount {
	fn from(micro: u64) -> Amount {
		Amount(micro)
	}
}

/// Common method for parsing an amount from human-readable, and converting
/// to internally-compatible u64
pub fn amount_from_hr_string(amount: &str) -> Result<u64, Error> {
	// no i18n yet, make sure we use '.' as the separator
	if amount.find(',').is_some() {
		return Err(Error::InvalidAmountString);
	}
	let (xem, micro) = match amount.find('.') {
		None => (parse_xem(amount)?, 0),
		Some(pos) => {
			let (xs, tail) = amount.split_at(pos);
			(parse_xem(xs)?, parse_micro(&tail[1..])?)
		}
	};
	xem.checked_mul(XEM_BASE)
		.and_then(|x| x.checked_add(micro))
		.ok_or(Error::InvalidAmountString)
}

fn parse_xem(amount: &str) -> Result<u64, Error> {
	if amount == "" {
		Ok(0)
	} else {
		amount
			.parse::<u64>()
			.map_err(|_| Error::InvalidAmountString)
	}
}

fn parse_micro(amount: &str) -> Result<u64, Error> {
	let width = XEM_DIVISIBILITY as usize;
	let amount = if amount.len() > width {
		&amount[..width]
	} else {
		amount
	};
	if amount.chars().any(|c| !c.is_ascii_digit()) {
		return Err(Error::InvalidAmountString);
	}
	format!("{:0<width$}", amount, width = width)
		.parse::<u64>()
		.map_err(|_| Error::InvalidAmountString)
}

/// Common method for converting an amount to a human-readable string
pub fn amount_to_hr_string(amount: u64, truncate: bool) -> String {
	let width = XEM_DIVISIBILITY as usize;
	let hr = format!(
		"{}.{:0width$}",
		amount / XEM_BASE,
		amount % XEM_BASE,
		width = width
	);
	if truncate {
		let nzeros = hr.chars().rev().take_while(|x| x == &'0').count();
		if nzeros < width {
			return hr.trim_end_matches('0').to_string();
		} else {
			return format!("{}0", hr.trim_end_matches('0'));
		}
	}
	hr
}
