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

//! Multisig accounts: their setup, the wrapper announcing a transaction on
//! their behalf and the cosignatures completing it.

use serde_json::{json, Map, Value};

use super::{fragment, pinned, Error, Extension, Transaction, TransactionBody, TransactionType};
use crate::consensus::{
	MULTISIG_AGGREGATE_MODIFICATION_FEE, MULTISIG_FEE, MULTISIG_SIGNATURE_FEE, XEM_BASE,
};
use crate::core::{Address, Amount, Hash, PublicKey, Version};
use crate::fee;
use crate::model::{self, Model};
use crate::registry::MosaicResolver;
use crate::ser::{SerializationMode, Writeable, Writer};

/// Wrapper announcing a transaction for a multisig account. The inner
/// transaction can be neither a wrapper nor a cosignature.
#[derive(Clone, Debug, PartialEq)]
pub struct Multisig {
	other_trans: Box<Transaction>,
	signatures: Vec<Transaction>,
}

fn check_inner(inner: &Transaction) -> Result<(), Error> {
	match inner.body {
		TransactionBody::Multisig(_) => Err(Error::InvalidStructure(
			"a multisig transaction cannot wrap another multisig transaction".to_owned(),
		)),
		TransactionBody::Cosignature(_) => Err(Error::InvalidStructure(
			"a multisig transaction cannot wrap a cosignature".to_owned(),
		)),
		_ => Ok(()),
	}
}

impl Multisig {
	/// Wraps `inner`
	pub fn new(inner: Transaction) -> Result<Multisig, Error> {
		check_inner(&inner)?;
		Ok(Multisig {
			other_trans: Box::new(inner),
			signatures: vec![],
		})
	}

	/// Wrapped transaction
	pub fn inner(&self) -> &Transaction {
		&self.other_trans
	}

	/// Cosignatures collected so far
	pub fn signatures(&self) -> &[Transaction] {
		&self.signatures
	}

	/// Adds a cosignature, refusing any other kind of transaction
	pub fn add_signature(&mut self, signature: Transaction) -> Result<(), Error> {
		match signature.body {
			TransactionBody::Cosignature(_) => {
				self.signatures.push(signature);
				Ok(())
			}
			_ => Err(Error::InvalidStructure(format!(
				"{} is not a cosignature",
				signature.tx_type()
			))),
		}
	}

	/// Same wrapper with one more cosignature
	pub fn with_signature(mut self, signature: Transaction) -> Result<Multisig, Error> {
		self.add_signature(signature)?;
		Ok(self)
	}

	/// Reads a wrapper, its inner transaction and cosignatures
	pub fn from_model(model: &Model) -> Result<Multisig, Error> {
		let inner = model.get_attribute("otherTrans", true)?.unwrap_or(&Value::Null);
		let mut multisig = Multisig::new(Transaction::from_dto(inner)?)?;
		match model.get("signatures") {
			None | Some(Value::Null) => {}
			Some(Value::Array(list)) => {
				for signature in list {
					multisig.add_signature(Transaction::from_dto(signature)?)?;
				}
			}
			Some(other) => {
				return Err(model::Error::invalid("signatures", format!("not a list: {}", other)).into())
			}
		}
		Ok(multisig)
	}
}

impl Extension for Multisig {
	fn tx_type(&self) -> TransactionType {
		TransactionType::Multisig
	}

	fn extend(&self, resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert("otherTrans".to_owned(), self.other_trans.to_dto(resolver)?);
		let signatures = self
			.signatures
			.iter()
			.map(|s| s.to_dto(resolver))
			.collect::<Result<Vec<_>, _>>()?;
		map.insert("signatures".to_owned(), Value::Array(signatures));
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(MULTISIG_FEE)
	}

	fn extend_meta(&self, resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut meta = Map::new();
		meta.insert(
			"innerHash".to_owned(),
			self.other_trans.hash(resolver)?.to_value(),
		);
		Ok(meta)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	/// Signing bytes of the inner transaction, length prefixed.
	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		let inner = self
			.other_trans
			.to_bytes(SerializationMode::SigHash, resolver)?;
		writer.write_bytes(&inner)?;
		Ok(())
	}
}

/// Cosignature of a transaction pending for a multisig account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cosignature {
	/// Hash of the inner transaction cosigned
	pub other_hash: Hash,
	/// Multisig account the transaction is for
	pub other_account: Address,
}

impl Cosignature {
	/// Cosignature of the transaction hashed `other_hash`
	pub fn new(other_hash: Hash, other_account: Address) -> Cosignature {
		Cosignature {
			other_hash,
			other_account,
		}
	}

	/// Cosignature of the transaction wrapped by `multisig`
	pub fn for_multisig(
		multisig: &Multisig,
		multisig_account: Address,
		resolver: &dyn MosaicResolver,
	) -> Result<Cosignature, Error> {
		Ok(Cosignature::new(
			multisig.inner().hash(resolver)?,
			multisig_account,
		))
	}

	/// Reads a cosignature
	pub fn from_model(model: &Model) -> Result<Cosignature, Error> {
		Ok(Cosignature {
			other_hash: model.related("otherHash")?,
			other_account: model.related("otherAccount")?,
		})
	}

	/// Fee of a cosignature in XEM
	pub fn fee_xem() -> f64 {
		MULTISIG_SIGNATURE_FEE as f64 / XEM_BASE as f64
	}

	/// Fee of a cosignature as shown to cosigners
	pub fn fee_display() -> String {
		Amount(MULTISIG_SIGNATURE_FEE).to_hr_string(true)
	}
}

impl Extension for Cosignature {
	fn tx_type(&self) -> TransactionType {
		TransactionType::MultisigSignature
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert("otherHash".to_owned(), self.other_hash.to_value());
		map.insert(
			"otherAccount".to_owned(),
			Value::from(self.other_account.as_str()),
		);
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(MULTISIG_SIGNATURE_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	/// The hash goes in its own length prefixed structure.
	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		writer.write_sized(&self.other_hash)?;
		self.other_account.write(writer)?;
		Ok(())
	}
}

/// Whether a cosignatory joins or leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModificationType {
	/// Add a cosignatory
	AddCosignatory = 1,
	/// Remove a cosignatory
	DeleteCosignatory = 2,
}

/// One cosignatory change of a multisig account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CosignatoryModification {
	/// Addition or removal
	pub modification_type: ModificationType,
	/// Cosignatory concerned
	pub cosignatory: PublicKey,
}

impl CosignatoryModification {
	/// NIS modification object
	pub fn to_value(&self) -> Value {
		json!({
			"modificationType": self.modification_type as i32,
			"cosignatoryAccount": self.cosignatory.to_hex(),
		})
	}

	/// Reads a NIS modification object
	pub fn from_value(value: &Value) -> Result<CosignatoryModification, model::Error> {
		let kind = value
			.get("modificationType")
			.and_then(model::as_i64)
			.ok_or_else(|| model::Error::invalid("modificationType", "missing"))?;
		let modification_type = match kind {
			1 => ModificationType::AddCosignatory,
			2 => ModificationType::DeleteCosignatory,
			n => {
				return Err(model::Error::invalid(
					"modificationType",
					format!("unknown modification {}", n),
				))
			}
		};
		Ok(CosignatoryModification {
			modification_type,
			cosignatory: PublicKey::from_value(
				value.get("cosignatoryAccount").unwrap_or(&Value::Null),
			)?,
		})
	}
}

/// Length of a serialized modification: type then the key string
const MODIFICATION_LENGTH: i32 = 4 + 4 + 32;

impl Writeable for CosignatoryModification {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), crate::ser::Error> {
		writer.write_i32(MODIFICATION_LENGTH)?;
		writer.write_i32(self.modification_type as i32)?;
		self.cosignatory.write(writer)
	}
}

/// Turns an account into a multisig account, or changes its cosignatories
/// and minimum number of cosignatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigAggregateModification {
	/// Cosignatory changes, in the order given
	pub modifications: Vec<CosignatoryModification>,
	/// Relative change of the minimum number of cosignatures
	pub min_cosignatories: Option<i32>,
}

impl MultisigAggregateModification {
	/// Aggregate of `modifications`
	pub fn new(
		modifications: Vec<CosignatoryModification>,
		min_cosignatories: Option<i32>,
	) -> MultisigAggregateModification {
		MultisigAggregateModification {
			modifications,
			min_cosignatories,
		}
	}

	/// Reads an aggregate modification. The minimum change may be given as
	/// the NIS `{"relativeChange": n}` object or a bare number.
	pub fn from_model(model: &Model) -> Result<MultisigAggregateModification, Error> {
		let modifications = match model.get("modifications") {
			None | Some(Value::Null) => vec![],
			Some(Value::Array(list)) => list
				.iter()
				.map(CosignatoryModification::from_value)
				.collect::<Result<Vec<_>, _>>()?,
			Some(other) => {
				return Err(model::Error::invalid(
					"modifications",
					format!("not a list: {}", other),
				)
				.into())
			}
		};
		let min_cosignatories = match model.get("minCosignatories") {
			None | Some(Value::Null) => None,
			Some(v) => {
				let change = v.get("relativeChange").unwrap_or(v);
				let n = model::as_i64(change)
					.filter(|n| *n >= i32::min_value() as i64 && *n <= i32::max_value() as i64)
					.ok_or_else(|| {
						model::Error::invalid("minCosignatories", format!("not a change: {}", v))
					})?;
				Some(n as i32)
			}
		};
		Ok(MultisigAggregateModification {
			modifications,
			min_cosignatories,
		})
	}
}

impl Extension for MultisigAggregateModification {
	fn tx_type(&self) -> TransactionType {
		TransactionType::MultisigAggregateModification
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert(
			"modifications".to_owned(),
			Value::Array(self.modifications.iter().map(|m| m.to_value()).collect()),
		);
		if let Some(change) = self.min_cosignatories {
			map.insert(
				"minCosignatories".to_owned(),
				json!({ "relativeChange": change }),
			);
		}
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(MULTISIG_AGGREGATE_MODIFICATION_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 2)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		writer.write_u32(self.modifications.len() as u32)?;
		for modification in &self.modifications {
			modification.write(writer)?;
		}
		match self.min_cosignatories {
			Some(change) => {
				writer.write_i32(4)?;
				writer.write_i32(change)?;
			}
			None => writer.write_i32(0)?,
		}
		Ok(())
	}
}
