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

//! Transactions
//!
//! Every transaction shares a common header (type, version, timestamps,
//! signer, fee) followed by a payload specific to its kind. Kinds implement
//! `Extension`, which contributes their DTO fields, fee and payload bytes;
//! `TransactionBody` is the closed set of kinds.

pub mod importance;
pub mod mosaic;
pub mod multisig;
pub mod namespace;
pub mod transfer;

use std::cmp::max;
use std::convert::TryFrom;
use std::fmt;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::consensus::{DEFAULT_DEADLINE, MINIMUM_FEE, NEM_EPOCH};
use crate::core::account::{PublicKey, Signature};
use crate::core::hash::{Hash, HashWriter};
use crate::core::network::{Network, Version};
use crate::fee;
use crate::model::{self, Cast, Model, Schema};
use crate::registry::MosaicResolver;
use crate::ser::{self, BinWriter, SerializationMode, Writer};

pub use self::importance::{ImportanceMode, ImportanceTransfer};
pub use self::mosaic::{MosaicDefinitionCreation, MosaicSupplyChange, SupplyType};
pub use self::multisig::{
	Cosignature, CosignatoryModification, ModificationType, Multisig,
	MultisigAggregateModification,
};
pub use self::namespace::NamespaceProvision;
pub use self::transfer::{MosaicTransfer, Transfer};

/// Errors building or serializing a transaction
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Transactions nested in a way a node refuses
	#[error("invalid structure: {0}")]
	InvalidStructure(String),
	/// Type discriminant outside the known set
	#[error("unknown transaction type {0:#06x}")]
	UnknownTransactionType(i64),
	/// Serialization error
	#[error("serialization error: {0}")]
	Ser(#[from] ser::Error),
	/// Attribute error while reading a DTO
	#[error("model error: {0}")]
	Model(#[from] model::Error),
	/// Fee could not be computed
	#[error("fee error: {0}")]
	Fee(#[from] fee::Error),
}

/// Type discriminants NIS knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionType {
	/// XEM (and mosaic) transfer
	Transfer = 0x0101,
	/// Delegated harvesting
	ImportanceTransfer = 0x0801,
	/// Multisig account setup
	MultisigAggregateModification = 0x1001,
	/// Cosignature of a pending multisig transaction
	MultisigSignature = 0x1002,
	/// Multisig wrapper
	Multisig = 0x1004,
	/// Namespace rental
	ProvisionNamespace = 0x2001,
	/// Mosaic creation
	MosaicDefinitionCreation = 0x4001,
	/// Mosaic supply change
	MosaicSupplyChange = 0x4002,
}

impl TransactionType {
	/// Discriminant as it goes on the wire
	pub fn code(self) -> i32 {
		self as i32
	}

	/// Type for a discriminant
	pub fn from_code(code: i64) -> Option<TransactionType> {
		match code {
			0x0101 => Some(TransactionType::Transfer),
			0x0801 => Some(TransactionType::ImportanceTransfer),
			0x1001 => Some(TransactionType::MultisigAggregateModification),
			0x1002 => Some(TransactionType::MultisigSignature),
			0x1004 => Some(TransactionType::Multisig),
			0x2001 => Some(TransactionType::ProvisionNamespace),
			0x4001 => Some(TransactionType::MosaicDefinitionCreation),
			0x4002 => Some(TransactionType::MosaicSupplyChange),
			_ => None,
		}
	}
}

impl fmt::Display for TransactionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} ({:#06x})", self, self.code())
	}
}

/// What a transaction kind contributes on top of the common header.
pub trait Extension {
	/// Type discriminant
	fn tx_type(&self) -> TransactionType;

	/// Ordered DTO fragment, starting with `type`
	fn extend(&self, resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error>;

	/// Base fee, before the common minimum is applied
	fn extend_fee(&self, resolver: &dyn MosaicResolver) -> Result<u64, fee::Error>;

	/// Fields added to the metadata wrapper of the transaction
	fn extend_meta(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		Ok(Map::new())
	}

	/// Version the kind requires, keeping the network of `version`
	fn pin_version(&self, version: Version) -> Version;

	/// Writes the payload following the common header
	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		resolver: &dyn MosaicResolver,
	) -> Result<(), Error>;
}

/// Fragment with the type discriminant in first position.
pub(crate) fn fragment(tx_type: TransactionType) -> Map<String, Value> {
	let mut map = Map::new();
	map.insert("type".to_owned(), Value::from(tx_type.code()));
	map
}

/// Version `number` on the network `version` carries, testnet otherwise.
pub(crate) fn pinned(version: Version, number: u8) -> Version {
	version.pin(number, Network::Testnet.version(number))
}

/// Schema of transaction DTOs. Every attribute is kept, in input order.
pub(crate) static TRANSACTION_SCHEMA: Schema = Schema {
	fields: &[],
	appends: &[],
	casts: &[
		("type", Cast::Int),
		("version", Cast::Int),
		("timeStamp", Cast::Int),
		("deadline", Cast::Int),
		("fee", Cast::Int),
		("mode", Cast::Int),
		("supplyType", Cast::Int),
		("delta", Cast::Int),
		("newPart", Cast::Str),
	],
	relations: &[
		"signer",
		"amount",
		"recipient",
		"message",
		"mosaics",
		"remoteAccount",
		"otherHash",
		"otherAccount",
		"rentalFeeSink",
		"rentalFee",
		"creationFeeSink",
		"creationFee",
		"mosaicDefinition",
		"mosaicId",
	],
};

/// Closed set of transaction kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TransactionBody {
	/// Plain XEM transfer
	Transfer(Transfer),
	/// Transfer carrying mosaics
	MosaicTransfer(MosaicTransfer),
	/// Delegated harvesting
	ImportanceTransfer(ImportanceTransfer),
	/// Multisig account setup
	MultisigAggregateModification(MultisigAggregateModification),
	/// Cosignature
	Cosignature(Cosignature),
	/// Multisig wrapper
	Multisig(Multisig),
	/// Namespace rental
	NamespaceProvision(NamespaceProvision),
	/// Mosaic creation
	MosaicDefinitionCreation(MosaicDefinitionCreation),
	/// Mosaic supply change
	MosaicSupplyChange(MosaicSupplyChange),
}

macro_rules! dispatch {
	($body:expr, $b:ident => $call:expr) => {
		match $body {
			TransactionBody::Transfer($b) => $call,
			TransactionBody::MosaicTransfer($b) => $call,
			TransactionBody::ImportanceTransfer($b) => $call,
			TransactionBody::MultisigAggregateModification($b) => $call,
			TransactionBody::Cosignature($b) => $call,
			TransactionBody::Multisig($b) => $call,
			TransactionBody::NamespaceProvision($b) => $call,
			TransactionBody::MosaicDefinitionCreation($b) => $call,
			TransactionBody::MosaicSupplyChange($b) => $call,
		}
	};
}

macro_rules! impl_body_from {
	($variant:ident) => {
		impl From<$variant> for TransactionBody {
			fn from(b: $variant) -> TransactionBody {
				TransactionBody::$variant(b)
			}
		}
	};
}

impl_body_from!(Transfer);
impl_body_from!(MosaicTransfer);
impl_body_from!(ImportanceTransfer);
impl_body_from!(MultisigAggregateModification);
impl_body_from!(Cosignature);
impl_body_from!(Multisig);
impl_body_from!(NamespaceProvision);
impl_body_from!(MosaicDefinitionCreation);
impl_body_from!(MosaicSupplyChange);

impl Extension for TransactionBody {
	fn tx_type(&self) -> TransactionType {
		dispatch!(self, b => b.tx_type())
	}

	fn extend(&self, resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		dispatch!(self, b => b.extend(resolver))
	}

	fn extend_fee(&self, resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		dispatch!(self, b => b.extend_fee(resolver))
	}

	fn extend_meta(&self, resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		dispatch!(self, b => b.extend_meta(resolver))
	}

	fn pin_version(&self, version: Version) -> Version {
		dispatch!(self, b => b.pin_version(version))
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		dispatch!(self, b => b.write_payload(writer, resolver))
	}
}

impl TransactionBody {
	/// Reads the kind matching the `type` of a transaction DTO. Transfers
	/// with version 2 or with mosaics are mosaic transfers.
	pub fn from_model(model: &Model, version: Version) -> Result<TransactionBody, Error> {
		let code = model.i64_attribute("type")?;
		let tx_type =
			TransactionType::from_code(code).ok_or(Error::UnknownTransactionType(code))?;
		let body = match tx_type {
			TransactionType::Transfer => {
				let has_mosaics = match model.get("mosaics") {
					Some(Value::Array(list)) => !list.is_empty(),
					_ => false,
				};
				if version.number() == 2 || has_mosaics {
					MosaicTransfer::from_model(model)?.into()
				} else {
					Transfer::from_model(model)?.into()
				}
			}
			TransactionType::ImportanceTransfer => ImportanceTransfer::from_model(model)?.into(),
			TransactionType::MultisigAggregateModification => {
				MultisigAggregateModification::from_model(model)?.into()
			}
			TransactionType::MultisigSignature => Cosignature::from_model(model)?.into(),
			TransactionType::Multisig => Multisig::from_model(model)?.into(),
			TransactionType::ProvisionNamespace => NamespaceProvision::from_model(model)?.into(),
			TransactionType::MosaicDefinitionCreation => {
				MosaicDefinitionCreation::from_model(model)?.into()
			}
			TransactionType::MosaicSupplyChange => MosaicSupplyChange::from_model(model)?.into(),
		};
		Ok(body)
	}
}

/// A transaction: common header plus the kind specific body.
#[derive(Clone, Debug)]
pub struct Transaction {
	/// Network and version, pinned to what the body requires on output
	pub version: Version,
	/// Seconds since the NEM epoch
	pub time_stamp: i32,
	/// Seconds since the NEM epoch after which nodes drop the transaction
	pub deadline: i32,
	/// Account signing the transaction
	pub signer: Option<PublicKey>,
	/// Explicit fee, computed from the body when not set
	pub fee: Option<u64>,
	/// Signature, once known
	pub signature: Option<Signature>,
	/// Kind specific part
	pub body: TransactionBody,
	last_serialized: Option<Vec<u8>>,
}

/// The memo of the last serialization doesn't take part in equality.
impl PartialEq for Transaction {
	fn eq(&self, other: &Transaction) -> bool {
		self.version == other.version
			&& self.time_stamp == other.time_stamp
			&& self.deadline == other.deadline
			&& self.signer == other.signer
			&& self.fee == other.fee
			&& self.signature == other.signature
			&& self.body == other.body
	}
}

/// Current time in seconds since the NEM epoch
pub fn nem_time() -> i32 {
	i32::try_from(Utc::now().timestamp() - NEM_EPOCH).unwrap_or(i32::max_value())
}

fn opt_i32(model: &Model, name: &str) -> Result<Option<i32>, Error> {
	match model.get(name) {
		None | Some(Value::Null) => Ok(None),
		Some(v) => model::as_i64(v)
			.and_then(|n| i32::try_from(n).ok())
			.map(Some)
			.ok_or_else(|| Error::Model(model::Error::invalid(name, format!("not an int: {}", v)))),
	}
}

impl Transaction {
	/// New transaction on `network`, stamped now and valid for an hour.
	pub fn new<B: Into<TransactionBody>>(network: Network, body: B) -> Transaction {
		let body = body.into();
		let time_stamp = nem_time();
		Transaction {
			version: body.pin_version(network.version(1)),
			time_stamp,
			deadline: time_stamp.saturating_add(DEFAULT_DEADLINE as i32),
			signer: None,
			fee: None,
			signature: None,
			body,
			last_serialized: None,
		}
	}

	/// Same transaction signed by `signer`
	pub fn with_signer(mut self, signer: PublicKey) -> Transaction {
		self.signer = Some(signer);
		self
	}

	/// Same transaction with an explicit fee
	pub fn with_fee(mut self, fee: u64) -> Transaction {
		self.fee = Some(fee);
		self
	}

	/// Same transaction with another timestamp, the deadline moved along
	pub fn with_time_stamp(mut self, time_stamp: i32) -> Transaction {
		let lifetime = self.deadline.saturating_sub(self.time_stamp);
		self.time_stamp = time_stamp;
		self.deadline = time_stamp.saturating_add(lifetime);
		self
	}

	/// Same transaction with another deadline
	pub fn with_deadline(mut self, deadline: i32) -> Transaction {
		self.deadline = deadline;
		self
	}

	/// Same transaction with a known signature
	pub fn with_signature(mut self, signature: Signature) -> Transaction {
		self.signature = Some(signature);
		self
	}

	/// Type discriminant
	pub fn tx_type(&self) -> TransactionType {
		self.body.tx_type()
	}

	/// Network the transaction targets
	pub fn network(&self) -> Network {
		self.effective_version().network().unwrap_or_default()
	}

	/// Version as written, pinned to what the body requires
	pub fn effective_version(&self) -> Version {
		self.body.pin_version(self.version)
	}

	/// Fee of the transaction: the explicit one if set, else the body fee
	/// raised to the common minimum.
	pub fn fee(&self, resolver: &dyn MosaicResolver) -> Result<u64, Error> {
		match self.fee {
			Some(fee) => Ok(fee),
			None => Ok(max(MINIMUM_FEE, self.body.extend_fee(resolver)?)),
		}
	}

	/// Writes header and payload. `Full` mode appends the signature when
	/// one is known, `SigHash` never does.
	pub fn write<W: Writer>(&self, writer: &mut W, resolver: &dyn MosaicResolver) -> Result<(), Error> {
		let signer = self.signer.ok_or_else(|| {
			Error::InvalidStructure(format!("{} transaction has no signer", self.tx_type()))
		})?;
		ser_multiwrite!(
			writer,
			[write_i32, self.tx_type().code()],
			[write_i32, self.effective_version().to_i32()],
			[write_i32, self.time_stamp],
			[write_bytes, &signer],
			[write_u64, self.fee(resolver)?],
			[write_i32, self.deadline]
		);
		if writer.serialization_mode() == SerializationMode::Full {
			if let Some(ref signature) = self.signature {
				writer.write_bytes(signature)?;
			}
		}
		self.body.write_payload(writer, resolver)
	}

	/// Fresh serialization in the given mode, nothing stored.
	pub fn to_bytes(&self, mode: SerializationMode, resolver: &dyn MosaicResolver) -> Result<Vec<u8>, Error> {
		let mut vec = vec![];
		{
			let mut writer = BinWriter::new(&mut vec, mode);
			self.write(&mut writer, resolver)?;
		}
		Ok(vec)
	}

	/// Bytes to sign and announce. Always recomputed, a copy is kept for
	/// inspection through `last_serialized`.
	pub fn serialize(&mut self, resolver: &dyn MosaicResolver) -> Result<Vec<u8>, Error> {
		let bytes = self.to_bytes(SerializationMode::SigHash, resolver)?;
		trace!("serialized {} into {} bytes", self.tx_type(), bytes.len());
		self.last_serialized = Some(bytes.clone());
		Ok(bytes)
	}

	/// Result of the last `serialize` call
	pub fn last_serialized(&self) -> Option<&[u8]> {
		self.last_serialized.as_ref().map(|v| &v[..])
	}

	/// Keccak-256 of the signing bytes, the transaction hash
	pub fn hash(&self, resolver: &dyn MosaicResolver) -> Result<Hash, Error> {
		let mut hasher = HashWriter::default();
		self.write(&mut hasher, resolver)?;
		Ok(hasher.into_hash())
	}

	/// NIS transaction DTO: header fields, then the body fragment.
	pub fn to_dto(&self, resolver: &dyn MosaicResolver) -> Result<Value, Error> {
		let fragment = self.body.extend(resolver)?;
		let mut dto = Map::new();
		dto.insert("type".to_owned(), Value::from(self.tx_type().code()));
		dto.insert("version".to_owned(), Value::from(self.effective_version().to_i32()));
		dto.insert("timeStamp".to_owned(), Value::from(self.time_stamp));
		dto.insert("deadline".to_owned(), Value::from(self.deadline));
		if let Some(ref signer) = self.signer {
			dto.insert("signer".to_owned(), Value::from(signer.to_hex()));
		}
		dto.insert("fee".to_owned(), Value::from(self.fee(resolver)?));
		if let Some(ref signature) = self.signature {
			dto.insert("signature".to_owned(), Value::from(signature.to_hex()));
		}
		for (key, value) in fragment {
			if key != "type" {
				dto.insert(key, value);
			}
		}
		Ok(Value::Object(dto))
	}

	/// DTO wrapped with its metadata, `{"meta": .., "transaction": ..}`
	pub fn to_meta_dto(&self, resolver: &dyn MosaicResolver) -> Result<Value, Error> {
		let mut wrapper = Map::new();
		wrapper.insert("meta".to_owned(), Value::Object(self.body.extend_meta(resolver)?));
		wrapper.insert("transaction".to_owned(), self.to_dto(resolver)?);
		Ok(Value::Object(wrapper))
	}

	/// Reads a transaction DTO, bare or wrapped with its metadata. Missing
	/// header fields get the defaults of a new transaction.
	pub fn from_dto(value: &Value) -> Result<Transaction, Error> {
		let value = match value.get("transaction") {
			Some(inner) if value.get("type").is_none() => inner,
			_ => value,
		};
		let model = Model::from_value(&TRANSACTION_SCHEMA, value)?;
		Transaction::from_model(&model)
	}

	/// Reads a transaction from a model following the transaction schema.
	pub fn from_model(model: &Model) -> Result<Transaction, Error> {
		let version = match model.get("version") {
			None | Some(Value::Null) => Network::Testnet.version(1),
			Some(v) => Version::from_value(v)?,
		};
		let body = TransactionBody::from_model(model, version)?;
		let time_stamp = opt_i32(model, "timeStamp")?.unwrap_or_else(nem_time);
		let deadline = opt_i32(model, "deadline")?
			.unwrap_or_else(|| time_stamp.saturating_add(DEFAULT_DEADLINE as i32));
		let signer = match model.get("signer") {
			None | Some(Value::Null) => None,
			Some(_) => Some(model.related::<PublicKey>("signer")?),
		};
		let signature = match model.get("signature") {
			None | Some(Value::Null) => None,
			Some(v) => Some(Signature::from_value(v)?),
		};
		Ok(Transaction {
			version,
			time_stamp,
			deadline,
			signer,
			fee: model.opt_u64_attribute("fee")?,
			signature,
			body,
			last_serialized: None,
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::core::account::Address;
	use crate::registry::MosaicRegistry;
	use serde_json::json;

	fn transfer() -> Transaction {
		let recipient: Address = "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC".parse().unwrap();
		Transaction::new(Network::Testnet, Transfer::new(recipient, 1_000_000, None))
			.with_signer(PublicKey([1; 32]))
			.with_time_stamp(1000)
	}

	#[test]
	fn types_round_trip_their_codes() {
		for code in &[0x0101, 0x0801, 0x1001, 0x1002, 0x1004, 0x2001, 0x4001, 0x4002] {
			let t = TransactionType::from_code(*code).unwrap();
			assert_eq!(t.code() as i64, *code);
		}
		assert_eq!(TransactionType::from_code(0x0102), None);
	}

	#[test]
	fn header_layout() {
		let registry = MosaicRegistry::builtin();
		let tx = transfer();
		let bytes = tx.to_bytes(SerializationMode::SigHash, registry).unwrap();
		assert_eq!(&bytes[0..4], &[0x01, 0x01, 0, 0]);
		assert_eq!(&bytes[4..8], &[1, 0, 0, 0x98]);
		assert_eq!(&bytes[8..12], &[0xe8, 0x03, 0, 0]);
		assert_eq!(&bytes[12..16], &[32, 0, 0, 0]);
		assert_eq!(&bytes[16..48], &[1; 32][..]);
		assert_eq!(&bytes[48..56], &[0x50, 0xc3, 0, 0, 0, 0, 0, 0]);
		assert_eq!(&bytes[56..60], &[0xf8, 0x11, 0, 0]);
	}

	#[test]
	fn signature_only_in_full_mode() {
		let registry = MosaicRegistry::builtin();
		let unsigned = transfer();
		let signed = transfer().with_signature(Signature([9; 64]));
		let sig_hash = signed.to_bytes(SerializationMode::SigHash, registry).unwrap();
		let full = signed.to_bytes(SerializationMode::Full, registry).unwrap();
		assert_eq!(sig_hash, unsigned.to_bytes(SerializationMode::SigHash, registry).unwrap());
		assert_eq!(full.len(), sig_hash.len() + 4 + 64);
		assert_eq!(signed.hash(registry).unwrap(), unsigned.hash(registry).unwrap());
	}

	#[test]
	fn serialize_keeps_a_memo() {
		let registry = MosaicRegistry::builtin();
		let mut tx = transfer();
		assert!(tx.last_serialized().is_none());
		let bytes = tx.serialize(registry).unwrap();
		assert_eq!(tx.last_serialized(), Some(&bytes[..]));
		assert_eq!(tx.hash(registry).unwrap(), Hash::keccak(&bytes));
		let mut copy = tx.clone().with_fee(1);
		assert_ne!(copy.serialize(registry).unwrap(), bytes);
		assert_eq!(tx.last_serialized(), Some(&bytes[..]));
	}

	#[test]
	fn missing_signer_is_refused() {
		let mut tx = transfer();
		tx.signer = None;
		assert!(matches!(
			tx.to_bytes(SerializationMode::SigHash, MosaicRegistry::builtin()),
			Err(Error::InvalidStructure(_))
		));
	}

	#[test]
	fn explicit_fee_wins() {
		let registry = MosaicRegistry::builtin();
		assert_eq!(transfer().fee(registry).unwrap(), 50_000);
		assert_eq!(transfer().with_fee(7).fee(registry).unwrap(), 7);
	}

	#[test]
	fn dto_header_order() {
		let dto = transfer().to_dto(MosaicRegistry::builtin()).unwrap();
		let keys: Vec<&String> = dto.as_object().unwrap().keys().collect();
		assert_eq!(
			keys,
			vec![
				"type",
				"version",
				"timeStamp",
				"deadline",
				"signer",
				"fee",
				"recipient",
				"amount",
				"message"
			]
		);
		assert_eq!(dto["version"], json!(-1_744_830_463));
	}

	#[test]
	fn unknown_types_are_refused() {
		assert_eq!(
			Transaction::from_dto(&json!({"type": 0x0999, "version": 1})),
			Err(Error::UnknownTransactionType(0x0999))
		);
	}

	#[test]
	fn meta_wrapped_dto_is_unwrapped() {
		let registry = MosaicRegistry::builtin();
		let tx = transfer();
		let wrapped = tx.to_meta_dto(registry).unwrap();
		assert_eq!(wrapped["meta"], json!({}));
		// the fee is explicit once read back
		assert_eq!(Transaction::from_dto(&wrapped).unwrap(), tx.with_fee(50_000));
	}
}
