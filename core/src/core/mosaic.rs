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

//! Mosaics: user defined assets living under a namespace. A definition
//! describes the asset, an attachment moves some quantity of it along with a
//! transfer.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::core::account::{Address, PublicKey};
use crate::model::{self, Cast, Entity, Model, Schema};
use crate::ser::{self, Writeable, Writer};

/// Mosaic identifier, a mosaic name within a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MosaicId {
	/// Namespace, possibly nested (`"dim"`, `"nem.sub"`)
	pub namespace_id: String,
	/// Mosaic name within the namespace
	pub name: String,
}

static MOSAIC_ID_SCHEMA: Schema = Schema {
	fields: &["namespaceId", "name"],
	appends: &[],
	casts: &[("namespaceId", Cast::Str), ("name", Cast::Str)],
	relations: &[],
};

impl MosaicId {
	/// Id of `name` within `namespace_id`
	pub fn new(namespace_id: &str, name: &str) -> MosaicId {
		MosaicId {
			namespace_id: namespace_id.to_owned(),
			name: name.to_owned(),
		}
	}

	/// Fully qualified name, `namespace:name`
	pub fn fqn(&self) -> String {
		format!("{}:{}", self.namespace_id, self.name)
	}

	/// Parses a fully qualified name
	pub fn parse(fqn: &str) -> Result<MosaicId, model::Error> {
		match fqn.trim().find(':') {
			Some(pos) => {
				let (ns, name) = fqn.trim().split_at(pos);
				let name = &name[1..];
				if ns.is_empty() || name.is_empty() || name.contains(':') {
					Err(model::Error::invalid(
						"mosaicId",
						format!("'{}' is not namespace:name", fqn),
					))
				} else {
					Ok(MosaicId::new(ns, name))
				}
			}
			None => Err(model::Error::invalid(
				"mosaicId",
				format!("'{}' has no namespace", fqn),
			)),
		}
	}
}

impl fmt::Display for MosaicId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace_id, self.name)
	}
}

impl FromStr for MosaicId {
	type Err = model::Error;

	fn from_str(s: &str) -> Result<MosaicId, model::Error> {
		MosaicId::parse(s)
	}
}

impl Entity for MosaicId {
	fn schema() -> &'static Schema {
		&MOSAIC_ID_SCHEMA
	}

	fn from_model(model: &Model) -> Result<MosaicId, model::Error> {
		Ok(MosaicId::new(
			model.str_attribute("namespaceId")?,
			model.str_attribute("name")?,
		))
	}

	fn to_model(&self) -> Model {
		Model::new(&MOSAIC_ID_SCHEMA)
			.with("namespaceId", self.namespace_id.as_str())
			.with("name", self.name.as_str())
	}
}

/// Namespace then name. Containers write it length prefixed.
impl Writeable for MosaicId {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		ser_multiwrite!(
			writer,
			[write_str, &self.namespace_id],
			[write_str, &self.name]
		);
		Ok(())
	}
}

/// Properties of a mosaic definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicProperties {
	/// Number of decimal places
	pub divisibility: u8,
	/// Supply at creation, in whole units
	pub initial_supply: u64,
	/// Whether the creator can change the supply
	pub supply_mutable: bool,
	/// Whether holders other than the creator can transfer it
	pub transferable: bool,
}

impl Default for MosaicProperties {
	fn default() -> MosaicProperties {
		MosaicProperties {
			divisibility: 0,
			initial_supply: 1_000,
			supply_mutable: true,
			transferable: true,
		}
	}
}

impl MosaicProperties {
	/// NIS property list, values as strings
	pub fn to_value(&self) -> Value {
		Value::Array(
			self.entries()
				.iter()
				.map(|(name, value)| json!({"name": name, "value": value}))
				.collect(),
		)
	}

	fn entries(&self) -> [(&'static str, String); 4] {
		[
			("divisibility", self.divisibility.to_string()),
			("initialSupply", self.initial_supply.to_string()),
			("supplyMutable", self.supply_mutable.to_string()),
			("transferable", self.transferable.to_string()),
		]
	}

	/// Reads the NIS property list, or a plain object keyed by property
	/// name. Missing properties keep their default.
	pub fn from_value(value: &Value) -> Result<MosaicProperties, model::Error> {
		let mut props = MosaicProperties::default();
		match value {
			Value::Null => {}
			Value::Array(list) => {
				for entry in list {
					let name = entry
						.get("name")
						.and_then(Value::as_str)
						.ok_or_else(|| model::Error::invalid("properties", "entry without a name"))?;
					props.set(name, entry.get("value").unwrap_or(&Value::Null))?;
				}
			}
			Value::Object(map) => {
				for (name, value) in map {
					props.set(name, value)?;
				}
			}
			other => {
				return Err(model::Error::invalid(
					"properties",
					format!("not a property list: {}", other),
				))
			}
		}
		Ok(props)
	}

	fn set(&mut self, name: &str, value: &Value) -> Result<(), model::Error> {
		let bad = || model::Error::invalid(name, format!("invalid value {}", value));
		match name {
			"divisibility" => {
				let div = model::as_u64(value).ok_or_else(bad)?;
				if div > 6 {
					return Err(bad());
				}
				self.divisibility = div as u8;
			}
			"initialSupply" => self.initial_supply = model::as_u64(value).ok_or_else(bad)?,
			"supplyMutable" => self.supply_mutable = model::as_bool(value).ok_or_else(bad)?,
			"transferable" => self.transferable = model::as_bool(value).ok_or_else(bad)?,
			_ => debug!("ignoring unknown mosaic property {}", name),
		}
		Ok(())
	}
}

struct Property<'a>(&'a str, &'a str);

impl<'a> Writeable for Property<'a> {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		ser_multiwrite!(writer, [write_str, self.0], [write_str, self.1]);
		Ok(())
	}
}

/// Property count, then each property length prefixed.
impl Writeable for MosaicProperties {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		let entries = self.entries();
		writer.write_u32(entries.len() as u32)?;
		for (name, value) in entries.iter() {
			writer.write_sized(&Property(name, value))?;
		}
		Ok(())
	}
}

/// How a levy is computed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevyType {
	/// Fixed quantity per transfer
	Absolute = 1,
	/// Quantity proportional to the amount transferred
	Percentile = 2,
}

/// Fee charged on every transfer of a mosaic, paid in another (or the same)
/// mosaic to a fixed recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicLevy {
	/// How the levy is computed
	pub levy_type: LevyType,
	/// Account receiving the levy
	pub recipient: Address,
	/// Mosaic the levy is paid in
	pub mosaic_id: MosaicId,
	/// Levy quantity, or rate for percentile levies
	pub fee: u64,
}

static MOSAIC_LEVY_SCHEMA: Schema = Schema {
	fields: &["type", "recipient", "mosaicId", "fee"],
	appends: &[],
	casts: &[("type", Cast::Int), ("fee", Cast::Int)],
	relations: &["recipient", "mosaicId"],
};

impl MosaicLevy {
	/// Reads a levy, null and `{}` meaning none
	pub fn from_value(value: &Value) -> Result<Option<MosaicLevy>, model::Error> {
		match value {
			Value::Null => Ok(None),
			Value::Object(map) if map.is_empty() => Ok(None),
			other => MosaicLevy::from_dto(other).map(Some),
		}
	}
}

impl Entity for MosaicLevy {
	fn schema() -> &'static Schema {
		&MOSAIC_LEVY_SCHEMA
	}

	fn from_model(model: &Model) -> Result<MosaicLevy, model::Error> {
		let levy_type = match model.i64_attribute("type")? {
			1 => LevyType::Absolute,
			2 => LevyType::Percentile,
			n => return Err(model::Error::invalid("type", format!("unknown levy type {}", n))),
		};
		Ok(MosaicLevy {
			levy_type,
			recipient: model.related("recipient")?,
			mosaic_id: model.related("mosaicId")?,
			fee: model.u64_attribute("fee")?,
		})
	}

	fn to_model(&self) -> Model {
		Model::new(&MOSAIC_LEVY_SCHEMA)
			.with("type", self.levy_type as i32)
			.with("recipient", self.recipient.as_str())
			.with("mosaicId", self.mosaic_id.to_dto())
			.with("fee", self.fee)
	}
}

impl Writeable for MosaicLevy {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_i32(self.levy_type as i32)?;
		self.recipient.write(writer)?;
		writer.write_sized(&self.mosaic_id)?;
		writer.write_u64(self.fee)
	}
}

/// Full description of a mosaic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicDefinition {
	/// Account that created the mosaic
	pub creator: PublicKey,
	/// Identifier
	pub id: MosaicId,
	/// Free text description
	pub description: String,
	/// Supply and behaviour
	pub properties: MosaicProperties,
	/// Optional transfer levy
	pub levy: Option<MosaicLevy>,
}

static MOSAIC_DEFINITION_SCHEMA: Schema = Schema {
	fields: &["creator", "id", "description", "properties", "levy"],
	appends: &[("namespaceId", "id.namespaceId"), ("name", "id.name")],
	casts: &[("description", Cast::Str)],
	relations: &["creator", "id", "properties", "levy"],
};

impl MosaicDefinition {
	/// Definition without levy
	pub fn new(
		creator: PublicKey,
		id: MosaicId,
		description: &str,
		properties: MosaicProperties,
	) -> MosaicDefinition {
		MosaicDefinition {
			creator,
			id,
			description: description.to_owned(),
			properties,
			levy: None,
		}
	}

	/// Same definition with a levy
	pub fn with_levy(self, levy: MosaicLevy) -> MosaicDefinition {
		MosaicDefinition {
			levy: Some(levy),
			..self
		}
	}
}

impl Entity for MosaicDefinition {
	fn schema() -> &'static Schema {
		&MOSAIC_DEFINITION_SCHEMA
	}

	fn from_model(model: &Model) -> Result<MosaicDefinition, model::Error> {
		Ok(MosaicDefinition {
			creator: model.related("creator")?,
			id: model.related("id")?,
			description: model.opt_str_attribute("description")?.unwrap_or("").to_owned(),
			properties: model.related("properties")?,
			levy: model.related("levy")?,
		})
	}

	fn to_model(&self) -> Model {
		let levy = match self.levy {
			Some(ref levy) => levy.to_dto(),
			None => Value::Object(Map::new()),
		};
		Model::new(&MOSAIC_DEFINITION_SCHEMA)
			.with("creator", self.creator.to_hex())
			.with("id", self.id.to_dto())
			.with("description", self.description.as_str())
			.with("properties", self.properties.to_value())
			.with("levy", levy)
	}
}

impl Writeable for MosaicDefinition {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		self.creator.write(writer)?;
		writer.write_sized(&self.id)?;
		writer.write_str(&self.description)?;
		self.properties.write(writer)?;
		match self.levy {
			Some(ref levy) => writer.write_sized(levy),
			None => writer.write_i32(0),
		}
	}
}

/// Quantity of a mosaic attached to a transfer, in the mosaic's smallest
/// unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicAttachment {
	/// Mosaic moved
	pub mosaic_id: MosaicId,
	/// Quantity in smallest units
	pub quantity: u64,
}

static MOSAIC_ATTACHMENT_SCHEMA: Schema = Schema {
	fields: &["mosaicId", "quantity"],
	appends: &[("namespaceId", "mosaicId.namespaceId"), ("name", "mosaicId.name")],
	casts: &[("quantity", Cast::Int)],
	relations: &["mosaicId"],
};

impl MosaicAttachment {
	/// Attachment of `quantity` units of `mosaic_id`
	pub fn new(mosaic_id: MosaicId, quantity: u64) -> MosaicAttachment {
		MosaicAttachment {
			mosaic_id,
			quantity,
		}
	}

	/// Reads a list of attachments, null being an empty one
	pub fn list_from_value(value: &Value) -> Result<Vec<MosaicAttachment>, model::Error> {
		match value {
			Value::Null => Ok(vec![]),
			Value::Array(list) => list.iter().map(MosaicAttachment::from_dto).collect(),
			other => Err(model::Error::invalid(
				"mosaics",
				format!("not a list: {}", other),
			)),
		}
	}

	/// DTO list of attachments
	pub fn list_to_value(list: &[MosaicAttachment]) -> Value {
		Value::Array(list.iter().map(Entity::to_dto).collect())
	}
}

impl Entity for MosaicAttachment {
	fn schema() -> &'static Schema {
		&MOSAIC_ATTACHMENT_SCHEMA
	}

	fn from_model(model: &Model) -> Result<MosaicAttachment, model::Error> {
		Ok(MosaicAttachment {
			mosaic_id: model.related("mosaicId")?,
			quantity: model.u64_attribute("quantity")?,
		})
	}

	fn to_model(&self) -> Model {
		Model::new(&MOSAIC_ATTACHMENT_SCHEMA)
			.with("mosaicId", self.mosaic_id.to_dto())
			.with("quantity", self.quantity)
	}
}

impl Writeable for MosaicAttachment {
	fn write<W: Writer>(&self, writer: &mut W) -> Result<(), ser::Error> {
		writer.write_sized(&self.mosaic_id)?;
		writer.write_u64(self.quantity)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ser::{ser_vec, SerializationMode};

	fn creator() -> PublicKey {
		PublicKey([7; 32])
	}

	#[test]
	fn fqn_parsing() {
		let id = MosaicId::parse("nem.sub:coin").unwrap();
		assert_eq!(id.namespace_id, "nem.sub");
		assert_eq!(id.name, "coin");
		assert_eq!(id.to_string(), "nem.sub:coin");
		assert!(MosaicId::parse("coin").is_err());
		assert!(MosaicId::parse(":coin").is_err());
		assert!(MosaicId::parse("nem:").is_err());
	}

	#[test]
	fn id_layout() {
		let id = MosaicId::new("nem", "xem");
		let bytes = ser_vec(&id, SerializationMode::Full).unwrap();
		assert_eq!(
			bytes,
			vec![3, 0, 0, 0, b'n', b'e', b'm', 3, 0, 0, 0, b'x', b'e', b'm']
		);
	}

	#[test]
	fn properties_from_nis_list() {
		let props = MosaicProperties::from_value(&json!([
			{"name": "divisibility", "value": "3"},
			{"name": "initialSupply", "value": "290888"},
			{"name": "supplyMutable", "value": "false"},
			{"name": "transferable", "value": "true"}
		]))
		.unwrap();
		assert_eq!(props.divisibility, 3);
		assert_eq!(props.initial_supply, 290_888);
		assert!(!props.supply_mutable);
		assert_eq!(MosaicProperties::from_value(&props.to_value()).unwrap(), props);
		assert!(MosaicProperties::from_value(&json!({"divisibility": 7})).is_err());
	}

	#[test]
	fn definition_dto_order_and_appends() {
		let def = MosaicDefinition::new(
			creator(),
			MosaicId::new("dim", "coin"),
			"DIM COIN",
			MosaicProperties::default(),
		);
		let dto = def.to_dto();
		let keys: Vec<&String> = dto.as_object().unwrap().keys().collect();
		assert_eq!(keys, vec!["creator", "id", "description", "properties", "levy"]);
		assert_eq!(dto["levy"], json!({}));

		let model = Model::from_value(MosaicDefinition::schema(), &dto).unwrap();
		assert_eq!(model.get("name"), Some(&json!("coin")));
		assert_eq!(MosaicDefinition::from_model(&model).unwrap(), def);
	}

	#[test]
	fn definition_with_levy_round_trips_through_dto() {
		let levy = MosaicLevy {
			levy_type: LevyType::Absolute,
			recipient: "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC".parse().unwrap(),
			mosaic_id: MosaicId::new("nem", "xem"),
			fee: 10,
		};
		let def = MosaicDefinition::new(
			creator(),
			MosaicId::new("dim", "token"),
			"",
			MosaicProperties::default(),
		)
		.with_levy(levy);
		assert_eq!(MosaicDefinition::from_dto(&def.to_dto()).unwrap(), def);
	}

	#[test]
	fn levy_absent_is_a_zero_length() {
		let def = MosaicDefinition::new(
			creator(),
			MosaicId::new("a", "b"),
			"c",
			MosaicProperties::default(),
		);
		let bytes = ser_vec(&def, SerializationMode::Full).unwrap();
		assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
		// creator, id, description, 4 properties, levy
		let props: usize = [("divisibility", "0"), ("initialSupply", "1000"), ("supplyMutable", "true"), ("transferable", "true")]
			.iter()
			.map(|(n, v)| 4 + 4 + n.len() + 4 + v.len())
			.sum();
		assert_eq!(bytes.len(), (4 + 32) + (4 + 4 + 1 + 4 + 1) + (4 + 1) + 4 + props + 4);
	}

	#[test]
	fn attachments_from_strings_and_numbers() {
		let list = MosaicAttachment::list_from_value(&json!([
			{"mosaicId": {"namespaceId": "nem", "name": "xem"}, "quantity": "1000000"},
			{"mosaicId": {"namespaceId": "dim", "name": "coin"}, "quantity": 5}
		]))
		.unwrap();
		assert_eq!(list[0], MosaicAttachment::new(MosaicId::new("nem", "xem"), 1_000_000));
		assert_eq!(list[1].quantity, 5);
		assert_eq!(MosaicAttachment::list_from_value(&Value::Null).unwrap(), vec![]);
		assert_eq!(
			MosaicAttachment::list_to_value(&list)[1],
			json!({"mosaicId": {"namespaceId": "dim", "name": "coin"}, "quantity": 5})
		);
	}
}
