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

//! Ordered attribute container backing every DTO the node speaks. A model
//! keeps raw JSON values in insertion order (NIS documents its structures
//! field by field and golden files compare in that order), resolves dot
//! paths into nested objects, coerces declared fields and builds typed
//! sub-objects for declared relations.
//!
//! Typed structures (mosaics, transactions) implement `Entity` to move
//! between their fields and a model.

use std::convert::TryFrom;

use serde_json::{Map, Number, Value};

use crate::core::{
	Address, Amount, Hash, Message, MosaicAttachment, MosaicDefinition, MosaicId, MosaicLevy,
	MosaicProperties, PublicKey,
};

/// Errors raised while reading or writing model attributes
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// A relation was requested for which no accessor exists
	#[error("no accessor for relation '{0}'")]
	MissingRelationAccessor(String),
	/// Strict read of an attribute that isn't set
	#[error("missing attribute '{0}'")]
	MissingAttribute(String),
	/// Attribute present but unusable
	#[error("invalid attribute '{name}': {reason}")]
	InvalidAttribute {
		/// Attribute (or type) name
		name: String,
		/// What is wrong with it
		reason: String,
	},
}

impl Error {
	/// Shorthand for an `InvalidAttribute` error
	pub fn invalid<S: Into<String>>(name: &str, reason: S) -> Error {
		Error::InvalidAttribute {
			name: name.to_owned(),
			reason: reason.into(),
		}
	}
}

/// Coercion applied to a field whenever it is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cast {
	/// Whole number, numeric strings are parsed, floats truncated
	Int,
	/// String, numbers and booleans are formatted
	Str,
	/// Boolean, "true"/"false" and 0/1 accepted
	Bool,
}

/// Static description of a model.
#[derive(Debug)]
pub struct Schema {
	/// Own attributes, in DTO order. Empty means every attribute is own.
	pub fields: &'static [&'static str],
	/// Virtual top level names resolving to a dot path.
	pub appends: &'static [(&'static str, &'static str)],
	/// Coercions per field.
	pub casts: &'static [(&'static str, Cast)],
	/// Fields read through a typed accessor.
	pub relations: &'static [&'static str],
}

/// Schema without any declaration, a plain ordered map.
pub static EMPTY_SCHEMA: Schema = Schema {
	fields: &[],
	appends: &[],
	casts: &[],
	relations: &[],
};

impl Schema {
	fn cast_for(&self, key: &str) -> Option<Cast> {
		self.casts.iter().find(|(k, _)| *k == key).map(|(_, c)| *c)
	}

	fn append_path(&self, key: &str) -> Option<&'static str> {
		self.appends.iter().find(|(k, _)| *k == key).map(|(_, p)| *p)
	}

	fn is_own(&self, key: &str) -> bool {
		self.fields.is_empty() || self.fields.contains(&key)
	}

	/// Whether `name` is declared as a relation
	pub fn has_relation(&self, name: &str) -> bool {
		self.relations.contains(&name)
	}
}

/// Closed set of typed accessors a relation can resolve through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationKind {
	/// Micro XEM amount
	Amount,
	/// Account address
	Address,
	/// Account public key
	PublicKey,
	/// Transaction hash
	Hash,
	/// Transfer message
	Message,
	/// Mosaic identifier
	MosaicId,
	/// Mosaic properties
	MosaicProperties,
	/// Mosaic levy
	MosaicLevy,
	/// Mosaic definition
	MosaicDefinition,
	/// Attached mosaics
	Mosaics,
}

impl RelationKind {
	/// Accessor for a field name, if one exists.
	pub fn for_field(name: &str) -> Option<RelationKind> {
		match name {
			"amount" | "fee" | "rentalFee" | "creationFee" => Some(RelationKind::Amount),
			"recipient" | "otherAccount" | "rentalFeeSink" | "creationFeeSink" => {
				Some(RelationKind::Address)
			}
			"signer" | "creator" | "remoteAccount" | "cosignatoryAccount" => {
				Some(RelationKind::PublicKey)
			}
			"otherHash" | "innerHash" => Some(RelationKind::Hash),
			"message" => Some(RelationKind::Message),
			"id" | "mosaicId" => Some(RelationKind::MosaicId),
			"properties" => Some(RelationKind::MosaicProperties),
			"levy" => Some(RelationKind::MosaicLevy),
			"mosaicDefinition" => Some(RelationKind::MosaicDefinition),
			"mosaics" => Some(RelationKind::Mosaics),
			_ => None,
		}
	}

	fn build(self, raw: &Value) -> Result<Related, Error> {
		match self {
			RelationKind::Amount => Amount::from_value(raw).map(Related::Amount),
			RelationKind::Address => Address::from_value(raw).map(Related::Address),
			RelationKind::PublicKey => PublicKey::from_value(raw).map(Related::PublicKey),
			RelationKind::Hash => Hash::from_value(raw).map(Related::Hash),
			RelationKind::Message => Message::from_value(raw).map(Related::Message),
			RelationKind::MosaicId => MosaicId::from_dto(raw).map(Related::MosaicId),
			RelationKind::MosaicProperties => {
				MosaicProperties::from_value(raw).map(Related::MosaicProperties)
			}
			RelationKind::MosaicLevy => MosaicLevy::from_value(raw).map(Related::MosaicLevy),
			RelationKind::MosaicDefinition => {
				MosaicDefinition::from_dto(raw).map(Related::MosaicDefinition)
			}
			RelationKind::Mosaics => MosaicAttachment::list_from_value(raw).map(Related::Mosaics),
		}
	}
}

/// Typed value built by a relation accessor. Always derived from the raw
/// attribute on read, never stored back.
#[derive(Clone, Debug, PartialEq)]
pub enum Related {
	/// See `RelationKind::Amount`
	Amount(Amount),
	/// See `RelationKind::Address`
	Address(Address),
	/// See `RelationKind::PublicKey`
	PublicKey(PublicKey),
	/// See `RelationKind::Hash`
	Hash(Hash),
	/// See `RelationKind::Message`, absent or `{}` is `None`
	Message(Option<Message>),
	/// See `RelationKind::MosaicId`
	MosaicId(MosaicId),
	/// See `RelationKind::MosaicProperties`
	MosaicProperties(MosaicProperties),
	/// See `RelationKind::MosaicLevy`, absent or `{}` is `None`
	MosaicLevy(Option<MosaicLevy>),
	/// See `RelationKind::MosaicDefinition`
	MosaicDefinition(MosaicDefinition),
	/// See `RelationKind::Mosaics`
	Mosaics(Vec<MosaicAttachment>),
}

impl Related {
	/// Name of the variant, for error messages
	pub fn kind_name(&self) -> &'static str {
		match self {
			Related::Amount(_) => "Amount",
			Related::Address(_) => "Address",
			Related::PublicKey(_) => "PublicKey",
			Related::Hash(_) => "Hash",
			Related::Message(_) => "Message",
			Related::MosaicId(_) => "MosaicId",
			Related::MosaicProperties(_) => "MosaicProperties",
			Related::MosaicLevy(_) => "MosaicLevy",
			Related::MosaicDefinition(_) => "MosaicDefinition",
			Related::Mosaics(_) => "Mosaics",
		}
	}
}

impl_related!(Amount, Amount);
impl_related!(Address, Address);
impl_related!(PublicKey, PublicKey);
impl_related!(Hash, Hash);
impl_related!(Message, Option<Message>);
impl_related!(MosaicId, MosaicId);
impl_related!(MosaicProperties, MosaicProperties);
impl_related!(MosaicLevy, Option<MosaicLevy>);
impl_related!(MosaicDefinition, MosaicDefinition);
impl_related!(Mosaics, Vec<MosaicAttachment>);

/// Result of reading a field: relations come back typed, anything else raw.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute<'a> {
	/// Raw value, `None` when not set
	Raw(Option<&'a Value>),
	/// Value built by the relation accessor
	Related(Related),
}

/// Ordered attribute container.
#[derive(Clone, Debug)]
pub struct Model {
	schema: &'static Schema,
	attributes: Map<String, Value>,
}

impl PartialEq for Model {
	fn eq(&self, other: &Model) -> bool {
		self.attributes == other.attributes
	}
}

impl Model {
	/// Empty model following `schema`
	pub fn new(schema: &'static Schema) -> Model {
		Model {
			schema,
			attributes: Map::new(),
		}
	}

	/// Model from an attribute map. Declared fields come first, in declared
	/// order, any other attribute keeps the order it had in `map`.
	pub fn from_map(schema: &'static Schema, mut map: Map<String, Value>) -> Result<Model, Error> {
		let mut model = Model::new(schema);
		for field in schema.fields {
			if let Some(value) = map.remove(*field) {
				model.set_attribute(field, value)?;
			}
		}
		for (key, value) in map {
			model.set_attribute(&key, value)?;
		}
		Ok(model)
	}

	/// Model from a JSON object.
	pub fn from_value(schema: &'static Schema, value: &Value) -> Result<Model, Error> {
		match value {
			Value::Object(map) => Model::from_map(schema, map.clone()),
			other => Err(Error::invalid("model", format!("expected an object, got {}", other))),
		}
	}

	/// The schema this model follows
	pub fn schema(&self) -> &'static Schema {
		self.schema
	}

	/// Raw attributes, insertion ordered
	pub fn attributes(&self) -> &Map<String, Value> {
		&self.attributes
	}

	/// Builder flavour of `set_attribute` for values already in their final
	/// shape, no cast applied.
	pub fn with<V: Into<Value>>(mut self, key: &str, value: V) -> Model {
		self.attributes.insert(key.to_owned(), value.into());
		self
	}

	/// Walks a dot path (`"id.namespaceId"`), appends resolved first. Any
	/// missing segment yields `None`.
	pub fn get(&self, path: &str) -> Option<&Value> {
		let path = self.schema.append_path(path).unwrap_or(path);
		let mut segments = path.split('.');
		let first = segments.next()?;
		let mut current = self.attributes.get(first)?;
		for segment in segments {
			current = match current {
				Value::Object(map) => map.get(segment)?,
				Value::Array(list) => list.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// Same as `get`, strict mode turning a missing or null value into an
	/// error.
	pub fn get_attribute(&self, path: &str, strict: bool) -> Result<Option<&Value>, Error> {
		match self.get(path) {
			Some(Value::Null) | None if strict => Err(Error::MissingAttribute(path.to_owned())),
			found => Ok(found),
		}
	}

	/// Reads a field, going through its relation accessor when it is
	/// declared as one.
	pub fn read(&self, name: &str) -> Result<Attribute<'_>, Error> {
		if self.schema.has_relation(name) {
			self.relation(name).map(Attribute::Related)
		} else {
			Ok(Attribute::Raw(self.get(name)))
		}
	}

	/// Sets an attribute, applying the field cast. Dot paths create the
	/// intermediate objects they need. An existing key keeps its position.
	pub fn set_attribute(&mut self, path: &str, value: Value) -> Result<(), Error> {
		let value = match self.schema.cast_for(path) {
			Some(cast) => apply_cast(path, cast, value)?,
			None => value,
		};
		let mut segments: Vec<&str> = path.split('.').collect();
		let last = segments.pop().unwrap_or(path);
		let mut current = &mut self.attributes;
		for segment in segments {
			let entry = current
				.entry(segment.to_owned())
				.or_insert_with(|| Value::Object(Map::new()));
			current = match entry {
				Value::Object(map) => map,
				_ => return Err(Error::invalid(path, format!("'{}' is not an object", segment))),
			};
		}
		current.insert(last.to_owned(), value);
		Ok(())
	}

	/// Removes an attribute, returning it.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.attributes.remove(key)
	}

	/// Typed value of a declared relation, rebuilt from the raw data on each
	/// call.
	pub fn relation(&self, name: &str) -> Result<Related, Error> {
		if !self.schema.has_relation(name) {
			return Err(Error::MissingRelationAccessor(name.to_owned()));
		}
		let kind = RelationKind::for_field(name)
			.ok_or_else(|| Error::MissingRelationAccessor(name.to_owned()))?;
		kind.build(self.get(name).unwrap_or(&Value::Null))
			.map_err(|e| match e {
				Error::InvalidAttribute { reason, .. } => Error::invalid(name, reason),
				other => other,
			})
	}

	/// `relation` converted to the type the caller expects.
	pub fn related<T>(&self, name: &str) -> Result<T, Error>
	where
		T: TryFrom<Related, Error = Error>,
	{
		T::try_from(self.relation(name)?)
	}

	/// Strict string attribute
	pub fn str_attribute(&self, path: &str) -> Result<&str, Error> {
		match self.get_attribute(path, true)? {
			Some(Value::String(s)) => Ok(s),
			other => Err(Error::invalid(path, format!("expected a string, got {:?}", other))),
		}
	}

	/// Optional string attribute, null counts as absent
	pub fn opt_str_attribute(&self, path: &str) -> Result<Option<&str>, Error> {
		match self.get(path) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(s)) => Ok(Some(s)),
			Some(other) => Err(Error::invalid(path, format!("expected a string, got {}", other))),
		}
	}

	/// Strict signed integer attribute, numeric strings accepted
	pub fn i64_attribute(&self, path: &str) -> Result<i64, Error> {
		let value = self.get_attribute(path, true)?.unwrap_or(&Value::Null);
		as_i64(value).ok_or_else(|| Error::invalid(path, format!("expected an integer, got {}", value)))
	}

	/// Strict unsigned integer attribute, numeric strings accepted
	pub fn u64_attribute(&self, path: &str) -> Result<u64, Error> {
		let value = self.get_attribute(path, true)?.unwrap_or(&Value::Null);
		as_u64(value).ok_or_else(|| {
			Error::invalid(path, format!("expected a non-negative integer, got {}", value))
		})
	}

	/// Optional unsigned integer attribute, null counts as absent
	pub fn opt_u64_attribute(&self, path: &str) -> Result<Option<u64>, Error> {
		match self.get(path) {
			None | Some(Value::Null) => Ok(None),
			Some(_) => self.u64_attribute(path).map(Some),
		}
	}

	/// Strict boolean attribute
	pub fn bool_attribute(&self, path: &str) -> Result<bool, Error> {
		let value = self.get_attribute(path, true)?.unwrap_or(&Value::Null);
		as_bool(value).ok_or_else(|| Error::invalid(path, format!("expected a boolean, got {}", value)))
	}

	/// Own attributes in insertion order, or the single value at `filter`
	/// (null when absent).
	pub fn to_dto(&self, filter: Option<&str>) -> Value {
		if let Some(path) = filter {
			return self.get(path).cloned().unwrap_or(Value::Null);
		}
		let own = self
			.attributes
			.iter()
			.filter(|(k, _)| self.schema.is_own(k))
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect::<Map<String, Value>>();
		Value::Object(own)
	}
}

/// Structures that live as a model on the DTO side.
pub trait Entity: Sized {
	/// Schema of the DTO shape
	fn schema() -> &'static Schema;

	/// Reads the structure back from a model
	fn from_model(model: &Model) -> Result<Self, Error>;

	/// Model holding the structure, fields in DTO order
	fn to_model(&self) -> Model;

	/// Reads the structure from its JSON representation
	fn from_dto(value: &Value) -> Result<Self, Error> {
		Self::from_model(&Model::from_value(Self::schema(), value)?)
	}

	/// JSON representation, in DTO order
	fn to_dto(&self) -> Value {
		self.to_model().to_dto(None)
	}
}

/// Integer view of a JSON value, numeric strings included
pub fn as_i64(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
		Value::String(s) => s.trim().parse::<i64>().ok(),
		_ => None,
	}
}

/// Unsigned integer view of a JSON value, numeric strings included
pub fn as_u64(value: &Value) -> Option<u64> {
	match value {
		Value::Number(n) => n.as_u64().or_else(|| {
			n.as_f64()
				.filter(|f| *f >= 0.0 && *f < u64::max_value() as f64)
				.map(|f| f.trunc() as u64)
		}),
		Value::String(s) => s.trim().parse::<u64>().ok(),
		_ => None,
	}
}

/// Boolean view of a JSON value, "true"/"false" and 0/1 included
pub fn as_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(b) => Some(*b),
		Value::String(s) => match s.trim() {
			"true" | "1" => Some(true),
			"false" | "0" => Some(false),
			_ => None,
		},
		Value::Number(n) => match n.as_u64() {
			Some(0) => Some(false),
			Some(1) => Some(true),
			_ => None,
		},
		_ => None,
	}
}

fn apply_cast(name: &str, cast: Cast, value: Value) -> Result<Value, Error> {
	if value.is_null() {
		return Ok(value);
	}
	match cast {
		Cast::Int => {
			if let Some(n) = as_u64(&value) {
				Ok(Value::Number(Number::from(n)))
			} else if let Some(n) = as_i64(&value) {
				Ok(Value::Number(Number::from(n)))
			} else {
				Err(Error::invalid(name, format!("cannot cast {} to an integer", value)))
			}
		}
		Cast::Str => match value {
			Value::String(_) => Ok(value),
			Value::Number(n) => Ok(Value::String(n.to_string())),
			Value::Bool(b) => Ok(Value::String(b.to_string())),
			other => Err(Error::invalid(name, format!("cannot cast {} to a string", other))),
		},
		Cast::Bool => as_bool(&value)
			.map(Value::Bool)
			.ok_or_else(|| Error::invalid(name, format!("cannot cast {} to a boolean", value))),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	static ATTACHMENT_LIKE: Schema = Schema {
		fields: &["mosaicId", "quantity"],
		appends: &[("namespaceId", "mosaicId.namespaceId"), ("name", "mosaicId.name")],
		casts: &[("quantity", Cast::Int)],
		relations: &["mosaicId"],
	};

	static BROKEN: Schema = Schema {
		fields: &["color"],
		appends: &[],
		casts: &[],
		relations: &["color"],
	};

	#[test]
	fn insertion_order_survives_mutation() {
		let mut model = Model::new(&EMPTY_SCHEMA);
		model.set_attribute("a", json!(1)).unwrap();
		model.set_attribute("b", json!(2)).unwrap();
		model.set_attribute("c", json!(3)).unwrap();
		model.set_attribute("b", json!(20)).unwrap();
		model.set_attribute("a", json!(10)).unwrap();
		let keys: Vec<String> = match model.to_dto(None) {
			Value::Object(map) => map.keys().cloned().collect(),
			_ => panic!("not an object"),
		};
		assert_eq!(keys, vec!["a", "b", "c"]);
		assert_eq!(model.get("b"), Some(&json!(20)));
	}

	#[test]
	fn declared_fields_come_first() {
		let model = Model::from_value(
			&ATTACHMENT_LIKE,
			&json!({"extra": true, "quantity": "12", "mosaicId": {"namespaceId": "nem", "name": "xem"}}),
		)
		.unwrap();
		let keys: Vec<&String> = model.attributes().keys().collect();
		assert_eq!(keys, vec!["mosaicId", "quantity", "extra"]);
		// extra isn't declared, it stays out of the DTO
		assert_eq!(
			model.to_dto(None),
			json!({"mosaicId": {"namespaceId": "nem", "name": "xem"}, "quantity": 12})
		);
	}

	#[test]
	fn dot_paths_and_appends() {
		let model = Model::from_value(
			&ATTACHMENT_LIKE,
			&json!({"mosaicId": {"namespaceId": "nem", "name": "xem"}, "quantity": 1}),
		)
		.unwrap();
		assert_eq!(model.get("mosaicId.name"), Some(&json!("xem")));
		assert_eq!(model.get("namespaceId"), Some(&json!("nem")));
		assert_eq!(model.get("mosaicId.missing.deeper"), None);
		assert_eq!(model.get_attribute("nothing", false), Ok(None));
		assert_eq!(
			model.get_attribute("nothing", true),
			Err(Error::MissingAttribute("nothing".to_owned()))
		);
		assert_eq!(model.to_dto(Some("mosaicId.namespaceId")), json!("nem"));
		assert_eq!(model.to_dto(Some("nope")), Value::Null);
	}

	#[test]
	fn dot_path_writes_create_objects() {
		let mut model = Model::new(&EMPTY_SCHEMA);
		model.set_attribute("id.namespaceId", json!("dim")).unwrap();
		model.set_attribute("id.name", json!("coin")).unwrap();
		assert_eq!(model.to_dto(None), json!({"id": {"namespaceId": "dim", "name": "coin"}}));
		model.set_attribute("flat", json!(1)).unwrap();
		assert!(model.set_attribute("flat.deeper", json!(1)).is_err());
	}

	#[test]
	fn casts_apply_on_write() {
		let mut model = Model::new(&ATTACHMENT_LIKE);
		model.set_attribute("quantity", json!("42")).unwrap();
		assert_eq!(model.get("quantity"), Some(&json!(42)));
		model.set_attribute("quantity", json!(4.9)).unwrap();
		assert_eq!(model.get("quantity"), Some(&json!(4)));
		assert!(model.set_attribute("quantity", json!("many")).is_err());
	}

	#[test]
	fn relations_build_typed_values() {
		let model = Model::from_value(
			&ATTACHMENT_LIKE,
			&json!({"mosaicId": {"namespaceId": "dim", "name": "coin"}, "quantity": 1}),
		)
		.unwrap();
		let id: MosaicId = model.related("mosaicId").unwrap();
		assert_eq!(id.fqn(), "dim:coin");
		match model.read("mosaicId").unwrap() {
			Attribute::Related(Related::MosaicId(id)) => assert_eq!(id.name, "coin"),
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!(model.read("quantity").unwrap(), Attribute::Raw(Some(&json!(1))));
		assert_eq!(
			model.relation("quantity"),
			Err(Error::MissingRelationAccessor("quantity".to_owned()))
		);
	}

	#[test]
	fn undeclared_accessor_is_an_error() {
		let model = Model::from_value(&BROKEN, &json!({"color": "red"})).unwrap();
		assert_eq!(
			model.read("color"),
			Err(Error::MissingRelationAccessor("color".to_owned()))
		);
	}
}
