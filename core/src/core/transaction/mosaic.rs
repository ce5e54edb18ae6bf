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

//! Mosaic creation and supply changes.

use serde_json::{Map, Value};

use super::{fragment, pinned, Error, Extension, TransactionType};
use crate::consensus::{MOSAIC_CREATION_FEE, MOSAIC_DEFINITION_CREATION_FEE, MOSAIC_SUPPLY_CHANGE_FEE};
use crate::core::{Address, Amount, MosaicDefinition, MosaicId, Network, Version};
use crate::fee;
use crate::model::{self, Entity, Model};
use crate::registry::MosaicResolver;
use crate::ser::{Writeable, Writer};

/// Creation (or redefinition) of a mosaic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicDefinitionCreation {
	/// Mosaic defined
	pub definition: MosaicDefinition,
	/// Account collecting the creation fee
	pub creation_fee_sink: Address,
	/// Creation fee in micro XEM
	pub creation_fee: u64,
}

impl MosaicDefinitionCreation {
	/// Creation on `network`, sink and fee set accordingly
	pub fn new(network: Network, definition: MosaicDefinition) -> MosaicDefinitionCreation {
		MosaicDefinitionCreation {
			definition,
			creation_fee_sink: network.mosaic_sink(),
			creation_fee: MOSAIC_CREATION_FEE,
		}
	}

	/// Reads a mosaic definition creation
	pub fn from_model(model: &Model) -> Result<MosaicDefinitionCreation, Error> {
		let creation_fee = match model.get("creationFee") {
			None | Some(Value::Null) => MOSAIC_CREATION_FEE,
			Some(_) => model.related::<Amount>("creationFee")?.micro(),
		};
		Ok(MosaicDefinitionCreation {
			definition: model.related("mosaicDefinition")?,
			creation_fee_sink: model.related("creationFeeSink")?,
			creation_fee,
		})
	}
}

impl Extension for MosaicDefinitionCreation {
	fn tx_type(&self) -> TransactionType {
		TransactionType::MosaicDefinitionCreation
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert("mosaicDefinition".to_owned(), self.definition.to_dto());
		map.insert(
			"creationFeeSink".to_owned(),
			Value::from(self.creation_fee_sink.as_str()),
		);
		map.insert("creationFee".to_owned(), Value::from(self.creation_fee));
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(MOSAIC_DEFINITION_CREATION_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		writer.write_sized(&self.definition)?;
		self.creation_fee_sink.write(writer)?;
		writer.write_u64(self.creation_fee)?;
		Ok(())
	}
}

/// Direction of a supply change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupplyType {
	/// Mint
	Increase = 1,
	/// Burn
	Decrease = 2,
}

impl Default for SupplyType {
	fn default() -> SupplyType {
		SupplyType::Increase
	}
}

/// Change of the supply of a mutable mosaic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicSupplyChange {
	/// Mosaic changed
	pub mosaic_id: MosaicId,
	/// Mint or burn
	pub supply_type: SupplyType,
	/// Whole units added or removed, never negative
	pub delta: u64,
}

impl MosaicSupplyChange {
	/// Supply change by `delta` whole units, the sign being dropped
	pub fn new(mosaic_id: MosaicId, supply_type: SupplyType, delta: i64) -> MosaicSupplyChange {
		MosaicSupplyChange {
			mosaic_id,
			supply_type,
			delta: (delta as i128).abs() as u64,
		}
	}

	/// Reads a supply change, increasing when no type is given
	pub fn from_model(model: &Model) -> Result<MosaicSupplyChange, Error> {
		let supply_type = match model.get("supplyType") {
			None | Some(Value::Null) => SupplyType::default(),
			Some(_) => match model.i64_attribute("supplyType")? {
				1 => SupplyType::Increase,
				2 => SupplyType::Decrease,
				n => {
					return Err(
						model::Error::invalid("supplyType", format!("unknown type {}", n)).into(),
					)
				}
			},
		};
		let raw = model.get_attribute("delta", true)?.unwrap_or(&Value::Null);
		let delta = match model::as_u64(raw) {
			Some(d) => d,
			None => model::as_i64(raw)
				.map(|d| (d as i128).abs() as u64)
				.ok_or_else(|| model::Error::invalid("delta", format!("not an int: {}", raw)))?,
		};
		Ok(MosaicSupplyChange {
			mosaic_id: model.related("mosaicId")?,
			supply_type,
			delta,
		})
	}
}

impl Extension for MosaicSupplyChange {
	fn tx_type(&self) -> TransactionType {
		TransactionType::MosaicSupplyChange
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert("mosaicId".to_owned(), self.mosaic_id.to_dto());
		map.insert("supplyType".to_owned(), Value::from(self.supply_type as i32));
		map.insert("delta".to_owned(), Value::from(self.delta));
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(MOSAIC_SUPPLY_CHANGE_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		writer.write_sized(&self.mosaic_id)?;
		writer.write_i32(self.supply_type as i32)?;
		writer.write_u64(self.delta)?;
		Ok(())
	}
}
