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

//! Namespace rental.

use serde_json::{Map, Value};

use super::{fragment, pinned, Error, Extension, TransactionType};
use crate::consensus::{NAMESPACE_PROVISION_FEE, ROOT_NAMESPACE_RENTAL_FEE, SUB_NAMESPACE_RENTAL_FEE};
use crate::core::{Address, Amount, Network, Version};
use crate::fee;
use crate::model::Model;
use crate::registry::MosaicResolver;
use crate::ser::{Writeable, Writer};

/// Provision of a root namespace, or of a level below `parent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceProvision {
	/// Account collecting the rental
	pub rental_fee_sink: Address,
	/// Rental in micro XEM
	pub rental_fee: u64,
	/// Name of the new level
	pub new_part: String,
	/// Namespace the level goes under, none for a root namespace
	pub parent: Option<String>,
}

/// Rental due for a namespace, lower below a parent.
pub fn rental_fee(parent: Option<&str>) -> u64 {
	match parent {
		Some(_) => SUB_NAMESPACE_RENTAL_FEE,
		None => ROOT_NAMESPACE_RENTAL_FEE,
	}
}

impl NamespaceProvision {
	/// Provision on `network`, sink and rental set accordingly
	pub fn new(network: Network, new_part: &str, parent: Option<&str>) -> NamespaceProvision {
		NamespaceProvision {
			rental_fee_sink: network.namespace_sink(),
			rental_fee: rental_fee(parent),
			new_part: new_part.to_owned(),
			parent: parent.map(str::to_owned),
		}
	}

	/// Reads a provision. Without a rental fee the rate for the namespace
	/// level applies.
	pub fn from_model(model: &Model) -> Result<NamespaceProvision, Error> {
		let parent = model.opt_str_attribute("parent")?.map(str::to_owned);
		let rental_fee = match model.get("rentalFee") {
			None | Some(Value::Null) => rental_fee(parent.as_ref().map(String::as_str)),
			Some(_) => model.related::<Amount>("rentalFee")?.micro(),
		};
		Ok(NamespaceProvision {
			rental_fee_sink: model.related("rentalFeeSink")?,
			rental_fee,
			new_part: model.str_attribute("newPart")?.to_owned(),
			parent,
		})
	}

	/// Fully qualified name of the namespace provisioned
	pub fn fqn(&self) -> String {
		match self.parent {
			Some(ref parent) => format!("{}.{}", parent, self.new_part),
			None => self.new_part.clone(),
		}
	}
}

impl Extension for NamespaceProvision {
	fn tx_type(&self) -> TransactionType {
		TransactionType::ProvisionNamespace
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert(
			"rentalFeeSink".to_owned(),
			Value::from(self.rental_fee_sink.as_str()),
		);
		map.insert("rentalFee".to_owned(), Value::from(self.rental_fee));
		map.insert("newPart".to_owned(), Value::from(self.new_part.as_str()));
		let parent = match self.parent {
			Some(ref p) => Value::from(p.as_str()),
			None => Value::Null,
		};
		map.insert("parent".to_owned(), parent);
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(NAMESPACE_PROVISION_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	/// A root namespace has no parent, written as the null sentinel.
	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		self.rental_fee_sink.write(writer)?;
		writer.write_u64(self.rental_fee)?;
		writer.write_str(&self.new_part)?;
		writer.write_optional_bytes(self.parent.as_ref().map(String::as_bytes))?;
		Ok(())
	}
}
