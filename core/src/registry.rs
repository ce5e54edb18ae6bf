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

//! Mosaic definitions known without asking a node. Definitions are keyed by
//! the class path their fully qualified name maps to, so `dim:coin` and
//! `DIM:COIN` land on the same entry. A miss is not fatal, callers fall back
//! to a remote lookup (see `libtx::FallbackResolver`).

use std::collections::HashMap;

use crate::core::{
	Address, LevyType, MosaicAttachment, MosaicDefinition, MosaicId, MosaicLevy,
	MosaicProperties, PublicKey,
};

/// Registry errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// No definition registered under that name
	#[error("mosaic {0} is not registered")]
	RegistryMiss(String),
	/// A remote lookup was attempted and failed
	#[error("mosaic lookup for {fqn} failed: {reason}")]
	Lookup {
		/// Mosaic looked up
		fqn: String,
		/// Why it failed
		reason: String,
	},
}

/// Maps a fully qualified mosaic name to its class path, `"dim:coin"`
/// giving `"Mosaics::Dim::Coin"`. Namespace levels and the mosaic name each
/// make one segment, non alphanumeric characters become `_`. Names without
/// a namespace, or with an empty level, have no class.
pub fn morph_class(fqn: &str) -> Option<String> {
	if !fqn.contains(':') {
		return None;
	}
	let mut path = String::from("Mosaics");
	for segment in fqn.split(|c| c == '.' || c == ':') {
		if segment.is_empty() {
			return None;
		}
		path.push_str("::");
		for (i, c) in segment.chars().enumerate() {
			let c = if c.is_ascii_alphanumeric() { c } else { '_' };
			if i == 0 {
				path.push(c.to_ascii_uppercase());
			} else {
				path.push(c.to_ascii_lowercase());
			}
		}
	}
	Some(path)
}

/// Anything a mosaic can be looked up by.
#[derive(Clone, Copy, Debug)]
pub enum MosaicRef<'a> {
	/// By identifier
	Id(&'a MosaicId),
	/// By the mosaic an attachment carries
	Attachment(&'a MosaicAttachment),
	/// By fully qualified name
	Name(&'a str),
}

impl<'a> MosaicRef<'a> {
	/// Fully qualified name referenced
	pub fn fqn(&self) -> String {
		match self {
			MosaicRef::Id(id) => id.fqn(),
			MosaicRef::Attachment(a) => a.mosaic_id.fqn(),
			MosaicRef::Name(name) => name.trim().to_owned(),
		}
	}
}

impl<'a> From<&'a MosaicId> for MosaicRef<'a> {
	fn from(id: &'a MosaicId) -> MosaicRef<'a> {
		MosaicRef::Id(id)
	}
}

impl<'a> From<&'a MosaicAttachment> for MosaicRef<'a> {
	fn from(a: &'a MosaicAttachment) -> MosaicRef<'a> {
		MosaicRef::Attachment(a)
	}
}

impl<'a> From<&'a str> for MosaicRef<'a> {
	fn from(name: &'a str) -> MosaicRef<'a> {
		MosaicRef::Name(name)
	}
}

/// Resolves mosaic definitions, needed to price mosaic transfers.
pub trait MosaicResolver {
	/// Definition of `id`, `Error::RegistryMiss` when unknown
	fn resolve(&self, id: &MosaicId) -> Result<MosaicDefinition, Error>;
}

impl<'a, R: MosaicResolver + ?Sized> MosaicResolver for &'a R {
	fn resolve(&self, id: &MosaicId) -> Result<MosaicDefinition, Error> {
		(**self).resolve(id)
	}
}

lazy_static! {
	/// Definitions every registry starts with
	static ref BUILTIN: MosaicRegistry = MosaicRegistry::empty()
		.with_definition(nem_xem())
		.with_definition(dim_coin())
		.with_definition(dim_token());
}

const DIM_CREATOR: &str = "a1df5306355766bd2f9a64efdc089eb294be265987b3359093ae474c051d7d5a";

/// The native currency, as NIS describes it
pub fn nem_xem() -> MosaicDefinition {
	// constant keys and addresses, checked by builtin_lookups
	MosaicDefinition::new(
		PublicKey::from_hex("3e82e1c1e4a75adaa3cba8c101c3cd31d9817a2eb966eb3b511fb2ed45b8e262")
			.unwrap(),
		MosaicId::new("nem", "xem"),
		"reserved xem mosaic",
		MosaicProperties {
			divisibility: 6,
			initial_supply: 8_999_999_999,
			supply_mutable: false,
			transferable: true,
		},
	)
}

/// DIM coin, carries a percentile levy paid in itself
pub fn dim_coin() -> MosaicDefinition {
	// constant, checked by builtin_lookups
	MosaicDefinition::new(
		PublicKey::from_hex(DIM_CREATOR).unwrap(),
		MosaicId::new("dim", "coin"),
		"DIM COIN",
		MosaicProperties {
			divisibility: 6,
			initial_supply: 9_000_000_000,
			supply_mutable: false,
			transferable: true,
		},
	)
	.with_levy(MosaicLevy {
		levy_type: LevyType::Percentile,
		recipient: "NCGGLVO2G3CUACVI5GNX2KRBJSQCN4RDL2ZWJ4DP"
			.parse::<Address>()
			.unwrap(),
		mosaic_id: MosaicId::new("dim", "coin"),
		fee: 10,
	})
}

/// DIM token
pub fn dim_token() -> MosaicDefinition {
	MosaicDefinition::new(
		PublicKey::from_hex(DIM_CREATOR).unwrap(),
		MosaicId::new("dim", "token"),
		"DIM TOKEN",
		MosaicProperties {
			divisibility: 6,
			initial_supply: 10_000_000,
			supply_mutable: false,
			transferable: true,
		},
	)
}

/// Read-only set of mosaic definitions, built once then shared.
#[derive(Clone, Debug, Default)]
pub struct MosaicRegistry {
	definitions: HashMap<String, MosaicDefinition>,
}

impl MosaicRegistry {
	/// Registry without any definition
	pub fn empty() -> MosaicRegistry {
		MosaicRegistry {
			definitions: HashMap::new(),
		}
	}

	/// Process wide registry of the built-in definitions
	pub fn builtin() -> &'static MosaicRegistry {
		&BUILTIN
	}

	/// Same registry with one more definition, replacing any registered
	/// under the same class.
	pub fn with_definition(mut self, definition: MosaicDefinition) -> MosaicRegistry {
		let fqn = definition.id.fqn();
		match morph_class(&fqn) {
			Some(class) => {
				if self.definitions.insert(class, definition).is_some() {
					debug!("mosaic registry: replaced definition of {}", fqn);
				}
			}
			None => warn!("mosaic registry: {} has no class, skipped", fqn),
		}
		self
	}

	/// Definition registered for a mosaic reference
	pub fn get_definition<'a, R>(&self, reference: R) -> Result<&MosaicDefinition, Error>
	where
		R: Into<MosaicRef<'a>>,
	{
		let fqn = reference.into().fqn();
		morph_class(&fqn)
			.and_then(|class| self.definitions.get(&class))
			.ok_or(Error::RegistryMiss(fqn))
	}

	/// Number of definitions
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Whether no definition is registered
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Registered definitions, in no particular order
	pub fn definitions(&self) -> impl Iterator<Item = &MosaicDefinition> {
		self.definitions.values()
	}
}

impl MosaicResolver for MosaicRegistry {
	fn resolve(&self, id: &MosaicId) -> Result<MosaicDefinition, Error> {
		self.get_definition(id).map(Clone::clone)
	}
}
