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

//! Mosaic definitions the local registry doesn't have, fetched from a node.

use serde_json::Value;

use super::{Error, NodeClient, MOSAIC_DEFINITION_PAGE_PATH};
use crate::core::{MosaicDefinition, MosaicId};
use crate::model::Entity;
use crate::registry::{self, MosaicRegistry, MosaicResolver};

/// Remote source of mosaic definitions.
pub trait MosaicLookup {
	/// Definition of `id`, none when the node doesn't know it
	fn fetch_definition(&self, id: &MosaicId) -> Result<Option<MosaicDefinition>, Error>;
}

/// Pages through the definitions of the mosaic's namespace on a node.
pub struct NodeMosaicLookup<C> {
	client: C,
	max_pages: usize,
}

impl<C: NodeClient> NodeMosaicLookup<C> {
	/// Lookup through `client`, reading at most 10 pages
	pub fn new(client: C) -> NodeMosaicLookup<C> {
		NodeMosaicLookup {
			client,
			max_pages: 10,
		}
	}

	/// Same lookup reading at most `max_pages` pages
	pub fn with_max_pages(self, max_pages: usize) -> NodeMosaicLookup<C> {
		NodeMosaicLookup { max_pages, ..self }
	}

	fn page(&self, namespace: &str, id: Option<i64>) -> Result<Vec<Value>, Error> {
		let paging = id.map(|id| id.to_string());
		let mut query = vec![("namespace", namespace)];
		if let Some(ref paging) = paging {
			query.push(("id", paging.as_str()));
		}
		let response = self.client.get(MOSAIC_DEFINITION_PAGE_PATH, &query)?;
		match response.get("data") {
			Some(Value::Array(entries)) => Ok(entries.clone()),
			Some(Value::Null) | None => Ok(vec![]),
			Some(other) => Err(Error::Transport(format!(
				"unexpected definition page: {}",
				other
			))),
		}
	}
}

impl<C: NodeClient> MosaicLookup for NodeMosaicLookup<C> {
	fn fetch_definition(&self, id: &MosaicId) -> Result<Option<MosaicDefinition>, Error> {
		let mut paging = None;
		for _ in 0..self.max_pages {
			let entries = self.page(&id.namespace_id, paging)?;
			if entries.is_empty() {
				break;
			}
			for entry in &entries {
				let mosaic = match entry.get("mosaic") {
					Some(m) => m,
					None => continue,
				};
				let definition = MosaicDefinition::from_dto(mosaic)?;
				if definition.id == *id {
					debug!("fetched definition of {} from node", id);
					return Ok(Some(definition));
				}
			}
			let last = entries
				.last()
				.and_then(|e| e.get("meta"))
				.and_then(|m| m.get("id"))
				.and_then(Value::as_i64);
			match last {
				Some(last) if Some(last) != paging => paging = Some(last),
				_ => break,
			}
		}
		Ok(None)
	}
}

/// Registry first, then the remote lookup for anything it misses.
pub struct FallbackResolver<'a, L> {
	registry: &'a MosaicRegistry,
	lookup: L,
}

impl<'a, L: MosaicLookup> FallbackResolver<'a, L> {
	/// Resolver over `registry`, falling back to `lookup`
	pub fn new(registry: &'a MosaicRegistry, lookup: L) -> FallbackResolver<'a, L> {
		FallbackResolver { registry, lookup }
	}
}

impl<'a, L: MosaicLookup> MosaicResolver for FallbackResolver<'a, L> {
	fn resolve(&self, id: &MosaicId) -> Result<MosaicDefinition, registry::Error> {
		match self.registry.resolve(id) {
			Err(registry::Error::RegistryMiss(fqn)) => match self.lookup.fetch_definition(id) {
				Ok(Some(definition)) => Ok(definition),
				Ok(None) => Err(registry::Error::RegistryMiss(fqn)),
				Err(e) => {
					warn!("mosaic lookup for {} failed: {}", fqn, e);
					Err(registry::Error::Lookup {
						fqn,
						reason: e.to_string(),
					})
				}
			},
			other => other,
		}
	}
}
