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

//! Model, buffer and registry tests working across modules

use self::core::buffer::Buffer;
use self::core::core::{MosaicDefinition, MosaicId};
use self::core::model::{Entity, Model, Related, EMPTY_SCHEMA};
use self::core::registry::{morph_class, MosaicRegistry, MosaicResolver};
use nem_core as core;
use serde_json::json;

#[test]
fn buffer_pads_on_the_left() {
	assert_eq!(Buffer::from_hex("41", Some(4)).unwrap().get_hex(), "00000041");
}

#[test]
fn plain_models_keep_insertion_order() {
	let mut model = Model::new(&EMPTY_SCHEMA);
	for key in &["zeta", "alpha", "mid"] {
		model.set_attribute(key, json!(key.len())).unwrap();
	}
	let keys: Vec<&String> = model.attributes().keys().collect();
	assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
	assert_eq!(model.get("alpha"), Some(&json!(5)));
}

#[test]
fn definitions_read_from_node_shape() {
	// shape of a definition as a node lists it
	let dto = json!({
		"creator": "a1df5306355766bd2f9a64efdc089eb294be265987b3359093ae474c051d7d5a",
		"id": { "namespaceId": "dim", "name": "coin" },
		"description": "DIM COIN",
		"properties": [
			{ "name": "divisibility", "value": "6" },
			{ "name": "initialSupply", "value": "9000000000" },
			{ "name": "supplyMutable", "value": "false" },
			{ "name": "transferable", "value": "true" }
		],
		"levy": {
			"type": 2,
			"recipient": "NCGGLVO2G3CUACVI5GNX2KRBJSQCN4RDL2ZWJ4DP",
			"mosaicId": { "namespaceId": "dim", "name": "coin" },
			"fee": 10
		}
	});
	let definition = MosaicDefinition::from_dto(&dto).unwrap();
	let registry = MosaicRegistry::builtin();
	assert_eq!(
		registry.resolve(&MosaicId::new("dim", "coin")).unwrap(),
		definition
	);

	let model = definition.to_model();
	assert_eq!(model.get("namespaceId"), Some(&json!("dim")));
	match model.relation("levy").unwrap() {
		Related::MosaicLevy(Some(levy)) => assert_eq!(levy.fee, 10),
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn every_definition_has_a_class() {
	let registry = MosaicRegistry::builtin();
	for definition in registry.definitions() {
		let class = morph_class(&definition.id.fqn()).unwrap();
		assert!(class.starts_with("Mosaics::"));
	}
}
