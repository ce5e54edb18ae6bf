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

/// Mosaic registry lookups
use clap::ArgMatches;

use crate::core::core::Amount;
use crate::core::fee;
use crate::core::model::Entity;
use crate::core::registry::{morph_class, MosaicRegistry};

/// Prints a registered definition, optionally with the fee of moving a
/// quantity of it
pub fn mosaic_command(args: &ArgMatches<'_>, registry: &MosaicRegistry) -> i32 {
	let fqn = args.value_of("fqn").unwrap_or("");
	let definition = match registry.get_definition(fqn) {
		Ok(d) => d,
		Err(e) => {
			eprintln!("{}", e);
			return 1;
		}
	};
	debug!("{} resolved as {:?}", fqn, morph_class(fqn));
	match serde_json::to_string_pretty(&definition.to_dto()) {
		Ok(s) => println!("{}", s),
		Err(e) => {
			eprintln!("{}", e);
			return 1;
		}
	}

	if let Some(quantity) = args.value_of("quantity") {
		let quantity = match quantity.parse::<u64>() {
			Ok(q) => q,
			Err(e) => {
				eprintln!("Invalid quantity {}: {}", quantity, e);
				return 1;
			}
		};
		match fee::for_mosaic(definition, quantity) {
			Ok(f) => println!(
				"fee for {} units: {} ({} XEM)",
				quantity,
				f,
				Amount(f).to_hr_string(false)
			),
			Err(e) => {
				eprintln!("{}", e);
				return 1;
			}
		}
	}
	0
}
