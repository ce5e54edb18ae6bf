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

/// Transaction fee and serialization commands
use std::fs;
use std::io::{self, Read};

use clap::ArgMatches;

use crate::core::core::{Amount, Transaction};
use crate::core::registry::MosaicRegistry;
use crate::core::ser::SerializationMode;
use crate::util;

fn read_input(input: &str) -> Result<String, String> {
	if input == "-" {
		let mut buf = String::new();
		io::stdin()
			.read_to_string(&mut buf)
			.map_err(|e| format!("Error reading stdin: {}", e))?;
		Ok(buf)
	} else {
		fs::read_to_string(input).map_err(|e| format!("Error reading {}: {}", input, e))
	}
}

fn read_transaction(args: &ArgMatches<'_>) -> Result<Transaction, String> {
	let input = args.value_of("input").unwrap_or("-");
	let contents = read_input(input)?;
	let value: serde_json::Value =
		serde_json::from_str(&contents).map_err(|e| format!("Invalid json: {}", e))?;
	let tx = Transaction::from_dto(&value).map_err(|e| format!("Invalid transaction: {}", e))?;
	debug!("read {} transaction from {}", tx.tx_type(), input);
	Ok(tx)
}

fn report(result: Result<(), String>) -> i32 {
	match result {
		Ok(()) => 0,
		Err(e) => {
			error!("{}", e);
			eprintln!("{}", e);
			1
		}
	}
}

/// Prints the fee of a transaction DTO, in micro XEM then XEM
pub fn fee_command(args: &ArgMatches<'_>, registry: &MosaicRegistry) -> i32 {
	report(read_transaction(args).and_then(|tx| {
		let fee = tx
			.fee(registry)
			.map_err(|e| format!("Cannot compute fee: {}", e))?;
		println!("{} ({} XEM)", fee, Amount(fee).to_hr_string(false));
		Ok(())
	}))
}

/// Prints the bytes to sign of a transaction DTO and its hash
pub fn serialize_command(args: &ArgMatches<'_>, registry: &MosaicRegistry) -> i32 {
	let mode = if args.is_present("full") {
		SerializationMode::Full
	} else {
		SerializationMode::SigHash
	};
	report(read_transaction(args).and_then(|tx| {
		let bytes = tx
			.to_bytes(mode, registry)
			.map_err(|e| format!("Cannot serialize: {}", e))?;
		let hash = tx
			.hash(registry)
			.map_err(|e| format!("Cannot hash: {}", e))?;
		println!("data: {}", util::to_hex(&bytes));
		println!("hash: {}", hash.to_hex());
		if args.is_present("dto") {
			let dto = tx
				.to_meta_dto(registry)
				.map_err(|e| format!("Cannot build DTO: {}", e))?;
			let pretty = serde_json::to_string_pretty(&dto).map_err(|e| e.to_string())?;
			println!("{}", pretty);
		}
		Ok(())
	}))
}
