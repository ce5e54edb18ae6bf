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

//! Values a node checks every transaction against: units, fee schedule,
//! rental fees and the NEM epoch. Anything here that doesn't match what
//! NIS expects gets the transaction rejected on announce.

/// A XEM is divisible to 10^6
pub const XEM_BASE: u64 = 1_000_000;
/// Micro XEM, smallest unit
pub const MICRO_XEM: u64 = 1;
/// Divisibility of the native mosaic
pub const XEM_DIVISIBILITY: u8 = 6;
/// Total XEM supply, in whole XEM
pub const MAX_XEM_SUPPLY: u64 = 8_999_999_999;

/// One fee unit, 0.05 XEM
pub const FEE_UNIT: u64 = XEM_BASE / 20;
/// Fee units charged at most for the XEM amount of a transfer
pub const MAX_FEE_FACTOR: u64 = 25;
/// Every started step of this many XEM costs one more fee unit
pub const FEE_TIER_XEM: u64 = 10_000;
/// Every started chunk of this many message bytes costs one fee unit
pub const MESSAGE_CHUNK_SIZE: usize = 32;
/// Mosaic quantities up to this one are charged the flat small business fee
pub const SMALL_BUSINESS_QUANTITY: u64 = 10_000;
/// Maximum quantity any mosaic can have, in its smallest unit
pub const MAX_MOSAIC_QUANTITY: u64 = 9_000_000_000_000_000;
/// Factor mapping a mosaic quantity to its XEM equivalent
pub const MOSAIC_XEM_EQUIVALENT_FACTOR: u64 = 900_000;

/// Lowest fee any transaction may carry
pub const MINIMUM_FEE: u64 = FEE_UNIT;
/// Fee of an importance transfer
pub const IMPORTANCE_TRANSFER_FEE: u64 = 3 * FEE_UNIT;
/// Fee of a multisig wrapper
pub const MULTISIG_FEE: u64 = 3 * FEE_UNIT;
/// Fee of a cosignature
pub const MULTISIG_SIGNATURE_FEE: u64 = 3 * FEE_UNIT;
/// Fee of a multisig aggregate modification
pub const MULTISIG_AGGREGATE_MODIFICATION_FEE: u64 = 10 * FEE_UNIT;
/// Fee of a namespace provision
pub const NAMESPACE_PROVISION_FEE: u64 = 3 * FEE_UNIT;
/// Fee of a mosaic definition creation
pub const MOSAIC_DEFINITION_CREATION_FEE: u64 = 3 * FEE_UNIT;
/// Fee of a mosaic supply change
pub const MOSAIC_SUPPLY_CHANGE_FEE: u64 = 3 * FEE_UNIT;

/// Rental paid to the namespace sink for a root namespace
pub const ROOT_NAMESPACE_RENTAL_FEE: u64 = 100 * XEM_BASE;
/// Rental paid to the namespace sink for a sub namespace
pub const SUB_NAMESPACE_RENTAL_FEE: u64 = 10 * XEM_BASE;
/// Creation fee paid to the mosaic sink for a mosaic definition
pub const MOSAIC_CREATION_FEE: u64 = 10 * XEM_BASE;

/// Unix timestamp of the NEM nemesis block, 2015-03-29 00:06:25 UTC. NIS
/// timestamps count seconds from there.
pub const NEM_EPOCH: i64 = 1_427_587_585;
/// Default lifetime of a transaction before a node drops it, in seconds
pub const DEFAULT_DEADLINE: u32 = 60 * 60;
/// Longest lifetime a node accepts, in seconds
pub const MAX_DEADLINE: u32 = 24 * 60 * 60;

/// Transfer amount fee: one fee unit per started 10 000 XEM, at least one
/// and at most `MAX_FEE_FACTOR`.
pub fn minimum_fee_factor(xem: u64) -> u64 {
	let factor = xem / FEE_TIER_XEM;
	if factor < 1 {
		1
	} else if factor > MAX_FEE_FACTOR {
		MAX_FEE_FACTOR
	} else {
		factor
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn fee_factor_tiers() {
		assert_eq!(minimum_fee_factor(0), 1);
		assert_eq!(minimum_fee_factor(1), 1);
		assert_eq!(minimum_fee_factor(19_999), 1);
		assert_eq!(minimum_fee_factor(20_000), 2);
		assert_eq!(minimum_fee_factor(250_000), 25);
		assert_eq!(minimum_fee_factor(MAX_XEM_SUPPLY), 25);
	}

	#[test]
	fn fee_constants() {
		assert_eq!(FEE_UNIT, 50_000);
		assert_eq!(MULTISIG_FEE, 150_000);
		assert_eq!(MULTISIG_AGGREGATE_MODIFICATION_FEE, 500_000);
		assert_eq!(ROOT_NAMESPACE_RENTAL_FEE, 100_000_000);
	}
}
