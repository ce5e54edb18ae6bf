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

//! Minimum fee of a transfer: a tier on the XEM amount, a surcharge per
//! started 32 bytes of message and a surcharge per attached mosaic. All
//! amounts are micro XEM and every function here is pure.

use crate::consensus::{
	minimum_fee_factor, FEE_UNIT, MAX_FEE_FACTOR, MAX_MOSAIC_QUANTITY, MESSAGE_CHUNK_SIZE,
	MOSAIC_XEM_EQUIVALENT_FACTOR, SMALL_BUSINESS_QUANTITY, XEM_BASE,
};
use crate::core::{Message, MosaicAttachment, MosaicDefinition};
use crate::registry::{self, MosaicResolver};

/// Fee calculation errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Mosaic definition could not be resolved
	#[error("registry error: {0}")]
	Registry(#[from] registry::Error),
	/// Mosaic definition with an initial supply of zero
	#[error("mosaic {0} has a zero supply")]
	ZeroSupply(String),
	/// Fee beyond what a NIS long holds
	#[error("fee overflow: {0}")]
	IntegerOverflow(String),
}

fn fee_units(units: u128, what: &str) -> Result<u64, Error> {
	units
		.checked_mul(FEE_UNIT as u128)
		.filter(|fee| *fee <= i64::max_value() as u128)
		.map(|fee| fee as u64)
		.ok_or_else(|| Error::IntegerOverflow(format!("{} fee of {} units", what, units)))
}

/// Fee for transferring `amount` micro XEM.
pub fn for_amount(amount: u64) -> u64 {
	FEE_UNIT * minimum_fee_factor(amount / XEM_BASE)
}

/// Fee for a message, by raw payload length. No or an empty message is
/// free.
pub fn for_message(message: Option<&Message>) -> Result<u64, Error> {
	match message {
		Some(m) if !m.is_empty() => {
			fee_units((m.payload.len() / MESSAGE_CHUNK_SIZE) as u128 + 1, "message")
		}
		_ => Ok(0),
	}
}

/// Fee for moving `quantity` smallest units of a mosaic. Small quantities
/// pay a flat fee unit, larger ones their XEM equivalent less a discount
/// for mosaics with a small total supply.
pub fn for_mosaic(definition: &MosaicDefinition, quantity: u64) -> Result<u64, Error> {
	if quantity <= SMALL_BUSINESS_QUANTITY {
		return Ok(FEE_UNIT);
	}
	let props = &definition.properties;
	if props.initial_supply == 0 {
		return Err(Error::ZeroSupply(definition.id.fqn()));
	}
	let supply = props.initial_supply as u128;
	let total_units = 10u128
		.checked_pow(props.divisibility as u32)
		.and_then(|scale| supply.checked_mul(scale))
		.ok_or_else(|| Error::IntegerOverflow(format!("supply of {}", definition.id)))?;
	// only the logarithm goes through floating point, its floor is an integer
	let adjustment = (0.8 * (MAX_MOSAIC_QUANTITY as f64 / total_units as f64).ln()).floor() as i128;
	// XEM equivalent in fee unit fractions, truncated once at the end
	let unit = FEE_UNIT as u128;
	let raw = (quantity as u128)
		.checked_mul(MOSAIC_XEM_EQUIVALENT_FACTOR as u128)
		.and_then(|q| q.checked_mul(unit))
		.map(|q| q / supply)
		.ok_or_else(|| Error::IntegerOverflow(format!("quantity {}", quantity)))?
		.min(MAX_FEE_FACTOR as u128 * unit) as i128;
	let fee = (raw - adjustment * unit as i128).max(unit as i128) as u128;
	trace!(
		"mosaic fee for {} x {}: raw {}/{}, adjustment {}",
		quantity,
		definition.id,
		raw,
		unit,
		adjustment
	);
	if fee > i64::max_value() as u128 {
		return Err(Error::IntegerOverflow(format!("mosaic fee for {}", quantity)));
	}
	Ok(fee as u64)
}

/// Sum of the fees of every attached mosaic.
pub fn for_mosaics<R>(mosaics: &[MosaicAttachment], resolver: &R) -> Result<u64, Error>
where
	R: MosaicResolver + ?Sized,
{
	let mut total = 0u64;
	for attachment in mosaics {
		let definition = resolver.resolve(&attachment.mosaic_id)?;
		let fee = for_mosaic(&definition, attachment.quantity)?;
		total = total
			.checked_add(fee)
			.ok_or_else(|| Error::IntegerOverflow("mosaic fees".to_owned()))?;
	}
	Ok(total)
}

/// Minimum fee of a transfer.
pub fn transfer<R>(
	amount: u64,
	message: Option<&Message>,
	mosaics: &[MosaicAttachment],
	resolver: &R,
) -> Result<u64, Error>
where
	R: MosaicResolver + ?Sized,
{
	let mut total = for_amount(amount);
	for part in &[for_message(message)?, for_mosaics(mosaics, resolver)?] {
		total = total
			.checked_add(*part)
			.ok_or_else(|| Error::IntegerOverflow(format!("transfer fee for {}", amount)))?;
	}
	Ok(total)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::core::{MosaicId, MosaicProperties, PublicKey};
	use crate::registry::{dim_coin, dim_token, nem_xem, MosaicRegistry};

	#[test]
	fn amount_tiers() {
		assert_eq!(for_amount(0), 50_000);
		assert_eq!(for_amount(1_000_000), 50_000);
		assert_eq!(for_amount(20_000 * 1_000_000), 100_000);
		assert_eq!(for_amount(u64::max_value()), 25 * 50_000);
	}

	#[test]
	fn message_chunks() {
		assert_eq!(for_message(None).unwrap(), 0);
		assert_eq!(for_message(Some(&Message::plain(""))).unwrap(), 0);
		assert_eq!(for_message(Some(&Message::plain("hello"))).unwrap(), 50_000);
		assert_eq!(for_message(Some(&Message::plain(&"x".repeat(31)))).unwrap(), 50_000);
		assert_eq!(for_message(Some(&Message::plain(&"x".repeat(32)))).unwrap(), 100_000);
	}

	#[test]
	fn mosaic_fees() {
		// small business
		assert_eq!(for_mosaic(&dim_coin(), 10_000).unwrap(), 50_000);
		// full supply of 9e15 units, no adjustment
		assert_eq!(for_mosaic(&dim_coin(), 50_000).unwrap(), 250_000);
		assert_eq!(for_mosaic(&dim_coin(), 1_000_000).unwrap(), 1_250_000);
		assert_eq!(for_mosaic(&nem_xem(), 1_000_000).unwrap(), 1_250_000);
		// 1e13 units: floor(0.8 * ln(900)) = 5
		assert_eq!(for_mosaic(&dim_token(), 20_000).unwrap(), 1_000_000);
	}

	#[test]
	fn fractional_xem_equivalents() {
		// quantity, XEM equivalent, fee
		let cases = [
			(10_001, "1.0001", 50_005),
			(15_000, "1.5", 75_000),
			(22_222, "2.2222", 111_110),
			(99_999, "9.9999", 499_995),
			(249_999, "24.9999", 1_249_995),
			(250_001, "25 (capped)", 1_250_000),
		];
		for (quantity, raw, expected) in cases.iter() {
			assert_eq!(
				for_mosaic(&dim_coin(), *quantity).unwrap(),
				*expected,
				"{} dim:coin, raw {}",
				quantity,
				raw
			);
		}
		// 10 XEM supply, 1e7 units: floor(0.8 * ln(9e8)) = 16
		let def = MosaicDefinition::new(
			PublicKey([1; 32]),
			MosaicId::new("acme", "rare"),
			"",
			MosaicProperties {
				divisibility: 6,
				initial_supply: 10,
				..Default::default()
			},
		);
		// raw capped at 25, less 16
		assert_eq!(for_mosaic(&def, 10_001).unwrap(), 9 * FEE_UNIT);
		// dim:token, 1e13 units, adjustment 5: 12_345 * 0.09 = 1111.05, capped
		assert_eq!(for_mosaic(&dim_token(), 12_345).unwrap(), 20 * FEE_UNIT);
	}

	#[test]
	fn zero_supply_is_refused() {
		let def = MosaicDefinition::new(
			PublicKey([1; 32]),
			MosaicId::new("acme", "void"),
			"",
			MosaicProperties {
				initial_supply: 0,
				..Default::default()
			},
		);
		assert_eq!(
			for_mosaic(&def, 20_000),
			Err(Error::ZeroSupply("acme:void".to_owned()))
		);
		assert_eq!(for_mosaic(&def, 1).unwrap(), 50_000);
	}

	#[test]
	fn transfer_sums_and_is_pure() {
		let registry = MosaicRegistry::builtin();
		let mosaics = vec![
			MosaicAttachment::new(MosaicId::new("dim", "coin"), 50_000),
			MosaicAttachment::new(MosaicId::new("nem", "xem"), 10),
		];
		let msg = Message::plain("hello");
		let fee = transfer(1_000_000, Some(&msg), &mosaics, registry).unwrap();
		assert_eq!(fee, 50_000 + 50_000 + 250_000 + 50_000);
		assert_eq!(transfer(1_000_000, Some(&msg), &mosaics, registry).unwrap(), fee);
		assert_eq!(transfer(1_000_000, None, &[], registry).unwrap(), 50_000);
	}

	#[test]
	fn unknown_mosaics_surface_the_miss() {
		let mosaics = vec![MosaicAttachment::new(MosaicId::new("foo", "bar"), 1)];
		assert_eq!(
			transfer(0, None, &mosaics, MosaicRegistry::builtin()),
			Err(Error::Registry(registry::Error::RegistryMiss("foo:bar".to_owned())))
		);
	}
}
