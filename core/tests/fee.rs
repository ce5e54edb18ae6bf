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

//! Fee schedule tests

use self::core::consensus::{FEE_UNIT, MINIMUM_FEE, XEM_BASE};
use self::core::core::{Message, MosaicAttachment, MosaicId};
use self::core::fee;
use self::core::registry::{self, MosaicRegistry};
use nem_core as core;

#[test]
fn amount_tiers() {
	assert_eq!(fee::for_amount(0), MINIMUM_FEE);
	assert_eq!(fee::for_amount(XEM_BASE), 50_000);
	assert_eq!(fee::for_amount(19_999 * XEM_BASE), FEE_UNIT);
	assert_eq!(fee::for_amount(20_000 * XEM_BASE), 2 * FEE_UNIT);
	assert_eq!(fee::for_amount(250_000 * XEM_BASE), 25 * FEE_UNIT);
	// capped
	assert_eq!(fee::for_amount(8_000_000_000 * XEM_BASE), 25 * FEE_UNIT);
}

#[test]
fn message_chunks() {
	assert_eq!(fee::for_message(None).unwrap(), 0);
	assert_eq!(fee::for_message(Some(&Message::plain(""))).unwrap(), 0);
	let short = Message::plain(&"a".repeat(31));
	assert_eq!(fee::for_message(Some(&short)).unwrap(), FEE_UNIT);
	let chunk = Message::plain(&"a".repeat(32));
	assert_eq!(fee::for_message(Some(&chunk)).unwrap(), 2 * FEE_UNIT);
	let secure = Message::secure(vec![0; 64]);
	assert_eq!(fee::for_message(Some(&secure)).unwrap(), 3 * FEE_UNIT);
}

#[test]
fn transfer_fees_are_pure() {
	let registry = MosaicRegistry::builtin();
	let message = Message::plain("hello");
	let mosaics = vec![
		MosaicAttachment::new(MosaicId::new("nem", "xem"), 10_000),
		MosaicAttachment::new(MosaicId::new("dim", "token"), 1),
	];
	let first = fee::transfer(XEM_BASE, Some(&message), &mosaics, registry).unwrap();
	let second = fee::transfer(XEM_BASE, Some(&message), &mosaics, registry).unwrap();
	assert_eq!(first, second);
	// amount, message, then one unit per small mosaic quantity
	assert_eq!(first, FEE_UNIT + FEE_UNIT + 2 * FEE_UNIT);
}

#[test]
fn unknown_mosaics_are_reported() {
	let mosaics = vec![MosaicAttachment::new(MosaicId::new("acme", "gold"), 1)];
	match fee::transfer(0, None, &mosaics, MosaicRegistry::builtin()) {
		Err(fee::Error::Registry(registry::Error::RegistryMiss(fqn))) => {
			assert_eq!(fqn, "acme:gold")
		}
		other => panic!("unexpected {:?}", other),
	}
}

#[test]
fn fractional_mosaic_equivalents_are_charged() {
	let registry = MosaicRegistry::builtin();
	// 15_000 dim:coin is worth 1.5 XEM
	let mosaics = vec![MosaicAttachment::new(MosaicId::new("dim", "coin"), 15_000)];
	let fee = fee::transfer(XEM_BASE, None, &mosaics, registry).unwrap();
	assert_eq!(fee, FEE_UNIT + 75_000);
}
