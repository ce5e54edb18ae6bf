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

//! Transaction integration tests

pub mod common;

use self::common::{recipient, transfer_1_xem, FakeNode, FakeSigner};
use self::core::core::transaction::Error;
use self::core::core::{
	CosignatoryModification, Cosignature, ImportanceMode, ImportanceTransfer, Message,
	ModificationType, MosaicAttachment, MosaicDefinitionCreation, MosaicId, MosaicSupplyChange,
	MosaicTransfer, Multisig,
	MultisigAggregateModification, NamespaceProvision, Network, PublicKey, SupplyType,
	Transaction, TransactionBody, Transfer,
};
use self::core::libtx::{self, announce, sign_transaction};
use self::core::registry::{dim_coin, MosaicRegistry};
use self::core::ser::SerializationMode;
use nem_core as core;
use serde_json::json;

fn signed_by<B: Into<TransactionBody>>(body: B) -> Transaction {
	Transaction::new(Network::Testnet, body)
		.with_signer(PublicKey([2; 32]))
		.with_time_stamp(5)
}

fn sig_hash_len(tx: &Transaction) -> usize {
	tx.to_bytes(SerializationMode::SigHash, MosaicRegistry::builtin())
		.unwrap()
		.len()
}

#[test]
fn plain_transfer_fee() {
	let registry = MosaicRegistry::builtin();
	assert_eq!(transfer_1_xem().fee(registry).unwrap(), 50_000);
	let dto = transfer_1_xem().to_dto(registry).unwrap();
	assert_eq!(dto["fee"], json!(50_000));
	assert_eq!(dto["amount"], json!(1_000_000));
}

#[test]
fn empty_message_is_four_zero_bytes() {
	let registry = MosaicRegistry::builtin();
	let without = transfer_1_xem()
		.to_bytes(SerializationMode::SigHash, registry)
		.unwrap();
	let tx = Transaction::new(
		Network::Testnet,
		Transfer::new(recipient(), 1_000_000, Some(Message::plain(""))),
	)
	.with_signer(PublicKey([1; 32]))
	.with_time_stamp(100_000);
	let with_empty = tx.to_bytes(SerializationMode::SigHash, registry).unwrap();
	assert_eq!(without, with_empty);
	assert_eq!(&without[without.len() - 4..], &[0, 0, 0, 0]);
}

#[test]
fn predictable_lengths() {
	// common header: type, version, timestamp, signer, fee, deadline
	let header = 4 + 4 + 4 + (4 + 32) + 8 + 4;
	let address = 4 + 40;
	let key = 4 + 32;

	let transfer = signed_by(Transfer::new(recipient(), 10, None));
	assert_eq!(sig_hash_len(&transfer), header + address + 8 + 4);

	let with_message = signed_by(Transfer::new(recipient(), 10, Some(Message::plain("hello"))));
	assert_eq!(sig_hash_len(&with_message), header + address + 8 + 4 + 4 + 4 + 5);

	let mosaics = signed_by(MosaicTransfer::new(
		Transfer::new(recipient(), 1_000_000, None),
		vec![MosaicAttachment::new(MosaicId::new("dim", "coin"), 1)],
	));
	let id = 4 + (4 + 3) + (4 + 4);
	assert_eq!(
		sig_hash_len(&mosaics),
		header + address + 8 + 4 + 4 + (4 + id + 8)
	);

	let importance = signed_by(ImportanceTransfer::new(
		ImportanceMode::Activate,
		PublicKey([3; 32]),
	));
	assert_eq!(sig_hash_len(&importance), header + 4 + key);

	let namespace = signed_by(NamespaceProvision::new(Network::Testnet, "foo", None));
	assert_eq!(sig_hash_len(&namespace), header + address + 8 + (4 + 3) + 4);
	let sub = signed_by(NamespaceProvision::new(Network::Testnet, "bar", Some("foo")));
	assert_eq!(sig_hash_len(&sub), header + address + 8 + (4 + 3) + (4 + 3));

	let supply = signed_by(MosaicSupplyChange::new(
		MosaicId::new("dim", "coin"),
		SupplyType::Decrease,
		-10,
	));
	assert_eq!(sig_hash_len(&supply), header + (4 + id) + 4 + 8);

	let aggregate = signed_by(MultisigAggregateModification::new(
		vec![CosignatoryModification {
			modification_type: ModificationType::AddCosignatory,
			cosignatory: PublicKey([4; 32]),
		}],
		Some(1),
	));
	assert_eq!(sig_hash_len(&aggregate), header + 4 + (4 + 4 + key) + 4 + 4);

	let inner = signed_by(Transfer::new(recipient(), 10, None));
	let inner_len = sig_hash_len(&inner);
	let wrapped = signed_by(Multisig::new(inner).unwrap());
	assert_eq!(sig_hash_len(&wrapped), header + 4 + inner_len);

	let cosig = signed_by(Cosignature::new(
		inner_hash(&wrapped),
		"TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC".parse().unwrap(),
	));
	assert_eq!(sig_hash_len(&cosig), header + (4 + key) + address);
}

fn inner_hash(tx: &Transaction) -> core::core::Hash {
	match tx.body {
		TransactionBody::Multisig(ref m) => m.inner().hash(MosaicRegistry::builtin()).unwrap(),
		_ => panic!("not a multisig wrapper"),
	}
}

#[test]
fn multisig_cannot_wrap_multisig() {
	let inner = signed_by(Multisig::new(transfer_1_xem()).unwrap());
	match Multisig::new(inner) {
		Err(Error::InvalidStructure(_)) => {}
		other => panic!("unexpected {:?}", other),
	}

	let cosig = signed_by(Cosignature::new(
		core::core::Hash::keccak(b"x"),
		recipient(),
	));
	assert!(matches!(
		Multisig::new(cosig),
		Err(Error::InvalidStructure(_))
	));
}

#[test]
fn cosignature_fee_in_xem() {
	let registry = MosaicRegistry::builtin();
	let cosig = signed_by(Cosignature::new(
		core::core::Hash::keccak(b"x"),
		recipient(),
	));
	let fee = cosig.fee(registry).unwrap();
	assert_eq!((Cosignature::fee_xem() * 1_000_000.0).round() as u64, fee);
	assert!(Cosignature::fee_xem() > 0.1 && Cosignature::fee_xem() < 0.2);
	assert_eq!(Cosignature::fee_display(), "0.15");
}

#[test]
fn nested_multisig_dto_is_refused() {
	let registry = MosaicRegistry::builtin();
	let wrapped = signed_by(Multisig::new(transfer_1_xem()).unwrap());
	let mut dto = signed_by(Multisig::new(transfer_1_xem()).unwrap())
		.to_dto(registry)
		.unwrap();
	dto["otherTrans"] = wrapped.to_dto(registry).unwrap();
	assert!(matches!(
		Transaction::from_dto(&dto),
		Err(Error::InvalidStructure(_))
	));
}

#[test]
fn unknown_type_is_refused() {
	assert_eq!(
		Transaction::from_dto(&json!({ "type": 12345 })),
		Err(Error::UnknownTransactionType(12345))
	);
}

#[test]
fn dto_round_trips() {
	let registry = MosaicRegistry::builtin();
	let bodies: Vec<TransactionBody> = vec![
		Transfer::new(recipient(), 10, Some(Message::plain("hi"))).into(),
		MosaicTransfer::new(
			Transfer::new(recipient(), 1_000_000, None),
			vec![
				MosaicAttachment::new(MosaicId::new("dim", "token"), 30),
				MosaicAttachment::new(MosaicId::new("dim", "coin"), 20),
			],
		)
		.into(),
		ImportanceTransfer::new(ImportanceMode::Deactivate, PublicKey([3; 32])).into(),
		NamespaceProvision::new(Network::Testnet, "bar", Some("foo")).into(),
		MosaicSupplyChange::new(MosaicId::new("dim", "coin"), SupplyType::Increase, 7).into(),
		MultisigAggregateModification::new(
			vec![CosignatoryModification {
				modification_type: ModificationType::DeleteCosignatory,
				cosignatory: PublicKey([4; 32]),
			}],
			Some(-1),
		)
		.into(),
	];
	for body in bodies {
		let tx = signed_by(body);
		let fee = tx.fee(registry).unwrap();
		let back = Transaction::from_dto(&tx.to_dto(registry).unwrap()).unwrap();
		assert_eq!(back, tx.clone().with_fee(fee));
		assert_eq!(back.hash(registry).unwrap(), tx.hash(registry).unwrap());
	}
}

// one of each transaction type, built for `network`
fn every_body(network: Network) -> Vec<TransactionBody> {
	let local = network.mosaic_sink();
	let inner = Transaction::new(network, Transfer::new(local.clone(), 5, None))
		.with_signer(PublicKey([6; 32]))
		.with_time_stamp(7);
	vec![
		Transfer::new(local.clone(), 10, Some(Message::plain("hi"))).into(),
		MosaicTransfer::new(
			Transfer::new(local.clone(), 1_000_000, None),
			vec![MosaicAttachment::new(MosaicId::new("dim", "coin"), 15_000)],
		)
		.into(),
		ImportanceTransfer::new(ImportanceMode::Activate, PublicKey([3; 32])).into(),
		NamespaceProvision::new(network, "acme", None).into(),
		NamespaceProvision::new(network, "gold", Some("acme")).into(),
		MosaicDefinitionCreation::new(network, dim_coin()).into(),
		MosaicSupplyChange::new(MosaicId::new("dim", "coin"), SupplyType::Decrease, 3).into(),
		MultisigAggregateModification::new(
			vec![CosignatoryModification {
				modification_type: ModificationType::AddCosignatory,
				cosignatory: PublicKey([4; 32]),
			}],
			None,
		)
		.into(),
		Cosignature::new(
			inner.hash(MosaicRegistry::builtin()).unwrap(),
			network.namespace_sink(),
		)
		.into(),
		Multisig::new(inner).unwrap().into(),
	]
}

#[test]
fn dto_round_trips_on_every_network() {
	let registry = MosaicRegistry::builtin();
	for network in Network::ALL.iter() {
		for body in every_body(*network) {
			let tx = Transaction::new(*network, body)
				.with_signer(PublicKey([2; 32]))
				.with_time_stamp(5);
			let dto = tx.to_dto(registry).unwrap();
			let back = Transaction::from_dto(&dto)
				.unwrap_or_else(|e| panic!("{} {}: {}", network, tx.tx_type(), e));
			assert_eq!(back.version.network(), Some(*network));
			assert_eq!(
				back.to_bytes(SerializationMode::SigHash, registry).unwrap(),
				tx.to_bytes(SerializationMode::SigHash, registry).unwrap(),
				"{} {}",
				network,
				tx.tx_type()
			);
		}
	}
}

#[test]
fn multisig_dto_round_trips() {
	let registry = MosaicRegistry::builtin();
	let tx = signed_by(Multisig::new(transfer_1_xem()).unwrap());
	let dto = tx.to_meta_dto(registry).unwrap();
	assert_eq!(dto["meta"]["innerHash"], inner_hash(&tx).to_value());
	let back = Transaction::from_dto(&dto).unwrap();
	// fees come back explicit, the bytes don't change
	assert_eq!(back.hash(registry).unwrap(), tx.hash(registry).unwrap());
	assert_eq!(inner_hash(&back), inner_hash(&tx));
}

#[test]
fn mosaics_keep_their_order() {
	let registry = MosaicRegistry::builtin();
	let tx = signed_by(MosaicTransfer::new(
		Transfer::new(recipient(), 1_000_000, None),
		vec![
			MosaicAttachment::new(MosaicId::new("dim", "token"), 1),
			MosaicAttachment::new(MosaicId::new("dim", "coin"), 1),
		],
	));
	let dto = tx.to_dto(registry).unwrap();
	assert_eq!(dto["version"], json!(-1_744_830_462));
	assert_eq!(dto["mosaics"][0]["mosaicId"]["name"], json!("token"));
	assert_eq!(dto["mosaics"][1]["mosaicId"]["name"], json!("coin"));
}

#[test]
fn sign_then_announce() {
	let registry = MosaicRegistry::builtin();
	let signer = FakeSigner {
		key: PublicKey([1; 32]),
	};
	let mut tx = transfer_1_xem();
	tx.signer = None;
	let request = sign_transaction(&mut tx, &signer, registry).unwrap();
	assert_eq!(tx.signer, Some(PublicKey([1; 32])));
	assert!(tx.signature.is_some());
	assert_eq!(
		request.data,
		nem_util::to_hex(tx.last_serialized().unwrap())
	);

	let node = FakeNode::answering(json!({ "code": 1, "message": "SUCCESS" }));
	announce(&node, &request).unwrap();
	let posted = node.posted.borrow();
	assert_eq!(posted[0].0, libtx::ANNOUNCE_PATH);
	assert_eq!(posted[0].1["signature"], json!(request.signature));
}

#[test]
fn announce_errors_surface() {
	let registry = MosaicRegistry::builtin();
	let signer = FakeSigner {
		key: PublicKey([1; 32]),
	};
	let mut tx = transfer_1_xem();
	let request = sign_transaction(&mut tx, &signer, registry).unwrap();
	let node = FakeNode::answering(json!({ "code": 5, "message": "FAILURE_INSUFFICIENT_BALANCE" }));
	match announce(&node, &request) {
		Err(libtx::Error::Node(msg)) => assert!(msg.contains("FAILURE_INSUFFICIENT_BALANCE")),
		other => panic!("unexpected {:?}", other),
	}

	let stranger = FakeSigner {
		key: PublicKey([9; 32]),
	};
	assert!(matches!(
		sign_transaction(&mut tx, &stranger, registry),
		Err(libtx::Error::Signer(_))
	));
}
