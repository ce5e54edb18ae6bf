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

//! Common test functions

use std::cell::RefCell;

use nem_core::core::hash::Hash;
use nem_core::core::{Address, Network, PublicKey, Signature, Transaction, Transfer};
use nem_core::libtx::{Error, NodeClient, Signer};
use serde_json::Value;

#[allow(dead_code)]
pub const RECIPIENT: &str = "TBMOSAICOD4F54EE5CDMR23CCBGOAM2XSJBR5OLC";

// a plain 1 XEM transfer, signed by a fixed key at a fixed time
#[allow(dead_code)]
pub fn transfer_1_xem() -> Transaction {
	Transaction::new(
		Network::Testnet,
		Transfer::new(recipient(), 1_000_000, None),
	)
	.with_signer(PublicKey([1; 32]))
	.with_time_stamp(100_000)
}

#[allow(dead_code)]
pub fn recipient() -> Address {
	RECIPIENT.parse().unwrap()
}

// signer whose "signature" is the keccak of the data, twice
#[allow(dead_code)]
pub struct FakeSigner {
	pub key: PublicKey,
}

impl FakeSigner {
	fn fake_sign(data: &[u8]) -> Signature {
		let h = Hash::keccak(data);
		let mut sig = [0u8; 64];
		sig[..32].copy_from_slice(h.as_ref());
		sig[32..].copy_from_slice(h.as_ref());
		Signature(sig)
	}
}

impl Signer for FakeSigner {
	fn public_key(&self) -> PublicKey {
		self.key
	}

	fn sign(&self, data: &[u8]) -> Result<Signature, Error> {
		Ok(FakeSigner::fake_sign(data))
	}

	fn verify(&self, data: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
		*public_key == self.key && FakeSigner::fake_sign(data) == *signature
	}
}

// node answering every POST with the same response, recording the bodies
#[allow(dead_code)]
pub struct FakeNode {
	pub response: Value,
	pub posted: RefCell<Vec<(String, Value)>>,
}

#[allow(dead_code)]
impl FakeNode {
	pub fn answering(response: Value) -> FakeNode {
		FakeNode {
			response,
			posted: RefCell::new(vec![]),
		}
	}
}

impl NodeClient for FakeNode {
	fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
		self.posted
			.borrow_mut()
			.push((path.to_owned(), body.clone()));
		Ok(self.response.clone())
	}

	fn get(&self, _path: &str, _query: &[(&str, &str)]) -> Result<Value, Error> {
		Err(Error::Transport("no GET on this node".to_owned()))
	}
}
