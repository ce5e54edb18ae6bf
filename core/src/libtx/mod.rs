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

//! Everything around a transaction that talks to the outside world: signing
//! its bytes, announcing it to a node and looking up mosaics the registry
//! doesn't know. Only the interfaces live here, transport and key handling
//! are provided by the caller.

pub mod announce;
mod error;
pub mod lookup;

use serde_json::Value;

use crate::core::{PublicKey, Signature};

pub use self::announce::{announce, sign_transaction, RequestAnnounce};
pub use self::error::Error;
pub use self::lookup::{FallbackResolver, MosaicLookup, NodeMosaicLookup};

/// Path announcing a signed transaction
pub const ANNOUNCE_PATH: &str = "/transaction/announce";
/// Path listing the mosaic definitions of a namespace
pub const MOSAIC_DEFINITION_PAGE_PATH: &str = "/namespace/mosaic/definition/page";

/// Transport to a NIS node. Failures and error responses are returned as
/// they are, retrying is up to the implementation.
pub trait NodeClient {
	/// POSTs a JSON body, returning the JSON response
	fn post(&self, path: &str, body: &Value) -> Result<Value, Error>;

	/// GETs a path with query parameters, returning the JSON response
	fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error>;
}

/// Key holder producing signatures over transaction bytes.
pub trait Signer {
	/// Public key of the signing account
	fn public_key(&self) -> PublicKey;

	/// Signs the exact bytes given
	fn sign(&self, data: &[u8]) -> Result<Signature, Error>;

	/// Whether `signature` over `data` was made by `public_key`
	fn verify(&self, data: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

impl<'a, C: NodeClient + ?Sized> NodeClient for &'a C {
	fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
		(**self).post(path, body)
	}

	fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
		(**self).get(path, query)
	}
}
