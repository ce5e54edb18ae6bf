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

//! Signing and announcing transactions.

use serde_json::Value;

use super::{Error, NodeClient, Signer, ANNOUNCE_PATH};
use crate::core::Transaction;
use crate::registry::MosaicResolver;
use crate::util;

/// NIS success code of an announce
const ANNOUNCE_SUCCESS: i64 = 1;

/// Body of an announce: signing bytes and signature, both hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAnnounce {
	/// Serialized transaction
	pub data: String,
	/// Signature over `data`
	pub signature: String,
}

/// Signs a transaction, filling in its signer and signature. A signer
/// already set must be the key signing.
pub fn sign_transaction(
	tx: &mut Transaction,
	signer: &dyn Signer,
	resolver: &dyn MosaicResolver,
) -> Result<RequestAnnounce, Error> {
	let key = signer.public_key();
	match tx.signer {
		Some(existing) if existing != key => {
			return Err(Error::Signer(format!(
				"transaction signer {} is not the signing key {}",
				existing, key
			)));
		}
		Some(_) => {}
		None => tx.signer = Some(key),
	}
	let data = tx.serialize(resolver)?;
	let signature = signer.sign(&data)?;
	if !signer.verify(&data, &signature, &key) {
		return Err(Error::Signer("signature does not verify".to_owned()));
	}
	tx.signature = Some(signature);
	debug!(
		"signed {} of {} bytes with {}",
		tx.tx_type(),
		data.len(),
		key
	);
	Ok(RequestAnnounce {
		data: util::to_hex(&data),
		signature: signature.to_hex(),
	})
}

/// Announces a signed transaction. Answers other than success are errors.
pub fn announce<C>(client: &C, request: &RequestAnnounce) -> Result<Value, Error>
where
	C: NodeClient + ?Sized,
{
	let body = serde_json::to_value(request).map_err(|e| Error::Transport(e.to_string()))?;
	let response = client.post(ANNOUNCE_PATH, &body)?;
	match response.get("code").and_then(Value::as_i64) {
		Some(ANNOUNCE_SUCCESS) | None => {
			info!("transaction announced: {}", response);
			Ok(response)
		}
		Some(code) => {
			let message = response
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error");
			warn!("announce refused with code {}: {}", code, message);
			Err(Error::Node(format!("{} (code {})", message, code)))
		}
	}
}
