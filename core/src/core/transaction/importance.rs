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

//! Delegated harvesting: lend an account's importance to a remote account.

use serde_json::{Map, Value};

use super::{fragment, pinned, Error, Extension, TransactionType};
use crate::consensus::IMPORTANCE_TRANSFER_FEE;
use crate::core::{PublicKey, Version};
use crate::fee;
use crate::model::{self, Model};
use crate::registry::MosaicResolver;
use crate::ser::{Writeable, Writer};

/// Whether harvesting is delegated or taken back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportanceMode {
	/// Start delegating
	Activate = 1,
	/// Stop delegating
	Deactivate = 2,
}

impl Default for ImportanceMode {
	fn default() -> ImportanceMode {
		ImportanceMode::Activate
	}
}

/// Importance transfer to a remote account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportanceTransfer {
	/// Activation or deactivation
	pub mode: ImportanceMode,
	/// Account harvesting on behalf of the signer
	pub remote_account: PublicKey,
}

impl ImportanceTransfer {
	/// Delegates harvesting to `remote_account`
	pub fn new(mode: ImportanceMode, remote_account: PublicKey) -> ImportanceTransfer {
		ImportanceTransfer {
			mode,
			remote_account,
		}
	}

	/// Reads an importance transfer, activating when no mode is given
	pub fn from_model(model: &Model) -> Result<ImportanceTransfer, Error> {
		let mode = match model.get("mode") {
			None | Some(Value::Null) => ImportanceMode::default(),
			Some(_) => match model.i64_attribute("mode")? {
				1 => ImportanceMode::Activate,
				2 => ImportanceMode::Deactivate,
				n => {
					return Err(model::Error::invalid("mode", format!("unknown mode {}", n)).into())
				}
			},
		};
		Ok(ImportanceTransfer {
			mode,
			remote_account: model.related("remoteAccount")?,
		})
	}
}

impl Extension for ImportanceTransfer {
	fn tx_type(&self) -> TransactionType {
		TransactionType::ImportanceTransfer
	}

	fn extend(&self, _resolver: &dyn MosaicResolver) -> Result<Map<String, Value>, Error> {
		let mut map = fragment(self.tx_type());
		map.insert("mode".to_owned(), Value::from(self.mode as i32));
		map.insert(
			"remoteAccount".to_owned(),
			Value::from(self.remote_account.to_hex()),
		);
		Ok(map)
	}

	fn extend_fee(&self, _resolver: &dyn MosaicResolver) -> Result<u64, fee::Error> {
		Ok(IMPORTANCE_TRANSFER_FEE)
	}

	fn pin_version(&self, version: Version) -> Version {
		pinned(version, 1)
	}

	fn write_payload<W: Writer>(
		&self,
		writer: &mut W,
		_resolver: &dyn MosaicResolver,
	) -> Result<(), Error> {
		writer.write_i32(self.mode as i32)?;
		self.remote_account.write(writer)?;
		Ok(())
	}
}
