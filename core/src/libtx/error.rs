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

//! libtx specific errors
use crate::core::transaction;
use crate::model;

/// Lib tx error definition
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
	/// The node could not be reached, or answered garbage
	#[error("Transport Error: {0}")]
	Transport(String),
	/// The node answered with an error
	#[error("Node Error: {0}")]
	Node(String),
	/// Signing failed or produced a signature that doesn't verify
	#[error("Signer Error: {0}")]
	Signer(String),
	/// Transaction error
	#[error("Transaction Error: {0}")]
	Transaction(#[from] transaction::Error),
	/// Node data that doesn't read as the expected structure
	#[error("Model Error: {0}")]
	Model(#[from] model::Error),
}
