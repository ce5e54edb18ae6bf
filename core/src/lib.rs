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

//! Transactions of the NEM (NIS1) network: the attribute model they are
//! built on, their binary wire form, the fee schedule and the mosaic
//! definitions needed to price mosaic transfers.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use nem_util as util;

#[macro_use]
pub mod macros;

pub mod buffer;
pub mod consensus;
pub mod core;
pub mod fee;
pub mod libtx;
pub mod model;
pub mod registry;
pub mod ser;
