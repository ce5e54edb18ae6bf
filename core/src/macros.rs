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

//! Generic macros used here and there to simplify and make code more
//! readable.

/// Eliminate some of the boilerplate of serialization (package ser) by
/// passing directly pairs of writer function and data to write.
/// Example before:
///   writer.write_i32(42)?;
///   writer.write_str("nem")?;
/// Example after:
///   ser_multiwrite!(writer, [write_i32, 42], [write_str, "nem"]);
#[macro_export]
macro_rules! ser_multiwrite {
	($wrtr:ident, $([ $write_call:ident, $val:expr ]),* ) => {
		$( $wrtr.$write_call($val)? );*
	}
}

/// Implements `TryFrom<Related>` for the typed value held by one of the
/// relation variants, so model accessors can be consumed with `?`.
#[macro_export]
macro_rules! impl_related {
	($variant:ident, $target:ty) => {
		impl ::std::convert::TryFrom<$crate::model::Related> for $target {
			type Error = $crate::model::Error;

			fn try_from(related: $crate::model::Related) -> Result<$target, Self::Error> {
				match related {
					$crate::model::Related::$variant(v) => Ok(v),
					other => Err($crate::model::Error::InvalidAttribute {
						name: stringify!($variant).to_owned(),
						reason: format!("relation resolved to {}", other.kind_name()),
					}),
				}
			}
		}
	};
}
