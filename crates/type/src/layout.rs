// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::ffi::c_int;

use monetdbe_abi::constants::NATIVE_INT64_TAG;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, Type};

/// Type-tag numbering of the loaded native library.
///
/// A library built without 128-bit integers numbers every tag after int64 one
/// lower than the managed [`Type`] codes. All translation between native tags
/// and managed codes goes through this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeLayout {
	has_int128: bool,
}

impl NativeLayout {
	pub const WITH_INT128: Self = Self {
		has_int128: true,
	};

	pub const WITHOUT_INT128: Self = Self {
		has_int128: false,
	};

	pub const fn new(has_int128: bool) -> Self {
		Self {
			has_int128,
		}
	}

	pub const fn has_int128(self) -> bool {
		self.has_int128
	}

	/// Managed code of a native tag
	pub const fn to_managed(self, native: c_int) -> c_int {
		if !self.has_int128 && native > NATIVE_INT64_TAG {
			native + 1
		} else {
			native
		}
	}

	/// Native tag of a managed code
	pub fn to_native(self, managed: c_int) -> Result<c_int> {
		if self.has_int128 || managed <= NATIVE_INT64_TAG {
			return Ok(managed);
		}
		if managed == Type::Int128.code() {
			return Err(Error::Int128Unavailable);
		}
		Ok(managed - 1)
	}

	/// Decode a native tag, `None` if it names no known type
	pub fn decode(self, native: c_int) -> Option<Type> {
		if native < 0 {
			return None;
		}
		Type::from_code(self.to_managed(native))
	}

	pub fn encode(self, ty: Type) -> Result<c_int> {
		self.to_native(ty.code())
	}
}

impl Default for NativeLayout {
	fn default() -> Self {
		Self::new(cfg!(feature = "int128"))
	}
}
