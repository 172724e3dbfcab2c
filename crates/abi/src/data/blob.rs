// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::c_char;

/// FFI-safe blob cell (`monetdbe_data_blob`)
///
/// A null blob is signalled by the column's null predicate, conventionally
/// with `data` set to null.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BlobFFI {
	/// Number of bytes pointed to by `data`
	pub size: usize,
	/// Blob bytes, not NUL-terminated
	pub data: *mut c_char,
}

impl BlobFFI {
	pub const fn empty() -> Self {
		Self {
			size: 0,
			data: core::ptr::null_mut(),
		}
	}

	/// Borrow `bytes` as a blob cell. The cell must not outlive `bytes`.
	pub fn borrowed(bytes: &[u8]) -> Self {
		Self {
			size: bytes.len(),
			data: bytes.as_ptr() as *mut c_char,
		}
	}
}
