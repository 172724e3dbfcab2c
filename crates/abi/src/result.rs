// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int};

/// Result set header (`monetdbe_result`)
///
/// Owned by the engine; released by `monetdbe_cleanup_result`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ResultFFI {
	/// Number of rows
	pub nrows: i64,
	/// Number of columns, zero for statements that only report a row count
	pub ncols: usize,
	/// Result name, may be null
	pub name: *mut c_char,
	/// Last auto-generated key, or -1
	pub last_id: i64,
}

impl ResultFFI {
	pub const fn empty() -> Self {
		Self {
			nrows: 0,
			ncols: 0,
			name: core::ptr::null_mut(),
			last_id: -1,
		}
	}
}

/// Prepared statement header (`monetdbe_statement`)
///
/// Owned by the engine; released by `monetdbe_cleanup_statement`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StatementFFI {
	/// Number of `?` parameters
	pub nparam: i64,
	/// Native type tag per parameter, `nparam` entries
	pub type_codes: *mut c_int,
}
