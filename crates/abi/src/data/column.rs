// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int, c_uint, c_void};

/// Null predicate attached to every typed column.
///
/// Returns 1 when the cell at `value` holds the SQL NULL sentinel, 0 otherwise.
pub type IsNullFn<T> = unsafe extern "C" fn(value: *const T) -> c_int;

/// SQL-level type information of a result column (`monetdbe_sql_type`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SqlTypeFFI {
	/// SQL type name, may be null
	pub name: *mut c_char,
	/// Decimal scale, 0 for non-decimal columns
	pub scale: c_uint,
	/// Decimal precision in digits
	pub digits: c_uint,
}

impl SqlTypeFFI {
	pub const fn empty() -> Self {
		Self {
			name: core::ptr::null_mut(),
			scale: 0,
			digits: 0,
		}
	}
}

/// Type-erased column descriptor (`monetdbe_column`)
///
/// This is the common prefix of every [`TypedColumnFFI`]. A pointer returned by
/// `monetdbe_result_fetch` may be reinterpreted as the typed layout selected
/// by `type_code`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ColumnFFI {
	/// Native type tag, numbering depends on the library build
	pub type_code: c_int,
	pub sql_type: SqlTypeFFI,
	/// Row-major cell array of `count` elements
	pub data: *mut c_void,
	/// Number of rows
	pub count: usize,
	/// Column name (NUL-terminated)
	pub name: *mut c_char,
}

/// Column descriptor with its cell type known (`monetdbe_column_<type>`)
#[repr(C)]
#[derive(Debug)]
pub struct TypedColumnFFI<T> {
	pub type_code: c_int,
	pub sql_type: SqlTypeFFI,
	pub data: *mut T,
	pub count: usize,
	pub name: *mut c_char,
	/// Sentinel stored in `data` for SQL NULL
	pub null_value: T,
	/// `10^sql_type.scale` for decimal columns
	pub scale: f64,
	pub is_null: Option<IsNullFn<T>>,
}

impl<T> TypedColumnFFI<T> {
	/// View this descriptor through its type-erased prefix
	pub fn as_column(&self) -> &ColumnFFI {
		// SAFETY: both types are repr(C) and ColumnFFI is a layout prefix of TypedColumnFFI
		unsafe { &*(self as *const Self as *const ColumnFFI) }
	}
}
