// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int, c_void};

use crate::{ColumnFFI, OptionsFFI, ResultFFI, StatementFFI};

/// Opaque database handle (`monetdbe_database`)
pub type DatabaseHandle = *mut c_void;

/// Function table of the monetdbe C API
///
/// Filled either from a dynamically loaded `libmonetdbe` or from an in-process
/// implementation. Every entry returning `*mut c_char` reports failure with a
/// non-null, engine-owned message and success with null.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct MonetdbeVTable {
	/// Open a database. `url` null means in-memory.
	///
	/// # Returns
	/// - 0 on success, any other value on failure
	pub open: unsafe extern "C" fn(db: *mut DatabaseHandle, url: *const c_char, opts: *mut OptionsFFI) -> c_int,

	/// Close a database and release all of its resources
	pub close: unsafe extern "C" fn(db: DatabaseHandle) -> c_int,

	/// Message of the last failure on `db`, null if none
	pub error: unsafe extern "C" fn(db: DatabaseHandle) -> *mut c_char,

	pub get_autocommit: unsafe extern "C" fn(db: DatabaseHandle, result: *mut c_int) -> *mut c_char,

	pub set_autocommit: unsafe extern "C" fn(db: DatabaseHandle, value: c_int) -> *mut c_char,

	/// Run a query
	///
	/// # Parameters
	/// - `result`: receives a result set, null when the statement produced none
	/// - `affected_rows`: receives the number of affected rows
	pub query: unsafe extern "C" fn(
		db: DatabaseHandle,
		query: *mut c_char,
		result: *mut *mut ResultFFI,
		affected_rows: *mut i64,
	) -> *mut c_char,

	/// Fetch the descriptor of column `column_index`
	///
	/// The descriptor is owned by the result and stays valid until the result
	/// is cleaned up.
	pub result_fetch:
		unsafe extern "C" fn(mres: *mut ResultFFI, res: *mut *mut ColumnFFI, column_index: usize) -> *mut c_char,

	/// Release a result set
	///
	/// # Safety
	/// - Must be called exactly once per result set
	/// - No column descriptor of the result may be used afterwards
	pub cleanup_result: unsafe extern "C" fn(db: DatabaseHandle, result: *mut ResultFFI) -> *mut c_char,

	/// Prepare a statement
	///
	/// # Parameters
	/// - `stmt`: receives the statement
	/// - `result`: receives the description of the statement's parameters and
	///   output columns
	pub prepare: unsafe extern "C" fn(
		db: DatabaseHandle,
		query: *mut c_char,
		stmt: *mut *mut StatementFFI,
		result: *mut *mut ResultFFI,
	) -> *mut c_char,

	/// Bind the value at `data` to the 0-based parameter `parameter_nr`
	///
	/// # Safety
	/// - `data` must stay valid until the statement is executed or rebound
	pub bind: unsafe extern "C" fn(stmt: *mut StatementFFI, data: *mut c_void, parameter_nr: usize) -> *mut c_char,

	pub execute:
		unsafe extern "C" fn(stmt: *mut StatementFFI, result: *mut *mut ResultFFI, affected_rows: *mut i64) -> *mut c_char,

	/// Release a prepared statement
	///
	/// # Safety
	/// - Must be called exactly once per statement
	pub cleanup_statement: unsafe extern "C" fn(db: DatabaseHandle, stmt: *mut StatementFFI) -> *mut c_char,

	/// Address of the null sentinel for the native type tag `type_code`
	pub null: unsafe extern "C" fn(db: DatabaseHandle, type_code: c_int) -> *const c_void,
}

#[cfg(test)]
#[cfg(target_pointer_width = "64")]
mod tests {
	use core::mem::{align_of, size_of};

	use crate::{
		BlobFFI, ColumnFFI, DateFFI, OptionsFFI, ResultFFI, SqlTypeFFI, StatementFFI, TimeFFI, TimestampFFI,
		TypedColumnFFI,
	};

	#[test]
	fn test_temporal_layout() {
		assert_eq!(size_of::<DateFFI>(), 4);
		assert_eq!(align_of::<DateFFI>(), 2);
		assert_eq!(size_of::<TimeFFI>(), 8);
		assert_eq!(size_of::<TimestampFFI>(), 12);
	}

	#[test]
	fn test_blob_layout() {
		assert_eq!(size_of::<BlobFFI>(), 16);
	}

	#[test]
	fn test_column_layout() {
		assert_eq!(size_of::<SqlTypeFFI>(), 16);
		assert_eq!(size_of::<ColumnFFI>(), 48);
		assert_eq!(size_of::<TypedColumnFFI<i32>>(), 72);
		assert_eq!(size_of::<TypedColumnFFI<i128>>(), 48 + 16 + 8 + 8);
		assert_eq!(size_of::<TypedColumnFFI<TimestampFFI>>(), 48 + 12 + 4 + 8 + 8);
	}

	#[test]
	fn test_typed_column_prefix() {
		let mut cells = [1i32, 2, 3];
		let typed = TypedColumnFFI {
			type_code: 3,
			sql_type: SqlTypeFFI::empty(),
			data: cells.as_mut_ptr(),
			count: cells.len(),
			name: core::ptr::null_mut(),
			null_value: i32::MIN,
			scale: 1.0,
			is_null: None,
		};

		let column = typed.as_column();
		assert_eq!(column.type_code, 3);
		assert_eq!(column.count, 3);
		assert_eq!(column.data as *const i32, cells.as_ptr());
	}

	#[test]
	fn test_result_and_options_layout() {
		assert_eq!(size_of::<ResultFFI>(), 32);
		assert_eq!(size_of::<StatementFFI>(), 16);
		assert_eq!(size_of::<OptionsFFI>(), 40);
		assert_eq!(ResultFFI::empty().last_id, -1);
	}
}
