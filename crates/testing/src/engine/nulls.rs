// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Null sentinels of the in-process engine and the predicates recognizing them

use std::{
	ffi::{CStr, c_char, c_int, c_void},
	ptr,
};

use monetdbe_abi::{BlobFFI, DateFFI, TimeFFI, TimestampFFI};
use monetdbe_type::Type;

pub(crate) const NULL_DATE: DateFFI = DateFFI::new(i16::MIN, u8::MAX, u8::MAX);
pub(crate) const NULL_TIME: TimeFFI = TimeFFI::new(u8::MAX, u8::MAX, u8::MAX, u32::MAX);
pub(crate) const NULL_TIMESTAMP: TimestampFFI = TimestampFFI {
	date: NULL_DATE,
	time: NULL_TIME,
};
/// Strings are null when they spell the single byte 0x80
pub(crate) const NULL_STR: &CStr = c"\x80";

struct NullBlob(BlobFFI);

// SAFETY: the blob points nowhere and is never written
unsafe impl Sync for NullBlob {}

static NULL_BOOL: i8 = i8::MIN;
static NULL_INT8: i8 = i8::MIN;
static NULL_INT16: i16 = i16::MIN;
static NULL_INT32: i32 = i32::MIN;
static NULL_INT64: i64 = i64::MIN;
static NULL_INT128: i128 = i128::MIN;
static NULL_SIZE: usize = usize::MAX;
static NULL_FLOAT: f32 = f32::NAN;
static NULL_DOUBLE: f64 = f64::NAN;
static NULL_BLOB: NullBlob = NullBlob(BlobFFI::empty());
static NULL_DATE_VALUE: DateFFI = NULL_DATE;
static NULL_TIME_VALUE: TimeFFI = NULL_TIME;
static NULL_TIMESTAMP_VALUE: TimestampFFI = NULL_TIMESTAMP;

/// Address of the null value for `ty`, as handed out by `monetdbe_null`.
/// For strings this is the string itself, matching how strings are bound.
pub(crate) fn sentinel(ty: Type) -> *const c_void {
	match ty {
		Type::Bool => ptr::from_ref(&NULL_BOOL).cast(),
		Type::Int8 => ptr::from_ref(&NULL_INT8).cast(),
		Type::Int16 => ptr::from_ref(&NULL_INT16).cast(),
		Type::Int32 => ptr::from_ref(&NULL_INT32).cast(),
		Type::Int64 => ptr::from_ref(&NULL_INT64).cast(),
		Type::Int128 => ptr::from_ref(&NULL_INT128).cast(),
		Type::Size => ptr::from_ref(&NULL_SIZE).cast(),
		Type::Float => ptr::from_ref(&NULL_FLOAT).cast(),
		Type::Double => ptr::from_ref(&NULL_DOUBLE).cast(),
		Type::Str => NULL_STR.as_ptr().cast(),
		Type::Blob => ptr::from_ref(&NULL_BLOB.0).cast(),
		Type::Date => ptr::from_ref(&NULL_DATE_VALUE).cast(),
		Type::Time => ptr::from_ref(&NULL_TIME_VALUE).cast(),
		Type::Timestamp => ptr::from_ref(&NULL_TIMESTAMP_VALUE).cast(),
		Type::Unknown => ptr::null(),
	}
}

macro_rules! sentinel_predicate {
	($($name:ident: $ty:ty = $null:expr;)*) => {
		$(
			pub(crate) unsafe extern "C" fn $name(value: *const $ty) -> c_int {
				// SAFETY: the caller passes a cell of the column
				(unsafe { *value } == $null) as c_int
			}
		)*
	};
}

sentinel_predicate! {
	is_null_bool: i8 = NULL_BOOL;
	is_null_int8: i8 = NULL_INT8;
	is_null_int16: i16 = NULL_INT16;
	is_null_int32: i32 = NULL_INT32;
	is_null_int64: i64 = NULL_INT64;
	is_null_int128: i128 = NULL_INT128;
	is_null_size: usize = NULL_SIZE;
	is_null_date: DateFFI = NULL_DATE;
	is_null_time: TimeFFI = NULL_TIME;
	is_null_timestamp: TimestampFFI = NULL_TIMESTAMP;
}

pub(crate) unsafe extern "C" fn is_null_float(value: *const f32) -> c_int {
	// SAFETY: the caller passes a cell of the column
	unsafe { *value }.is_nan() as c_int
}

pub(crate) unsafe extern "C" fn is_null_double(value: *const f64) -> c_int {
	// SAFETY: the caller passes a cell of the column
	unsafe { *value }.is_nan() as c_int
}

pub(crate) unsafe extern "C" fn is_null_str(value: *const *mut c_char) -> c_int {
	// SAFETY: the caller passes a cell of the column
	unsafe { *value }.is_null() as c_int
}

pub(crate) unsafe extern "C" fn is_null_blob(value: *const BlobFFI) -> c_int {
	// SAFETY: the caller passes a cell of the column
	unsafe { (*value).data }.is_null() as c_int
}

/// Whether a bound string is the engine's null string
///
/// # Safety
/// `value` must be a NUL-terminated string.
pub(crate) unsafe fn is_null_string(value: *const c_char) -> bool {
	// SAFETY: guaranteed by the caller
	value == NULL_STR.as_ptr() || unsafe { CStr::from_ptr(value) } == NULL_STR
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_predicates_match_sentinels() {
		unsafe {
			assert_eq!(is_null_int32(sentinel(Type::Int32).cast()), 1);
			assert_eq!(is_null_int32(&5), 0);
			assert_eq!(is_null_double(sentinel(Type::Double).cast()), 1);
			assert_eq!(is_null_date(sentinel(Type::Date).cast()), 1);
			assert_eq!(is_null_date(&DateFFI::new(2024, 1, 1)), 0);
			assert_eq!(is_null_blob(sentinel(Type::Blob).cast()), 1);
			assert!(is_null_string(sentinel(Type::Str).cast()));
			assert!(!is_null_string(c"x".as_ptr()));
		}
	}

	#[test]
	fn test_unknown_has_no_sentinel() {
		assert!(sentinel(Type::Unknown).is_null());
	}
}
