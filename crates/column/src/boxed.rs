// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CStr, c_char},
	slice,
};

use monetdbe_abi::{BlobFFI, DateFFI, TimeFFI, TimestampFFI, TypedColumnFFI};
use monetdbe_type::{Blob, Date, DateTime, Time};
use tracing::trace;

use crate::validate;

/// Convert every row of `column` with `convert`, yielding `None` for rows the
/// null predicate reports as NULL. A column without a buffer yields `count`
/// nulls.
///
/// # Safety
/// `column` must point to a live descriptor whose `data` is null or holds
/// `count` initialised cells of `T`.
unsafe fn collect<T, V>(column: *const TypedColumnFFI<T>, mut convert: impl FnMut(&T) -> Option<V>) -> Vec<Option<V>> {
	// SAFETY: guaranteed by the caller
	let column = unsafe { &*column };
	if column.data.is_null() {
		return (0..column.count).map(|_| None).collect();
	}
	if column.count == 0 {
		return Vec::new();
	}
	// SAFETY: data holds count cells
	let cells = unsafe { slice::from_raw_parts(column.data as *const T, column.count) };

	cells.iter()
		.map(|cell| {
			let null = match column.is_null {
				// SAFETY: cell is an initialised cell of this column
				Some(is_null) => (unsafe { is_null(cell) }) != 0,
				None => false,
			};
			if null {
				None
			} else {
				convert(cell)
			}
		})
		.collect()
}

/// # Safety
/// See [`collect`]; every non-null cell must be a NUL-terminated string.
pub(crate) unsafe fn strings(column: *const TypedColumnFFI<*mut c_char>) -> Vec<Option<String>> {
	unsafe {
		collect(column, |cell| {
			if cell.is_null() {
				return None;
			}
			Some(CStr::from_ptr(*cell).to_string_lossy().into_owned())
		})
	}
}

/// # Safety
/// See [`collect`]; every non-null cell must point to `size` readable bytes.
pub(crate) unsafe fn blobs(column: *const TypedColumnFFI<BlobFFI>) -> Vec<Option<Blob>> {
	unsafe {
		collect(column, |cell| {
			if cell.data.is_null() {
				return (cell.size == 0).then(Blob::default);
			}
			Some(Blob::from_slice(slice::from_raw_parts(cell.data as *const u8, cell.size)))
		})
	}
}

/// # Safety
/// See [`collect`].
pub(crate) unsafe fn dates(column: *const TypedColumnFFI<DateFFI>) -> Vec<Option<Date>> {
	unsafe {
		collect(column, |cell| {
			let date = validate::date(cell);
			if date.is_none() {
				trace!(?cell, "invalid date read as null");
			}
			date
		})
	}
}

/// # Safety
/// See [`collect`].
pub(crate) unsafe fn times(column: *const TypedColumnFFI<TimeFFI>) -> Vec<Option<Time>> {
	unsafe {
		collect(column, |cell| {
			let time = validate::time(cell);
			if time.is_none() {
				trace!(?cell, "invalid time read as null");
			}
			time
		})
	}
}

/// # Safety
/// See [`collect`].
pub(crate) unsafe fn timestamps(column: *const TypedColumnFFI<TimestampFFI>) -> Vec<Option<DateTime>> {
	unsafe {
		collect(column, |cell| {
			let timestamp = validate::timestamp(cell);
			if timestamp.is_none() {
				trace!(?cell, "invalid timestamp read as null");
			}
			timestamp
		})
	}
}

#[cfg(test)]
mod tests {
	use std::{
		ffi::{CString, c_int},
		ptr::null_mut,
	};

	use monetdbe_abi::SqlTypeFFI;

	use super::*;

	fn column<T>(cells: &mut [T], null_value: T, is_null: Option<unsafe extern "C" fn(*const T) -> c_int>) -> TypedColumnFFI<T> {
		TypedColumnFFI {
			type_code: 0,
			sql_type: SqlTypeFFI::empty(),
			data: cells.as_mut_ptr(),
			count: cells.len(),
			name: null_mut(),
			null_value,
			scale: 1.0,
			is_null,
		}
	}

	unsafe extern "C" fn str_is_null(value: *const *mut c_char) -> c_int {
		unsafe { *value }.is_null() as c_int
	}

	unsafe extern "C" fn blob_is_null(value: *const BlobFFI) -> c_int {
		unsafe { (*value).data }.is_null() as c_int
	}

	unsafe extern "C" fn date_is_null(value: *const DateFFI) -> c_int {
		(unsafe { *value } == DateFFI::new(i16::MIN, 0, 0)) as c_int
	}

	unsafe extern "C" fn time_is_null(value: *const TimeFFI) -> c_int {
		(unsafe { *value }.hours == u8::MAX) as c_int
	}

	unsafe extern "C" fn timestamp_is_null(value: *const TimestampFFI) -> c_int {
		(unsafe { *value }.date.year == i16::MIN) as c_int
	}

	#[test]
	fn test_strings() {
		let x = CString::new("x").unwrap();
		let utf8 = CString::new("héllo").unwrap();
		let mut cells = [x.as_ptr() as *mut c_char, null_mut(), utf8.as_ptr() as *mut c_char];
		let column = column(&mut cells, null_mut(), Some(str_is_null));

		let values = unsafe { strings(&column) };
		assert_eq!(values, vec![Some("x".to_string()), None, Some("héllo".to_string())]);
	}

	#[test]
	fn test_strings_without_predicate() {
		let mut cells: [*mut c_char; 1] = [null_mut()];
		let column = column(&mut cells, null_mut(), None);

		assert_eq!(unsafe { strings(&column) }, vec![None]);
	}

	#[test]
	fn test_missing_buffer_reads_null_rows() {
		let mut column = column::<*mut c_char>(&mut [], null_mut(), Some(str_is_null));
		column.count = 3;
		column.data = null_mut();

		assert_eq!(unsafe { strings(&column) }, vec![None, None, None]);
	}

	#[test]
	fn test_blobs() {
		let bytes = [1u8, 2, 3];
		let mut cells = [BlobFFI::borrowed(&bytes), BlobFFI::empty(), BlobFFI::borrowed(&[])];
		let column = column(&mut cells, BlobFFI::empty(), Some(blob_is_null));

		let values = unsafe { blobs(&column) };
		assert_eq!(values.len(), 3);
		assert_eq!(values[0], Some(Blob::new(vec![1, 2, 3])));
		assert_eq!(values[1], None);
		assert_eq!(values[2], Some(Blob::default()));
	}

	#[test]
	fn test_dates() {
		let mut cells = [DateFFI::new(2024, 2, 29), DateFFI::new(0, 1, 1), DateFFI::new(i16::MIN, 0, 0)];
		let column = column(&mut cells, DateFFI::new(i16::MIN, 0, 0), Some(date_is_null));

		let values = unsafe { dates(&column) };
		assert_eq!(values, vec![Date::new(2024, 2, 29), None, None]);
	}

	#[test]
	fn test_times() {
		let null = TimeFFI::new(u8::MAX, 0, 0, 0);
		let mut cells = [TimeFFI::new(23, 59, 59, 999), TimeFFI::new(24, 0, 0, 0), null];
		let column = column(&mut cells, null, Some(time_is_null));

		let values = unsafe { times(&column) };
		assert_eq!(values, vec![Time::new(23, 59, 59, 999_000_000), None, None]);
	}

	#[test]
	fn test_timestamps() {
		let null = TimestampFFI {
			date: DateFFI::new(i16::MIN, 0, 0),
			time: TimeFFI::default(),
		};
		let valid = TimestampFFI {
			date: DateFFI::new(2021, 6, 1),
			time: TimeFFI::new(12, 0, 0, 5),
		};
		let invalid = TimestampFFI {
			date: DateFFI::new(2021, 13, 1),
			time: TimeFFI::new(12, 0, 0, 5),
		};
		let mut cells = [valid, invalid, null];
		let column = column(&mut cells, null, Some(timestamp_is_null));

		let values = unsafe { timestamps(&column) };
		assert_eq!(values.len(), 3);
		let first = values[0].unwrap();
		assert_eq!(first.date(), Date::new(2021, 6, 1).unwrap());
		assert_eq!(first.time().nanosecond(), 5_000_000);
		assert_eq!(values[1], None);
		assert_eq!(values[2], None);
	}
}
