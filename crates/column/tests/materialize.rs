// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Integration tests for materializing whole result sets

use std::{
	ffi::{CString, c_char, c_int},
	ptr::{NonNull, null_mut},
};

use monetdbe_abi::{ColumnFFI, SqlTypeFFI, TypedColumnFFI};
use monetdbe_column::{BoxedData, Columns, FixedData};
use monetdbe_type::{Error, NativeLayout, Result, Type, Value};

unsafe extern "C" fn int64_is_null(value: *const i64) -> c_int {
	(unsafe { *value } == i64::MIN) as c_int
}

unsafe extern "C" fn str_is_null(value: *const *mut c_char) -> c_int {
	unsafe { *value }.is_null() as c_int
}

fn typed<T>(code: c_int, name: &CString, cells: &mut [T], null_value: T, scale: u32) -> TypedColumnFFI<T> {
	TypedColumnFFI {
		type_code: code,
		sql_type: SqlTypeFFI {
			name: null_mut(),
			scale,
			digits: 18,
		},
		data: cells.as_mut_ptr(),
		count: cells.len(),
		name: name.as_ptr() as *mut c_char,
		null_value,
		scale: 10f64.powi(scale as i32),
		is_null: None,
	}
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}

#[test]
fn test_materialize_mixed_columns() -> Result<()> {
	init_tracing();
	let id = CString::new("id").unwrap();
	let price = CString::new("price").unwrap();
	let label = CString::new("label").unwrap();
	let x = CString::new("x").unwrap();

	let mut ids = [1i64, 2, i64::MIN];
	let mut prices = [1999i64, i64::MIN, 5];
	let mut labels = [x.as_ptr() as *mut c_char, null_mut(), x.as_ptr() as *mut c_char];

	let mut id_column = typed(4, &id, &mut ids, i64::MIN, 0);
	id_column.is_null = Some(int64_is_null);
	let mut price_column = typed(4, &price, &mut prices, i64::MIN, 2);
	price_column.is_null = Some(int64_is_null);
	// str is tag 8 without 128-bit integers
	let mut label_column = typed(8, &label, &mut labels, null_mut(), 0);
	label_column.is_null = Some(str_is_null);

	let descriptors: [NonNull<ColumnFFI>; 3] = [
		NonNull::from(&mut id_column).cast(),
		NonNull::from(&mut price_column).cast(),
		NonNull::from(&mut label_column).cast(),
	];

	let columns = unsafe { Columns::materialize(3, 3, NativeLayout::WITHOUT_INT128, |i| Ok(descriptors[i])) }?;

	assert_eq!(columns.len(), 3);
	assert_eq!(columns.row_count(), 3);
	assert_eq!(columns[0].name, "id");
	assert_eq!(columns[2].ty, Type::Str);

	// plain integer column: null reads as zero, no mask
	let id = columns.by_name("id")?;
	assert_eq!(id.as_fixed().unwrap().data, FixedData::Int64(&[1, 2, 0]));
	assert_eq!(id.as_fixed().unwrap().nulls, None);

	// decimal column: null recorded in the mask
	let price = columns.by_name("price")?;
	assert_eq!(price.as_fixed().unwrap().nulls, Some(vec![false, true, false]));
	assert_eq!(price.value(0)?.to_string(), "19.99");
	assert_eq!(price.value(1)?, Value::Null);

	assert_eq!(
		columns.by_name("label")?.as_boxed(),
		Some(&BoxedData::Str(vec![Some("x".to_string()), None, Some("x".to_string())]))
	);
	assert_eq!(columns.row(1)?, vec![Value::Int64(2), Value::Null, Value::Null]);
	Ok(())
}

#[test]
fn test_unmapped_type_discards_all_columns() {
	init_tracing();
	let a = CString::new("a").unwrap();
	let b = CString::new("b").unwrap();

	let mut first = [i64::MIN];
	let mut second = [0i64];
	let mut first_column = typed(4, &a, &mut first, i64::MIN, 0);
	first_column.is_null = Some(int64_is_null);
	let mut second_column = typed(14, &b, &mut second, 0, 0);

	let descriptors: [NonNull<ColumnFFI>; 2] =
		[NonNull::from(&mut first_column).cast(), NonNull::from(&mut second_column).cast()];

	let result = unsafe { Columns::materialize(2, 1, NativeLayout::WITH_INT128, |i| Ok(descriptors[i])) };
	assert!(matches!(
		result,
		Err(Error::UnsupportedType {
			column: 1,
			code: 14
		})
	));
	// the first column was already rewritten before the failure
	assert_eq!(first, [0]);
}

#[test]
fn test_fetch_failure_stops() {
	let mut calls = 0;
	let result = unsafe {
		Columns::materialize(3, 0, NativeLayout::WITH_INT128, |_| {
			calls += 1;
			Err(Error::native("monetdbe_result_fetch", "no such column"))
		})
	};
	assert_eq!(result.unwrap_err().to_string(), "no such column");
	assert_eq!(calls, 1);
}

#[test]
fn test_truncate_to_max_rows() -> Result<()> {
	let n = CString::new("n").unwrap();
	let mut cells = [10i64, 20, 30];
	let mut column = typed(4, &n, &mut cells, i64::MIN, 0);
	let descriptor: NonNull<ColumnFFI> = NonNull::from(&mut column).cast();

	let mut columns = unsafe { Columns::materialize(1, 3, NativeLayout::WITH_INT128, |_| Ok(descriptor)) }?;
	columns.truncate(2);

	assert_eq!(columns.row_count(), 2);
	assert_eq!(columns[0].len(), 2);
	assert_eq!(columns[0].as_fixed().unwrap().data.bytes().len(), 16);
	assert!(matches!(columns.value(2, 0), Err(Error::RowOutOfBounds { .. })));
	Ok(())
}
