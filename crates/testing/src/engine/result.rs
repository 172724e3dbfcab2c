// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	any::Any,
	ffi::{CString, c_char, c_int},
	fmt,
	ptr::{self, NonNull},
};

use monetdbe_abi::{BlobFFI, ColumnFFI, IsNullFn, ResultFFI, SqlTypeFFI, TimestampFFI, TypedColumnFFI};
use monetdbe_type::{NativeLayout, Type, Value, decimal};

use super::{
	nulls::{self, NULL_DATE, NULL_STR, NULL_TIME, NULL_TIMESTAMP},
	schema::SqlType,
};

/// Name and declared type of a result column
#[derive(Clone, Debug)]
pub(crate) struct OutputColumn {
	pub name: String,
	pub ty: SqlType,
}

/// Result set handed out as `*mut ResultFFI`; the header comes first so the
/// two pointers are interchangeable
#[repr(C)]
pub(crate) struct FakeResult {
	header: ResultFFI,
	columns: Vec<FakeColumn>,
	name: CString,
	last_error: Option<CString>,
}

impl fmt::Debug for FakeResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FakeResult")
			.field("name", &self.name)
			.field("rows", &self.header.nrows)
			.field("columns", &self.header.ncols)
			.finish_non_exhaustive()
	}
}

impl FakeResult {
	pub(crate) fn new(
		layout: NativeLayout,
		name: &str,
		columns: &[OutputColumn],
		rows: &[Vec<Value>],
	) -> Result<Box<Self>, String> {
		let name = CString::new(name).map_err(|e| e.to_string())?;
		let columns = columns
			.iter()
			.enumerate()
			.map(|(index, column)| FakeColumn::new(layout, column, rows.iter().map(|row| &row[index])))
			.collect::<Result<Vec<_>, String>>()?;
		Ok(Box::new(Self {
			header: ResultFFI {
				nrows: rows.len() as i64,
				ncols: columns.len(),
				name: name.as_ptr() as *mut c_char,
				last_id: -1,
			},
			columns,
			name,
			last_error: None,
		}))
	}

	/// Result without columns, reported for schema statements
	pub(crate) fn empty() -> Box<Self> {
		Box::new(Self {
			header: ResultFFI::empty(),
			columns: Vec::new(),
			name: CString::default(),
			last_error: None,
		})
	}

	pub(crate) fn into_raw(self: Box<Self>) -> *mut ResultFFI {
		Box::into_raw(self).cast()
	}

	/// # Safety
	/// `result` must come from [`FakeResult::into_raw`] and not be used afterwards.
	pub(crate) unsafe fn from_raw(result: *mut ResultFFI) -> Box<Self> {
		// SAFETY: guaranteed by the caller
		unsafe { Box::from_raw(result.cast()) }
	}

	/// Record a failure; the message lives as long as the result
	pub(crate) fn fail(&mut self, message: String) -> *mut c_char {
		let message = CString::new(message).unwrap_or_default();
		self.last_error.insert(message).as_ptr() as *mut c_char
	}

	pub(crate) fn row_count(&self) -> i64 {
		self.header.nrows
	}

	pub(crate) fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub(crate) fn column(&self, index: usize) -> Option<*mut ColumnFFI> {
		self.columns.get(index).map(|column| column.descriptor.as_ptr())
	}
}

/// Typed column descriptor plus the storage its pointers refer to
struct FakeColumn {
	descriptor: NonNull<ColumnFFI>,
	release: unsafe fn(NonNull<ColumnFFI>),
	_storage: Box<dyn Any>,
}

impl Drop for FakeColumn {
	fn drop(&mut self) {
		// SAFETY: the descriptor was leaked by `typed` for this release function
		unsafe { (self.release)(self.descriptor) }
	}
}

unsafe fn release<T>(descriptor: NonNull<ColumnFFI>) {
	// SAFETY: allocated as a boxed TypedColumnFFI<T> in `typed`
	drop(unsafe { Box::from_raw(descriptor.cast::<TypedColumnFFI<T>>().as_ptr()) });
}

struct Cells<T> {
	values: Vec<T>,
	null_value: T,
	is_null: IsNullFn<T>,
}

impl FakeColumn {
	fn new<'a>(
		layout: NativeLayout,
		column: &OutputColumn,
		cells: impl Iterator<Item = &'a Value>,
	) -> Result<Self, String> {
		let ty = &column.ty;
		ty.check_layout(layout)?;
		let code = layout.encode(ty.ty).map_err(|e| e.to_string())?;
		let name = CString::new(column.name.as_str()).map_err(|e| e.to_string())?;
		let sql_type = SqlTypeFFI {
			name: ptr::null_mut(),
			scale: ty.scale,
			digits: ty.digits,
		};
		let integer = |value: &Value| -> Option<i128> {
			match value {
				Value::Decimal(d) => decimal::to_unscaled(d, ty.scale),
				other => other.as_i128(),
			}
		};

		let column = match ty.ty {
			Type::Bool => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(i8::MIN, |v| v as i8)).collect(),
				null_value: i8::MIN,
				is_null: nulls::is_null_bool,
			}, ()),
			Type::Int8 => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(i8::MIN, |v| v as i8)).collect(),
				null_value: i8::MIN,
				is_null: nulls::is_null_int8,
			}, ()),
			Type::Int16 => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(i16::MIN, |v| v as i16)).collect(),
				null_value: i16::MIN,
				is_null: nulls::is_null_int16,
			}, ()),
			Type::Int32 => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(i32::MIN, |v| v as i32)).collect(),
				null_value: i32::MIN,
				is_null: nulls::is_null_int32,
			}, ()),
			Type::Int64 => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(i64::MIN, |v| v as i64)).collect(),
				null_value: i64::MIN,
				is_null: nulls::is_null_int64,
			}, ()),
			Type::Int128 => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).unwrap_or(i128::MIN)).collect(),
				null_value: i128::MIN,
				is_null: nulls::is_null_int128,
			}, ()),
			Type::Size => typed(code, sql_type, name, Cells {
				values: cells.map(|v| integer(v).map_or(usize::MAX, |v| v as usize)).collect(),
				null_value: usize::MAX,
				is_null: nulls::is_null_size,
			}, ()),
			Type::Float => typed(code, sql_type, name, Cells {
				values: cells.map(|v| v.as_f64().map_or(f32::NAN, |v| v as f32)).collect(),
				null_value: f32::NAN,
				is_null: nulls::is_null_float,
			}, ()),
			Type::Double => typed(code, sql_type, name, Cells {
				values: cells.map(|v| v.as_f64().unwrap_or(f64::NAN)).collect(),
				null_value: f64::NAN,
				is_null: nulls::is_null_double,
			}, ()),
			Type::Str => {
				let owned = cells
					.map(|v| match v {
						Value::Null => Ok(None),
						other => CString::new(other.to_string()).map(Some).map_err(|e| e.to_string()),
					})
					.collect::<Result<Vec<_>, String>>()?;
				let values = owned
					.iter()
					.map(|s| s.as_ref().map_or(ptr::null_mut(), |s| s.as_ptr() as *mut c_char))
					.collect();
				typed(code, sql_type, name, Cells {
					values,
					null_value: NULL_STR.as_ptr() as *mut c_char,
					is_null: nulls::is_null_str,
				}, owned)
			}
			Type::Blob => {
				let owned: Vec<Option<Vec<u8>>> = cells
					.map(|v| match v {
						Value::Blob(b) => Some(b.as_bytes().to_vec()),
						_ => None,
					})
					.collect();
				let values = owned.iter().map(|b| b.as_deref().map_or(BlobFFI::empty(), BlobFFI::borrowed)).collect();
				typed(code, sql_type, name, Cells {
					values,
					null_value: BlobFFI::empty(),
					is_null: nulls::is_null_blob,
				}, owned)
			}
			Type::Date => typed(code, sql_type, name, Cells {
				values: cells
					.map(|v| match v {
						Value::Date(d) => d.to_ffi().unwrap_or(NULL_DATE),
						_ => NULL_DATE,
					})
					.collect(),
				null_value: NULL_DATE,
				is_null: nulls::is_null_date,
			}, ()),
			Type::Time => typed(code, sql_type, name, Cells {
				values: cells
					.map(|v| match v {
						Value::Time(t) => t.to_ffi(),
						_ => NULL_TIME,
					})
					.collect(),
				null_value: NULL_TIME,
				is_null: nulls::is_null_time,
			}, ()),
			Type::Timestamp => typed(code, sql_type, name, Cells {
				values: cells
					.map(|v| match v {
						Value::Timestamp(ts) => ts.to_ffi().unwrap_or(NULL_TIMESTAMP),
						_ => NULL_TIMESTAMP,
					})
					.collect::<Vec<TimestampFFI>>(),
				null_value: NULL_TIMESTAMP,
				is_null: nulls::is_null_timestamp,
			}, ()),
			Type::Unknown => return Err(format!("42000!type {} cannot be returned", ty.name)),
		};
		Ok(column)
	}
}

fn typed<T: 'static, K: 'static>(code: c_int, sql_type: SqlTypeFFI, name: CString, cells: Cells<T>, keep: K) -> FakeColumn {
	let mut values = cells.values;
	let scale = 10f64.powi(sql_type.scale as i32);
	let descriptor = Box::new(TypedColumnFFI {
		type_code: code,
		sql_type,
		data: values.as_mut_ptr(),
		count: values.len(),
		name: name.as_ptr() as *mut c_char,
		null_value: cells.null_value,
		scale,
		is_null: Some(cells.is_null),
	});
	FakeColumn {
		// SAFETY: Box::into_raw never returns null
		descriptor: unsafe { NonNull::new_unchecked(Box::into_raw(descriptor)) }.cast(),
		release: release::<T>,
		_storage: Box::new((values, name, keep)),
	}
}

#[cfg(test)]
mod tests {
	use std::ffi::CStr;

	use super::*;

	fn output(name: &str, ty: SqlType) -> OutputColumn {
		OutputColumn {
			name: name.to_string(),
			ty,
		}
	}

	#[test]
	fn test_result_header_and_columns() {
		let columns = [
			output("n", SqlType::new("int", Type::Int32, 32, 0)),
			output("s", SqlType::new("varchar", Type::Str, 0, 0)),
		];
		let rows = vec![vec![Value::Int32(7), Value::Str("a".into())], vec![Value::Null, Value::Null]];
		let result = FakeResult::new(NativeLayout::WITH_INT128, "t", &columns, &rows).unwrap();
		let raw = result.into_raw();
		unsafe {
			assert_eq!((*raw).nrows, 2);
			assert_eq!((*raw).ncols, 2);
			assert_eq!(CStr::from_ptr((*raw).name).to_str().unwrap(), "t");

			let result = FakeResult::from_raw(raw);
			let ints = &*(result.column(0).unwrap() as *const TypedColumnFFI<i32>);
			assert_eq!(ints.type_code, 3);
			assert_eq!(std::slice::from_raw_parts(ints.data, 2), &[7, i32::MIN]);

			let strs = &*(result.column(1).unwrap() as *const TypedColumnFFI<*mut c_char>);
			assert_eq!(strs.type_code, 9);
			assert_eq!(CStr::from_ptr(*strs.data).to_str().unwrap(), "a");
			assert!((*strs.data.add(1)).is_null());
			assert!(result.column(2).is_none());
		}
	}

	#[test]
	fn test_tags_follow_layout() {
		let columns = [output("s", SqlType::new("varchar", Type::Str, 0, 0))];
		let result = FakeResult::new(NativeLayout::WITHOUT_INT128, "t", &columns, &[]).unwrap();
		let column = unsafe { &*result.column(0).unwrap() };
		assert_eq!(column.type_code, 8);
		assert_eq!(column.count, 0);
	}

	#[test]
	fn test_decimal_cells_are_unscaled() {
		let columns = [output("p", SqlType::new("decimal", Type::Int64, 10, 2))];
		let rows = vec![vec![Value::Decimal("19.99".parse().unwrap())]];
		let result = FakeResult::new(NativeLayout::WITH_INT128, "t", &columns, &rows).unwrap();
		let column = unsafe { &*(result.column(0).unwrap() as *const TypedColumnFFI<i64>) };
		assert_eq!(column.sql_type.scale, 2);
		assert_eq!(unsafe { *column.data }, 1999);
	}
}
