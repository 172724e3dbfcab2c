// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CStr, c_char, c_int, c_void},
	ptr,
	slice::from_raw_parts,
};

use monetdbe_abi::{BlobFFI, DateFFI, StatementFFI, TimeFFI, TimestampFFI};
use monetdbe_type::{Blob, Date, DateTime, NativeLayout, Time, Type, Value, decimal};

use super::{
	database::FakeDatabase,
	nulls::{self, NULL_DATE, NULL_TIME, NULL_TIMESTAMP},
	result::{FakeResult, OutputColumn},
	schema::SqlType,
	sql::Statement,
};

/// Prepared statement handed out as `*mut StatementFFI`
#[repr(C)]
pub(crate) struct FakeStatement {
	header: StatementFFI,
	pub(crate) db: *mut FakeDatabase,
	pub(crate) statement: Statement,
	parameters: Vec<SqlType>,
	_type_codes: Vec<c_int>,
	bound: Vec<Option<Value>>,
}

impl FakeStatement {
	pub(crate) fn new(
		db: *mut FakeDatabase,
		layout: NativeLayout,
		statement: Statement,
		parameters: Vec<SqlType>,
	) -> Result<Box<Self>, String> {
		let mut type_codes = parameters
			.iter()
			.map(|p| layout.encode(p.ty).map_err(|e| e.to_string()))
			.collect::<Result<Vec<c_int>, String>>()?;
		Ok(Box::new(Self {
			header: StatementFFI {
				nparam: parameters.len() as i64,
				type_codes: type_codes.as_mut_ptr(),
			},
			db,
			statement,
			bound: vec![None; parameters.len()],
			parameters,
			_type_codes: type_codes,
		}))
	}

	pub(crate) fn into_raw(self: Box<Self>) -> *mut StatementFFI {
		Box::into_raw(self).cast()
	}

	/// # Safety
	/// `statement` must come from [`FakeStatement::into_raw`] and not be used afterwards.
	pub(crate) unsafe fn from_raw(statement: *mut StatementFFI) -> Box<Self> {
		// SAFETY: guaranteed by the caller
		unsafe { Box::from_raw(statement.cast()) }
	}

	/// Copy the value at `data` into parameter `index`
	///
	/// # Safety
	/// `data` must point to a value of the parameter's native representation.
	pub(crate) unsafe fn bind(&mut self, data: *const c_void, index: usize) -> Result<(), String> {
		let ty = self.parameters.get(index).ok_or_else(|| {
			format!("monetdbe_bind: parameter number {} is out of range, the statement has {}", index, self.parameters.len())
		})?;
		if data.is_null() {
			return Err("monetdbe_bind: no data for the parameter".to_string());
		}
		// SAFETY: guaranteed by the caller
		let value = unsafe { read_bound(ty, data) }?;
		self.bound[index] = Some(value);
		Ok(())
	}

	/// Bound values in order, failing on the first unbound parameter
	pub(crate) fn bound(&self) -> Result<Vec<Value>, String> {
		self.bound
			.iter()
			.enumerate()
			.map(|(i, value)| value.clone().ok_or_else(|| format!("monetdbe_execute: parameter {} is not bound", i)))
			.collect()
	}
}

/// Description of a prepared statement: one row per output column followed
/// by one row per parameter, the latter without a column name
pub(crate) fn description(
	layout: NativeLayout,
	table: &str,
	outputs: &[OutputColumn],
	parameters: &[SqlType],
) -> Result<Box<FakeResult>, String> {
	let varchar = SqlType::new("varchar", Type::Str, 0, 0);
	let int = SqlType::new("int", Type::Int32, 32, 0);
	let columns = [
		("type", &varchar),
		("digits", &int),
		("scale", &int),
		("schema", &varchar),
		("table", &varchar),
		("column", &varchar),
		("impl", &varchar),
	]
	.map(|(name, ty)| OutputColumn {
		name: name.to_string(),
		ty: ty.clone(),
	});

	let row = |ty: &SqlType, owner: Option<(&str, &str)>| {
		vec![
			Value::Str(ty.name.clone()),
			Value::Int32(ty.digits as i32),
			Value::Int32(ty.scale as i32),
			owner.map_or(Value::Null, |_| Value::Str("sys".to_string())),
			owner.map_or(Value::Null, |(table, _)| Value::Str(table.to_string())),
			owner.map_or(Value::Null, |(_, column)| Value::Str(column.to_string())),
			Value::Str(ty.ty.gdk_name().to_string()),
		]
	};
	let rows: Vec<Vec<Value>> = outputs
		.iter()
		.map(|output| row(&output.ty, Some((table, output.name.as_str()))))
		.chain(parameters.iter().map(|ty| row(ty, None)))
		.collect();
	FakeResult::new(layout, "prepare", &columns, &rows)
}

/// # Safety
/// `data` must point to a value of `ty`'s native representation; strings are
/// passed as the string pointer itself.
unsafe fn read_bound(ty: &SqlType, data: *const c_void) -> Result<Value, String> {
	// SAFETY: guaranteed by the caller for every arm
	let value = unsafe {
		match ty.ty {
			Type::Bool => {
				let v = ptr::read_unaligned(data.cast::<i8>());
				if v == i8::MIN {
					Value::Null
				} else {
					Value::Bool(v != 0)
				}
			}
			Type::Int8 => integer(ptr::read_unaligned(data.cast::<i8>()), i8::MIN),
			Type::Int16 => integer(ptr::read_unaligned(data.cast::<i16>()), i16::MIN),
			Type::Int32 => integer(ptr::read_unaligned(data.cast::<i32>()), i32::MIN),
			Type::Int64 => integer(ptr::read_unaligned(data.cast::<i64>()), i64::MIN),
			Type::Int128 => integer(ptr::read_unaligned(data.cast::<i128>()), i128::MIN),
			Type::Size => {
				let v = ptr::read_unaligned(data.cast::<usize>());
				if v == usize::MAX {
					Value::Null
				} else {
					Value::Size(v)
				}
			}
			Type::Float => {
				let v = ptr::read_unaligned(data.cast::<f32>());
				if v.is_nan() {
					Value::Null
				} else {
					Value::Float(v)
				}
			}
			Type::Double => {
				let v = ptr::read_unaligned(data.cast::<f64>());
				if v.is_nan() {
					Value::Null
				} else {
					Value::Double(v)
				}
			}
			Type::Str => {
				let text = data.cast::<c_char>();
				if nulls::is_null_string(text) {
					Value::Null
				} else {
					Value::Str(CStr::from_ptr(text).to_string_lossy().into_owned())
				}
			}
			Type::Blob => {
				let blob = ptr::read_unaligned(data.cast::<BlobFFI>());
				if blob.data.is_null() {
					Value::Null
				} else {
					Value::Blob(Blob::from_slice(from_raw_parts(blob.data.cast::<u8>(), blob.size)))
				}
			}
			Type::Date => date(ptr::read_unaligned(data.cast::<DateFFI>()))?,
			Type::Time => time(ptr::read_unaligned(data.cast::<TimeFFI>()))?,
			Type::Timestamp => {
				let ts = ptr::read_unaligned(data.cast::<TimestampFFI>());
				if ts == NULL_TIMESTAMP {
					Value::Null
				} else {
					match (date(ts.date)?, time(ts.time)?) {
						(Value::Date(d), Value::Time(t)) => Value::Timestamp(DateTime::new(d, t)),
						_ => return Err("22007!invalid timestamp".to_string()),
					}
				}
			}
			Type::Unknown => return Err("monetdbe_bind: parameter type is unknown".to_string()),
		}
	};
	// decimal parameters arrive as unscaled integers
	Ok(match value {
		Value::Null => Value::Null,
		value if ty.is_decimal() => match value.as_i128() {
			Some(unscaled) => Value::Decimal(decimal::from_unscaled(unscaled, ty.scale)),
			None => value,
		},
		value => value,
	})
}

fn integer<T: PartialEq + Into<i128>>(value: T, null: T) -> Value {
	if value == null {
		return Value::Null;
	}
	Value::Int128(value.into())
}

fn date(value: DateFFI) -> Result<Value, String> {
	if value == NULL_DATE {
		return Ok(Value::Null);
	}
	Date::new(value.year as i32, value.month as u32, value.day as u32)
		.map(Value::Date)
		.ok_or_else(|| format!("22007!date {}-{}-{} is invalid", value.year, value.month, value.day))
}

fn time(value: TimeFFI) -> Result<Value, String> {
	if value == NULL_TIME {
		return Ok(Value::Null);
	}
	Time::from_hms_milli(value.hours as u32, value.minutes as u32, value.seconds as u32, value.ms)
		.map(Value::Time)
		.ok_or_else(|| format!("22007!time {}:{}:{}.{} is invalid", value.hours, value.minutes, value.seconds, value.ms))
}
