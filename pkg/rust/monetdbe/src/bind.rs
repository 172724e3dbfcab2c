// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Owned native buffers for bound statement parameters

use std::{
	ffi::{CString, c_void},
	ptr::{self, NonNull},
};

use bigdecimal::BigDecimal;
use monetdbe_abi::{BlobFFI, DateFFI, TimeFFI, TimestampFFI};
use monetdbe_type::{Error, Result, Type, Value, decimal};

/// A parameter value in the representation `monetdbe_bind` reads
#[derive(Debug)]
pub(crate) enum Bound {
	Int8(i8),
	Int16(i16),
	Int32(i32),
	Int64(i64),
	Int128(i128),
	Size(usize),
	Float(f32),
	Double(f64),
	/// Bound as the string pointer itself
	Str(CString),
	/// `ffi` points into `_bytes`, which only keeps them alive
	Blob {
		_bytes: Vec<u8>,
		ffi: BlobFFI,
	},
	Date(DateFFI),
	Time(TimeFFI),
	Timestamp(TimestampFFI),
	/// The engine's null sentinel, owned by the engine
	Null(NonNull<c_void>),
}

impl Bound {
	pub(crate) fn blob(bytes: Vec<u8>) -> Self {
		let ffi = BlobFFI::borrowed(&bytes);
		Bound::Blob {
			_bytes: bytes,
			ffi,
		}
	}

	/// Address handed to the engine; valid while `self` is neither moved
	/// nor dropped, except for strings and blobs whose bytes live on the heap
	pub(crate) fn as_ptr(&self) -> *const c_void {
		match self {
			Bound::Int8(v) => ptr::from_ref(v).cast(),
			Bound::Int16(v) => ptr::from_ref(v).cast(),
			Bound::Int32(v) => ptr::from_ref(v).cast(),
			Bound::Int64(v) => ptr::from_ref(v).cast(),
			Bound::Int128(v) => ptr::from_ref(v).cast(),
			Bound::Size(v) => ptr::from_ref(v).cast(),
			Bound::Float(v) => ptr::from_ref(v).cast(),
			Bound::Double(v) => ptr::from_ref(v).cast(),
			Bound::Str(v) => v.as_ptr().cast(),
			Bound::Blob {
				ffi,
				..
			} => ptr::from_ref(ffi).cast(),
			Bound::Date(v) => ptr::from_ref(v).cast(),
			Bound::Time(v) => ptr::from_ref(v).cast(),
			Bound::Timestamp(v) => ptr::from_ref(v).cast(),
			Bound::Null(sentinel) => sentinel.as_ptr(),
		}
	}

	/// Convert a non-null `value` for a parameter of type `ty`. A non-zero
	/// `scale` marks a decimal parameter, bound as its unscaled integer.
	pub(crate) fn convert(value: Value, ty: Type, scale: u32) -> Result<Self> {
		let actual = value.get_type();
		let untyped = actual.is_none().then(|| value_text(&value));
		let mismatch = || match (actual, &untyped) {
			(Some(actual), _) => Error::ParameterType {
				expected: ty,
				actual,
			},
			(None, text) => Error::OutOfRange(format!("{} as a {} parameter", text.as_deref().unwrap_or("NULL"), ty)),
		};

		if ty.is_integer() {
			let integer = if scale != 0 {
				unscaled(&value, scale)
			} else {
				match &value {
					Value::Decimal(d) => decimal::to_unscaled(d, 0).filter(|v| decimal::from_unscaled(*v, 0) == *d),
					other => other.as_i128(),
				}
			};
			let Some(integer) = integer else {
				return Err(mismatch());
			};
			let out_of_range = || Error::OutOfRange(format!("{} as a {} parameter", integer, ty));
			return Ok(match ty {
				Type::Int8 => Bound::Int8(i8::try_from(integer).map_err(|_| out_of_range())?),
				Type::Int16 => Bound::Int16(i16::try_from(integer).map_err(|_| out_of_range())?),
				Type::Int32 => Bound::Int32(i32::try_from(integer).map_err(|_| out_of_range())?),
				Type::Int64 => Bound::Int64(i64::try_from(integer).map_err(|_| out_of_range())?),
				Type::Size => Bound::Size(usize::try_from(integer).map_err(|_| out_of_range())?),
				_ => Bound::Int128(integer),
			});
		}

		Ok(match (ty, value) {
			(Type::Bool, Value::Bool(v)) => Bound::Int8(v as i8),
			(Type::Float, Value::Float(v)) => Bound::Float(v),
			(Type::Float, Value::Double(v)) => Bound::Float(v as f32),
			(Type::Double, Value::Double(v)) => Bound::Double(v),
			(Type::Double, Value::Float(v)) => Bound::Double(v as f64),
			(Type::Float | Type::Double, Value::Decimal(d)) => {
				let v = d.to_string().parse::<f64>().map_err(|_| Error::OutOfRange(d.to_string()))?;
				if ty == Type::Float {
					Bound::Float(v as f32)
				} else {
					Bound::Double(v)
				}
			}
			(Type::Str, Value::Str(v)) => Bound::Str(CString::new(v)?),
			(Type::Blob, Value::Blob(v)) => Bound::blob(v.into_bytes()),
			(Type::Date, Value::Date(v)) => Bound::Date(v.to_ffi()?),
			(Type::Time, Value::Time(v)) => Bound::Time(v.to_ffi()),
			(Type::Timestamp, Value::Timestamp(v)) => Bound::Timestamp(v.to_ffi()?),
			(Type::Timestamp, Value::Date(v)) => Bound::Timestamp(TimestampFFI {
				date: v.to_ffi()?,
				time: TimeFFI::default(),
			}),
			_ => return Err(mismatch()),
		})
	}
}

fn unscaled(value: &Value, scale: u32) -> Option<i128> {
	let decimal = match value {
		Value::Decimal(d) => d.clone(),
		Value::Float(v) => v.to_string().parse::<BigDecimal>().ok()?,
		Value::Double(v) => v.to_string().parse::<BigDecimal>().ok()?,
		other => BigDecimal::from(other.as_i128()?),
	};
	decimal::to_unscaled(&decimal, scale)
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Decimal(d) => format!("decimal {}", d),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use monetdbe_type::{Date, Time};

	use super::*;

	#[test]
	fn test_integer_widening_and_range() {
		assert!(matches!(Bound::convert(Value::Int32(5), Type::Int64, 0), Ok(Bound::Int64(5))));
		assert!(matches!(Bound::convert(Value::Int64(300), Type::Int8, 0), Err(Error::OutOfRange(_))));
		assert!(matches!(
			Bound::convert(Value::Str("x".into()), Type::Int32, 0),
			Err(Error::ParameterType {
				expected: Type::Int32,
				actual: Type::Str
			})
		));
	}

	#[test]
	fn test_decimal_parameters_are_unscaled() {
		let price: BigDecimal = "19.99".parse().unwrap();
		assert!(matches!(Bound::convert(Value::Decimal(price), Type::Int64, 2), Ok(Bound::Int64(1999))));
		assert!(matches!(Bound::convert(Value::Int32(3), Type::Int32, 2), Ok(Bound::Int32(300))));
		assert!(matches!(Bound::convert(Value::Double(1.5), Type::Int16, 1), Ok(Bound::Int16(15))));
	}

	#[test]
	fn test_bool_binds_as_int8() {
		assert!(matches!(Bound::convert(Value::Bool(true), Type::Bool, 0), Ok(Bound::Int8(1))));
	}

	#[test]
	fn test_strings_and_temporals() {
		let bound = Bound::convert(Value::Str("abc".into()), Type::Str, 0).unwrap();
		let text = unsafe { std::ffi::CStr::from_ptr(bound.as_ptr().cast()) };
		assert_eq!(text.to_str().unwrap(), "abc");
		assert!(matches!(Bound::convert(Value::Str("a\0b".into()), Type::Str, 0), Err(Error::InvalidString(_))));

		let date = Value::Date(Date::new(2024, 2, 29).unwrap());
		assert!(matches!(Bound::convert(date, Type::Date, 0), Ok(Bound::Date(d)) if d == DateFFI::new(2024, 2, 29)));
		let time = Value::Time(Time::from_hms_milli(23, 59, 59, 999).unwrap());
		assert!(matches!(Bound::convert(time, Type::Time, 0), Ok(Bound::Time(t)) if t == TimeFFI::new(23, 59, 59, 999)));
	}

	#[test]
	fn test_blob_points_at_owned_bytes() {
		let bound = Bound::blob(vec![1, 2, 3]);
		let ffi = unsafe { &*bound.as_ptr().cast::<BlobFFI>() };
		assert_eq!(ffi.size, 3);
		assert_eq!(unsafe { std::slice::from_raw_parts(ffi.data.cast::<u8>(), 3) }, &[1, 2, 3]);
	}
}
