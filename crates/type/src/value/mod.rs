// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

mod blob;
mod date;
mod datetime;
pub mod decimal;
mod time;
mod r#type;

pub use blob::Blob;
pub use date::Date;
pub use datetime::DateTime;
pub use time::Time;
pub use r#type::Type;

/// A single cell or parameter value on the managed side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// SQL NULL
	Null,
	Bool(bool),
	Int8(i8),
	Int16(i16),
	Int32(i32),
	Int64(i64),
	Int128(i128),
	Size(usize),
	Float(f32),
	Double(f64),
	Str(String),
	Blob(Blob),
	Date(Date),
	Time(Time),
	Timestamp(DateTime),
	/// Exact numeric; stored natively as an integer scaled by the column's scale
	Decimal(BigDecimal),
}

impl Value {
	/// Managed type of this value. `None` for [`Value::Null`] and
	/// [`Value::Decimal`], whose native type depends on the column.
	pub fn get_type(&self) -> Option<Type> {
		Some(match self {
			Value::Null | Value::Decimal(_) => return None,
			Value::Bool(_) => Type::Bool,
			Value::Int8(_) => Type::Int8,
			Value::Int16(_) => Type::Int16,
			Value::Int32(_) => Type::Int32,
			Value::Int64(_) => Type::Int64,
			Value::Int128(_) => Type::Int128,
			Value::Size(_) => Type::Size,
			Value::Float(_) => Type::Float,
			Value::Double(_) => Type::Double,
			Value::Str(_) => Type::Str,
			Value::Blob(_) => Type::Blob,
			Value::Date(_) => Type::Date,
			Value::Time(_) => Type::Time,
			Value::Timestamp(_) => Type::Timestamp,
		})
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Integer content widened to 128 bits, if this is an integer value
	pub fn as_i128(&self) -> Option<i128> {
		match self {
			Value::Bool(v) => Some(*v as i128),
			Value::Int8(v) => Some(*v as i128),
			Value::Int16(v) => Some(*v as i128),
			Value::Int32(v) => Some(*v as i128),
			Value::Int64(v) => Some(*v as i128),
			Value::Int128(v) => Some(*v),
			Value::Size(v) => Some(*v as i128),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v as f64),
			Value::Double(v) => Some(*v),
			other => other.as_i128().map(|v| v as f64),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("NULL"),
			Value::Bool(v) => Display::fmt(v, f),
			Value::Int8(v) => Display::fmt(v, f),
			Value::Int16(v) => Display::fmt(v, f),
			Value::Int32(v) => Display::fmt(v, f),
			Value::Int64(v) => Display::fmt(v, f),
			Value::Int128(v) => Display::fmt(v, f),
			Value::Size(v) => Display::fmt(v, f),
			Value::Float(v) => Display::fmt(v, f),
			Value::Double(v) => Display::fmt(v, f),
			Value::Str(v) => f.write_str(v),
			Value::Blob(v) => Display::fmt(v, f),
			Value::Date(v) => Display::fmt(v, f),
			Value::Time(v) => Display::fmt(v, f),
			Value::Timestamp(v) => Display::fmt(v, f),
			Value::Decimal(v) => Display::fmt(v, f),
		}
	}
}

macro_rules! impl_from {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Value::$variant(value.into())
				}
			}
		)*
	};
}

impl_from! {
	bool => Bool,
	i8 => Int8,
	i16 => Int16,
	i32 => Int32,
	i64 => Int64,
	i128 => Int128,
	usize => Size,
	f32 => Float,
	f64 => Double,
	String => Str,
	&str => Str,
	Blob => Blob,
	Vec<u8> => Blob,
	Date => Date,
	Time => Time,
	DateTime => Timestamp,
	BigDecimal => Decimal,
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use std::str::FromStr;

	use super::*;

	#[test]
	fn test_get_type() {
		assert_eq!(Value::from(1i32).get_type(), Some(Type::Int32));
		assert_eq!(Value::from("x").get_type(), Some(Type::Str));
		assert_eq!(Value::from(vec![1u8]).get_type(), Some(Type::Blob));
		assert_eq!(Value::Null.get_type(), None);
		assert_eq!(Value::from(BigDecimal::from(1)).get_type(), None);
	}

	#[test]
	fn test_from_option() {
		assert_eq!(Value::from(None::<i64>), Value::Null);
		assert_eq!(Value::from(Some(2i64)), Value::Int64(2));
	}

	#[test]
	fn test_display() {
		assert_eq!(Value::Null.to_string(), "NULL");
		assert_eq!(Value::from(true).to_string(), "true");
		assert_eq!(Value::from("x").to_string(), "x");
		assert_eq!(Value::from(BigDecimal::from_str("1.50").unwrap()).to_string(), "1.50");
	}

	#[test]
	fn test_numeric_accessors() {
		assert_eq!(Value::Int16(-3).as_i128(), Some(-3));
		assert_eq!(Value::Bool(true).as_i128(), Some(1));
		assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
		assert_eq!(Value::from("x").as_f64(), None);
	}

	#[test]
	fn test_serde_round_trip() {
		let value = Value::from(Date::new(2024, 2, 29).unwrap());
		let json = serde_json::to_string(&value).unwrap();
		assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), value);
	}
}
