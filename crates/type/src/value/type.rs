// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Managed type code of a column or parameter.
///
/// The discriminants follow the native enumeration of a library built with
/// 128-bit integers. Use [`crate::NativeLayout`] to convert from and to the
/// tags of the loaded library.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	Bool = 0,
	Int8 = 1,
	Int16 = 2,
	Int32 = 3,
	Int64 = 4,
	Int128 = 5,
	Size = 6,
	Float = 7,
	Double = 8,
	Str = 9,
	Blob = 10,
	Date = 11,
	Time = 12,
	Timestamp = 13,
	Unknown = 14,
}

impl Type {
	pub const ALL: [Type; 15] = [
		Type::Bool,
		Type::Int8,
		Type::Int16,
		Type::Int32,
		Type::Int64,
		Type::Int128,
		Type::Size,
		Type::Float,
		Type::Double,
		Type::Str,
		Type::Blob,
		Type::Date,
		Type::Time,
		Type::Timestamp,
		Type::Unknown,
	];

	pub const fn code(self) -> i32 {
		self as i32
	}

	pub fn from_code(code: i32) -> Option<Self> {
		usize::try_from(code).ok().and_then(|idx| Self::ALL.get(idx).copied())
	}

	/// Name of the matching `monetdbe_types` enumerator
	pub const fn name(self) -> &'static str {
		match self {
			Type::Bool => "monetdbe_bool",
			Type::Int8 => "monetdbe_int8_t",
			Type::Int16 => "monetdbe_int16_t",
			Type::Int32 => "monetdbe_int32_t",
			Type::Int64 => "monetdbe_int64_t",
			Type::Int128 => "monetdbe_int128_t",
			Type::Size => "monetdbe_size_t",
			Type::Float => "monetdbe_float",
			Type::Double => "monetdbe_double",
			Type::Str => "monetdbe_str",
			Type::Blob => "monetdbe_blob",
			Type::Date => "monetdbe_date",
			Type::Time => "monetdbe_time",
			Type::Timestamp => "monetdbe_timestamp",
			Type::Unknown => "monetdbe_type_unknown",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|ty| ty.name() == name)
	}

	/// Default SQL type name for columns of this type
	pub const fn sql_name(self) -> &'static str {
		match self {
			Type::Bool => "BOOLEAN",
			Type::Int8 => "TINYINT",
			Type::Int16 => "SMALLINT",
			Type::Int32 => "INTEGER",
			Type::Int64 => "BIGINT",
			Type::Int128 => "HUGEINT",
			Type::Size => "BIGINT",
			Type::Float => "REAL",
			Type::Double => "DOUBLE",
			Type::Str => "VARCHAR",
			Type::Blob => "BLOB",
			Type::Date => "DATE",
			Type::Time => "TIME",
			Type::Timestamp => "TIMESTAMP",
			Type::Unknown => "NULL",
		}
	}

	/// Storage type name used by the engine kernel (GDK), as reported in the
	/// description of a prepared statement
	pub const fn gdk_name(self) -> &'static str {
		match self {
			Type::Bool => "bit",
			Type::Int8 => "bte",
			Type::Int16 => "sht",
			Type::Int32 => "int",
			Type::Int64 => "lng",
			Type::Int128 => "hge",
			Type::Size => "size",
			Type::Float => "flt",
			Type::Double => "dbl",
			Type::Str => "str",
			Type::Blob => "blob",
			Type::Date => "date",
			Type::Time => "daytime",
			Type::Timestamp => "timestamp",
			Type::Unknown => "unknown",
		}
	}

	pub fn from_gdk_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|ty| ty.gdk_name() == name)
	}

	/// Cell width in bytes for types exposed as a zero-copy view
	pub const fn width(self) -> Option<usize> {
		match self {
			Type::Bool | Type::Int8 => Some(1),
			Type::Int16 => Some(2),
			Type::Int32 | Type::Float => Some(4),
			Type::Int64 | Type::Double => Some(8),
			Type::Int128 => Some(16),
			Type::Size => Some(size_of::<usize>()),
			_ => None,
		}
	}

	pub const fn is_fixed(self) -> bool {
		self.width().is_some()
	}

	pub const fn is_integer(self) -> bool {
		matches!(self, Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64 | Type::Int128 | Type::Size)
	}

	pub const fn is_temporal(self) -> bool {
		matches!(self, Type::Date | Type::Time | Type::Timestamp)
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_codes_are_contiguous() {
		for (idx, ty) in Type::ALL.iter().enumerate() {
			assert_eq!(ty.code(), idx as i32);
			assert_eq!(Type::from_code(idx as i32), Some(*ty));
		}
		assert_eq!(Type::from_code(-1), None);
		assert_eq!(Type::from_code(15), None);
	}

	#[test]
	fn test_gdk_names() {
		assert_eq!(Type::from_gdk_name("int"), Some(Type::Int32));
		assert_eq!(Type::from_gdk_name("daytime"), Some(Type::Time));
		assert_eq!(Type::from_gdk_name("hge"), Some(Type::Int128));
		assert_eq!(Type::from_gdk_name("varchar"), None);
	}

	#[test]
	fn test_names() {
		assert_eq!(Type::Int32.name(), "monetdbe_int32_t");
		assert_eq!(Type::from_name("monetdbe_timestamp"), Some(Type::Timestamp));
		assert_eq!(Type::Str.to_string(), "monetdbe_str");
		assert_eq!(Type::Double.sql_name(), "DOUBLE");
	}

	#[test]
	fn test_widths() {
		assert_eq!(Type::Bool.width(), Some(1));
		assert_eq!(Type::Int128.width(), Some(16));
		assert_eq!(Type::Float.width(), Some(4));
		assert_eq!(Type::Str.width(), None);
		assert!(!Type::Timestamp.is_fixed());
		assert!(Type::Size.is_integer());
	}
}
