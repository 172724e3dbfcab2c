// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::ffi::NulError;

use crate::Type;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A native entry point reported failure. `message` is the engine's text,
	/// unchanged.
	#[error("{message}")]
	Native {
		operation: &'static str,
		message: String,
	},

	#[error("failed to load monetdbe library '{path}': {message}")]
	Library {
		path: String,
		message: String,
	},

	#[error("column {column} has unsupported native type tag {code}")]
	UnsupportedType {
		column: usize,
		code: i32,
	},

	#[error("the loaded monetdbe library has no 128-bit integer support")]
	Int128Unavailable,

	#[error("parameter index {index} is out of range, statement has {count} parameter(s)")]
	ParameterIndex {
		index: usize,
		count: usize,
	},

	#[error("cannot bind a {actual} value to a parameter of type {expected}")]
	ParameterType {
		expected: Type,
		actual: Type,
	},

	#[error("a {actual} column cannot be read as {expected}")]
	ColumnType {
		expected: &'static str,
		actual: Type,
	},

	#[error("string contains an interior NUL byte")]
	InvalidString(#[from] NulError),

	#[error("affected row count {0} does not fit a 32-bit update count")]
	UpdateCountOverflow(i64),

	#[error("{0} is out of range for its native representation")]
	OutOfRange(String),

	#[error("no column named '{0}'")]
	ColumnNotFound(String),

	#[error("row {row} is out of bounds, column has {rows} row(s)")]
	RowOutOfBounds {
		row: usize,
		rows: usize,
	},
}

impl Error {
	pub fn native(operation: &'static str, message: impl Into<String>) -> Self {
		Self::Native {
			operation,
			message: message.into(),
		}
	}

	/// True if the error originates from the native engine
	pub fn is_native(&self) -> bool {
		matches!(self, Self::Native { .. })
	}
}

#[cfg(test)]
mod tests {
	use std::ffi::CString;

	use super::*;

	#[test]
	fn test_native_message_is_unchanged() {
		let err = Error::native("monetdbe_query", "ParseException:SQLparser:42000!syntax error");
		assert_eq!(err.to_string(), "ParseException:SQLparser:42000!syntax error");
		assert!(err.is_native());
	}

	#[test]
	fn test_nul_error_conversion() {
		let err: Error = CString::new("a\0b").unwrap_err().into();
		assert!(matches!(err, Error::InvalidString(_)));
		assert!(!err.is_native());
	}

	#[test]
	fn test_parameter_index_message() {
		let err = Error::ParameterIndex {
			index: 3,
			count: 2,
		};
		assert_eq!(err.to_string(), "parameter index 3 is out of range, statement has 2 parameter(s)");
	}
}
