// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Debug},
	ptr::NonNull,
	slice,
};

use monetdbe_abi::{DateFFI, ResultFFI, StatementFFI, TimeFFI, TimestampFFI};
use monetdbe_column::Columns;
use monetdbe_type::{Error, NativeLayout, Result, Type, Value};
use tracing::{debug, instrument, warn};

use crate::{Database, Outcome, QueryOptions, bind::Bound};

/// Declared type of a statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
	pub ty: Type,
	/// SQL type name as the engine reports it, e.g. `decimal`
	pub sql_type: String,
	pub digits: u32,
	pub scale: u32,
}

/// Name and type of a column the statement returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
	pub name: String,
	pub ty: Type,
	pub sql_type: String,
	pub digits: u32,
	pub scale: u32,
}

/// What the engine reported about a prepared statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementMetadata {
	pub parameters: Vec<ParameterInfo>,
	pub columns: Vec<OutputInfo>,
}

impl StatementMetadata {
	/// Read the description result of `monetdbe_prepare`: one row per output
	/// column followed by the parameters, whose column name is null. Type
	/// names are the engine's storage names (`int`, `lng`, `str`, ...).
	fn from_description(columns: &Columns<'_>) -> Result<Self> {
		let mut metadata = Self::default();
		for row in 0..columns.row_count() {
			let text = |column: usize| -> Result<Option<String>> {
				Ok(match columns.value(row, column)? {
					Value::Str(text) => Some(text),
					_ => None,
				})
			};
			let number = |column: usize| -> Result<u32> {
				Ok(columns.value(row, column)?.as_i128().and_then(|v| u32::try_from(v).ok()).unwrap_or(0))
			};
			let sql_type = text(0)?.unwrap_or_default();
			let digits = number(1)?;
			let scale = number(2)?;
			let ty = text(6)?.as_deref().and_then(Type::from_gdk_name).unwrap_or(Type::Unknown);
			match text(5)? {
				Some(name) => metadata.columns.push(OutputInfo {
					name,
					ty,
					sql_type,
					digits,
					scale,
				}),
				None => metadata.parameters.push(ParameterInfo {
					ty,
					sql_type,
					digits,
					scale,
				}),
			}
		}
		Ok(metadata)
	}
}

/// A prepared statement, released when dropped.
///
/// Parameters are indexed from 1. Bound values are copied into buffers owned
/// by the statement and stay valid until rebound or the statement is dropped.
pub struct Statement<'db> {
	db: &'db Database,
	raw: NonNull<StatementFFI>,
	types: Vec<Type>,
	metadata: StatementMetadata,
	bound: Vec<Option<Bound>>,
}

impl<'db> Statement<'db> {
	/// Take ownership of a prepared statement and its description, which is
	/// read and released here
	pub(crate) fn new(
		db: &'db Database,
		raw: NonNull<StatementFFI>,
		description: Option<NonNull<ResultFFI>>,
	) -> Result<Self> {
		let api = db.api();
		// the statement is released by Drop if anything below fails
		let mut statement = Self {
			db,
			raw,
			types: Vec::new(),
			metadata: StatementMetadata::default(),
			bound: Vec::new(),
		};

		// SAFETY: the engine hands out nparam type codes with the statement
		let codes = unsafe {
			let header = raw.as_ref();
			let count = usize::try_from(header.nparam).unwrap_or(0);
			if count == 0 || header.type_codes.is_null() {
				&[][..]
			} else {
				slice::from_raw_parts(header.type_codes, count)
			}
		};
		statement.types = parameter_types(api.layout(), codes)?;
		statement.bound = statement.types.iter().map(|_| None).collect();

		if let Some(description) = description {
			statement.metadata = describe(db, description)?;
		}
		debug!(parameters = statement.types.len(), "statement prepared");
		Ok(statement)
	}

	pub fn parameter_count(&self) -> usize {
		self.types.len()
	}

	/// Parameter types in order, translated to the managed numbering
	pub fn parameter_types(&self) -> &[Type] {
		&self.types
	}

	pub fn metadata(&self) -> &StatementMetadata {
		&self.metadata
	}

	fn slot(&self, index: usize) -> Result<usize> {
		let count = self.types.len();
		if index == 0 || index > count {
			return Err(Error::ParameterIndex {
				index,
				count,
			});
		}
		Ok(index - 1)
	}

	/// Declared scale of a parameter, non-zero for decimals
	fn scale(&self, slot: usize) -> u32 {
		if self.metadata.parameters.len() != self.types.len() {
			return 0;
		}
		self.metadata.parameters[slot].scale
	}

	fn install(&mut self, slot: usize, bound: Bound) -> Result<()> {
		let value = self.bound[slot].insert(bound);
		// SAFETY: the buffer is owned by the statement until rebound or dropped
		unsafe { self.db.api().bind(self.raw, value.as_ptr(), slot) }
	}

	/// Bind `value` to parameter `index`, converted to the declared type.
	/// Decimal parameters accept exact, integer and floating point values.
	pub fn bind(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
		let slot = self.slot(index)?;
		let value = value.into();
		if value.is_null() {
			return self.bind_null(index);
		}
		let bound = Bound::convert(value, self.types[slot], self.scale(slot))?;
		self.install(slot, bound)
	}

	/// Bind NULL using the engine's sentinel for the declared type
	pub fn bind_null(&mut self, index: usize) -> Result<()> {
		let slot = self.slot(index)?;
		// SAFETY: the database is open for the statement's lifetime
		let sentinel = unsafe { self.db.api().null(self.db.handle(), self.types[slot]) }?;
		self.install(slot, Bound::Null(sentinel))
	}

	pub fn bind_blob(&mut self, index: usize, bytes: &[u8]) -> Result<()> {
		let slot = self.slot(index)?;
		self.check_type(slot, Type::Blob)?;
		self.install(slot, Bound::blob(bytes.to_vec()))
	}

	/// Bind date components as given; the engine validates them
	pub fn bind_date(&mut self, index: usize, year: i16, month: u8, day: u8) -> Result<()> {
		let slot = self.slot(index)?;
		self.check_type(slot, Type::Date)?;
		self.install(slot, Bound::Date(DateFFI::new(year, month, day)))
	}

	pub fn bind_time(&mut self, index: usize, hours: u8, minutes: u8, seconds: u8, ms: u32) -> Result<()> {
		let slot = self.slot(index)?;
		self.check_type(slot, Type::Time)?;
		self.install(slot, Bound::Time(TimeFFI::new(hours, minutes, seconds, ms)))
	}

	#[allow(clippy::too_many_arguments)]
	pub fn bind_timestamp(
		&mut self,
		index: usize,
		year: i16,
		month: u8,
		day: u8,
		hours: u8,
		minutes: u8,
		seconds: u8,
		ms: u32,
	) -> Result<()> {
		let slot = self.slot(index)?;
		self.check_type(slot, Type::Timestamp)?;
		self.install(
			slot,
			Bound::Timestamp(TimestampFFI {
				date: DateFFI::new(year, month, day),
				time: TimeFFI::new(hours, minutes, seconds, ms),
			}),
		)
	}

	fn check_type(&self, slot: usize, actual: Type) -> Result<()> {
		let expected = self.types[slot];
		if expected != actual {
			return Err(Error::ParameterType {
				expected,
				actual,
			});
		}
		Ok(())
	}

	pub fn execute(&mut self) -> Result<Outcome<'db>> {
		self.execute_with(QueryOptions::default())
	}

	#[instrument(name = "statement::execute", level = "debug", skip_all, fields(parameters = self.types.len()))]
	pub fn execute_with(&mut self, options: QueryOptions) -> Result<Outcome<'db>> {
		// SAFETY: the statement is live; bound buffers are owned by self
		let executed = unsafe { self.db.api().execute(self.raw) }?;
		Outcome::new(self.db, executed, options)
	}
}

fn parameter_types(layout: NativeLayout, codes: &[i32]) -> Result<Vec<Type>> {
	codes
		.iter()
		.enumerate()
		.map(|(index, &code)| {
			layout.decode(code).ok_or(Error::UnsupportedType {
				column: index,
				code,
			})
		})
		.collect()
}

fn describe(db: &Database, description: NonNull<ResultFFI>) -> Result<StatementMetadata> {
	let api = db.api();
	// SAFETY: the description is live until cleaned up below
	let (count, rows) = unsafe {
		let header = description.as_ref();
		(header.ncols, usize::try_from(header.nrows).unwrap_or(0))
	};
	// SAFETY: the descriptors belong to the description, which outlives the columns
	let metadata = unsafe { Columns::materialize(count, rows, api.layout(), |i| api.result_fetch(description, i)) }
		.and_then(|columns| StatementMetadata::from_description(&columns));
	// SAFETY: released once, after the columns are gone
	unsafe { api.cleanup_result(db.handle(), description) }?;
	metadata
}

impl Drop for Statement<'_> {
	fn drop(&mut self) {
		// SAFETY: released exactly once
		if let Err(error) = unsafe { self.db.api().cleanup_statement(self.db.handle(), self.raw) } {
			warn!(%error, "failed to clean up statement");
		}
	}
}

impl Debug for Statement<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Statement").field("parameters", &self.types).field("metadata", &self.metadata).finish()
	}
}
