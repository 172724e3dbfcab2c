// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::CStr,
	fmt::{self, Debug},
	ptr::NonNull,
};

use monetdbe_abi::ResultFFI;
use monetdbe_column::Columns;
use monetdbe_native::Executed;
use monetdbe_type::{Error, Result};
use tracing::{instrument, warn};

use crate::{Database, QueryOptions};

/// Affected row count of a statement without a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCount {
	Regular(i32),
	/// Requested through [`QueryOptions::large_update`]
	Large(i64),
}

impl UpdateCount {
	pub fn get(self) -> i64 {
		match self {
			UpdateCount::Regular(count) => count as i64,
			UpdateCount::Large(count) => count,
		}
	}
}

/// What a query or prepared statement produced
#[derive(Debug)]
pub enum Outcome<'db> {
	Rows(QueryResult<'db>),
	Updated(UpdateCount),
}

impl<'db> Outcome<'db> {
	/// A native result without columns is released here and reported as an
	/// update count, like a missing one
	pub(crate) fn new(db: &'db Database, executed: Executed, options: QueryOptions) -> Result<Self> {
		if let Some(raw) = executed.result {
			let result = QueryResult::new(db, raw, options.max_rows);
			if result.column_count() > 0 {
				return Ok(Outcome::Rows(result));
			}
			result.close()?;
		}

		let affected = executed.affected_rows;
		let count = if options.large_update {
			UpdateCount::Large(affected)
		} else {
			UpdateCount::Regular(i32::try_from(affected).map_err(|_| Error::UpdateCountOverflow(affected))?)
		};
		Ok(Outcome::Updated(count))
	}

	pub fn rows(self) -> Option<QueryResult<'db>> {
		match self {
			Outcome::Rows(result) => Some(result),
			Outcome::Updated(_) => None,
		}
	}

	pub fn update_count(&self) -> Option<UpdateCount> {
		match self {
			Outcome::Rows(_) => None,
			Outcome::Updated(count) => Some(*count),
		}
	}
}

/// A native result set, released when dropped
pub struct QueryResult<'db> {
	db: &'db Database,
	raw: NonNull<ResultFFI>,
	max_rows: usize,
	fetched: bool,
	released: bool,
}

impl<'db> QueryResult<'db> {
	fn new(db: &'db Database, raw: NonNull<ResultFFI>, max_rows: usize) -> Self {
		Self {
			db,
			raw,
			max_rows,
			fetched: false,
			released: false,
		}
	}

	fn header(&self) -> &ResultFFI {
		// SAFETY: the result stays live until released by this value
		unsafe { self.raw.as_ref() }
	}

	pub fn column_count(&self) -> usize {
		self.header().ncols
	}

	/// Rows visible through this result, honoring `max_rows`
	pub fn row_count(&self) -> usize {
		let rows = usize::try_from(self.header().nrows).unwrap_or(0);
		match self.max_rows {
			0 => rows,
			limit => rows.min(limit),
		}
	}

	/// Name the engine gave the result, usually its table
	pub fn name(&self) -> Option<String> {
		let name = self.header().name;
		if name.is_null() {
			return None;
		}
		// SAFETY: a non-null name is a NUL-terminated string owned by the result
		Some(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned())
	}

	/// Identifier generated by the last insert, -1 if none
	pub fn last_id(&self) -> i64 {
		self.header().last_id
	}

	/// Fetch and materialize every column.
	///
	/// Materializing rewrites the native cells: fixed-width nulls become zero
	/// so the returned views read 0 for them, and decimal columns record their
	/// nulls in a mask first. The rewrite runs over all native rows even when
	/// `max_rows` hides some of them. Fetching a second time sees the zeroed
	/// cells, so decimal nulls can no longer be told apart from zero.
	///
	/// The first unmapped native type tag fails the whole fetch.
	#[instrument(name = "result::fetch_all", level = "debug", skip_all, fields(columns = self.column_count(), rows = self.row_count()))]
	pub fn fetch_all(&mut self) -> Result<Columns<'_>> {
		if self.fetched {
			warn!("result fetched again; null cells were already rewritten to zero");
		}
		self.fetched = true;

		let api = self.db.api();
		let raw = self.raw;
		let native_rows = usize::try_from(self.header().nrows).unwrap_or(0);
		// SAFETY: descriptors belong to this live result, which the returned
		// columns borrow
		let mut columns = unsafe {
			Columns::materialize(self.column_count(), native_rows, api.layout(), |index| {
				api.result_fetch(raw, index)
			})
		}?;
		if self.max_rows > 0 && self.max_rows < native_rows {
			columns.truncate(self.max_rows);
		}
		Ok(columns)
	}

	/// Release the result now, reporting a cleanup failure
	pub fn close(mut self) -> Result<()> {
		self.released = true;
		// SAFETY: released exactly once; the flag stops `Drop`
		unsafe { self.db.api().cleanup_result(self.db.handle(), self.raw) }
	}
}

impl Drop for QueryResult<'_> {
	fn drop(&mut self) {
		if self.released {
			return;
		}
		// SAFETY: released exactly once
		if let Err(error) = unsafe { self.db.api().cleanup_result(self.db.handle(), self.raw) } {
			warn!(%error, "failed to clean up result");
		}
	}
}

impl Debug for QueryResult<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryResult")
			.field("columns", &self.column_count())
			.field("rows", &self.row_count())
			.field("fetched", &self.fetched)
			.finish()
	}
}
