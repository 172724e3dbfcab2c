// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Index, ptr::NonNull, slice};

use monetdbe_abi::ColumnFFI;
use monetdbe_type::{Error, NativeLayout, Result, Value};

use crate::{Column, materialize};

/// The materialized columns of one result set, in native column order
#[derive(Debug, Clone, PartialEq)]
pub struct Columns<'r> {
	columns: Vec<Column<'r>>,
	row_count: usize,
}

impl<'r> Columns<'r> {
	pub fn new(columns: Vec<Column<'r>>, row_count: usize) -> Self {
		Self {
			columns,
			row_count,
		}
	}

	pub fn empty() -> Self {
		Self::new(Vec::new(), 0)
	}

	/// Fetch and materialize `count` columns through `fetch`.
	///
	/// Stops at the first failure; columns materialized before it are
	/// discarded, but their native cells have already been rewritten.
	///
	/// # Safety
	/// Every descriptor returned by `fetch` must satisfy the contract of
	/// [`materialize`] for `'r`.
	pub unsafe fn materialize<F>(count: usize, row_count: usize, layout: NativeLayout, mut fetch: F) -> Result<Self>
	where
		F: FnMut(usize) -> Result<NonNull<ColumnFFI>>,
	{
		let mut columns = Vec::with_capacity(count);
		for index in 0..count {
			let descriptor = fetch(index)?;
			// SAFETY: guaranteed by the caller
			columns.push(unsafe { materialize(descriptor, index, layout) }?);
		}
		Ok(Self::new(columns, row_count))
	}

	/// Number of columns
	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn row_count(&self) -> usize {
		self.row_count
	}

	pub fn get(&self, index: usize) -> Option<&Column<'r>> {
		self.columns.get(index)
	}

	pub fn position(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|column| column.name == name)
	}

	pub fn by_name(&self, name: &str) -> Result<&Column<'r>> {
		self.columns
			.iter()
			.find(|column| column.name == name)
			.ok_or_else(|| Error::ColumnNotFound(name.to_string()))
	}

	/// Value at `row` of the column at `column`
	pub fn value(&self, row: usize, column: usize) -> Result<Value> {
		let Some(column) = self.columns.get(column) else {
			return Err(Error::ColumnNotFound(format!("#{}", column)));
		};
		column.value(row)
	}

	/// All values of `row`, one per column
	pub fn row(&self, row: usize) -> Result<Vec<Value>> {
		self.columns.iter().map(|column| column.value(row)).collect()
	}

	/// Limit every column to the first `rows` rows
	pub fn truncate(&mut self, rows: usize) {
		if rows >= self.row_count {
			return;
		}
		for column in &mut self.columns {
			column.truncate(rows);
		}
		self.row_count = rows;
	}

	pub fn iter(&self) -> slice::Iter<'_, Column<'r>> {
		self.columns.iter()
	}

	pub fn into_inner(self) -> Vec<Column<'r>> {
		self.columns
	}
}

impl<'r> Index<usize> for Columns<'r> {
	type Output = Column<'r>;

	fn index(&self, index: usize) -> &Self::Output {
		&self.columns[index]
	}
}

impl<'r> IntoIterator for Columns<'r> {
	type Item = Column<'r>;
	type IntoIter = std::vec::IntoIter<Column<'r>>;

	fn into_iter(self) -> Self::IntoIter {
		self.columns.into_iter()
	}
}

impl<'a, 'r> IntoIterator for &'a Columns<'r> {
	type Item = &'a Column<'r>;
	type IntoIter = slice::Iter<'a, Column<'r>>;

	fn into_iter(self) -> Self::IntoIter {
		self.columns.iter()
	}
}
