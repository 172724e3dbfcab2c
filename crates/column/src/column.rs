// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use bigdecimal::BigDecimal;
use monetdbe_type::{Blob, Date, DateTime, Error, Result, Time, Type, Value, decimal};
use num_traits::FromPrimitive;

/// A named, typed result column.
///
/// Fixed-width columns borrow the engine's buffer for `'r`, the lifetime of
/// the result set they were fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'r> {
	pub name: String,
	pub ty: Type,
	pub data: ColumnData<'r>,
}

/// Exactly one representation per column, selected by its type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData<'r> {
	Fixed(FixedColumn<'r>),
	Boxed(BoxedData),
}

/// Zero-copy view over a fixed-width native column
#[derive(Debug, Clone, PartialEq)]
pub struct FixedColumn<'r> {
	pub data: FixedData<'r>,
	/// Decimal precision in digits
	pub precision: u32,
	/// Decimal scale, 0 for non-decimal columns
	pub scale: u32,
	/// Per-row null flags of a decimal column. Only allocated once a null row
	/// is seen.
	pub nulls: Option<Vec<bool>>,
}

/// Native cells of a fixed-width column. Booleans are stored as one byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedData<'r> {
	Bool(&'r [i8]),
	Int8(&'r [i8]),
	Int16(&'r [i16]),
	Int32(&'r [i32]),
	Int64(&'r [i64]),
	Int128(&'r [i128]),
	Size(&'r [usize]),
	Float(&'r [f32]),
	Double(&'r [f64]),
}

/// Owned per-row values of a variable-width or temporal column
#[derive(Debug, Clone, PartialEq)]
pub enum BoxedData {
	Str(Vec<Option<String>>),
	Blob(Vec<Option<Blob>>),
	Date(Vec<Option<Date>>),
	Time(Vec<Option<Time>>),
	Timestamp(Vec<Option<DateTime>>),
}

macro_rules! fixed_dispatch {
	($data:expr, $cells:ident => $body:expr) => {
		match $data {
			FixedData::Bool($cells) => $body,
			FixedData::Int8($cells) => $body,
			FixedData::Int16($cells) => $body,
			FixedData::Int32($cells) => $body,
			FixedData::Int64($cells) => $body,
			FixedData::Int128($cells) => $body,
			FixedData::Size($cells) => $body,
			FixedData::Float($cells) => $body,
			FixedData::Double($cells) => $body,
		}
	};
}

impl<'r> FixedData<'r> {
	pub fn len(&self) -> usize {
		fixed_dispatch!(*self, cells => cells.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Cell width in bytes
	pub fn width(&self) -> usize {
		fixed_dispatch!(*self, cells => cell_width(cells))
	}

	/// The raw backing bytes, `len() * width()` long
	pub fn bytes(&self) -> &'r [u8] {
		fixed_dispatch!(*self, cells => {
			// SAFETY: every cell type is plain old data without padding
			unsafe { std::slice::from_raw_parts(cells.as_ptr() as *const u8, size_of_val(cells)) }
		})
	}

	fn truncate(&mut self, rows: usize) {
		fixed_dispatch!(self, cells => {
			let whole = *cells;
			if rows < whole.len() {
				*cells = &whole[..rows];
			}
		})
	}

	fn value(&self, row: usize) -> Value {
		match self {
			FixedData::Bool(cells) => Value::Bool(cells[row] != 0),
			FixedData::Int8(cells) => Value::Int8(cells[row]),
			FixedData::Int16(cells) => Value::Int16(cells[row]),
			FixedData::Int32(cells) => Value::Int32(cells[row]),
			FixedData::Int64(cells) => Value::Int64(cells[row]),
			FixedData::Int128(cells) => Value::Int128(cells[row]),
			FixedData::Size(cells) => Value::Size(cells[row]),
			FixedData::Float(cells) => Value::Float(cells[row]),
			FixedData::Double(cells) => Value::Double(cells[row]),
		}
	}
}

fn cell_width<T>(_: &[T]) -> usize {
	size_of::<T>()
}

impl FixedColumn<'_> {
	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	pub fn is_decimal(&self) -> bool {
		self.scale != 0
	}

	/// True if the null mask flags `row`. Non-decimal columns carry no mask, so
	/// their null rows read as zero and are not reported here.
	pub fn is_null(&self, row: usize) -> bool {
		self.nulls.as_ref().is_some_and(|nulls| nulls.get(row).copied().unwrap_or(false))
	}
}

impl BoxedData {
	pub fn len(&self) -> usize {
		match self {
			BoxedData::Str(values) => values.len(),
			BoxedData::Blob(values) => values.len(),
			BoxedData::Date(values) => values.len(),
			BoxedData::Time(values) => values.len(),
			BoxedData::Timestamp(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// True if `row` holds NULL; rows past the end are not null
	pub fn is_null(&self, row: usize) -> bool {
		match self {
			BoxedData::Str(values) => values.get(row).is_some_and(Option::is_none),
			BoxedData::Blob(values) => values.get(row).is_some_and(Option::is_none),
			BoxedData::Date(values) => values.get(row).is_some_and(Option::is_none),
			BoxedData::Time(values) => values.get(row).is_some_and(Option::is_none),
			BoxedData::Timestamp(values) => values.get(row).is_some_and(Option::is_none),
		}
	}

	fn truncate(&mut self, rows: usize) {
		match self {
			BoxedData::Str(values) => values.truncate(rows),
			BoxedData::Blob(values) => values.truncate(rows),
			BoxedData::Date(values) => values.truncate(rows),
			BoxedData::Time(values) => values.truncate(rows),
			BoxedData::Timestamp(values) => values.truncate(rows),
		}
	}

	fn value(&self, row: usize) -> Value {
		match self {
			BoxedData::Str(values) => values[row].clone().into(),
			BoxedData::Blob(values) => values[row].clone().into(),
			BoxedData::Date(values) => values[row].into(),
			BoxedData::Time(values) => values[row].into(),
			BoxedData::Timestamp(values) => values[row].into(),
		}
	}
}

impl<'r> Column<'r> {
	pub fn len(&self) -> usize {
		match &self.data {
			ColumnData::Fixed(fixed) => fixed.len(),
			ColumnData::Boxed(boxed) => boxed.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn as_fixed(&self) -> Option<&FixedColumn<'r>> {
		match &self.data {
			ColumnData::Fixed(fixed) => Some(fixed),
			ColumnData::Boxed(_) => None,
		}
	}

	pub fn as_boxed(&self) -> Option<&BoxedData> {
		match &self.data {
			ColumnData::Fixed(_) => None,
			ColumnData::Boxed(boxed) => Some(boxed),
		}
	}

	/// Whether `row` is known to be NULL. For fixed-width columns this is only
	/// tracked for decimals.
	pub fn is_null(&self, row: usize) -> Result<bool> {
		self.check_row(row)?;
		Ok(match &self.data {
			ColumnData::Fixed(fixed) => fixed.is_null(row),
			ColumnData::Boxed(boxed) => boxed.is_null(row),
		})
	}

	/// Cell at `row` as a [`Value`]. Scaled integer columns yield
	/// [`Value::Decimal`].
	pub fn value(&self, row: usize) -> Result<Value> {
		self.check_row(row)?;
		match &self.data {
			ColumnData::Fixed(fixed) => {
				if fixed.is_null(row) {
					return Ok(Value::Null);
				}
				let value = fixed.data.value(row);
				if fixed.is_decimal()
					&& let Some(unscaled) = value.as_i128()
				{
					return Ok(Value::Decimal(decimal::from_unscaled(unscaled, fixed.scale)));
				}
				Ok(value)
			}
			ColumnData::Boxed(boxed) => Ok(boxed.value(row)),
		}
	}

	/// Cell at `row` as an exact decimal, `None` for NULL
	pub fn decimal(&self, row: usize) -> Result<Option<BigDecimal>> {
		let ColumnData::Fixed(fixed) = &self.data else {
			return Err(Error::ColumnType {
				expected: "decimal",
				actual: self.ty,
			});
		};
		self.check_row(row)?;
		if fixed.is_null(row) {
			return Ok(None);
		}

		let value = fixed.data.value(row);
		if let Some(unscaled) = value.as_i128() {
			return Ok(Some(decimal::from_unscaled(unscaled, fixed.scale)));
		}
		let decimal = value.as_f64().and_then(BigDecimal::from_f64);
		Ok(decimal)
	}

	/// Limit the visible rows to `rows`
	pub fn truncate(&mut self, rows: usize) {
		match &mut self.data {
			ColumnData::Fixed(fixed) => {
				fixed.data.truncate(rows);
				if let Some(nulls) = fixed.nulls.as_mut() {
					nulls.truncate(rows);
				}
			}
			ColumnData::Boxed(boxed) => boxed.truncate(rows),
		}
	}

	fn check_row(&self, row: usize) -> Result<()> {
		let rows = self.len();
		if row >= rows {
			return Err(Error::RowOutOfBounds {
				row,
				rows,
			});
		}
		Ok(())
	}
}
