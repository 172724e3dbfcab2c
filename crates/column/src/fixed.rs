// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::slice;

use monetdbe_abi::TypedColumnFFI;
use monetdbe_type::{Error, Result};
use tracing::trace;

use crate::{ColumnData, FixedColumn, FixedData};

/// Rewrite null sentinels of a fixed-width column to zero and expose the
/// native buffer as a slice.
///
/// When the column has a decimal scale, rows that were NULL are recorded in a
/// null mask that is allocated on the first NULL row. Other fixed-width
/// columns lose the distinction between NULL and zero.
///
/// A descriptor reporting rows without a buffer is a native error.
///
/// # Safety
/// - `column` must point to a live descriptor whose `data` is null or holds
///   `count` initialised cells of `T`
/// - the cells must stay valid, and must not be written by anyone else, for `'r`
pub(crate) unsafe fn materialize<'r, T: Copy + Default>(
	column: *mut TypedColumnFFI<T>,
	wrap: fn(&'r [T]) -> FixedData<'r>,
) -> Result<ColumnData<'r>> {
	// SAFETY: guaranteed by the caller
	let column = unsafe { &*column };
	let count = column.count;
	let precision = column.sql_type.digits;
	let scale = column.sql_type.scale;

	if column.data.is_null() && count > 0 {
		return Err(Error::native("monetdbe_result_fetch", format!("column has {} rows but no data buffer", count)));
	}
	if count == 0 {
		return Ok(ColumnData::Fixed(FixedColumn {
			data: wrap(&[]),
			precision,
			scale,
			nulls: None,
		}));
	}

	let mut nulls: Option<Vec<bool>> = None;
	let mut zeroed = 0usize;
	if let Some(is_null) = column.is_null {
		for row in 0..count {
			// SAFETY: row < count
			let slot = unsafe { column.data.add(row) };
			// SAFETY: slot points to an initialised cell of this column
			if unsafe { is_null(slot) } == 0 {
				continue;
			}
			// SAFETY: the buffer is owned by the live result and not shared
			unsafe { slot.write(T::default()) };
			zeroed += 1;
			if scale != 0 {
				nulls.get_or_insert_with(|| vec![false; count])[row] = true;
			}
		}
	}
	if zeroed > 0 {
		trace!(rows = count, nulls = zeroed, "zeroed null sentinels");
	}

	// SAFETY: data holds count cells valid for 'r
	let cells: &'r [T] = unsafe { slice::from_raw_parts(column.data as *const T, count) };
	Ok(ColumnData::Fixed(FixedColumn {
		data: wrap(cells),
		precision,
		scale,
		nulls,
	}))
}
