// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CStr, c_char},
	ptr::NonNull,
};

use monetdbe_abi::{BlobFFI, ColumnFFI, DateFFI, TimeFFI, TimestampFFI, TypedColumnFFI};
use monetdbe_type::{Error, NativeLayout, Result, Type};
use tracing::error;

use crate::{BoxedData, Column, ColumnData, FixedData, boxed, fixed};

/// Materialize one native column descriptor.
///
/// The type tag is decoded through `layout`; a tag that names no supported
/// type fails with [`Error::UnsupportedType`]. Fixed-width cells are rewritten
/// in place, see [`crate::FixedColumn`], so materializing the same descriptor
/// twice can no longer tell NULL from zero.
///
/// # Safety
/// - `descriptor` must come from `monetdbe_result_fetch` on a result that is
///   not cleaned up during `'r`
/// - no other reference to the column's cells may be alive during `'r`
pub unsafe fn materialize<'r>(descriptor: NonNull<ColumnFFI>, index: usize, layout: NativeLayout) -> Result<Column<'r>> {
	let raw = descriptor.as_ptr();
	// SAFETY: guaranteed by the caller
	let header = unsafe { &*raw };
	let code = header.type_code;
	// SAFETY: the name is null or NUL-terminated
	let name = unsafe { column_name(header.name) };

	let unsupported = || {
		error!(column = index, code, name = %name, "unsupported native column type");
		Error::UnsupportedType {
			column: index,
			code,
		}
	};
	let ty = layout.decode(code).ok_or_else(unsupported)?;
	// SAFETY: guaranteed by the caller
	let data = unsafe { materialize_as(raw, ty) }?.ok_or_else(unsupported)?;

	Ok(Column {
		name,
		ty,
		data,
	})
}

/// Route a descriptor to the materializer of `ty`, `None` for types that
/// have none.
///
/// # Safety
/// As [`materialize`], and `raw` must have the typed layout of `ty`.
unsafe fn materialize_as<'r>(raw: *mut ColumnFFI, ty: Type) -> Result<Option<ColumnData<'r>>> {
	// SAFETY: guaranteed by the caller
	let data = unsafe {
		match ty {
			Type::Bool => fixed::materialize(cast::<i8>(raw), FixedData::Bool)?,
			Type::Int8 => fixed::materialize(cast::<i8>(raw), FixedData::Int8)?,
			Type::Int16 => fixed::materialize(cast::<i16>(raw), FixedData::Int16)?,
			Type::Int32 => fixed::materialize(cast::<i32>(raw), FixedData::Int32)?,
			Type::Int64 => fixed::materialize(cast::<i64>(raw), FixedData::Int64)?,
			Type::Int128 => fixed::materialize(cast::<i128>(raw), FixedData::Int128)?,
			Type::Size => fixed::materialize(cast::<usize>(raw), FixedData::Size)?,
			Type::Float => fixed::materialize(cast::<f32>(raw), FixedData::Float)?,
			Type::Double => fixed::materialize(cast::<f64>(raw), FixedData::Double)?,
			Type::Str => ColumnData::Boxed(BoxedData::Str(boxed::strings(cast::<*mut c_char>(raw)))),
			Type::Blob => ColumnData::Boxed(BoxedData::Blob(boxed::blobs(cast::<BlobFFI>(raw)))),
			Type::Date => ColumnData::Boxed(BoxedData::Date(boxed::dates(cast::<DateFFI>(raw)))),
			Type::Time => ColumnData::Boxed(BoxedData::Time(boxed::times(cast::<TimeFFI>(raw)))),
			Type::Timestamp => ColumnData::Boxed(BoxedData::Timestamp(boxed::timestamps(cast::<TimestampFFI>(raw)))),
			Type::Unknown => return Ok(None),
		}
	};
	Ok(Some(data))
}

fn cast<T>(raw: *mut ColumnFFI) -> *mut TypedColumnFFI<T> {
	raw.cast()
}

unsafe fn column_name(name: *const c_char) -> String {
	if name.is_null() {
		return String::new();
	}
	// SAFETY: guaranteed by the caller
	unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned()
}
