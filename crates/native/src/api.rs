// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CStr, c_char, c_int, c_void},
	fmt::{self, Debug},
	path::Path,
	ptr::{self, NonNull},
	sync::Arc,
};

use monetdbe_abi::{
	ColumnFFI, DatabaseHandle, MonetdbeVTable, OptionsFFI, ResultFFI, StatementFFI, constants::MONETDBE_OK,
};
use monetdbe_type::{Error, NativeLayout, Result, Type};
use tracing::{debug, trace, warn};

use crate::NativeLibrary;

/// Outcome of `monetdbe_query` and `monetdbe_execute`
#[derive(Debug)]
pub struct Executed {
	/// Result set, absent when the statement produced none
	pub result: Option<NonNull<ResultFFI>>,
	pub affected_rows: i64,
}

/// Checked access to a monetdbe function table.
///
/// Every method forwards to the matching C function and converts a non-null
/// error string into [`Error::Native`] with the engine's message unchanged.
/// Handles are passed through as raw pointers; their ownership is managed by
/// the caller.
#[derive(Clone)]
pub struct Api {
	vtable: MonetdbeVTable,
	layout: NativeLayout,
	library: Option<Arc<NativeLibrary>>,
}

impl Api {
	/// Use a function table that stays valid for the life of the process
	pub fn from_vtable(vtable: MonetdbeVTable, layout: NativeLayout) -> Self {
		Self {
			vtable,
			layout,
			library: None,
		}
	}

	pub fn from_library(library: NativeLibrary, layout: NativeLayout) -> Self {
		Self {
			vtable: *library.vtable(),
			layout,
			library: Some(Arc::new(library)),
		}
	}

	pub fn load(path: impl AsRef<Path>, layout: NativeLayout) -> Result<Self> {
		Ok(Self::from_library(NativeLibrary::load(path)?, layout))
	}

	pub fn from_env(layout: NativeLayout) -> Result<Self> {
		Ok(Self::from_library(NativeLibrary::from_env()?, layout))
	}

	pub fn layout(&self) -> NativeLayout {
		self.layout
	}

	pub fn vtable(&self) -> &MonetdbeVTable {
		&self.vtable
	}

	/// Open a database, in memory when `url` is `None`
	///
	/// # Safety
	/// `options` must be null or point to options whose strings outlive the call.
	pub unsafe fn open(&self, url: Option<&CStr>, options: *mut OptionsFFI) -> Result<NonNull<c_void>> {
		let mut db: DatabaseHandle = ptr::null_mut();
		let url_ptr = url.map_or(ptr::null(), CStr::as_ptr);
		// SAFETY: db and url are valid for the call, options per the caller
		let code = unsafe { (self.vtable.open)(&mut db, url_ptr, options) };
		if code != MONETDBE_OK {
			let message = match NonNull::new(db) {
				Some(db) => {
					// SAFETY: a failed open still hands out a handle that
					// reports the failure and must be closed
					let message = unsafe { self.error(db) };
					// SAFETY: closed exactly once, not used afterwards
					if let Err(error) = unsafe { self.close(db) } {
						warn!(%error, "failed to close database after a failed open");
					}
					message
				}
				None => None,
			};
			return Err(Error::native(
				"monetdbe_open",
				message.unwrap_or_else(|| format!("monetdbe_open failed with code {}", code)),
			));
		}
		let db = NonNull::new(db).ok_or_else(|| Error::native("monetdbe_open", "no database handle returned"))?;
		debug!(in_memory = url.is_none(), "opened database");
		Ok(db)
	}

	/// # Safety
	/// `db` must be an open database; it is invalid after this call.
	pub unsafe fn close(&self, db: NonNull<c_void>) -> Result<()> {
		// SAFETY: guaranteed by the caller
		let code = unsafe { (self.vtable.close)(db.as_ptr()) };
		if code != MONETDBE_OK {
			// SAFETY: the handle stays readable for its error message
			let message = unsafe { self.error(db) };
			return Err(Error::native(
				"monetdbe_close",
				message.unwrap_or_else(|| format!("monetdbe_close failed with code {}", code)),
			));
		}
		Ok(())
	}

	/// Message of the last failure on `db`
	///
	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn error(&self, db: NonNull<c_void>) -> Option<String> {
		// SAFETY: guaranteed by the caller
		let message = unsafe { (self.vtable.error)(db.as_ptr()) };
		// SAFETY: the engine returns null or a NUL-terminated string
		unsafe { message_string(message) }
	}

	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn autocommit(&self, db: NonNull<c_void>) -> Result<bool> {
		let mut value: c_int = 0;
		// SAFETY: guaranteed by the caller
		unsafe { check("monetdbe_get_autocommit", (self.vtable.get_autocommit)(db.as_ptr(), &mut value))? };
		Ok(value != 0)
	}

	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn set_autocommit(&self, db: NonNull<c_void>, enabled: bool) -> Result<()> {
		// SAFETY: guaranteed by the caller
		unsafe { check("monetdbe_set_autocommit", (self.vtable.set_autocommit)(db.as_ptr(), enabled as c_int)) }
	}

	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn query(&self, db: NonNull<c_void>, sql: &CStr) -> Result<Executed> {
		let mut result: *mut ResultFFI = ptr::null_mut();
		let mut affected_rows: i64 = 0;
		// SAFETY: guaranteed by the caller; the engine does not write through the query text
		unsafe {
			check(
				"monetdbe_query",
				(self.vtable.query)(db.as_ptr(), sql.as_ptr() as *mut c_char, &mut result, &mut affected_rows),
			)?
		};
		trace!(has_result = !result.is_null(), affected_rows, "query executed");
		Ok(Executed {
			result: NonNull::new(result),
			affected_rows,
		})
	}

	/// Descriptor of column `index`
	///
	/// # Safety
	/// `result` must be a live result set.
	pub unsafe fn result_fetch(&self, result: NonNull<ResultFFI>, index: usize) -> Result<NonNull<ColumnFFI>> {
		let mut column: *mut ColumnFFI = ptr::null_mut();
		// SAFETY: guaranteed by the caller
		unsafe { check("monetdbe_result_fetch", (self.vtable.result_fetch)(result.as_ptr(), &mut column, index))? };
		NonNull::new(column).ok_or_else(|| Error::native("monetdbe_result_fetch", "no column descriptor returned"))
	}

	/// # Safety
	/// `result` must be a live result set of `db`; it is invalid after this call.
	pub unsafe fn cleanup_result(&self, db: NonNull<c_void>, result: NonNull<ResultFFI>) -> Result<()> {
		// SAFETY: guaranteed by the caller
		unsafe { check("monetdbe_cleanup_result", (self.vtable.cleanup_result)(db.as_ptr(), result.as_ptr())) }
	}

	/// Prepare `sql`, returning the statement and the description of its
	/// parameters and output columns
	///
	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn prepare(
		&self,
		db: NonNull<c_void>,
		sql: &CStr,
	) -> Result<(NonNull<StatementFFI>, Option<NonNull<ResultFFI>>)> {
		let mut statement: *mut StatementFFI = ptr::null_mut();
		let mut description: *mut ResultFFI = ptr::null_mut();
		// SAFETY: guaranteed by the caller
		unsafe {
			check(
				"monetdbe_prepare",
				(self.vtable.prepare)(db.as_ptr(), sql.as_ptr() as *mut c_char, &mut statement, &mut description),
			)?
		};
		let statement =
			NonNull::new(statement).ok_or_else(|| Error::native("monetdbe_prepare", "no statement returned"))?;
		Ok((statement, NonNull::new(description)))
	}

	/// Bind `data` to the 0-based parameter `index`
	///
	/// # Safety
	/// `statement` must be live and `data` must point to a value of the
	/// parameter's native type that stays valid until execution or rebinding.
	pub unsafe fn bind(&self, statement: NonNull<StatementFFI>, data: *const c_void, index: usize) -> Result<()> {
		// SAFETY: guaranteed by the caller
		unsafe { check("monetdbe_bind", (self.vtable.bind)(statement.as_ptr(), data as *mut c_void, index)) }
	}

	/// # Safety
	/// `statement` must be live with every parameter bound.
	pub unsafe fn execute(&self, statement: NonNull<StatementFFI>) -> Result<Executed> {
		let mut result: *mut ResultFFI = ptr::null_mut();
		let mut affected_rows: i64 = 0;
		// SAFETY: guaranteed by the caller
		unsafe {
			check("monetdbe_execute", (self.vtable.execute)(statement.as_ptr(), &mut result, &mut affected_rows))?
		};
		Ok(Executed {
			result: NonNull::new(result),
			affected_rows,
		})
	}

	/// # Safety
	/// `statement` must be a live statement of `db`; it is invalid after this call.
	pub unsafe fn cleanup_statement(&self, db: NonNull<c_void>, statement: NonNull<StatementFFI>) -> Result<()> {
		// SAFETY: guaranteed by the caller
		unsafe {
			check("monetdbe_cleanup_statement", (self.vtable.cleanup_statement)(db.as_ptr(), statement.as_ptr()))
		}
	}

	/// Address of the engine's null sentinel for `ty`, translated to the
	/// native numbering first
	///
	/// # Safety
	/// `db` must be an open database.
	pub unsafe fn null(&self, db: NonNull<c_void>, ty: Type) -> Result<NonNull<c_void>> {
		let code = self.layout.encode(ty)?;
		// SAFETY: guaranteed by the caller
		let sentinel = unsafe { (self.vtable.null)(db.as_ptr(), code) };
		NonNull::new(sentinel as *mut c_void)
			.ok_or_else(|| Error::native("monetdbe_null", format!("no null value for {}", ty)))
	}
}

impl Debug for Api {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Api").field("layout", &self.layout).field("library", &self.library).finish()
	}
}

/// # Safety
/// `message` must be null or a NUL-terminated string.
unsafe fn message_string(message: *const c_char) -> Option<String> {
	if message.is_null() {
		return None;
	}
	// SAFETY: guaranteed by the caller
	Some(unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned())
}

/// # Safety
/// `message` must be null or a NUL-terminated string.
unsafe fn check(operation: &'static str, message: *mut c_char) -> Result<()> {
	// SAFETY: guaranteed by the caller
	match unsafe { message_string(message) } {
		None => Ok(()),
		Some(message) => {
			debug!(operation, %message, "native call failed");
			Err(Error::native(operation, message))
		}
	}
}
