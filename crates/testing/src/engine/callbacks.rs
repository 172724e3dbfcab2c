// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! C entry points of the in-process engine
//!
//! Each function mirrors its `monetdbe_*` counterpart: failures are reported
//! as a message owned by the database, result or statement and stay readable
//! until the next failure on the same handle.

use std::{
	ffi::{CStr, c_char, c_int, c_void},
	ptr,
};

use monetdbe_abi::{ColumnFFI, DatabaseHandle, OptionsFFI, ResultFFI, StatementFFI};
use monetdbe_type::NativeLayout;
use tracing::trace;

use super::{
	database::{Executed, FakeDatabase, check_parameters},
	nulls,
	result::FakeResult,
	sql::parse,
	statement::{FakeStatement, description},
	stats::record,
};

const INVALID_DATABASE: &CStr = c"invalid database handle";
const INVALID_RESULT: &CStr = c"invalid result handle";
const INVALID_STATEMENT: &CStr = c"invalid statement handle";

fn static_message(message: &'static CStr) -> *mut c_char {
	message.as_ptr() as *mut c_char
}

/// # Safety
/// `db` must be null or a handle returned by [`open`] that is not closed.
unsafe fn database<'a>(db: DatabaseHandle) -> Option<&'a mut FakeDatabase> {
	// SAFETY: guaranteed by the caller
	unsafe { db.cast::<FakeDatabase>().as_mut() }
}

/// # Safety
/// `sql` must be a NUL-terminated string.
unsafe fn sql_text(sql: *const c_char) -> Option<String> {
	if sql.is_null() {
		return None;
	}
	// SAFETY: guaranteed by the caller
	Some(unsafe { CStr::from_ptr(sql) }.to_string_lossy().into_owned())
}

// ============================================================================
// Lifecycle
// ============================================================================

pub(crate) unsafe extern "C" fn open<const HGE: bool>(
	db: *mut DatabaseHandle,
	url: *const c_char,
	options: *mut OptionsFFI,
) -> c_int {
	if db.is_null() {
		return -1;
	}
	let handle = Box::into_raw(Box::new(FakeDatabase::new(NativeLayout::new(HGE))));
	record(|s| s.open_databases += 1);
	// SAFETY: db is writable per the null check above
	unsafe { *db = handle.cast() };

	// SAFETY: url and options come from the caller as documented by monetdbe_open
	let failure = unsafe { validate_open(url, options) };
	match failure {
		None => {
			trace!(int128 = HGE, "fake engine opened");
			0
		}
		Some(message) => {
			// SAFETY: just allocated above
			unsafe { (*handle).fail(&message) };
			-2
		}
	}
}

/// # Safety
/// `url` must be null or NUL-terminated; `options` null or readable.
unsafe fn validate_open(url: *const c_char, options: *mut OptionsFFI) -> Option<String> {
	// SAFETY: guaranteed by the caller
	if let Some(url) = unsafe { sql_text(url) }
		&& url.starts_with("mapi:")
	{
		return Some(format!("monetdbe_open: remote database '{}' is not supported", url));
	}
	// SAFETY: guaranteed by the caller
	let options = unsafe { options.as_ref() }?;
	let negative = [
		("memorylimit", options.memorylimit),
		("querytimeout", options.querytimeout),
		("sessiontimeout", options.sessiontimeout),
		("nr_threads", options.nr_threads),
	]
	.into_iter()
	.find(|(_, value)| *value < 0);
	if let Some((name, value)) = negative {
		return Some(format!("monetdbe_open: {} must not be negative, got {}", name, value));
	}
	if !options.remote.is_null() || !options.mapi_server.is_null() {
		return Some("monetdbe_open: remote and mapi server options are not supported".to_string());
	}
	None
}

pub(crate) unsafe extern "C" fn close(db: DatabaseHandle) -> c_int {
	if db.is_null() {
		return -1;
	}
	// SAFETY: the handle was created by `open` and is closed once
	drop(unsafe { Box::from_raw(db.cast::<FakeDatabase>()) });
	record(|s| s.open_databases = s.open_databases.saturating_sub(1));
	0
}

pub(crate) unsafe extern "C" fn error(db: DatabaseHandle) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	match unsafe { database(db) } {
		Some(database) => database.last_error().map_or(ptr::null_mut(), |m| m.as_ptr() as *mut c_char),
		None => static_message(INVALID_DATABASE),
	}
}

pub(crate) unsafe extern "C" fn get_autocommit(db: DatabaseHandle, result: *mut c_int) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	if result.is_null() {
		return database.fail("monetdbe_get_autocommit: parameter 'result' must not be NULL");
	}
	// SAFETY: checked for null above
	unsafe { *result = database.autocommit() as c_int };
	ptr::null_mut()
}

pub(crate) unsafe extern "C" fn set_autocommit(db: DatabaseHandle, value: c_int) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	database.set_autocommit(value != 0);
	ptr::null_mut()
}

// ============================================================================
// Queries and results
// ============================================================================

pub(crate) unsafe extern "C" fn query(
	db: DatabaseHandle,
	query: *mut c_char,
	result: *mut *mut ResultFFI,
	affected_rows: *mut i64,
) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	// SAFETY: the query is a NUL-terminated string
	let Some(sql) = (unsafe { sql_text(query) }) else {
		return database.fail("monetdbe_query: query must not be NULL");
	};
	trace!(%sql, "fake engine query");
	match parse(&sql).and_then(|statement| database.execute(&statement, &[])) {
		Ok(executed) => {
			// SAFETY: out-parameters are null or writable
			unsafe { hand_out(executed, result, affected_rows) };
			ptr::null_mut()
		}
		Err(message) => database.fail(&message),
	}
}

/// # Safety
/// Both pointers must be null or writable.
unsafe fn hand_out(executed: Executed, result: *mut *mut ResultFFI, affected_rows: *mut i64) {
	let (rows, affected) = match executed {
		Executed::Rows(rows) => {
			let nrows = rows.row_count();
			(Some(rows), nrows)
		}
		Executed::Schema => (Some(FakeResult::empty()), 0),
		Executed::Affected(count) => (None, count),
	};
	if !result.is_null() {
		let raw = match rows {
			Some(rows) => {
				record(|s| s.live_results += 1);
				rows.into_raw()
			}
			None => ptr::null_mut(),
		};
		// SAFETY: checked for null above
		unsafe { *result = raw };
	}
	if !affected_rows.is_null() {
		// SAFETY: checked for null above
		unsafe { *affected_rows = affected };
	}
}

pub(crate) unsafe extern "C" fn result_fetch(
	result: *mut ResultFFI,
	column: *mut *mut ColumnFFI,
	column_index: usize,
) -> *mut c_char {
	// SAFETY: the result was handed out by this engine and is still live
	let Some(result) = (unsafe { result.cast::<FakeResult>().as_mut() }) else {
		return static_message(INVALID_RESULT);
	};
	if column.is_null() {
		return result.fail("monetdbe_result_fetch: parameter 'res' must not be NULL".to_string());
	}
	match result.column(column_index) {
		Some(descriptor) => {
			record(|s| s.fetches += 1);
			// SAFETY: checked for null above
			unsafe { *column = descriptor };
			ptr::null_mut()
		}
		None => result.fail(format!(
			"monetdbe_result_fetch: column index {} is out of range, the result has {} columns",
			column_index,
			result.column_count()
		)),
	}
}

pub(crate) unsafe extern "C" fn cleanup_result(db: DatabaseHandle, result: *mut ResultFFI) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	if result.is_null() {
		return database.fail("monetdbe_cleanup_result: parameter 'result' must not be NULL");
	}
	// SAFETY: handed out by `hand_out` or `prepare` and released once
	drop(unsafe { FakeResult::from_raw(result) });
	record(|s| s.live_results = s.live_results.saturating_sub(1));
	ptr::null_mut()
}

// ============================================================================
// Prepared statements
// ============================================================================

pub(crate) unsafe extern "C" fn prepare(
	db: DatabaseHandle,
	query: *mut c_char,
	stmt: *mut *mut StatementFFI,
	result: *mut *mut ResultFFI,
) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	if stmt.is_null() {
		return database.fail("monetdbe_prepare: parameter 'stmt' must not be NULL");
	}
	// SAFETY: the query is a NUL-terminated string
	let Some(sql) = (unsafe { sql_text(query) }) else {
		return database.fail("monetdbe_prepare: query must not be NULL");
	};
	let layout = database.layout();
	let prepared = parse(&sql).and_then(|statement| {
		let parameters = database.parameter_types(&statement)?;
		check_parameters(layout, &parameters)?;
		let (table, outputs) = database.output_columns(&statement)?;
		let described = description(layout, &table, &outputs, &parameters)?;
		let statement = FakeStatement::new(db.cast(), layout, statement, parameters)?;
		Ok((statement, described))
	});
	match prepared {
		Ok((statement, described)) => {
			record(|s| s.live_statements += 1);
			// SAFETY: checked for null above
			unsafe { *stmt = statement.into_raw() };
			if !result.is_null() {
				record(|s| s.live_results += 1);
				// SAFETY: checked for null above
				unsafe { *result = described.into_raw() };
			}
			ptr::null_mut()
		}
		Err(message) => database.fail(&message),
	}
}

pub(crate) unsafe extern "C" fn bind(stmt: *mut StatementFFI, data: *mut c_void, parameter_nr: usize) -> *mut c_char {
	// SAFETY: the statement was handed out by `prepare` and is still live
	let Some(statement) = (unsafe { stmt.cast::<FakeStatement>().as_mut() }) else {
		return static_message(INVALID_STATEMENT);
	};
	// SAFETY: data points to the parameter's native representation
	match unsafe { statement.bind(data, parameter_nr) } {
		Ok(()) => ptr::null_mut(),
		// SAFETY: the database outlives its statements
		Err(message) => match unsafe { database(statement.db.cast()) } {
			Some(database) => database.fail(&message),
			None => static_message(INVALID_DATABASE),
		},
	}
}

pub(crate) unsafe extern "C" fn execute(
	stmt: *mut StatementFFI,
	result: *mut *mut ResultFFI,
	affected_rows: *mut i64,
) -> *mut c_char {
	// SAFETY: the statement was handed out by `prepare` and is still live
	let Some(statement) = (unsafe { stmt.cast::<FakeStatement>().as_mut() }) else {
		return static_message(INVALID_STATEMENT);
	};
	// SAFETY: the database outlives its statements
	let Some(database) = (unsafe { database(statement.db.cast()) }) else {
		return static_message(INVALID_DATABASE);
	};
	match statement.bound().and_then(|parameters| database.execute(&statement.statement, &parameters)) {
		Ok(executed) => {
			// SAFETY: out-parameters are null or writable
			unsafe { hand_out(executed, result, affected_rows) };
			ptr::null_mut()
		}
		Err(message) => database.fail(&message),
	}
}

pub(crate) unsafe extern "C" fn cleanup_statement(db: DatabaseHandle, stmt: *mut StatementFFI) -> *mut c_char {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return static_message(INVALID_DATABASE);
	};
	if stmt.is_null() {
		return database.fail("monetdbe_cleanup_statement: parameter 'stmt' must not be NULL");
	}
	// SAFETY: handed out by `prepare` and released once
	drop(unsafe { FakeStatement::from_raw(stmt) });
	record(|s| s.live_statements = s.live_statements.saturating_sub(1));
	ptr::null_mut()
}

pub(crate) unsafe extern "C" fn null(db: DatabaseHandle, type_code: c_int) -> *const c_void {
	// SAFETY: handle validity is the caller's contract
	let Some(database) = (unsafe { database(db) }) else {
		return ptr::null();
	};
	database.layout().decode(type_code).map_or(ptr::null(), nulls::sentinel)
}
