// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::{c_char, c_int};

/// Connection to a remote MonetDB server (`monetdbe_remote`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RemoteFFI {
	pub host: *const c_char,
	pub port: c_int,
	pub database: *const c_char,
	pub username: *const c_char,
	pub password: *const c_char,
	pub lang: *const c_char,
}

/// Embedded MAPI listener configuration (`monetdbe_mapi_server`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MapiServerFFI {
	pub host: *const c_char,
	pub port: *const c_char,
	pub usock: *const c_char,
}

/// Options passed to `monetdbe_open` (`monetdbe_options`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct OptionsFFI {
	/// Memory limit in megabytes, 0 for unlimited
	pub memorylimit: c_int,
	/// Query timeout in seconds, 0 for none
	pub querytimeout: c_int,
	/// Session timeout in milliseconds, 0 for none
	pub sessiontimeout: c_int,
	/// Worker threads, 0 for the engine default
	pub nr_threads: c_int,
	pub remote: *mut RemoteFFI,
	pub mapi_server: *mut MapiServerFFI,
	/// Path of the engine trace log, may be null
	pub trace_file: *const c_char,
}

impl OptionsFFI {
	pub const fn empty() -> Self {
		Self {
			memorylimit: 0,
			querytimeout: 0,
			sessiontimeout: 0,
			nr_threads: 0,
			remote: core::ptr::null_mut(),
			mapi_server: core::ptr::null_mut(),
			trace_file: core::ptr::null(),
		}
	}
}
