// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CString, c_int},
	path::PathBuf,
	ptr,
	time::Duration,
};

use monetdbe_abi::OptionsFFI;
use monetdbe_type::{Error, NativeLayout, Result};
use serde::{Deserialize, Deserializer};

/// Settings applied when opening a database
///
/// Deserializes from a config file with every field optional; timeouts are
/// given in milliseconds there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
	/// Memory limit in megabytes, 0 for unlimited
	pub memory_limit: u32,
	/// Passed to the engine in whole seconds, zero for none
	#[serde(deserialize_with = "millis")]
	pub query_timeout: Duration,
	/// Passed to the engine in milliseconds, zero for none
	#[serde(deserialize_with = "millis")]
	pub session_timeout: Duration,
	/// Worker threads, 0 for the engine default
	pub threads: u32,
	pub trace_file: Option<PathBuf>,
	/// Applied right after opening
	pub autocommit: bool,
	/// Whether the library was built with 128-bit integers; selects the
	/// native type numbering when the library is loaded through [`Options`]
	pub int128: bool,
}

impl Options {
	pub fn new() -> Self {
		Self {
			memory_limit: 0,
			query_timeout: Duration::ZERO,
			session_timeout: Duration::ZERO,
			threads: 0,
			trace_file: None,
			autocommit: true,
			int128: cfg!(feature = "int128"),
		}
	}

	pub fn with_memory_limit(mut self, megabytes: u32) -> Self {
		self.memory_limit = megabytes;
		self
	}

	pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
		self.query_timeout = timeout;
		self
	}

	pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
		self.session_timeout = timeout;
		self
	}

	pub fn with_threads(mut self, threads: u32) -> Self {
		self.threads = threads;
		self
	}

	pub fn with_trace_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.trace_file = Some(path.into());
		self
	}

	pub fn with_autocommit(mut self, enabled: bool) -> Self {
		self.autocommit = enabled;
		self
	}

	pub fn with_int128(mut self, enabled: bool) -> Self {
		self.int128 = enabled;
		self
	}

	pub fn layout(&self) -> NativeLayout {
		NativeLayout::new(self.int128)
	}

	/// Native form of these options. Remote and MAPI server settings are
	/// never set.
	pub fn to_ffi(&self) -> Result<NativeOptions> {
		let trace_file = self
			.trace_file
			.as_ref()
			.map(|path| CString::new(path.as_os_str().as_encoded_bytes()))
			.transpose()?;
		let raw = OptionsFFI {
			memorylimit: to_c_int("memory_limit", self.memory_limit as u128)?,
			querytimeout: to_c_int("query_timeout", self.query_timeout.as_secs() as u128)?,
			sessiontimeout: to_c_int("session_timeout", self.session_timeout.as_millis())?,
			nr_threads: to_c_int("threads", self.threads as u128)?,
			remote: ptr::null_mut(),
			mapi_server: ptr::null_mut(),
			trace_file: trace_file.as_ref().map_or(ptr::null(), |path| path.as_ptr()),
		};
		Ok(NativeOptions {
			raw,
			_trace_file: trace_file,
		})
	}
}

impl Default for Options {
	fn default() -> Self {
		Self::new()
	}
}

fn to_c_int(name: &str, value: u128) -> Result<c_int> {
	c_int::try_from(value).map_err(|_| Error::OutOfRange(format!("{} {}", name, value)))
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
	u64::deserialize(deserializer).map(Duration::from_millis)
}

/// [`OptionsFFI`] together with the strings it points to
#[derive(Debug)]
pub struct NativeOptions {
	raw: OptionsFFI,
	_trace_file: Option<CString>,
}

impl NativeOptions {
	pub fn as_ptr(&mut self) -> *mut OptionsFFI {
		&mut self.raw
	}
}

/// Per-query settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
	/// Report the affected row count as 64 bits
	pub large_update: bool,
	/// Visible rows of a result, 0 for all
	pub max_rows: usize,
}

impl QueryOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_large_update(mut self, enabled: bool) -> Self {
		self.large_update = enabled;
		self
	}

	pub fn with_max_rows(mut self, rows: usize) -> Self {
		self.max_rows = rows;
		self
	}
}

#[cfg(test)]
mod tests {
	use std::ffi::CStr;

	use super::*;

	#[test]
	fn test_defaults() {
		let options = Options::default();
		assert!(options.autocommit);
		assert_eq!(options.int128, cfg!(feature = "int128"));
		let mut native = options.to_ffi().unwrap();
		let raw = unsafe { &*native.as_ptr() };
		assert_eq!(raw.memorylimit, 0);
		assert!(raw.trace_file.is_null());
		assert!(raw.remote.is_null());
	}

	#[test]
	fn test_timeouts_units() {
		let options = Options::new()
			.with_query_timeout(Duration::from_millis(2500))
			.with_session_timeout(Duration::from_millis(2500))
			.with_trace_file("/tmp/trace.log");
		let mut native = options.to_ffi().unwrap();
		let raw = unsafe { &*native.as_ptr() };
		assert_eq!(raw.querytimeout, 2);
		assert_eq!(raw.sessiontimeout, 2500);
		assert_eq!(unsafe { CStr::from_ptr(raw.trace_file) }.to_str().unwrap(), "/tmp/trace.log");
	}

	#[test]
	fn test_out_of_range() {
		let options = Options::new().with_memory_limit(u32::MAX);
		assert!(matches!(options.to_ffi(), Err(Error::OutOfRange(_))));
	}

	#[test]
	fn test_deserialize() {
		let options: Options =
			serde_json::from_str(r#"{"memory_limit": 512, "query_timeout": 3000, "autocommit": false}"#).unwrap();
		assert_eq!(options.memory_limit, 512);
		assert_eq!(options.query_timeout, Duration::from_secs(3));
		assert!(!options.autocommit);
		assert_eq!(options.threads, 0);
	}

	#[test]
	fn test_query_options() {
		let options = QueryOptions::new().with_max_rows(10).with_large_update(true);
		assert_eq!(options.max_rows, 10);
		assert!(options.large_update);
		assert_eq!(QueryOptions::default().max_rows, 0);
	}
}
