// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CString, c_void},
	fmt::{self, Debug},
	path::Path,
	ptr::NonNull,
};

use monetdbe_native::Api;
use monetdbe_type::{NativeLayout, Result};
use tracing::{debug, instrument, warn};

use crate::{Options, Outcome, QueryOptions, Statement};

/// An open monetdbe database, closed when dropped.
///
/// Results and statements borrow the database, so it outlives them. The
/// engine serializes calls per connection but a handle must not be used from
/// two threads at once: the type is `Send` and not `Sync`.
pub struct Database {
	api: Api,
	handle: NonNull<c_void>,
	closed: bool,
}

// SAFETY: the handle is only touched through `&Database`, which is not `Sync`
unsafe impl Send for Database {}

impl Database {
	/// Open the database at `url`, or in memory for `None`
	#[instrument(name = "database::open", level = "debug", skip(api, options), fields(in_memory = url.is_none()))]
	pub fn open(api: Api, url: Option<&str>, options: &Options) -> Result<Self> {
		let url = url.map(CString::new).transpose()?;
		let mut native = options.to_ffi()?;
		// SAFETY: the option strings live in `native` across the call
		let handle = unsafe { api.open(url.as_deref(), native.as_ptr()) }?;
		let db = Self {
			api,
			handle,
			closed: false,
		};
		if !options.autocommit {
			db.set_autocommit(false)?;
		}
		debug!(layout = ?db.layout(), "database opened");
		Ok(db)
	}

	pub fn in_memory(api: Api) -> Result<Self> {
		Self::open(api, None, &Options::default())
	}

	/// Load the library at `path` and open a database with it. The native type
	/// numbering follows [`Options::int128`].
	pub fn load(path: impl AsRef<Path>, url: Option<&str>, options: &Options) -> Result<Self> {
		Self::open(Api::load(path, options.layout())?, url, options)
	}

	/// Like [`Database::load`] with the library named by
	/// [`monetdbe_native::LIBRARY_ENV`]
	pub fn from_env(url: Option<&str>, options: &Options) -> Result<Self> {
		Self::open(Api::from_env(options.layout())?, url, options)
	}

	pub fn api(&self) -> &Api {
		&self.api
	}

	pub(crate) fn handle(&self) -> NonNull<c_void> {
		self.handle
	}

	pub fn layout(&self) -> NativeLayout {
		self.api.layout()
	}

	/// Last error message the engine recorded for this database
	pub fn last_error(&self) -> Option<String> {
		// SAFETY: the handle is open
		unsafe { self.api.error(self.handle) }
	}

	pub fn autocommit(&self) -> Result<bool> {
		// SAFETY: the handle is open
		unsafe { self.api.autocommit(self.handle) }
	}

	pub fn set_autocommit(&self, enabled: bool) -> Result<()> {
		// SAFETY: the handle is open
		unsafe { self.api.set_autocommit(self.handle, enabled) }
	}

	pub fn query(&self, sql: &str) -> Result<Outcome<'_>> {
		self.query_with(sql, QueryOptions::default())
	}

	#[instrument(name = "database::query", level = "debug", skip(self, options))]
	pub fn query_with(&self, sql: &str, options: QueryOptions) -> Result<Outcome<'_>> {
		let sql = CString::new(sql)?;
		// SAFETY: the handle is open
		let executed = unsafe { self.api.query(self.handle, &sql) }?;
		Outcome::new(self, executed, options)
	}

	#[instrument(name = "database::prepare", level = "debug", skip(self))]
	pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
		let sql = CString::new(sql)?;
		// SAFETY: the handle is open
		let (raw, description) = unsafe { self.api.prepare(self.handle, &sql) }?;
		Statement::new(self, raw, description)
	}

	/// Close now, reporting a failure instead of logging it
	pub fn close(mut self) -> Result<()> {
		self.closed = true;
		// SAFETY: closed exactly once; the flag stops `Drop`
		unsafe { self.api.close(self.handle) }
	}
}

impl Drop for Database {
	fn drop(&mut self) {
		if self.closed {
			return;
		}
		// SAFETY: closed exactly once
		if let Err(error) = unsafe { self.api.close(self.handle) } {
			warn!(%error, "failed to close database");
		}
	}
}

impl Debug for Database {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Database").field("layout", &self.layout()).finish_non_exhaustive()
	}
}
