// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	env,
	ffi::OsString,
	fmt::{self, Debug},
	path::{Path, PathBuf},
};

use libloading::Library;
use monetdbe_abi::MonetdbeVTable;
use monetdbe_type::{Error, Result};
use tracing::{debug, instrument};

/// Environment variable naming the monetdbe shared library to load
pub const LIBRARY_ENV: &str = "MONETDBE_LIBRARY";

/// A loaded monetdbe shared library and its resolved function table
pub struct NativeLibrary {
	path: PathBuf,
	vtable: MonetdbeVTable,
	// keeps the symbols in `vtable` mapped
	_library: Library,
}

impl NativeLibrary {
	/// Load the library at `path` and resolve every API symbol
	#[instrument(name = "native::load", level = "debug", skip_all, fields(path = %path.as_ref().display()))]
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		// SAFETY: loading runs the library's initialisers; libmonetdbe has no
		// preconditions for them
		let library = unsafe { Library::new(&path) }.map_err(|err| library_error(&path, err))?;

		// SAFETY: every symbol is declared in monetdbe.h with the signature of
		// the matching vtable entry
		let vtable = unsafe {
			MonetdbeVTable {
				open: symbol(&library, &path, "monetdbe_open")?,
				close: symbol(&library, &path, "monetdbe_close")?,
				error: symbol(&library, &path, "monetdbe_error")?,
				get_autocommit: symbol(&library, &path, "monetdbe_get_autocommit")?,
				set_autocommit: symbol(&library, &path, "monetdbe_set_autocommit")?,
				query: symbol(&library, &path, "monetdbe_query")?,
				result_fetch: symbol(&library, &path, "monetdbe_result_fetch")?,
				cleanup_result: symbol(&library, &path, "monetdbe_cleanup_result")?,
				prepare: symbol(&library, &path, "monetdbe_prepare")?,
				bind: symbol(&library, &path, "monetdbe_bind")?,
				execute: symbol(&library, &path, "monetdbe_execute")?,
				cleanup_statement: symbol(&library, &path, "monetdbe_cleanup_statement")?,
				null: symbol(&library, &path, "monetdbe_null")?,
			}
		};
		debug!("resolved monetdbe symbols");

		Ok(Self {
			path,
			vtable,
			_library: library,
		})
	}

	/// Load the library named by [`LIBRARY_ENV`], or the platform's default
	/// file name for `monetdbe` found on the loader search path.
	pub fn from_env() -> Result<Self> {
		let path = env::var_os(LIBRARY_ENV).unwrap_or_else(|| OsString::from(libloading::library_filename("monetdbe")));
		Self::load(PathBuf::from(path))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn vtable(&self) -> &MonetdbeVTable {
		&self.vtable
	}
}

impl Debug for NativeLibrary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeLibrary").field("path", &self.path).finish_non_exhaustive()
	}
}

/// # Safety
/// `T` must be the function pointer type of the symbol `name`.
unsafe fn symbol<T: Copy>(library: &Library, path: &Path, name: &str) -> Result<T> {
	// SAFETY: guaranteed by the caller
	let symbol = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|err| library_error(path, err))?;
	Ok(*symbol)
}

fn library_error(path: &Path, err: libloading::Error) -> Error {
	Error::Library {
		path: path.display().to_string(),
		message: err.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_library() {
		let err = NativeLibrary::load("/nonexistent/libmonetdbe.so").unwrap_err();
		match err {
			Error::Library {
				path,
				..
			} => assert_eq!(path, "/nonexistent/libmonetdbe.so"),
			other => panic!("unexpected error: {other}"),
		}
	}
}
