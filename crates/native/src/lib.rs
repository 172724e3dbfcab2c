// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Access to the monetdbe C API
//!
//! [`NativeLibrary`] resolves the API from a shared library at runtime.
//! [`Api`] wraps a function table, from a library or from an in-process
//! engine, and turns the engine's error strings into [`monetdbe_type::Error`].

mod api;
mod library;

pub use api::{Api, Executed};
pub use library::{LIBRARY_ENV, NativeLibrary};
