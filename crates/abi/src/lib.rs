// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! C ABI definitions for the monetdbe embedded database
//!
//! This crate mirrors the structures and function signatures of `monetdbe.h`.
//! Every type is `#[repr(C)]` and carries no behaviour beyond construction
//! helpers; marshalling into managed values lives in `monetdbe-column`.

pub mod constants;
pub mod data;
pub mod options;
pub mod result;
pub mod vtable;

pub use data::{BlobFFI, ColumnFFI, DateFFI, IsNullFn, SqlTypeFFI, TimeFFI, TimestampFFI, TypedColumnFFI};
pub use options::{MapiServerFFI, OptionsFFI, RemoteFFI};
pub use result::{ResultFFI, StatementFFI};
pub use vtable::{DatabaseHandle, MonetdbeVTable};
