// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

mod blob;
mod column;
mod temporal;

pub use blob::BlobFFI;
pub use column::{ColumnFFI, IsNullFn, SqlTypeFFI, TypedColumnFFI};
pub use temporal::{DateFFI, TimeFFI, TimestampFFI};
