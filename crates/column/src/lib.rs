// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Conversion of native result columns into managed columns
//!
//! Each native column descriptor is routed by its type tag to exactly one
//! materializer. Fixed-width columns become zero-copy views over the engine's
//! buffer after their null sentinels have been rewritten to zero. Strings,
//! blobs and temporal columns are copied into owned per-row values.

mod boxed;
mod column;
mod columns;
mod dispatch;
mod fixed;
mod validate;

pub use column::{BoxedData, Column, ColumnData, FixedColumn, FixedData};
pub use columns::Columns;
pub use dispatch::materialize;
