// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Embedded MonetDB for Rust
//!
//! ```no_run
//! use monetdbe::{Database, Options, Value};
//!
//! # fn main() -> monetdbe::Result<()> {
//! let db = Database::from_env(None, &Options::default())?;
//! db.query("CREATE TABLE t (n INT)")?;
//! let mut statement = db.prepare("INSERT INTO t VALUES (?)")?;
//! statement.bind(1, 42)?;
//! statement.execute()?;
//!
//! if let Some(mut result) = db.query("SELECT n FROM t")?.rows() {
//! 	let columns = result.fetch_all()?;
//! 	assert_eq!(columns.value(0, 0)?, Value::Int32(42));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Fixed-width result columns are views over the engine's buffers with nulls
//! rewritten to zero; other columns are copied, with invalid cells as nulls.

mod bind;
mod config;
mod database;
mod result;
mod statement;

pub use config::{NativeOptions, Options, QueryOptions};
pub use database::Database;
pub use monetdbe_column::{BoxedData, Column, ColumnData, Columns, FixedColumn, FixedData};
pub use monetdbe_native::{Api, LIBRARY_ENV, NativeLibrary};
pub use monetdbe_type::{Blob, Date, DateTime, Error, NativeLayout, Result, Time, Type, Value, decimal};
pub use result::{Outcome, QueryResult, UpdateCount};
pub use statement::{OutputInfo, ParameterInfo, Statement, StatementMetadata};
