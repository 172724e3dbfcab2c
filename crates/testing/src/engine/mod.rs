// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-process engine implementing the monetdbe C API
//!
//! Tables live in memory and understand a small SQL subset: `CREATE TABLE`,
//! `DROP TABLE`, `INSERT ... VALUES` with several rows, `SELECT * | columns`,
//! `UPDATE ... SET` and `DELETE`, each with an optional `WHERE column = value`.
//! Values may be `?` placeholders in prepared statements.

mod callbacks;
mod database;
mod nulls;
mod result;
mod schema;
mod sql;
mod statement;
mod stats;

use monetdbe_abi::MonetdbeVTable;
use monetdbe_type::NativeLayout;

pub use stats::{Stats, stats};

/// Function table of an engine built with or without 128-bit integers
pub fn vtable(layout: NativeLayout) -> MonetdbeVTable {
	MonetdbeVTable {
		open: if layout.has_int128() {
			callbacks::open::<true>
		} else {
			callbacks::open::<false>
		},
		close: callbacks::close,
		error: callbacks::error,
		get_autocommit: callbacks::get_autocommit,
		set_autocommit: callbacks::set_autocommit,
		query: callbacks::query,
		result_fetch: callbacks::result_fetch,
		cleanup_result: callbacks::cleanup_result,
		prepare: callbacks::prepare,
		bind: callbacks::bind,
		execute: callbacks::execute,
		cleanup_statement: callbacks::cleanup_statement,
		null: callbacks::null,
	}
}
