// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Runs against a real libmonetdbe named by `MONETDBE_LIBRARY`:
//! `MONETDBE_LIBRARY=/usr/lib/libmonetdbe.so cargo test -p monetdbe -- --ignored`

use monetdbe::{Database, Options, Result, UpdateCount, Value};

#[test]
#[ignore = "needs libmonetdbe"]
fn test_round_trip_with_library() -> Result<()> {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let db = Database::from_env(None, &Options::default())?;
	db.query("CREATE TABLE t (i INT, s VARCHAR(10), d DECIMAL(10,2))")?;

	let mut insert = db.prepare("INSERT INTO t VALUES (?, ?, ?)")?;
	insert.bind(1, 1)?;
	insert.bind(2, "x")?;
	insert.bind_null(3)?;
	assert_eq!(insert.execute()?.update_count(), Some(UpdateCount::Regular(1)));

	let mut result = db.query("SELECT i, s, d FROM t")?.rows().expect("select returns rows");
	let columns = result.fetch_all()?;
	assert_eq!(columns.row(0)?, vec![Value::Int32(1), Value::Str("x".into()), Value::Null]);
	Ok(())
}
