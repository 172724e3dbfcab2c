// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::str::FromStr;

use bigdecimal::BigDecimal;
use monetdbe::{
	Api, Database, Error, FixedData, NativeLayout, Options, Outcome, QueryOptions, Result, Time, Type, UpdateCount,
	Value,
};
use monetdbe_testing::{stats, vtable};
use tracing_subscriber::EnvFilter;

fn init() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

fn open(layout: NativeLayout) -> Result<Database> {
	init();
	Database::in_memory(Api::from_vtable(vtable(layout), layout))
}

fn execute(db: &Database, sql: &str) -> Result<UpdateCount> {
	match db.query(sql)? {
		Outcome::Updated(count) => Ok(count),
		Outcome::Rows(_) => panic!("{} returned rows", sql),
	}
}

#[test]
fn test_select_int_and_string() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE t (i INT, s VARCHAR(10))")?;
	execute(&db, "INSERT INTO t VALUES (1, 'x')")?;

	let mut result = db.query("SELECT i, s FROM t")?.rows().expect("select returns rows");
	assert_eq!(result.column_count(), 2);
	assert_eq!(result.row_count(), 1);
	assert_eq!(result.name().as_deref(), Some("t"));

	let columns = result.fetch_all()?;
	let ints = columns.get(0).and_then(|c| c.as_fixed()).expect("int is fixed width");
	assert_eq!(ints.data, FixedData::Int32(&[1]));
	assert_eq!(ints.data.bytes(), &1i32.to_ne_bytes());
	assert_eq!(columns.by_name("s")?.value(0)?, Value::Str("x".into()));
	assert_eq!(columns.by_name("s")?.ty, Type::Str);
	Ok(())
}

#[test]
fn test_fixed_width_nulls_read_zero() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE t (i INT, f DOUBLE, b BOOLEAN, s VARCHAR(4))")?;
	execute(&db, "INSERT INTO t VALUES (7, 1.5, TRUE, 'a'), (NULL, NULL, NULL, NULL)")?;

	let mut result = db.query("SELECT * FROM t")?.rows().expect("rows");
	let columns = result.fetch_all()?;
	assert_eq!(columns.row(0)?, vec![Value::Int32(7), Value::Double(1.5), Value::Bool(true), Value::Str("a".into())]);
	assert_eq!(columns.row(1)?, vec![Value::Int32(0), Value::Double(0.0), Value::Bool(false), Value::Null]);
	assert!(!columns.get(0).expect("column").is_null(1)?);
	assert!(columns.get(3).expect("column").is_null(1)?);
	Ok(())
}

#[test]
fn test_decimal_nulls_are_masked() -> Result<()> {
	let db = open(NativeLayout::WITHOUT_INT128)?;
	execute(&db, "CREATE TABLE prices (amount DECIMAL(10,2))")?;
	execute(&db, "INSERT INTO prices VALUES (19.99), (NULL), (0)")?;

	let mut result = db.query("SELECT amount FROM prices")?.rows().expect("rows");
	let columns = result.fetch_all()?;
	let amount = columns.by_name("amount")?;
	assert_eq!(amount.ty, Type::Int64);
	assert_eq!(amount.decimal(0)?, Some(BigDecimal::from_str("19.99").unwrap()));
	assert_eq!(amount.decimal(1)?, None);
	assert_eq!(amount.value(1)?, Value::Null);
	assert_eq!(amount.decimal(2)?, Some(BigDecimal::from(0)));

	let fixed = amount.as_fixed().expect("fixed width");
	assert_eq!(fixed.scale, 2);
	assert_eq!(fixed.nulls.as_deref(), Some(&[false, true, false][..]));
	assert_eq!(fixed.data, FixedData::Int64(&[1999, 0, 0]));
	Ok(())
}

#[test]
fn test_second_fetch_sees_zeroed_decimal_nulls() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE prices (amount DECIMAL(10,2))")?;
	execute(&db, "INSERT INTO prices VALUES (NULL), (1.25)")?;

	let mut result = db.query("SELECT amount FROM prices")?.rows().expect("rows");
	let first = result.fetch_all()?.row(0)?;
	assert_eq!(first, vec![Value::Null]);

	let columns = result.fetch_all()?;
	assert_eq!(columns.value(0, 0)?, Value::Decimal(BigDecimal::from(0)));
	assert!(!columns.get(0).expect("column").is_null(0)?);
	assert_eq!(columns.value(1, 0)?, Value::Decimal(BigDecimal::from_str("1.25").unwrap()));
	Ok(())
}

#[test]
fn test_temporal_columns() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE events (d DATE, t TIME, ts TIMESTAMP)")?;
	execute(
		&db,
		"INSERT INTO events VALUES (DATE '2024-02-29', TIME '12:30:15.250', TIMESTAMP '2024-02-29 12:30:15.250'), (NULL, NULL, NULL)",
	)?;

	let mut result = db.query("SELECT * FROM events")?.rows().expect("rows");
	let columns = result.fetch_all()?;
	let row = columns.row(0)?;
	assert_eq!(row[0].to_string(), "2024-02-29");
	assert_eq!(row[1], Value::Time(Time::from_hms_milli(12, 30, 15, 250).unwrap()));
	assert_eq!(row[1].to_string(), "12:30:15.250000000");
	assert_eq!(row[2].to_string(), "2024-02-29T12:30:15.250000000");
	assert_eq!(columns.row(1)?, vec![Value::Null, Value::Null, Value::Null]);
	Ok(())
}

#[test]
fn test_update_reports_count() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE t (i INT)")?;
	assert_eq!(execute(&db, "INSERT INTO t VALUES (1), (2), (3)")?, UpdateCount::Regular(3));

	let outcome = db.query("UPDATE t SET i = 0")?;
	assert_eq!(outcome.update_count(), Some(UpdateCount::Regular(3)));
	assert!(outcome.rows().is_none());

	let outcome = db.query_with("DELETE FROM t WHERE i = 0", QueryOptions::new().with_large_update(true))?;
	assert_eq!(outcome.update_count(), Some(UpdateCount::Large(3)));
	Ok(())
}

#[test]
fn test_schema_statements_release_their_result() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	assert_eq!(execute(&db, "CREATE TABLE t (i INT)")?, UpdateCount::Regular(0));
	assert_eq!(execute(&db, "DROP TABLE t")?, UpdateCount::Regular(0));
	assert_eq!(stats().live_results, 0);
	Ok(())
}

#[test]
fn test_max_rows() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE t (i INT, s VARCHAR(4))")?;
	execute(&db, "INSERT INTO t VALUES (1, 'a'), (2, 'b'), (3, 'c')")?;

	let outcome = db.query_with("SELECT * FROM t", QueryOptions::new().with_max_rows(2))?;
	let mut result = outcome.rows().expect("rows");
	assert_eq!(result.row_count(), 2);
	let columns = result.fetch_all()?;
	assert_eq!(columns.row_count(), 2);
	assert_eq!(columns.get(0).expect("column").len(), 2);
	assert_eq!(columns.get(1).expect("column").len(), 2);
	assert!(matches!(columns.value(2, 0), Err(Error::RowOutOfBounds { .. })));
	Ok(())
}

#[test]
fn test_native_errors_propagate_unchanged() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	let error = db.query("SELECT * FROM missing").unwrap_err();
	assert!(error.is_native());
	assert_eq!(error.to_string(), "42S02!no such table 'missing'");
	assert_eq!(db.last_error().as_deref(), Some("42S02!no such table 'missing'"));

	let error = db.query("SELEKT 1").unwrap_err();
	assert!(error.to_string().starts_with("42000!"));
	assert!(matches!(db.query("SELECT 'a\0b'"), Err(Error::InvalidString(_))));
	Ok(())
}

#[test]
fn test_hugeint_requires_int128() -> Result<()> {
	let db = open(NativeLayout::WITHOUT_INT128)?;
	assert!(db.query("CREATE TABLE t (h HUGEINT)").unwrap_err().is_native());

	let db = open(NativeLayout::WITH_INT128)?;
	execute(&db, "CREATE TABLE t (h HUGEINT)")?;
	execute(&db, "INSERT INTO t VALUES (170141183460469231731687303715884105727)")?;
	let mut result = db.query("SELECT h FROM t")?.rows().expect("rows");
	assert_eq!(result.fetch_all()?.value(0, 0)?, Value::Int128(i128::MAX));
	Ok(())
}

#[test]
fn test_autocommit() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	assert!(db.autocommit()?);
	db.set_autocommit(false)?;
	assert!(!db.autocommit()?);

	let layout = NativeLayout::WITH_INT128;
	let options = Options::new().with_autocommit(false);
	let db = Database::open(Api::from_vtable(vtable(layout), layout), None, &options)?;
	assert!(!db.autocommit()?);
	Ok(())
}

#[test]
fn test_open_failures() {
	init();
	let layout = NativeLayout::WITH_INT128;
	let api = Api::from_vtable(vtable(layout), layout);
	let error = Database::open(api.clone(), Some("mapi:monetdb://localhost:50000/demo"), &Options::default()).unwrap_err();
	assert!(error.is_native());
	let error = Database::open(api, Some("db\0"), &Options::default()).unwrap_err();
	assert!(matches!(error, Error::InvalidString(_)));
	assert_eq!(stats().open_databases, 0);
}

#[test]
fn test_handles_are_released() -> Result<()> {
	let db = open(NativeLayout::WITH_INT128)?;
	assert_eq!(stats().open_databases, 1);
	execute(&db, "CREATE TABLE t (i INT)")?;
	{
		let _dropped = db.query("SELECT i FROM t")?;
		let closed = db.query("SELECT i FROM t")?.rows().expect("rows");
		assert_eq!(stats().live_results, 2);
		closed.close()?;
		assert_eq!(stats().live_results, 1);
	}
	assert_eq!(stats().live_results, 0);
	{
		let _statement = db.prepare("SELECT i FROM t WHERE i = ?")?;
		assert_eq!(stats().live_statements, 1);
	}
	assert_eq!(stats().live_statements, 0);
	db.close()?;
	assert_eq!(stats().open_databases, 0);
	Ok(())
}

#[test]
fn test_drop_closes_database() -> Result<()> {
	{
		let _db = open(NativeLayout::WITHOUT_INT128)?;
		assert_eq!(stats().open_databases, 1);
	}
	assert_eq!(stats().open_databases, 0);
	Ok(())
}
