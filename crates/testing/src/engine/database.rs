// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::BTreeMap, ffi::CString};

use monetdbe_type::{NativeLayout, Type, Value};
use tracing::trace;

use super::{
	result::{FakeResult, OutputColumn},
	schema::SqlType,
	sql::{ColumnDef, Expr, Filter, Statement},
};

struct Table {
	columns: Vec<ColumnDef>,
	rows: Vec<Vec<Value>>,
}

impl Table {
	fn position(&self, table: &str, column: &str) -> Result<usize, String> {
		self.columns
			.iter()
			.position(|c| c.name == column)
			.ok_or_else(|| format!("42S22!identifier '{}' unknown in table '{}'", column, table))
	}

	/// Rows matching `filter`, all rows without one. Null never matches.
	fn matching(&self, table: &str, filter: Option<&Filter>, parameters: &[Value]) -> Result<Vec<usize>, String> {
		let Some(filter) = filter else {
			return Ok((0..self.rows.len()).collect());
		};
		let index = self.position(table, &filter.column)?;
		let wanted = self.columns[index].ty.coerce(resolve(&filter.value, parameters)?)?;
		if wanted.is_null() {
			return Ok(Vec::new());
		}
		Ok(self.rows.iter().enumerate().filter(|(_, row)| row[index] == wanted).map(|(i, _)| i).collect())
	}
}

/// Outcome of running one statement
#[derive(Debug)]
pub(crate) enum Executed {
	Rows(Box<FakeResult>),
	/// Schema change, reported as a result without columns
	Schema,
	Affected(i64),
}

/// An open in-process database
pub(crate) struct FakeDatabase {
	layout: NativeLayout,
	tables: BTreeMap<String, Table>,
	autocommit: bool,
	last_error: Option<CString>,
}

impl FakeDatabase {
	pub(crate) fn new(layout: NativeLayout) -> Self {
		Self {
			layout,
			tables: BTreeMap::new(),
			autocommit: true,
			last_error: None,
		}
	}

	pub(crate) fn layout(&self) -> NativeLayout {
		self.layout
	}

	pub(crate) fn autocommit(&self) -> bool {
		self.autocommit
	}

	pub(crate) fn set_autocommit(&mut self, enabled: bool) {
		self.autocommit = enabled;
	}

	/// Record `message` as the last failure; the returned pointer stays valid
	/// until the next failure on this database
	pub(crate) fn fail(&mut self, message: &str) -> *mut std::ffi::c_char {
		trace!(message, "fake engine failure");
		let message = CString::new(message.replace('\0', " ")).unwrap_or_default();
		self.last_error.insert(message).as_ptr() as *mut std::ffi::c_char
	}

	pub(crate) fn last_error(&self) -> Option<&CString> {
		self.last_error.as_ref()
	}

	fn table(&self, name: &str) -> Result<&Table, String> {
		self.tables.get(name).ok_or_else(|| format!("42S02!no such table '{}'", name))
	}

	fn table_mut(&mut self, name: &str) -> Result<&mut Table, String> {
		self.tables.get_mut(name).ok_or_else(|| format!("42S02!no such table '{}'", name))
	}

	/// Declared types of the statement's `?` placeholders, in order
	pub(crate) fn parameter_types(&self, statement: &Statement) -> Result<Vec<SqlType>, String> {
		let mut types: BTreeMap<usize, SqlType> = BTreeMap::new();
		let mut note = |expr: &Expr, ty: &SqlType| {
			if let Expr::Parameter(index) = expr {
				types.insert(*index, ty.clone());
			}
		};
		match statement {
			Statement::CreateTable {
				..
			}
			| Statement::DropTable {
				..
			} => {}
			Statement::Insert {
				table,
				columns,
				rows,
			} => {
				let target = self.table(table)?;
				let positions = column_positions(table, target, columns.as_deref())?;
				for row in rows {
					for (expr, position) in row.iter().zip(&positions) {
						note(expr, &target.columns[*position].ty);
					}
				}
			}
			Statement::Select {
				table,
				filter,
				..
			}
			| Statement::Delete {
				table,
				filter,
			} => {
				let target = self.table(table)?;
				if let Some(filter) = filter {
					note(&filter.value, &target.columns[target.position(table, &filter.column)?].ty);
				}
			}
			Statement::Update {
				table,
				assignments,
				filter,
			} => {
				let target = self.table(table)?;
				for (column, expr) in assignments {
					note(expr, &target.columns[target.position(table, column)?].ty);
				}
				if let Some(filter) = filter {
					note(&filter.value, &target.columns[target.position(table, &filter.column)?].ty);
				}
			}
		}
		Ok(types.into_values().collect())
	}

	/// Name and output columns of a query, empty for statements without rows
	pub(crate) fn output_columns(&self, statement: &Statement) -> Result<(String, Vec<OutputColumn>), String> {
		match statement {
			Statement::Select {
				table,
				projection,
				..
			} => {
				let target = self.table(table)?;
				let positions = column_positions(table, target, projection.as_deref())?;
				let columns = positions
					.into_iter()
					.map(|i| OutputColumn {
						name: target.columns[i].name.clone(),
						ty: target.columns[i].ty.clone(),
					})
					.collect();
				Ok((table.clone(), columns))
			}
			_ => Ok((String::new(), Vec::new())),
		}
	}

	pub(crate) fn execute(&mut self, statement: &Statement, parameters: &[Value]) -> Result<Executed, String> {
		match statement {
			Statement::CreateTable {
				table,
				columns,
			} => {
				if self.tables.contains_key(table) {
					return Err(format!("42S01!CREATE TABLE: name '{}' already in use", table));
				}
				for (i, column) in columns.iter().enumerate() {
					column.ty.check_layout(self.layout)?;
					if columns[..i].iter().any(|c| c.name == column.name) {
						return Err(format!("42000!CREATE TABLE: a column named '{}' already exists", column.name));
					}
				}
				self.tables.insert(
					table.clone(),
					Table {
						columns: columns.clone(),
						rows: Vec::new(),
					},
				);
				Ok(Executed::Schema)
			}
			Statement::DropTable {
				table,
			} => {
				self.tables.remove(table).ok_or_else(|| format!("42S02!DROP TABLE: no such table '{}'", table))?;
				Ok(Executed::Schema)
			}
			Statement::Insert {
				table,
				columns,
				rows,
			} => {
				let target = self.table_mut(table)?;
				let positions = column_positions(table, target, columns.as_deref())?;
				let mut inserted = Vec::with_capacity(rows.len());
				for row in rows {
					if row.len() != positions.len() {
						return Err("21S01!INSERT INTO: number of values does not match number of columns".to_string());
					}
					let mut record = vec![Value::Null; target.columns.len()];
					for (expr, position) in row.iter().zip(&positions) {
						record[*position] = target.columns[*position].ty.coerce(resolve(expr, parameters)?)?;
					}
					inserted.push(record);
				}
				let count = inserted.len() as i64;
				target.rows.extend(inserted);
				Ok(Executed::Affected(count))
			}
			Statement::Select {
				table,
				projection,
				filter,
			} => {
				let target = self.table(table)?;
				let positions = column_positions(table, target, projection.as_deref())?;
				let rows: Vec<Vec<Value>> = target
					.matching(table, filter.as_ref(), parameters)?
					.into_iter()
					.map(|r| positions.iter().map(|&c| target.rows[r][c].clone()).collect())
					.collect();
				let (name, columns) = self.output_columns(statement)?;
				Ok(Executed::Rows(FakeResult::new(self.layout, &name, &columns, &rows)?))
			}
			Statement::Update {
				table,
				assignments,
				filter,
			} => {
				let target = self.table_mut(table)?;
				let mut changes = Vec::with_capacity(assignments.len());
				for (column, expr) in assignments {
					let position = target.position(table, column)?;
					changes.push((position, target.columns[position].ty.coerce(resolve(expr, parameters)?)?));
				}
				let matching = target.matching(table, filter.as_ref(), parameters)?;
				for &row in &matching {
					for (position, value) in &changes {
						target.rows[row][*position] = value.clone();
					}
				}
				Ok(Executed::Affected(matching.len() as i64))
			}
			Statement::Delete {
				table,
				filter,
			} => {
				let target = self.table_mut(table)?;
				let matching = target.matching(table, filter.as_ref(), parameters)?;
				let mut index = 0;
				target.rows.retain(|_| {
					let keep = matching.binary_search(&index).is_err();
					index += 1;
					keep
				});
				Ok(Executed::Affected(matching.len() as i64))
			}
		}
	}
}

fn resolve(expr: &Expr, parameters: &[Value]) -> Result<Value, String> {
	match expr {
		Expr::Literal(value) => Ok(value.clone()),
		Expr::Parameter(index) => parameters
			.get(*index)
			.cloned()
			.ok_or_else(|| format!("07001!parameter {} is not bound", index + 1)),
	}
}

/// Column positions named by an insert list or projection, all columns for `None`
fn column_positions(table: &str, target: &Table, columns: Option<&[String]>) -> Result<Vec<usize>, String> {
	match columns {
		None => Ok((0..target.columns.len()).collect()),
		Some(names) => names.iter().map(|name| target.position(table, name)).collect(),
	}
}

/// Storage types a statement may bind; placeholders of types the layout
/// cannot carry are rejected at prepare time
pub(crate) fn check_parameters(layout: NativeLayout, types: &[SqlType]) -> Result<(), String> {
	for ty in types {
		ty.check_layout(layout)?;
		if ty.ty == Type::Unknown {
			return Err("42000!could not determine the type of a parameter".to_string());
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::sql::parse;

	fn run(db: &mut FakeDatabase, sql: &str) -> Result<Executed, String> {
		db.execute(&parse(sql)?, &[])
	}

	fn affected(executed: Executed) -> i64 {
		match executed {
			Executed::Affected(n) => n,
			_ => panic!("expected an update count"),
		}
	}

	#[test]
	fn test_insert_update_delete() {
		let mut db = FakeDatabase::new(NativeLayout::WITH_INT128);
		assert!(matches!(run(&mut db, "CREATE TABLE t (id INT, name VARCHAR(10))").unwrap(), Executed::Schema));
		assert_eq!(affected(run(&mut db, "INSERT INTO t VALUES (1, 'a'), (2, 'b'), (3, 'c')").unwrap()), 3);
		assert_eq!(affected(run(&mut db, "UPDATE t SET name = 'z'").unwrap()), 3);
		assert_eq!(affected(run(&mut db, "UPDATE t SET name = 'y' WHERE id = 2").unwrap()), 1);
		assert_eq!(affected(run(&mut db, "DELETE FROM t WHERE id = 1").unwrap()), 1);
		assert_eq!(db.tables["t"].rows.len(), 2);
		assert_eq!(db.tables["t"].rows[0], vec![Value::Int32(2), Value::Str("y".into())]);
	}

	#[test]
	fn test_insert_with_column_list_fills_null() {
		let mut db = FakeDatabase::new(NativeLayout::WITH_INT128);
		run(&mut db, "CREATE TABLE t (a INT, b INT)").unwrap();
		run(&mut db, "INSERT INTO t (b) VALUES (5)").unwrap();
		assert_eq!(db.tables["t"].rows[0], vec![Value::Null, Value::Int32(5)]);
	}

	#[test]
	fn test_errors() {
		let mut db = FakeDatabase::new(NativeLayout::WITHOUT_INT128);
		assert!(run(&mut db, "SELECT * FROM missing").unwrap_err().starts_with("42S02!"));
		run(&mut db, "CREATE TABLE t (a INT)").unwrap();
		assert!(run(&mut db, "CREATE TABLE t (a INT)").unwrap_err().starts_with("42S01!"));
		assert!(run(&mut db, "SELECT b FROM t").unwrap_err().starts_with("42S22!"));
		assert!(run(&mut db, "CREATE TABLE h (a HUGEINT)").is_err());
		assert!(run(&mut db, "INSERT INTO t VALUES (1, 2)").unwrap_err().starts_with("21S01!"));
	}

	#[test]
	fn test_parameter_types() {
		let mut db = FakeDatabase::new(NativeLayout::WITH_INT128);
		run(&mut db, "CREATE TABLE t (a INT, b DECIMAL(10,2), c DATE)").unwrap();
		let types = db.parameter_types(&parse("INSERT INTO t (c, b) VALUES (?, ?)").unwrap()).unwrap();
		assert_eq!(types.iter().map(|t| t.ty).collect::<Vec<_>>(), vec![Type::Date, Type::Int64]);
		assert_eq!(types[1].scale, 2);

		let types = db.parameter_types(&parse("UPDATE t SET a = ? WHERE c = ?").unwrap()).unwrap();
		assert_eq!(types.iter().map(|t| t.ty).collect::<Vec<_>>(), vec![Type::Int32, Type::Date]);
	}

	#[test]
	fn test_unbound_parameter() {
		let mut db = FakeDatabase::new(NativeLayout::WITH_INT128);
		run(&mut db, "CREATE TABLE t (a INT)").unwrap();
		let statement = parse("INSERT INTO t VALUES (?)").unwrap();
		assert!(db.execute(&statement, &[]).unwrap_err().starts_with("07001!"));
		assert_eq!(affected(db.execute(&statement, &[Value::Int32(1)]).unwrap()), 1);
	}
}
