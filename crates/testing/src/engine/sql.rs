// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Parser for the SQL subset the in-process engine understands

use std::str::FromStr;

use bigdecimal::BigDecimal;
use monetdbe_type::Value;

use super::schema::{SqlType, parse_date, parse_time, parse_timestamp};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
	Literal(Value),
	/// `?` placeholder, numbered from zero in order of appearance
	Parameter(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColumnDef {
	pub name: String,
	pub ty: SqlType,
}

/// `WHERE column = expr`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Filter {
	pub column: String,
	pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Statement {
	CreateTable {
		table: String,
		columns: Vec<ColumnDef>,
	},
	DropTable {
		table: String,
	},
	Insert {
		table: String,
		columns: Option<Vec<String>>,
		rows: Vec<Vec<Expr>>,
	},
	Select {
		table: String,
		/// `None` for `*`
		projection: Option<Vec<String>>,
		filter: Option<Filter>,
	},
	Update {
		table: String,
		assignments: Vec<(String, Expr)>,
		filter: Option<Filter>,
	},
	Delete {
		table: String,
		filter: Option<Filter>,
	},
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
	Word(String),
	Number(String),
	Text(String),
	Symbol(char),
	Placeholder,
}

fn syntax_error(near: impl std::fmt::Display) -> String {
	format!("42000!syntax error, unexpected {}", near)
}

fn tokenize(sql: &str) -> Result<Vec<Token>, String> {
	let mut tokens = Vec::new();
	let mut chars = sql.chars().peekable();
	while let Some(&c) = chars.peek() {
		match c {
			c if c.is_whitespace() => {
				chars.next();
			}
			'\'' => {
				chars.next();
				let mut text = String::new();
				loop {
					match chars.next() {
						Some('\'') if chars.peek() == Some(&'\'') => {
							chars.next();
							text.push('\'');
						}
						Some('\'') => break,
						Some(c) => text.push(c),
						None => return Err("42000!unterminated string literal".to_string()),
					}
				}
				tokens.push(Token::Text(text));
			}
			'"' => {
				chars.next();
				let mut name = String::new();
				loop {
					match chars.next() {
						Some('"') => break,
						Some(c) => name.push(c),
						None => return Err("42000!unterminated quoted identifier".to_string()),
					}
				}
				tokens.push(Token::Word(name));
			}
			c if c.is_ascii_digit() => {
				let mut number = String::new();
				while let Some(&c) = chars.peek() {
					if c.is_ascii_digit() || c == '.' {
						number.push(c);
						chars.next();
					} else {
						break;
					}
				}
				tokens.push(Token::Number(number));
			}
			c if c.is_alphabetic() || c == '_' => {
				let mut word = String::new();
				while let Some(&c) = chars.peek() {
					if c.is_alphanumeric() || c == '_' {
						word.push(c);
						chars.next();
					} else {
						break;
					}
				}
				tokens.push(Token::Word(word));
			}
			'?' => {
				chars.next();
				tokens.push(Token::Placeholder);
			}
			'(' | ')' | ',' | ';' | '*' | '=' | '-' | '.' => {
				chars.next();
				tokens.push(Token::Symbol(c));
			}
			other => return Err(syntax_error(format!("'{}'", other))),
		}
	}
	Ok(tokens)
}

/// Parse a single statement; a trailing `;` is allowed
pub(crate) fn parse(sql: &str) -> Result<Statement, String> {
	let mut parser = Parser {
		tokens: tokenize(sql)?,
		position: 0,
		parameters: 0,
	};
	let statement = parser.statement()?;
	parser.eat_symbol(';');
	match parser.peek() {
		None => Ok(statement),
		Some(token) => Err(syntax_error(format!("{:?}", token))),
	}
}

struct Parser {
	tokens: Vec<Token>,
	position: usize,
	parameters: usize,
}

impl Parser {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.position)
	}

	fn next(&mut self) -> Result<Token, String> {
		let token = self.tokens.get(self.position).cloned().ok_or_else(|| syntax_error("end of input"))?;
		self.position += 1;
		Ok(token)
	}

	fn is_keyword(&self, keyword: &str) -> bool {
		matches!(self.peek(), Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword))
	}

	fn eat_keyword(&mut self, keyword: &str) -> bool {
		let found = self.is_keyword(keyword);
		if found {
			self.position += 1;
		}
		found
	}

	fn keyword(&mut self, keyword: &str) -> Result<(), String> {
		if self.eat_keyword(keyword) {
			Ok(())
		} else {
			Err(syntax_error(self.describe_next()))
		}
	}

	fn eat_symbol(&mut self, symbol: char) -> bool {
		let found = self.peek() == Some(&Token::Symbol(symbol));
		if found {
			self.position += 1;
		}
		found
	}

	fn symbol(&mut self, symbol: char) -> Result<(), String> {
		if self.eat_symbol(symbol) {
			Ok(())
		} else {
			Err(syntax_error(self.describe_next()))
		}
	}

	fn describe_next(&self) -> String {
		match self.peek() {
			None => "end of input".to_string(),
			Some(Token::Word(word)) => word.clone(),
			Some(Token::Number(number)) => number.clone(),
			Some(Token::Text(text)) => format!("'{}'", text),
			Some(Token::Symbol(symbol)) => format!("'{}'", symbol),
			Some(Token::Placeholder) => "'?'".to_string(),
		}
	}

	/// Identifiers are case insensitive and stored lower case; an optional
	/// `sys.` schema prefix is dropped
	fn identifier(&mut self) -> Result<String, String> {
		let name = match self.next()? {
			Token::Word(word) => word.to_ascii_lowercase(),
			other => return Err(syntax_error(format!("{:?}", other))),
		};
		if name == "sys" && self.eat_symbol('.') {
			return self.identifier();
		}
		Ok(name)
	}

	fn identifiers(&mut self) -> Result<Vec<String>, String> {
		let mut names = vec![self.identifier()?];
		while self.eat_symbol(',') {
			names.push(self.identifier()?);
		}
		Ok(names)
	}

	fn statement(&mut self) -> Result<Statement, String> {
		if self.eat_keyword("create") {
			self.keyword("table")?;
			return self.create_table();
		}
		if self.eat_keyword("drop") {
			self.keyword("table")?;
			return Ok(Statement::DropTable {
				table: self.identifier()?,
			});
		}
		if self.eat_keyword("insert") {
			self.keyword("into")?;
			return self.insert();
		}
		if self.eat_keyword("select") {
			return self.select();
		}
		if self.eat_keyword("update") {
			return self.update();
		}
		if self.eat_keyword("delete") {
			self.keyword("from")?;
			let table = self.identifier()?;
			let filter = self.filter()?;
			return Ok(Statement::Delete {
				table,
				filter,
			});
		}
		Err(syntax_error(self.describe_next()))
	}

	fn create_table(&mut self) -> Result<Statement, String> {
		let table = self.identifier()?;
		self.symbol('(')?;
		let mut columns = Vec::new();
		loop {
			let name = self.identifier()?;
			let type_name = self.identifier()?;
			let mut args = Vec::new();
			if self.eat_symbol('(') {
				loop {
					match self.next()? {
						Token::Number(n) => args.push(n.parse::<u32>().map_err(|_| syntax_error(&n))?),
						other => return Err(syntax_error(format!("{:?}", other))),
					}
					if !self.eat_symbol(',') {
						break;
					}
				}
				self.symbol(')')?;
			}
			columns.push(ColumnDef {
				name,
				ty: SqlType::parse(&type_name, &args)?,
			});
			if !self.eat_symbol(',') {
				break;
			}
		}
		self.symbol(')')?;
		Ok(Statement::CreateTable {
			table,
			columns,
		})
	}

	fn insert(&mut self) -> Result<Statement, String> {
		let table = self.identifier()?;
		let columns = if self.eat_symbol('(') {
			let names = self.identifiers()?;
			self.symbol(')')?;
			Some(names)
		} else {
			None
		};
		self.keyword("values")?;
		let mut rows = Vec::new();
		loop {
			self.symbol('(')?;
			let mut row = vec![self.expr()?];
			while self.eat_symbol(',') {
				row.push(self.expr()?);
			}
			self.symbol(')')?;
			rows.push(row);
			if !self.eat_symbol(',') {
				break;
			}
		}
		Ok(Statement::Insert {
			table,
			columns,
			rows,
		})
	}

	fn select(&mut self) -> Result<Statement, String> {
		let projection = if self.eat_symbol('*') {
			None
		} else {
			Some(self.identifiers()?)
		};
		self.keyword("from")?;
		let table = self.identifier()?;
		let filter = self.filter()?;
		Ok(Statement::Select {
			table,
			projection,
			filter,
		})
	}

	fn update(&mut self) -> Result<Statement, String> {
		let table = self.identifier()?;
		self.keyword("set")?;
		let mut assignments = Vec::new();
		loop {
			let column = self.identifier()?;
			self.symbol('=')?;
			assignments.push((column, self.expr()?));
			if !self.eat_symbol(',') {
				break;
			}
		}
		let filter = self.filter()?;
		Ok(Statement::Update {
			table,
			assignments,
			filter,
		})
	}

	fn filter(&mut self) -> Result<Option<Filter>, String> {
		if !self.eat_keyword("where") {
			return Ok(None);
		}
		let column = self.identifier()?;
		self.symbol('=')?;
		Ok(Some(Filter {
			column,
			value: self.expr()?,
		}))
	}

	fn expr(&mut self) -> Result<Expr, String> {
		let negative = self.eat_symbol('-');
		let token = self.next()?;
		let value = match token {
			Token::Placeholder if !negative => {
				let index = self.parameters;
				self.parameters += 1;
				return Ok(Expr::Parameter(index));
			}
			Token::Number(number) => {
				let text = if negative {
					format!("-{}", number)
				} else {
					number
				};
				number_literal(&text)?
			}
			Token::Text(text) if !negative => Value::Str(text),
			Token::Word(word) if !negative => match word.to_ascii_lowercase().as_str() {
				"null" => Value::Null,
				"true" => Value::Bool(true),
				"false" => Value::Bool(false),
				"date" => Value::Date(parse_date(&self.text()?)?),
				"time" => Value::Time(parse_time(&self.text()?)?),
				"timestamp" => Value::Timestamp(parse_timestamp(&self.text()?)?),
				_ => return Err(syntax_error(word)),
			},
			other => return Err(syntax_error(format!("{:?}", other))),
		};
		Ok(Expr::Literal(value))
	}

	fn text(&mut self) -> Result<String, String> {
		match self.next()? {
			Token::Text(text) => Ok(text),
			other => Err(syntax_error(format!("{:?}", other))),
		}
	}
}

/// Integers become the narrowest of 64 or 128 bits, anything with a point a decimal
fn number_literal(text: &str) -> Result<Value, String> {
	if text.contains('.') {
		return BigDecimal::from_str(text).map(Value::Decimal).map_err(|_| syntax_error(text));
	}
	if let Ok(value) = text.parse::<i64>() {
		return Ok(Value::Int64(value));
	}
	text.parse::<i128>().map(Value::Int128).map_err(|_| format!("22003!number '{}' is out of range", text))
}

#[cfg(test)]
mod tests {
	use monetdbe_type::{Date, Type};

	use super::*;

	#[test]
	fn test_parse_create_table() {
		let statement = parse("CREATE TABLE t (id INT, price DECIMAL(10,2), label VARCHAR(20));").unwrap();
		let Statement::CreateTable {
			table,
			columns,
		} = statement
		else {
			panic!("expected CREATE TABLE");
		};
		assert_eq!(table, "t");
		assert_eq!(columns.len(), 3);
		assert_eq!(columns[1].ty.ty, Type::Int64);
		assert_eq!(columns[1].ty.scale, 2);
		assert_eq!(columns[2].ty.digits, 20);
	}

	#[test]
	fn test_parse_insert_with_placeholders() {
		let statement = parse("insert into t (a, b) values (?, 'x'), (-3, ?)").unwrap();
		assert_eq!(
			statement,
			Statement::Insert {
				table: "t".into(),
				columns: Some(vec!["a".into(), "b".into()]),
				rows: vec![
					vec![Expr::Parameter(0), Expr::Literal(Value::Str("x".into()))],
					vec![Expr::Literal(Value::Int64(-3)), Expr::Parameter(1)],
				],
			}
		);
	}

	#[test]
	fn test_parse_select_with_filter() {
		let statement = parse("SELECT a, B FROM sys.T WHERE d = DATE '2024-02-29'").unwrap();
		assert_eq!(
			statement,
			Statement::Select {
				table: "t".into(),
				projection: Some(vec!["a".into(), "b".into()]),
				filter: Some(Filter {
					column: "d".into(),
					value: Expr::Literal(Value::Date(Date::new(2024, 2, 29).unwrap())),
				}),
			}
		);
	}

	#[test]
	fn test_parse_update_and_delete() {
		assert!(matches!(
			parse("UPDATE t SET a = 1.5, b = NULL WHERE id = ?").unwrap(),
			Statement::Update { assignments, filter: Some(_), .. } if assignments.len() == 2
		));
		assert!(matches!(parse("DELETE FROM t").unwrap(), Statement::Delete { filter: None, .. }));
	}

	#[test]
	fn test_syntax_errors() {
		assert_eq!(parse("SELEC 1").unwrap_err(), "42000!syntax error, unexpected SELEC");
		assert!(parse("SELECT * FROM t WHERE").is_err());
		assert!(parse("INSERT INTO t VALUES ('open").is_err());
		assert!(parse("SELECT * FROM t garbage").is_err());
	}

	#[test]
	fn test_number_literals() {
		assert_eq!(number_literal("42").unwrap(), Value::Int64(42));
		assert_eq!(number_literal("170141183460469231731687303715884105727").unwrap(), Value::Int128(i128::MAX));
		assert_eq!(number_literal("19.99").unwrap().to_string(), "19.99");
	}
}
