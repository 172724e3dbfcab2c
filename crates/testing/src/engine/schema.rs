// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use monetdbe_type::{Date, DateTime, NativeLayout, Time, Type, Value, decimal};
use num_traits::FromPrimitive;

/// Declared SQL type of a table column or statement parameter
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SqlType {
	/// Lower case type name as reported in prepare descriptions
	pub name: String,
	/// Storage type
	pub ty: Type,
	pub digits: u32,
	pub scale: u32,
}

impl SqlType {
	pub(crate) fn new(name: &str, ty: Type, digits: u32, scale: u32) -> Self {
		Self {
			name: name.to_string(),
			ty,
			digits,
			scale,
		}
	}

	/// Resolve a declared type name with its optional `(digits[, scale])`
	pub(crate) fn parse(name: &str, args: &[u32]) -> Result<Self, String> {
		let lower = name.to_ascii_lowercase();
		let first = args.first().copied();
		let ty = match lower.as_str() {
			"boolean" | "bool" => Self::new("boolean", Type::Bool, 1, 0),
			"tinyint" => Self::new("tinyint", Type::Int8, 8, 0),
			"smallint" => Self::new("smallint", Type::Int16, 16, 0),
			"int" | "integer" => Self::new("int", Type::Int32, 32, 0),
			"bigint" => Self::new("bigint", Type::Int64, 64, 0),
			"hugeint" => Self::new("hugeint", Type::Int128, 128, 0),
			"real" => Self::new("real", Type::Float, 24, 0),
			"float" | "double" => Self::new("double", Type::Double, 53, 0),
			"varchar" | "char" | "text" | "string" | "clob" => Self::new("varchar", Type::Str, first.unwrap_or(0), 0),
			"blob" => Self::new("blob", Type::Blob, 0, 0),
			"date" => Self::new("date", Type::Date, 0, 0),
			"time" => Self::new("time", Type::Time, 1, 0),
			"timestamp" => Self::new("timestamp", Type::Timestamp, 7, 0),
			"decimal" | "numeric" => {
				let digits = first.unwrap_or(18);
				let scale = args.get(1).copied().unwrap_or(if first.is_some() { 0 } else { 3 });
				if digits == 0 || scale > digits || digits > 38 {
					return Err(format!("42000!DECIMAL({},{}) is not a valid decimal type", digits, scale));
				}
				let ty = match digits {
					0..=2 => Type::Int8,
					3..=4 => Type::Int16,
					5..=9 => Type::Int32,
					10..=18 => Type::Int64,
					_ => Type::Int128,
				};
				Self::new("decimal", ty, digits, scale)
			}
			_ => return Err(format!("42000!type ({}) unknown", lower)),
		};
		Ok(ty)
	}

	pub(crate) fn is_decimal(&self) -> bool {
		self.name == "decimal"
	}

	/// Fail for types the engine was built without
	pub(crate) fn check_layout(&self, layout: NativeLayout) -> Result<(), String> {
		if self.ty == Type::Int128 && !layout.has_int128() {
			return Err(if self.is_decimal() {
				format!("42000!DECIMAL({}) exceeds the maximum precision of 18", self.digits)
			} else {
				"42000!type (hugeint) unknown".to_string()
			});
		}
		Ok(())
	}

	/// Convert `value` into the canonical representation stored for this type
	pub(crate) fn coerce(&self, value: Value) -> Result<Value, String> {
		if value.is_null() {
			return Ok(Value::Null);
		}
		if self.is_decimal() {
			return self.coerce_decimal(value);
		}
		let mismatch = |value: &Value| format!("22018!conversion of '{}' to type {} failed", value, self.name);
		let out_of_range = |value: &Value| format!("22003!value '{}' is out of range for type {}", value, self.name);
		match self.ty {
			Type::Bool => match &value {
				Value::Bool(v) => Ok(Value::Bool(*v)),
				Value::Str(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
				Value::Str(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
				other => match other.as_i128() {
					Some(0) => Ok(Value::Bool(false)),
					Some(1) => Ok(Value::Bool(true)),
					_ => Err(mismatch(other)),
				},
			},
			Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64 | Type::Int128 | Type::Size => {
				let wide = match &value {
					Value::Decimal(d) => decimal::to_unscaled(d, 0).filter(|v| decimal::from_unscaled(*v, 0) == *d),
					other => other.as_i128(),
				}
				.ok_or_else(|| mismatch(&value))?;
				let narrowed = match self.ty {
					Type::Int8 => i8::try_from(wide).ok().map(Value::Int8),
					Type::Int16 => i16::try_from(wide).ok().map(Value::Int16),
					Type::Int32 => i32::try_from(wide).ok().map(Value::Int32),
					Type::Int64 => i64::try_from(wide).ok().map(Value::Int64),
					Type::Size => usize::try_from(wide).ok().map(Value::Size),
					_ => Some(Value::Int128(wide)),
				};
				narrowed.ok_or_else(|| out_of_range(&value))
			}
			Type::Float | Type::Double => {
				let wide = match &value {
					Value::Decimal(d) => d.to_string().parse::<f64>().ok(),
					other => other.as_f64(),
				}
				.ok_or_else(|| mismatch(&value))?;
				Ok(if self.ty == Type::Float {
					Value::Float(wide as f32)
				} else {
					Value::Double(wide)
				})
			}
			Type::Str => match value {
				Value::Str(s) => {
					if self.digits > 0 && s.chars().count() > self.digits as usize {
						return Err(format!("22001!value too long for type (var)char({})", self.digits));
					}
					Ok(Value::Str(s))
				}
				other => Ok(Value::Str(other.to_string())),
			},
			Type::Blob => match value {
				Value::Blob(b) => Ok(Value::Blob(b)),
				Value::Str(s) => parse_hex(&s).map(Value::Blob).ok_or_else(|| mismatch(&Value::Str(s))),
				other => Err(mismatch(&other)),
			},
			Type::Date => match value {
				Value::Date(d) => Ok(Value::Date(d)),
				Value::Timestamp(ts) => Ok(Value::Date(ts.date())),
				Value::Str(s) => parse_date(&s).map(Value::Date),
				other => Err(mismatch(&other)),
			},
			Type::Time => match value {
				Value::Time(t) => Ok(Value::Time(t)),
				Value::Timestamp(ts) => Ok(Value::Time(ts.time())),
				Value::Str(s) => parse_time(&s).map(Value::Time),
				other => Err(mismatch(&other)),
			},
			Type::Timestamp => match value {
				Value::Timestamp(ts) => Ok(Value::Timestamp(ts)),
				Value::Date(d) => Ok(Value::Timestamp(DateTime::new(d, Time::default()))),
				Value::Str(s) => parse_timestamp(&s).map(Value::Timestamp),
				other => Err(mismatch(&other)),
			},
			Type::Unknown => Err(mismatch(&value)),
		}
	}

	fn coerce_decimal(&self, value: Value) -> Result<Value, String> {
		let decimal = match &value {
			Value::Decimal(d) => d.clone(),
			Value::Float(v) => BigDecimal::from_f32(*v).ok_or_else(|| format!("22003!value '{}' is not finite", v))?,
			Value::Double(v) => BigDecimal::from_f64(*v).ok_or_else(|| format!("22003!value '{}' is not finite", v))?,
			Value::Str(s) => s.parse::<BigDecimal>().map_err(|_| format!("22018!conversion of '{}' to decimal failed", s))?,
			other => BigDecimal::from(
				other.as_i128().ok_or_else(|| format!("22018!conversion of '{}' to decimal failed", other))?,
			),
		};
		let unscaled = decimal::to_unscaled(&decimal, self.scale)
			.filter(|v| v.unsigned_abs() < 10u128.pow(self.digits))
			.ok_or_else(|| format!("22003!value '{}' exceeds DECIMAL({},{})", decimal, self.digits, self.scale))?;
		Ok(Value::Decimal(decimal::from_unscaled(unscaled, self.scale)))
	}
}

pub(crate) fn parse_date(text: &str) -> Result<Date, String> {
	NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
		.map(Date::from_naive_date)
		.map_err(|_| format!("22007!date '{}' has an invalid format", text))
}

pub(crate) fn parse_time(text: &str) -> Result<Time, String> {
	NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f")
		.map(Time::from_naive_time)
		.map_err(|_| format!("22007!time '{}' has an invalid format", text))
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime, String> {
	let text = text.trim();
	NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
		.or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
		.map(DateTime::from_naive_datetime)
		.map_err(|_| format!("22007!timestamp '{}' has an invalid format", text))
}

fn parse_hex(text: &str) -> Option<monetdbe_type::Blob> {
	if text.len() % 2 != 0 {
		return None;
	}
	(0..text.len())
		.step_by(2)
		.map(|i| text.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
		.collect::<Option<Vec<u8>>>()
		.map(monetdbe_type::Blob::new)
}
