// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate};
use monetdbe_abi::DateFFI;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A calendar date without time of day
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Date {
	inner: NaiveDate,
}

impl Date {
	pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
		NaiveDate::from_ymd_opt(year, month, day).map(|inner| Self {
			inner,
		})
	}

	pub fn from_naive_date(date: NaiveDate) -> Self {
		Self {
			inner: date,
		}
	}

	pub fn year(&self) -> i32 {
		self.inner.year()
	}

	pub fn month(&self) -> u32 {
		self.inner.month()
	}

	pub fn day(&self) -> u32 {
		self.inner.day()
	}

	pub fn inner(&self) -> &NaiveDate {
		&self.inner
	}

	/// Native cell for this date. Fails for years outside the native 16-bit range.
	pub fn to_ffi(&self) -> Result<DateFFI> {
		let year = i16::try_from(self.year()).map_err(|_| Error::OutOfRange(format!("year {}", self.year())))?;
		Ok(DateFFI::new(year, self.month() as u8, self.day() as u8))
	}
}

impl Display for Date {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_leap_day() {
		let date = Date::new(2024, 2, 29).unwrap();
		assert_eq!(date.to_string(), "2024-02-29");
		assert!(Date::new(2023, 2, 29).is_none());
	}

	#[test]
	fn test_invalid_components() {
		assert!(Date::new(2024, 13, 1).is_none());
		assert!(Date::new(2024, 4, 31).is_none());
		assert!(Date::new(2024, 1, 0).is_none());
	}

	#[test]
	fn test_to_ffi() {
		let ffi = Date::new(1999, 12, 31).unwrap().to_ffi().unwrap();
		assert_eq!(ffi, DateFFI::new(1999, 12, 31));
	}

	#[test]
	fn test_to_ffi_year_out_of_range() {
		let date = Date::new(40000, 1, 1).unwrap();
		assert!(matches!(date.to_ffi(), Err(Error::OutOfRange(_))));
	}

	#[test]
	fn test_ordering() {
		let a = Date::new(2024, 1, 1).unwrap();
		let b = Date::new(2024, 1, 2).unwrap();
		assert!(a < b);
	}
}
