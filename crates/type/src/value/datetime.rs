// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use monetdbe_abi::TimestampFFI;
use serde::{Deserialize, Serialize};

use crate::{Date, Result, Time};

/// A date and time of day without time zone
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateTime {
	inner: NaiveDateTime,
}

impl DateTime {
	pub fn new(date: Date, time: Time) -> Self {
		Self {
			inner: NaiveDateTime::new(*date.inner(), *time.inner()),
		}
	}

	pub fn from_naive_datetime(datetime: NaiveDateTime) -> Self {
		Self {
			inner: datetime,
		}
	}

	pub fn date(&self) -> Date {
		Date::from_naive_date(self.inner.date())
	}

	pub fn time(&self) -> Time {
		Time::from_naive_time(self.inner.time())
	}

	pub fn inner(&self) -> &NaiveDateTime {
		&self.inner
	}

	pub fn to_ffi(&self) -> Result<TimestampFFI> {
		Ok(TimestampFFI {
			date: self.date().to_ffi()?,
			time: self.time().to_ffi(),
		})
	}
}

impl Display for DateTime {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}T{}", self.date(), self.time())
	}
}

#[cfg(test)]
mod tests {
	use monetdbe_abi::{DateFFI, TimeFFI};

	use super::*;

	#[test]
	fn test_components() {
		let date = Date::new(2024, 2, 29).unwrap();
		let time = Time::from_hms_milli(8, 15, 0, 250).unwrap();
		let datetime = DateTime::new(date, time);

		assert_eq!(datetime.date(), date);
		assert_eq!(datetime.time(), time);
		assert_eq!(datetime.to_string(), "2024-02-29T08:15:00.250000000");
	}

	#[test]
	fn test_to_ffi() {
		let datetime = DateTime::new(Date::new(2000, 1, 2).unwrap(), Time::from_hms_milli(3, 4, 5, 6).unwrap());
		let ffi = datetime.to_ffi().unwrap();
		assert_eq!(ffi.date, DateFFI::new(2000, 1, 2));
		assert_eq!(ffi.time, TimeFFI::new(3, 4, 5, 6));
	}
}
