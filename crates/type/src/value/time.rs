// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use chrono::{NaiveTime, Timelike};
use monetdbe_abi::TimeFFI;
use serde::{Deserialize, Serialize};

/// A time of day with nanosecond precision
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
	inner: NaiveTime,
}

impl Default for Time {
	fn default() -> Self {
		Self {
			inner: NaiveTime::MIN,
		}
	}
}

impl Time {
	pub fn new(hour: u32, min: u32, sec: u32, nano: u32) -> Option<Self> {
		NaiveTime::from_hms_nano_opt(hour, min, sec, nano).map(|inner| Self {
			inner,
		})
	}

	/// Time from millisecond precision components, as stored by the engine
	pub fn from_hms_milli(hour: u32, min: u32, sec: u32, milli: u32) -> Option<Self> {
		Self::new(hour, min, sec, milli.checked_mul(1_000_000)?)
	}

	pub fn from_naive_time(time: NaiveTime) -> Self {
		Self {
			inner: time,
		}
	}

	pub fn hour(&self) -> u32 {
		self.inner.hour()
	}

	pub fn minute(&self) -> u32 {
		self.inner.minute()
	}

	pub fn second(&self) -> u32 {
		self.inner.second()
	}

	pub fn nanosecond(&self) -> u32 {
		self.inner.nanosecond()
	}

	pub fn millisecond(&self) -> u32 {
		self.inner.nanosecond() / 1_000_000
	}

	pub fn inner(&self) -> &NaiveTime {
		&self.inner
	}

	/// Native cell for this time, truncated to milliseconds
	pub fn to_ffi(&self) -> TimeFFI {
		TimeFFI::new(self.hour() as u8, self.minute() as u8, self.second() as u8, self.millisecond())
	}
}

impl Display for Time {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:02}:{:02}:{:02}.{:09}", self.hour(), self.minute(), self.second(), self.nanosecond())
	}
}
