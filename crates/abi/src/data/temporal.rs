// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

/// FFI-safe date cell (`monetdbe_data_date`)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFFI {
	pub day: u8,
	pub month: u8,
	pub year: i16,
}

/// FFI-safe time-of-day cell (`monetdbe_data_time`)
///
/// Sub-second precision is carried in milliseconds.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFFI {
	pub ms: u32,
	pub seconds: u8,
	pub minutes: u8,
	pub hours: u8,
}

/// FFI-safe timestamp cell (`monetdbe_data_timestamp`)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampFFI {
	pub date: DateFFI,
	pub time: TimeFFI,
}

impl DateFFI {
	pub const fn new(year: i16, month: u8, day: u8) -> Self {
		Self {
			day,
			month,
			year,
		}
	}
}

impl TimeFFI {
	pub const fn new(hours: u8, minutes: u8, seconds: u8, ms: u32) -> Self {
		Self {
			ms,
			seconds,
			minutes,
			hours,
		}
	}
}
