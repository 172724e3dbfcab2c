// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use monetdbe_abi::{DateFFI, TimeFFI, TimestampFFI};
use monetdbe_type::{Date, DateTime, Time};

/// Structurally valid date cell. Cells failing this check materialize as NULL.
pub(crate) fn is_valid_date(cell: &DateFFI) -> bool {
	cell.year > 0 && (1..=12).contains(&cell.month) && (1..=31).contains(&cell.day)
}

/// Structurally valid time cell. Cells failing this check materialize as NULL.
pub(crate) fn is_valid_time(cell: &TimeFFI) -> bool {
	cell.hours < 24 && cell.minutes < 60 && cell.seconds < 60 && cell.ms < 1000
}

pub(crate) fn date(cell: &DateFFI) -> Option<Date> {
	if !is_valid_date(cell) {
		return None;
	}
	// calendar check, e.g. February 30th
	Date::new(cell.year as i32, cell.month as u32, cell.day as u32)
}

pub(crate) fn time(cell: &TimeFFI) -> Option<Time> {
	if !is_valid_time(cell) {
		return None;
	}
	Time::from_hms_milli(cell.hours as u32, cell.minutes as u32, cell.seconds as u32, cell.ms)
}

pub(crate) fn timestamp(cell: &TimestampFFI) -> Option<DateTime> {
	Some(DateTime::new(date(&cell.date)?, time(&cell.time)?))
}
