// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cell::Cell;

/// Live handles of the in-process engine on the current thread
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
	pub open_databases: usize,
	pub live_results: usize,
	pub live_statements: usize,
	/// Column descriptors handed out by `monetdbe_result_fetch`
	pub fetches: usize,
}

thread_local! {
	static STATS: Cell<Stats> = Cell::new(Stats::default());
}

/// Counters for the calling thread. Tests run on their own threads, so each
/// test observes only the handles it created.
pub fn stats() -> Stats {
	STATS.with(Cell::get)
}

pub(crate) fn record(update: impl FnOnce(&mut Stats)) {
	STATS.with(|cell| {
		let mut stats = cell.get();
		update(&mut stats);
		cell.set(stats);
	});
}
