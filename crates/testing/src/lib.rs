// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test support for the monetdbe binding

pub mod engine;

pub use engine::{Stats, stats, vtable};
