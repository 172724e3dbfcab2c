// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Managed-side type system of the monetdbe binding
//!
//! Managed type codes always reserve the slot of the 128-bit integer, whatever
//! the build of the loaded native library. [`NativeLayout`] is the one place
//! where native tags and managed codes are translated.

pub mod error;
mod layout;
pub mod value;

pub use error::{Error, Result};
pub use layout::NativeLayout;
pub use value::{Blob, Date, DateTime, Time, Type, Value, decimal};
