// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use core::ffi::c_int;

/// Return value of `monetdbe_open` and `monetdbe_close` on success. Any other
/// value is a failure whose message is available through `monetdbe_error`.
pub const MONETDBE_OK: c_int = 0;

/// Native tag of the 64-bit integer, the last tag shared by every library build
pub const NATIVE_INT64_TAG: c_int = 4;
