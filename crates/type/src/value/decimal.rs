// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Decimal columns are stored by the engine as scaled integers

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Decimal value of an unscaled integer cell at `scale`
pub fn from_unscaled(unscaled: i128, scale: u32) -> BigDecimal {
	BigDecimal::new(BigInt::from(unscaled), scale as i64)
}

/// Unscaled integer representing `value` at `scale`, truncating extra digits.
/// `None` if the result does not fit 128 bits.
pub fn to_unscaled(value: &BigDecimal, scale: u32) -> Option<i128> {
	let (digits, _) = value.with_scale(scale as i64).into_bigint_and_exponent();
	digits.to_i128()
}
