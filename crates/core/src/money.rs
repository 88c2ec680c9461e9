//! Two-decimal monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts travel as `rust_decimal::Decimal` and are stored as integer minor
//! units (cents), so every backend round-trips them exactly.

use rust_decimal::Decimal;
use thiserror::Error;

/// Number of fractional digits carried by every amount.
pub const SCALE: u32 = 2;

/// Minor-unit magnitude amounts must stay below (ten digits, two of them decimals).
const MAX_MINOR: u64 = 10_000_000_000;

/// Reasons an amount is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// More than two fractional digits.
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimals,

    /// Magnitude of 100,000,000 or more.
    #[error("Ensure that there are no more than 10 digits in total.")]
    OutOfRange,

    /// Negative where only zero or positive amounts make sense.
    #[error("Ensure this value is greater than or equal to 0.")]
    Negative,
}

/// Converts an amount to integer minor units.
///
/// # Errors
///
/// Returns `MoneyError::TooManyDecimals` if the amount cannot be represented in
/// cents without rounding, and `MoneyError::OutOfRange` if it is too large.
pub fn to_minor(amount: Decimal) -> Result<i64, MoneyError> {
    let normalized = amount.normalize();
    if normalized.scale() > SCALE {
        return Err(MoneyError::TooManyDecimals);
    }

    let mut cents = normalized;
    cents.rescale(SCALE);
    let minor = i64::try_from(cents.mantissa()).map_err(|_| MoneyError::OutOfRange)?;
    if minor.unsigned_abs() >= MAX_MINOR {
        return Err(MoneyError::OutOfRange);
    }
    Ok(minor)
}

/// Converts stored minor units back to a two-decimal amount.
#[must_use]
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, SCALE)
}

/// Like [`to_minor`], additionally rejecting negative amounts.
///
/// # Errors
///
/// Returns `MoneyError::Negative` for amounts below zero, otherwise the same
/// errors as [`to_minor`].
pub fn to_minor_non_negative(amount: Decimal) -> Result<i64, MoneyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative);
    }
    to_minor(amount)
}

/// Renders an amount with exactly two fractional digits.
#[must_use]
pub fn round(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(SCALE);
    rounded.rescale(SCALE);
    rounded
}
