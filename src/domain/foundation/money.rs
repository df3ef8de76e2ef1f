//! Monetary amounts in minor units.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use super::ValidationError;

/// An amount of money held as integer cents.
///
/// Serializes as a decimal number in major units (`2420` cents is `24.2`).
/// The arithmetic operators saturate; callers that must not lose precision
/// use the `checked_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude accepted from decimal input (ten trillion).
    pub const MAX_INPUT: Money = Money(1_000_000_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a decimal amount in major units, rounding to the nearest cent.
    pub fn from_major(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format("amount", "must be a finite number"));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > Self::MAX_INPUT.0 as f64 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must not exceed {} in magnitude", Self::MAX_INPUT),
            ));
        }
        Ok(Self(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(&self, other: Money) -> Result<Self, ValidationError> {
        self.0.checked_add(other.0).map(Self).ok_or_else(overflow)
    }

    /// Multiplies by an integer quantity.
    pub fn checked_times(&self, quantity: u32) -> Result<Self, ValidationError> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Self)
            .ok_or_else(overflow)
    }

    /// Applies a percentage rate, rounding half away from zero to the nearest cent.
    pub fn checked_percent(&self, rate: f64) -> Result<Self, ValidationError> {
        let cents = (self.0 as f64 * rate / 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return Err(overflow());
        }
        Ok(Self(cents as i64))
    }

    pub fn saturating_sub_floor_zero(&self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }
}

fn overflow() -> ValidationError {
    ValidationError::invalid_format("amount", "exceeds the representable range")
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_major(amount).map_err(serde::de::Error::custom)
    }
}
