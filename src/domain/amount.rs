//! Raw token quantity.

use core::fmt;

use super::Rounding;
use crate::math::mul_div;

/// A token quantity in the token's smallest unit.
///
/// Reserves, deposits, order principal and order proceeds are all
/// `Amount`s.  The engine never interprets decimals; every `u128` is a valid
/// quantity.  Arithmetic helpers are checked and return `None` instead of
/// wrapping or panicking.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, Rounding};
///
/// let reserve = Amount::new(1_000);
/// let deposit = Amount::new(250);
/// assert_eq!(reserve.checked_add(&deposit), Some(Amount::new(1_250)));
///
/// // 1_000 * 3 / 4, rounded either way
/// let share = reserve.checked_mul_div(3, 4, Rounding::Down);
/// assert_eq!(share, Some(Amount::new(750)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero tokens.
    pub const ZERO: Self = Self(0);

    /// Largest representable quantity.
    pub const MAX: Self = Self(u128::MAX);

    /// Wraps a raw `u128`.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw `u128`.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` for the zero amount.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with an explicit [`Rounding`] direction.
    ///
    /// Returns `None` when `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match crate::math::div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `self * numerator / denominator` with a 256-bit intermediate.
    ///
    /// Returns `None` when `denominator` is zero or the quotient does not fit
    /// in `u128`.
    #[must_use]
    pub fn checked_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Option<Self> {
        mul_div(self.0, numerator, denominator, rounding).map(Self)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
