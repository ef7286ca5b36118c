//! Percentages expressed in basis points.

use core::fmt;

use super::{Amount, Rounding};
use crate::error::{AmmError, Result};

/// Number of basis points in 100%.
pub(crate) const BPS_DENOMINATOR: u128 = 10_000;

/// A percentage in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, BasisPoints, Rounding};
///
/// let bp = BasisPoints::new(30);
/// assert_eq!(bp.of(Amount::new(10_000), Rounding::Up).ok(), Some(Amount::new(30)));
/// assert_eq!(bp.complement_of(Amount::new(1_000), Rounding::Down).ok(), Some(Amount::new(997)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const MAX_PERCENT: Self = Self(10_000);

    /// Wraps a raw basis-point value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` when the value lies in `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= Self::MAX_PERCENT.0
    }

    /// Computes `amount * self / 10_000`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the quotient does not fit an
    /// [`Amount`].
    pub fn of(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        amount
            .checked_mul_div(u128::from(self.0), BPS_DENOMINATOR, rounding)
            .ok_or(AmmError::Overflow("basis points share overflow"))
    }

    /// Computes `amount * (10_000 - self) / 10_000`, the part of `amount`
    /// left after taking this percentage.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the value exceeds 100%.
    pub fn complement_of(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        let complement = BPS_DENOMINATOR
            .checked_sub(u128::from(self.0))
            .ok_or(AmmError::InvalidFee("basis points above 100%"))?;
        amount
            .checked_mul_div(complement, BPS_DENOMINATOR, rounding)
            .ok_or(AmmError::Overflow("basis points complement overflow"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
