//! Checked arithmetic trait for the quantity newtypes.
//!
//! The newtypes expose `Option`-returning `checked_*` methods; the
//! [`CheckedArithmetic`] trait lifts them into [`Result`]s carrying a
//! specific [`AmmError`] so that bookkeeping code can use `?` throughout.
//!
//! # Implementations
//!
//! - [`Amount`]: token quantities
//! - [`Liquidity`]: LP share quantities
//! - [`SellRate`]: per-block order sell rates
//!
//! # Examples
//!
//! ```
//! use twamm_engine::domain::Amount;
//! use twamm_engine::math::CheckedArithmetic;
//!
//! let total = Amount::new(100).safe_add(&Amount::new(200));
//! assert_eq!(total, Ok(Amount::new(300)));
//! assert!(Amount::new(1).safe_sub(&Amount::new(2)).is_err());
//! ```

use crate::domain::{Amount, Liquidity, Rounding, SellRate};
use crate::error::AmmError;

/// Fallible arithmetic for quantity newtypes.
///
/// # Contract
///
/// - No panics: every error condition produces `Err`.
/// - No saturation: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the sum exceeds `u128`.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;
}

macro_rules! impl_checked_arithmetic {
    ($ty:ty, $overflow:literal, $underflow:literal) => {
        impl CheckedArithmetic for $ty {
            #[inline]
            fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
                self.checked_add(other).ok_or(AmmError::Overflow($overflow))
            }

            #[inline]
            fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
                self.checked_sub(other).ok_or(AmmError::Underflow($underflow))
            }
        }
    };
}

impl_checked_arithmetic!(Amount, "amount addition overflow", "amount subtraction underflow");
impl_checked_arithmetic!(
    Liquidity,
    "liquidity addition overflow",
    "liquidity subtraction underflow"
);
impl_checked_arithmetic!(
    SellRate,
    "sell rate addition overflow",
    "sell rate subtraction underflow"
);

impl Amount {
    /// `self * numerator / denominator` as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] for a zero `denominator` and
    /// [`AmmError::Overflow`] if the quotient exceeds `u128`.
    pub fn safe_mul_div(
        &self,
        numerator: u128,
        denominator: u128,
        rounding: Rounding,
    ) -> Result<Self, AmmError> {
        if denominator == 0 {
            return Err(AmmError::DivisionByZero);
        }
        self.checked_mul_div(numerator, denominator, rounding)
            .ok_or(AmmError::Overflow("amount mul_div overflow"))
    }
}
