//! Exchange rate between two tokens.

use core::fmt;

use fixed::types::I80F48;
use ruint::aliases::U256;

use super::{Amount, Rounding};
use crate::error::{AmmError, Result};
use crate::math::div_round_wide;

/// Fractional bits of [`I80F48`].
const FRAC_BITS: usize = 48;

/// Exchange rate `amount_out / amount_in` as an `I80F48` fixed-point ratio.
///
/// Prices are informational: settlement never goes through a `Price`, it
/// always works on exact integer reserves.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, Price, Rounding};
///
/// let p = Price::from_amounts(Amount::new(3), Amount::new(2), Rounding::Down).expect("valid");
/// assert_eq!(p.to_f64(), 1.5);
/// assert_eq!(p.multiply(Amount::new(10), Rounding::Down).ok(), Some(Amount::new(15)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price(I80F48);

impl Price {
    /// Price ratio of 1:1.
    pub const ONE: Self = Self(I80F48::ONE);

    /// Price ratio of zero.
    pub const ZERO: Self = Self(I80F48::ZERO);

    /// Wraps a fixed-point value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPrice`] if the value is negative.
    pub fn new(value: I80F48) -> Result<Self> {
        if value < I80F48::ZERO {
            return Err(AmmError::InvalidPrice("price must be non-negative"));
        }
        Ok(Self(value))
    }

    /// `numerator / denominator`, rounded as requested to 48 fractional bits.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] if `denominator` is zero.
    /// - [`AmmError::InvalidPrice`] if the ratio exceeds the `I80F48` range.
    pub fn from_amounts(numerator: Amount, denominator: Amount, rounding: Rounding) -> Result<Self> {
        let scaled = U256::from(numerator.get()) << FRAC_BITS;
        let bits = div_round_wide(scaled, U256::from(denominator.get()), rounding)
            .ok_or(AmmError::DivisionByZero)?;
        let bits = u128::try_from(bits)
            .ok()
            .and_then(|b| i128::try_from(b).ok())
            .ok_or(AmmError::InvalidPrice("price ratio exceeds I80F48 range"))?;
        Ok(Self(I80F48::from_bits(bits)))
    }

    /// Returns the underlying fixed-point value.
    #[must_use]
    pub const fn get(&self) -> I80F48 {
        self.0
    }

    /// Lossy conversion for display and simulation.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_num::<f64>()
    }

    /// Returns `true` for the zero price.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == I80F48::ZERO
    }

    /// Converts `amount` at this price.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds `u128`.
    pub fn multiply(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        // non-negative by construction
        let bits = u128::try_from(self.0.to_bits()).unwrap_or(0);
        let product = U256::from(amount.get()) * U256::from(bits);
        let out = div_round_wide(product, U256::from(1u8) << FRAC_BITS, rounding)
            .ok_or(AmmError::DivisionByZero)?;
        u128::try_from(out)
            .map(Amount::new)
            .map_err(|_| AmmError::Overflow("price conversion overflow"))
    }

    /// `1 / self`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::DivisionByZero`] for the zero price.
    /// - [`AmmError::InvalidPrice`] if the inverse exceeds the range.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        I80F48::ONE
            .checked_div(self.0)
            .map(Self)
            .ok_or(AmmError::InvalidPrice("inverse price exceeds I80F48 range"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn negative_rejected() {
        assert!(Price::new(I80F48::from_num(-1)).is_err());
        assert!(Price::new(I80F48::from_num(2)).is_ok());
    }

    #[test]
    fn constants() {
        assert_eq!(Price::ONE.to_f64(), 1.0);
        assert!(Price::ZERO.is_zero());
    }

    #[test]
    fn from_amounts_rounding() {
        let Ok(down) = Price::from_amounts(Amount::new(1), Amount::new(3), Rounding::Down) else {
            panic!("expected Ok");
        };
        let Ok(up) = Price::from_amounts(Amount::new(1), Amount::new(3), Rounding::Up) else {
            panic!("expected Ok");
        };
        assert!(up > down);
        assert!((down.to_f64() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn from_amounts_zero_denominator() {
        assert_eq!(
            Price::from_amounts(Amount::new(1), Amount::ZERO, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
    }

    #[test]
    fn from_amounts_out_of_range() {
        let Err(AmmError::InvalidPrice(_)) =
            Price::from_amounts(Amount::MAX, Amount::new(1), Rounding::Down)
        else {
            panic!("expected InvalidPrice");
        };
    }

    #[test]
    fn multiply_and_inverse() {
        let Ok(p) = Price::from_amounts(Amount::new(4), Amount::new(1), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(p.multiply(Amount::new(25), Rounding::Down), Ok(Amount::new(100)));
        let Ok(inv) = p.inverse() else {
            panic!("expected Ok");
        };
        assert_eq!(inv.to_f64(), 0.25);
        assert_eq!(Price::ZERO.inverse(), Err(AmmError::DivisionByZero));
    }

    #[test]
    fn display() {
        let Ok(p) = Price::from_amounts(Amount::new(3), Amount::new(2), Rounding::Down) else {
            panic!("expected Ok");
        };
        assert_eq!(p.to_string(), "1.5");
    }
}
