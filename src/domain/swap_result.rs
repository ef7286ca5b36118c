//! Outcomes of instant swaps and liquidity operations.

use core::fmt;

use super::{Amount, Liquidity, Price, Rounding};
use crate::error::{AmmError, Result};

/// The outcome of an instant swap.
///
/// The fee is charged on the output side, so `amount_out + fee` is the
/// gross constant-product output.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, SwapResult};
///
/// let result = SwapResult::new(Amount::new(10_000), Amount::new(9_969), Amount::new(30));
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapResult {
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
}

impl SwapResult {
    /// Creates a new `SwapResult`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidQuantity`] if either amount is zero.
    pub const fn new(amount_in: Amount, amount_out: Amount, fee: Amount) -> Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("amount_in must be positive"));
        }
        if amount_out.is_zero() {
            return Err(AmmError::InvalidQuantity("swap output rounds to zero"));
        }
        Ok(Self {
            amount_in,
            amount_out,
            fee,
        })
    }

    /// Returns the input amount.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the net output amount.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns the fee withheld from the output.
    pub const fn fee(&self) -> Amount {
        self.fee
    }

    /// Realized price `amount_out / amount_in`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ratio does not fit a [`Price`].
    pub fn effective_price(&self, rounding: Rounding) -> Result<Price> {
        Price::from_amounts(self.amount_out, self.amount_in, rounding)
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapResult(in={}, out={}, fee={})",
            self.amount_in, self.amount_out, self.fee
        )
    }
}

/// LP tokens minted and the token amounts pulled for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidityDeposit {
    /// LP tokens credited to the provider.
    pub minted: Liquidity,
    /// Token A pulled from the provider.
    pub amount_a: Amount,
    /// Token B pulled from the provider.
    pub amount_b: Amount,
}

/// LP tokens burned and the token amounts paid out for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidityWithdrawal {
    /// LP tokens burned.
    pub burned: Liquidity,
    /// Token A paid out.
    pub amount_a: Amount,
    /// Token B paid out.
    pub amount_b: Amount,
}
