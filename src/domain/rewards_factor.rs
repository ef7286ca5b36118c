//! Cumulative proceeds-per-unit-sold accumulator.
//!
//! Each order pool carries one [`RewardsFactor`].  Whenever a chunk of
//! streamed volume settles, the pool adds `bought / sell_rate` to it; an
//! order's entitlement between two points in time is then
//! `order_rate * (factor_now - factor_then)`, independent of how many other
//! orders share the pool.
//!
//! The factor is stored as an unsigned Q64.64 value in 256 bits, so it
//! never overflows for any realistic number of chunks.

use core::fmt;

use ruint::aliases::U256;

use super::{Amount, SellRate};
use crate::error::{AmmError, Result};

/// Fractional bits of the accumulator.
const FRACTION_BITS: usize = 64;

/// Proceeds per token sold, Q64.64.
///
/// ```
/// use twamm_engine::domain::{Amount, RewardsFactor, SellRate};
///
/// let start = RewardsFactor::ZERO;
/// let later = start.accrue(Amount::new(9_000), SellRate::new(1_000)).expect("in range");
/// // an order selling 250 per block was a quarter of the pool
/// assert_eq!(later.proceeds_since(start, SellRate::new(250)), Ok(Amount::new(2_250)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardsFactor(U256);

impl RewardsFactor {
    /// Nothing accrued.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wraps a raw Q64.64 value.
    #[must_use]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the raw Q64.64 value.
    #[must_use]
    pub const fn raw(&self) -> U256 {
        self.0
    }

    /// Adds `bought / rate` for a settled chunk.
    ///
    /// A zero rate sold nothing and leaves the factor unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticBound`] if the accumulator leaves 256 bits.
    pub fn accrue(&self, bought: Amount, rate: SellRate) -> Result<Self> {
        if rate.is_zero() {
            return Ok(*self);
        }
        let increment = (U256::from(bought.get()) << FRACTION_BITS) / U256::from(rate.get());
        self.0
            .checked_add(increment)
            .map(Self)
            .ok_or(AmmError::ArithmeticBound("rewards factor overflow"))
    }

    /// Proceeds owed to `rate` for the growth from `checkpoint` to `self`,
    /// rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::CorruptState`] if `checkpoint` is ahead of `self`.
    /// - [`AmmError::ArithmeticBound`] if the proceeds exceed `u128`.
    pub fn proceeds_since(&self, checkpoint: Self, rate: SellRate) -> Result<Amount> {
        let growth = self
            .0
            .checked_sub(checkpoint.0)
            .ok_or(AmmError::CorruptState("rewards checkpoint ahead of pool factor"))?;
        let scaled = growth
            .checked_mul(U256::from(rate.get()))
            .ok_or(AmmError::ArithmeticBound("order proceeds overflow"))?;
        u128::try_from(scaled >> FRACTION_BITS)
            .map(Amount::new)
            .map_err(|_| AmmError::ArithmeticBound("order proceeds exceed u128"))
    }
}

impl fmt::Display for RewardsFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
