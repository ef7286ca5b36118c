//! Per-block sell rate of streaming orders.

use core::fmt;

use super::Amount;

/// Tokens sold per block.
///
/// Both individual orders and the aggregate of an order pool carry a
/// `SellRate`.  The rate of an order is fixed at submission as
/// `floor(amount / blocks)`; the truncated remainder is never sold.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, SellRate};
///
/// let rate = SellRate::from_amount(Amount::new(10_000), 20).expect("non-zero span");
/// assert_eq!(rate, SellRate::new(500));
/// assert_eq!(rate.volume_over(7), Some(Amount::new(3_500)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SellRate(u128);

impl SellRate {
    /// Nothing streaming.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw tokens-per-block value.
    #[must_use]
    pub const fn new(per_block: u128) -> Self {
        Self(per_block)
    }

    /// `floor(amount / blocks)`, or `None` for a zero span.
    #[must_use]
    pub const fn from_amount(amount: Amount, blocks: u64) -> Option<Self> {
        match amount.get().checked_div(blocks as u128) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the raw tokens-per-block value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if nothing is being sold.
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

    /// Tokens sold over `blocks` blocks, or `None` on overflow.
    #[must_use]
    pub const fn volume_over(&self, blocks: u64) -> Option<Amount> {
        match self.0.checked_mul(blocks as u128) {
            Some(v) => Some(Amount::new(v)),
            None => None,
        }
    }
}

impl fmt::Display for SellRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/block", self.0)
    }
}
