//! Trading fee settings.

use core::fmt;

use super::{Amount, BasisPoints, Rounding};
use crate::error::Result;

/// A trading fee in basis points.
///
/// Used for the instant-swap fee (charged on the gross output) and for the
/// optional virtual-order fee (charged on streamed input).
///
/// ```
/// use twamm_engine::domain::{Amount, FeeTier};
///
/// let (net, fee) = FeeTier::TIER_0_30_PERCENT
///     .split(Amount::new(9_999))
///     .expect("fee below 100%");
/// assert_eq!(net, Amount::new(9_969));
/// assert_eq!(fee, Amount::new(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// No fee.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.05%.
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30%, the classic constant-product fee.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00%.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a fee tier from arbitrary basis points.
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying basis points.
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Returns `true` for a zero fee.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.get() == 0
    }

    /// Splits `gross` into `(net, fee)`.
    ///
    /// The net part is rounded down, so the fee absorbs the remainder and
    /// `net + fee == gross` always holds.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`](crate::error::AmmError::InvalidFee)
    /// if the tier exceeds 100%.
    pub fn split(&self, gross: Amount) -> Result<(Amount, Amount)> {
        let net = self.0.complement_of(gross, Rounding::Down)?;
        // net <= gross because the complement is at most 100%
        let fee = Amount::new(gross.get() - net.get());
        Ok((net, fee))
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fee {}", self.0)
    }
}
