//! Configuration for a TWAMM pool.

use crate::domain::{BPS_DENOMINATOR, BasisPoints, BlockInterval, FeeTier, TokenPair};
use crate::error::AmmError;

/// Immutable parameters of a TWAMM pool.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `swap_fee` | 30 bp | Withheld from the gross output of instant swaps |
/// | `virtual_order_fee` | 0 bp | Withheld from streamed input before each chunk trades |
/// | `block_interval` | 10 blocks | Chunk length and expiry grid |
///
/// # Validation
///
/// - Both fees must be strictly below 100%.
/// - The block interval is non-zero by construction of [`BlockInterval`].
/// - The token pair is validated at [`TokenPair`] construction time.
///
/// # Examples
///
/// ```
/// use twamm_engine::config::TwammConfig;
/// use twamm_engine::domain::{Address, TokenPair};
///
/// let pair = TokenPair::new(Address::repeat_byte(1), Address::repeat_byte(2)).expect("distinct");
/// let config = TwammConfig::with_defaults(pair);
/// assert_eq!(config.block_interval().get(), 10);
/// assert_eq!(config.swap_fee().basis_points().get(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TwammConfigFields"))]
pub struct TwammConfig {
    token_pair: TokenPair,
    swap_fee: FeeTier,
    virtual_order_fee: FeeTier,
    block_interval: BlockInterval,
}

impl TwammConfig {
    /// Creates a new `TwammConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if either fee is 100% or more.
    pub fn new(
        token_pair: TokenPair,
        swap_fee: FeeTier,
        virtual_order_fee: FeeTier,
        block_interval: BlockInterval,
    ) -> Result<Self, AmmError> {
        let config = Self {
            token_pair,
            swap_fee,
            virtual_order_fee,
            block_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default parameters for `token_pair`: 0.3% swap fee, no virtual-order
    /// fee, 10-block interval.
    #[must_use]
    pub const fn with_defaults(token_pair: TokenPair) -> Self {
        Self {
            token_pair,
            swap_fee: FeeTier::TIER_0_30_PERCENT,
            virtual_order_fee: FeeTier::ZERO,
            block_interval: BlockInterval::DEFAULT,
        }
    }

    /// Returns a copy with a different virtual-order fee.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the fee is 100% or more.
    pub fn with_virtual_order_fee(self, fee: FeeTier) -> Result<Self, AmmError> {
        let config = Self {
            virtual_order_fee: fee,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different instant-swap fee.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the fee is 100% or more.
    pub fn with_swap_fee(self, fee: FeeTier) -> Result<Self, AmmError> {
        let config = Self {
            swap_fee: fee,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different block interval.
    #[must_use]
    pub const fn with_block_interval(self, block_interval: BlockInterval) -> Self {
        Self {
            block_interval,
            ..self
        }
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if either fee is 100% or more.
    pub fn validate(&self) -> Result<(), AmmError> {
        if !below_full(self.swap_fee.basis_points()) {
            return Err(AmmError::InvalidFee("swap fee must be below 100%"));
        }
        if !below_full(self.virtual_order_fee.basis_points()) {
            return Err(AmmError::InvalidFee("virtual order fee must be below 100%"));
        }
        Ok(())
    }

    /// Returns the token pair.
    #[must_use]
    pub const fn token_pair(&self) -> &TokenPair {
        &self.token_pair
    }

    /// Returns the instant-swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeTier {
        self.swap_fee
    }

    /// Returns the virtual-order fee.
    #[must_use]
    pub const fn virtual_order_fee(&self) -> FeeTier {
        self.virtual_order_fee
    }

    /// Returns the block interval.
    #[must_use]
    pub const fn block_interval(&self) -> BlockInterval {
        self.block_interval
    }
}

fn below_full(bp: BasisPoints) -> bool {
    u128::from(bp.get()) < BPS_DENOMINATOR
}

/// Unvalidated wire form of [`TwammConfig`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TwammConfigFields {
    token_pair: TokenPair,
    swap_fee: FeeTier,
    virtual_order_fee: FeeTier,
    block_interval: BlockInterval,
}

#[cfg(feature = "serde")]
impl TryFrom<TwammConfigFields> for TwammConfig {
    type Error = AmmError;

    fn try_from(fields: TwammConfigFields) -> Result<Self, AmmError> {
        Self::new(
            fields.token_pair,
            fields.swap_fee,
            fields.virtual_order_fee,
            fields.block_interval,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Address;

    fn pair() -> TokenPair {
        let Ok(pair) = TokenPair::new(Address::repeat_byte(1), Address::repeat_byte(2)) else {
            panic!("expected valid pair");
        };
        pair
    }

    #[test]
    fn defaults() {
        let cfg = TwammConfig::with_defaults(pair());
        assert_eq!(cfg.swap_fee(), FeeTier::TIER_0_30_PERCENT);
        assert!(cfg.virtual_order_fee().is_zero());
        assert_eq!(cfg.block_interval(), BlockInterval::DEFAULT);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn full_fee_rejected() {
        let full = FeeTier::new(BasisPoints::MAX_PERCENT);
        let r = TwammConfig::new(pair(), full, FeeTier::ZERO, BlockInterval::DEFAULT);
        assert!(matches!(r, Err(AmmError::InvalidFee(_))));
        let r = TwammConfig::with_defaults(pair()).with_virtual_order_fee(full);
        assert!(matches!(r, Err(AmmError::InvalidFee(_))));
    }

    #[test]
    fn builders() {
        let Ok(interval) = BlockInterval::new(5) else {
            panic!("valid interval");
        };
        let Ok(cfg) = TwammConfig::with_defaults(pair())
            .with_block_interval(interval)
            .with_swap_fee(FeeTier::TIER_1_00_PERCENT)
        else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.block_interval().get(), 5);
        assert_eq!(cfg.swap_fee(), FeeTier::TIER_1_00_PERCENT);
        assert_eq!(*cfg.token_pair(), pair());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_fields_are_validated() {
        let fields = TwammConfigFields {
            token_pair: pair(),
            swap_fee: FeeTier::new(BasisPoints::new(10_000)),
            virtual_order_fee: FeeTier::ZERO,
            block_interval: BlockInterval::DEFAULT,
        };
        assert!(matches!(
            TwammConfig::try_from(fields),
            Err(AmmError::InvalidFee(_))
        ));

        let fields = TwammConfigFields {
            token_pair: pair(),
            swap_fee: FeeTier::TIER_0_30_PERCENT,
            virtual_order_fee: FeeTier::ZERO,
            block_interval: BlockInterval::DEFAULT,
        };
        assert_eq!(TwammConfig::try_from(fields), Ok(TwammConfig::with_defaults(pair())));
    }
}
