//! Aggregate accounting for all long-term orders selling in one direction.
//!
//! An [`OrderPool`] never enumerates orders.  It keeps:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `current_sell_rate` | sum of the rates of all orders still selling |
//! | `rewards_factor` | cumulative proceeds per unit sold |
//! | `sell_rate_expiring_at[b]` | sum of the rates of live orders whose expiry is `b` |
//! | `rewards_factor_at_expiry[b]` | `rewards_factor` at the moment boundary `b` expired |
//!
//! # Invariant
//!
//! `sum(sell_rate_expiring_at) == current_sell_rate` after every public
//! operation.  The engine maintains it by always calling
//! [`advance`](OrderPool::advance) for a chunk before
//! [`expire_at`](OrderPool::expire_at) for that chunk's right boundary, so
//! orders expiring at a boundary still receive that chunk's proceeds.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::{Amount, BlockNumber, Direction, RewardsFactor, SellRate};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Order-pool state for one trade direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderPool {
    current_sell_rate: SellRate,
    rewards_factor: RewardsFactor,
    sell_rate_expiring_at: BTreeMap<BlockNumber, SellRate>,
    rewards_factor_at_expiry: BTreeMap<BlockNumber, RewardsFactor>,
}

impl OrderPool {
    /// An empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate rate currently being sold.
    pub const fn current_sell_rate(&self) -> SellRate {
        self.current_sell_rate
    }

    /// Current cumulative proceeds per unit sold.
    pub const fn rewards_factor(&self) -> RewardsFactor {
        self.rewards_factor
    }

    /// Aggregate rate scheduled to stop at `boundary`.
    pub fn sell_rate_expiring_at(&self, boundary: BlockNumber) -> SellRate {
        self.sell_rate_expiring_at
            .get(&boundary)
            .copied()
            .unwrap_or(SellRate::ZERO)
    }

    /// Snapshot taken when `boundary` expired, if it has.
    pub fn rewards_factor_at_expiry(&self, boundary: BlockNumber) -> Option<RewardsFactor> {
        self.rewards_factor_at_expiry.get(&boundary).copied()
    }

    /// Future boundaries with a non-zero expiring rate, ascending.
    pub fn pending_expiries(&self) -> impl Iterator<Item = (BlockNumber, SellRate)> + '_ {
        self.sell_rate_expiring_at.iter().map(|(b, r)| (*b, *r))
    }

    /// Sum of all scheduled expiring rates.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the sum exceeds `u128`.
    pub fn scheduled_total(&self) -> Result<SellRate, AmmError> {
        self.sell_rate_expiring_at
            .values()
            .try_fold(SellRate::ZERO, |acc, r| acc.safe_add(r))
    }

    /// Registers a new order selling `rate` until `expiry`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] for a zero rate.
    /// - [`AmmError::Overflow`] if the aggregate rate exceeds `u128`.
    pub fn deposit(&mut self, rate: SellRate, expiry: BlockNumber) -> Result<(), AmmError> {
        if rate.is_zero() {
            return Err(AmmError::InvalidQuantity("sell rate must be positive"));
        }
        let scheduled = self.sell_rate_expiring_at(expiry).safe_add(&rate)?;
        self.current_sell_rate = self.current_sell_rate.safe_add(&rate)?;
        self.sell_rate_expiring_at.insert(expiry, scheduled);
        Ok(())
    }

    /// Credits `bought` tokens to everything sold during the chunk just
    /// settled, at the rate that was active during it.
    ///
    /// Nothing accrues while the rate is zero.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticBound`] if the factor overflows.
    pub fn advance(&mut self, bought: Amount) -> Result<(), AmmError> {
        self.rewards_factor = self.rewards_factor.accrue(bought, self.current_sell_rate)?;
        Ok(())
    }

    /// Stops the rate scheduled at `boundary` and snapshots the rewards
    /// factor for the orders expiring there.  Returns the rate removed.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::CorruptState`] if the scheduled rate exceeds the
    /// current rate.
    pub fn expire_at(&mut self, boundary: BlockNumber) -> Result<SellRate, AmmError> {
        let Some(expiring) = self.sell_rate_expiring_at.remove(&boundary) else {
            return Ok(SellRate::ZERO);
        };
        self.current_sell_rate = self
            .current_sell_rate
            .checked_sub(&expiring)
            .ok_or(AmmError::CorruptState("expiring rate exceeds current rate"))?;
        self.rewards_factor_at_expiry
            .insert(boundary, self.rewards_factor);
        trace!(
            boundary = boundary.get(),
            expired_rate = expiring.get(),
            rewards_factor = %self.rewards_factor,
            "order pool boundary expired"
        );
        Ok(expiring)
    }

    /// Removes a cancelled order's `rate` from the current rate and from its
    /// `expiry` bucket immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::CorruptState`] if either aggregate is smaller
    /// than `rate`.
    pub fn cancel(&mut self, rate: SellRate, expiry: BlockNumber) -> Result<(), AmmError> {
        let scheduled = self
            .sell_rate_expiring_at(expiry)
            .checked_sub(&rate)
            .ok_or(AmmError::CorruptState("cancelled rate not scheduled"))?;
        self.current_sell_rate = self
            .current_sell_rate
            .checked_sub(&rate)
            .ok_or(AmmError::CorruptState("cancelled rate exceeds current rate"))?;
        if scheduled.is_zero() {
            self.sell_rate_expiring_at.remove(&expiry);
        } else {
            self.sell_rate_expiring_at.insert(expiry, scheduled);
        }
        Ok(())
    }
}

/// The two order pools of a TWAMM, indexed by [`Direction`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderPools {
    a_to_b: OrderPool,
    b_to_a: OrderPool,
}

impl OrderPools {
    /// Two empty pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool of orders selling in `direction`.
    pub const fn get(&self, direction: Direction) -> &OrderPool {
        match direction {
            Direction::AToB => &self.a_to_b,
            Direction::BToA => &self.b_to_a,
        }
    }

    /// Mutable pool of orders selling in `direction`.
    pub fn get_mut(&mut self, direction: Direction) -> &mut OrderPool {
        match direction {
            Direction::AToB => &mut self.a_to_b,
            Direction::BToA => &mut self.b_to_a,
        }
    }

    /// `true` while neither direction is selling.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.a_to_b.current_sell_rate.is_zero() && self.b_to_a.current_sell_rate.is_zero()
    }
}
