//! Long-term order records.

use core::fmt;

use super::{Address, Amount, BlockNumber, Direction, RewardsFactor, SellRate};

/// Identifier of a long-term order, assigned from an append-only counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` once the counter is exhausted.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a long-term order.
///
/// ```text
/// Active --cancel--------------------------> Cancelled
/// Active --withdraw at/after expiry block--> Completed
/// ```
///
/// Both terminal states are inert: the record stays readable but no further
/// withdrawal or cancellation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    /// Streaming, or expired with proceeds still unclaimed.
    Active,
    /// Cancelled by its owner; principal and proceeds were refunded.
    Cancelled,
    /// Expired and fully withdrawn.
    Completed,
}

impl OrderStatus {
    /// Returns `true` for the terminal states.
    #[must_use]
    pub const fn is_inert(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A streaming order selling `sell_rate` tokens per block from its
/// submission block until `expiry_block`.
///
/// Proceeds are never stored per order; they are derived from the order
/// pool's rewards factor relative to `rewards_checkpoint`, which moves
/// forward on every partial withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongTermOrder {
    id: OrderId,
    owner: Address,
    direction: Direction,
    sell_rate: SellRate,
    start_block: BlockNumber,
    expiry_block: BlockNumber,
    rewards_checkpoint: RewardsFactor,
    proceeds_withdrawn: Amount,
    status: OrderStatus,
}

impl LongTermOrder {
    pub(crate) const fn new(
        id: OrderId,
        owner: Address,
        direction: Direction,
        sell_rate: SellRate,
        start_block: BlockNumber,
        expiry_block: BlockNumber,
        rewards_checkpoint: RewardsFactor,
    ) -> Self {
        Self {
            id,
            owner,
            direction,
            sell_rate,
            start_block,
            expiry_block,
            rewards_checkpoint,
            proceeds_withdrawn: Amount::ZERO,
            status: OrderStatus::Active,
        }
    }

    /// Order id.
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// Submitting account; the only one allowed to withdraw or cancel.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Trade direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Tokens sold per block.
    pub const fn sell_rate(&self) -> SellRate {
        self.sell_rate
    }

    /// Block the order was submitted at.
    pub const fn start_block(&self) -> BlockNumber {
        self.start_block
    }

    /// Interval boundary at which the order stops selling.
    pub const fn expiry_block(&self) -> BlockNumber {
        self.expiry_block
    }

    /// Rewards factor as of the last payout.
    pub const fn rewards_checkpoint(&self) -> RewardsFactor {
        self.rewards_checkpoint
    }

    /// Total proceeds paid out so far.
    pub const fn proceeds_withdrawn(&self) -> Amount {
        self.proceeds_withdrawn
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// `true` once `now` has reached the expiry block.
    #[must_use]
    pub fn is_expired_at(&self, now: BlockNumber) -> bool {
        now >= self.expiry_block
    }

    /// Principal not yet sold at `now`: `sell_rate * (expiry - now)`, zero
    /// after expiry.  `None` only on overflow.
    #[must_use]
    pub fn unsold_at(&self, now: BlockNumber) -> Option<Amount> {
        let remaining = self.expiry_block.blocks_since(now).unwrap_or(0);
        self.sell_rate.volume_over(remaining)
    }

    pub(crate) fn record_payout(&mut self, paid: Amount, checkpoint: RewardsFactor) -> Option<()> {
        self.proceeds_withdrawn = self.proceeds_withdrawn.checked_add(&paid)?;
        self.rewards_checkpoint = checkpoint;
        Some(())
    }

    pub(crate) fn finish(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

/// Tokens returned by cancelling an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelOutcome {
    /// Unsold principal, in the sold token.
    pub principal_returned: Amount,
    /// Accrued, unwithdrawn proceeds, in the bought token.
    pub proceeds_returned: Amount,
}

impl fmt::Display for CancelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal={}, proceeds={}",
            self.principal_returned, self.proceeds_returned
        )
    }
}
