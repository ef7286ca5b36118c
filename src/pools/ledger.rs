//! Per-order records and the order lifecycle.
//!
//! The ledger owns every [`LongTermOrder`] ever submitted, keyed by an
//! append-only [`OrderId`].  Its three operations only touch the order
//! being acted on and the aggregate [`OrderPool`](super::OrderPool) of its
//! direction:
//!
//! | Operation | Order pool effect | Tokens owed |
//! |-----------|-------------------|-------------|
//! | [`submit`](OrderLedger::submit) | rate added now, scheduled to stop at expiry | none (principal pulled by the caller) |
//! | [`withdraw`](OrderLedger::withdraw) | none | `rate × (factor − checkpoint)` in the bought token |
//! | [`cancel`](OrderLedger::cancel) | rate removed now | unsold principal + accrued proceeds |
//!
//! Withdrawing at or after the expiry block uses the factor snapshotted
//! when the expiry boundary was executed and completes the order; a second
//! withdrawal fails with [`AmmError::OrderInert`].

use std::collections::BTreeMap;

use super::OrderPools;
use crate::domain::{
    Address, Amount, BlockInterval, BlockNumber, CancelOutcome, Direction, LongTermOrder, OrderId,
    OrderStatus, SellRate,
};
use crate::error::AmmError;

/// A freshly registered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Id assigned to the order.
    pub id: OrderId,
    /// Tokens sold per block.
    pub sell_rate: SellRate,
    /// Interval boundary at which selling stops.
    pub expiry_block: BlockNumber,
}

/// All long-term orders of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLedger {
    next_id: OrderId,
    orders: BTreeMap<OrderId, LongTermOrder>,
}

impl OrderLedger {
    /// An empty ledger; the first order gets id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an order, inert or not.
    pub fn get(&self, id: OrderId) -> Option<&LongTermOrder> {
        self.orders.get(&id)
    }

    /// Number of orders ever submitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// `true` before the first submission.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders submitted by `owner`, in id order.
    pub fn orders_of<'a>(&'a self, owner: &'a Address) -> impl Iterator<Item = &'a LongTermOrder> + 'a {
        self.orders.values().filter(move |o| o.owner() == *owner)
    }

    /// Registers an order selling `amount` over `intervals` whole intervals.
    ///
    /// The expiry is the first interval boundary at or after `now` plus
    /// `intervals` intervals; the rate is `floor(amount / (expiry − now))`.
    /// The truncated remainder is not sold and not refunded.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `intervals` or `amount` is zero,
    ///   or the amount is too small to sell a token per block.
    /// - [`AmmError::Overflow`] if the expiry block or the aggregate rate
    ///   leaves its numeric range.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        pools: &mut OrderPools,
        owner: Address,
        direction: Direction,
        amount: Amount,
        intervals: u64,
        interval: BlockInterval,
        now: BlockNumber,
    ) -> Result<Submission, AmmError> {
        if intervals == 0 {
            return Err(AmmError::InvalidQuantity(
                "order must span at least one interval",
            ));
        }
        if amount.is_zero() {
            return Err(AmmError::InvalidQuantity("order amount must be positive"));
        }
        let expiry_block = interval
            .align_up(now)
            .zip(interval.span(intervals))
            .and_then(|(start, span)| start.checked_add(span))
            .ok_or(AmmError::Overflow("order expiry block overflow"))?;
        let blocks = expiry_block
            .blocks_since(now)
            .ok_or(AmmError::CorruptState("expiry precedes submission"))?;
        let sell_rate = SellRate::from_amount(amount, blocks)
            .filter(|r| !r.is_zero())
            .ok_or(AmmError::InvalidQuantity(
                "amount too small to sell over the order duration",
            ))?;

        let pool = pools.get_mut(direction);
        pool.deposit(sell_rate, expiry_block)?;

        let id = self.next_id;
        self.next_id = id
            .next()
            .ok_or(AmmError::Overflow("order id counter exhausted"))?;
        self.orders.insert(
            id,
            LongTermOrder::new(
                id,
                owner,
                direction,
                sell_rate,
                now,
                expiry_block,
                pool.rewards_factor(),
            ),
        );
        Ok(Submission {
            id,
            sell_rate,
            expiry_block,
        })
    }

    /// Pays out everything `id` has earned since its last payout.
    ///
    /// Before expiry the order keeps streaming and may be withdrawn again;
    /// at or after expiry the order completes.
    ///
    /// # Errors
    ///
    /// - [`AmmError::OrderNotFound`], [`AmmError::NotOrderOwner`],
    ///   [`AmmError::OrderInert`] for a missing, foreign or finished order.
    /// - [`AmmError::CorruptState`] if an expired order's boundary was never
    ///   executed.
    pub fn withdraw(
        &mut self,
        pools: &OrderPools,
        id: OrderId,
        caller: Address,
        now: BlockNumber,
    ) -> Result<(Direction, Amount), AmmError> {
        let order = self.owned_active(id, caller)?;
        let pool = pools.get(order.direction());
        let expired = order.is_expired_at(now);
        let factor = if expired {
            pool.rewards_factor_at_expiry(order.expiry_block())
                .ok_or(AmmError::CorruptState("expired order has no factor snapshot"))?
        } else {
            pool.rewards_factor()
        };
        let proceeds = factor.proceeds_since(order.rewards_checkpoint(), order.sell_rate())?;
        order
            .record_payout(proceeds, factor)
            .ok_or(AmmError::Overflow("withdrawn proceeds overflow"))?;
        if expired {
            order.finish(OrderStatus::Completed);
        }
        Ok((order.direction(), proceeds))
    }

    /// Cancels `id` before its expiry, unwinding its rate from the order
    /// pool and computing the refund.
    ///
    /// # Errors
    ///
    /// - [`AmmError::OrderNotFound`], [`AmmError::NotOrderOwner`],
    ///   [`AmmError::OrderInert`] for a missing, foreign or finished order.
    /// - [`AmmError::OrderExpired`] if `now` has reached the expiry block.
    pub fn cancel(
        &mut self,
        pools: &mut OrderPools,
        id: OrderId,
        caller: Address,
        now: BlockNumber,
    ) -> Result<(Direction, CancelOutcome), AmmError> {
        let order = self.owned_active(id, caller)?;
        if order.is_expired_at(now) {
            return Err(AmmError::OrderExpired(id));
        }
        let pool = pools.get_mut(order.direction());
        let principal_returned = order
            .unsold_at(now)
            .ok_or(AmmError::Overflow("unsold principal overflow"))?;
        let factor = pool.rewards_factor();
        let proceeds_returned = factor.proceeds_since(order.rewards_checkpoint(), order.sell_rate())?;

        pool.cancel(order.sell_rate(), order.expiry_block())?;
        order
            .record_payout(proceeds_returned, factor)
            .ok_or(AmmError::Overflow("withdrawn proceeds overflow"))?;
        order.finish(OrderStatus::Cancelled);

        Ok((
            order.direction(),
            CancelOutcome {
                principal_returned,
                proceeds_returned,
            },
        ))
    }

    fn owned_active(&mut self, id: OrderId, caller: Address) -> Result<&mut LongTermOrder, AmmError> {
        let order = self.orders.get_mut(&id).ok_or(AmmError::OrderNotFound(id))?;
        if order.owner() != caller {
            return Err(AmmError::NotOrderOwner(id));
        }
        if order.status().is_inert() {
            return Err(AmmError::OrderInert(id));
        }
        Ok(order)
    }
}
