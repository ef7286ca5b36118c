//! Virtual order execution.
//!
//! Streaming orders are settled lazily.  Whenever the pool is touched at
//! block `now`, [`execute_virtual_orders`] walks from the last executed block
//! to `now` in chunks that never cross an interval boundary:
//!
//! ```text
//!   last            boundary            boundary        now
//!    |---- chunk 1 ----|----- chunk 2 -----|-- chunk 3 ---|
//!                      ^ expiries          ^ expiries
//! ```
//!
//! For each chunk of `n` blocks:
//!
//! 1. Both order pools stream `rate × n` tokens.
//! 2. The two streams settle against the reserves with
//!    [`virtual_trade`](crate::math::virtual_trade).
//! 3. Each order pool's rewards factor advances by what it bought, at the
//!    rate active during the chunk.
//! 4. If the chunk ends on a boundary, the rates expiring there stop and the
//!    rewards factor is snapshotted for them.
//!
//! Once neither direction has anything streaming the walk jumps straight to
//! `now`.  The walk is deterministic: the same state and `now` always
//! produce bit-identical results.

use tracing::debug;

use super::{ConstantProductCore, OrderLedger, OrderPools};
use crate::config::TwammConfig;
use crate::domain::{BlockNumber, Direction};
use crate::error::AmmError;
use crate::math::virtual_trade;

/// What one catch-up walk did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionReport {
    /// Last executed block before the walk.
    pub from_block: BlockNumber,
    /// Last executed block after the walk.
    pub to_block: BlockNumber,
    /// Chunks settled against the reserves.
    pub chunks: u64,
    /// Boundaries at which at least one order rate expired, ascending.
    pub expired_boundaries: Vec<BlockNumber>,
}

impl ExecutionReport {
    fn starting_at(block: BlockNumber) -> Self {
        Self {
            from_block: block,
            to_block: block,
            chunks: 0,
            expired_boundaries: Vec::new(),
        }
    }

    /// `true` if the walk changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from_block == self.to_block
    }
}

/// Everything a TWAMM pool owns, apart from token custody.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwammState {
    pub(crate) config: TwammConfig,
    pub(crate) core: ConstantProductCore,
    pub(crate) order_pools: OrderPools,
    pub(crate) ledger: OrderLedger,
    pub(crate) last_virtual_execution_block: BlockNumber,
}

impl TwammState {
    /// A fresh, unseeded pool whose clock starts at `genesis`.
    #[must_use]
    pub fn new(config: TwammConfig, genesis: BlockNumber) -> Self {
        Self {
            config,
            core: ConstantProductCore::new(),
            order_pools: OrderPools::new(),
            ledger: OrderLedger::new(),
            last_virtual_execution_block: genesis,
        }
    }

    /// Pool parameters.
    pub const fn config(&self) -> &TwammConfig {
        &self.config
    }

    /// Reserves and LP accounting.
    pub const fn core(&self) -> &ConstantProductCore {
        &self.core
    }

    /// The two order pools.
    pub const fn order_pools(&self) -> &OrderPools {
        &self.order_pools
    }

    /// Order records.
    pub const fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    /// Last block through which streaming orders have been settled.
    pub const fn last_virtual_execution_block(&self) -> BlockNumber {
        self.last_virtual_execution_block
    }

    /// Returns a copy of this state caught up to `now`, leaving `self`
    /// untouched.
    ///
    /// # Errors
    ///
    /// Same as [`execute_virtual_orders`].
    pub fn advanced(&self, now: BlockNumber) -> Result<(Self, ExecutionReport), AmmError> {
        let mut next = self.clone();
        let report = execute_virtual_orders(&mut next, now)?;
        Ok((next, report))
    }
}

/// Settles all streaming volume between the last executed block and `now`.
///
/// Calling it again for the same `now` is a no-op.  On error `state` may be
/// partially advanced and must be discarded; [`TwammState::advanced`] is the
/// all-or-nothing variant.
///
/// # Errors
///
/// - [`AmmError::BlockRegression`] if `now` precedes the last executed block.
/// - [`AmmError::PoolNotSeeded`] if orders stream into empty reserves.
/// - [`AmmError::ArithmeticBound`] if a chunk's streamed volume, a final
///   reserve or a rewards factor leaves its numeric range.
pub fn execute_virtual_orders(
    state: &mut TwammState,
    now: BlockNumber,
) -> Result<ExecutionReport, AmmError> {
    let start = state.last_virtual_execution_block;
    if now < start {
        return Err(AmmError::BlockRegression {
            last: start,
            requested: now,
        });
    }

    let interval = state.config.block_interval();
    let fee = state.config.virtual_order_fee();
    let mut report = ExecutionReport::starting_at(start);
    let mut last = start;

    while last < now {
        if state.order_pools.is_idle() {
            last = now;
            break;
        }
        if !state.core.is_seeded() {
            return Err(AmmError::PoolNotSeeded);
        }

        let boundary = interval
            .next_boundary_after(last)
            .ok_or(AmmError::Overflow("block height overflow"))?;
        let end = boundary.min(now);
        let blocks = end
            .blocks_since(last)
            .ok_or(AmmError::CorruptState("chunk ends before it starts"))?;

        let a_in = state
            .order_pools
            .get(Direction::AToB)
            .current_sell_rate()
            .volume_over(blocks)
            .ok_or(AmmError::ArithmeticBound("streamed token A volume exceeds u128"))?;
        let b_in = state
            .order_pools
            .get(Direction::BToA)
            .current_sell_rate()
            .volume_over(blocks)
            .ok_or(AmmError::ArithmeticBound("streamed token B volume exceeds u128"))?;

        let trade = virtual_trade(state.core.reserves(), a_in, b_in, fee)?;
        state.core.set_reserves(trade.reserves);
        state
            .order_pools
            .get_mut(Direction::AToB)
            .advance(trade.bought_b)?;
        state
            .order_pools
            .get_mut(Direction::BToA)
            .advance(trade.bought_a)?;

        debug!(
            from = last.get(),
            to = end.get(),
            a_in = a_in.get(),
            b_in = b_in.get(),
            bought_a = trade.bought_a.get(),
            bought_b = trade.bought_b.get(),
            reserve_a = trade.reserves.a().get(),
            reserve_b = trade.reserves.b().get(),
            "virtual orders chunk settled"
        );
        report.chunks += 1;

        if end == boundary {
            let mut expired = false;
            for direction in Direction::ALL {
                let stopped = state.order_pools.get_mut(direction).expire_at(boundary)?;
                expired |= !stopped.is_zero();
            }
            if expired {
                report.expired_boundaries.push(boundary);
            }
        }
        last = end;
    }

    state.last_virtual_execution_block = last;
    report.to_block = last;
    Ok(report)
}
