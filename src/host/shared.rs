//! Thread-safe pool handle.

use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    Address, Amount, CancelOutcome, Direction, Liquidity, LiquidityDeposit, LiquidityWithdrawal,
    LongTermOrder, OrderId, Reserves, SwapResult,
};
use crate::error::AmmError;
use crate::pools::{ExecutionReport, TwammPool};
use crate::traits::{BlockClock, TokenCustody};

/// A [`TwammPool`] behind a mutex, stamped by a [`BlockClock`].
///
/// Each call takes the lock, reads the clock while holding it and runs one
/// pool operation at that block, so concurrent callers are serialised into
/// a single history with non-decreasing heights.  A panic while the lock
/// is held poisons it; every later call then fails with
/// [`AmmError::LockPoisoned`].
#[derive(Debug)]
pub struct SharedTwamm<C, K> {
    pool: Mutex<TwammPool<C>>,
    clock: K,
}

impl<C: TokenCustody + Clone, K: BlockClock> SharedTwamm<C, K> {
    /// Wraps `pool`, reading heights from `clock`.
    pub const fn new(pool: TwammPool<C>, clock: K) -> Self {
        Self {
            pool: Mutex::new(pool),
            clock,
        }
    }

    /// The clock driving this handle.
    pub const fn clock(&self) -> &K {
        &self.clock
    }

    /// Unwraps the pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::LockPoisoned`] if a holder panicked.
    pub fn into_inner(self) -> Result<TwammPool<C>, AmmError> {
        self.pool.into_inner().map_err(|_| AmmError::LockPoisoned)
    }

    /// Runs `f` with the pool locked, for reads not covered below.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::LockPoisoned`] if a holder panicked.
    pub fn with_pool<T>(&self, f: impl FnOnce(&TwammPool<C>) -> T) -> Result<T, AmmError> {
        Ok(f(&*self.lock()?))
    }

    /// See [`TwammPool::execute_virtual_orders`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn execute_virtual_orders(&self) -> Result<ExecutionReport, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.execute_virtual_orders(now)
    }

    /// See [`TwammPool::swap_exact_in`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn swap_exact_in(
        &self,
        caller: Address,
        direction: Direction,
        amount_in: Amount,
    ) -> Result<SwapResult, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.swap_exact_in(caller, direction, amount_in, now)
    }

    /// See [`TwammPool::provide_initial_liquidity`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn provide_initial_liquidity(
        &self,
        caller: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityDeposit, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.provide_initial_liquidity(caller, amount_a, amount_b, now)
    }

    /// See [`TwammPool::provide_liquidity`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn provide_liquidity(&self, caller: Address, lp: Liquidity) -> Result<LiquidityDeposit, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.provide_liquidity(caller, lp, now)
    }

    /// See [`TwammPool::add_liquidity`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn add_liquidity(
        &self,
        caller: Address,
        max_a: Amount,
        max_b: Amount,
    ) -> Result<LiquidityDeposit, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.add_liquidity(caller, max_a, max_b, now)
    }

    /// See [`TwammPool::remove_liquidity`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn remove_liquidity(&self, caller: Address, lp: Liquidity) -> Result<LiquidityWithdrawal, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.remove_liquidity(caller, lp, now)
    }

    /// See [`TwammPool::long_term_swap`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn long_term_swap(
        &self,
        caller: Address,
        direction: Direction,
        amount: Amount,
        intervals: u64,
    ) -> Result<OrderId, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.long_term_swap(caller, direction, amount, intervals, now)
    }

    /// See [`TwammPool::cancel_long_term_swap`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn cancel_long_term_swap(&self, caller: Address, id: OrderId) -> Result<CancelOutcome, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.cancel_long_term_swap(caller, id, now)
    }

    /// See [`TwammPool::withdraw_proceeds`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn withdraw_proceeds(&self, caller: Address, id: OrderId) -> Result<Amount, AmmError> {
        let mut pool = self.lock()?;
        let now = self.clock.current_block();
        pool.withdraw_proceeds(caller, id, now)
    }

    /// See [`TwammPool::quote_swap_exact_in`].
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn quote_swap_exact_in(&self, direction: Direction, amount_in: Amount) -> Result<SwapResult, AmmError> {
        let pool = self.lock()?;
        let now = self.clock.current_block();
        pool.quote_swap_exact_in(direction, amount_in, now)
    }

    /// Reserves at the clock's current block.
    ///
    /// # Errors
    ///
    /// Lock poisoning, plus the pool's own errors.
    pub fn reserves(&self) -> Result<Reserves, AmmError> {
        let pool = self.lock()?;
        let now = self.clock.current_block();
        pool.reserves_at(now)
    }

    /// Copy of an order record.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::LockPoisoned`] if a holder panicked.
    pub fn order(&self, id: OrderId) -> Result<Option<LongTermOrder>, AmmError> {
        Ok(self.lock()?.order(id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, TwammPool<C>>, AmmError> {
        self.pool.lock().map_err(|_| AmmError::LockPoisoned)
    }
}
