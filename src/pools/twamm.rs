//! The TWAMM pool facade.
//!
//! [`TwammPool`] combines a [`TwammState`] with a [`TokenCustody`] and is
//! the only type that moves tokens.  Every operation follows the same
//! shape:
//!
//! 1. Stage a copy of the state and the custody.
//! 2. Settle streaming orders up to `now` on the copy.
//! 3. Apply the operation and its transfers to the copy.
//! 4. Commit the copy only if every step succeeded.
//!
//! A failed call therefore leaves both the pool and every balance exactly
//! as they were, including the catch-up of step 2.
//!
//! Queries never commit.  They simulate the catch-up on a copy, so their
//! answers reflect `now` without advancing the stored clock.

use tracing::{debug, info};

use super::engine::{ExecutionReport, TwammState, execute_virtual_orders};
use crate::config::TwammConfig;
use crate::domain::{
    Address, Amount, BlockNumber, CancelOutcome, Direction, Liquidity, LiquidityDeposit,
    LiquidityWithdrawal, LongTermOrder, OrderId, Price, Reserves, SwapResult,
};
use crate::error::AmmError;
use crate::traits::TokenCustody;

/// A constant-product pool with time-weighted long-term orders.
///
/// # Examples
///
/// ```rust
/// use twamm_engine::config::TwammConfig;
/// use twamm_engine::domain::{Address, Amount, BlockNumber, Direction, TokenPair};
/// use twamm_engine::host::InMemoryCustody;
/// use twamm_engine::pools::TwammPool;
///
/// let (token_a, token_b) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// let alice = Address::repeat_byte(0xa1);
/// let pair = TokenPair::new(token_a, token_b).expect("distinct tokens");
///
/// let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
/// custody.mint(token_a, alice, Amount::new(200_000_000));
/// custody.mint(token_b, alice, Amount::new(100_000_000));
///
/// let mut pool = TwammPool::new(TwammConfig::with_defaults(pair), custody, BlockNumber::new(100));
/// pool.provide_initial_liquidity(alice, Amount::new(100_000_000), Amount::new(100_000_000), BlockNumber::new(100))
///     .expect("seeded");
///
/// let id = pool
///     .long_term_swap(alice, Direction::AToB, Amount::new(10_000), 2, BlockNumber::new(100))
///     .expect("order placed");
/// let proceeds = pool.withdraw_proceeds(alice, id, BlockNumber::new(130)).expect("withdrawn");
/// assert!(proceeds.get() > 9_900);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TwammPool<C> {
    state: TwammState,
    custody: C,
}

impl<C: TokenCustody + Clone> TwammPool<C> {
    /// An unseeded pool whose virtual-order clock starts at `genesis`.
    #[must_use]
    pub fn new(config: TwammConfig, custody: C, genesis: BlockNumber) -> Self {
        info!(
            pair = %config.token_pair(),
            swap_fee = %config.swap_fee(),
            block_interval = config.block_interval().get(),
            genesis = genesis.get(),
            "twamm pool created"
        );
        Self {
            state: TwammState::new(config, genesis),
            custody,
        }
    }

    /// Rebuilds a pool from previously saved state.
    #[must_use]
    pub const fn from_parts(state: TwammState, custody: C) -> Self {
        Self { state, custody }
    }

    /// Splits the pool into its state and custody.
    #[must_use]
    pub fn into_parts(self) -> (TwammState, C) {
        (self.state, self.custody)
    }

    /// Stored state, as of the last committed call.
    pub const fn state(&self) -> &TwammState {
        &self.state
    }

    /// Token custody.
    pub const fn custody(&self) -> &C {
        &self.custody
    }

    /// Pool parameters.
    pub const fn config(&self) -> &TwammConfig {
        self.state.config()
    }

    // -- mutating operations ---------------------------------------------

    /// Settles streaming orders up to `now`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::BlockRegression`] if `now` precedes the last executed
    ///   block.
    /// - [`AmmError::PoolNotSeeded`] or [`AmmError::ArithmeticBound`] if a
    ///   chunk cannot be settled.
    pub fn execute_virtual_orders(&mut self, now: BlockNumber) -> Result<ExecutionReport, AmmError> {
        self.transact(now, |_, _, report| Ok(report.clone()))
    }

    /// Seeds the reserves with `(amount_a, amount_b)` and mints `amount_a`
    /// LP shares to `caller`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::AlreadySeeded`] if LP shares are outstanding.
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    /// - [`AmmError::InsufficientBalance`] if `caller` cannot pay.
    pub fn provide_initial_liquidity(
        &mut self,
        caller: Address,
        amount_a: Amount,
        amount_b: Amount,
        now: BlockNumber,
    ) -> Result<LiquidityDeposit, AmmError> {
        let deposit = self.transact(now, |state, custody, _| {
            let deposit = state.core.seed(caller, amount_a, amount_b)?;
            pull_pair(state, custody, caller, &deposit)?;
            Ok(deposit)
        })?;
        info!(
            provider = %caller,
            minted = deposit.minted.get(),
            amount_a = deposit.amount_a.get(),
            amount_b = deposit.amount_b.get(),
            "initial liquidity provided"
        );
        Ok(deposit)
    }

    /// Mints exactly `lp` shares to `caller`, pulling the proportional
    /// reserves rounded up.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotSeeded`] before initial liquidity.
    /// - [`AmmError::InvalidLiquidity`] if `lp` is zero.
    /// - [`AmmError::InsufficientBalance`] if `caller` cannot pay.
    pub fn provide_liquidity(
        &mut self,
        caller: Address,
        lp: Liquidity,
        now: BlockNumber,
    ) -> Result<LiquidityDeposit, AmmError> {
        let deposit = self.transact(now, |state, custody, _| {
            let deposit = state.core.deposit_for_shares(caller, lp)?;
            pull_pair(state, custody, caller, &deposit)?;
            Ok(deposit)
        })?;
        info!(
            provider = %caller,
            minted = deposit.minted.get(),
            amount_a = deposit.amount_a.get(),
            amount_b = deposit.amount_b.get(),
            "liquidity provided"
        );
        Ok(deposit)
    }

    /// Deposits at most `(max_a, max_b)`, minting as many shares as both
    /// amounts cover.  Seeds the pool if it is empty.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    /// - [`AmmError::InvalidLiquidity`] if not even one share can be minted.
    /// - [`AmmError::InsufficientBalance`] if `caller` cannot pay.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        max_a: Amount,
        max_b: Amount,
        now: BlockNumber,
    ) -> Result<LiquidityDeposit, AmmError> {
        let deposit = self.transact(now, |state, custody, _| {
            let deposit = state.core.deposit_amounts(caller, max_a, max_b)?;
            pull_pair(state, custody, caller, &deposit)?;
            Ok(deposit)
        })?;
        info!(
            provider = %caller,
            minted = deposit.minted.get(),
            amount_a = deposit.amount_a.get(),
            amount_b = deposit.amount_b.get(),
            "liquidity added"
        );
        Ok(deposit)
    }

    /// Burns `lp` of `caller`'s shares and pays out the proportional
    /// reserves rounded down.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidLiquidity`] if `lp` is zero.
    /// - [`AmmError::InsufficientLpBalance`] if `caller` holds fewer shares.
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        lp: Liquidity,
        now: BlockNumber,
    ) -> Result<LiquidityWithdrawal, AmmError> {
        let withdrawal = self.transact(now, |state, custody, _| {
            let withdrawal = state.core.withdraw(caller, lp)?;
            let pair = *state.config.token_pair();
            custody.transfer_out(pair.token_a(), caller, withdrawal.amount_a)?;
            custody.transfer_out(pair.token_b(), caller, withdrawal.amount_b)?;
            Ok(withdrawal)
        })?;
        info!(
            provider = %caller,
            burned = withdrawal.burned.get(),
            amount_a = withdrawal.amount_a.get(),
            amount_b = withdrawal.amount_b.get(),
            "liquidity removed"
        );
        Ok(withdrawal)
    }

    /// Sells exactly `amount_in` against the reserves as they stand after
    /// settling streaming orders up to `now`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount_in` is zero or the output
    ///   rounds to zero.
    /// - [`AmmError::PoolNotSeeded`] for an empty pool.
    /// - [`AmmError::InsufficientBalance`] if `caller` cannot pay.
    pub fn swap_exact_in(
        &mut self,
        caller: Address,
        direction: Direction,
        amount_in: Amount,
        now: BlockNumber,
    ) -> Result<SwapResult, AmmError> {
        let result = self.transact(now, |state, custody, _| {
            let fee = state.config.swap_fee();
            let result = state.core.swap_exact_in(direction, amount_in, fee)?;
            let pair = *state.config.token_pair();
            custody.transfer_in(pair.sold_token(direction), caller, result.amount_in())?;
            custody.transfer_out(pair.bought_token(direction), caller, result.amount_out())?;
            Ok(result)
        })?;
        debug!(
            trader = %caller,
            %direction,
            amount_in = result.amount_in().get(),
            amount_out = result.amount_out().get(),
            fee = result.fee().get(),
            "instant swap"
        );
        Ok(result)
    }

    /// Places a long-term order selling `amount` over `intervals` block
    /// intervals, aligned to the next interval boundary.  The full amount
    /// is pulled immediately.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotSeeded`] for an empty pool.
    /// - [`AmmError::InvalidQuantity`] if `amount` or `intervals` is zero,
    ///   or `amount` is too small to sell one token per block.
    /// - [`AmmError::InsufficientBalance`] if `caller` cannot pay.
    pub fn long_term_swap(
        &mut self,
        caller: Address,
        direction: Direction,
        amount: Amount,
        intervals: u64,
        now: BlockNumber,
    ) -> Result<OrderId, AmmError> {
        let submission = self.transact(now, |state, custody, _| {
            if !state.core.is_seeded() {
                return Err(AmmError::PoolNotSeeded);
            }
            let interval = state.config.block_interval();
            let submission = state.ledger.submit(
                &mut state.order_pools,
                caller,
                direction,
                amount,
                intervals,
                interval,
                now,
            )?;
            let token = state.config.token_pair().sold_token(direction);
            custody.transfer_in(token, caller, amount)?;
            Ok(submission)
        })?;
        info!(
            owner = %caller,
            order = %submission.id,
            %direction,
            amount = amount.get(),
            sell_rate = %submission.sell_rate,
            expiry = submission.expiry_block.get(),
            "long-term order placed"
        );
        Ok(submission.id)
    }

    /// Cancels an active order, refunding its unsold principal and paying
    /// its unclaimed proceeds.
    ///
    /// # Errors
    ///
    /// - [`AmmError::OrderNotFound`], [`AmmError::NotOrderOwner`] or
    ///   [`AmmError::OrderInert`] for a missing, foreign or finished order.
    /// - [`AmmError::OrderExpired`] once the order has reached its expiry.
    pub fn cancel_long_term_swap(
        &mut self,
        caller: Address,
        id: OrderId,
        now: BlockNumber,
    ) -> Result<CancelOutcome, AmmError> {
        let outcome = self.transact(now, |state, custody, _| {
            let (direction, outcome) = state.ledger.cancel(&mut state.order_pools, id, caller, now)?;
            let pair = *state.config.token_pair();
            custody.transfer_out(pair.sold_token(direction), caller, outcome.principal_returned)?;
            custody.transfer_out(pair.bought_token(direction), caller, outcome.proceeds_returned)?;
            Ok(outcome)
        })?;
        info!(owner = %caller, order = %id, %outcome, "long-term order cancelled");
        Ok(outcome)
    }

    /// Pays out everything order `id` has bought since its last payout.
    ///
    /// Withdrawing at or after expiry completes the order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::OrderNotFound`], [`AmmError::NotOrderOwner`] or
    ///   [`AmmError::OrderInert`] for a missing, foreign or finished order.
    pub fn withdraw_proceeds(
        &mut self,
        caller: Address,
        id: OrderId,
        now: BlockNumber,
    ) -> Result<Amount, AmmError> {
        let proceeds = self.transact(now, |state, custody, _| {
            let (direction, proceeds) = state.ledger.withdraw(&state.order_pools, id, caller, now)?;
            let token = state.config.token_pair().bought_token(direction);
            custody.transfer_out(token, caller, proceeds)?;
            Ok(proceeds)
        })?;
        info!(owner = %caller, order = %id, proceeds = proceeds.get(), "proceeds withdrawn");
        Ok(proceeds)
    }

    // -- queries -----------------------------------------------------------

    /// Prices an instant swap at `now` without changing anything.
    ///
    /// # Errors
    ///
    /// Same as [`swap_exact_in`](Self::swap_exact_in), minus balance checks.
    pub fn quote_swap_exact_in(
        &self,
        direction: Direction,
        amount_in: Amount,
        now: BlockNumber,
    ) -> Result<SwapResult, AmmError> {
        let (state, _) = self.state.advanced(now)?;
        state
            .core
            .quote_exact_in(direction, amount_in, state.config.swap_fee())
    }

    /// Reserves as they would stand after settling up to `now`.
    ///
    /// # Errors
    ///
    /// Same as [`execute_virtual_orders`](Self::execute_virtual_orders).
    pub fn reserves_at(&self, now: BlockNumber) -> Result<Reserves, AmmError> {
        let (state, _) = self.state.advanced(now)?;
        Ok(state.core.reserves())
    }

    /// Spot price of the token sold in `direction` at `now`.
    ///
    /// # Errors
    ///
    /// [`AmmError::PoolNotSeeded`] for an empty pool, plus the errors of
    /// [`reserves_at`](Self::reserves_at).
    pub fn spot_price(&self, direction: Direction, now: BlockNumber) -> Result<Price, AmmError> {
        let (state, _) = self.state.advanced(now)?;
        state.core.spot_price(direction)
    }

    /// Order record, if `id` was ever issued.
    pub fn order(&self, id: OrderId) -> Option<&LongTermOrder> {
        self.state.ledger.get(id)
    }

    /// Proceeds `id` could withdraw at `now`.
    ///
    /// # Errors
    ///
    /// Same as [`withdraw_proceeds`](Self::withdraw_proceeds).
    pub fn pending_proceeds(
        &self,
        caller: Address,
        id: OrderId,
        now: BlockNumber,
    ) -> Result<Amount, AmmError> {
        let (mut state, _) = self.state.advanced(now)?;
        let (_, proceeds) = state.ledger.withdraw(&state.order_pools, id, caller, now)?;
        Ok(proceeds)
    }

    /// LP shares held by `provider`.
    pub fn lp_balance_of(&self, provider: &Address) -> Liquidity {
        self.state.core.lp_balance_of(provider)
    }

    /// Total LP shares outstanding.
    pub const fn total_lp_supply(&self) -> Liquidity {
        self.state.core.total_supply()
    }

    /// Last block through which streaming orders were settled.
    pub const fn last_virtual_execution_block(&self) -> BlockNumber {
        self.state.last_virtual_execution_block()
    }

    /// Runs `op` on a staged copy after catching it up to `now`; commits
    /// the copy only if both succeed.
    fn transact<T>(
        &mut self,
        now: BlockNumber,
        op: impl FnOnce(&mut TwammState, &mut C, &ExecutionReport) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let mut state = self.state.clone();
        let mut custody = self.custody.clone();
        let report = execute_virtual_orders(&mut state, now)?;
        let out = op(&mut state, &mut custody, &report)?;
        self.state = state;
        self.custody = custody;
        Ok(out)
    }
}

fn pull_pair<C: TokenCustody>(
    state: &TwammState,
    custody: &mut C,
    from: Address,
    deposit: &LiquidityDeposit,
) -> Result<(), AmmError> {
    let pair = state.config.token_pair();
    custody.transfer_in(pair.token_a(), from, deposit.amount_a)?;
    custody.transfer_in(pair.token_b(), from, deposit.amount_b)
}
