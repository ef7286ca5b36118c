//! Constant-product reserves, instant swaps and LP accounting.
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the reserves of
//! the two tokens.  Unlike the streaming side, instant swaps charge their fee
//! on the **output**:
//!
//! # Swap Algorithm (Token A → Token B)
//!
//! 1. `gross = reserve_b × amount_in / (reserve_a + amount_in)` (rounded down)
//! 2. `amount_out = gross × (10 000 − fee_bps) / 10 000` (rounded down)
//! 3. `reserve_a += amount_in`
//! 4. `reserve_b -= amount_out` (the fee stays in the pool)
//!
//! # LP shares
//!
//! | Operation | Tokens moved | Shares |
//! |-----------|--------------|--------|
//! | seed | `(a, b)` as given | `a` minted |
//! | deposit by shares `lp` | `ceil(lp × r / L)` of each token in | `lp` minted |
//! | deposit by amounts `(a, b)` | `ceil(mint × r / L)` of each token in | `min(a L / r_a, b L / r_b)` minted |
//! | withdraw `lp` | `floor(lp × r / L)` of each token out | `lp` burned |
//!
//! Deposits round in the pool's favour and withdrawals round against the
//! caller, so the per-share claim on each reserve never decreases.
//!
//! The core only does bookkeeping; token movement is the facade's job.

use std::collections::BTreeMap;

use crate::domain::{
    Address, Amount, Direction, FeeTier, Liquidity, LiquidityDeposit, LiquidityWithdrawal, Price,
    Reserves, Rounding, SwapResult,
};
use crate::error::AmmError;
use crate::math::{CheckedArithmetic, constant_product_output, mul_div};

/// The constant-product half of a TWAMM pool.
///
/// # State
///
/// - `reserves`: current token balances backing the curve (fees included)
/// - `total_supply`: outstanding LP shares
/// - `lp_balances`: shares per provider
/// - `accumulated_fees_a` / `accumulated_fees_b`: lifetime instant-swap fee counters
///
/// # Example
///
/// ```
/// use twamm_engine::domain::{Address, Amount, Direction, FeeTier};
/// use twamm_engine::pools::ConstantProductCore;
///
/// let mut core = ConstantProductCore::new();
/// let lp = Address::repeat_byte(9);
/// core.seed(lp, Amount::new(100_000_000), Amount::new(100_000_000)).expect("first deposit");
///
/// let result = core
///     .swap_exact_in(Direction::AToB, Amount::new(10_000), FeeTier::TIER_0_30_PERCENT)
///     .expect("seeded pool");
/// assert_eq!(result.amount_out(), Amount::new(9_969));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantProductCore {
    reserves: Reserves,
    total_supply: Liquidity,
    lp_balances: BTreeMap<Address, Liquidity>,
    accumulated_fees_a: Amount,
    accumulated_fees_b: Amount,
}

impl ConstantProductCore {
    /// An empty, unseeded core.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reserves.
    pub const fn reserves(&self) -> Reserves {
        self.reserves
    }

    /// Outstanding LP shares.
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// LP shares held by `provider`.
    pub fn lp_balance_of(&self, provider: &Address) -> Liquidity {
        self.lp_balances.get(provider).copied().unwrap_or(Liquidity::ZERO)
    }

    /// Lifetime instant-swap fees collected in token A.
    pub const fn accumulated_fees_a(&self) -> Amount {
        self.accumulated_fees_a
    }

    /// Lifetime instant-swap fees collected in token B.
    pub const fn accumulated_fees_b(&self) -> Amount {
        self.accumulated_fees_b
    }

    /// `true` once both reserves are non-zero.
    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        self.reserves.is_seeded()
    }

    pub(crate) fn set_reserves(&mut self, reserves: Reserves) {
        self.reserves = reserves;
    }

    /// Spot price of the sold token in units of the bought token,
    /// `reserve_out / reserve_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotSeeded`] for an empty pool.
    pub fn spot_price(&self, direction: Direction) -> Result<Price, AmmError> {
        if !self.is_seeded() {
            return Err(AmmError::PoolNotSeeded);
        }
        let (reserve_in, reserve_out) = self.reserves.oriented(direction);
        Price::from_amounts(reserve_out, reserve_in, Rounding::Down)
    }

    /// Prices an exact-in swap without changing state.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount_in` is zero or the output
    ///   rounds to zero.
    /// - [`AmmError::PoolNotSeeded`] for an empty pool.
    pub fn quote_exact_in(
        &self,
        direction: Direction,
        amount_in: Amount,
        fee: FeeTier,
    ) -> Result<SwapResult, AmmError> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidQuantity("amount_in must be positive"));
        }
        if !self.is_seeded() {
            return Err(AmmError::PoolNotSeeded);
        }
        let (reserve_in, reserve_out) = self.reserves.oriented(direction);
        let gross = constant_product_output(reserve_in, reserve_out, amount_in)?;
        let (net, fee_amount) = fee.split(gross)?;
        SwapResult::new(amount_in, net, fee_amount)
    }

    /// Executes an exact-in swap against the reserves.
    ///
    /// # Errors
    ///
    /// Same as [`quote_exact_in`](Self::quote_exact_in), plus
    /// [`AmmError::Overflow`] if the input reserve would exceed `u128`.
    pub fn swap_exact_in(
        &mut self,
        direction: Direction,
        amount_in: Amount,
        fee: FeeTier,
    ) -> Result<SwapResult, AmmError> {
        let result = self.quote_exact_in(direction, amount_in, fee)?;
        let (reserve_in, reserve_out) = self.reserves.oriented(direction);
        let new_in = reserve_in.safe_add(&result.amount_in())?;
        let new_out = reserve_out.safe_sub(&result.amount_out())?;
        self.reserves = Reserves::from_oriented(direction, new_in, new_out);

        // fee is denominated in the bought token
        match direction {
            Direction::AToB => {
                self.accumulated_fees_b = self.accumulated_fees_b.safe_add(&result.fee())?;
            }
            Direction::BToA => {
                self.accumulated_fees_a = self.accumulated_fees_a.safe_add(&result.fee())?;
            }
        }
        Ok(result)
    }

    /// First deposit: sets the reserves to `(amount_a, amount_b)` and mints
    /// `amount_a` shares to `provider`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::AlreadySeeded`] if shares are outstanding.
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    pub fn seed(
        &mut self,
        provider: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityDeposit, AmmError> {
        if !self.total_supply.is_zero() {
            return Err(AmmError::AlreadySeeded);
        }
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::InvalidQuantity(
                "initial liquidity needs both tokens",
            ));
        }
        let minted = Liquidity::new(amount_a.get());
        self.reserves = Reserves::new(amount_a, amount_b);
        self.credit(provider, minted)?;
        Ok(LiquidityDeposit {
            minted,
            amount_a,
            amount_b,
        })
    }

    /// Mints exactly `lp` shares, pulling `ceil(lp × reserve / supply)` of
    /// each token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotSeeded`] if no shares exist yet.
    /// - [`AmmError::InvalidLiquidity`] if `lp` is zero.
    /// - [`AmmError::Overflow`] if a required amount exceeds `u128`.
    pub fn deposit_for_shares(
        &mut self,
        provider: Address,
        lp: Liquidity,
    ) -> Result<LiquidityDeposit, AmmError> {
        if lp.is_zero() {
            return Err(AmmError::InvalidLiquidity("lp amount must be positive"));
        }
        if self.total_supply.is_zero() {
            return Err(AmmError::PoolNotSeeded);
        }
        let amount_a = self.share_of(self.reserves.a(), lp, Rounding::Up)?;
        let amount_b = self.share_of(self.reserves.b(), lp, Rounding::Up)?;
        self.apply_deposit(provider, lp, amount_a, amount_b)
    }

    /// Deposits up to `(amount_a, amount_b)`, minting the largest share count
    /// both amounts cover and pulling only what that count requires.
    ///
    /// Seeds the pool when no shares exist yet.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if either amount is zero.
    /// - [`AmmError::InvalidLiquidity`] if the amounts are too small to
    ///   mint a single share.
    pub fn deposit_amounts(
        &mut self,
        provider: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityDeposit, AmmError> {
        if self.total_supply.is_zero() {
            return self.seed(provider, amount_a, amount_b);
        }
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::InvalidQuantity("deposit needs both tokens"));
        }
        let supply = self.total_supply.get();
        let by_a = mul_div(amount_a.get(), supply, self.reserves.a().get(), Rounding::Down)
            .ok_or(AmmError::Overflow("lp mint overflow"))?;
        let by_b = mul_div(amount_b.get(), supply, self.reserves.b().get(), Rounding::Down)
            .ok_or(AmmError::Overflow("lp mint overflow"))?;
        let lp = Liquidity::new(by_a.min(by_b));
        if lp.is_zero() {
            return Err(AmmError::InvalidLiquidity("deposit too small to mint shares"));
        }
        let pull_a = self.share_of(self.reserves.a(), lp, Rounding::Up)?;
        let pull_b = self.share_of(self.reserves.b(), lp, Rounding::Up)?;
        self.apply_deposit(provider, lp, pull_a, pull_b)
    }

    /// Burns `lp` shares of `provider`, paying out
    /// `floor(lp × reserve / supply)` of each token.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidLiquidity`] if `lp` is zero.
    /// - [`AmmError::InsufficientLpBalance`] if `provider` holds fewer than
    ///   `lp` shares.
    pub fn withdraw(
        &mut self,
        provider: Address,
        lp: Liquidity,
    ) -> Result<LiquidityWithdrawal, AmmError> {
        if lp.is_zero() {
            return Err(AmmError::InvalidLiquidity("lp amount must be positive"));
        }
        let held = self.lp_balance_of(&provider);
        if held < lp {
            return Err(AmmError::InsufficientLpBalance {
                held: held.get(),
                requested: lp.get(),
            });
        }
        let amount_a = self.share_of(self.reserves.a(), lp, Rounding::Down)?;
        let amount_b = self.share_of(self.reserves.b(), lp, Rounding::Down)?;

        self.reserves = Reserves::new(
            self.reserves.a().safe_sub(&amount_a)?,
            self.reserves.b().safe_sub(&amount_b)?,
        );
        self.total_supply = self.total_supply.safe_sub(&lp)?;
        let remaining = held.safe_sub(&lp)?;
        if remaining.is_zero() {
            self.lp_balances.remove(&provider);
        } else {
            self.lp_balances.insert(provider, remaining);
        }

        Ok(LiquidityWithdrawal {
            burned: lp,
            amount_a,
            amount_b,
        })
    }

    /// `lp × reserve / total_supply`, rounded as requested.
    fn share_of(&self, reserve: Amount, lp: Liquidity, rounding: Rounding) -> Result<Amount, AmmError> {
        reserve.safe_mul_div(lp.get(), self.total_supply.get(), rounding)
    }

    fn apply_deposit(
        &mut self,
        provider: Address,
        lp: Liquidity,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<LiquidityDeposit, AmmError> {
        self.reserves = Reserves::new(
            self.reserves.a().safe_add(&amount_a)?,
            self.reserves.b().safe_add(&amount_b)?,
        );
        self.credit(provider, lp)?;
        Ok(LiquidityDeposit {
            minted: lp,
            amount_a,
            amount_b,
        })
    }

    fn credit(&mut self, provider: Address, lp: Liquidity) -> Result<(), AmmError> {
        self.total_supply = self.total_supply.safe_add(&lp)?;
        let balance = self.lp_balance_of(&provider).safe_add(&lp)?;
        self.lp_balances.insert(provider, balance);
        Ok(())
    }
}
