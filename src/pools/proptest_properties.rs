//! Property-based tests for the pool invariants.
//!
//! 1. **Product non-decrease**: neither a virtual trade nor an instant swap lowers
//!    `reserve_a × reserve_b`.
//! 2. **Token conservation**: new reserves equal old reserves plus inflow minus purchases.
//! 3. **Rate conservation**: scheduled expiring rates always sum to the current rate.
//! 4. **Idempotent execution**: catching up to the same block twice changes nothing.
//! 5. **Solvency**: after every order is withdrawn the vault still covers the reserves.
//! 6. **LP value**: depositing then burning the minted shares never returns more than paid.

use proptest::prelude::*;
use ruint::aliases::U256;

use super::{ConstantProductCore, TwammPool, TwammState, execute_virtual_orders};
use crate::config::TwammConfig;
use crate::domain::{
    Address, Amount, BasisPoints, BlockInterval, BlockNumber, Direction, FeeTier, OrderId,
    Reserves, TokenPair,
};
use crate::host::InMemoryCustody;
use crate::math::virtual_trade;
use crate::traits::TokenCustody;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn token_a() -> Address {
    Address::repeat_byte(1)
}

fn token_b() -> Address {
    Address::repeat_byte(2)
}

fn lp() -> Address {
    Address::repeat_byte(0xa1)
}

fn trader() -> Address {
    Address::repeat_byte(0xb0)
}

fn make_pair() -> TokenPair {
    let Ok(pair) = TokenPair::new(token_a(), token_b()) else {
        panic!("valid pair");
    };
    pair
}

fn seeded_state(ra: u128, rb: u128) -> TwammState {
    let mut state = TwammState::new(TwammConfig::with_defaults(make_pair()), BlockNumber::new(0));
    let Ok(_) = state.core.seed(lp(), Amount::new(ra), Amount::new(rb)) else {
        panic!("seed failed");
    };
    state
}

fn direction_of(sells_a: bool) -> Direction {
    if sells_a { Direction::AToB } else { Direction::BToA }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [1e6, 1e15].
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000u128
}

/// Orders as `(sells_a, amount, intervals, submit_offset)`.
fn order_strategy() -> impl Strategy<Value = (bool, u128, u64, u64)> {
    (any::<bool>(), 1_000u128..=10_000_000u128, 1u64..=10u64, 0u64..=60u64)
}

// ---------------------------------------------------------------------------
// Properties 1 and 2: virtual trade
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_virtual_trade_product_non_decreasing(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        a_per_mille in 0u128..=100u128,
        b_per_mille in 0u128..=100u128,
    ) {
        let reserves = Reserves::new(Amount::new(ra), Amount::new(rb));
        let a_in = Amount::new(ra * a_per_mille / 1_000);
        let b_in = Amount::new(rb * b_per_mille / 1_000);
        let fee = FeeTier::new(BasisPoints::new(0));

        let Ok(trade) = virtual_trade(reserves, a_in, b_in, fee) else {
            return Err(TestCaseError::fail("virtual trade failed"));
        };
        prop_assert!(
            trade.reserves.product() >= reserves.product(),
            "product fell: {} -> {}", reserves, trade.reserves
        );
        prop_assert_eq!(
            trade.reserves.a().get(),
            ra + a_in.get() - trade.bought_a.get()
        );
        prop_assert_eq!(
            trade.reserves.b().get(),
            rb + b_in.get() - trade.bought_b.get()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_instant_swap_product_non_decreasing(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        sells_a in any::<bool>(),
        per_mille in 1u128..=500u128,
    ) {
        let mut core = ConstantProductCore::new();
        let Ok(_) = core.seed(lp(), Amount::new(ra), Amount::new(rb)) else {
            return Err(TestCaseError::fail("seed failed"));
        };
        let before = core.reserves();
        let direction = direction_of(sells_a);
        let (reserve_in, _) = before.oriented(direction);
        let amount_in = Amount::new(reserve_in.get() * per_mille / 1_000);
        let fee = FeeTier::new(BasisPoints::new(30));

        let Ok(result) = core.swap_exact_in(direction, amount_in, fee) else {
            // output rounded to zero
            return Ok(());
        };
        prop_assert!(core.reserves().product() >= before.product());
        prop_assert!(result.fee() <= result.amount_out());
    }
}

// ---------------------------------------------------------------------------
// Properties 3 and 4: order pools and engine
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rate_conservation(
        orders in prop::collection::vec(order_strategy(), 1..12),
        cancel_mask in any::<u16>(),
    ) {
        let mut state = seeded_state(1_000_000_000, 1_000_000_000);
        let mut sorted = orders;
        sorted.sort_by_key(|o| o.3);

        let mut placed = Vec::new();
        for (sells_a, amount, intervals, offset) in sorted {
            let now = BlockNumber::new(offset);
            let Ok(_) = execute_virtual_orders(&mut state, now) else {
                return Err(TestCaseError::fail("catch-up failed"));
            };
            let Ok(s) = state.ledger.submit(
                &mut state.order_pools,
                trader(),
                direction_of(sells_a),
                Amount::new(amount),
                intervals,
                BlockInterval::DEFAULT,
                now,
            ) else {
                return Err(TestCaseError::fail("submit failed"));
            };
            placed.push(s.id);
        }

        let cancel_at = BlockNumber::new(61);
        let Ok(_) = execute_virtual_orders(&mut state, cancel_at) else {
            return Err(TestCaseError::fail("catch-up failed"));
        };
        for (i, id) in placed.iter().enumerate() {
            if cancel_mask & (1 << i) == 0 {
                continue;
            }
            // already-expired orders refuse cancellation; either way the rates must balance
            let _ = state.ledger.cancel(&mut state.order_pools, *id, trader(), cancel_at);
        }

        for direction in Direction::ALL {
            let pool = state.order_pools.get(direction);
            let Ok(total) = pool.scheduled_total() else {
                return Err(TestCaseError::fail("scheduled total overflow"));
            };
            prop_assert_eq!(total, pool.current_sell_rate());
        }
    }

    #[test]
    fn prop_execution_idempotent(
        orders in prop::collection::vec(order_strategy(), 1..6),
        target in 0u64..=200u64,
    ) {
        let mut state = seeded_state(1_000_000_000, 2_000_000_000);
        for (sells_a, amount, intervals, _) in orders {
            let Ok(_) = state.ledger.submit(
                &mut state.order_pools,
                trader(),
                direction_of(sells_a),
                Amount::new(amount),
                intervals,
                BlockInterval::DEFAULT,
                BlockNumber::new(0),
            ) else {
                return Err(TestCaseError::fail("submit failed"));
            };
        }
        let now = BlockNumber::new(target);
        let Ok(_) = execute_virtual_orders(&mut state, now) else {
            return Err(TestCaseError::fail("first catch-up failed"));
        };
        let once = state.clone();
        let Ok(report) = execute_virtual_orders(&mut state, now) else {
            return Err(TestCaseError::fail("second catch-up failed"));
        };
        prop_assert!(report.is_noop());
        prop_assert_eq!(state, once);
    }
}

// ---------------------------------------------------------------------------
// Property 5: solvency through the facade
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_vault_covers_reserves_after_withdrawals(
        ra in 10_000_000u128..=1_000_000_000_000u128,
        rb in 10_000_000u128..=1_000_000_000_000u128,
        orders in prop::collection::vec(order_strategy(), 1..8),
    ) {
        let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
        custody.mint(token_a(), lp(), Amount::new(ra));
        custody.mint(token_b(), lp(), Amount::new(rb));
        custody.mint(token_a(), trader(), Amount::new(u64::MAX.into()));
        custody.mint(token_b(), trader(), Amount::new(u64::MAX.into()));

        let config = TwammConfig::with_defaults(make_pair());
        let mut pool = TwammPool::new(config, custody, BlockNumber::new(0));
        let Ok(_) = pool.provide_initial_liquidity(lp(), Amount::new(ra), Amount::new(rb), BlockNumber::new(0)) else {
            return Err(TestCaseError::fail("seed failed"));
        };

        let mut sorted = orders;
        sorted.sort_by_key(|o| o.3);
        let mut ids: Vec<OrderId> = Vec::new();
        for (sells_a, amount, intervals, offset) in sorted {
            let Ok(id) = pool.long_term_swap(
                trader(),
                direction_of(sells_a),
                Amount::new(amount),
                intervals,
                BlockNumber::new(offset),
            ) else {
                return Err(TestCaseError::fail("order failed"));
            };
            ids.push(id);
        }

        let end = BlockNumber::new(1_000);
        for id in ids {
            let Ok(_) = pool.withdraw_proceeds(trader(), id, end) else {
                return Err(TestCaseError::fail("withdraw failed"));
            };
        }

        let reserves = pool.state().core().reserves();
        let vault = pool.custody().vault();
        prop_assert!(pool.custody().balance_of(token_a(), vault) >= reserves.a());
        prop_assert!(pool.custody().balance_of(token_b(), vault) >= reserves.b());
    }
}

// ---------------------------------------------------------------------------
// Property 6: LP value
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_lp_round_trip_never_profits(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        da in 1u128..=1_000_000_000u128,
        db in 1u128..=1_000_000_000u128,
    ) {
        let mut core = ConstantProductCore::new();
        let Ok(_) = core.seed(lp(), Amount::new(ra), Amount::new(rb)) else {
            return Err(TestCaseError::fail("seed failed"));
        };
        let Ok(deposit) = core.deposit_amounts(trader(), Amount::new(da), Amount::new(db)) else {
            // too small to mint a share
            return Ok(());
        };
        prop_assert!(deposit.amount_a.get() <= da);
        prop_assert!(deposit.amount_b.get() <= db);

        // value per share never drops
        let supply = core.total_supply().get();
        let reserves = core.reserves();
        prop_assert!(U256::from(reserves.a().get()) * U256::from(ra) >= U256::from(ra) * U256::from(supply));
        prop_assert!(U256::from(reserves.b().get()) * U256::from(ra) >= U256::from(rb) * U256::from(supply));

        let Ok(withdrawal) = core.withdraw(trader(), deposit.minted) else {
            return Err(TestCaseError::fail("withdraw failed"));
        };
        prop_assert!(withdrawal.amount_a <= deposit.amount_a);
        prop_assert!(withdrawal.amount_b <= deposit.amount_b);
        prop_assert!(core.reserves().a().get() >= ra);
        prop_assert!(core.reserves().b().get() >= rb);
    }
}
