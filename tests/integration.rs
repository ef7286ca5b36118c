//! Integration tests exercising full pool lifecycles through the public API.
//!
//! Every scenario starts from a pool seeded with `1e8 / 1e8` at block 100
//! with the default 10-block interval, 30 bp swap fee and no virtual-order
//! fee, unless it says otherwise.

#![allow(clippy::panic)]

use twamm_engine::config::TwammConfig;
use twamm_engine::domain::{
    Address, Amount, BasisPoints, BlockNumber, Direction, FeeTier, Liquidity, OrderId, OrderStatus,
    Reserves, SellRate, TokenPair,
};
use twamm_engine::error::AmmError;
use twamm_engine::host::{InMemoryCustody, ManualClock, SharedTwamm};
use twamm_engine::math::virtual_trade;
use twamm_engine::pools::TwammPool;
use twamm_engine::traits::{BlockClock, TokenCustody};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const E8: u128 = 100_000_000;
const FUNDING: u128 = 1_000_000_000;

fn token_a() -> Address {
    Address::repeat_byte(1)
}

fn token_b() -> Address {
    Address::repeat_byte(2)
}

fn lp() -> Address {
    Address::repeat_byte(0xa1)
}

fn bob() -> Address {
    Address::repeat_byte(0xb0)
}

fn carol() -> Address {
    Address::repeat_byte(0xc0)
}

fn block(n: u64) -> BlockNumber {
    BlockNumber::new(n)
}

fn make_pair() -> TokenPair {
    let Ok(pair) = TokenPair::new(token_a(), token_b()) else {
        panic!("valid pair");
    };
    pair
}

fn funded_custody() -> InMemoryCustody {
    let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
    for who in [lp(), bob(), carol()] {
        custody.mint(token_a(), who, Amount::new(FUNDING));
        custody.mint(token_b(), who, Amount::new(FUNDING));
    }
    custody
}

fn pool_with(config: TwammConfig) -> TwammPool<InMemoryCustody> {
    let mut pool = TwammPool::new(config, funded_custody(), block(100));
    let Ok(_) = pool.provide_initial_liquidity(lp(), Amount::new(E8), Amount::new(E8), block(100)) else {
        panic!("seed failed");
    };
    pool
}

fn setup() -> TwammPool<InMemoryCustody> {
    pool_with(TwammConfig::with_defaults(make_pair()))
}

fn place(
    pool: &mut TwammPool<InMemoryCustody>,
    who: Address,
    direction: Direction,
    amount: u128,
    intervals: u64,
    now: u64,
) -> OrderId {
    let Ok(id) = pool.long_term_swap(who, direction, Amount::new(amount), intervals, block(now)) else {
        panic!("order placement failed");
    };
    id
}

fn withdraw(pool: &mut TwammPool<InMemoryCustody>, who: Address, id: OrderId, now: u64) -> u128 {
    let Ok(proceeds) = pool.withdraw_proceeds(who, id, block(now)) else {
        panic!("withdraw failed");
    };
    proceeds.get()
}

fn assert_vault_covers_reserves(pool: &TwammPool<InMemoryCustody>) {
    let reserves = pool.state().core().reserves();
    let vault = pool.custody().vault();
    assert!(pool.custody().balance_of(token_a(), vault) >= reserves.a());
    assert!(pool.custody().balance_of(token_b(), vault) >= reserves.b());
}

// ===========================================================================
// Suite 1: Single long-term orders
// ===========================================================================

#[test]
fn single_sided_order_settles_like_chunked_swaps() {
    let mut pool = setup();
    let Ok(spot) = pool.quote_swap_exact_in(Direction::AToB, Amount::new(10_000), block(100)) else {
        panic!("quote failed");
    };
    let id = place(&mut pool, bob(), Direction::AToB, 10_000, 2, 100);

    let proceeds = withdraw(&mut pool, bob(), id, 130);
    assert!((9_996..=9_998).contains(&proceeds), "proceeds {proceeds}");
    // the streamed order pays no swap fee, so it beats the instant quote
    assert!(proceeds.abs_diff(spot.amount_out().get()) <= 100);

    let reserves = pool.state().core().reserves();
    assert_eq!(reserves.a(), Amount::new(100_010_000));
    assert_eq!(reserves.b(), Amount::new(99_990_002));
    assert_eq!(
        pool.custody().balance_of(token_b(), bob()),
        Amount::new(FUNDING + proceeds)
    );
    let Some(order) = pool.order(id) else {
        panic!("order missing");
    };
    assert_eq!(order.status(), OrderStatus::Completed);
}

#[test]
fn mid_interval_order_aligns_expiry_and_keeps_dust() {
    let mut pool = setup();
    let id = place(&mut pool, bob(), Direction::AToB, 100_000, 10, 105);
    let Some(order) = pool.order(id) else {
        panic!("order missing");
    };
    // 105 blocks until the aligned expiry at 210
    assert_eq!(order.expiry_block(), block(210));
    assert_eq!(order.sell_rate(), SellRate::new(952));

    let proceeds = withdraw(&mut pool, bob(), id, 300);
    assert!((99_800..=99_870).contains(&proceeds), "proceeds {proceeds}");

    // 952 × 105 = 99_960 was sold; the 40 remainder stays in the vault
    let reserves = pool.state().core().reserves();
    assert_eq!(reserves.a(), Amount::new(E8 + 99_960));
    let vault = pool.custody().vault();
    assert_eq!(
        pool.custody().balance_of(token_a(), vault),
        Amount::new(E8 + 100_000)
    );
}

#[test]
fn partial_withdrawals_sum_to_single_withdrawal() {
    let mut stepped = setup();
    let id = place(&mut stepped, bob(), Direction::AToB, 100_000, 10, 100);
    let mut single = stepped.clone();

    let first = withdraw(&mut stepped, bob(), id, 130);
    let second = withdraw(&mut stepped, bob(), id, 150);
    let third = withdraw(&mut stepped, bob(), id, 200);
    assert!(first > 0 && second > 0 && third > 0);
    assert!(first.abs_diff(29_990) <= 5, "first {first}");

    let whole = withdraw(&mut single, bob(), id, 200);
    assert!(
        (first + second + third).abs_diff(whole) <= 3,
        "{first} + {second} + {third} vs {whole}"
    );
    assert_eq!(
        stepped.withdraw_proceeds(bob(), id, block(201)),
        Err(AmmError::OrderInert(id))
    );
}

#[test]
fn cancel_refunds_unsold_and_pays_proceeds() {
    let mut pool = setup();
    let id = place(&mut pool, bob(), Direction::AToB, 100_000, 10, 100);

    let Ok(outcome) = pool.cancel_long_term_swap(bob(), id, block(130)) else {
        panic!("cancel failed");
    };
    assert_eq!(outcome.principal_returned, Amount::new(70_000));
    assert!(outcome.proceeds_returned.get().abs_diff(29_990) <= 5);
    assert_eq!(
        pool.state().core().reserves().a(),
        Amount::new(100_030_000)
    );
    assert!(pool.state().order_pools().is_idle());

    // nothing streams after cancellation
    let Ok(later) = pool.reserves_at(block(500)) else {
        panic!("reserves_at failed");
    };
    assert_eq!(later, pool.state().core().reserves());
    assert_eq!(
        pool.custody().balance_of(token_a(), bob()),
        Amount::new(FUNDING - 30_000)
    );
    assert_vault_covers_reserves(&pool);
}

// ===========================================================================
// Suite 2: Opposing orders
// ===========================================================================

#[test]
fn symmetric_orders_trade_at_par() {
    let mut pool = setup();
    let a = place(&mut pool, bob(), Direction::AToB, 10_000, 2, 100);
    let b = place(&mut pool, carol(), Direction::BToA, 10_000, 2, 100);

    let bob_got = withdraw(&mut pool, bob(), a, 130);
    let carol_got = withdraw(&mut pool, carol(), b, 130);
    assert!(bob_got.abs_diff(10_000) <= 5, "bob {bob_got}");
    assert!(carol_got.abs_diff(10_000) <= 5, "carol {carol_got}");
    assert_vault_covers_reserves(&pool);
}

#[test]
fn asymmetric_orders_net_against_each_other() {
    let mut pool = setup();
    let a = place(&mut pool, bob(), Direction::AToB, 10_000, 2, 100);
    let b = place(&mut pool, carol(), Direction::BToA, 2_000, 2, 100);

    let bob_got = withdraw(&mut pool, bob(), a, 130);
    let carol_got = withdraw(&mut pool, carol(), b, 130);
    assert!((9_900..=10_000).contains(&bob_got), "bob {bob_got}");
    assert!((1_980..=2_001).contains(&carol_got), "carol {carol_got}");

    let reserves = pool.state().core().reserves();
    let seeded = Reserves::new(Amount::new(E8), Amount::new(E8));
    assert!(reserves.product() >= seeded.product());
    assert_vault_covers_reserves(&pool);
}

#[test]
fn staggered_expiries_settle_every_order() {
    let mut pool = setup();
    let orders = [
        (bob(), place(&mut pool, bob(), Direction::AToB, 5_000, 2, 100)),
        (carol(), place(&mut pool, carol(), Direction::BToA, 5_000, 3, 100)),
        (bob(), place(&mut pool, bob(), Direction::AToB, 5_000, 4, 100)),
        (carol(), place(&mut pool, carol(), Direction::BToA, 5_000, 5, 100)),
    ];

    let Ok(report) = pool.execute_virtual_orders(block(160)) else {
        panic!("execute failed");
    };
    assert_eq!(
        report.expired_boundaries,
        vec![block(120), block(130), block(140), block(150)]
    );

    let mut a_side = 0;
    let mut b_side = 0;
    for (i, (who, id)) in orders.iter().enumerate() {
        let got = withdraw(&mut pool, *who, *id, 160);
        if i % 2 == 0 {
            a_side += got;
        } else {
            b_side += got;
        }
        let Some(order) = pool.order(*id) else {
            panic!("order missing");
        };
        assert_eq!(order.status(), OrderStatus::Completed);
    }
    assert!((9_900..=10_100).contains(&a_side), "a side {a_side}");
    assert!((9_900..=10_100).contains(&b_side), "b side {b_side}");
    assert!(pool.state().order_pools().is_idle());
    assert_vault_covers_reserves(&pool);
}

#[test]
fn chunked_execution_matches_closed_form_over_full_span() {
    let mut pool = setup();
    let a = place(&mut pool, bob(), Direction::AToB, 400_000, 10, 100);
    let b = place(&mut pool, carol(), Direction::BToA, 150_000, 10, 100);

    let Ok(report) = pool.execute_virtual_orders(block(200)) else {
        panic!("execute failed");
    };
    assert_eq!(report.chunks, 10);

    let start = Reserves::new(Amount::new(E8), Amount::new(E8));
    let Ok(trade) = virtual_trade(start, Amount::new(400_000), Amount::new(150_000), FeeTier::default()) else {
        panic!("closed form failed");
    };
    let chunked = pool.state().core().reserves();
    for (got, want) in [
        (chunked.a().get(), trade.reserves.a().get()),
        (chunked.b().get(), trade.reserves.b().get()),
    ] {
        assert!(got.abs_diff(want) * 100 <= want, "{got} vs {want}");
    }

    let bob_got = withdraw(&mut pool, bob(), a, 200);
    let carol_got = withdraw(&mut pool, carol(), b, 200);
    assert!(bob_got.abs_diff(trade.bought_b.get()) * 100 <= trade.bought_b.get());
    assert!(carol_got.abs_diff(trade.bought_a.get()) * 100 <= trade.bought_a.get());
}

#[test]
fn third_party_swap_while_opposing_orders_stream() {
    let mut pool = setup();
    let a = place(&mut pool, bob(), Direction::AToB, 100_000, 10, 100);
    let b = place(&mut pool, carol(), Direction::BToA, 40_000, 10, 100);

    let Ok(_) = pool.execute_virtual_orders(block(150)) else {
        panic!("execute failed");
    };
    let before = pool.state().core().reserves();
    let a_before = pool.custody().balance_of(token_a(), lp());

    let Ok(swap) = pool.swap_exact_in(lp(), Direction::BToA, Amount::new(50_000), block(150)) else {
        panic!("swap failed");
    };
    assert!(swap.amount_out() > Amount::ZERO);
    assert_eq!(
        pool.custody().balance_of(token_a(), lp()).get(),
        a_before.get() + swap.amount_out().get()
    );
    let after = pool.state().core().reserves();
    assert_eq!(after.b().get(), before.b().get() + 50_000);
    assert_eq!(after.a().get(), before.a().get() - swap.amount_out().get());

    // both orders keep streaming and complete normally
    assert!(withdraw(&mut pool, bob(), a, 200) > 0);
    assert!(withdraw(&mut pool, carol(), b, 200) > 0);
    assert_vault_covers_reserves(&pool);
}

// ===========================================================================
// Suite 3: Interaction with instant swaps and liquidity
// ===========================================================================

#[test]
fn instant_swap_sees_streamed_reserves() {
    let mut pool = setup();
    let Ok(before) = pool.quote_swap_exact_in(Direction::BToA, Amount::new(100_000), block(100)) else {
        panic!("quote failed");
    };
    place(&mut pool, bob(), Direction::AToB, 1_000_000, 10, 100);

    let Ok(during) = pool.quote_swap_exact_in(Direction::BToA, Amount::new(100_000), block(150)) else {
        panic!("quote failed");
    };
    // A is being sold into the pool, so B buys more A midway
    assert!(during.amount_out() > before.amount_out());

    let Ok(swap) = pool.swap_exact_in(carol(), Direction::BToA, Amount::new(100_000), block(150)) else {
        panic!("swap failed");
    };
    assert_eq!(swap, during);
    assert_eq!(pool.last_virtual_execution_block(), block(150));
}

#[test]
fn liquidity_added_mid_stream_earns_its_share() {
    let mut pool = setup();
    let id = place(&mut pool, bob(), Direction::AToB, 1_000_000, 10, 100);

    let Ok(deposit) = pool.add_liquidity(carol(), Amount::new(E8), Amount::new(E8), block(150)) else {
        panic!("add failed");
    };
    assert!(deposit.minted > Liquidity::ZERO);
    assert!(deposit.amount_a <= Amount::new(E8));
    assert!(deposit.amount_b <= Amount::new(E8));

    let Ok(withdrawal) = pool.remove_liquidity(carol(), deposit.minted, block(200)) else {
        panic!("remove failed");
    };
    // A kept flowing in after the deposit, so the share redeems more A and less B
    assert!(withdrawal.amount_a > deposit.amount_a);
    assert!(withdrawal.amount_b < deposit.amount_b);

    let proceeds = withdraw(&mut pool, bob(), id, 200);
    assert!(proceeds > 0);
    assert_vault_covers_reserves(&pool);
}

#[test]
fn provide_liquidity_by_share_count() {
    let mut pool = setup();
    let Ok(deposit) = pool.provide_liquidity(carol(), Liquidity::new(E8 / 2), block(100)) else {
        panic!("provide failed");
    };
    assert_eq!(deposit.amount_a, Amount::new(E8 / 2));
    assert_eq!(deposit.amount_b, Amount::new(E8 / 2));
    assert_eq!(pool.total_lp_supply(), Liquidity::new(E8 + E8 / 2));
    assert_eq!(pool.lp_balance_of(&carol()), Liquidity::new(E8 / 2));
}

#[test]
fn virtual_order_fee_stays_in_reserves() {
    let Ok(config) = TwammConfig::with_defaults(make_pair())
        .with_virtual_order_fee(FeeTier::new(BasisPoints::new(30)))
    else {
        panic!("valid config");
    };
    let mut charged = pool_with(config);
    let mut free = setup();

    let a = place(&mut charged, bob(), Direction::AToB, 100_000, 2, 100);
    let b = place(&mut free, bob(), Direction::AToB, 100_000, 2, 100);
    let with_fee = withdraw(&mut charged, bob(), a, 130);
    let without_fee = withdraw(&mut free, bob(), b, 130);

    assert!(with_fee < without_fee);
    assert!(without_fee - with_fee >= 250, "{without_fee} vs {with_fee}");
    assert!(charged.state().core().reserves().product() > free.state().core().reserves().product());
}

// ===========================================================================
// Suite 4: Errors and edge cases
// ===========================================================================

#[test]
fn long_idle_gap_then_new_order() {
    let mut pool = setup();
    let first = place(&mut pool, bob(), Direction::AToB, 10_000, 1, 100);
    withdraw(&mut pool, bob(), first, 110);

    let Ok(report) = pool.execute_virtual_orders(block(1_000_000)) else {
        panic!("execute failed");
    };
    assert_eq!(report.chunks, 0);

    let second = place(&mut pool, bob(), Direction::AToB, 10_000, 1, 1_000_003);
    let Some(order) = pool.order(second) else {
        panic!("order missing");
    };
    assert_eq!(order.expiry_block(), block(1_000_020));
    assert!(withdraw(&mut pool, bob(), second, 1_000_020) > 9_900);
}

#[test]
fn block_regression_rejected_and_state_untouched() {
    let mut pool = setup();
    place(&mut pool, bob(), Direction::AToB, 10_000, 2, 100);
    let Ok(_) = pool.execute_virtual_orders(block(115)) else {
        panic!("execute failed");
    };
    let before = pool.clone();
    assert_eq!(
        pool.long_term_swap(bob(), Direction::AToB, Amount::new(10_000), 1, block(114)),
        Err(AmmError::BlockRegression {
            last: block(115),
            requested: block(114)
        })
    );
    assert_eq!(pool, before);
}

#[test]
fn order_validation_errors() {
    let mut pool = setup();
    assert!(matches!(
        pool.long_term_swap(bob(), Direction::AToB, Amount::new(10_000), 0, block(100)),
        Err(AmmError::InvalidQuantity(_))
    ));
    assert!(matches!(
        pool.long_term_swap(bob(), Direction::AToB, Amount::ZERO, 1, block(100)),
        Err(AmmError::InvalidQuantity(_))
    ));
    // 5 tokens over 10 blocks rounds the rate to zero
    assert!(matches!(
        pool.long_term_swap(bob(), Direction::AToB, Amount::new(5), 1, block(100)),
        Err(AmmError::InvalidQuantity(_))
    ));
    let poor = Address::repeat_byte(0x55);
    assert_eq!(
        pool.long_term_swap(poor, Direction::AToB, Amount::new(10_000), 1, block(100)),
        Err(AmmError::InsufficientBalance)
    );
    assert_eq!(
        pool.withdraw_proceeds(bob(), OrderId::new(999), block(100)),
        Err(AmmError::OrderNotFound(OrderId::new(999)))
    );
}

#[test]
fn removing_all_liquidity_halts_streaming_orders() {
    let mut pool = setup();
    let id = place(&mut pool, bob(), Direction::AToB, 10_000, 2, 100);
    let Ok(_) = pool.remove_liquidity(lp(), Liquidity::new(E8), block(105)) else {
        panic!("remove failed");
    };
    assert_eq!(
        pool.withdraw_proceeds(bob(), id, block(106)),
        Err(AmmError::PoolNotSeeded)
    );
}

// ===========================================================================
// Suite 5: Shared handle
// ===========================================================================

#[test]
fn shared_handle_follows_the_clock() {
    let clock = ManualClock::new(block(100));
    let shared = SharedTwamm::new(setup(), clock);

    let Ok(id) = shared.long_term_swap(bob(), Direction::AToB, Amount::new(10_000), 2) else {
        panic!("order failed");
    };
    shared.clock().advance(30);
    assert_eq!(shared.clock().current_block(), block(130));

    let Ok(proceeds) = shared.withdraw_proceeds(bob(), id) else {
        panic!("withdraw failed");
    };
    assert!((9_996..=9_998).contains(&proceeds.get()));
    let Ok(Some(order)) = shared.order(id) else {
        panic!("order missing");
    };
    assert_eq!(order.status(), OrderStatus::Completed);

    let Ok(pool) = shared.into_inner() else {
        panic!("lock poisoned");
    };
    assert_eq!(pool.last_virtual_execution_block(), block(130));
}
