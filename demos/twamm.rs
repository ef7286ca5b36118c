//! TWAMM walk-through.
//!
//! Seeds a pool, streams two opposing long-term orders over the same
//! window, settles them lazily and withdraws the proceeds.
//!
//! # Run
//!
//! ```bash
//! cargo run --example twamm
//! ```

use twamm_engine::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== TWAMM: two opposing long-term orders ===\n");

    // ── 1. Tokens and accounts ──────────────────────────────────────────
    let usdc = Address::repeat_byte(1);
    let weth = Address::repeat_byte(2);
    let pair = TokenPair::new(usdc, weth)?;
    let lp = Address::repeat_byte(0xa1);
    let alice = Address::repeat_byte(0xb0);
    let bob = Address::repeat_byte(0xb1);

    let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
    custody.mint(usdc, lp, Amount::new(100_000_000));
    custody.mint(weth, lp, Amount::new(100_000_000));
    custody.mint(usdc, alice, Amount::new(1_000_000));
    custody.mint(weth, bob, Amount::new(1_000_000));

    // ── 2. Create and seed the pool ─────────────────────────────────────
    let config = TwammConfig::with_defaults(pair);
    let start = BlockNumber::new(100);
    let mut pool = TwammPool::new(config, custody, start);
    let seeded = pool.provide_initial_liquidity(lp, Amount::new(100_000_000), Amount::new(100_000_000), start)?;
    println!("Seeded:        {seeded:?}");
    println!("Interval:      {}", config.block_interval());
    println!("Spot A→B:      {}", pool.spot_price(Direction::AToB, start)?);

    // ── 3. Alice sells A, Bob sells B, both over ten intervals ──────────
    let alice_order = pool.long_term_swap(alice, Direction::AToB, Amount::new(500_000), 10, start)?;
    let bob_order = pool.long_term_swap(bob, Direction::BToA, Amount::new(200_000), 10, start)?;
    for id in [alice_order, bob_order] {
        if let Some(order) = pool.order(id) {
            println!(
                "Order {}:       {} at {} until block {}",
                id.get(),
                order.direction(),
                order.sell_rate(),
                order.expiry_block()
            );
        }
    }

    // ── 4. Halfway: simulate, then settle ───────────────────────────────
    let halfway = BlockNumber::new(150);
    println!("\n--- Block {halfway} ---");
    println!("  Reserves (simulated): {}", pool.reserves_at(halfway)?);
    println!("  Alice could withdraw: {}", pool.pending_proceeds(alice, alice_order, halfway)?);
    let report = pool.execute_virtual_orders(halfway)?;
    println!("  Settled {} chunks, {} → {}", report.chunks, report.from_block, report.to_block);

    // ── 5. Alice takes her proceeds so far ──────────────────────────────
    let partial = pool.withdraw_proceeds(alice, alice_order, halfway)?;
    println!("  Alice withdrew:       {partial}");

    // ── 6. After expiry: both withdraw the rest ─────────────────────────
    let end = BlockNumber::new(200);
    let alice_rest = pool.withdraw_proceeds(alice, alice_order, end)?;
    let bob_total = pool.withdraw_proceeds(bob, bob_order, end)?;
    println!("\n--- Block {end} ---");
    println!("  Alice withdrew:       {alice_rest} (B)");
    println!("  Bob withdrew:         {bob_total} (A)");
    println!("  Reserves:             {}", pool.reserves_at(end)?);
    println!("  Spot A→B:             {}", pool.spot_price(Direction::AToB, end)?);

    // ── 7. Custody balances ─────────────────────────────────────────────
    let custody = pool.custody();
    println!("\nAlice holds {} A, {} B", custody.balance_of(usdc, alice), custody.balance_of(weth, alice));
    println!("Bob holds   {} A, {} B", custody.balance_of(usdc, bob), custody.balance_of(weth, bob));

    println!("\n=== Done ===");
    Ok(())
}
