//! # TWAMM Engine
//!
//! A time-weighted average market maker: a two-token constant-product pool
//! that, besides instant swaps, accepts **long-term orders**.  A long-term
//! order sells a fixed amount evenly over a number of block intervals.  The
//! pool settles every order stream lazily, in closed form, whenever it is
//! next touched.
//!
//! # Quick Start
//!
//! ```rust
//! use twamm_engine::prelude::*;
//!
//! let (token_a, token_b) = (Address::repeat_byte(1), Address::repeat_byte(2));
//! let (lp, trader) = (Address::repeat_byte(0xa1), Address::repeat_byte(0xb0));
//! let pair = TokenPair::new(token_a, token_b).expect("distinct tokens");
//!
//! let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
//! custody.mint(token_a, lp, Amount::new(100_000_000));
//! custody.mint(token_b, lp, Amount::new(100_000_000));
//! custody.mint(token_a, trader, Amount::new(1_000_000));
//!
//! let config = TwammConfig::with_defaults(pair);
//! let mut pool = TwammPool::new(config, custody, BlockNumber::new(100));
//! pool.provide_initial_liquidity(lp, Amount::new(100_000_000), Amount::new(100_000_000), BlockNumber::new(100))
//!     .expect("seeded");
//!
//! // sell 100 000 A over ten 10-block intervals
//! let id = pool
//!     .long_term_swap(trader, Direction::AToB, Amount::new(100_000), 10, BlockNumber::new(100))
//!     .expect("order placed");
//!
//! // halfway through, half the order has already flowed into the reserves
//! let reserves = pool.reserves_at(BlockNumber::new(150)).expect("reserves");
//! assert_eq!(reserves.a(), Amount::new(100_050_000));
//!
//! let proceeds = pool.withdraw_proceeds(trader, id, BlockNumber::new(200)).expect("withdrawn");
//! assert!(proceeds.get() > 99_000);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  SharedTwamm  │  mutex + BlockClock, for concurrent hosts
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   TwammPool   │  stage → catch up → operate → commit, moves tokens via TokenCustody
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │    engine     │  chunked virtual-order execution between interval boundaries
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┬──────────────┬──────────────┐
//! │ constant-prod │  order pools  │ order ledger  │
//! └──────────────┴──────────────┴──────────────┘
//!        ▼
//! ┌──────────────┐
//! │  math/domain  │  Q120 closed form, checked newtypes
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`SellRate`](domain::SellRate), [`LongTermOrder`](domain::LongTermOrder), etc. |
//! | [`math`] | Checked arithmetic, Q120 fixed point, the closed-form virtual trade |
//! | [`pools`] | Reserves, order pools, ledger, execution engine, [`TwammPool`](pools::TwammPool) |
//! | [`config`] | [`TwammConfig`](config::TwammConfig) |
//! | [`traits`] | Collaborator seams: [`TokenCustody`](traits::TokenCustody), [`BlockClock`](traits::BlockClock) |
//! | [`host`] | In-memory custody, manual clock and the thread-safe [`SharedTwamm`](host::SharedTwamm) |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize`/`Deserialize` for state, config and value types |

pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
