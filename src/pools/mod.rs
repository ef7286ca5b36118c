//! Pool state machines.
//!
//! A TWAMM pool is layered bottom-up:
//!
//! | Layer | Type | Owns |
//! |-------|------|------|
//! | reserves | [`ConstantProductCore`] | token reserves, LP shares, instant-swap fees |
//! | order aggregates | [`OrderPool`] / [`OrderPools`] | sell rates, rewards factors, expiry schedule |
//! | order records | [`OrderLedger`] | per-order checkpoints and status |
//! | settlement | [`execute_virtual_orders`] over [`TwammState`] | chunked catch-up between blocks |
//! | facade | [`TwammPool`] | all of the above plus token custody, atomically |

mod constant_product;
mod engine;
mod ledger;
mod order_pool;
mod twamm;

#[cfg(test)]
mod proptest_properties;

pub use constant_product::ConstantProductCore;
pub use engine::{ExecutionReport, TwammState, execute_virtual_orders};
pub use ledger::{OrderLedger, Submission};
pub use order_pool::{OrderPool, OrderPools};
pub use twamm::TwammPool;
