//! Pool configuration.
//!
//! [`TwammConfig`] holds the immutable parameters of a pool: the token pair,
//! the two fee settings and the block interval.

mod twamm;

pub use twamm::TwammConfig;
