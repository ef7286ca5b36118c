//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use twamm_engine::prelude::*;
//! ```

pub use crate::config::TwammConfig;
pub use crate::domain::{
    Address, Amount, BasisPoints, BlockInterval, BlockNumber, CancelOutcome, Direction, FeeTier,
    Liquidity, LongTermOrder, OrderId, OrderStatus, Price, Reserves, Rounding, SellRate,
    SwapResult, TokenPair,
};
pub use crate::error::{AmmError, Result};
pub use crate::host::{InMemoryCustody, ManualClock, SharedTwamm};
pub use crate::math::CheckedArithmetic;
pub use crate::pools::{ExecutionReport, TwammPool};
pub use crate::traits::{BlockClock, TokenCustody};
