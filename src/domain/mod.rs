//! Value types of the TWAMM domain.
//!
//! Quantities, fees, tokens, block heights, sell rates, accumulators and
//! order records.  All types are newtypes with checked arithmetic or
//! validated constructors, so invalid values cannot be represented.
//!
//! | Group | Types |
//! |-------|-------|
//! | Quantities | [`Amount`], [`Liquidity`], [`SellRate`], [`Reserves`] |
//! | Fees | [`BasisPoints`], [`FeeTier`] |
//! | Tokens | [`Address`], [`TokenPair`], [`Direction`] |
//! | Time | [`BlockNumber`], [`BlockInterval`] |
//! | Orders | [`OrderId`], [`LongTermOrder`], [`OrderStatus`], [`RewardsFactor`], [`CancelOutcome`] |
//! | Results | [`SwapResult`], [`LiquidityDeposit`], [`LiquidityWithdrawal`], [`Price`] |

mod address;
mod amount;
mod basis_points;
mod block;
mod direction;
mod fee_tier;
mod liquidity;
mod order;
mod price;
mod reserves;
mod rewards_factor;
mod rounding;
mod sell_rate;
mod swap_result;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub(crate) use basis_points::BPS_DENOMINATOR;
pub use basis_points::BasisPoints;
pub use block::{BlockInterval, BlockNumber};
pub use direction::Direction;
pub use fee_tier::FeeTier;
pub use liquidity::Liquidity;
pub use order::{CancelOutcome, LongTermOrder, OrderId, OrderStatus};
pub use price::Price;
pub use reserves::Reserves;
pub use rewards_factor::RewardsFactor;
pub use rounding::Rounding;
pub use sell_rate::SellRate;
pub use swap_result::{LiquidityDeposit, LiquidityWithdrawal, SwapResult};
pub use token_pair::TokenPair;
