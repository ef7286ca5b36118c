//! Arithmetic for settlement.
//!
//! | Module | Provides |
//! |--------|----------|
//! | `checked` | [`CheckedArithmetic`] for the quantity newtypes |
//! | `rounding` | [`div_round`], [`div_round_wide`], [`mul_div`] |
//! | `fixed_point` | Q120 [`isqrt`], [`sqrt_ratio`], [`exp_neg`] |
//! | `twamm` | [`closed_form`], [`virtual_trade`], [`constant_product_output`] |
//!
//! Everything here is integer arithmetic on `u128` and
//! [`ruint::aliases::U256`]; results are bit-for-bit deterministic.

mod checked;
mod fixed_point;
mod rounding;
mod twamm;

pub use checked::CheckedArithmetic;
pub use fixed_point::{Q, exp_neg, isqrt, one, sqrt_ratio};
pub use rounding::{div_round, div_round_wide, mul_div};
pub use twamm::{VirtualTrade, closed_form, constant_product_output, virtual_trade};
