//! Rounded integer division on `u128` and `U256`.
//!
//! The settlement code always names its rounding direction:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Tokens paid out (swap output, proceeds, LP redemption) | [`Rounding::Down`] |
//! | Tokens pulled in (LP deposits) | [`Rounding::Up`] |
//! | Final reserve of the closed-form trade | [`Rounding::Up`] |
//!
//! ```
//! use twamm_engine::domain::Rounding;
//! use twamm_engine::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Some(u128::MAX / 2));
//! ```

use ruint::aliases::U256;

use crate::domain::Rounding;

/// `numerator / denominator` on `u128`, rounded as requested.
///
/// Returns `None` if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q < u128::MAX whenever there is a remainder, so q + 1 cannot overflow
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// `numerator / denominator` on `U256`, rounded as requested.
///
/// Returns `None` if `denominator` is zero.
#[must_use]
pub fn div_round_wide(numerator: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let q = numerator / denominator;
    if rounding.is_up() && !(numerator % denominator).is_zero() {
        // q <= numerator / 1 and a remainder implies denominator > 1
        return Some(q + U256::from(1u8));
    }
    Some(q)
}

/// `a * b / denominator` with a 256-bit intermediate product.
///
/// Returns `None` if `denominator` is zero or the quotient exceeds `u128`.
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    let product = U256::from(a) * U256::from(b);
    let q = div_round_wide(product, U256::from(denominator), rounding)?;
    u128::try_from(q).ok()
}
