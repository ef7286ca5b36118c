//! Settlement math for one chunk of streamed volume.
//!
//! Within a chunk both order pools sell at a constant rate.  Treating the two
//! streams as sequential swaps would misprice them, so the chunk is settled
//! with the exact solution of the continuous two-sided trade against
//! `x * y = k`:
//!
//! ```text
//! x    = 2 * sqrt(a_in * b_in / k)
//! rho  = sqrt(reserve_b * a_in / (reserve_a * b_in))
//! d    = e^-x
//! final_a = reserve_a * rho * ((1 + d) + rho (1 - d)) / ((1 - d) + rho (1 + d))
//! final_b = k / final_a
//! ```
//!
//! This is algebraically the familiar
//! `sqrt(k a_in / b_in) * (e^x + c) / (e^x - c)` form with
//! `c = (sqrt(reserve_a b_in) - sqrt(reserve_b a_in)) / (sqrt(reserve_a b_in) + sqrt(reserve_b a_in))`,
//! rewritten so that every intermediate is non-negative and bounded.  The
//! evaluation orients the formula so that `rho <= 1` (computing the reserve
//! that shrinks first) and rounds that reserve up; the other reserve is
//! `ceil(k / first)`.  If the flows' value ratio leaves the Q120 range
//! (`rho` rounds to zero) or capping the second reserve at its inflow would
//! push the product below `k`, the chunk fails with
//! [`AmmError::ArithmeticBound`] instead of settling, so a settled product
//! never drops below `k`.
//!
//! When only one side streams, the chunk is an ordinary fee-less
//! constant-product swap of that side's volume.

use ruint::aliases::U256;

use super::fixed_point::{Q, exp_neg, one, sqrt_ratio};
use super::rounding::div_round_wide;
use crate::domain::{Amount, FeeTier, Reserves, Rounding};
use crate::error::{AmmError, Result};

/// `x` saturates `e^-x` to zero long before `a_in * b_in` exceeds `k` by this many bits.
const DECAY_SATURATION_BITS: usize = 16;

/// Outcome of settling one chunk of streamed volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualTrade {
    /// Reserves after the chunk.
    pub reserves: Reserves,
    /// Token A bought by the B→A order pool.
    pub bought_a: Amount,
    /// Token B bought by the A→B order pool.
    pub bought_b: Amount,
}

/// Output of a fee-less constant-product swap:
/// `floor(reserve_out * amount_in / (reserve_in + amount_in))`.
///
/// # Errors
///
/// Returns [`AmmError::InsufficientLiquidity`] if either reserve is zero.
pub fn constant_product_output(
    reserve_in: Amount,
    reserve_out: Amount,
    amount_in: Amount,
) -> Result<Amount> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = U256::from(reserve_out.get()) * U256::from(amount_in.get());
    let denominator = U256::from(reserve_in.get()) + U256::from(amount_in.get());
    let out = div_round_wide(numerator, denominator, Rounding::Down).ok_or(AmmError::DivisionByZero)?;
    // out < reserve_out, so it always fits
    u128::try_from(out)
        .map(Amount::new)
        .map_err(|_| AmmError::Overflow("swap output exceeds u128"))
}

/// `e^-x` with `x = 2 * sqrt(flow_product / k)`, in Q120.
fn decay(flow_product: U256, k: U256) -> U256 {
    if flow_product.bit_len() > k.bit_len() + DECAY_SATURATION_BITS {
        return U256::ZERO;
    }
    exp_neg(sqrt_ratio(flow_product, k) << 1usize)
}

/// `rho * ((1 + d) + rho (1 - d)) / ((1 - d) + rho (1 + d))` in Q120, for
/// `rho <= 1` and `d <= 1`.
fn growth(rho: U256, d: U256) -> U256 {
    let unit = one();
    let up = unit + d;
    let down = unit - d;
    let numerator = up + ((rho * down) >> Q);
    let denominator = down + ((rho * up) >> Q);
    (rho * numerator).checked_div(denominator).unwrap_or(U256::ZERO)
}

/// Final reserve of the side whose relative price falls, given
/// `rho = sqrt(reserve_other * in_self / (reserve_self * in_other)) <= 1`.
fn shrinking_reserve(reserve: U256, cap: U256, rho: U256, d: U256) -> U256 {
    let g = growth(rho, d);
    let scaled = reserve * g;
    let mask = one() - U256::from(1u8);
    let rounded_up = (scaled + mask) >> Q;
    rounded_up.clamp(U256::from(1u8), cap)
}

fn narrow(value: U256) -> Result<Amount> {
    u128::try_from(value)
        .map(Amount::new)
        .map_err(|_| AmmError::ArithmeticBound("final reserve exceeds u128"))
}

/// Final reserves `(final_a, final_b)` after streaming `a_in` and `b_in`
/// simultaneously into a pool holding `reserves`.
///
/// All four inputs must be non-zero.
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidity`] if a reserve is zero.
/// - [`AmmError::InvalidQuantity`] if a flow is zero.
/// - [`AmmError::ArithmeticBound`] if a final reserve does not fit `u128`.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Amount, Reserves};
/// use twamm_engine::math::closed_form;
///
/// let reserves = Reserves::new(Amount::new(100_000_000), Amount::new(100_000_000));
/// let (a, b) = closed_form(reserves, Amount::new(10_000), Amount::new(2_000)).expect("in range");
/// assert_eq!(a, Amount::new(100_008_000));
/// assert_eq!(b, Amount::new(99_992_001));
/// ```
pub fn closed_form(reserves: Reserves, a_in: Amount, b_in: Amount) -> Result<(Amount, Amount)> {
    if !reserves.is_seeded() {
        return Err(AmmError::InsufficientLiquidity);
    }
    if a_in.is_zero() || b_in.is_zero() {
        return Err(AmmError::InvalidQuantity("closed form needs flow on both sides"));
    }

    let ra = U256::from(reserves.a().get());
    let rb = U256::from(reserves.b().get());
    let ai = U256::from(a_in.get());
    let bi = U256::from(b_in.get());

    let k = ra * rb;
    let d = decay(ai * bi, k);
    let cap_a = ra + ai;
    let cap_b = rb + bi;

    let p = rb * ai;
    let q = ra * bi;
    let (small, large) = if p <= q { (p, q) } else { (q, p) };
    let rho = sqrt_ratio(small, large);
    if rho.is_zero() {
        return Err(AmmError::ArithmeticBound("flow value ratio beyond fixed-point range"));
    }
    let (final_a, final_b) = if p <= q {
        let fa = shrinking_reserve(ra, cap_a, rho, d);
        let fb = div_round_wide(k, fa, Rounding::Up).ok_or(AmmError::DivisionByZero)?;
        (fa, fb.min(cap_b))
    } else {
        let fb = shrinking_reserve(rb, cap_b, rho, d);
        let fa = div_round_wide(k, fb, Rounding::Up).ok_or(AmmError::DivisionByZero)?;
        (fa.min(cap_a), fb)
    };
    // a capped side means the shrinking reserve came out too low; overflow is left to `narrow`
    if final_a.checked_mul(final_b).is_some_and(|product| product < k) {
        return Err(AmmError::ArithmeticBound("closed form lost precision"));
    }

    Ok((narrow(final_a)?, narrow(final_b)?))
}

/// Settles one chunk in which the A→B pool streams `a_in` and the B→A pool
/// streams `b_in`.
///
/// `fee` is taken from each stream before it trades; the fee portion stays
/// in the reserves.
///
/// # Errors
///
/// - [`AmmError::PoolNotSeeded`] if volume streams into empty reserves.
/// - [`AmmError::ArithmeticBound`] / [`AmmError::Overflow`] if a reserve
///   leaves the `u128` domain.
pub fn virtual_trade(
    reserves: Reserves,
    a_in: Amount,
    b_in: Amount,
    fee: FeeTier,
) -> Result<VirtualTrade> {
    if a_in.is_zero() && b_in.is_zero() {
        return Ok(VirtualTrade {
            reserves,
            bought_a: Amount::ZERO,
            bought_b: Amount::ZERO,
        });
    }
    if !reserves.is_seeded() {
        return Err(AmmError::PoolNotSeeded);
    }

    let (a_net, _) = fee.split(a_in)?;
    let (b_net, _) = fee.split(b_in)?;

    let (bought_a, bought_b) = match (a_net.is_zero(), b_net.is_zero()) {
        (true, true) => (Amount::ZERO, Amount::ZERO),
        (false, true) => (
            Amount::ZERO,
            constant_product_output(reserves.a(), reserves.b(), a_net)?,
        ),
        (true, false) => (
            constant_product_output(reserves.b(), reserves.a(), b_net)?,
            Amount::ZERO,
        ),
        (false, false) => {
            let (final_a, final_b) = closed_form(reserves, a_net, b_net)?;
            // final_x <= reserve_x + x_net, so the differences are non-negative
            let bought_a = reserves
                .a()
                .checked_add(&a_net)
                .and_then(|v| v.checked_sub(&final_a))
                .ok_or(AmmError::ArithmeticBound("token A bought out of range"))?;
            let bought_b = reserves
                .b()
                .checked_add(&b_net)
                .and_then(|v| v.checked_sub(&final_b))
                .ok_or(AmmError::ArithmeticBound("token B bought out of range"))?;
            (bought_a, bought_b)
        }
    };

    let next_a = reserves
        .a()
        .checked_add(&a_in)
        .and_then(|v| v.checked_sub(&bought_a))
        .ok_or(AmmError::Overflow("reserve A out of range after chunk"))?;
    let next_b = reserves
        .b()
        .checked_add(&b_in)
        .and_then(|v| v.checked_sub(&bought_b))
        .ok_or(AmmError::Overflow("reserve B out of range after chunk"))?;

    Ok(VirtualTrade {
        reserves: Reserves::new(next_a, next_b),
        bought_a,
        bought_b,
    })
}
