//! Q120 fixed-point primitives for the closed-form TWAMM trade.
//!
//! Values are unsigned 256-bit integers scaled by `2^120`.  The closed form
//! only ever needs three operations, all deterministic and panic-free:
//!
//! | Function | Computes | Method |
//! |----------|----------|--------|
//! | [`isqrt`] | `floor(sqrt(n))` | Newton iteration from a power-of-two seed above the root |
//! | [`sqrt_ratio`] | `sqrt(p / q)` in Q120 | both operands normalised to 255-256 bits before the root |
//! | [`exp_neg`] | `e^-x` in Q120 | `x = n ln2 + r`, Taylor series for `e^r`, reciprocal, shift by `n` |
//!
//! # Error bound
//!
//! `sqrt_ratio` carries about `120 - log2(q / p) / 2` significant bits;
//! `exp_neg` is exact to a few units of `2^-120` before the final shift.
//! Fed through [`closed_form`](super::closed_form) this keeps the smaller
//! final reserve within one unit of the exact real-valued solution whenever
//! the two flows are within a value ratio of `2^100` of each other.

use ruint::aliases::U256;

/// Fractional bits of the Q120 format.
pub const Q: usize = 120;

/// `ln 2` in Q120, rounded down.
const LN2_Q120: u128 = 0x00b1_7217_f7d1_cf79_abc9_e3b3_9803_f2f6;

/// Upper bound on Taylor terms; `r < ln 2` converges long before this.
const MAX_TAYLOR_TERMS: u64 = 64;

/// `1.0` in Q120.
#[must_use]
pub fn one() -> U256 {
    U256::from(1u8) << Q
}

/// Integer square root, rounded down.
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    // seed 2^ceil(bits/2) is >= sqrt(n), so the iteration decreases monotonically
    let mut x = U256::from(1u8) << n.bit_len().div_ceil(2);
    loop {
        let y = (x + n / x) >> 1usize;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Returns `(s, e)` with `s = floor(sqrt(p * 4^e))` and `s` in `[2^127, 2^128)`.
fn normalized_sqrt(p: U256) -> (U256, usize) {
    let e = (256 - p.bit_len()) / 2;
    (isqrt(p << (2 * e)), e)
}

/// `sqrt(p / q)` in Q120.
///
/// Callers guarantee `p, q > 0` and `p / q <= 2^18`; within that range the
/// result fits comfortably in 256 bits.
#[must_use]
pub fn sqrt_ratio(p: U256, q: U256) -> U256 {
    let (sp, ep) = normalized_sqrt(p);
    let (sq, eq) = normalized_sqrt(q);
    let r = (sp << Q) / sq;
    if ep >= eq {
        r >> (ep - eq)
    } else {
        r << (eq - ep)
    }
}

/// `e^-x` for a Q120 argument `x >= 0`, as Q120.
///
/// Underflows to zero once `x >= 120 ln 2`.
#[must_use]
pub fn exp_neg(x: U256) -> U256 {
    let ln2 = U256::from(LN2_Q120);
    let n = x / ln2;
    if n >= U256::from(Q) {
        return U256::ZERO;
    }
    let r = x - n * ln2;
    let unit = one();

    // e^r = sum r^k / k!, r < ln 2
    let mut sum = unit;
    let mut term = unit;
    for k in 1..=MAX_TAYLOR_TERMS {
        term = term * r / (U256::from(k) << Q);
        if term.is_zero() {
            break;
        }
        sum += term;
    }

    // n < Q here, so the low limb holds it exactly
    let shift = usize::try_from(n.as_limbs()[0]).unwrap_or(Q);
    ((unit * unit) / sum) >> shift
}
