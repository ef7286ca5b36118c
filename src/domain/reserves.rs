//! Snapshot of the two constant-product reserves.

use core::fmt;

use ruint::aliases::U256;

use super::{Amount, Direction};

/// The pair of reserves `(reserve_a, reserve_b)` backing the curve.
///
/// ```
/// use twamm_engine::domain::{Amount, Direction, Reserves};
///
/// let r = Reserves::new(Amount::new(100), Amount::new(400));
/// assert_eq!(r.oriented(Direction::BToA), (Amount::new(400), Amount::new(100)));
/// assert!(r.is_seeded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reserves {
    a: Amount,
    b: Amount,
}

impl Reserves {
    /// Empty reserves.
    pub const EMPTY: Self = Self {
        a: Amount::ZERO,
        b: Amount::ZERO,
    };

    /// Creates a snapshot.
    #[must_use]
    pub const fn new(a: Amount, b: Amount) -> Self {
        Self { a, b }
    }

    /// Reserve of token A.
    pub const fn a(&self) -> Amount {
        self.a
    }

    /// Reserve of token B.
    pub const fn b(&self) -> Amount {
        self.b
    }

    /// `true` once both reserves are non-zero.
    #[must_use]
    pub const fn is_seeded(&self) -> bool {
        !self.a.is_zero() && !self.b.is_zero()
    }

    /// `(reserve_in, reserve_out)` for a trade in `direction`.
    #[must_use]
    pub const fn oriented(&self, direction: Direction) -> (Amount, Amount) {
        match direction {
            Direction::AToB => (self.a, self.b),
            Direction::BToA => (self.b, self.a),
        }
    }

    /// Builds reserves back from an oriented `(reserve_in, reserve_out)`.
    #[must_use]
    pub const fn from_oriented(direction: Direction, reserve_in: Amount, reserve_out: Amount) -> Self {
        match direction {
            Direction::AToB => Self::new(reserve_in, reserve_out),
            Direction::BToA => Self::new(reserve_out, reserve_in),
        }
    }

    /// The invariant `k = reserve_a * reserve_b`, exact in 256 bits.
    #[must_use]
    pub fn product(&self) -> U256 {
        U256::from(self.a.get()) * U256::from(self.b.get())
    }
}

impl fmt::Display for Reserves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}
