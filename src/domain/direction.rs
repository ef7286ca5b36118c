//! Trade direction within a pool.

use core::fmt;

/// Which token is sold and which is bought.
///
/// Every long-term order and every instant swap has a direction; the engine
/// keeps one order pool per direction.
///
/// ```
/// use twamm_engine::domain::Direction;
///
/// assert_eq!(Direction::AToB.opposite(), Direction::BToA);
/// assert!(Direction::AToB.sells_a());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Sell token A, buy token B.
    AToB,
    /// Sell token B, buy token A.
    BToA,
}

impl Direction {
    /// Both directions, A→B first.
    pub const ALL: [Self; 2] = [Self::AToB, Self::BToA];

    /// Returns the reverse direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::AToB => Self::BToA,
            Self::BToA => Self::AToB,
        }
    }

    /// Returns `true` when token A is the sold token.
    #[must_use]
    pub const fn sells_a(&self) -> bool {
        matches!(self, Self::AToB)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AToB => write!(f, "A->B"),
            Self::BToA => write!(f, "B->A"),
        }
    }
}
