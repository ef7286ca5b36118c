//! Rounding direction for integer division.

/// Direction in which a non-exact quotient is rounded.
///
/// Every division in the engine names its direction.  The convention is to
/// round against the party that receives tokens: payouts round
/// [`Down`](Rounding::Down), amounts pulled from a caller round
/// [`Up`](Rounding::Up).
///
/// ```
/// use twamm_engine::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert_eq!(Rounding::Down.opposite(), Rounding::Up);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Toward positive infinity.
    Up,
    /// Toward zero.
    Down,
}

impl Rounding {
    /// Returns `true` for [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns the other direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}
