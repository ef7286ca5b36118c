//! Block heights and the interval grid orders expire on.

use core::fmt;

use crate::error::{AmmError, Result};

/// A block height.
///
/// Time in the engine is measured exclusively in blocks; callers pass the
/// current height explicitly to every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockNumber(u64);

impl BlockNumber {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    /// Wraps a raw height.
    #[must_use]
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// Returns the raw height.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Height `blocks` later, or `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, blocks: u64) -> Option<Self> {
        match self.0.checked_add(blocks) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Number of blocks from `earlier` to `self`, or `None` if `earlier` is
    /// later than `self`.
    #[must_use]
    pub const fn blocks_since(&self, earlier: Self) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(height: u64) -> Self {
        Self(height)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed chunk length of virtual order execution.
///
/// Order expiries always land on multiples of the interval and the engine
/// never executes a chunk that crosses one.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{BlockInterval, BlockNumber};
///
/// let interval = BlockInterval::new(10).expect("non-zero");
/// assert_eq!(interval.next_boundary_after(BlockNumber::new(20)), Some(BlockNumber::new(30)));
/// assert_eq!(interval.next_boundary_after(BlockNumber::new(27)), Some(BlockNumber::new(30)));
/// assert_eq!(interval.align_up(BlockNumber::new(20)), Some(BlockNumber::new(20)));
/// assert_eq!(interval.align_up(BlockNumber::new(21)), Some(BlockNumber::new(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct BlockInterval(u64);

impl BlockInterval {
    /// Ten blocks per interval.
    pub const DEFAULT: Self = Self(10);

    /// Creates an interval of `blocks` blocks.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `blocks` is zero.
    pub const fn new(blocks: u64) -> Result<Self> {
        if blocks == 0 {
            return Err(AmmError::InvalidConfiguration(
                "block interval must be non-zero",
            ));
        }
        Ok(Self(blocks))
    }

    /// Returns the interval length in blocks.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns `true` if `block` sits exactly on the interval grid.
    #[must_use]
    pub const fn is_boundary(&self, block: BlockNumber) -> bool {
        block.0 % self.0 == 0
    }

    /// First grid boundary strictly after `block`.
    #[must_use]
    pub const fn next_boundary_after(&self, block: BlockNumber) -> Option<BlockNumber> {
        let floor = block.0 - block.0 % self.0;
        match floor.checked_add(self.0) {
            Some(v) => Some(BlockNumber(v)),
            None => None,
        }
    }

    /// Smallest grid boundary at or after `block`.
    #[must_use]
    pub const fn align_up(&self, block: BlockNumber) -> Option<BlockNumber> {
        if self.is_boundary(block) {
            Some(block)
        } else {
            self.next_boundary_after(block)
        }
    }

    /// Length in blocks of `intervals` whole intervals.
    #[must_use]
    pub const fn span(&self, intervals: u64) -> Option<u64> {
        self.0.checked_mul(intervals)
    }
}

impl Default for BlockInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for BlockInterval {
    type Error = AmmError;

    fn try_from(blocks: u64) -> Result<Self> {
        Self::new(blocks)
    }
}

impl From<BlockInterval> for u64 {
    fn from(interval: BlockInterval) -> Self {
        interval.0
    }
}

impl fmt::Display for BlockInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}
