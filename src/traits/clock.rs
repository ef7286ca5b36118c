//! Block-height source.

use crate::domain::BlockNumber;

/// Supplies the current block height.
///
/// The engine itself takes `now` as an explicit argument; a clock is only
/// consulted by hosts such as [`SharedTwamm`](crate::host::SharedTwamm) that
/// stamp calls on the caller's behalf.
pub trait BlockClock {
    /// The current block height.
    fn current_block(&self) -> BlockNumber;
}
