//! A block clock driven by hand.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::BlockNumber;
use crate::traits::BlockClock;

/// Block height set explicitly by the host, shareable across threads.
#[derive(Debug, Default)]
pub struct ManualClock {
    height: AtomicU64,
}

impl ManualClock {
    /// A clock reading `start`.
    #[must_use]
    pub const fn new(start: BlockNumber) -> Self {
        Self {
            height: AtomicU64::new(start.get()),
        }
    }

    /// Jumps to `block`.  Moving backwards is allowed; the pool rejects the
    /// regression on its next call.
    pub fn set(&self, block: BlockNumber) {
        self.height.store(block.get(), Ordering::SeqCst);
    }

    /// Moves forward by `blocks`, saturating at `u64::MAX`, and returns the
    /// new height.
    pub fn advance(&self, blocks: u64) -> BlockNumber {
        let previous = self
            .height
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |h| {
                Some(h.saturating_add(blocks))
            })
            .unwrap_or_else(|h| h);
        BlockNumber::new(previous.saturating_add(blocks))
    }
}

impl BlockClock for ManualClock {
    fn current_block(&self) -> BlockNumber {
        BlockNumber::new(self.height.load(Ordering::SeqCst))
    }
}
