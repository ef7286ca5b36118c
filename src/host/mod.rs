//! Reference collaborators for running a pool in-process.
//!
//! | Type | Implements |
//! |------|------------|
//! | [`InMemoryCustody`] | [`TokenCustody`](crate::traits::TokenCustody) over a balance map |
//! | [`ManualClock`] | [`BlockClock`](crate::traits::BlockClock) set by the host |
//! | [`SharedTwamm`] | a mutex-guarded pool stamped by a clock |

mod clock;
mod custody;
mod shared;

pub use clock::ManualClock;
pub use custody::InMemoryCustody;
pub use shared::SharedTwamm;
