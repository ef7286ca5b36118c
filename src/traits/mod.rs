//! Collaborator traits.
//!
//! The engine is a pure state machine; the outside world enters through
//! two seams: [`TokenCustody`] for balance movement and [`BlockClock`] for
//! the current height.  Reference implementations live in
//! [`host`](crate::host).

mod clock;
mod custody;

pub use clock::BlockClock;
pub use custody::TokenCustody;
