//! Unified error types for the TWAMM engine.
//!
//! All fallible operations across the crate return [`AmmError`], so a host
//! only has to handle a single error type.  Every variant belongs to one of
//! two classes, exposed through [`AmmError::kind`]:
//!
//! | Kind | Meaning | Examples |
//! |------|---------|----------|
//! | [`ErrorKind::PreconditionViolation`] | The caller asked for something the pool state does not allow | unseeded pool, foreign order, inert order, LP over-withdrawal |
//! | [`ErrorKind::ArithmeticBound`] | An intermediate value left the numeric domain | sell volume overflow, rewards factor overflow |
//!
//! Both kinds are fatal: the failing call leaves no trace in the pool state
//! and retrying with the same inputs fails the same way.

use thiserror::Error;

use crate::domain::{BlockNumber, OrderId};

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Classification of an [`AmmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The operation is not permitted in the current state or with the
    /// given arguments.
    PreconditionViolation,
    /// A computation exceeded the representable numeric range.
    ArithmeticBound,
}

/// Errors produced by the TWAMM engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    /// Checked addition or multiplication overflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Checked subtraction underflowed.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// A division had a zero denominator.
    #[error("division by zero")]
    DivisionByZero,

    /// An intermediate of the settlement math exceeded its numeric domain.
    #[error("numeric bound exceeded: {0}")]
    ArithmeticBound(&'static str),

    /// A quantity argument is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// A token address is not part of the pool pair.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// A fee setting is outside the accepted range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// A liquidity argument is invalid.
    #[error("invalid liquidity: {0}")]
    InvalidLiquidity(&'static str),

    /// A configuration parameter is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A price value could not be represented.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// The reserves cannot satisfy the requested trade.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// The pool holds no liquidity yet.
    #[error("pool has not been seeded with liquidity")]
    PoolNotSeeded,

    /// Initial liquidity was already provided.
    #[error("liquidity has already been provided")]
    AlreadySeeded,

    /// The caller holds fewer LP tokens than requested.
    #[error("not enough lp tokens available: held {held}, requested {requested}")]
    InsufficientLpBalance {
        /// LP tokens held by the caller.
        held: u128,
        /// LP tokens the caller tried to use.
        requested: u128,
    },

    /// No order exists under the given id.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// The caller does not own the order.
    #[error("caller does not own order {0}")]
    NotOrderOwner(OrderId),

    /// The order was already cancelled or fully withdrawn.
    #[error("order {0} is no longer active")]
    OrderInert(OrderId),

    /// The order reached its expiry and can no longer be cancelled.
    #[error("order {0} has already expired")]
    OrderExpired(OrderId),

    /// A call targeted a block before the last executed block.
    #[error("block {requested} precedes last virtual execution block {last}")]
    BlockRegression {
        /// Last block through which virtual orders were executed.
        last: BlockNumber,
        /// Block requested by the caller.
        requested: BlockNumber,
    },

    /// A custody account cannot cover a transfer.
    #[error("insufficient token balance")]
    InsufficientBalance,

    /// Internal bookkeeping is inconsistent.
    #[error("state invariant broken: {0}")]
    CorruptState(&'static str),

    /// The shared pool lock was poisoned by a panicking holder.
    #[error("pool lock poisoned")]
    LockPoisoned,
}

impl AmmError {
    /// Returns the class this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Overflow(_) | Self::Underflow(_) | Self::DivisionByZero | Self::ArithmeticBound(_) => {
                ErrorKind::ArithmeticBound
            }
            _ => ErrorKind::PreconditionViolation,
        }
    }

    /// Returns `true` for [`ErrorKind::PreconditionViolation`] errors.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self.kind(), ErrorKind::PreconditionViolation)
    }
}
