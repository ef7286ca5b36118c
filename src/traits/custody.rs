//! Token custody collaborator.
//!
//! The engine never moves balances itself.  Every deposit (instant-swap
//! input, liquidity, order principal) is pulled through
//! [`TokenCustody::transfer_in`] and every payout (swap output, LP
//! redemption, proceeds, refunds) is pushed through
//! [`TokenCustody::transfer_out`].  The custody owns the pool's vault
//! account; the engine only names the token and the counterparty.

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Moves tokens between user accounts and the pool vault.
///
/// # Contract
///
/// - A failed transfer leaves all balances untouched.
/// - Zero-amount transfers succeed without effect.
///
/// # Errors
///
/// Implementations return [`AmmError::InsufficientBalance`] when the
/// debited account cannot cover the transfer.
pub trait TokenCustody {
    /// Pulls `amount` of `token` from `from` into the pool vault.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less than
    /// `amount`.
    fn transfer_in(&mut self, token: Address, from: Address, amount: Amount) -> Result<(), AmmError>;

    /// Pays `amount` of `token` out of the pool vault to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if the vault holds less
    /// than `amount`.
    fn transfer_out(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError>;

    /// Balance of `token` held by `account`.
    fn balance_of(&self, token: Address, account: Address) -> Amount;
}
