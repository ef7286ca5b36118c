//! In-memory token ledger.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::traits::TokenCustody;

/// Token balances per `(token, account)`, with one account acting as the
/// pool vault.
///
/// Intended for tests, simulations and hosts that keep balances in memory.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Address, Amount};
/// use twamm_engine::host::InMemoryCustody;
/// use twamm_engine::traits::TokenCustody;
///
/// let token = Address::repeat_byte(1);
/// let alice = Address::repeat_byte(0xa1);
/// let mut custody = InMemoryCustody::new(Address::repeat_byte(0xff));
/// custody.mint(token, alice, Amount::new(100));
///
/// custody.transfer_in(token, alice, Amount::new(40)).expect("funded");
/// assert_eq!(custody.balance_of(token, alice), Amount::new(60));
/// assert_eq!(custody.balance_of(token, custody.vault()), Amount::new(40));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InMemoryCustody {
    vault: Address,
    balances: BTreeMap<(Address, Address), Amount>,
}

impl InMemoryCustody {
    /// An empty ledger whose pool vault is `vault`.
    #[must_use]
    pub const fn new(vault: Address) -> Self {
        Self {
            vault,
            balances: BTreeMap::new(),
        }
    }

    /// The pool's own account.
    #[must_use]
    pub const fn vault(&self) -> Address {
        self.vault
    }

    /// Credits `amount` of `token` to `account` out of thin air.
    ///
    /// Saturates at `u128::MAX`.
    pub fn mint(&mut self, token: Address, account: Address, amount: Amount) {
        let balance = self.balance_of(token, account);
        let credited = balance.checked_add(&amount).unwrap_or(Amount::MAX);
        self.set(token, account, credited);
    }

    fn set(&mut self, token: Address, account: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(token, account));
        } else {
            self.balances.insert((token, account), amount);
        }
    }

    fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let debited = self
            .balance_of(token, from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        let credited = self
            .balance_of(token, to)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token balance overflow"))?;
        self.set(token, from, debited);
        self.set(token, to, credited);
        Ok(())
    }
}

impl TokenCustody for InMemoryCustody {
    fn transfer_in(&mut self, token: Address, from: Address, amount: Amount) -> Result<(), AmmError> {
        self.move_balance(token, from, self.vault, amount)
    }

    fn transfer_out(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.move_balance(token, self.vault, to, amount)
    }

    fn balance_of(&self, token: Address, account: Address) -> Amount {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or(Amount::ZERO)
    }
}
