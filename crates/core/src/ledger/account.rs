//! Account domain type.

use serde::{Deserialize, Serialize};
use vaultra_shared::{AccountId, Money, UserId};

/// A customer account.
///
/// Invariant: `balance >= 0` after every committed operation. Balances
/// are mutated only through the ledger engine's atomic units of work;
/// accounts are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned unique id.
    pub id: AccountId,
    /// The user who owns this account.
    pub owner: UserId,
    /// Current balance.
    pub balance: Money,
}

impl Account {
    /// Returns true if `user` owns this account.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }

    /// Returns true if the balance covers a debit of `amount`.
    #[must_use]
    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}
