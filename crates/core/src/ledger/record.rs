//! Append-only transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vaultra_shared::{AccountId, Money, RecordId};

/// A single money movement in the append-only transaction log.
///
/// Exactly one endpoint is absent for deposits (`from_account`) and
/// withdrawals (`to_account`); both are present for transfers. Records
/// are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Store-assigned monotonic id.
    pub id: RecordId,
    /// Source account; absent for deposits of external money.
    pub from_account: Option<AccountId>,
    /// Destination account; absent for withdrawals of external money.
    pub to_account: Option<AccountId>,
    /// Amount moved; always strictly positive.
    pub amount: Money,
    /// When the movement was committed.
    pub timestamp: DateTime<Utc>,
}

/// The shape of a money movement, derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// External money credited to an account.
    Deposit,
    /// Money debited out of the system.
    Withdrawal,
    /// Money moved between two accounts.
    Transfer,
}

impl TransactionRecord {
    /// Classifies this record by its endpoints.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match (self.from_account, self.to_account) {
            (None, Some(_)) => RecordKind::Deposit,
            (Some(_), None) => RecordKind::Withdrawal,
            // Both-absent is rejected at append time.
            _ => RecordKind::Transfer,
        }
    }

    /// Returns true if the record references `account`.
    #[must_use]
    pub fn touches(&self, account: AccountId) -> bool {
        self.from_account == Some(account) || self.to_account == Some(account)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}
