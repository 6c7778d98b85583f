//! Store boundary traits.
//!
//! The ledger engine never talks to a concrete database. It consumes a
//! [`Store`] that hands out atomic units of work: every mutation staged
//! inside one [`UnitOfWork`] commits or aborts as a whole, so a deposit's
//! balance update and its log record can never diverge, and a transfer
//! can never be observed half-applied.

use async_trait::async_trait;
use vaultra_shared::{AccountId, AppResult, Money, UserId};

use crate::ledger::{Account, TransactionRecord};

/// An atomic unit of work over the store.
///
/// Mutations are staged until [`commit`](UnitOfWork::commit); dropping
/// or [`abort`](UnitOfWork::abort)ing the unit discards them. Reads
/// observe staged state, and everything read or written is validated
/// against concurrent mutation at commit time: a conflict surfaces as
/// `StoreUnavailable` and leaves the store untouched.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Point read of an account within this unit.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such account exists.
    async fn account(&mut self, id: AccountId) -> AppResult<Account>;

    /// Stages a new account with a fresh store-assigned id.
    async fn insert_account(&mut self, owner: &UserId, opening_balance: Money)
        -> AppResult<Account>;

    /// Stages `balance += delta` as a single read-modify-write.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account vanished; `InvariantViolation` if the
    /// result would be negative. Callers are expected to pre-check
    /// sufficiency inside the same unit.
    async fn adjust_balance(&mut self, id: AccountId, delta: Money) -> AppResult<Account>;

    /// Stages an append to the transaction log.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `amount` is not positive or both endpoints
    /// are absent.
    async fn append_record(
        &mut self,
        from: Option<AccountId>,
        to: Option<AccountId>,
        amount: Money,
    ) -> AppResult<TransactionRecord>;

    /// Atomically applies everything staged in this unit.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discards everything staged in this unit.
    async fn abort(self: Box<Self>) -> AppResult<()>;
}

/// Durable persistence for accounts and the transaction log.
#[async_trait]
pub trait Store: Send + Sync {
    /// Begins a new atomic unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork + '_>>;

    /// Point read of a committed account.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such account exists.
    async fn account(&self, id: AccountId) -> AppResult<Account>;

    /// Lists committed accounts owned by `owner`, ascending by id.
    /// An owner with no accounts yields an empty list, not an error.
    async fn accounts_by_owner(&self, owner: &UserId) -> AppResult<Vec<Account>>;

    /// Lists committed records referencing `account`, ascending by
    /// timestamp (ties broken by record id).
    async fn records_for_account(&self, account: AccountId) -> AppResult<Vec<TransactionRecord>>;
}
