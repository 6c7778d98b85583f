//! The atomic-operation core of the ledger.
//!
//! Every public operation is unit-of-work bounded: it appears to an
//! external observer as if it executed entirely or not at all, and
//! total system money only changes by explicitly deposited or withdrawn
//! external amounts. The unit is aborted on every error exit path.

use tracing::debug;
use vaultra_shared::{AccountId, AppResult, Money, UserId};

use super::account::Account;
use super::record::TransactionRecord;
use super::validation;
use crate::session::Session;
use crate::store::{Store, UnitOfWork};

/// Executes deposits, withdrawals, and transfers against a store.
///
/// Holds no state beyond the store handle; the acting identity arrives
/// with each call as a [`Session`], so one engine serves any number of
/// concurrent logical callers.
#[derive(Debug, Clone)]
pub struct LedgerEngine<S> {
    store: S,
}

impl<S: Store> LedgerEngine<S> {
    /// Creates an engine over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a new account for the session user.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` without a session user; `InvalidArgument` if
    /// the initial deposit is negative.
    pub async fn open_account(
        &self,
        session: &Session,
        initial_deposit: Money,
    ) -> AppResult<Account> {
        let owner = session.require_user()?.clone();
        validation::validate_opening_deposit(initial_deposit)?;

        let mut unit = self.store.begin().await?;
        let outcome = unit.insert_account(&owner, initial_deposit).await;
        let account = finish(unit, outcome).await?;

        debug!(account = %account.id, %owner, "account opened");
        Ok(account)
    }

    /// Credits external money to an owned account and logs it, as one
    /// atomic unit.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `InvalidArgument` (non-positive amount),
    /// `Unauthorized` (not the owner), `NotFound`.
    pub async fn deposit(
        &self,
        session: &Session,
        account_id: AccountId,
        amount: Money,
    ) -> AppResult<TransactionRecord> {
        let user = session.require_user()?;
        validation::validate_amount(amount)?;

        let mut unit = self.store.begin().await?;
        let outcome = deposit_in(unit.as_mut(), user, account_id, amount).await;
        let record = finish(unit, outcome).await?;

        debug!(account = %account_id, %amount, "deposit committed");
        Ok(record)
    }

    /// Debits external money from an owned account and logs it, as one
    /// atomic unit.
    ///
    /// # Errors
    ///
    /// The deposit preconditions plus `InsufficientFunds` when the
    /// balance does not cover the amount (no mutation occurs).
    pub async fn withdraw(
        &self,
        session: &Session,
        account_id: AccountId,
        amount: Money,
    ) -> AppResult<TransactionRecord> {
        let user = session.require_user()?;
        validation::validate_amount(amount)?;

        let mut unit = self.store.begin().await?;
        let outcome = withdraw_in(unit.as_mut(), user, account_id, amount).await;
        let record = finish(unit, outcome).await?;

        debug!(account = %account_id, %amount, "withdrawal committed");
        Ok(record)
    }

    /// Moves money between two accounts as one atomic transaction:
    /// debit, credit, and one log record referencing both.
    ///
    /// Ownership is checked on the source only; the destination may
    /// belong to anyone. The sufficiency check and the debit are part
    /// of the same isolated unit, so a concurrent mutation of the
    /// source cannot slip between them. A partial transfer (debited but
    /// not credited) is never observable.
    ///
    /// # Errors
    ///
    /// The withdraw preconditions plus `InvalidArgument` when source
    /// and destination are the same account.
    pub async fn transfer(
        &self,
        session: &Session,
        from: AccountId,
        to: AccountId,
        amount: Money,
    ) -> AppResult<TransactionRecord> {
        let user = session.require_user()?;
        validation::validate_amount(amount)?;
        validation::ensure_distinct(from, to)?;

        let mut unit = self.store.begin().await?;
        let outcome = transfer_in(unit.as_mut(), user, from, to, amount).await;
        let record = finish(unit, outcome).await?;

        debug!(%from, %to, %amount, "transfer committed");
        Ok(record)
    }

    /// Returns the balance of an owned account.
    pub async fn balance(&self, session: &Session, account_id: AccountId) -> AppResult<Money> {
        let user = session.require_user()?;
        let account = self.store.account(account_id).await?;
        validation::ensure_owner(&account, user)?;
        Ok(account.balance)
    }

    /// Lists the session user's accounts, ascending by id.
    pub async fn my_accounts(&self, session: &Session) -> AppResult<Vec<Account>> {
        let user = session.require_user()?;
        self.store.accounts_by_owner(user).await
    }

    /// Lists the movements touching an owned account, oldest first.
    pub async fn history(
        &self,
        session: &Session,
        account_id: AccountId,
    ) -> AppResult<Vec<TransactionRecord>> {
        let user = session.require_user()?;
        let account = self.store.account(account_id).await?;
        validation::ensure_owner(&account, user)?;
        self.store.records_for_account(account_id).await
    }
}

/// Commits the unit on success, aborts it on failure.
///
/// The abort outcome is deliberately ignored: the original error is
/// what the caller must see, and an unapplied unit holds no durable
/// state to clean up.
async fn finish<T>(unit: Box<dyn UnitOfWork + '_>, outcome: AppResult<T>) -> AppResult<T> {
    match outcome {
        Ok(value) => {
            unit.commit().await?;
            Ok(value)
        }
        Err(err) => {
            let _ = unit.abort().await;
            Err(err)
        }
    }
}

async fn deposit_in(
    unit: &mut dyn UnitOfWork,
    user: &UserId,
    account_id: AccountId,
    amount: Money,
) -> AppResult<TransactionRecord> {
    let account = unit.account(account_id).await?;
    validation::ensure_owner(&account, user)?;

    unit.adjust_balance(account_id, amount).await?;
    unit.append_record(None, Some(account_id), amount).await
}

async fn withdraw_in(
    unit: &mut dyn UnitOfWork,
    user: &UserId,
    account_id: AccountId,
    amount: Money,
) -> AppResult<TransactionRecord> {
    let account = unit.account(account_id).await?;
    validation::ensure_owner(&account, user)?;
    validation::ensure_sufficient(&account, amount)?;

    unit.adjust_balance(account_id, amount.negate()).await?;
    unit.append_record(Some(account_id), None, amount).await
}

async fn transfer_in(
    unit: &mut dyn UnitOfWork,
    user: &UserId,
    from: AccountId,
    to: AccountId,
    amount: Money,
) -> AppResult<TransactionRecord> {
    let source = unit.account(from).await?;
    validation::ensure_owner(&source, user)?;
    validation::ensure_sufficient(&source, amount)?;

    // Resolve the destination before touching any balance so a missing
    // destination fails with nothing staged.
    unit.account(to).await?;

    unit.adjust_balance(from, amount.negate()).await?;
    unit.adjust_balance(to, amount).await?;
    unit.append_record(Some(from), Some(to), amount).await
}
