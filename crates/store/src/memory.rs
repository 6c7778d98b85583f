//! In-process store with optimistic unit-of-work concurrency.
//!
//! Every account row carries a version number. A unit of work records
//! the version of each account it reads, stages its writes locally, and
//! validates every observed version under a single write lock at commit
//! time. A mismatch means another unit committed in between; the whole
//! unit is rejected as `StoreUnavailable` (retryable) and the store is
//! left untouched. Different accounts never conflict with each other,
//! and staged writes apply in ascending account-id order.
//!
//! Ids are reserved eagerly from monotonic counters, like database
//! sequences: an aborted unit leaves an id gap, never a duplicate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::trace;
use vaultra_core::ledger::{validation, Account, TransactionRecord};
use vaultra_core::store::{Store, UnitOfWork};
use vaultra_shared::{AccountId, AppError, AppResult, Money, RecordId, UserId};

/// A committed account row with its modification version.
#[derive(Debug, Clone)]
struct VersionedAccount {
    account: Account,
    version: u64,
}

/// The committed ledger state.
#[derive(Debug, Default)]
struct LedgerState {
    accounts: BTreeMap<AccountId, VersionedAccount>,
    records: Vec<TransactionRecord>,
    next_account_id: i64,
    next_record_id: i64,
}

/// In-process implementation of the store boundary.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork + '_>> {
        Ok(Box::new(MemoryUnit {
            state: Arc::clone(&self.state),
            observed: HashMap::new(),
            staged_accounts: BTreeMap::new(),
            staged_records: Vec::new(),
        }))
    }

    async fn account(&self, id: AccountId) -> AppResult<Account> {
        let state = self.state.read().await;
        state
            .accounts
            .get(&id)
            .map(|row| row.account.clone())
            .ok_or_else(|| AppError::NotFound(format!("account {id}")))
    }

    async fn accounts_by_owner(&self, owner: &UserId) -> AppResult<Vec<Account>> {
        let state = self.state.read().await;
        // BTreeMap iteration is already ascending by account id.
        Ok(state
            .accounts
            .values()
            .filter(|row| row.account.is_owned_by(owner))
            .map(|row| row.account.clone())
            .collect())
    }

    async fn records_for_account(&self, account: AccountId) -> AppResult<Vec<TransactionRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<TransactionRecord> = state
            .records
            .iter()
            .filter(|record| record.touches(account))
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.timestamp, record.id));
        Ok(records)
    }
}

/// A staged, not-yet-committed unit of work.
struct MemoryUnit {
    state: Arc<RwLock<LedgerState>>,
    /// Version of each committed account this unit has read.
    observed: HashMap<AccountId, u64>,
    /// Accounts written by this unit, keyed ascending by id.
    staged_accounts: BTreeMap<AccountId, Account>,
    staged_records: Vec<TransactionRecord>,
}

impl MemoryUnit {
    /// Reads an account through the unit: staged state wins, otherwise
    /// the committed row is loaded and its version recorded.
    async fn load(&mut self, id: AccountId) -> AppResult<Account> {
        if let Some(staged) = self.staged_accounts.get(&id) {
            return Ok(staged.clone());
        }

        let state = self.state.read().await;
        let row = state
            .accounts
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("account {id}")))?;
        self.observed.insert(id, row.version);
        Ok(row.account.clone())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn account(&mut self, id: AccountId) -> AppResult<Account> {
        self.load(id).await
    }

    async fn insert_account(
        &mut self,
        owner: &UserId,
        opening_balance: Money,
    ) -> AppResult<Account> {
        validation::validate_opening_deposit(opening_balance)?;

        let id = {
            let mut state = self.state.write().await;
            state.next_account_id += 1;
            AccountId::new(state.next_account_id)
        };

        let account = Account {
            id,
            owner: owner.clone(),
            balance: opening_balance,
        };
        self.staged_accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn adjust_balance(&mut self, id: AccountId, delta: Money) -> AppResult<Account> {
        let mut account = self.load(id).await?;

        let balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| AppError::InvariantViolation(format!("balance overflow on {id}")))?;
        if balance.is_negative() {
            return Err(AppError::InvariantViolation(format!(
                "adjustment of {delta} would leave account {id} with balance {balance}"
            )));
        }

        account.balance = balance;
        self.staged_accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn append_record(
        &mut self,
        from: Option<AccountId>,
        to: Option<AccountId>,
        amount: Money,
    ) -> AppResult<TransactionRecord> {
        validation::validate_amount(amount)?;
        validation::validate_endpoints(from, to)?;

        let id = {
            let mut state = self.state.write().await;
            state.next_record_id += 1;
            RecordId::new(state.next_record_id)
        };

        let record = TransactionRecord {
            id,
            from_account: from,
            to_account: to,
            amount,
            timestamp: Utc::now(),
        };
        self.staged_records.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut state = self.state.write().await;

        // Validate everything this unit observed before applying
        // anything: a version moved means another unit committed a
        // conflicting change since our read.
        for (id, version) in &self.observed {
            match state.accounts.get(id) {
                Some(row) if row.version == *version => {}
                Some(_) => {
                    return Err(AppError::StoreUnavailable(format!(
                        "concurrent modification of account {id}, please retry"
                    )));
                }
                None => {
                    return Err(AppError::NotFound(format!("account {id}")));
                }
            }
        }

        // Ascending-id apply order (BTreeMap iteration).
        for (id, account) in self.staged_accounts {
            let version = state.accounts.get(&id).map_or(0, |row| row.version) + 1;
            state.accounts.insert(id, VersionedAccount { account, version });
        }
        let appended = self.staged_records.len();
        state.records.extend(self.staged_records);

        trace!(records = appended, "unit of work committed");
        Ok(())
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        // Nothing durable was touched; dropping the staging is enough.
        Ok(())
    }
}
