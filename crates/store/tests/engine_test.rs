//! End-to-end behavior of the ledger engine over the memory store.

use async_trait::async_trait;
use rust_decimal_macros::dec;
use vaultra_core::ledger::{Account, RecordKind, TransactionRecord};
use vaultra_core::store::{Store, UnitOfWork};
use vaultra_core::{LedgerEngine, Session};
use vaultra_shared::{AccountId, AppError, AppResult, Money, UserId};
use vaultra_store::{MemoryAuthenticator, MemoryStore};

fn money(d: rust_decimal::Decimal) -> Money {
    Money::new(d)
}

/// Registers `user` and returns a session authenticated as them.
async fn login_as(auth: &MemoryAuthenticator, user: &str) -> Session {
    let _ = auth.register(UserId::new(user), "pw");
    let mut session = Session::anonymous();
    assert!(session
        .login(auth, UserId::new(user), "pw")
        .await
        .unwrap());
    session
}

struct Harness {
    engine: LedgerEngine<MemoryStore>,
    auth: MemoryAuthenticator,
}

impl Harness {
    fn new() -> Self {
        Self {
            engine: LedgerEngine::new(MemoryStore::new()),
            auth: MemoryAuthenticator::new(),
        }
    }
}

#[tokio::test]
async fn test_open_account_and_list() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;

    let first = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();
    let second = h.engine.open_account(&alice, Money::ZERO).await.unwrap();

    assert_eq!(first.owner, UserId::new("alice"));
    assert_eq!(first.balance, money(dec!(100.00)));
    assert!(second.id > first.id);

    let accounts = h.engine.my_accounts(&alice).await.unwrap();
    let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_open_account_rejects_negative_deposit() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;

    assert!(matches!(
        h.engine.open_account(&alice, money(dec!(-0.01))).await,
        Err(AppError::InvalidArgument(_))
    ));
    assert!(h.engine.my_accounts(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_is_immediately_visible() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let account = h.engine.open_account(&alice, Money::ZERO).await.unwrap();

    h.engine
        .deposit(&alice, account.id, money(dec!(50.00)))
        .await
        .unwrap();

    assert_eq!(
        h.engine.balance(&alice, account.id).await.unwrap(),
        money(dec!(50.00))
    );

    let records = h.engine.history(&alice, account.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind(), RecordKind::Deposit);
    assert_eq!(records[0].from_account, None);
    assert_eq!(records[0].to_account, Some(account.id));
    assert_eq!(records[0].amount, money(dec!(50.00)));
}

#[tokio::test]
async fn test_withdraw_insufficient_funds_leaves_no_trace() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let account = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();

    let err = h
        .engine
        .withdraw(&alice, account.id, money(dec!(150.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientFunds { .. }));
    assert_eq!(
        h.engine.balance(&alice, account.id).await.unwrap(),
        money(dec!(100.00))
    );
    assert!(h.engine.history(&alice, account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_withdraw_whole_balance_is_allowed() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let account = h
        .engine
        .open_account(&alice, money(dec!(42.00)))
        .await
        .unwrap();

    let record = h
        .engine
        .withdraw(&alice, account.id, money(dec!(42.00)))
        .await
        .unwrap();

    assert_eq!(record.kind(), RecordKind::Withdrawal);
    assert_eq!(
        h.engine.balance(&alice, account.id).await.unwrap(),
        Money::ZERO
    );
}

#[tokio::test]
async fn test_transfer_moves_funds_atomically() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let bob = login_as(&h.auth, "bob").await;

    let a = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();
    let b = h.engine.open_account(&bob, Money::ZERO).await.unwrap();

    let record = h
        .engine
        .transfer(&alice, a.id, b.id, money(dec!(40.00)))
        .await
        .unwrap();

    assert_eq!(record.from_account, Some(a.id));
    assert_eq!(record.to_account, Some(b.id));
    assert_eq!(record.amount, money(dec!(40.00)));
    assert_eq!(record.kind(), RecordKind::Transfer);

    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(60.00))
    );
    assert_eq!(h.engine.balance(&bob, b.id).await.unwrap(), money(dec!(40.00)));

    // Both sides see the same single record.
    assert_eq!(h.engine.history(&alice, a.id).await.unwrap().len(), 1);
    assert_eq!(h.engine.history(&bob, b.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_self_transfer_is_rejected() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let a = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();

    let err = h
        .engine
        .transfer(&alice, a.id, a.id, money(dec!(10.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidArgument(_)));
    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(100.00))
    );
    assert!(h.engine.history(&alice, a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_to_missing_account_stages_nothing() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let a = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();

    let err = h
        .engine
        .transfer(&alice, a.id, AccountId::new(999), money(dec!(10.00)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(100.00))
    );
}

#[tokio::test]
async fn test_ownership_is_enforced_without_state_change() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let bob = login_as(&h.auth, "bob").await;
    let a = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();

    let amount = money(dec!(10.00));
    assert!(matches!(
        h.engine.deposit(&bob, a.id, amount).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        h.engine.withdraw(&bob, a.id, amount).await,
        Err(AppError::Unauthorized(_))
    ));
    let b = h.engine.open_account(&bob, Money::ZERO).await.unwrap();
    assert!(matches!(
        h.engine.transfer(&bob, a.id, b.id, amount).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        h.engine.balance(&bob, a.id).await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        h.engine.history(&bob, a.id).await,
        Err(AppError::Unauthorized(_))
    ));

    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(100.00))
    );
    assert!(h.engine.history(&alice, a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_destination_ownership_is_not_required() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let bob = login_as(&h.auth, "bob").await;

    let a = h
        .engine
        .open_account(&alice, money(dec!(50.00)))
        .await
        .unwrap();
    let b = h.engine.open_account(&bob, Money::ZERO).await.unwrap();

    // Alice pays into Bob's account without owning it.
    h.engine
        .transfer(&alice, a.id, b.id, money(dec!(50.00)))
        .await
        .unwrap();
    assert_eq!(h.engine.balance(&bob, b.id).await.unwrap(), money(dec!(50.00)));
}

#[tokio::test]
async fn test_anonymous_session_is_rejected() {
    let h = Harness::new();
    let anonymous = Session::anonymous();

    assert!(matches!(
        h.engine.open_account(&anonymous, Money::ZERO).await,
        Err(AppError::Unauthenticated)
    ));
    assert!(matches!(
        h.engine
            .deposit(&anonymous, AccountId::new(1), money(dec!(1.00)))
            .await,
        Err(AppError::Unauthenticated)
    ));
    assert!(matches!(
        h.engine.my_accounts(&anonymous).await,
        Err(AppError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_non_positive_amounts_are_rejected() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let a = h
        .engine
        .open_account(&alice, money(dec!(10.00)))
        .await
        .unwrap();

    for amount in [Money::ZERO, money(dec!(-1.00))] {
        assert!(matches!(
            h.engine.deposit(&alice, a.id, amount).await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            h.engine.withdraw(&alice, a.id, amount).await,
            Err(AppError::InvalidArgument(_))
        ));
    }
    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(10.00))
    );
}

#[tokio::test]
async fn test_conservation_over_a_mixed_sequence() {
    let h = Harness::new();
    let alice = login_as(&h.auth, "alice").await;
    let bob = login_as(&h.auth, "bob").await;

    let a = h
        .engine
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();
    let b = h.engine.open_account(&bob, money(dec!(20.00))).await.unwrap();

    h.engine
        .deposit(&alice, a.id, money(dec!(30.00)))
        .await
        .unwrap();
    h.engine
        .transfer(&alice, a.id, b.id, money(dec!(75.00)))
        .await
        .unwrap();
    h.engine
        .withdraw(&bob, b.id, money(dec!(15.00)))
        .await
        .unwrap();

    // 120 initial + 30 deposited - 15 withdrawn
    let total = h
        .engine
        .balance(&alice, a.id)
        .await
        .unwrap()
        .checked_add(h.engine.balance(&bob, b.id).await.unwrap())
        .unwrap();
    assert_eq!(total, money(dec!(135.00)));
    assert_eq!(
        h.engine.balance(&alice, a.id).await.unwrap(),
        money(dec!(55.00))
    );
    assert_eq!(h.engine.balance(&bob, b.id).await.unwrap(), money(dec!(80.00)));
}

// --- failure injection -----------------------------------------------------

/// Store wrapper whose units fail every log append, simulating an
/// outage after balance mutations have been staged.
struct FailingStore {
    inner: MemoryStore,
}

#[async_trait]
impl Store for FailingStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork + '_>> {
        let inner = self.inner.begin().await?;
        Ok(Box::new(FailingUnit { inner }))
    }

    async fn account(&self, id: AccountId) -> AppResult<Account> {
        self.inner.account(id).await
    }

    async fn accounts_by_owner(&self, owner: &UserId) -> AppResult<Vec<Account>> {
        self.inner.accounts_by_owner(owner).await
    }

    async fn records_for_account(&self, account: AccountId) -> AppResult<Vec<TransactionRecord>> {
        self.inner.records_for_account(account).await
    }
}

struct FailingUnit<'a> {
    inner: Box<dyn UnitOfWork + 'a>,
}

#[async_trait]
impl UnitOfWork for FailingUnit<'_> {
    async fn account(&mut self, id: AccountId) -> AppResult<Account> {
        self.inner.account(id).await
    }

    async fn insert_account(&mut self, owner: &UserId, opening: Money) -> AppResult<Account> {
        self.inner.insert_account(owner, opening).await
    }

    async fn adjust_balance(&mut self, id: AccountId, delta: Money) -> AppResult<Account> {
        self.inner.adjust_balance(id, delta).await
    }

    async fn append_record(
        &mut self,
        _from: Option<AccountId>,
        _to: Option<AccountId>,
        _amount: Money,
    ) -> AppResult<TransactionRecord> {
        Err(AppError::StoreUnavailable("injected append failure".into()))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.inner.commit().await
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        self.inner.abort().await
    }
}

#[tokio::test]
async fn test_store_failure_mid_transfer_rolls_back_the_debit() {
    let auth = MemoryAuthenticator::new();
    let backing = MemoryStore::new();
    let alice = login_as(&auth, "alice").await;
    let bob = login_as(&auth, "bob").await;

    // Seed through a healthy engine, then swap in the failing store.
    let healthy = LedgerEngine::new(backing.clone());
    let a = healthy
        .open_account(&alice, money(dec!(100.00)))
        .await
        .unwrap();
    let b = healthy.open_account(&bob, Money::ZERO).await.unwrap();

    let engine = LedgerEngine::new(FailingStore { inner: backing });
    let err = engine
        .transfer(&alice, a.id, b.id, money(dec!(40.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));

    // Post-failure state equals pre-call state: the staged debit died
    // with the unit.
    assert_eq!(
        healthy.balance(&alice, a.id).await.unwrap(),
        money(dec!(100.00))
    );
    assert_eq!(healthy.balance(&bob, b.id).await.unwrap(), Money::ZERO);
    assert!(healthy.history(&alice, a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_mid_deposit_rolls_back_the_credit() {
    let auth = MemoryAuthenticator::new();
    let backing = MemoryStore::new();
    let alice = login_as(&auth, "alice").await;

    let healthy = LedgerEngine::new(backing.clone());
    let a = healthy
        .open_account(&alice, money(dec!(5.00)))
        .await
        .unwrap();

    let engine = LedgerEngine::new(FailingStore { inner: backing });
    assert!(engine
        .deposit(&alice, a.id, money(dec!(50.00)))
        .await
        .is_err());

    assert_eq!(
        healthy.balance(&alice, a.id).await.unwrap(),
        money(dec!(5.00))
    );
}
