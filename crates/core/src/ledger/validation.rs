//! Precondition checks for ledger operations.
//!
//! Pure functions, shared by the engine and the store implementation.
//! Each check either passes or returns the single error kind the
//! taxonomy assigns to that failure.

use vaultra_shared::{AccountId, AppError, AppResult, Money, UserId};

use super::account::Account;

/// A movement amount must be strictly positive.
pub fn validate_amount(amount: Money) -> AppResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "amount must be positive, got {amount}"
        )))
    }
}

/// An opening deposit may be zero but never negative.
pub fn validate_opening_deposit(amount: Money) -> AppResult<()> {
    if amount.is_negative() {
        Err(AppError::InvalidArgument(format!(
            "initial deposit must not be negative, got {amount}"
        )))
    } else {
        Ok(())
    }
}

/// A record must reference at least one account.
pub fn validate_endpoints(from: Option<AccountId>, to: Option<AccountId>) -> AppResult<()> {
    if from.is_none() && to.is_none() {
        return Err(AppError::InvalidArgument(
            "a transaction record needs at least one account".to_string(),
        ));
    }
    Ok(())
}

/// A transfer source and destination must differ.
pub fn ensure_distinct(from: AccountId, to: AccountId) -> AppResult<()> {
    if from == to {
        return Err(AppError::InvalidArgument(format!(
            "cannot transfer from account {from} to itself"
        )));
    }
    Ok(())
}

/// The acting user must own the account being debited or queried.
pub fn ensure_owner(account: &Account, user: &UserId) -> AppResult<()> {
    if account.is_owned_by(user) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!(
            "account {} does not belong to {user}",
            account.id
        )))
    }
}

/// The source balance must cover the requested debit.
pub fn ensure_sufficient(account: &Account, amount: Money) -> AppResult<()> {
    if account.can_cover(amount) {
        Ok(())
    } else {
        Err(AppError::InsufficientFunds {
            available: account.balance.amount(),
            requested: amount.amount(),
        })
    }
}
