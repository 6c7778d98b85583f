//! Property-based tests for precondition checks.

use proptest::prelude::*;
use rust_decimal::Decimal;
use vaultra_shared::{AccountId, AppError, Money, UserId};

use super::account::Account;
use super::validation;

/// Strategy for positive amounts (0.01 to 10,000.00 in cents).
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

/// Strategy for non-positive amounts.
fn non_positive_amount() -> impl Strategy<Value = Money> {
    (-1_000_000i64..=0i64).prop_map(|cents| Money::new(Decimal::new(cents, 2)))
}

fn account_with_balance(balance: Money) -> Account {
    Account {
        id: AccountId::new(1),
        owner: UserId::new("owner"),
        balance,
    }
}

proptest! {
    #[test]
    fn positive_amounts_pass_validation(amount in positive_amount()) {
        prop_assert!(validation::validate_amount(amount).is_ok());
    }

    #[test]
    fn non_positive_amounts_fail_validation(amount in non_positive_amount()) {
        prop_assert!(matches!(
            validation::validate_amount(amount),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn sufficiency_agrees_with_ordering(
        balance in positive_amount(),
        requested in positive_amount(),
    ) {
        let account = account_with_balance(balance);
        let result = validation::ensure_sufficient(&account, requested);
        if requested <= balance {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(AppError::InsufficientFunds { .. })),
                "expected InsufficientFunds, got {:?}",
                result
            );
        }
    }

    #[test]
    fn insufficient_funds_reports_exact_amounts(
        balance in positive_amount(),
        extra in positive_amount(),
    ) {
        // Requesting balance + extra always overdraws and reports both sides.
        let account = account_with_balance(balance);
        let requested = balance.checked_add(extra).unwrap();
        match validation::ensure_sufficient(&account, requested) {
            Err(AppError::InsufficientFunds { available, requested: reported }) => {
                prop_assert_eq!(available, balance.amount());
                prop_assert_eq!(reported, requested.amount());
            }
            other => prop_assert!(false, "expected InsufficientFunds, got {:?}", other),
        }
    }

    #[test]
    fn self_transfer_always_rejected(id in any::<i64>()) {
        prop_assert!(matches!(
            validation::ensure_distinct(AccountId::new(id), AccountId::new(id)),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn distinct_accounts_always_accepted(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(a != b);
        prop_assert!(validation::ensure_distinct(AccountId::new(a), AccountId::new(b)).is_ok());
    }
}
