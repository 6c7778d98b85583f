//! Application-wide error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every failure a ledger operation can report maps to exactly one of
/// these kinds. Kinds are terminal for the triggering call and are
/// propagated verbatim; only `StoreUnavailable` is eligible for
/// caller-level retry.
#[derive(Debug, Error)]
pub enum AppError {
    /// A caller-supplied value is rejected (non-positive amount,
    /// missing required field, self-transfer).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Account or user does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No active session.
    #[error("Authentication required")]
    Unauthenticated,

    /// The session does not own the target account.
    #[error("Access denied: {0}")]
    Unauthorized(String),

    /// A debit exceeds the source account's balance.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Balance available on the source account.
        available: Decimal,
        /// Amount the caller asked to debit.
        requested: Decimal,
    },

    /// Committing would break a core invariant (e.g. negative balance).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Transient infrastructure failure; no partial mutation survives.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AppError {
    /// Returns the stable error code for this kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns true if the caller may retry the operation with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
