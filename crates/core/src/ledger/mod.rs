//! Account balance mutation and transfer logic.
//!
//! This module implements the heart of the system:
//! - Account and transaction-record domain types
//! - Precondition checks (ownership, sufficiency, argument validation)
//! - The ledger engine executing deposits, withdrawals, and transfers
//!   as atomic units of work

pub mod account;
pub mod engine;
pub mod record;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::Account;
pub use engine::LedgerEngine;
pub use record::{RecordKind, TransactionRecord};
