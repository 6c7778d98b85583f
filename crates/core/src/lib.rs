//! Core banking logic for Vaultra.
//!
//! This crate contains pure business logic with ZERO persistence or I/O
//! dependencies. All domain types, validation rules, and the atomic
//! ledger engine live here; durable storage is reached only through the
//! [`store::Store`] boundary.
//!
//! # Modules
//!
//! - `ledger` - Accounts, transaction records, and the ledger engine
//! - `store` - Store and unit-of-work boundary traits
//! - `auth` - Authenticator boundary and credential hashing
//! - `session` - The authenticated identity driving ownership checks

pub mod auth;
pub mod ledger;
pub mod session;
pub mod store;

pub use ledger::{Account, LedgerEngine, RecordKind, TransactionRecord};
pub use session::Session;
