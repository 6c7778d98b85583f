//! Shared types, errors, and configuration for Vaultra.
//!
//! This crate provides common types used across all other crates:
//! - Money type with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{AccountId, Money, RecordId, UserId};
