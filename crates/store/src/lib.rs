//! Store layer for Vaultra.
//!
//! Provides the concrete [`vaultra_core::store::Store`] implementation
//! (an in-process store with optimistic unit-of-work concurrency) and
//! the credential-verifying authenticator.

pub mod auth;
pub mod memory;

pub use auth::MemoryAuthenticator;
pub use memory::MemoryStore;

use vaultra_shared::{config::StoreConfig, AppError, AppResult};

/// Opens the store described by the configuration.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unsupported store URL scheme.
pub fn open(config: &StoreConfig) -> AppResult<MemoryStore> {
    if config.url.starts_with("memory://") {
        Ok(MemoryStore::new())
    } else {
        Err(AppError::InvalidArgument(format!(
            "unsupported store url: {}",
            config.url
        )))
    }
}
