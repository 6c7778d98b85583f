//! Authentication boundary and credential hashing.
//!
//! The core never stores or inspects credentials. Verification is
//! delegated to an [`Authenticator`] with a single contract: verify
//! only, no session side effects. Session mutation happens exclusively
//! in [`crate::session::Session`].

mod password;

pub use password::{hash_secret, verify_secret, CredentialError};

use async_trait::async_trait;
use vaultra_shared::{AppResult, UserId};

/// Verifies user credentials.
///
/// Wrong credentials are an expected outcome (`Ok(false)`), not an
/// error; `Err` is reserved for infrastructure failures distinct from
/// a failed match.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns whether `secret` is the credential for `user_id`.
    /// Side-effect-free.
    async fn verify(&self, user_id: &UserId, secret: &str) -> AppResult<bool>;
}
