//! Credential store and authenticator.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use vaultra_core::auth::{hash_secret, verify_secret, Authenticator};
use vaultra_shared::{AppError, AppResult, UserId};

/// In-process credential store implementing the authenticator boundary.
///
/// Owns the user records entirely: the rest of the system only ever
/// sees the authenticated [`UserId`]. Secrets are stored as Argon2id
/// PHC hashes, never in the clear.
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    users: DashMap<UserId, String>,
}

impl MemoryAuthenticator {
    /// Creates an empty credential store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new user with the given secret.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty secret or an already-registered
    /// user id.
    pub fn register(&self, user_id: UserId, secret: &str) -> AppResult<()> {
        if secret.is_empty() {
            return Err(AppError::InvalidArgument(
                "secret must not be empty".to_string(),
            ));
        }

        match self.users.entry(user_id) {
            Entry::Occupied(entry) => Err(AppError::InvalidArgument(format!(
                "user {} is already registered",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(hash_secret(secret)?);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn verify(&self, user_id: &UserId, secret: &str) -> AppResult<bool> {
        // An unknown user and a wrong secret are the same expected
        // outcome; only infrastructure failures become errors.
        let Some(hash) = self.users.get(user_id).map(|entry| entry.value().clone()) else {
            return Ok(false);
        };
        Ok(verify_secret(secret, &hash)?)
    }
}
