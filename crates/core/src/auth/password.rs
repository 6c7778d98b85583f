//! Credential hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with default parameters and
//! PHC-string encoded hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use thiserror::Error;
use vaultra_shared::AppError;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Failed to hash a secret.
    #[error("failed to hash secret: {0}")]
    Hash(String),

    /// Verification failed for a reason other than a wrong secret.
    #[error("failed to verify secret: {0}")]
    Verify(String),

    /// The stored hash is not a valid PHC string.
    #[error("stored credential hash is malformed")]
    MalformedHash,
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            // A corrupt hash means the credential store holds state it
            // never should have committed.
            CredentialError::MalformedHash => Self::InvariantViolation(err.to_string()),
            CredentialError::Hash(_) | CredentialError::Verify(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}

/// Hashes a credential secret using Argon2id.
///
/// # Errors
///
/// Returns `CredentialError::Hash` if hashing fails.
pub fn hash_secret(secret: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verifies a secret against a stored PHC-format hash.
///
/// Returns `Ok(false)` for a wrong secret; `Err` only for
/// infrastructure-level failures.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::MalformedHash)?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Verify(e.to_string())),
    }
}
