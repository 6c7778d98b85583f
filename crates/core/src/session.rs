//! The authenticated identity driving ownership checks.
//!
//! A `Session` is a plain value passed explicitly into every engine
//! call. There is no process-global current user: each logical caller
//! holds its own session, so one engine instance can serve many
//! concurrent sessions.

use vaultra_shared::{AppError, AppResult, UserId};

use crate::auth::Authenticator;

/// Tracks at most one authenticated identity.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<UserId>,
}

impl Session {
    /// Creates a session with no authenticated user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// Attempts to authenticate, delegating credential verification to
    /// the authenticator.
    ///
    /// On success the session identity is set and `true` is returned.
    /// Wrong credentials return `false` and leave the session
    /// unchanged; a failed match is an expected outcome, not an error.
    ///
    /// # Errors
    ///
    /// Propagates infrastructure failures from the authenticator.
    pub async fn login<A: Authenticator + ?Sized>(
        &mut self,
        authenticator: &A,
        user_id: UserId,
        secret: &str,
    ) -> AppResult<bool> {
        if authenticator.verify(&user_id, secret).await? {
            tracing::debug!(user = %user_id, "session authenticated");
            self.user = Some(user_id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Clears the session identity. Idempotent.
    pub fn logout(&mut self) {
        self.user = None;
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Returns true if a user is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the authenticated user or `Unauthenticated`.
    pub fn require_user(&self) -> AppResult<&UserId> {
        self.user.as_ref().ok_or(AppError::Unauthenticated)
    }
}
