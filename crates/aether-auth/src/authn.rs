//! End-user authentication.
//!
//! The authorization server does not own user accounts; it delegates
//! credential checks and session resolution to an [`Authenticator`]
//! implementation.

use async_trait::async_trait;

use crate::AuthResult;

/// An authenticated end user.
#[derive(Debug, Clone)]
pub struct Subject {
    /// Stable subject identifier, used as the `sub` claim.
    pub id: String,

    /// Login name.
    pub username: String,

    /// Email address, if known.
    pub email: Option<String>,

    /// Display name, if known.
    pub name: Option<String>,

    /// Whether the email address has been verified.
    pub email_verified: bool,
}

/// Verifies user credentials and resolves sessions.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Checks a username/password pair. Returns `None` on mismatch or
    /// unknown user; the two cases are indistinguishable.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<Subject>>;

    /// Resolves a session token to its subject. Returns `None` for unknown
    /// or expired sessions.
    async fn resolve_session(&self, session_token: &str) -> AuthResult<Option<Subject>>;

    /// Looks up a subject by its stable identifier.
    async fn find_by_id(&self, subject_id: &str) -> AuthResult<Option<Subject>>;
}
