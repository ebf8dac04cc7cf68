//! Authorization code storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::AuthorizationCode;

/// Storage backend for single-use authorization codes.
#[async_trait]
pub trait AuthorizationCodeStorage: Send + Sync {
    /// Persists a freshly issued code.
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()>;

    /// Atomically fetches and deletes a code.
    ///
    /// A code is returned at most once across all concurrent callers;
    /// losers and repeat redeemers observe `None`. Expired codes are also
    /// reported as `None` and removed.
    async fn claim(&self, code: &str) -> AuthResult<Option<AuthorizationCode>>;

    /// Removes expired codes. Returns the number removed.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
