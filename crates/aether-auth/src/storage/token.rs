//! Token storage traits.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{AccessTokenRecord, RefreshTokenRecord};

/// Storage backend for issued access token records.
#[async_trait]
pub trait AccessTokenStorage: Send + Sync {
    /// Persists an issued access token record.
    async fn create(&self, record: &AccessTokenRecord) -> AuthResult<()>;

    /// Looks up a record by token value. Expired records are reported as
    /// absent.
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AccessTokenRecord>>;

    /// Deletes a record. Returns `false` when it did not exist.
    async fn delete(&self, token: &str) -> AuthResult<bool>;

    /// Removes expired records. Returns the number removed.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Storage backend for refresh tokens.
#[async_trait]
pub trait RefreshTokenStorage: Send + Sync {
    /// Persists an issued refresh token.
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()>;

    /// Looks up a refresh token by value. Expired tokens are reported as
    /// absent.
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Deletes a refresh token. Returns `false` when it did not exist.
    async fn delete(&self, token: &str) -> AuthResult<bool>;

    /// Removes expired tokens. Returns the number removed.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}
