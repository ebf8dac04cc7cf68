//! In-memory access and refresh token stores.

use std::collections::HashMap;

use aether_auth::AuthResult;
use aether_auth::storage::{AccessTokenStorage, RefreshTokenStorage};
use aether_auth::types::{AccessTokenRecord, RefreshTokenRecord};
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// Access token records held in memory, keyed by token value.
#[derive(Default)]
pub struct MemoryAccessTokenStorage {
    tokens: RwLock<HashMap<String, AccessTokenRecord>>,
}

impl MemoryAccessTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessTokenStorage for MemoryAccessTokenStorage {
    async fn create(&self, record: &AccessTokenRecord) -> AuthResult<()> {
        self.tokens
            .write()
            .await
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AccessTokenRecord>> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token)
            .filter(|record| !record.is_expired(OffsetDateTime::now_utc()))
            .cloned())
    }

    async fn delete(&self, token: &str) -> AuthResult<bool> {
        Ok(self.tokens.write().await.remove(token).is_some())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| !record.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}

/// Refresh tokens held in memory, keyed by token value.
#[derive(Default)]
pub struct MemoryRefreshTokenStorage {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl MemoryRefreshTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStorage for MemoryRefreshTokenStorage {
    async fn create(&self, record: &RefreshTokenRecord) -> AuthResult<()> {
        self.tokens
            .write()
            .await
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token)
            .filter(|record| !record.is_expired(OffsetDateTime::now_utc()))
            .cloned())
    }

    async fn delete(&self, token: &str) -> AuthResult<bool> {
        Ok(self.tokens.write().await.remove(token).is_some())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| !record.is_expired(now));
        Ok((before - tokens.len()) as u64)
    }
}
