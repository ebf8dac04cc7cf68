//! In-memory authorization code store.

use std::collections::HashMap;

use aether_auth::AuthResult;
use aether_auth::storage::AuthorizationCodeStorage;
use aether_auth::types::AuthorizationCode;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;

/// Authorization codes held in memory, keyed by code value.
#[derive(Default)]
pub struct MemoryAuthorizationCodeStorage {
    codes: RwLock<HashMap<String, AuthorizationCode>>,
}

impl MemoryAuthorizationCodeStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationCodeStorage for MemoryAuthorizationCodeStorage {
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()> {
        self.codes
            .write()
            .await
            .insert(code.code.clone(), code.clone());
        Ok(())
    }

    async fn claim(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
        // Remove under the write lock so exactly one caller wins.
        let claimed = self.codes.write().await.remove(code);

        match claimed {
            Some(stored) if stored.is_expired(OffsetDateTime::now_utc()) => {
                debug!(client_id = %stored.client_id, "claimed code was expired");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now = OffsetDateTime::now_utc();
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, code| !code.is_expired(now));
        Ok((before - codes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::Duration;

    fn make_code(value: &str, expires_at: OffsetDateTime) -> AuthorizationCode {
        AuthorizationCode {
            code: value.to_string(),
            client_id: "c1".to_string(),
            subject_id: "user-1".to_string(),
            redirect_uri: "https://app/cb".to_string(),
            scopes: vec!["openid".to_string()],
            nonce: None,
            code_challenge: None,
            code_challenge_method: None,
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_claim_is_single_use() {
        let storage = MemoryAuthorizationCodeStorage::new();
        let code = make_code("abc", OffsetDateTime::now_utc() + Duration::minutes(10));
        storage.create(&code).await.unwrap();

        assert!(storage.claim("abc").await.unwrap().is_some());
        assert!(storage.claim("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_claims_yield_one_winner() {
        let storage = Arc::new(MemoryAuthorizationCodeStorage::new());
        let code = make_code("abc", OffsetDateTime::now_utc() + Duration::minutes(10));
        storage.create(&code).await.unwrap();

        let a = {
            let storage = storage.clone();
            tokio::spawn(async move { storage.claim("abc").await.unwrap() })
        };
        let b = {
            let storage = storage.clone();
            tokio::spawn(async move { storage.claim("abc").await.unwrap() })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
    }

    #[tokio::test]
    async fn test_expired_code_claims_as_absent() {
        let storage = MemoryAuthorizationCodeStorage::new();
        let code = make_code("old", OffsetDateTime::now_utc() - Duration::seconds(1));
        storage.create(&code).await.unwrap();

        assert!(storage.claim("old").await.unwrap().is_none());
        // And it was removed, not left behind.
        assert!(storage.claim("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let storage = MemoryAuthorizationCodeStorage::new();
        let now = OffsetDateTime::now_utc();
        storage.create(&make_code("live", now + Duration::minutes(10))).await.unwrap();
        storage.create(&make_code("dead", now - Duration::seconds(1))).await.unwrap();

        assert_eq!(storage.cleanup_expired().await.unwrap(), 1);
        assert!(storage.claim("live").await.unwrap().is_some());
    }
}
