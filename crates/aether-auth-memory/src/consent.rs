//! In-memory consent store.

use std::collections::HashMap;

use aether_auth::AuthResult;
use aether_auth::storage::ConsentStorage;
use aether_auth::types::ConsentGrant;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Consent records held in memory, keyed by (subject, client).
#[derive(Default)]
pub struct MemoryConsentStorage {
    grants: RwLock<HashMap<(String, String), ConsentGrant>>,
}

impl MemoryConsentStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsentStorage for MemoryConsentStorage {
    async fn upsert(&self, grant: &ConsentGrant) -> AuthResult<()> {
        self.grants.write().await.insert(
            (grant.subject_id.clone(), grant.client_id.clone()),
            grant.clone(),
        );
        Ok(())
    }

    async fn find(&self, subject_id: &str, client_id: &str) -> AuthResult<Option<ConsentGrant>> {
        let grants = self.grants.read().await;
        Ok(grants
            .get(&(subject_id.to_string(), client_id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[tokio::test]
    async fn test_upsert_replaces_previous_grant() {
        let storage = MemoryConsentStorage::new();
        let mut grant = ConsentGrant {
            subject_id: "user-1".to_string(),
            client_id: "c1".to_string(),
            scopes: vec!["openid".to_string()],
            granted_at: OffsetDateTime::now_utc(),
        };
        storage.upsert(&grant).await.unwrap();

        grant.scopes.push("email".to_string());
        storage.upsert(&grant).await.unwrap();

        let found = storage.find("user-1", "c1").await.unwrap().unwrap();
        assert_eq!(found.scopes, vec!["openid", "email"]);
        assert!(storage.find("user-1", "c2").await.unwrap().is_none());
    }
}
