//! In-memory client registry.

use std::collections::HashMap;

use aether_auth::AuthResult;
use aether_auth::storage::ClientStorage;
use aether_auth::types::Client;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::verify_secret_hash;

/// Client registry held in memory, keyed by `client_id`.
#[derive(Default)]
pub struct MemoryClientStorage {
    clients: RwLock<HashMap<String, Client>>,
}

impl MemoryClientStorage {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for MemoryClientStorage {
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }

    async fn create(&self, client: &Client) -> AuthResult<()> {
        debug!(client_id = %client.client_id, "registering client");
        self.clients
            .write()
            .await
            .insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn delete(&self, client_id: &str) -> AuthResult<bool> {
        Ok(self.clients.write().await.remove(client_id).is_some())
    }

    async fn verify_secret(&self, client_id: &str, secret: &str) -> AuthResult<bool> {
        let hash = {
            let clients = self.clients.read().await;
            match clients.get(client_id) {
                Some(client) => client.client_secret.clone(),
                None => return Ok(false),
            }
        };
        Ok(verify_secret_hash(&hash, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_secret;
    use aether_auth::types::GrantType;

    fn make_client() -> Client {
        Client {
            client_id: "c1".to_string(),
            client_secret: hash_secret("s1").unwrap(),
            name: "Client One".to_string(),
            redirect_uris: vec!["https://app/cb".to_string()],
            scopes: vec!["openid".to_string()],
            grant_types: vec![GrantType::AuthorizationCode],
            active: true,
        }
    }

    #[tokio::test]
    async fn test_create_find_delete() {
        let storage = MemoryClientStorage::new();
        storage.create(&make_client()).await.unwrap();

        let found = storage.find_by_client_id("c1").await.unwrap().unwrap();
        assert_eq!(found.name, "Client One");
        assert!(storage.find_by_client_id("c2").await.unwrap().is_none());

        assert!(storage.delete("c1").await.unwrap());
        assert!(!storage.delete("c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_secret() {
        let storage = MemoryClientStorage::new();
        storage.create(&make_client()).await.unwrap();

        assert!(storage.verify_secret("c1", "s1").await.unwrap());
        assert!(!storage.verify_secret("c1", "wrong").await.unwrap());
        assert!(!storage.verify_secret("unknown", "s1").await.unwrap());
    }
}
