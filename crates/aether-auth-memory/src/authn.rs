//! In-memory user authentication.

use std::collections::HashMap;

use aether_auth::authn::{Authenticator, Subject};
use aether_auth::{AuthError, AuthResult};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{hash_secret, verify_secret_hash};

struct UserRecord {
    subject: Subject,
    password_hash: String,
}

/// User accounts and login sessions held in memory.
///
/// The session map is populated by whatever login surface fronts this
/// server; the authorization endpoint only resolves tokens from it.
#[derive(Default)]
pub struct MemoryAuthenticator {
    users: RwLock<HashMap<String, UserRecord>>,
    sessions: RwLock<HashMap<String, String>>,
}

impl MemoryAuthenticator {
    /// Creates an empty authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user account, hashing the password. Returns the created
    /// subject.
    ///
    /// # Errors
    ///
    /// Returns an error when the username is already taken or hashing
    /// fails.
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
        name: Option<String>,
    ) -> AuthResult<Subject> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(AuthError::invalid_request(format!(
                "username already taken: {username}"
            )));
        }

        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email,
            name,
            email_verified: false,
        };
        users.insert(
            username.to_string(),
            UserRecord {
                subject: subject.clone(),
                password_hash: hash_secret(password)?,
            },
        );

        debug!(username, subject_id = %subject.id, "user added");
        Ok(subject)
    }

    /// Registers a login session token for a subject.
    pub async fn add_session(&self, session_token: &str, subject_id: &str) {
        self.sessions
            .write()
            .await
            .insert(session_token.to_string(), subject_id.to_string());
    }

    /// Removes a login session.
    pub async fn remove_session(&self, session_token: &str) -> bool {
        self.sessions.write().await.remove(session_token).is_some()
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<Subject>> {
        let users = self.users.read().await;
        let Some(record) = users.get(username) else {
            return Ok(None);
        };

        if verify_secret_hash(&record.password_hash, password) {
            Ok(Some(record.subject.clone()))
        } else {
            debug!(username, "password verification failed");
            Ok(None)
        }
    }

    async fn resolve_session(&self, session_token: &str) -> AuthResult<Option<Subject>> {
        let subject_id = {
            let sessions = self.sessions.read().await;
            match sessions.get(session_token) {
                Some(id) => id.clone(),
                None => return Ok(None),
            }
        };
        self.find_by_id(&subject_id).await
    }

    async fn find_by_id(&self, subject_id: &str) -> AuthResult<Option<Subject>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|record| record.subject.id == subject_id)
            .map(|record| record.subject.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_credential_verification() {
        let authn = MemoryAuthenticator::new();
        let subject = authn
            .add_user("alice", "secret", Some("alice@example.com".to_string()), None)
            .await
            .unwrap();

        let verified = authn.verify_credentials("alice", "secret").await.unwrap();
        assert_eq!(verified.unwrap().id, subject.id);

        assert!(authn.verify_credentials("alice", "wrong").await.unwrap().is_none());
        assert!(authn.verify_credentials("bob", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let authn = MemoryAuthenticator::new();
        authn.add_user("alice", "a", None, None).await.unwrap();
        assert!(authn.add_user("alice", "b", None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_session_resolution() {
        let authn = MemoryAuthenticator::new();
        let subject = authn.add_user("alice", "secret", None, None).await.unwrap();
        authn.add_session("tok123", &subject.id).await;

        let resolved = authn.resolve_session("tok123").await.unwrap();
        assert_eq!(resolved.unwrap().id, subject.id);
        assert!(authn.resolve_session("other").await.unwrap().is_none());

        assert!(authn.remove_session("tok123").await);
        assert!(authn.resolve_session("tok123").await.unwrap().is_none());
    }
}
