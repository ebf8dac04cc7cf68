//! Client registry storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

/// Storage backend for OAuth client registrations.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Looks up a client by its `client_id`.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Registers a client. The `client_secret` field must already be
    /// hashed.
    async fn create(&self, client: &Client) -> AuthResult<()>;

    /// Removes a client registration. Returns `false` when the client did
    /// not exist.
    async fn delete(&self, client_id: &str) -> AuthResult<bool>;

    /// Verifies a plaintext secret against the stored hash.
    ///
    /// Returns `false` for unknown clients as well as mismatches.
    async fn verify_secret(&self, client_id: &str, secret: &str) -> AuthResult<bool>;
}
