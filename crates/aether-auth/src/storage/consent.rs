//! Consent record storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::ConsentGrant;

/// Storage backend for consent records.
#[async_trait]
pub trait ConsentStorage: Send + Sync {
    /// Creates or updates the consent record for a (subject, client) pair.
    async fn upsert(&self, grant: &ConsentGrant) -> AuthResult<()>;

    /// Looks up the consent record for a (subject, client) pair.
    async fn find(&self, subject_id: &str, client_id: &str) -> AuthResult<Option<ConsentGrant>>;
}
