//! Consent records.

use time::OffsetDateTime;

/// A record of a subject granting a scope set to a client.
///
/// Consent is currently implicit: a successful authorization records the
/// grant without a consent screen. The record keeps an audit trail and lets
/// future authorizations skip re-prompting.
#[derive(Debug, Clone)]
pub struct ConsentGrant {
    /// The subject who granted access.
    pub subject_id: String,

    /// The client access was granted to.
    pub client_id: String,

    /// The granted scope set.
    pub scopes: Vec<String>,

    /// When the grant was first recorded or last updated.
    pub granted_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_grant_fields() {
        let grant = ConsentGrant {
            subject_id: "user-1".to_string(),
            client_id: "c1".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string()],
            granted_at: OffsetDateTime::now_utc(),
        };
        assert_eq!(grant.scopes.len(), 2);
    }
}
