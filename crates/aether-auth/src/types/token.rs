//! Persisted token records.
//!
//! Access tokens are self-contained JWTs; their records exist so that the
//! revocation endpoint has something to delete. Refresh tokens are opaque
//! values whose record is the source of truth for the granted scope set.

use time::OffsetDateTime;

/// A persisted access token record.
#[derive(Debug, Clone)]
pub struct AccessTokenRecord {
    /// The access token value (the signed JWT).
    pub token: String,

    /// The client the token was issued to.
    pub client_id: String,

    /// The subject, absent for client credentials tokens.
    pub subject_id: Option<String>,

    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

impl AccessTokenRecord {
    /// Returns `true` if this token has expired.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// A persisted refresh token record.
///
/// Refresh tokens are not rotated: redeeming one issues a new access token
/// while the refresh token value stays valid until expiry or revocation.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    /// The opaque refresh token value.
    pub token: String,

    /// The client the token was issued to.
    pub client_id: String,

    /// The subject the token acts on behalf of.
    pub subject_id: String,

    /// The scope set granted at issuance. Refreshed access and ID tokens
    /// carry exactly this set.
    pub scopes: Vec<String>,

    /// When the token expires.
    pub expires_at: OffsetDateTime,
}

impl RefreshTokenRecord {
    /// Generates a fresh opaque refresh token value.
    #[must_use]
    pub fn generate_value() -> String {
        use rand::Rng;
        let bytes: [u8; 32] = rand::thread_rng().r#gen();
        hex::encode(bytes)
    }

    /// Returns `true` if this token has expired.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
