//! Authorization code domain type.

use time::OffsetDateTime;

use crate::oauth::pkce::PkceChallengeMethod;

/// A single-use authorization code issued by the authorization endpoint.
///
/// Codes are opaque random strings bound to the client, the subject, the
/// redirect URI, and the granted scope set. They are short-lived and must
/// be redeemed at most once.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    /// The opaque code value (32 random bytes, hex-encoded).
    pub code: String,

    /// The client this code was issued to.
    pub client_id: String,

    /// The authenticated subject who approved the request.
    pub subject_id: String,

    /// The redirect URI the code was issued for. The token endpoint must
    /// receive the identical value.
    pub redirect_uri: String,

    /// The granted scope set.
    pub scopes: Vec<String>,

    /// OpenID Connect nonce from the authorization request, echoed into the
    /// ID token at redemption.
    pub nonce: Option<String>,

    /// PKCE code challenge, when the client supplied one.
    pub code_challenge: Option<String>,

    /// PKCE challenge method for `code_challenge`.
    pub code_challenge_method: Option<PkceChallengeMethod>,

    /// When this code expires. Expiry is checked lazily at redemption.
    pub expires_at: OffsetDateTime,
}

impl AuthorizationCode {
    /// Generates a fresh opaque code value.
    #[must_use]
    pub fn generate_value() -> String {
        use rand::Rng;
        let bytes: [u8; 32] = rand::thread_rng().r#gen();
        hex::encode(bytes)
    }

    /// Returns `true` if this code has expired.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
