//! Token endpoint request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Token Request
// =============================================================================

/// Form body of a token endpoint request.
///
/// Every field except `grant_type` is optional at the wire level; grant
/// construction validates that the fields required by the requested grant
/// are present.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Requested grant type.
    pub grant_type: String,

    /// Authorization code (authorization_code grant).
    #[serde(default)]
    pub code: Option<String>,

    /// Redirect URI the code was issued for (authorization_code grant).
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// PKCE code verifier (authorization_code grant).
    #[serde(default)]
    pub code_verifier: Option<String>,

    /// Refresh token value (refresh_token grant).
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Resource owner username (password grant).
    #[serde(default)]
    pub username: Option<String>,

    /// Resource owner password (password grant).
    #[serde(default)]
    pub password: Option<String>,

    /// Requested scope, space-delimited.
    #[serde(default)]
    pub scope: Option<String>,

    /// Client ID when authenticating via the form body instead of HTTP
    /// Basic.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret when authenticating via the form body.
    #[serde(default)]
    pub client_secret: Option<String>,
}

// =============================================================================
// Token Response
// =============================================================================

/// Successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token (a signed JWT).
    pub access_token: String,

    /// Always `Bearer`.
    pub token_type: String,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// Granted scope, space-delimited.
    pub scope: String,

    /// Refresh token, when the grant issues one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// OpenID Connect ID token, when the `openid` scope was granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl TokenResponse {
    /// Creates a bearer token response without refresh or ID tokens.
    #[must_use]
    pub fn new(access_token: String, expires_in: u64, scope: String) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            scope,
            refresh_token: None,
            id_token: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: String) -> Self {
        self.refresh_token = Some(refresh_token);
        self
    }

    /// Attaches an ID token.
    #[must_use]
    pub fn with_id_token(mut self, id_token: String) -> Self {
        self.id_token = Some(id_token);
        self
    }
}

// =============================================================================
// Token Error
// =============================================================================

/// RFC 6749 token endpoint error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenErrorCode {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    InvalidScope,
    UnauthorizedClient,
    UnsupportedGrantType,
    InvalidToken,
    ServerError,
}

impl TokenErrorCode {
    /// Maps a crate error to its token endpoint error code.
    #[must_use]
    pub fn from_auth_error(err: &crate::error::AuthError) -> Self {
        use crate::error::AuthError;
        match err {
            AuthError::InvalidClient { .. } => Self::InvalidClient,
            AuthError::InvalidGrant { .. } | AuthError::PkceVerificationFailed => Self::InvalidGrant,
            AuthError::InvalidScope { .. } => Self::InvalidScope,
            AuthError::InvalidToken { .. } | AuthError::TokenExpired => Self::InvalidToken,
            AuthError::InvalidRequest { .. }
            | AuthError::AccessDenied { .. }
            | AuthError::UnsupportedResponseType { .. } => Self::InvalidRequest,
            AuthError::UnsupportedGrantType { .. } => Self::UnsupportedGrantType,
            AuthError::Storage { .. }
            | AuthError::Configuration { .. }
            | AuthError::Internal { .. } => Self::ServerError,
        }
    }

    /// HTTP status for this error code.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidClient => 401,
            Self::ServerError => 500,
            _ => 400,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidScope => "invalid_scope",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::InvalidToken => "invalid_token",
            Self::ServerError => "server_error",
        }
    }
}

/// Token endpoint error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenError {
    /// Machine-readable error code.
    pub error: TokenErrorCode,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl TokenError {
    /// Creates a token error with a description.
    #[must_use]
    pub fn new(error: TokenErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_minimal() {
        let request: TokenRequest =
            serde_json::from_value(serde_json::json!({"grant_type": "client_credentials"}))
                .unwrap();
        assert_eq!(request.grant_type, "client_credentials");
        assert!(request.code.is_none());
        assert!(request.scope.is_none());
    }

    #[test]
    fn test_token_response_omits_absent_fields() {
        let response = TokenResponse::new("jwt".to_string(), 900, "openid".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"token_type\":\"Bearer\""));
        assert!(json.contains("\"expires_in\":900"));
        assert!(!json.contains("refresh_token"));
        assert!(!json.contains("id_token"));
    }

    #[test]
    fn test_token_response_with_extras() {
        let response = TokenResponse::new("jwt".to_string(), 900, "openid".to_string())
            .with_refresh_token("rt".to_string())
            .with_id_token("idt".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"refresh_token\":\"rt\""));
        assert!(json.contains("\"id_token\":\"idt\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TokenErrorCode::InvalidClient.http_status(), 401);
        assert_eq!(TokenErrorCode::InvalidGrant.http_status(), 400);
        assert_eq!(TokenErrorCode::ServerError.http_status(), 500);
        assert_eq!(
            serde_json::to_string(&TokenErrorCode::UnsupportedGrantType).unwrap(),
            "\"unsupported_grant_type\""
        );
    }
}
