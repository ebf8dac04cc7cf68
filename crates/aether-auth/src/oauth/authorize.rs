//! Authorization endpoint request and response types.
//!
//! Redirect-based error reporting is only used after the client and its
//! redirect URI have been validated. Until then, errors never leave the
//! authorization server via redirect.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;

// =============================================================================
// Authorization Request
// =============================================================================

/// Query parameters of an authorization request.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// `code` for the authorization code flow, `token` for implicit.
    pub response_type: String,

    /// The requesting client.
    pub client_id: String,

    /// Where to redirect after authorization. Must exactly match a
    /// registered URI.
    pub redirect_uri: String,

    /// Requested scope, space-delimited.
    #[serde(default)]
    pub scope: Option<String>,

    /// Opaque client state echoed back on the redirect.
    #[serde(default)]
    pub state: Option<String>,

    /// OpenID Connect nonce, bound into the ID token.
    #[serde(default)]
    pub nonce: Option<String>,

    /// PKCE code challenge.
    #[serde(default)]
    pub code_challenge: Option<String>,

    /// PKCE challenge method (`S256` or `plain`).
    #[serde(default)]
    pub code_challenge_method: Option<String>,
}

// =============================================================================
// Success Redirects
// =============================================================================

/// Builds the success redirect for the authorization code flow.
///
/// Appends `code` and, when present, `state` to the redirect URI's query.
///
/// # Errors
///
/// Returns an error when the redirect URI does not parse.
pub fn code_redirect_url(
    redirect_uri: &str,
    code: &str,
    state: Option<&str>,
) -> Result<String, AuthError> {
    let mut url = parse_redirect_uri(redirect_uri)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("code", code);
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }
    Ok(url.into())
}

/// Tokens delivered by the implicit flow.
#[derive(Debug, Clone)]
pub struct ImplicitGrant {
    pub access_token: String,
    pub expires_in: u64,
    pub scope: String,
    pub id_token: Option<String>,
}

/// Builds the success redirect for the implicit flow.
///
/// Token material travels in the URI fragment, never the query, so it is
/// not sent to the redirect target's server.
///
/// # Errors
///
/// Returns an error when the redirect URI does not parse.
pub fn implicit_redirect_url(
    redirect_uri: &str,
    grant: &ImplicitGrant,
    state: Option<&str>,
) -> Result<String, AuthError> {
    let mut url = parse_redirect_uri(redirect_uri)?;

    let mut fragment = url::form_urlencoded::Serializer::new(String::new());
    fragment.append_pair("access_token", &grant.access_token);
    fragment.append_pair("token_type", "Bearer");
    fragment.append_pair("expires_in", &grant.expires_in.to_string());
    fragment.append_pair("scope", &grant.scope);
    if let Some(id_token) = &grant.id_token {
        fragment.append_pair("id_token", id_token);
    }
    if let Some(state) = state {
        fragment.append_pair("state", state);
    }

    url.set_fragment(Some(&fragment.finish()));
    Ok(url.into())
}

// =============================================================================
// Error Redirects
// =============================================================================

/// RFC 6749 authorization endpoint error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    InvalidRequest,
    UnauthorizedClient,
    AccessDenied,
    UnsupportedResponseType,
    InvalidScope,
    ServerError,
}

impl AuthorizationErrorCode {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::ServerError => "server_error",
        }
    }
}

/// Builds an error redirect back to a validated redirect URI.
///
/// # Errors
///
/// Returns an error when the redirect URI does not parse.
pub fn error_redirect_url(
    redirect_uri: &str,
    error: AuthorizationErrorCode,
    description: &str,
    state: Option<&str>,
) -> Result<String, AuthError> {
    let mut url = parse_redirect_uri(redirect_uri)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("error", error.as_str());
        pairs.append_pair("error_description", description);
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }
    Ok(url.into())
}

// =============================================================================
// Login Redirect
// =============================================================================

/// Builds the login page redirect for an unauthenticated authorization
/// request.
///
/// The original authorization parameters are carried along so the login
/// page can resume the flow after the user signs in, with `oauth=true`
/// marking the request as part of an OAuth flow.
///
/// # Errors
///
/// Returns a configuration error when `login_url` does not parse.
pub fn login_redirect_url(
    login_url: &str,
    request: &AuthorizationRequest,
) -> Result<String, AuthError> {
    let mut url = Url::parse(login_url)
        .map_err(|e| AuthError::configuration(format!("invalid login_url: {e}")))?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("oauth", "true");
        pairs.append_pair("response_type", &request.response_type);
        pairs.append_pair("client_id", &request.client_id);
        pairs.append_pair("redirect_uri", &request.redirect_uri);
        if let Some(scope) = &request.scope {
            pairs.append_pair("scope", scope);
        }
        if let Some(state) = &request.state {
            pairs.append_pair("state", state);
        }
        if let Some(nonce) = &request.nonce {
            pairs.append_pair("nonce", nonce);
        }
        if let Some(challenge) = &request.code_challenge {
            pairs.append_pair("code_challenge", challenge);
        }
        if let Some(method) = &request.code_challenge_method {
            pairs.append_pair("code_challenge_method", method);
        }
    }

    Ok(url.into())
}

fn parse_redirect_uri(redirect_uri: &str) -> Result<Url, AuthError> {
    Url::parse(redirect_uri)
        .map_err(|e| AuthError::invalid_request(format!("invalid redirect_uri: {e}")))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> AuthorizationRequest {
        AuthorizationRequest {
            response_type: "code".to_string(),
            client_id: "c1".to_string(),
            redirect_uri: "https://app.example.com/cb".to_string(),
            scope: Some("openid profile".to_string()),
            state: Some("xyz".to_string()),
            nonce: None,
            code_challenge: None,
            code_challenge_method: None,
        }
    }

    #[test]
    fn test_code_redirect_url() {
        let url = code_redirect_url("https://app.example.com/cb", "abc123", Some("xyz")).unwrap();
        assert_eq!(url, "https://app.example.com/cb?code=abc123&state=xyz");
    }

    #[test]
    fn test_code_redirect_preserves_existing_query() {
        let url = code_redirect_url("https://app.example.com/cb?tenant=t1", "abc", None).unwrap();
        assert_eq!(url, "https://app.example.com/cb?tenant=t1&code=abc");
    }

    #[test]
    fn test_implicit_redirect_uses_fragment() {
        let grant = ImplicitGrant {
            access_token: "jwt".to_string(),
            expires_in: 900,
            scope: "openid".to_string(),
            id_token: Some("idt".to_string()),
        };
        let url = implicit_redirect_url("https://app.example.com/cb", &grant, Some("s")).unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert!(parsed.query().is_none());
        let fragment = parsed.fragment().unwrap();
        assert!(fragment.contains("access_token=jwt"));
        assert!(fragment.contains("token_type=Bearer"));
        assert!(fragment.contains("expires_in=900"));
        assert!(fragment.contains("id_token=idt"));
        assert!(fragment.contains("state=s"));
    }

    #[test]
    fn test_error_redirect_url() {
        let url = error_redirect_url(
            "https://app.example.com/cb",
            AuthorizationErrorCode::InvalidScope,
            "no valid scopes",
            Some("xyz"),
        )
        .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let query = parsed.query().unwrap();
        assert!(query.contains("error=invalid_scope"));
        assert!(query.contains("state=xyz"));
    }

    #[test]
    fn test_login_redirect_carries_flow_parameters() {
        let url = login_redirect_url("https://id.example.com/login", &make_request()).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("oauth".to_string(), "true".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "c1".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "openid profile".to_string())));
        assert!(pairs.contains(&("state".to_string(), "xyz".to_string())));
    }

    #[test]
    fn test_invalid_redirect_uri_rejected() {
        assert!(code_redirect_url("not a url", "abc", None).is_err());
    }
}
