//! Client authentication for the token and revocation endpoints.
//!
//! Clients authenticate with HTTP Basic (`client_secret_basic`) or with
//! `client_id`/`client_secret` in the form body (`client_secret_post`).
//! Basic credentials take precedence when both are present.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::AuthError;
use crate::storage::ClientStorage;
use crate::types::Client;

/// Client credentials extracted from a request.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Parses an `Authorization: Basic` header value into credentials.
///
/// Returns `None` when the header is absent, not Basic, or malformed.
#[must_use]
pub fn parse_basic_auth(header_value: &str) -> Option<ClientCredentials> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (client_id, client_secret) = decoded.split_once(':')?;

    Some(ClientCredentials {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    })
}

/// Resolves client credentials from the Basic header and the form body.
///
/// # Errors
///
/// Returns `invalid_client` when no credentials are present.
pub fn resolve_credentials(
    basic_header: Option<&str>,
    body_client_id: Option<&str>,
    body_client_secret: Option<&str>,
) -> Result<ClientCredentials, AuthError> {
    if let Some(credentials) = basic_header.and_then(parse_basic_auth) {
        return Ok(credentials);
    }

    match (body_client_id, body_client_secret) {
        (Some(id), Some(secret)) if !id.is_empty() => Ok(ClientCredentials {
            client_id: id.to_string(),
            client_secret: secret.to_string(),
        }),
        _ => Err(AuthError::invalid_client("client authentication required")),
    }
}

/// Authenticates a client against the registry.
///
/// # Errors
///
/// Returns `invalid_client` for unknown clients, inactive clients, and
/// secret mismatches. The three cases are deliberately indistinguishable
/// to the caller.
pub async fn authenticate_client(
    credentials: &ClientCredentials,
    clients: &dyn ClientStorage,
) -> Result<Client, AuthError> {
    let Some(client) = clients.find_by_client_id(&credentials.client_id).await? else {
        debug!(client_id = %credentials.client_id, "client authentication failed: unknown client");
        return Err(AuthError::invalid_client("client authentication failed"));
    };

    if !client.active {
        debug!(client_id = %client.client_id, "client authentication failed: inactive client");
        return Err(AuthError::invalid_client("client authentication failed"));
    }

    if !clients
        .verify_secret(&credentials.client_id, &credentials.client_secret)
        .await?
    {
        debug!(client_id = %client.client_id, "client authentication failed: secret mismatch");
        return Err(AuthError::invalid_client("client authentication failed"));
    }

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_auth() {
        // base64("c1:s1")
        let credentials = parse_basic_auth("Basic YzE6czE=").unwrap();
        assert_eq!(credentials.client_id, "c1");
        assert_eq!(credentials.client_secret, "s1");
    }

    #[test]
    fn test_parse_basic_auth_secret_with_colon() {
        // base64("c1:se:cret")
        let credentials = parse_basic_auth("Basic YzE6c2U6Y3JldA==").unwrap();
        assert_eq!(credentials.client_id, "c1");
        assert_eq!(credentials.client_secret, "se:cret");
    }

    #[test]
    fn test_parse_basic_auth_rejects_malformed() {
        assert!(parse_basic_auth("Bearer abc").is_none());
        assert!(parse_basic_auth("Basic !!!").is_none());
        // base64("no-colon")
        assert!(parse_basic_auth("Basic bm8tY29sb24=").is_none());
    }

    #[test]
    fn test_resolve_prefers_basic() {
        let credentials =
            resolve_credentials(Some("Basic YzE6czE="), Some("other"), Some("other")).unwrap();
        assert_eq!(credentials.client_id, "c1");
    }

    #[test]
    fn test_resolve_falls_back_to_body() {
        let credentials = resolve_credentials(None, Some("c2"), Some("s2")).unwrap();
        assert_eq!(credentials.client_id, "c2");
        assert_eq!(credentials.client_secret, "s2");
    }

    #[test]
    fn test_resolve_requires_credentials() {
        assert!(matches!(
            resolve_credentials(None, None, None),
            Err(AuthError::InvalidClient { .. })
        ));
        assert!(resolve_credentials(None, Some(""), Some("s")).is_err());
    }
}
