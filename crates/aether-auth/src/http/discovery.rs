//! OpenID Connect discovery handler
//! (`GET /.well-known/openid-configuration`).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::config::AuthConfig;

/// Provider metadata served from the discovery endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub introspection_endpoint: String,
    pub revocation_endpoint: String,
    pub userinfo_endpoint: String,
    pub jwks_uri: String,
    pub scopes_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
}

impl ProviderMetadata {
    /// Builds the metadata document from the server configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let base = config.issuer.trim_end_matches('/');

        Self {
            issuer: config.issuer.clone(),
            authorization_endpoint: format!("{base}/oauth/authorize"),
            token_endpoint: format!("{base}/oauth/token"),
            introspection_endpoint: format!("{base}/oauth/introspect"),
            revocation_endpoint: format!("{base}/oauth/revoke"),
            userinfo_endpoint: format!("{base}/oauth/userinfo"),
            jwks_uri: format!("{base}/.well-known/jwks.json"),
            scopes_supported: config.scopes.supported.clone(),
            response_types_supported: vec!["code".to_string(), "token".to_string()],
            grant_types_supported: config.oauth.grant_types.clone(),
            token_endpoint_auth_methods_supported: vec![
                "client_secret_basic".to_string(),
                "client_secret_post".to_string(),
            ],
            code_challenge_methods_supported: vec!["S256".to_string(), "plain".to_string()],
            subject_types_supported: vec!["public".to_string()],
            id_token_signing_alg_values_supported: vec![config.signing.algorithm.clone()],
        }
    }
}

/// State for the discovery endpoint.
#[derive(Clone)]
pub struct DiscoveryState {
    pub metadata: Arc<ProviderMetadata>,
}

/// Serves the provider metadata document.
pub async fn discovery_handler(State(state): State<DiscoveryState>) -> Response {
    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(state.metadata.as_ref().clone()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_endpoints_derive_from_issuer() {
        let config = AuthConfig {
            issuer: "https://id.example.com/".to_string(),
            ..AuthConfig::default()
        };
        let metadata = ProviderMetadata::from_config(&config);

        assert_eq!(metadata.issuer, "https://id.example.com/");
        assert_eq!(
            metadata.authorization_endpoint,
            "https://id.example.com/oauth/authorize"
        );
        assert_eq!(metadata.jwks_uri, "https://id.example.com/.well-known/jwks.json");
        assert_eq!(metadata.response_types_supported, vec!["code", "token"]);
        assert_eq!(
            metadata.code_challenge_methods_supported,
            vec!["S256", "plain"]
        );
        assert_eq!(metadata.id_token_signing_alg_values_supported, vec!["RS256"]);
    }
}
