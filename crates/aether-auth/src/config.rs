//! Authorization server configuration.
//!
//! Configuration types for the OAuth 2.0 / OpenID Connect authorization
//! server: issuer identity, token lifetimes, scope policy, and signing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root authorization server configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// issuer = "https://id.example.com"
/// login_url = "https://id.example.com/login"
///
/// [auth.oauth]
/// access_token_lifetime = "15m"
/// refresh_token_lifetime = "30d"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Server issuer URL (used in token `iss` claim and discovery metadata).
    /// This should be the public base URL of the identity server.
    pub issuer: String,

    /// URL of the login surface. Unauthenticated authorization requests are
    /// redirected here with the original OAuth parameters preserved.
    pub login_url: String,

    /// OAuth 2.0 configuration.
    pub oauth: OAuthConfig,

    /// Scope policy configuration.
    pub scopes: ScopeConfig,

    /// Token signing configuration.
    pub signing: SigningConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            login_url: "http://localhost:3000/login".to_string(),
            oauth: OAuthConfig::default(),
            scopes: ScopeConfig::default(),
            signing: SigningConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.issuer)
            .map_err(|e| ConfigError::invalid("issuer", e.to_string()))?;
        url::Url::parse(&self.login_url)
            .map_err(|e| ConfigError::invalid("login_url", e.to_string()))?;

        if self.oauth.access_token_lifetime.is_zero() {
            return Err(ConfigError::invalid(
                "oauth.access_token_lifetime",
                "must be greater than zero",
            ));
        }
        if self.oauth.authorization_code_lifetime.is_zero() {
            return Err(ConfigError::invalid(
                "oauth.authorization_code_lifetime",
                "must be greater than zero",
            ));
        }
        if self.scopes.default.is_empty() {
            return Err(ConfigError::invalid(
                "scopes.default",
                "at least one default scope is required",
            ));
        }

        Ok(())
    }
}

/// OAuth 2.0 configuration.
///
/// Controls token lifetimes and allowed grant types.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Authorization code lifetime.
    /// Codes should be short-lived for security.
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    /// Can be longer since refresh tokens require client authentication.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// Allowed OAuth 2.0 grant types, advertised in discovery metadata.
    pub grant_types: Vec<String>,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            authorization_code_lifetime: Duration::from_secs(600), // 10 minutes
            access_token_lifetime: Duration::from_secs(900),       // 15 minutes
            refresh_token_lifetime: Duration::from_secs(30 * 24 * 3600), // 30 days
            grant_types: vec![
                "authorization_code".to_string(),
                "refresh_token".to_string(),
                "password".to_string(),
                "client_credentials".to_string(),
            ],
        }
    }
}

/// Scope policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Default scope set granted when a user-delegated request carries no
    /// scope parameter.
    pub default: Vec<String>,

    /// Scope set granted to machine clients via the client credentials grant.
    pub service: Vec<String>,

    /// Scopes advertised in discovery metadata.
    pub supported: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            default: vec![
                "openid".to_string(),
                "profile".to_string(),
                "email".to_string(),
            ],
            service: vec!["api".to_string()],
            supported: vec![
                "openid".to_string(),
                "profile".to_string(),
                "email".to_string(),
                "api".to_string(),
            ],
        }
    }
}

/// Token signing configuration.
///
/// The server signs with a single static RSA key. The key is either loaded
/// from PEM files or generated at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Signing algorithm. Supported: "RS256", "RS384".
    pub algorithm: String,

    /// Path to a PEM-encoded private key. Generated at startup if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            algorithm: "RS256".to_string(),
            private_key_path: None,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, thiserror::Error)]
#[error("Invalid configuration for '{field}': {message}")]
pub struct ConfigError {
    /// The configuration field that failed validation.
    pub field: String,
    /// Description of the problem.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
