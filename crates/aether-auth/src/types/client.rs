//! OAuth 2.0 client domain types.
//!
//! This module defines the `Client` struct and related types for OAuth 2.0
//! client registrations.

use serde::{Deserialize, Serialize};

// =============================================================================
// Grant Type
// =============================================================================

/// OAuth 2.0 grant types.
///
/// Defines the authorization flows a client is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Authorization Code flow.
    AuthorizationCode,
    /// Refresh Token flow.
    RefreshToken,
    /// Resource Owner Password Credentials flow.
    /// WARNING: legacy grant type, intended for trusted first-party
    /// applications only.
    Password,
    /// Client Credentials flow (machine clients).
    ClientCredentials,
}

impl GrantType {
    /// Returns the OAuth 2.0 grant_type parameter value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl std::fmt::Display for GrantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// OAuth 2.0 client registration.
///
/// All registered clients are confidential: they hold a secret and must
/// authenticate with it on every token endpoint call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub client_id: String,

    /// Argon2-hashed client secret. Never serialized in API responses.
    #[serde(skip_serializing)]
    pub client_secret: String,

    /// Human-readable display name.
    pub name: String,

    /// Allowed redirect URIs for the authorization code and implicit flows.
    /// Matching is byte-exact.
    #[serde(default)]
    pub redirect_uris: Vec<String>,

    /// OAuth scopes this client is allowed to request.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// OAuth 2.0 grant types this client is allowed to use.
    pub grant_types: Vec<GrantType>,

    /// Whether this client is currently active and can be used.
    pub active: bool,
}

impl Client {
    /// Validates the client registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration is invalid.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }

        if self.client_secret.is_empty() {
            return Err(ClientValidationError::MissingSecret);
        }

        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if self.grant_types.is_empty() {
            return Err(ClientValidationError::NoGrantTypes);
        }

        // Authorization code flow requires redirect URIs
        if self.grant_types.contains(&GrantType::AuthorizationCode) && self.redirect_uris.is_empty()
        {
            return Err(ClientValidationError::NoRedirectUris);
        }

        Ok(())
    }

    /// Checks if the given redirect URI is allowed for this client.
    ///
    /// The comparison is an exact string match; no prefix or wildcard
    /// matching is performed.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }

    /// Checks if the given scope is allowed for this client.
    #[must_use]
    pub fn is_scope_allowed(&self, scope: &str) -> bool {
        self.scopes.iter().any(|allowed| allowed == scope)
    }

    /// Checks if the given grant type is allowed for this client.
    #[must_use]
    pub fn is_grant_type_allowed(&self, grant_type: GrantType) -> bool {
        self.grant_types.contains(&grant_type)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Errors that can occur during client validation.
#[derive(Debug, thiserror::Error)]
pub enum ClientValidationError {
    /// Client ID cannot be empty.
    #[error("Client ID cannot be empty")]
    EmptyClientId,

    /// Clients require a hashed secret.
    #[error("Clients require a client secret")]
    MissingSecret,

    /// Client name cannot be empty.
    #[error("Client name cannot be empty")]
    EmptyName,

    /// At least one grant type is required.
    #[error("At least one grant type is required")]
    NoGrantTypes,

    /// Authorization code flow requires redirect URIs.
    #[error("Authorization code flow requires redirect URIs")]
    NoRedirectUris,
}

// =============================================================================
// Tests
// =============================================================================
