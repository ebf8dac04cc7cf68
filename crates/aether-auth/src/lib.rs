//! OAuth 2.0 / OpenID Connect authorization server core.
//!
//! This crate implements the protocol surface of the Aether identity
//! server: client registration and authentication, the authorization
//! code and implicit browser flows, token issuance for four grant
//! types, token introspection and revocation, and the OpenID Connect
//! discovery documents.
//!
//! Storage and end-user authentication are abstracted behind traits in
//! [`storage`] and [`authn`]; backends are injected as `Arc<dyn _>` at
//! construction time.
//!
//! # Architecture
//!
//! - [`types`] - domain types: clients, codes, token records, consent
//! - [`oauth`] - protocol types and flow building blocks
//! - [`token`] - JWT signing, issuance, introspection, revocation
//! - [`http`] - axum handlers for the protocol endpoints
//! - [`config`] - server configuration
//! - [`error`] - the crate-wide error type

pub mod authn;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod storage;
pub mod token;
pub mod types;

pub use error::{AuthError, ErrorCategory};

/// Result alias used throughout the crate.
pub type AuthResult<T> = Result<T, AuthError>;

/// Commonly used types, for glob import by server and backend crates.
pub mod prelude {
    pub use crate::authn::{Authenticator, Subject};
    pub use crate::config::AuthConfig;
    pub use crate::error::AuthError;
    pub use crate::oauth::{Grant, TokenRequest, TokenResponse};
    pub use crate::storage::{
        AccessTokenStorage, AuthorizationCodeStorage, ClientStorage, ConsentStorage,
        RefreshTokenStorage,
    };
    pub use crate::token::{JwtService, SigningAlgorithm, SigningKeyPair, TokenConfig, TokenService};
    pub use crate::types::{Client, GrantType};
    pub use crate::AuthResult;
}
