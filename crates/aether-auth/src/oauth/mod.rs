//! OAuth 2.0 protocol types and flow building blocks.

pub mod authorize;
pub mod client_auth;
pub mod grant;
pub mod pkce;
pub mod scope;
pub mod token;

pub use authorize::{AuthorizationErrorCode, AuthorizationRequest, ImplicitGrant};
pub use client_auth::{ClientCredentials, authenticate_client, parse_basic_auth};
pub use grant::Grant;
pub use pkce::PkceChallengeMethod;
pub use scope::{join_scopes, narrow_scopes, parse_scopes};
pub use token::{TokenError, TokenErrorCode, TokenRequest, TokenResponse};
