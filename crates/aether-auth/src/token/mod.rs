//! Token issuance, verification, introspection, and revocation.

pub mod introspection;
pub mod jwt;
pub mod revocation;
pub mod service;

pub use introspection::{IntrospectionRequest, IntrospectionResponse};
pub use jwt::{
    AccessTokenClaims, IdTokenClaims, Jwk, Jwks, JwtError, JwtService, SigningAlgorithm,
    SigningKeyPair,
};
pub use revocation::{RevocationRequest, TokenTypeHint};
pub use service::{TokenConfig, TokenService};
