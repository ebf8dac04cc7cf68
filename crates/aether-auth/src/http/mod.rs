//! HTTP handlers for the OAuth 2.0 / OpenID Connect endpoints.
//!
//! Each endpoint carries its own state struct; the server crate wires
//! them into a router.

pub mod authorize;
pub mod discovery;
pub mod introspect;
pub mod jwks;
pub mod revoke;
pub mod token;
pub mod userinfo;

pub use authorize::{AuthorizeState, SESSION_COOKIE, authorize_handler};
pub use discovery::{DiscoveryState, ProviderMetadata, discovery_handler};
pub use introspect::{IntrospectState, introspect_handler};
pub use jwks::{JwksState, jwks_handler};
pub use revoke::{RevokeState, revoke_handler};
pub use token::{TokenEndpointState, token_handler};
pub use userinfo::{UserinfoState, userinfo_handler};
