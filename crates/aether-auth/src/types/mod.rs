//! Domain types for the authorization server.

pub mod client;
pub mod code;
pub mod consent;
pub mod token;

pub use client::{Client, ClientValidationError, GrantType};
pub use code::AuthorizationCode;
pub use consent::ConsentGrant;
pub use token::{AccessTokenRecord, RefreshTokenRecord};
