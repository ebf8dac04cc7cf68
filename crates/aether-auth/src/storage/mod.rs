//! Storage traits for the authorization server.
//!
//! Backends implement these traits and are injected as `Arc<dyn _>` at
//! service construction time.

pub mod client;
pub mod code;
pub mod consent;
pub mod token;

pub use client::ClientStorage;
pub use code::AuthorizationCodeStorage;
pub use consent::ConsentStorage;
pub use token::{AccessTokenStorage, RefreshTokenStorage};
