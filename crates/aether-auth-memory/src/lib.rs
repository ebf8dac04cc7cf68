//! In-memory storage backends for the Aether authorization server.
//!
//! Every backend keeps its data in a `tokio::sync::RwLock<HashMap>`.
//! State does not survive a restart; these backends are meant for
//! development, tests, and single-node deployments.

mod authn;
mod client;
mod code;
mod consent;
mod token;

pub use authn::MemoryAuthenticator;
pub use client::MemoryClientStorage;
pub use code::MemoryAuthorizationCodeStorage;
pub use consent::MemoryConsentStorage;
pub use token::{MemoryAccessTokenStorage, MemoryRefreshTokenStorage};

use aether_auth::{AuthError, AuthResult};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hashes a client secret or user password with Argon2id.
///
/// # Errors
///
/// Returns an internal error when hashing fails.
pub fn hash_secret(secret: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("secret hashing failed: {e}")))
}

/// Verifies a plaintext secret against an Argon2 hash.
///
/// Malformed hashes verify as `false` rather than erroring.
#[must_use]
pub(crate) fn verify_secret_hash(hash: &str, candidate: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
