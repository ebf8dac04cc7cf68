//! PKCE (Proof Key for Code Exchange) support per RFC 7636.
//!
//! Clients may bind an authorization code to a secret verifier by sending a
//! code challenge with the authorization request. The token endpoint then
//! requires the matching verifier. Both the `S256` and `plain` methods are
//! accepted; `S256` is strongly preferred and `plain` exists for legacy
//! clients that cannot hash.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

// =============================================================================
// Challenge Method
// =============================================================================

/// PKCE code challenge methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkceChallengeMethod {
    /// `S256`: challenge = BASE64URL(SHA256(verifier)). Recommended.
    S256,
    /// `plain`: challenge = verifier. Legacy.
    Plain,
}

impl PkceChallengeMethod {
    /// Parses the `code_challenge_method` parameter value.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for unknown methods.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "S256" => Ok(Self::S256),
            "plain" => Ok(Self::Plain),
            other => Err(AuthError::invalid_request(format!(
                "unsupported code_challenge_method: {other}"
            ))),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for PkceChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Verification
// =============================================================================

/// Computes the `S256` challenge for a verifier.
#[must_use]
pub fn compute_s256_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Verifies a code verifier against a stored challenge.
///
/// # Errors
///
/// Returns [`AuthError::PkceVerificationFailed`] when the verifier does not
/// match the challenge.
pub fn verify_challenge(
    challenge: &str,
    verifier: &str,
    method: PkceChallengeMethod,
) -> Result<(), AuthError> {
    let matches = match method {
        PkceChallengeMethod::S256 => compute_s256_challenge(verifier) == challenge,
        PkceChallengeMethod::Plain => verifier == challenge,
    };

    if matches {
        Ok(())
    } else {
        Err(AuthError::PkceVerificationFailed)
    }
}

// =============================================================================
// Tests
// =============================================================================
