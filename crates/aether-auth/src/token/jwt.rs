//! JWT signing and verification.
//!
//! Access and ID tokens are RSA-signed JWTs. The service holds one active
//! signing key pair, identified by a `kid` that is published through the
//! JWKS endpoint so resource servers can verify tokens offline.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuthError;

// =============================================================================
// Errors
// =============================================================================

/// JWT processing errors.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Token signing failed.
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    /// Token verification failed.
    #[error("Token decoding failed: {0}")]
    Decoding(String),

    /// Token is past its expiry.
    #[error("Token has expired")]
    Expired,

    /// Key material could not be generated or parsed.
    #[error("Signing key error: {0}")]
    Key(String),

    /// Unsupported signing algorithm.
    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Decoding(err.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::TokenExpired,
            JwtError::Decoding(message) => Self::invalid_token(message),
            JwtError::Encoding(message) | JwtError::Key(message) => Self::internal(message),
            JwtError::UnsupportedAlgorithm(algorithm) => {
                Self::configuration(format!("unsupported signing algorithm: {algorithm}"))
            }
        }
    }
}

// =============================================================================
// Signing Algorithm
// =============================================================================

/// Supported token signing algorithms. RSA only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    Rs256,
    Rs384,
}

impl SigningAlgorithm {
    /// Parses a configuration value such as `RS256`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::UnsupportedAlgorithm`] for anything else.
    pub fn parse(value: &str) -> Result<Self, JwtError> {
        match value {
            "RS256" => Ok(Self::Rs256),
            "RS384" => Ok(Self::Rs384),
            other => Err(JwtError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Returns the JOSE algorithm name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
        }
    }

    fn to_jsonwebtoken(self) -> Algorithm {
        match self {
            Self::Rs256 => Algorithm::RS256,
            Self::Rs384 => Algorithm::RS384,
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer URL.
    pub iss: String,
    /// Subject: the user ID, or the client ID for client credentials.
    pub sub: String,
    /// Audience: the client the token was issued to.
    pub aud: String,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Unique token identifier.
    pub jti: String,
    /// Granted scope, space-delimited.
    pub scope: String,
    /// The client the token was issued to.
    pub client_id: String,
    /// Subject email, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Claims carried by OpenID Connect ID tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Issuer URL.
    pub iss: String,
    /// Subject: the user ID.
    pub sub: String,
    /// Audience: the client ID.
    pub aud: String,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Nonce from the authorization request, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Subject email, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Subject display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// =============================================================================
// JWKS
// =============================================================================

/// A single RSA key in JWK format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use")]
    pub use_: String,
    pub alg: String,
    pub n: String,
    pub e: String,
}

/// A JWK set, as served from the JWKS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

// =============================================================================
// Signing Key Pair
// =============================================================================

/// An RSA signing key pair with its JWKS-facing public parameters.
pub struct SigningKeyPair {
    /// Key identifier, placed in the JWT header and the JWKS entry.
    pub kid: String,

    /// Algorithm this key signs with.
    pub algorithm: SigningAlgorithm,

    encoding_key: EncodingKey,
    decoding_key: DecodingKey,

    /// Base64url modulus for the JWKS entry.
    modulus: String,
    /// Base64url exponent for the JWKS entry.
    exponent: String,
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

const RSA_KEY_BITS: usize = 2048;

impl SigningKeyPair {
    /// Generates a fresh RSA key pair.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Key`] when key generation fails.
    pub fn generate(algorithm: SigningAlgorithm) -> Result<Self, JwtError> {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), RSA_KEY_BITS)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        Self::from_private_key(&private_key, private_pem.as_bytes(), algorithm)
    }

    /// Loads a key pair from a PKCS#8 PEM private key.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Key`] when the PEM does not parse.
    pub fn from_pem(private_pem: &str, algorithm: SigningAlgorithm) -> Result<Self, JwtError> {
        use rsa::pkcs8::DecodePrivateKey;

        let private_key = RsaPrivateKey::from_pkcs8_pem(private_pem)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        Self::from_private_key(&private_key, private_pem.as_bytes(), algorithm)
    }

    fn from_private_key(
        private_key: &RsaPrivateKey,
        private_pem: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Self, JwtError> {
        let public_key = RsaPublicKey::from(private_key);
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| JwtError::Key(e.to_string()))?;

        let encoding_key =
            EncodingKey::from_rsa_pem(private_pem).map_err(|e| JwtError::Key(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| JwtError::Key(e.to_string()))?;

        Ok(Self {
            kid: Uuid::new_v4().to_string(),
            algorithm,
            encoding_key,
            decoding_key,
            modulus: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            exponent: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        })
    }

    /// Returns this key's public half in JWK format.
    #[must_use]
    pub fn to_jwk(&self) -> Jwk {
        Jwk {
            kty: "RSA".to_string(),
            kid: self.kid.clone(),
            use_: "sig".to_string(),
            alg: self.algorithm.as_str().to_string(),
            n: self.modulus.clone(),
            e: self.exponent.clone(),
        }
    }
}

// =============================================================================
// JWT Service
// =============================================================================

/// Signs and verifies tokens for a single issuer.
#[derive(Debug)]
pub struct JwtService {
    issuer: String,
    key: SigningKeyPair,
}

impl JwtService {
    /// Creates a service for the given issuer and signing key.
    #[must_use]
    pub fn new(issuer: impl Into<String>, key: SigningKeyPair) -> Self {
        Self {
            issuer: issuer.into(),
            key,
        }
    }

    /// The issuer URL placed in every token.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The active key identifier.
    #[must_use]
    pub fn current_kid(&self) -> &str {
        &self.key.kid
    }

    /// The published key set.
    #[must_use]
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: vec![self.key.to_jwk()],
        }
    }

    /// Signs a claims set into a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Encoding`] when signing fails.
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let mut header = Header::new(self.key.algorithm.to_jsonwebtoken());
        header.kid = Some(self.key.kid.clone());

        jsonwebtoken::encode(&header, claims, &self.key.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Verifies a token's signature, expiry, and issuer, and deserializes
    /// its claims.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Expired`] for expired tokens and
    /// [`JwtError::Decoding`] for any other verification failure.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let data = jsonwebtoken::decode::<T>(token, &self.key.decoding_key, &self.validation())?;
        Ok(data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.key.algorithm.to_jsonwebtoken());
        validation.set_issuer(&[&self.issuer]);
        // Audience is the client_id; callers that care check it themselves.
        validation.validate_aud = false;
        validation
    }
}

/// Builds access token claims for an issuance.
#[must_use]
pub fn access_token_claims(
    issuer: &str,
    subject: &str,
    client_id: &str,
    scope: String,
    email: Option<String>,
    issued_at: OffsetDateTime,
    expires_at: OffsetDateTime,
) -> AccessTokenClaims {
    AccessTokenClaims {
        iss: issuer.to_string(),
        sub: subject.to_string(),
        aud: client_id.to_string(),
        exp: expires_at.unix_timestamp(),
        iat: issued_at.unix_timestamp(),
        jti: Uuid::new_v4().to_string(),
        scope,
        client_id: client_id.to_string(),
        email,
    }
}

// =============================================================================
// Tests
// =============================================================================
