//! Token issuance service.
//!
//! Dispatches authenticated token endpoint requests to the supported
//! grant flows and owns the issuance rules: lifetimes, scope policy,
//! refresh behavior, and which grants receive refresh and ID tokens.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::AuthResult;
use crate::authn::{Authenticator, Subject};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::oauth::pkce::{self, PkceChallengeMethod};
use crate::oauth::{Grant, ImplicitGrant, TokenResponse, join_scopes, narrow_scopes, parse_scopes};
use crate::storage::{AccessTokenStorage, AuthorizationCodeStorage, RefreshTokenStorage};
use crate::token::introspection::IntrospectionResponse;
use crate::token::jwt::{IdTokenClaims, JwtService, access_token_claims};
use crate::token::revocation::{RevocationRequest, TokenTypeHint};
use crate::types::{AccessTokenRecord, Client, RefreshTokenRecord};

// =============================================================================
// Token Config
// =============================================================================

/// Issuance policy derived from the server configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access token lifetime.
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    pub refresh_token_lifetime: Duration,

    /// Scope set granted when a user-delegated request carries no scope.
    pub default_scopes: Vec<String>,

    /// Scope set granted to the client credentials grant.
    pub service_scopes: Vec<String>,
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access_token_lifetime: config.oauth.access_token_lifetime,
            refresh_token_lifetime: config.oauth.refresh_token_lifetime,
            default_scopes: config.scopes.default.clone(),
            service_scopes: config.scopes.service.clone(),
        }
    }
}

// =============================================================================
// Token Service
// =============================================================================

/// Issues, introspects, and revokes tokens.
pub struct TokenService {
    jwt: Arc<JwtService>,
    codes: Arc<dyn AuthorizationCodeStorage>,
    access_tokens: Arc<dyn AccessTokenStorage>,
    refresh_tokens: Arc<dyn RefreshTokenStorage>,
    authenticator: Arc<dyn Authenticator>,
    config: TokenConfig,
}

impl TokenService {
    /// Creates a token service over the given backends.
    #[must_use]
    pub fn new(
        jwt: Arc<JwtService>,
        codes: Arc<dyn AuthorizationCodeStorage>,
        access_tokens: Arc<dyn AccessTokenStorage>,
        refresh_tokens: Arc<dyn RefreshTokenStorage>,
        authenticator: Arc<dyn Authenticator>,
        config: TokenConfig,
    ) -> Self {
        Self {
            jwt,
            codes,
            access_tokens,
            refresh_tokens,
            authenticator,
            config,
        }
    }

    /// The JWT service used for signing.
    #[must_use]
    pub fn jwt(&self) -> &Arc<JwtService> {
        &self.jwt
    }

    /// Access token lifetime in seconds, as reported in `expires_in`.
    #[must_use]
    pub fn access_token_lifetime_secs(&self) -> u64 {
        self.config.access_token_lifetime.as_secs()
    }

    // =========================================================================
    // Grant Dispatch
    // =========================================================================

    /// Handles an authenticated token request.
    ///
    /// # Errors
    ///
    /// Returns an OAuth-mappable error for invalid grants, disallowed
    /// grant types, and scope violations.
    pub async fn handle(&self, grant: Grant, client: &Client) -> AuthResult<TokenResponse> {
        let grant_type = grant.grant_type();
        if !client.is_grant_type_allowed(grant_type) {
            debug!(
                client_id = %client.client_id,
                grant_type = %grant_type,
                "grant type not allowed for client"
            );
            return Err(AuthError::invalid_grant(format!(
                "grant type {grant_type} is not allowed for this client"
            )));
        }

        match grant {
            Grant::AuthorizationCode {
                code,
                redirect_uri,
                code_verifier,
            } => {
                self.exchange_code(&code, &redirect_uri, code_verifier.as_deref(), client)
                    .await
            }
            Grant::RefreshToken { refresh_token } => self.refresh(&refresh_token, client).await,
            Grant::Password {
                username,
                password,
                scope,
            } => {
                self.password(&username, &password, scope.as_deref(), client)
                    .await
            }
            Grant::ClientCredentials { scope } => {
                self.client_credentials(scope.as_deref(), client).await
            }
        }
    }

    // =========================================================================
    // Authorization Code Grant
    // =========================================================================

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: Option<&str>,
        client: &Client,
    ) -> AuthResult<TokenResponse> {
        // Claim before any other check so a code can never be redeemed
        // twice, even by concurrent requests.
        let Some(stored) = self.codes.claim(code).await? else {
            return Err(AuthError::invalid_grant(
                "authorization code is invalid, expired, or already used",
            ));
        };

        if stored.client_id != client.client_id {
            debug!(
                client_id = %client.client_id,
                code_client_id = %stored.client_id,
                "authorization code presented by wrong client"
            );
            return Err(AuthError::invalid_grant(
                "authorization code was not issued to this client",
            ));
        }

        if stored.redirect_uri != redirect_uri {
            return Err(AuthError::invalid_grant(
                "redirect_uri does not match the authorization request",
            ));
        }

        if let Some(challenge) = &stored.code_challenge {
            let Some(verifier) = code_verifier else {
                return Err(AuthError::invalid_request("code_verifier is required"));
            };
            let method = stored
                .code_challenge_method
                .unwrap_or(PkceChallengeMethod::S256);
            pkce::verify_challenge(challenge, verifier, method)?;
        }

        let subject = self.require_subject(&stored.subject_id).await?;

        info!(
            client_id = %client.client_id,
            subject_id = %subject.id,
            "authorization code exchanged"
        );

        self.issue_user_tokens(client, &subject, stored.scopes, stored.nonce.as_deref(), true)
            .await
    }

    // =========================================================================
    // Refresh Token Grant
    // =========================================================================

    async fn refresh(&self, refresh_token: &str, client: &Client) -> AuthResult<TokenResponse> {
        let Some(record) = self.refresh_tokens.find_by_token(refresh_token).await? else {
            return Err(AuthError::invalid_grant("refresh token is invalid or expired"));
        };

        if record.is_expired(OffsetDateTime::now_utc()) {
            self.refresh_tokens.delete(&record.token).await?;
            return Err(AuthError::invalid_grant("refresh token is invalid or expired"));
        }

        if record.client_id != client.client_id {
            debug!(
                client_id = %client.client_id,
                token_client_id = %record.client_id,
                "refresh token presented by wrong client"
            );
            return Err(AuthError::invalid_grant(
                "refresh token was not issued to this client",
            ));
        }

        let subject = self.require_subject(&record.subject_id).await?;
        let scopes = record.scopes.clone();

        let (access_token, expires_in) = self.issue_access_token(client, &subject, &scopes).await?;
        let mut response = TokenResponse::new(access_token, expires_in, join_scopes(&scopes))
            // Refresh tokens are not rotated; the presented token stays
            // valid and is returned unchanged.
            .with_refresh_token(record.token);

        if scopes.iter().any(|s| s == "openid") {
            response = response.with_id_token(self.issue_id_token(client, &subject, None)?);
        }

        debug!(client_id = %client.client_id, subject_id = %subject.id, "access token refreshed");
        Ok(response)
    }

    // =========================================================================
    // Password Grant
    // =========================================================================

    async fn password(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
        client: &Client,
    ) -> AuthResult<TokenResponse> {
        let Some(subject) = self.authenticator.verify_credentials(username, password).await? else {
            debug!(client_id = %client.client_id, "password grant credential check failed");
            return Err(AuthError::invalid_grant("invalid username or password"));
        };

        let scopes = self.resolve_user_scopes(scope, client)?;

        info!(
            client_id = %client.client_id,
            subject_id = %subject.id,
            "password grant token issued"
        );

        self.issue_user_tokens(client, &subject, scopes, None, true).await
    }

    // =========================================================================
    // Client Credentials Grant
    // =========================================================================

    async fn client_credentials(
        &self,
        scope: Option<&str>,
        client: &Client,
    ) -> AuthResult<TokenResponse> {
        let requested = scope.map(parse_scopes).unwrap_or_default();
        let scopes = if requested.is_empty() {
            self.config.service_scopes.clone()
        } else {
            let narrowed = narrow_scopes(&requested, &client.scopes);
            if narrowed.is_empty() {
                return Err(AuthError::invalid_scope(
                    "none of the requested scopes are allowed for this client",
                ));
            }
            narrowed
        };

        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.config.access_token_lifetime;

        let claims = access_token_claims(
            self.jwt.issuer(),
            &client.client_id,
            &client.client_id,
            join_scopes(&scopes),
            None,
            now,
            expires_at,
        );
        let access_token = self.jwt.encode(&claims)?;

        self.access_tokens
            .create(&AccessTokenRecord {
                token: access_token.clone(),
                client_id: client.client_id.clone(),
                subject_id: None,
                expires_at,
            })
            .await?;

        info!(client_id = %client.client_id, "client credentials token issued");

        Ok(TokenResponse::new(
            access_token,
            self.access_token_lifetime_secs(),
            join_scopes(&scopes),
        ))
    }

    // =========================================================================
    // Implicit Flow
    // =========================================================================

    /// Issues tokens for the implicit flow (`response_type=token`).
    ///
    /// Only an access token (and an ID token when `openid` was granted)
    /// are issued; the implicit flow never receives a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error when signing or storage fails.
    pub async fn issue_implicit(
        &self,
        client: &Client,
        subject: &Subject,
        scopes: &[String],
        nonce: Option<&str>,
    ) -> AuthResult<ImplicitGrant> {
        let (access_token, expires_in) = self.issue_access_token(client, subject, scopes).await?;

        let id_token = if scopes.iter().any(|s| s == "openid") {
            Some(self.issue_id_token(client, subject, nonce)?)
        } else {
            None
        };

        info!(
            client_id = %client.client_id,
            subject_id = %subject.id,
            "implicit flow tokens issued"
        );

        Ok(ImplicitGrant {
            access_token,
            expires_in,
            scope: join_scopes(scopes),
            id_token,
        })
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Inspects a token, reporting its claims when it verifies.
    ///
    /// Verification covers the signature, expiry, and issuer of the JWT
    /// itself; the persisted token records are not consulted.
    ///
    /// # Errors
    ///
    /// Never fails on an invalid token; those produce an inactive
    /// response.
    pub async fn introspect(&self, token: &str) -> AuthResult<IntrospectionResponse> {
        match self.jwt.decode::<serde_json::Value>(token) {
            Ok(claims) => Ok(IntrospectionResponse::active(claims)),
            Err(_) => Ok(IntrospectionResponse::inactive()),
        }
    }

    // =========================================================================
    // Revocation
    // =========================================================================

    /// Revokes a token owned by the authenticated client.
    ///
    /// Unknown tokens and tokens owned by another client are ignored
    /// without error, so callers cannot probe for token existence or
    /// revoke another client's tokens.
    ///
    /// # Errors
    ///
    /// Returns an error only when storage fails.
    pub async fn revoke(&self, request: &RevocationRequest, client: &Client) -> AuthResult<()> {
        // Search the hinted store first, then the other.
        let try_refresh_first = request.token_type_hint == Some(TokenTypeHint::RefreshToken);

        if try_refresh_first {
            if self.revoke_refresh_token(&request.token, client).await? {
                return Ok(());
            }
            self.revoke_access_token(&request.token, client).await?;
        } else {
            if self.revoke_access_token(&request.token, client).await? {
                return Ok(());
            }
            self.revoke_refresh_token(&request.token, client).await?;
        }

        Ok(())
    }

    async fn revoke_access_token(&self, token: &str, client: &Client) -> AuthResult<bool> {
        let Some(record) = self.access_tokens.find_by_token(token).await? else {
            return Ok(false);
        };
        if record.client_id != client.client_id {
            debug!(client_id = %client.client_id, "revocation skipped: token owned by another client");
            return Ok(true);
        }

        self.access_tokens.delete(token).await?;
        info!(client_id = %client.client_id, "access token revoked");
        Ok(true)
    }

    async fn revoke_refresh_token(&self, token: &str, client: &Client) -> AuthResult<bool> {
        let Some(record) = self.refresh_tokens.find_by_token(token).await? else {
            return Ok(false);
        };
        if record.client_id != client.client_id {
            debug!(client_id = %client.client_id, "revocation skipped: token owned by another client");
            return Ok(true);
        }

        self.refresh_tokens.delete(token).await?;
        info!(client_id = %client.client_id, "refresh token revoked");
        Ok(true)
    }

    // =========================================================================
    // Issuance Helpers
    // =========================================================================

    /// Resolves the granted scope set for a user-delegated grant.
    ///
    /// An absent or empty request falls back to the configured default
    /// set; a non-empty request is narrowed against the client's
    /// registration and must leave at least one scope.
    fn resolve_user_scopes(&self, scope: Option<&str>, client: &Client) -> AuthResult<Vec<String>> {
        let requested = scope.map(parse_scopes).unwrap_or_default();
        if requested.is_empty() {
            return Ok(self.config.default_scopes.clone());
        }

        let narrowed = narrow_scopes(&requested, &client.scopes);
        if narrowed.is_empty() {
            return Err(AuthError::invalid_scope(
                "none of the requested scopes are allowed for this client",
            ));
        }
        Ok(narrowed)
    }

    async fn require_subject(&self, subject_id: &str) -> AuthResult<Subject> {
        self.authenticator
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AuthError::invalid_grant("subject no longer exists"))
    }

    async fn issue_user_tokens(
        &self,
        client: &Client,
        subject: &Subject,
        scopes: Vec<String>,
        nonce: Option<&str>,
        with_refresh: bool,
    ) -> AuthResult<TokenResponse> {
        let (access_token, expires_in) = self.issue_access_token(client, subject, &scopes).await?;
        let mut response = TokenResponse::new(access_token, expires_in, join_scopes(&scopes));

        if with_refresh && client.is_grant_type_allowed(crate::types::GrantType::RefreshToken) {
            let refresh = RefreshTokenRecord {
                token: RefreshTokenRecord::generate_value(),
                client_id: client.client_id.clone(),
                subject_id: subject.id.clone(),
                scopes: scopes.clone(),
                expires_at: OffsetDateTime::now_utc() + self.config.refresh_token_lifetime,
            };
            self.refresh_tokens.create(&refresh).await?;
            response = response.with_refresh_token(refresh.token);
        }

        if scopes.iter().any(|s| s == "openid") {
            response = response.with_id_token(self.issue_id_token(client, subject, nonce)?);
        }

        Ok(response)
    }

    async fn issue_access_token(
        &self,
        client: &Client,
        subject: &Subject,
        scopes: &[String],
    ) -> AuthResult<(String, u64)> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.config.access_token_lifetime;

        let claims = access_token_claims(
            self.jwt.issuer(),
            &subject.id,
            &client.client_id,
            join_scopes(scopes),
            subject.email.clone(),
            now,
            expires_at,
        );
        let access_token = self.jwt.encode(&claims)?;

        self.access_tokens
            .create(&AccessTokenRecord {
                token: access_token.clone(),
                client_id: client.client_id.clone(),
                subject_id: Some(subject.id.clone()),
                expires_at,
            })
            .await?;

        Ok((access_token, self.access_token_lifetime_secs()))
    }

    fn issue_id_token(
        &self,
        client: &Client,
        subject: &Subject,
        nonce: Option<&str>,
    ) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc();
        let claims = IdTokenClaims {
            iss: self.jwt.issuer().to_string(),
            sub: subject.id.clone(),
            aud: client.client_id.clone(),
            exp: (now + self.config.access_token_lifetime).unix_timestamp(),
            iat: now.unix_timestamp(),
            nonce: nonce.map(ToString::to_string),
            email: subject.email.clone(),
            name: subject.name.clone(),
        };
        Ok(self.jwt.encode(&claims)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
