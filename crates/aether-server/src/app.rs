//! Service construction and router wiring.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use aether_auth::config::AuthConfig;
use aether_auth::http::{
    AuthorizeState, DiscoveryState, IntrospectState, JwksState, ProviderMetadata, RevokeState,
    TokenEndpointState, UserinfoState, authorize_handler, discovery_handler, introspect_handler,
    jwks_handler, revoke_handler, token_handler, userinfo_handler,
};
use aether_auth::token::{JwtService, SigningAlgorithm, SigningKeyPair, TokenConfig, TokenService};
use aether_auth::types::Client;
use aether_auth_memory::{
    MemoryAccessTokenStorage, MemoryAuthenticator, MemoryAuthorizationCodeStorage,
    MemoryClientStorage, MemoryConsentStorage, MemoryRefreshTokenStorage, hash_secret,
};

use crate::config::ServerConfig;

/// All constructed services, with concrete backend types exposed so
/// tests and seeding can reach them.
pub struct AppServices {
    pub auth_config: Arc<AuthConfig>,
    pub clients: Arc<MemoryClientStorage>,
    pub codes: Arc<MemoryAuthorizationCodeStorage>,
    pub access_tokens: Arc<MemoryAccessTokenStorage>,
    pub refresh_tokens: Arc<MemoryRefreshTokenStorage>,
    pub consents: Arc<MemoryConsentStorage>,
    pub authenticator: Arc<MemoryAuthenticator>,
    pub jwt: Arc<JwtService>,
    pub token_service: Arc<TokenService>,
}

/// Builds the service graph from configuration, seeding clients and
/// users into the in-memory backends.
///
/// # Errors
///
/// Returns an error when key material cannot be loaded or a seed entry
/// is invalid.
pub async fn build_services(config: &ServerConfig) -> anyhow::Result<AppServices> {
    let auth_config = Arc::new(config.auth.clone());

    let algorithm = SigningAlgorithm::parse(&auth_config.signing.algorithm)
        .context("invalid signing algorithm")?;
    let key = match &auth_config.signing.private_key_path {
        Some(path) => {
            let pem = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read signing key from {path}"))?;
            info!(path, "loaded signing key");
            SigningKeyPair::from_pem(&pem, algorithm).context("invalid signing key PEM")?
        }
        None => {
            // Tokens do not survive a restart without a persisted key.
            warn!("no signing key configured, generating an ephemeral RSA key");
            SigningKeyPair::generate(algorithm).context("signing key generation failed")?
        }
    };
    let jwt = Arc::new(JwtService::new(auth_config.issuer.clone(), key));

    let clients = Arc::new(MemoryClientStorage::new());
    let codes = Arc::new(MemoryAuthorizationCodeStorage::new());
    let access_tokens = Arc::new(MemoryAccessTokenStorage::new());
    let refresh_tokens = Arc::new(MemoryRefreshTokenStorage::new());
    let consents = Arc::new(MemoryConsentStorage::new());
    let authenticator = Arc::new(MemoryAuthenticator::new());

    seed(config, &clients, &authenticator).await?;

    let token_service = Arc::new(TokenService::new(
        jwt.clone(),
        codes.clone(),
        access_tokens.clone(),
        refresh_tokens.clone(),
        authenticator.clone(),
        TokenConfig::from(auth_config.as_ref()),
    ));

    Ok(AppServices {
        auth_config,
        clients,
        codes,
        access_tokens,
        refresh_tokens,
        consents,
        authenticator,
        jwt,
        token_service,
    })
}

async fn seed(
    config: &ServerConfig,
    clients: &Arc<MemoryClientStorage>,
    authenticator: &Arc<MemoryAuthenticator>,
) -> anyhow::Result<()> {
    use aether_auth::storage::ClientStorage;

    for seed in &config.clients {
        let client = Client {
            client_id: seed.client_id.clone(),
            client_secret: hash_secret(&seed.client_secret)
                .with_context(|| format!("failed to hash secret for client {}", seed.client_id))?,
            name: seed.name.clone(),
            redirect_uris: seed.redirect_uris.clone(),
            scopes: seed.scopes.clone(),
            grant_types: seed.grant_types.clone(),
            active: seed.active,
        };
        client
            .validate()
            .with_context(|| format!("invalid client seed {}", seed.client_id))?;
        clients.create(&client).await?;
        info!(client_id = %seed.client_id, "seeded client");
    }

    for seed in &config.users {
        authenticator
            .add_user(
                &seed.username,
                &seed.password,
                seed.email.clone(),
                seed.name.clone(),
            )
            .await
            .with_context(|| format!("invalid user seed {}", seed.username))?;
        info!(username = %seed.username, "seeded user");
    }

    Ok(())
}

/// Wires the protocol endpoints into a router.
#[must_use]
pub fn build_router(services: &AppServices) -> Router {
    let authorize = Router::new()
        .route("/oauth/authorize", get(authorize_handler))
        .with_state(AuthorizeState {
            config: services.auth_config.clone(),
            clients: services.clients.clone(),
            codes: services.codes.clone(),
            consents: services.consents.clone(),
            authenticator: services.authenticator.clone(),
            token_service: services.token_service.clone(),
        });

    let token = Router::new()
        .route("/oauth/token", post(token_handler))
        .with_state(TokenEndpointState {
            token_service: services.token_service.clone(),
            clients: services.clients.clone(),
        });

    let introspect = Router::new()
        .route("/oauth/introspect", post(introspect_handler))
        .with_state(IntrospectState {
            token_service: services.token_service.clone(),
        });

    let revoke = Router::new()
        .route("/oauth/revoke", post(revoke_handler))
        .with_state(RevokeState {
            token_service: services.token_service.clone(),
            clients: services.clients.clone(),
        });

    let userinfo = Router::new()
        .route("/oauth/userinfo", get(userinfo_handler))
        .with_state(UserinfoState {
            jwt: services.jwt.clone(),
            authenticator: services.authenticator.clone(),
        });

    let discovery = Router::new()
        .route("/.well-known/openid-configuration", get(discovery_handler))
        .with_state(DiscoveryState {
            metadata: Arc::new(ProviderMetadata::from_config(&services.auth_config)),
        });

    let jwks = Router::new()
        .route("/.well-known/jwks.json", get(jwks_handler))
        .with_state(JwksState {
            jwt: services.jwt.clone(),
        });

    Router::new()
        .merge(authorize)
        .merge(token)
        .merge(introspect)
        .merge(revoke)
        .merge(userinfo)
        .merge(discovery)
        .merge(jwks)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Periodically sweeps expired codes and tokens from the stores.
pub fn spawn_cleanup_task(services: &AppServices, period: Duration) -> JoinHandle<()> {
    use aether_auth::storage::{
        AccessTokenStorage, AuthorizationCodeStorage, RefreshTokenStorage,
    };

    let codes = services.codes.clone();
    let access_tokens = services.access_tokens.clone();
    let refresh_tokens = services.refresh_tokens.clone();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;

            let mut removed = 0;
            match codes.cleanup_expired().await {
                Ok(count) => removed += count,
                Err(err) => warn!(error = %err, "code cleanup failed"),
            }
            match access_tokens.cleanup_expired().await {
                Ok(count) => removed += count,
                Err(err) => warn!(error = %err, "access token cleanup failed"),
            }
            match refresh_tokens.cleanup_expired().await {
                Ok(count) => removed += count,
                Err(err) => warn!(error = %err, "refresh token cleanup failed"),
            }

            if removed > 0 {
                debug!(removed, "expired auth data swept");
            }
        }
    })
}
