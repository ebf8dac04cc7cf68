//! Token endpoint handler (`POST /oauth/token`).

use std::sync::Arc;

use axum::{Form, Json};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::oauth::client_auth::{authenticate_client, resolve_credentials};
use crate::oauth::{Grant, TokenError, TokenErrorCode, TokenRequest};
use crate::storage::ClientStorage;
use crate::token::TokenService;

/// State for the token endpoint.
#[derive(Clone)]
pub struct TokenEndpointState {
    pub token_service: Arc<TokenService>,
    pub clients: Arc<dyn ClientStorage>,
}

/// Handles token endpoint requests.
///
/// Clients authenticate with HTTP Basic or form-body credentials; the
/// grant is then dispatched to the token service. Successful responses
/// carry `Cache-Control: no-store` per RFC 6749.
pub async fn token_handler(
    State(state): State<TokenEndpointState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let result = process(&state, basic, &request).await;

    match result {
        Ok(response) => (
            StatusCode::OK,
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            Json(response),
        )
            .into_response(),
        Err(err) => token_error_response(&err),
    }
}

async fn process(
    state: &TokenEndpointState,
    basic: Option<&str>,
    request: &TokenRequest,
) -> Result<crate::oauth::TokenResponse, AuthError> {
    let credentials = resolve_credentials(
        basic,
        request.client_id.as_deref(),
        request.client_secret.as_deref(),
    )?;
    let client = authenticate_client(&credentials, state.clients.as_ref()).await?;

    let grant = Grant::from_request(request)?;
    debug!(
        client_id = %client.client_id,
        grant_type = %grant.grant_type(),
        "processing token request"
    );

    state.token_service.handle(grant, &client).await
}

/// Maps an [`AuthError`] to an RFC 6749 token endpoint error response.
pub fn token_error_response(err: &AuthError) -> Response {
    if err.is_server_error() {
        warn!(category = %err.category(), error = %err, "token endpoint server error");
    } else {
        debug!(category = %err.category(), error = %err, "token request rejected");
    }

    let code = TokenErrorCode::from_auth_error(err);
    let status = StatusCode::from_u16(code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    // Server error details stay out of the response body.
    let description = if err.is_server_error() {
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    let body = Json(TokenError::new(code, description));

    if status == StatusCode::UNAUTHORIZED {
        (
            status,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"token\"")],
            body,
        )
            .into_response()
    } else {
        (status, body).into_response()
    }
}
