//! Token revocation handler (`POST /oauth/revoke`), per RFC 7009.

use std::sync::Arc;

use axum::{Form, Json};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use crate::oauth::client_auth::{authenticate_client, resolve_credentials};
use crate::storage::ClientStorage;
use crate::token::{RevocationRequest, TokenService, TokenTypeHint};

/// State for the revocation endpoint.
#[derive(Clone)]
pub struct RevokeState {
    pub token_service: Arc<TokenService>,
    pub clients: Arc<dyn ClientStorage>,
}

/// Revocation form body.
#[derive(Debug, Deserialize)]
pub struct RevocationForm {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub token_type_hint: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Handles revocation requests.
///
/// Per RFC 7009 the endpoint returns 200 regardless of whether the token
/// existed; only a missing token parameter or failed client
/// authentication is an error.
pub async fn revoke_handler(
    State(state): State<RevokeState>,
    headers: HeaderMap,
    Form(form): Form<RevocationForm>,
) -> Response {
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let credentials = match resolve_credentials(
        basic,
        form.client_id.as_deref(),
        form.client_secret.as_deref(),
    ) {
        Ok(credentials) => credentials,
        Err(_) => return unauthorized(),
    };
    let client = match authenticate_client(&credentials, state.clients.as_ref()).await {
        Ok(client) => client,
        Err(_) => return unauthorized(),
    };

    let Some(token) = form.token.filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_request",
                "error_description": "token is required",
            })),
        )
            .into_response();
    };

    let request = RevocationRequest {
        token,
        // Unknown hints are ignored per RFC 7009.
        token_type_hint: form.token_type_hint.as_deref().and_then(TokenTypeHint::parse),
    };

    match state.token_service.revoke(&request, &client).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            warn!(client_id = %client.client_id, error = %err, "revocation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "server_error",
                    "error_description": "internal server error",
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"revoke\"")],
        Json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "client authentication failed",
        })),
    )
        .into_response()
}
