//! Token introspection handler (`POST /oauth/introspect`).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::token::{IntrospectionRequest, TokenService};

/// State for the introspection endpoint.
#[derive(Clone)]
pub struct IntrospectState {
    pub token_service: Arc<TokenService>,
}

/// Handles introspection requests.
///
/// The endpoint is open to resource servers without client
/// authentication and reports on the token's own validity: signature,
/// expiry, and issuer.
pub async fn introspect_handler(
    State(state): State<IntrospectState>,
    Json(request): Json<IntrospectionRequest>,
) -> Response {
    if request.token.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_request",
                "error_description": "token is required",
            })),
        )
            .into_response();
    }

    match state.token_service.introspect(&request.token).await {
        Ok(response) => {
            debug!(active = response.active, "token introspected");
            Json(response).into_response()
        }
        Err(err) => {
            warn!(error = %err, "introspection failed");
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
