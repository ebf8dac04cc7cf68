//! JWKS handler (`GET /.well-known/jwks.json`).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::token::JwtService;

/// State for the JWKS endpoint.
#[derive(Clone)]
pub struct JwksState {
    pub jwt: Arc<JwtService>,
}

/// Serves the public signing keys.
pub async fn jwks_handler(State(state): State<JwksState>) -> Response {
    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(state.jwt.jwks()),
    )
        .into_response()
}
