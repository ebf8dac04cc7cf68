//! OpenID Connect userinfo handler (`GET /oauth/userinfo`).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, warn};

use crate::authn::Authenticator;
use crate::token::jwt::AccessTokenClaims;
use crate::token::JwtService;

/// State for the userinfo endpoint.
#[derive(Clone)]
pub struct UserinfoState {
    pub jwt: Arc<JwtService>,
    pub authenticator: Arc<dyn Authenticator>,
}

/// Userinfo response claims.
#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub sub: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub email_verified: bool,
}

/// Serves claims about the subject of a bearer access token.
pub async fn userinfo_handler(
    State(state): State<UserinfoState>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return unauthorized("bearer token required");
    };

    let claims: AccessTokenClaims = match state.jwt.decode(token) {
        Ok(claims) => claims,
        Err(err) => {
            debug!(error = %err, "userinfo token rejected");
            return unauthorized("token is invalid or expired");
        }
    };

    match state.authenticator.find_by_id(&claims.sub).await {
        Ok(Some(subject)) => Json(UserInfoResponse {
            sub: subject.id,
            preferred_username: Some(subject.username),
            name: subject.name,
            email: subject.email,
            email_verified: subject.email_verified,
        })
        .into_response(),
        Ok(None) => unauthorized("subject no longer exists"),
        Err(err) => {
            warn!(error = %err, "userinfo subject lookup failed");
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

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized(description: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer realm=\"userinfo\"")],
        Json(serde_json::json!({
            "error": "invalid_token",
            "error_description": description,
        })),
    )
        .into_response()
}
