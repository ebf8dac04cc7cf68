//! Authorization endpoint handler (`GET /oauth/authorize`).
//!
//! Error reporting follows a strict split: until the client and its
//! redirect URI have been validated, errors are returned directly as
//! JSON and the user agent is never redirected. Only after validation do
//! errors travel back to the client via redirect.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::authn::{Authenticator, Subject};
use crate::config::AuthConfig;
use crate::oauth::authorize::{
    AuthorizationErrorCode, AuthorizationRequest, code_redirect_url, error_redirect_url,
    implicit_redirect_url, login_redirect_url,
};
use crate::oauth::pkce::PkceChallengeMethod;
use crate::oauth::{narrow_scopes, parse_scopes};
use crate::storage::{AuthorizationCodeStorage, ClientStorage, ConsentStorage};
use crate::token::TokenService;
use crate::types::{AuthorizationCode, Client, ConsentGrant, GrantType};

/// Session cookie set by the login surface.
pub const SESSION_COOKIE: &str = "aether_session";

/// State for the authorization endpoint.
#[derive(Clone)]
pub struct AuthorizeState {
    pub config: Arc<AuthConfig>,
    pub clients: Arc<dyn ClientStorage>,
    pub codes: Arc<dyn AuthorizationCodeStorage>,
    pub consents: Arc<dyn ConsentStorage>,
    pub authenticator: Arc<dyn Authenticator>,
    pub token_service: Arc<TokenService>,
}

/// Handles authorization requests for the code and implicit flows.
pub async fn authorize_handler(
    State(state): State<AuthorizeState>,
    Query(request): Query<AuthorizationRequest>,
    headers: HeaderMap,
) -> Response {
    // Client and redirect URI validation comes first; failures here must
    // not redirect anywhere.
    let client = match validate_client(&state, &request).await {
        Ok(client) => client,
        Err(response) => return response,
    };

    match process(&state, &request, &client, &headers).await {
        Ok(response) => response,
        Err(err) => {
            warn!(client_id = %request.client_id, error = %err, "authorization request failed");
            redirect_error(
                &request,
                AuthorizationErrorCode::ServerError,
                "internal server error",
            )
        }
    }
}

async fn validate_client(
    state: &AuthorizeState,
    request: &AuthorizationRequest,
) -> Result<Client, Response> {
    let client = match state.clients.find_by_client_id(&request.client_id).await {
        Ok(Some(client)) if client.active => client,
        Ok(_) => {
            debug!(client_id = %request.client_id, "authorization request for unknown client");
            return Err(direct_error(
                StatusCode::BAD_REQUEST,
                "invalid_client",
                "unknown client",
            ));
        }
        Err(err) => {
            warn!(error = %err, "client lookup failed");
            return Err(direct_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "internal server error",
            ));
        }
    };

    if !client.is_redirect_uri_allowed(&request.redirect_uri) {
        debug!(
            client_id = %client.client_id,
            redirect_uri = %request.redirect_uri,
            "unregistered redirect_uri"
        );
        return Err(direct_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "redirect_uri is not registered for this client",
        ));
    }

    Ok(client)
}

async fn process(
    state: &AuthorizeState,
    request: &AuthorizationRequest,
    client: &Client,
    headers: &HeaderMap,
) -> crate::AuthResult<Response> {
    if request.response_type != "code" && request.response_type != "token" {
        return Ok(redirect_error(
            request,
            AuthorizationErrorCode::UnsupportedResponseType,
            "response_type must be code or token",
        ));
    }

    // Both browser flows require the authorization code registration;
    // implicit delivery is a response-type variation, not a separate
    // grant registration.
    if !client.is_grant_type_allowed(GrantType::AuthorizationCode) {
        return Ok(redirect_error(
            request,
            AuthorizationErrorCode::UnauthorizedClient,
            "client is not authorized for this flow",
        ));
    }

    let requested = request.scope.as_deref().map(parse_scopes).unwrap_or_default();
    let scopes = if requested.is_empty() {
        client.scopes.clone()
    } else {
        let narrowed = narrow_scopes(&requested, &client.scopes);
        if narrowed.is_empty() {
            return Ok(redirect_error(
                request,
                AuthorizationErrorCode::InvalidScope,
                "none of the requested scopes are allowed for this client",
            ));
        }
        narrowed
    };

    let challenge_method = match parse_pkce(request) {
        Ok(method) => method,
        Err(description) => {
            return Ok(redirect_error(
                request,
                AuthorizationErrorCode::InvalidRequest,
                &description,
            ));
        }
    };

    // An unauthenticated user is sent to the login surface with the flow
    // parameters preserved so it can resume after sign-in.
    let Some(subject) = resolve_session(state, headers).await? else {
        let login = login_redirect_url(&state.config.login_url, request)?;
        debug!(client_id = %client.client_id, "no session, redirecting to login");
        return Ok(redirect(&login));
    };

    state
        .consents
        .upsert(&ConsentGrant {
            subject_id: subject.id.clone(),
            client_id: client.client_id.clone(),
            scopes: scopes.clone(),
            granted_at: OffsetDateTime::now_utc(),
        })
        .await?;

    if request.response_type == "token" {
        return implicit_response(state, request, client, &subject, &scopes).await;
    }

    let code = AuthorizationCode {
        code: AuthorizationCode::generate_value(),
        client_id: client.client_id.clone(),
        subject_id: subject.id.clone(),
        redirect_uri: request.redirect_uri.clone(),
        scopes,
        nonce: request.nonce.clone(),
        code_challenge: request.code_challenge.clone(),
        code_challenge_method: challenge_method,
        expires_at: OffsetDateTime::now_utc() + state.config.oauth.authorization_code_lifetime,
    };
    state.codes.create(&code).await?;

    info!(
        client_id = %client.client_id,
        subject_id = %subject.id,
        "authorization code issued"
    );

    let location = code_redirect_url(&request.redirect_uri, &code.code, request.state.as_deref())?;
    Ok(redirect(&location))
}

async fn implicit_response(
    state: &AuthorizeState,
    request: &AuthorizationRequest,
    client: &Client,
    subject: &Subject,
    scopes: &[String],
) -> crate::AuthResult<Response> {
    let grant = state
        .token_service
        .issue_implicit(client, subject, scopes, request.nonce.as_deref())
        .await?;

    let location = implicit_redirect_url(&request.redirect_uri, &grant, request.state.as_deref())?;
    Ok(redirect(&location))
}

fn parse_pkce(
    request: &AuthorizationRequest,
) -> Result<Option<PkceChallengeMethod>, String> {
    if request.code_challenge.is_none() {
        return Ok(None);
    }

    match request.code_challenge_method.as_deref() {
        // Method defaults to plain per RFC 7636 when a challenge is sent
        // without one.
        None => Ok(Some(PkceChallengeMethod::Plain)),
        Some(value) => PkceChallengeMethod::parse(value)
            .map(Some)
            .map_err(|e| e.to_string()),
    }
}

/// Resolves the end-user session from the session cookie or a bearer
/// token.
async fn resolve_session(
    state: &AuthorizeState,
    headers: &HeaderMap,
) -> crate::AuthResult<Option<Subject>> {
    if let Some(token) = session_cookie(headers) {
        if let Some(subject) = state.authenticator.resolve_session(&token).await? {
            return Ok(Some(subject));
        }
    }

    if let Some(token) = bearer_token(headers) {
        if let Some(subject) = state.authenticator.resolve_session(token).await? {
            return Ok(Some(subject));
        }
    }

    Ok(None)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        let (name, value) = cookie.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn redirect_error(
    request: &AuthorizationRequest,
    error: AuthorizationErrorCode,
    description: &str,
) -> Response {
    match error_redirect_url(
        &request.redirect_uri,
        error,
        description,
        request.state.as_deref(),
    ) {
        Ok(location) => redirect(&location),
        // The redirect URI was validated already, so this only fires on a
        // malformed registration.
        Err(_) => direct_error(StatusCode::BAD_REQUEST, error.as_str(), description),
    }
}

fn direct_error(status: StatusCode, error: &str, description: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "error_description": description,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; aether_session=tok123; lang=en"),
        );
        assert_eq!(session_cookie(&headers), Some("tok123".to_string()));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer tok123"),
        );
        assert_eq!(bearer_token(&headers), Some("tok123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_pkce_method_defaults_to_plain() {
        let request = AuthorizationRequest {
            response_type: "code".to_string(),
            client_id: "c1".to_string(),
            redirect_uri: "https://app/cb".to_string(),
            scope: None,
            state: None,
            nonce: None,
            code_challenge: Some("abc".to_string()),
            code_challenge_method: None,
        };
        assert_eq!(parse_pkce(&request).unwrap(), Some(PkceChallengeMethod::Plain));

        let mut s256 = request.clone();
        s256.code_challenge_method = Some("S256".to_string());
        assert_eq!(parse_pkce(&s256).unwrap(), Some(PkceChallengeMethod::S256));

        let mut bad = request.clone();
        bad.code_challenge_method = Some("md5".to_string());
        assert!(parse_pkce(&bad).is_err());

        let mut none = request;
        none.code_challenge = None;
        none.code_challenge_method = Some("S256".to_string());
        assert_eq!(parse_pkce(&none).unwrap(), None);
    }
}
