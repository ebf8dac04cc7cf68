//! Token introspection types (RFC 7662 response shape).

use serde::{Deserialize, Serialize};

/// Introspection request body.
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionRequest {
    /// The token to inspect.
    pub token: String,
}

/// Introspection response.
///
/// Active responses nest the token's verified claims under a `claims`
/// key; inactive responses carry only `active: false`.
#[derive(Debug, Clone, Serialize)]
pub struct IntrospectionResponse {
    pub active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<serde_json::Value>,
}

impl IntrospectionResponse {
    /// Builds an active response from a token's verified claims.
    #[must_use]
    pub fn active(claims: serde_json::Value) -> Self {
        Self {
            active: true,
            claims: Some(claims),
        }
    }

    /// Builds an inactive response.
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            active: false,
            claims: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_response_nests_claims() {
        let response = IntrospectionResponse::active(serde_json::json!({
            "sub": "user-1",
            "scope": "openid",
        }));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["active"], true);
        let claims = json.get("claims").unwrap();
        assert_eq!(claims["sub"], "user-1");
        assert_eq!(claims["scope"], "openid");
    }

    #[test]
    fn test_inactive_response_is_bare() {
        let json = serde_json::to_value(IntrospectionResponse::inactive()).unwrap();
        assert_eq!(json, serde_json::json!({"active": false}));
    }
}
