//! Grant extraction from token requests.
//!
//! The token endpoint dispatches on a closed enum of supported grants.
//! Unknown grant types are rejected at construction time with
//! `unsupported_grant_type`; missing grant parameters are rejected with
//! `invalid_request`.

use crate::error::AuthError;
use crate::oauth::token::TokenRequest;
use crate::types::GrantType;

/// A validated token grant with the parameters its flow requires.
#[derive(Debug, Clone)]
pub enum Grant {
    /// Redeem an authorization code.
    AuthorizationCode {
        code: String,
        redirect_uri: String,
        code_verifier: Option<String>,
    },
    /// Redeem a refresh token for a new access token.
    RefreshToken { refresh_token: String },
    /// Resource owner password credentials.
    Password {
        username: String,
        password: String,
        scope: Option<String>,
    },
    /// Machine-to-machine client credentials.
    ClientCredentials { scope: Option<String> },
}

impl Grant {
    /// Builds a grant from a parsed token request.
    ///
    /// # Errors
    ///
    /// Returns `unsupported_grant_type` for unknown grant types and
    /// `invalid_request` when a required parameter is missing.
    pub fn from_request(request: &TokenRequest) -> Result<Self, AuthError> {
        match request.grant_type.as_str() {
            "authorization_code" => Ok(Self::AuthorizationCode {
                code: require(request.code.as_deref(), "code")?,
                redirect_uri: require(request.redirect_uri.as_deref(), "redirect_uri")?,
                code_verifier: request.code_verifier.clone(),
            }),
            "refresh_token" => Ok(Self::RefreshToken {
                refresh_token: require(request.refresh_token.as_deref(), "refresh_token")?,
            }),
            "password" => Ok(Self::Password {
                username: require(request.username.as_deref(), "username")?,
                password: require(request.password.as_deref(), "password")?,
                scope: request.scope.clone(),
            }),
            "client_credentials" => Ok(Self::ClientCredentials {
                scope: request.scope.clone(),
            }),
            other => Err(AuthError::unsupported_grant_type(other)),
        }
    }

    /// The grant type this grant corresponds to.
    #[must_use]
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::AuthorizationCode { .. } => GrantType::AuthorizationCode,
            Self::RefreshToken { .. } => GrantType::RefreshToken,
            Self::Password { .. } => GrantType::Password,
            Self::ClientCredentials { .. } => GrantType::ClientCredentials,
        }
    }
}

fn require(value: Option<&str>, name: &str) -> Result<String, AuthError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AuthError::invalid_request(format!(
            "missing required parameter: {name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(grant_type: &str) -> TokenRequest {
        TokenRequest {
            grant_type: grant_type.to_string(),
            code: None,
            redirect_uri: None,
            code_verifier: None,
            refresh_token: None,
            username: None,
            password: None,
            scope: None,
            client_id: None,
            client_secret: None,
        }
    }

    #[test]
    fn test_authorization_code_grant() {
        let mut req = request("authorization_code");
        req.code = Some("abc".to_string());
        req.redirect_uri = Some("https://app/cb".to_string());

        let grant = Grant::from_request(&req).unwrap();
        assert_eq!(grant.grant_type(), GrantType::AuthorizationCode);
        match grant {
            Grant::AuthorizationCode {
                code,
                redirect_uri,
                code_verifier,
            } => {
                assert_eq!(code, "abc");
                assert_eq!(redirect_uri, "https://app/cb");
                assert!(code_verifier.is_none());
            }
            other => panic!("unexpected grant: {other:?}"),
        }
    }

    #[test]
    fn test_authorization_code_missing_code() {
        let mut req = request("authorization_code");
        req.redirect_uri = Some("https://app/cb".to_string());
        assert!(matches!(
            Grant::from_request(&req),
            Err(AuthError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_refresh_token_grant() {
        let mut req = request("refresh_token");
        req.refresh_token = Some("rt".to_string());
        assert_eq!(
            Grant::from_request(&req).unwrap().grant_type(),
            GrantType::RefreshToken
        );
    }

    #[test]
    fn test_password_grant_requires_credentials() {
        let mut req = request("password");
        req.username = Some("alice".to_string());
        assert!(Grant::from_request(&req).is_err());

        req.password = Some("secret".to_string());
        assert_eq!(
            Grant::from_request(&req).unwrap().grant_type(),
            GrantType::Password
        );
    }

    #[test]
    fn test_client_credentials_grant() {
        let req = request("client_credentials");
        assert_eq!(
            Grant::from_request(&req).unwrap().grant_type(),
            GrantType::ClientCredentials
        );
    }

    #[test]
    fn test_unknown_grant_type() {
        let req = request("urn:ietf:params:oauth:grant-type:device_code");
        assert!(matches!(
            Grant::from_request(&req),
            Err(AuthError::UnsupportedGrantType { .. })
        ));
    }

    #[test]
    fn test_empty_parameter_treated_as_missing() {
        let mut req = request("refresh_token");
        req.refresh_token = Some(String::new());
        assert!(matches!(
            Grant::from_request(&req),
            Err(AuthError::InvalidRequest { .. })
        ));
    }
}
