//! Token revocation types (RFC 7009).

use serde::{Deserialize, Serialize};

/// Hint for which token store to search first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }

    /// Parses a hint value. Unknown hints are ignored per RFC 7009, so
    /// this returns `None` rather than an error.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "access_token" => Some(Self::AccessToken),
            "refresh_token" => Some(Self::RefreshToken),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenTypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated revocation request.
#[derive(Debug, Clone)]
pub struct RevocationRequest {
    /// The token to revoke.
    pub token: String,

    /// Optional hint for which store to search first.
    pub token_type_hint: Option<TokenTypeHint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_parse() {
        assert_eq!(TokenTypeHint::parse("access_token"), Some(TokenTypeHint::AccessToken));
        assert_eq!(
            TokenTypeHint::parse("refresh_token"),
            Some(TokenTypeHint::RefreshToken)
        );
        // Unknown hints are ignored, not rejected.
        assert_eq!(TokenTypeHint::parse("paseto"), None);
    }
}
