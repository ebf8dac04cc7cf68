//! Scope parsing and narrowing.
//!
//! Scopes travel on the wire as a single space-delimited string and are
//! handled internally as ordered vectors. Requested scopes are narrowed
//! against what the client is registered for; a request is never widened.

/// Parses a space-delimited scope string into individual scopes.
///
/// Empty segments from repeated whitespace are dropped.
#[must_use]
pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(ToString::to_string).collect()
}

/// Joins scopes into the wire format.
#[must_use]
pub fn join_scopes(scopes: &[String]) -> String {
    scopes.join(" ")
}

/// Narrows a requested scope set to those present in `allowed`.
///
/// The requested order is preserved. Returns an empty vector when nothing
/// survives; callers decide whether that is an error or a fallback to a
/// default set.
#[must_use]
pub fn narrow_scopes(requested: &[String], allowed: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|scope| allowed.contains(scope))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_scopes() {
        assert_eq!(
            parse_scopes("openid profile email"),
            scopes(&["openid", "profile", "email"])
        );
        assert_eq!(parse_scopes("  openid   email "), scopes(&["openid", "email"]));
        assert!(parse_scopes("").is_empty());
        assert!(parse_scopes("   ").is_empty());
    }

    #[test]
    fn test_join_scopes() {
        assert_eq!(join_scopes(&scopes(&["openid", "email"])), "openid email");
        assert_eq!(join_scopes(&[]), "");
    }

    #[test]
    fn test_narrow_preserves_requested_order() {
        let requested = scopes(&["email", "openid", "admin"]);
        let allowed = scopes(&["openid", "profile", "email"]);
        assert_eq!(narrow_scopes(&requested, &allowed), scopes(&["email", "openid"]));
    }

    #[test]
    fn test_narrow_to_empty() {
        let requested = scopes(&["admin"]);
        let allowed = scopes(&["openid"]);
        assert!(narrow_scopes(&requested, &allowed).is_empty());
    }
}
