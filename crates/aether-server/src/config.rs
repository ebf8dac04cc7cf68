//! Server configuration: HTTP binding, logging, auth policy, and seed
//! data for the in-memory backends.

use std::path::Path;

use aether_auth::config::AuthConfig;
use aether_auth::types::GrantType;
use serde::{Deserialize, Serialize};

/// Root server configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listener settings.
    pub server: HttpConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Authorization server policy.
    pub auth: AuthConfig,

    /// Clients registered at startup.
    pub clients: Vec<ClientSeed>,

    /// User accounts created at startup.
    pub users: Vec<UserSeed>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log filter, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A client registration seeded at startup.
///
/// The secret is given in plaintext here and hashed before it reaches
/// the registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientSeed {
    pub client_id: String,
    pub client_secret: String,
    pub name: String,

    #[serde(default)]
    pub redirect_uris: Vec<String>,

    #[serde(default)]
    pub scopes: Vec<String>,

    pub grant_types: Vec<GrantType>,

    #[serde(default = "default_true")]
    pub active: bool,
}

/// A user account seeded at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSeed {
    pub username: String,
    pub password: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error(transparent)]
    Invalid(#[from] aether_auth::config::ConfigError),
}

/// Loads and validates a configuration file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, does not parse, or
/// fails validation.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let config: ServerConfig = toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
        path: path.display().to_string(),
        source: Box::new(source),
    })?;

    config.auth.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [logging]
            level = "debug"

            [auth]
            issuer = "https://id.example.com"
            login_url = "https://id.example.com/login"

            [auth.oauth]
            access_token_lifetime = "15m"

            [[clients]]
            client_id = "web"
            client_secret = "s1"
            name = "Web App"
            redirect_uris = ["https://app/cb"]
            scopes = ["openid", "email"]
            grant_types = ["authorization_code", "refresh_token"]

            [[users]]
            username = "alice"
            password = "secret"
            email = "alice@example.com"
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.clients.len(), 1);
        assert!(config.clients[0].active);
        assert_eq!(
            config.clients[0].grant_types,
            vec![GrantType::AuthorizationCode, GrantType::RefreshToken]
        );
        assert_eq!(config.users[0].username, "alice");
        assert!(config.auth.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.clients.is_empty());
    }
}
