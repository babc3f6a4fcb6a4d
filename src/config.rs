//! # Configuration
//!
//! Layered configuration: built-in defaults, an optional
//! `campus-market.toml` file, then `CAMPUS_MARKET__*` environment
//! overrides (e.g. `CAMPUS_MARKET__SERVER__PORT=9000`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// Token issuance settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Override outside development.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "campus-market-dev-secret".to_owned(),
            token_ttl_secs: 86_400,
        }
    }
}

/// Marketplace policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Identity that signs system notifications. Provisioned at startup
    /// if absent, so notification emission never depends on a runtime
    /// admin lookup.
    pub system_identity: String,
    /// Whether moderation may ban a listing that has already been sold.
    pub allow_ban_sold: bool,
    /// Takedown notice text used when the moderator gives no reason.
    pub default_takedown_reason: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            system_identity: "system".to_owned(),
            allow_ban_sold: true,
            default_takedown_reason: "violation of marketplace policy".to_owned(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Token issuance settings.
    pub auth: AuthConfig,
    /// Marketplace policy settings.
    pub market: MarketConfig,
}

impl AppConfig {
    /// Loads configuration from defaults, file and environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value cannot
    /// be deserialized.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("campus-market").required(false))
            .add_source(Environment::with_prefix("CAMPUS_MARKET").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Returns the socket address string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.market.system_identity, "system");
        assert!(cfg.market.allow_ban_sold);
        assert!(cfg.auth.token_ttl_secs > 0);
    }

    #[test]
    fn bind_addr_format() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
    }
}
