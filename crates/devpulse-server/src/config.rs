use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub github: GithubConfig,
    pub cache: CacheConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Account identity and access token for the upstream API
#[derive(Debug, Deserialize)]
pub struct GithubConfig {
    pub token: SecretString,
    pub username: String,
}

/// Freshness windows for the two cached payloads and the fetch horizon
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    pub activity_ttl_secs: u64,
    pub analytics_ttl_secs: u64,
    pub history_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct WebhookConfig {
    pub secret: SecretString,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later sources
    /// override earlier ones):
    /// 1. Default values
    /// 2. config.toml file (if present)
    /// 3. Environment variables (prefixed with DEVPULSE_)
    ///
    /// Environment variables use double underscore for nesting:
    /// - DEVPULSE_GITHUB__TOKEN=ghp_...
    /// - DEVPULSE_GITHUB__USERNAME=octo
    /// - DEVPULSE_SERVER__PORT=8080
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("cache.activity_ttl_secs", 30)?
            .set_default("cache.analytics_ttl_secs", 600)?
            .set_default("cache.history_days", 365)?;

        // Try to load config.toml if it exists
        let builder = if Path::new("config.toml").exists() {
            builder.add_source(File::with_name("config"))
        } else {
            builder
        };

        // Override with environment variables
        let builder = builder.add_source(
            Environment::with_prefix("DEVPULSE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
