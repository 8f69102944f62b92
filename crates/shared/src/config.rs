//! Layered application configuration.
//!
//! Sources, lowest to highest precedence: `config/default.toml`, a
//! `config/{RUN_MODE}.toml` overlay, `FLOWMETRIC__`-prefixed environment
//! variables, and finally a bare `DATABASE_URL` (the .env convention the
//! migrator and seeder also read).

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Token validation settings.
    pub jwt: JwtSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Connection pool ceiling.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Token validation settings.
///
/// Tokens are issued by the external identity provider; this backend only
/// verifies signatures against the shared secret.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Shared signing secret.
    pub secret: String,
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a source fails to parse or a required value
    /// (database URL, JWT secret) is missing from every source.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLOWMETRIC").separator("__"));

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}
