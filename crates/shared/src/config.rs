//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Seconds between purges of expired refresh sessions.
    pub session_cleanup_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            session_cleanup_interval_secs: 3600,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Interval for the expired-session sweep, never shorter than a second.
    #[must_use]
    pub fn session_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session_cleanup_interval_secs.max(1))
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`postgres://...` or `sqlite://...`).
    pub url: String,
    /// Pool ceiling.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Pool floor.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Run pending migrations on server startup.
    #[serde(default)]
    pub auto_migrate: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// HS256 signing secret. Required; there is no built-in fallback.
    pub secret: String,
    /// Access token lifetime.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token lifetime.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    15 * 60
}

fn default_refresh_token_expiry() -> u64 {
    7 * 24 * 60 * 60
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tally=debug,tower_http=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TALLY__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
