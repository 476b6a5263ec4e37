use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default` when absent, so an empty
/// configuration file (or none at all) yields a runnable local setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub reports: ReportSettings,
}

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on accepted request bodies, in bytes.
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// PostgreSQL connection string. `DATABASE_URL` overrides this when set.
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply embedded migrations when the server starts.
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `web_server=debug,info`.
    /// `RUST_LOG` takes precedence when it is set.
    pub level: String,
    /// When present, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<String>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// How many students the top-active report returns when no limit is given.
    pub top_active_default_limit: i64,
    pub top_active_max_limit: i64,
}

// --- Default Implementations ---

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/campus_events".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "campus-events.log".to_string(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_active_default_limit: 3,
            top_active_max_limit: 100,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Config {
    /// Rejects settings that would only fail later, at connect or request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is required".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.reports.top_active_default_limit < 1 {
            return Err(ConfigError::ValidationError(
                "reports.top_active_default_limit must be at least 1".to_string(),
            ));
        }
        if self.reports.top_active_default_limit > self.reports.top_active_max_limit {
            return Err(ConfigError::ValidationError(
                "reports.top_active_default_limit cannot exceed reports.top_active_max_limit"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
