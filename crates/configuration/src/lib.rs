use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, ReportSettings, ServerSettings};

/// Name (without extension) of the file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "campus-events";

/// Loads the application configuration.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults,
/// 2. the TOML file at `path` (required), or `campus-events.toml` in the
///    working directory (optional),
/// 3. `CAMPUS__SECTION__KEY` environment variables,
/// 4. `DATABASE_URL`, which always wins for `database.url`.
///
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("CAMPUS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

/// Server settings that may be overridden from the command line.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ServerOverrides {
    /// Address to bind, e.g. 127.0.0.1.
    #[arg(long)]
    pub host: Option<std::net::IpAddr>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,
}

#[cfg(feature = "clap")]
impl ServerOverrides {
    pub fn apply(&self, server: &mut ServerSettings) {
        if let Some(host) = self.host {
            server.host = host;
        }
        if let Some(port) = self.port {
            server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let dir = std::env::temp_dir().join(format!("campus-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[database]\nurl = \"postgres://db/campus\"\n\n[reports]\ntop_active_default_limit = 5"
        )
        .unwrap();

        // DATABASE_URL may be set in the developer's shell; only assert on it when it is not.
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.reports.top_active_default_limit, 5);
        assert_eq!(config.reports.top_active_max_limit, 100);
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(config.database.url, "postgres://db/campus");
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
