//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tally_core::TallyError;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable selecting the environment-specific file.
pub const ENVIRONMENT_VAR: &str = "TALLY_ENV";
/// Prefix of environment variable overrides (`TALLY__SERVER__PORT`).
pub const ENV_PREFIX: &str = "TALLY";

/// Configuration loader with reload support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml`
    /// 2. `{dir}/{TALLY_ENV}.toml` (`development` when unset)
    /// 3. `{dir}/local.toml`
    /// 4. Environment variables with the `TALLY__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, TallyError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let config_dir = config_dir.into();
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        let config = Self::load(&config_dir, &environment)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, TallyError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), TallyError> {
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        let new_config = Self::load(&self.config_dir, &environment)?;
        *self.config.write().await = new_config;
        info!("Configuration reloaded");
        Ok(())
    }

    /// Builds and validates the configuration for `environment`.
    pub fn load(config_dir: &Path, environment: &str) -> Result<AppConfig, TallyError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_tally_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            TallyError::Configuration(messages.join("; "))
        })?;

        Ok(app_config)
    }
}

fn config_error_to_tally_error(err: ConfigError) -> TallyError {
    TallyError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(dir.path(), "test").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.jwt_access_expiration_secs, 300);
    }

    #[test]
    fn test_environment_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\nhost = \"127.0.0.1\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("staging.toml"), "[server]\nport = 9100\n").unwrap();

        let config = ConfigLoader::load(dir.path(), "staging").unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[security]\njwt_secret = \"short\"\n").unwrap();

        let err = ConfigLoader::load(dir.path(), "test").unwrap_err();
        assert!(matches!(err, TallyError::Configuration(_)));
        assert!(err.to_string().contains("JWT secret too short"));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path()).unwrap();
        assert_eq!(loader.get().await.observability.log_format, "pretty");

        fs::write(dir.path().join("local.toml"), "[observability]\nlog_format = \"json\"\n").unwrap();
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.observability.log_format, "json");
    }
}
