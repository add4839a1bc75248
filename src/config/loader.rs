use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ApiConfig, Config, API_BASE_ENV_VAR};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/finboard/config.toml` on Unix/macOS, or equivalent
    /// on other platforms via `dirs::config_dir()`. Falls back to the
    /// current directory if the config dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("finboard").join("config.toml")
    }

    /// Loads configuration from the default config file, then applies the
    /// `FINBOARD_API_URL` environment override.
    ///
    /// - If the file doesn't exist, starts from `Config::default()`.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var(API_BASE_ENV_VAR) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()
    }
}

impl ApiConfig {
    /// Checks that the base URL is present and plausibly an HTTP endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "api.base_url must not be empty".to_string(),
            });
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                message: format!("api.base_url '{}' is not an HTTP URL", self.base_url),
            });
        }

        Ok(())
    }
}
