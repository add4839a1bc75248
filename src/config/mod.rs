//! Configuration and credential storage.

use serde::{Deserialize, Serialize};

mod credentials;
mod loader;

pub use credentials::{
    is_usable_token, CredentialError, CredentialKey, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, SecureString,
};
pub use loader::ConfigError;

/// Fixed fallback for the backend base URL when neither the environment
/// variable nor the config file provides one.
pub const DEFAULT_API_BASE: &str = "https://case.nodelabs.dev/api";

/// Environment variable overriding the configured base URL.
pub const API_BASE_ENV_VAR: &str = "FINBOARD_API_URL";

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
}

/// Settings for the backend REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g. "https://case.nodelabs.dev/api").
    pub base_url: String,
    /// Connection timeout for outbound requests, in seconds.
    pub connect_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout_seconds: 10,
        }
    }
}
