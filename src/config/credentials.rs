//! Credential storage shared by the HTTP client and the session controller.
//!
//! The persisted access/refresh tokens are a process-wide resource with two
//! writers: the session controller (login/logout/refresh) and the HTTP
//! client (clear on 401). Both receive the same store by reference at
//! construction, and `clear` is idempotent so the writers may race.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// The two durable credential entries, keyed by fixed names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKey {
    AccessToken,
    RefreshToken,
}

impl CredentialKey {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialKey::AccessToken => "access_token",
            CredentialKey::RefreshToken => "refresh_token",
        }
    }
}

/// Literal value some frontends persist when a token was never set.
/// Treated as absent when restoring a session.
const PLACEHOLDER_TOKEN: &str = "undefined";

/// Whether a persisted token value can actually authenticate a session.
pub fn is_usable_token(value: &str) -> bool {
    !value.is_empty() && value != PLACEHOLDER_TOKEN
}

/// Errors that can occur when persisting credentials.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read credential file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write credential file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock credential file '{path}': {source}")]
    LockError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize credentials: {source}")]
    SerializeError {
        #[source]
        source: toml::ser::Error,
    },
}

/// Durable storage for the session credentials.
///
/// `get` is infallible: a missing or unreadable entry is simply absent.
/// `clear` must be idempotent; it is invoked by both the session controller
/// (logout, refresh failure) and the HTTP client (401).
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: CredentialKey) -> Option<SecureString>;
    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
}

#[derive(Debug, Default)]
struct TokenPair {
    access: Option<String>,
    refresh: Option<String>,
}

/// In-memory credential store for tests and embedders that manage their
/// own persistence.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tokens: Mutex<TokenPair>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<SecureString> {
        let tokens = self.tokens.lock();
        let value = match key {
            CredentialKey::AccessToken => tokens.access.clone(),
            CredentialKey::RefreshToken => tokens.refresh.clone(),
        };
        value.map(SecureString::new)
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError> {
        let mut tokens = self.tokens.lock();
        match key {
            CredentialKey::AccessToken => tokens.access = Some(value.to_string()),
            CredentialKey::RefreshToken => tokens.refresh = Some(value.to_string()),
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.tokens.lock() = TokenPair::default();
        Ok(())
    }
}

/// On-disk serialized form of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TokenFile {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// File-backed credential store.
///
/// Tokens live in a small TOML file; writes take an advisory lock so that
/// concurrent processes (or the 401 clear racing a logout) do not interleave
/// partial updates.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by a specific file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the platform data directory,
    /// e.g. `~/.local/share/finboard/credentials.toml`.
    pub fn at_default_location() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(data_dir.join("finboard").join("credentials.toml"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_tokens(&self) -> TokenFile {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return TokenFile::default();
        };
        toml::from_str(&content).unwrap_or_default()
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: CredentialKey) -> Option<SecureString> {
        let tokens = self.read_tokens();
        let value = match key {
            CredentialKey::AccessToken => tokens.access_token,
            CredentialKey::RefreshToken => tokens.refresh_token,
        };
        value.map(SecureString::new)
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CredentialError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| CredentialError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        file.lock_exclusive().map_err(|e| CredentialError::LockError {
            path: self.path.clone(),
            source: e,
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| CredentialError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
        let mut tokens: TokenFile = toml::from_str(&content).unwrap_or_default();

        match key {
            CredentialKey::AccessToken => tokens.access_token = Some(value.to_string()),
            CredentialKey::RefreshToken => tokens.refresh_token = Some(value.to_string()),
        }

        let serialized =
            toml::to_string(&tokens).map_err(|e| CredentialError::SerializeError { source: e })?;

        file.set_len(0).map_err(|e| CredentialError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| CredentialError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;
        file.write_all(serialized.as_bytes())
            .map_err(|e| CredentialError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        // Advisory lock released when `file` drops.
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::WriteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
