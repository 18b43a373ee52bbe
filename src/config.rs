//! Store configuration.
//!
//! # Examples
//!
//! ```
//! use taskflow::config::{BackendKind, StoreConfig};
//!
//! let config = StoreConfig::default();
//! assert_eq!(config.backend, BackendKind::Memory);
//!
//! let remote = StoreConfig::remote();
//! assert!(!remote.seed_fixtures);
//! ```

use std::time::Duration;
use thiserror::Error;

/// Environment variable selecting the backend (`memory` or `remote`).
pub const BACKEND_ENV: &str = "TASKFLOW_BACKEND";

/// Environment variable holding the persistence timeout in milliseconds.
pub const REQUEST_TIMEOUT_ENV: &str = "TASKFLOW_REQUEST_TIMEOUT_MS";

/// Environment variable toggling sample data for the memory backend.
pub const SEED_FIXTURES_ENV: &str = "TASKFLOW_SEED_FIXTURES";

/// Which record API implementation backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Local in-memory records.
    Memory,
    /// Caller-supplied remote record API client.
    Remote,
}

impl BackendKind {
    /// Returns the configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Remote => "remote",
        }
    }
}

impl TryFrom<&str> for BackendKind {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "memory" | "mock" | "local" => Ok(Self::Memory),
            "remote" => Ok(Self::Remote),
            _ => Err(ConfigError::UnknownBackend(value.to_owned())),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The backend name is not recognised.
    #[error("unknown backend '{0}', expected memory or remote")]
    UnknownBackend(String),

    /// The timeout is not a positive number of milliseconds.
    #[error("invalid request timeout '{0}', expected positive milliseconds")]
    InvalidTimeout(String),

    /// A boolean flag has an unrecognised value.
    #[error("invalid value '{value}' for {key}, expected true or false")]
    InvalidFlag {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// The remote backend was selected but no client was supplied.
    #[error("remote backend selected but no record client was supplied")]
    MissingRemoteClient,
}

/// Configuration for the task store and assignee directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend implementation.
    pub backend: BackendKind,
    /// Upper bound on each persistence call.
    pub request_timeout: Duration,
    /// Whether the memory backend starts with sample data.
    pub seed_fixtures: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            request_timeout: Duration::from_secs(10),
            seed_fixtures: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for a remote record API.
    #[must_use]
    pub fn remote() -> Self {
        Self {
            backend: BackendKind::Remote,
            seed_fixtures: false,
            ..Self::default()
        }
    }

    /// Creates a configuration for an empty in-memory backend.
    ///
    /// Useful for tests that build their own data.
    #[must_use]
    pub fn empty_memory() -> Self {
        Self {
            seed_fixtures: false,
            ..Self::default()
        }
    }

    /// Overrides the persistence timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(backend) = lookup(BACKEND_ENV) {
            config.backend = BackendKind::try_from(backend.as_str())?;
            config.seed_fixtures = config.backend == BackendKind::Memory;
        }
        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config.request_timeout = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(SEED_FIXTURES_ENV) {
            config.seed_fixtures = parse_flag(SEED_FIXTURES_ENV, &raw)?;
        }
        Ok(config)
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_owned(),
            value: raw.to_owned(),
        }),
    }
}
