//! Runtime configuration for the governance program services.
//!
//! # Responsibility
//! - Resolve store location, logging and write access from environment
//!   variables with stable defaults.
//!
//! # Invariants
//! - Resolution is a pure function of the lookup; `from_env` only binds the
//!   process environment to it.
//! - An empty writer list means open access.

use crate::logging::default_log_level;
use crate::security::{AccessPolicy, AllowListPolicy, OpenAccessPolicy};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_DB_PATH: &str = "GOVERNANCE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "GOVERNANCE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GOVERNANCE_LOG_DIR";
pub const ENV_WRITERS: &str = "GOVERNANCE_WRITERS";

const DEFAULT_DB_FILE_NAME: &str = "governance_program.sqlite3";

/// Configuration resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeLogDir(value) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite metadata store file.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    /// Users allowed to write. Empty means everyone.
    pub authorized_writers: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            authorized_writers: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(db_path) = non_blank(ENV_DB_PATH) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(log_dir) = non_blank(ENV_LOG_DIR) {
            let path = PathBuf::from(&log_dir);
            if !path.is_absolute() {
                return Err(ConfigError::RelativeLogDir(log_dir));
            }
            config.log_dir = Some(path);
        }
        if let Some(writers) = non_blank(ENV_WRITERS) {
            config.authorized_writers = writers
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(config)
    }

    /// Builds the access policy described by `authorized_writers`.
    pub fn access_policy(&self) -> Arc<dyn AccessPolicy> {
        if self.authorized_writers.is_empty() {
            Arc::new(OpenAccessPolicy)
        } else {
            Arc::new(AllowListPolicy::new(self.authorized_writers.clone()))
        }
    }
}
