//! Error types for configuration loading and validation.
//!
//! Validation failures are fatal and synchronous: they are raised before
//! any compiler or server object is created, and each variant carries a
//! hint pointing at the offending field.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the expected location
    #[error("Config file not found: {}\n\nHint: create a ferry.config.json or ferry.config.toml, or pass an explicit path", .0.display())]
    NotFound(PathBuf),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// Config file failed to load or merge
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    /// Config file has invalid JSON syntax
    #[error("Invalid JSON in config file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// I/O error while reading config
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Result type alias using `ConfigError` as the default error type.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
