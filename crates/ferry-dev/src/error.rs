//! Error types for the dev middleware.

use thiserror::Error;

/// Top-level middleware error type.
///
/// Configuration violations are fatal and raised at setup time; everything
/// else surfaces per request or per fetch.
#[derive(Debug, Error)]
pub enum DevError {
    /// Configuration-related errors (missing dev-server block, unknown index entry)
    #[error("Configuration error: {0}")]
    Config(#[from] ferry_config::ConfigError),

    /// The asset-serving layer reported an error or never completed
    #[error("Asset fetch failed for '{url}': {message}")]
    AssetFetch {
        /// URL whose fetch failed
        url: String,
        /// Message reported by the asset layer
        message: String,
    },

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors from socket operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using `DevError` as the default error type.
pub type Result<T, E = DevError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_fetch_message() {
        let err = DevError::AssetFetch {
            url: "/index.js".to_string(),
            message: "backend unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/index.js"));
        assert!(msg.contains("backend unavailable"));
    }

    #[test]
    fn test_from_config_error() {
        let config_err = ferry_config::ConfigError::MissingField {
            field: "devServer".to_string(),
            hint: "add a devServer block".to_string(),
        };
        let err: DevError = config_err.into();
        assert!(matches!(err, DevError::Config(_)));
    }
}
