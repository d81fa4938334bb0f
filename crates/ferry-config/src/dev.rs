//! Dev-server block of the build configuration.
//!
//! Names the index entry the middleware serves, controls hot reload, and
//! carries the address advertised to the HMR client bootstrap plus the
//! custom headers merged into every served asset's response.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host used for the client bootstrap when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used for the client bootstrap when none is configured.
pub const DEFAULT_PORT: u16 = 8090;

/// Logging verbosity of the middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Directive understood by `tracing` environment filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Dev-server configuration nested under `devServer` in the build config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    /// Name of the entry the middleware serves; must exist in the entry map.
    pub index_entry: String,

    /// Enable hot reload and the socket broadcast channel.
    #[serde(default)]
    pub hot: bool,

    /// Host advertised to the HMR client bootstrap.
    #[serde(default)]
    pub host: Option<String>,

    /// Port advertised to the HMR client bootstrap.
    #[serde(default)]
    pub port: Option<u16>,

    /// Advertise an `https` address to the client bootstrap.
    #[serde(default)]
    pub secure: bool,

    /// Custom headers merged into every served asset's response.
    /// These win over asset-reported headers on key collisions.
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Logging verbosity of the middleware.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl DevServerConfig {
    /// Minimal configuration naming only the index entry.
    pub fn new(index_entry: impl Into<String>) -> Self {
        Self {
            index_entry: index_entry.into(),
            hot: false,
            host: None,
            port: None,
            secure: false,
            headers: IndexMap::new(),
            log_level: LogLevel::default(),
        }
    }

    /// Address advertised to the HMR client bootstrap.
    ///
    /// Falls back to `localhost:8090` when host or port are unspecified.
    pub fn client_url(&self) -> String {
        let protocol = if self.secure { "https" } else { "http" };
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("{}://{}:{}", protocol, host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_defaults() {
        let config = DevServerConfig::new("main");
        assert_eq!(config.client_url(), "http://localhost:8090");
    }

    #[test]
    fn test_client_url_explicit() {
        let mut config = DevServerConfig::new("main");
        config.host = Some("0.0.0.0".to_string());
        config.port = Some(9000);
        assert_eq!(config.client_url(), "http://0.0.0.0:9000");
    }

    #[test]
    fn test_client_url_secure() {
        let mut config = DevServerConfig::new("main");
        config.secure = true;
        assert_eq!(config.client_url(), "https://localhost:8090");
    }

    #[test]
    fn test_log_level_filter_directives() {
        assert_eq!(LogLevel::Silent.as_str(), "off");
        assert_eq!(LogLevel::default().as_str(), "info");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "indexEntry": "app",
            "hot": true,
            "port": 9000,
            "headers": { "X-Dev": "1" }
        }"#;

        let config: DevServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.index_entry, "app");
        assert!(config.hot);
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.headers.get("X-Dev").map(String::as_str), Some("1"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_deserialize_missing_index_entry_fails() {
        let json = r#"{ "hot": true }"#;
        assert!(serde_json::from_str::<DevServerConfig>(json).is_err());
    }
}
