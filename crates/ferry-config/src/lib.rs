//! Configuration for the ferry development middleware.
//!
//! The middleware is driven by a single caller-supplied [`BuildConfig`]: an
//! entry-module mapping, an ordered plugin list, and a nested dev-server
//! block. This crate owns those types, their validation, and discovery of
//! `ferry.config.json` / `ferry.config.toml` files with environment
//! overrides.

pub mod config;
pub mod dev;
pub mod discovery;
pub mod error;

// Re-export main types
pub use config::{BuildConfig, PluginSpec};
pub use dev::{DevServerConfig, LogLevel, DEFAULT_HOST, DEFAULT_PORT};
pub use discovery::{discover, load_from};
pub use error::{ConfigError, Result};
