//! Config file discovery and loading.
//!
//! Searches for `ferry.config.json` / `ferry.config.toml` in a project
//! directory and merges the file with `FERRY_*` environment overrides.
//! Priority: environment variables > config file.

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Toml},
    Figment,
};
use std::path::Path;

/// Conventional JSON config file name.
pub const JSON_FILE: &str = "ferry.config.json";

/// Conventional TOML config file name.
pub const TOML_FILE: &str = "ferry.config.toml";

/// Load a build configuration from a specific file path.
///
/// The format is chosen by extension; anything that is not `.toml` is
/// parsed as JSON. `FERRY_*` environment variables (nested keys separated
/// by `__`, e.g. `FERRY_DEVSERVER__HOT`) override file values.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file does not exist and
/// [`ConfigError::Load`] when parsing or merging fails.
pub fn load_from(path: impl AsRef<Path>) -> Result<BuildConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let figment = if is_toml {
        Figment::from(Toml::file(path))
    } else {
        Figment::from(Json::file(path))
    }
    .merge(
        Env::prefixed("FERRY_")
            .map(|key| {
                // Normalize env keys, then restore the camelCase field names.
                key.as_str()
                    .to_ascii_lowercase()
                    .replace("devserver", "devServer")
                    .replace("indexentry", "indexEntry")
                    .replace("loglevel", "logLevel")
                    .into()
            })
            .split("__")
            // Keep the mapped casing; figment lowercases keys by default,
            // and `map`/`split` reset the flag, so set it last.
            .lowercase(false),
    );

    let config: BuildConfig = figment.extract()?;
    tracing::debug!(path = %path.display(), "loaded build configuration");
    Ok(config)
}

/// Discover and load a config file from a project directory.
///
/// Searches in this order:
/// 1. `ferry.config.json`
/// 2. `ferry.config.toml`
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when neither file exists.
pub fn discover(dir: impl AsRef<Path>) -> Result<BuildConfig> {
    let dir = dir.as_ref();
    for candidate in [JSON_FILE, TOML_FILE] {
        let path = dir.join(candidate);
        if path.exists() {
            return load_from(&path);
        }
    }
    Err(ConfigError::NotFound(dir.join(JSON_FILE)))
}
