//! Build configuration consumed by the dev middleware.
//!
//! The configuration is owned by the caller and read-only to the
//! middleware, except for the two in-place mutations HMR injection needs
//! (entry list prepend, plugin list prepend).

use crate::dev::DevServerConfig;
use crate::error::{ConfigError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A slot in the bundler's ordered plugin list.
///
/// The middleware only ever prepends the hot-module-replacement plugin;
/// everything else is opaque and passed through to the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginSpec {
    /// The bundler's hot-module-replacement plugin.
    HotModuleReplacement,
    /// Any other plugin, identified by name.
    #[serde(untagged)]
    Named(String),
}

/// Build configuration: entry map, plugin list, and dev-server block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Entry name to ordered module specifier list.
    pub entry: IndexMap<String, Vec<String>>,

    /// Ordered plugin list handed to the bundler.
    pub plugins: Vec<PluginSpec>,

    /// Dev-server block; required by the middleware.
    pub dev_server: Option<DevServerConfig>,
}

impl BuildConfig {
    /// Validate the dev-server contract and return the validated block.
    ///
    /// The `devServer` block must exist and its `indexEntry` must be a key
    /// of the entry map. Violations fail fast, before any compiler or
    /// server object is created.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the block is absent and
    /// [`ConfigError::InvalidValue`] when the index entry is unknown.
    pub fn validate(&self) -> Result<&DevServerConfig> {
        let dev = self
            .dev_server
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "devServer".to_string(),
                hint: "the dev middleware requires a devServer block naming the index entry"
                    .to_string(),
            })?;

        if !self.entry.contains_key(&dev.index_entry) {
            return Err(ConfigError::InvalidValue {
                field: "devServer.indexEntry".to_string(),
                value: dev.index_entry.clone(),
                hint: format!(
                    "no entry named '{}' exists in the entry map",
                    dev.index_entry
                ),
            });
        }

        Ok(dev)
    }
}
