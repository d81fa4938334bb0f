//! HMR wiring injected into the build configuration.
//!
//! When hot reload is enabled the bundler needs two extra modules at the
//! front of the index entry (the client bootstrap and the runtime hook)
//! and its hot-module-replacement plugin at the head of the plugin list.
//! This is the only place the middleware mutates the caller's config.

use crate::error::Result;
use ferry_config::{BuildConfig, PluginSpec};

/// Module specifier prefix of the client bootstrap; the socket address is
/// appended as its query.
pub const CLIENT_MODULE: &str = "ferry-dev/client";

/// Module specifier of the runtime hook prepended after the bootstrap.
pub const HOT_RUNTIME_MODULE: &str = "ferry/hot/runtime";

/// Prepend the HMR plugin and client modules to the configuration.
///
/// No-op unless `devServer.hot` is set. The index entry's original modules
/// keep their relative order after the two prepended entries.
///
/// # Errors
///
/// Fails when the configuration does not validate; injection never runs on
/// a config whose index entry is missing.
pub fn inject_hmr(config: &mut BuildConfig) -> Result<()> {
    let (hot, bootstrap, index_entry) = {
        let dev = config.validate()?;
        (
            dev.hot,
            format!("{}?{}", CLIENT_MODULE, dev.client_url()),
            dev.index_entry.clone(),
        )
    };
    if !hot {
        return Ok(());
    }

    config.plugins.insert(0, PluginSpec::HotModuleReplacement);

    if let Some(modules) = config.entry.get_mut(&index_entry) {
        modules.insert(0, HOT_RUNTIME_MODULE.to_string());
        modules.insert(0, bootstrap);
    }

    tracing::debug!(entry = %index_entry, "hmr modules injected");
    Ok(())
}
