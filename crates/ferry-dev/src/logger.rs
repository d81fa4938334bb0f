//! Logging infrastructure for the dev middleware.
//!
//! Structured logging via the `tracing` ecosystem. Hosts embedding the
//! middleware usually install their own subscriber; standalone use calls
//! [`init_logger`] once at startup.

use ferry_config::DevServerConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once, before any logging occurs.
///
/// # Verbosity
///
/// 1. `verbose` - DEBUG for ferry crates
/// 2. `quiet` - errors only
/// 3. `RUST_LOG` environment variable - custom filter
/// 4. Default - INFO for ferry crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("ferry_dev=debug,ferry_config=debug")
    } else if quiet {
        EnvFilter::new("ferry_dev=error,ferry_config=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ferry_dev=info,ferry_config=info"))
    };

    init_logger_with_filter(filter, no_color);
}

/// Initialize from the verbosity configured under `devServer.logLevel`.
pub fn init_logger_from(config: &DevServerConfig, no_color: bool) {
    init_logger_with_filter(config_filter(config), no_color);
}

fn config_filter(config: &DevServerConfig) -> EnvFilter {
    let level = config.log_level.as_str();
    EnvFilter::new(format!("ferry_dev={level},ferry_config={level}"))
}

/// Initialize with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
