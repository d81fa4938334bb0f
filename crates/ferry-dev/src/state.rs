//! Process-wide shared state for the dev middleware.
//!
//! Two cells outlive any single request: the socket hub, created at most
//! once on first use, and the latest build stats, overwritten on every
//! completed build. Readers see either the old or the new snapshot, never
//! a torn one; the locks here are the only synchronization involved.

use crate::hub::SocketHub;
use crate::stats::BuildStats;
use ferry_config::DevServerConfig;
use parking_lot::RwLock;
use std::sync::Arc;

/// State shared by the request interceptor, the event relay, and the
/// socket endpoint.
#[derive(Debug)]
pub struct DevState {
    /// Validated dev-server configuration
    config: DevServerConfig,

    /// Socket hub; `None` until the first request under hot reload
    hub: RwLock<Option<Arc<SocketHub>>>,

    /// Latest completed build stats; `None` until the first build finishes
    stats: RwLock<Option<BuildStats>>,
}

/// Shared state handle for passing around the middleware.
pub type SharedState = Arc<DevState>;

impl DevState {
    /// Create state for a validated dev-server configuration.
    pub fn new(config: DevServerConfig) -> Self {
        Self {
            config,
            hub: RwLock::new(None),
            stats: RwLock::new(None),
        }
    }

    /// The dev-server configuration this state was created from.
    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }

    /// Return the hub, creating it on first use.
    ///
    /// The hub is never recreated: once a hub exists every caller gets the
    /// same instance for the rest of the process lifetime.
    pub fn ensure_hub(&self) -> Arc<SocketHub> {
        if let Some(hub) = self.hub.read().as_ref() {
            return Arc::clone(hub);
        }

        let mut slot = self.hub.write();
        // Re-check: another caller may have won between the two locks.
        if let Some(hub) = slot.as_ref() {
            return Arc::clone(hub);
        }

        let hub = Arc::new(SocketHub::new());
        *slot = Some(Arc::clone(&hub));
        tracing::debug!("socket hub created");
        hub
    }

    /// The hub, if one has been created.
    pub fn hub(&self) -> Option<Arc<SocketHub>> {
        self.hub.read().clone()
    }

    /// Overwrite the latest build stats.
    pub fn set_stats(&self, stats: BuildStats) {
        *self.stats.write() = Some(stats);
    }

    /// Snapshot of the latest build stats, if any build has completed.
    pub fn stats(&self) -> Option<BuildStats> {
        self.stats.read().clone()
    }
}
