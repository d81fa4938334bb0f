//! Relays compiler lifecycle events to connected sockets.
//!
//! Runs independently of any request: compile-start and invalidation map
//! to an `invalid` signal, a finished build stores its stats snapshot and
//! triggers the broadcast policy.

use crate::compiler::{Compiler, CompilerEvent};
use crate::hub::{SocketEvent, SocketHub};
use crate::state::SharedState;
use crate::stats::BuildStats;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Broadcast policy for a completed build.
///
/// Skips entirely when no hub exists yet, no build has completed, or
/// (unless `force` is set) the build emitted no assets. Otherwise emits
/// the build hash followed by exactly one of `errors` (which takes
/// priority over warnings), `warnings`, or `ok`.
pub async fn send_stats(hub: Option<&SocketHub>, stats: Option<&BuildStats>, force: bool) {
    let (Some(hub), Some(stats)) = (hub, stats) else {
        return;
    };
    if !force && !stats.any_emitted() {
        return;
    }

    hub.emit(SocketEvent::Hash(stats.hash.clone())).await;

    if !stats.errors.is_empty() {
        hub.emit(SocketEvent::Errors(stats.errors.clone())).await;
    } else if !stats.warnings.is_empty() {
        hub.emit(SocketEvent::Warnings(stats.warnings.clone())).await;
    } else {
        hub.emit(SocketEvent::Ok).await;
    }
}

/// Spawn the relay task consuming compiler events.
///
/// Registered only when hot reload is enabled. The task ends when the
/// compiler drops its event channel.
pub(crate) fn spawn(state: SharedState, compiler: &dyn Compiler) -> JoinHandle<()> {
    let mut events = compiler.events();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(CompilerEvent::CompileStarted) | Ok(CompilerEvent::Invalidated) => {
                    // No-op until the first request creates the hub.
                    if let Some(hub) = state.hub() {
                        hub.emit(SocketEvent::Invalid).await;
                    }
                }
                Ok(CompilerEvent::Done(stats)) => {
                    tracing::debug!(hash = %stats.hash, "build completed");
                    state.set_stats(stats);

                    let hub = state.hub();
                    let stats = state.stats();
                    send_stats(hub.as_deref(), stats.as_ref(), false).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "relay missed compiler events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::AssetStats;
    use tokio::sync::mpsc::Receiver;

    fn stats(errors: &[&str], warnings: &[&str], emitted: bool) -> BuildStats {
        BuildStats {
            hash: "abc123".to_string(),
            errors: errors.iter().map(|s| s.to_string()).collect(),
            warnings: warnings.iter().map(|s| s.to_string()).collect(),
            assets: vec![AssetStats::new("main.js", emitted)],
        }
    }

    async fn drain(rx: &mut Receiver<SocketEvent>) -> Vec<SocketEvent> {
        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        received
    }

    #[tokio::test]
    async fn test_clean_build_emits_hash_then_ok() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(Some(&hub), Some(&stats(&[], &[], true)), false).await;

        let events = drain(&mut rx).await;
        assert_eq!(
            events,
            vec![
                SocketEvent::Hash("abc123".to_string()),
                SocketEvent::Ok,
            ]
        );
    }

    #[tokio::test]
    async fn test_errors_take_priority_over_warnings() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(
            Some(&hub),
            Some(&stats(&["boom"], &["minor"], true)),
            false,
        )
        .await;

        let events = drain(&mut rx).await;
        assert_eq!(
            events,
            vec![
                SocketEvent::Hash("abc123".to_string()),
                SocketEvent::Errors(vec!["boom".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn test_warnings_only() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(Some(&hub), Some(&stats(&[], &["minor"], true)), false).await;

        let events = drain(&mut rx).await;
        assert_eq!(
            events,
            vec![
                SocketEvent::Hash("abc123".to_string()),
                SocketEvent::Warnings(vec!["minor".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_emitted_assets_skips_broadcast() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(Some(&hub), Some(&stats(&[], &[], false)), false).await;
        assert!(drain(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_force_overrides_emitted_gate() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(Some(&hub), Some(&stats(&[], &[], false)), true).await;

        let events = drain(&mut rx).await;
        assert_eq!(
            events,
            vec![
                SocketEvent::Hash("abc123".to_string()),
                SocketEvent::Ok,
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_hub_or_stats_is_a_noop() {
        let hub = SocketHub::new();
        let (_id, mut rx) = hub.register();

        send_stats(None, Some(&stats(&[], &[], true)), true).await;
        send_stats(Some(&hub), None, true).await;
        assert!(drain(&mut rx).await.is_empty());
    }
}
