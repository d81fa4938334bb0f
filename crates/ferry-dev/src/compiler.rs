//! Contract consumed from the external bundler compiler.
//!
//! The compiler owns the build graph and drives rebuilds in the background;
//! the middleware only observes its lifecycle. Hook registration is
//! expressed as a broadcast subscription: each `compile` / `invalid` /
//! `done` hook of the original callback API becomes an event variant.

use crate::stats::BuildStats;
use tokio::sync::broadcast;

/// Lifecycle signals reported by the bundler compiler.
#[derive(Debug, Clone)]
pub enum CompilerEvent {
    /// A compilation pass started.
    CompileStarted,

    /// Watched inputs changed; a rebuild is imminent.
    Invalidated,

    /// A build finished; carries the serialized stats snapshot.
    Done(BuildStats),
}

/// The bundler compiler as seen by the middleware.
///
/// Implementations are constructed by the caller from the build
/// configuration; the middleware never owns one beyond subscribing to its
/// events during setup.
pub trait Compiler: Send + Sync {
    /// Subscribe to lifecycle events.
    ///
    /// Each call returns an independent receiver positioned at the current
    /// end of the event stream.
    fn events(&self) -> broadcast::Receiver<CompilerEvent>;
}

impl<T: Compiler + ?Sized> Compiler for std::sync::Arc<T> {
    fn events(&self) -> broadcast::Receiver<CompilerEvent> {
        (**self).events()
    }
}
