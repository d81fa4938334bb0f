//! ferry-dev - dev-server middleware bridging a bundler to an HTTP pipeline.
//!
//! This crate is integration glue between three external collaborators:
//! the bundler compiler (observed through [`Compiler`] lifecycle events),
//! its asset-serving middleware (queried through [`AssetMiddleware`]),
//! and the browser clients connected over WebSockets. It intercepts
//! unhandled HTTP requests, asks the asset layer for matching built
//! assets, and writes them into the response; after each rebuild it
//! broadcasts build status (hash, errors, warnings, or ok) to every
//! connected client.
//!
//! # Architecture
//!
//! - [`middleware`] - request interceptor and socket endpoint wiring
//! - [`relay`] - compiler event relay and the stats broadcast policy
//! - [`hub`] - WebSocket client registry and fan-out
//! - [`assets`] - callback-to-future adapter for the asset layer
//! - [`state`] - the lazily-created hub and the latest-stats cell
//! - [`hmr`] - client bootstrap / plugin injection into the build config
//! - [`error`] - structured errors via `thiserror`
//! - [`logger`] - structured logging with tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use ferry_dev::{DevMiddleware, DevServer, MemoryAssets};
//! use ferry_config::BuildConfig;
//! use std::sync::Arc;
//!
//! # struct NullCompiler(tokio::sync::broadcast::Sender<ferry_dev::CompilerEvent>);
//! # impl ferry_dev::Compiler for NullCompiler {
//! #     fn events(&self) -> tokio::sync::broadcast::Receiver<ferry_dev::CompilerEvent> {
//! #         self.0.subscribe()
//! #     }
//! # }
//! # async fn run(mut config: BuildConfig, compiler: NullCompiler) -> ferry_dev::Result<()> {
//! let assets = Arc::new(MemoryAssets::new());
//! let middleware = DevMiddleware::new(&mut config, &compiler, assets)?;
//! DevServer::new(middleware, "127.0.0.1:8090".parse().unwrap())
//!     .start()
//!     .await
//! # }
//! ```

// Public modules
pub mod assets;
pub mod compiler;
pub mod error;
pub mod hmr;
pub mod hub;
pub mod logger;
pub mod middleware;
pub mod relay;
pub mod server;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use assets::{fetch_asset, Asset, AssetMiddleware, AssetRequest, MemoryAssets, ResponseCapture};
pub use compiler::{Compiler, CompilerEvent};
pub use error::{DevError, Result};
pub use hub::{SocketEvent, SocketHub};
pub use middleware::{DevMiddleware, HMR_ENDPOINT};
pub use relay::send_stats;
pub use server::DevServer;
pub use state::{DevState, SharedState};
pub use stats::{AssetStats, BuildStats};
