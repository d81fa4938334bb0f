//! Adapter between the callback-style asset middleware and async callers.
//!
//! The external asset-serving layer expects a standard HTTP handler shape:
//! a request-like object carrying the URL and a response-like object it
//! writes headers and content to. [`ResponseCapture`] is that response
//! object; it records everything and settles a oneshot future exactly once,
//! so a misbehaving asset layer can reject a fetch but never hang it.

use crate::error::{DevError, Result};
use indexmap::IndexMap;
use tokio::sync::oneshot;

/// A built asset as reported by the asset-serving middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Raw asset content.
    pub content: Vec<u8>,

    /// Headers the asset layer set while serving (content type, length, caching).
    pub headers: IndexMap<String, String>,
}

/// Synthetic request handed to the asset middleware; carries only the URL.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    /// Request URL (path plus optional query).
    pub url: String,
}

/// Terminal outcome recorded by a [`ResponseCapture`].
#[derive(Debug)]
enum Captured {
    Asset(Asset),
    Miss,
    Failed(String),
}

/// Mocked response object satisfying the asset middleware's write contract.
///
/// Headers set on the capture are recorded; `end` resolves the completion
/// future with the accumulated headers and the content. All terminal
/// operations consume the capture so it settles at most once, and dropping
/// it unsettled rejects the future on the caller side.
#[derive(Debug)]
pub struct ResponseCapture {
    headers: IndexMap<String, String>,
    tx: oneshot::Sender<Captured>,
}

impl ResponseCapture {
    fn channel() -> (Self, oneshot::Receiver<Captured>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                headers: IndexMap::new(),
                tx,
            },
            rx,
        )
    }

    /// Record a header to be applied to the real response.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Finish with the asset content.
    pub fn end(self, content: Vec<u8>) {
        let Self { headers, tx } = self;
        let _ = tx.send(Captured::Asset(Asset { content, headers }));
    }

    /// Decline: the middleware has no asset for this URL.
    pub fn miss(self) {
        let _ = self.tx.send(Captured::Miss);
    }

    /// Report a failure serving this URL.
    pub fn fail(self, message: impl Into<String>) {
        let _ = self.tx.send(Captured::Failed(message.into()));
    }
}

/// The external asset-serving middleware contract.
///
/// Mirrors a standard HTTP handler signature: a request-like object and a
/// response-like object. Declining via [`ResponseCapture::miss`] plays the
/// role of the continuation callback in the original API.
pub trait AssetMiddleware: Send + Sync {
    /// Serve `request` by writing into `response`, or decline it.
    fn handle(&self, request: AssetRequest, response: ResponseCapture);
}

/// Ask the asset middleware for the asset matching `url`.
///
/// Resolves with `None` when the middleware declines (not found or still
/// building).
///
/// # Errors
///
/// Fails when the middleware reports an error, or when it drops the
/// capture without settling it.
pub async fn fetch_asset(middleware: &dyn AssetMiddleware, url: &str) -> Result<Option<Asset>> {
    let (capture, rx) = ResponseCapture::channel();
    middleware.handle(
        AssetRequest {
            url: url.to_string(),
        },
        capture,
    );

    match rx.await {
        Ok(Captured::Asset(asset)) => Ok(Some(asset)),
        Ok(Captured::Miss) => Ok(None),
        Ok(Captured::Failed(message)) => Err(DevError::AssetFetch {
            url: url.to_string(),
            message,
        }),
        Err(_) => Err(DevError::AssetFetch {
            url: url.to_string(),
            message: "asset middleware dropped the response without completing it".to_string(),
        }),
    }
}

/// In-memory asset middleware backed by a URL to content map.
///
/// The natural pairing for bundlers that keep build output in memory, and
/// the implementation this crate's own tests serve from.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    files: parking_lot::RwLock<IndexMap<String, (Vec<u8>, String)>>,
}

impl MemoryAssets {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file under a URL path (e.g. `/index.js`).
    pub fn insert(
        &self,
        path: impl Into<String>,
        content: Vec<u8>,
        content_type: impl Into<String>,
    ) {
        self.files
            .write()
            .insert(path.into(), (content, content_type.into()));
    }

    /// Remove a file.
    pub fn remove(&self, path: &str) {
        self.files.write().shift_remove(path);
    }

    /// Drop all files.
    pub fn clear(&self) {
        self.files.write().clear();
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// Determine MIME type from a file name.
    pub fn content_type_for(filename: &str) -> &'static str {
        if filename.ends_with(".js") || filename.ends_with(".mjs") {
            "application/javascript"
        } else if filename.ends_with(".map") || filename.ends_with(".json") {
            "application/json"
        } else if filename.ends_with(".css") {
            "text/css"
        } else if filename.ends_with(".html") {
            "text/html"
        } else if filename.ends_with(".wasm") {
            "application/wasm"
        } else {
            "application/octet-stream"
        }
    }
}

impl AssetMiddleware for MemoryAssets {
    fn handle(&self, request: AssetRequest, mut response: ResponseCapture) {
        // Lookups ignore the query string; the client appends cache busters.
        let path = request
            .url
            .split('?')
            .next()
            .unwrap_or(request.url.as_str());

        let file = self.files.read().get(path).cloned();
        match file {
            Some((content, content_type)) => {
                response.set_header("Content-Type", content_type);
                response.set_header("Content-Length", content.len().to_string());
                response.set_header("Cache-Control", "no-cache");
                response.end(content);
            }
            None => response.miss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAssets;

    impl AssetMiddleware for FailingAssets {
        fn handle(&self, _request: AssetRequest, response: ResponseCapture) {
            response.fail("backend unavailable");
        }
    }

    struct SilentAssets;

    impl AssetMiddleware for SilentAssets {
        fn handle(&self, _request: AssetRequest, response: ResponseCapture) {
            // Never settles; the capture is dropped here.
            drop(response);
        }
    }

    #[tokio::test]
    async fn test_fetch_hit_records_headers() {
        let assets = MemoryAssets::new();
        assets.insert(
            "/index.js",
            b"console.log('hi')".to_vec(),
            "application/javascript",
        );

        let asset = fetch_asset(&assets, "/index.js").await.unwrap().unwrap();
        assert_eq!(asset.content, b"console.log('hi')");
        assert_eq!(
            asset.headers.get("Content-Type").map(String::as_str),
            Some("application/javascript")
        );
        assert_eq!(
            asset.headers.get("Content-Length").map(String::as_str),
            Some("17")
        );
    }

    #[tokio::test]
    async fn test_fetch_ignores_query_string() {
        let assets = MemoryAssets::new();
        assets.insert("/main.css", b"body{}".to_vec(), "text/css");

        let asset = fetch_asset(&assets, "/main.css?t=12345").await.unwrap();
        assert!(asset.is_some());
    }

    #[tokio::test]
    async fn test_fetch_miss() {
        let assets = MemoryAssets::new();
        let result = fetch_asset(&assets, "/missing.js").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let err = fetch_asset(&FailingAssets, "/index.js").await.unwrap_err();
        assert!(err.to_string().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_settles_on_dropped_capture() {
        // An asset layer that never calls back must still settle the fetch.
        let err = fetch_asset(&SilentAssets, "/index.js").await.unwrap_err();
        assert!(err.to_string().contains("without completing"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(
            MemoryAssets::content_type_for("bundle.js"),
            "application/javascript"
        );
        assert_eq!(
            MemoryAssets::content_type_for("bundle.js.map"),
            "application/json"
        );
        assert_eq!(MemoryAssets::content_type_for("style.css"), "text/css");
        assert_eq!(
            MemoryAssets::content_type_for("file.xyz"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_memory_assets_operations() {
        let assets = MemoryAssets::new();
        assert!(assets.is_empty());

        assets.insert("/a.js", b"a".to_vec(), "application/javascript");
        assets.insert("/b.js", b"b".to_vec(), "application/javascript");
        assert_eq!(assets.len(), 2);

        assets.remove("/a.js");
        assert_eq!(assets.len(), 1);

        assets.clear();
        assert!(assets.is_empty());
    }
}
