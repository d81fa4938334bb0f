//! The request interceptor and its wiring.
//!
//! [`DevMiddleware`] validates the build configuration, applies HMR
//! injection, spawns the event relay, and attaches two things to a
//! caller-supplied router: the WebSocket endpoint for live-reload clients
//! and a layer that claims unhandled requests by serving built assets.

use crate::assets::{fetch_asset, Asset, AssetMiddleware};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::hmr;
use crate::hub::SocketEvent;
use crate::relay;
use crate::state::{DevState, SharedState};
use axum::{
    body::{to_bytes, Body},
    extract::{
        ws::{Message, WebSocket},
        Request, State, WebSocketUpgrade,
    },
    http::{header::HeaderName, HeaderValue, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use ferry_config::{BuildConfig, DevServerConfig};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;

/// WebSocket endpoint the HMR client connects to.
pub const HMR_ENDPOINT: &str = "/__ferry_hmr__";

/// Dev-server middleware bridging the bundler to an axum pipeline.
///
/// Construction fails fast on configuration violations; nothing is wired
/// after a validation error.
#[derive(Clone)]
pub struct DevMiddleware {
    state: SharedState,
    assets: Arc<dyn AssetMiddleware>,
    hot: bool,
}

impl DevMiddleware {
    /// Validate the configuration, apply HMR injection, and wire the relay.
    ///
    /// The configuration is mutated in place when hot reload is enabled
    /// (entry list prepend, plugin list prepend) so the caller can hand the
    /// same config to the bundler afterwards. The compiler is only
    /// subscribed to, never owned.
    ///
    /// Must be called from within a tokio runtime; the event relay is
    /// spawned here when hot reload is enabled.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the `devServer` block is missing
    /// or its index entry does not exist in the entry map.
    pub fn new(
        config: &mut BuildConfig,
        compiler: &dyn Compiler,
        assets: Arc<dyn AssetMiddleware>,
    ) -> Result<Self> {
        let dev = config.validate()?.clone();
        hmr::inject_hmr(config)?;

        let state: SharedState = Arc::new(DevState::new(dev));
        let hot = state.config().hot;
        if hot {
            relay::spawn(Arc::clone(&state), compiler);
        }

        Ok(Self { state, assets, hot })
    }

    /// Attach the interceptor and the HMR socket route to a router.
    ///
    /// The socket route is only added under hot reload. The interceptor
    /// layer wraps every route, claiming requests that fall through to an
    /// empty 404.
    pub fn attach(&self, router: Router) -> Router {
        let router = if self.hot {
            router.merge(
                Router::new()
                    .route(HMR_ENDPOINT, get(hmr_socket))
                    .with_state(self.clone()),
            )
        } else {
            router
        };

        router.layer(from_fn_with_state(self.clone(), intercept))
    }

    /// Fetch a built asset by URL, bypassing the request pipeline.
    ///
    /// Resolves with `None` when no matching asset exists (not found or
    /// still building).
    ///
    /// # Errors
    ///
    /// Propagates asset-layer failures; callers must handle them.
    pub async fn fetch(&self, url: &str) -> Result<Option<Asset>> {
        fetch_asset(self.assets.as_ref(), url).await
    }

    /// Shared state handle, for embedding and tests.
    pub fn shared_state(&self) -> SharedState {
        Arc::clone(&self.state)
    }
}

/// Two-phase request interceptor.
///
/// Before phase: lazily create the socket hub on the first request under
/// hot reload. Then defer to the downstream chain; on resume, claim the
/// request only when downstream left an empty 404.
async fn intercept(
    State(mw): State<DevMiddleware>,
    request: Request,
    next: Next,
) -> Response {
    if mw.hot {
        mw.state.ensure_hub();
    }

    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    // Anything but 404 means downstream handled the request.
    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    // A 404 with a body is a deliberate downstream answer; leave it alone.
    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(%path, "failed to buffer downstream response: {}", err);
            return internal_error(err.to_string());
        }
    };
    if !bytes.is_empty() {
        return Response::from_parts(parts, Body::from(bytes));
    }

    match mw.fetch(&path).await {
        Ok(Some(asset)) => asset_response(asset, mw.state.config()),
        Ok(None) => Response::from_parts(parts, Body::from(bytes)),
        Err(err) => {
            tracing::error!(%path, "asset fetch failed: {}", err);
            internal_error(err.to_string())
        }
    }
}

/// Build the 200 response for a served asset.
///
/// Asset-reported headers are merged with the configured custom headers;
/// custom headers win on key collisions.
fn asset_response(asset: Asset, config: &DevServerConfig) -> Response {
    let mut headers = asset.headers;
    for (name, value) in &config.headers {
        headers.insert(name.clone(), value.clone());
    }

    let mut builder = Response::builder().status(StatusCode::OK);
    for (name, value) in &headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                builder = builder.header(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid asset header"),
        }
    }

    match builder.body(Body::from(asset.content)) {
        Ok(response) => response,
        Err(err) => internal_error(err.to_string()),
    }
}

/// Return 500 Internal Server Error response.
fn internal_error(message: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Handle WebSocket upgrades on the HMR endpoint.
async fn hmr_socket(State(mw): State<DevMiddleware>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, mw))
}

/// Per-client socket task.
///
/// A new client immediately gets the `hot` readiness greeting, then the
/// latest stats are force-broadcast so late joiners see current build
/// status even when that build emitted nothing. Afterwards hub events are
/// forwarded as JSON text frames until the client disconnects.
async fn handle_socket(socket: WebSocket, mw: DevMiddleware) {
    let hub = mw.state.ensure_hub();
    let (id, mut rx) = hub.register();
    tracing::debug!(client = id, "hmr client connected");

    hub.emit_to(id, SocketEvent::Hot).await;
    let stats = mw.state.stats();
    relay::send_stats(Some(&*hub), stats.as_ref(), true).await;

    let (mut sender, mut receiver) = socket.split();
    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(err) => {
                                tracing::error!("failed to serialize socket event: {}", err);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) if text.as_str() == "ping" => {
                        if sender.send(Message::Text("pong".into())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    hub.unregister(id);
    tracing::debug!(client = id, "hmr client disconnected");
}
