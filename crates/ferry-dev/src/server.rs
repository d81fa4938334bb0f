//! Convenience dev server wrapping the middleware.
//!
//! The middleware is usable on any axum router; this wrapper covers the
//! common case of a standalone dev server: a permissive-CORS router whose
//! only job is to let the interceptor serve build output.

use crate::error::{DevError, Result};
use crate::middleware::DevMiddleware;
use axum::{http::StatusCode, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

/// Standalone development server.
pub struct DevServer {
    middleware: DevMiddleware,
    addr: SocketAddr,
}

impl DevServer {
    /// Create a server serving `middleware` on `addr`.
    pub fn new(middleware: DevMiddleware, addr: SocketAddr) -> Self {
        Self { middleware, addr }
    }

    /// Build the router: interceptor, HMR socket route, CORS, and a
    /// fallback whose 404 carries no body so the interceptor can still
    /// claim the request.
    pub fn router(&self) -> Router {
        let router = Router::new().fallback(not_found);
        self.middleware.attach(router).layer(
            // Allow all origins for dev
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    }

    /// Bind and serve until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error when the address cannot be bound or the server
    /// loop fails.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| DevError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!("Development server running at http://{}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| DevError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// Empty-body 404 fallback; the interceptor treats it as unhandled.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_found_has_no_body() {
        use axum::response::IntoResponse;

        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
