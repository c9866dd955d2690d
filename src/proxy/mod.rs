//! Analysis proxy server.
//!
//! Serves `POST /api/analyze` and forwards the drawing unchanged to the
//! configured backend, relaying the backend's status and JSON body. There is
//! no retry, auth or rate limiting; each request is one backend call.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Extension, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::analysis::ANALYZE_PATH;
use crate::config::ChalkxConfig;

pub mod routes;

/// Largest request body the proxy accepts. Drawings arrive as base64 PNGs,
/// which easily exceed axum's 2 MB default.
pub const MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

/// Error type for running the proxy
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Could not listen on the configured address
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared state handed to every request.
#[derive(Clone, Debug)]
pub struct ProxyState {
    pub http: reqwest::Client,
    pub backend_url: String,
}

impl ProxyState {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), backend_url)
    }

    pub fn with_http(http: reqwest::Client, backend_url: impl Into<String>) -> Self {
        let backend_url = backend_url.into().trim_end_matches('/').to_string();
        Self { http, backend_url }
    }

    /// Backend URL the drawing is forwarded to.
    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.backend_url, ANALYZE_PATH)
    }
}

/// Log method, path, status and latency of every request.
async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

/// Build the router with `state` attached.
pub fn app(state: ProxyState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(middleware::from_fn(log_requests))
        .layer(Extension(state))
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: ProxyState, shutdown: F) -> Result<(), ProxyError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(?addr, backend = %state.backend_url, "analysis proxy listening");
    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown).await?;
    info!("analysis proxy stopped");
    Ok(())
}

/// Bind the configured address and serve until Ctrl+C.
pub async fn run(config: &ChalkxConfig) -> Result<(), ProxyError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ProxyError::Bind { addr: addr.clone(), source })?;

    let state = ProxyState::new(config.backend.url.clone());
    serve(listener, state, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stop signal received, shutting down server...");
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_url() {
        let state = ProxyState::new("http://localhost:5000/");
        assert_eq!(state.analyze_url(), "http://localhost:5000/api/analyze");
    }

    #[tokio::test]
    async fn test_run_reports_bind_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let mut config = crate::config::default_config();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;

        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, ProxyError::Bind { .. }));
        assert!(err.to_string().contains(&port.to_string()));
    }
}
