//! Web layer module
//!
//! HTTP interface for the image catalog. Handlers are thin: they read the
//! current snapshot and delegate to the search functions, or trigger a
//! refresh through the shared overlap guard. The gallery front-end is
//! plain static files served from the configured directory.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::{cache::CacheStore, config::Config, refresh::RefreshService};

pub mod handlers;
pub mod responses;

pub use responses::{handle_error, handle_result, ApiResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheStore>,
    pub refresh: Arc<RefreshService>,
    pub config: Config,
    /// Application start time for uptime calculation
    pub start_time: chrono::DateTime<chrono::Utc>,
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        let app = create_router(state);
        Ok(Self { app, addr })
    }

    /// Serve until the process is asked to stop, signalling once the
    /// listener is bound (or failed to bind)
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
        cancellation_token: tokio_util::sync::CancellationToken,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                let shutdown_signal = async move {
                    cancellation_token.cancelled().await;
                    tracing::info!("Web server received shutdown signal, draining connections");
                };

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal)
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let message = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", message)));
                Err(anyhow::anyhow!("{}", message))
            }
        }
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Create the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.web.static_dir.clone();

    Router::new()
        // Health check endpoint (no payload requirements)
        .route("/health", get(handlers::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Gallery front-end
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/images", get(handlers::list_images))
        .route("/images/search", get(handlers::search_images))
        .route("/images/random", get(handlers::random_images))
        .route("/images/count", get(handlers::count_images))
        .route("/refresh", post(handlers::trigger_refresh))
}
