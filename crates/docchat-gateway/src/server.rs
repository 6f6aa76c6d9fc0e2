//! HTTP and WebSocket server.

use crate::error::GatewayError;
use crate::state::AppState;
use crate::{pages, routes, socket, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use docchat_core::config::{BindMode, ServerConfig};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind mode.
    pub bind: BindMode,

    /// Port number.
    pub port: u16,

    /// Enable CORS.
    pub cors: bool,

    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for GatewayConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            bind: config.bind,
            port: config.port,
            cors: config.cors,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl GatewayConfig {
    /// Socket address to listen on.
    pub fn bind_address(&self) -> SocketAddr {
        let ip = match self.bind {
            BindMode::Loopback => [127, 0, 0, 1],
            BindMode::Lan => [0, 0, 0, 0],
        };
        SocketAddr::from((ip, self.port))
    }
}

/// Build the application router.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/history", get(pages::history))
        .route("/settings", get(pages::settings))
        .route("/static/script.js", get(pages::script))
        .route("/static/style.css", get(pages::style))
        .route("/upload_file", post(routes::upload_file))
        .route("/get_uploaded_files", get(routes::get_uploaded_files))
        .route("/delete_file", post(routes::delete_file))
        .route("/save_conversation", post(routes::save_conversation))
        .route("/get_conversations", get(routes::get_conversations))
        .route("/retrieve", post(routes::retrieve))
        .route("/health", get(routes::health))
        .route("/ws", get(socket::ws_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .max_age(std::time::Duration::from_secs(3600)),
        );
    }

    router
}

/// The DocChat server.
pub struct Gateway {
    config: GatewayConfig,
    state: AppState,
}

impl Gateway {
    /// Create a server over already-built services.
    pub fn new(config: GatewayConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Shared services.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router for this server.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Run until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: tokio::net::TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        if self.config.bind != BindMode::Loopback {
            warn!("Server is reachable from the network on {} without authentication", addr);
        }
        info!("Starting server on http://{}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        info!("Server stopped");
        Ok(())
    }
}
