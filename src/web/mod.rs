//! Web layer module
//!
//! Thin HTTP surface over the catalog engine and the stream pipeline. The
//! read endpoints always answer 200 with possibly empty lists; only the
//! admin endpoint reports failures through the status code.

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, UserConfig};
use crate::services::{CatalogQueryEngine, RegenerationCommand, StreamResolutionPipeline};

pub mod extractors;
pub mod handlers;
pub mod responses;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_config: UserConfig,
    pub catalog: Arc<CatalogQueryEngine>,
    pub streams: Arc<StreamResolutionPipeline>,
    pub regeneration: Arc<RegenerationCommand>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<CatalogQueryEngine>,
        streams: Arc<StreamResolutionPipeline>,
        regeneration: Arc<RegenerationCommand>,
    ) -> Self {
        Self {
            user_config: config.user_config(),
            config: Arc::new(config),
            catalog,
            streams,
            regeneration,
        }
    }
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
        Ok(Self {
            app: Self::create_router(state),
            addr,
        })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/manifest.json", get(handlers::manifest::manifest))
            .route("/catalog/{kind}/{file}", get(handlers::catalog::catalog))
            .route(
                "/catalog/{kind}/{catalog_id}/{extra}",
                get(handlers::catalog::catalog_with_extra),
            )
            .route("/meta/{kind}/{file}", get(handlers::meta::meta))
            .route("/stream/{kind}/{file}", get(handlers::streams::streams))
            .route("/admin/regenerate", post(handlers::admin::regenerate))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Serve until SIGTERM or SIGINT
    pub async fn serve(self) -> Result<()> {
        self.serve_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

/// Resolves on SIGTERM or SIGINT (Ctrl+C elsewhere)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install signal handlers: {}", e);
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
