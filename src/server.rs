//! HTTP server wiring: layers, listener and shutdown.

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, Database};
use crate::routes;

/// Cross-origin settings for browser consumers
///
/// `*` or an empty value allows any origin; otherwise a comma-separated list.
pub fn setup_cors(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
}

/// The API router with tracing and CORS applied
pub fn app(db: Database, config: &Config) -> Router {
    routes::router(db)
        .layer(setup_cors(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Connect to the store, serve until Ctrl-C, then release the pool
pub async fn serve(config: &Config, port: u16) -> Result<()> {
    let db = db::init(config).await?;
    let app = app(db.clone(), config);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
