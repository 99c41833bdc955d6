//! # HTTP Server for Label Generation and Lookup
//!
//! Serves the embedded frontend and the JSON API wrapping the label
//! pipeline: generate, preview, export (PDF/PNG), registry list and
//! preview-on-demand.
//!
//! ## Usage
//!
//! ```bash
//! etiqueta serve --listen 0.0.0.0:8080 --registry-url https://script.google.com/macros/s/ID/exec
//! ```
//!
//! Then open http://localhost:8080 in a browser.

mod handlers;
mod state;
mod static_files;

pub use state::ServerConfig;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::EtiquetaError;
use state::{AppState, DOWNLOAD_EXPIRATION_SECS};

/// Start the HTTP server.
pub async fn serve(config: ServerConfig) -> Result<(), EtiquetaError> {
    let app_state = Arc::new(AppState::new(config.clone())?);

    // Spawn background download-handle cleanup task
    tokio::spawn(cleanup_downloads(app_state.clone()));

    let app = Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Label API
        .route("/api/label/generate", post(handlers::label::generate))
        .route("/api/label/preview.png", get(handlers::label::preview_png))
        // Export API
        .route("/api/export", post(handlers::export::export))
        .route("/api/download/:id", get(handlers::export::download))
        // Registry API
        .route("/api/registry/list", get(handlers::registry::list))
        .route("/api/registry/preview", post(handlers::registry::preview))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    info!("etiqueta server listening on {}", config.listen_addr);
    match &config.registry_url {
        Some(url) => info!("registry endpoint: {}", url),
        None => info!("registry sync disabled (no URL configured)"),
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task releasing expired download handles. The bounded delay
/// keeps in-flight downloads alive while preventing finished exports from
/// accumulating.
async fn cleanup_downloads(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(10));
    let expiration = Duration::from_secs(DOWNLOAD_EXPIRATION_SECS);

    loop {
        interval.tick().await;

        let mut downloads = state.downloads.write().await;
        let before = downloads.len();
        downloads.retain(|_, entry| entry.created.elapsed() < expiration);
        let after = downloads.len();
        if before != after {
            info!(
                "released {} expired download handles ({} remaining)",
                before - after,
                after
            );
        }
    }
}
