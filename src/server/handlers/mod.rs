//! HTTP API handlers.

pub mod export;
pub mod label;
pub mod registry;

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::EtiquetaError;
use crate::render::LabelRasterizer;
use crate::surface::Surface;

use super::state::AppState;

/// Which mount surface a request addresses.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Primary generation surface.
    Generate,
    /// Secondary lookup/preview surface.
    Lookup,
}

impl Target {
    pub fn surface<'a>(&self, state: &'a AppState) -> &'a RwLock<Surface> {
        match self {
            Target::Generate => &state.generate,
            Target::Lookup => &state.lookup,
        }
    }
}

/// Build a rasterizer with the shared memoized logo. A logo that cannot be
/// loaded downgrades to plain QR codes with a warning.
pub(super) async fn rasterizer_for(state: &AppState) -> LabelRasterizer {
    let logo = match &state.config.logo_path {
        Some(path) => match state.images.get_or_load(path).await {
            Ok(img) => Some(img),
            Err(e) => {
                warn!("logo unavailable, rendering QR without overlay: {}", e);
                None
            }
        },
        None => None,
    };
    LabelRasterizer::new(logo)
}

/// Map an error onto the `{ok:false, message}` envelope the frontend renders.
pub(super) fn error_response(err: EtiquetaError) -> Response {
    let status = match err {
        EtiquetaError::Validation(_) | EtiquetaError::ExportPrecondition(_) => {
            StatusCode::BAD_REQUEST
        }
        EtiquetaError::Registry(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "ok": false, "message": err.to_string() })),
    )
        .into_response()
}
