//! Label generation and preview handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::compose::compose;
use crate::export::encode_png;
use crate::label::LabelRecord;
use crate::render::{RasterOptions, Rasterizer};

use super::super::state::AppState;
use super::{Target, error_response, rasterizer_for};

/// Form data for label generation.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub pedido: String,
    #[serde(default)]
    pub quadro: String,
    #[serde(default)]
    pub link: String,
}

/// Handle POST /api/label/generate - compose today's label onto the primary
/// surface and fire a best-effort registry write.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(form): Json<GenerateForm>,
) -> Response {
    let record = match LabelRecord::with_today(&form.pedido, &form.quadro, &form.link) {
        Ok(record) => record,
        Err(e) => return error_response(e),
    };
    let view = match compose(&record) {
        Ok(view) => view,
        Err(e) => return error_response(e),
    };

    // Composition completes (and the preview is mounted) before the registry
    // write is issued.
    state.generate.write().await.mount(record.clone(), view);
    info!("label composed: pedido={}", record.order_id);

    // Best-effort write: attempted exactly once, failure never retracts the
    // already-rendered label.
    let task_state = state.clone();
    tokio::spawn(async move {
        match &task_state.registry {
            Some(registry) => match registry.add(&record).await {
                Ok(()) => info!("registry add accepted: pedido={}", record.order_id),
                Err(e) => warn!("registry add failed (best-effort): {}", e),
            },
            None => warn!("registry URL not configured; skipping add"),
        }
    });

    Json(json!({ "ok": true })).into_response()
}

/// Query parameters for the preview image.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub target: Target,
}

/// Handle GET /api/label/preview.png - render the addressed surface at
/// nominal (1×) scale, border included.
pub async fn preview_png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let surface = query.target.surface(&state).read().await;
    let Some(view) = surface.view() else {
        return (StatusCode::NOT_FOUND, "no label composed").into_response();
    };

    let rasterizer = rasterizer_for(&state).await;
    let opts = RasterOptions {
        scale: 1,
        border: surface.border(),
    };
    match rasterizer.rasterize(view, &opts).and_then(|img| encode_png(&img)) {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => error_response(e),
    }
}
