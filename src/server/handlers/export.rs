//! Export and download handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::export::{ExportEngine, ExportFormat};

use super::super::state::{AppState, DownloadEntry};
use super::{Target, error_response, rasterizer_for};

/// Request body for export operations.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub target: Target,
    pub format: String,
}

/// Handle POST /api/export - rasterize the addressed surface and park the
/// result in the download store.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Response {
    let format: ExportFormat = match request.format.parse() {
        Ok(format) => format,
        Err(e) => return error_response(e),
    };

    let engine = ExportEngine::new(rasterizer_for(&state).await);
    let exported = {
        let mut surface = request.target.surface(&state).write().await;
        match engine.export(&mut surface, format) {
            Ok(exported) => exported,
            Err(e) => return error_response(e),
        }
    };

    let id = Uuid::new_v4();
    let filename = exported.filename.clone();
    state.downloads.write().await.insert(
        id,
        DownloadEntry {
            filename: exported.filename,
            content_type: exported.content_type,
            bytes: exported.bytes,
            created: Instant::now(),
        },
    );
    info!("export ready: {} ({:?})", filename, format);

    Json(json!({
        "ok": true,
        "filename": filename,
        "url": format!("/api/download/{}", id),
    }))
    .into_response()
}

/// Handle GET /api/download/:id - stream a finished export. Handles expire
/// after a bounded delay; an expired id is simply gone.
pub async fn download(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (StatusCode::BAD_REQUEST, "invalid download id").into_response();
    };

    let downloads = state.downloads.read().await;
    match downloads.get(&id) {
        Some(entry) => (
            [
                (header::CONTENT_TYPE, entry.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", entry.filename),
                ),
            ],
            entry.bytes.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "download expired or unknown").into_response(),
    }
}
