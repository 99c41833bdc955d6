//! Registry listing and preview-on-demand handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::compose::compose;
use crate::error::EtiquetaError;
use crate::label::{LabelRecord, to_display_date};

use super::super::state::AppState;
use super::error_response;

/// One row of the results table, with the date already converted for
/// display.
#[derive(Debug, Serialize)]
pub struct ListRow {
    pub id: String,
    pub pedido: String,
    pub quadro: String,
    pub link: String,
    pub data: String,
    pub data_exibicao: String,
}

/// Handle GET /api/registry/list - fetch all entries from the registry.
///
/// No de-duplication and no caching: concurrent calls each hit the backend,
/// and the frontend applies whichever response lands last.
pub async fn list(State(state): State<Arc<AppState>>) -> Response {
    let Some(registry) = &state.registry else {
        return error_response(EtiquetaError::Registry(
            "registry URL not configured".to_string(),
        ));
    };

    match registry.list().await {
        Ok(entries) => {
            info!("registry list: {} entries", entries.len());
            let rows: Vec<ListRow> = entries
                .into_iter()
                .map(|entry| ListRow {
                    id: entry.id,
                    pedido: entry.order_id,
                    quadro: entry.frame_code,
                    link: entry.link,
                    data_exibicao: to_display_date(&entry.raw_date),
                    data: entry.raw_date,
                })
                .collect();
            Json(json!({ "ok": true, "data": rows })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// A listed entry posted back for preview.
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub pedido: String,
    #[serde(default)]
    pub quadro: String,
    #[serde(default)]
    pub link: String,
    /// Raw stored date; ISO values are converted, display values pass
    /// through.
    #[serde(default)]
    pub data: String,
}

/// Handle POST /api/registry/preview - regenerate a label from a stored
/// entry onto the lookup surface. Never performs a registry write, so
/// previewing is idempotent.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreviewRequest>,
) -> Response {
    let record = match LabelRecord::new(
        &request.pedido,
        &request.quadro,
        &request.link,
        &to_display_date(&request.data),
    ) {
        Ok(record) => record,
        Err(e) => return error_response(e),
    };
    let view = match compose(&record) {
        Ok(view) => view,
        Err(e) => return error_response(e),
    };

    state.lookup.write().await.mount(record, view);
    Json(json!({ "ok": true })).into_response()
}
