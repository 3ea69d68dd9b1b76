//! Record listing and status updates
//!
//! `/api/dados` is the only JSON read API; the search page filters its
//! output client-side.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mpr_common::{store::to_pretty_json, Error, RecordStatus};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `{"message": ...}` body of the status endpoint
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dados", get(list_records))
        .route("/marcar_encontrada/:id", post(mark_found))
}

/// GET /api/dados
///
/// Full collection as stored, pretty-printed the way the store writes it.
/// Elements are not reshaped: absent keys stay absent and key order is kept.
pub async fn list_records(State(state): State<AppState>) -> ApiResult<Response> {
    let elements = state.store.list().await?;
    let body = to_pretty_json(&elements)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// POST /marcar_encontrada/:id
///
/// Marking an already found record again rewrites the same value and
/// still succeeds.
pub async fn mark_found(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    match state.store.update_status(&id, RecordStatus::Found).await {
        Ok(_) => {
            info!("Record {} marked as found", id);
            Ok(Json(MessageResponse {
                message: format!("Pessoa com ID {} marcada como Encontrada.", id),
            }))
        }
        Err(Error::NotFound(_)) => {
            warn!("Status update for unknown record {}", id);
            Err(ApiError::NotFound(format!("Pessoa com ID {} não encontrada.", id)))
        }
        Err(e) => Err(e.into()),
    }
}
