//! Health check endpoint
//!
//! Reports the record count and whether the upload directory is usable, so a
//! monitor notices a deployment whose store or uploads path is wrong.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when uploads cannot be stored
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    /// Elements in the store document
    pub records: usize,
    pub upload_dir_ready: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let records = state.store.list().await?.len();
    let upload_dir_ready = state.uploads.root().is_dir();
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Ok(Json(HealthResponse {
        status: if upload_dir_ready { "ok" } else { "degraded" },
        module: "mpr-web",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        records,
        upload_dir_ready,
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
