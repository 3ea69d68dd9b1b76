//! mpr-web library - Missing-person registry HTTP service
//!
//! Exposes the router and shared state so integration tests can drive the
//! service without binding a socket.

use std::path::PathBuf;

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use mpr_common::{config::Config, RecordStore, UploadDir};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod pages;

pub use crate::error::{ApiError, ApiResult};
use crate::pages::Templates;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record collection (file-backed in production)
    pub store: RecordStore,
    /// Photo upload directory, also served under its own name
    pub uploads: UploadDir,
    /// Page renderer
    pub templates: Templates,
    /// Static asset directory served under /static
    pub static_dir: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: RecordStore, uploads: UploadDir, templates: Templates, static_dir: PathBuf) -> Self {
        Self {
            store,
            uploads,
            templates,
            static_dir,
            startup_time: Utc::now(),
        }
    }

    /// Build state from resolved configuration
    pub fn from_config(config: &Config) -> Self {
        let mut store = RecordStore::file(&config.data_file);
        if config.serialize_writes {
            store = store.with_write_lock();
        }
        let templates = match &config.template_dir {
            Some(dir) => Templates::with_override_dir(dir),
            None => Templates::builtin(),
        };
        Self::new(
            store,
            UploadDir::new(&config.upload_dir),
            templates,
            config.static_dir.clone(),
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let upload_mount = format!("/{}", state.uploads.mount_name());
    let uploads = ServeDir::new(state.uploads.root());
    let statics = ServeDir::new(&state.static_dir);

    Router::new()
        .merge(api::page_routes())
        .merge(api::registration_routes())
        .merge(api::record_routes())
        .merge(api::health_routes())
        .nest_service(&upload_mount, uploads)
        .nest_service("/static", statics)
        // Uploads have no size limit
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
