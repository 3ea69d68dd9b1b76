//! mpr-web - Missing-person registry web service
//!
//! Serves the registration/search pages, accepts registrations with a
//! photo upload, and exposes the record collection as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use mpr_common::config::{CliArgs, Config, DEFAULT_CONFIG_FILE};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mpr_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = Config::load(&args).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mpr_web={level},mpr_common={level},tower_http=debug",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mpr-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!(
            "Config file {} not found, using built-in defaults",
            DEFAULT_CONFIG_FILE
        ),
    }

    let state = AppState::from_config(&config);

    // Upload directory is created once, before serving
    state
        .uploads
        .ensure_exists()
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir.display()))?;

    info!("Store document: {}", config.data_file.display());
    info!("Upload directory: {}", config.upload_dir.display());
    info!("Static directory: {}", config.static_dir.display());
    if let Some(dir) = &config.template_dir {
        info!("Template overrides: {}", dir.display());
    }
    if config.serialize_writes {
        info!("Store writes serialized behind a process-wide lock");
    }

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mpr-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
