//! PDF Text Server
//!
//! Extracts text and metadata from uploaded or remote PDF documents.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdftext_server::{build_router, scratch, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdftext_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting PDF Text Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Scratch directory: {}", config.upload.scratch_dir.display());
    tracing::info!("Upload limit: {} bytes", config.upload.max_file_size);
    match config.fetch.timeout {
        Some(timeout) => tracing::info!("Remote fetch timeout: {:?}", timeout),
        None => tracing::info!("Remote fetch timeout: none"),
    }
    if config.fetch.max_body_size.is_none() {
        tracing::info!("Remote fetch body size is unbounded");
    }

    scratch::ensure_scratch_dir(&config.upload.scratch_dir)
        .await
        .context("Failed to create scratch directory")?;

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid HOST: {}", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));

    // Create application state
    let app_state = AppState::new(config).context("Failed to initialize application state")?;

    let app = build_router(app_state);

    // Start server with graceful shutdown
    tracing::info!("PDF Text Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
