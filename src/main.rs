use anyhow::Context;
use barcode_lookup_server::api::{self, AppState};
use barcode_lookup_server::config::AppConfig;
use barcode_lookup_server::enrichment::HttpEnricher;
use barcode_lookup_server::storage::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("🚀 Starting Barcode Lookup Server");

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;
    info!("📋 Configuration loaded");
    info!("   - Database: {}", config.storage.db_path.display());
    info!("   - ML API: {}", config.ml.base_url);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Open record store
    let store = Arc::new(
        RecordStore::open(&config.storage.db_path)
            .with_context(|| format!("failed to open {}", config.storage.db_path.display()))?,
    );
    info!("✅ Record store ready ({} records)", store.count()?);

    let enricher = Arc::new(HttpEnricher::new(
        config.ml.base_url.clone(),
        Duration::from_secs(config.ml.timeout_secs),
    )?);

    let state = AppState { store, enricher };
    let app = api::router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("📡 Available endpoints:");
    info!("   GET  /        - Health check");
    info!("   POST /lookup  - Resolve a scanned barcode");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
