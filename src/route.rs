//! HTTP routing configuration and server setup.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::{Router, routing::get};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use crate::{
    AppState,
    config::Config,
    handler::{health_check, ui_router},
    source::AssetSource,
    trace::access_log_layer,
};

/// Starts the HTTP server and runs it until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address or
/// encounters a fatal error during operation.
pub(crate) async fn serve(config: &Config, app_state: Arc<AppState>, source: &AssetSource) -> Result<()> {
    let app = create_router(app_state, source);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("could not bind to {}", config.listen_addr))?;

    info!(address = %config.listen_addr, ?source, "Serving Answer UI.");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Graceful shutdown complete.");
    Ok(())
}

/// Declared routes first; the UI mount and catch-all handle everything else.
pub(crate) fn create_router(app_state: Arc<AppState>, source: &AssetSource) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(ui_router(app_state, source))
        .layer(CompressionLayer::new())
        .layer(access_log_layer())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for ctrl+c, shutting down.");
        return;
    }
    info!("ctrl+c signal received, preparing to shutdown.");
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a filter directive cannot be parsed.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let app_name = env!("CARGO_CRATE_NAME");

    // External crates: no line numbers or module names. tower_http at debug, everything else at warn,
    // ours off here, all overridable through RUST_LOG.
    let default_external_filter = "warn,tower_http=debug".into();
    let external_filter = EnvFilter::try_from_default_env()
        .unwrap_or(default_external_filter)
        .add_directive(format!("{app_name}=off").parse()?);
    let external_crates_layer = fmt::layer()
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_filter(external_filter);

    let our_app_only_filter = EnvFilter::builder()
        .from_env_lossy()
        .add_directive(LevelFilter::OFF.into())
        .add_directive(format!("{app_name}=debug").parse()?);
    let our_app_layer = fmt::layer()
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_filter(our_app_only_filter);

    tracing_subscriber::registry()
        .with(external_crates_layer)
        .with(our_app_layer)
        .init();

    Ok(())
}
