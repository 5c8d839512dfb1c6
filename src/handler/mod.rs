//! HTTP request handlers and UI registration.

pub mod fallback;
pub mod manifest;
pub mod override_ui;

use std::sync::Arc;

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use tracing::error;

use crate::{
    AppState,
    assets::{StaticResource, static_handler},
    source::AssetSource,
};

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Builds the `/static` mount and catch-all fallback for the chosen source.
///
/// An override directory gets plain template serving for every unmatched
/// path. The embedded bundle gets the branding, manifest and install special
/// cases on top of the SPA shell.
pub fn ui_router(state: Arc<AppState>, source: &AssetSource) -> Router {
    if let AssetSource::OverrideDirectory(dir) = source {
        match override_ui::router(dir) {
            Ok(router) => return router,
            Err(err) => error!(path = %dir.display(), error = ?err, "Failed to load UI templates, using embedded UI."),
        }
    }

    let resource = StaticResource::new(state.assets.clone());
    Router::new()
        .route("/static/{*path}", get(static_handler))
        .with_state(resource)
        .merge(Router::new().fallback(fallback::fallback_handler).with_state(state))
}
