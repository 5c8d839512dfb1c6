//! Catch-all handler for requests no declared route matched, embedded mode.

use axum::{
    extract::State,
    http::{HeaderName, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    ApiState, AppState,
    assets::{AssetProvider, UI_INDEX_FILE_PATH, UI_ROOT_FILE_PATH},
    db::site_info::Branding,
};

const FAVICON_PATH: &str = "/favicon.ico";
const MANIFEST_PATH: &str = "/manifest.json";
const INSTALL_PATH: &str = "/install";

const ICON_CONTENT_TYPE: &str = "image/vnd.microsoft.icon";
const SHELL_CONTENT_TYPE: &str = "text/html;charset=utf-8";
// Resolved icon bytes may be any image format; they are sent untyped rather than as text.
const BRANDED_ICON_CONTENT_TYPE: &str = "application/octet-stream";

/// What an unmatched request path asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestClassification {
    Favicon,
    ManifestJson,
    InstallRedirect,
    DefaultShell,
}

impl RequestClassification {
    /// Classifies by exact path equality; everything else is the SPA shell.
    pub fn classify(path: &str) -> Self {
        match path {
            FAVICON_PATH => Self::Favicon,
            MANIFEST_PATH => Self::ManifestJson,
            INSTALL_PATH => Self::InstallRedirect,
            _ => Self::DefaultShell,
        }
    }
}

/// Fallback for the embedded bundle.
pub async fn fallback_handler(State(state): ApiState, uri: Uri) -> Response {
    match RequestClassification::classify(uri.path()) {
        RequestClassification::Favicon => favicon(&state).await,
        RequestClassification::ManifestJson => state.manifest.write_manifest_json().await,
        // The install wizard must stay unreachable once the site is running.
        RequestClassification::InstallRedirect => (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response(),
        RequestClassification::DefaultShell => serve_file(
            state.assets.as_ref(),
            UI_INDEX_FILE_PATH,
            [
                (header::CONTENT_TYPE, SHELL_CONTENT_TYPE),
                (header::X_FRAME_OPTIONS, "DENY"),
            ],
        ),
    }
}

/// Serves the first configured branding icon, else the bundled default.
async fn favicon(state: &AppState) -> Response {
    let branding = state.site_info.site_branding().await.unwrap_or_else(|err| {
        error!(error = ?err, "Failed to load site branding.");
        Branding::default()
    });

    if let Some(url) = branding.icon_candidates().next() {
        let content = state.icons.resolve(url).await;
        return (StatusCode::OK, [(header::CONTENT_TYPE, BRANDED_ICON_CONTENT_TYPE)], content).into_response();
    }

    serve_file(
        state.assets.as_ref(),
        &format!("{UI_ROOT_FILE_PATH}{FAVICON_PATH}"),
        [(header::CONTENT_TYPE, ICON_CONTENT_TYPE)],
    )
}

/// Reads a bundle file and answers 200 with it, or 404 if it cannot be read.
///
/// `headers` are sent either way.
fn serve_file<const N: usize>(assets: &dyn AssetProvider, path: &str, headers: [(HeaderName, &'static str); N]) -> Response {
    match assets.open(path) {
        Ok(asset) => (StatusCode::OK, headers, asset.data).into_response(),
        Err(err) => {
            error!(error = %err, "Failed to read UI file.");
            (StatusCode::NOT_FOUND, headers).into_response()
        }
    }
}
