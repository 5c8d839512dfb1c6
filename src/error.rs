//! Error types shared across the asset and site-info layers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failure to open a file from an asset provider.
///
/// Missing files and unreadable files are not distinguished; both end up as a 404.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },
}

impl AssetError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        error!(error = %self, "Failed to read UI asset.");
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Failure to load a site-info record.
#[derive(Debug, Error)]
pub enum SiteInfoError {
    #[error("site info query failed")]
    Database(#[from] sqlx::Error),
    #[error("site info content is not valid JSON")]
    Decode(#[from] serde_json::Error),
}
