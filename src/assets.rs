//! Compiled UI bundle embedded in the binary, and the `/static` adapter over it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed_for_web::{EmbedableFile, RustEmbed};
use tracing::debug;

use crate::error::AssetError;

/// SPA shell served for client-side routes.
pub const UI_INDEX_FILE_PATH: &str = "build/index.html";
/// Root of the bundle; root-level files such as `favicon.ico` live here.
pub const UI_ROOT_FILE_PATH: &str = "build";
/// Root of the hashed JS/CSS/media assets mounted at `/static`.
pub const UI_STATIC_PATH: &str = "build/static";

const STATIC_CACHE_CONTROL: &str = "public, max-age=31536000";

/// The compiled SPA.
///
/// In debug builds, files are read from the filesystem for hot reloading.
/// In release builds, files are embedded into the binary at compile time.
#[derive(RustEmbed)]
#[folder = "ui/"]
struct UiBuild;

/// Contents and metadata of one bundle file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Asset {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
    pub etag: Option<String>,
}

/// Read-only, open-by-path access to a UI bundle.
pub trait AssetProvider: Send + Sync {
    /// Opens a file by its path inside the bundle, e.g. `build/index.html`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] when the bundle has no such file.
    fn open(&self, path: &str) -> Result<Asset, AssetError>;
}

/// [`AssetProvider`] backed by the bundle compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedAssets;

impl AssetProvider for EmbeddedAssets {
    fn open(&self, path: &str) -> Result<Asset, AssetError> {
        let file = UiBuild::get(path).ok_or_else(|| AssetError::not_found(path))?;
        let data = file.data();
        let data: &[u8] = data.as_ref();

        Ok(Asset {
            data: data.to_vec(),
            mime_type: file.mime_type().map(|mime| mime.to_string()),
            etag: Some(file.etag().to_string()),
        })
    }
}

/// Adapter serving `/static/<name>` out of [`UI_STATIC_PATH`] of a bundle.
#[derive(Clone)]
pub struct StaticResource {
    store: Arc<dyn AssetProvider>,
}

impl StaticResource {
    pub fn new(store: Arc<dyn AssetProvider>) -> Self {
        Self { store }
    }

    /// Opens a static asset by the name requested under the `/static` mount.
    ///
    /// # Errors
    ///
    /// Propagates the store's error unchanged; there is no alternate lookup.
    pub fn open(&self, name: &str) -> Result<Asset, AssetError> {
        let path = format!("{UI_STATIC_PATH}/{name}");
        debug!(path, "Open static path.");
        self.store.open(&path)
    }
}

/// Handler for `/static/{*path}` in embedded mode.
pub async fn static_handler(State(resource): State<StaticResource>, Path(name): Path<String>) -> Response {
    match resource.open(&name) {
        Ok(asset) => {
            let mime = asset
                .mime_type
                .unwrap_or_else(|| mime_guess::from_path(&name).first_or_octet_stream().to_string());
            let mut res = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime)
                .header(header::CACHE_CONTROL, STATIC_CACHE_CONTROL);
            if let Some(etag) = asset.etag {
                res = res.header(header::ETAG, etag);
            }

            res.body(asset.data.into())
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(err) => err.into_response(),
    }
}

/// In-memory bundle used in place of the compiled one.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryAssets {
    files: std::collections::HashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl MemoryAssets {
    pub(crate) fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_owned(), data.into());
        self
    }
}

#[cfg(test)]
impl AssetProvider for MemoryAssets {
    fn open(&self, path: &str) -> Result<Asset, AssetError> {
        self.files
            .get(path)
            .map(|data| Asset {
                data: data.clone(),
                ..Asset::default()
            })
            .ok_or_else(|| AssetError::not_found(path))
    }
}
