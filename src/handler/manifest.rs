//! Web app manifest generated from site settings.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::site_info::{Branding, SiteGeneral, SiteInfoProvider};

const DEFAULT_ICON: &str = "favicon.ico";
const DEFAULT_SHORT_NAME: &str = "Answer";
const DEFAULT_NAME: &str = "Answer.dev";
const ICON_SIZES: [&str; 4] = ["16", "32", "48", "128"];

/// Produces the complete `/manifest.json` response.
#[async_trait]
pub trait ManifestGenerator: Send + Sync {
    async fn write_manifest_json(&self) -> Response;
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Manifest {
    pub manifest_version: u8,
    pub version: String,
    pub short_name: String,
    pub name: String,
    pub icons: BTreeMap<String, String>,
    pub start_url: String,
    pub display: String,
    pub theme_color: String,
    pub background_color: String,
}

impl Manifest {
    fn new(general: &SiteGeneral, branding: &Branding, site_url: Option<&str>) -> Self {
        let icon = branding.icon_candidates().next().unwrap_or(DEFAULT_ICON);
        let (short_name, name) = if general.name.is_empty() {
            (DEFAULT_SHORT_NAME, DEFAULT_NAME)
        } else {
            (general.name.as_str(), general.name.as_str())
        };

        Self {
            manifest_version: 3,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            short_name: short_name.to_owned(),
            name: name.to_owned(),
            icons: ICON_SIZES
                .iter()
                .map(|size| ((*size).to_owned(), icon.to_owned()))
                .collect(),
            start_url: site_url.unwrap_or(".").to_owned(),
            display: "standalone".to_owned(),
            theme_color: "#000000".to_owned(),
            background_color: "#ffffff".to_owned(),
        }
    }
}

/// Manifest built from the site-info store on every request.
pub struct SiteManifest {
    site_info: Arc<dyn SiteInfoProvider>,
    site_url: Option<String>,
}

impl SiteManifest {
    pub fn new(site_info: Arc<dyn SiteInfoProvider>, site_url: Option<String>) -> Self {
        Self { site_info, site_url }
    }
}

#[async_trait]
impl ManifestGenerator for SiteManifest {
    async fn write_manifest_json(&self) -> Response {
        let general = self.site_info.site_general().await.unwrap_or_else(|err| {
            error!(error = ?err, "Failed to load general site info.");
            SiteGeneral::default()
        });
        let branding = self.site_info.site_branding().await.unwrap_or_else(|err| {
            error!(error = ?err, "Failed to load site branding.");
            Branding::default()
        });

        let manifest = Manifest::new(&general, &branding, self.site_url.as_deref());
        (StatusCode::OK, Json(manifest)).into_response()
    }
}
