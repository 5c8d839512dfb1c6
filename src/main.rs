use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use dotenvy::dotenv;

use crate::{
    assets::{AssetProvider, EmbeddedAssets},
    config::Config,
    db::site_info::{SiteInfoProvider, SiteInfoStore},
    handler::manifest::{ManifestGenerator, SiteManifest},
    icon::{HttpIconResolver, InlineContentResolver},
    source::AssetSource,
};

mod assets;
mod config;
mod db;
mod error;
mod handler;
mod icon;
mod route;
mod source;
mod trace;

/// Collaborators shared by the UI handlers.
pub struct AppState {
    /// The UI bundle served in embedded mode.
    pub assets: Arc<dyn AssetProvider>,
    /// Branding and general site settings.
    pub site_info: Arc<dyn SiteInfoProvider>,
    /// Owner of the `/manifest.json` response.
    pub manifest: Arc<dyn ManifestGenerator>,
    /// Fetches branding icons served as `/favicon.ico`.
    pub icons: Arc<dyn InlineContentResolver>,
}

/// Type alias for extracting the application state in request handlers.
pub type ApiState = State<Arc<AppState>>;

/// Main entry point for the application.
///
/// Initializes the application by:
/// 1. Loading environment variables from `.env` file
/// 2. Initializing logging and configuration
/// 3. Connecting to the database and applying migrations
/// 4. Choosing the UI source
/// 5. Starting the web server
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be parsed
/// - Database connection or migrations fail
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    route::init_tracing()?;
    let config = Config::try_init()?;
    let pool = db::connect(&config.database_url).await?;

    let site_info: Arc<dyn SiteInfoProvider> = Arc::new(SiteInfoStore::new(pool));
    let app_state = Arc::new(AppState {
        assets: Arc::new(EmbeddedAssets),
        manifest: Arc::new(SiteManifest::new(site_info.clone(), config.site_url.clone())),
        site_info,
        icons: Arc::new(HttpIconResolver::new(config.icon_fetch_timeout)?),
    });

    let source = AssetSource::resolve(&config.static_path);
    route::serve(&config, app_state, &source).await?;

    Ok(())
}
