//! Serving a UI build from an operator-supplied directory.
//!
//! Every unmatched path renders the directory's `index.html` with an empty
//! context; there is no branding, manifest or install handling in this mode.

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};
use tower_http::services::ServeDir;
use tracing::{debug, error};

const INDEX_TEMPLATE: &str = "index.html";

/// Loads `<dir>/*.html` as templates and mounts `<dir>/static` at `/static`.
///
/// # Errors
///
/// Returns the template error if any HTML file fails to parse.
pub fn router(dir: &Path) -> Result<Router, tera::Error> {
    let glob = format!("{}/*.html", dir.display());
    let templates = Tera::new(&glob)?;
    debug!(glob, templates = templates.get_template_names().count(), "Loaded UI templates.");

    Ok(Router::new()
        .nest_service("/static", ServeDir::new(dir.join("static")))
        .fallback(index_handler)
        .with_state(Arc::new(templates)))
}

async fn index_handler(State(templates): State<Arc<Tera>>) -> Response {
    match templates.render(INDEX_TEMPLATE, &Context::new()) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(?err, "Failed to render template.");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render template.").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use axum::http::{StatusCode, header};
    use googletest::prelude::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    use crate::{
        assets::MemoryAssets,
        db::site_info::Branding,
        handler::test_support::*,
        source::AssetSource,
    };

    const CUSTOM_SHELL: &str = "<!doctype html><title>Custom UI</title><div id=\"root\"></div>";

    fn override_dir(index: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), index).unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static").join("app.js"), "custom()").unwrap();
        dir
    }

    fn branded_state() -> Arc<crate::AppState> {
        let branding = Branding {
            favicon: "https://cdn.example.com/brand.ico".into(),
            ..Branding::default()
        };
        let assets = MemoryAssets::default()
            .with_file("build/index.html", "embedded shell")
            .with_file("build/favicon.ico", "embedded icon");
        state(assets, FakeSiteInfo::with_branding(branding), Arc::default())
    }

    #[tokio::test]
    async fn every_unmatched_path_renders_the_index_template() {
        let dir = override_dir(CUSTOM_SHELL);
        let source = AssetSource::resolve(dir.path().to_str().unwrap());
        assert_eq!(source, AssetSource::OverrideDirectory(dir.path().to_path_buf()));

        for path in ["/", "/dashboard/42", "/favicon.ico", "/manifest.json", "/install"] {
            let res = get(branded_state(), &source, path).await;

            assert_eq!(res.status(), StatusCode::OK, "{path}");
            assert_that!(
                res.headers()[header::CONTENT_TYPE].to_str().unwrap(),
                starts_with("text/html")
            );
            let body = String::from_utf8(body_bytes(res).await).unwrap();
            assert_that!(body, eq(CUSTOM_SHELL));
        }
    }

    #[tokio::test]
    async fn static_files_come_from_the_directory() {
        let dir = override_dir(CUSTOM_SHELL);
        let source = AssetSource::OverrideDirectory(dir.path().to_path_buf());

        let res = get(branded_state(), &source, "/static/app.js").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_bytes(res).await, b"custom()");

        let res = get(branded_state(), &source, "/static/missing.js").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn directory_changes_are_picked_up_for_static_files() {
        let dir = override_dir(CUSTOM_SHELL);
        let source = AssetSource::OverrideDirectory(dir.path().to_path_buf());
        fs::write(dir.path().join("static").join("late.css"), "p{}").unwrap();

        let res = get(branded_state(), &source, "/static/late.css").await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_index_template_is_a_500() {
        let dir = tempfile::tempdir().unwrap();
        let source = AssetSource::OverrideDirectory(dir.path().to_path_buf());

        let res = get(branded_state(), &source, "/dashboard").await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(logs_contain("Failed to render template"));
    }

    #[tokio::test]
    #[traced_test]
    async fn unparsable_template_falls_back_to_embedded_mode() {
        let dir = override_dir("<div>{% if %}</div>");
        let source = AssetSource::OverrideDirectory(dir.path().to_path_buf());

        let res = get(branded_state(), &source, "/install").await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert!(logs_contain("Failed to load UI templates"));

        let res = get(branded_state(), &source, "/dashboard").await;
        assert_eq!(body_bytes(res).await, b"embedded shell");
    }
}
