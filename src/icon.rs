//! Turns a branding icon URL into the bytes served for `/favicon.ico`.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

/// Resolves a URL to the content served inline in its place.
#[async_trait]
pub trait InlineContentResolver: Send + Sync {
    /// Never fails; an unreachable URL resolves to an empty body.
    async fn resolve(&self, url: &str) -> Vec<u8>;
}

/// Fetches icon URLs over HTTP.
#[derive(Clone, Debug)]
pub struct HttpIconResolver {
    client: Client,
}

impl HttpIconResolver {
    /// Builds a resolver whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("answer-ui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    // Error statuses are failures, so an error page body is never served as an icon.
    async fn fetch(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        Ok(res.bytes().await?.to_vec())
    }
}

#[async_trait]
impl InlineContentResolver for HttpIconResolver {
    async fn resolve(&self, url: &str) -> Vec<u8> {
        self.fetch(url).await.unwrap_or_else(|err| {
            warn!(url, error = %err, "Failed to fetch branding icon.");
            Vec::new()
        })
    }
}
