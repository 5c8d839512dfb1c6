//! Site-info records (branding and general settings) stored as JSON blobs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::SiteInfoError;

const BRANDING_TYPE: &str = "branding";
const GENERAL_TYPE: &str = "general";
const STATUS_AVAILABLE: i64 = 1;

/// Operator-configured identity assets. Empty strings mean "not configured".
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Branding {
    pub logo: String,
    pub mobile_logo: String,
    pub square_icon: String,
    pub favicon: String,
}

impl Branding {
    /// Custom icon URLs in the order they should be tried for `/favicon.ico`.
    pub fn icon_candidates(&self) -> impl Iterator<Item = &str> {
        [self.favicon.as_str(), self.square_icon.as_str()]
            .into_iter()
            .filter(|url| !url.is_empty())
    }
}

/// General site settings shown to visitors.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct SiteGeneral {
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub site_url: String,
    pub contact_email: String,
}

/// Read access to site-info records.
///
/// Implementations are queried fresh on every request that needs them.
#[async_trait]
pub trait SiteInfoProvider: Send + Sync {
    async fn site_branding(&self) -> Result<Branding, SiteInfoError>;
    async fn site_general(&self) -> Result<SiteGeneral, SiteInfoError>;
}

/// `SQLite`-backed site-info store.
#[derive(Clone, Debug)]
pub struct SiteInfoStore {
    pool: SqlitePool,
}

impl SiteInfoStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Loads and decodes the available record of the given type.
    ///
    /// A missing record decodes as the type's default.
    async fn load<T: DeserializeOwned + Default>(&self, site_type: &str) -> Result<T, SiteInfoError> {
        let content = sqlx::query_scalar::<_, String>(
            r"
            select content from site_info
            where type = ? and status = ?
            ",
        )
        .bind(site_type)
        .bind(STATUS_AVAILABLE)
        .fetch_optional(&self.pool)
        .await?;

        match content {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => {
                debug!(site_type, "No site info record, using defaults.");
                Ok(T::default())
            }
        }
    }

    /// Inserts or replaces the record of the given type.
    #[cfg(test)]
    pub(crate) async fn save<T: Serialize>(&self, site_type: &str, content: &T) -> Result<(), SiteInfoError> {
        let content = serde_json::to_string(content)?;
        sqlx::query(
            r"
            insert into site_info (type, content, status)
            values (?, ?, ?)
            on conflict (type) do update
            set content = excluded.content, updated_at = current_timestamp
            ",
        )
        .bind(site_type)
        .bind(content)
        .bind(STATUS_AVAILABLE)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SiteInfoProvider for SiteInfoStore {
    async fn site_branding(&self) -> Result<Branding, SiteInfoError> {
        self.load(BRANDING_TYPE).await
    }

    async fn site_general(&self) -> Result<SiteGeneral, SiteInfoError> {
        self.load(GENERAL_TYPE).await
    }
}
