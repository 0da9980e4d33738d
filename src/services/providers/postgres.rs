use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{CatalogItem, ItemId},
    services::providers::{CatalogProvider, WatchHistoryProvider},
};

/// Catalog stored in the `film` table
///
/// Expects nullable `tags TEXT` and `categories DOUBLE PRECISION[]` columns
/// alongside `title`. Rows are read in primary key order, which fixes the
/// catalog order used for tie-breaking.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for PgCatalog {
    async fn load_catalog(&self) -> AppResult<Vec<CatalogItem>> {
        let rows = sqlx::query_as::<_, (String, Option<String>, Option<Vec<f64>>)>(
            "SELECT title, tags, categories FROM film ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::info!(items = rows.len(), "Loaded catalog from database");

        let items = rows
            .into_iter()
            .map(|(title, tags, categories)| CatalogItem::from_columns(title, tags, categories))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Watch history stored in the `watchhistory` table, one row per viewing
#[derive(Debug, Clone)]
pub struct PgWatchHistory {
    pool: PgPool,
}

impl PgWatchHistory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchHistoryProvider for PgWatchHistory {
    async fn watched_titles(&self, profile_id: i64) -> AppResult<Vec<ItemId>> {
        let titles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT f.title
            FROM watchhistory w
            JOIN film f ON f.id = w.film_id
            WHERE w.profileid = $1
            ORDER BY w.id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(profile_id, watched = titles.len(), "Fetched watch history");

        Ok(titles.into_iter().map(ItemId::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
