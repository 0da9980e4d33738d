use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

use crate::{
    error::{AppResult, RecommendError},
    models::{CatalogItem, ItemId},
    services::providers::{CatalogProvider, WatchHistoryProvider},
};

/// One film in a JSON catalog file
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    title: String,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    categories: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    items: Vec<CatalogRecord>,
}

impl TryFrom<CatalogRecord> for CatalogItem {
    type Error = RecommendError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        CatalogItem::from_columns(record.title, record.tags, record.categories)
    }
}

/// Catalog read from a JSON document of the form
/// `{"items": [{"title": "...", "categories": [1, 0, 1, 0]}]}`
/// (or `"tags": "..."` instead of `categories`)
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(contents: &str) -> AppResult<Vec<CatalogItem>> {
        let document: CatalogDocument = serde_json::from_str(contents)
            .map_err(|e| RecommendError::Data(format!("invalid catalog file: {}", e)))?;

        let items = document
            .items
            .into_iter()
            .map(CatalogItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FileCatalog {
    async fn load_catalog(&self) -> AppResult<Vec<CatalogItem>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let items = Self::parse(&contents)?;

        tracing::info!(
            path = %self.path.display(),
            items = items.len(),
            "Loaded catalog file"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Watch history held in memory, optionally seeded from a JSON map of
/// profile id to watched titles: `{"1": ["One Week", "Unknown World"]}`
#[derive(Debug, Clone, Default)]
pub struct FileWatchHistory {
    histories: HashMap<i64, Vec<ItemId>>,
}

impl FileWatchHistory {
    pub fn new(histories: HashMap<i64, Vec<ItemId>>) -> Self {
        Self { histories }
    }

    pub async fn from_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let contents = tokio::fs::read_to_string(&path).await?;
        let histories: HashMap<i64, Vec<ItemId>> = serde_json::from_str(&contents)
            .map_err(|e| RecommendError::Data(format!("invalid watch history file: {}", e)))?;

        tracing::info!(
            path = %path.display(),
            profiles = histories.len(),
            "Loaded watch history file"
        );

        Ok(Self::new(histories))
    }
}

#[async_trait::async_trait]
impl WatchHistoryProvider for FileWatchHistory {
    async fn watched_titles(&self, profile_id: i64) -> AppResult<Vec<ItemId>> {
        Ok(self
            .histories
            .get(&profile_id)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
