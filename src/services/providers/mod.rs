/// Catalog and watch-history data providers
///
/// The recommender never talks to storage directly. It is handed a
/// `CatalogProvider` to build its index from and a `WatchHistoryProvider` to
/// look up what a profile has already watched. Both come in a file-backed
/// flavour (local development, tests) and a PostgreSQL flavour.
use crate::{
    error::AppResult,
    models::{CatalogItem, ItemId},
};

pub mod file;
pub mod postgres;

pub use file::{FileCatalog, FileWatchHistory};
pub use postgres::{PgCatalog, PgWatchHistory};

/// Source of the complete film catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Returns every catalog item with its feature data, in a stable order
    ///
    /// The order becomes the index's catalog order, which breaks ranking ties.
    async fn load_catalog(&self) -> AppResult<Vec<CatalogItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of per-profile watch history
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchHistoryProvider: Send + Sync {
    /// Titles the profile has watched, oldest first
    ///
    /// A profile with no history (or one that does not exist) yields an
    /// empty list rather than an error.
    async fn watched_titles(&self, profile_id: i64) -> AppResult<Vec<ItemId>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
