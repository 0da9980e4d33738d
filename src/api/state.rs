use std::{path::PathBuf, sync::Arc};

use tokio::sync::{Mutex, RwLock};

use crate::{
    config,
    error::AppResult,
    models::RebuildResponse,
    services::{lifecycle, CatalogProvider, Recommender, WatchHistoryProvider},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    recommender: Arc<RwLock<Arc<Recommender>>>,
    rebuild_lock: Arc<Mutex<()>>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub watch_history: Arc<dyn WatchHistoryProvider>,
    pub index_path: Option<PathBuf>,
    pub max_top_n: usize,
    pub max_features: usize,
}

impl AppState {
    pub fn new(
        recommender: Recommender,
        catalog: Arc<dyn CatalogProvider>,
        watch_history: Arc<dyn WatchHistoryProvider>,
    ) -> Self {
        Self {
            recommender: Arc::new(RwLock::new(Arc::new(recommender))),
            rebuild_lock: Arc::new(Mutex::new(())),
            catalog,
            watch_history,
            index_path: None,
            max_top_n: config::default_max_top_n(),
            max_features: config::default_max_features(),
        }
    }

    pub fn with_index_path(mut self, index_path: Option<PathBuf>) -> Self {
        self.index_path = index_path;
        self
    }

    pub fn with_max_top_n(mut self, max_top_n: usize) -> Self {
        self.max_top_n = max_top_n;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// The engine serving requests right now
    ///
    /// The read lock is held only long enough to clone the pointer.
    pub async fn recommender(&self) -> Arc<Recommender> {
        Arc::clone(&*self.recommender.read().await)
    }

    /// Rebuilds the index from the catalog provider and swaps it in
    ///
    /// Requests already holding the previous engine finish against it.
    /// Rebuilds run one at a time, so the engine swapped in last is always the
    /// one persisted last.
    pub async fn rebuild(&self) -> AppResult<RebuildResponse> {
        let _guard = self.rebuild_lock.lock().await;

        let index = lifecycle::rebuild(
            self.index_path.as_deref(),
            self.catalog.as_ref(),
            self.max_features,
        )
        .await?;

        let response = RebuildResponse {
            items: index.len(),
            built_at: index.built_at(),
        };

        let default_top_n = self.recommender().await.default_top_n();
        let recommender = Arc::new(Recommender::new(Arc::new(index), default_top_n));
        *self.recommender.write().await = recommender;

        tracing::info!(items = response.items, "Swapped in rebuilt similarity index");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        providers::{FileCatalog, FileWatchHistory},
        SimilarityIndex,
    };

    const CATALOG: &str = r#"{"items": [
        {"title": "Assignment: Outer Space", "categories": [1, 0, 1, 0]},
        {"title": "Brain From Planet Arous", "categories": [0, 1, 0, 1]},
        {"title": "One Week", "categories": [1, 0, 0, 1]}
    ]}"#;

    async fn state_in(dir: &std::path::Path) -> AppState {
        let catalog_path = dir.join("catalog.json");
        std::fs::write(&catalog_path, CATALOG).unwrap();
        let index_path = dir.join("index").join("index.json");

        let catalog = FileCatalog::new(catalog_path);
        let index = lifecycle::load_or_build(Some(index_path.as_path()), &catalog, 1000)
            .await
            .unwrap();

        AppState::new(
            Recommender::new(Arc::new(index), 3),
            Arc::new(catalog),
            Arc::new(FileWatchHistory::default()),
        )
        .with_index_path(Some(index_path))
    }

    #[tokio::test]
    async fn test_rebuild_swaps_engine() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;
        let before = state.recommender().await;

        let response = state.rebuild().await.unwrap();

        let after = state.recommender().await;
        assert_eq!(response.items, 3);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.index().built_at(), response.built_at);
        assert_eq!(after.default_top_n(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rebuilds_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path()).await;

        for _ in 0..10 {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let state = state.clone();
                    tokio::spawn(async move { state.rebuild().await })
                })
                .collect();
            for handle in handles {
                handle.await.unwrap().unwrap();
            }
        }

        // The engine in memory is the one on disk
        let index_path = state.index_path.clone().unwrap();
        let persisted = SimilarityIndex::load(&index_path).unwrap();
        let serving = state.recommender().await;
        assert_eq!(serving.index().built_at(), persisted.built_at());
    }
}
