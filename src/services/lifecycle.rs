//! Startup load-or-build and on-demand rebuild of the similarity index.

use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    services::{providers::CatalogProvider, similarity::SimilarityIndex},
};

/// Loads the persisted index at `index_path` when one exists, otherwise
/// builds a fresh index from `catalog` and persists it there.
///
/// A persisted blob that fails validation is an error, not a silent rebuild.
pub async fn load_or_build(
    index_path: Option<&Path>,
    catalog: &dyn CatalogProvider,
    max_features: usize,
) -> AppResult<SimilarityIndex> {
    if let Some(path) = index_path.filter(|path| path.exists()) {
        let path = path.to_path_buf();
        let index = tokio::task::spawn_blocking(move || SimilarityIndex::load(&path))
            .await
            .map_err(|e| AppError::Internal(format!("index load task failed: {}", e)))??;
        return Ok(index);
    }

    rebuild(index_path, catalog, max_features).await
}

/// Builds a fresh index from `catalog`, overwriting the persisted blob at
/// `index_path` when configured.
pub async fn rebuild(
    index_path: Option<&Path>,
    catalog: &dyn CatalogProvider,
    max_features: usize,
) -> AppResult<SimilarityIndex> {
    let items = catalog.load_catalog().await?;
    tracing::info!(
        provider = catalog.name(),
        items = items.len(),
        "Building similarity index"
    );

    let index = tokio::task::spawn_blocking(move || SimilarityIndex::build(&items, max_features))
        .await
        .map_err(|e| AppError::Internal(format!("index build task failed: {}", e)))??;

    let Some(path) = index_path else {
        return Ok(index);
    };

    let path = path.to_path_buf();
    let index = tokio::task::spawn_blocking(move || index.save(&path).map(|()| index))
        .await
        .map_err(|e| AppError::Internal(format!("index save task failed: {}", e)))??;

    Ok(index)
}
