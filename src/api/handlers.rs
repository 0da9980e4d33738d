use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RebuildResponse, RecommendationResponse, TopNQuery, WatchedRecommendationRequest},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Titles most similar to a single seed title
pub async fn similar_titles(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(title): Path<String>,
    Query(query): Query<TopNQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = resolve_top_n(query.top_n, state.max_top_n)?;
    let recommender = state.recommender().await;

    let titles = recommender.recommend_similar(&title, top_n)?;

    tracing::info!(
        request_id = %request_id,
        seed = %title,
        returned = titles.len(),
        "Similar titles"
    );

    Ok(Json(RecommendationResponse { titles }))
}

/// Recommendations for an explicit list of watched titles
pub async fn recommend_for_watched(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<WatchedRecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = resolve_top_n(request.top_n, state.max_top_n)?;
    let recommender = state.recommender().await;

    let titles = recommender.recommend_for_history(request.watched.as_slice(), top_n);

    tracing::info!(
        request_id = %request_id,
        watched = request.watched.len(),
        returned = titles.len(),
        "Watch-list recommendations"
    );

    Ok(Json(RecommendationResponse { titles }))
}

/// Recommendations for a profile, driven by its stored watch history
pub async fn recommend_for_profile(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(profile_id): Path<i64>,
    Query(query): Query<TopNQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = resolve_top_n(query.top_n, state.max_top_n)?;
    let watched = state.watch_history.watched_titles(profile_id).await?;
    let recommender = state.recommender().await;

    let titles = recommender.recommend_for_history(watched.as_slice(), top_n);

    tracing::info!(
        request_id = %request_id,
        profile_id,
        provider = state.watch_history.name(),
        watched = watched.len(),
        returned = titles.len(),
        "Profile recommendations"
    );

    Ok(Json(RecommendationResponse { titles }))
}

/// Rebuilds the similarity index from the catalog provider
pub async fn rebuild_index(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RebuildResponse>> {
    tracing::info!(request_id = %request_id, "Index rebuild requested");
    let response = state.rebuild().await?;
    Ok(Json(response))
}

/// Accepts an absent `top_n` (engine default) or one in `1..=max_top_n`
fn resolve_top_n(top_n: Option<usize>, max_top_n: usize) -> AppResult<Option<usize>> {
    match top_n {
        Some(n) if n == 0 || n > max_top_n => Err(AppError::InvalidInput(format!(
            "top_n must be between 1 and {}",
            max_top_n
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_top_n() {
        assert_eq!(resolve_top_n(None, 50).unwrap(), None);
        assert_eq!(resolve_top_n(Some(1), 50).unwrap(), Some(1));
        assert_eq!(resolve_top_n(Some(50), 50).unwrap(), Some(50));
        assert!(matches!(
            resolve_top_n(Some(0), 50),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve_top_n(Some(51), 50),
            Err(AppError::InvalidInput(_))
        ));
    }
}
