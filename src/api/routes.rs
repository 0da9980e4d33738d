use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        // Outermost first: the request id must exist before the trace span opens
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Single-seed
        .route("/titles/:title/similar", get(handlers::similar_titles))
        // Aggregate
        .route("/recommendations", post(handlers::recommend_for_watched))
        .route(
            "/profiles/:profile_id/recommendations",
            get(handlers::recommend_for_profile),
        )
        // Index
        .route("/index/rebuild", post(handlers::rebuild_index))
}
