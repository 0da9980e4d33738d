pub mod catalog;
pub mod recommendation;

pub use catalog::{CatalogItem, Features, ItemId};
pub use recommendation::{
    RebuildResponse, RecommendationResponse, TopNQuery, WatchedRecommendationRequest,
};
