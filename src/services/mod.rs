pub mod features;
pub mod lifecycle;
pub mod providers;
pub mod recommender;
pub mod similarity;

pub use providers::{CatalogProvider, WatchHistoryProvider};
pub use recommender::Recommender;
pub use similarity::SimilarityIndex;
