use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ItemId;

/// Body of the aggregate recommendation endpoint
#[derive(Debug, Deserialize)]
pub struct WatchedRecommendationRequest {
    pub watched: Vec<ItemId>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Optional `top_n` override passed on the query string
#[derive(Debug, Default, Deserialize)]
pub struct TopNQuery {
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Ranked recommendations, best first
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub titles: Vec<ItemId>,
}

/// Result of an explicit index rebuild
#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub items: usize,
    pub built_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_top_n() {
        let request: WatchedRecommendationRequest =
            serde_json::from_str(r#"{"watched": ["One Week"]}"#).unwrap();
        assert_eq!(request.watched, vec![ItemId::from("One Week")]);
        assert_eq!(request.top_n, None);
    }

    #[test]
    fn test_response_shape() {
        let response = RecommendationResponse {
            titles: vec![ItemId::from("Unknown World")],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"titles":["Unknown World"]}"#);
    }
}
