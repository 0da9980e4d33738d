use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt::Display};

use crate::error::RecommendError;

/// Stable identity of a catalog item (the film title)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Feature data an item is compared on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Features {
    /// Free-text tags, vectorized with a bag-of-words count transform
    Tags(String),
    /// One value per categorical dimension (e.g. a 0/1 flag per genre)
    Categories(Vec<f64>),
}

/// A film as seen by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    /// `None` when the catalog could not supply any feature data
    pub features: Option<Features>,
}

impl CatalogItem {
    pub fn with_tags(id: impl Into<ItemId>, tags: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: Some(Features::Tags(tags.into())),
        }
    }

    pub fn with_categories(id: impl Into<ItemId>, categories: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            features: Some(Features::Categories(categories)),
        }
    }

    /// Builds an item from a storage row where each feature kind is its own
    /// nullable column. Setting both is malformed.
    pub fn from_columns(
        id: impl Into<ItemId>,
        tags: Option<String>,
        categories: Option<Vec<f64>>,
    ) -> Result<Self, RecommendError> {
        let id = id.into();
        let features = match (tags, categories) {
            (Some(_), Some(_)) => {
                return Err(RecommendError::Data(format!(
                    "item '{}' has both tags and categories",
                    id
                )))
            }
            (Some(tags), None) => Some(Features::Tags(tags)),
            (None, Some(categories)) => Some(Features::Categories(categories)),
            (None, None) => None,
        };

        Ok(Self { id, features })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_columns() {
        let item = CatalogItem::from_columns("One Week", None, Some(vec![1.0, 0.0])).unwrap();
        assert_eq!(item.features, Some(Features::Categories(vec![1.0, 0.0])));

        let bare = CatalogItem::from_columns("Lost Reel", None, None).unwrap();
        assert_eq!(bare.features, None);

        let both = CatalogItem::from_columns("Them!", Some("ants".into()), Some(vec![1.0]));
        assert!(matches!(both, Err(RecommendError::Data(_))));
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let id = ItemId::from("Unknown World");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""Unknown World""#);

        let deserialized: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn test_item_id_lookup_by_str() {
        let mut positions = HashMap::new();
        positions.insert(ItemId::from("One Week"), 4usize);
        assert_eq!(positions.get("One Week"), Some(&4));
    }

    #[test]
    fn test_features_serialization() {
        let item = CatalogItem::with_categories("The Scarecrow", vec![1.0, 0.0, 1.0, 1.0]);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "The Scarecrow");
        assert_eq!(json["features"]["categories"][3], 1.0);
    }
}
