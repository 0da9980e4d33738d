//! Turns catalog feature data into numeric vectors.
//!
//! Categorical vectors are used as-is; free-text tags go through
//! [`TagVectorizer`] (lowercase, stop-word removal, Porter stemming, counts).

pub mod stemmer;
pub mod stop_words;
pub mod vectorizer;

pub use stemmer::PorterStemmer;
pub use stop_words::StopWords;
pub use vectorizer::TagVectorizer;

use ndarray::Array2;

use crate::{
    error::RecommendError,
    models::{CatalogItem, Features},
};

/// Builds the item × feature matrix for a catalog, one row per item in
/// catalog order.
pub fn feature_matrix(
    items: &[CatalogItem],
    max_features: usize,
) -> Result<Array2<f64>, RecommendError> {
    let first = match items.first() {
        Some(item) => item,
        None => {
            return Err(RecommendError::Configuration(
                "catalog is empty".to_string(),
            ))
        }
    };

    let mut tags = Vec::with_capacity(items.len());
    let mut categories = Vec::with_capacity(items.len());

    for item in items {
        match &item.features {
            None => {
                return Err(RecommendError::Data(format!(
                    "item '{}' has no feature data",
                    item.id
                )))
            }
            Some(Features::Tags(text)) => {
                if text.trim().is_empty() {
                    return Err(RecommendError::Data(format!(
                        "item '{}' has blank tags",
                        item.id
                    )));
                }
                tags.push(text.as_str());
            }
            Some(Features::Categories(values)) => categories.push((&item.id, values)),
        }
    }

    if !tags.is_empty() && !categories.is_empty() {
        return Err(RecommendError::Configuration(
            "catalog mixes tag and category features".to_string(),
        ));
    }

    if !tags.is_empty() {
        return TagVectorizer::new(max_features).fit_transform(&tags);
    }

    let dimensions = match &first.features {
        Some(Features::Categories(values)) => values.len(),
        _ => 0,
    };
    if dimensions == 0 {
        return Err(RecommendError::Data(format!(
            "item '{}' has an empty category vector",
            first.id
        )));
    }

    let mut matrix = Array2::<f64>::zeros((items.len(), dimensions));
    for (row, (id, values)) in categories.into_iter().enumerate() {
        if values.len() != dimensions {
            return Err(RecommendError::Data(format!(
                "item '{}' has {} categories, expected {}",
                id,
                values.len(),
                dimensions
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RecommendError::Data(format!(
                "item '{}' has a non-finite category value",
                id
            )));
        }
        for (column, value) in values.iter().enumerate() {
            matrix[[row, column]] = *value;
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_used_directly() {
        let items = vec![
            CatalogItem::with_categories("A", vec![1.0, 0.0, 1.0, 0.0]),
            CatalogItem::with_categories("B", vec![0.0, 1.0, 0.0, 1.0]),
        ];
        let matrix = feature_matrix(&items, 1000).unwrap();
        assert_eq!(matrix.dim(), (2, 4));
        assert_eq!(matrix[[0, 2]], 1.0);
        assert_eq!(matrix[[1, 2]], 0.0);
    }

    #[test]
    fn test_tags_are_vectorized() {
        let items = vec![
            CatalogItem::with_tags("Alien Attack", "aliens invade earth"),
            CatalogItem::with_tags("Alien Return", "the alien returns to earth"),
        ];
        let matrix = feature_matrix(&items, 1000).unwrap();
        assert_eq!(matrix.nrows(), 2);
        // alien, earth, invad, return
        assert_eq!(matrix.ncols(), 4);
    }

    #[test]
    fn test_empty_catalog() {
        let result = feature_matrix(&[], 1000);
        assert!(matches!(result, Err(RecommendError::Configuration(_))));
    }

    #[test]
    fn test_missing_features() {
        let items = vec![
            CatalogItem::with_categories("A", vec![1.0, 0.0]),
            CatalogItem {
                id: "B".into(),
                features: None,
            },
        ];
        let result = feature_matrix(&items, 1000);
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }

    #[test]
    fn test_blank_tags() {
        let items = vec![CatalogItem::with_tags("A", "   ")];
        let result = feature_matrix(&items, 1000);
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }

    #[test]
    fn test_mixed_feature_kinds() {
        let items = vec![
            CatalogItem::with_categories("A", vec![1.0, 0.0]),
            CatalogItem::with_tags("B", "sea monster"),
        ];
        let result = feature_matrix(&items, 1000);
        assert!(matches!(result, Err(RecommendError::Configuration(_))));
    }

    #[test]
    fn test_ragged_categories() {
        let items = vec![
            CatalogItem::with_categories("A", vec![1.0, 0.0]),
            CatalogItem::with_categories("B", vec![1.0, 0.0, 1.0]),
        ];
        let result = feature_matrix(&items, 1000);
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }

    #[test]
    fn test_non_finite_category() {
        let items = vec![CatalogItem::with_categories("A", vec![f64::NAN, 1.0])];
        let result = feature_matrix(&items, 1000);
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }
}
