//! Pairwise cosine similarity between every catalog item.
//!
//! The index is built once at startup (or loaded from a persisted blob) and is
//! read-only afterwards; request handlers share it behind an `Arc`.

pub mod persist;

use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

use crate::{
    error::RecommendError,
    models::{CatalogItem, ItemId},
    services::features,
};

/// Tolerance used when validating matrices that did not come from `build`
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Cosine similarity of two equal-length vectors.
///
/// A zero-magnitude vector is orthogonal to everything, including itself.
fn cosine_similarity(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    ids: Vec<ItemId>,
    positions: HashMap<ItemId, usize>,
    scores: Array2<f64>,
    built_at: DateTime<Utc>,
}

impl SimilarityIndex {
    /// Builds the index from the full catalog
    pub fn build(items: &[CatalogItem], max_features: usize) -> Result<Self, RecommendError> {
        let ids: Vec<ItemId> = items.iter().map(|item| item.id.clone()).collect();
        let positions = index_positions(&ids).map_err(RecommendError::Configuration)?;

        let vectors = features::feature_matrix(items, max_features)?;
        let scores = pairwise_cosine(&vectors);

        tracing::info!(
            items = ids.len(),
            dimensions = vectors.ncols(),
            "Built similarity index"
        );

        Ok(Self {
            ids,
            positions,
            scores,
            built_at: Utc::now(),
        })
    }

    /// Wraps a precomputed score matrix, checking it is a usable similarity
    /// matrix for `ids`
    pub fn from_scores(ids: Vec<ItemId>, scores: Array2<f64>) -> Result<Self, RecommendError> {
        let (rows, cols) = scores.dim();
        if rows != cols {
            return Err(RecommendError::Data(format!(
                "similarity matrix is {}x{}, expected a square matrix",
                rows, cols
            )));
        }
        if ids.len() != rows {
            return Err(RecommendError::Data(format!(
                "{} identities for a {}x{} similarity matrix",
                ids.len(),
                rows,
                cols
            )));
        }
        if ids.is_empty() {
            return Err(RecommendError::Data("similarity matrix is empty".to_string()));
        }

        let positions = index_positions(&ids).map_err(RecommendError::Data)?;

        for ((i, j), &score) in scores.indexed_iter() {
            if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
                return Err(RecommendError::Data(format!(
                    "score {} at ({}, {}) is outside [-1, 1]",
                    score, i, j
                )));
            }
            if (score - scores[[j, i]]).abs() > SYMMETRY_TOLERANCE {
                return Err(RecommendError::Data(format!(
                    "similarity matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }

        Ok(Self {
            ids,
            positions,
            scores,
            built_at: Utc::now(),
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Item identities in catalog order
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn id_at(&self, position: usize) -> Option<&ItemId> {
        self.ids.get(position)
    }

    /// Similarity of the item at `position` to every item, in catalog order
    pub fn row(&self, position: usize) -> ArrayView1<'_, f64> {
        self.scores.row(position)
    }

    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    /// When the scores were computed (preserved across save/load)
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

fn index_positions(ids: &[ItemId]) -> Result<HashMap<ItemId, usize>, String> {
    if ids.is_empty() {
        return Err("catalog is empty".to_string());
    }
    let mut positions = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        if positions.insert(id.clone(), position).is_some() {
            return Err(format!("duplicate catalog identity '{}'", id));
        }
    }
    Ok(positions)
}

/// Upper triangle is computed once and mirrored, so the result is exactly
/// symmetric. Non-zero rows get exactly 1.0 on the diagonal.
fn pairwise_cosine(vectors: &Array2<f64>) -> Array2<f64> {
    let n = vectors.nrows();

    let mut scores = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        let row = vectors.row(i);
        if row.iter().all(|&v| v == 0.0) {
            continue;
        }
        scores[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let score = cosine_similarity(&row, &vectors.row(j));
            scores[[i, j]] = score;
            scores[[j, i]] = score;
        }
    }
    scores
}
