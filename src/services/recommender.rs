use std::collections::HashSet;
use std::sync::Arc;

use crate::{error::RecommendError, models::ItemId, services::similarity::SimilarityIndex};

/// Ranks catalog items against a shared, read-only [`SimilarityIndex`].
///
/// Two modes are offered and the caller picks one:
/// - [`Recommender::recommend_similar`]: items closest to one seed title.
///   An unknown seed is an error.
/// - [`Recommender::recommend_for_history`]: items closest to a whole watch
///   history, scored by summing similarity over every watched title. Unknown
///   titles are skipped.
///
/// Ties are broken by catalog order in both modes.
#[derive(Debug, Clone)]
pub struct Recommender {
    index: Arc<SimilarityIndex>,
    default_top_n: usize,
}

impl Recommender {
    pub fn new(index: Arc<SimilarityIndex>, default_top_n: usize) -> Self {
        Self {
            index,
            default_top_n,
        }
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Single-seed mode: the `top_n` items most similar to `seed`, never
    /// including `seed` itself
    pub fn recommend_similar(
        &self,
        seed: &str,
        top_n: Option<usize>,
    ) -> Result<Vec<ItemId>, RecommendError> {
        let position = self
            .index
            .position(seed)
            .ok_or_else(|| RecommendError::NotFound(format!("title '{}' is not in the catalog", seed)))?;

        let row = self.index.row(position);
        let candidates = row
            .iter()
            .enumerate()
            .filter(|(candidate, _)| *candidate != position)
            .map(|(candidate, score)| (candidate, *score))
            .collect();

        Ok(self.take_top(candidates, top_n))
    }

    /// Aggregate mode: every catalog item not in `watched`, scored by the sum
    /// of its similarity to each watched title found in the catalog.
    ///
    /// An empty history, or one with no title in the catalog, yields an empty
    /// list.
    pub fn recommend_for_history<S: AsRef<str>>(
        &self,
        watched: &[S],
        top_n: Option<usize>,
    ) -> Vec<ItemId> {
        let watched: HashSet<&str> = watched.iter().map(|id| id.as_ref()).collect();

        let mut seeds: Vec<usize> = Vec::with_capacity(watched.len());
        for id in &watched {
            match self.index.position(id) {
                Some(position) => seeds.push(position),
                None => tracing::debug!(title = %id, "Watched title not in catalog, skipping"),
            }
        }

        if seeds.is_empty() {
            return Vec::new();
        }
        // HashSet iteration order is arbitrary; summation order must not be
        seeds.sort_unstable();

        let mut totals = vec![0.0_f64; self.index.len()];
        for &seed in &seeds {
            for (total, score) in totals.iter_mut().zip(self.index.row(seed).iter()) {
                *total += *score;
            }
        }

        let candidates = totals
            .into_iter()
            .enumerate()
            .filter(|(candidate, _)| {
                self.index
                    .id_at(*candidate)
                    .is_some_and(|id| !watched.contains(id.as_str()))
            })
            .collect();

        self.take_top(candidates, top_n)
    }

    fn take_top(&self, mut candidates: Vec<(usize, f64)>, top_n: Option<usize>) -> Vec<ItemId> {
        let top_n = top_n.unwrap_or(self.default_top_n);

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        candidates
            .into_iter()
            .take(top_n)
            .filter_map(|(position, _)| self.index.id_at(position).cloned())
            .collect()
    }
}
