use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};

use super::{PorterStemmer, StopWords};
use crate::error::RecommendError;

/// Bag-of-words count vectorizer for free-text tags.
///
/// Each document is lowercased, split on non-alphanumeric characters and
/// stemmed. Stems shorter than two characters or found in the stop-word list
/// are then dropped, so the list is matched against stems. The vocabulary keeps
/// the `max_features` most frequent stems across the whole corpus (ties go to
/// the alphabetically smaller term) and assigns columns in alphabetical order.
#[derive(Debug, Clone)]
pub struct TagVectorizer {
    max_features: usize,
    stop_words: StopWords,
    stemmer: PorterStemmer,
    vocabulary: BTreeMap<String, usize>,
}

impl TagVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            stop_words: StopWords::english(),
            stemmer: PorterStemmer::new(),
            vocabulary: BTreeMap::new(),
        }
    }

    /// Term to column mapping learned by the last `fit_transform`
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Splits a document into the stemmed terms that get counted
    pub fn analyze(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(|token| self.stemmer.stem(token))
            .filter(|stem| stem.chars().count() >= 2 && !self.stop_words.contains(stem))
            .collect()
    }

    /// Learns the vocabulary from `documents` and returns their count matrix
    /// (`documents.len()` rows × vocabulary size columns)
    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<Array2<f64>, RecommendError> {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.analyze(doc.as_ref()))
            .collect();

        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for term in analyzed.iter().flatten() {
            *term_counts.entry(term.as_str()).or_insert(0) += 1;
        }

        if term_counts.is_empty() {
            return Err(RecommendError::Data(
                "tags produced an empty vocabulary; every word is a stop word or too short"
                    .to_string(),
            ));
        }

        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = self.vocabulary.len(),
            "Vectorized catalog tags"
        );

        let mut counts = Array2::<f64>::zeros((analyzed.len(), self.vocabulary.len()));
        for (row, terms) in analyzed.iter().enumerate() {
            for term in terms {
                if let Some(&column) = self.vocabulary.get(term) {
                    counts[[row, column]] += 1.0;
                }
            }
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_stems_then_drops_stop_words() {
        let vectorizer = TagVectorizer::new(1000);
        let terms = vectorizer.analyze("A couple, LOVING each other in Paris!");
        assert_eq!(terms, vec!["coupl", "love", "pari"]);
    }

    #[test]
    fn test_stop_words_are_matched_against_stems() {
        let vectorizer = TagVectorizer::new(1000);
        // "becomes" is a stop word but its stem is not; "ones" stems to the stop word "on"
        assert_eq!(vectorizer.analyze("becomes ones"), vec!["becom"]);
    }

    #[test]
    fn test_counts_repeated_terms() {
        let mut vectorizer = TagVectorizer::new(1000);
        let counts = vectorizer
            .fit_transform(&["monster lagoon monster", "lagoon"])
            .unwrap();

        let monster = vectorizer.vocabulary()["monster"];
        let lagoon = vectorizer.vocabulary()["lagoon"];
        assert_eq!(counts.dim(), (2, 2));
        assert_eq!(counts[[0, monster]], 2.0);
        assert_eq!(counts[[0, lagoon]], 1.0);
        assert_eq!(counts[[1, monster]], 0.0);
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let mut vectorizer = TagVectorizer::new(2);
        let counts = vectorizer
            .fit_transform(&["drama drama", "drama comedy horror"])
            .unwrap();

        // comedy and horror tie on count; the alphabetically smaller stem wins
        let vocabulary: Vec<&str> = vectorizer.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(vocabulary, vec!["comedi", "drama"]);
        assert_eq!(vectorizer.vocabulary()["comedi"], 0);
        assert_eq!(counts.dim(), (2, 2));
    }

    #[test]
    fn test_variants_share_a_column() {
        let mut vectorizer = TagVectorizer::new(1000);
        vectorizer.fit_transform(&["loved", "loving", "love"]).unwrap();
        assert_eq!(vectorizer.vocabulary().len(), 1);
    }

    #[test]
    fn test_only_stop_words_is_a_data_error() {
        let mut vectorizer = TagVectorizer::new(1000);
        let result = vectorizer.fit_transform(&["the and of", "a"]);
        assert!(matches!(result, Err(RecommendError::Data(_))));
    }
}
