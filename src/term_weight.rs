//! Corpus-wide TF-IDF term weights.
//!
//! The index is built in a single pass over a document batch and is read-only
//! afterwards. Every document must be scored against a fully built index, so
//! scoring functions only ever receive `&TermWeightIndex`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::normalize::normalize_token;

/// Settings for building a [`TermWeightIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermWeightConfig {
    /// Minimum number of documents a term must occur in to be weighted.
    pub min_df: usize,
}

impl TermWeightConfig {
    pub fn with_min_df(min_df: usize) -> Self {
        Self { min_df }
    }
}

impl Default for TermWeightConfig {
    fn default() -> Self {
        Self { min_df: 1 }
    }
}

/// Immutable map from normalized term to its mean TF-IDF weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeightIndex {
    config: TermWeightConfig,
    document_count: usize,
    weights: BTreeMap<String, f64>,
}

impl TermWeightIndex {
    /// Build the index over a batch of documents.
    ///
    /// Each document row holds raw term counts times the smoothed inverse
    /// document frequency `ln((1 + N) / (1 + df)) + 1`, normalized to unit L2
    /// length. A term's weight is the mean of its row values over all `N`
    /// documents.
    pub fn build<'a, I>(documents: I, config: &TermWeightConfig) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let rows: Vec<Vec<String>> = documents
            .into_iter()
            .map(|doc| doc.tokens.iter().map(|t| normalize_token(t)).collect())
            .collect();
        let n = rows.len();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for row in &rows {
            let unique: HashSet<&str> = row.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let min_df = config.min_df.max(1);
        let idf: BTreeMap<&str, f64> = document_frequency
            .iter()
            .filter(|(_, df)| **df >= min_df)
            .map(|(&term, &df)| {
                let value = ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0;
                (term, value)
            })
            .collect();

        let mut sums: BTreeMap<&str, f64> = idf.keys().map(|&term| (term, 0.0)).collect();
        for row in &rows {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for term in row {
                if idf.contains_key(term.as_str()) {
                    *counts.entry(term.as_str()).or_insert(0) += 1;
                }
            }

            let values: Vec<(&str, f64)> = counts
                .iter()
                .map(|(&term, &count)| (term, count as f64 * idf[term]))
                .collect();
            let norm = values.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, value) in values {
                if let Some(sum) = sums.get_mut(term) {
                    *sum += value / norm;
                }
            }
        }

        let weights: BTreeMap<String, f64> = sums
            .into_iter()
            .map(|(term, sum)| (term.to_string(), sum / n as f64))
            .collect();

        debug!(
            documents = n,
            vocabulary = weights.len(),
            min_df,
            "built term weight index"
        );

        Self {
            config: *config,
            document_count: n,
            weights,
        }
    }

    /// Weight of a token, or `0.0` when the token is not in the index.
    pub fn weight(&self, token: &str) -> f64 {
        self.weights
            .get(normalize_token(token).as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Weights for a token sequence, index-aligned.
    pub fn weights_for<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<f64> {
        tokens.iter().map(|t| self.weight(t.as_ref())).collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.weights.contains_key(normalize_token(token).as_str())
    }

    /// Number of weighted terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of documents the index was built from.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn config(&self) -> &TermWeightConfig {
        &self.config
    }

    /// Terms and weights in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(term, &weight)| (term.as_str(), weight))
    }

    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config)
    }

    /// Deserialize from a RON string.
    pub fn from_ron_string(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}
