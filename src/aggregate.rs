//! Weighted polarity aggregation and the threshold rule.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::context_window::filter_context;
use crate::document::{Category, Document};
use crate::negation::{adjust_negation, NegationCues};
use crate::term_weight::TermWeightIndex;

/// Dot product of resolved polarity (absent as `0.0`) and term weights.
///
/// # Panics
/// Panics if `tokens` and `polarity` differ in length.
pub fn score<S: AsRef<str>>(
    tokens: &[S],
    polarity: &[Option<f64>],
    weights: &TermWeightIndex,
) -> f64 {
    assert_eq!(
        tokens.len(),
        polarity.len(),
        "token and polarity sequences must be index-aligned"
    );
    tokens
        .iter()
        .zip(polarity)
        .map(|(token, value)| value.unwrap_or(0.0) * weights.weight(token.as_ref()))
        .sum()
}

/// Map a score to a category. Comparisons are strict: a score exactly at
/// `±threshold` is neutral.
pub fn categorize(score: f64, threshold: f64) -> Category {
    if score > threshold {
        Category::Positive
    } else if score < -threshold {
        Category::Negative
    } else {
        Category::Neutral
    }
}

/// Score and category of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub score: f64,
    pub category: Category,
}

/// Scores documents against a built index with fixed parameters.
///
/// Stages run in order: negation adjustment (if configured), context window
/// filtering (if configured), then aggregation.
#[derive(Debug, Clone)]
pub struct SentimentScorer<'a> {
    weights: &'a TermWeightIndex,
    threshold: f64,
    negation: Option<(NegationCues, usize)>,
    context_window: Option<usize>,
}

impl<'a> SentimentScorer<'a> {
    pub fn new(weights: &'a TermWeightIndex, threshold: f64) -> Self {
        Self {
            weights,
            threshold,
            negation: None,
            context_window: None,
        }
    }

    /// Invert polarity near the given negation cues.
    pub fn with_negation(mut self, cues: NegationCues, window: usize) -> Self {
        self.negation = Some((cues, window));
        self
    }

    /// Only count polarity within `window` tokens of a party mention.
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = Some(window);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The polarity vector after all configured adjustments.
    pub fn adjusted_polarity(&self, document: &Document) -> Vec<Option<f64>> {
        let mut polarity = match &self.negation {
            Some((cues, window)) => {
                adjust_negation(&document.tokens, &document.polarity, cues, *window)
            }
            None => document.polarity.clone(),
        };
        if let Some(window) = self.context_window {
            polarity = filter_context(&document.tokens, &polarity, &document.anchors, window);
        }
        polarity
    }

    pub fn score_document(&self, document: &Document) -> ScoredDocument {
        let polarity = self.adjusted_polarity(document);
        let score = score(&document.tokens, &polarity, self.weights);
        ScoredDocument {
            score,
            category: categorize(score, self.threshold),
        }
    }

    /// Score many documents in parallel. Results are in input order.
    pub fn score_batch(&self, documents: &[Document]) -> Vec<ScoredDocument> {
        documents
            .par_iter()
            .map(|document| self.score_document(document))
            .collect()
    }
}
