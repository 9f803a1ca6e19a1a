#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Lexicon-weighted party sentiment scoring and threshold calibration.
//!
//! Documents arrive already tokenized and annotated: every token carries an
//! optional polarity value from a sentiment lexicon, and tokens identified as
//! party mentions are recorded as anchor positions. This crate turns those
//! annotations into a sentiment verdict and tunes the verdict against
//! hand-labeled paragraphs.
//!
//! ## Pipeline
//!
//! 1. [`TermWeightIndex`] - corpus-wide TF-IDF term weights, built once
//! 2. [`adjust_negation`] - flips polarity near negation cues
//! 3. [`filter_context`] - zeroes polarity far away from party mentions
//! 4. [`score`] / [`categorize`] - weighted dot product and threshold rule
//! 5. [`calibrate_threshold`] / [`calibrate_window_and_threshold`] - grid
//!    search maximizing the summed per-class F1
//!
//! ## Example
//!
//! ```
//! use layered_sentiment::{Category, Document, SentimentScorer, TermWeightConfig, TermWeightIndex};
//!
//! let docs = vec![
//!     Document::new(
//!         vec!["das".into(), "ist".into(), "ein".into(), "guter".into(), "tag".into()],
//!         vec![Some(0.0), Some(0.0), Some(0.0), Some(0.4), Some(0.0)],
//!     ),
//!     Document::new(
//!         vec!["das".into(), "ist".into(), "ein".into(), "normaler".into(), "tag".into()],
//!         vec![None, None, None, None, None],
//!     ),
//! ];
//!
//! let index = TermWeightIndex::build(&docs, &TermWeightConfig::default());
//! let scorer = SentimentScorer::new(&index, 0.0);
//! assert_eq!(scorer.score_document(&docs[0]).category, Category::Positive);
//! assert_eq!(scorer.score_document(&docs[1]).category, Category::Neutral);
//! ```

mod aggregate;
mod calibrate;
mod context_window;
mod document;
mod error;
mod metrics;
mod negation;
mod normalize;
mod statistics;
mod term_weight;

pub use aggregate::{categorize, score, ScoredDocument, SentimentScorer};
pub use calibrate::{
    calibrate_threshold, calibrate_window_and_threshold, calibrate_window_and_threshold_with,
    SweepPoint, ThresholdCalibration, ThresholdSweep, WindowCalibration, WindowOptimum,
    WindowSweep, MAX_SWEEP_POINTS,
};
pub use context_window::{context_polarity, filter_context};
pub use document::{Category, Document, LabeledDocument, Subjectivity, UnknownLabel};
pub use error::CalibrationError;
pub use metrics::{
    evaluate, metrics, Agreement, ClassMetrics, ConfusionMatrix, MetricsReport,
};
pub use negation::{adjust_negation, invert_polarity, NegationCues, DEFAULT_NEGATION_WINDOW};
pub use normalize::{normalize_token, remove_umlauts};
pub use statistics::{
    compare_with_baseline, filter_documents, sentiment_statistics, subjectivity_breakdown,
    BaselineComparison, CategoryCounts, DocumentFilter, GroupBy, SentimentStatistics,
    SubjectivityBreakdown, DEFAULT_MEDIA, DEFAULT_PARTIES,
};
pub use term_weight::{TermWeightConfig, TermWeightIndex};

#[cfg(test)]
mod tests {
    mod calibration;
    mod scoring;
}
