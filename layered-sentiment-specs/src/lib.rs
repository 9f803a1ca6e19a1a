#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-driven calibration harness for layered-sentiment.
//!
//! Labeled paragraphs are stored as JSON record arrays and the pipeline
//! parameters as a TOML file. The runner builds the term weight index,
//! calibrates the threshold (and optionally the context window), scores the
//! labeled set and the corpus, and collects everything needed for a report.
//!
//! ## Modules
//!
//! - [`config`] - TOML pipeline configuration
//! - [`loader`] - JSON dataset loading
//! - [`runner`] - End-to-end calibration and scoring
//! - [`formatter`] - Plain-text and CSV reports
//! - [`errors`] - Error types for the harness

pub mod config;
pub mod errors;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use config::{
    ContextSection, NegationSection, PipelineConfig, StatisticsSection, SweepSection,
    ThresholdSection, WeightsSection, WindowSweepSection,
};
pub use errors::{SpecError, SpecResult};
pub use formatter::{
    format_comparison, format_metrics_table, format_statistics, format_summary, format_sweep_csv,
};
pub use loader::{load_all_datasets, load_corpus, load_dataset, parse_corpus, parse_dataset};
pub use runner::{run_pipeline, PipelineResult};
