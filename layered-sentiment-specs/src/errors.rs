//! Error types for the calibration harness.

use layered_sentiment::CalibrationError;
use thiserror::Error;

/// Errors that can occur while loading fixtures or running the pipeline.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A file could not be read.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// A file was read but its content is malformed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The pipeline configuration is inconsistent.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Calibration refused to produce parameters.
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Result type for harness operations.
pub type SpecResult<T> = Result<T, SpecError>;
