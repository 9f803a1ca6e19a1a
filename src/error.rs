//! Calibration errors.

use thiserror::Error;

use crate::document::Category;

/// Reasons a calibration run refuses to produce parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// No labeled documents were supplied.
    #[error("insufficient data: calibration needs at least one labeled document")]
    InsufficientData,

    /// Every labeled document carries the same category.
    #[error("insufficient data: all labeled documents are {category}, calibration needs at least two categories")]
    SingleClass { category: Category },

    /// The sweep range or step cannot be iterated.
    #[error("invalid sweep: {message}")]
    InvalidSweep { message: String },
}
