//! Error types for generation and export.
//!
//! This module provides:
//! - `GenerationError`: Failures while computing increments, paths or statistics
//! - `ExportError`: Failures while producing or writing the export artifact
//!
//! Validation failures are reported separately as
//! [`ValidationError`](crate::validation::ValidationError) lists, since more
//! than one can be produced per pass.

use thiserror::Error;

/// Failure of one generation step.
///
/// Generation errors are terminal for the current generation only; the
/// scheduler surfaces them as a single message and keeps previously
/// committed data.
///
/// # Examples
/// ```
/// use sim_core::types::GenerationError;
///
/// let err = GenerationError::InsufficientData { got: 1, need: 2 };
/// assert_eq!(format!("{}", err), "Insufficient data points: got 1, need at least 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Invalid numeric input to a generation component.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parameters rejected by validation.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Too few points for the requested computation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Points provided.
        got: usize,
        /// Minimum points required.
        need: usize,
    },

    /// Increment sequences of different lengths were combined.
    #[error("Path shape mismatch: expected {expected} increments, got {got}")]
    ShapeMismatch {
        /// Expected sequence length.
        expected: usize,
        /// Offending sequence length.
        got: usize,
    },

    /// The background generation task died before producing a result.
    #[error("Generation task failed: {0}")]
    TaskFailed(String),
}

/// Failure of an export.
///
/// # Examples
/// ```
/// use sim_core::types::ExportError;
///
/// assert_eq!(ExportError::NoData.to_string(), "No data to export");
/// ```
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export was requested while nothing is committed.
    #[error("No data to export")]
    NoData,

    /// Writing the artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a CSV row failed.
    #[error("CSV encoding error: {0}")]
    Csv(String),
}
