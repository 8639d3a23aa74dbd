//! CLI error types

use sim_core::{ExportError, GenerationError};
use sim_session::config::ConfigError;
use thiserror::Error;

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors reported by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A generation failed or was rejected
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Path computation error outside the scheduler
    #[error(transparent)]
    Compute(#[from] GenerationError),

    /// Export failed
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Invalid command line or session input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialisation error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
