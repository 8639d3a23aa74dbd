//! # sim_core: Foundation for the Fractional Path Simulator
//!
//! ## Layer 1 (Foundation) Role
//!
//! sim_core is the bottom layer of the simulator workspace, providing:
//! - Simulation parameters and their bounds (`types::params`)
//! - Path series and summary statistics (`types::path`)
//! - Generation requests and results (`types::request`)
//! - Error types: `GenerationError`, `ExportError` (`types::error`)
//! - Parameter validation (`validation`)
//! - Rounding helpers for stable rendering and export (`math`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other sim_* crates, with minimal external dependencies:
//! - chrono: Commit timestamps
//! - serde: Serialisation of parameters and results
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use sim_core::types::SimulationParameters;
//! use sim_core::validation::validate;
//!
//! let params = SimulationParameters::default();
//! assert!(validate(&params).is_empty());
//!
//! let bad = SimulationParameters { hurst: 0.05, ..params };
//! let errors = validate(&bad);
//! assert_eq!(errors[0].message, "Hurst exponent must be between 0.1 and 0.9");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
pub mod validation;

pub use types::{
    ExportError, GenerationError, GenerationOutput, GenerationRequest, GenerationResult,
    PathPoint, PathSeries, PathStatistics, SimulationParameters, PATH_COUNT,
};
pub use validation::{first_error, validate, ParameterField, ValidationError};
