//! Simulator data model.
//!
//! This module provides:
//! - `params`: [`SimulationParameters`] with bounds, defaults and input presets
//! - `path`: [`PathPoint`], [`PathSeries`] and [`PathStatistics`]
//! - `request`: [`GenerationRequest`], [`GenerationOutput`] and [`GenerationResult`]
//! - `error`: [`GenerationError`] and [`ExportError`]

pub mod error;
pub mod params;
pub mod path;
pub mod request;

pub use error::{ExportError, GenerationError};
pub use params::SimulationParameters;
pub use path::{PathPoint, PathSeries, PathStatistics, PATH_COUNT};
pub use request::{GenerationOutput, GenerationRequest, GenerationResult};
