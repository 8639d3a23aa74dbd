//! # sim_paths: Path Engine (Layer 2)
//!
//! ## Layer 2 Role
//!
//! sim_paths turns [`SimulationParameters`](sim_core::SimulationParameters)
//! into three sample paths approximating fractional Brownian motion:
//! - [`rng`]: Box-Muller Gaussian source with an explicit cached spare
//! - [`increments`]: Hurst-scaled Brownian increments
//! - [`paths`]: Cumulative paths and the rounded plottable series
//! - [`statistics`]: Per-path summary statistics
//! - [`estimator`]: Rescaled-range (R/S) and DFA Hurst estimation
//! - [`projection`]: Geometric projection of a path onto prices
//! - [`engine`]: One complete generation step
//!
//! ## Fidelity
//!
//! Increments are i.i.d. Gaussian scaled by `dt^H`. This reproduces the
//! variance scaling of a self-similar process but not the long-range
//! dependence of true fBm; the engine is a visualisation aid.
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_core::SimulationParameters;
//! use sim_paths::engine::PathEngine;
//!
//! let mut engine = PathEngine::from_seed(7);
//! let output = engine.generate(&SimulationParameters::default()).unwrap();
//!
//! assert_eq!(output.series.len(), 513);
//! assert_eq!(output.series.points()[0].values, [0.0, 0.0, 0.0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod engine;
pub mod estimator;
pub mod increments;
pub mod paths;
pub mod projection;
pub mod rng;
pub mod statistics;

pub use engine::PathEngine;
pub use estimator::{Dfa, RescaledRange};
pub use increments::IncrementGenerator;
pub use paths::PathBuilder;
pub use projection::PriceProjection;
pub use rng::GaussianSource;
pub use statistics::compute_statistics;
