//! # Gaussian Deviate Source
//!
//! Standard-normal deviates for path generation, produced with the
//! Box-Muller transform.
//!
//! ## Spare Value
//!
//! Box-Muller yields two independent deviates per pair of uniform draws.
//! [`GaussianSource`] returns the sine branch immediately and keeps the
//! cosine branch as a *spare* that the next call returns without drawing.
//! The spare is an ordinary field of the source instance: it survives from
//! one generation to the next until [`GaussianSource::reset`] is called.
//!
//! ## Seeding
//!
//! [`GaussianSource::from_entropy`] is the interactive default and gives no
//! reproducibility across runs. [`GaussianSource::from_seed`] produces
//! deterministic sequences for tests and for `--seed` runs.
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_paths::rng::GaussianSource;
//!
//! let mut source = GaussianSource::from_seed(12345);
//! let first = source.next_gaussian();
//! assert!(source.has_spare());
//!
//! let mut buffer = vec![0.0; 100];
//! source.fill(&mut buffer);
//! ```

mod gaussian;

pub use gaussian::GaussianSource;
