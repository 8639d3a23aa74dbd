//! Simulation parameters.
//!
//! Parameters exist for the whole session. They are replaced by explicit
//! user actions and never deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted Hurst exponent (inclusive).
pub const HURST_MIN: f64 = 0.1;
/// Highest accepted Hurst exponent (inclusive).
pub const HURST_MAX: f64 = 0.9;

/// Lowest accepted number of points (inclusive).
pub const NUM_POINTS_MIN: usize = 128;
/// Highest accepted number of points (inclusive).
pub const NUM_POINTS_MAX: usize = 4096;

/// Upper bound on the time horizon (inclusive); the lower bound 0 is exclusive.
pub const TIME_LENGTH_MAX: f64 = 20.0;

/// Hurst presets offered next to the slider: anti-persistent, random walk, persistent.
pub const HURST_PRESETS: [f64; 3] = [0.3, 0.5, 0.7];

/// Point counts offered by the resolution selector.
pub const NUM_POINTS_CHOICES: [usize; 5] = [128, 256, 512, 1024, 2048];

/// Horizon presets offered next to the time length input.
pub const TIME_LENGTH_PRESETS: [f64; 4] = [0.5, 1.0, 2.0, 5.0];

/// Parameters of one simulation run.
///
/// Serialised with camelCase field names (`hurst`, `numPoints`, `timeLength`).
///
/// # Examples
///
/// ```rust
/// use sim_core::types::SimulationParameters;
///
/// let params = SimulationParameters::default();
/// assert_eq!(params.hurst, 0.5);
/// assert_eq!(params.num_points, 512);
/// assert_eq!(params.time_length, 2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    /// Hurst exponent H in [0.1, 0.9].
    pub hurst: f64,
    /// Number of increments per path in [128, 4096].
    pub num_points: usize,
    /// Time horizon T in (0, 20].
    pub time_length: f64,
}

impl SimulationParameters {
    /// Creates a parameter set without validating it.
    #[inline]
    pub fn new(hurst: f64, num_points: usize, time_length: f64) -> Self {
        Self {
            hurst,
            num_points,
            time_length,
        }
    }

    /// Returns a copy with the Hurst exponent replaced.
    #[inline]
    pub fn with_hurst(self, hurst: f64) -> Self {
        Self { hurst, ..self }
    }

    /// Returns a copy with the number of points replaced.
    #[inline]
    pub fn with_num_points(self, num_points: usize) -> Self {
        Self { num_points, ..self }
    }

    /// Returns a copy with the time horizon replaced.
    #[inline]
    pub fn with_time_length(self, time_length: f64) -> Self {
        Self {
            time_length,
            ..self
        }
    }

    /// Time step `T / n`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.time_length / self.num_points as f64
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            hurst: 0.5,
            num_points: 512,
            time_length: 2.0,
        }
    }
}

impl fmt::Display for SimulationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H={:.3}, n={}, T={}",
            self.hurst, self.num_points, self.time_length
        )
    }
}
