//! Generation requests and their results.

use super::params::SimulationParameters;
use super::path::{PathSeries, PathStatistics, PATH_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tagged request to generate paths.
///
/// Ids are issued in strictly increasing order by the scheduler. Only the
/// request carrying the highest issued id may commit its result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Generation id.
    pub id: u64,
    /// Parameters captured when the request was issued.
    pub parameters: SimulationParameters,
}

impl GenerationRequest {
    /// Creates a request.
    #[inline]
    pub fn new(id: u64, parameters: SimulationParameters) -> Self {
        Self { id, parameters }
    }
}

/// Everything one generation step computes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    /// Rounded, plottable series of the three paths.
    pub series: PathSeries,
    /// Statistics of each path.
    pub statistics: [PathStatistics; PATH_COUNT],
    /// Rescaled-range Hurst estimate of each path's increments, if available.
    pub estimated_hurst: [Option<f64>; PATH_COUNT],
    /// DFA scaling exponent of each path's increments, if available.
    pub dfa_hurst: [Option<f64>; PATH_COUNT],
}

/// A committed (visible) generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// The request that produced this result.
    pub request: GenerationRequest,
    /// Computed paths and statistics.
    pub output: GenerationOutput,
    /// Commit time.
    pub committed_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Parameters the committed paths were generated with.
    #[inline]
    pub fn parameters(&self) -> &SimulationParameters {
        &self.request.parameters
    }

    /// Committed series.
    #[inline]
    pub fn series(&self) -> &PathSeries {
        &self.output.series
    }

    /// Committed statistics.
    #[inline]
    pub fn statistics(&self) -> &[PathStatistics; PATH_COUNT] {
        &self.output.statistics
    }
}
