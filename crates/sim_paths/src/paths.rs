//! Cumulative path construction and series projection.
//!
//! Paths start at zero and accumulate increments:
//! `path[0] = 0`, `path[i] = path[i-1] + increment[i-1]`.
//! The projection into a [`PathSeries`] rounds times to 4 decimals and
//! values to 6 decimals.

use sim_core::math::{round_time, round_value};
use sim_core::{GenerationError, PathPoint, PathSeries, PATH_COUNT};

/// Cumulative sum of `increments`, prefixed with zero.
///
/// # Examples
///
/// ```rust
/// use sim_paths::paths::cumulative_path;
///
/// assert_eq!(cumulative_path(&[1.0, -2.0, 0.5]), vec![0.0, 1.0, -1.0, -0.5]);
/// ```
pub fn cumulative_path(increments: &[f64]) -> Vec<f64> {
    let mut path = Vec::with_capacity(increments.len() + 1);
    let mut current = 0.0;
    path.push(current);
    for &increment in increments {
        current += increment;
        path.push(current);
    }
    path
}

/// Builds the three sample paths of one generation and their series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathBuilder {
    num_points: usize,
    time_length: f64,
}

impl PathBuilder {
    /// Creates a builder for `num_points` increments over `time_length`.
    #[inline]
    pub fn new(num_points: usize, time_length: f64) -> Self {
        Self {
            num_points,
            time_length,
        }
    }

    /// Accumulates three increment sequences into paths of length `n + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ShapeMismatch`] if any sequence length
    /// differs from `num_points`.
    pub fn build_paths(
        &self,
        increments: &[Vec<f64>; PATH_COUNT],
    ) -> Result<[Vec<f64>; PATH_COUNT], GenerationError> {
        for sequence in increments {
            if sequence.len() != self.num_points {
                return Err(GenerationError::ShapeMismatch {
                    expected: self.num_points,
                    got: sequence.len(),
                });
            }
        }

        Ok([
            cumulative_path(&increments[0]),
            cumulative_path(&increments[1]),
            cumulative_path(&increments[2]),
        ])
    }

    /// Projects raw paths onto a rounded [`PathSeries`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ShapeMismatch`] if any path length
    /// differs from `num_points + 1`.
    pub fn project(&self, paths: &[Vec<f64>; PATH_COUNT]) -> Result<PathSeries, GenerationError> {
        let len = self.num_points + 1;
        for path in paths {
            if path.len() != len {
                return Err(GenerationError::ShapeMismatch {
                    expected: len,
                    got: path.len(),
                });
            }
        }

        let dt = self.time_length / self.num_points as f64;
        let points = (0..len)
            .map(|i| PathPoint {
                time: round_time(i as f64 * dt),
                values: [
                    round_value(paths[0][i]),
                    round_value(paths[1][i]),
                    round_value(paths[2][i]),
                ],
            })
            .collect();

        Ok(PathSeries::new(points))
    }

    /// Accumulates and projects in one call, returning both raw paths and series.
    pub fn build(
        &self,
        increments: &[Vec<f64>; PATH_COUNT],
    ) -> Result<([Vec<f64>; PATH_COUNT], PathSeries), GenerationError> {
        let paths = self.build_paths(increments)?;
        let series = self.project(&paths)?;
        Ok((paths, series))
    }
}
