//! Path series and per-path summary statistics.

use serde::{Deserialize, Serialize};

/// Number of sample paths produced by one generation.
pub const PATH_COUNT: usize = 3;

/// One row of a plottable path series.
///
/// `time` is rounded to 4 decimals and every entry of `values` to 6
/// decimals when the series is built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Time coordinate `i * T / n`.
    pub time: f64,
    /// Value of each sample path at this time.
    pub values: [f64; PATH_COUNT],
}

/// Ordered sequence of [`PathPoint`]s, length `num_points + 1`.
///
/// # Examples
///
/// ```rust
/// use sim_core::types::{PathPoint, PathSeries};
///
/// let series = PathSeries::new(vec![
///     PathPoint { time: 0.0, values: [0.0, 0.0, 0.0] },
///     PathPoint { time: 0.5, values: [0.1, -0.2, 0.3] },
/// ]);
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.path(1), vec![0.0, -0.2]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSeries {
    points: Vec<PathPoint>,
}

impl PathSeries {
    /// Wraps already-built points.
    pub fn new(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    /// Number of points in the series.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the series holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in time order.
    #[inline]
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Extracts the values of sample path `index` as a column.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PATH_COUNT`.
    pub fn path(&self, index: usize) -> Vec<f64> {
        assert!(index < PATH_COUNT, "path index {} out of range", index);
        self.points.iter().map(|p| p.values[index]).collect()
    }

    /// Time coordinates as a column.
    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    /// Last point of the series, if any.
    #[inline]
    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }
}

/// Scalar summary of one sample path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStatistics {
    /// Value at the horizon.
    pub final_value: f64,
    /// Maximum over the full path.
    pub max_value: f64,
    /// Minimum over the full path.
    pub min_value: f64,
    /// `max_value - min_value`.
    pub range: f64,
    /// Mean absolute step `|x[i] - x[i-1]|`.
    pub avg_variation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> PathSeries {
        PathSeries::new(vec![
            PathPoint {
                time: 0.0,
                values: [0.0, 0.0, 0.0],
            },
            PathPoint {
                time: 1.0,
                values: [1.0, 2.0, 3.0],
            },
            PathPoint {
                time: 2.0,
                values: [-1.0, -2.0, -3.0],
            },
        ])
    }

    #[test]
    fn test_path_columns() {
        let series = sample_series();
        assert_eq!(series.path(0), vec![0.0, 1.0, -1.0]);
        assert_eq!(series.path(2), vec![0.0, 3.0, -3.0]);
        assert_eq!(series.times(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_path_index_out_of_range() {
        sample_series().path(PATH_COUNT);
    }

    #[test]
    fn test_empty_series() {
        let series = PathSeries::default();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_series_serialises_as_array() {
        let json = serde_json::to_string(&sample_series()).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"values\":[1.0,2.0,3.0]"));
    }
}
