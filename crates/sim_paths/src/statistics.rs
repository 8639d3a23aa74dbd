//! Per-path summary statistics.

use sim_core::{GenerationError, PathStatistics};

/// Minimum path length accepted by [`compute_statistics`].
pub const MIN_PATH_LEN: usize = 2;

/// Reduces one path to its summary statistics.
///
/// `avg_variation` is the mean of `|path[i] - path[i-1]|` over all adjacent
/// pairs; extrema are taken over the full path including its origin.
///
/// # Errors
///
/// Returns [`GenerationError::InsufficientData`] for paths shorter than two points.
///
/// # Examples
///
/// ```rust
/// use sim_paths::statistics::compute_statistics;
///
/// let stats = compute_statistics(&[0.0, 1.0, -1.0, 0.5]).unwrap();
/// assert_eq!(stats.final_value, 0.5);
/// assert_eq!(stats.max_value, 1.0);
/// assert_eq!(stats.min_value, -1.0);
/// assert_eq!(stats.range, 2.0);
/// assert!((stats.avg_variation - 4.5 / 3.0).abs() < 1e-12);
/// ```
pub fn compute_statistics(path: &[f64]) -> Result<PathStatistics, GenerationError> {
    if path.len() < MIN_PATH_LEN {
        return Err(GenerationError::InsufficientData {
            got: path.len(),
            need: MIN_PATH_LEN,
        });
    }

    let mut max_value = f64::NEG_INFINITY;
    let mut min_value = f64::INFINITY;
    for &value in path {
        max_value = max_value.max(value);
        min_value = min_value.min(value);
    }

    let total_variation: f64 = path.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    let avg_variation = total_variation / (path.len() - 1) as f64;

    Ok(PathStatistics {
        final_value: path[path.len() - 1],
        max_value,
        min_value,
        range: max_value - min_value,
        avg_variation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_too_short() {
        assert_eq!(
            compute_statistics(&[1.0]),
            Err(GenerationError::InsufficientData { got: 1, need: 2 })
        );
        assert!(compute_statistics(&[]).is_err());
    }

    #[test]
    fn test_flat_path() {
        let stats = compute_statistics(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.avg_variation, 0.0);
    }

    #[test]
    fn test_two_points() {
        let stats = compute_statistics(&[0.0, -0.25]).unwrap();
        assert_eq!(stats.final_value, -0.25);
        assert_eq!(stats.max_value, 0.0);
        assert_eq!(stats.min_value, -0.25);
        assert_eq!(stats.avg_variation, 0.25);
    }

    proptest! {
        #[test]
        fn test_statistics_invariants(path in prop::collection::vec(-100.0f64..100.0, 2..300)) {
            let stats = compute_statistics(&path).unwrap();
            prop_assert_eq!(stats.range, stats.max_value - stats.min_value);
            prop_assert!(stats.avg_variation >= 0.0);
            prop_assert!(stats.min_value <= stats.final_value);
            prop_assert!(stats.final_value <= stats.max_value);
        }
    }
}
