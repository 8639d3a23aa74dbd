//! # Hurst Estimation
//!
//! Two estimators of the Hurst exponent, so a generated path can be
//! compared against the exponent it was requested with.
//!
//! ## Rescaled range ([`RescaledRange`])
//!
//! For each window size `w` and every start offset (step 1) the window is
//! mean-centred and cumulatively summed:
//!
//! ```text
//! R(w) = max_k W_k - min_k W_k        W_k = Σ_{i≤k} (X_i - X̄)
//! S(w) = sample standard deviation of the window
//! ```
//!
//! Windows with `S = 0` are skipped. The mean `R/S` per window size is
//! regressed against `w` on log10 axes; the slope, clipped to
//! `[0.01, 0.99]`, is the estimate.
//!
//! Window sizes are 20 log-spaced integers between `min_window` (10) and
//! `len / 2`.
//!
//! ## Detrended fluctuation analysis ([`Dfa`])
//!
//! The series is mean-centred and summed into a profile `Y`. For each box
//! size `s` the profile is cut into non-overlapping boxes from the start,
//! a least-squares line is removed from each box, and the RMS of the
//! residuals is averaged over boxes:
//!
//! ```text
//! F(s) = mean_boxes sqrt(mean_i (Y_i - a - b·i)²)
//! ```
//!
//! The slope of `log10 F(s)` against `log10 s` is the scaling exponent α.
//! It is not clipped; for stationary increments α estimates `H`.
//!
//! Box sizes are 25 log-spaced integers between `min_box` (10) and
//! `len / 4`.
//!
//! Both estimators evaluate their sizes in parallel.

use rayon::prelude::*;
use sim_core::GenerationError;

/// Shortest series accepted by the estimator.
pub const MIN_SERIES_LEN: usize = 20;

/// Fewest usable window sizes required for the regression.
pub const MIN_VALID_WINDOWS: usize = 3;

/// Lower clip of the returned estimate.
pub const ESTIMATE_FLOOR: f64 = 0.01;

/// Upper clip of the returned estimate.
pub const ESTIMATE_CEILING: f64 = 0.99;

/// Shortest series accepted by [`Dfa`].
pub const DFA_MIN_SERIES_LEN: usize = 50;

/// Fewest usable box sizes required by [`Dfa`].
pub const DFA_MIN_VALID_BOXES: usize = 5;

/// R/S estimator configuration.
///
/// # Examples
///
/// ```rust
/// use sim_paths::estimator::RescaledRange;
///
/// let noise: Vec<f64> = (0..256).map(|i| ((i * 7919) % 101) as f64 - 50.0).collect();
/// let h = RescaledRange::default().estimate(&noise).unwrap();
/// assert!((0.01..=0.99).contains(&h));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescaledRange {
    /// Smallest window size.
    pub min_window: usize,
    /// Largest window size; `None` means half the series length.
    pub max_window: Option<usize>,
    /// Number of log-spaced window sizes before deduplication.
    pub window_count: usize,
}

impl Default for RescaledRange {
    fn default() -> Self {
        Self {
            min_window: 10,
            max_window: None,
            window_count: 20,
        }
    }
}

impl RescaledRange {
    /// Window sizes that will be evaluated for a series of length `len`.
    ///
    /// Log-spaced between `min_window` and the maximum, truncated to
    /// integers, deduplicated, and restricted to `[min_window, len]`.
    pub fn window_sizes(&self, len: usize) -> Vec<usize> {
        let max_window = self.max_window.unwrap_or(len / 2);
        log_spaced_sizes(self.min_window, max_window, self.window_count, len)
    }

    /// Estimates the Hurst exponent of `series`.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::InsufficientData`] if the series has fewer than 20 points
    /// - [`GenerationError::InvalidInput`] if `min_window < 2`, the series is
    ///   not finite, or fewer than 3 window sizes produce a usable R/S value
    pub fn estimate(&self, series: &[f64]) -> Result<f64, GenerationError> {
        if series.len() < MIN_SERIES_LEN {
            return Err(GenerationError::InsufficientData {
                got: series.len(),
                need: MIN_SERIES_LEN,
            });
        }
        if self.min_window < 2 {
            return Err(GenerationError::InvalidInput(
                "R/S minimum window must be at least 2".to_string(),
            ));
        }
        if series.iter().any(|x| !x.is_finite()) {
            return Err(GenerationError::InvalidInput(
                "R/S input contains non-finite values".to_string(),
            ));
        }

        let points: Vec<(f64, f64)> = self
            .window_sizes(series.len())
            .into_par_iter()
            .filter_map(|window| {
                mean_rescaled_range(series, window).map(|rs| ((window as f64).log10(), rs.log10()))
            })
            .collect();

        if points.len() < MIN_VALID_WINDOWS {
            return Err(GenerationError::InvalidInput(format!(
                "insufficient valid windows for R/S analysis: {} of {} required",
                points.len(),
                MIN_VALID_WINDOWS
            )));
        }

        let slope = least_squares_slope(&points);
        Ok(slope.clamp(ESTIMATE_FLOOR, ESTIMATE_CEILING))
    }
}

/// Detrended fluctuation analysis with linear detrending.
///
/// # Examples
///
/// ```rust
/// use sim_paths::estimator::Dfa;
///
/// let noise: Vec<f64> = (0..512).map(|i| ((i * 7919) % 101) as f64 - 50.0).collect();
/// let alpha = Dfa::default().estimate(&noise).unwrap();
/// assert!(alpha.is_finite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dfa {
    /// Smallest box size.
    pub min_box: usize,
    /// Largest box size; `None` means a quarter of the series length.
    pub max_box: Option<usize>,
    /// Number of log-spaced box sizes before deduplication.
    pub box_count: usize,
}

impl Default for Dfa {
    fn default() -> Self {
        Self {
            min_box: 10,
            max_box: None,
            box_count: 25,
        }
    }
}

impl Dfa {
    /// Box sizes that will be evaluated for a series of length `len`.
    pub fn box_sizes(&self, len: usize) -> Vec<usize> {
        let max_box = self.max_box.unwrap_or(len / 4);
        log_spaced_sizes(self.min_box, max_box, self.box_count, len)
    }

    /// Estimates the DFA scaling exponent of `series`.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::InsufficientData`] if the series has fewer than 50 points
    /// - [`GenerationError::InvalidInput`] if `min_box < 3`, the series is
    ///   not finite, or fewer than 5 box sizes have a non-zero fluctuation
    pub fn estimate(&self, series: &[f64]) -> Result<f64, GenerationError> {
        if series.len() < DFA_MIN_SERIES_LEN {
            return Err(GenerationError::InsufficientData {
                got: series.len(),
                need: DFA_MIN_SERIES_LEN,
            });
        }
        if self.min_box < 3 {
            return Err(GenerationError::InvalidInput(
                "DFA minimum box size must be at least 3".to_string(),
            ));
        }
        if series.iter().any(|x| !x.is_finite()) {
            return Err(GenerationError::InvalidInput(
                "DFA input contains non-finite values".to_string(),
            ));
        }

        let mean = series.iter().sum::<f64>() / series.len() as f64;
        let profile: Vec<f64> = series
            .iter()
            .scan(0.0, |acc, &x| {
                *acc += x - mean;
                Some(*acc)
            })
            .collect();

        let points: Vec<(f64, f64)> = self
            .box_sizes(series.len())
            .into_par_iter()
            .filter_map(|size| {
                mean_fluctuation(&profile, size)
                    .filter(|&f| f > 0.0)
                    .map(|f| ((size as f64).log10(), f.log10()))
            })
            .collect();

        if points.len() < DFA_MIN_VALID_BOXES {
            return Err(GenerationError::InvalidInput(format!(
                "insufficient valid box sizes for DFA: {} of {} required",
                points.len(),
                DFA_MIN_VALID_BOXES
            )));
        }

        Ok(least_squares_slope(&points))
    }
}

/// `count` log-spaced integers from `lo` to `hi`, deduplicated and kept
/// within `[lo, len]`.
fn log_spaced_sizes(lo: usize, hi: usize, count: usize, len: usize) -> Vec<usize> {
    if count == 0 || lo == 0 || hi == 0 {
        return Vec::new();
    }

    let log_lo = (lo as f64).log10();
    let log_hi = (hi as f64).log10();
    let steps = count.saturating_sub(1).max(1) as f64;

    let mut sizes: Vec<usize> = (0..count)
        .map(|i| {
            let exponent = if count == 1 {
                log_lo
            } else {
                log_lo + (log_hi - log_lo) * i as f64 / steps
            };
            10f64.powf(exponent) as usize
        })
        .filter(|&size| size >= lo && size <= len)
        .collect();

    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// Mean detrended RMS over the non-overlapping boxes of `size`.
fn mean_fluctuation(profile: &[f64], size: usize) -> Option<f64> {
    let boxes: Vec<f64> = profile.chunks_exact(size).map(box_fluctuation).collect();
    (!boxes.is_empty()).then(|| boxes.iter().sum::<f64>() / boxes.len() as f64)
}

/// RMS of one box after removing its least-squares line.
fn box_fluctuation(segment: &[f64]) -> f64 {
    let n = segment.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = segment.iter().sum::<f64>() / n;

    let (sxy, sxx) = segment
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });
    let slope = sxy / sxx;

    let sum_sq: f64 = segment
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let residual = y - (mean_y + slope * (i as f64 - mean_x));
            residual * residual
        })
        .sum();

    (sum_sq / n).sqrt()
}

/// Mean R/S over all windows of size `window`, or `None` if every window is flat.
fn mean_rescaled_range(series: &[f64], window: usize) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for chunk in series.windows(window) {
        if let Some(rs) = rescaled_range(chunk) {
            sum += rs;
            count += 1;
        }
    }

    (count > 0).then(|| sum / count as f64)
}

/// R/S of one window; `None` when its standard deviation is zero.
fn rescaled_range(chunk: &[f64]) -> Option<f64> {
    let n = chunk.len() as f64;
    let mean = chunk.iter().sum::<f64>() / n;

    let mut cumulative = 0.0;
    let mut max_dev = f64::NEG_INFINITY;
    let mut min_dev = f64::INFINITY;
    let mut sum_sq = 0.0;
    for &x in chunk {
        let centred = x - mean;
        cumulative += centred;
        max_dev = max_dev.max(cumulative);
        min_dev = min_dev.min(cumulative);
        sum_sq += centred * centred;
    }

    let std_dev = (sum_sq / (n - 1.0)).sqrt();
    if std_dev > 0.0 {
        Some((max_dev - min_dev) / std_dev)
    } else {
        None
    }
}

fn least_squares_slope(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (cov, var) = points.iter().fold((0.0, 0.0), |(cov, var), &(x, y)| {
        (cov + (x - mean_x) * (y - mean_y), var + (x - mean_x).powi(2))
    });

    cov / var
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GaussianSource;
    use approx::assert_relative_eq;

    fn white_noise(seed: u64, n: usize) -> Vec<f64> {
        let mut source = GaussianSource::from_seed(seed);
        let mut buffer = vec![0.0; n];
        source.fill(&mut buffer);
        buffer
    }

    #[test]
    fn test_window_sizes() {
        let sizes = RescaledRange::default().window_sizes(512);
        assert_eq!(sizes.first(), Some(&10));
        assert!(*sizes.last().unwrap() <= 256);
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        assert!(sizes.len() >= MIN_VALID_WINDOWS);
    }

    #[test]
    fn test_window_sizes_short_series() {
        // len / 2 is below min_window, so only min_window itself survives
        let sizes = RescaledRange::default().window_sizes(15);
        assert!(sizes.iter().all(|&w| (10..=15).contains(&w)));
    }

    #[test]
    fn test_rescaled_range_flat_window() {
        assert_eq!(rescaled_range(&[1.0; 10]), None);
    }

    #[test]
    fn test_rescaled_range_known_value() {
        // mean 2.5; cumulative deviations -1.5, -2.0, -1.5, 0.0
        let rs = rescaled_range(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let std_dev = (5.0f64 / 3.0).sqrt();
        assert_relative_eq!(rs, 2.0 / std_dev);
    }

    #[test]
    fn test_slope_of_line() {
        let points = [(0.0, 1.0), (1.0, 1.5), (2.0, 2.0)];
        assert_relative_eq!(least_squares_slope(&points), 0.5);
    }

    #[test]
    fn test_too_short_series() {
        let result = RescaledRange::default().estimate(&[0.0; 19]);
        assert_eq!(
            result,
            Err(GenerationError::InsufficientData { got: 19, need: 20 })
        );
    }

    #[test]
    fn test_flat_series_has_no_valid_windows() {
        let result = RescaledRange::default().estimate(&[3.0; 64]);
        assert!(matches!(result, Err(GenerationError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut series = white_noise(1, 64);
        series[10] = f64::NAN;
        assert!(RescaledRange::default().estimate(&series).is_err());
    }

    #[test]
    fn test_white_noise_near_half() {
        let h = RescaledRange::default()
            .estimate(&white_noise(17, 2048))
            .unwrap();
        assert!(h > 0.35 && h < 0.75, "H estimate for white noise = {}", h);
    }

    #[test]
    fn test_random_walk_more_persistent_than_noise() {
        let noise = white_noise(23, 1024);
        let walk = crate::paths::cumulative_path(&noise);

        let estimator = RescaledRange::default();
        let h_noise = estimator.estimate(&noise).unwrap();
        let h_walk = estimator.estimate(&walk).unwrap();

        assert!(h_walk > h_noise, "walk {} <= noise {}", h_walk, h_noise);
        assert!(h_walk <= ESTIMATE_CEILING);
    }

    #[test]
    fn test_box_sizes() {
        let sizes = Dfa::default().box_sizes(1024);
        assert_eq!(sizes.first(), Some(&10));
        assert!(matches!(sizes.last(), Some(&(255..=256))));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        assert!(sizes.len() >= DFA_MIN_VALID_BOXES);
    }

    #[test]
    fn test_box_fluctuation_known_value() {
        // best line through (0,0) (1,1) (2,0) (3,1) is 0.2 + 0.2x
        let f = box_fluctuation(&[0.0, 1.0, 0.0, 1.0]);
        assert_relative_eq!(f, 0.2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_box_fluctuation_of_line_is_zero() {
        let line: Vec<f64> = (0..16).map(|i| 3.0 - 0.5 * i as f64).collect();
        assert!(box_fluctuation(&line) < 1e-12);
    }

    #[test]
    fn test_mean_fluctuation_drops_partial_box() {
        // 25 points with boxes of 10: the trailing 5 are ignored
        let mut profile = vec![0.0; 20];
        profile.extend([100.0, -100.0, 100.0, -100.0, 100.0]);
        assert_eq!(mean_fluctuation(&profile, 10), Some(0.0));
        assert_eq!(mean_fluctuation(&profile[..5], 10), None);
    }

    #[test]
    fn test_dfa_too_short_series() {
        let result = Dfa::default().estimate(&[0.0; 49]);
        assert_eq!(
            result,
            Err(GenerationError::InsufficientData { got: 49, need: 50 })
        );
    }

    #[test]
    fn test_dfa_flat_series_has_no_valid_boxes() {
        let result = Dfa::default().estimate(&[2.0; 256]);
        assert!(matches!(result, Err(GenerationError::InvalidInput(_))));
    }

    #[test]
    fn test_dfa_non_finite_rejected() {
        let mut series = white_noise(2, 256);
        series[100] = f64::INFINITY;
        assert!(Dfa::default().estimate(&series).is_err());
    }

    #[test]
    fn test_dfa_white_noise_near_half() {
        let alpha = Dfa::default().estimate(&white_noise(31, 4096)).unwrap();
        assert!(alpha > 0.35 && alpha < 0.65, "DFA alpha for white noise = {}", alpha);
    }

    #[test]
    fn test_dfa_random_walk_near_three_halves() {
        let walk = crate::paths::cumulative_path(&white_noise(37, 4096));
        let alpha = Dfa::default().estimate(&walk).unwrap();
        assert!(alpha > 1.3 && alpha < 1.7, "DFA alpha for random walk = {}", alpha);
    }
}
