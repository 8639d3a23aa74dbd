//! Hurst-scaled increment generation.
//!
//! For horizon `T` and `n` points the generator draws `n` i.i.d. standard
//! normal deviates, scales each by `sqrt(dt)` with `dt = T / n`, and, when
//! the Hurst exponent is outside `0.5 ± 0.01`, multiplies every increment by
//! `dt^H`.
//!
//! The scaling changes the aggregate variance of the path with `H` but the
//! increments stay independent, so there is no long-range dependence. Each
//! sample path needs its own call.

use crate::rng::GaussianSource;
use rand::Rng;
use sim_core::GenerationError;

/// Hurst exponent of ordinary Brownian motion.
pub const NEUTRAL_HURST: f64 = 0.5;

/// Half-width of the band around [`NEUTRAL_HURST`] treated as unscaled.
pub const NEUTRAL_TOLERANCE: f64 = 0.01;

/// Scale factor applied to Brownian increments for Hurst exponent `hurst`.
///
/// # Examples
///
/// ```rust
/// use sim_paths::increments::hurst_scale;
///
/// assert_eq!(hurst_scale(0.505, 0.01), 1.0);
/// assert!((hurst_scale(0.7, 0.01) - 0.01f64.powf(0.7)).abs() < 1e-15);
/// ```
#[inline]
pub fn hurst_scale(hurst: f64, dt: f64) -> f64 {
    if (hurst - NEUTRAL_HURST).abs() > NEUTRAL_TOLERANCE {
        dt.powf(hurst)
    } else {
        1.0
    }
}

/// Generator of scaled increment sequences for fixed `(H, n, T)`.
///
/// # Examples
///
/// ```rust
/// use sim_paths::increments::IncrementGenerator;
/// use sim_paths::rng::GaussianSource;
///
/// let generator = IncrementGenerator::new(0.5, 512, 2.0).unwrap();
/// let mut source = GaussianSource::from_seed(1);
///
/// let increments = generator.generate(&mut source);
/// assert_eq!(increments.len(), 512);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementGenerator {
    hurst: f64,
    num_points: usize,
    dt: f64,
    /// `sqrt(dt) * hurst_scale(H, dt)`, applied to every deviate.
    step_scale: f64,
}

impl IncrementGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidInput`] if `num_points` is zero,
    /// `time_length` is not finite and positive, or `hurst` is not finite.
    pub fn new(hurst: f64, num_points: usize, time_length: f64) -> Result<Self, GenerationError> {
        if num_points == 0 {
            return Err(GenerationError::InvalidInput(
                "number of points must be positive".to_string(),
            ));
        }
        if !(time_length.is_finite() && time_length > 0.0) {
            return Err(GenerationError::InvalidInput(format!(
                "time length must be finite and positive, got {}",
                time_length
            )));
        }
        if !hurst.is_finite() {
            return Err(GenerationError::InvalidInput(format!(
                "Hurst exponent must be finite, got {}",
                hurst
            )));
        }

        let dt = time_length / num_points as f64;
        Ok(Self {
            hurst,
            num_points,
            dt,
            step_scale: dt.sqrt() * hurst_scale(hurst, dt),
        })
    }

    /// Hurst exponent.
    #[inline]
    pub fn hurst(&self) -> f64 {
        self.hurst
    }

    /// Number of increments per sequence.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Time step `T / n`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Standard deviation of each increment.
    #[inline]
    pub fn step_scale(&self) -> f64 {
        self.step_scale
    }

    /// Draws one increment sequence of length `num_points`.
    pub fn generate<R: Rng>(&self, source: &mut GaussianSource<R>) -> Vec<f64> {
        let mut increments = vec![0.0; self.num_points];
        self.fill(source, &mut increments);
        increments
    }

    /// Fills `buffer` with increments; the buffer length is not checked
    /// against `num_points`.
    pub fn fill<R: Rng>(&self, source: &mut GaussianSource<R>, buffer: &mut [f64]) {
        source.fill(buffer);
        for value in buffer.iter_mut() {
            *value *= self.step_scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_variance(values: &[f64]) -> f64 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
    }

    #[test]
    fn test_neutral_band() {
        assert_eq!(hurst_scale(0.5, 0.1), 1.0);
        assert_eq!(hurst_scale(0.505, 0.1), 1.0);
        assert_eq!(hurst_scale(0.495, 0.1), 1.0);
        // 0.51 - 0.5 rounds to just above 0.01, so the band edge is scaled
        assert_relative_eq!(hurst_scale(0.51, 0.1), 0.1f64.powf(0.51));
        assert_relative_eq!(hurst_scale(0.49, 0.1), 0.1f64.powf(0.49));
        assert_relative_eq!(hurst_scale(0.52, 0.1), 0.1f64.powf(0.52));
        assert_relative_eq!(hurst_scale(0.3, 0.1), 0.1f64.powf(0.3));
    }

    #[test]
    fn test_step_scale() {
        let generator = IncrementGenerator::new(0.5, 512, 2.0).unwrap();
        assert_relative_eq!(generator.dt(), 2.0 / 512.0);
        assert_relative_eq!(generator.step_scale(), (2.0f64 / 512.0).sqrt());

        let generator = IncrementGenerator::new(0.7, 512, 2.0).unwrap();
        let dt = 2.0f64 / 512.0;
        assert_relative_eq!(generator.step_scale(), dt.sqrt() * dt.powf(0.7));
    }

    #[test]
    fn test_scaling_matches_unscaled_draws() {
        let neutral = IncrementGenerator::new(0.5, 256, 1.0).unwrap();
        let persistent = IncrementGenerator::new(0.7, 256, 1.0).unwrap();

        let base = neutral.generate(&mut GaussianSource::from_seed(3));
        let scaled = persistent.generate(&mut GaussianSource::from_seed(3));

        let factor = persistent.dt().powf(0.7);
        for (b, s) in base.iter().zip(&scaled) {
            assert_relative_eq!(b * factor, *s, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_brownian_variance_is_dt() {
        let generator = IncrementGenerator::new(0.5, 4096, 4096.0 * 0.01).unwrap();
        let mut source = GaussianSource::from_seed(11);

        let mut all = Vec::with_capacity(4096 * 20);
        for _ in 0..20 {
            all.extend(generator.generate(&mut source));
        }

        let var = sample_variance(&all);
        assert!((var - 0.01).abs() < 0.0005, "variance = {}", var);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            IncrementGenerator::new(0.5, 0, 1.0),
            Err(GenerationError::InvalidInput(_))
        ));
        assert!(IncrementGenerator::new(0.5, 10, 0.0).is_err());
        assert!(IncrementGenerator::new(0.5, 10, f64::INFINITY).is_err());
        assert!(IncrementGenerator::new(f64::NAN, 10, 1.0).is_err());
    }

    #[test]
    fn test_independent_calls_differ() {
        let generator = IncrementGenerator::new(0.3, 128, 1.0).unwrap();
        let mut source = GaussianSource::from_seed(8);
        let first = generator.generate(&mut source);
        let second = generator.generate(&mut source);
        assert_ne!(first, second);
    }
}
