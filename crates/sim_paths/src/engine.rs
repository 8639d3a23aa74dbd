//! One complete generation step.
//!
//! [`PathEngine::generate`] validates the parameters, draws three
//! independent increment sequences from the shared [`GaussianSource`],
//! accumulates them into paths, projects the rounded series, and reduces
//! each path to statistics. R/S and DFA Hurst estimates of the increments
//! are added unless estimation is switched off with
//! [`PathEngine::with_estimation`].
//!
//! The engine owns the Gaussian source, so the Box-Muller spare carries
//! over from one generation to the next exactly as it would with a single
//! long-lived generator.

use crate::estimator::{Dfa, RescaledRange};
use crate::increments::IncrementGenerator;
use crate::paths::PathBuilder;
use crate::rng::GaussianSource;
use crate::statistics::compute_statistics;
use rand::rngs::StdRng;
use rand::Rng;
use sim_core::validation::first_error;
use sim_core::{GenerationError, GenerationOutput, SimulationParameters, PATH_COUNT};
use tracing::debug;

/// Path generation engine.
#[derive(Debug)]
pub struct PathEngine<R: Rng = StdRng> {
    source: GaussianSource<R>,
    rescaled_range: RescaledRange,
    dfa: Dfa,
    estimate: bool,
    generations: u64,
}

impl PathEngine<StdRng> {
    /// Engine with a seeded source.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(GaussianSource::from_seed(seed))
    }

    /// Engine with an entropy-seeded source.
    pub fn from_entropy() -> Self {
        Self::new(GaussianSource::from_entropy())
    }
}

impl<R: Rng> PathEngine<R> {
    /// Engine around an existing source.
    pub fn new(source: GaussianSource<R>) -> Self {
        Self {
            source,
            rescaled_range: RescaledRange::default(),
            dfa: Dfa::default(),
            estimate: true,
            generations: 0,
        }
    }

    /// Enables or disables the per-path Hurst estimates.
    ///
    /// R/S analysis is quadratic in the number of points, so interactive
    /// sessions that never display the estimates can skip it.
    pub fn with_estimation(mut self, enabled: bool) -> Self {
        self.estimate = enabled;
        self
    }

    /// Whether generations compute Hurst estimates.
    #[inline]
    pub fn estimates(&self) -> bool {
        self.estimate
    }

    /// Shared Gaussian source.
    #[inline]
    pub fn source(&self) -> &GaussianSource<R> {
        &self.source
    }

    /// Drops the source's cached spare.
    pub fn reset_source(&mut self) {
        self.source.reset();
    }

    /// Number of successful generations run by this engine.
    #[inline]
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Runs one generation step.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::InvalidParameters`] with the first validation message
    /// - any error raised while building paths or statistics
    pub fn generate(
        &mut self,
        params: &SimulationParameters,
    ) -> Result<GenerationOutput, GenerationError> {
        if let Some(error) = first_error(params) {
            return Err(GenerationError::InvalidParameters(error.message));
        }

        let increments_gen =
            IncrementGenerator::new(params.hurst, params.num_points, params.time_length)?;
        let builder = PathBuilder::new(params.num_points, params.time_length);

        let source = &mut self.source;
        let increments: [Vec<f64>; PATH_COUNT] =
            std::array::from_fn(|_| increments_gen.generate(&mut *source));

        let (paths, series) = builder.build(&increments)?;

        let statistics = [
            compute_statistics(&paths[0])?,
            compute_statistics(&paths[1])?,
            compute_statistics(&paths[2])?,
        ];

        let (estimated_hurst, dfa_hurst) = if self.estimate {
            let (rescaled_range, dfa) = (self.rescaled_range, self.dfa);
            (
                std::array::from_fn(|k| rescaled_range.estimate(&increments[k]).ok()),
                std::array::from_fn(|k| dfa.estimate(&increments[k]).ok()),
            )
        } else {
            ([None; PATH_COUNT], [None; PATH_COUNT])
        };

        self.generations += 1;
        debug!(
            hurst = params.hurst,
            num_points = params.num_points,
            time_length = params.time_length,
            step_scale = increments_gen.step_scale(),
            generation = self.generations,
            "Generated paths"
        );

        Ok(GenerationOutput {
            series,
            statistics,
            estimated_hurst,
            dfa_hurst,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_shape() {
        let mut engine = PathEngine::from_seed(1);
        let output = engine.generate(&SimulationParameters::default()).unwrap();

        assert_eq!(output.series.len(), 513);
        for k in 0..PATH_COUNT {
            assert_eq!(output.series.path(k)[0], 0.0);
        }
        assert_eq!(output.series.last().unwrap().time, 2.0);
        assert_eq!(engine.generations(), 1);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut engine = PathEngine::from_seed(1);
        let result = engine.generate(&SimulationParameters::default().with_hurst(0.05));
        assert_eq!(
            result,
            Err(GenerationError::InvalidParameters(
                "Hurst exponent must be between 0.1 and 0.9".to_string()
            ))
        );
        assert_eq!(engine.generations(), 0);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let params = SimulationParameters::new(0.3, 256, 1.0);
        let a = PathEngine::from_seed(77).generate(&params).unwrap();
        let b = PathEngine::from_seed(77).generate(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_paths_are_independent() {
        let mut engine = PathEngine::from_seed(5);
        let output = engine.generate(&SimulationParameters::default()).unwrap();
        assert_ne!(output.series.path(0), output.series.path(1));
        assert_ne!(output.series.path(1), output.series.path(2));
    }

    #[test]
    fn test_spare_carries_between_generations() {
        // 3 × 129 deviates is an odd count, which leaves a spare behind.
        let params = SimulationParameters::new(0.5, 129, 1.0);
        let mut engine = PathEngine::from_seed(9);
        engine.generate(&params).unwrap();
        assert!(engine.source().has_spare());

        engine.reset_source();
        assert!(!engine.source().has_spare());
    }

    #[test]
    fn test_estimates_are_reported() {
        let mut engine = PathEngine::from_seed(12);
        let output = engine
            .generate(&SimulationParameters::new(0.5, 1024, 1.0))
            .unwrap();
        for estimate in output.estimated_hurst {
            let h = estimate.unwrap();
            assert!((0.01..=0.99).contains(&h));
        }
        for alpha in output.dfa_hurst {
            assert!(alpha.unwrap().is_finite());
        }
    }

    #[test]
    fn test_estimation_can_be_disabled() {
        let params = SimulationParameters::new(0.5, 1024, 1.0);
        let mut engine = PathEngine::from_seed(12).with_estimation(false);
        assert!(!engine.estimates());

        let output = engine.generate(&params).unwrap();
        assert_eq!(output.estimated_hurst, [None; PATH_COUNT]);
        assert_eq!(output.dfa_hurst, [None; PATH_COUNT]);

        // Estimation does not touch the source, so the paths are unchanged
        let estimated = PathEngine::from_seed(12).generate(&params).unwrap();
        assert_eq!(output.series, estimated.series);
    }
}
