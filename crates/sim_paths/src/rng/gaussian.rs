//! Box-Muller Gaussian source with an explicit spare.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Open01};
use std::f64::consts::PI;

/// Standard-normal deviate source.
///
/// Generic over the uniform generator so tests can observe draws; the
/// default is [`StdRng`].
///
/// # Examples
///
/// ```rust
/// use sim_paths::rng::GaussianSource;
///
/// let mut a = GaussianSource::from_seed(42);
/// let mut b = GaussianSource::from_seed(42);
/// assert_eq!(a.next_gaussian(), b.next_gaussian());
/// assert_eq!(a.seed(), Some(42));
/// ```
#[derive(Clone, Debug)]
pub struct GaussianSource<R: Rng = StdRng> {
    /// Uniform generator.
    inner: R,
    /// Cosine branch of the last transform, returned by the next call.
    spare: Option<f64>,
    /// Seed used for initialisation, if any.
    seed: Option<u64>,
}

impl GaussianSource<StdRng> {
    /// Creates a source seeded for reproducible sequences.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            spare: None,
            seed: Some(seed),
        }
    }

    /// Creates a source seeded from operating-system entropy.
    #[inline]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            spare: None,
            seed: None,
        }
    }
}

impl<R: Rng> GaussianSource<R> {
    /// Wraps an existing uniform generator.
    #[inline]
    pub fn with_rng(inner: R) -> Self {
        Self {
            inner,
            spare: None,
            seed: None,
        }
    }

    /// Seed used for initialisation, `None` for entropy or caller-supplied generators.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns `true` if the next call will return the cached spare.
    #[inline]
    pub fn has_spare(&self) -> bool {
        self.spare.is_some()
    }

    /// Drops the cached spare so the next call starts a fresh transform.
    #[inline]
    pub fn reset(&mut self) {
        self.spare = None;
    }

    /// Returns one standard-normal deviate.
    ///
    /// Consumes two uniform draws `u ∈ (0, 1)` and `v ∈ [0, 1)` when no spare
    /// is cached; with `mag = sqrt(-2 ln u)` it returns `mag · sin(2πv)` and
    /// caches `mag · cos(2πv)`.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }

        // Open interval keeps ln(u) finite.
        let u: f64 = Open01.sample(&mut self.inner);
        let v: f64 = self.inner.gen();

        let mag = (-2.0 * u.ln()).sqrt();
        let angle = 2.0 * PI * v;

        self.spare = Some(mag * angle.cos());
        mag * angle.sin()
    }

    /// Fills `buffer` with standard-normal deviates.
    #[inline]
    pub fn fill(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_gaussian();
        }
    }
}
