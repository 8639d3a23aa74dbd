//! Geometric price projection of a simulated path.
//!
//! Treats the path as a driving noise and compounds log-returns:
//!
//! ```text
//! price[0] = P0
//! price[i] = price[i-1] · exp((μ - σ²/2)·dt + σ·√dt·(x[i] - x[i-1]))
//! ```
//!
//! With `x` an fBm-like path this gives a geometric fractional price path,
//! trending for `H > 0.5` and mean-reverting for `H < 0.5`.

use sim_core::GenerationError;

/// Trading days used for the default daily time step.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Projection settings.
///
/// # Examples
///
/// ```rust
/// use sim_paths::projection::PriceProjection;
///
/// let projection = PriceProjection::new(100.0);
/// let prices = projection.project(&[0.0, 0.1, -0.05]).unwrap();
///
/// assert_eq!(prices.len(), 3);
/// assert_eq!(prices[0], 100.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceProjection {
    /// Starting price P0.
    pub initial_price: f64,
    /// Annualised drift μ.
    pub drift: f64,
    /// Annualised volatility σ.
    pub volatility: f64,
    /// Time step between path points, in years.
    pub dt: f64,
}

impl PriceProjection {
    /// Creates a projection with default drift (5%), volatility (20%) and a daily step.
    pub fn new(initial_price: f64) -> Self {
        Self {
            initial_price,
            drift: 0.05,
            volatility: 0.2,
            dt: 1.0 / TRADING_DAYS_PER_YEAR,
        }
    }

    /// Projects `path` onto prices.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidInput`] for a non-positive initial
    /// price or time step, a negative or non-finite volatility or drift, and
    /// [`GenerationError::InsufficientData`] for paths shorter than two points.
    pub fn project(&self, path: &[f64]) -> Result<Vec<f64>, GenerationError> {
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(GenerationError::InvalidInput(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(GenerationError::InvalidInput(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.volatility.is_finite() && self.volatility >= 0.0) || !self.drift.is_finite() {
            return Err(GenerationError::InvalidInput(format!(
                "invalid drift/volatility: {} / {}",
                self.drift, self.volatility
            )));
        }
        if path.len() < 2 {
            return Err(GenerationError::InsufficientData {
                got: path.len(),
                need: 2,
            });
        }

        let drift_dt = (self.drift - 0.5 * self.volatility * self.volatility) * self.dt;
        let vol_sqrt_dt = self.volatility * self.dt.sqrt();

        let mut prices = Vec::with_capacity(path.len());
        let mut price = self.initial_price;
        prices.push(price);
        for w in path.windows(2) {
            price *= (drift_dt + vol_sqrt_dt * (w[1] - w[0])).exp();
            prices.push(price);
        }
        Ok(prices)
    }
}

impl Default for PriceProjection {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_path_grows_at_drift() {
        let projection = PriceProjection::new(100.0);
        let prices = projection.project(&[0.0; 253]).unwrap();

        let drift_per_year: f64 = 0.05 - 0.5 * 0.2 * 0.2;
        assert_relative_eq!(
            prices[252],
            100.0 * drift_per_year.exp(),
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_zero_volatility_ignores_path() {
        let projection = PriceProjection {
            volatility: 0.0,
            ..PriceProjection::new(50.0)
        };
        let a = projection.project(&[0.0, 5.0, -3.0]).unwrap();
        let b = projection.project(&[0.0, 0.0, 0.0]).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(x, y);
        }
    }

    #[test]
    fn test_prices_stay_positive() {
        let projection = PriceProjection::new(10.0);
        let path: Vec<f64> = (0..100).map(|i| -(i as f64)).collect();
        let prices = projection.project(&path).unwrap();
        assert!(prices.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(PriceProjection::new(0.0).project(&[0.0, 1.0]).is_err());
        assert!(PriceProjection::new(100.0).project(&[0.0]).is_err());

        let negative_vol = PriceProjection {
            volatility: -0.1,
            ..PriceProjection::default()
        };
        assert!(negative_vol.project(&[0.0, 1.0]).is_err());

        let zero_dt = PriceProjection {
            dt: 0.0,
            ..PriceProjection::default()
        };
        assert!(zero_dt.project(&[0.0, 1.0]).is_err());
    }
}
