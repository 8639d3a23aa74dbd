//! Parameter validation.
//!
//! [`validate`] checks a [`SimulationParameters`] value against its bounds
//! and returns every violation in a fixed order: Hurst exponent, number of
//! points, time length. Callers surface only the first entry; generation is
//! never attempted while the list is non-empty.

use crate::types::params::{
    SimulationParameters, HURST_MAX, HURST_MIN, NUM_POINTS_MAX, NUM_POINTS_MIN, TIME_LENGTH_MAX,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter a validation error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterField {
    /// `hurst`
    Hurst,
    /// `numPoints`
    NumPoints,
    /// `timeLength`
    TimeLength,
}

impl ParameterField {
    /// Wire name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hurst => "hurst",
            Self::NumPoints => "numPoints",
            Self::TimeLength => "timeLength",
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One bound violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field.
    pub field: ParameterField,
    /// Human-readable message shown to the user.
    pub message: String,
}

impl ValidationError {
    fn new(field: ParameterField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates parameters, returning violations in check order.
///
/// Non-finite values never satisfy a range check and are reported as
/// out of range.
///
/// # Examples
///
/// ```rust
/// use sim_core::types::SimulationParameters;
/// use sim_core::validation::{validate, ParameterField};
///
/// let params = SimulationParameters::new(0.95, 100, 0.0);
/// let fields: Vec<_> = validate(&params).iter().map(|e| e.field).collect();
/// assert_eq!(
///     fields,
///     vec![ParameterField::Hurst, ParameterField::NumPoints, ParameterField::TimeLength]
/// );
/// ```
pub fn validate(params: &SimulationParameters) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !(HURST_MIN..=HURST_MAX).contains(&params.hurst) {
        errors.push(ValidationError::new(
            ParameterField::Hurst,
            "Hurst exponent must be between 0.1 and 0.9",
        ));
    }

    if !(NUM_POINTS_MIN..=NUM_POINTS_MAX).contains(&params.num_points) {
        errors.push(ValidationError::new(
            ParameterField::NumPoints,
            "Number of points must be between 128 and 4096",
        ));
    }

    if !(params.time_length > 0.0 && params.time_length <= TIME_LENGTH_MAX) {
        errors.push(ValidationError::new(
            ParameterField::TimeLength,
            "Time length must be greater than 0 and at most 20",
        ));
    }

    errors
}

/// Validates parameters and returns only the first violation, if any.
pub fn first_error(params: &SimulationParameters) -> Option<ValidationError> {
    validate(params).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_hurst(h: f64) -> SimulationParameters {
        SimulationParameters::default().with_hurst(h)
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&SimulationParameters::default()).is_empty());
    }

    #[test]
    fn test_hurst_boundaries() {
        assert!(validate(&with_hurst(0.1)).is_empty());
        assert!(validate(&with_hurst(0.9)).is_empty());
        assert_eq!(validate(&with_hurst(0.0999))[0].field, ParameterField::Hurst);
        assert_eq!(validate(&with_hurst(0.9001))[0].field, ParameterField::Hurst);
    }

    #[test]
    fn test_num_points_boundaries() {
        let base = SimulationParameters::default();
        assert!(validate(&base.with_num_points(128)).is_empty());
        assert!(validate(&base.with_num_points(4096)).is_empty());
        assert_eq!(
            validate(&base.with_num_points(127))[0].field,
            ParameterField::NumPoints
        );
        assert_eq!(
            validate(&base.with_num_points(4097))[0].field,
            ParameterField::NumPoints
        );
    }

    #[test]
    fn test_time_length_boundaries() {
        let base = SimulationParameters::default();
        assert!(validate(&base.with_time_length(20.0)).is_empty());
        assert!(validate(&base.with_time_length(1e-9)).is_empty());
        assert!(!validate(&base.with_time_length(0.0)).is_empty());
        assert!(!validate(&base.with_time_length(-1.0)).is_empty());
        assert!(!validate(&base.with_time_length(20.0001)).is_empty());
    }

    #[test]
    fn test_hurst_message() {
        let error = first_error(&with_hurst(0.05)).unwrap();
        assert_eq!(error.field, ParameterField::Hurst);
        assert_eq!(error.message, "Hurst exponent must be between 0.1 and 0.9");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(!validate(&with_hurst(f64::NAN)).is_empty());
        let base = SimulationParameters::default();
        assert!(!validate(&base.with_time_length(f64::NAN)).is_empty());
        assert!(!validate(&base.with_time_length(f64::INFINITY)).is_empty());
    }

    #[test]
    fn test_first_error_follows_check_order() {
        let params = SimulationParameters::new(0.05, 64, 30.0);
        assert_eq!(validate(&params).len(), 3);
        assert_eq!(first_error(&params).unwrap().field, ParameterField::Hurst);

        let params = SimulationParameters::new(0.5, 64, 30.0);
        assert_eq!(first_error(&params).unwrap().field, ParameterField::NumPoints);
    }

    #[test]
    fn test_display() {
        let error = first_error(&with_hurst(1.5)).unwrap();
        assert_eq!(
            error.to_string(),
            "hurst: Hurst exponent must be between 0.1 and 0.9"
        );
    }

    proptest! {
        #[test]
        fn test_in_range_parameters_are_valid(
            hurst in 0.1f64..=0.9,
            num_points in 128usize..=4096,
            time_length in 1e-6f64..=20.0,
        ) {
            let params = SimulationParameters::new(hurst, num_points, time_length);
            prop_assert!(validate(&params).is_empty());
        }

        #[test]
        fn test_out_of_range_hurst_is_first_error(
            hurst in prop_oneof![0.0f64..0.0999, 0.9001f64..2.0],
        ) {
            let error = first_error(&with_hurst(hurst));
            prop_assert_eq!(error.map(|e| e.field), Some(ParameterField::Hurst));
        }
    }
}
