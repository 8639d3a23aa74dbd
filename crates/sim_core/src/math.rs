//! Rounding helpers.
//!
//! Path times and values are rounded to a fixed number of decimals before
//! they are handed to renderers or written to export artifacts, so that the
//! same committed data always prints the same way.

/// Decimal places kept for [`PathPoint::time`](crate::types::PathPoint::time).
pub const TIME_DECIMALS: u32 = 4;

/// Decimal places kept for path values.
pub const VALUE_DECIMALS: u32 = 6;

/// Rounds `value` to `decimals` places, half away from zero.
///
/// Non-finite inputs are returned unchanged.
///
/// # Examples
///
/// ```rust
/// use sim_core::math::round_to;
///
/// assert_eq!(round_to(0.123456789, 4), 0.1235);
/// assert_eq!(round_to(-2.5, 0), -3.0);
/// ```
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid printing "-0" for values that round to zero.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds a time coordinate to [`TIME_DECIMALS`] places.
#[inline]
pub fn round_time(value: f64) -> f64 {
    round_to(value, TIME_DECIMALS)
}

/// Rounds a path value to [`VALUE_DECIMALS`] places.
#[inline]
pub fn round_value(value: f64) -> f64 {
    round_to(value, VALUE_DECIMALS)
}
