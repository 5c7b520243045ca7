// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bound and precision normalization of raw generator output.

/// Limits `value` to `[lower, upper]`.
///
/// Unlike `f64::clamp` this never panics; callers guarantee `lower <= upper`.
pub fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}

/// Rounds half away from zero to `precision` decimal digits.
///
/// The value is returned unchanged if scaling by `10^precision` would overflow.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let Ok(exponent) = i32::try_from(precision) else {
        return value;
    };
    let factor = 10f64.powi(exponent);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Clamps, rounds, then clamps again, so the result always lies in `[lower, upper]`.
///
/// ```rust
/// use simtel_generator::normalize;
///
/// assert_eq!(normalize(3.14159, 0.0, 10.0, 2), 3.14);
/// assert_eq!(normalize(120.0, 0.0, 100.0, 0), 100.0);
/// // 0.96 rounds up to 1.0, which the final clamp pulls back inside the bound
/// assert_eq!(normalize(0.96, 0.0, 0.96, 1), 0.96);
/// ```
pub fn normalize(raw: f64, lower: f64, upper: f64, precision: u32) -> f64 {
    clamp(round_to(clamp(raw, lower, upper), precision), lower, upper)
}
