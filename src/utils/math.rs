use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

#[inline]
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}

/// Project each component onto its `[lower, upper]` box.
pub fn project_onto_bounds(values: &mut [f64], lower: &[f64], upper: &[f64]) {
    for ((value, lo), hi) in values.iter_mut().zip(lower).zip(upper) {
        *value = value.max(*lo).min(*hi);
    }
}
