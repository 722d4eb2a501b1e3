/// Scalar helpers shared by the vector, matrix and mesh code
use std::f64::consts::PI;

/// Clamp `value` into `[minimum, maximum]`
pub fn clamp(value: f64, minimum: f64, maximum: f64) -> f64 {
    if value < minimum {
        return minimum;
    }
    if value > maximum {
        return maximum;
    }
    value
}

/// Linearly map `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// The input range is not validated; an empty input range divides by zero.
pub fn remap(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> f64 {
    let old_range = old_max - old_min;
    let new_range = new_max - new_min;
    ((value - old_min) * new_range) / old_range + new_min
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}
