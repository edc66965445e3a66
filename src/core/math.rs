//! Scalar helpers shared by the simulation systems.

/// Clamp a value into `[min, max]`.
///
/// NaN collapses to `min` so a corrupted input can never leak into state.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Clamp into the unit interval.
#[inline]
pub fn clamp01(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move `value` toward `target` by at most `step`.
#[inline]
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}
