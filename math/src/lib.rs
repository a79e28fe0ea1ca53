mod angle;
mod intercept;

pub use angle::*;
pub use intercept::*;

/// Smallest distance between two points before being considered equal.
pub const DIST_EPSILON: f64 = 1.0 / 128.0;

/// Length of the vector `(dx, dy)`.
#[inline]
pub fn accurate_distance(dx: f64, dy: f64) -> f64 {
    dx.hypot(dy)
}

/// Clamp a colour or light component to `0.0..=1.0`
#[inline]
pub fn unit_clamp(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
