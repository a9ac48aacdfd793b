//! Geometric helpers on global points
//!
//! Detector convention: `z` is the beam axis, `y` points up.

use nalgebra::Point3;

/// Transverse distance from the beam axis
#[inline]
pub fn perp(point: &Point3<f64>) -> f64 {
    point.x.hypot(point.y)
}

/// Midpoint of two points
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    nalgebra::center(a, b)
}

/// True when the midpoint of `a` and `b` lies strictly closer to the beam
/// axis than both endpoints, i.e. the segment passes the axis between them.
pub fn passes_closer_to_axis(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    let middle = perp(&midpoint(a, b));
    middle < perp(a) && middle < perp(b)
}
