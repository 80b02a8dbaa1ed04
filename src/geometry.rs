//! Planar geometry over landmarks.
//!
//! Landmark computations happen either in normalized coordinates or in pixel coordinates (see
//! [`pixel`]), never in a mix of both.

use nalgebra::{Point2, Vector2};

use crate::landmark::Landmark;
use crate::resolution::Resolution;

/// Returns the XY coordinates of `lm`, dropping Z.
#[inline]
pub fn xy(lm: Landmark) -> Point2<f32> {
    Point2::new(lm.x(), lm.y())
}

/// Euclidean distance between two landmarks in the XY plane (Z is ignored).
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    nalgebra::distance(&xy(a), &xy(b))
}

/// Projects a normalized landmark into the pixel grid of a frame of size `res`.
///
/// Coordinates are truncated towards zero. Out-of-range values saturate, and NaN maps to 0.
pub fn pixel(lm: Landmark, res: Resolution) -> Point2<i32> {
    Point2::new(
        (lm.x() * res.width() as f32) as i32,
        (lm.y() * res.height() as f32) as i32,
    )
}

/// Z component of the 2D cross product `(a - origin) x (b - origin)`.
///
/// With Y pointing down, a positive value means that `b` lies clockwise of `a` as seen from
/// `origin`.
pub fn cross_z(origin: Landmark, a: Landmark, b: Landmark) -> f32 {
    let oa: Vector2<f32> = xy(a) - xy(origin);
    let ob: Vector2<f32> = xy(b) - xy(origin);
    oa.perp(&ob)
}
