//! Vector type alias for planar directions.

use nalgebra::Vector2;

/// 2D vector type for wind directions and neighbour offsets.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`. The first component is
/// the east (x) axis and the second the north (y) axis of the simulation plane.
pub type Vec2 = Vector2<f32>;

/// Unit vector pointing along `angle_degrees`, measured counter-clockwise from east.
#[inline]
#[must_use]
pub fn unit_from_degrees(angle_degrees: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
