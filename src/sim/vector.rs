//! Vector helpers on top of `glam::Vec2`
//!
//! glam covers add/sub/scale/dot/distance. What lives here is the
//! screen-space conventions the game uses (degrees, Y pointing down) and
//! the zero-length guards the collision code relies on.

use glam::Vec2;

/// Edges shorter than this produce no usable axis
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Rotate `v` by `-degrees` about the origin.
///
/// The negation matches the screen coordinate system where Y grows
/// downward, so a positive angle appears counter-clockwise on screen.
#[inline]
pub fn rotate_screen(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = (-degrees).to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit normal of an edge (edge rotated by 90°), or `None` for a
/// zero-length edge.
#[inline]
pub fn edge_normal(edge: Vec2) -> Option<Vec2> {
    let normal = edge.perp();
    let len = normal.length();
    if len <= DEGENERATE_EPSILON {
        return None;
    }
    Some(normal / len)
}

/// Rescale `v` to `magnitude`. A zero vector stays zero.
#[inline]
pub fn set_magnitude(v: Vec2, magnitude: f32) -> Vec2 {
    v.normalize_or_zero() * magnitude
}

/// Unit vector of a heading in degrees, as used by missiles
/// (0° points down the screen, 90° points right).
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(sin, cos)
}

/// Angle of `v` in degrees, measured like `atan2(y, x)`
#[inline]
pub fn angle_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

/// Index of the element closest to `point`, first one wins on ties
pub fn closest_index<I>(point: Vec2, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        let distance = point.distance(candidate);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}
