//! Shape construction for collision queries
//!
//! Entities never store their polygons. Each tick they are rebuilt from
//! `(center, width, height, rotation)` so there is nothing to keep in sync.

use glam::Vec2;

use super::sat::{overlap_circle_polygon, overlap_polygons};
use super::vector::rotate_screen;

/// World-space vertices of a rotated rectangle.
///
/// Local winding is top-left, top-right, bottom-right, bottom-left; the
/// rotation is by `-rotation_deg` about the center and keeps that order.
pub fn rectangle_vertices(cx: f32, cy: f32, w: f32, h: f32, rotation_deg: f32) -> [Vec2; 4] {
    let hw = w / 2.0;
    let hh = h / 2.0;
    let center = Vec2::new(cx, cy);
    [
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
    .map(|v| rotate_screen(v, rotation_deg) + center)
}

/// World-space vertices of an isosceles triangle with its apex on local +x
pub fn triangle_vertices(cx: f32, cy: f32, w: f32, h: f32, rotation_deg: f32) -> [Vec2; 3] {
    let hw = w / 2.0;
    let hh = h / 2.0;
    let center = Vec2::new(cx, cy);
    [Vec2::new(-hw, -hh), Vec2::new(hw, 0.0), Vec2::new(-hw, hh)]
        .map(|v| rotate_screen(v, rotation_deg) + center)
}

/// A convex collision shape in world space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Vec<Vec2>),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    pub fn rectangle(center: Vec2, size: Vec2, rotation_deg: f32) -> Self {
        Shape::Polygon(rectangle_vertices(center.x, center.y, size.x, size.y, rotation_deg).to_vec())
    }

    pub fn triangle(center: Vec2, size: Vec2, rotation_deg: f32) -> Self {
        Shape::Polygon(triangle_vertices(center.x, center.y, size.x, size.y, rotation_deg).to_vec())
    }

    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle { center, radius }
    }

    /// Minimum translation vector between two shapes, `None` when separated.
    ///
    /// The sign of the result is not meaningful until oriented with
    /// [`super::response::orient_mtv`].
    pub fn overlap(&self, other: &Shape) -> Option<Vec2> {
        match (self, other) {
            (Shape::Polygon(a), Shape::Polygon(b)) => overlap_polygons(a, b),
            (Shape::Circle { center, radius }, Shape::Polygon(vertices))
            | (Shape::Polygon(vertices), Shape::Circle { center, radius }) => {
                overlap_circle_polygon(*center, *radius, vertices)
            }
            (
                Shape::Circle { center: a, radius: ra },
                Shape::Circle { center: b, radius: rb },
            ) => {
                let delta = *b - *a;
                let depth = ra + rb - delta.length();
                if depth < 0.0 {
                    return None;
                }
                Some(delta.normalize_or_zero() * depth)
            }
        }
    }
}

/// Geometry an entity exposes to the collision engine.
///
/// This is the whole contract between entities and the engine: the rest of
/// an entity's state (timers, health, velocity) stays opaque.
pub trait Collider {
    /// Center used to orient the minimum translation vector
    fn position(&self) -> Vec2;
    /// Current world-space shape
    fn shape(&self) -> Shape;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_rectangle_unrotated() {
        let v = rectangle_vertices(10.0, 20.0, 4.0, 2.0, 0.0);
        assert!(approx(v[0], Vec2::new(8.0, 19.0)));
        assert!(approx(v[1], Vec2::new(12.0, 19.0)));
        assert!(approx(v[2], Vec2::new(12.0, 21.0)));
        assert!(approx(v[3], Vec2::new(8.0, 21.0)));
    }

    #[test]
    fn test_rectangle_rotated_quarter_turn() {
        // A 90° wall is the same as a horizontal one with swapped extents
        let v = rectangle_vertices(0.0, 0.0, 100.0, 7.0, 90.0);
        let min = v.iter().fold(Vec2::splat(f32::MAX), |m, p| m.min(*p));
        let max = v.iter().fold(Vec2::splat(f32::MIN), |m, p| m.max(*p));
        assert!(approx(min, Vec2::new(-3.5, -50.0)));
        assert!(approx(max, Vec2::new(3.5, 50.0)));
    }

    #[test]
    fn test_rotation_preserves_winding() {
        let signed_area = |v: &[Vec2]| -> f32 {
            (0..v.len())
                .map(|i| v[i].perp_dot(v[(i + 1) % v.len()]))
                .sum::<f32>()
        };
        let base = rectangle_vertices(0.0, 0.0, 4.0, 2.0, 0.0);
        for angle in [15.0, 90.0, 180.0, 271.0, -45.0] {
            let rotated = rectangle_vertices(0.0, 0.0, 4.0, 2.0, angle);
            assert!((signed_area(&base) - signed_area(&rotated)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_triangle_apex_on_local_x() {
        let v = triangle_vertices(0.0, 0.0, 10.0, 20.0, 0.0);
        assert!(approx(v[1], Vec2::new(5.0, 0.0)));
        // Rotating +90° on screen points the apex up (negative y)
        let v = triangle_vertices(0.0, 0.0, 10.0, 20.0, 90.0);
        assert!(approx(v[1], Vec2::new(0.0, -5.0)));
    }

    #[test]
    fn test_degenerate_rectangle_is_finite() {
        let v = rectangle_vertices(1.0, 1.0, 0.0, 5.0, 33.0);
        assert!(v.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_shape_overlap_is_symmetric_in_magnitude() {
        let circle = Shape::circle(Vec2::new(0.0, 0.0), 5.0);
        let square = Shape::rectangle(Vec2::new(6.0, 0.0), Vec2::splat(4.0), 0.0);
        let a = circle.overlap(&square).unwrap();
        let b = square.overlap(&circle).unwrap();
        assert!((a.length() - b.length()).abs() < 1e-5);
    }

    #[test]
    fn test_circle_circle() {
        let a = Shape::circle(Vec2::ZERO, 2.0);
        assert!(a.overlap(&Shape::circle(Vec2::new(5.0, 0.0), 2.0)).is_none());
        let mtv = a.overlap(&Shape::circle(Vec2::new(3.0, 0.0), 2.0)).unwrap();
        assert!(approx(mtv, Vec2::new(1.0, 0.0)));
    }
}
