//! Separating axis theorem overlap tests
//!
//! Two convex shapes are disjoint iff some axis separates their
//! projections. For polygons the candidate axes are the edge normals of
//! both shapes; a circle adds the axis toward the nearest polygon vertex.
//!
//! Boundary convention: projections that only touch (`max == min`) count as
//! overlapping and yield a zero-length translation vector. The only
//! separation test is `max_a < min_b || max_b < min_a`.

use glam::Vec2;

use super::vector::{DEGENERATE_EPSILON, closest_index, edge_normal};

/// Projection of a shape onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Project a vertex set. An empty set projects to an empty interval
    /// (`min = +inf`, `max = -inf`) which separates from everything.
    pub fn polygon(vertices: &[Vec2], axis: Vec2) -> Self {
        vertices.iter().fold(
            Self {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |p, v| {
                let d = v.dot(axis);
                Self {
                    min: p.min.min(d),
                    max: p.max.max(d),
                }
            },
        )
    }

    /// Project a circle: its center ± radius
    pub fn circle(center: Vec2, radius: f32, axis: Vec2) -> Self {
        let d = center.dot(axis);
        let (min, max) = (d - radius, d + radius);
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Penetration depth along the axis, `None` if the intervals are disjoint
    #[inline]
    pub fn overlap(&self, other: &Projection) -> Option<f32> {
        if self.max < other.min || other.max < self.min {
            return None;
        }
        Some((self.max - other.min).min(other.max - self.min))
    }
}

/// Smallest penetration seen so far, earlier axes win ties
#[derive(Debug, Default)]
struct MinAxis {
    best: Option<(Vec2, f32)>,
}

impl MinAxis {
    fn offer(&mut self, axis: Vec2, overlap: f32) {
        match self.best {
            Some((_, best)) if overlap >= best => {}
            _ => self.best = Some((axis, overlap)),
        }
    }

    fn into_mtv(self) -> Option<Vec2> {
        self.best.map(|(axis, overlap)| axis * overlap)
    }
}

/// Unit edge normals of a closed polygon in vertex order, skipping
/// zero-length edges. Fewer than 2 vertices yield no axes.
fn edge_axes(vertices: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = if vertices.len() < 2 { 0 } else { vertices.len() };
    (0..n).filter_map(move |i| edge_normal(vertices[(i + 1) % n] - vertices[i]))
}

/// Minimum translation vector between two convex polygons.
///
/// Axes are A's edge normals then B's, each in vertex order. Returns `None`
/// on the first separating axis. The result's sign is arbitrary relative to
/// which polygon is `a`.
pub fn overlap_polygons(a: &[Vec2], b: &[Vec2]) -> Option<Vec2> {
    let mut min_axis = MinAxis::default();

    for axis in edge_axes(a).chain(edge_axes(b)) {
        let pa = Projection::polygon(a, axis);
        let pb = Projection::polygon(b, axis);
        let overlap = pa.overlap(&pb)?;
        min_axis.offer(axis, overlap);
    }

    min_axis.into_mtv()
}

/// Minimum translation vector between a circle and a convex polygon.
///
/// Tests the polygon's edge normals, then the axis from the circle center
/// to the nearest polygon vertex. That last axis catches corner hits that
/// edge normals alone report too deep.
pub fn overlap_circle_polygon(center: Vec2, radius: f32, vertices: &[Vec2]) -> Option<Vec2> {
    let mut min_axis = MinAxis::default();

    for axis in edge_axes(vertices) {
        let pp = Projection::polygon(vertices, axis);
        let pc = Projection::circle(center, radius, axis);
        let overlap = pp.overlap(&pc)?;
        min_axis.offer(axis, overlap);
    }

    if let Some(i) = closest_index(center, vertices.iter().copied()) {
        let to_vertex = vertices[i] - center;
        // Center sitting on the vertex gives no direction
        if to_vertex.length() > DEGENERATE_EPSILON {
            let axis = to_vertex.normalize();
            let pp = Projection::polygon(vertices, axis);
            let pc = Projection::circle(center, radius, axis);
            let overlap = pp.overlap(&pc)?;
            min_axis.offer(axis, overlap);
        }
    }

    min_axis.into_mtv()
}
