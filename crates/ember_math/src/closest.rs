//! Closest-point and containment queries
//!
//! Free functions over the primitive types; distance variants return squared
//! distances so callers comparing against thresholds can skip the root.

use crate::bounds::Aabb;
use crate::consts::SQ_EPSILON;
use crate::plane::Plane;
use crate::vector::{Vec2, Vec3};

/// Closest point on the segment `a..b` to `point`, with the clamped
/// parameter `t` in `[0, 1]`.
///
/// A degenerate segment (`a == b`) returns `a` with `t = 0`.
pub fn closest_point_segment(point: Vec3, a: Vec3, b: Vec3) -> (Vec3, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < SQ_EPSILON {
        return (a, 0.0);
    }

    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Closest point on the infinite line through `a` and `b` to `point`
pub fn closest_point_line(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < SQ_EPSILON {
        return a;
    }

    a + ab * ((point - a).dot(ab) / len_sq)
}

/// Squared distance from `point` to the segment `a..b`
pub fn distance_point_segment_sqr(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let (closest, _) = closest_point_segment(point, a, b);
    (point - closest).length_squared()
}

/// Closest point on a plane (orthogonal projection)
#[inline]
pub fn closest_point_plane(point: Vec3, plane: &Plane) -> Vec3 {
    plane.project_point(point)
}

/// Closest point on (or in) an AABB
#[inline]
pub fn closest_point_aabb(point: Vec3, aabb: &Aabb) -> Vec3 {
    aabb.closest_point(point)
}

/// Squared distance from a point to an AABB (zero inside)
#[inline]
pub fn sq_distance_point_aabb(point: Vec3, aabb: &Aabb) -> f32 {
    aabb.distance_squared_to_point(point)
}

/// Barycentric coordinates of `point` with respect to triangle `(a, b, c)`.
///
/// Returns `(u, v, w)` such that `point = a*u + b*v + c*w` when the point
/// lies in the triangle's plane. A degenerate triangle yields all weight on
/// the first vertex.
pub fn barycentric(point: Vec2, a: Vec2, b: Vec2, c: Vec2) -> (f32, f32, f32) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;

    let denom = v0.x * v1.y - v1.x * v0.y;
    if denom.abs() < SQ_EPSILON {
        return (1.0, 0.0, 0.0);
    }

    let inv = 1.0 / denom;
    let v = (v2.x * v1.y - v1.x * v2.y) * inv;
    let w = (v0.x * v2.y - v2.x * v0.y) * inv;
    (1.0 - v - w, v, w)
}

/// Point-in-triangle test via barycentric coordinates (edges inclusive)
pub fn point_in_triangle(point: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let (u, v, w) = barycentric(point, a, b, c);
    u >= 0.0 && v >= 0.0 && w >= 0.0
}

/// Point-in-polygon test for a simple polygon (crossing number).
///
/// An odd number of edge crossings of the rightward horizontal ray from
/// `point` means inside. Works for concave polygons; self-intersecting ones
/// follow the even-odd rule. Fewer than three vertices is never inside.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];

        // Edge straddles the horizontal line through the point, and the
        // crossing lies to the right of it.
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = vi.x + (point.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
