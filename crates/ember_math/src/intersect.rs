//! Intersection tests for raycasting and collision detection
//!
//! Ray queries return the parametric distance along the ray, restricted to
//! `[0, ray.t_max]`; `None` means no hit in that range. Overlap tests between
//! volumes return plain booleans, except the plane classification which
//! reports sidedness.

use crate::bounds::{Aabb, Sphere};
use crate::closest::distance_point_segment_sqr;
use crate::consts::EPSILON;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::simd::F32x4;
use crate::vector::Vec3;

/// Which side of the triangle the ray entered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleFace {
    /// Hit the side the normal points away from (counter-clockwise winding)
    Front,
    /// Hit the opposite side
    Back,
}

/// Result of a ray-triangle intersection
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    /// Distance along ray to hit point
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
    /// Side that was hit
    pub face: TriangleFace,
}

/// Which side of a plane a volume lies on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely on the normal side
    Front,
    /// Entirely on the opposite side
    Back,
    /// Straddling the plane
    Intersecting,
}

/// Ray-plane intersection.
///
/// The division is deliberately unguarded: a ray parallel to the plane
/// produces an infinite or NaN `t`, both of which fail the range check, so
/// no epsilon test against the denominator is needed.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<f32> {
    let t = -plane.signed_distance(ray.origin) / plane.normal.dot(ray.direction);

    if t >= 0.0 && t <= ray.t_max {
        Some(t)
    } else {
        None
    }
}

/// Ray-sphere intersection.
///
/// An origin inside (or on) the sphere reports a hit at `t = 0`; picking
/// and collision callers treat "already overlapping" as an immediate hit.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let oc = ray.origin - sphere.center;
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    if c <= 0.0 {
        return Some(0.0);
    }

    let b = oc.dot(ray.direction);
    if b > 0.0 {
        // Outside and pointing away.
        return None;
    }

    let discr = b * b - c;
    if discr < 0.0 {
        return None;
    }

    let t = -b - discr.sqrt();
    if t <= ray.t_max {
        Some(t)
    } else {
        None
    }
}

/// Ray-sphere entry and exit distances, clamped to `[0, t_max]`.
pub fn ray_sphere_minmax(ray: &Ray, sphere: &Sphere) -> Option<(f32, f32)> {
    let oc = ray.origin - sphere.center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discr = b * b - c;
    if discr < 0.0 {
        return None;
    }

    let sqrt_d = discr.sqrt();
    let t0 = -b - sqrt_d;
    let t1 = -b + sqrt_d;

    if t1 < 0.0 || t0 > ray.t_max {
        return None;
    }

    Some((t0.max(0.0), t1.min(ray.t_max)))
}

/// Ray-triangle intersection, front faces only (Moller-Trumbore).
///
/// Vertices wind counter-clockwise when seen from the front.
pub fn ray_triangle_front(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = ray.direction.cross(edge2);
    let discr = edge1.dot(p);

    if discr <= EPSILON {
        return None;
    }

    let s = ray.origin - v0;
    let u = s.dot(p);
    if u < 0.0 || u > discr {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q);
    if v < 0.0 || u + v > discr {
        return None;
    }

    finish_triangle_hit(ray, edge2.dot(q), u, v, discr, TriangleFace::Front)
}

/// Ray-triangle intersection, back faces only.
///
/// Mirror of [`ray_triangle_front`] for interior tests against closed
/// meshes whose triangles face outward.
pub fn ray_triangle_back(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = ray.direction.cross(edge2);
    let discr = edge1.dot(p);

    if discr >= -EPSILON {
        return None;
    }

    let s = ray.origin - v0;
    let u = s.dot(p);
    if u > 0.0 || u < discr {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.direction.dot(q);
    if v > 0.0 || u + v < discr {
        return None;
    }

    finish_triangle_hit(ray, edge2.dot(q), u, v, discr, TriangleFace::Back)
}

/// Ray-triangle intersection against either side.
///
/// A near-parallel ray (`|det| <= epsilon`) misses. The barycentric range
/// checks run before the division, scaled by the determinant, so a single
/// reciprocal is paid only for accepted candidates.
pub fn ray_triangle_both(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let p = ray.direction.cross(edge2);
    let discr = edge1.dot(p);

    let face = if discr > EPSILON {
        TriangleFace::Front
    } else if discr < -EPSILON {
        TriangleFace::Back
    } else {
        return None;
    };

    let s = ray.origin - v0;
    let u = s.dot(p);
    let q = s.cross(edge1);
    let v = ray.direction.dot(q);

    // The scaled barycentrics carry the determinant's sign.
    let in_range = if discr > 0.0 {
        u >= 0.0 && v >= 0.0 && u + v <= discr
    } else {
        u <= 0.0 && v <= 0.0 && u + v >= discr
    };
    if !in_range {
        return None;
    }

    finish_triangle_hit(ray, edge2.dot(q), u, v, discr, face)
}

fn finish_triangle_hit(
    ray: &Ray,
    t_scaled: f32,
    u: f32,
    v: f32,
    discr: f32,
    face: TriangleFace,
) -> Option<TriangleHit> {
    let inv = 1.0 / discr;
    let t = t_scaled * inv;

    if t >= 0.0 && t <= ray.t_max {
        Some(TriangleHit {
            t,
            u: u * inv,
            v: v * inv,
            face,
        })
    } else {
        None
    }
}

/// Ray against four triangles at once (double-sided).
///
/// Vertices are structure-of-arrays: lane `i` tests the triangle
/// `(v0[i], v1[i], v2[i])`. Returns a 4-bit hit mask (bit `i` = lane `i`)
/// and the per-lane hit distances; lanes whose bit is clear hold garbage.
/// Degenerate triangles yield a near-zero determinant whose reciprocal blows
/// the range checks, so they never set their bit.
pub fn ray_triangle4(
    ray: &Ray,
    v0: &[Vec3; 4],
    v1: &[Vec3; 4],
    v2: &[Vec3; 4],
) -> (u8, [f32; 4]) {
    let v0 = Vec3x4::from_points(v0);
    let edge1 = Vec3x4::from_points(v1).sub(&v0);
    let edge2 = Vec3x4::from_points(v2).sub(&v0);

    let dir = Vec3x4::splat(ray.direction);
    let p = dir.cross(&edge2);
    let discr = edge1.dot(&p);

    let s = Vec3x4::splat(ray.origin).sub(&v0);
    let q = s.cross(&edge1);

    let inv = discr.rcp();
    let u = s.dot(&p) * inv;
    let v = dir.dot(&q) * inv;
    let t = edge2.dot(&q) * inv;

    let zero = F32x4::splat(0.0);
    let mask = discr.abs().gt_mask(F32x4::splat(EPSILON))
        & u.ge_mask(zero)
        & v.ge_mask(zero)
        & (u + v).le_mask(F32x4::splat(1.0))
        & t.ge_mask(zero)
        & t.le_mask(F32x4::splat(ray.t_max));

    (mask, t.to_array())
}

/// Four 3D vectors in structure-of-arrays lanes.
struct Vec3x4 {
    x: F32x4,
    y: F32x4,
    z: F32x4,
}

impl Vec3x4 {
    fn from_points(p: &[Vec3; 4]) -> Self {
        Self {
            x: F32x4::new([p[0].x, p[1].x, p[2].x, p[3].x]),
            y: F32x4::new([p[0].y, p[1].y, p[2].y, p[3].y]),
            z: F32x4::new([p[0].z, p[1].z, p[2].z, p[3].z]),
        }
    }

    fn splat(v: Vec3) -> Self {
        Self {
            x: F32x4::splat(v.x),
            y: F32x4::splat(v.y),
            z: F32x4::splat(v.z),
        }
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }

    fn dot(&self, rhs: &Self) -> F32x4 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    fn cross(&self, rhs: &Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }
}

/// Ray-AABB intersection using the slab method.
///
/// Returns the entry distance, or 0 when the origin is inside the box.
/// Near-axis-parallel components fall back to a containment check on that
/// slab instead of dividing.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut tmin: f32 = 0.0;
    let mut tmax: f32 = ray.t_max;

    for axis in 0..3 {
        let origin = ray.origin.get(axis);
        let lo = aabb.min.get(axis);
        let hi = aabb.max.get(axis);

        if ray.direction.get(axis).abs() < EPSILON {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = ray.inv_direction.get(axis);
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            core::mem::swap(&mut t0, &mut t1);
        }

        tmin = tmin.max(t0);
        tmax = tmax.min(t1);
        if tmin > tmax {
            return None;
        }
    }

    Some(tmin)
}

/// Branch-light ray-AABB test built on the cached reciprocal direction.
///
/// Same result contract as [`ray_aabb`]; the direction sign bits select the
/// near/far slab planes up front, which wins when one ray is tested against
/// many boxes. Requires no near-zero direction components whose origin
/// coordinate sits exactly on a slab plane (0 * inf = NaN there).
pub fn ray_aabb_inv(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let bounds = [aabb.min, aabb.max];
    let signs = ray.signs();

    let mut tmin = (bounds[signs[0]].x - ray.origin.x) * ray.inv_direction.x;
    let mut tmax = (bounds[1 - signs[0]].x - ray.origin.x) * ray.inv_direction.x;

    let tymin = (bounds[signs[1]].y - ray.origin.y) * ray.inv_direction.y;
    let tymax = (bounds[1 - signs[1]].y - ray.origin.y) * ray.inv_direction.y;
    if tmin > tymax || tymin > tmax {
        return None;
    }
    tmin = tmin.max(tymin);
    tmax = tmax.min(tymax);

    let tzmin = (bounds[signs[2]].z - ray.origin.z) * ray.inv_direction.z;
    let tzmax = (bounds[1 - signs[2]].z - ray.origin.z) * ray.inv_direction.z;
    if tmin > tzmax || tzmin > tmax {
        return None;
    }
    tmin = tmin.max(tzmin);
    tmax = tmax.min(tzmax);

    if tmax < 0.0 || tmin > ray.t_max {
        return None;
    }
    Some(tmin.max(0.0))
}

/// Ray against a rectangle given by four corners in winding order.
///
/// Split along the `p0-p2` diagonal into two double-sided triangles.
pub fn ray_rectangle(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<f32> {
    if let Some(hit) = ray_triangle_both(ray, p0, p1, p2) {
        return Some(hit.t);
    }
    ray_triangle_both(ray, p0, p2, p3).map(|hit| hit.t)
}

/// Ray-capsule intersection; the capsule is the segment `a..b` swept by
/// `radius`.
pub fn ray_capsule(ray: &Ray, a: Vec3, b: Vec3, radius: f32) -> Option<f32> {
    let ab = b - a;
    let ao = ray.origin - a;

    let ab_dot_d = ab.dot(ray.direction);
    let ab_dot_ao = ab.dot(ao);
    let ab_dot_ab = ab.dot(ab);

    let m = ab_dot_d / ab_dot_ab;
    let n = ab_dot_ao / ab_dot_ab;

    let q = ray.direction - ab * m;
    let r = ao - ab * n;

    let a_coef = q.dot(q);
    let b_coef = 2.0 * q.dot(r);
    let c_coef = r.dot(r) - radius * radius;

    let nearest_cap = || {
        let cap_a = ray_sphere(ray, &Sphere::new(a, radius));
        let cap_b = ray_sphere(ray, &Sphere::new(b, radius));
        match (cap_a, cap_b) {
            (Some(t1), Some(t2)) => Some(t1.min(t2)),
            (Some(t), None) | (None, Some(t)) => Some(t),
            _ => None,
        }
    };

    // A ray parallel to the axis degenerates the quadratic (a == 0); only
    // the end caps can be hit then.
    if a_coef < EPSILON {
        return nearest_cap();
    }

    let discriminant = b_coef * b_coef - 4.0 * a_coef * c_coef;

    if discriminant < 0.0 {
        // No intersection with the infinite cylinder; try the end caps.
        return nearest_cap();
    }

    let t = (-b_coef - discriminant.sqrt()) / (2.0 * a_coef);
    if t < 0.0 || t > ray.t_max {
        return None;
    }

    // Was the cylinder wall hit between the endpoints?
    let hit_param = m * t + n;
    if (0.0..=1.0).contains(&hit_param) {
        return Some(t);
    }

    if hit_param < 0.0 {
        ray_sphere(ray, &Sphere::new(a, radius))
    } else {
        ray_sphere(ray, &Sphere::new(b, radius))
    }
}

/// AABB-AABB overlap (touching counts)
#[inline]
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Sphere-sphere overlap (touching counts)
#[inline]
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    a.intersects_sphere(b)
}

/// Sphere-AABB overlap via the closest point on the box
#[inline]
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    sphere.intersects_aabb(aabb)
}

/// Classify a sphere against a plane (unit normal expected)
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> PlaneSide {
    let dist = plane.signed_distance(sphere.center);
    if dist > sphere.radius {
        PlaneSide::Front
    } else if dist < -sphere.radius {
        PlaneSide::Back
    } else {
        PlaneSide::Intersecting
    }
}

/// Sphere against a capsule (segment `a..b` swept by `radius`)
pub fn sphere_capsule(sphere: &Sphere, a: Vec3, b: Vec3, radius: f32) -> bool {
    let reach = sphere.radius + radius;
    distance_point_segment_sqr(sphere.center, a, b) <= reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);

        let hit = ray_plane(&ray, &plane);
        assert!((hit.unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_ray_plane_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        // Parallel ray: the unguarded division produces a non-finite t
        // that fails the range check.
        assert!(ray_plane(&ray, &plane).is_none());
    }

    #[test]
    fn test_ray_plane_away() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        assert!(ray_plane(&ray, &plane).is_none());
    }

    #[test]
    fn test_ray_plane_reach() {
        let ray = Ray::bounded(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 3.0);
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        assert!(ray_plane(&ray, &plane).is_none());
    }

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);

        let hit = ray_sphere(&ray, &sphere);
        assert!((hit.unwrap() - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let sphere = Sphere::new(Vec3::new(10.0, 0.0, 5.0), 1.0);
        assert!(ray_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_ray_sphere_inside_is_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let sphere = Sphere::new(Vec3::ZERO, 5.0);
        assert_eq!(ray_sphere(&ray, &sphere), Some(0.0));
    }

    #[test]
    fn test_ray_sphere_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(ray_sphere(&ray, &sphere).is_none());
    }

    #[test]
    fn test_ray_sphere_minmax() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);

        let (t0, t1) = ray_sphere_minmax(&ray, &sphere).unwrap();
        assert!((t0 - 4.0).abs() < 0.01);
        assert!((t1 - 6.0).abs() < 0.01);

        // Inside: entry clamps to zero.
        let inside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let (t0, t1) = ray_sphere_minmax(&inside, &sphere).unwrap();
        assert_eq!(t0, 0.0);
        assert!((t1 - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_ray_triangle_front_hit() {
        // CCW seen from -Z, so a +Z ray sees the front face.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(1.0, -1.0, 0.0);

        let hit = ray_triangle_front(&ray, v0, v1, v2).unwrap();
        assert!((hit.t - 1.0).abs() < 0.01);
        assert_eq!(hit.face, TriangleFace::Front);
        // Barycentric weights resolve to a valid interior point.
        let w = 1.0 - hit.u - hit.v;
        assert!(w >= 0.0 && hit.u >= 0.0 && hit.v >= 0.0);
        let p = v0 * w + v1 * hit.u + v2 * hit.v;
        assert!((p - Vec3::ZERO).length() < 0.01);
    }

    #[test]
    fn test_ray_triangle_miss() {
        let ray = Ray::new(Vec3::new(10.0, 0.0, -1.0), Vec3::Z);
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(1.0, -1.0, 0.0);

        assert!(ray_triangle_front(&ray, v0, v1, v2).is_none());
        assert!(ray_triangle_both(&ray, v0, v1, v2).is_none());
    }

    #[test]
    fn test_ray_triangle_backface() {
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(1.0, -1.0, 0.0);

        // Approaching from the other side.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(ray_triangle_front(&ray, v0, v1, v2).is_none());

        let hit = ray_triangle_both(&ray, v0, v1, v2).unwrap();
        assert_eq!(hit.face, TriangleFace::Back);
        assert!((hit.t - 1.0).abs() < 0.01);

        let back = ray_triangle_back(&ray, v0, v1, v2).unwrap();
        assert_eq!(back.face, TriangleFace::Back);
        assert!((back.t - hit.t).abs() < 1e-6);
        assert!((back.u - hit.u).abs() < 1e-6);
        assert!((back.v - hit.v).abs() < 1e-6);

        // The back-only variant refuses front faces.
        let front = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        assert!(ray_triangle_back(&front, v0, v1, v2).is_none());
    }

    #[test]
    fn test_ray_triangle_both_sides_same_t() {
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(1.0, -1.0, 0.0);

        let front = Ray::new(Vec3::new(0.2, 0.0, -1.0), Vec3::Z);
        let back = Ray::new(Vec3::new(0.2, 0.0, 1.0), Vec3::NEG_Z);
        let hf = ray_triangle_both(&front, v0, v1, v2).unwrap();
        let hb = ray_triangle_both(&back, v0, v1, v2).unwrap();
        assert!((hf.t - hb.t).abs() < 1e-5);
        assert!((hf.u - hb.u).abs() < 1e-5);
        assert!((hf.v - hb.v).abs() < 1e-5);
    }

    #[test]
    fn test_ray_triangle_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(1.0, -1.0, 0.0);
        assert!(ray_triangle_both(&ray, v0, v1, v2).is_none());
    }

    #[test]
    fn test_ray_triangle4_matches_scalar() {
        let ray = Ray::new(Vec3::new(0.1, 0.1, -2.0), Vec3::Z);

        let v0 = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(5.0, 5.0, 0.0), // off to the side
            Vec3::new(-1.0, -1.0, 3.0),
        ];
        let v1 = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(6.0, 5.0, 0.0),
            Vec3::new(1.0, -1.0, 3.0),
        ];
        let v2 = [
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(5.0, 6.0, 0.0),
            Vec3::new(0.0, 1.0, 3.0),
        ];

        let (mask, t) = ray_triangle4(&ray, &v0, &v1, &v2);
        for lane in 0..4 {
            let scalar = ray_triangle_both(&ray, v0[lane], v1[lane], v2[lane]);
            assert_eq!(mask & (1 << lane) != 0, scalar.is_some(), "lane {lane}");
            if let Some(hit) = scalar {
                assert!((t[lane] - hit.t).abs() < 1e-3, "lane {lane}");
            }
        }
        assert_eq!(mask, 0b1011);
    }

    #[test]
    fn test_ray_triangle4_degenerate_lane() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let p = Vec3::new(0.3, 0.3, 0.0);
        // Lane 1 is a zero-area triangle.
        let v0 = [Vec3::new(-1.0, -1.0, 0.0), p, Vec3::new(-1.0, -1.0, 0.0), p];
        let v1 = [Vec3::new(1.0, -1.0, 0.0), p, Vec3::new(1.0, -1.0, 0.0), p];
        let v2 = [Vec3::new(0.0, 1.0, 0.0), p, Vec3::new(0.0, 1.0, 0.0), p];

        let (mask, _) = ray_triangle4(&ray, &v0, &v1, &v2);
        assert_eq!(mask & 0b0010, 0);
        assert_eq!(mask & 0b1010, 0);
        assert_ne!(mask & 0b0001, 0);
    }

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));

        let hit = ray_aabb(&ray, &aabb);
        assert!((hit.unwrap() - 5.0).abs() < 0.01);
        let hit = ray_aabb_inv(&ray, &aabb);
        assert!((hit.unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 7.0));

        assert!(ray_aabb(&ray, &aabb).is_none());
        assert!(ray_aabb_inv(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_inside_is_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert_eq!(ray_aabb(&ray, &aabb), Some(0.0));
        assert_eq!(ray_aabb_inv(&ray, &aabb), Some(0.0));
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

        assert!(ray_aabb(&ray, &aabb).is_none());
        assert!(ray_aabb_inv(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_parallel_slab() {
        // Direction has a zero Y component; origin inside the Y slab.
        let ray = Ray::new(Vec3::new(0.0, 0.5, -5.0), Vec3::Z);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let hit = ray_aabb(&ray, &aabb);
        assert!((hit.unwrap() - 5.0).abs() < 0.01);

        // Origin outside the Y slab.
        let ray = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z);
        assert!(ray_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_rectangle() {
        let p0 = Vec3::new(-1.0, -1.0, 0.0);
        let p1 = Vec3::new(1.0, -1.0, 0.0);
        let p2 = Vec3::new(1.0, 1.0, 0.0);
        let p3 = Vec3::new(-1.0, 1.0, 0.0);

        // Hits near the p3 corner (second triangle of the split).
        let ray = Ray::new(Vec3::new(-0.5, 0.5, -2.0), Vec3::Z);
        let hit = ray_rectangle(&ray, p0, p1, p2, p3);
        assert!((hit.unwrap() - 2.0).abs() < 0.01);

        // And near the p1 corner (first triangle).
        let ray = Ray::new(Vec3::new(0.5, -0.5, -2.0), Vec3::Z);
        assert!(ray_rectangle(&ray, p0, p1, p2, p3).is_some());

        let miss = Ray::new(Vec3::new(3.0, 0.0, -2.0), Vec3::Z);
        assert!(ray_rectangle(&miss, p0, p1, p2, p3).is_none());
    }

    #[test]
    fn test_ray_capsule() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X);
        let hit = ray_capsule(&ray, Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 1.0);
        assert!((hit.unwrap() - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_ray_capsule_along_axis() {
        let a = Vec3::new(0.0, -1.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);

        // Straight down the axis: entry is through the near end cap.
        let up = Ray::new(Vec3::new(0.0, -4.0, 0.0), Vec3::Y);
        assert!((ray_capsule(&up, a, b, 1.0).unwrap() - 2.0).abs() < 0.01);

        let down = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y);
        assert!((ray_capsule(&down, a, b, 1.0).unwrap() - 2.0).abs() < 0.01);

        // Parallel but off to the side: clean miss.
        let offside = Ray::new(Vec3::new(3.0, -4.0, 0.0), Vec3::Y);
        assert!(ray_capsule(&offside, a, b, 1.0).is_none());
    }

    #[test]
    fn test_sphere_plane_sides() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        assert_eq!(
            sphere_plane(&Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0), &plane),
            PlaneSide::Front
        );
        assert_eq!(
            sphere_plane(&Sphere::new(Vec3::new(0.0, -5.0, 0.0), 1.0), &plane),
            PlaneSide::Back
        );
        assert_eq!(
            sphere_plane(&Sphere::new(Vec3::new(0.0, 0.5, 0.0), 1.0), &plane),
            PlaneSide::Intersecting
        );
    }

    #[test]
    fn test_sphere_capsule() {
        let a = Vec3::new(0.0, -2.0, 0.0);
        let b = Vec3::new(0.0, 2.0, 0.0);
        assert!(sphere_capsule(&Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0), a, b, 1.0));
        assert!(!sphere_capsule(&Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0), a, b, 1.0));
    }
}
