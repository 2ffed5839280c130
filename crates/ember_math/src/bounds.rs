//! Bounding volumes for spatial queries and culling

use crate::consts::{EPSILON, LOW_EPSILON, SQ_EPSILON};
use crate::matrix::Mat4;
use crate::vector::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty (inverted) AABB
    pub const EMPTY: Self = Self {
        min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
        max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create from a set of points
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut aabb = Self::EMPTY;
        for &point in points {
            aabb = aabb.expand_to_include(point);
        }
        aabb
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the volume
    #[inline]
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Get the surface area
    #[inline]
    pub fn surface_area(&self) -> f32 {
        let size = self.size();
        2.0 * (size.x * size.y + size.y * size.z + size.z * size.x)
    }

    /// Check if the AABB is empty (inverted or degenerate)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True when min <= max on every axis and all bounds are finite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.min.is_finite() && self.max.is_finite()
    }

    /// Expand to include a point
    pub fn expand_to_include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Union of two AABBs
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Expand AABB by a uniform amount in all directions
    #[inline]
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if another AABB is fully contained
    #[inline]
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if two AABBs intersect (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Get the closest point on the AABB to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Get the squared distance to a point (zero inside)
    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        let closest = self.closest_point(point);
        (point - closest).length_squared()
    }

    /// Transform the AABB by a matrix (result is still axis-aligned)
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let mut result = Self::EMPTY;
        for corner in &self.corners() {
            let transformed = matrix.transform_point(*corner);
            result = result.expand_to_include(transformed);
        }
        result
    }

    /// Get the 8 corners of the AABB
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounding Sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Create from an AABB (bounding sphere of the AABB)
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let center = aabb.center();
        let radius = aabb.half_extents().length();
        Self { center, radius }
    }

    /// Approximate bounding sphere of a point set (Ritter refinement).
    ///
    /// Cheap and within ~5% of optimal; use [`Sphere::mini_sphere`] when the
    /// minimal radius matters.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::new(Vec3::ZERO, 0.0);
        }

        let aabb = Aabb::from_points(points);
        let mut sphere = Self::from_aabb(&aabb);

        for &point in points {
            let dist = (point - sphere.center).length();
            if dist > sphere.radius {
                let new_radius = (sphere.radius + dist) * 0.5;
                let k = (new_radius - sphere.radius) / dist;
                sphere.center = sphere.center + (point - sphere.center) * k;
                sphere.radius = new_radius;
            }
        }

        sphere
    }

    /// Smallest sphere through two points (diameter endpoints)
    pub fn circumscribed2(p0: Vec3, p1: Vec3) -> Self {
        let center = (p0 + p1) * 0.5;
        Self::new(center, (p0 - center).length())
    }

    /// Sphere through three points (circumcircle of the triangle).
    ///
    /// Falls back to the centroid-centered sphere containing all three points
    /// when they are collinear.
    pub fn circumscribed3(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let d1 = p1 - p0;
        let d2 = p2 - p0;
        let cross = d1.cross(d2);
        let denom = 2.0 * cross.length_squared();

        if denom < SQ_EPSILON {
            return Self::centroid_fallback(&[p0, p1, p2]);
        }

        let offset = (cross.cross(d1) * d2.length_squared()
            + d2.cross(cross) * d1.length_squared())
            / denom;
        Self::new(p0 + offset, offset.length())
    }

    /// Sphere through four points (circumsphere of the tetrahedron).
    ///
    /// The center is the solution of three perpendicular-bisector equations,
    /// solved by Cramer's rule with triple products. Falls back to the
    /// centroid-centered sphere on a degenerate (coplanar) tetrahedron.
    pub fn circumscribed4(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let r1 = p1 - p0;
        let r2 = p2 - p0;
        let r3 = p3 - p0;
        let det = r1.dot(r2.cross(r3));

        if det.abs() < SQ_EPSILON {
            return Self::centroid_fallback(&[p0, p1, p2, p3]);
        }

        let k1 = r1.length_squared() * 0.5;
        let k2 = r2.length_squared() * 0.5;
        let k3 = r3.length_squared() * 0.5;

        let offset =
            (r2.cross(r3) * k1 + r3.cross(r1) * k2 + r1.cross(r2) * k3) / det;
        Self::new(p0 + offset, offset.length())
    }

    fn centroid_fallback(points: &[Vec3]) -> Self {
        let mut center = Vec3::ZERO;
        for &p in points {
            center = center + p;
        }
        center = center / points.len() as f32;

        let mut radius_sq = 0.0f32;
        for &p in points {
            radius_sq = radius_sq.max((p - center).length_squared());
        }
        Self::new(center, radius_sq.sqrt())
    }

    /// Minimal enclosing sphere (Welzl's algorithm).
    ///
    /// Expected linear time for randomly ordered input; the move-to-front
    /// reordering keeps recently discovered support points at the head of
    /// the scratch slice so they are re-checked first.
    pub fn mini_sphere(points: &[Vec3]) -> Self {
        match points.len() {
            0 => Self::new(Vec3::ZERO, 0.0),
            1 => Self::new(points[0], 0.0),
            _ => {
                let mut scratch = points.to_vec();
                let n = scratch.len();
                let mut support = [Vec3::ZERO; 4];
                welzl(&mut scratch, n, &mut support, 0)
            }
        }
    }

    fn from_support(support: &[Vec3]) -> Self {
        match support {
            [] => Self::new(Vec3::ZERO, 0.0),
            [p] => Self::new(*p, 0.0),
            [p0, p1] => Self::circumscribed2(*p0, *p1),
            [p0, p1, p2] => Self::circumscribed3(*p0, *p1, *p2),
            [p0, p1, p2, p3] => Self::circumscribed4(*p0, *p1, *p2, *p3),
            _ => unreachable!("at most 4 support points define a sphere"),
        }
    }

    /// Smallest sphere enclosing both inputs.
    ///
    /// When one sphere already contains the other, that sphere is returned
    /// unchanged instead of being inflated by rounding error.
    pub fn combine(&self, other: &Sphere) -> Self {
        let offset = other.center - self.center;
        let dist = offset.length();

        // Tolerance absorbs the length() rounding so containment-by-rounding
        // does not inflate the result.
        if dist + other.radius <= self.radius + EPSILON {
            return *self;
        }
        if dist + self.radius <= other.radius + EPSILON {
            return *other;
        }

        let radius = (dist + self.radius + other.radius) * 0.5;
        let center = self.center + offset * ((radius - self.radius) / dist);
        Self::new(center, radius)
    }

    /// Check if a point is inside
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    /// Check if another sphere is fully contained
    #[inline]
    pub fn contains_sphere(&self, other: &Sphere) -> bool {
        let dist = (other.center - self.center).length();
        dist + other.radius <= self.radius
    }

    /// Check if two spheres intersect
    #[inline]
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let combined_radius = self.radius + other.radius;
        (other.center - self.center).length_squared() <= combined_radius * combined_radius
    }

    /// Check if intersects AABB
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.distance_squared_to_point(self.center) <= self.radius * self.radius
    }

    /// Squared signed distance from a point to the surface.
    ///
    /// Negative inside, zero on the surface, positive outside. Avoids the
    /// square root of a true signed distance; the sign is what broad-phase
    /// callers sort on.
    #[inline]
    pub fn signed_distance_sqr(&self, point: Vec3) -> f32 {
        (point - self.center).length_squared() - self.radius * self.radius
    }

    /// Get the closest point on the sphere to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let dir = (point - self.center).normalize_checked();
        self.center + dir * self.radius
    }

    /// Get the bounding AABB
    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    /// Transform the sphere by a matrix
    ///
    /// Note: For non-uniform scaling, the result will be conservative (sphere that contains
    /// the true transformed ellipsoid).
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point(self.center);
        let scale_x = matrix.transform_vector(Vec3::X).length();
        let scale_y = matrix.transform_vector(Vec3::Y).length();
        let scale_z = matrix.transform_vector(Vec3::Z).length();
        let max_scale = scale_x.max(scale_y).max(scale_z);

        Self {
            center,
            radius: self.radius * max_scale,
        }
    }

    /// Get the volume
    #[inline]
    pub fn volume(&self) -> f32 {
        (4.0 / 3.0) * crate::consts::PI * self.radius * self.radius * self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0)
    }
}

/// Recursive Welzl step over `points[..n]` with `boundary[..b]` fixed on the
/// sphere surface. `b == 4` fully determines the sphere, so recursion stops.
fn welzl(points: &mut [Vec3], n: usize, boundary: &mut [Vec3; 4], b: usize) -> Sphere {
    if n == 0 || b == 4 {
        return Sphere::from_support(&boundary[..b]);
    }

    let p = points[n - 1];
    let sphere = welzl(points, n - 1, boundary, b);

    // Containment tolerance absorbs the rounding in the circumsphere solves.
    if (p - sphere.center).length_squared() <= sphere.radius * sphere.radius + LOW_EPSILON {
        return sphere;
    }

    boundary[b] = p;
    let sphere = welzl(points, n - 1, boundary, b + 1);

    // Move-to-front: p is on the surface, check it early next time.
    points[..n].rotate_right(1);
    sphere
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
        let c = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        // Shared face counts as intersecting.
        let d = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_aabb_empty_union() {
        let aabb = Aabb::EMPTY.union(&Aabb::new(Vec3::ZERO, Vec3::ONE));
        assert_eq!(aabb, Aabb::new(Vec3::ZERO, Vec3::ONE));
        assert!(Aabb::EMPTY.is_empty());
        assert!(!Aabb::EMPTY.is_valid());
        assert!(aabb.is_valid());
        assert!(!Aabb::new(Vec3::ZERO, Vec3::splat(f32::INFINITY)).is_valid());
    }

    #[test]
    fn test_sphere_contains_point() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(sphere.contains_point(Vec3::new(0.5, 0.0, 0.0)));
        assert!(!sphere.contains_point(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_circumscribed2() {
        let s = Sphere::circumscribed2(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0));
        assert!((s.center - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((s.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_circumscribed3_right_triangle() {
        // Circumcenter of a right triangle is the hypotenuse midpoint.
        let s = Sphere::circumscribed3(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        assert!((s.center - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((s.radius - 2.0f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_circumscribed3_collinear_fallback() {
        let s = Sphere::circumscribed3(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        assert!(s.radius.is_finite());
        assert!(s.contains_point(Vec3::ZERO));
        assert!(s.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_circumscribed4_regular() {
        // Octahedron vertices: four of them circumscribe the unit sphere.
        let s = Sphere::circumscribed4(
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::NEG_X,
        );
        assert!(s.center.length() < 1e-5);
        assert!((s.radius - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mini_sphere_cube_corners() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let s = Sphere::mini_sphere(&aabb.corners());
        assert!(s.center.length() < 1e-4);
        assert!((s.radius - 3.0f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_mini_sphere_contains_all() {
        let points = [
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(-1.0, 0.5, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 0.0, -1.5),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-2.0, -2.0, 0.5),
        ];
        let s = Sphere::mini_sphere(&points);
        for p in &points {
            assert!(
                (*p - s.center).length() <= s.radius + 1e-3,
                "{p:?} outside {s:?}"
            );
        }
        // Should not exceed the Ritter sphere.
        let ritter = Sphere::from_points(&points);
        assert!(s.radius <= ritter.radius + 1e-3);
    }

    #[test]
    fn test_mini_sphere_tiny_inputs() {
        assert_eq!(Sphere::mini_sphere(&[]).radius, 0.0);
        let one = Sphere::mini_sphere(&[Vec3::ONE]);
        assert_eq!(one.center, Vec3::ONE);
        assert_eq!(one.radius, 0.0);
    }

    #[test]
    fn test_combine_containment() {
        let big = Sphere::new(Vec3::ZERO, 10.0);
        let small = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert_eq!(big.combine(&small), big);
        assert_eq!(small.combine(&big), big);

        // Internally tangent with an irrational center distance, so
        // dist + radius can land an ulp above the containing radius.
        let dist = 3.0f32.sqrt();
        let tangent = Sphere::new(Vec3::ONE, 10.0 - dist);
        assert_eq!(big.combine(&tangent), big);
        assert_eq!(tangent.combine(&big), big);
    }

    #[test]
    fn test_combine_disjoint() {
        let a = Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let c = a.combine(&b);
        assert!((c.radius - 3.0).abs() < 1e-5);
        assert!(c.center.length() < 1e-5);
        assert!(c.contains_sphere(&a) && c.contains_sphere(&b));
    }

    #[test]
    fn test_signed_distance_sqr() {
        let s = Sphere::new(Vec3::ZERO, 2.0);
        assert!(s.signed_distance_sqr(Vec3::ZERO) < 0.0);
        assert!(s.signed_distance_sqr(Vec3::new(2.0, 0.0, 0.0)).abs() < 1e-5);
        assert!(s.signed_distance_sqr(Vec3::new(3.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_sphere_aabb_roundtrip() {
        let s = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0);
        let aabb = s.to_aabb();
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 5.0));
        let back = Sphere::from_aabb(&aabb);
        assert!((back.center - s.center).length() < 1e-6);
    }
}
