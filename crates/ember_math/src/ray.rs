//! 3D Ray for intersection testing
//!
//! Rays are used for raycasting, picking, and collision detection.

use crate::matrix::Mat34;
use crate::vector::Vec3;

/// Ray with a cached reciprocal direction and a parametric reach.
///
/// `inv_direction` is kept in sync with `direction` by the constructors and
/// [`Ray::set_direction`]; mutate `direction` only through those. Axis-parallel
/// rays store infinities in the reciprocal, which the slab AABB test relies
/// on. `t_max` limits intersection queries to the segment `[0, t_max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (should be normalized)
    pub direction: Vec3,
    /// Componentwise reciprocal of `direction`
    pub inv_direction: Vec3,
    /// Parametric reach of the ray
    pub t_max: f32,
}

impl Ray {
    /// Create an unbounded ray with normalized direction
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::bounded(origin, direction, f32::MAX)
    }

    /// Create a ray limited to `[0, t_max]`
    #[inline]
    pub fn bounded(origin: Vec3, direction: Vec3, t_max: f32) -> Self {
        let direction = direction.normalize();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
            t_max,
        }
    }

    /// Create a segment from two points: `t_max` is the distance between them
    #[inline]
    pub fn from_points(start: Vec3, end: Vec3) -> Self {
        Self::bounded(start, end - start, (end - start).length())
    }

    /// Get a point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Replace the direction, renormalizing and refreshing the cached
    /// reciprocal.
    #[inline]
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize();
        self.inv_direction = self.direction.recip();
    }

    /// Sign of each reciprocal component (1 when negative).
    ///
    /// Indexes the min/max corner pair in precomputed-slab AABB tests.
    #[inline]
    pub fn signs(&self) -> [usize; 3] {
        [
            (self.inv_direction.x < 0.0) as usize,
            (self.inv_direction.y < 0.0) as usize,
            (self.inv_direction.z < 0.0) as usize,
        ]
    }

    /// Get the closest point on the ray to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        let t = (point - self.origin).dot(self.direction);
        if t <= 0.0 {
            self.origin
        } else {
            self.at(t.min(self.t_max))
        }
    }

    /// Get the distance from a point to the ray
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let closest = self.closest_point(point);
        (point - closest).length()
    }

    /// Transform the ray by an affine transform
    ///
    /// The origin is transformed as a point, the direction as a vector.
    /// `t_max` is preserved; with a scaling transform the reach in world
    /// units changes accordingly.
    pub fn transform(&self, matrix: &Mat34) -> Self {
        let origin = matrix.transform_point(self.origin);
        let direction = matrix.transform_vector(self.direction);
        Self::bounded(origin, direction, self.t_max)
    }

    /// Check if the ray direction is valid (non-zero length)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.direction.length_squared() > crate::consts::SQ_EPSILON
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
