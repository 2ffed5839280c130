//! Plane in 3D space (ax + by + cz + d = 0)

use crate::consts::SQ_EPSILON;
use crate::vector::Vec3;

/// Plane described by a normal and a distance term.
///
/// A point `p` is on the plane when `normal.dot(p) + distance == 0`.
/// [`Plane::new`] stores its arguments verbatim so callers can carry
/// unnormalized plane equations (e.g. raw Gribb/Hartmann extraction) without
/// paying for a square root; signed-distance queries are only metric once
/// [`Plane::normalized`] has been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a raw equation. The inputs are stored as-is.
    #[inline]
    pub const fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Create a plane from a point on the plane and its normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Create a plane from three points (counter-clockwise winding)
    pub fn from_points(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let v1 = p1 - p0;
        let v2 = p2 - p0;
        let normal = v1.cross(v2).normalize();
        Self {
            normal,
            distance: -normal.dot(p0),
        }
    }

    /// Scale the equation so the normal has unit length.
    ///
    /// A degenerate (near-zero) normal falls back to the +Y ground plane.
    pub fn normalized(&self) -> Self {
        let len_sq = self.normal.length_squared();
        if len_sq > SQ_EPSILON {
            let inv = 1.0 / len_sq.sqrt();
            Self {
                normal: self.normal * inv,
                distance: self.distance * inv,
            }
        } else {
            Self {
                normal: Vec3::Y,
                distance: 0.0,
            }
        }
    }

    /// Get the signed distance from a point to the plane
    ///
    /// Positive = in front (same side as normal)
    /// Negative = behind (opposite side of normal)
    /// Zero = on the plane
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Check if a point is in front of the plane
    #[inline]
    pub fn is_in_front(&self, point: Vec3) -> bool {
        self.signed_distance(point) > 0.0
    }

    /// Check if a point is behind the plane
    #[inline]
    pub fn is_behind(&self, point: Vec3) -> bool {
        self.signed_distance(point) < 0.0
    }

    /// Project a point onto the plane (requires a unit normal)
    pub fn project_point(&self, point: Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Closest point on the plane to `point` (requires a unit normal)
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        self.project_point(point)
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            distance: 0.0,
        }
    }
}
