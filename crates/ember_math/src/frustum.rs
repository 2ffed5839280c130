//! Frustum culling types

use crate::bounds::{Aabb, Sphere};
use crate::matrix::Mat4;
use crate::plane::Plane;
use crate::vector::Vec3;

/// Result of frustum containment test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrustumTestResult {
    /// Object is completely inside the frustum
    Inside,
    /// Object is completely outside the frustum
    Outside,
    /// Object intersects the frustum boundary
    Intersecting,
}

impl FrustumTestResult {
    /// Check if the object is at least partially visible
    #[inline]
    pub fn is_visible(&self) -> bool {
        *self != FrustumTestResult::Outside
    }

    /// Check if the object is completely inside
    #[inline]
    pub fn is_inside(&self) -> bool {
        *self == FrustumTestResult::Inside
    }
}

/// View frustum for culling
///
/// The six planes are: left, right, bottom, top, near, far.
/// All planes have normals pointing inward (toward the visible region).
#[derive(Clone, Debug)]
pub struct FrustumPlanes {
    /// Frustum planes (left, right, bottom, top, near, far)
    pub planes: [Plane; 6],
}

impl FrustumPlanes {
    /// Plane indices
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const TOP: usize = 3;
    pub const NEAR: usize = 4;
    pub const FAR: usize = 5;

    /// Extract frustum planes from a view-projection matrix
    ///
    /// Uses the Gribb/Hartmann method: each plane is a sum or difference of
    /// matrix rows, normalized afterwards so the sphere tests are metric.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_array();

        let left = Plane::new(
            Vec3::new(m[3] + m[0], m[7] + m[4], m[11] + m[8]),
            m[15] + m[12],
        );
        let right = Plane::new(
            Vec3::new(m[3] - m[0], m[7] - m[4], m[11] - m[8]),
            m[15] - m[12],
        );
        let bottom = Plane::new(
            Vec3::new(m[3] + m[1], m[7] + m[5], m[11] + m[9]),
            m[15] + m[13],
        );
        let top = Plane::new(
            Vec3::new(m[3] - m[1], m[7] - m[5], m[11] - m[9]),
            m[15] - m[13],
        );
        let near = Plane::new(
            Vec3::new(m[3] + m[2], m[7] + m[6], m[11] + m[10]),
            m[15] + m[14],
        );
        let far = Plane::new(
            Vec3::new(m[3] - m[2], m[7] - m[6], m[11] - m[10]),
            m[15] - m[14],
        );

        Self {
            planes: [left, right, bottom, top, near, far].map(|p| p.normalized()),
        }
    }

    /// Test if an AABB is inside, outside, or intersecting the frustum
    pub fn contains_aabb(&self, aabb: &Aabb) -> FrustumTestResult {
        let mut result = FrustumTestResult::Inside;

        for plane in &self.planes {
            // Corner most aligned with the plane normal (p-vertex).
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            // Corner least aligned with the plane normal (n-vertex).
            let n = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if plane.normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if plane.normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            // p-vertex outside means the whole box is outside.
            if plane.signed_distance(p) < 0.0 {
                return FrustumTestResult::Outside;
            }

            if plane.signed_distance(n) < 0.0 {
                result = FrustumTestResult::Intersecting;
            }
        }

        result
    }

    /// Test if a sphere is inside, outside, or intersecting the frustum
    pub fn contains_sphere(&self, sphere: &Sphere) -> FrustumTestResult {
        let mut result = FrustumTestResult::Inside;

        for plane in &self.planes {
            let dist = plane.signed_distance(sphere.center);

            if dist < -sphere.radius {
                return FrustumTestResult::Outside;
            }

            if dist < sphere.radius {
                result = FrustumTestResult::Intersecting;
            }
        }

        result
    }

    /// Test if a point is inside the frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(point) >= 0.0)
    }

    /// Quick visibility test - returns true if the AABB might be visible
    ///
    /// Faster than `contains_aabb` but does not distinguish inside from
    /// intersecting.
    pub fn is_aabb_visible(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.signed_distance(p) < 0.0 {
                return false;
            }
        }
        true
    }

    /// Quick visibility test - returns true if the sphere might be visible
    pub fn is_sphere_visible(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(sphere.center) >= -sphere.radius)
    }
}

impl Default for FrustumPlanes {
    fn default() -> Self {
        Self {
            planes: [Plane::default(); 6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_frustum() -> FrustumPlanes {
        FrustumPlanes {
            planes: [
                Plane::from_point_normal(Vec3::new(-10.0, 0.0, 0.0), Vec3::X),
                Plane::from_point_normal(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X),
                Plane::from_point_normal(Vec3::new(0.0, -10.0, 0.0), Vec3::Y),
                Plane::from_point_normal(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y),
                Plane::from_point_normal(Vec3::new(0.0, 0.0, 0.1), Vec3::Z),
                Plane::from_point_normal(Vec3::new(0.0, 0.0, 100.0), Vec3::NEG_Z),
            ],
        }
    }

    #[test]
    fn test_frustum_contains_aabb() {
        let frustum = box_frustum();

        let inside = Aabb::new(Vec3::new(-1.0, -1.0, 1.0), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(frustum.contains_aabb(&inside), FrustumTestResult::Inside);

        let outside = Aabb::new(Vec3::new(-1.0, -1.0, -100.0), Vec3::new(1.0, 1.0, -99.0));
        assert_eq!(frustum.contains_aabb(&outside), FrustumTestResult::Outside);

        let straddling = Aabb::new(Vec3::new(8.0, -1.0, 1.0), Vec3::new(12.0, 1.0, 2.0));
        assert_eq!(frustum.contains_aabb(&straddling), FrustumTestResult::Intersecting);
    }

    #[test]
    fn test_frustum_contains_sphere() {
        let frustum = box_frustum();

        let inside = Sphere::new(Vec3::new(0.0, 0.0, 50.0), 1.0);
        assert_eq!(frustum.contains_sphere(&inside), FrustumTestResult::Inside);

        let outside = Sphere::new(Vec3::new(100.0, 0.0, 50.0), 1.0);
        assert_eq!(frustum.contains_sphere(&outside), FrustumTestResult::Outside);

        let straddling = Sphere::new(Vec3::new(10.0, 0.0, 50.0), 1.0);
        assert_eq!(frustum.contains_sphere(&straddling), FrustumTestResult::Intersecting);
    }

    #[test]
    fn test_frustum_from_view_projection() {
        // Orthographic box [-1,1]x[-1,1], depth 0.1..100 looking down -Z.
        let vp = Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0);
        let frustum = FrustumPlanes::from_view_projection(&vp);

        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -50.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 50.0)));
        assert!(!frustum.contains_point(Vec3::new(5.0, 0.0, -50.0)));

        // Planes come back unit length.
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_frustum_test_result() {
        assert!(FrustumTestResult::Inside.is_visible());
        assert!(FrustumTestResult::Intersecting.is_visible());
        assert!(!FrustumTestResult::Outside.is_visible());

        assert!(FrustumTestResult::Inside.is_inside());
        assert!(!FrustumTestResult::Intersecting.is_inside());
    }
}
