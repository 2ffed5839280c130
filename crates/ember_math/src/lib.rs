//! # ember_math - SIMD-Optimized Math Kernel
//!
//! Vector/matrix/quaternion algebra, geometric primitives and intersection
//! tests for 3D graphics and physics.
//!
//! Conventions used throughout the crate:
//! - Column-major matrices, matrix * column-vector multiplication.
//! - Right-handed coordinate system, counter-clockwise positive rotation
//!   (rotating (0,1,0) by +90 degrees about Z yields (-1,0,0)).
//! - Quaternions store (x, y, z, w) with w last; `q1 * q2` applies `q2`
//!   first, then `q1`.
//!
//! With the `simd` feature on x86_64, hot paths run on packed 4-lane float
//! instructions; the portable scalar fallback produces the same results
//! within a small relative epsilon (the vectorized reciprocal uses a
//! Newton-Raphson refinement that rounds differently).

pub mod error;
pub mod vector;
pub mod dvec;
pub mod matrix;
pub mod quaternion;
pub mod plane;
pub mod bounds;
pub mod frustum;
pub mod ray;
pub mod intersect;
pub mod closest;

pub(crate) mod simd;

pub use error::MathError;
pub use vector::*;
pub use dvec::*;
pub use matrix::*;
pub use quaternion::*;
pub use plane::*;
pub use bounds::*;
pub use frustum::*;
pub use ray::*;
pub use intersect::*;
pub use closest::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const FRAC_PI_4: f32 = PI / 4.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Geometric degeneracy epsilon (parallel rays, zero-length edges).
    pub const EPSILON: f32 = 1e-6;
    /// Looser epsilon for application-level checks.
    pub const LOW_EPSILON: f32 = 1e-5;
    /// Guard for squared-length comparisons.
    pub const SQ_EPSILON: f32 = 1e-10;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

/// Smooth step interpolation
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub mod prelude {
    pub use crate::vector::{Vec2, Vec3, Vec4};
    pub use crate::dvec::DVec3;
    pub use crate::matrix::{Mat34, Mat4};
    pub use crate::quaternion::Quat;
    pub use crate::plane::Plane;
    pub use crate::bounds::{Aabb, Sphere};
    pub use crate::frustum::{FrustumPlanes, FrustumTestResult};
    pub use crate::ray::Ray;
    pub use crate::intersect::{
        ray_plane, ray_sphere, ray_sphere_minmax, ray_aabb, ray_aabb_inv,
        ray_triangle_front, ray_triangle_back, ray_triangle_both, ray_triangle4,
        ray_rectangle,
        TriangleHit, TriangleFace,
    };
    pub use crate::error::MathError;
    pub use crate::{radians, degrees, lerp, clamp, smoothstep};
}
