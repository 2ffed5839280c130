//! Quaternion for 3D rotations

use crate::consts::EPSILON;
use crate::matrix::{Mat34, Mat4};
use crate::vector::{Vec3, Vec4};
use core::ops::{Mul, MulAssign};

/// Quaternion representing a 3D rotation.
///
/// Component order is `(x, y, z, w)` with the scalar part last; the layout
/// is bit-castable to a `[f32; 4]` for GPU upload.
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a new quaternion
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from a Vec4
    #[inline]
    pub const fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Create from axis and angle (radians)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let (sin, cos) = half.sin_cos();
        let axis = axis.normalize();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Create from Euler angles (radians, XYZ order)
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let (sx, cx) = (x * 0.5).sin_cos();
        let (sy, cy) = (y * 0.5).sin_cos();
        let (sz, cz) = (z * 0.5).sin_cos();

        Self::new(
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        )
    }

    /// Create from rotation around X axis
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(half.sin(), 0.0, 0.0, half.cos())
    }

    /// Create from rotation around Y axis
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    /// Create from rotation around Z axis
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, 0.0, half.sin(), half.cos())
    }

    /// Extract the rotation from the 3x3 block of an affine transform.
    ///
    /// The block must be a pure rotation (orthonormal, det +1). The trace is
    /// compared against the dominant diagonal element to pick the numerically
    /// stable branch.
    pub fn from_rotation_matrix(m: &Mat34) -> Self {
        let trace = m.cols[0].x + m.cols[1].y + m.cols[2].z;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (m.cols[1].z - m.cols[2].y) / s,
                (m.cols[2].x - m.cols[0].z) / s,
                (m.cols[0].y - m.cols[1].x) / s,
                0.25 * s,
            )
        } else if m.cols[0].x > m.cols[1].y && m.cols[0].x > m.cols[2].z {
            let s = (1.0 + m.cols[0].x - m.cols[1].y - m.cols[2].z).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (m.cols[0].y + m.cols[1].x) / s,
                (m.cols[2].x + m.cols[0].z) / s,
                (m.cols[1].z - m.cols[2].y) / s,
            )
        } else if m.cols[1].y > m.cols[2].z {
            let s = (1.0 + m.cols[1].y - m.cols[0].x - m.cols[2].z).sqrt() * 2.0;
            Self::new(
                (m.cols[0].y + m.cols[1].x) / s,
                0.25 * s,
                (m.cols[1].z + m.cols[2].y) / s,
                (m.cols[2].x - m.cols[0].z) / s,
            )
        } else {
            let s = (1.0 + m.cols[2].z - m.cols[0].x - m.cols[1].y).sqrt() * 2.0;
            Self::new(
                (m.cols[2].x + m.cols[0].z) / s,
                (m.cols[1].z + m.cols[2].y) / s,
                0.25 * s,
                (m.cols[0].y - m.cols[1].x) / s,
            )
        }
    }

    /// Create quaternion that rotates from one direction to another
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let from = from.normalize();
        let to = to.normalize();

        let dot = from.dot(to);

        if dot > 0.99999 {
            return Self::IDENTITY;
        }

        if dot < -0.99999 {
            // Vectors are opposite, pick arbitrary perpendicular axis
            let axis = Vec3::X.cross(from);
            let axis = if axis.length_squared() < EPSILON {
                Vec3::Y.cross(from)
            } else {
                axis
            };
            return Self::from_axis_angle(axis.normalize(), crate::consts::PI);
        }

        let axis = from.cross(to);
        let s = ((1.0 + dot) * 2.0).sqrt();
        let inv_s = 1.0 / s;

        Self::new(axis.x * inv_s, axis.y * inv_s, axis.z * inv_s, s * 0.5)
    }

    /// Get the length squared
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Get the length
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize the quaternion
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate (inverse for unit quaternions)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Inverse
    #[inline]
    pub fn inverse(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 0.0 {
            let inv = 1.0 / len_sq;
            Self::new(-self.x * inv, -self.y * inv, -self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Spherical linear interpolation along the shortest arc.
    ///
    /// Falls back to normalized lerp when the inputs are closer than
    /// `cos(theta) > 0.99`, where the sin-ratio weights lose precision.
    pub fn slerp(self, other: Self, t: f32) -> Self {
        let mut dot = self.dot(other);
        let mut other = other;

        // Shortest path: flip the target onto this hemisphere. The threshold
        // keeps rounding noise around 180-degree pairs from picking the
        // negative arc.
        if dot < -EPSILON {
            other = -other;
            dot = -dot;
        }

        if dot > 0.99 {
            return self.lerp_hemisphere(other, t);
        }

        self.slerp_unchecked(other, t)
    }

    /// Slerp without the hemisphere flip.
    ///
    /// Assumes the inputs are already on the same hemisphere; used by
    /// [`Quat::squad`], whose keyframes may coincide. Near-parallel operands
    /// (either sign) collapse the sin-ratio weights to 0/0, so those fall
    /// back to normalized lerp.
    pub fn slerp_unchecked(self, other: Self, t: f32) -> Self {
        let dot = self.dot(other).clamp(-1.0, 1.0);
        if dot < -0.99 || dot > 0.99 {
            return self.lerp_hemisphere(other, t);
        }
        let theta = dot.acos();
        let sin_theta = theta.sin();
        let s1 = ((1.0 - t) * theta).sin() / sin_theta;
        let s2 = (t * theta).sin() / sin_theta;

        Self::new(
            self.x * s1 + other.x * s2,
            self.y * s1 + other.y * s2,
            self.z * s1 + other.z * s2,
            self.w * s1 + other.w * s2,
        )
    }

    /// Linear interpolation (faster but less accurate than slerp)
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let other = if self.dot(other) < 0.0 { -other } else { other };
        self.lerp_hemisphere(other, t)
    }

    fn lerp_hemisphere(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
            self.w + (other.w - self.w) * t,
        )
        .normalize()
    }

    /// Spherical cubic interpolation.
    ///
    /// `a` and `b` are the inner control points for the segment from `self`
    /// to `other`; the blend parameter of the outer interpolation is
    /// `2t(1 - t)`, which is zero at both endpoints so the curve passes
    /// through `self` and `other` exactly.
    pub fn squad(self, other: Self, a: Self, b: Self, t: f32) -> Self {
        let outer = self.slerp_unchecked(other, t);
        let inner = a.slerp_unchecked(b, t);
        outer.slerp_unchecked(inner, 2.0 * t * (1.0 - t))
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Convert to axis-angle representation
    pub fn to_axis_angle(self) -> (Vec3, f32) {
        let q = if self.w < 0.0 { -self } else { self };

        let angle = 2.0 * q.w.acos();
        let s = (1.0 - q.w * q.w).sqrt();

        if s < EPSILON {
            (Vec3::Y, angle)
        } else {
            (Vec3::new(q.x / s, q.y / s, q.z / s), angle)
        }
    }

    /// Convert to an affine transform with zero translation
    #[inline]
    pub fn to_mat34(self) -> Mat34 {
        Mat34::from_quat(self)
    }

    /// Convert to 4x4 rotation matrix
    #[inline]
    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_quat(self)
    }

    /// Convert to Vec4
    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Neg for Quat {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl MulAssign for Quat {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate(rhs)
    }
}
