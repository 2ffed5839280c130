//! Matrix types for transformations
//!
//! `Mat34` is the affine workhorse (rotation/scale block plus translation
//! column, no perspective row); `Mat4` is the full homogeneous transform
//! used for projection. Both are column-major and multiply column vectors.

use core::ops::{Mul, MulAssign};

use crate::consts::SQ_EPSILON;
use crate::error::MathError;
use crate::quaternion::Quat;
use crate::vector::{Vec3, Vec4};

/// 3x4 affine transform: three basis columns plus a translation column.
///
/// The 3x3 block is expected to stay orthonormal for pure rotations, but the
/// type does not enforce it; call [`Mat34::orthonormalize`] after chains of
/// incremental rotations to repair drift.
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Mat34 {
    /// Columns: x/y/z basis vectors, then translation.
    pub cols: [Vec3; 4],
}

impl Mat34 {
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z, Vec3::ZERO],
    };

    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3, translation: Vec3) -> Self {
        Self { cols: [c0, c1, c2, translation] }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_cols(Vec3::X, Vec3::Y, Vec3::Z, translation)
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec3::new(scale.x, 0.0, 0.0),
            Vec3::new(0.0, scale.y, 0.0),
            Vec3::new(0.0, 0.0, scale.z),
            Vec3::ZERO,
        )
    }

    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec3::X,
            Vec3::new(0.0, cos, sin),
            Vec3::new(0.0, -sin, cos),
            Vec3::ZERO,
        )
    }

    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec3::new(cos, 0.0, -sin),
            Vec3::Y,
            Vec3::new(sin, 0.0, cos),
            Vec3::ZERO,
        )
    }

    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec3::new(cos, sin, 0.0),
            Vec3::new(-sin, cos, 0.0),
            Vec3::Z,
            Vec3::ZERO,
        )
    }

    /// Rotation about an arbitrary axis (Rodrigues' rotation formula)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let axis = axis.normalize();
        let t = 1.0 - cos;

        let (x, y, z) = (axis.x, axis.y, axis.z);

        Self::from_cols(
            Vec3::new(t * x * x + cos, t * x * y + sin * z, t * x * z - sin * y),
            Vec3::new(t * x * y - sin * z, t * y * y + cos, t * y * z + sin * x),
            Vec3::new(t * x * z + sin * y, t * y * z - sin * x, t * z * z + cos),
            Vec3::ZERO,
        )
    }

    /// Rotation block from a unit quaternion
    pub fn from_quat(q: Quat) -> Self {
        let x2 = q.x + q.x;
        let y2 = q.y + q.y;
        let z2 = q.z + q.z;

        let xx = q.x * x2;
        let xy = q.x * y2;
        let xz = q.x * z2;
        let yy = q.y * y2;
        let yz = q.y * z2;
        let zz = q.z * z2;
        let wx = q.w * x2;
        let wy = q.w * y2;
        let wz = q.w * z2;

        Self::from_cols(
            Vec3::new(1.0 - (yy + zz), xy + wz, xz - wy),
            Vec3::new(xy - wz, 1.0 - (xx + zz), yz + wx),
            Vec3::new(xz + wy, yz - wx, 1.0 - (xx + yy)),
            Vec3::ZERO,
        )
    }

    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        let mut m = Self::from_quat(rotation);
        m.cols[3] = translation;
        m
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3]
    }

    #[inline]
    pub fn set_translation(&mut self, translation: Vec3) {
        self.cols[3] = translation;
    }

    /// Determinant of the 3x3 block
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.cols[0].dot(self.cols[1].cross(self.cols[2]))
    }

    /// Transform a point (rotation/scale plus translation)
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.cols[0] * point.x + self.cols[1] * point.y + self.cols[2] * point.z + self.cols[3]
    }

    /// Transform a direction (rotation/scale only)
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.cols[0] * vector.x + self.cols[1] * vector.y + self.cols[2] * vector.z
    }

    /// Inverse of the full affine transform.
    ///
    /// The 3x3 block is inverted by the closed-form cofactor/adjugate formula
    /// divided by the determinant; the translation of the inverse is then
    /// `t' = -R_inv * t`, exploiting the affine structure instead of a
    /// generic 4x4 solve. A near-singular block debug-asserts and propagates
    /// inf/NaN in release.
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        debug_assert!(det.abs() > SQ_EPSILON, "inverting a singular Mat34");
        self.inverse_with_det(det)
    }

    /// Fallible inverse for callers that must handle singular input.
    pub fn try_inverse(&self) -> Result<Self, MathError> {
        let det = self.determinant();
        if det.abs() <= SQ_EPSILON {
            return Err(MathError::SingularMatrix);
        }
        Ok(self.inverse_with_det(det))
    }

    fn inverse_with_det(&self, det: f32) -> Self {
        let inv_det = 1.0 / det;
        let a = self.cols[0];
        let b = self.cols[1];
        let c = self.cols[2];

        // Rows of R_inv are the cofactor columns scaled by 1/det.
        let r0 = b.cross(c) * inv_det;
        let r1 = c.cross(a) * inv_det;
        let r2 = a.cross(b) * inv_det;

        let inv = Self::from_cols(
            Vec3::new(r0.x, r1.x, r2.x),
            Vec3::new(r0.y, r1.y, r2.y),
            Vec3::new(r0.z, r1.z, r2.z),
            Vec3::ZERO,
        );
        let t = inv.transform_vector(self.cols[3]);
        Self { cols: [inv.cols[0], inv.cols[1], inv.cols[2], -t] }
    }

    /// Gram-Schmidt re-orthonormalization of the 3x3 block.
    ///
    /// Repairs drift accumulated by repeated incremental rotations. The
    /// translation column is untouched.
    pub fn orthonormalize(&mut self) {
        let x = self.cols[0].normalize_checked();
        let y = (self.cols[1] - x * self.cols[1].dot(x)).normalize_checked();
        let z = x.cross(y);
        self.cols[0] = x;
        self.cols[1] = y;
        self.cols[2] = z;
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.cols[0].extend(0.0),
            self.cols[1].extend(0.0),
            self.cols[2].extend(0.0),
            self.cols[3].extend(1.0),
        )
    }
}

impl Default for Mat34 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat34 {
    type Output = Self;

    /// Affine composition: `(self * rhs)` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(
            self.transform_vector(rhs.cols[0]),
            self.transform_vector(rhs.cols[1]),
            self.transform_vector(rhs.cols[2]),
            self.transform_point(rhs.cols[3]),
        )
    }
}

impl MulAssign for Mat34 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// 4x4 homogeneous matrix (column-major) - projection and view transforms
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C, align(16))]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO, Vec4::ZERO, Vec4::ZERO, Vec4::ZERO],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, translation.extend(1.0))
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        Mat34::from_rotation_x(angle).to_mat4()
    }

    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        Mat34::from_rotation_y(angle).to_mat4()
    }

    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        Mat34::from_rotation_z(angle).to_mat4()
    }

    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Mat34::from_axis_angle(axis, angle).to_mat4()
    }

    #[inline]
    pub fn from_quat(q: Quat) -> Self {
        Mat34::from_quat(q).to_mat4()
    }

    #[inline]
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        Mat34::from_rotation_translation(rotation, translation).to_mat4()
    }

    /// Create a look-at view matrix (right-handed, -Z forward)
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);

        Self::from_cols(
            Vec4::new(right.x, up.x, -forward.x, 0.0),
            Vec4::new(right.y, up.y, -forward.y, 0.0),
            Vec4::new(right.z, up.z, -forward.z, 0.0),
            Vec4::new(-right.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
        )
    }

    /// Perspective projection (right-handed, depth [-1, 1])
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = 1.0 / (near - far);

        Self::from_cols(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (far + near) * nf, -1.0),
            Vec4::new(0.0, 0.0, 2.0 * far * near * nf, 0.0),
        )
    }

    /// Orthographic projection (OpenGL style, depth [-1, 1])
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = far - near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / fmn, 0.0),
            Vec4::new(-(right + left) / rml, -(top + bottom) / tmb, -(far + near) / fmn, 1.0),
        )
    }

    /// Orthographic projection for wgpu/Vulkan (depth [0, 1])
    pub fn orthographic_rh_zo(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = far - near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0 / fmn, 0.0),
            Vec4::new(-(right + left) / rml, -(top + bottom) / tmb, -near / fmn, 1.0),
        )
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            Vec4::new(self.cols[0].x, self.cols[1].x, self.cols[2].x, self.cols[3].x),
            Vec4::new(self.cols[0].y, self.cols[1].y, self.cols[2].y, self.cols[3].y),
            Vec4::new(self.cols[0].z, self.cols[1].z, self.cols[2].z, self.cols[3].z),
            Vec4::new(self.cols[0].w, self.cols[1].w, self.cols[2].w, self.cols[3].w),
        )
    }

    /// Get the translation component
    #[inline]
    pub fn get_translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transform a point (w=1), with perspective divide
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let v = *self * point.extend(1.0);
        v.truncate() / v.w
    }

    /// Transform a vector (w=0)
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        (*self * vector.extend(0.0)).truncate()
    }

    pub fn determinant(&self) -> f32 {
        let a = self.cols[0];
        let b = self.cols[1];
        let c = self.cols[2];
        let d = self.cols[3];

        let s0 = a.x * b.y - b.x * a.y;
        let s1 = a.x * b.z - b.x * a.z;
        let s2 = a.x * b.w - b.x * a.w;
        let s3 = a.y * b.z - b.y * a.z;
        let s4 = a.y * b.w - b.y * a.w;
        let s5 = a.z * b.w - b.z * a.w;

        let c5 = c.z * d.w - d.z * c.w;
        let c4 = c.y * d.w - d.y * c.w;
        let c3 = c.y * d.z - d.y * c.z;
        let c2 = c.x * d.w - d.x * c.w;
        let c1 = c.x * d.z - d.x * c.z;
        let c0 = c.x * d.y - d.x * c.y;

        s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Per column the largest-magnitude remaining pivot is selected to bound
    /// numerical error. If a pivot is exactly zero the matrix is singular
    /// and the partially reduced intermediate is returned unchanged - no
    /// panic, no NaN storm; callers that need to detect this case must use
    /// [`Mat4::try_inverse`].
    pub fn inverse(&self) -> Self {
        match self.gauss_jordan() {
            Ok(inv) | Err(inv) => inv,
        }
    }

    /// Fallible inverse; reports a singular matrix instead of returning the
    /// reduction intermediate.
    pub fn try_inverse(&self) -> Result<Self, MathError> {
        self.gauss_jordan().map_err(|_| MathError::SingularMatrix)
    }

    /// Returns Ok(inverse) or Err(partial intermediate) on a zero pivot.
    fn gauss_jordan(&self) -> Result<Self, Self> {
        // Row-major working copies: a is reduced to identity while inv
        // accumulates the same row operations from identity.
        let mut a = self.to_rows_array_2d();
        let mut inv = Self::IDENTITY.to_rows_array_2d();

        for j in 0..4 {
            // Partial pivoting: largest |value| in the remaining column.
            let mut row_max = j;
            for i in (j + 1)..4 {
                if a[i][j].abs() > a[row_max][j].abs() {
                    row_max = i;
                }
            }

            if a[row_max][j] == 0.0 {
                return Err(Self::from_rows_array_2d(&inv));
            }

            a.swap(j, row_max);
            inv.swap(j, row_max);

            let inv_pivot = 1.0 / a[j][j];
            for cc in 0..4 {
                a[j][cc] *= inv_pivot;
                inv[j][cc] *= inv_pivot;
            }

            for i in 0..4 {
                if i != j {
                    let pivot = a[i][j];
                    for cc in 0..4 {
                        a[i][cc] -= a[j][cc] * pivot;
                        inv[i][cc] -= inv[j][cc] * pivot;
                    }
                }
            }
        }

        Ok(Self::from_rows_array_2d(&inv))
    }

    /// Convert to flat array (column-major)
    pub fn to_array(&self) -> [f32; 16] {
        [
            self.cols[0].x, self.cols[0].y, self.cols[0].z, self.cols[0].w,
            self.cols[1].x, self.cols[1].y, self.cols[1].z, self.cols[1].w,
            self.cols[2].x, self.cols[2].y, self.cols[2].z, self.cols[2].w,
            self.cols[3].x, self.cols[3].y, self.cols[3].z, self.cols[3].w,
        ]
    }

    /// Convert to 2D array (column-major) - useful for GPU uniforms
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
            self.cols[3].to_array(),
        ]
    }

    fn to_rows_array_2d(&self) -> [[f32; 4]; 4] {
        [
            [self.cols[0].x, self.cols[1].x, self.cols[2].x, self.cols[3].x],
            [self.cols[0].y, self.cols[1].y, self.cols[2].y, self.cols[3].y],
            [self.cols[0].z, self.cols[1].z, self.cols[2].z, self.cols[3].z],
            [self.cols[0].w, self.cols[1].w, self.cols[2].w, self.cols[3].w],
        ]
    }

    fn from_rows_array_2d(rows: &[[f32; 4]; 4]) -> Self {
        Self::from_cols(
            Vec4::new(rows[0][0], rows[1][0], rows[2][0], rows[3][0]),
            Vec4::new(rows[0][1], rows[1][1], rows[2][1], rows[3][1]),
            Vec4::new(rows[0][2], rows[1][2], rows[2][2], rows[3][2]),
            Vec4::new(rows[0][3], rows[1][3], rows[2][3], rows[3][3]),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        crate::simd::mat4_mul_vec4(&self, rhs)
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<Mat34> for Mat4 {
    fn from(m: Mat34) -> Self {
        m.to_mat4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAC_PI_2;

    fn assert_identity(m: &Mat4, eps: f32) {
        let id = Mat4::IDENTITY.to_array();
        let arr = m.to_array();
        for (a, e) in arr.iter().zip(id.iter()) {
            assert!((a - e).abs() < eps, "{:?} != identity", arr);
        }
    }

    #[test]
    fn test_mat4_identity() {
        let m = Mat4::IDENTITY;
        let v = Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(m * v, v);
    }

    #[test]
    fn test_rotation_z_convention() {
        // Pinned convention: +90 degrees about Z maps (0,1,0) to (-1,0,0).
        let m = Mat4::from_rotation_z(FRAC_PI_2);
        let v = m.transform_vector(Vec3::Y);
        assert!((v - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_mat4_inverse_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_identity(&(m * m.inverse()), 1e-5);
    }

    #[test]
    fn test_mat4_inverse_perspective() {
        let m = Mat4::perspective(1.0, 16.0 / 9.0, 0.1, 100.0);
        assert_identity(&(m * m.inverse()), 1e-4);
    }

    #[test]
    fn test_mat4_inverse_orthographic() {
        let m = Mat4::orthographic(-10.0, 10.0, -5.0, 5.0, 0.1, 50.0);
        assert_identity(&(m * m.inverse()), 1e-4);
    }

    #[test]
    fn test_mat4_inverse_look_at() {
        let m = Mat4::look_at(
            Vec3::new(4.0, 3.0, 7.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        assert_identity(&(m * m.inverse()), 1e-4);
    }

    #[test]
    fn test_mat4_singular() {
        let mut m = Mat4::IDENTITY;
        m.cols[1] = Vec4::ZERO;
        assert_eq!(m.try_inverse(), Err(crate::MathError::SingularMatrix));
        // Non-panicking path returns a finite intermediate.
        let inv = m.inverse();
        assert!(inv.to_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_mat34_transform_point() {
        let m = Mat34::from_rotation_translation(
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let p = m.transform_point(Vec3::Y);
        assert!((p - Vec3::new(9.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_mat34_inverse_roundtrip() {
        let m = Mat34::from_rotation_translation(
            Quat::from_axis_angle(Vec3::new(1.0, 2.0, -1.0), 0.7),
            Vec3::new(3.0, -4.0, 5.0),
        );
        let inv = m.inverse();
        let p = Vec3::new(0.5, -1.5, 2.5);
        let back = inv.transform_point(m.transform_point(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_mat34_inverse_scaled() {
        let m = Mat34::from_scale(Vec3::new(2.0, 4.0, 0.5))
            * Mat34::from_translation(Vec3::new(1.0, 1.0, 1.0));
        let inv = m.inverse();
        let p = Vec3::new(-2.0, 3.0, 7.0);
        let back = inv.transform_point(m.transform_point(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_mat34_singular() {
        let m = Mat34::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(m.try_inverse(), Err(crate::MathError::SingularMatrix));
    }

    #[test]
    fn test_mat34_orthonormalize() {
        let mut m = Mat34::from_rotation_y(0.3);
        // Inject drift.
        m.cols[0] = m.cols[0] * 1.001;
        m.cols[1] = m.cols[1] + Vec3::splat(0.001);
        m.orthonormalize();
        assert!((m.cols[0].length() - 1.0).abs() < 1e-6);
        assert!((m.cols[1].length() - 1.0).abs() < 1e-6);
        assert!(m.cols[0].dot(m.cols[1]).abs() < 1e-6);
        assert!((m.cols[2] - m.cols[0].cross(m.cols[1])).length() < 1e-6);
    }

    #[test]
    fn test_mat34_mat4_agree() {
        let m = Mat34::from_rotation_translation(
            Quat::from_rotation_x(0.4),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let p = Vec3::new(-1.0, 0.5, 2.0);
        let a = m.transform_point(p);
        let b = m.to_mat4().transform_point(p);
        assert!((a - b).length() < 1e-5);
    }
}
