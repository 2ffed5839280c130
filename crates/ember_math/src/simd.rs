//! Internal four-lane f32 arithmetic.
//!
//! Two build-time backends behind one API: SSE intrinsics when the `simd`
//! feature is enabled on x86_64, and a plain `[f32; 4]` fallback everywhere
//! else. Batched callers (the four-triangle ray test, `Mat4 * Vec4`) are
//! written against this type only, so the backends must stay
//! lane-for-lane equivalent up to the documented `rcp` tolerance.

use crate::matrix::Mat4;
use crate::vector::Vec4;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod backend {
    use core::arch::x86_64::*;
    use core::ops::{Add, Div, Mul, Sub};

    #[derive(Clone, Copy, Debug)]
    pub struct F32x4(__m128);

    impl F32x4 {
        #[inline]
        pub fn new(lanes: [f32; 4]) -> Self {
            // SAFETY: loadu has no alignment requirement.
            Self(unsafe { _mm_loadu_ps(lanes.as_ptr()) })
        }

        #[inline]
        pub fn splat(v: f32) -> Self {
            Self(unsafe { _mm_set1_ps(v) })
        }

        #[inline]
        pub fn to_array(self) -> [f32; 4] {
            let mut out = [0.0f32; 4];
            unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
            out
        }

        #[inline]
        pub fn abs(self) -> Self {
            // Clear the sign bit.
            Self(unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), self.0) })
        }

        /// Approximate reciprocal, refined by one Newton-Raphson step.
        ///
        /// `rcpps` alone is good to ~12 bits; one refinement brings it to
        /// ~23, close enough that hit parameters match the scalar backend
        /// within test tolerances.
        #[inline]
        pub fn rcp(self) -> Self {
            unsafe {
                let approx = _mm_rcp_ps(self.0);
                // x' = x * (2 - d * x)
                let refined = _mm_mul_ps(
                    approx,
                    _mm_sub_ps(_mm_set1_ps(2.0), _mm_mul_ps(self.0, approx)),
                );
                Self(refined)
            }
        }

        /// Bitmask of per-lane `self > rhs` (bit i = lane i).
        #[inline]
        pub fn gt_mask(self, rhs: Self) -> u8 {
            unsafe { _mm_movemask_ps(_mm_cmpgt_ps(self.0, rhs.0)) as u8 }
        }

        /// Bitmask of per-lane `self >= rhs`.
        #[inline]
        pub fn ge_mask(self, rhs: Self) -> u8 {
            unsafe { _mm_movemask_ps(_mm_cmpge_ps(self.0, rhs.0)) as u8 }
        }

        /// Bitmask of per-lane `self <= rhs`.
        #[inline]
        pub fn le_mask(self, rhs: Self) -> u8 {
            unsafe { _mm_movemask_ps(_mm_cmple_ps(self.0, rhs.0)) as u8 }
        }
    }

    impl Add for F32x4 {
        type Output = Self;
        #[inline]
        fn add(self, rhs: Self) -> Self {
            Self(unsafe { _mm_add_ps(self.0, rhs.0) })
        }
    }

    impl Sub for F32x4 {
        type Output = Self;
        #[inline]
        fn sub(self, rhs: Self) -> Self {
            Self(unsafe { _mm_sub_ps(self.0, rhs.0) })
        }
    }

    impl Mul for F32x4 {
        type Output = Self;
        #[inline]
        fn mul(self, rhs: Self) -> Self {
            Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
        }
    }

    impl Div for F32x4 {
        type Output = Self;
        #[inline]
        fn div(self, rhs: Self) -> Self {
            Self(unsafe { _mm_div_ps(self.0, rhs.0) })
        }
    }
}

#[cfg(not(all(feature = "simd", target_arch = "x86_64")))]
mod backend {
    use core::ops::{Add, Div, Mul, Sub};

    #[derive(Clone, Copy, Debug)]
    pub struct F32x4([f32; 4]);

    impl F32x4 {
        #[inline]
        pub fn new(lanes: [f32; 4]) -> Self {
            Self(lanes)
        }

        #[inline]
        pub fn splat(v: f32) -> Self {
            Self([v; 4])
        }

        #[inline]
        pub fn to_array(self) -> [f32; 4] {
            self.0
        }

        #[inline]
        pub fn abs(self) -> Self {
            Self(self.0.map(f32::abs))
        }

        #[inline]
        pub fn rcp(self) -> Self {
            Self(self.0.map(|v| 1.0 / v))
        }

        #[inline]
        pub fn gt_mask(self, rhs: Self) -> u8 {
            self.mask(rhs, |a, b| a > b)
        }

        #[inline]
        pub fn ge_mask(self, rhs: Self) -> u8 {
            self.mask(rhs, |a, b| a >= b)
        }

        #[inline]
        pub fn le_mask(self, rhs: Self) -> u8 {
            self.mask(rhs, |a, b| a <= b)
        }

        fn mask(self, rhs: Self, cmp: impl Fn(f32, f32) -> bool) -> u8 {
            let mut out = 0u8;
            for i in 0..4 {
                if cmp(self.0[i], rhs.0[i]) {
                    out |= 1 << i;
                }
            }
            out
        }

        fn zip(self, rhs: Self, op: impl Fn(f32, f32) -> f32) -> Self {
            let mut out = [0.0f32; 4];
            for i in 0..4 {
                out[i] = op(self.0[i], rhs.0[i]);
            }
            Self(out)
        }
    }

    impl Add for F32x4 {
        type Output = Self;
        #[inline]
        fn add(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a + b)
        }
    }

    impl Sub for F32x4 {
        type Output = Self;
        #[inline]
        fn sub(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a - b)
        }
    }

    impl Mul for F32x4 {
        type Output = Self;
        #[inline]
        fn mul(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a * b)
        }
    }

    impl Div for F32x4 {
        type Output = Self;
        #[inline]
        fn div(self, rhs: Self) -> Self {
            self.zip(rhs, |a, b| a / b)
        }
    }
}

pub(crate) use backend::F32x4;

/// `m * v` as a sum of scaled columns, four lanes at a time.
#[inline]
pub(crate) fn mat4_mul_vec4(m: &Mat4, v: Vec4) -> Vec4 {
    let acc = F32x4::new(m.cols[0].to_array()) * F32x4::splat(v.x)
        + F32x4::new(m.cols[1].to_array()) * F32x4::splat(v.y)
        + F32x4::new(m.cols[2].to_array()) * F32x4::splat(v.z)
        + F32x4::new(m.cols[3].to_array()) * F32x4::splat(v.w);
    let [x, y, z, w] = acc.to_array();
    Vec4::new(x, y, z, w)
}
