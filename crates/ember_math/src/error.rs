//! Error type for the checked kernel entry points
//!
//! The kernel's default model is debug-assert plus IEEE-754 propagation in
//! release builds. The `try_*` variants surface the same preconditions as
//! values instead, for callers that can recover.

use thiserror::Error;

/// Errors reported by the `try_*` variants of kernel operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// Normalization of a (near) zero-length vector or quaternion
    #[error("cannot normalize a zero-length value")]
    ZeroLength,
    /// Inversion of a singular matrix
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}
