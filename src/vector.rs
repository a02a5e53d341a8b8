//! 2D point/vector helpers
//!
//! `glam::DVec2` already carries the arithmetic, dot product, length and
//! distance operations. This module adds the handful of operations the body
//! model needs on top: tolerant equality, scalar cross product, rotation by
//! an angle and an in-place normalize that leaves zero vectors alone.

use glam::DVec2;

/// 2D point or direction in world units (y grows toward the ground)
pub type Vector2D = DVec2;

/// Tolerance used for vector equality
pub const VECTOR_EPSILON: f64 = 1e-6;

pub trait VectorExt {
    /// Component-wise equality within [`VECTOR_EPSILON`]
    fn approx_eq(self, other: Self) -> bool;
    /// Scalar 2D cross product (z of the 3D cross)
    fn cross(self, other: Self) -> f64;
    /// Copy rotated counter-clockwise (in math orientation) by `angle` radians
    fn rotated(self, angle: f64) -> Self;
    /// Angle of the vector measured from the +x axis
    fn heading(self) -> f64;
    /// Unsigned angle between two vectors, 0 if either is zero
    fn unsigned_angle_to(self, other: Self) -> f64;
    /// Normalize in place; zero-length vectors stay zero
    fn normalize_in_place(&mut self);
}

impl VectorExt for DVec2 {
    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < VECTOR_EPSILON && (self.y - other.y).abs() < VECTOR_EPSILON
    }

    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    fn unsigned_angle_to(self, other: Self) -> f64 {
        if self.length_squared() == 0.0 || other.length_squared() == 0.0 {
            return 0.0;
        }
        self.cross(other).atan2(self.dot(other)).abs()
    }

    fn normalize_in_place(&mut self) {
        *self = self.normalize_or_zero();
    }
}
