//! 4D vector for homogeneous coordinates.
//!
//! # Conventions
//! - Points carry `w = 1`, directions carry `w = 0`.
//! - Subtraction, addition and cross products produce directions (`w = 0`).
//! - [`Vec4::divide_w`] collapses a post-projection point back to `w = 1`.

use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from x, y, z coordinates.
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Create a direction vector (w=0) from x, y, z coordinates.
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Cross product of the xyz parts. The result is a direction (w=0).
    pub fn cross(self, other: Self) -> Self {
        Self::direction(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Dot product over x, y, z only; w does not participate.
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length of the xyz part.
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale xyz to unit length, leaving w untouched.
    ///
    /// A zero-length input divides by zero and yields non-finite components;
    /// callers guarantee the input is non-degenerate.
    pub fn normalized(self) -> Self {
        let len = self.length();
        Self::new(self.x / len, self.y / len, self.z / len, self.w)
    }

    /// Perspective divide: divide x, y, z by w, then set w to 1.
    ///
    /// No zero check is performed; `w == 0` produces non-finite components.
    /// Callers must guarantee `w != 0`, which holds for any point strictly
    /// in front of the camera after projection.
    pub fn divide_w(self) -> Self {
        Self::new(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
    }
}

/// Points default to the origin (w=1).
impl Default for Vec4 {
    fn default() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }
}

/// Componentwise addition. The result is a direction (w=0).
impl Add<Vec4> for Vec4 {
    type Output = Vec4;

    fn add(self, rhs: Vec4) -> Self::Output {
        Self::direction(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Componentwise subtraction. The result is a direction (w=0):
/// point - point = the direction between them.
impl Sub<Vec4> for Vec4 {
    type Output = Vec4;

    fn sub(self, rhs: Vec4) -> Self::Output {
        Self::direction(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Scalar multiplication of all four components.
impl Mul<f32> for Vec4 {
    type Output = Vec4;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

/// Component access by index: 0=x, 1=y, 2=z, 3=w.
///
/// Panics on any other index; an out-of-range component is a programming
/// error, not recoverable input.
impl Index<usize> for Vec4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("no such vector component: {index}"),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("no such vector component: {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_direction_w() {
        assert_eq!(Vec4::point(1.0, 2.0, 3.0).w, 1.0);
        assert_eq!(Vec4::direction(1.0, 2.0, 3.0).w, 0.0);
        assert_eq!(Vec4::default().w, 1.0);
    }

    #[test]
    fn test_sub_produces_direction() {
        let d = Vec4::point(3.0, 2.0, 1.0) - Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(d, Vec4::direction(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_add_produces_direction() {
        let d = Vec4::point(1.0, 0.0, 0.0) + Vec4::point(0.0, 1.0, 0.0);
        assert_eq!(d.w, 0.0);
    }

    #[test]
    fn test_cross_is_orthogonal_direction() {
        let a = Vec4::direction(1.0, 0.0, 0.0);
        let b = Vec4::direction(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert_eq!(c, Vec4::direction(0.0, 0.0, 1.0));
        assert_eq!(c.dot(a), 0.0);
        assert_eq!(c.dot(b), 0.0);
    }

    #[test]
    fn test_dot_ignores_w() {
        let a = Vec4::new(1.0, 2.0, 3.0, 10.0);
        let b = Vec4::new(4.0, 5.0, 6.0, 20.0);
        assert_relative_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_normalized_unit_length_w_untouched() {
        let v = Vec4::new(3.0, 4.0, 0.0, 7.0).normalized();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_eq!(v.w, 7.0);
    }

    #[test]
    fn test_divide_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0).divide_w();
        assert_eq!(v, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    #[should_panic(expected = "no such vector component")]
    fn test_index_out_of_range_panics() {
        let v = Vec4::default();
        let _ = v[4];
    }
}
