//! 4x4 transformation matrix.
//!
//! # Convention
//! - Storage is a flat, row-major `[f32; 16]` behind explicit `(row, col)`
//!   accessors; element `(r, c)` lives at index `r * 4 + c`.
//! - Vectors are **column vectors** on the right: `Mat4 * Vec4`
//! - Transforms chain **right-to-left**: `projection * camera * world * v`
//!   applies the world transform first and the projection last.
//!
//! Both products are the naive row-by-column reference implementation; any
//! future vectorized variant must reproduce these results.

use std::ops::Mul;

use super::vec4::Vec4;

/// Smallest uniform scale factor; anything below this would produce a
/// near-singular transform.
const MIN_SCALE: f32 = 0.01;

/// 4x4 matrix stored as a flat row-major array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    a: [f32; 16],
}

impl Mat4 {
    /// All-zero matrix, the starting point for the projection factory.
    fn zero() -> Self {
        Self { a: [0.0; 16] }
    }

    pub fn identity() -> Self {
        let mut m = Self::zero();
        m.a[0] = 1.0;
        m.a[5] = 1.0;
        m.a[10] = 1.0;
        m.a[15] = 1.0;
        m
    }

    /// Creates a symmetric-frustum perspective projection.
    ///
    /// `fov` is the vertical field of view in radians, `aspect` is
    /// width/height. After multiplication, the w component equals the negated
    /// view-space z; a subsequent [`Vec4::divide_w`] maps the far plane
    /// center to depth +1 and the near plane center to depth 0.
    ///
    /// Callers must ensure `far > near` and `aspect > 0`; the division by
    /// `far - near` is unchecked.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let inv_tan_half_fov = 1.0 / (fov * 0.5).tan();
        let depth_scale = -far / (far - near);

        let mut m = Self::zero();
        m.a[0] = inv_tan_half_fov / aspect;
        m.a[5] = inv_tan_half_fov;
        m.a[10] = depth_scale;
        m.a[11] = depth_scale * near;
        m.a[14] = -1.0;
        m
    }

    /// Creates a translation matrix (offsets in the last column).
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        let mut m = Self::identity();
        m.a[3] = tx;
        m.a[7] = ty;
        m.a[11] = tz;
        m
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotate_x(angle: f32) -> Self {
        let s = angle.sin();
        let c = angle.cos();
        let mut m = Self::identity();
        m.a[5] = c;
        m.a[6] = -s;
        m.a[9] = s;
        m.a[10] = c;
        m
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotate_y(angle: f32) -> Self {
        let s = angle.sin();
        let c = angle.cos();
        let mut m = Self::identity();
        m.a[0] = c;
        m.a[2] = s;
        m.a[8] = -s;
        m.a[10] = c;
        m
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotate_z(angle: f32) -> Self {
        let s = angle.sin();
        let c = angle.cos();
        let mut m = Self::identity();
        m.a[0] = c;
        m.a[1] = -s;
        m.a[4] = s;
        m.a[5] = c;
        m
    }

    /// Composite rotation: X, then Y, then Z factors multiplied in that
    /// order (`rotate_x(x) * rotate_y(y) * rotate_z(z)`).
    pub fn rotate_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::rotate_x(x) * Self::rotate_y(y) * Self::rotate_z(z)
    }

    /// Creates a uniform scale matrix. The factor is clamped to a minimum of
    /// 0.01 to keep the transform invertible.
    pub fn scale(s: f32) -> Self {
        let s = s.max(MIN_SCALE);
        let mut m = Self::identity();
        m.a[0] = s;
        m.a[5] = s;
        m.a[10] = s;
        m
    }

    /// Element at `(row, col)`. Panics outside 0..=3.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row <= 3, "no such matrix row: {row}");
        assert!(col <= 3, "no such matrix column: {col}");
        self.a[row * 4 + col]
    }

    /// Set element at `(row, col)`. Panics outside 0..=3.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(row <= 3, "no such matrix row: {row}");
        assert!(col <= 3, "no such matrix column: {col}");
        self.a[row * 4 + col] = value;
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Matrix product. Not commutative: `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut out = Mat4::zero();
        for row in 0..4 {
            for col in 0..4 {
                out.a[row * 4 + col] = self.a[row * 4] * rhs.a[col]
                    + self.a[row * 4 + 1] * rhs.a[4 + col]
                    + self.a[row * 4 + 2] * rhs.a[8 + col]
                    + self.a[row * 4 + 3] * rhs.a[12 + col];
            }
        }
        out
    }
}

/// Transform a column vector: `Mat4 * Vec4`.
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let a = &self.a;
        Vec4::new(
            a[0] * v.x + a[1] * v.y + a[2] * v.z + a[3] * v.w,
            a[4] * v.x + a[5] * v.y + a[6] * v.z + a[7] * v.w,
            a[8] * v.x + a[9] * v.y + a[10] * v.z + a[11] * v.w,
            a[12] * v.x + a[13] * v.y + a[14] * v.z + a[15] * v.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    fn assert_vec_close(a: Vec4, b: Vec4) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
        assert_relative_eq!(a.w, b.w, epsilon = 1e-5);
    }

    #[test]
    fn test_identity_leaves_vector_unchanged() {
        let v = Vec4::new(1.5, -2.0, 3.25, 1.0);
        assert_eq!(Mat4::identity() * v, v);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m * Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 2.0, 3.0));
        // Directions (w=0) are unaffected by translation
        let d = Vec4::direction(1.0, 0.0, 0.0);
        assert_eq!(m * d, d);
    }

    #[test]
    fn test_rotation_inverse_is_identity() {
        let m = Mat4::rotate_x(FRAC_PI_3) * Mat4::rotate_x(-FRAC_PI_3);
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_relative_eq!(m.get(row, col), expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let v = Mat4::rotate_z(FRAC_PI_2) * Vec4::point(1.0, 0.0, 0.0);
        assert_vec_close(v, Vec4::point(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_xyz_is_definitional_composition() {
        let (x, y, z) = (0.3, -0.7, 1.1);
        let composed = Mat4::rotate_x(x) * Mat4::rotate_y(y) * Mat4::rotate_z(z);
        // Exact equality: rotate_xyz is defined as this product
        assert_eq!(Mat4::rotate_xyz(x, y, z), composed);
    }

    #[test]
    fn test_matrix_product_not_commutative() {
        let a = Mat4::rotate_x(0.5);
        let b = Mat4::translation(1.0, 0.0, 0.0);
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn test_scale_clamps_to_minimum() {
        let m = Mat4::scale(0.0001);
        assert_relative_eq!(m.get(0, 0), 0.01);
        assert_relative_eq!(m.get(1, 1), 0.01);
        assert_relative_eq!(m.get(2, 2), 0.01);
    }

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (0.1, 100.0);
        let p = Mat4::perspective(FRAC_PI_2, 1.0, near, far);

        // Near plane center maps to depth 0, far plane center to +1
        let on_near = (p * Vec4::point(0.0, 0.0, -near)).divide_w();
        assert_relative_eq!(on_near.z, 0.0, epsilon = 1e-5);

        let on_far = (p * Vec4::point(0.0, 0.0, -far)).divide_w();
        assert_relative_eq!(on_far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perspective_w_is_negated_view_z() {
        let p = Mat4::perspective(FRAC_PI_2, 4.0 / 3.0, 0.1, 100.0);
        let clip = p * Vec4::point(0.5, -0.5, -4.0);
        assert_relative_eq!(clip.w, 4.0);
    }

    #[test]
    #[should_panic(expected = "no such matrix row")]
    fn test_row_out_of_range_panics() {
        let _ = Mat4::identity().get(4, 0);
    }
}
