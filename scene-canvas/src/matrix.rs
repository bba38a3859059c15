//! Affine transformation matrix used by all surfaces.

/// A 2D affine transformation matrix.
///
/// The matrix is represented as:
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
/// so a point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Scale X component.
    pub a: f64,
    /// Skew Y component.
    pub b: f64,
    /// Skew X component.
    pub c: f64,
    /// Scale Y component.
    pub d: f64,
    /// Translate X component.
    pub e: f64,
    /// Translate Y component.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Create a new matrix with the specified components.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Reflection across the X axis (flips the direction of Y).
    pub fn reflect_y() -> Self {
        Self::scale(1.0, -1.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Returns `self * other`: `other` is applied first, then `self`.
    pub fn pre_concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Returns `other * self`: `self` is applied first, then `other`.
    pub fn post_concat(&self, other: &Matrix) -> Matrix {
        other.pre_concat(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Invert the matrix. Returns `None` for singular or non-finite matrices.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        Some(Matrix {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    /// Transform a point (translation applies).
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Transform a distance vector (translation ignored).
    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.a * dx + self.c * dy, self.b * dx + self.d * dy)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl From<tiny_skia::Transform> for Matrix {
    fn from(t: tiny_skia::Transform) -> Self {
        Matrix {
            a: t.sx as f64,
            b: t.ky as f64,
            c: t.kx as f64,
            d: t.sy as f64,
            e: t.tx as f64,
            f: t.ty as f64,
        }
    }
}

impl From<Matrix> for tiny_skia::Transform {
    fn from(m: Matrix) -> Self {
        tiny_skia::Transform::from_row(
            m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_pre_concat_applies_other_first() {
        let m = Matrix::translate(10.0, 0.0).pre_concat(&Matrix::scale(2.0, 2.0));
        // scale first, then translate
        assert!(approx(m.transform_point(1.0, 1.0), (12.0, 2.0)));

        let m = Matrix::translate(10.0, 0.0).post_concat(&Matrix::scale(2.0, 2.0));
        // translate first, then scale
        assert!(approx(m.transform_point(1.0, 1.0), (22.0, 2.0)));
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Matrix::new(0.5, 0.3, -0.2, 2.0, 7.0, -3.0);
        let inv = m.invert().unwrap();
        assert!(approx(
            m.pre_concat(&inv).transform_point(4.0, 5.0),
            (4.0, 5.0)
        ));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Matrix::scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_distance_ignores_translation() {
        let m = Matrix::translate(100.0, 100.0).pre_concat(&Matrix::scale(3.0, -1.0));
        assert!(approx(m.transform_distance(1.0, 1.0), (3.0, -1.0)));
    }

    #[test]
    fn test_tiny_skia_conversion() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let t: tiny_skia::Transform = m.into();
        assert_eq!(t.sx, 1.0);
        assert_eq!(t.ky, 2.0);
        assert_eq!(t.kx, 3.0);
        assert_eq!(t.sy, 4.0);
        assert_eq!(Matrix::from(t), m);
    }
}
