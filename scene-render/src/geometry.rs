//! Conversions from scene geometry (kurbo) to canvas types.

use kurbo::{Affine, Point, Vec2};
use scene_canvas::{Matrix, RelCurveParams};

pub fn to_matrix(affine: Affine) -> Matrix {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Matrix::new(a, b, c, d, e, f)
}

pub fn to_point(point: Point) -> (f64, f64) {
    (point.x, point.y)
}

pub fn to_offset(offset: Vec2) -> (f64, f64) {
    (offset.x, offset.y)
}

/// A relative curve from control offsets and the end offset.
pub fn rel_curve(c1: Vec2, c2: Vec2, end: Vec2) -> RelCurveParams {
    RelCurveParams {
        dx1: c1.x,
        dy1: c1.y,
        dx2: c2.x,
        dy2: c2.y,
        dx: end.x,
        dy: end.y,
    }
}

/// The translation of `affine` with scale, rotation and shear dropped.
pub fn translation_part(affine: Affine) -> Affine {
    Affine::translate(affine.translation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_maps_points_like_affine() {
        let affine = Affine::translate((3.0, -1.0)) * Affine::rotate(0.7) * Affine::scale(2.0);
        let matrix = to_matrix(affine);
        let p = affine * Point::new(1.5, 2.5);
        let (x, y) = matrix.transform_point(1.5, 2.5);
        assert!((p.x - x).abs() < 1e-12 && (p.y - y).abs() < 1e-12);
    }

    #[test]
    fn test_translation_part() {
        let affine = Affine::translate((4.0, 5.0)) * Affine::scale(3.0);
        assert_eq!(
            to_matrix(translation_part(affine)),
            Matrix::translate(4.0, 5.0)
        );
    }
}
