//! The drawing-context interface implemented by every surface.

use crate::image::RasterImage;
use crate::matrix::Matrix;
use crate::pattern::Source;
use crate::style::{FillRule, FontSpec, LineCap, LineJoin, RelCurveParams, TextExtents};

/// A cairo-style drawing context.
///
/// Path coordinates are interpreted in user space at the time they are added.
/// `stroke` and `clip` consume the current path; `fill_preserve` keeps it so a
/// stroke can follow. `transform` multiplies onto the current transformation
/// (the given matrix is applied to coordinates first). Text and images are
/// placed at the user-space origin, with user Y pointing down.
pub trait Canvas {
    /// Push the complete graphics state (transform, clip, source, stroke
    /// parameters, fill rule).
    fn save(&mut self);

    /// Pop the graphics state pushed by the matching `save`.
    fn restore(&mut self);

    fn transform(&mut self, matrix: &Matrix);

    fn new_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn rel_line_to(&mut self, dx: f64, dy: f64);

    fn rel_curve_to(&mut self, params: &RelCurveParams);

    fn close_path(&mut self);

    /// Intersect the clip region with the current path and clear the path.
    fn clip(&mut self);

    fn set_fill_rule(&mut self, rule: FillRule);

    fn set_line_width(&mut self, width: f64);

    fn set_line_cap(&mut self, cap: LineCap);

    fn set_line_join(&mut self, join: LineJoin);

    /// An empty `lengths` slice disables dashing.
    fn set_dash(&mut self, lengths: &[f64], offset: f64);

    fn set_source(&mut self, source: &Source);

    /// Fill the current path with the current source, keeping the path.
    fn fill_preserve(&mut self);

    /// Stroke the current path with the current source and clear the path.
    fn stroke(&mut self);

    /// Measure `text` laid out with `font`, in user units.
    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents;

    /// Paint `text` with the current source, baseline starting at the origin.
    fn show_text(&mut self, font: &FontSpec, text: &str);

    /// Composite `image` with its top-left corner at `(x, y)`, one pixel per
    /// user unit.
    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64);
}

/// Allows a procedure to draw through a borrowed surface.
impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn save(&mut self) {
        (**self).save()
    }

    fn restore(&mut self) {
        (**self).restore()
    }

    fn transform(&mut self, matrix: &Matrix) {
        (**self).transform(matrix)
    }

    fn new_path(&mut self) {
        (**self).new_path()
    }

    fn move_to(&mut self, x: f64, y: f64) {
        (**self).move_to(x, y)
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        (**self).rel_line_to(dx, dy)
    }

    fn rel_curve_to(&mut self, params: &RelCurveParams) {
        (**self).rel_curve_to(params)
    }

    fn close_path(&mut self) {
        (**self).close_path()
    }

    fn clip(&mut self) {
        (**self).clip()
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        (**self).set_fill_rule(rule)
    }

    fn set_line_width(&mut self, width: f64) {
        (**self).set_line_width(width)
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        (**self).set_line_cap(cap)
    }

    fn set_line_join(&mut self, join: LineJoin) {
        (**self).set_line_join(join)
    }

    fn set_dash(&mut self, lengths: &[f64], offset: f64) {
        (**self).set_dash(lengths, offset)
    }

    fn set_source(&mut self, source: &Source) {
        (**self).set_source(source)
    }

    fn fill_preserve(&mut self) {
        (**self).fill_preserve()
    }

    fn stroke(&mut self) {
        (**self).stroke()
    }

    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        (**self).measure_text(font, text)
    }

    fn show_text(&mut self, font: &FontSpec, text: &str) {
        (**self).show_text(font, text)
    }

    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        (**self).paint_image(image, x, y)
    }
}
