//! PostScript document surface backed by cairo's `PsSurface`.
//!
//! Only compiled with the `ps` crate feature. Cairo keeps the graphics state
//! itself, so this surface mostly forwards calls; what it adds is keeping the
//! context out of cairo's sticky error state (unmatched restores, singular
//! matrices, invalid dashes) and drawing text from the shared font database.

use cairo::{Context, Format, ImageSurface, PsLevel, PsSurface};

use crate::canvas::Canvas;
use crate::error::{CanvasError, CanvasResult};
use crate::image::RasterImage;
use crate::matrix::Matrix;
use crate::pattern::{Extend, Gradient, GradientGeometry, Source};
use crate::style::{FillRule, FontSpec, LineCap, LineJoin, RelCurveParams, TextExtents};
use crate::text::TextEngine;

impl From<cairo::Error> for CanvasError {
    fn from(err: cairo::Error) -> Self {
        CanvasError::PsWrite(err.to_string())
    }
}

impl From<Matrix> for cairo::Matrix {
    fn from(m: Matrix) -> Self {
        cairo::Matrix::new(m.a, m.b, m.c, m.d, m.e, m.f)
    }
}

impl From<LineCap> for cairo::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        }
    }
}

impl From<LineJoin> for cairo::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        }
    }
}

impl From<FillRule> for cairo::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::Winding => cairo::FillRule::Winding,
            FillRule::EvenOdd => cairo::FillRule::EvenOdd,
        }
    }
}

impl From<Extend> for cairo::Extend {
    fn from(extend: Extend) -> Self {
        match extend {
            Extend::Pad => cairo::Extend::Pad,
            Extend::Repeat => cairo::Extend::Repeat,
            Extend::Reflect => cairo::Extend::Reflect,
        }
    }
}

/// A surface that renders one PostScript page into memory.
///
/// Drawing failures are sticky, as with [`crate::SvgCanvas`]: the first one
/// is reported by [`PsCanvas::finish`].
pub struct PsCanvas {
    surface: PsSurface,
    ctx: Context,
    text: TextEngine,
    depth: usize,
    error: Option<CanvasError>,
}

impl PsCanvas {
    pub fn new(width: f64, height: f64, text: TextEngine) -> CanvasResult<Self> {
        log::debug!(target: "canvas", "ps surface {}x{}", width, height);
        let surface = PsSurface::for_stream(width, height, Vec::<u8>::new())?;
        surface.restrict(PsLevel::_3);
        let ctx = Context::new(&surface)?;
        Ok(Self {
            surface,
            ctx,
            text,
            depth: 0,
            error: None,
        })
    }

    /// Write Encapsulated PostScript. Must be set before anything is drawn.
    pub fn set_eps(&mut self, eps: bool) {
        self.surface.set_eps(eps);
    }

    /// End the page and return the document.
    pub fn finish(self) -> CanvasResult<Vec<u8>> {
        let Self {
            surface,
            ctx,
            error,
            ..
        } = self;
        if let Some(err) = error {
            return Err(err);
        }
        drop(ctx);
        let stream = surface
            .finish_output_stream()
            .map_err(|err| CanvasError::PsWrite(err.to_string()))?;
        stream
            .downcast::<Vec<u8>>()
            .map(|bytes| *bytes)
            .map_err(|_| CanvasError::PsWrite("unexpected output stream type".to_string()))
    }

    fn check(&mut self, result: Result<(), cairo::Error>) {
        if let Err(err) = result {
            log::warn!(target: "canvas", "ps: {}", err);
            if self.error.is_none() {
                self.error = Some(err.into());
            }
        }
    }

    fn ensure_current_point(&mut self) {
        if !self.ctx.has_current_point().unwrap_or(false) {
            self.ctx.move_to(0.0, 0.0);
        }
    }

    fn set_gradient(&mut self, gradient: &Gradient) {
        let matrix = match gradient.matrix.invert() {
            Some(_) => gradient.matrix,
            None => {
                log::debug!(target: "canvas", "ps: singular gradient matrix replaced by identity");
                Matrix::identity()
            }
        };
        let result = match gradient.geometry {
            GradientGeometry::Linear { x0, y0, x1, y1 } => {
                let pattern = cairo::LinearGradient::new(x0, y0, x1, y1);
                for stop in &gradient.stops {
                    let c = stop.color;
                    pattern.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a);
                }
                pattern.set_extend(gradient.extend.into());
                pattern.set_matrix(matrix.into());
                self.ctx.set_source(&pattern)
            }
            GradientGeometry::Radial {
                cx0,
                cy0,
                r0,
                cx1,
                cy1,
                r1,
            } => {
                let pattern = cairo::RadialGradient::new(cx0, cy0, r0, cx1, cy1, r1);
                for stop in &gradient.stops {
                    let c = stop.color;
                    pattern.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a);
                }
                pattern.set_extend(gradient.extend.into());
                pattern.set_matrix(matrix.into());
                self.ctx.set_source(&pattern)
            }
        };
        self.check(result);
    }

    fn fill_glyphs(&mut self, font: &FontSpec, text: &str) -> Result<(), cairo::Error> {
        let Some(outline) = self.text.outline(font, text) else {
            return Ok(());
        };
        self.ctx.new_path();
        let mut last = (0.0, 0.0);
        for segment in outline.segments() {
            match segment {
                tiny_skia::PathSegment::MoveTo(p) => {
                    self.ctx.move_to(p.x as f64, p.y as f64);
                    last = (p.x as f64, p.y as f64);
                }
                tiny_skia::PathSegment::LineTo(p) => {
                    self.ctx.line_to(p.x as f64, p.y as f64);
                    last = (p.x as f64, p.y as f64);
                }
                tiny_skia::PathSegment::QuadTo(q, p) => {
                    let (q, p) = ((q.x as f64, q.y as f64), (p.x as f64, p.y as f64));
                    self.ctx.curve_to(
                        last.0 + 2.0 / 3.0 * (q.0 - last.0),
                        last.1 + 2.0 / 3.0 * (q.1 - last.1),
                        p.0 + 2.0 / 3.0 * (q.0 - p.0),
                        p.1 + 2.0 / 3.0 * (q.1 - p.1),
                        p.0,
                        p.1,
                    );
                    last = p;
                }
                tiny_skia::PathSegment::CubicTo(c1, c2, p) => {
                    self.ctx.curve_to(
                        c1.x as f64,
                        c1.y as f64,
                        c2.x as f64,
                        c2.y as f64,
                        p.x as f64,
                        p.y as f64,
                    );
                    last = (p.x as f64, p.y as f64);
                }
                tiny_skia::PathSegment::Close => self.ctx.close_path(),
            }
        }
        self.ctx.set_fill_rule(cairo::FillRule::Winding);
        self.ctx.fill()
    }
}

/// Cairo ARGB32 data: premultiplied, native-endian words.
fn argb32(image: &RasterImage) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let mut out = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        let premul = |v: u8| ((v as u32 * a + 127) / 255) as u8;
        let word = (a << 24)
            | (u32::from(premul(px[0])) << 16)
            | (u32::from(premul(px[1])) << 8)
            | u32::from(premul(px[2]));
        out.extend_from_slice(&word.to_ne_bytes());
    }
    out
}

impl Canvas for PsCanvas {
    fn save(&mut self) {
        let result = self.ctx.save();
        if result.is_ok() {
            self.depth += 1;
        }
        self.check(result);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        let result = self.ctx.restore();
        self.check(result);
    }

    fn transform(&mut self, matrix: &Matrix) {
        if matrix.invert().is_none() {
            log::debug!(target: "canvas", "ps: singular transform ignored");
            return;
        }
        self.ctx.transform((*matrix).into());
    }

    fn new_path(&mut self) {
        self.ctx.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        self.ensure_current_point();
        self.ctx.rel_line_to(dx, dy);
    }

    fn rel_curve_to(&mut self, params: &RelCurveParams) {
        self.ensure_current_point();
        self.ctx.rel_curve_to(
            params.dx1, params.dy1, params.dx2, params.dy2, params.dx, params.dy,
        );
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.ctx.set_fill_rule(rule.into());
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width >= 0.0 {
            self.ctx.set_line_width(width);
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.into());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.into());
    }

    fn set_dash(&mut self, lengths: &[f64], offset: f64) {
        let invalid = lengths.iter().any(|l| !l.is_finite() || *l < 0.0)
            || (!lengths.is_empty() && lengths.iter().all(|l| *l == 0.0))
            || !offset.is_finite();
        if invalid {
            log::debug!(target: "canvas", "ps: dash {:?} ignored", lengths);
            return;
        }
        self.ctx.set_dash(lengths, offset);
    }

    fn set_source(&mut self, source: &Source) {
        match source {
            Source::Solid(c) => self.ctx.set_source_rgba(c.r, c.g, c.b, c.a),
            Source::Gradient(gradient) => self.set_gradient(gradient),
        }
    }

    fn fill_preserve(&mut self) {
        let result = self.ctx.fill_preserve();
        self.check(result);
    }

    fn stroke(&mut self) {
        let result = self.ctx.stroke();
        self.check(result);
    }

    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        self.text.measure(font, text)
    }

    fn show_text(&mut self, font: &FontSpec, text: &str) {
        log::debug!(target: "canvas", "show_text \"{}\" {} {}", text, font.family, font.size);
        // Glyphs go through their own path, so the current one is set aside
        let path = match self.ctx.copy_path() {
            Ok(path) => path,
            Err(err) => return self.check(Err(err)),
        };
        let result = self.ctx.save().and_then(|_| {
            let filled = self.fill_glyphs(font, text);
            let restored = self.ctx.restore();
            filled.and(restored)
        });
        self.check(result);
        self.ctx.new_path();
        self.ctx.append_path(&path);
    }

    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        let (w, h) = (image.width() as i32, image.height() as i32);
        let surface = match ImageSurface::create_for_data(argb32(image), Format::ARgb32, w, h, w * 4) {
            Ok(surface) => surface,
            Err(err) => return self.check(Err(err)),
        };
        let result = self.ctx.save().and_then(|_| {
            let painted = self
                .ctx
                .set_source_surface(&surface, x, y)
                .and_then(|_| self.ctx.paint());
            let restored = self.ctx.restore();
            painted.and(restored)
        });
        self.check(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_config::FontConfig;
    use crate::pattern::Rgba;
    use rstest::rstest;

    fn canvas() -> PsCanvas {
        PsCanvas::new(200.0, 100.0, TextEngine::new(&FontConfig::empty())).unwrap()
    }

    fn document(canvas: PsCanvas) -> String {
        String::from_utf8_lossy(&canvas.finish().unwrap()).into_owned()
    }

    fn square(c: &mut PsCanvas) {
        c.move_to(0.0, 0.0);
        c.rel_line_to(10.0, 0.0);
        c.rel_line_to(0.0, 10.0);
        c.close_path();
    }

    #[test]
    fn test_document_structure() {
        let mut c = canvas();
        c.set_source(&Source::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0)));
        square(&mut c);
        c.fill_preserve();
        c.stroke();
        let ps = document(c);
        assert!(ps.starts_with("%!PS-Adobe-3.0"));
        assert!(ps.contains("%%EOF"));
    }

    #[test]
    fn test_eps_header() {
        let mut c = canvas();
        c.set_eps(true);
        square(&mut c);
        c.stroke();
        assert!(document(c).contains("EPSF-3.0"));
    }

    #[test]
    fn test_unmatched_restore_is_ignored() {
        let mut c = canvas();
        c.save();
        c.restore();
        c.restore();
        square(&mut c);
        c.stroke();
        assert!(c.finish().is_ok());
    }

    #[test]
    fn test_singular_transform_and_bad_dash_leave_context_usable() {
        let mut c = canvas();
        c.transform(&Matrix::scale(0.0, 1.0));
        c.set_dash(&[0.0, 0.0], 0.0);
        c.set_dash(&[-1.0], 0.0);
        square(&mut c);
        c.stroke();
        assert!(c.finish().is_ok());
    }

    #[test]
    fn test_relative_segment_without_current_point_starts_at_origin() {
        let mut c = canvas();
        c.rel_line_to(10.0, 10.0);
        c.stroke();
        assert!(c.finish().is_ok());
    }

    #[rstest]
    #[case(Extend::Pad)]
    #[case(Extend::Repeat)]
    #[case(Extend::Reflect)]
    fn test_gradient_extends_with_alpha(#[case] extend: Extend) {
        let mut c = canvas();
        let mut g = Gradient::new_radial(5.0, 5.0, 0.0, 5.0, 5.0, 5.0);
        g.add_color_stop(0.0, Rgba::new(1.0, 0.0, 0.0, 0.5));
        g.add_color_stop(1.0, Rgba::new(0.0, 0.0, 1.0, 1.0));
        g.set_extend(extend);
        g.set_matrix(Matrix::scale(2.0, 2.0));
        c.set_source(&Source::Gradient(g));
        square(&mut c);
        c.fill_preserve();
        c.stroke();
        assert!(c.finish().is_ok());
    }

    #[test]
    fn test_image_and_text_keep_current_path() {
        let mut c = canvas();
        square(&mut c);
        let image = RasterImage::from_rgba8(2, 1, &[255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        c.paint_image(&image, 0.0, 0.0);
        c.show_text(&FontSpec::default(), "kept");
        assert!(c.ctx.has_current_point().unwrap());
        c.stroke();
        assert!(c.finish().is_ok());
    }

    #[test]
    fn test_argb32_premultiplies() {
        let image = RasterImage::from_rgba8(1, 1, &[255, 128, 0, 128]).unwrap();
        let word = u32::from_ne_bytes(argb32(&image).try_into().unwrap());
        assert_eq!(word, 0x8080_4000);
    }
}
