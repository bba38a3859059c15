//! Fill, stroke, clip, and paint helper operations for RasterCanvas.

use super::RasterCanvas;
use crate::drawing_state::ClipStep;
use crate::matrix::Matrix;
use crate::pattern::{gradient_shader, Source};
use tiny_skia::Transform;

impl RasterCanvas {
    // --- Clipping ---

    /// Intersect the clip region with the current path using the current
    /// fill rule, then clear the path.
    pub(crate) fn clip_current_path(&mut self) {
        log::debug!(target: "canvas", "clip {:?}", self.state.fill_rule);
        let path = self.take_path();
        self.state.clip.push(ClipStep {
            path,
            rule: self.state.fill_rule,
        });
    }

    pub(crate) fn create_clip_mask(&self) -> Option<tiny_skia::Mask> {
        if self.state.clip.is_empty() {
            return None;
        }
        // A fresh mask is fully transparent, which is the result for an empty clip path
        let mut mask = tiny_skia::Mask::new(self.width, self.height)?;
        let mut steps = self.state.clip.iter();
        if let Some(ClipStep {
            path: Some(path),
            rule,
        }) = steps.next()
        {
            mask.fill_path(path, (*rule).into(), true, Transform::identity());
        } else {
            return Some(mask);
        }
        for step in steps {
            match &step.path {
                Some(path) => {
                    mask.intersect_path(path, step.rule.into(), true, Transform::identity())
                }
                None => return tiny_skia::Mask::new(self.width, self.height),
            }
        }
        Some(mask)
    }

    // --- Drawing operations ---

    pub(crate) fn fill_current_path(&mut self) {
        log::debug!(target: "canvas", "fill_preserve {:?}", self.state.fill_rule);
        // Clone the builder so the path survives for a following stroke
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };
        // Path coordinates are already in device space
        let Some(paint) = self.paint(&Matrix::identity()) else {
            return;
        };
        let clip_mask = self.create_clip_mask();
        self.pixmap.fill_path(
            &path,
            &paint,
            self.state.fill_rule.into(),
            Transform::identity(),
            clip_mask.as_ref(),
        );
    }

    pub(crate) fn stroke_current_path(&mut self) {
        log::debug!(target: "canvas", "stroke {}", self.state.line_width);
        let Some(path) = self.take_path() else {
            return;
        };
        // Zero width draws nothing (tiny-skia would draw a hairline)
        if !(self.state.line_width > 0.0) {
            return;
        }
        // Stroke geometry lives in user space, so map the device path back
        // and let tiny-skia apply the transform to path and pen together
        let transform = self.state.transform;
        let Some(user_path) = transform
            .invert()
            .and_then(|inverse| path.transform(inverse.into()))
        else {
            return;
        };

        let stroke = tiny_skia::Stroke {
            width: self.state.line_width as f32,
            line_cap: self.state.line_cap.into(),
            line_join: self.state.line_join.into(),
            miter_limit: self.state.miter_limit as f32,
            dash: self.state.dash.to_stroke_dash(),
        };

        let Some(paint) = self.paint(&transform) else {
            return;
        };
        let clip_mask = self.create_clip_mask();
        self.pixmap.stroke_path(
            &user_path,
            &paint,
            &stroke,
            transform.into(),
            clip_mask.as_ref(),
        );
    }

    // --- Paint helpers ---

    /// Paint for the current source, for geometry that tiny-skia will map to
    /// device space through `output_to_device`. `None` if the source paints
    /// nothing.
    pub(crate) fn paint(&self, output_to_device: &Matrix) -> Option<tiny_skia::Paint<'static>> {
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };

        match &self.state.source {
            Source::Solid(color) => {
                paint.set_color((*color).into());
            }
            Source::Gradient(gradient) => {
                let pattern_to_device = self
                    .state
                    .source_transform
                    .pre_concat(&gradient.pattern_to_user());
                let pattern_to_output = output_to_device
                    .invert()?
                    .pre_concat(&pattern_to_device);
                paint.shader = gradient_shader(gradient, pattern_to_output)?;
            }
        }
        Some(paint)
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::Canvas;
    use crate::font_config::FontConfig;
    use crate::matrix::Matrix;
    use crate::pattern::{Extend, Gradient, Rgba, Source};
    use crate::raster::RasterCanvas;
    use crate::style::FillRule;
    use rstest::rstest;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    fn canvas() -> RasterCanvas {
        RasterCanvas::with_config(100, 100, &FontConfig::empty()).unwrap()
    }

    fn rect(c: &mut RasterCanvas, x: f64, y: f64, w: f64, h: f64) {
        c.move_to(x, y);
        c.rel_line_to(w, 0.0);
        c.rel_line_to(0.0, h);
        c.rel_line_to(-w, 0.0);
        c.close_path();
    }

    #[test]
    fn test_fill_rect_pixels() {
        let mut c = canvas();
        c.set_source(&Source::Solid(RED));
        rect(&mut c, 10.0, 10.0, 50.0, 50.0);
        c.fill_preserve();
        assert_eq!(c.pixel(30, 30), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(70, 70), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_preserve_keeps_path_for_stroke() {
        let mut c = canvas();
        c.set_source(&Source::Solid(RED));
        rect(&mut c, 20.0, 20.0, 60.0, 60.0);
        c.fill_preserve();
        c.set_source(&Source::Solid(BLUE));
        c.set_line_width(4.0);
        c.stroke();
        assert_eq!(c.pixel(50, 50), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(20, 50), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_stroke_clears_path() {
        let mut c = canvas();
        rect(&mut c, 20.0, 20.0, 60.0, 60.0);
        c.stroke();
        c.set_source(&Source::Solid(RED));
        c.fill_preserve();
        assert_eq!(c.pixel(50, 50), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_width_stroke_is_invisible() {
        let mut c = canvas();
        c.set_line_width(0.0);
        rect(&mut c, 20.0, 20.0, 60.0, 60.0);
        c.stroke();
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_stroke_width_scales_with_transform() {
        let mut c = canvas();
        c.transform(&Matrix::scale(10.0, 10.0));
        c.set_line_width(1.0);
        c.move_to(1.0, 5.0);
        c.rel_line_to(8.0, 0.0);
        c.stroke();
        // A 1-unit pen at scale 10 covers device rows 45..55
        assert_eq!(c.pixel(50, 46).map(|p| p[3]), Some(255));
        assert_eq!(c.pixel(50, 60).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut c = canvas();
        rect(&mut c, 0.0, 0.0, 50.0, 100.0);
        c.clip();
        c.set_source(&Source::Solid(RED));
        rect(&mut c, 0.0, 0.0, 100.0, 100.0);
        c.fill_preserve();
        assert_eq!(c.pixel(25, 50), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(75, 50), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_nested_clips_intersect_and_restore() {
        let mut c = canvas();
        c.save();
        rect(&mut c, 0.0, 0.0, 60.0, 100.0);
        c.clip();
        rect(&mut c, 40.0, 0.0, 60.0, 100.0);
        c.clip();
        c.set_source(&Source::Solid(RED));
        rect(&mut c, 0.0, 0.0, 100.0, 50.0);
        c.fill_preserve();
        c.new_path();
        c.restore();
        assert_eq!(c.pixel(50, 25), Some([255, 0, 0, 255]));
        assert_eq!(c.pixel(20, 25), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(80, 25), Some([0, 0, 0, 0]));

        // Clip is gone after restore
        rect(&mut c, 0.0, 50.0, 100.0, 50.0);
        c.fill_preserve();
        assert_eq!(c.pixel(10, 75), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_empty_clip_hides_everything() {
        let mut c = canvas();
        c.clip();
        rect(&mut c, 0.0, 0.0, 100.0, 100.0);
        c.fill_preserve();
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[rstest]
    #[case(FillRule::Winding, 255)]
    #[case(FillRule::EvenOdd, 0)]
    fn test_fill_rule_hole(#[case] rule: FillRule, #[case] center_alpha: u8) {
        let mut c = canvas();
        c.set_fill_rule(rule);
        rect(&mut c, 10.0, 10.0, 80.0, 80.0);
        rect(&mut c, 30.0, 30.0, 40.0, 40.0);
        c.fill_preserve();
        assert_eq!(c.pixel(50, 50).map(|p| p[3]), Some(center_alpha));
        assert_eq!(c.pixel(20, 20).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_linear_gradient_follows_pattern_matrix() {
        let mut c = canvas();
        let mut g = Gradient::new_linear(0.0, 0.0, 1.0, 0.0);
        g.add_color_stop(0.0, RED);
        g.add_color_stop(1.0, BLUE);
        // Pattern unit square covers the 100px surface
        g.set_matrix(Matrix::scale(0.01, 0.01));
        g.set_extend(Extend::Pad);
        c.set_source(&Source::Gradient(g));
        rect(&mut c, 0.0, 0.0, 100.0, 100.0);
        c.fill_preserve();
        let left = c.pixel(2, 50).unwrap();
        let right = c.pixel(97, 50).unwrap();
        assert!(left[0] > 240 && left[2] < 15);
        assert!(right[2] > 240 && right[0] < 15);
    }

    #[test]
    fn test_semi_transparent_solid() {
        let mut c = canvas();
        c.set_source(&Source::Solid(RED.with_alpha(0.5)));
        rect(&mut c, 0.0, 0.0, 10.0, 10.0);
        c.fill_preserve();
        let alpha = c.pixel(5, 5).unwrap()[3];
        assert!((126..=129).contains(&alpha));
    }
}
