//! Renderers for the three primitive kinds.

use scene_canvas::{Canvas, FontSpec, Matrix, RasterImage, Rgba, Source};

use crate::context::RenderContext;
use crate::geometry::{to_matrix, translation_part};
use crate::paint::set_texture;
use crate::path::build_path;
use crate::scene::{Image, Path, Text, TextAlignment};
use crate::style::attr;

/// Fill (unless a sub-path is open) and stroke `path` with the accumulated
/// paints. The stroke is always issued and consumes the path; without a
/// stroke paint it is drawn transparent.
pub fn render_path<C: Canvas>(ctx: &mut RenderContext<C>, path: &Path) {
    build_path(ctx, path);
    let fill = ctx.accumulator().attribute::<attr::FillPaint>();
    let stroke = ctx.accumulator().attribute::<attr::StrokePaint>();
    if fill.is_some() && !ctx.accumulator().ignore_fill() {
        set_texture(ctx, fill.as_ref());
        ctx.canvas_mut().fill_preserve();
    }
    match stroke {
        Some(paint) => set_texture(ctx, Some(&paint)),
        None => ctx.canvas_mut().set_source(&Source::Solid(Rgba::TRANSPARENT)),
    }
    ctx.canvas_mut().stroke();
}

/// The font described by the accumulated style.
pub fn current_font<C: Canvas>(ctx: &RenderContext<C>) -> FontSpec {
    let acc = ctx.accumulator();
    let defaults = FontSpec::default();
    FontSpec {
        family: acc.attribute::<attr::FontFamily>().unwrap_or(defaults.family),
        slant: acc
            .attribute::<attr::FontSlant>()
            .map(Into::into)
            .unwrap_or(defaults.slant),
        weight: acc
            .attribute::<attr::FontWeight>()
            .map(Into::into)
            .unwrap_or(defaults.weight),
        size: acc.attribute::<attr::FontSize>().unwrap_or(defaults.size),
    }
}

pub fn render_text<C: Canvas>(ctx: &mut RenderContext<C>, text: &Text) {
    let font = current_font(ctx);
    let fill = ctx.accumulator().attribute::<attr::FillPaint>();
    let frame = if text.local_frame {
        text.transform
    } else {
        translation_part(text.transform)
    };

    ctx.canvas_mut().save();
    set_texture(ctx, fill.as_ref());
    let canvas = ctx.canvas_mut();
    canvas.transform(&to_matrix(frame));
    canvas.transform(&Matrix::reflect_y());
    let extents = canvas.measure_text(&font, &text.text);
    let (ax, ay) = match text.alignment {
        TextAlignment::BoxAligned { x, y } => (
            lerp(0.0, extents.width, x),
            lerp(extents.descent, -extents.ascent, y),
        ),
        TextAlignment::Baseline => (0.0, 0.0),
    };
    canvas.transform(&Matrix::translate(-ax, -ay));
    canvas.show_text(&font, &text.text);
    canvas.restore();
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn is_png(image: &Image) -> bool {
    image
        .resource
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Draw a PNG scaled uniformly into the image box. Unsupported or unreadable
/// images produce a diagnostic and draw nothing.
pub fn render_image<C: Canvas>(ctx: &mut RenderContext<C>, image: &Image) {
    if !is_png(image) {
        ctx.diagnostic(format!(
            "Unsupported image format: {} (only PNG images are drawn)",
            image.resource.display()
        ));
        return;
    }
    let raster = match RasterImage::load_png(&image.resource) {
        Ok(raster) => raster,
        Err(err) => {
            ctx.diagnostic(format!(
                "Failed to load image {}: {}",
                image.resource.display(),
                err
            ));
            return;
        }
    };

    let (pw, ph) = (raster.width() as f64, raster.height() as f64);
    let scale = (image.width / pw).min(image.height / ph);
    let canvas = ctx.canvas_mut();
    canvas.save();
    canvas.transform(&to_matrix(image.transform));
    canvas.transform(&Matrix::reflect_y());
    canvas.transform(&Matrix::scale(scale, scale));
    canvas.paint_image(&raster, -pw / 2.0, -ph / 2.0);
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, Paint};
    use crate::style::{FontWeight, Style};
    use kurbo::{Affine, Point};
    use scene_canvas::{CanvasCall, RecordingCanvas};

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    fn context(style: Style) -> RenderContext<RecordingCanvas> {
        let mut ctx = RenderContext::new(RecordingCanvas::new());
        ctx.accumulator_mut().merge_style(&style);
        ctx
    }

    fn triangle() -> Path {
        Path::polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)])
    }

    #[test]
    fn test_path_fill_then_stroke() {
        let mut ctx = context(Style::new().fill(Paint::Solid(RED)).stroke(Paint::Solid(BLUE)));
        render_path(&mut ctx, &triangle());
        let calls = ctx.into_parts().0.into_calls();
        let tail = &calls[calls.len() - 4..];
        assert_eq!(
            tail,
            &[
                CanvasCall::SetSource(Source::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0))),
                CanvasCall::FillPreserve,
                CanvasCall::SetSource(Source::Solid(Rgba::new(0.0, 0.0, 1.0, 1.0))),
                CanvasCall::Stroke,
            ]
        );
    }

    #[test]
    fn test_path_without_paints_strokes_transparent() {
        let mut ctx = context(Style::new());
        render_path(&mut ctx, &triangle());
        let canvas = ctx.into_parts().0;
        assert_eq!(canvas.count(|c| *c == CanvasCall::FillPreserve), 0);
        let calls = canvas.into_calls();
        assert_eq!(
            &calls[calls.len() - 2..],
            &[CanvasCall::SetSource(Source::Solid(Rgba::TRANSPARENT)), CanvasCall::Stroke]
        );
    }

    #[test]
    fn test_fill_only_path_does_not_stroke_with_fill_colour() {
        let mut ctx = context(Style::new().fill(Paint::Solid(RED)));
        render_path(&mut ctx, &triangle());
        let calls = ctx.into_parts().0.into_calls();
        assert_eq!(
            &calls[calls.len() - 4..],
            &[
                CanvasCall::SetSource(Source::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0))),
                CanvasCall::FillPreserve,
                CanvasCall::SetSource(Source::Solid(Rgba::TRANSPARENT)),
                CanvasCall::Stroke,
            ]
        );
    }

    #[test]
    fn test_font_from_accumulated_style() {
        let ctx = context(Style::new().font_size(24.0).font_weight(FontWeight::Bold));
        let font = current_font(&ctx);
        assert_eq!(font.family, "sans-serif");
        assert_eq!(font.size, 24.0);
        assert!(font.weight.is_bold());
    }

    #[test]
    fn test_text_box_alignment_anchor() {
        // recording metrics: width 0.5 * size per char, ascent 0.8, descent 0.2
        let mut ctx = context(Style::new().font_size(10.0));
        let text = Text::new(Point::new(3.0, 4.0), "abcd");
        render_text(&mut ctx, &text);
        let calls = ctx.into_parts().0.into_calls();
        assert_eq!(
            calls,
            vec![
                CanvasCall::Save,
                CanvasCall::Transform(Matrix::translate(3.0, 4.0)),
                CanvasCall::Transform(Matrix::reflect_y()),
                CanvasCall::Transform(Matrix::translate(-10.0, 3.0)),
                CanvasCall::ShowText {
                    font: FontSpec::default(),
                    text: "abcd".to_string(),
                },
                CanvasCall::Restore,
            ]
        );
    }

    #[test]
    fn test_text_normalized_frame_keeps_translation_only() {
        let mut ctx = context(Style::new().fill(Paint::Solid(RED)));
        let text = Text {
            transform: Affine::translate((3.0, 4.0)) * Affine::scale(5.0),
            local_frame: false,
            alignment: TextAlignment::Baseline,
            text: "x".into(),
        };
        render_text(&mut ctx, &text);
        let calls = ctx.into_parts().0.into_calls();
        assert_eq!(calls[1], CanvasCall::SetSource(Source::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0))));
        assert_eq!(calls[2], CanvasCall::Transform(Matrix::translate(3.0, 4.0)));
        assert_eq!(calls[4], CanvasCall::Transform(Matrix::translate(-0.0, -0.0)));
    }

    #[test]
    fn test_non_png_image_is_skipped_with_diagnostic() {
        let mut ctx = context(Style::new());
        render_image(&mut ctx, &Image::new("photo.jpg", 10.0, 10.0));
        let (canvas, diagnostics) = ctx.into_parts();
        assert!(canvas.calls().is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("photo.jpg"));
    }

    #[test]
    fn test_missing_png_is_skipped_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(Style::new());
        render_image(&mut ctx, &Image::new(dir.path().join("missing.PNG"), 10.0, 10.0));
        let (canvas, diagnostics) = ctx.into_parts();
        assert!(canvas.calls().is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_png_is_scaled_uniformly_and_centred() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("swatch.png");
        let raster = RasterImage::from_rgba8(4, 2, &[255; 4 * 2 * 4]).unwrap();
        std::fs::write(&file, raster.to_png().unwrap()).unwrap();

        let mut ctx = context(Style::new());
        render_image(&mut ctx, &Image::new(&file, 20.0, 20.0));
        let (canvas, diagnostics) = ctx.into_parts();
        assert!(diagnostics.is_empty());
        assert_eq!(
            canvas.calls(),
            &[
                CanvasCall::Save,
                CanvasCall::Transform(Matrix::identity()),
                CanvasCall::Transform(Matrix::reflect_y()),
                CanvasCall::Transform(Matrix::scale(5.0, 5.0)),
                CanvasCall::PaintImage {
                    width: 4,
                    height: 2,
                    x: -2.0,
                    y: -1.0,
                },
                CanvasCall::Restore,
            ]
        );
    }
}
