//! A surface that records calls instead of drawing.

use crate::canvas::Canvas;
use crate::image::RasterImage;
use crate::matrix::Matrix;
use crate::pattern::Source;
use crate::style::{FillRule, FontSpec, LineCap, LineJoin, RelCurveParams, TextExtents};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    Save,
    Restore,
    Transform(Matrix),
    NewPath,
    MoveTo(f64, f64),
    RelLineTo(f64, f64),
    RelCurveTo(RelCurveParams),
    ClosePath,
    Clip,
    SetFillRule(FillRule),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetDash(Vec<f64>, f64),
    SetSource(Source),
    FillPreserve,
    Stroke,
    ShowText { font: FontSpec, text: String },
    PaintImage { width: u32, height: u32, x: f64, y: f64 },
}

impl CanvasCall {
    /// Whether this call builds path geometry.
    pub fn is_path_construction(&self) -> bool {
        matches!(
            self,
            CanvasCall::NewPath
                | CanvasCall::MoveTo(..)
                | CanvasCall::RelLineTo(..)
                | CanvasCall::RelCurveTo(..)
                | CanvasCall::ClosePath
        )
    }
}

/// Records every call in order.
///
/// Text is measured with fixed metrics (half an em per character, ascent 0.8
/// and descent 0.2 of the size) so results do not depend on installed fonts.
/// Unlike the drawing surfaces, a `restore` without a matching `save` panics.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<CanvasCall>,
    depth: usize,
    max_depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[CanvasCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<CanvasCall> {
        self.calls
    }

    /// Current save depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest save depth reached.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn count(&self, pred: impl Fn(&CanvasCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Only the path construction calls, in order.
    pub fn path_calls(&self) -> Vec<CanvasCall> {
        self.calls
            .iter()
            .filter(|c| c.is_path_construction())
            .cloned()
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.calls.push(CanvasCall::Save);
    }

    fn restore(&mut self) {
        assert!(self.depth > 0, "restore without matching save");
        self.depth -= 1;
        self.calls.push(CanvasCall::Restore);
    }

    fn transform(&mut self, matrix: &Matrix) {
        self.calls.push(CanvasCall::Transform(*matrix));
    }

    fn new_path(&mut self) {
        self.calls.push(CanvasCall::NewPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(CanvasCall::MoveTo(x, y));
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        self.calls.push(CanvasCall::RelLineTo(dx, dy));
    }

    fn rel_curve_to(&mut self, params: &RelCurveParams) {
        self.calls.push(CanvasCall::RelCurveTo(*params));
    }

    fn close_path(&mut self) {
        self.calls.push(CanvasCall::ClosePath);
    }

    fn clip(&mut self) {
        self.calls.push(CanvasCall::Clip);
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.calls.push(CanvasCall::SetFillRule(rule));
    }

    fn set_line_width(&mut self, width: f64) {
        self.calls.push(CanvasCall::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.calls.push(CanvasCall::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.calls.push(CanvasCall::SetLineJoin(join));
    }

    fn set_dash(&mut self, lengths: &[f64], offset: f64) {
        self.calls.push(CanvasCall::SetDash(lengths.to_vec(), offset));
    }

    fn set_source(&mut self, source: &Source) {
        self.calls.push(CanvasCall::SetSource(source.clone()));
    }

    fn fill_preserve(&mut self) {
        self.calls.push(CanvasCall::FillPreserve);
    }

    fn stroke(&mut self) {
        self.calls.push(CanvasCall::Stroke);
    }

    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        TextExtents {
            width: 0.5 * font.size * text.chars().count() as f64,
            ascent: 0.8 * font.size,
            descent: 0.2 * font.size,
        }
    }

    fn show_text(&mut self, font: &FontSpec, text: &str) {
        self.calls.push(CanvasCall::ShowText {
            font: font.clone(),
            text: text.to_string(),
        });
    }

    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        self.calls.push(CanvasCall::PaintImage {
            width: image.width(),
            height: image.height(),
            x,
            y,
        });
    }
}
