//! Raster surface on a tiny-skia pixmap.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;

use crate::canvas::Canvas;
use crate::drawing_state::DrawingState;
use crate::error::{CanvasError, CanvasResult};
use crate::font_config::FontConfig;
use crate::image::{demultiply, encode_png, RasterImage};
use crate::matrix::Matrix;
use crate::pattern::Source;
use crate::style::{Dash, FillRule, FontSpec, LineCap, LineJoin, RelCurveParams, TextExtents};
use crate::text::TextEngine;
use tiny_skia::Pixmap;

/// Maximum surface dimension (same as Chrome's canvas limit).
const MAX_DIMENSION: u32 = 32767;

/// A raster drawing surface.
///
/// Path points are transformed into device space as they are added, so the
/// path builder always holds device coordinates.
pub struct RasterCanvas {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixmap: Pixmap,
    pub(crate) text: TextEngine,
    pub(crate) state: DrawingState,
    state_stack: Vec<DrawingState>,
    pub(crate) path_builder: tiny_skia::PathBuilder,
    /// Current point in device space.
    pub(crate) current_x: f32,
    pub(crate) current_y: f32,
    /// Subpath start in device space (for close_path).
    pub(crate) subpath_start_x: f32,
    pub(crate) subpath_start_y: f32,
    pub(crate) has_current_point: bool,
}

impl RasterCanvas {
    /// Create a surface using `FontConfig::default()` (system fonts).
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        Self::with_config(width, height, &FontConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: &FontConfig) -> CanvasResult<Self> {
        Self::with_text_engine(width, height, TextEngine::new(config))
    }

    /// Create a surface that shapes text with an existing engine, avoiding a
    /// second system font scan.
    pub fn with_text_engine(width: u32, height: u32, text: TextEngine) -> CanvasResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        log::debug!(target: "canvas", "raster surface {}x{}", width, height);

        Ok(Self {
            width,
            height,
            pixmap,
            text,
            state: DrawingState::default(),
            state_stack: Vec::new(),
            path_builder: tiny_skia::PathBuilder::new(),
            current_x: 0.0,
            current_y: 0.0,
            subpath_start_x: 0.0,
            subpath_start_y: 0.0,
            has_current_point: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current transformation matrix.
    pub fn current_transform(&self) -> Matrix {
        self.state.transform
    }

    /// Non-premultiplied RGBA bytes, row-major.
    pub fn pixels(&self) -> Vec<u8> {
        demultiply(&self.pixmap)
    }

    /// Non-premultiplied RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode the surface as PNG. `ppi` is stored as pixel density (default 72).
    pub fn to_png(&self, ppi: Option<f32>) -> CanvasResult<Vec<u8>> {
        encode_png(self.width, self.height, &self.pixels(), ppi.unwrap_or(72.0))
    }
}

impl Canvas for RasterCanvas {
    fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    fn transform(&mut self, matrix: &Matrix) {
        log::debug!(target: "canvas", "transform {:?}", matrix.to_array());
        self.state.transform = self.state.transform.pre_concat(matrix);
    }

    fn new_path(&mut self) {
        self.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.move_to_user(x, y);
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        self.rel_line_to_user(dx, dy);
    }

    fn rel_curve_to(&mut self, params: &RelCurveParams) {
        self.rel_curve_to_user(params);
    }

    fn close_path(&mut self) {
        self.close_subpath();
    }

    fn clip(&mut self) {
        self.clip_current_path();
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width >= 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_dash(&mut self, lengths: &[f64], offset: f64) {
        // Negative or non-finite lengths leave the dash unchanged
        if lengths.iter().any(|l| !l.is_finite() || *l < 0.0) || !offset.is_finite() {
            return;
        }
        self.state.dash = Dash {
            lengths: lengths.to_vec(),
            offset,
        };
    }

    fn set_source(&mut self, source: &Source) {
        self.state.source = source.clone();
        self.state.source_transform = self.state.transform;
    }

    fn fill_preserve(&mut self) {
        self.fill_current_path();
    }

    fn stroke(&mut self) {
        self.stroke_current_path();
    }

    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        self.text.measure(font, text)
    }

    fn show_text(&mut self, font: &FontSpec, text: &str) {
        self.fill_text(font, text);
    }

    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        self.draw_image(image, x, y);
    }
}
