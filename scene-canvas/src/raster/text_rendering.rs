//! Text rendering operations for RasterCanvas.

use super::RasterCanvas;
use crate::style::FontSpec;

impl RasterCanvas {
    /// Fill glyph outlines with the current source, baseline at the user
    /// origin.
    pub(crate) fn fill_text(&mut self, font: &FontSpec, text: &str) {
        log::debug!(target: "canvas", "show_text \"{}\" {} {}", text, font.family, font.size);
        let Some(path) = self.text.outline(font, text) else {
            return;
        };
        let transform = self.state.transform;
        let Some(paint) = self.paint(&transform) else {
            return;
        };
        let clip_mask = self.create_clip_mask();
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            transform.into(),
            clip_mask.as_ref(),
        );
    }
}
