//! Image compositing for RasterCanvas.

use super::RasterCanvas;
use crate::image::RasterImage;
use crate::matrix::Matrix;

impl RasterCanvas {
    /// Composite `image` with its top-left corner at user `(x, y)`.
    pub(crate) fn draw_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        log::debug!(target: "canvas", "paint_image {}x{} at {} {}", image.width(), image.height(), x, y);
        let paint = tiny_skia::PixmapPaint {
            opacity: 1.0,
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Bilinear,
        };
        let transform = self.state.transform.pre_concat(&Matrix::translate(x, y));
        let clip_mask = self.create_clip_mask();
        self.pixmap.draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &paint,
            transform.into(),
            clip_mask.as_ref(),
        );
    }
}
