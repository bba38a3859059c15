//! Decoded raster images and PNG encoding.

use crate::error::{CanvasError, CanvasResult};
use std::path::Path;
use tiny_skia::Pixmap;

/// A decoded raster image ready to be composited onto a surface.
///
/// Pixels are stored premultiplied, as tiny-skia expects.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    /// Decode a PNG file.
    pub fn load_png(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        log::debug!(target: "canvas", "load_png {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_png_bytes(&bytes)
    }

    /// Decode PNG data held in memory.
    pub fn from_png_bytes(bytes: &[u8]) -> CanvasResult<Self> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
        let rgba = decoded.to_rgba8();
        Self::from_rgba8(rgba.width(), rgba.height(), rgba.as_raw())
    }

    /// Build an image from non-premultiplied RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> CanvasResult<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(CanvasError::ImageDecode(format!(
                "Data length {} does not match {}x{} RGBA image",
                data.len(),
                width,
                height
            )));
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        for (pixel, chunk) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
            *pixel = tiny_skia::ColorU8::from_rgba(chunk[0], chunk[1], chunk[2], chunk[3])
                .premultiply();
        }
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Non-premultiplied RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        demultiply(&self.pixmap)
    }

    /// Encode as PNG at 72 ppi.
    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        encode_png(self.width(), self.height(), &self.to_rgba8(), 72.0)
    }
}

/// Convert premultiplied pixmap data to straight alpha.
pub(crate) fn demultiply(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    data
}

/// Encode straight-alpha RGBA data as PNG with pixel density metadata.
pub(crate) fn encode_png(width: u32, height: u32, rgba: &[u8], ppi: f32) -> CanvasResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        // Pixel density is stored in pixels per meter
        let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}
