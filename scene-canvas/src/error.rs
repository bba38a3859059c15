//! Error types for scene-canvas.

use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while creating, drawing to, or finishing a surface.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Invalid surface dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Image could not be read or decoded.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// SVG document writing error.
    #[error("SVG write error: {0}")]
    SvgWrite(String),

    /// PostScript surface error.
    #[error("PostScript error: {0}")]
    PsWrite(String),

    /// Underlying I/O failure of a document surface.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for CanvasError {
    fn from(err: png::EncodingError) -> Self {
        CanvasError::PngError(err.to_string())
    }
}

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        CanvasError::ImageDecode(err.to_string())
    }
}

impl From<quick_xml::Error> for CanvasError {
    fn from(err: quick_xml::Error) -> Self {
        CanvasError::SvgWrite(err.to_string())
    }
}
