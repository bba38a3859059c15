//! Error types for scene-render.

use std::path::PathBuf;

use scene_canvas::CanvasError;
use thiserror::Error;

use crate::output::OutputKind;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while encoding a rendered scene.
///
/// Failures of a single primitive (an unsupported or unreadable image) are
/// not errors; they are collected as diagnostics on the render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface could not be created, drawn or finished.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output file name has no extension or one that is not recognized.
    #[error("Unknown output extension for {}: expected .png, .ps, .pdf or .svg", .0.display())]
    UnknownExtension(PathBuf),

    /// A file-producing output was requested without a destination.
    #[error("{0} output requires a destination path")]
    MissingDestination(OutputKind),

    /// The output kind was compiled out of this build.
    #[error("{0} output is not available; rebuild with the `ps` feature")]
    FeatureDisabled(OutputKind),

    /// The requested scene name is not present in a scene collection.
    #[error("Unknown selection {name:?}; available: {}", .available.join(", "))]
    UnknownSelection { name: String, available: Vec<String> },

    /// A scene collection holds several scenes and none was selected.
    #[error("A selection is required; available: {}", .0.join(", "))]
    SelectionRequired(Vec<String>),

    /// The scene document could not be parsed.
    #[error("Invalid scene: {0}")]
    Scene(#[from] serde_json::Error),

    /// The SVG rendition could not be parsed for PDF conversion.
    #[error("Failed to parse SVG for PDF conversion: {0}")]
    SvgParse(#[from] usvg::Error),

    /// svg2pdf failed to write the document.
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

impl From<svg2pdf::ConversionError> for RenderError {
    fn from(err: svg2pdf::ConversionError) -> Self {
        RenderError::Pdf(format!("{:?}", err))
    }
}
