//! Drawing surfaces with a cairo-style context API.
//!
//! Every surface implements the [`Canvas`] trait:
//! - [`RasterCanvas`] renders into a `tiny-skia` pixmap and encodes PNG
//! - [`SvgCanvas`] streams an SVG document with `quick-xml`
//! - `PsCanvas` renders a one-page PostScript document through cairo
//!   (`ps` feature)
//! - [`RecordingCanvas`] records calls for inspection
//!
//! Text is shaped by [`TextEngine`] (`cosmic-text` over a `fontdb` database
//! built from [`FontConfig`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use scene_canvas::{Canvas, RasterCanvas, Rgba, Source};
//!
//! let mut canvas = RasterCanvas::new(400, 300)?;
//! canvas.set_source(&Source::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0)));
//! canvas.move_to(10.0, 10.0);
//! canvas.rel_line_to(100.0, 0.0);
//! canvas.rel_line_to(0.0, 50.0);
//! canvas.close_path();
//! canvas.fill_preserve();
//! let png_data = canvas.to_png(None)?;
//! ```

mod canvas;
mod document;
mod drawing_state;
mod error;
mod font_config;
mod image;
mod matrix;
mod pattern;
#[cfg(feature = "ps")]
mod ps;
mod raster;
mod recording;
mod style;
mod svg;
mod text;

// Re-export public API
pub use canvas::Canvas;
pub use error::{CanvasError, CanvasResult};
pub use font_config::{FontConfig, GenericFamilyMap};
pub use image::RasterImage;
pub use matrix::Matrix;
pub use pattern::{ColorStop, Extend, Gradient, GradientGeometry, Rgba, Source};
#[cfg(feature = "ps")]
pub use ps::PsCanvas;
pub use raster::RasterCanvas;
pub use recording::{CanvasCall, RecordingCanvas};
pub use style::{
    Dash, FillRule, FontSlant, FontSpec, FontWeight, LineCap, LineJoin, RelCurveParams,
    TextExtents,
};
pub use svg::SvgCanvas;
pub use text::TextEngine;

/// Re-exported so callers can share the font database (e.g. with usvg).
pub use fontdb;
