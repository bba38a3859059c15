//! Compile styled 2D scene trees into drawing commands.
//!
//! A [`Node`] tree is compiled into a [`Procedure`], a flat list of
//! instructions that can be run against any [`scene_canvas::Canvas`]. The
//! output encoder runs it on a PNG, PostScript, PDF or SVG surface.
//!
//! # Example
//!
//! ```rust,ignore
//! use kurbo::Point;
//! use scene_render::{compile, encode, Color, Node, OutputSpec, Paint, Path, Style};
//!
//! let scene = Node::styled(
//!     Style::new().fill(Paint::Solid(Color::rgb(1.0, 0.0, 0.0))),
//!     vec![Node::path(Path::rect(Point::ORIGIN, 1.0, 1.0))],
//! );
//! let spec = OutputSpec::for_file("square.png", 400.0, 400.0)?;
//! let rendered = encode(&spec, compile(&scene))?;
//! ```

pub mod accumulator;
pub mod context;
pub mod error;
pub mod geometry;
pub mod output;
pub mod paint;
pub mod path;
pub mod primitive;
pub mod procedure;
pub mod scene;
pub mod style;

pub use accumulator::StyleAccumulator;
pub use context::{Diagnostic, RenderContext};
pub use error::{RenderError, RenderResult};
pub use output::{
    encode, encode_with_options, render_scene, OutputKind, OutputSpec, RenderOptions, Rendered,
};
pub use paint::{Color, GradientStop, LinearGradient, Paint, RadialGradient, Spread};
pub use procedure::{compile, Instruction, Procedure};
pub use scene::{
    Image, Node, Path, Primitive, SceneDocument, Segment, SubPath, SubPathKind, Text,
    TextAlignment,
};
pub use style::{attr, Attribute, Dashing, Style};

pub use kurbo;
pub use scene_canvas;
