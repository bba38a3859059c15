//! Running a procedure against a fresh surface and writing the result.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kurbo::{Affine, Rect};
use scene_canvas::{fontdb, FontConfig, RasterCanvas, SvgCanvas, TextEngine};

use crate::context::{Diagnostic, RenderContext};
use crate::error::{RenderError, RenderResult};
use crate::procedure::{compile, Procedure};
use crate::scene::Node;

/// Width and height used when neither is given.
pub const DEFAULT_SIZE: f64 = 400.0;

/// The surface an encoder draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Png,
    Ps,
    Pdf,
    Svg,
    /// No surface and no file; the encoder only returns the procedure.
    RenderOnly,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputKind::Png => "PNG",
            OutputKind::Ps => "PostScript",
            OutputKind::Pdf => "PDF",
            OutputKind::Svg => "SVG",
            OutputKind::RenderOnly => "render-only",
        };
        f.write_str(name)
    }
}

impl OutputKind {
    /// Look up a kind by its file extension, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(OutputKind::Png),
            "ps" | "eps" => Some(OutputKind::Ps),
            "pdf" => Some(OutputKind::Pdf),
            "svg" => Some(OutputKind::Svg),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> RenderResult<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
            .ok_or_else(|| RenderError::UnknownExtension(path.to_path_buf()))
    }
}

/// Where and how to encode a render.
///
/// Unless `bypass_adjust` is set, the frame transform is applied to the
/// surface like any other transform, so line widths and dash lengths are in
/// scene units and scale with the fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSpec {
    pub destination: Option<PathBuf>,
    pub kind: OutputKind,
    pub width: f64,
    pub height: f64,
    /// Draw scene coordinates as they are, without fitting the scene to the
    /// output and flipping it upright. Line widths are then in output units.
    pub bypass_adjust: bool,
}

impl OutputSpec {
    /// Write to `destination`, choosing the kind from its extension.
    pub fn for_file(destination: impl Into<PathBuf>, width: f64, height: f64) -> RenderResult<Self> {
        let destination = destination.into();
        let kind = OutputKind::from_extension(&destination)?;
        Ok(Self {
            destination: Some(destination),
            kind,
            width,
            height,
            bypass_adjust: false,
        })
    }

    pub fn render_only(width: f64, height: f64) -> Self {
        Self {
            destination: None,
            kind: OutputKind::RenderOnly,
            width,
            height,
            bypass_adjust: false,
        }
    }

    pub fn with_kind(mut self, kind: OutputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_bypass_adjust(mut self, bypass: bool) -> Self {
        self.bypass_adjust = bypass;
        self
    }
}

/// Settings shared by every surface an encoder creates.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub font_config: FontConfig,
    /// Pixel density written into PNG metadata.
    pub ppi: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_config: FontConfig::default(),
            ppi: 72.0,
        }
    }
}

/// The result of an encode.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The procedure that was run, including the frame transform.
    pub procedure: Procedure,
    pub diagnostics: Vec<Diagnostic>,
    /// The file written, if any.
    pub output: Option<PathBuf>,
}

/// Fill in a missing width or height from the aspect ratio of `bounds`.
pub fn resolve_dimensions(width: Option<f64>, height: Option<f64>, bounds: Option<Rect>) -> (f64, f64) {
    let aspect = bounds
        .filter(|b| b.width() > 0.0 && b.height() > 0.0)
        .map(|b| b.width() / b.height())
        .unwrap_or(1.0);
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, w / aspect),
        (None, Some(h)) => (h * aspect, h),
        (None, None) => (DEFAULT_SIZE, DEFAULT_SIZE),
    }
}

/// Transform fitting `bounds` uniformly into `width` × `height`, centred,
/// with the Y axis flipped so scene Y points up the page.
pub fn frame_transform(bounds: Option<Rect>, width: f64, height: f64) -> Affine {
    let Some(bounds) = bounds else {
        return Affine::translate((0.0, height)) * Affine::FLIP_Y;
    };
    let (bw, bh) = (bounds.width(), bounds.height());
    let scale = match (bw > 0.0, bh > 0.0) {
        (true, true) => (width / bw).min(height / bh),
        (true, false) => width / bw,
        (false, true) => height / bh,
        (false, false) => 1.0,
    };
    Affine::translate((width / 2.0, height / 2.0))
        * Affine::FLIP_Y
        * Affine::scale(scale)
        * Affine::translate(-bounds.center().to_vec2())
}

/// Wrap `procedure` in the frame transform for its own bounds.
pub fn adjust(procedure: Procedure, width: f64, height: f64) -> Procedure {
    let transform = frame_transform(procedure.bounds(), width, height);
    procedure.framed(transform)
}

/// Encode with default options.
pub fn encode(spec: &OutputSpec, procedure: Procedure) -> RenderResult<Rendered> {
    encode_with_options(spec, procedure, &RenderOptions::default())
}

/// Compile `node` and encode it.
pub fn render_scene(node: &Node, spec: &OutputSpec, options: &RenderOptions) -> RenderResult<Rendered> {
    encode_with_options(spec, compile(node), options)
}

/// Run `procedure` once on a new surface of `spec.kind` and write the
/// destination. Every kind runs the same procedure.
pub fn encode_with_options(
    spec: &OutputSpec,
    procedure: Procedure,
    options: &RenderOptions,
) -> RenderResult<Rendered> {
    let procedure = if spec.bypass_adjust {
        procedure
    } else {
        adjust(procedure, spec.width, spec.height)
    };
    log::debug!(
        target: "render",
        "encode {} {}x{} ({} instructions)",
        spec.kind,
        spec.width,
        spec.height,
        procedure.len()
    );

    if spec.kind == OutputKind::RenderOnly {
        return Ok(Rendered {
            procedure,
            diagnostics: Vec::new(),
            output: None,
        });
    }
    let destination = spec
        .destination
        .clone()
        .ok_or(RenderError::MissingDestination(spec.kind))?;

    let diagnostics = match spec.kind {
        OutputKind::Png => write_png(&destination, spec, &procedure, options)?,
        OutputKind::Svg => {
            let file = BufWriter::new(File::create(&destination)?);
            let canvas = SvgCanvas::new(file, spec.width, spec.height, TextEngine::new(&options.font_config))?;
            let (canvas, diagnostics) = run(canvas, &procedure);
            canvas.finish()?.flush()?;
            diagnostics
        }
        OutputKind::Ps => write_ps(&destination, spec, &procedure, options)?,
        OutputKind::Pdf => {
            let db = options.font_config.to_fontdb();
            let canvas = SvgCanvas::new(
                Vec::new(),
                spec.width,
                spec.height,
                TextEngine::from_database(db.clone()),
            )?;
            let (canvas, diagnostics) = run(canvas, &procedure);
            let svg = String::from_utf8(canvas.finish()?)
                .map_err(|err| RenderError::Pdf(err.to_string()))?;
            std::fs::write(&destination, svg_to_pdf(&svg, db)?)?;
            diagnostics
        }
        OutputKind::RenderOnly => Vec::new(),
    };

    log::info!(target: "render", "wrote {}", destination.display());
    Ok(Rendered {
        procedure,
        diagnostics,
        output: Some(destination),
    })
}

fn run<C: scene_canvas::Canvas>(canvas: C, procedure: &Procedure) -> (C, Vec<Diagnostic>) {
    let mut ctx = RenderContext::new(canvas);
    procedure.run(&mut ctx);
    ctx.into_parts()
}

fn pixels(size: f64) -> u32 {
    size.round().max(0.0) as u32
}

fn write_png(
    destination: &Path,
    spec: &OutputSpec,
    procedure: &Procedure,
    options: &RenderOptions,
) -> RenderResult<Vec<Diagnostic>> {
    let canvas = RasterCanvas::with_config(pixels(spec.width), pixels(spec.height), &options.font_config)?;
    let (canvas, diagnostics) = run(canvas, procedure);
    std::fs::write(destination, canvas.to_png(Some(options.ppi))?)?;
    Ok(diagnostics)
}

#[cfg(feature = "ps")]
fn write_ps(
    destination: &Path,
    spec: &OutputSpec,
    procedure: &Procedure,
    options: &RenderOptions,
) -> RenderResult<Vec<Diagnostic>> {
    let mut canvas =
        scene_canvas::PsCanvas::new(spec.width, spec.height, TextEngine::new(&options.font_config))?;
    let eps = destination
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("eps"));
    canvas.set_eps(eps);
    let (canvas, diagnostics) = run(canvas, procedure);
    std::fs::write(destination, canvas.finish()?)?;
    Ok(diagnostics)
}

#[cfg(not(feature = "ps"))]
fn write_ps(
    _destination: &Path,
    _spec: &OutputSpec,
    _procedure: &Procedure,
    _options: &RenderOptions,
) -> RenderResult<Vec<Diagnostic>> {
    Err(RenderError::FeatureDisabled(OutputKind::Ps))
}

/// Convert an SVG document to a one-page PDF.
pub fn svg_to_pdf(svg: &str, fonts: fontdb::Database) -> RenderResult<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb = Arc::new(fonts);
    let tree = usvg::Tree::from_str(svg, &options)?;
    let pdf = svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )?;
    Ok(pdf)
}
