//! Paint sources: flat colors and gradient patterns.

use crate::matrix::Matrix;

/// A non-premultiplied RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb` hex notation, alpha excluded.
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl From<Rgba> for tiny_skia::Color {
    fn from(c: Rgba) -> Self {
        tiny_skia::Color::from_rgba(
            c.r.clamp(0.0, 1.0) as f32,
            c.g.clamp(0.0, 1.0) as f32,
            c.b.clamp(0.0, 1.0) as f32,
            c.a.clamp(0.0, 1.0) as f32,
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    pub color: Rgba,
}

/// How a gradient paints outside its stop range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extend {
    #[default]
    Pad,
    Repeat,
    Reflect,
}

impl From<Extend> for tiny_skia::SpreadMode {
    fn from(extend: Extend) -> Self {
        match extend {
            Extend::Pad => tiny_skia::SpreadMode::Pad,
            Extend::Repeat => tiny_skia::SpreadMode::Repeat,
            Extend::Reflect => tiny_skia::SpreadMode::Reflect,
        }
    }
}

impl Extend {
    pub fn svg_name(self) -> &'static str {
        match self {
            Extend::Pad => "pad",
            Extend::Repeat => "repeat",
            Extend::Reflect => "reflect",
        }
    }
}

/// Gradient geometry in pattern space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientGeometry {
    /// Linear gradient from (x0, y0) to (x1, y1).
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Radial gradient from the start circle to the end circle.
    Radial {
        cx0: f64,
        cy0: f64,
        r0: f64,
        cx1: f64,
        cy1: f64,
        r1: f64,
    },
}

/// A gradient pattern.
///
/// `matrix` maps user space into pattern space, so a gradient declared in an
/// object's local frame carries the inverse of that frame's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub geometry: GradientGeometry,
    pub stops: Vec<ColorStop>,
    pub extend: Extend,
    pub matrix: Matrix,
}

impl Gradient {
    /// Create a new linear gradient.
    pub fn new_linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::with_geometry(GradientGeometry::Linear { x0, y0, x1, y1 })
    }

    /// Create a new radial gradient between two circles.
    pub fn new_radial(cx0: f64, cy0: f64, r0: f64, cx1: f64, cy1: f64, r1: f64) -> Self {
        Self::with_geometry(GradientGeometry::Radial {
            cx0,
            cy0,
            r0,
            cx1,
            cy1,
            r1,
        })
    }

    fn with_geometry(geometry: GradientGeometry) -> Self {
        Self {
            geometry,
            stops: Vec::new(),
            extend: Extend::Pad,
            matrix: Matrix::identity(),
        }
    }

    /// Append a color stop. Stops are kept in insertion order; offsets are
    /// expected to be non-decreasing.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba) {
        self.stops.push(ColorStop { offset, color });
    }

    pub fn set_extend(&mut self, extend: Extend) {
        self.extend = extend;
    }

    pub fn set_matrix(&mut self, matrix: Matrix) {
        self.matrix = matrix;
    }

    /// Pattern space to user space.
    pub fn pattern_to_user(&self) -> Matrix {
        self.matrix.invert().unwrap_or_default()
    }
}

/// The current source paint of a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Solid(Rgba),
    Gradient(Gradient),
}

impl Default for Source {
    fn default() -> Self {
        Source::Solid(Rgba::BLACK)
    }
}

/// Build a tiny-skia shader for `gradient` whose pattern space maps to the
/// shader's output space through `pattern_to_output`.
pub(crate) fn gradient_shader(
    gradient: &Gradient,
    pattern_to_output: Matrix,
) -> Option<tiny_skia::Shader<'static>> {
    if gradient.stops.is_empty() {
        return None;
    }
    let transform: tiny_skia::Transform = pattern_to_output.into();
    let spread = gradient.extend.into();

    match gradient.geometry {
        GradientGeometry::Linear { x0, y0, x1, y1 } => {
            let stops = skia_stops(&gradient.stops, |t| t);
            tiny_skia::LinearGradient::new(
                tiny_skia::Point::from_xy(x0 as f32, y0 as f32),
                tiny_skia::Point::from_xy(x1 as f32, y1 as f32),
                stops,
                spread,
                transform,
            )
        }
        GradientGeometry::Radial {
            cx0,
            cy0,
            r0,
            cx1,
            cy1,
            r1,
        } => {
            // tiny-skia's two-point gradient starts from a point, so a start
            // circle is approximated by remapping stops onto the end radius.
            let r0 = r0.max(0.0);
            let stops = if r1 > 0.0 && r0 > 0.0 {
                let mut stops = vec![tiny_skia::GradientStop::new(
                    0.0,
                    gradient.stops[0].color.into(),
                )];
                stops.extend(skia_stops(&gradient.stops, |t| (r0 + t * (r1 - r0)) / r1));
                stops
            } else {
                skia_stops(&gradient.stops, |t| t)
            };
            tiny_skia::RadialGradient::new(
                tiny_skia::Point::from_xy(cx0 as f32, cy0 as f32),
                tiny_skia::Point::from_xy(cx1 as f32, cy1 as f32),
                r1 as f32,
                stops,
                spread,
                transform,
            )
        }
    }
}

fn skia_stops(stops: &[ColorStop], remap: impl Fn(f64) -> f64) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|stop| {
            tiny_skia::GradientStop::new(remap(stop.offset).clamp(0.0, 1.0) as f32, stop.color.into())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::new(1.0, 0.0, 0.5, 1.0).to_hex(), "#ff0080");
    }

    #[test]
    fn test_stops_keep_insertion_order() {
        let mut g = Gradient::new_linear(0.0, 0.0, 1.0, 0.0);
        g.add_color_stop(0.0, Rgba::BLACK);
        g.add_color_stop(1.0, Rgba::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn test_empty_gradient_has_no_shader() {
        let g = Gradient::new_radial(0.0, 0.0, 0.0, 0.0, 0.0, 10.0);
        assert!(gradient_shader(&g, Matrix::identity()).is_none());
    }

    #[test]
    fn test_pattern_to_user_inverts_matrix() {
        let mut g = Gradient::new_linear(0.0, 0.0, 1.0, 0.0);
        g.set_matrix(Matrix::scale(0.5, 0.5));
        assert_eq!(g.pattern_to_user().transform_point(1.0, 1.0), (2.0, 2.0));
    }
}
