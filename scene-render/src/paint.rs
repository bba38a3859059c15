//! Paint sources and their resolution into canvas sources.

use kurbo::{Affine, Point};
use scene_canvas::{Canvas, Extend, Gradient, Matrix, Rgba, Source};
use serde::{Deserialize, Serialize};

use crate::context::RenderContext;
use crate::geometry::to_matrix;
use crate::style::attr;

/// A non-premultiplied color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        Rgba::new(color.r, color.g, color.b, color.a)
    }
}

/// How a gradient continues past its first and last stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

impl From<Spread> for Extend {
    fn from(spread: Spread) -> Self {
        match spread {
            Spread::Pad => Extend::Pad,
            Spread::Reflect => Extend::Reflect,
            Spread::Repeat => Extend::Repeat,
        }
    }
}

/// A gradient stop. Fractions should be non-decreasing along the list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub fraction: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(fraction: f64, color: Color) -> Self {
        Self { fraction, color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub spread: Spread,
    /// Maps the gradient's own frame into scene coordinates.
    #[serde(default)]
    pub transform: Affine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub center0: Point,
    pub radius0: f64,
    pub center1: Point,
    pub radius1: f64,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub spread: Spread,
    /// Maps the gradient's own frame into scene coordinates.
    #[serde(default)]
    pub transform: Affine,
}

impl RadialGradient {
    /// The start circle's centre as handed to the canvas:
    /// `center0 * (radius1 - radius0) / radius1`.
    ///
    /// With `radius1 == 0` the centre is passed through unchanged.
    pub fn resolved_center0(&self) -> Point {
        if self.radius1 == 0.0 {
            return self.center0;
        }
        let k = (self.radius1 - self.radius0) / self.radius1;
        Point::new(self.center0.x * k, self.center0.y * k)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

/// Resolve `paint` into a canvas source.
///
/// `opacity` scales the alpha of a solid color. Gradient stops keep their
/// own alpha.
pub fn resolve(paint: &Paint, opacity: f64) -> Source {
    match paint {
        Paint::Solid(color) => {
            let rgba: Rgba = (*color).into();
            Source::Solid(rgba.with_alpha(opacity * color.a))
        }
        Paint::LinearGradient(linear) => {
            let mut gradient =
                Gradient::new_linear(linear.start.x, linear.start.y, linear.end.x, linear.end.y);
            finish_gradient(&mut gradient, &linear.stops, linear.spread, linear.transform);
            Source::Gradient(gradient)
        }
        Paint::RadialGradient(radial) => {
            let center0 = radial.resolved_center0();
            let mut gradient = Gradient::new_radial(
                center0.x,
                center0.y,
                radial.radius0,
                radial.center1.x,
                radial.center1.y,
                radial.radius1,
            );
            finish_gradient(&mut gradient, &radial.stops, radial.spread, radial.transform);
            Source::Gradient(gradient)
        }
    }
}

fn finish_gradient(gradient: &mut Gradient, stops: &[GradientStop], spread: Spread, transform: Affine) {
    for stop in stops {
        gradient.add_color_stop(stop.fraction, stop.color.into());
    }
    gradient.set_extend(spread.into());
    let matrix = match to_matrix(transform).invert() {
        Some(inverse) => inverse,
        None => {
            log::warn!(target: "render", "gradient transform is not invertible; using identity");
            Matrix::identity()
        }
    };
    gradient.set_matrix(matrix);
}

/// Install `paint` as the canvas source, using the accumulated opacity.
/// Nothing happens when `paint` is `None`.
pub fn set_texture<C: Canvas>(ctx: &mut RenderContext<C>, paint: Option<&Paint>) {
    let Some(paint) = paint else {
        return;
    };
    let opacity = ctx.accumulator().attribute::<attr::Opacity>().unwrap_or(1.0);
    let source = resolve(paint, opacity);
    ctx.canvas_mut().set_source(&source);
}
