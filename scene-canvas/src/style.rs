//! Drawing parameters shared by all surfaces.

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

impl LineCap {
    pub fn svg_name(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

impl LineJoin {
    pub fn svg_name(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Fill rule for fill and clip operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    #[default]
    Winding,
    /// Even-odd rule.
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::Winding => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

impl FillRule {
    pub fn svg_name(self) -> &'static str {
        match self {
            FillRule::Winding => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

/// Dash pattern: alternating on/off lengths plus a starting offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dash {
    pub lengths: Vec<f64>,
    pub offset: f64,
}

impl Dash {
    /// An empty dash list means a solid line.
    pub fn is_solid(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Build a tiny-skia stroke dash. Odd-length lists are repeated once, the
    /// way cairo and SVG treat them.
    pub fn to_stroke_dash(&self) -> Option<tiny_skia::StrokeDash> {
        if self.is_solid() {
            return None;
        }
        let mut lengths: Vec<f32> = self.lengths.iter().map(|l| *l as f32).collect();
        if lengths.len() % 2 == 1 {
            lengths.extend_from_within(..);
        }
        tiny_skia::StrokeDash::new(lengths, self.offset as f32)
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font weight on the CSS 1..=1000 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn is_bold(self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

/// Font selection used for measuring and showing text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub slant: FontSlant,
    pub weight: FontWeight,
    /// Size in user units.
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            slant: FontSlant::Normal,
            weight: FontWeight::NORMAL,
            size: 10.0,
        }
    }
}

/// Logical extents of a run of text in user units.
///
/// `ascent` is the distance above the baseline, `descent` below it; both are
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextExtents {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Parameters for a relative cubic Bezier: control points and end point are
/// offsets from the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelCurveParams {
    pub dx1: f64,
    pub dy1: f64,
    pub dx2: f64,
    pub dy2: f64,
    pub dx: f64,
    pub dy: f64,
}
