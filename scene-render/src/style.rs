//! Style layers: ordered lists of typed drawing attributes.
//!
//! A style is a sequence of [`Attribute`]s. Composing a child style onto a
//! parent concatenates them, and a lookup returns the last attribute of the
//! requested kind, so the child wins.

use serde::{Deserialize, Serialize};

use crate::paint::Paint;
use crate::scene::Path;

/// Fill rule for fills and clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    Winding,
    EvenOdd,
}

impl From<FillRule> for scene_canvas::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::Winding => scene_canvas::FillRule::Winding,
            FillRule::EvenOdd => scene_canvas::FillRule::EvenOdd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl From<LineCap> for scene_canvas::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => scene_canvas::LineCap::Butt,
            LineCap::Round => scene_canvas::LineCap::Round,
            LineCap::Square => scene_canvas::LineCap::Square,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl From<LineJoin> for scene_canvas::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => scene_canvas::LineJoin::Miter,
            LineJoin::Round => scene_canvas::LineJoin::Round,
            LineJoin::Bevel => scene_canvas::LineJoin::Bevel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl From<FontSlant> for scene_canvas::FontSlant {
    fn from(slant: FontSlant) -> Self {
        match slant {
            FontSlant::Normal => scene_canvas::FontSlant::Normal,
            FontSlant::Italic => scene_canvas::FontSlant::Italic,
            FontSlant::Oblique => scene_canvas::FontSlant::Oblique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl From<FontWeight> for scene_canvas::FontWeight {
    fn from(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => scene_canvas::FontWeight::NORMAL,
            FontWeight::Bold => scene_canvas::FontWeight::BOLD,
        }
    }
}

/// Dash lengths alternate on and off, starting `offset` into the pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashing {
    pub lengths: Vec<f64>,
    #[serde(default)]
    pub offset: f64,
}

/// A single drawing attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Clip to each path in turn.
    Clip(Vec<Path>),
    FillRule(FillRule),
    LineWidth(f64),
    LineCap(LineCap),
    LineJoin(LineJoin),
    Dashing(Dashing),
    FontFamily(String),
    FontSlant(FontSlant),
    FontWeight(FontWeight),
    FontSize(f64),
    FillPaint(Paint),
    StrokePaint(Paint),
    Opacity(f64),
}

/// A kind of attribute that can be looked up in a [`Style`].
pub trait AttributeKind {
    type Value: Clone;

    fn extract(attribute: &Attribute) -> Option<&Self::Value>;
}

/// Marker types naming each attribute kind, for [`Style::get`].
pub mod attr {
    use super::{Attribute, AttributeKind};

    macro_rules! attribute_kinds {
        ($($kind:ident => $value:ty),* $(,)?) => {
            $(
                pub struct $kind;

                impl AttributeKind for $kind {
                    type Value = $value;

                    fn extract(attribute: &Attribute) -> Option<&$value> {
                        match attribute {
                            Attribute::$kind(value) => Some(value),
                            _ => None,
                        }
                    }
                }
            )*
        };
    }

    attribute_kinds! {
        Clip => Vec<crate::scene::Path>,
        FillRule => super::FillRule,
        LineWidth => f64,
        LineCap => super::LineCap,
        LineJoin => super::LineJoin,
        Dashing => super::Dashing,
        FontFamily => String,
        FontSlant => super::FontSlant,
        FontWeight => super::FontWeight,
        FontSize => f64,
        FillPaint => crate::paint::Paint,
        StrokePaint => crate::paint::Paint,
        Opacity => f64,
    }
}

/// An ordered list of attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    attributes: Vec<Attribute>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.push(attribute);
        self
    }

    /// Compose `child` on top of this style.
    pub fn merge(&mut self, child: &Style) {
        self.attributes.extend(child.attributes.iter().cloned());
    }

    /// The last attribute of kind `K`.
    pub fn get<K: AttributeKind>(&self) -> Option<&K::Value> {
        self.attributes.iter().rev().find_map(K::extract)
    }

    pub fn clip(self, paths: Vec<Path>) -> Self {
        self.with(Attribute::Clip(paths))
    }

    pub fn fill_rule(self, rule: FillRule) -> Self {
        self.with(Attribute::FillRule(rule))
    }

    pub fn line_width(self, width: f64) -> Self {
        self.with(Attribute::LineWidth(width))
    }

    pub fn line_cap(self, cap: LineCap) -> Self {
        self.with(Attribute::LineCap(cap))
    }

    pub fn line_join(self, join: LineJoin) -> Self {
        self.with(Attribute::LineJoin(join))
    }

    pub fn dashing(self, lengths: Vec<f64>, offset: f64) -> Self {
        self.with(Attribute::Dashing(Dashing { lengths, offset }))
    }

    pub fn font_family(self, family: impl Into<String>) -> Self {
        self.with(Attribute::FontFamily(family.into()))
    }

    pub fn font_slant(self, slant: FontSlant) -> Self {
        self.with(Attribute::FontSlant(slant))
    }

    pub fn font_weight(self, weight: FontWeight) -> Self {
        self.with(Attribute::FontWeight(weight))
    }

    pub fn font_size(self, size: f64) -> Self {
        self.with(Attribute::FontSize(size))
    }

    pub fn fill(self, paint: Paint) -> Self {
        self.with(Attribute::FillPaint(paint))
    }

    pub fn stroke(self, paint: Paint) -> Self {
        self.with(Attribute::StrokePaint(paint))
    }

    pub fn opacity(self, opacity: f64) -> Self {
        self.with(Attribute::Opacity(opacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn test_last_attribute_wins() {
        let style = Style::new().line_width(1.0).line_cap(LineCap::Round).line_width(3.0);
        assert_eq!(style.get::<attr::LineWidth>(), Some(&3.0));
        assert_eq!(style.get::<attr::LineCap>(), Some(&LineCap::Round));
        assert_eq!(style.get::<attr::LineJoin>(), None);
    }

    #[test]
    fn test_merge_child_wins_and_parent_is_inherited() {
        let mut parent = Style::new()
            .fill(Paint::Solid(Color::rgb(1.0, 0.0, 0.0)))
            .font_size(12.0);
        let child = Style::new().fill(Paint::Solid(Color::rgb(0.0, 0.0, 1.0)));
        parent.merge(&child);
        assert_eq!(
            parent.get::<attr::FillPaint>(),
            Some(&Paint::Solid(Color::rgb(0.0, 0.0, 1.0)))
        );
        assert_eq!(parent.get::<attr::FontSize>(), Some(&12.0));
    }

    #[test]
    fn test_attribute_json_shape() {
        let style = Style::new().line_width(2.0).fill_rule(FillRule::EvenOdd);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"line_width": 2.0}, {"fill_rule": "even_odd"}])
        );
    }
}
