//! The scene tree: styled layers over path, text and image primitives.
//!
//! Scene coordinates have Y pointing up. Every type maps to JSON through
//! serde, so a scene can be written by hand or produced by another program.

use std::collections::BTreeMap;
use std::path::PathBuf;

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::style::Style;

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Primitive(Primitive),
    /// A style layer applied to every descendant.
    Styled { style: Style, children: Vec<Node> },
    /// Plain grouping with no drawing state of its own.
    Group(Vec<Node>),
}

impl Node {
    pub fn path(path: Path) -> Self {
        Node::Primitive(Primitive::Path(path))
    }

    pub fn text(text: Text) -> Self {
        Node::Primitive(Primitive::Text(text))
    }

    pub fn image(image: Image) -> Self {
        Node::Primitive(Primitive::Image(image))
    }

    pub fn styled(style: Style, children: Vec<Node>) -> Self {
        Node::Styled { style, children }
    }

    pub fn group(children: Vec<Node>) -> Self {
        Node::Group(children)
    }

    /// Bounding box of everything drawn under this node, or `None` for an
    /// empty tree.
    ///
    /// Paths contribute the hull of their control points, text its anchor
    /// point and images their transformed box. Clip paths are ignored.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Node::Primitive(primitive) => primitive.bounds(),
            Node::Styled { children, .. } | Node::Group(children) => children
                .iter()
                .filter_map(Node::bounds)
                .reduce(|a, b| a.union(b)),
        }
    }
}

/// The closed set of drawable primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Path(Path),
    Text(Text),
    Image(Image),
}

impl Primitive {
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Primitive::Path(path) => path.bounds(),
            Primitive::Text(text) => Some(text.bounds()),
            Primitive::Image(image) => Some(image.bounds()),
        }
    }
}

/// One or more sub-paths drawn as a single shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    pub subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    /// A closed axis-aligned rectangle with its lower left corner at `origin`.
    pub fn rect(origin: Point, width: f64, height: f64) -> Self {
        Self::polygon(&[
            origin,
            origin + Vec2::new(width, 0.0),
            origin + Vec2::new(width, height),
            origin + Vec2::new(0.0, height),
        ])
    }

    /// A closed polygon through `vertices`.
    pub fn polygon(vertices: &[Point]) -> Self {
        Self::new(vec![SubPath::through(SubPathKind::Loop, vertices)])
    }

    /// An open polyline through `vertices`.
    pub fn polyline(vertices: &[Point]) -> Self {
        Self::new(vec![SubPath::through(SubPathKind::Line, vertices)])
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.subpaths
            .iter()
            .map(SubPath::bounds)
            .reduce(|a, b| a.union(b))
    }
}

/// Whether a sub-path is open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubPathKind {
    Line,
    Loop,
}

/// A contiguous run of segments starting at an anchor point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPath {
    pub kind: SubPathKind,
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl SubPath {
    pub fn new(kind: SubPathKind, start: Point, segments: Vec<Segment>) -> Self {
        Self {
            kind,
            start,
            segments,
        }
    }

    pub fn line(start: Point, segments: Vec<Segment>) -> Self {
        Self::new(SubPathKind::Line, start, segments)
    }

    pub fn closed(start: Point, segments: Vec<Segment>) -> Self {
        Self::new(SubPathKind::Loop, start, segments)
    }

    /// Straight segments through `vertices`. A loop gets a final segment back
    /// to the first vertex.
    pub fn through(kind: SubPathKind, vertices: &[Point]) -> Self {
        let start = vertices.first().copied().unwrap_or(Point::ORIGIN);
        let mut segments: Vec<Segment> = vertices
            .windows(2)
            .map(|w| Segment::Linear(w[1] - w[0]))
            .collect();
        if kind == SubPathKind::Loop && vertices.len() > 1 {
            segments.push(Segment::Linear(start - vertices[vertices.len() - 1]));
        }
        Self::new(kind, start, segments)
    }

    pub fn is_loop(&self) -> bool {
        self.kind == SubPathKind::Loop
    }

    /// Hull of the anchor, every end point and every control point.
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::from_points(self.start, self.start);
        let mut current = self.start;
        for segment in &self.segments {
            if let Segment::Cubic(c1, c2, _) = segment {
                rect = rect.union_pt(current + *c1).union_pt(current + *c2);
            }
            current += segment.offset();
            rect = rect.union_pt(current);
        }
        rect
    }
}

/// A path segment. Every vector is relative to the point where the segment
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Linear(Vec2),
    /// Two control points and the end point.
    Cubic(Vec2, Vec2, Vec2),
}

impl Segment {
    /// Offset from the start of the segment to its end.
    pub fn offset(&self) -> Vec2 {
        match *self {
            Segment::Linear(end) | Segment::Cubic(_, _, end) => end,
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Segment::Linear(_))
    }
}

/// How text is positioned relative to the origin of its frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    /// Align a point of the text box, given as fractions of its width and
    /// height (`(0, 0)` is the bottom left, `(0.5, 0.5)` the centre).
    BoxAligned { x: f64, y: f64 },
    /// The start of the baseline sits on the origin.
    Baseline,
}

impl Default for TextAlignment {
    fn default() -> Self {
        TextAlignment::BoxAligned { x: 0.5, y: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub transform: Affine,
    /// Use the full transform. When false only its translation is kept, so
    /// the text is neither scaled nor rotated.
    #[serde(default = "default_local_frame")]
    pub local_frame: bool,
    #[serde(default)]
    pub alignment: TextAlignment,
    pub text: String,
}

fn default_local_frame() -> bool {
    true
}

impl Text {
    /// Text centred on `position`.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            transform: Affine::translate(position.to_vec2()),
            local_frame: true,
            alignment: TextAlignment::default(),
            text: text.into(),
        }
    }

    pub fn bounds(&self) -> Rect {
        let anchor = self.transform * Point::ORIGIN;
        Rect::from_points(anchor, anchor)
    }
}

/// An external raster image drawn into a `width` × `height` box centred on
/// the origin of its transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub resource: PathBuf,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub transform: Affine,
}

impl Image {
    pub fn new(resource: impl Into<PathBuf>, width: f64, height: f64) -> Self {
        Self {
            resource: resource.into(),
            width,
            height,
            transform: Affine::IDENTITY,
        }
    }

    pub fn bounds(&self) -> Rect {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let corner = |x: f64, y: f64| self.transform * Point::new(x, y);
        Rect::from_points(corner(-hw, -hh), corner(hw, hh))
            .union_pt(corner(hw, -hh))
            .union_pt(corner(-hw, hh))
    }
}

/// A scene file: either one scene or a collection of named scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneDocument {
    Single(Node),
    Named(BTreeMap<String, Node>),
}

impl SceneDocument {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Names of the scenes in a collection; empty for a single scene.
    pub fn names(&self) -> Vec<String> {
        match self {
            SceneDocument::Single(_) => Vec::new(),
            SceneDocument::Named(scenes) => scenes.keys().cloned().collect(),
        }
    }

    /// Pick the scene to render.
    ///
    /// A single scene is returned when no name is given. A collection with
    /// one entry needs no name either.
    pub fn select(&self, name: Option<&str>) -> RenderResult<&Node> {
        match (self, name) {
            (SceneDocument::Single(node), None) => Ok(node),
            (SceneDocument::Named(scenes), Some(name)) => {
                scenes
                    .get(name)
                    .ok_or_else(|| RenderError::UnknownSelection {
                        name: name.to_string(),
                        available: self.names(),
                    })
            }
            (SceneDocument::Named(scenes), None) => match scenes.values().next() {
                Some(node) if scenes.len() == 1 => Ok(node),
                _ => Err(RenderError::SelectionRequired(self.names())),
            },
            (SceneDocument::Single(_), Some(name)) => Err(RenderError::UnknownSelection {
                name: name.to_string(),
                available: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_closes_back_to_start() {
        let path = Path::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
        ]);
        let sub = &path.subpaths[0];
        assert!(sub.is_loop());
        assert_eq!(sub.segments.len(), 3);
        let end = sub
            .segments
            .iter()
            .fold(sub.start, |p, s| p + s.offset());
        assert_eq!(end, sub.start);
    }

    #[test]
    fn test_bounds_include_control_points() {
        let sub = SubPath::line(
            Point::new(0.0, 0.0),
            vec![Segment::Cubic(
                Vec2::new(0.0, 5.0),
                Vec2::new(2.0, -3.0),
                Vec2::new(2.0, 0.0),
            )],
        );
        assert_eq!(sub.bounds(), Rect::new(0.0, -3.0, 2.0, 5.0));
    }

    #[test]
    fn test_tree_bounds_union() {
        let tree = Node::group(vec![
            Node::path(Path::rect(Point::new(0.0, 0.0), 1.0, 1.0)),
            Node::styled(
                Style::new(),
                vec![Node::image(Image {
                    transform: Affine::translate((10.0, 10.0)),
                    ..Image::new("a.png", 4.0, 2.0)
                })],
            ),
        ]);
        assert_eq!(tree.bounds(), Some(Rect::new(0.0, 0.0, 12.0, 11.0)));
        assert_eq!(Node::group(vec![]).bounds(), None);
    }

    #[test]
    fn test_scene_json_round_trip() {
        let node = Node::styled(
            Style::new().line_width(2.0),
            vec![Node::text(Text::new(Point::new(1.0, 2.0), "hi"))],
        );
        let json = serde_json::to_string(&node).unwrap();
        let parsed: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_select_from_collection() {
        let json = r#"{
            "square": {"primitive": {"path": [
                {"kind": "loop", "start": {"x": 0, "y": 0},
                 "segments": [{"linear": {"x": 1, "y": 0}}]}
            ]}},
            "empty": {"group": []}
        }"#;
        let doc = SceneDocument::from_json(json).unwrap();
        assert_eq!(doc.names(), vec!["empty".to_string(), "square".to_string()]);
        assert!(matches!(doc.select(Some("square")), Ok(Node::Primitive(_))));
        assert!(matches!(
            doc.select(Some("circle")),
            Err(RenderError::UnknownSelection { .. })
        ));
        assert!(matches!(doc.select(None), Err(RenderError::SelectionRequired(_))));
    }

    #[test]
    fn test_single_scene_needs_no_selection() {
        let doc = SceneDocument::from_json(r#"{"group": []}"#).unwrap();
        assert_eq!(doc.select(None).unwrap(), &Node::group(vec![]));
        assert!(doc.names().is_empty());
    }
}
