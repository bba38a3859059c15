//! Graphics state that can be saved and restored.

use crate::matrix::Matrix;
use crate::pattern::Source;
use crate::style::{Dash, FillRule, LineCap, LineJoin};

/// One clip step: the device-space path intersected into the clip region.
/// `None` is an empty path, which clips everything away.
#[derive(Debug, Clone)]
pub(crate) struct ClipStep {
    pub path: Option<tiny_skia::Path>,
    pub rule: FillRule,
}

/// Graphics state that can be saved and restored.
#[derive(Debug, Clone)]
pub(crate) struct DrawingState {
    /// Current source paint.
    pub source: Source,
    /// Transform that was active when the source was set. Gradient patterns
    /// are locked to the user space of that moment.
    pub source_transform: Matrix,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub dash: Dash,
    pub fill_rule: FillRule,
    /// Current transformation matrix.
    pub transform: Matrix,
    /// Clip steps, intersected in order.
    pub clip: Vec<ClipStep>,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            source: Source::default(),
            source_transform: Matrix::identity(),
            line_width: 2.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash: Dash::default(),
            fill_rule: FillRule::default(),
            transform: Matrix::identity(),
            clip: Vec::new(),
        }
    }
}
