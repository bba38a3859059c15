//! Path and state bookkeeping shared by the document surfaces.

use crate::matrix::Matrix;
use crate::pattern::Source;
use crate::style::{Dash, FillRule, LineCap, LineJoin, RelCurveParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PathCmd {
    Move(f64, f64),
    Line(f64, f64),
    Cubic(f64, f64, f64, f64, f64, f64),
    Close,
}

impl PathCmd {
    fn mapped(self, m: &Matrix) -> PathCmd {
        match self {
            PathCmd::Move(x, y) => {
                let (x, y) = m.transform_point(x, y);
                PathCmd::Move(x, y)
            }
            PathCmd::Line(x, y) => {
                let (x, y) = m.transform_point(x, y);
                PathCmd::Line(x, y)
            }
            PathCmd::Cubic(x1, y1, x2, y2, x, y) => {
                let (x1, y1) = m.transform_point(x1, y1);
                let (x2, y2) = m.transform_point(x2, y2);
                let (x, y) = m.transform_point(x, y);
                PathCmd::Cubic(x1, y1, x2, y2, x, y)
            }
            PathCmd::Close => PathCmd::Close,
        }
    }
}

/// The current path, held as absolute device-space commands.
#[derive(Debug, Clone, Default)]
pub(crate) struct DevicePath {
    cmds: Vec<PathCmd>,
    current: Option<(f64, f64)>,
    start: (f64, f64),
}

impl DevicePath {
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.current = None;
    }

    pub fn take(&mut self) -> Vec<PathCmd> {
        self.current = None;
        std::mem::take(&mut self.cmds)
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn move_to(&mut self, ctm: &Matrix, x: f64, y: f64) {
        let p = ctm.transform_point(x, y);
        self.cmds.push(PathCmd::Move(p.0, p.1));
        self.current = Some(p);
        self.start = p;
    }

    fn origin(&mut self, ctm: &Matrix) -> (f64, f64) {
        match self.current {
            Some(p) => p,
            None => {
                self.move_to(ctm, 0.0, 0.0);
                self.start
            }
        }
    }

    pub fn rel_line_to(&mut self, ctm: &Matrix, dx: f64, dy: f64) {
        let (ox, oy) = self.origin(ctm);
        let (dx, dy) = ctm.transform_distance(dx, dy);
        let p = (ox + dx, oy + dy);
        self.cmds.push(PathCmd::Line(p.0, p.1));
        self.current = Some(p);
    }

    pub fn rel_curve_to(&mut self, ctm: &Matrix, params: &RelCurveParams) {
        let (ox, oy) = self.origin(ctm);
        let (c1x, c1y) = ctm.transform_distance(params.dx1, params.dy1);
        let (c2x, c2y) = ctm.transform_distance(params.dx2, params.dy2);
        let (ex, ey) = ctm.transform_distance(params.dx, params.dy);
        self.cmds.push(PathCmd::Cubic(
            ox + c1x,
            oy + c1y,
            ox + c2x,
            oy + c2y,
            ox + ex,
            oy + ey,
        ));
        self.current = Some((ox + ex, oy + ey));
    }

    pub fn close(&mut self) {
        if self.current.is_some() {
            self.cmds.push(PathCmd::Close);
            self.current = Some(self.start);
        }
    }
}

/// Map every command of a device-space path through `m`.
pub(crate) fn map_path(cmds: &[PathCmd], m: &Matrix) -> Vec<PathCmd> {
    cmds.iter().map(|c| c.mapped(m)).collect()
}

/// Graphics state tracked by the document surfaces.
#[derive(Debug, Clone)]
pub(crate) struct DocState {
    pub transform: Matrix,
    pub source: Source,
    pub source_transform: Matrix,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub dash: Dash,
    pub fill_rule: FillRule,
    /// Groups opened since the matching save.
    pub open_groups: usize,
}

impl Default for DocState {
    fn default() -> Self {
        Self {
            transform: Matrix::identity(),
            source: Source::default(),
            source_transform: Matrix::identity(),
            line_width: 2.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            dash: Dash::default(),
            fill_rule: FillRule::default(),
            open_groups: 0,
        }
    }
}

impl DocState {
    /// Pattern space of the current gradient source to device space.
    pub fn pattern_to_device(&self) -> Matrix {
        match &self.source {
            Source::Gradient(g) => self.source_transform.pre_concat(&g.pattern_to_user()),
            Source::Solid(_) => Matrix::identity(),
        }
    }
}

/// Compact decimal formatting for document output.
pub(crate) fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}
