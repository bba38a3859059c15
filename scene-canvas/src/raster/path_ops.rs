//! Path building operations for RasterCanvas.

use super::RasterCanvas;
use crate::style::RelCurveParams;

impl RasterCanvas {
    pub(crate) fn begin_path(&mut self) {
        log::debug!(target: "canvas", "new_path");
        self.path_builder = tiny_skia::PathBuilder::new();
        self.has_current_point = false;
    }

    /// Transform a user-space point by the current transformation matrix.
    pub(crate) fn transform_point(&self, x: f64, y: f64) -> (f32, f32) {
        let (x, y) = self.state.transform.transform_point(x, y);
        (x as f32, y as f32)
    }

    /// Transform a user-space offset into a device-space offset.
    fn transform_distance(&self, dx: f64, dy: f64) -> (f32, f32) {
        let (dx, dy) = self.state.transform.transform_distance(dx, dy);
        (dx as f32, dy as f32)
    }

    pub(crate) fn move_to_user(&mut self, x: f64, y: f64) {
        log::debug!(target: "canvas", "move_to {} {}", x, y);
        let (tx, ty) = self.transform_point(x, y);
        self.path_builder.move_to(tx, ty);
        self.current_x = tx;
        self.current_y = ty;
        self.subpath_start_x = tx;
        self.subpath_start_y = ty;
        self.has_current_point = true;
    }

    /// Relative operations without a current point start from the origin.
    fn ensure_current_point(&mut self) {
        if !self.has_current_point {
            self.move_to_user(0.0, 0.0);
        }
    }

    pub(crate) fn rel_line_to_user(&mut self, dx: f64, dy: f64) {
        log::debug!(target: "canvas", "rel_line_to {} {}", dx, dy);
        self.ensure_current_point();
        let (ddx, ddy) = self.transform_distance(dx, dy);
        let (x, y) = (self.current_x + ddx, self.current_y + ddy);
        self.path_builder.line_to(x, y);
        self.current_x = x;
        self.current_y = y;
    }

    pub(crate) fn rel_curve_to_user(&mut self, params: &RelCurveParams) {
        log::debug!(
            target: "canvas",
            "rel_curve_to {} {} {} {} {} {}",
            params.dx1, params.dy1, params.dx2, params.dy2, params.dx, params.dy
        );
        self.ensure_current_point();
        let (ox, oy) = (self.current_x, self.current_y);
        let (c1x, c1y) = self.transform_distance(params.dx1, params.dy1);
        let (c2x, c2y) = self.transform_distance(params.dx2, params.dy2);
        let (ex, ey) = self.transform_distance(params.dx, params.dy);
        self.path_builder
            .cubic_to(ox + c1x, oy + c1y, ox + c2x, oy + c2y, ox + ex, oy + ey);
        self.current_x = ox + ex;
        self.current_y = oy + ey;
    }

    pub(crate) fn close_subpath(&mut self) {
        log::debug!(target: "canvas", "close_path");
        if !self.has_current_point {
            return;
        }
        self.path_builder.close();
        self.current_x = self.subpath_start_x;
        self.current_y = self.subpath_start_y;
    }

    /// Take the current path out of the builder, leaving it empty.
    pub(crate) fn take_path(&mut self) -> Option<tiny_skia::Path> {
        let builder = std::mem::replace(&mut self.path_builder, tiny_skia::PathBuilder::new());
        self.has_current_point = false;
        builder.finish()
    }
}
