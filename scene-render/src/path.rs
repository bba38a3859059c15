//! Turning scene paths into canvas path construction calls.

use scene_canvas::Canvas;

use crate::context::RenderContext;
use crate::geometry::{rel_curve, to_offset, to_point};
use crate::scene::{Path, Segment, SubPath, SubPathKind};

/// Replace the canvas path with `path`.
///
/// Clears the ignore-fill flag, then sets it again if any sub-path is open.
///
/// # Panics
///
/// Panics on a loop with no segments.
pub fn build_path<C: Canvas>(ctx: &mut RenderContext<C>, path: &Path) {
    ctx.canvas_mut().new_path();
    ctx.accumulator_mut().set_ignore_fill(false);
    for subpath in &path.subpaths {
        build_subpath(ctx, subpath);
    }
}

fn build_subpath<C: Canvas>(ctx: &mut RenderContext<C>, subpath: &SubPath) {
    let (x, y) = to_point(subpath.start);
    ctx.canvas_mut().move_to(x, y);
    match subpath.kind {
        SubPathKind::Line => {
            emit_segments(ctx.canvas_mut(), &subpath.segments);
            ctx.accumulator_mut().set_ignore_fill(true);
        }
        SubPathKind::Loop => {
            let Some((last, init)) = subpath.segments.split_last() else {
                panic!("loop sub-path has no segments");
            };
            // a final straight edge is drawn by close_path
            if last.is_linear() {
                emit_segments(ctx.canvas_mut(), init);
            } else {
                emit_segments(ctx.canvas_mut(), &subpath.segments);
            }
            ctx.canvas_mut().close_path();
        }
    }
}

fn emit_segments<C: Canvas>(canvas: &mut C, segments: &[Segment]) {
    for segment in segments {
        match *segment {
            Segment::Linear(offset) => {
                let (dx, dy) = to_offset(offset);
                canvas.rel_line_to(dx, dy);
            }
            Segment::Cubic(c1, c2, end) => canvas.rel_curve_to(&rel_curve(c1, c2, end)),
        }
    }
}
