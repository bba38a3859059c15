//! The state owned by one traversal: a canvas, the style accumulator and
//! the diagnostics collected along the way.

use std::fmt;

use scene_canvas::Canvas;

use crate::accumulator::StyleAccumulator;

/// A recoverable problem with one primitive. The primitive is skipped and
/// rendering continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct RenderContext<C: Canvas> {
    canvas: C,
    accumulator: StyleAccumulator,
    diagnostics: Vec<Diagnostic>,
}

impl<C: Canvas> RenderContext<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            accumulator: StyleAccumulator::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn accumulator(&self) -> &StyleAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut StyleAccumulator {
        &mut self.accumulator
    }

    /// Save the accumulator and the canvas together.
    pub fn save(&mut self) {
        self.accumulator.save();
        self.canvas.save();
    }

    /// Restore the accumulator and the canvas together.
    ///
    /// # Panics
    ///
    /// Panics when there is no matching `save`.
    pub fn restore(&mut self) {
        self.accumulator.restore();
        self.canvas.restore();
    }

    /// Record a diagnostic and log it.
    pub fn diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: "render", "{}", message);
        self.diagnostics.push(Diagnostic { message });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (C, Vec<Diagnostic>) {
        (self.canvas, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_canvas::{CanvasCall, RecordingCanvas};

    #[test]
    fn test_save_restore_pairs_both_stacks() {
        let mut recording = RecordingCanvas::new();
        let mut ctx = RenderContext::new(&mut recording);
        ctx.save();
        assert_eq!(ctx.accumulator().depth(), 1);
        ctx.restore();
        assert_eq!(ctx.accumulator().depth(), 0);
        drop(ctx);
        assert_eq!(recording.calls(), &[CanvasCall::Save, CanvasCall::Restore]);
    }

    #[test]
    fn test_diagnostics_are_collected() {
        let mut ctx = RenderContext::new(RecordingCanvas::new());
        ctx.diagnostic("first");
        ctx.diagnostic(String::from("second"));
        let (canvas, diagnostics) = ctx.into_parts();
        assert!(canvas.calls().is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].to_string(), "second");
    }
}
