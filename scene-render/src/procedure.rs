//! Compiling a scene tree into a replayable list of drawing instructions.

use std::ops::{Add, AddAssign};

use kurbo::{Affine, Rect};
use scene_canvas::Canvas;

use crate::context::RenderContext;
use crate::geometry::to_matrix;
use crate::path::build_path;
use crate::primitive::{render_image, render_path, render_text};
use crate::scene::{Image, Node, Path, Primitive, Text};
use crate::style::{attr, Attribute, Style};

/// One step of a drawing procedure.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Save, apply the canvas-level attributes of the style and merge it.
    EnterStyle(Style),
    /// Restore what the matching `EnterStyle` saved.
    ExitStyle,
    /// Save the canvas and concatenate a transform.
    EnterFrame(Affine),
    ExitFrame,
    Path(Path),
    Text(Text),
    Image(Image),
}

/// A compiled scene: instructions run in painter's order against any
/// number of render contexts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Procedure {
    instructions: Vec<Instruction>,
}

/// Compile `node` depth first.
pub fn compile(node: &Node) -> Procedure {
    let mut procedure = Procedure::new();
    compile_into(node, &mut procedure.instructions);
    log::debug!(target: "render", "compiled {} instructions", procedure.len());
    procedure
}

fn compile_into(node: &Node, out: &mut Vec<Instruction>) {
    match node {
        Node::Primitive(Primitive::Path(path)) => out.push(Instruction::Path(path.clone())),
        Node::Primitive(Primitive::Text(text)) => out.push(Instruction::Text(text.clone())),
        Node::Primitive(Primitive::Image(image)) => out.push(Instruction::Image(image.clone())),
        Node::Styled { style, children } => {
            out.push(Instruction::EnterStyle(style.clone()));
            for child in children {
                compile_into(child, out);
            }
            out.push(Instruction::ExitStyle);
        }
        Node::Group(children) => {
            for child in children {
                compile_into(child, out);
            }
        }
    }
}

impl Procedure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// This procedure drawn through `transform`.
    pub fn framed(self, transform: Affine) -> Procedure {
        let mut instructions = Vec::with_capacity(self.instructions.len() + 2);
        instructions.push(Instruction::EnterFrame(transform));
        instructions.extend(self.instructions);
        instructions.push(Instruction::ExitFrame);
        Procedure { instructions }
    }

    /// Bounding box of the primitives, ignoring frames and clips.
    pub fn bounds(&self) -> Option<Rect> {
        self.instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::Path(path) => path.bounds(),
                Instruction::Text(text) => Some(text.bounds()),
                Instruction::Image(image) => Some(image.bounds()),
                _ => None,
            })
            .reduce(|a, b| a.union(b))
    }

    /// Execute every instruction against `ctx`.
    pub fn run<C: Canvas>(&self, ctx: &mut RenderContext<C>) {
        for instruction in &self.instructions {
            match instruction {
                Instruction::EnterStyle(style) => enter_style(ctx, style),
                Instruction::ExitStyle => ctx.restore(),
                Instruction::EnterFrame(transform) => {
                    let canvas = ctx.canvas_mut();
                    canvas.save();
                    canvas.transform(&to_matrix(*transform));
                }
                Instruction::ExitFrame => ctx.canvas_mut().restore(),
                Instruction::Path(path) => render_path(ctx, path),
                Instruction::Text(text) => render_text(ctx, text),
                Instruction::Image(image) => render_image(ctx, image),
            }
        }
    }
}

fn enter_style<C: Canvas>(ctx: &mut RenderContext<C>, style: &Style) {
    ctx.save();
    for attribute in style.attributes() {
        if let Attribute::Clip(paths) = attribute {
            for path in paths {
                build_path(ctx, path);
                ctx.canvas_mut().clip();
            }
        }
    }
    let canvas = ctx.canvas_mut();
    if let Some(rule) = style.get::<attr::FillRule>() {
        canvas.set_fill_rule((*rule).into());
    }
    if let Some(width) = style.get::<attr::LineWidth>() {
        canvas.set_line_width(*width);
    }
    if let Some(cap) = style.get::<attr::LineCap>() {
        canvas.set_line_cap((*cap).into());
    }
    if let Some(join) = style.get::<attr::LineJoin>() {
        canvas.set_line_join((*join).into());
    }
    if let Some(dashing) = style.get::<attr::Dashing>() {
        canvas.set_dash(&dashing.lengths, dashing.offset);
    }
    ctx.accumulator_mut().merge_style(style);
}

impl From<&Node> for Procedure {
    fn from(node: &Node) -> Self {
        compile(node)
    }
}

impl Extend<Instruction> for Procedure {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        self.instructions.extend(iter);
    }
}

impl Extend<Procedure> for Procedure {
    fn extend<I: IntoIterator<Item = Procedure>>(&mut self, iter: I) {
        for procedure in iter {
            self.instructions.extend(procedure.instructions);
        }
    }
}

impl FromIterator<Procedure> for Procedure {
    fn from_iter<I: IntoIterator<Item = Procedure>>(iter: I) -> Self {
        let mut procedure = Procedure::new();
        procedure.extend(iter);
        procedure
    }
}

impl FromIterator<Instruction> for Procedure {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Procedure {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl Add for Procedure {
    type Output = Procedure;

    fn add(mut self, rhs: Procedure) -> Procedure {
        self += rhs;
        self
    }
}

impl AddAssign for Procedure {
    fn add_assign(&mut self, rhs: Procedure) {
        self.instructions.extend(rhs.instructions);
    }
}

impl<'a> IntoIterator for &'a Procedure {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
