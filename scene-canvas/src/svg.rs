//! SVG document surface using a streaming XML writer.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::canvas::Canvas;
use crate::document::{fmt_num, map_path, DevicePath, DocState, PathCmd};
use crate::error::{CanvasError, CanvasResult};
use crate::image::RasterImage;
use crate::matrix::Matrix;
use crate::pattern::{Gradient, GradientGeometry, Source};
use crate::style::{
    Dash, FillRule, FontSlant, FontSpec, LineCap, LineJoin, RelCurveParams, TextExtents,
};
use crate::text::TextEngine;

/// A surface that streams an SVG document into `W`.
///
/// Write failures are sticky: drawing calls become no-ops after the first
/// failure and [`SvgCanvas::finish`] reports it.
pub struct SvgCanvas<W: Write> {
    writer: Writer<W>,
    text: TextEngine,
    path: DevicePath,
    state: DocState,
    stack: Vec<DocState>,
    next_id: usize,
    error: Option<CanvasError>,
}

impl<W: Write> SvgCanvas<W> {
    /// Start a document of `width` × `height` user units and emit the root
    /// `<svg>` element.
    pub fn new(inner: W, width: f64, height: f64, text: TextEngine) -> CanvasResult<Self> {
        let mut canvas = Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            text,
            path: DevicePath::default(),
            state: DocState::default(),
            stack: Vec::new(),
            next_id: 0,
            error: None,
        };
        log::debug!(target: "canvas", "svg surface {}x{}", width, height);

        canvas.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
        let width_attr = fmt_num(width);
        let height_attr = fmt_num(height);
        let view_box_attr = format!("0 0 {} {}", width_attr, height_attr);
        let mut start = BytesStart::new("svg");
        start.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        start.push_attribute(("xmlns:xlink", "http://www.w3.org/1999/xlink"));
        start.push_attribute(("version", "1.1"));
        start.push_attribute(("width", width_attr.as_str()));
        start.push_attribute(("height", height_attr.as_str()));
        start.push_attribute(("viewBox", view_box_attr.as_str()));
        canvas.emit(Event::Start(start));

        match canvas.error.take() {
            Some(err) => Err(err),
            None => Ok(canvas),
        }
    }

    /// Close every open group and the root element, returning the sink.
    pub fn finish(mut self) -> CanvasResult<W> {
        let mut open = self.state.open_groups;
        open += self.stack.iter().map(|s| s.open_groups).sum::<usize>();
        for _ in 0..open {
            self.emit(Event::End(BytesEnd::new("g")));
        }
        self.emit(Event::End(BytesEnd::new("svg")));
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writer.into_inner()),
        }
    }

    fn emit(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.writer.write_event(event) {
            self.error = Some(CanvasError::SvgWrite(err.to_string()));
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        let id = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Paint attribute value and opacity for the current source. Gradients
    /// are emitted as defs whose coordinates are mapped into the space of the
    /// element through `element_to_device`.
    fn paint_value(&mut self, element_to_device: &Matrix) -> Option<(String, f64)> {
        let source = self.state.source.clone();
        match source {
            Source::Solid(color) => Some((color.to_hex(), color.a.clamp(0.0, 1.0))),
            Source::Gradient(gradient) => {
                if gradient.stops.is_empty() {
                    return None;
                }
                let pattern_to_element = element_to_device
                    .invert()?
                    .pre_concat(&self.state.pattern_to_device());
                let id = self.fresh_id("grad");
                self.write_gradient_def(&id, &gradient, &pattern_to_element);
                Some((format!("url(#{})", id), 1.0))
            }
        }
    }

    fn write_gradient_def(&mut self, id: &str, gradient: &Gradient, transform: &Matrix) {
        self.emit(Event::Start(BytesStart::new("defs")));

        let tag = match gradient.geometry {
            GradientGeometry::Linear { .. } => "linearGradient",
            GradientGeometry::Radial { .. } => "radialGradient",
        };
        let mut elem = BytesStart::new(tag);
        elem.push_attribute(("id", id));
        elem.push_attribute(("gradientUnits", "userSpaceOnUse"));
        let transform_attr = matrix_attr(transform);
        elem.push_attribute(("gradientTransform", transform_attr.as_str()));
        elem.push_attribute(("spreadMethod", gradient.extend.svg_name()));
        match gradient.geometry {
            GradientGeometry::Linear { x0, y0, x1, y1 } => {
                for (name, value) in [("x1", x0), ("y1", y0), ("x2", x1), ("y2", y1)] {
                    elem.push_attribute((name, fmt_num(value).as_str()));
                }
            }
            GradientGeometry::Radial {
                cx0,
                cy0,
                r0,
                cx1,
                cy1,
                r1,
            } => {
                for (name, value) in [
                    ("cx", cx1),
                    ("cy", cy1),
                    ("r", r1),
                    ("fx", cx0),
                    ("fy", cy0),
                    ("fr", r0),
                ] {
                    elem.push_attribute((name, fmt_num(value).as_str()));
                }
            }
        }
        self.emit(Event::Start(elem));

        for stop in &gradient.stops {
            let mut stop_elem = BytesStart::new("stop");
            stop_elem.push_attribute(("offset", fmt_num(stop.offset.clamp(0.0, 1.0)).as_str()));
            stop_elem.push_attribute(("stop-color", stop.color.to_hex().as_str()));
            if stop.color.a < 1.0 {
                stop_elem.push_attribute(("stop-opacity", fmt_num(stop.color.a).as_str()));
            }
            self.emit(Event::Empty(stop_elem));
        }

        self.emit(Event::End(BytesEnd::new(tag)));
        self.emit(Event::End(BytesEnd::new("defs")));
    }
}

fn matrix_attr(m: &Matrix) -> String {
    let [a, b, c, d, e, f] = m.to_array().map(fmt_num);
    format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f)
}

fn path_data(cmds: &[PathCmd]) -> String {
    let mut d = String::new();
    for cmd in cmds {
        if !d.is_empty() {
            d.push(' ');
        }
        match *cmd {
            PathCmd::Move(x, y) => d.push_str(&format!("M {} {}", fmt_num(x), fmt_num(y))),
            PathCmd::Line(x, y) => d.push_str(&format!("L {} {}", fmt_num(x), fmt_num(y))),
            PathCmd::Cubic(x1, y1, x2, y2, x, y) => d.push_str(&format!(
                "C {} {} {} {} {} {}",
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(x2),
                fmt_num(y2),
                fmt_num(x),
                fmt_num(y)
            )),
            PathCmd::Close => d.push('Z'),
        }
    }
    d
}

fn dash_attr(dash: &Dash) -> String {
    dash.lengths
        .iter()
        .map(|l| fmt_num(*l))
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> Canvas for SvgCanvas<W> {
    fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.stack.push(self.state.clone());
        self.state.open_groups = 0;
    }

    fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        let Some(saved) = self.stack.pop() else {
            return;
        };
        for _ in 0..self.state.open_groups {
            self.emit(Event::End(BytesEnd::new("g")));
        }
        self.state = saved;
    }

    fn transform(&mut self, matrix: &Matrix) {
        self.state.transform = self.state.transform.pre_concat(matrix);
    }

    fn new_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(&self.state.transform, x, y);
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        self.path.rel_line_to(&self.state.transform, dx, dy);
    }

    fn rel_curve_to(&mut self, params: &RelCurveParams) {
        self.path.rel_curve_to(&self.state.transform, params);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn clip(&mut self) {
        let cmds = self.path.take();
        let id = self.fresh_id("clip");
        log::debug!(target: "canvas", "clip {}", id);

        let mut clip_path = BytesStart::new("clipPath");
        clip_path.push_attribute(("id", id.as_str()));
        clip_path.push_attribute(("clipPathUnits", "userSpaceOnUse"));
        if cmds.is_empty() {
            // An empty clip path hides everything drawn under it
            self.emit(Event::Empty(clip_path));
        } else {
            self.emit(Event::Start(clip_path));
            let mut elem = BytesStart::new("path");
            elem.push_attribute(("d", path_data(&cmds).as_str()));
            elem.push_attribute(("clip-rule", self.state.fill_rule.svg_name()));
            self.emit(Event::Empty(elem));
            self.emit(Event::End(BytesEnd::new("clipPath")));
        }

        let mut group = BytesStart::new("g");
        group.push_attribute(("clip-path", format!("url(#{})", id).as_str()));
        self.emit(Event::Start(group));
        self.state.open_groups += 1;
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.fill_rule = rule;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width >= 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_dash(&mut self, lengths: &[f64], offset: f64) {
        if lengths.iter().any(|l| !l.is_finite() || *l < 0.0) || !offset.is_finite() {
            return;
        }
        self.state.dash = Dash {
            lengths: lengths.to_vec(),
            offset,
        };
    }

    fn set_source(&mut self, source: &Source) {
        self.state.source = source.clone();
        self.state.source_transform = self.state.transform;
    }

    fn fill_preserve(&mut self) {
        if self.path.commands().is_empty() {
            return;
        }
        // Fill geometry is written in device space
        let Some((paint, opacity)) = self.paint_value(&Matrix::identity()) else {
            return;
        };
        let d = path_data(self.path.commands());
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("fill", paint.as_str()));
        if opacity < 1.0 {
            elem.push_attribute(("fill-opacity", fmt_num(opacity).as_str()));
        }
        elem.push_attribute(("fill-rule", self.state.fill_rule.svg_name()));
        elem.push_attribute(("stroke", "none"));
        self.emit(Event::Empty(elem));
    }

    fn stroke(&mut self) {
        let cmds = self.path.take();
        if cmds.is_empty() || !(self.state.line_width > 0.0) {
            return;
        }
        // Stroke geometry is written in user space so the pen transforms too
        let transform = self.state.transform;
        let Some(inverse) = transform.invert() else {
            return;
        };
        let Some((paint, opacity)) = self.paint_value(&transform) else {
            return;
        };
        let d = path_data(&map_path(&cmds, &inverse));
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("transform", matrix_attr(&transform).as_str()));
        elem.push_attribute(("fill", "none"));
        elem.push_attribute(("stroke", paint.as_str()));
        if opacity < 1.0 {
            elem.push_attribute(("stroke-opacity", fmt_num(opacity).as_str()));
        }
        elem.push_attribute(("stroke-width", fmt_num(self.state.line_width).as_str()));
        elem.push_attribute(("stroke-linecap", self.state.line_cap.svg_name()));
        elem.push_attribute(("stroke-linejoin", self.state.line_join.svg_name()));
        if !self.state.dash.is_solid() {
            elem.push_attribute(("stroke-dasharray", dash_attr(&self.state.dash).as_str()));
            elem.push_attribute((
                "stroke-dashoffset",
                fmt_num(self.state.dash.offset).as_str(),
            ));
        }
        self.emit(Event::Empty(elem));
    }

    fn measure_text(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        self.text.measure(font, text)
    }

    fn show_text(&mut self, font: &FontSpec, text: &str) {
        let transform = self.state.transform;
        let Some((paint, opacity)) = self.paint_value(&transform) else {
            return;
        };
        let mut elem = BytesStart::new("text");
        elem.push_attribute(("transform", matrix_attr(&transform).as_str()));
        elem.push_attribute(("x", "0"));
        elem.push_attribute(("y", "0"));
        elem.push_attribute(("font-family", font.family.as_str()));
        elem.push_attribute(("font-size", fmt_num(font.size).as_str()));
        match font.slant {
            FontSlant::Normal => {}
            FontSlant::Italic => elem.push_attribute(("font-style", "italic")),
            FontSlant::Oblique => elem.push_attribute(("font-style", "oblique")),
        }
        elem.push_attribute(("font-weight", font.weight.0.to_string().as_str()));
        elem.push_attribute(("fill", paint.as_str()));
        if opacity < 1.0 {
            elem.push_attribute(("fill-opacity", fmt_num(opacity).as_str()));
        }
        elem.push_attribute(("xml:space", "preserve"));
        self.emit(Event::Start(elem));
        self.emit(Event::Text(BytesText::new(text)));
        self.emit(Event::End(BytesEnd::new("text")));
    }

    fn paint_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        let png = match image.to_png() {
            Ok(png) => png,
            Err(err) => {
                self.error.get_or_insert(err);
                return;
            }
        };
        let href = format!("data:image/png;base64,{}", BASE64_STANDARD.encode(png));
        let transform = self.state.transform.pre_concat(&Matrix::translate(x, y));

        let mut elem = BytesStart::new("image");
        elem.push_attribute(("transform", matrix_attr(&transform).as_str()));
        elem.push_attribute(("width", image.width().to_string().as_str()));
        elem.push_attribute(("height", image.height().to_string().as_str()));
        elem.push_attribute(("preserveAspectRatio", "none"));
        elem.push_attribute(("xlink:href", href.as_str()));
        self.emit(Event::Empty(elem));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_config::FontConfig;
    use crate::pattern::Rgba;

    fn render(draw: impl FnOnce(&mut SvgCanvas<Vec<u8>>)) -> String {
        let engine = TextEngine::new(&FontConfig::empty());
        let mut canvas = SvgCanvas::new(Vec::new(), 100.0, 50.0, engine).unwrap();
        draw(&mut canvas);
        String::from_utf8(canvas.finish().unwrap()).unwrap()
    }

    fn square(c: &mut SvgCanvas<Vec<u8>>) {
        c.move_to(10.0, 10.0);
        c.rel_line_to(20.0, 0.0);
        c.rel_line_to(0.0, 20.0);
        c.close_path();
    }

    #[test]
    fn test_document_is_well_formed() {
        let svg = render(|_| {});
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert_eq!(root.attribute("width"), Some("100"));
        assert_eq!(root.attribute("viewBox"), Some("0 0 100 50"));
    }

    #[test]
    fn test_fill_then_stroke() {
        let svg = render(|c| {
            square(c);
            c.set_source(&Source::Solid(Rgba::new(1.0, 0.0, 0.0, 0.5)));
            c.fill_preserve();
            c.set_source(&Source::Solid(Rgba::BLACK));
            c.set_dash(&[2.0, 1.0], 0.5);
            c.stroke();
        });
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let paths: Vec<_> = doc
            .descendants()
            .filter(|n| n.has_tag_name("path"))
            .collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].attribute("fill"), Some("#ff0000"));
        assert_eq!(paths[0].attribute("fill-opacity"), Some("0.5"));
        assert_eq!(paths[0].attribute("d"), Some("M 10 10 L 30 10 L 30 30 Z"));
        assert_eq!(paths[1].attribute("stroke"), Some("#000000"));
        assert_eq!(paths[1].attribute("stroke-width"), Some("2"));
        assert_eq!(paths[1].attribute("stroke-dasharray"), Some("2 1"));
    }

    #[test]
    fn test_stroke_is_written_in_user_space() {
        let svg = render(|c| {
            c.transform(&Matrix::scale(2.0, 2.0));
            square(c);
            c.stroke();
        });
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let path = doc.descendants().find(|n| n.has_tag_name("path")).unwrap();
        assert_eq!(path.attribute("d"), Some("M 10 10 L 30 10 L 30 30 Z"));
        assert_eq!(path.attribute("transform"), Some("matrix(2 0 0 2 0 0)"));
    }

    #[test]
    fn test_clip_groups_close_on_restore() {
        let svg = render(|c| {
            c.save();
            square(c);
            c.clip();
            square(c);
            c.fill_preserve();
            c.restore();
            c.fill_preserve();
        });
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let group = doc.descendants().find(|n| n.has_tag_name("g")).unwrap();
        assert_eq!(group.attribute("clip-path"), Some("url(#clip0)"));
        assert_eq!(group.children().filter(|n| n.is_element()).count(), 1);
        // The second fill sits outside the clip group
        let root_paths = doc
            .root_element()
            .children()
            .filter(|n| n.has_tag_name("path"))
            .count();
        assert_eq!(root_paths, 1);
    }

    #[test]
    fn test_unbalanced_groups_closed_by_finish() {
        let svg = render(|c| {
            c.save();
            square(c);
            c.clip();
        });
        assert!(roxmltree::Document::parse(&svg).is_ok());
    }

    #[test]
    fn test_gradient_def() {
        let svg = render(|c| {
            let mut g = Gradient::new_radial(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
            g.add_color_stop(0.0, Rgba::BLACK);
            g.add_color_stop(1.0, Rgba::new(1.0, 1.0, 1.0, 0.25));
            g.set_matrix(Matrix::scale(0.1, 0.1));
            c.set_source(&Source::Gradient(g));
            square(c);
            c.fill_preserve();
        });
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let grad = doc
            .descendants()
            .find(|n| n.has_tag_name("radialGradient"))
            .unwrap();
        assert_eq!(grad.attribute("gradientUnits"), Some("userSpaceOnUse"));
        assert_eq!(
            grad.attribute("gradientTransform"),
            Some("matrix(10 0 0 10 0 0)")
        );
        let stops: Vec<_> = grad.children().filter(|n| n.has_tag_name("stop")).collect();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].attribute("stop-opacity"), Some("0.25"));
        let path = doc.descendants().find(|n| n.has_tag_name("path")).unwrap();
        assert_eq!(path.attribute("fill"), Some("url(#grad0)"));
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = render(|c| {
            c.show_text(&FontSpec::default(), "a < b & c");
        });
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let text = doc.descendants().find(|n| n.has_tag_name("text")).unwrap();
        assert_eq!(text.text(), Some("a < b & c"));
        assert_eq!(text.attribute("font-family"), Some("sans-serif"));
    }

    #[test]
    fn test_image_is_embedded() {
        let svg = render(|c| {
            let image = RasterImage::from_rgba8(1, 1, &[0, 255, 0, 255]).unwrap();
            c.paint_image(&image, -0.5, -0.5);
        });
        assert!(svg.contains("data:image/png;base64,"));
        assert!(svg.contains("matrix(1 0 0 1 -0.5 -0.5)"));
    }
}
