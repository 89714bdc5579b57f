//! Emitting decoded shapes as ODF drawing elements.
//!
//! The decoder does not own an XML serializer; it talks to one through
//! [`VectorWriter`], three calls that open an element, attach an attribute
//! to the open element, and close it. [`ElementTree`] is an in-memory
//! writer that records the calls and prints them back as XML.

use std::fmt;

use crate::log::{debug, warn};
use crate::options::DecodeOptions;
use crate::shapes::{CustomShape, DecodeOutcome, EnhancedGeometry, StandardKind, StandardShape};
use crate::transform::Frame;

/// Sink for emitted elements.
pub trait VectorWriter {
    fn start_element(&mut self, name: &str);
    /// Add an attribute to the innermost open element.
    fn add_attribute(&mut self, name: &str, value: &str);
    fn end_element(&mut self);
}

/// A recorded element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn write_xml(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}<{}", "", self.name, indent = depth * 2)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape(value))?;
        }
        if self.children.is_empty() {
            return writeln!(f, "/>");
        }
        writeln!(f, ">")?;
        for child in &self.children {
            child.write_xml(f, depth + 1)?;
        }
        writeln!(f, "{:indent$}</{}>", "", self.name, indent = depth * 2)
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A [`VectorWriter`] that builds an element tree in memory.
#[derive(Debug, Default)]
pub struct ElementTree {
    roots: Vec<Element>,
    open: Vec<Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed top-level elements.
    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.open.is_empty()
    }

    pub fn into_roots(self) -> Vec<Element> {
        self.roots
    }
}

impl VectorWriter for ElementTree {
    fn start_element(&mut self, name: &str) {
        self.open.push(Element::new(name));
    }

    fn add_attribute(&mut self, name: &str, value: &str) {
        match self.open.last_mut() {
            Some(element) => element.attributes.push((name.to_string(), value.to_string())),
            None => {
                warn!(name, "attribute written outside an element, dropped");
            }
        }
    }

    fn end_element(&mut self) {
        let Some(done) = self.open.pop() else {
            warn!("unbalanced end_element, ignored");
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => self.roots.push(done),
        }
    }
}

impl fmt::Display for ElementTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in &self.roots {
            root.write_xml(f, 0)?;
        }
        Ok(())
    }
}

/// Write the size and placement of a frame.
///
/// A rotated frame is placed by `draw:transform` alone; the position
/// attributes are only written for unrotated frames.
fn write_frame(frame: &Frame, options: &DecodeOptions, w: &mut impl VectorWriter) {
    w.add_attribute("svg:width", &options.length(frame.rect.width));
    w.add_attribute("svg:height", &options.length(frame.rect.height));
    match frame.draw_transform_with(|v| options.length(v)) {
        Some(transform) => w.add_attribute("draw:transform", &transform),
        None => {
            w.add_attribute("svg:x", &options.length(frame.rect.x));
            w.add_attribute("svg:y", &options.length(frame.rect.y));
        }
    }
}

fn empty_element(name: &str, w: &mut impl VectorWriter) {
    w.start_element(name);
    w.end_element();
}

fn emit_standard(shape: &StandardShape, options: &DecodeOptions, w: &mut impl VectorWriter) {
    match shape.kind {
        StandardKind::Rect => {
            w.start_element("draw:rect");
            write_frame(&shape.frame, options, w);
        }
        StandardKind::Ellipse => {
            w.start_element("draw:ellipse");
            write_frame(&shape.frame, options, w);
        }
        StandardKind::Line { start, end } => {
            w.start_element("draw:line");
            w.add_attribute("svg:x1", &options.length(start.x));
            w.add_attribute("svg:y1", &options.length(start.y));
            w.add_attribute("svg:x2", &options.length(end.x));
            w.add_attribute("svg:y2", &options.length(end.y));
        }
        StandardKind::Picture => {
            w.start_element("draw:frame");
            write_frame(&shape.frame, options, w);
            empty_element("draw:image", w);
        }
        StandardKind::TextBox => {
            w.start_element("draw:frame");
            write_frame(&shape.frame, options, w);
            empty_element("draw:text-box", w);
        }
        StandardKind::Control => {
            w.start_element("draw:control");
            write_frame(&shape.frame, options, w);
        }
    }
    w.end_element();
}

fn emit_geometry(geometry: &EnhancedGeometry, w: &mut impl VectorWriter) {
    w.start_element("draw:enhanced-geometry");
    w.add_attribute("svg:viewBox", &geometry.path.view_box.to_string());
    if let Some(preset) = geometry.preset {
        w.add_attribute("draw:type", preset);
    }
    w.add_attribute("draw:enhanced-path", &geometry.path.path_string());
    if geometry.mirror_horizontal {
        w.add_attribute("draw:mirror-horizontal", "true");
    }
    if geometry.mirror_vertical {
        w.add_attribute("draw:mirror-vertical", "true");
    }
    if let Some(modifiers) = geometry.path.modifiers_string() {
        w.add_attribute("draw:modifiers", &modifiers);
    }
    for equation in &geometry.equations {
        w.start_element("draw:equation");
        w.add_attribute("draw:name", &equation.name);
        w.add_attribute("draw:formula", &equation.formula);
        w.end_element();
    }
    w.end_element();
}

fn emit_custom(shape: &CustomShape, options: &DecodeOptions, w: &mut impl VectorWriter) {
    w.start_element("draw:custom-shape");
    write_frame(&shape.frame, options, w);
    emit_geometry(&shape.geometry, w);
    w.end_element();
}

/// Write the element for a decoded shape. Unhandled shapes write nothing.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn emit(outcome: &DecodeOutcome, options: &DecodeOptions, writer: &mut impl VectorWriter) {
    match outcome {
        DecodeOutcome::Standard(shape) => emit_standard(shape, options, writer),
        DecodeOutcome::Custom(shape) => emit_custom(shape, options, writer),
        DecodeOutcome::Unhandled(shape) => {
            debug!(code = shape.code, reason = ?shape.reason, "unhandled shape, nothing emitted");
        }
    }
}

/// Emit a standalone enhanced geometry, e.g. one converted from VML, inside
/// a `draw:custom-shape` placed by `frame`.
pub fn emit_custom_geometry(
    geometry: &EnhancedGeometry,
    frame: &Frame,
    options: &DecodeOptions,
    writer: &mut impl VectorWriter,
) {
    writer.start_element("draw:custom-shape");
    write_frame(frame, options, writer);
    emit_geometry(geometry, writer);
    writer.end_element();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{EnhancedPath, PathCommand};
    use crate::types::{Rect, ViewBox};
    use crate::vml::Equation;

    #[test]
    fn test_tree_nesting_and_display() {
        let mut tree = ElementTree::new();
        tree.start_element("a");
        tree.add_attribute("x", "1 < 2 & \"q\"");
        tree.start_element("b");
        tree.end_element();
        tree.end_element();
        tree.start_element("c");
        tree.end_element();
        assert_eq!(
            tree.to_string(),
            "<a x=\"1 &lt; 2 &amp; &quot;q&quot;\">\n  <b/>\n</a>\n<c/>\n"
        );
        assert_eq!(tree.roots()[0].child("b").map(|b| b.name.as_str()), Some("b"));
    }

    #[test]
    fn test_unbalanced_calls_are_tolerated() {
        let mut tree = ElementTree::new();
        tree.end_element();
        tree.add_attribute("lost", "1");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_rotated_frame_has_no_position() {
        let frame = Frame::new(Rect::new(10.0, 20.0, 100.0, 50.0)).with_rotation(90.0);
        let mut tree = ElementTree::new();
        tree.start_element("draw:rect");
        write_frame(&frame, &DecodeOptions::default(), &mut tree);
        tree.end_element();
        let rect = &tree.roots()[0];
        assert_eq!(rect.attribute("svg:x"), None);
        assert_eq!(
            rect.attribute("draw:transform"),
            Some("translate(-50 -25) rotate(-1.5708) translate(60 45)")
        );
    }

    #[test]
    fn test_custom_geometry_attributes() {
        let path = EnhancedPath::new(
            vec![PathCommand::move_to(0.0, 0.0), PathCommand::line_to(10.0, 10.0), PathCommand::End],
            ViewBox::new(0.0, 0.0, 10.0, 10.0),
        )
        .with_modifiers(vec![1.0, 2.0]);
        let geometry = EnhancedGeometry::new(path)
            .with_mirror(false, true)
            .with_equations(vec![Equation {
                name: "f0".into(),
                formula: "$0+1".into(),
            }]);
        let mut tree = ElementTree::new();
        emit_custom_geometry(
            &geometry,
            &Frame::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
            &DecodeOptions::default(),
            &mut tree,
        );
        let shape = &tree.roots()[0];
        let Some(eg) = shape.child("draw:enhanced-geometry") else {
            panic!("missing enhanced geometry: {tree}");
        };
        assert_eq!(eg.attribute("svg:viewBox"), Some("0 0 10 10"));
        assert_eq!(eg.attribute("draw:type"), None);
        assert_eq!(eg.attribute("draw:enhanced-path"), Some("M 0 0 L 10 10 N"));
        assert_eq!(eg.attribute("draw:mirror-horizontal"), None);
        assert_eq!(eg.attribute("draw:mirror-vertical"), Some("true"));
        assert_eq!(eg.attribute("draw:modifiers"), Some("1 2"));
        assert_eq!(eg.children[0].attribute("draw:formula"), Some("$0+1"));
    }
}
