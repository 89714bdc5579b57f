//! Normalized path commands and the enhanced path they serialize into.
//!
//! Both decoders (binary segments and VML text) produce the same
//! `PathCommand` stream. The serialized form is the ODF `draw:enhanced-path`
//! mini-language: single-letter opcodes followed by space-separated
//! coordinates, e.g. `M 0 0 L 21600 0 L 21600 21600 Z N`.

use std::fmt;

use glam::{DVec2, dvec2};

use crate::types::{ViewBox, fmt_num};

/// One coordinate of a path point.
///
/// VML paths may reference adjustment values (`#N`) and formula results
/// (`@N`) instead of literal numbers; those are kept symbolic and resolved
/// by the downstream consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Value(f64),
    /// Adjustment value reference, written `$N`
    Modifier(u32),
    /// Equation result reference, written `?fN`
    Formula(u32),
}

impl Coord {
    pub fn value(self) -> Option<f64> {
        match self {
            Coord::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Coord::Value(0.0)
    }
}

impl From<f64> for Coord {
    fn from(v: f64) -> Self {
        Coord::Value(v)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Value(v) => f.write_str(&fmt_num(*v)),
            Coord::Modifier(n) => write!(f, "${}", n),
            Coord::Formula(n) => write!(f, "?f{}", n),
        }
    }
}

/// A path point whose coordinates may be symbolic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathPoint {
    pub x: Coord,
    pub y: Coord,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Coord::Value(x),
            y: Coord::Value(y),
        }
    }

    pub fn symbolic(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// The numeric position, if neither coordinate is a reference.
    pub fn as_vec(&self) -> Option<DVec2> {
        Some(dvec2(self.x.value()?, self.y.value()?))
    }
}

impl From<DVec2> for PathPoint {
    fn from(v: DVec2) -> Self {
        PathPoint::new(v.x, v.y)
    }
}

/// A single enhanced-path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(PathPoint),
    LineTo(PathPoint),
    /// Cubic Bézier: first control point, second control point, end point
    CurveTo([PathPoint; 3]),
    /// Quarter ellipse whose first tangent is horizontal (VML `qx`, ODF `X`)
    QuadrantX(PathPoint),
    /// Quarter ellipse whose first tangent is vertical (VML `qy`, ODF `Y`)
    QuadrantY(PathPoint),
    Close,
    End,
    /// The current subpath is not filled (VML `nf`, ODF `F`)
    NoFill,
    /// The current subpath is not stroked (VML `ns`, ODF `S`)
    NoStroke,
}

impl PathCommand {
    pub fn move_to(x: f64, y: f64) -> Self {
        PathCommand::MoveTo(PathPoint::new(x, y))
    }

    pub fn line_to(x: f64, y: f64) -> Self {
        PathCommand::LineTo(PathPoint::new(x, y))
    }

    pub fn curve_to(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Self {
        PathCommand::CurveTo([
            PathPoint::new(x1, y1),
            PathPoint::new(x2, y2),
            PathPoint::new(x3, y3),
        ])
    }

    /// The ODF enhanced-path opcode.
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo(_) => 'M',
            PathCommand::LineTo(_) => 'L',
            PathCommand::CurveTo(_) => 'C',
            PathCommand::QuadrantX(_) => 'X',
            PathCommand::QuadrantY(_) => 'Y',
            PathCommand::Close => 'Z',
            PathCommand::End => 'N',
            PathCommand::NoFill => 'F',
            PathCommand::NoStroke => 'S',
        }
    }

    pub fn points(&self) -> &[PathPoint] {
        match self {
            PathCommand::MoveTo(p)
            | PathCommand::LineTo(p)
            | PathCommand::QuadrantX(p)
            | PathCommand::QuadrantY(p) => std::slice::from_ref(p),
            PathCommand::CurveTo(pts) => pts.as_slice(),
            PathCommand::Close | PathCommand::End | PathCommand::NoFill | PathCommand::NoStroke => &[],
        }
    }

    /// Apply `f` to every numeric point; symbolic points are left alone.
    pub fn map_points(self, f: impl Fn(DVec2) -> DVec2) -> Self {
        let map = |p: PathPoint| match p.as_vec() {
            Some(v) => PathPoint::from(f(v)),
            None => p,
        };
        match self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
            PathCommand::QuadrantX(p) => PathCommand::QuadrantX(map(p)),
            PathCommand::QuadrantY(p) => PathCommand::QuadrantY(map(p)),
            PathCommand::CurveTo([a, b, c]) => PathCommand::CurveTo([map(a), map(b), map(c)]),
            other => other,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        for p in self.points() {
            write!(f, " {} {}", p.x, p.y)?;
        }
        Ok(())
    }
}

/// Serialize a command stream into `draw:enhanced-path` text.
pub fn path_string(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The decoded geometry of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedPath {
    pub commands: Vec<PathCommand>,
    pub view_box: ViewBox,
    /// Resolved adjustment values, already prefix-complete.
    pub modifiers: Vec<f64>,
}

impl EnhancedPath {
    pub fn new(commands: Vec<PathCommand>, view_box: ViewBox) -> Self {
        Self {
            commands,
            view_box,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<f64>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn path_string(&self) -> String {
        path_string(&self.commands)
    }

    /// `draw:modifiers` text, or `None` when the shape has no adjustments.
    pub fn modifiers_string(&self) -> Option<String> {
        if self.modifiers.is_empty() {
            return None;
        }
        Some(
            self.modifiers
                .iter()
                .map(|v| fmt_num(*v))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Merge explicit adjustment values over their defaults.
///
/// The result is prefix-complete: its length is one past the highest index
/// that has either an explicit value or a default, and every earlier slot is
/// filled (explicit value, else default, else `0`).
pub fn resolve_modifiers(explicit: &[Option<f64>], defaults: &[f64]) -> Vec<f64> {
    let explicit_len = explicit
        .iter()
        .rposition(Option::is_some)
        .map_or(0, |i| i + 1);
    let len = explicit_len.max(defaults.len());

    (0..len)
        .map(|i| {
            explicit
                .get(i)
                .copied()
                .flatten()
                .or_else(|| defaults.get(i).copied())
                .unwrap_or(0.0)
        })
        .collect()
}

/// Incremental path construction with running bounds.
///
/// Only numeric points participate in the bounds; symbolic ones are emitted
/// as-is.
#[derive(Debug)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    bounds: ViewBox,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            bounds: ViewBox::empty(),
        }
    }

    pub fn push(&mut self, command: PathCommand) {
        for p in command.points() {
            if let Some(v) = p.as_vec() {
                self.bounds.expand_point(v);
            }
        }
        self.commands.push(command);
    }

    pub fn move_to(&mut self, p: DVec2) {
        self.push(PathCommand::MoveTo(p.into()));
    }

    pub fn line_to(&mut self, p: DVec2) {
        self.push(PathCommand::LineTo(p.into()));
    }

    /// Lines through each point in turn.
    pub fn polyline(&mut self, points: &[DVec2]) {
        for &p in points {
            self.line_to(p);
        }
    }

    pub fn curve_to(&mut self, c1: DVec2, c2: DVec2, end: DVec2) {
        self.push(PathCommand::CurveTo([c1.into(), c2.into(), end.into()]));
    }

    pub fn quadrant_x(&mut self, p: DVec2) {
        self.push(PathCommand::QuadrantX(p.into()));
    }

    pub fn quadrant_y(&mut self, p: DVec2) {
        self.push(PathCommand::QuadrantY(p.into()));
    }

    pub fn close(&mut self) {
        self.push(PathCommand::Close);
    }

    pub fn end(&mut self) {
        self.push(PathCommand::End);
    }

    /// A closed polygon through `points`, terminated with `Z N`.
    pub fn polygon(&mut self, points: &[DVec2]) {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(*first);
            self.polyline(rest);
            self.close();
            self.end();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Bounds of the numeric points seen so far (empty if none).
    pub fn bounds(&self) -> ViewBox {
        self.bounds
    }

    /// Finish with an explicit view box.
    pub fn build(self, view_box: ViewBox) -> EnhancedPath {
        EnhancedPath::new(self.commands, view_box)
    }

    /// Finish using the accumulated point bounds, or `fallback` if no
    /// numeric point was seen.
    pub fn build_with_bounds(self, fallback: ViewBox) -> EnhancedPath {
        let view_box = if self.bounds.is_empty() {
            fallback
        } else {
            self.bounds
        };
        EnhancedPath::new(self.commands, view_box)
    }

    pub fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }
}
