//! Parser for the VML `path` attribute mini-language.
//!
//! A VML path is a run of single- or two-letter commands, each followed by
//! a fixed-size group of arguments:
//!
//! ```text
//! m 0,0 l 100,0 100,100 x e
//! ```
//!
//! A command may be followed by several argument groups without repeating
//! the letter; `l 100,0 100,100` above is two line-tos. The parser therefore
//! alternates between two states:
//!
//! - **CommandExpected**: read a command letter
//! - **ArgumentExpected**: read argument groups for the current command until
//!   the scanner reports that the next token is a command letter
//!
//! Arguments are integers (optionally signed), `#N` adjustment references,
//! `@N` formula references, or elided (an empty slot between commas, which
//! reads as `0`). All scanning is bounds-checked: truncated input yields
//! zero-padded groups, unexpected characters are skipped.

use crate::log::{debug, warn};
use crate::path::{Coord, PathCommand, PathPoint};
use crate::types::fmt_num;

/// A VML path command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmlCommand {
    /// `m`
    MoveTo,
    /// `l`
    LineTo,
    /// `r`
    RelLineTo,
    /// `t`
    RelMoveTo,
    /// `c`
    CurveTo,
    /// `v`
    RelCurveTo,
    /// `qx`
    QuadrantX,
    /// `qy`
    QuadrantY,
    /// `x`
    Close,
    /// `e`
    End,
    /// `nf`
    NoFill,
    /// `ns`
    NoStroke,
    /// Any other command (arcs, `qb`, unknown letters); its arguments are
    /// consumed one at a time and dropped
    Unsupported(u8),
}

impl VmlCommand {
    /// Arguments per group.
    pub fn arg_count(self) -> usize {
        match self {
            VmlCommand::MoveTo
            | VmlCommand::LineTo
            | VmlCommand::RelLineTo
            | VmlCommand::RelMoveTo
            | VmlCommand::QuadrantX
            | VmlCommand::QuadrantY => 2,
            VmlCommand::CurveTo | VmlCommand::RelCurveTo => 6,
            VmlCommand::Unsupported(_) => 1,
            VmlCommand::Close | VmlCommand::End | VmlCommand::NoFill | VmlCommand::NoStroke => 0,
        }
    }
}

/// One command with one group of arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct VmlToken {
    pub command: VmlCommand,
    pub args: Vec<Coord>,
    /// 0 for the group right after the command letter, then 1, 2, …
    pub repeat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    CommandExpected,
    ArgumentExpected { command: VmlCommand, repeat: usize },
}

/// What the argument scanner found at the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scan {
    Arg(Coord),
    /// A command letter, left unconsumed
    Command,
    EndOfInput,
}

/// Tokenizer over the raw path text.
#[derive(Debug)]
pub struct VmlPathParser<'a> {
    src: &'a [u8],
    pos: usize,
    state: ParseState,
}

impl<'a> VmlPathParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            state: ParseState::CommandExpected,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    /// Consume the separator after an argument: whitespace and at most one comma.
    fn skip_separator(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.bump();
        }
    }

    fn digits(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add((c - b'0') as u64);
            self.bump();
        }
        (self.pos > start).then_some(value)
    }

    /// Digits with an optional fractional part. Missing digits read as 0.
    fn unsigned_number(&mut self) -> f64 {
        let start = self.pos;
        self.digits();
        if self.peek() == Some(b'.') {
            self.bump();
            self.digits();
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    fn reference_index(&mut self) -> u32 {
        self.digits().map_or(0, |n| n.min(u32::MAX as u64) as u32)
    }

    /// Scan one argument.
    ///
    /// Returns `Scan::Command` without consuming anything when the next
    /// token is a command letter; this is what ends an implicit repetition.
    fn scan_argument(&mut self) -> Scan {
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Scan::EndOfInput;
            };
            match c {
                b',' => {
                    // An empty slot
                    self.bump();
                    return Scan::Arg(Coord::Value(0.0));
                }
                b'-' | b'+' | b'.' | b'0'..=b'9' | b'#' | b'@' => {
                    let coord = self.signed_argument();
                    self.skip_separator();
                    return Scan::Arg(coord);
                }
                c if c.is_ascii_alphabetic() => return Scan::Command,
                _ => {
                    warn!(pos = self.pos, found = %(c as char), "unexpected character in VML path");
                    self.bump();
                }
            }
        }
    }

    fn signed_argument(&mut self) -> Coord {
        let mut negative = false;
        while let Some(sign @ (b'-' | b'+')) = self.peek() {
            negative ^= sign == b'-';
            self.bump();
        }
        match self.peek() {
            Some(b'#') => {
                self.bump();
                if negative {
                    warn!(pos = self.pos, "negated adjustment reference, sign dropped");
                }
                Coord::Modifier(self.reference_index())
            }
            Some(b'@') => {
                self.bump();
                if negative {
                    warn!(pos = self.pos, "negated formula reference, sign dropped");
                }
                Coord::Formula(self.reference_index())
            }
            _ => {
                let value = self.unsigned_number();
                Coord::Value(if negative { -value } else { value })
            }
        }
    }

    /// Read a command letter (or letter pair), skipping anything that is
    /// not one.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn read_command(&mut self) -> Option<VmlCommand> {
        loop {
            self.skip_whitespace();
            let c = self.peek()?;
            if !c.is_ascii_alphabetic() {
                if let Scan::Arg(_) = self.scan_argument() {
                    warn!(pos = self.pos, "argument without a command, skipped");
                }
                continue;
            }
            self.bump();
            let second = self.peek();
            let mut pair = |expected: &[u8]| match second {
                Some(s) if expected.contains(&s) => {
                    self.bump();
                    true
                }
                _ => false,
            };
            let command = match c {
                b'm' => VmlCommand::MoveTo,
                b'l' => VmlCommand::LineTo,
                b'r' => VmlCommand::RelLineTo,
                b't' => VmlCommand::RelMoveTo,
                b'c' => VmlCommand::CurveTo,
                b'v' => VmlCommand::RelCurveTo,
                b'x' => VmlCommand::Close,
                b'e' => VmlCommand::End,
                b'q' if second == Some(b'x') => {
                    pair(b"x");
                    VmlCommand::QuadrantX
                }
                b'q' if second == Some(b'y') => {
                    pair(b"y");
                    VmlCommand::QuadrantY
                }
                b'n' if second == Some(b'f') => {
                    pair(b"f");
                    VmlCommand::NoFill
                }
                b'n' if second == Some(b's') => {
                    pair(b"s");
                    VmlCommand::NoStroke
                }
                b'q' => {
                    pair(b"b");
                    VmlCommand::Unsupported(c)
                }
                b'w' => {
                    pair(b"ar");
                    VmlCommand::Unsupported(c)
                }
                b'a' => {
                    pair(b"trle");
                    VmlCommand::Unsupported(c)
                }
                b'h' => {
                    pair(b"abcdefghi");
                    VmlCommand::Unsupported(c)
                }
                _ => VmlCommand::Unsupported(c),
            };
            if let VmlCommand::Unsupported(letter) = command {
                warn!(pos = self.pos, command = %(letter as char), "unsupported VML path command");
            }
            return Some(command);
        }
    }

    /// Produce the next command/argument-group token.
    pub fn next_token(&mut self) -> Option<VmlToken> {
        loop {
            match self.state {
                ParseState::CommandExpected => {
                    let command = self.read_command()?;
                    if command.arg_count() == 0 {
                        return Some(VmlToken {
                            command,
                            args: Vec::new(),
                            repeat: 0,
                        });
                    }
                    self.state = ParseState::ArgumentExpected { command, repeat: 0 };
                }
                ParseState::ArgumentExpected { command, repeat } => {
                    let first = match self.scan_argument() {
                        Scan::Arg(coord) => coord,
                        Scan::Command | Scan::EndOfInput => {
                            if repeat == 0 {
                                debug!(?command, "command without arguments");
                            }
                            self.state = ParseState::CommandExpected;
                            continue;
                        }
                    };
                    let wanted = command.arg_count();
                    let mut args = Vec::with_capacity(wanted);
                    args.push(first);
                    while args.len() < wanted {
                        match self.scan_argument() {
                            Scan::Arg(coord) => args.push(coord),
                            Scan::Command | Scan::EndOfInput => {
                                debug!(?command, got = args.len(), wanted, "incomplete argument group padded with 0");
                                args.push(Coord::Value(0.0));
                            }
                        }
                    }
                    self.state = ParseState::ArgumentExpected {
                        command,
                        repeat: repeat + 1,
                    };
                    return Some(VmlToken {
                        command,
                        args,
                        repeat,
                    });
                }
            }
        }
    }
}

impl Iterator for VmlPathParser<'_> {
    type Item = VmlToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// A translated VML path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VmlPath {
    pub commands: Vec<PathCommand>,
    /// Formulas for relative steps taken from a symbolic point. The first
    /// one is referenced as `?fN` with `N` the translator's first equation
    /// index, the rest follow in order.
    pub equations: Vec<String>,
}

/// Turns tokens into path commands, tracking the current point for the
/// relative commands.
#[derive(Debug, Default)]
pub struct VmlPathTranslator {
    current: PathPoint,
    subpath_start: PathPoint,
    commands: Vec<PathCommand>,
    first_equation: u32,
    equations: Vec<String>,
}

/// An operand of a synthetic sum; negative literals are parenthesized.
fn term(c: Coord) -> String {
    match c {
        Coord::Value(v) if v < 0.0 => format!("({})", fmt_num(v)),
        _ => c.to_string(),
    }
}

fn point(args: &[Coord], index: usize) -> PathPoint {
    let at = |i: usize| args.get(i).copied().unwrap_or_default();
    PathPoint::symbolic(at(index * 2), at(index * 2 + 1))
}

impl VmlPathTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A translator whose synthetic equations start at `?f{first}`, i.e.
    /// after the shape's own `first` formulas.
    pub fn with_first_equation(first: u32) -> Self {
        Self {
            first_equation: first,
            ..Self::default()
        }
    }

    /// `base + delta`. Literal sums are folded; anything involving a
    /// reference becomes a new equation.
    fn add(&mut self, base: Coord, delta: Coord) -> Coord {
        match (base, delta) {
            (Coord::Value(a), Coord::Value(b)) => Coord::Value(a + b),
            (base, Coord::Value(d)) if d == 0.0 => base,
            (Coord::Value(b), delta) if b == 0.0 => delta,
            _ => {
                let len = u32::try_from(self.equations.len()).unwrap_or(u32::MAX);
                let index = self.first_equation.saturating_add(len);
                let formula = format!("{}+{}", term(base), term(delta));
                debug!(index, formula = %formula, "relative step from a symbolic point");
                self.equations.push(formula);
                Coord::Formula(index)
            }
        }
    }

    fn offset(&mut self, base: PathPoint, delta: PathPoint) -> PathPoint {
        PathPoint::symbolic(self.add(base.x, delta.x), self.add(base.y, delta.y))
    }

    pub fn translate(&mut self, token: &VmlToken) {
        let args = &token.args;
        match token.command {
            VmlCommand::MoveTo => {
                let p = point(args, 0);
                self.subpath_start = p;
                self.current = p;
                self.commands.push(PathCommand::MoveTo(p));
            }
            VmlCommand::RelMoveTo => {
                let p = self.offset(self.current, point(args, 0));
                self.subpath_start = p;
                self.current = p;
                self.commands.push(PathCommand::MoveTo(p));
            }
            VmlCommand::LineTo => {
                let p = point(args, 0);
                self.current = p;
                self.commands.push(PathCommand::LineTo(p));
            }
            VmlCommand::RelLineTo => {
                let p = self.offset(self.current, point(args, 0));
                self.current = p;
                self.commands.push(PathCommand::LineTo(p));
            }
            VmlCommand::CurveTo => {
                let pts = [point(args, 0), point(args, 1), point(args, 2)];
                self.current = pts[2];
                self.commands.push(PathCommand::CurveTo(pts));
            }
            VmlCommand::RelCurveTo => {
                let origin = self.current;
                let pts = [0, 1, 2].map(|i| self.offset(origin, point(args, i)));
                self.current = pts[2];
                self.commands.push(PathCommand::CurveTo(pts));
            }
            VmlCommand::QuadrantX | VmlCommand::QuadrantY => {
                // Repeated groups alternate between the two axes
                let starts_x = token.command == VmlCommand::QuadrantX;
                let p = point(args, 0);
                self.current = p;
                self.commands.push(if starts_x == (token.repeat % 2 == 0) {
                    PathCommand::QuadrantX(p)
                } else {
                    PathCommand::QuadrantY(p)
                });
            }
            VmlCommand::Close => {
                self.current = self.subpath_start;
                self.commands.push(PathCommand::Close);
            }
            VmlCommand::End => self.commands.push(PathCommand::End),
            VmlCommand::NoFill => self.commands.push(PathCommand::NoFill),
            VmlCommand::NoStroke => self.commands.push(PathCommand::NoStroke),
            VmlCommand::Unsupported(_) => {}
        }
    }

    pub fn finish(self) -> VmlPath {
        VmlPath {
            commands: self.commands,
            equations: self.equations,
        }
    }
}

/// Translate a VML path whose shape already has `first_equation` formulas;
/// synthetic equations are numbered after them.
pub fn translate_vml_path(source: &str, first_equation: u32) -> VmlPath {
    let mut translator = VmlPathTranslator::with_first_equation(first_equation);
    for token in VmlPathParser::new(source) {
        translator.translate(&token);
    }
    translator.finish()
}

/// Parse a VML path into normalized path commands.
pub fn parse_vml_path(source: &str) -> VmlPath {
    translate_vml_path(source, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::path_string;

    fn parse(src: &str) -> String {
        path_string(&parse_vml_path(src).commands)
    }

    #[test]
    fn implicit_repetition_of_line_to() {
        assert_eq!(
            parse_vml_path("m 0,0 l 100,0 100,100 x").commands,
            vec![
                PathCommand::move_to(0.0, 0.0),
                PathCommand::line_to(100.0, 0.0),
                PathCommand::line_to(100.0, 100.0),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn relative_line_from_current_point() {
        assert_eq!(
            parse_vml_path("m 10,10 r 5,5").commands,
            vec![PathCommand::move_to(10.0, 10.0), PathCommand::line_to(15.0, 15.0)]
        );
        assert_eq!(parse("m 10,10 r 5,5 5,-20"), "M 10 10 L 15 15 L 20 -5");
    }

    #[test]
    fn relative_state_resets_on_move() {
        assert_eq!(parse("m 10,10 r 5,5 m 0,0 r 1,1"), "M 10 10 L 15 15 M 0 0 L 1 1");
    }

    #[test]
    fn elided_argument_reads_as_zero() {
        assert_eq!(parse("m 0,0 l 1,,2,3"), "M 0 0 L 1 0 L 2 3");
        assert_eq!(parse("m ,5"), "M 0 5");
        assert_eq!(parse("m 1, ,2,3"), "M 1 0 M 2 3");
    }

    #[test]
    fn compact_form_without_spaces() {
        assert_eq!(parse("m0,0l10,0,10,10xe"), "M 0 0 L 10 0 L 10 10 Z N");
        assert_eq!(parse("m0,0l10-5"), "M 0 0 L 10 -5");
    }

    #[test]
    fn curves_and_relative_curves() {
        assert_eq!(parse("m 0,0 c 1,2,3,4,5,6"), "M 0 0 C 1 2 3 4 5 6");
        assert_eq!(parse("m 10,10 v 1,1,2,2,3,3"), "M 10 10 C 11 11 12 12 13 13");
        assert_eq!(parse("t 5,5 t 1,1"), "M 5 5 M 6 6");
    }

    #[test]
    fn quadrants_alternate_axes() {
        assert_eq!(parse("m 0,0 qx 10,10 20,20 30,30"), "M 0 0 X 10 10 Y 20 20 X 30 30");
        assert_eq!(parse("m 0,0 qy 10,10 20,20"), "M 0 0 Y 10 10 X 20 20");
    }

    #[test]
    fn fill_and_stroke_markers() {
        assert_eq!(parse("m 0,0 l 5,5 nf ns e"), "M 0 0 L 5 5 F S N");
    }

    #[test]
    fn references() {
        assert_eq!(parse("m #0,@2 l 10,#1"), "M $0 ?f2 L 10 $1");
    }

    #[test]
    fn relative_step_from_symbolic_point_adds_equation() {
        let path = parse_vml_path("m #0,0 r 5,5");
        assert_eq!(path_string(&path.commands), "M $0 0 L ?f0 5");
        assert_eq!(path.equations, ["$0+5"]);

        let path = parse_vml_path("m 10,10 r #0,5");
        assert_eq!(path_string(&path.commands), "M 10 10 L ?f0 15");
        assert_eq!(path.equations, ["10+$0"]);

        // The new point is the base of the next step
        let path = parse_vml_path("m #1,0 r 5,0 -3,0");
        assert_eq!(path_string(&path.commands), "M $1 0 L ?f0 0 L ?f1 0");
        assert_eq!(path.equations, ["$1+5", "?f0+(-3)"]);
    }

    #[test]
    fn zero_steps_and_zero_bases_need_no_equation() {
        let path = parse_vml_path("m #0,#1 r 0,0 t 0,2");
        assert_eq!(path_string(&path.commands), "M $0 $1 L $0 $1 M $0 ?f0");
        assert_eq!(path.equations, ["$1+2"]);

        let path = parse_vml_path("m 0,0 r #2,@3");
        assert_eq!(path_string(&path.commands), "M 0 0 L $2 ?f3");
        assert!(path.equations.is_empty());
    }

    #[test]
    fn synthetic_equations_follow_shape_formulas() {
        let path = translate_vml_path("m #0,0 v 1,0,2,0,3,0", 4);
        assert_eq!(path_string(&path.commands), "M $0 0 C ?f4 0 ?f5 0 ?f6 0");
        assert_eq!(path.equations, ["$0+1", "$0+2", "$0+3"]);
    }

    #[test]
    fn truncated_input_pads_with_zero() {
        assert_eq!(parse("m 10"), "M 10 0");
        assert_eq!(parse("m 0,0 c 1,2,3"), "M 0 0 C 1 2 3 0 0 0");
        assert_eq!(parse("m 0,0 l"), "M 0 0");
        assert_eq!(parse("m -"), "M 0 0");
        assert_eq!(parse(""), "");
        assert_eq!(parse("q"), "");
        assert_eq!(parse("n"), "");
    }

    #[test]
    fn junk_is_skipped() {
        assert_eq!(parse("m 0,0 l 5,5 !! 6,6 e"), "M 0 0 L 5 5 L 6 6 N");
        assert_eq!(parse("12 34 m 1,1"), "M 1 1");
        assert_eq!(parse("x 10 20 e"), "Z N");
    }

    #[test]
    fn unsupported_commands_swallow_their_arguments() {
        assert_eq!(parse("wa 0,0,10,10,0,0,10,10 l 5,5"), "L 5 5");
        assert_eq!(parse("m 0,0 at 1,2,3,4,5,6,7,8 x"), "M 0 0 Z");
        assert_eq!(parse("m 0,0 k 1,2 l 3,4"), "M 0 0 L 3 4");
    }

    #[test]
    fn tokens_carry_repeat_index() {
        let tokens: Vec<VmlToken> = VmlPathParser::new("l 1,2 3,4 x").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].repeat, 0);
        assert_eq!(tokens[1].repeat, 1);
        assert_eq!(tokens[1].args, vec![Coord::Value(3.0), Coord::Value(4.0)]);
        assert_eq!(tokens[2].command, VmlCommand::Close);
    }

    #[test]
    fn fractional_values() {
        assert_eq!(parse("m 1.5,.25"), "M 1.5 0.25");
        assert_eq!(parse("m 0.12345678901234567890123,7."), "M 0.123457 7");
        assert_eq!(parse("m .,5"), "M 0 5");
    }
}
