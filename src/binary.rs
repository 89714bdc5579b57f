//! Binary vertex/segment decoder for custom ("NotPrimitive") shapes.
//!
//! The geometry of a custom shape is two parallel property arrays:
//!
//! - `pVertices`: packed 2D points
//! - `pSegmentInfo`: 16-bit words whose top three bits select an opcode
//!   (MSOPATHINFO); the remaining bits are opcode specific
//!
//! Each opcode consumes vertices from a shared cursor. Vertex data in real
//! files is frequently shorter than the segments claim, so every vertex
//! access is bounds-checked and a shortfall ends decoding with the commands
//! produced so far.

use glam::{DVec2, dvec2};

use crate::log::{debug, warn};
use crate::path::{EnhancedPath, PathBuilder, PathCommand};
use crate::record::ComplexGeometry;
use crate::types::ViewBox;

/// The escape code carried in bits 8-12 of an escape segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    Extension,
    AngleEllipseTo,
    AngleEllipse,
    ArcTo,
    Arc,
    ClockwiseArcTo,
    ClockwiseArc,
    EllipticalQuadrantX,
    EllipticalQuadrantY,
    QuadraticBezier,
    NoFill,
    NoLine,
    AutoLine,
    AutoCurve,
    CornerLine,
    CornerCurve,
    SmoothLine,
    SmoothCurve,
    SymmetricLine,
    SymmetricCurve,
    Freeform,
    FillColor,
    LineColor,
    Unknown(u8),
}

impl EscapeKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => EscapeKind::Extension,
            0x01 => EscapeKind::AngleEllipseTo,
            0x02 => EscapeKind::AngleEllipse,
            0x03 => EscapeKind::ArcTo,
            0x04 => EscapeKind::Arc,
            0x05 => EscapeKind::ClockwiseArcTo,
            0x06 => EscapeKind::ClockwiseArc,
            0x07 => EscapeKind::EllipticalQuadrantX,
            0x08 => EscapeKind::EllipticalQuadrantY,
            0x09 => EscapeKind::QuadraticBezier,
            0x0A => EscapeKind::NoFill,
            0x0B => EscapeKind::NoLine,
            0x0C => EscapeKind::AutoLine,
            0x0D => EscapeKind::AutoCurve,
            0x0E => EscapeKind::CornerLine,
            0x0F => EscapeKind::CornerCurve,
            0x10 => EscapeKind::SmoothLine,
            0x11 => EscapeKind::SmoothCurve,
            0x12 => EscapeKind::SymmetricLine,
            0x13 => EscapeKind::SymmetricCurve,
            0x14 => EscapeKind::Freeform,
            0x15 => EscapeKind::FillColor,
            0x16 => EscapeKind::LineColor,
            other => EscapeKind::Unknown(other),
        }
    }
}

/// Payload of an escape segment. Opaque to geometry decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapePayload {
    pub kind: EscapeKind,
    /// Vertex count declared in bits 0-7
    pub vertex_count: u8,
}

/// One decoded segment word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// `count` is the segment count field (bits 0-12)
    LineTo { count: u16 },
    CurveTo { count: u16 },
    MoveTo,
    Close,
    End,
    Escape(EscapePayload),
    ClientEscape(u16),
    /// Opcode 7, which MS-ODRAW leaves undefined
    Invalid(u16),
}

impl Segment {
    pub fn from_word(word: u16) -> Self {
        let count = word & 0x1FFF;
        match (word >> 13) & 0x7 {
            0 => Segment::LineTo { count },
            1 => Segment::CurveTo { count },
            2 => Segment::MoveTo,
            3 => Segment::Close,
            4 => Segment::End,
            5 => Segment::Escape(EscapePayload {
                kind: EscapeKind::from_code(((word >> 8) & 0x1F) as u8),
                vertex_count: (word & 0xFF) as u8,
            }),
            6 => Segment::ClientEscape(count),
            _ => Segment::Invalid(word),
        }
    }

    /// Vertices this segment takes from the shared cursor.
    pub fn vertices_needed(&self) -> usize {
        match self {
            Segment::LineTo { .. } | Segment::MoveTo => 1,
            Segment::CurveTo { .. } => 3,
            _ => 0,
        }
    }
}

/// Result of walking a segment list.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPath {
    pub commands: Vec<PathCommand>,
    /// Bounds of the vertices that were emitted (empty if none)
    pub bounds: ViewBox,
    /// Vertices consumed from the cursor
    pub vertices_used: usize,
    /// True if decoding stopped early because vertex data ran out
    pub truncated: bool,
}

/// Vertex cursor that refuses to read past the decoded list.
struct VertexCursor<'v> {
    vertices: &'v [DVec2],
    next: usize,
}

impl<'v> VertexCursor<'v> {
    fn new(vertices: &'v [DVec2]) -> Self {
        Self { vertices, next: 0 }
    }

    /// Take `n` vertices, or nothing if fewer than `n` remain.
    fn take(&mut self, n: usize) -> Option<&'v [DVec2]> {
        let end = self.next.checked_add(n)?;
        let taken = self.vertices.get(self.next..end)?;
        self.next = end;
        Some(taken)
    }
}

/// Decode a segment list against a vertex list.
///
/// - LineTo/MoveTo take one vertex, CurveTo takes three and emits one cubic
/// - Close and End take none
/// - `End` finishes the current run: until the next MoveTo, geometry
///   opcodes still consume their vertices but emit nothing, and escapes are
///   ignored
/// - Escapes and client escapes never touch the cursor
///
/// If an opcode needs more vertices than remain, decoding stops and the
/// commands produced so far are returned.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn decode_segments(vertices: &[DVec2], segments: &[Segment]) -> DecodedPath {
    let mut cursor = VertexCursor::new(vertices);
    let mut builder = PathBuilder::new();
    let mut run_ended = false;
    let mut truncated = false;

    for (index, segment) in segments.iter().enumerate() {
        let needed = segment.vertices_needed();
        let points = if needed > 0 {
            match cursor.take(needed) {
                Some(points) => points,
                None => {
                    warn!(
                        index,
                        needed,
                        remaining = vertices.len() - cursor.next,
                        "segment needs more vertices than remain, truncating path"
                    );
                    truncated = true;
                    break;
                }
            }
        } else {
            &[][..]
        };

        match *segment {
            Segment::MoveTo => {
                run_ended = false;
                builder.move_to(points[0]);
            }
            Segment::LineTo { .. } | Segment::CurveTo { .. } | Segment::Close if run_ended => {
                debug!(index, ?segment, "segment after end of run, skipped");
            }
            Segment::LineTo { .. } => builder.line_to(points[0]),
            Segment::CurveTo { .. } => builder.curve_to(points[0], points[1], points[2]),
            Segment::Close => builder.close(),
            Segment::End => {
                if !run_ended {
                    builder.end();
                }
                run_ended = true;
            }
            Segment::Escape(payload) => {
                debug!(index, ?payload, "escape segment ignored");
            }
            Segment::ClientEscape(payload) => {
                debug!(index, payload, "client escape segment ignored");
            }
            Segment::Invalid(word) => {
                warn!(index, word, "invalid segment opcode, skipped");
            }
        }
    }

    let bounds = builder.bounds();
    DecodedPath {
        commands: builder.into_commands(),
        bounds,
        vertices_used: cursor.next,
        truncated,
    }
}

/// Decode the vertex and segment properties of a custom shape into an
/// enhanced path.
///
/// The view box is the bounds of the decoded vertices; when none were
/// decoded it falls back to the geo rect, then to the unit square. Broken
/// arrays decode as empty rather than failing.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn decode_complex_path(geometry: &ComplexGeometry<'_>) -> EnhancedPath {
    let vertices: Vec<DVec2> = match geometry.vertices.vertices() {
        Ok(pairs) => pairs
            .into_iter()
            .map(|(x, y)| dvec2(x as f64, y as f64))
            .collect(),
        Err(e) => {
            warn!(error = %e, "vertex array unreadable");
            Vec::new()
        }
    };
    let segments: Vec<Segment> = geometry
        .segments
        .segment_words()
        .into_iter()
        .map(Segment::from_word)
        .collect();

    let decoded = decode_segments(&vertices, &segments);
    let view_box = if decoded.bounds.is_empty() {
        geometry
            .geo_rect
            .map(|r| ViewBox::new(r.x, r.y, r.right(), r.bottom()))
            .unwrap_or_else(ViewBox::unit_square)
    } else {
        decoded.bounds
    };
    EnhancedPath::new(decoded.commands, view_box)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::path_string;
    use crate::record::{ElementWidth, MsoArray};
    use crate::types::Rect;

    const LINE: u16 = 0x0001;
    const CURVE: u16 = 0x2001;
    const MOVE: u16 = 0x4000;
    const CLOSE: u16 = 0x6001;
    const END: u16 = 0x8000;
    const ESCAPE_NO_FILL: u16 = 0xAA00;
    const CLIENT_ESCAPE: u16 = 0xC005;

    fn pts(coords: &[(f64, f64)]) -> Vec<DVec2> {
        coords.iter().map(|&(x, y)| dvec2(x, y)).collect()
    }

    fn segs(words: &[u16]) -> Vec<Segment> {
        words.iter().copied().map(Segment::from_word).collect()
    }

    fn vertex_bytes(coords: &[(i16, i16)]) -> Vec<u8> {
        coords
            .iter()
            .flat_map(|&(x, y)| x.to_le_bytes().into_iter().chain(y.to_le_bytes()))
            .collect()
    }

    fn word_bytes(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn opcode_from_top_bits() {
        assert_eq!(Segment::from_word(LINE), Segment::LineTo { count: 1 });
        assert_eq!(Segment::from_word(CURVE), Segment::CurveTo { count: 1 });
        assert_eq!(Segment::from_word(MOVE), Segment::MoveTo);
        assert_eq!(Segment::from_word(CLOSE), Segment::Close);
        assert_eq!(Segment::from_word(END), Segment::End);
        assert_eq!(
            Segment::from_word(ESCAPE_NO_FILL),
            Segment::Escape(EscapePayload {
                kind: EscapeKind::NoFill,
                vertex_count: 0
            })
        );
        assert_eq!(Segment::from_word(CLIENT_ESCAPE), Segment::ClientEscape(5));
        assert_eq!(Segment::from_word(0xE000), Segment::Invalid(0xE000));
    }

    #[test]
    fn decodes_closed_triangle() {
        let vertices = pts(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let decoded = decode_segments(&vertices, &segs(&[MOVE, LINE, LINE, CLOSE, END]));
        assert_eq!(path_string(&decoded.commands), "M 0 0 L 100 0 L 50 80 Z N");
        assert_eq!(decoded.vertices_used, 3);
        assert!(!decoded.truncated);
        assert_eq!(decoded.bounds.to_string(), "0 0 100 80");
    }

    #[test]
    fn curve_is_one_cubic_per_opcode() {
        let vertices = pts(&[(0.0, 0.0), (10.0, 20.0), (30.0, 20.0), (40.0, 0.0)]);
        let decoded = decode_segments(&vertices, &segs(&[MOVE, CURVE, END]));
        assert_eq!(decoded.commands.len(), 3);
        assert_eq!(path_string(&decoded.commands), "M 0 0 C 10 20 30 20 40 0 N");
    }

    #[test]
    fn well_formed_input_consumes_exactly_its_points() {
        let vertices = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (9.0, 9.0)]);
        let words = [MOVE, LINE, CURVE, ESCAPE_NO_FILL, CLIENT_ESCAPE, CLOSE, END];
        let decoded = decode_segments(&vertices, &segs(&words));
        assert_eq!(decoded.vertices_used, 5);
        // One command per opcode, escapes produce nothing
        assert_eq!(decoded.commands.len(), words.len() - 2);
        // The unused trailing vertex is not part of the bounds
        assert_eq!(decoded.bounds.to_string(), "0 0 4 4");
    }

    #[test]
    fn truncates_when_vertices_run_out() {
        let vertices = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        let decoded = decode_segments(&vertices, &segs(&[MOVE, LINE, CURVE, LINE, END]));
        assert!(decoded.truncated);
        assert_eq!(path_string(&decoded.commands), "M 0 0 L 10 0");
        assert_eq!(decoded.vertices_used, 2);
    }

    #[test]
    fn no_vertices_gives_empty_path() {
        let decoded = decode_segments(&[], &segs(&[MOVE, LINE]));
        assert!(decoded.truncated);
        assert!(decoded.commands.is_empty());
        assert!(decoded.bounds.is_empty());
    }

    #[test]
    fn end_finishes_the_run_until_next_move() {
        let vertices = pts(&[(0.0, 0.0), (5.0, 5.0), (7.0, 7.0), (20.0, 20.0), (30.0, 20.0)]);
        let words = [MOVE, LINE, END, LINE, ESCAPE_NO_FILL, END, MOVE, LINE, END];
        let decoded = decode_segments(&vertices, &segs(&words));
        assert_eq!(
            path_string(&decoded.commands),
            "M 0 0 L 5 5 N M 20 20 L 30 20 N"
        );
        // The skipped LineTo still advanced the cursor
        assert_eq!(decoded.vertices_used, 5);
        assert_eq!(decoded.bounds.to_string(), "0 0 30 20");
    }

    #[test]
    fn decodes_property_arrays() {
        let vbytes = vertex_bytes(&[(0, 0), (200, 0), (200, -50)]);
        let sbytes = word_bytes(&[MOVE, LINE, LINE, CLOSE, END]);
        let geometry = ComplexGeometry::new(
            MsoArray::new(&vbytes, ElementWidth::Auto, 3),
            MsoArray::new(&sbytes, ElementWidth::Fixed(2), 5),
        );
        let path = decode_complex_path(&geometry);
        assert_eq!(path.path_string(), "M 0 0 L 200 0 L 200 -50 Z N");
        assert_eq!(path.view_box.to_string(), "0 -50 200 0");
    }

    #[test]
    fn overstated_vertex_count_is_not_read_past_the_buffer() {
        let vbytes = vertex_bytes(&[(0, 0), (10, 10)]);
        let sbytes = word_bytes(&[MOVE, LINE, LINE, LINE]);
        let geometry = ComplexGeometry::new(
            MsoArray::new(&vbytes, ElementWidth::Fixed(4), 40),
            MsoArray::new(&sbytes, ElementWidth::Auto, 4),
        );
        let path = decode_complex_path(&geometry);
        assert_eq!(path.path_string(), "M 0 0 L 10 10");
    }

    #[test]
    fn unreadable_vertices_fall_back_to_geo_rect() {
        let vbytes = [0u8; 12];
        let sbytes = word_bytes(&[MOVE, LINE]);
        let geometry = ComplexGeometry::new(
            MsoArray::new(&vbytes, ElementWidth::Fixed(6), 2),
            MsoArray::new(&sbytes, ElementWidth::Auto, 2),
        )
        .with_geo_rect(Rect::new(0.0, 0.0, 1000.0, 500.0));
        let path = decode_complex_path(&geometry);
        assert!(path.is_empty());
        assert_eq!(path.view_box.to_string(), "0 0 1000 500");
    }
}
