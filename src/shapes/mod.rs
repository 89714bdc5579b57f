//! Shape dispatch: from a shape record to the geometry the writer emits.
//!
//! [`decode`] normalizes the record's rect for rotation, looks the shape
//! type up in the fallback table, and lets the chosen strategy build the
//! geometry. Nothing here fails: an unknown type or a shape without usable
//! geometry becomes [`DecodeOutcome::Unhandled`] and the caller decides
//! what placeholder, if any, to write.

pub mod connectors;
pub mod presets;
pub mod strategy;

use glam::DVec2;

use crate::log::{debug, warn};
use crate::path::EnhancedPath;
use crate::record::ShapeRecord;
use crate::shape_type::ShapeType;
use crate::transform::{Frame, adjust_rect_for_rotation};
use crate::vml::Equation;

pub use connectors::{Connector, ConnectorPath};
pub use presets::Preset;
pub use strategy::{BuildInput, Geometry, GeometryBuilder, Strategy, strategy_for};

/// `draw:type` of geometry taken verbatim from a path.
pub const NON_PRIMITIVE: &str = "non-primitive";

/// The content of a `draw:enhanced-geometry` element.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedGeometry {
    /// `draw:type`
    pub preset: Option<&'static str>,
    pub path: EnhancedPath,
    pub equations: Vec<Equation>,
    pub mirror_horizontal: bool,
    pub mirror_vertical: bool,
}

impl EnhancedGeometry {
    pub fn new(path: EnhancedPath) -> Self {
        Self {
            preset: None,
            path,
            equations: Vec::new(),
            mirror_horizontal: false,
            mirror_vertical: false,
        }
    }

    pub fn with_preset(mut self, name: &'static str) -> Self {
        self.preset = Some(name);
        self
    }

    pub fn with_equations(mut self, equations: Vec<Equation>) -> Self {
        self.equations = equations;
        self
    }

    pub fn with_mirror(mut self, horizontal: bool, vertical: bool) -> Self {
        self.mirror_horizontal = horizontal;
        self.mirror_vertical = vertical;
        self
    }
}

/// Shapes written as a plain ODF element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardKind {
    Rect,
    Ellipse,
    /// Endpoints with flip and rotation applied
    Line { start: DVec2, end: DVec2 },
    Picture,
    TextBox,
    Control,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardShape {
    pub shape_type: ShapeType,
    pub kind: StandardKind,
    pub frame: Frame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomShape {
    pub shape_type: ShapeType,
    pub frame: Frame,
    pub geometry: EnhancedGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhandledReason {
    /// The code is not a known shape type
    UnknownType,
    /// Known type without a formula or stand-in
    Unimplemented,
    /// The type needs vertex/segment arrays the record lacks
    MissingGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnhandledShape {
    pub code: i32,
    pub shape_type: Option<ShapeType>,
    pub reason: UnhandledReason,
    /// Where the shape would have been, for placeholders
    pub frame: Frame,
}

/// Result of decoding one shape record.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Standard(StandardShape),
    Custom(CustomShape),
    Unhandled(UnhandledShape),
}

impl DecodeOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, DecodeOutcome::Unhandled(_))
    }

    pub fn frame(&self) -> &Frame {
        match self {
            DecodeOutcome::Standard(s) => &s.frame,
            DecodeOutcome::Custom(c) => &c.frame,
            DecodeOutcome::Unhandled(u) => &u.frame,
        }
    }

    pub fn geometry(&self) -> Option<&EnhancedGeometry> {
        match self {
            DecodeOutcome::Custom(c) => Some(&c.geometry),
            _ => None,
        }
    }
}

/// Decode a shape record using its own shape-type code.
pub fn decode(record: &ShapeRecord<'_>) -> DecodeOutcome {
    dispatch(record.shape_type, record)
}

/// Decode `record` as shape type `code`.
pub fn dispatch(code: i32, record: &ShapeRecord<'_>) -> DecodeOutcome {
    let rect = adjust_rect_for_rotation(code, record.rotation, record.bounds);
    let frame = Frame::new(rect)
        .with_flip(record.flip_h, record.flip_v)
        .with_rotation(record.rotation);

    let Some(shape_type) = ShapeType::from_code(code) else {
        warn!(code, "unknown shape type, geometry omitted");
        return DecodeOutcome::Unhandled(UnhandledShape {
            code,
            shape_type: None,
            reason: UnhandledReason::UnknownType,
            frame,
        });
    };

    let strategy = strategy_for(shape_type);
    debug!(%shape_type, ?strategy, angle = %frame.angle(), "dispatching shape");

    let input = BuildInput {
        shape_type,
        record,
        frame,
    };
    match strategy.build(&input) {
        Geometry::Standard(kind) => DecodeOutcome::Standard(StandardShape {
            shape_type,
            kind,
            frame,
        }),
        Geometry::Custom(geometry) => DecodeOutcome::Custom(CustomShape {
            shape_type,
            frame,
            geometry: geometry.with_mirror(record.flip_h, record.flip_v),
        }),
        Geometry::Baked(connector) => DecodeOutcome::Custom(CustomShape {
            shape_type,
            frame: Frame::new(connector.bounds),
            geometry: EnhancedGeometry::new(connector.path).with_preset(NON_PRIMITIVE),
        }),
        Geometry::Missing(reason) => {
            warn!(%shape_type, ?reason, "shape has no geometry");
            DecodeOutcome::Unhandled(UnhandledShape {
                code,
                shape_type: Some(shape_type),
                reason,
                frame,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ComplexGeometry, ElementWidth, MsoArray};
    use crate::types::Rect;

    fn record(shape_type: i32) -> ShapeRecord<'static> {
        ShapeRecord::new(shape_type, Rect::new(0.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn test_unknown_code_is_unhandled() {
        for code in [-1, 203, 4095, i32::MAX] {
            let outcome = decode(&record(code));
            assert!(matches!(
                outcome,
                DecodeOutcome::Unhandled(UnhandledShape {
                    reason: UnhandledReason::UnknownType,
                    shape_type: None,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_rectangle_is_standard() {
        let outcome = decode(&record(1));
        let DecodeOutcome::Standard(shape) = &outcome else {
            panic!("expected a standard shape: {outcome:?}");
        };
        assert_eq!(shape.kind, StandardKind::Rect);
        assert_eq!(shape.frame.rect, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(!shape.frame.is_rotated());
    }

    #[test]
    fn test_preset_gets_mirrors_and_modifiers() {
        let outcome = decode(&record(2).with_flip(true, false).with_adjust(0, 1000));
        let geometry = outcome.geometry().cloned();
        let Some(geometry) = geometry else {
            panic!("expected custom geometry: {outcome:?}");
        };
        assert_eq!(geometry.preset, Some("round-rectangle"));
        assert!(geometry.mirror_horizontal);
        assert!(!geometry.mirror_vertical);
        assert_eq!(geometry.path.modifiers_string().as_deref(), Some("1000"));
    }

    #[test]
    fn test_custom_shape_without_arrays() {
        let outcome = decode(&record(0));
        assert!(matches!(
            outcome,
            DecodeOutcome::Unhandled(UnhandledShape {
                reason: UnhandledReason::MissingGeometry,
                shape_type: Some(ShapeType::NotPrimitive),
                ..
            })
        ));
    }

    #[test]
    fn test_arc_code_decodes_vertex_arrays() {
        let vertices: Vec<u8> = [0i16, 0, 100, 0, 100, 50]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let segments: Vec<u8> = [0x4000u16, 0x0001, 0x0001, 0x8000]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        let complex = ComplexGeometry::new(
            MsoArray::new(&vertices, ElementWidth::Fixed(4), 3),
            MsoArray::new(&segments, ElementWidth::Fixed(2), 4),
        );
        let rec = ShapeRecord::new(19, Rect::new(0.0, 0.0, 100.0, 50.0)).with_complex(complex);
        let outcome = decode(&rec);
        let Some(geometry) = outcome.geometry() else {
            panic!("expected custom geometry: {outcome:?}");
        };
        assert_eq!(geometry.preset, Some(NON_PRIMITIVE));
        assert_eq!(geometry.path.path_string(), "M 0 0 L 100 0 L 100 50 N");
    }

    #[test]
    fn test_unimplemented_shape() {
        let outcome = decode(&record(ShapeType::Heart.code() as i32));
        assert!(matches!(
            outcome,
            DecodeOutcome::Unhandled(UnhandledShape {
                reason: UnhandledReason::Unimplemented,
                ..
            })
        ));
        assert!(!outcome.is_handled());
    }

    #[test]
    fn test_connector_frame_is_path_bounds() {
        let outcome = decode(&record(34).with_rotation(90.0));
        let DecodeOutcome::Custom(shape) = outcome else {
            panic!("expected a connector");
        };
        assert!(!shape.frame.is_rotated());
        assert!((shape.frame.rect.width - 50.0).abs() < 1e-9);
        assert!(!shape.geometry.mirror_horizontal);
    }

    #[test]
    fn test_custom_shape_rect_turns_near_vertical() {
        let vertices: Vec<u8> = [0i16, 0, 10, 10].iter().flat_map(|v| v.to_le_bytes()).collect();
        let segments: Vec<u8> = [0x4000u16, 0x0001].iter().flat_map(|w| w.to_le_bytes()).collect();
        let complex = ComplexGeometry::new(
            MsoArray::new(&vertices, ElementWidth::Fixed(4), 2),
            MsoArray::new(&segments, ElementWidth::Fixed(2), 2),
        );
        let rec = record(0).with_rotation(90.0).with_complex(complex);
        let outcome = decode(&rec);
        assert_eq!(outcome.frame().rect, Rect::new(25.0, -25.0, 50.0, 100.0));
        assert!(outcome.frame().is_rotated());
    }
}
