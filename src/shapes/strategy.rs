//! Per-shape geometry strategies and the shape-type fallback table.
//!
//! Most of the ~200 shape types have no formula of their own. Each type is
//! mapped to the nearest shape that does (a flowchart process is drawn as a
//! rectangle, a decision as a diamond), or to [`Unimplemented`], which
//! yields no geometry. The table in [`strategy_for`] is the single place
//! that decides this.

use enum_dispatch::enum_dispatch;

use crate::binary::decode_complex_path;
use crate::path::resolve_modifiers;
use crate::record::ShapeRecord;
use crate::shape_type::ShapeType;
use crate::transform::Frame;

use super::connectors::{Connector, ConnectorPath};
use super::presets::Preset;
use super::{EnhancedGeometry, NON_PRIMITIVE, StandardKind, UnhandledReason};

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'r, 'a> {
    pub shape_type: ShapeType,
    pub record: &'r ShapeRecord<'a>,
    /// The rotation-corrected rect with the record's flips and rotation
    pub frame: Frame,
}

/// What a strategy produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A plain ODF element, placed by the frame
    Standard(StandardKind),
    /// Enhanced geometry placed by the frame; mirrors follow the flips
    Custom(EnhancedGeometry),
    /// A path with flips and rotation already applied
    Baked(ConnectorPath),
    Missing(UnhandledReason),
}

#[enum_dispatch]
pub trait GeometryBuilder {
    fn build(&self, input: &BuildInput<'_, '_>) -> Geometry;
}

#[enum_dispatch(GeometryBuilder)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Rectangle(RectangleGeometry),
    Ellipse(EllipseGeometry),
    Line(LineGeometry),
    PictureFrame(PictureFrameGeometry),
    TextBox(TextBoxGeometry),
    HostControl(HostControlGeometry),
    Preset(Preset),
    Connector(Connector),
    Complex(ComplexPath),
    Unimplemented(Unimplemented),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectangleGeometry;

impl GeometryBuilder for RectangleGeometry {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Standard(StandardKind::Rect)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipseGeometry;

impl GeometryBuilder for EllipseGeometry {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Standard(StandardKind::Ellipse)
    }
}

/// A line along the rect's diagonal, endpoints moved by flip and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGeometry;

impl GeometryBuilder for LineGeometry {
    fn build(&self, input: &BuildInput<'_, '_>) -> Geometry {
        let [top_left, _, bottom_right, _] = input.frame.rect.corners();
        Geometry::Standard(StandardKind::Line {
            start: input.frame.transform_point(top_left),
            end: input.frame.transform_point(bottom_right),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureFrameGeometry;

impl GeometryBuilder for PictureFrameGeometry {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Standard(StandardKind::Picture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBoxGeometry;

impl GeometryBuilder for TextBoxGeometry {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Standard(StandardKind::TextBox)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostControlGeometry;

impl GeometryBuilder for HostControlGeometry {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Standard(StandardKind::Control)
    }
}

impl GeometryBuilder for Preset {
    fn build(&self, input: &BuildInput<'_, '_>) -> Geometry {
        let modifiers = resolve_modifiers(&input.record.adjust.as_f64(), self.defaults());
        let path = self.path(&modifiers).with_modifiers(modifiers);
        Geometry::Custom(EnhancedGeometry::new(path).with_preset(self.name()))
    }
}

impl GeometryBuilder for Connector {
    fn build(&self, input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Baked(self.bake(&input.frame, &input.record.adjust))
    }
}

/// Geometry read from the record's vertex and segment arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexPath;

impl GeometryBuilder for ComplexPath {
    fn build(&self, input: &BuildInput<'_, '_>) -> Geometry {
        let Some(complex) = input.record.complex.as_ref() else {
            return Geometry::Missing(UnhandledReason::MissingGeometry);
        };
        let path = decode_complex_path(complex);
        if path.is_empty() {
            return Geometry::Missing(UnhandledReason::MissingGeometry);
        }
        let modifiers = resolve_modifiers(&input.record.adjust.as_f64(), &[]);
        Geometry::Custom(EnhancedGeometry::new(path.with_modifiers(modifiers)).with_preset(NON_PRIMITIVE))
    }
}

/// No formula and no sensible stand-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unimplemented;

impl GeometryBuilder for Unimplemented {
    fn build(&self, _input: &BuildInput<'_, '_>) -> Geometry {
        Geometry::Missing(UnhandledReason::Unimplemented)
    }
}

/// The shape-type fallback table.
pub fn strategy_for(shape_type: ShapeType) -> Strategy {
    use ShapeType as T;

    match shape_type {
        T::NotPrimitive => ComplexPath.into(),
        // Files in the wild store notched circular arrows under the arc code;
        // both are only drawable from their vertex arrays
        T::Arc | T::NotchedCircularArrow => ComplexPath.into(),

        T::Rectangle | T::FlowChartProcess | T::WedgeRectCallout => RectangleGeometry.into(),
        T::RoundRectangle | T::FlowChartAlternateProcess | T::WedgeRRectCallout => Preset::RoundRectangle.into(),
        T::Ellipse | T::FlowChartConnector | T::WedgeEllipseCallout => EllipseGeometry.into(),
        T::Diamond | T::FlowChartDecision => Preset::Diamond.into(),
        T::IsocelesTriangle => Preset::IsoscelesTriangle.into(),
        T::RightTriangle => Preset::RightTriangle.into(),
        T::Parallelogram | T::FlowChartInputOutput => Preset::Parallelogram.into(),
        T::Trapezoid => Preset::Trapezoid.into(),
        T::Hexagon | T::FlowChartPreparation => Preset::Hexagon.into(),
        T::Octagon => Preset::Octagon.into(),
        T::Plus => Preset::Plus.into(),
        T::Star => Preset::Star.into(),
        T::Seal4 => Preset::Seal4.into(),
        T::Arrow => Preset::RightArrow.into(),
        T::LeftArrow => Preset::LeftArrow.into(),
        T::UpArrow => Preset::UpArrow.into(),
        T::DownArrow => Preset::DownArrow.into(),
        T::HomePlate => Preset::HomePlate.into(),
        T::Chevron => Preset::Chevron.into(),
        T::Pentagon => Preset::Pentagon.into(),

        T::Line => LineGeometry.into(),
        T::StraightConnector1 => Connector::Straight.into(),
        T::BentConnector2 => Connector::Bent2.into(),
        T::BentConnector3 | T::BentConnector4 | T::BentConnector5 => Connector::Bent3.into(),
        T::CurvedConnector2 | T::CurvedConnector3 | T::CurvedConnector4 | T::CurvedConnector5 => {
            Connector::Curved.into()
        }

        T::PictureFrame => PictureFrameGeometry.into(),
        T::TextBox => TextBoxGeometry.into(),
        T::HostControl => HostControlGeometry.into(),

        // WordArt, callouts with leader lines and action buttons keep their
        // text and placement; the frame is drawn as a plain rectangle
        t if t.is_text_effect() || t.is_line_callout() || t.is_action_button() => RectangleGeometry.into(),

        _ => Unimplemented.into(),
    }
}
