//! Preset shape outlines in the 21600×21600 unit square.
//!
//! Each preset is a fixed formula over the square, parametrized by its
//! adjustment values. The consumer stretches the square onto the shape's
//! rect, so none of these depend on the actual size.

use glam::{DVec2, dvec2};

use crate::defaults::*;
use crate::path::{EnhancedPath, PathBuilder};
use crate::types::ViewBox;

const S: f64 = COORD_SPACE;
const C: f64 = COORD_CENTER;

/// Shapes drawn from a built-in formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    RoundRectangle,
    Diamond,
    IsoscelesTriangle,
    RightTriangle,
    Parallelogram,
    Trapezoid,
    Hexagon,
    Octagon,
    Plus,
    Star,
    Seal4,
    RightArrow,
    LeftArrow,
    UpArrow,
    DownArrow,
    HomePlate,
    Chevron,
    Pentagon,
}

impl Preset {
    /// The ODF `draw:type` name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::RoundRectangle => "round-rectangle",
            Preset::Diamond => "diamond",
            Preset::IsoscelesTriangle => "isosceles-triangle",
            Preset::RightTriangle => "right-triangle",
            Preset::Parallelogram => "parallelogram",
            Preset::Trapezoid => "trapezoid",
            Preset::Hexagon => "hexagon",
            Preset::Octagon => "octagon",
            Preset::Plus => "cross",
            Preset::Star => "star5",
            Preset::Seal4 => "star4",
            Preset::RightArrow => "right-arrow",
            Preset::LeftArrow => "left-arrow",
            Preset::UpArrow => "up-arrow",
            Preset::DownArrow => "down-arrow",
            Preset::HomePlate => "pentagon-right",
            Preset::Chevron => "chevron",
            Preset::Pentagon => "pentagon",
        }
    }

    /// Default adjustment values, in slot order.
    pub fn defaults(self) -> &'static [f64] {
        match self {
            Preset::RoundRectangle => &[ROUND_RECT_ADJUST],
            Preset::IsoscelesTriangle => &[TRIANGLE_APEX],
            Preset::Parallelogram => &[PARALLELOGRAM_ADJUST],
            Preset::Trapezoid => &[TRAPEZOID_ADJUST],
            Preset::Hexagon => &[HEXAGON_ADJUST],
            Preset::Octagon => &[OCTAGON_ADJUST],
            Preset::Plus => &[PLUS_ADJUST],
            Preset::Seal4 => &[STAR4_ADJUST],
            Preset::RightArrow | Preset::DownArrow => &[ARROW_HEAD_ADJUST, ARROW_SHAFT_ADJUST],
            Preset::LeftArrow | Preset::UpArrow => &[ARROW_HEAD_ADJUST_REVERSED, ARROW_SHAFT_ADJUST],
            Preset::HomePlate => &[HOME_PLATE_ADJUST],
            Preset::Chevron => &[CHEVRON_ADJUST],
            Preset::Diamond | Preset::RightTriangle | Preset::Star | Preset::Pentagon => &[],
        }
    }

    /// Build the outline from resolved adjustment values.
    ///
    /// `adjust` is prefix-complete (see [`crate::path::resolve_modifiers`]);
    /// missing slots fall back to the preset defaults.
    pub fn path(self, adjust: &[f64]) -> EnhancedPath {
        let adj = |i: usize| {
            adjust
                .get(i)
                .or_else(|| self.defaults().get(i))
                .copied()
                .unwrap_or(0.0)
        };
        let mut b = PathBuilder::new();
        match self {
            Preset::RoundRectangle => round_rectangle(&mut b, adj(0).clamp(0.0, C)),
            Preset::Diamond => b.polygon(&[dvec2(C, 0.0), dvec2(S, C), dvec2(C, S), dvec2(0.0, C)]),
            Preset::IsoscelesTriangle => {
                let apex = adj(0).clamp(0.0, S);
                b.polygon(&[dvec2(apex, 0.0), dvec2(S, S), dvec2(0.0, S)]);
            }
            Preset::RightTriangle => b.polygon(&[dvec2(0.0, 0.0), dvec2(S, S), dvec2(0.0, S)]),
            Preset::Parallelogram => {
                let a = adj(0).clamp(0.0, S);
                b.polygon(&[dvec2(a, 0.0), dvec2(S, 0.0), dvec2(S - a, S), dvec2(0.0, S)]);
            }
            Preset::Trapezoid => {
                let a = adj(0).clamp(0.0, C);
                b.polygon(&[dvec2(0.0, 0.0), dvec2(S, 0.0), dvec2(S - a, S), dvec2(a, S)]);
            }
            Preset::Hexagon => {
                let a = adj(0).clamp(0.0, C);
                b.polygon(&[
                    dvec2(a, 0.0),
                    dvec2(S - a, 0.0),
                    dvec2(S, C),
                    dvec2(S - a, S),
                    dvec2(a, S),
                    dvec2(0.0, C),
                ]);
            }
            Preset::Octagon => {
                let a = adj(0).clamp(0.0, C);
                b.polygon(&[
                    dvec2(a, 0.0),
                    dvec2(S - a, 0.0),
                    dvec2(S, a),
                    dvec2(S, S - a),
                    dvec2(S - a, S),
                    dvec2(a, S),
                    dvec2(0.0, S - a),
                    dvec2(0.0, a),
                ]);
            }
            Preset::Plus => {
                let a = adj(0).clamp(0.0, C);
                b.polygon(&[
                    dvec2(a, 0.0),
                    dvec2(S - a, 0.0),
                    dvec2(S - a, a),
                    dvec2(S, a),
                    dvec2(S, S - a),
                    dvec2(S - a, S - a),
                    dvec2(S - a, S),
                    dvec2(a, S),
                    dvec2(a, S - a),
                    dvec2(0.0, S - a),
                    dvec2(0.0, a),
                    dvec2(a, a),
                ]);
            }
            Preset::Star => b.polygon(&STAR5),
            Preset::Seal4 => {
                let a = adj(0).clamp(0.0, C);
                b.polygon(&[
                    dvec2(0.0, C),
                    dvec2(a, a),
                    dvec2(C, 0.0),
                    dvec2(S - a, a),
                    dvec2(S, C),
                    dvec2(S - a, S - a),
                    dvec2(C, S),
                    dvec2(a, S - a),
                ]);
            }
            Preset::RightArrow => {
                let (head, shaft) = (adj(0).clamp(0.0, S), adj(1).clamp(0.0, C));
                b.polygon(&[
                    dvec2(0.0, shaft),
                    dvec2(head, shaft),
                    dvec2(head, 0.0),
                    dvec2(S, C),
                    dvec2(head, S),
                    dvec2(head, S - shaft),
                    dvec2(0.0, S - shaft),
                ]);
            }
            Preset::LeftArrow => {
                let (head, shaft) = (adj(0).clamp(0.0, S), adj(1).clamp(0.0, C));
                b.polygon(&[
                    dvec2(S, shaft),
                    dvec2(head, shaft),
                    dvec2(head, 0.0),
                    dvec2(0.0, C),
                    dvec2(head, S),
                    dvec2(head, S - shaft),
                    dvec2(S, S - shaft),
                ]);
            }
            Preset::UpArrow => {
                let (head, shaft) = (adj(0).clamp(0.0, S), adj(1).clamp(0.0, C));
                b.polygon(&[
                    dvec2(shaft, S),
                    dvec2(shaft, head),
                    dvec2(0.0, head),
                    dvec2(C, 0.0),
                    dvec2(S, head),
                    dvec2(S - shaft, head),
                    dvec2(S - shaft, S),
                ]);
            }
            Preset::DownArrow => {
                let (head, shaft) = (adj(0).clamp(0.0, S), adj(1).clamp(0.0, C));
                b.polygon(&[
                    dvec2(shaft, 0.0),
                    dvec2(S - shaft, 0.0),
                    dvec2(S - shaft, head),
                    dvec2(S, head),
                    dvec2(C, S),
                    dvec2(0.0, head),
                    dvec2(shaft, head),
                ]);
            }
            Preset::HomePlate => {
                let a = adj(0).clamp(0.0, S);
                b.polygon(&[dvec2(0.0, 0.0), dvec2(a, 0.0), dvec2(S, C), dvec2(a, S), dvec2(0.0, S)]);
            }
            Preset::Chevron => {
                let a = adj(0).clamp(0.0, S);
                b.polygon(&[
                    dvec2(0.0, 0.0),
                    dvec2(a, 0.0),
                    dvec2(S, C),
                    dvec2(a, S),
                    dvec2(0.0, S),
                    dvec2(S - a, C),
                ]);
            }
            Preset::Pentagon => b.polygon(&PENTAGON),
        }
        b.build(ViewBox::unit_square())
    }
}

const STAR5: [DVec2; 10] = [
    DVec2::new(10797.0, 0.0),
    DVec2::new(8278.0, 8256.0),
    DVec2::new(0.0, 8256.0),
    DVec2::new(6722.0, 13405.0),
    DVec2::new(4198.0, 21600.0),
    DVec2::new(10797.0, 16580.0),
    DVec2::new(17401.0, 21600.0),
    DVec2::new(14878.0, 13405.0),
    DVec2::new(21600.0, 8256.0),
    DVec2::new(13321.0, 8256.0),
];

const PENTAGON: [DVec2; 5] = [
    DVec2::new(10800.0, 0.0),
    DVec2::new(0.0, 8260.0),
    DVec2::new(4230.0, 21600.0),
    DVec2::new(17370.0, 21600.0),
    DVec2::new(21600.0, 8260.0),
];

/// Straight edges joined by elliptical quadrants of radius `r`.
fn round_rectangle(b: &mut PathBuilder, r: f64) {
    b.move_to(dvec2(r, 0.0));
    b.line_to(dvec2(S - r, 0.0));
    b.quadrant_x(dvec2(S, r));
    b.line_to(dvec2(S, S - r));
    b.quadrant_y(dvec2(S - r, S));
    b.line_to(dvec2(r, S));
    b.quadrant_x(dvec2(0.0, S - r));
    b.line_to(dvec2(0.0, r));
    b.quadrant_y(dvec2(r, 0.0));
    b.close();
    b.end();
}
