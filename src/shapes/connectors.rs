//! Connector geometry.
//!
//! A connector runs from the top-left to the bottom-right corner of its
//! rect; flips pick the other diagonal. Unlike other shapes, the flip and
//! rotation are applied to the built path itself, so the emitted shape
//! needs neither mirror attributes nor a `draw:transform`.

use glam::dvec2;

use crate::defaults::{COORD_CENTER, COORD_SPACE};
use crate::path::{EnhancedPath, PathBuilder, PathCommand};
use crate::record::AdjustValues;
use crate::transform::Frame;
use crate::types::{Rect, ViewBox};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Straight,
    /// One bend: along x first, then y
    Bent2,
    /// Two bends at the elbow position (adjust 0, default the midpoint)
    Bent3,
    /// Cubic curve through the elbow position
    Curved,
}

/// A connector path with transforms baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    /// Absolute coordinates; the view box is the path's own bounds
    pub path: EnhancedPath,
    /// The view box as a rect, i.e. where the shape ends up
    pub bounds: Rect,
}

impl Connector {
    /// Untransformed commands in the coordinates of `rect`.
    pub fn commands(self, rect: Rect, adjust: &AdjustValues) -> Vec<PathCommand> {
        let start = dvec2(rect.x, rect.y);
        let end = dvec2(rect.right(), rect.bottom());
        let elbow_x = rect.x + rect.width * adjust.value_or(0, COORD_CENTER) / COORD_SPACE;

        let mut b = PathBuilder::new();
        b.move_to(start);
        match self {
            Connector::Straight => b.line_to(end),
            Connector::Bent2 => b.polyline(&[dvec2(end.x, start.y), end]),
            Connector::Bent3 => b.polyline(&[dvec2(elbow_x, start.y), dvec2(elbow_x, end.y), end]),
            Connector::Curved => b.curve_to(dvec2(elbow_x, start.y), dvec2(elbow_x, end.y), end),
        }
        b.end();
        b.into_commands()
    }

    /// Build the connector and apply the frame's flip and rotation to it.
    pub fn bake(self, frame: &Frame, adjust: &AdjustValues) -> ConnectorPath {
        let mut b = PathBuilder::new();
        for command in frame.apply(self.commands(frame.rect, adjust)) {
            b.push(command);
        }
        let path = b.build_with_bounds(ViewBox::new(
            frame.rect.x,
            frame.rect.y,
            frame.rect.right(),
            frame.rect.bottom(),
        ));
        let bounds = path.view_box.to_rect();
        ConnectorPath { path, bounds }
    }
}
