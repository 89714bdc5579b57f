//! Rotation normalization and the flip/rotate frame of a shape.
//!
//! Shape records carry a raw rotation (degrees, any range, any sign) and two
//! flip flags. Geometry is always built unrotated in the shape's own
//! rectangle; the frame then maps it into place by flipping about the
//! center first and rotating second.

use glam::{DAffine2, DVec2, dvec2};

use crate::path::PathCommand;
use crate::shape_type::ShapeType;
use crate::types::{NormalizedAngle, Rect, ViewBox, fmt_num};

/// Normalize a raw rotation to whole degrees in `[0, 360)`.
///
/// The fraction is truncated, not rounded: `-10.7` is `350`, `89.9` is `89`.
pub fn normalize_rotation(raw_degrees: f64) -> NormalizedAngle {
    NormalizedAngle::from_degrees(raw_degrees)
}

/// Rotate a rect by a quarter turn about its own center (swaps its sides).
pub fn quarter_turn(rect: Rect) -> Rect {
    let c = rect.center();
    Rect::new(
        c.x - rect.height / 2.0,
        c.y - rect.width / 2.0,
        rect.height,
        rect.width,
    )
}

/// Correct the stored bounding box of a rotated shape.
///
/// Custom shapes (`NotPrimitive`) store their rect with the unrotated aspect
/// ratio; when the rotation is near vertical the rect is turned a quarter
/// about its center. Every other shape type passes through unchanged.
pub fn adjust_rect_for_rotation(shape_type: i32, raw_degrees: f64, rect: Rect) -> Rect {
    if shape_type != ShapeType::NotPrimitive.code() as i32 {
        return rect;
    }
    if normalize_rotation(raw_degrees).is_near_vertical() {
        quarter_turn(rect)
    } else {
        rect
    }
}

/// Placement of a shape: its rect plus the flips and rotation applied
/// around the rect's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub rect: Rect,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Raw rotation in degrees, clockwise
    pub rotation: f64,
}

impl Frame {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            flip_h: false,
            flip_v: false,
            rotation: 0.0,
        }
    }

    pub fn with_flip(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_h = horizontal;
        self.flip_v = vertical;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn angle(&self) -> NormalizedAngle {
        normalize_rotation(self.rotation)
    }

    /// True unless the normalized angle is zero.
    pub fn is_rotated(&self) -> bool {
        self.angle() != NormalizedAngle::ZERO
    }

    /// The normalized angle in radians. Geometry and `draw:transform` both
    /// turn by the truncated whole degrees, never by the raw fraction.
    fn radians(&self) -> f64 {
        f64::from(self.angle().degrees()).to_radians()
    }

    fn flip_scale(&self) -> DVec2 {
        dvec2(
            if self.flip_h { -1.0 } else { 1.0 },
            if self.flip_v { -1.0 } else { 1.0 },
        )
    }

    /// `T(center) · R(rotation) · S(flip) · T(-center)`.
    ///
    /// With y pointing down, a positive angle turns clockwise on screen.
    pub fn transform(&self) -> DAffine2 {
        let center = self.rect.center();
        DAffine2::from_translation(center)
            * DAffine2::from_angle(self.radians())
            * DAffine2::from_scale(self.flip_scale())
            * DAffine2::from_translation(-center)
    }

    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.transform().transform_point2(p)
    }

    /// Apply the frame to already-built geometry. Control points move with
    /// the curve; symbolic points are left alone.
    pub fn apply(&self, commands: Vec<PathCommand>) -> Vec<PathCommand> {
        let affine = self.transform();
        commands
            .into_iter()
            .map(|c| c.map_points(|p| affine.transform_point2(p)))
            .collect()
    }

    /// Axis-aligned bounds of the rect after flip and rotation.
    pub fn transformed_bounds(&self) -> Rect {
        let affine = self.transform();
        let mut bounds = ViewBox::empty();
        for corner in self.rect.corners() {
            bounds.expand_point(affine.transform_point2(corner));
        }
        bounds.to_rect()
    }

    /// The `draw:transform` value for a rotated shape placed by its size
    /// alone: move the center to the origin, rotate (ODF angles turn
    /// counter-clockwise, hence the negation), then move to the center.
    pub fn draw_transform(&self) -> Option<String> {
        self.draw_transform_with(fmt_num)
    }

    /// Like [`Frame::draw_transform`], formatting the translations with
    /// `length` (which may scale and add a unit).
    pub fn draw_transform_with(&self, length: impl Fn(f64) -> String) -> Option<String> {
        if !self.is_rotated() {
            return None;
        }
        let c = self.rect.center();
        Some(format!(
            "translate({} {}) rotate({}) translate({} {})",
            length(-self.rect.width / 2.0),
            length(-self.rect.height / 2.0),
            fmt_num(-self.radians()),
            length(c.x),
            length(c.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(-10.0).degrees(), 350);
        assert_eq!(normalize_rotation(720.0).degrees(), 0);
        assert_eq!(normalize_rotation(-360.0).degrees(), 0);
        assert_eq!(normalize_rotation(450.5).degrees(), 90);
    }

    #[test]
    fn test_custom_shape_swaps_near_vertical() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let turned = adjust_rect_for_rotation(0, 90.0, rect);
        assert_eq!(turned, Rect::new(25.0, -25.0, 50.0, 100.0));
        assert_eq!(turned.center(), rect.center());

        assert_eq!(adjust_rect_for_rotation(0, 0.0, rect), rect);
        assert_eq!(adjust_rect_for_rotation(0, 180.0, rect), rect);
        assert_eq!(adjust_rect_for_rotation(0, -90.0, rect).width, 50.0);
        assert_eq!(adjust_rect_for_rotation(0, 44.9, rect), rect);
    }

    #[test]
    fn test_other_shapes_never_swap() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(adjust_rect_for_rotation(1, 90.0, rect), rect);
        assert_eq!(adjust_rect_for_rotation(9999, 90.0, rect), rect);
    }

    #[test]
    fn test_flip_before_rotate() {
        let frame = Frame::new(Rect::new(0.0, 0.0, 100.0, 50.0))
            .with_flip(true, false)
            .with_rotation(90.0);
        assert!(close(frame.transform_point(dvec2(0.0, 0.0)), dvec2(75.0, 75.0)));
        // The opposite order would land at (25, -25)
    }

    #[test]
    fn test_flip_only() {
        let frame = Frame::new(Rect::new(0.0, 0.0, 100.0, 50.0)).with_flip(false, true);
        assert!(close(frame.transform_point(dvec2(10.0, 0.0)), dvec2(10.0, 50.0)));
        assert!(!frame.is_rotated());
        assert_eq!(frame.draw_transform(), None);
    }

    #[test]
    fn test_transformed_bounds_quarter_turn() {
        let frame = Frame::new(Rect::new(0.0, 0.0, 100.0, 50.0)).with_rotation(90.0);
        let bounds = frame.transformed_bounds();
        assert!((bounds.width - 50.0).abs() < 1e-9);
        assert!((bounds.height - 100.0).abs() < 1e-9);
        assert!(close(bounds.center(), dvec2(50.0, 25.0)));
    }

    #[test]
    fn test_draw_transform() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(Frame::new(rect).draw_transform(), None);
        assert_eq!(Frame::new(rect).with_rotation(360.0).draw_transform(), None);
        assert_eq!(
            Frame::new(rect).with_rotation(90.0).draw_transform().as_deref(),
            Some("translate(-50 -25) rotate(-1.5708) translate(50 25)")
        );
        assert_eq!(
            Frame::new(rect).with_rotation(-90.0).draw_transform().as_deref(),
            Some("translate(-50 -25) rotate(-4.71239) translate(50 25)")
        );
    }

    #[test]
    fn test_fractional_rotation_uses_whole_degrees() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let frame = Frame::new(rect).with_rotation(45.9);
        assert_eq!(frame.angle().degrees(), 45);
        assert_eq!(
            frame.draw_transform().as_deref(),
            Some("translate(-50 -25) rotate(-0.785398) translate(50 25)")
        );
        assert_eq!(
            Frame::new(rect).with_rotation(-10.7).draw_transform().as_deref(),
            Some("translate(-50 -25) rotate(-6.10865) translate(50 25)")
        );

        // Below one degree truncates to no rotation at all
        let nearly_flat = Frame::new(rect).with_rotation(0.6);
        assert!(!nearly_flat.is_rotated());
        assert_eq!(nearly_flat.draw_transform(), None);
        assert!(close(nearly_flat.transform_point(dvec2(0.0, 0.0)), dvec2(0.0, 0.0)));
    }

    #[test]
    fn test_apply_moves_control_points() {
        let frame = Frame::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_flip(true, false);
        let out = frame.apply(vec![PathCommand::curve_to(0.0, 0.0, 2.0, 0.0, 10.0, 10.0)]);
        assert_eq!(out, vec![PathCommand::curve_to(10.0, 0.0, 8.0, 0.0, 0.0, 10.0)]);
    }
}
