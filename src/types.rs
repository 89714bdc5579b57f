//! Strongly-typed geometry primitives shared by the decoders.
//!
//! - `Rect` is the frame a shape occupies, in the reader's abstract units
//! - `ViewBox` accumulates the coordinate bounds of an enhanced path
//! - `NormalizedAngle` is a rotation folded into `[0, 360)`

use std::fmt;

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Axis-aligned rectangle, `(x, y)` is the top-left corner (Y-down).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build from the left/top/right/bottom form used by shape anchors.
    ///
    /// Inverted edges are swapped so width and height are never negative.
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let (x0, x1) = if left <= right { (left, right) } else { (right, left) };
        let (y0, y1) = if top <= bottom { (top, bottom) } else { (bottom, top) };
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn center(&self) -> DVec2 {
        dvec2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Corners in path order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            dvec2(self.x, self.y),
            dvec2(self.right(), self.y),
            dvec2(self.right(), self.bottom()),
            dvec2(self.x, self.bottom()),
        ]
    }
}

/// Coordinate bounds of a path, serialized as `"minX minY maxX maxY"`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl ViewBox {
    /// An empty box; expands on the first point.
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: dvec2(min_x, min_y),
            max: dvec2(max_x, max_y),
        }
    }

    /// The `0 0 21600 21600` unit square of the legacy drawing coordinate space.
    pub fn unit_square() -> Self {
        let side = crate::defaults::COORD_SPACE;
        Self::new(0.0, 0.0, side, side)
    }

    /// Check if the box is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min.x, self.min.y, self.width(), self.height())
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.min.x),
            fmt_num(self.min.y),
            fmt_num(self.max.x),
            fmt_num(self.max.y)
        )
    }
}

/// Rotation in whole degrees, always in `[0, 360)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct NormalizedAngle(u16);

impl NormalizedAngle {
    pub const ZERO: NormalizedAngle = NormalizedAngle(0);

    /// Fold a raw rotation into `[0, 360)`.
    ///
    /// The fractional part is truncated toward zero before the modulo, so
    /// `-10.7` becomes `350`, not `349`.
    pub fn from_degrees(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::ZERO;
        }
        let mut angle = (raw.trunc() % 360.0) as i32;
        if angle < 0 {
            angle += 360;
        }
        NormalizedAngle(angle as u16)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    /// True for the near-vertical quadrants `[45, 135)` and `[225, 315)`.
    pub fn is_near_vertical(self) -> bool {
        matches!(self.0, 45..=134 | 225..=314)
    }
}

impl fmt::Display for NormalizedAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a number with 6 significant figures, trailing zeros trimmed (C's `%g`).
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, crate::defaults::SIGNIFICANT_DIGITS as i32)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_negative_angle() {
        assert_eq!(NormalizedAngle::from_degrees(-10.0).degrees(), 350);
    }

    #[test]
    fn normalize_is_periodic() {
        for r in -1000..1000 {
            let base = NormalizedAngle::from_degrees(r as f64);
            assert!(base.degrees() < 360);
            for k in -3..=3 {
                let shifted = NormalizedAngle::from_degrees((r + 360 * k) as f64);
                assert_eq!(base, shifted, "r={r} k={k}");
            }
        }
    }

    #[test]
    fn normalize_truncates_fraction() {
        assert_eq!(NormalizedAngle::from_degrees(89.9).degrees(), 89);
        assert_eq!(NormalizedAngle::from_degrees(-10.7).degrees(), 350);
        assert_eq!(NormalizedAngle::from_degrees(f64::NAN).degrees(), 0);
    }

    #[test]
    fn near_vertical_quadrants() {
        let q = |d: f64| NormalizedAngle::from_degrees(d).is_near_vertical();
        assert!(!q(0.0));
        assert!(!q(44.0));
        assert!(q(45.0));
        assert!(q(90.0));
        assert!(q(134.0));
        assert!(!q(135.0));
        assert!(!q(180.0));
        assert!(q(225.0));
        assert!(q(270.0));
        assert!(!q(315.0));
    }

    #[test]
    fn rect_from_inverted_edges() {
        let r = Rect::from_ltrb(100.0, 50.0, 0.0, 0.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn view_box_tracks_bounds() {
        let mut vb = ViewBox::empty();
        assert!(vb.is_empty());
        vb.expand_point(dvec2(10.0, -5.0));
        vb.expand_point(dvec2(-3.0, 20.0));
        assert_eq!(vb.to_string(), "-3 -5 10 20");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(21600.0), "21600");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-1.5707963), "-1.5708");
        assert_eq!(fmt_num(1e-9), "0.000000001");
    }
}
