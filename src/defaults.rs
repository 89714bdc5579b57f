//! Fixed constants of the legacy drawing formats.

/// Side of the unit coordinate square preset shapes are expressed in.
pub const COORD_SPACE: f64 = 21600.0;

/// Half of [`COORD_SPACE`], the center coordinate of preset shapes.
pub const COORD_CENTER: f64 = 10800.0;

/// Number of adjustment value slots a shape record can carry.
pub const MAX_ADJUST_VALUES: usize = 8;

/// `cbElem` sentinel meaning "element width decided by the property" in an IMsoArray.
pub const AUTO_ELEMENT_WIDTH: u16 = 0xFFF0;

/// Size of the IMsoArray header (`nElems`, `nElemsAlloc`, `cbElem`).
pub const MSO_ARRAY_HEADER_LEN: usize = 6;

/// Output number precision, matching C's `%g`.
pub const SIGNIFICANT_DIGITS: u8 = 6;

/// VML fixed-point degrees per degree.
pub const FIXED_DEGREES: u32 = 65536;

// Preset adjustment defaults (in unit-square coordinates)
pub const ROUND_RECT_ADJUST: f64 = 3600.0;
pub const TRIANGLE_APEX: f64 = 10800.0;
pub const PARALLELOGRAM_ADJUST: f64 = 5400.0;
pub const TRAPEZOID_ADJUST: f64 = 5400.0;
pub const HEXAGON_ADJUST: f64 = 5400.0;
pub const OCTAGON_ADJUST: f64 = 6326.0;
pub const PLUS_ADJUST: f64 = 5400.0;
pub const STAR4_ADJUST: f64 = 8100.0;
pub const HOME_PLATE_ADJUST: f64 = 16200.0;
pub const CHEVRON_ADJUST: f64 = 16200.0;
pub const ARROW_HEAD_ADJUST: f64 = 16200.0;
pub const ARROW_HEAD_ADJUST_REVERSED: f64 = 5400.0;
pub const ARROW_SHAFT_ADJUST: f64 = 5400.0;
