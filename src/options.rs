//! Output options for emitted shape elements.
//!
//! Shape anchors arrive in whatever unit the container uses (EMU, twips,
//! master units). Path coordinates stay in that space; only the lengths
//! written on the outer element (`svg:width`, `svg:x`, `draw:transform`
//! offsets, …) are scaled and suffixed.

use crate::defaults::SIGNIFICANT_DIGITS;
use crate::types::{NumericError, fmt_num_precision};

/// Unit suffix written after scaled lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    /// Bare numbers, in source units
    #[default]
    Unitless,
    Pt,
    Mm,
    Cm,
    In,
}

impl LengthUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Unitless => "",
            LengthUnit::Pt => "pt",
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
        }
    }
}

/// Multiplier from source units to output units. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale(f64);

impl UnitScale {
    pub const ONE: UnitScale = UnitScale(1.0);

    /// EMU (English Metric Units) to points.
    pub const EMU_TO_PT: UnitScale = UnitScale(1.0 / 12700.0);

    /// Twips to points.
    pub const TWIPS_TO_PT: UnitScale = UnitScale(1.0 / 20.0);

    /// Create a scale with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(factor: f64) -> Result<Self, NumericError> {
        if factor.is_nan() {
            Err(NumericError::NaN)
        } else if factor.is_infinite() {
            Err(NumericError::Infinite)
        } else if factor == 0.0 {
            Err(NumericError::Zero)
        } else if factor < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(UnitScale(factor))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        value * self.0
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        UnitScale::ONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    pub length_unit: LengthUnit,
    pub unit_scale: UnitScale,
    /// Precision of emitted lengths
    pub significant_digits: u8,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            length_unit: LengthUnit::Unitless,
            unit_scale: UnitScale::ONE,
            significant_digits: SIGNIFICANT_DIGITS,
        }
    }
}

impl DecodeOptions {
    pub fn with_unit(mut self, unit: LengthUnit, scale: UnitScale) -> Self {
        self.length_unit = unit;
        self.unit_scale = scale;
        self
    }

    pub fn with_significant_digits(mut self, digits: u8) -> Self {
        self.significant_digits = digits.max(1);
        self
    }

    /// Format a source-unit length for output.
    pub fn length(&self, value: f64) -> String {
        let scaled = fmt_num_precision(self.unit_scale.apply(value), self.significant_digits as i32);
        format!("{}{}", scaled, self.length_unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unitless_by_default() {
        let options = DecodeOptions::default();
        assert_eq!(options.length(100.0), "100");
        assert_eq!(options.length(-12.5), "-12.5");
    }

    #[test]
    fn scaled_with_suffix() {
        let options = DecodeOptions::default().with_unit(LengthUnit::Pt, UnitScale::EMU_TO_PT);
        assert_eq!(options.length(12700.0 * 72.0), "72pt");
        let twips = DecodeOptions::default()
            .with_unit(LengthUnit::Pt, UnitScale::TWIPS_TO_PT)
            .with_significant_digits(3);
        assert_eq!(twips.length(1234.0), "61.7pt");
    }

    #[test]
    fn scale_validation() {
        assert_eq!(UnitScale::try_new(f64::NAN), Err(NumericError::NaN));
        assert_eq!(UnitScale::try_new(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(UnitScale::try_new(0.0), Err(NumericError::Zero));
        assert_eq!(UnitScale::try_new(-1.0), Err(NumericError::Negative));
        assert_eq!(UnitScale::try_new(2.0).map(UnitScale::get), Ok(2.0));
    }
}
