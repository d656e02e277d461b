//! Unit conversion utilities
//!
//! Programs may be written in millimeters or inches. Everything downstream
//! of the interpreter works in millimeters (and mm/min for feeds), so raw
//! values are converted once, when they are adopted into machine state.

use serde::{Deserialize, Serialize};

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Program length units (G21 / G20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (G21)
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    /// Inches (G20)
    #[serde(rename = "inch")]
    Inches,
}

impl Units {
    /// Convert a raw program value in these units to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Millimeters => value,
            Self::Inches => value * MM_PER_INCH,
        }
    }

    /// Convert a millimeter value into these units
    pub fn from_mm(self, value_mm: f64) -> f64 {
        match self {
            Self::Millimeters => value_mm,
            Self::Inches => value_mm / MM_PER_INCH,
        }
    }

    /// Get the unit label ("mm" or "in")
    pub fn label(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
        }
    }
}

/// Format a millimeter length for display in the given units
pub fn format_length(value_mm: f64, units: Units) -> String {
    format!("{:.3}", units.from_mm(value_mm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_conversion() {
        assert_eq!(Units::Inches.to_mm(1.0), 25.4);
        assert_eq!(Units::Inches.to_mm(-2.0), -50.8);
        assert_eq!(Units::Millimeters.to_mm(12.5), 12.5);
        assert!((Units::Inches.from_mm(25.4) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(10.5, Units::Millimeters), "10.500");
        assert_eq!(format_length(12.7, Units::Inches), "0.500");
    }

    #[test]
    fn test_labels_and_default() {
        assert_eq!(Units::default(), Units::Millimeters);
        assert_eq!(Units::Millimeters.label(), "mm");
        assert_eq!(Units::Inches.label(), "in");
    }
}
