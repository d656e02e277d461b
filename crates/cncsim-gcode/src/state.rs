//! Modal machine state
//!
//! Modal groups are persistent: a value set on one line stays in force for
//! every following line until another word of the same group changes it.

use cncsim_core::machine::DEFAULT_WORK_OFFSET;
use cncsim_core::{Point3, Units};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default feed before any F word (mm/min)
pub const DEFAULT_FEED: f64 = 1000.0;

/// Distance mode - G90 / G91
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    #[default]
    Absolute,
    Incremental,
}

/// Plane selection - G17 / G18 / G19
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Plane {
    #[default]
    #[serde(rename = "XY")]
    Xy,
    #[serde(rename = "XZ")]
    Xz,
    #[serde(rename = "YZ")]
    Yz,
}

/// Feed rate mode - G94 is the only mode simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    #[default]
    UnitsPerMinute,
}

/// Motion mode - G0 / G1 / G2 / G3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionMode {
    #[default]
    Rapid,
    Linear,
    CwArc,
    CcwArc,
}

impl MotionMode {
    pub fn is_rapid(self) -> bool {
        self == Self::Rapid
    }

    pub fn is_arc(self) -> bool {
        matches!(self, Self::CwArc | Self::CcwArc)
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "rapid"),
            Self::Linear => write!(f, "linear"),
            Self::CwArc => write!(f, "cw-arc"),
            Self::CcwArc => write!(f, "ccw-arc"),
        }
    }
}

/// Spindle state - M3 / M4 / M5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpindleMode {
    Clockwise,
    CounterClockwise,
    #[default]
    Off,
}

impl SpindleMode {
    pub fn is_on(self) -> bool {
        self != Self::Off
    }
}

/// Complete modal state of the machine during interpretation
///
/// Exactly one live instance is threaded through a program run. Snapshots
/// are taken with `clone()`, so later changes never leak into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalState {
    /// Units group (G20 / G21)
    pub units: Units,
    /// Distance group (G90 / G91)
    pub distance_mode: DistanceMode,
    /// Plane group (G17 / G18 / G19)
    pub plane: Plane,
    /// Feed rate mode group (G94)
    pub feed_mode: FeedMode,
    /// Motion group (G0 / G1 / G2 / G3)
    pub motion_mode: MotionMode,
    /// Current feed rate, always mm/min
    pub feed: f64,
    /// Spindle direction (M3 / M4 / M5)
    pub spindle_mode: SpindleMode,
    /// Current spindle speed (S value)
    pub spindle_rpm: f64,
    /// Active work coordinate system name (G54..G59)
    pub work_offset: String,
    /// Active tool number (T value)
    pub tool_number: u32,
    /// Programmed position in work coordinates, always mm
    pub position: Point3,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            units: Units::Millimeters,
            distance_mode: DistanceMode::Absolute,
            plane: Plane::Xy,
            feed_mode: FeedMode::UnitsPerMinute,
            motion_mode: MotionMode::Rapid,
            feed: DEFAULT_FEED,
            spindle_mode: SpindleMode::Off,
            spindle_rpm: 0.0,
            work_offset: DEFAULT_WORK_OFFSET.to_string(),
            tool_number: 0,
            position: Point3::ZERO,
        }
    }
}

impl ModalState {
    /// Create a new state with power-on defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a human-readable description of the current motion mode
    pub fn motion_mode_description(&self) -> &'static str {
        match self.motion_mode {
            MotionMode::Rapid => "Rapid positioning (G0)",
            MotionMode::Linear => "Linear interpolation (G1)",
            MotionMode::CwArc => "Clockwise arc (G2)",
            MotionMode::CcwArc => "Counter-clockwise arc (G3)",
        }
    }

    /// Get a human-readable description of the current plane
    pub fn plane_description(&self) -> &'static str {
        match self.plane {
            Plane::Xy => "XY plane (G17)",
            Plane::Xz => "XZ plane (G18)",
            Plane::Yz => "YZ plane (G19)",
        }
    }

    /// Get a human-readable description of distance mode
    pub fn distance_mode_description(&self) -> &'static str {
        match self.distance_mode {
            DistanceMode::Absolute => "Absolute positioning (G90)",
            DistanceMode::Incremental => "Incremental positioning (G91)",
        }
    }

    /// Get a human-readable description of units
    pub fn units_description(&self) -> &'static str {
        match self.units {
            Units::Millimeters => "Millimeters (G21)",
            Units::Inches => "Inches (G20)",
        }
    }

    /// Get a human-readable description of the spindle
    pub fn spindle_description(&self) -> &'static str {
        match self.spindle_mode {
            SpindleMode::Clockwise => "Spindle clockwise (M3)",
            SpindleMode::CounterClockwise => "Spindle counter-clockwise (M4)",
            SpindleMode::Off => "Spindle off (M5)",
        }
    }
}
