//! Machine descriptor
//!
//! The descriptor is produced by an external loader and consumed as-is by
//! the planner, the collision detector and the stock engine. Missing
//! values fall back to documented defaults instead of failing, so a
//! partial descriptor still simulates; call [`MachineDescriptor::validate`]
//! to reject descriptors that would produce meaningless results.

use crate::error::{MachineError, Result};
use crate::geometry::{Aabb, Point3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default travel limit applied when a descriptor omits one (mm)
pub const DEFAULT_TRAVEL_MM: f64 = 500.0;
/// Default axis velocity limit (mm/s)
pub const DEFAULT_MAX_VELOCITY: f64 = 500.0;
/// Default axis acceleration limit (mm/s²)
pub const DEFAULT_MAX_ACCEL: f64 = 3000.0;
/// Default tool diameter (mm)
pub const DEFAULT_TOOL_DIAMETER: f64 = 10.0;
/// Name of the work offset selected by G54
pub const DEFAULT_WORK_OFFSET: &str = "G54";

/// Travel and dynamics limits of one linear axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    /// Minimum travel (mm)
    #[serde(default = "default_min")]
    pub min: f64,
    /// Maximum travel (mm)
    #[serde(default = "default_max")]
    pub max: f64,
    /// Maximum velocity (mm/s)
    #[serde(default = "default_max_velocity", alias = "maxVelocity")]
    pub max_velocity: f64,
    /// Maximum acceleration (mm/s²). Carried for collaborators; the
    /// planner does not model acceleration.
    #[serde(default = "default_max_accel", alias = "maxAccel")]
    pub max_accel: f64,
}

fn default_min() -> f64 {
    -DEFAULT_TRAVEL_MM
}

fn default_max() -> f64 {
    DEFAULT_TRAVEL_MM
}

fn default_max_velocity() -> f64 {
    DEFAULT_MAX_VELOCITY
}

fn default_max_accel() -> f64 {
    DEFAULT_MAX_ACCEL
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            max_velocity: default_max_velocity(),
            max_accel: default_max_accel(),
        }
    }
}

impl AxisLimits {
    /// Symmetric limits with the given velocity, handy for tests and demos
    pub fn with_velocity(max_velocity: f64) -> Self {
        Self {
            max_velocity,
            ..Self::default()
        }
    }
}

/// The three linear axes, keyed `X`, `Y`, `Z` in descriptor files
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineAxes {
    #[serde(rename = "X", alias = "x", default)]
    pub x: AxisLimits,
    #[serde(rename = "Y", alias = "y", default)]
    pub y: AxisLimits,
    #[serde(rename = "Z", alias = "z", default)]
    pub z: AxisLimits,
}

impl MachineAxes {
    /// Same limits on every axis
    pub fn uniform(limits: AxisLimits) -> Self {
        Self {
            x: limits,
            y: limits,
            z: limits,
        }
    }

    /// Iterate `(name, limits)` in X, Y, Z order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AxisLimits)> {
        [("X", &self.x), ("Y", &self.y), ("Z", &self.z)].into_iter()
    }

    /// Slowest axis velocity (mm/s), used as the machine rapid rate
    pub fn min_max_velocity(&self) -> f64 {
        self.x
            .max_velocity
            .min(self.y.max_velocity)
            .min(self.z.max_velocity)
    }
}

/// Raw stock block dimensions and voxel resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockDimensions {
    /// Extent along X (mm)
    pub width: f64,
    /// Extent along Y (mm)
    pub height: f64,
    /// Extent along Z (mm)
    pub depth: f64,
    /// Edge length of one voxel (mm)
    #[serde(alias = "voxelSize")]
    pub voxel_size: f64,
}

impl Default for StockDimensions {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            depth: 20.0,
            voxel_size: 1.0,
        }
    }
}

impl StockDimensions {
    pub fn new(width: f64, height: f64, depth: f64, voxel_size: f64) -> Self {
        Self {
            width,
            height,
            depth,
            voxel_size,
        }
    }

    /// Reject dimensions that cannot form a finite grid
    pub fn validate(&self) -> std::result::Result<(), MachineError> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(MachineError::InvalidStock {
                reason: format!("voxel size must be positive, got {}", self.voxel_size),
            });
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MachineError::InvalidStock {
                    reason: format!("{} must be non-negative, got {}", name, value),
                });
            }
        }
        Ok(())
    }
}

/// Cutting tool geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool diameter (mm)
    pub diameter: f64,
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_TOOL_DIAMETER,
        }
    }
}

impl ToolSpec {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

/// A named obstacle clamped to the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub aabb: Aabb,
}

impl Fixture {
    pub fn new(name: impl Into<String>, aabb: Aabb) -> Self {
        Self {
            name: name.into(),
            aabb,
        }
    }
}

fn default_work_offsets() -> BTreeMap<String, Point3> {
    let mut offsets = BTreeMap::new();
    offsets.insert(DEFAULT_WORK_OFFSET.to_string(), Point3::ZERO);
    offsets
}

/// Complete description of a 3-axis machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDescriptor {
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub axes: MachineAxes,
    /// Offset from the spindle reference point to the tool center point
    #[serde(default)]
    pub tcp: Point3,
    #[serde(default)]
    pub stock: StockDimensions,
    #[serde(default)]
    pub tool: ToolSpec,
    /// Named work coordinate systems (`G54`..`G59`)
    #[serde(default = "default_work_offsets", alias = "workOffsets")]
    pub work_offsets: BTreeMap<String, Point3>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

impl Default for MachineDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            axes: MachineAxes::default(),
            tcp: Point3::ZERO,
            stock: StockDimensions::default(),
            tool: ToolSpec::default(),
            work_offsets: default_work_offsets(),
            fixtures: Vec::new(),
        }
    }
}

impl MachineDescriptor {
    /// Parse a descriptor from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a descriptor from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Travel envelope spanned by the axis limits
    pub fn envelope(&self) -> Aabb {
        Aabb::new(
            Point3::new(self.axes.x.min, self.axes.y.min, self.axes.z.min),
            Point3::new(self.axes.x.max, self.axes.y.max, self.axes.z.max),
        )
    }

    /// Resolve a named work offset, zero when the name is unknown
    pub fn work_offset(&self, name: &str) -> Point3 {
        match self.work_offsets.get(name) {
            Some(offset) => *offset,
            None => {
                tracing::trace!("Unknown work offset {}, using zero", name);
                Point3::ZERO
            }
        }
    }

    /// Check the descriptor for values the simulation cannot use
    pub fn validate(&self) -> std::result::Result<(), MachineError> {
        for (axis, limits) in self.axes.iter() {
            if limits.min > limits.max {
                return Err(MachineError::InvertedTravel {
                    axis: axis.to_string(),
                    min: limits.min,
                    max: limits.max,
                });
            }
            if !(limits.max_velocity.is_finite() && limits.max_velocity > 0.0) {
                return Err(MachineError::InvalidVelocity {
                    axis: axis.to_string(),
                    value: limits.max_velocity,
                });
            }
        }
        self.stock.validate()?;
        if !(self.tool.diameter.is_finite() && self.tool.diameter > 0.0) {
            return Err(MachineError::InvalidTool {
                diameter: self.tool.diameter,
            });
        }
        if let Some(fixture) = self.fixtures.iter().find(|f| !f.aabb.is_valid()) {
            return Err(MachineError::InvertedFixture {
                name: fixture.name.clone(),
            });
        }
        Ok(())
    }
}
