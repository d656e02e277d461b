//! # cncsim Core
//!
//! Core types shared by every stage of the simulation pipeline:
//! geometry primitives, measurement units, the machine descriptor
//! consumed by the planner and collision detector, and the error types
//! used at the edges of the pipeline.

pub mod error;
pub mod geometry;
pub mod machine;
pub mod units;

pub use error::{Error, MachineError, Result};
pub use geometry::{Aabb, Point3};
pub use machine::{
    AxisLimits, Fixture, MachineAxes, MachineDescriptor, StockDimensions, ToolSpec,
};
pub use units::{Units, MM_PER_INCH};
