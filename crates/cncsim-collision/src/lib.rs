//! # cncsim collision
//!
//! Post-hoc boundary checks over a planned trajectory, a standalone
//! triangle overlap primitive for mesh-level checks, and CSV reporting.

pub mod detector;
pub mod report;
pub mod triangle;

pub use detector::{
    detect_collisions, CollisionEvent, CollisionKind, MACHINE_ENVELOPE, TOOL,
};
pub use report::{CollisionReport, CSV_HEADER};
pub use triangle::{point_in_triangle, triangle_intersects, Triangle};
