//! 3-axis kinematics
//!
//! Pure functions, no state. Positions are millimeters, feeds are mm/min
//! and axis velocities are mm/s.

use cncsim_core::{MachineAxes, Point3};
use glam::DVec3;

/// Moves shorter than this are treated as no motion (mm)
pub const DEGENERATE_DISTANCE: f64 = 1e-9;

/// Tool center point for a given axis position.
///
/// On a Cartesian 3-axis machine this is the plain sum of the spindle TCP
/// offset, the raw axis coordinates and the active work offset.
pub fn forward_kinematics(tcp: Point3, axes: Point3, work_offset: Point3) -> Point3 {
    (tcp.to_dvec3() + axes.to_dvec3() + work_offset.to_dvec3()).into()
}

/// Highest feed (mm/min) not above `desired_feed` at which every axis
/// stays within its maximum velocity for the move `from -> to`.
///
/// Returns 0 for a degenerate move; callers skip those.
pub fn limit_feed_by_axes(
    from: Point3,
    to: Point3,
    desired_feed: f64,
    limits: &MachineAxes,
) -> f64 {
    let delta = (to.to_dvec3() - from.to_dvec3()).abs();
    let distance = delta.length();
    if distance < DEGENERATE_DISTANCE {
        return 0.0;
    }

    let max_velocity = DVec3::new(
        limits.x.max_velocity,
        limits.y.max_velocity,
        limits.z.max_velocity,
    );
    // path speed at which each axis alone would hit its own limit
    let ceiling = [
        (delta.x, max_velocity.x),
        (delta.y, max_velocity.y),
        (delta.z, max_velocity.z),
    ]
    .into_iter()
    .filter(|(component, _)| *component > 0.0)
    .map(|(component, velocity)| velocity * distance / component)
    .fold(f64::INFINITY, f64::min);

    (desired_feed / 60.0).min(ceiling) * 60.0
}
