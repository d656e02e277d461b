//! # cncsim motion
//!
//! Kinematics and trajectory planning. Canonical motion commands go in,
//! a time-ordered list of [`TrajectorySample`]s comes out.

pub mod kinematics;
pub mod planner;
pub mod stats;

pub use kinematics::{forward_kinematics, limit_feed_by_axes, DEGENERATE_DISTANCE};
pub use planner::{plan_trajectory, PlannerOptions, TrajectorySample, DEFAULT_TIME_STEP};
pub use stats::TrajectoryStats;
