//! Time-discretized trajectory planning
//!
//! Each motion command is cut into equal time slices no longer than the
//! configured time step. Arc-tagged moves are sampled along their chord;
//! the arc center carried on the command is not used here.

use crate::kinematics::{forward_kinematics, limit_feed_by_axes, DEGENERATE_DISTANCE};
use cncsim_core::machine::DEFAULT_MAX_VELOCITY;
use cncsim_core::{MachineAxes, MachineDescriptor, Point3};
use cncsim_gcode::{Command, MotionCommand, MotionMode, SpindleMode};
use serde::{Deserialize, Serialize};

/// Default sampling interval (seconds)
pub const DEFAULT_TIME_STEP: f64 = 0.005;

/// Floor applied to the feed before dividing by it (mm/s)
const MIN_FEED_PER_SECOND: f64 = 1e-9;

/// Planner configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerOptions {
    /// Upper bound on the time between two samples (seconds)
    pub time_step: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl PlannerOptions {
    pub fn with_time_step(time_step: f64) -> Self {
        Self { time_step }
    }

    fn effective_time_step(&self) -> f64 {
        if self.time_step.is_finite() && self.time_step > 0.0 {
            self.time_step
        } else {
            tracing::warn!(
                "Invalid time step {}, falling back to {}",
                self.time_step,
                DEFAULT_TIME_STEP
            );
            DEFAULT_TIME_STEP
        }
    }
}

/// One point of the planned trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Time since program start (seconds), strictly increasing
    pub t: f64,
    pub block_index: usize,
    pub line_number: usize,
    /// Tool center point in machine coordinates
    pub position: Point3,
    /// Raw interpolated axis coordinates
    pub axes: Point3,
    /// Feed actually used for the move (mm/min)
    pub feed: f64,
    pub spindle_rpm: f64,
    pub spindle_mode: SpindleMode,
    pub motion_mode: MotionMode,
}

impl TrajectorySample {
    /// Spindle on and not a rapid traverse
    pub fn is_cutting(&self) -> bool {
        self.spindle_mode.is_on() && !self.motion_mode.is_rapid()
    }
}

/// Axis limits with unusable velocities replaced by the default
fn usable_axes(axes: &MachineAxes) -> MachineAxes {
    let mut usable = *axes;
    for (name, limits) in [
        ("X", &mut usable.x),
        ("Y", &mut usable.y),
        ("Z", &mut usable.z),
    ] {
        if !(limits.max_velocity.is_finite() && limits.max_velocity > 0.0) {
            tracing::warn!(
                "Axis {} max velocity {} is unusable, planning with {}",
                name,
                limits.max_velocity,
                DEFAULT_MAX_VELOCITY
            );
            limits.max_velocity = DEFAULT_MAX_VELOCITY;
        }
    }
    usable
}

/// Feed (mm/min) the planner uses for one command
fn planned_feed(motion: &MotionCommand, axes: &MachineAxes) -> f64 {
    if motion.mode.is_rapid() {
        axes.min_max_velocity() * 60.0
    } else {
        limit_feed_by_axes(motion.from, motion.to, motion.feed.max(1.0), axes)
    }
}

/// Turn canonical commands into a sampled trajectory.
///
/// Non-motion commands and zero-length moves are skipped and leave the
/// time cursor untouched. Axis velocities that are zero, negative or not
/// finite are planned at the default axis velocity.
pub fn plan_trajectory(
    commands: &[Command],
    machine: &MachineDescriptor,
    options: &PlannerOptions,
) -> Vec<TrajectorySample> {
    let time_step = options.effective_time_step();
    let limits = usable_axes(&machine.axes);
    let mut samples = Vec::new();
    let mut time = 0.0;

    for motion in commands.iter().filter_map(Command::as_motion) {
        let distance = motion.distance();
        if distance < DEGENERATE_DISTANCE {
            tracing::trace!("Line {}: zero-length move skipped", motion.line_number);
            continue;
        }

        if motion.mode.is_arc() {
            tracing::trace!("Line {}: arc planned as chord", motion.line_number);
        }
        let feed = planned_feed(motion, &limits);
        let duration = distance / (feed / 60.0).max(MIN_FEED_PER_SECOND);
        let steps = ((duration / time_step).ceil() as usize).max(1);
        let slice = duration / steps as f64;
        let work_offset = machine.work_offset(&motion.work_offset);

        samples.reserve(steps);
        for i in 1..=steps {
            let u = i as f64 / steps as f64;
            let axes = motion.from.lerp(motion.to, u);
            time += slice;
            samples.push(TrajectorySample {
                t: time,
                block_index: motion.block_index,
                line_number: motion.line_number,
                position: forward_kinematics(machine.tcp, axes, work_offset),
                axes,
                feed,
                spindle_rpm: motion.spindle_rpm,
                spindle_mode: motion.spindle_mode,
                motion_mode: motion.mode,
            });
        }
    }

    tracing::debug!(
        "Planned {} samples over {:.3}s (dt={})",
        samples.len(),
        time,
        time_step
    );
    samples
}
