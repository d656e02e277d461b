//! # cncsim
//!
//! CNC machining simulation: a G-code program goes in, and out come a
//! timed tool trajectory, the boundary violations along it, and a voxel
//! model of the stock left after machining.
//!
//! ## Architecture
//!
//! cncsim is organized as a workspace with multiple crates:
//!
//! 1. **cncsim-core** - Geometry, units, machine descriptor, errors
//! 2. **cncsim-gcode** - Line parser, modal interpreter, stepwise playback
//! 3. **cncsim-motion** - Kinematics, trajectory planner, statistics
//! 4. **cncsim-collision** - Travel limit and fixture checks, CSV report
//! 5. **cncsim-stock** - Voxel stock, material removal, hash, STL export
//! 6. **cncsim-settings** - Configuration files
//! 7. **cncsim** - Pipeline facade and command line binary
//!
//! Data flows one way: parser, interpreter, planner, then collision
//! detection and stock removal side by side.

pub use cncsim_collision as collision;
pub use cncsim_gcode as gcode;
pub use cncsim_motion as motion;
pub use cncsim_settings as settings;
pub use cncsim_stock as stock;

pub use cncsim_collision::{detect_collisions, CollisionEvent, CollisionKind, CollisionReport};
pub use cncsim_core::{Error, MachineDescriptor, Point3, Result};
pub use cncsim_gcode::{interpret_blocks, parse_program, Block, Interpretation, ProgramStepper};
pub use cncsim_motion::{plan_trajectory, PlannerOptions, TrajectorySample, TrajectoryStats};
pub use cncsim_settings::Config;
pub use cncsim_stock::{MeshExport, RemovalPolicy, VoxelStock};

use serde::Serialize;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("CNCSIM_BUILD_DATE");

/// Knobs for one simulation run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationOptions {
    pub planner: PlannerOptions,
    pub removal_policy: RemovalPolicy,
}

impl SimulationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            planner: PlannerOptions::with_time_step(config.simulation.time_step),
            removal_policy: config.simulation.removal_policy,
        }
    }
}

/// Everything a simulation run produces
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub blocks: Vec<Block>,
    pub interpretation: Interpretation,
    pub trajectory: Vec<TrajectorySample>,
    pub collisions: Vec<CollisionEvent>,
    pub stock: VoxelStock,
}

/// Headline numbers of a run, for printing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub blocks: usize,
    pub commands: usize,
    pub samples: usize,
    pub errors: usize,
    pub warnings: usize,
    pub travel_limit_events: usize,
    pub collision_events: usize,
    pub machining_time_s: f64,
    pub removed_volume_mm3: f64,
    pub stock_hash: String,
}

impl SimulationResult {
    pub fn stats(&self) -> TrajectoryStats {
        TrajectoryStats::from_samples(&self.trajectory)
    }

    pub fn report(&self) -> CollisionReport<'_> {
        CollisionReport::new(&self.collisions)
    }

    pub fn summary(&self) -> SimulationSummary {
        let report = self.report();
        SimulationSummary {
            blocks: self.blocks.len(),
            commands: self.interpretation.commands.len(),
            samples: self.trajectory.len(),
            errors: self.interpretation.error_count(),
            warnings: self.interpretation.warning_count(),
            travel_limit_events: report.count(CollisionKind::TravelLimit),
            collision_events: report.count(CollisionKind::Collision),
            machining_time_s: self.stats().total_time,
            removed_volume_mm3: self.stock.removed_volume(),
            stock_hash: self.stock.hash(),
        }
    }
}

/// Run the full pipeline on program text.
///
/// Fails only when the descriptor's stock cannot form a voxel grid;
/// problems inside the program end up as diagnostics and events.
pub fn simulate(
    source: &str,
    machine: &MachineDescriptor,
    options: &SimulationOptions,
) -> Result<SimulationResult> {
    let mut stock = VoxelStock::new(&machine.stock)?;

    let blocks = parse_program(source);
    let interpretation = interpret_blocks(&blocks);
    let trajectory = plan_trajectory(&interpretation.commands, machine, &options.planner);
    let collisions = detect_collisions(&trajectory, machine);
    stock.remove_along_trajectory_with(&trajectory, machine.tool.diameter, options.removal_policy);

    tracing::info!(
        "Simulated {} blocks: {} samples, {} events, stock {}",
        blocks.len(),
        trajectory.len(),
        collisions.len(),
        stock.hash()
    );

    Ok(SimulationResult {
        blocks,
        interpretation,
        trajectory,
        collisions,
        stock,
    })
}

/// Initialize logging
///
/// Sets up structured logging on stderr with:
/// - RUST_LOG environment variable support, `info` when unset
/// - Pretty human-readable output, or JSON lines when `json` is set
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
