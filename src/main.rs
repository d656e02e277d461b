use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cncsim::{init_logging, simulate, Config, MachineDescriptor, SimulationOptions};
use cncsim_core::units::format_length;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[clap(name = "cncsim", version, about = "CNC machining simulator")]
struct CommandLine {
    /// Emit log lines as JSON
    #[clap(long, global = true)]
    log_json: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a G-code program on a machine
    Run {
        /// G-code program file
        program: PathBuf,
        /// Machine descriptor (.json or .toml)
        #[clap(long)]
        machine: PathBuf,
        /// Configuration file (.json or .toml)
        #[clap(long)]
        config: Option<PathBuf>,
        /// Planner time step in seconds
        #[clap(long = "time-step")]
        time_step: Option<f64>,
        /// Write the collision report CSV here, `-` for stdout
        #[clap(long)]
        report: Option<PathBuf>,
        /// Write the rest stock STL here
        #[clap(long)]
        mesh: Option<PathBuf>,
        /// Print the summary as JSON
        #[clap(long, action)]
        json: bool,
    },
    /// Print version and build date
    Version,
}

fn load_machine(path: &Path) -> anyhow::Result<MachineDescriptor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read machine file {}", path.display()))?;
    let machine = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => MachineDescriptor::from_json_str(&text)?,
        Some("toml") => MachineDescriptor::from_toml_str(&text)?,
        _ => bail!("Machine file must be .json or .toml: {}", path.display()),
    };
    machine
        .validate()
        .with_context(|| format!("Invalid machine descriptor {}", path.display()))?;
    Ok(machine)
}

fn run(
    program: &Path,
    machine: &Path,
    config: Option<&Path>,
    time_step: Option<f64>,
    report: Option<PathBuf>,
    mesh: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(config).context("Failed to load configuration")?;
    if let Some(step) = time_step {
        config.simulation.time_step = step;
        config.validate().context("Invalid --time-step")?;
    }

    let machine = config.apply_overrides(&load_machine(machine)?);
    let source = std::fs::read_to_string(program)
        .with_context(|| format!("Failed to read program {}", program.display()))?;

    let result = simulate(&source, &machine, &SimulationOptions::from_config(&config))?;

    match report.or(config.output.collision_report.clone()) {
        Some(path) if path.as_os_str() == "-" => {
            result.report().write_csv(std::io::stdout().lock())?;
            println!();
        }
        Some(path) => result.report().save_csv(&path)?,
        None => {}
    }
    if let Some(path) = mesh.or(config.output.stock_mesh.clone()) {
        result
            .stock
            .save_stl(&path, config.simulation.mesh_export)?;
    }

    let summary = result.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Blocks:            {}", summary.blocks);
        println!("Commands:          {}", summary.commands);
        println!("Samples:           {}", summary.samples);
        let stats = result.stats();
        let units = result.interpretation.final_state.units;
        println!("Machining time:    {:.3} s", summary.machining_time_s);
        println!(
            "Distance:          {} {} ({} cutting, {} rapid)",
            format_length(stats.total_distance(), units),
            units.label(),
            format_length(stats.feed_distance, units),
            format_length(stats.rapid_distance, units)
        );
        println!(
            "Events:            {} travel limit, {} collision",
            summary.travel_limit_events, summary.collision_events
        );
        println!(
            "Diagnostics:       {} errors, {} warnings",
            summary.errors, summary.warnings
        );
        println!("Removed volume:    {:.1} mm^3", summary.removed_volume_mm3);
        println!("Stock hash:        {}", summary.stock_hash);
        let state = &result.interpretation.final_state;
        println!(
            "Final state:       {}, {}, {}, {}",
            state.units_description(),
            state.distance_mode_description(),
            state.plane_description(),
            state.spindle_description()
        );
        for diagnostic in &result.interpretation.diagnostics {
            println!("  {}", diagnostic);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Run {
            program,
            machine,
            config,
            time_step,
            report,
            mesh,
            json,
        } => run(
            &program,
            &machine,
            config.as_deref(),
            time_step,
            report,
            mesh,
            json,
        ),
        Command::Version => {
            println!("cncsim {} (built {})", cncsim::VERSION, cncsim::BUILD_DATE);
            Ok(())
        }
    }
}
