//! Configuration and settings management for cncsim
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, chosen by file extension, stored by default in the
//! platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Simulation settings (time step, removal policy, mesh export)
//! - Overrides applied on top of the machine descriptor
//! - Output artifact paths

use crate::error::{SettingsError, SettingsResult};
use cncsim_core::MachineDescriptor;
use cncsim_stock::{MeshExport, RemovalPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Smallest accepted planner time step (seconds)
pub const MIN_TIME_STEP: f64 = 0.001;
/// Smallest accepted stock extent override (mm)
pub const MIN_STOCK_EXTENT: f64 = 1.0;
/// Smallest accepted voxel size and tool diameter override (mm)
pub const MIN_FINE_LENGTH: f64 = 0.1;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Planner sampling interval (seconds)
    pub time_step: f64,
    /// Which moves remove stock material
    pub removal_policy: RemovalPolicy,
    /// Faces written to the stock mesh
    pub mesh_export: MeshExport,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            time_step: 0.005,
            removal_policy: RemovalPolicy::AllMotion,
            mesh_export: MeshExport::TopFaces,
        }
    }
}

/// Values replacing the machine descriptor's own at run time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSettings {
    pub voxel_size: Option<f64>,
    pub tool_diameter: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
}

/// Output artifact locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Collision report CSV
    pub collision_report: Option<PathBuf>,
    /// Rest stock ASCII STL
    pub stock_mesh: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulation settings
    pub simulation: SimulationSettings,
    /// Descriptor overrides
    pub overrides: OverrideSettings,
    /// Output paths
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

/// `value` if present, finite and at least `min`, else `fallback`
fn pick(key: &str, value: Option<f64>, min: f64, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= min => v,
        Some(v) => {
            tracing::warn!("Ignoring override {}={} (minimum {})", key, v, min);
            fallback
        }
        None => fallback,
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/cncsim/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cncsim").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config directory on this platform".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else the default location when it exists,
    /// else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let step = self.simulation.time_step;
        if !(step.is_finite() && step >= MIN_TIME_STEP) {
            return Err(SettingsError::invalid(
                "simulation.time_step",
                format!("must be at least {}", MIN_TIME_STEP),
            ));
        }

        let o = &self.overrides;
        for (key, value, min) in [
            ("overrides.width", o.width, MIN_STOCK_EXTENT),
            ("overrides.height", o.height, MIN_STOCK_EXTENT),
            ("overrides.depth", o.depth, MIN_STOCK_EXTENT),
            ("overrides.voxel_size", o.voxel_size, MIN_FINE_LENGTH),
            ("overrides.tool_diameter", o.tool_diameter, MIN_FINE_LENGTH),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v >= min) {
                    return Err(SettingsError::invalid(key, format!("must be at least {}", min)));
                }
            }
        }

        Ok(())
    }

    /// Copy of `machine` with the overrides applied.
    ///
    /// Values below their minimum are ignored and the descriptor value is
    /// kept.
    pub fn apply_overrides(&self, machine: &MachineDescriptor) -> MachineDescriptor {
        let o = &self.overrides;
        let mut runtime = machine.clone();
        let stock = &mut runtime.stock;
        stock.width = pick("width", o.width, MIN_STOCK_EXTENT, stock.width);
        stock.height = pick("height", o.height, MIN_STOCK_EXTENT, stock.height);
        stock.depth = pick("depth", o.depth, MIN_STOCK_EXTENT, stock.depth);
        stock.voxel_size = pick("voxel_size", o.voxel_size, MIN_FINE_LENGTH, stock.voxel_size);
        runtime.tool.diameter = pick(
            "tool_diameter",
            o.tool_diameter,
            MIN_FINE_LENGTH,
            runtime.tool.diameter,
        );
        runtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.simulation.time_step, 0.005);
        assert_eq!(config.simulation.removal_policy, RemovalPolicy::AllMotion);
        assert_eq!(config.simulation.mesh_export, MeshExport::TopFaces);
        assert!(config.output.collision_report.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let config: Config = toml::from_str(
            "[simulation]\nremoval_policy = \"cutting_only\"\n\n[overrides]\nvoxel_size = 0.5\n",
        )
        .unwrap();
        assert_eq!(config.simulation.removal_policy, RemovalPolicy::CuttingOnly);
        assert_eq!(config.simulation.time_step, 0.005);
        assert_eq!(config.overrides.voxel_size, Some(0.5));
        assert_eq!(config.overrides.width, None);
    }

    #[test]
    fn test_validate_rejects_small_values() {
        let mut config = Config::new();
        config.simulation.time_step = 0.0001;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { ref key, .. }) if key == "simulation.time_step"
        ));

        let mut config = Config::new();
        config.overrides.voxel_size = Some(0.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let machine = MachineDescriptor::default();
        let mut config = Config::new();
        config.overrides.tool_diameter = Some(3.0);
        config.overrides.width = Some(0.5);
        config.overrides.depth = Some(f64::NAN);
        let runtime = config.apply_overrides(&machine);
        assert_eq!(runtime.tool.diameter, 3.0);
        // below minimum and NaN fall back to the descriptor
        assert_eq!(runtime.stock.width, machine.stock.width);
        assert_eq!(runtime.stock.depth, machine.stock.depth);
        assert_eq!(runtime.stock.height, machine.stock.height);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::new()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "yaml"));
    }
}
