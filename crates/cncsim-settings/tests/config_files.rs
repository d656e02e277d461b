//! Config file round-trips

use cncsim_settings::{Config, SettingsError};
use cncsim_stock::{MeshExport, RemovalPolicy};
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_config() -> Config {
    let mut config = Config::new();
    config.simulation.time_step = 0.01;
    config.simulation.removal_policy = RemovalPolicy::CuttingOnly;
    config.simulation.mesh_export = MeshExport::Surface;
    config.overrides.voxel_size = Some(0.5);
    config.overrides.tool_diameter = Some(6.0);
    config.output.collision_report = Some(PathBuf::from("out/collisions.csv"));
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = sample_config();
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[simulation]"));
    assert!(text.contains("cutting_only"));

    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let config = sample_config();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[simulation]\ntime_step = 0.0\n").unwrap();
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidSetting { .. }));
}

#[test]
fn test_load_or_default_with_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"simulation": {"mesh_export": "surface"}}"#).unwrap();
    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.simulation.mesh_export, MeshExport::Surface);
    assert_eq!(config.simulation.time_step, 0.005);
}
