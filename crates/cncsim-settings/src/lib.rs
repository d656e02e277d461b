//! cncsim Settings Crate
//!
//! Handles simulation configuration: file loading and saving, validation,
//! and run-time overrides of machine descriptor values.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, OverrideSettings, SimulationSettings};
pub use error::{SettingsError, SettingsResult};
