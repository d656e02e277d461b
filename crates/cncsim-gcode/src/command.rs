//! Canonical commands and diagnostics emitted by the interpreter

use crate::state::{ModalState, MotionMode, Plane, SpindleMode};
use cncsim_core::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A straight (or chord-approximated arc) move between two programmed
/// positions, with the modal context that was active when it was issued
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub mode: MotionMode,
    pub plane: Plane,
    /// Work-coordinate position before the move (mm)
    pub from: Point3,
    /// Work-coordinate position after the move (mm)
    pub to: Point3,
    /// I/J/K arc center offset (mm), when present on the line
    pub arc_offset: Option<Point3>,
    /// Commanded feed (mm/min)
    pub feed: f64,
    pub spindle_rpm: f64,
    pub spindle_mode: SpindleMode,
    pub work_offset: String,
    pub block_index: usize,
    pub line_number: usize,
}

impl MotionCommand {
    /// Straight-line travel distance (mm)
    pub fn distance(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// Canonical machine command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Tool movement
    Motion(MotionCommand),
    /// M6 tool change
    ToolChange {
        tool: u32,
        block_index: usize,
        line_number: usize,
    },
    /// Full copy of the modal state after a block was interpreted
    ModalSnapshot {
        state: ModalState,
        block_index: usize,
        line_number: usize,
    },
}

impl Command {
    pub fn as_motion(&self) -> Option<&MotionCommand> {
        match self {
            Command::Motion(m) => Some(m),
            _ => None,
        }
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The block was not executed
    Error,
    /// The block was executed, part of it was ignored
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

/// Problem found while interpreting a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub block_index: usize,
    pub line_number: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} L{}: {}", self.severity, self.line_number, self.message)
    }
}
