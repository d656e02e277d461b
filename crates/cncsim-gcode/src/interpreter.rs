//! Modal interpreter
//!
//! Consumes parsed blocks strictly in order and turns them into canonical
//! [`Command`]s. Within one block, G and M words are applied first, in the
//! order they were written, so a unit switch on the same line as F or axis
//! words changes how those words are converted.

use crate::command::{Command, Diagnostic, MotionCommand, Severity};
use crate::parser::Block;
use crate::state::{DistanceMode, FeedMode, ModalState, MotionMode, Plane, SpindleMode};
use cncsim_core::{Point3, Units};
use serde::{Deserialize, Serialize};

/// First value per letter of one block
struct WordMap {
    values: [Option<f64>; 26],
}

impl WordMap {
    fn from_block(block: &Block) -> Self {
        let mut values = [None; 26];
        for word in &block.words {
            if let Some(slot) = Self::slot(word.letter) {
                // first occurrence wins
                if values[slot].is_none() {
                    values[slot] = Some(word.value);
                }
            }
        }
        Self { values }
    }

    fn slot(letter: char) -> Option<usize> {
        letter
            .is_ascii_uppercase()
            .then(|| (letter as u8 - b'A') as usize)
    }

    fn get(&self, letter: char) -> Option<f64> {
        Self::slot(letter).and_then(|slot| self.values[slot])
    }

    fn has_any(&self, letters: &[char]) -> bool {
        letters.iter().any(|&l| self.get(l).is_some())
    }
}

/// Result of interpreting a whole program
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interpretation {
    pub commands: Vec<Command>,
    pub diagnostics: Vec<Diagnostic>,
    pub final_state: ModalState,
}

impl Interpretation {
    /// Motion commands in program order
    pub fn motions(&self) -> impl Iterator<Item = &MotionCommand> {
        self.commands.iter().filter_map(Command::as_motion)
    }

    /// Modal snapshots in program order, paired with their line numbers
    pub fn snapshots(&self) -> impl Iterator<Item = (usize, &ModalState)> {
        self.commands.iter().filter_map(|c| match c {
            Command::ModalSnapshot {
                state, line_number, ..
            } => Some((*line_number, state)),
            _ => None,
        })
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Sequential interpreter owning the live modal state
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    state: ModalState,
}

impl Interpreter {
    /// Create an interpreter with power-on modal defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Current live state
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn into_state(self) -> ModalState {
        self.state
    }

    /// Interpret one block, appending whatever it produces
    pub fn interpret_block(
        &mut self,
        block_index: usize,
        block: &Block,
        commands: &mut Vec<Command>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if block.is_empty() {
            return;
        }
        let line_number = block.line_number;
        if block.has_errors() {
            tracing::warn!("Skipping line {}: {}", line_number, block.errors.join("; "));
            diagnostics.push(Diagnostic {
                block_index,
                line_number,
                severity: Severity::Error,
                message: block.errors.join("; "),
            });
            return;
        }

        let words = WordMap::from_block(block);

        for word in block.words.iter().filter(|w| matches!(w.letter, 'G' | 'M')) {
            let code = word.value.trunc() as i64;
            match (word.letter, code) {
                ('G', 0) => self.state.motion_mode = MotionMode::Rapid,
                ('G', 1) => self.state.motion_mode = MotionMode::Linear,
                ('G', 2) => self.state.motion_mode = MotionMode::CwArc,
                ('G', 3) => self.state.motion_mode = MotionMode::CcwArc,
                ('G', 17) => self.state.plane = Plane::Xy,
                ('G', 18) => self.state.plane = Plane::Xz,
                ('G', 19) => self.state.plane = Plane::Yz,
                ('G', 20) => self.state.units = Units::Inches,
                ('G', 21) => self.state.units = Units::Millimeters,
                ('G', 54..=59) => self.state.work_offset = format!("G{}", code),
                ('G', 90) => self.state.distance_mode = DistanceMode::Absolute,
                ('G', 91) => self.state.distance_mode = DistanceMode::Incremental,
                ('G', 94) => self.state.feed_mode = FeedMode::UnitsPerMinute,
                ('M', 3) => self.state.spindle_mode = SpindleMode::Clockwise,
                ('M', 4) => self.state.spindle_mode = SpindleMode::CounterClockwise,
                ('M', 5) => self.state.spindle_mode = SpindleMode::Off,
                ('M', 6) => {
                    let tool = words
                        .get('T')
                        .map(tool_number)
                        .unwrap_or(self.state.tool_number);
                    tracing::trace!("Line {}: tool change to T{}", line_number, tool);
                    commands.push(Command::ToolChange {
                        tool,
                        block_index,
                        line_number,
                    });
                }
                (letter, code) => diagnostics.push(Diagnostic {
                    block_index,
                    line_number,
                    severity: Severity::Warning,
                    message: format!("Unsupported modal code {}{}", letter, code),
                }),
            }
        }

        let units = self.state.units;
        if let Some(feed) = words.get('F') {
            self.state.feed = units.to_mm(feed);
        }
        if let Some(rpm) = words.get('S') {
            self.state.spindle_rpm = rpm;
        }
        if let Some(tool) = words.get('T') {
            self.state.tool_number = tool_number(tool);
        }

        if words.has_any(&['X', 'Y', 'Z']) {
            let from = self.state.position;
            let to = self.next_position(&words);
            let arc_offset = words.has_any(&['I', 'J', 'K']).then(|| {
                Point3::new(
                    units.to_mm(words.get('I').unwrap_or(0.0)),
                    units.to_mm(words.get('J').unwrap_or(0.0)),
                    units.to_mm(words.get('K').unwrap_or(0.0)),
                )
            });
            self.state.position = to;
            commands.push(Command::Motion(MotionCommand {
                mode: self.state.motion_mode,
                plane: self.state.plane,
                from,
                to,
                arc_offset,
                feed: self.state.feed,
                spindle_rpm: self.state.spindle_rpm,
                spindle_mode: self.state.spindle_mode,
                work_offset: self.state.work_offset.clone(),
                block_index,
                line_number,
            }));
        }

        commands.push(Command::ModalSnapshot {
            state: self.state.clone(),
            block_index,
            line_number,
        });
    }

    fn next_position(&self, words: &WordMap) -> Point3 {
        let units = self.state.units;
        let resolve = |current: f64, letter: char| match words.get(letter) {
            None => current,
            Some(raw) => {
                let mm = units.to_mm(raw);
                match self.state.distance_mode {
                    DistanceMode::Absolute => mm,
                    DistanceMode::Incremental => current + mm,
                }
            }
        };
        let p = self.state.position;
        Point3::new(resolve(p.x, 'X'), resolve(p.y, 'Y'), resolve(p.z, 'Z'))
    }
}

fn tool_number(value: f64) -> u32 {
    // saturating: negative values clamp to 0
    value.trunc() as u32
}

/// Interpret a whole program from power-on defaults
pub fn interpret_blocks(blocks: &[Block]) -> Interpretation {
    let mut interpreter = Interpreter::new();
    let mut commands = Vec::new();
    let mut diagnostics = Vec::new();

    for (block_index, block) in blocks.iter().enumerate() {
        interpreter.interpret_block(block_index, block, &mut commands, &mut diagnostics);
    }

    tracing::debug!(
        "Interpreted {} blocks into {} commands ({} diagnostics)",
        blocks.len(),
        commands.len(),
        diagnostics.len()
    );

    Interpretation {
        commands,
        diagnostics,
        final_state: interpreter.into_state(),
    }
}
