//! Line-by-line program playback
//!
//! The stepper drives the same [`Interpreter`] the batch path uses, one
//! block per call, so after `n` steps its commands, diagnostics and state
//! are exactly those of interpreting the first `n` blocks in one go.

use crate::command::{Command, Diagnostic};
use crate::interpreter::{Interpretation, Interpreter};
use crate::parser::{parse_program, Block};
use crate::state::ModalState;

/// What one call to [`ProgramStepper::step`] produced
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    pub block_index: usize,
    pub line_number: usize,
    pub commands: &'a [Command],
    pub diagnostics: &'a [Diagnostic],
}

/// Incremental interpreter over a parsed program
#[derive(Debug, Clone)]
pub struct ProgramStepper {
    blocks: Vec<Block>,
    next_block: usize,
    interpreter: Interpreter,
    commands: Vec<Command>,
    diagnostics: Vec<Diagnostic>,
}

impl ProgramStepper {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            next_block: 0,
            interpreter: Interpreter::new(),
            commands: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse `source` and start at its first line
    pub fn from_source(source: &str) -> Self {
        Self::new(parse_program(source))
    }

    /// Interpret the next block. Returns `None` once the program is exhausted.
    pub fn step(&mut self) -> Option<Step<'_>> {
        let block_index = self.next_block;
        let block = self.blocks.get(block_index)?;
        let commands_before = self.commands.len();
        let diagnostics_before = self.diagnostics.len();

        self.interpreter.interpret_block(
            block_index,
            block,
            &mut self.commands,
            &mut self.diagnostics,
        );
        self.next_block += 1;

        Some(Step {
            block_index,
            line_number: block.line_number,
            commands: &self.commands[commands_before..],
            diagnostics: &self.diagnostics[diagnostics_before..],
        })
    }

    /// Interpret every remaining block
    pub fn run_to_end(&mut self) {
        while self.step().is_some() {}
    }

    /// Rewind to the first line with power-on state
    pub fn reset(&mut self) {
        self.next_block = 0;
        self.interpreter = Interpreter::new();
        self.commands.clear();
        self.diagnostics.clear();
    }

    pub fn is_finished(&self) -> bool {
        self.next_block >= self.blocks.len()
    }

    /// Line number of the next block to execute, `None` when finished
    pub fn current_line(&self) -> Option<usize> {
        self.blocks.get(self.next_block).map(|b| b.line_number)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn state(&self) -> &ModalState {
        self.interpreter.state()
    }

    /// Commands produced so far
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Package the progress so far like a batch run
    pub fn into_interpretation(self) -> Interpretation {
        Interpretation {
            commands: self.commands,
            diagnostics: self.diagnostics,
            final_state: self.interpreter.into_state(),
        }
    }
}
