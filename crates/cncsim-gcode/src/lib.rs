//! # cncsim G-code
//!
//! Turns program text into canonical machine commands:
//! - line parsing into [`Block`]s of letter/value [`Word`]s
//! - sticky modal state tracking ([`ModalState`])
//! - canonical [`Command`]s and [`Diagnostic`]s from the [`Interpreter`]
//! - line-by-line playback with [`ProgramStepper`]

pub mod command;
pub mod interpreter;
pub mod parser;
pub mod state;
pub mod stepper;

pub use command::{Command, Diagnostic, MotionCommand, Severity};
pub use interpreter::{interpret_blocks, Interpretation, Interpreter};
pub use parser::{parse_block, parse_program, Block, Word};
pub use state::{DistanceMode, FeedMode, ModalState, MotionMode, Plane, SpindleMode};
pub use stepper::{ProgramStepper, Step};
