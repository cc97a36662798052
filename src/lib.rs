//! This crate provides the core of a single- and multi-tape Turing machine simulator.
//! It includes modules for parsing transition tables, the sliding-window tapes they run on,
//! the lazy step-by-step execution engine, loading tables from disk, a small set of built-in
//! sample tables, and batch profiling of step counts over all words of a length.

pub mod loader;
pub mod machine;
pub mod parser;
pub mod profile;
pub mod samples;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `TableLoader` struct from the loader module.
pub use loader::TableLoader;
/// Re-exports the engine and its run iterators from the machine module.
pub use machine::{run, FinalOnlyRun, Run, TracedRun, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the profiler from the profile module.
pub use profile::{words, LengthProfile, Profiler};
/// Re-exports `Sample`, `SampleInfo`, `SampleManager`, and `SAMPLES` from the samples module.
pub use samples::{Sample, SampleInfo, SampleManager, SAMPLES};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the tape types from the tape module.
pub use tape::{Tape, TapeBundle};
/// Re-exports the core data types from the types module.
pub use types::{
    Direction, ExecutionStep, Outcome, State, Step, Symbol, Transition, TuringError, BLANK_SYMBOL,
};
