//! This module defines the core data structures and types used throughout the Turing Machine
//! engine, including states, directions, transitions, execution steps, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// A single tape symbol.
pub type Symbol = char;

/// The reserved blank symbol marking an unwritten tape cell.
pub const BLANK_SYMBOL: Symbol = 'λ';
/// Text form of the terminal state label (`qz`).
pub const HALT_LABEL: char = 'z';

/// A machine state: either a numbered live state or the terminal halt state.
///
/// Every run starts in `Live(0)`. Live states are compared by number, so `q00` and `q0`
/// name the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    /// A numbered live state, written `q<n>` in transition tables.
    Live(u32),
    /// The terminal state, written `qz` in transition tables.
    Halt,
}

impl State {
    /// The state every run starts in.
    pub const INITIAL: State = State::Live(0);

    /// Returns `true` if this is the terminal halt state.
    pub fn is_halt(&self) -> bool {
        matches!(self, State::Halt)
    }
}

impl Default for State {
    fn default() -> Self {
        State::INITIAL
    }
}

/// Renders the state marker inlined into tape snapshots: `q` followed by the
/// number in subscript digits, or `qz` for the halt state.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Live(n) => write!(f, "q{}", to_subscript(*n)),
            State::Halt => write!(f, "q{HALT_LABEL}"),
        }
    }
}

/// Maps each decimal digit of `n` to its Unicode subscript form, most-significant digit first.
///
/// ```
/// assert_eq!(tmsim::types::to_subscript(105), "₁₀₅");
/// ```
pub fn to_subscript(n: u32) -> String {
    n.to_string()
        .chars()
        .filter_map(|digit| digit.to_digit(10))
        .filter_map(|digit| char::from_u32('₀' as u32 + digit))
        .collect()
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (`L`).
    Left,
    /// Move the head one position to the right (`R`).
    Right,
    /// Keep the head in the same position (`E`).
    Stay,
}

impl Direction {
    /// The letter used for this direction in transition tables.
    pub fn as_char(&self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'E',
        }
    }
}

/// The right-hand side of a transition rule.
///
/// The left-hand side (current state and symbols under the heads) is the key the
/// transition is stored under in a [`TransitionTable`](crate::TransitionTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state the machine moves to.
    pub next_state: State,
    /// One symbol to write per tape.
    pub write: Vec<Symbol>,
    /// One head movement per tape, applied after writing.
    pub directions: Vec<Direction>,
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The machine reached the halt state `qz`.
    Halted,
    /// No rule matched the current state and symbols.
    Stuck,
}

/// Represents the outcome of a single engine iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied and the machine may continue.
    Continue,
    /// The machine has stopped and will not move again.
    Halt(Outcome),
}

/// One item of a run's output sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStep {
    /// A snapshot of the tapes, or the raw tape 0 content for a final-only run.
    pub label: String,
    /// Number of transitions applied so far.
    pub step: usize,
}

/// Represents various errors that can occur while building tables or loading them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringError {
    /// A transition table line does not match the grammar for the configured tape count.
    #[error("Table parsing error on line {line}: {source}")]
    ParseError {
        line: usize,
        #[source]
        source: Box<pest::error::Error<Rule>>,
    },
    /// A rule carries a symbol or direction tuple of the wrong length.
    #[error("Tape count mismatch on line {line}: expected {expected} entries, found {found}")]
    TapeCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A table was requested for zero tapes.
    #[error("Invalid tape count: {0}")]
    InvalidTapeCount(usize),
    /// A lookup or structural check failed.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading table files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_marker() {
        assert_eq!(State::Live(0).to_string(), "q₀");
        assert_eq!(State::Live(12).to_string(), "q₁₂");
        assert_eq!(State::Live(907).to_string(), "q₉₀₇");
        assert_eq!(State::Halt.to_string(), "qz");
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(State::default(), State::Live(0));
        assert!(!State::INITIAL.is_halt());
        assert!(State::Halt.is_halt());
    }

    #[test]
    fn test_direction_letters() {
        assert_eq!(Direction::Left.as_char(), 'L');
        assert_eq!(Direction::Right.as_char(), 'R');
        assert_eq!(Direction::Stay.as_char(), 'E');
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let stay: Direction = serde_json::from_str("\"Stay\"").unwrap();
        assert_eq!(stay, Direction::Stay);
    }

    #[test]
    fn test_execution_step_serialization() {
        let step = ExecutionStep {
            label: "aq₀b".to_string(),
            step: 3,
        };

        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"label":"aq₀b","step":3}"#);
    }

    #[test]
    fn test_error_display() {
        let error = TuringError::TapeCountMismatch {
            line: 4,
            expected: 2,
            found: 3,
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("line 4"));
        assert!(error_msg.contains("expected 2"));
    }
}
