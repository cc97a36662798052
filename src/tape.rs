//! This module provides the tape abstractions: a single two-way-infinite [`Tape`] stored as a
//! minimal sliding window, and a [`TapeBundle`] of tapes driven in lock-step.
//!
//! The window only materializes the span the head has visited. It grows by one blank cell at
//! whichever boundary the head crosses and drops blank padding again when the head moves back
//! away from it, so oscillating at a boundary never accumulates cells.

use crate::types::{Direction, State, Symbol, BLANK_SYMBOL};

/// A single tape with one read/write head.
///
/// `content` is never empty and `head` always indexes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    content: Vec<Symbol>,
    head: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Creates a tape holding a single blank cell.
    pub fn new() -> Self {
        Self {
            content: vec![BLANK_SYMBOL],
            head: 0,
        }
    }

    /// Replaces the content with `word` and moves the head to the first cell.
    /// An empty word leaves a single blank cell.
    pub fn set_word(&mut self, word: &str) {
        self.head = 0;
        self.content = word.chars().collect();
        if self.content.is_empty() {
            self.content.push(BLANK_SYMBOL);
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.content[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.content[self.head] = symbol;
    }

    /// Moves the head one cell, resizing the window at its boundaries.
    pub fn advance(&mut self, direction: Direction) {
        match direction {
            Direction::Right => {
                if self.content[0] == BLANK_SYMBOL {
                    // Dropping the leading cell shifts every cell left by one,
                    // which moves the head right without touching `head`.
                    self.content.remove(0);
                } else {
                    self.head += 1;
                }
                if self.head == self.content.len() {
                    self.content.push(BLANK_SYMBOL);
                }
            }
            Direction::Left => {
                if self.head > 0 {
                    self.head -= 1;
                    if self.content.last() == Some(&BLANK_SYMBOL) {
                        self.content.pop();
                    }
                } else if !self.is_lone_blank() {
                    self.content.insert(0, BLANK_SYMBOL);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Renders the content with the state marker inserted right before the head cell.
    ///
    /// `"ab"` with the head on `b` in state 3 renders as `aq₃b`.
    pub fn snapshot(&self, state: State) -> String {
        let mut out: String = self.content[..self.head].iter().collect();
        out.push_str(&state.to_string());
        out.extend(&self.content[self.head..]);
        out
    }

    /// Returns the materialized content as text, blanks included.
    pub fn word(&self) -> String {
        self.content.iter().collect()
    }

    /// Returns the materialized cells.
    pub fn content(&self) -> &[Symbol] {
        &self.content
    }

    /// Returns the head position within the window.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the window size. Always at least one.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// A tape window is never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn is_lone_blank(&self) -> bool {
        self.content.len() == 1 && self.content[0] == BLANK_SYMBOL
    }
}

/// An ordered, fixed-size tuple of tapes read, written and moved together.
///
/// Every tuple argument must carry exactly one entry per tape; anything else is a
/// programming error and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeBundle {
    tapes: Vec<Tape>,
}

impl TapeBundle {
    /// Creates `count` blank tapes.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "a tape bundle needs at least one tape");
        Self {
            tapes: vec![Tape::new(); count],
        }
    }

    /// Loads `word` onto tape 0 and resets every other tape to a single blank.
    pub fn set_word(&mut self, word: &str) {
        let (first, rest) = self.tapes.split_at_mut(1);
        first[0].set_word(word);
        for tape in rest {
            tape.set_word("");
        }
    }

    /// Returns the symbols under every head, in tape order.
    pub fn read(&self) -> Vec<Symbol> {
        self.tapes.iter().map(Tape::read).collect()
    }

    /// Writes one symbol per tape.
    pub fn write(&mut self, symbols: &[Symbol]) {
        self.check_arity(symbols.len());
        for (tape, &symbol) in self.tapes.iter_mut().zip(symbols) {
            tape.write(symbol);
        }
    }

    /// Moves every head in its own direction.
    pub fn advance(&mut self, directions: &[Direction]) {
        self.check_arity(directions.len());
        for (tape, &direction) in self.tapes.iter_mut().zip(directions) {
            tape.advance(direction);
        }
    }

    /// Per-tape snapshots joined with tabs.
    pub fn snapshot(&self, state: State) -> String {
        self.tapes
            .iter()
            .map(|tape| tape.snapshot(state))
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Returns the raw content of tape 0.
    pub fn word(&self) -> String {
        self.tapes[0].word()
    }

    /// Returns a slice of the tapes.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// Returns the number of tapes.
    pub fn tape_count(&self) -> usize {
        self.tapes.len()
    }

    fn check_arity(&self, len: usize) {
        assert_eq!(
            len,
            self.tapes.len(),
            "tuple length must match the tape count"
        );
    }
}
