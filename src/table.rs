//! The transition table: an immutable mapping from `(state, symbols under the heads)` to the
//! transition to apply. Tables are built once (usually by [`parse`](crate::parser::parse)) and
//! then shared by reference between any number of runs.

use crate::types::{State, Symbol, Transition, TuringError};
use std::collections::HashMap;

/// A parsed transition table for a fixed number of tapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    tape_count: usize,
    rules: HashMap<State, HashMap<Vec<Symbol>, Transition>>,
}

impl TransitionTable {
    /// Creates an empty table for `tape_count` tapes.
    ///
    /// # Returns
    ///
    /// * `Err(TuringError::InvalidTapeCount)` if `tape_count` is zero.
    pub fn new(tape_count: usize) -> Result<Self, TuringError> {
        if tape_count == 0 {
            return Err(TuringError::InvalidTapeCount(tape_count));
        }

        Ok(Self {
            tape_count,
            rules: HashMap::new(),
        })
    }

    /// Parses `input` into a table for `tape_count` tapes. See [`crate::parser::parse`].
    pub fn parse(input: &str, tape_count: usize) -> Result<Self, TuringError> {
        crate::parser::parse(input, tape_count)
    }

    /// Adds a rule, returning the transition it replaced if the key was already mapped.
    ///
    /// # Panics
    ///
    /// Panics if `read`, `transition.write` or `transition.directions` does not hold
    /// exactly one entry per tape.
    pub fn insert(
        &mut self,
        state: State,
        read: Vec<Symbol>,
        transition: Transition,
    ) -> Option<Transition> {
        assert!(
            read.len() == self.tape_count
                && transition.write.len() == self.tape_count
                && transition.directions.len() == self.tape_count,
            "tuple length must match the tape count"
        );

        self.rules
            .entry(state)
            .or_default()
            .insert(read, transition)
    }

    /// Finds the transition for `state` reading `symbols`, if any.
    pub fn get(&self, state: State, symbols: &[Symbol]) -> Option<&Transition> {
        self.rules.get(&state)?.get(symbols)
    }

    /// Returns the number of tapes every rule addresses.
    pub fn tape_count(&self) -> usize {
        self.tape_count
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(state, symbols read, transition)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (State, &[Symbol], &Transition)> + '_ {
        self.rules.iter().flat_map(|(&state, by_symbols)| {
            by_symbols
                .iter()
                .map(move |(read, transition)| (state, read.as_slice(), transition))
        })
    }

    /// Returns every state that has at least one outgoing rule, sorted.
    pub fn states(&self) -> Vec<State> {
        let mut states: Vec<State> = self
            .rules
            .iter()
            .filter(|(_, by_symbols)| !by_symbols.is_empty())
            .map(|(&state, _)| state)
            .collect();
        states.sort();
        states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn transition(next_state: State, write: &[Symbol], directions: &[Direction]) -> Transition {
        Transition {
            next_state,
            write: write.to_vec(),
            directions: directions.to_vec(),
        }
    }

    #[test]
    fn test_zero_tapes_rejected() {
        assert_eq!(
            TransitionTable::new(0),
            Err(TuringError::InvalidTapeCount(0))
        );
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = TransitionTable::new(2).unwrap();
        let rule = transition(State::Halt, &['a', 'a'], &[Direction::Stay, Direction::Right]);
        assert!(table
            .insert(State::Live(0), vec!['a', 'λ'], rule.clone())
            .is_none());

        assert_eq!(table.get(State::Live(0), &['a', 'λ']), Some(&rule));
        assert_eq!(table.get(State::Live(0), &['a', 'a']), None);
        assert_eq!(table.get(State::Live(1), &['a', 'λ']), None);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut table = TransitionTable::new(1).unwrap();
        let first = transition(State::Live(1), &['a'], &[Direction::Right]);
        let second = transition(State::Halt, &['b'], &[Direction::Left]);

        table.insert(State::Live(0), vec!['a'], first.clone());
        assert_eq!(
            table.insert(State::Live(0), vec!['a'], second.clone()),
            Some(first)
        );
        assert_eq!(table.get(State::Live(0), &['a']), Some(&second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_states_sorted() {
        let mut table = TransitionTable::new(1).unwrap();
        for n in [3, 0, 7] {
            table.insert(
                State::Live(n),
                vec!['a'],
                transition(State::Halt, &['a'], &[Direction::Stay]),
            );
        }

        assert_eq!(
            table.states(),
            vec![State::Live(0), State::Live(3), State::Live(7)]
        );
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    #[should_panic(expected = "tuple length must match the tape count")]
    fn test_insert_rejects_wrong_arity() {
        let mut table = TransitionTable::new(2).unwrap();
        table.insert(
            State::Live(0),
            vec!['a'],
            transition(State::Halt, &['a'], &[Direction::Stay]),
        );
    }
}
