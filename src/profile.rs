//! Batch evaluation of a table over every word of a given length.
//!
//! The profiler answers "what is the longest run among all words of length n?" for
//! n = 0, 1, 2, … without materializing any trace. Runs are final-only; an optional step limit
//! keeps tables that never stop on some input from blocking a whole length.

use crate::machine::TuringMachine;
use crate::table::TransitionTable;
use crate::types::{Step, Symbol};
use serde::Serialize;

/// Enumerates all words of exactly `length` symbols over `alphabet`, in lexicographic order of
/// the alphabet as given.
///
/// Length zero yields the empty word once. An empty alphabet yields nothing for any other length.
pub fn words(alphabet: &[Symbol], length: usize) -> Words {
    Words {
        alphabet: alphabet.to_vec(),
        indices: vec![0; length],
        done: length > 0 && alphabet.is_empty(),
    }
}

/// Iterator returned by [`words`].
#[derive(Debug, Clone)]
pub struct Words {
    alphabet: Vec<Symbol>,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Words {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let word = self.indices.iter().map(|&i| self.alphabet[i]).collect();

        // Odometer increment from the last position; wrapping the first one ends the sequence.
        self.done = true;
        for index in self.indices.iter_mut().rev() {
            *index += 1;
            if *index < self.alphabet.len() {
                self.done = false;
                break;
            }
            *index = 0;
        }

        Some(word)
    }
}

/// Step statistics for all words of one length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthProfile {
    /// The word length.
    pub length: usize,
    /// How many words were run.
    pub words: usize,
    /// The largest step count seen. Runs cut off by the step limit count as the limit.
    pub max_steps: usize,
    /// How many runs were cut off by the step limit.
    pub over_limit: usize,
}

/// Runs a table over every word of a length, one length at a time.
#[derive(Debug, Clone)]
pub struct Profiler<'t> {
    table: &'t TransitionTable,
    alphabet: Vec<Symbol>,
    step_limit: Option<usize>,
}

impl<'t> Profiler<'t> {
    /// Creates a profiler for `table` over the symbols of `alphabet`, with no step limit.
    pub fn new(table: &'t TransitionTable, alphabet: &str) -> Self {
        Self {
            table,
            alphabet: alphabet.chars().collect(),
            step_limit: None,
        }
    }

    /// Caps every run at `limit` transitions.
    pub fn step_limit(mut self, limit: Option<usize>) -> Self {
        self.step_limit = limit;
        self
    }

    /// Runs every word of `length` and collects the statistics.
    pub fn profile(&self, length: usize) -> LengthProfile {
        let mut machine = TuringMachine::new(self.table);
        let mut profile = LengthProfile {
            length,
            words: 0,
            max_steps: 0,
            over_limit: 0,
        };

        for word in words(&self.alphabet, length) {
            machine.load(&word);
            let (steps, cut_off) = self.measure(&mut machine);

            profile.words += 1;
            profile.max_steps = profile.max_steps.max(steps);
            if cut_off {
                profile.over_limit += 1;
            }
        }

        log::debug!(
            "length {}: {} word(s), max {} step(s), {} over limit",
            profile.length,
            profile.words,
            profile.max_steps,
            profile.over_limit
        );

        profile
    }

    /// Lazily profiles lengths 0, 1, 2, … until the caller stops pulling.
    pub fn lengths(&self) -> Lengths<'_, 't> {
        Lengths {
            profiler: self,
            next_length: 0,
        }
    }

    /// Runs a loaded machine to completion or to the step limit.
    /// Returns the step count and whether the limit cut the run short.
    fn measure(&self, machine: &mut TuringMachine) -> (usize, bool) {
        loop {
            if let Some(limit) = self.step_limit {
                if machine.step_count() >= limit {
                    let cut_off = machine.step() == Step::Continue;
                    return (limit, cut_off);
                }
            }

            if let Step::Halt(_) = machine.step() {
                return (machine.step_count(), false);
            }
        }
    }
}

/// Iterator returned by [`Profiler::lengths`]. Never ends on its own.
#[derive(Debug, Clone)]
pub struct Lengths<'p, 't> {
    profiler: &'p Profiler<'t>,
    next_length: usize,
}

impl Iterator for Lengths<'_, '_> {
    type Item = LengthProfile;

    fn next(&mut self) -> Option<Self::Item> {
        let profile = self.profiler.profile(self.next_length);
        self.next_length += 1;
        Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const EVEN_A: &str = include_str!("../tables/even-a.tur");
    const LOOP_ON_A: &str = "q0 a -> q0 a R\nq0 λ -> q0 λ L\n";

    #[test]
    fn test_words_order() {
        let all: Vec<_> = words(&['a', 'b'], 2).collect();
        assert_eq!(all, vec!["aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn test_words_edge_lengths() {
        assert_eq!(words(&['a', 'b', 'c'], 0).collect::<Vec<_>>(), vec![""]);
        assert_eq!(words(&[], 0).count(), 1);
        assert_eq!(words(&[], 2).count(), 0);
        assert_eq!(words(&['a', 'b', 'c'], 3).count(), 27);
    }

    #[test]
    fn test_profile_grows_with_length() {
        let table = parse(EVEN_A, 1).unwrap();
        let profiler = Profiler::new(&table, "abc");

        let max_steps: Vec<_> = profiler.lengths().take(4).map(|p| p.max_steps).collect();
        assert_eq!(max_steps, vec![1, 2, 3, 4]);

        let profile = profiler.profile(2);
        assert_eq!(profile.words, 9);
        assert_eq!(profile.over_limit, 0);
    }

    #[test]
    fn test_profile_step_limit() {
        let table = parse(LOOP_ON_A, 1).unwrap();
        let profiler = Profiler::new(&table, "ab").step_limit(Some(10));

        assert_eq!(
            profiler.profile(1),
            LengthProfile {
                length: 1,
                words: 2,
                max_steps: 10,
                over_limit: 1,
            }
        );
    }

    #[test]
    fn test_profile_halting_at_limit_is_not_cut_off() {
        let table = parse(EVEN_A, 1).unwrap();
        let profiler = Profiler::new(&table, "a").step_limit(Some(3));

        let profile = profiler.profile(2);
        assert_eq!(profile.max_steps, 3);
        assert_eq!(profile.over_limit, 0);
    }
}
