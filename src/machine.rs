//! This module defines the `TuringMachine` struct, which executes a [`TransitionTable`] over a
//! [`TapeBundle`], and the lazy [`Run`] iterators that turn a machine into a sequence of
//! [`ExecutionStep`]s.
//!
//! A run never does work ahead of the consumer: each call to `next()` applies at most one
//! transition in trace mode, and the single item of a final-only run is only computed when it is
//! pulled. Dropping a run at any point leaves nothing behind, so callers implement interruption
//! simply by no longer pulling.

use crate::table::TransitionTable;
use crate::tape::TapeBundle;
use crate::types::{ExecutionStep, Outcome, State, Step, Transition};
use std::iter::FusedIterator;

/// A Turing machine bound to a shared transition table.
///
/// The machine owns its tapes; the table is borrowed immutably, so any number of machines can
/// execute the same table at once, including from different threads.
#[derive(Debug, Clone)]
pub struct TuringMachine<'t> {
    table: &'t TransitionTable,
    state: State,
    bundle: TapeBundle,
    step_count: usize,
}

impl<'t> TuringMachine<'t> {
    /// Creates a machine in state `q0` with `table.tape_count()` blank tapes.
    pub fn new(table: &'t TransitionTable) -> Self {
        Self {
            table,
            state: State::INITIAL,
            bundle: TapeBundle::new(table.tape_count()),
            step_count: 0,
        }
    }

    /// Resets the machine to `q0` with `word` on tape 0 and every other tape blank.
    pub fn load(&mut self, word: &str) {
        self.state = State::INITIAL;
        self.step_count = 0;
        self.bundle.set_word(word);
    }

    /// Executes a single step of the machine's computation.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt(Outcome::Halted)` if the machine is in the halt state.
    /// * `Step::Halt(Outcome::Stuck)` if no rule matches the current state and symbols.
    ///
    /// Once halted, further calls keep returning the same outcome without touching the tapes.
    pub fn step(&mut self) -> Step {
        if self.state.is_halt() {
            return Step::Halt(Outcome::Halted);
        }

        let Some(transition) = self.transition() else {
            return Step::Halt(Outcome::Stuck);
        };

        self.bundle.write(&transition.write);
        self.bundle.advance(&transition.directions);
        self.state = transition.next_state;
        self.step_count += 1;

        log::trace!(
            "step {}: -> {} {}",
            self.step_count,
            self.state,
            self.bundle.snapshot(self.state)
        );

        Step::Continue
    }

    /// Finds the rule that applies to the current state and the symbols under the heads.
    pub fn transition(&self) -> Option<&'t Transition> {
        self.table.get(self.state, &self.bundle.read())
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the number of transitions applied since the last `load`.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks if the machine has reached the halt state.
    pub fn is_halted(&self) -> bool {
        self.state.is_halt()
    }

    /// Returns the machine's tapes.
    pub fn bundle(&self) -> &TapeBundle {
        &self.bundle
    }

    /// Returns the table this machine executes.
    pub fn table(&self) -> &'t TransitionTable {
        self.table
    }

    /// Renders every tape with the current state marker at its head.
    pub fn snapshot(&self) -> String {
        self.bundle.snapshot(self.state)
    }

    /// Returns the raw content of tape 0.
    pub fn word(&self) -> String {
        self.bundle.word()
    }

    fn log_finish(&self, outcome: Outcome) {
        log::debug!(
            "run finished: {:?} after {} step(s) in {}",
            outcome,
            self.step_count,
            self.state
        );
    }
}

/// A run that yields the configuration before every applied transition and then the final one.
///
/// For a run that stops after `k` transitions the iterator yields `k + 1` items.
#[derive(Debug, Clone)]
pub struct TracedRun<'t> {
    machine: TuringMachine<'t>,
    outcome: Option<Outcome>,
}

impl<'t> TracedRun<'t> {
    /// Wraps an already loaded machine.
    pub fn new(machine: TuringMachine<'t>) -> Self {
        Self {
            machine,
            outcome: None,
        }
    }

    /// How the run ended, once its last item has been yielded.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn machine(&self) -> &TuringMachine<'t> {
        &self.machine
    }
}

impl Iterator for TracedRun<'_> {
    type Item = ExecutionStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() {
            return None;
        }

        // A stopped machine leaves its tapes untouched, so this snapshot is also the final label.
        let label = self.machine.snapshot();
        if let Step::Halt(outcome) = self.machine.step() {
            self.machine.log_finish(outcome);
            self.outcome = Some(outcome);
        }

        Some(ExecutionStep {
            label,
            step: self.machine.step_count(),
        })
    }
}

impl FusedIterator for TracedRun<'_> {}

/// A run that yields a single item: the raw tape 0 content and the total step count.
#[derive(Debug, Clone)]
pub struct FinalOnlyRun<'t> {
    machine: TuringMachine<'t>,
    outcome: Option<Outcome>,
}

impl<'t> FinalOnlyRun<'t> {
    /// Wraps an already loaded machine.
    pub fn new(machine: TuringMachine<'t>) -> Self {
        Self {
            machine,
            outcome: None,
        }
    }

    /// How the run ended, once its item has been yielded.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn machine(&self) -> &TuringMachine<'t> {
        &self.machine
    }
}

impl Iterator for FinalOnlyRun<'_> {
    type Item = ExecutionStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() {
            return None;
        }

        let outcome = loop {
            if let Step::Halt(outcome) = self.machine.step() {
                break outcome;
            }
        };
        self.machine.log_finish(outcome);
        self.outcome = Some(outcome);

        Some(ExecutionStep {
            label: self.machine.word(),
            step: self.machine.step_count(),
        })
    }
}

impl FusedIterator for FinalOnlyRun<'_> {}

/// A lazy run in either trace or final-only mode.
#[derive(Debug, Clone)]
pub enum Run<'t> {
    Traced(TracedRun<'t>),
    FinalOnly(FinalOnlyRun<'t>),
}

impl<'t> Run<'t> {
    /// How the run ended, or `None` while it is still in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Run::Traced(run) => run.outcome(),
            Run::FinalOnly(run) => run.outcome(),
        }
    }

    /// The machine driving this run.
    pub fn machine(&self) -> &TuringMachine<'t> {
        match self {
            Run::Traced(run) => run.machine(),
            Run::FinalOnly(run) => run.machine(),
        }
    }
}

impl Iterator for Run<'_> {
    type Item = ExecutionStep;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Run::Traced(run) => run.next(),
            Run::FinalOnly(run) => run.next(),
        }
    }
}

impl FusedIterator for Run<'_> {}

/// Starts a run of `table` on `word`.
///
/// With `trace` set, the run yields a snapshot before every transition plus a final snapshot;
/// otherwise it yields only the final raw word. Nothing executes until the run is pulled.
///
/// The engine imposes no step limit: a table that loops forever produces an endless trace, or
/// a final-only run whose single item never arrives. Bound it by pulling a limited number of
/// items or by driving a [`TuringMachine`] directly.
pub fn run<'t>(table: &'t TransitionTable, word: &str, trace: bool) -> Run<'t> {
    let mut machine = TuringMachine::new(table);
    machine.load(word);

    if trace {
        Run::Traced(TracedRun::new(machine))
    } else {
        Run::FinalOnly(FinalOnlyRun::new(machine))
    }
}
