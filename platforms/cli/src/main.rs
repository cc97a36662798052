mod logger;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tmsim::{
    run, ExecutionStep, Outcome, Profiler, SampleManager, Step, TableLoader, TransitionTable,
    TuringMachine,
};

/// Runs Turing machine transition tables on input words.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tmsim run --sample even-a --trace abca
  tmsim run --table copy.tur --tapes 2 --max-steps 100 abc
  tmsim profile --sample even-a --alphabet abc --max-length 6")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a table on one or more words
    Run(RunArgs),
    /// Report the longest run for every word length over an alphabet
    Profile(ProfileArgs),
    /// List the built-in sample tables
    Samples,
}

#[derive(Args)]
struct TableArgs {
    /// The transition table file to execute
    #[clap(short, long, required_unless_present = "sample", conflicts_with = "sample")]
    table: Option<PathBuf>,

    /// A built-in sample table, see `tmsim samples`
    #[clap(short, long)]
    sample: Option<String>,

    /// Number of tapes the table file addresses (samples know their own)
    #[clap(short = 'n', long, default_value_t = 1, conflicts_with = "sample")]
    tapes: usize,
}

#[derive(Args)]
struct RunArgs {
    #[clap(flatten)]
    table: TableArgs,

    /// Print every configuration before each transition, then the final one
    #[clap(short = 'd', long)]
    trace: bool,

    /// Interrupt a run once it has applied this many transitions
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// Report whether the final tape 0 content contains this symbol
    #[clap(short, long)]
    accept: Option<char>,

    /// Also save the protocol to this file
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print one JSON object per word instead of text
    #[clap(long)]
    json: bool,

    /// The input words; read from stdin, one per line, when omitted
    words: Vec<String>,
}

#[derive(Args)]
struct ProfileArgs {
    #[clap(flatten)]
    table: TableArgs,

    /// The input alphabet, e.g. `abc`
    #[clap(long)]
    alphabet: String,

    /// Profile word lengths 0 through this value
    #[clap(long)]
    max_length: usize,

    /// Cut every run off after this many transitions
    #[clap(long)]
    step_limit: Option<usize>,

    /// Print one JSON object per length instead of text
    #[clap(long)]
    json: bool,
}

/// The result of running one word.
#[derive(Debug, Serialize)]
struct Report {
    word: String,
    /// `None` when the run was interrupted by `--max-steps`.
    outcome: Option<Outcome>,
    steps: usize,
    tape: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<ExecutionStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accepted: Option<bool>,
}

impl Report {
    fn summary(&self) -> String {
        let status = match self.outcome {
            Some(Outcome::Halted) => format!("halted after {} step(s)", self.steps),
            Some(Outcome::Stuck) => format!("stuck after {} step(s)", self.steps),
            None => format!("interrupted at step {}", self.steps),
        };

        let verdict = match self.accepted {
            Some(true) => ", accepted",
            Some(false) => ", rejected",
            None => "",
        };

        format!("\"{}\": {}, tape: {}{}", self.word, status, self.tape, verdict)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Run(args) => run_words(args),
        Command::Profile(args) => profile(args),
        Command::Samples => list_samples(),
    }
}

/// Loads the table named by the CLI arguments.
fn load_table(args: &TableArgs) -> anyhow::Result<Cow<'static, TransitionTable>> {
    if let Some(name) = &args.sample {
        return Ok(Cow::Borrowed(SampleManager::get_sample_table(name)?));
    }

    let Some(path) = &args.table else {
        bail!("either --table or --sample is required");
    };

    let table = TableLoader::load_table(path, args.tapes)
        .with_context(|| format!("Failed to load table {}", path.display()))?;
    Ok(Cow::Owned(table))
}

/// Collects input words from the arguments, or from stdin when it is piped.
fn input_words(words: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !words.is_empty() {
        return Ok(words);
    }

    if atty::isnt(atty::Stream::Stdin) {
        return io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read words from stdin");
    }

    bail!("no input words given; pass them as arguments or pipe them via stdin")
}

fn run_words(args: RunArgs) -> anyhow::Result<()> {
    let table = load_table(&args.table)?;
    let words = input_words(args.words)?;
    let mut protocol = String::new();

    for word in words {
        let report = execute(&table, &word, args.trace, args.max_steps, args.accept);

        let text = if args.json {
            serde_json::to_string(&report)?
        } else {
            let mut lines: Vec<String> = report.trace.iter().map(|s| s.label.clone()).collect();
            lines.push(report.summary());
            lines.join("\n")
        };

        println!("{text}");
        protocol.push_str(&text);
        protocol.push('\n');
    }

    if let Some(path) = &args.output {
        fs::write(path, protocol)
            .with_context(|| format!("Failed to write protocol to {}", path.display()))?;
        log::info!("protocol saved to {}", path.display());
    }

    Ok(())
}

/// Returns `true` if pulling the machine once more would apply another transition.
fn can_continue(machine: &TuringMachine) -> bool {
    !machine.is_halted() && machine.transition().is_some()
}

/// Runs one word, interrupting it after `max_steps` transitions if given.
fn execute(
    table: &TransitionTable,
    word: &str,
    trace: bool,
    max_steps: Option<usize>,
    accept: Option<char>,
) -> Report {
    let mut protocol = Vec::new();

    let (outcome, steps, tape) = match (trace, max_steps) {
        // A final-only run computes its single item eagerly, so bounded runs drive the machine.
        (false, Some(limit)) => {
            let mut machine = TuringMachine::new(table);
            machine.load(word);

            let outcome = loop {
                if machine.step_count() >= limit && can_continue(&machine) {
                    break None;
                }
                if let Step::Halt(outcome) = machine.step() {
                    break Some(outcome);
                }
            };
            (outcome, machine.step_count(), machine.word())
        }
        _ => {
            let mut run = run(table, word, trace);
            while let Some(step) = run.next() {
                let count = step.step;
                if trace {
                    protocol.push(step);
                }
                if max_steps.is_some_and(|limit| count >= limit) && can_continue(run.machine()) {
                    break;
                }
            }
            (
                run.outcome(),
                run.machine().step_count(),
                run.machine().word(),
            )
        }
    };

    if outcome.is_none() {
        log::info!("run of {word:?} interrupted at step {steps}");
    }

    Report {
        word: word.to_string(),
        accepted: accept.map(|symbol| tape.contains(symbol)),
        outcome,
        steps,
        tape,
        trace: protocol,
    }
}

fn profile(args: ProfileArgs) -> anyhow::Result<()> {
    let table = load_table(&args.table)?;
    let profiler = Profiler::new(&table, &args.alphabet).step_limit(args.step_limit);

    for profile in profiler.lengths().take(length_count(args.max_length)) {
        if args.json {
            println!("{}", serde_json::to_string(&profile)?);
            continue;
        }

        let mut line = format!(
            "length {}: {} word(s), max {} step(s)",
            profile.length, profile.words, profile.max_steps
        );
        if profile.over_limit > 0 {
            line.push_str(&format!(", {} over limit", profile.over_limit));
        }
        println!("{line}");
    }

    Ok(())
}

/// Number of lengths `0..=max_length` covers, capped at `usize::MAX`.
fn length_count(max_length: usize) -> usize {
    max_length.saturating_add(1)
}

fn list_samples() -> anyhow::Result<()> {
    for name in SampleManager::list_sample_names() {
        let info = SampleManager::get_sample_info(name)?;
        println!(
            "{:<10} {} tape(s), {} rule(s)  {}",
            info.name, info.tape_count, info.rule_count, info.description
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LOOP_ON_A: &str = "q0 a -> q0 a R\nq0 λ -> q0 λ L\n";

    fn sample(name: &str) -> &'static TransitionTable {
        SampleManager::get_sample_table(name).unwrap()
    }

    #[test]
    fn test_execute_final_only() {
        let report = execute(sample("even-a"), "ab", false, None, Some('1'));

        assert_eq!(report.outcome, Some(Outcome::Halted));
        assert_eq!(report.steps, 3);
        assert_eq!(report.tape, "0");
        assert_eq!(report.accepted, Some(false));
        assert!(report.trace.is_empty());
        assert_eq!(
            report.summary(),
            "\"ab\": halted after 3 step(s), tape: 0, rejected"
        );
    }

    #[test]
    fn test_execute_trace() {
        let report = execute(sample("even-a"), "a", true, None, None);

        let labels: Vec<_> = report.trace.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["q₀a", "q₁λ", "qz0"]);
        assert_eq!(report.steps, 2);
    }

    #[test]
    fn test_execute_interrupts_trace() {
        let table = TransitionTable::parse(LOOP_ON_A, 1).unwrap();
        let report = execute(&table, "a", true, Some(4), None);

        assert_eq!(report.outcome, None);
        assert_eq!(report.steps, 4);
        assert_eq!(report.trace.len(), 4);
        assert_eq!(report.summary(), "\"a\": interrupted at step 4, tape: a");
    }

    #[test]
    fn test_execute_interrupts_final_only() {
        let table = TransitionTable::parse(LOOP_ON_A, 1).unwrap();
        let report = execute(&table, "a", false, Some(5), None);

        assert_eq!(report.outcome, None);
        assert_eq!(report.steps, 5);
    }

    #[test]
    fn test_execute_limit_not_hit() {
        let report = execute(sample("copy"), "abc", false, Some(100), None);

        assert_eq!(report.outcome, Some(Outcome::Halted));
        assert_eq!(report.tape, "abc");
    }

    #[test]
    fn test_execute_limit_at_halting_step() {
        // `a` takes exactly two transitions; stopping there is not an interruption.
        let report = execute(sample("even-a"), "a", true, Some(2), None);

        assert_eq!(report.outcome, Some(Outcome::Halted));
        assert_eq!(report.trace.len(), 3);
    }

    #[test]
    fn test_report_json() {
        let report = execute(sample("even-a"), "", false, None, None);
        let json = serde_json::to_string(&report).unwrap();

        assert_eq!(
            json,
            r#"{"word":"","outcome":"Halted","steps":1,"tape":"1"}"#
        );
    }

    #[test]
    fn test_tapes_conflicts_with_sample() {
        let result = Cli::try_parse_from(["tmsim", "run", "--sample", "copy", "--tapes", "2", "ab"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["tmsim", "run", "--sample", "copy", "ab"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_length_count() {
        assert_eq!(length_count(6), 7);
        assert_eq!(length_count(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_load_table_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.tur");
        fs::write(&path, "q0 a -> q0 a R\nq0 λ -> qz λ E\n").unwrap();

        let args = TableArgs {
            table: Some(path),
            sample: None,
            tapes: 1,
        };
        let table = load_table(&args).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_table_reports_bad_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tur");
        fs::write(&path, "q0 a -> q0 a R\n(q0,a) -> (q0,a;R)\n").unwrap();

        let args = TableArgs {
            table: Some(path),
            sample: None,
            tapes: 1,
        };
        let error = load_table(&args).unwrap_err();
        assert!(format!("{error:#}").contains("line 2"));
    }
}
