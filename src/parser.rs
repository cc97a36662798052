//! This module provides the parser for transition tables, utilizing the `pest` crate.
//! The grammar (`grammar.pest`) describes one rule per line in either the single-tape form
//! `q0 a -> q1 b R` or the multi-tape form `(q0,a,b) -> (q1,c,d;R,L)`. The grammar itself is
//! independent of the tape count; tuple lengths are checked against it after parsing.

use crate::{
    table::TransitionTable,
    types::{Direction, State, Symbol, Transition, TuringError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the transition table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// Parses a full transition table for `tape_count` tapes.
///
/// Tables for one tape use the single-tape line form, tables for two or more tapes use the
/// parenthesized multi-tape form. Whitespace around the whole table is ignored, and empty or
/// whitespace-only lines are skipped. When two lines share the same `(state, symbols)` key the
/// later one wins.
///
/// # Arguments
///
/// * `input` - The table source, one rule per line.
/// * `tape_count` - The number of tapes every rule must address.
///
/// # Returns
///
/// * `Ok(TransitionTable)` if every line is valid.
/// * `Err(TuringError::ParseError)` naming the first line that does not match the grammar.
/// * `Err(TuringError::TapeCountMismatch)` if a rule's tuples have the wrong length.
/// * `Err(TuringError::InvalidTapeCount)` if `tape_count` is zero.
pub fn parse(input: &str, tape_count: usize) -> Result<TransitionTable, TuringError> {
    let mut table = TransitionTable::new(tape_count)?;
    let rule = if tape_count == 1 {
        Rule::single_tape_line
    } else {
        Rule::multi_tape_line
    };

    // Line numbers still count the blank lines in front of the trimmed text.
    let leading = &input[..input.len() - input.trim_start().len()];
    let offset = leading.matches('\n').count();

    for (index, text) in input.trim().lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }

        let line = offset + index + 1;
        let parsed = parse_line(text, rule).map_err(|source| TuringError::ParseError {
            line,
            source: Box::new(source),
        })?;
        check_tape_count(&parsed, tape_count, line)?;

        let ParsedRule {
            state,
            read,
            transition,
        } = parsed;

        if table.insert(state, read, transition).is_some() {
            log::warn!("line {line}: rule for {state} overrides an earlier rule with the same key");
        }
    }

    log::debug!(
        "parsed transition table: {} rules for {} tape(s)",
        table.len(),
        tape_count
    );

    Ok(table)
}

/// A single parsed line, before its tuple lengths are validated.
#[derive(Debug)]
struct ParsedRule {
    state: State,
    read: Vec<Symbol>,
    transition: Transition,
}

/// Parses one line with the given top-level rule.
fn parse_line(text: &str, rule: Rule) -> Result<ParsedRule, Error<Rule>> {
    let line = TableParser::parse(rule, text)?.next().ok_or_else(|| {
        Error::new_from_pos(
            ErrorVariant::CustomError {
                message: "Empty transition rule".to_string(),
            },
            Position::from_start(text),
        )
    })?;
    let span = line.as_span();
    let mut pairs = line.into_inner();

    match rule {
        Rule::single_tape_line => parse_single_tape_line(&mut pairs, span),
        _ => parse_multi_tape_line(&mut pairs, span),
    }
}

/// Parses the pairs of `q<n> <a> -> q<m|z> <b> <d>`.
fn parse_single_tape_line<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span<'i>,
) -> Result<ParsedRule, Error<Rule>> {
    let state = parse_state(expect_pair(pairs, span)?)?;
    let read = parse_symbol(expect_pair(pairs, span)?);
    let next_state = parse_next_state(expect_pair(pairs, span)?)?;
    let write = parse_symbol(expect_pair(pairs, span)?);
    let direction = parse_direction(expect_pair(pairs, span)?)?;

    Ok(ParsedRule {
        state,
        read: vec![read],
        transition: Transition {
            next_state,
            write: vec![write],
            directions: vec![direction],
        },
    })
}

/// Parses the pairs of `(q<n>,<a1>,…) -> (q<m|z>,<b1>,…;<d1>,…)`.
fn parse_multi_tape_line<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span<'i>,
) -> Result<ParsedRule, Error<Rule>> {
    let state = parse_state(expect_pair(pairs, span)?)?;
    let read = parse_symbols(expect_pair(pairs, span)?);
    let next_state = parse_next_state(expect_pair(pairs, span)?)?;
    let write = parse_symbols(expect_pair(pairs, span)?);
    let directions = parse_directions(expect_pair(pairs, span)?)?;

    Ok(ParsedRule {
        state,
        read,
        transition: Transition {
            next_state,
            write,
            directions,
        },
    })
}

/// Parses a live state number from a `Pair<Rule::state>`.
fn parse_state(pair: Pair<Rule>) -> Result<State, Error<Rule>> {
    pair.as_str()
        .parse::<u32>()
        .map(State::Live)
        .map_err(|_| {
            parse_error(
                &format!("State number out of range: q{}", pair.as_str()),
                pair.as_span(),
            )
        })
}

/// Parses a `Pair<Rule::next_state>`, which wraps either a state number or the halt marker.
fn parse_next_state(pair: Pair<Rule>) -> Result<State, Error<Rule>> {
    let span = pair.as_span();
    let inner = expect_pair(&mut pair.into_inner(), span)?;

    match inner.as_rule() {
        Rule::halt => Ok(State::Halt),
        _ => parse_state(inner),
    }
}

/// Parses a single character symbol.
fn parse_symbol(pair: Pair<Rule>) -> Symbol {
    // `symbol` is an atomic rule over exactly one character.
    pair.as_str().chars().next().unwrap_or_default()
}

/// Parses a list of symbols from a `Pair<Rule::symbols>`.
fn parse_symbols(pair: Pair<Rule>) -> Vec<Symbol> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(parse_symbol)
        .collect()
}

/// Parses a list of directions from a `Pair<Rule::directions>`.
fn parse_directions(pair: Pair<Rule>) -> Result<Vec<Direction>, Error<Rule>> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::direction)
        .map(parse_direction)
        .collect()
}

/// Parses a single direction: `L` for Left, `R` for Right and `E` for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, Error<Rule>> {
    match pair.as_str() {
        "L" => Ok(Direction::Left),
        "R" => Ok(Direction::Right),
        "E" => Ok(Direction::Stay),
        other => Err(parse_error(
            &format!("Unsupported direction: {other}"),
            pair.as_span(),
        )),
    }
}

/// Checks that every tuple of a parsed rule has one entry per tape.
fn check_tape_count(rule: &ParsedRule, expected: usize, line: usize) -> Result<(), TuringError> {
    [
        rule.read.len(),
        rule.transition.write.len(),
        rule.transition.directions.len(),
    ]
    .into_iter()
    .find(|&found| found != expected)
    .map_or(Ok(()), |found| {
        Err(TuringError::TapeCountMismatch {
            line,
            expected,
            found,
        })
    })
}

/// Takes the next pair, failing with an error over `span` if the grammar produced none.
fn expect_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span<'i>,
) -> Result<Pair<'i, Rule>, Error<Rule>> {
    pairs
        .next()
        .ok_or_else(|| parse_error("Incomplete transition rule", span))
}

/// Creates a pest custom error from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )
}
