use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::TuringError;
use serde::Serialize;

/// Source of a built-in table, embedded at compile time.
struct SampleSource {
    name: &'static str,
    description: &'static str,
    tape_count: usize,
    text: &'static str,
}

const SAMPLE_SOURCES: [SampleSource; 2] = [
    SampleSource {
        name: "even-a",
        description: "Erases a word over {a, b, c} and leaves 1 if it has an even number of a, else 0",
        tape_count: 1,
        text: include_str!("../tables/even-a.tur"),
    },
    SampleSource {
        name: "copy",
        description: "Copies a word over {a, b, c} from tape 0 onto tape 1 and rewinds both heads",
        tape_count: 2,
        text: include_str!("../tables/copy.tur"),
    },
];

/// A built-in transition table, parsed once and shared for the lifetime of the process.
#[derive(Debug)]
pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub table: TransitionTable,
}

lazy_static::lazy_static! {
    pub static ref SAMPLES: Vec<Sample> = SAMPLE_SOURCES
        .iter()
        .filter_map(|source| match parse(source.text, source.tape_count) {
            Ok(table) => Some(Sample {
                name: source.name,
                description: source.description,
                table,
            }),
            Err(e) => {
                log::error!("failed to parse sample {}: {}", source.name, e);
                None
            }
        })
        .collect();
}

pub struct SampleManager;

impl SampleManager {
    /// List all sample names
    pub fn list_sample_names() -> Vec<&'static str> {
        SAMPLES.iter().map(|sample| sample.name).collect()
    }

    /// Get a sample by its name
    pub fn get_sample(name: &str) -> Result<&'static Sample, TuringError> {
        SAMPLES
            .iter()
            .find(|sample| sample.name == name)
            .ok_or_else(|| TuringError::ValidationError(format!("Sample '{}' not found", name)))
    }

    /// Get the parsed table of a sample by its name
    pub fn get_sample_table(name: &str) -> Result<&'static TransitionTable, TuringError> {
        Self::get_sample(name).map(|sample| &sample.table)
    }

    /// Get information about a sample by its name
    pub fn get_sample_info(name: &str) -> Result<SampleInfo, TuringError> {
        let sample = Self::get_sample(name)?;

        Ok(SampleInfo {
            name: sample.name,
            description: sample.description,
            tape_count: sample.table.tape_count(),
            state_count: sample.table.states().len(),
            rule_count: sample.table.len(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub tape_count: usize,
    pub state_count: usize,
    pub rule_count: usize,
}
