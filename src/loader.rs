//! This module provides the `TableLoader` struct, responsible for loading transition tables
//! from files.

use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::TuringError;
use std::fs;
use std::path::Path;

/// `TableLoader` is a utility struct for loading transition tables from `.tur` files.
pub struct TableLoader;

impl TableLoader {
    /// Loads a single transition table from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.tur` file to load.
    /// * `tape_count` - The number of tapes the table addresses.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is successfully read and parsed.
    /// * `Err(TuringError::FileError)` if the file cannot be read.
    /// * `Err(TuringError::ParseError)` if the file content is not a valid table.
    pub fn load_table(path: &Path, tape_count: usize) -> Result<TransitionTable, TuringError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        log::debug!("loading transition table from {}", path.display());
        parse(&content, tape_count)
    }
}
