use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSequenceError {
    #[error("Tree sequence input '{0}' does not exist")]
    InputNotFound(PathBuf),

    #[error("Tree sequence path '{0}' contains invalid UTF-8 characters")]
    InvalidPath(PathBuf),

    #[error("tskit failed to load the tree sequence")]
    Tskit(#[from] tskit::TskitError),

    #[error("Malformed tree sequence: {table} table, row {row}: {reason}")]
    Malformed{table: &'static str, row: usize, reason: String},

    #[error("Malformed tree sequence: {0}")]
    MalformedTables(String),

    #[error("Missing required table '{0}'")]
    MissingTable(PathBuf),

    #[error("Failed to read table '{0}'")]
    ReadTable(PathBuf, #[source] std::io::Error),

    #[error("{path}: line {line} - {err}")]
    ParseTable{path: PathBuf, line: usize, err: String},

    #[error("Invalid metadata for population {0}")]
    PopulationMetadata(usize, #[source] serde_json::Error),
}

impl TreeSequenceError {
    pub(crate) fn malformed(table: &'static str, row: usize, reason: impl Into<String>) -> Self {
        Self::Malformed{table, row, reason: reason.into()}
    }
}
