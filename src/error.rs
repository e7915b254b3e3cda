// ⚠️ Error taxonomy
// Structural row errors and I/O failures. Non-fatal findings live in
// entry::Diagnostic instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("line {line}: invalid date '{value}' (expected DD/MM/YYYY)")]
    DateFormat { line: u64, value: String },

    #[error("line {line}: malformed row, expected at least {expected} columns but found {columns}")]
    MalformedRow {
        line: u64,
        columns: usize,
        expected: usize,
    },

    #[error("line {line}: {field} '{value}' is not a number")]
    InvalidCoordinate {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown report entry type '{value}'")]
    UnrecognizedType { line: u64, value: String },

    #[error("invalid map location '{0}' (expected \"lat,lon\")")]
    InvalidLocation(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode map data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
