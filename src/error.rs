use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to read or write CSV table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed trace line {line} in '{path}': {reason}")]
    MalformedTrace { path: PathBuf, line: usize, reason: String },

    #[error("Trace contains no samples: {0}")]
    EmptyTrace(String),

    #[error("Invalid series for cell '{cell}': {reason}")]
    InvalidSeries { cell: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown link id: {0}")]
    UnknownLink(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
