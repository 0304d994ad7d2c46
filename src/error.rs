use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table {table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Table {table} row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: column '{column}' value '{value}' is not a YYYY-MM-DD date: {source}")]
    DateParse {
        row: usize,
        column: String,
        value: String,
        #[source]
        source: crate::pipeline::recency::SubmissionDateError,
    },
}

pub type Result<T> = std::result::Result<T, CurateError>;
