//! Error types for csvdir-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the directory loader and the CSV parser
#[derive(Debug, Error)]
pub enum Error {
    /// The folder does not exist or is not a directory
    #[error("directory not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    /// The folder exists but holds no `.csv` entries
    #[error("no .csv files found in: '{}'", path.display())]
    InvalidInput { path: PathBuf },

    /// A matched file could not be parsed as CSV
    #[error("failed to read '{}': {source}", path.display())]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::ParseFailure { .. } => ErrorKind::ParseFailure,
        }
    }

    /// The path this error is about
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::NotFound { path } | Error::InvalidInput { path } => path,
            Error::ParseFailure { path, .. } => path,
        }
    }
}

/// Discriminant of [`Error`], for callers that branch on the category only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ParseFailure,
}

/// Underlying cause of a [`Error::ParseFailure`]
#[derive(Debug, Error)]
pub enum ParseError {
    /// Opening or reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the csv reader (malformed record, invalid UTF-8, read failure)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row
    #[error("no columns to parse")]
    NoColumns,

    /// A record has more fields than the header
    #[error("expected {expected} fields on line {line}, saw {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
}
