//! Error types for gbdate

use thiserror::Error;

/// Result type alias for gbdate operations
pub type Result<T> = std::result::Result<T, GbDateError>;

/// Main error type for gbdate
#[derive(Error, Debug)]
pub enum GbDateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A `LOCUS` line without an identifier token. Aborts the parse.
    #[error("Malformed LOCUS header at line {line_number}: '{line}'")]
    MalformedHeader { line_number: usize, line: String },

    /// A resolved date matching none of the known formats. Reported per entry.
    #[error("Unrecognized date format for {accession}: '{raw}'")]
    UnrecognizedDateFormat { accession: String, raw: String },
}

impl GbDateError {
    /// Create a malformed header error
    pub fn malformed_header(line_number: usize, line: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line_number,
            line: line.into(),
        }
    }

    /// Create an unrecognized date format error
    pub fn unrecognized_date(accession: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::UnrecognizedDateFormat {
            accession: accession.into(),
            raw: raw.into(),
        }
    }

    /// Whether this error aborts a whole parse rather than a single entry
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnrecognizedDateFormat { .. })
    }
}
