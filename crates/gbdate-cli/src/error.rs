//! Error types for the gbdate CLI
//!
//! User-facing errors with messages that say what to check next.

use gbdate_common::GbDateError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Required input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// A FASTA header did not yield an accession
    #[error("Invalid FASTA header '{header}': {reason}. Check --header-delim and --accno-pos.")]
    InvalidHeader { header: String, reason: String },

    /// The FASTA file had no records
    #[error("No accessions found in '{0}'. Expected a FASTA file with '>' header lines.")]
    NoAccessions(String),

    /// Record parsing or normalization failed
    #[error("GenBank processing failed: {0}")]
    Core(#[from] GbDateError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request to Entrez failed
    #[error("Entrez request failed: {0}. Check your internet connection, API key and --eutils-url.")]
    Http(#[from] reqwest::Error),

    /// TSV output failed
    #[error("Failed to write TSV output: {0}")]
    Csv(#[from] csv::Error),

    /// JSON report output failed
    #[error("Failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or command-line flags.")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid FASTA header error
    pub fn invalid_header(header: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHeader {
            header: header.into(),
            reason: reason.into(),
        }
    }
}
