//! gbdate CLI Library
//!
//! Resolve one collection date per GenBank accession.
//!
//! - **fetch**: read accessions from a FASTA file, download their GenBank
//!   records from NCBI Entrez and write `<fasta>_dates.tsv`
//! - **extract**: same resolution over a local GenBank flat file

pub mod commands;
pub mod config;
pub mod entrez;
pub mod error;
pub mod fasta;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};
pub use output::InvalidPolicy;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gbdate - GenBank collection date extractor
#[derive(Parser, Debug)]
#[command(name = "gbdate")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch collection dates from NCBI for the accessions in a FASTA file
    Fetch(FetchArgs),

    /// Extract collection dates from a local GenBank flat file
    Extract {
        /// GenBank file ("-" for standard input)
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Input FASTA file for which dates should be retrieved
    pub fasta: PathBuf,

    /// Delimiter used in the FASTA header id
    #[arg(short = 'd', long, default_value = "|")]
    pub header_delim: String,

    /// Zero-indexed position of the accession number in the FASTA header id
    #[arg(short = 'p', long, default_value_t = 0)]
    pub accno_pos: usize,

    /// Directory for the default `<fasta>_dates.tsv` output
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub entrez: EntrezArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output TSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to write for dates in an unrecognized format
    #[arg(long, value_enum, default_value_t = InvalidPolicy::Empty)]
    pub invalid: InvalidPolicy,

    /// Also write unrecognized dates to this JSON file
    #[arg(long)]
    pub invalid_report: Option<PathBuf>,
}

/// Entrez overrides; unset flags fall back to the environment
#[derive(Args, Debug, Clone, Default)]
pub struct EntrezArgs {
    /// E-utilities base URL [env: GBDATE_EUTILS_URL]
    #[arg(long)]
    pub eutils_url: Option<String>,

    /// NCBI API key [env: NCBI_API_KEY]
    #[arg(long)]
    pub api_key: Option<String>,

    /// Contact e-mail sent to NCBI [env: NCBI_EMAIL]
    #[arg(long)]
    pub email: Option<String>,

    /// Accessions per efetch request [env: GBDATE_BATCH_SIZE]
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl EntrezArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.eutils_url {
            config = config.with_eutils_url(url.clone());
        }
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(email) = &self.email {
            config = config.with_email(email.clone());
        }
        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        config
    }
}
