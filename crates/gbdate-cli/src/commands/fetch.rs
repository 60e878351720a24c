//! `gbdate fetch` command implementation
//!
//! FASTA accessions -> Entrez efetch -> collection dates TSV.

use crate::commands::emit;
use crate::config::Config;
use crate::entrez::{unreturned_accessions, EntrezClient};
use crate::error::Result;
use crate::fasta;
use crate::output::default_output_path;
use crate::FetchArgs;
use gbdate_core::DateNormalizer;
use tracing::{info, warn};

pub async fn run(args: &FetchArgs, config: Config) -> Result<()> {
    let accessions =
        fasta::read_accessions_from_path(&args.fasta, &args.header_delim, args.accno_pos)?;
    info!(
        count = accessions.len(),
        fasta = %args.fasta.display(),
        "Read accessions"
    );

    let client = EntrezClient::new(config)?;
    let raw = client.fetch_raw_dates(&accessions).await?;

    let missing = unreturned_accessions(&accessions, &raw);
    if !missing.is_empty() {
        warn!(
            count = missing.len(),
            accessions = ?missing,
            "Entrez returned no record for some accessions"
        );
    }

    let dates = DateNormalizer::new()?.normalize(&raw);

    let path = args
        .output
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.fasta, args.output_dir.as_deref()));

    emit(&dates, &args.output, Some(&path))
}
