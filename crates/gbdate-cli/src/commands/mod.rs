//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod extract;
pub mod fetch;

use crate::error::Result;
use crate::output;
use crate::OutputArgs;
use gbdate_core::NormalizedDates;
use std::path::Path;
use tracing::{info, warn};

/// Write the table (to `path`, or stdout when `None`) and the optional invalid report
pub(crate) fn emit(dates: &NormalizedDates, args: &OutputArgs, path: Option<&Path>) -> Result<()> {
    for invalid in dates.invalid() {
        warn!(
            accession = %invalid.accession,
            raw = %invalid.raw,
            policy = ?args.invalid,
            "Collection date in an unrecognized format"
        );
    }

    match path {
        Some(path) => output::write_tsv_file(path, dates, args.invalid)?,
        None => output::write_tsv(std::io::stdout().lock(), dates, args.invalid)?,
    }

    if let Some(report) = args.invalid_report.as_deref() {
        output::write_invalid_report(report, dates)?;
    }

    info!(summary = %dates.summary(), "Done");
    Ok(())
}
