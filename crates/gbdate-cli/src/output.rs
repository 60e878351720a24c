//! TSV and JSON report writers

use crate::error::Result;
use clap::ValueEnum;
use gbdate_core::{DateOutcome, DateSummary, InvalidDate, NormalizedDates};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Column headers of the output table
pub const TSV_HEADER: [&str; 2] = ["accno", "date"];

/// How to write a collection date that matched no known format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Leave the date column empty
    #[default]
    Empty,
    /// Write the unnormalized value
    Raw,
}

impl InvalidPolicy {
    /// Date column value for one outcome
    pub fn render<'a>(&self, outcome: &'a DateOutcome) -> &'a str {
        match outcome {
            DateOutcome::Canonical { date } => date.as_str(),
            DateOutcome::Missing => "",
            DateOutcome::Invalid { raw } => match self {
                InvalidPolicy::Empty => "",
                InvalidPolicy::Raw => raw.as_str(),
            },
        }
    }
}

/// `<fasta name up to the first '.'>_dates.tsv`, inside `dir` when given
pub fn default_output_path(fasta: &Path, dir: Option<&Path>) -> PathBuf {
    let name = fasta
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    let file_name = format!("{stem}_dates.tsv");

    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write one `accno<TAB>date` row per accession, with a header row
pub fn write_tsv<W: Write>(
    writer: W,
    dates: &NormalizedDates,
    policy: InvalidPolicy,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    wtr.write_record(TSV_HEADER)?;
    for (accession, outcome) in dates.iter() {
        wtr.write_record([accession, policy.render(outcome)])?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn write_tsv_file(path: &Path, dates: &NormalizedDates, policy: InvalidPolicy) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    write_tsv(BufWriter::new(file), dates, policy)?;

    info!(path = %path.display(), rows = dates.len(), "Wrote collection dates");
    Ok(())
}

#[derive(Debug, Serialize)]
struct InvalidReport {
    summary: DateSummary,
    invalid: Vec<InvalidDate>,
}

/// Write the unnormalizable entries and batch counts as pretty JSON
pub fn write_invalid_report(path: &Path, dates: &NormalizedDates) -> Result<()> {
    let report = InvalidReport {
        summary: dates.summary(),
        invalid: dates.invalid(),
    };

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writer.flush()?;

    info!(path = %path.display(), invalid = report.invalid.len(), "Wrote invalid date report");
    Ok(())
}
