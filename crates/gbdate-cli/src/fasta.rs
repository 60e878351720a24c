//! Accession extraction from FASTA headers
//!
//! The record id is the first whitespace-delimited token after `>`. The
//! accession is field `position` of the id split on `delimiter`:
//!
//! ```text
//! >hCoV-19/Wuhan/WH01/2019|MN908947.3|2019-12-26 complete genome
//!                          ^ position 1 with delimiter '|'
//! ```

use crate::error::{CliError, Result};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Extract the accession from one header line (with or without the leading `>`)
pub fn accession_from_header(header: &str, delimiter: &str, position: usize) -> Result<String> {
    let id = header
        .trim_start_matches('>')
        .split_whitespace()
        .next()
        .ok_or_else(|| CliError::invalid_header(header, "empty header"))?;

    let fields: Vec<&str> = id.split(delimiter).collect();
    let accession = fields.get(position).ok_or_else(|| {
        CliError::invalid_header(
            header,
            format!(
                "position {} requested but the id has {} field(s)",
                position,
                fields.len()
            ),
        )
    })?;

    if accession.is_empty() {
        return Err(CliError::invalid_header(
            header,
            format!("field {} is empty", position),
        ));
    }

    Ok(accession.to_string())
}

/// Read accessions in file order, dropping duplicates
pub fn read_accessions<R: BufRead>(
    reader: R,
    delimiter: &str,
    position: usize,
) -> Result<Vec<String>> {
    if delimiter.is_empty() {
        return Err(CliError::config("header delimiter must not be empty"));
    }

    let mut accessions = IndexSet::new();
    for line in reader.lines() {
        let line = line?;
        if !line.starts_with('>') {
            continue;
        }

        let accession = accession_from_header(&line, delimiter, position)?;
        if !accessions.insert(accession.clone()) {
            debug!(accession = %accession, "Duplicate accession in FASTA, keeping first");
        }
    }

    Ok(accessions.into_iter().collect())
}

/// Read accessions from a FASTA file on disk
pub fn read_accessions_from_path(
    path: &Path,
    delimiter: &str,
    position: usize,
) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let accessions = read_accessions(BufReader::new(file), delimiter, position)?;

    if accessions.is_empty() {
        return Err(CliError::NoAccessions(path.display().to_string()));
    }

    Ok(accessions)
}
