//! `gbdate extract` command implementation
//!
//! Resolves collection dates from a local GenBank flat file.

use crate::commands::emit;
use crate::error::{CliError, Result};
use crate::OutputArgs;
use gbdate_core::{parse_reader, DateNormalizer};
use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::path::Path;
use tracing::info;

/// `input` of `-` reads standard input
pub async fn run(input: &Path, output: &OutputArgs) -> Result<()> {
    let raw = if input == Path::new("-") {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            info!("Reading GenBank records from standard input");
        }
        parse_reader(stdin.lock())?
    } else {
        if !input.exists() {
            return Err(CliError::FileNotFound(input.display().to_string()));
        }
        parse_reader(BufReader::new(File::open(input)?))?
    };

    info!(records = raw.len(), input = %input.display(), "Scanned GenBank records");

    let dates = DateNormalizer::new()?.normalize(&raw);
    emit(&dates, output, output.output.as_deref())
}
