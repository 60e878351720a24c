//! gbdate Core Library
//!
//! Collection-date extraction from GenBank flat files.
//!
//! - [`parser`]: single-pass scanner resolving one raw date per `LOCUS` block
//!   (first `/collection_date`, else the earliest `JOURNAL   Submitted` date)
//! - [`normalizer`]: converts raw dates to `YYYY-MM-DD`, `YYYY-MM` or `YYYY`
//!
//! # Example
//!
//! ```no_run
//! use gbdate_core::{parse_lines, DateNormalizer};
//!
//! fn main() -> gbdate_common::Result<()> {
//!     let text = std::fs::read_to_string("records.gb")?;
//!     let raw = parse_lines(text.lines())?;
//!     let dates = DateNormalizer::new()?.normalize(&raw);
//!     for (accession, outcome) in dates.iter() {
//!         tracing::info!(accession, ?outcome, "Resolved");
//!     }
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod models;
pub mod normalizer;
pub mod parser;

// Re-export commonly used types
pub use models::{
    CanonicalDate, DateOutcome, DateSummary, Granularity, InvalidDate, RawDate, RawDateMap,
};
pub use normalizer::{DateNormalizer, DatePattern, NormalizedDates};
pub use parser::{feed_async_reader, parse_async_reader, parse_lines, parse_reader, RecordScanner};
