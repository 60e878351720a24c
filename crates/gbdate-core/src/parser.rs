// GenBank collection-date scanner
//
// Single pass over concatenated GenBank flat-file records. Only three line
// classes matter:
//
//   LOCUS       MN908947   29903 bp    ss-RNA     linear   VRL 18-MAR-2020
//   JOURNAL   Submitted (05-JAN-2020) Shanghai Public Health Clinical Center
//                        /collection_date="Dec-2019"
//
// Format documentation: https://www.ncbi.nlm.nih.gov/Sitemap/samplerecord.html

use crate::models::{RawDate, RawDateMap};
use chrono::NaiveDate;
use gbdate_common::{GbDateError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::io::BufRead;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, trace, warn};

/// Start of a record block
pub const LOCUS_MARKER: &str = "LOCUS";

/// Journal line carrying the direct-submission date
pub const SUBMITTED_MARKER: &str = "JOURNAL   Submitted";

/// Source feature qualifier carrying the collection date
pub const COLLECTION_DATE_MARKER: &str = "/collection_date";

/// Format of the date inside `Submitted (...)`
pub const SUBMISSION_DATE_FORMAT: &str = "%d-%b-%Y";

/// Characters stripped from both ends of a line before classification
const TRIM_SET: [char; 2] = ['\n', ' '];

/// The line classes the scanner reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Header,
    Submission,
    CollectionDate,
    Other,
}

impl LineClass {
    /// Classify an already trimmed line
    pub fn of(line: &str) -> Self {
        if line.starts_with(LOCUS_MARKER) {
            LineClass::Header
        } else if line.starts_with(SUBMITTED_MARKER) {
            LineClass::Submission
        } else if line.starts_with(COLLECTION_DATE_MARKER) {
            LineClass::CollectionDate
        } else {
            LineClass::Other
        }
    }
}

/// Date candidates of the record currently being scanned
#[derive(Debug)]
struct RecordAccumulator {
    accession: String,
    primary: Option<String>,
    fallback: Option<NaiveDate>,
}

impl RecordAccumulator {
    fn new(accession: String) -> Self {
        Self {
            accession,
            primary: None,
            fallback: None,
        }
    }

    /// Keep the earliest submission date
    fn offer_submission(&mut self, date: NaiveDate) {
        self.fallback = Some(match self.fallback {
            Some(current) => current.min(date),
            None => date,
        });
    }

    /// First non-empty collection date wins. Returns whether it was taken.
    fn offer_collection_date(&mut self, value: &str) -> bool {
        if self.primary.is_some() || value.is_empty() {
            return false;
        }
        self.primary = Some(value.to_string());
        true
    }

    fn finalize(self) -> (String, RawDate) {
        let resolved = match (self.primary, self.fallback) {
            (Some(text), _) => RawDate::RawText(text),
            (None, Some(date)) => RawDate::ParsedFallback(date),
            (None, None) => RawDate::Empty,
        };
        (self.accession, resolved)
    }
}

/// Incremental record scanner
///
/// Feed lines with [`RecordScanner::push_line`] as they arrive, then call
/// [`RecordScanner::finish`] to flush the last record and take the map.
/// Every accession seen in a `LOCUS` line gets exactly one entry.
pub struct RecordScanner {
    locus_pattern: Regex,
    submitted_pattern: Regex,
    quoted_pattern: Regex,
    current: Option<RecordAccumulator>,
    dates: RawDateMap,
    line_number: usize,
}

impl RecordScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            locus_pattern: Regex::new(r"^LOCUS\s+(\S+)")?,
            submitted_pattern: Regex::new(r"Submitted \(([^)]*)\)")?,
            quoted_pattern: Regex::new(r#"="(.*)""#)?,
            current: None,
            dates: RawDateMap::new(),
            line_number: 0,
        })
    }

    /// Number of record blocks started so far
    pub fn records_seen(&self) -> usize {
        self.dates.len()
    }

    /// Process one line. Only a malformed `LOCUS` header is an error.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let line = line.trim_matches(&TRIM_SET[..]);

        match LineClass::of(line) {
            LineClass::Header => self.start_record(line)?,
            LineClass::Submission => self.record_submission(line),
            LineClass::CollectionDate => self.record_collection_date(line),
            LineClass::Other => {},
        }

        Ok(())
    }

    /// Flush the last record and return the accession -> raw date map
    pub fn finish(mut self) -> RawDateMap {
        self.finalize_current();
        debug!(
            records = self.dates.len(),
            lines = self.line_number,
            "Finished scanning record stream"
        );
        self.dates
    }

    fn finalize_current(&mut self) {
        if let Some(record) = self.current.take() {
            let (accession, resolved) = record.finalize();
            trace!(accession = %accession, resolved = ?resolved, "Finalized record");
            self.dates.insert(accession, resolved);
        }
    }

    fn start_record(&mut self, line: &str) -> Result<()> {
        let accession = self
            .locus_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| GbDateError::malformed_header(self.line_number, line))?;

        self.finalize_current();

        if self.dates.contains_key(&accession) {
            warn!(
                accession = %accession,
                line = self.line_number,
                "Accession appears more than once, restarting its entry"
            );
        }

        // insert() on an existing key keeps its original position
        self.dates.insert(accession.clone(), RawDate::Empty);
        self.current = Some(RecordAccumulator::new(accession));
        Ok(())
    }

    fn record_submission(&mut self, line: &str) {
        let Some(record) = self.current.as_mut() else {
            warn!(line = self.line_number, "Submission date outside of any record, ignoring");
            return;
        };

        let Some(text) = self
            .submitted_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
        else {
            warn!(
                accession = %record.accession,
                line = self.line_number,
                "Submission line without a parenthesized date"
            );
            return;
        };

        match NaiveDate::parse_from_str(text, SUBMISSION_DATE_FORMAT) {
            Ok(date) => record.offer_submission(date),
            Err(e) => warn!(
                accession = %record.accession,
                line = self.line_number,
                raw = %text,
                error = %e,
                "Unparseable submission date, ignoring"
            ),
        }
    }

    fn record_collection_date(&mut self, line: &str) {
        let Some(record) = self.current.as_mut() else {
            warn!(line = self.line_number, "Collection date outside of any record, ignoring");
            return;
        };

        let Some(value) = self
            .quoted_pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            warn!(
                accession = %record.accession,
                line = self.line_number,
                "Collection date qualifier without a quoted value"
            );
            return;
        };

        if !record.offer_collection_date(value) {
            debug!(
                accession = %record.accession,
                line = self.line_number,
                value = %value,
                "Ignoring additional or empty collection date"
            );
        }
    }
}

/// Scan an in-memory or lazily produced sequence of lines
pub fn parse_lines<I, S>(lines: I) -> Result<RawDateMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = RecordScanner::new()?;
    for line in lines {
        scanner.push_line(line.as_ref())?;
    }
    Ok(scanner.finish())
}

/// Decode one raw line without its terminator.
///
/// Invalid UTF-8 is replaced rather than rejected: free-text lines such as
/// author names may carry Latin-1 bytes and are only ever classified.
fn decode_line(buf: &[u8]) -> Cow<'_, str> {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

/// Scan a buffered reader line by line
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<RawDateMap> {
    let mut scanner = RecordScanner::new()?;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        scanner.push_line(&decode_line(&buf))?;
    }
    Ok(scanner.finish())
}

/// Scan an async buffered reader, for example a streaming HTTP body
pub async fn parse_async_reader<R>(reader: R) -> Result<RawDateMap>
where
    R: AsyncBufRead + Unpin,
{
    let mut scanner = RecordScanner::new()?;
    feed_async_reader(&mut scanner, reader).await?;
    Ok(scanner.finish())
}

/// Push every line of `reader` into an existing scanner.
///
/// Lets several bodies (e.g. batched downloads) form one record stream.
pub async fn feed_async_reader<R>(scanner: &mut RecordScanner, mut reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        scanner.push_line(&decode_line(&buf))?;
    }
    Ok(())
}
