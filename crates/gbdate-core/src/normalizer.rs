//! Collection-date normalization
//!
//! Turns the [`RawDateMap`] produced by the scanner into canonical date
//! strings. Raw collection dates are matched against an ordered list of
//! [`DatePattern`]s; the first matching pattern decides both how the text is
//! parsed and at which [`Granularity`] it is rendered.
//!
//! | Input          | Output       |
//! |----------------|--------------|
//! | `15-Mar-2021`  | `2021-03-15` |
//! | `Mar-2021`     | `2021-03`    |
//! | `2021`         | `2021`       |
//! | `2021-03-15`   | `2021-03-15` |
//! | `2021-03`      | `2021-03`    |
//!
//! Canonical strings are accepted as input, so normalizing twice is a no-op.

use crate::models::{
    CanonicalDate, DateOutcome, DateSummary, Granularity, InvalidDate, RawDate, RawDateMap,
};
use chrono::NaiveDate;
use gbdate_common::{GbDateError, Result};
use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, trace, warn};

/// One recognized collection-date layout
#[derive(Debug, Clone)]
pub struct DatePattern {
    name: &'static str,
    matcher: Regex,
    input_format: &'static str,
    granularity: Granularity,
}

impl DatePattern {
    /// `matcher` must accept the whole value; `input_format` is a chrono
    /// strftime string holding exactly the fields `granularity` implies.
    pub fn new(
        name: &'static str,
        matcher: &str,
        input_format: &'static str,
        granularity: Granularity,
    ) -> Result<Self> {
        Ok(Self {
            name,
            matcher: Regex::new(matcher)?,
            input_format,
            granularity,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.matcher.is_match(raw)
    }

    /// Parse `raw` into a calendar date, filling absent day/month with 1
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let (text, format) = match self.granularity {
            Granularity::Day => (raw.to_string(), self.input_format.to_string()),
            Granularity::Month => (format!("01-{raw}"), format!("%d-{}", self.input_format)),
            Granularity::Year => (
                format!("01-01-{raw}"),
                format!("%d-%m-{}", self.input_format),
            ),
        };
        NaiveDate::parse_from_str(&text, &format).ok()
    }
}

/// Default GenBank layouts, in matching order
pub fn default_patterns() -> Result<Vec<DatePattern>> {
    Ok(vec![
        DatePattern::new(
            "day-month-year",
            r"^\d{2}-[A-Za-z]+-\d{4}$",
            "%d-%b-%Y",
            Granularity::Day,
        )?,
        DatePattern::new("month-year", r"^[A-Za-z]+-\d{4}$", "%b-%Y", Granularity::Month)?,
        DatePattern::new("year", r"^\d{4}$", "%Y", Granularity::Year)?,
        DatePattern::new("iso-date", r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d", Granularity::Day)?,
        DatePattern::new("iso-month", r"^\d{4}-\d{2}$", "%Y-%m", Granularity::Month)?,
    ])
}

/// Ordered first-match date normalizer
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    patterns: Vec<DatePattern>,
}

impl DateNormalizer {
    /// Normalizer with the default GenBank layouts
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: default_patterns()?,
        })
    }

    /// Normalizer that recognizes nothing until patterns are added
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a pattern after the existing ones
    pub fn with_pattern(mut self, pattern: DatePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(&self) -> &[DatePattern] {
        &self.patterns
    }

    /// Normalize free text. Only the first matching pattern is tried.
    pub fn normalize_text(&self, raw: &str) -> Option<CanonicalDate> {
        let pattern = self.patterns.iter().find(|p| p.matches(raw))?;
        let Some(date) = pattern.parse(raw) else {
            debug!(raw, pattern = pattern.name(), "Date matched a pattern but does not exist");
            return None;
        };
        trace!(
            raw,
            pattern = pattern.name(),
            granularity = %pattern.granularity(),
            "Matched date pattern"
        );
        Some(CanonicalDate::new(date, pattern.granularity()))
    }

    /// Normalize one entry. `Ok(None)` means the record had no date at all.
    pub fn normalize_entry(&self, accession: &str, raw: &RawDate) -> Result<Option<CanonicalDate>> {
        match raw {
            RawDate::Empty => Ok(None),
            RawDate::ParsedFallback(date) => Ok(Some(CanonicalDate::new(*date, Granularity::Day))),
            RawDate::RawText(text) => self
                .normalize_text(text)
                .map(Some)
                .ok_or_else(|| GbDateError::unrecognized_date(accession, text.as_str())),
        }
    }

    /// Normalize a whole map. Failures stay attached to their accession.
    pub fn normalize(&self, raw: &RawDateMap) -> NormalizedDates {
        let mut entries = IndexMap::with_capacity(raw.len());

        for (accession, value) in raw {
            let outcome = match self.normalize_entry(accession, value) {
                Ok(Some(date)) => DateOutcome::Canonical { date },
                Ok(None) => DateOutcome::Missing,
                Err(e) => {
                    warn!(error = %e, "Collection date left unnormalized");
                    DateOutcome::Invalid {
                        raw: value.raw_text(),
                    }
                },
            };
            entries.insert(accession.clone(), outcome);
        }

        let dates = NormalizedDates { entries };
        debug!(summary = %dates.summary(), "Normalized collection dates");
        dates
    }
}

/// Accession -> normalization outcome, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDates {
    entries: IndexMap<String, DateOutcome>,
}

impl NormalizedDates {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, accession: &str) -> Option<&DateOutcome> {
        self.entries.get(accession)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DateOutcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose collection date matched no pattern
    pub fn invalid(&self) -> Vec<InvalidDate> {
        self.entries
            .iter()
            .filter_map(|(accession, outcome)| match outcome {
                DateOutcome::Invalid { raw } => Some(InvalidDate {
                    accession: accession.clone(),
                    raw: raw.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> DateSummary {
        self.entries.values().fold(
            DateSummary {
                records: self.entries.len(),
                ..DateSummary::default()
            },
            |mut summary, outcome| {
                match outcome {
                    DateOutcome::Canonical { .. } => summary.dated += 1,
                    DateOutcome::Missing => summary.missing += 1,
                    DateOutcome::Invalid { .. } => summary.invalid += 1,
                }
                summary
            },
        )
    }
}
