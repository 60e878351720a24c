// Data models for collection-date extraction

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved date of one record, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawDate {
    /// Neither a collection date nor a submission date was found
    #[default]
    Empty,
    /// Verbatim `/collection_date` qualifier value
    RawText(String),
    /// Earliest `JOURNAL   Submitted (...)` date
    ParsedFallback(NaiveDate),
}

impl RawDate {
    pub fn is_empty(&self) -> bool {
        matches!(self, RawDate::Empty)
    }

    /// Text as it appeared in the record ("" for `Empty`)
    pub fn raw_text(&self) -> String {
        match self {
            RawDate::Empty => String::new(),
            RawDate::RawText(text) => text.clone(),
            RawDate::ParsedFallback(date) => date.format("%d-%b-%Y").to_string().to_uppercase(),
        }
    }
}

/// Accession -> raw date, in order of first appearance in the stream
pub type RawDateMap = IndexMap<String, RawDate>;

/// Precision of a canonical date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// strftime format of the canonical string
    pub fn output_format(&self) -> &'static str {
        match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A date rendered as `YYYY-MM-DD`, `YYYY-MM` or `YYYY`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalDate {
    value: String,
    granularity: Granularity,
}

impl CanonicalDate {
    pub fn new(date: NaiveDate, granularity: Granularity) -> Self {
        Self {
            value: date.format(granularity.output_format()).to_string(),
            granularity,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Normalization result for one accession
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DateOutcome {
    Canonical { date: CanonicalDate },
    /// No date of any kind in the record
    Missing,
    /// A collection date in none of the recognized formats
    Invalid { raw: String },
}

impl DateOutcome {
    pub fn canonical(&self) -> Option<&CanonicalDate> {
        match self {
            DateOutcome::Canonical { date } => Some(date),
            _ => None,
        }
    }
}

/// An accession whose date could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidDate {
    pub accession: String,
    pub raw: String,
}

/// Counts over a normalized batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSummary {
    pub records: usize,
    pub dated: usize,
    pub missing: usize,
    pub invalid: usize,
}

impl fmt::Display for DateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} dated, {} missing, {} invalid",
            self.records, self.dated, self.missing, self.invalid
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_formats() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        assert_eq!(CanonicalDate::new(date, Granularity::Day).as_str(), "2021-03-15");
        assert_eq!(CanonicalDate::new(date, Granularity::Month).as_str(), "2021-03");
        assert_eq!(CanonicalDate::new(date, Granularity::Year).as_str(), "2021");
    }

    #[test]
    fn test_granularity_names() {
        assert_eq!(Granularity::Day.to_string(), "day");
        assert_eq!(Granularity::Month.as_str(), "month");
        assert_eq!(
            serde_json::to_value(Granularity::Year).unwrap(),
            serde_json::json!(Granularity::Year.as_str())
        );
    }

    #[test]
    fn test_raw_text() {
        assert_eq!(RawDate::Empty.raw_text(), "");
        assert_eq!(RawDate::RawText("Mar-2021".into()).raw_text(), "Mar-2021");

        let date = NaiveDate::from_ymd_opt(2019, 11, 5).unwrap();
        assert_eq!(RawDate::ParsedFallback(date).raw_text(), "05-NOV-2019");
    }

    #[test]
    fn test_raw_date_serde_tagging() {
        let value = serde_json::to_value(RawDate::RawText("2018".into())).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "raw_text", "value": "2018"}));

        let value = serde_json::to_value(RawDate::Empty).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "empty"}));
    }

    #[test]
    fn test_summary_display() {
        let summary = DateSummary {
            records: 3,
            dated: 1,
            missing: 1,
            invalid: 1,
        };
        assert_eq!(summary.to_string(), "3 records: 1 dated, 1 missing, 1 invalid");
    }
}
