// Collection-date extraction tests over a multi-record GenBank file

use gbdate_core::{parse_lines, parse_reader, DateNormalizer, DateOutcome, RawDate};
use std::fs;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/records.gb")
}

fn canonical(outcome: Option<&DateOutcome>) -> Option<&str> {
    outcome.and_then(DateOutcome::canonical).map(|d| d.as_str())
}

#[test]
fn test_parse_sample_records() {
    let file = fs::File::open(fixture_path()).expect("Failed to open sample file");
    let raw = parse_reader(std::io::BufReader::new(file)).expect("Failed to parse sample file");

    let accessions: Vec<&str> = raw.keys().map(String::as_str).collect();
    assert_eq!(
        accessions,
        vec!["MN908947", "OQ291490", "KX369547", "AF086833", "MT019529"]
    );

    assert_eq!(raw["MN908947"], RawDate::RawText("Dec-2019".to_string()));
    assert_eq!(raw["KX369547"], RawDate::RawText("missing".to_string()));
    assert_eq!(raw["AF086833"], RawDate::Empty);
    assert_eq!(raw["MT019529"], RawDate::RawText("23-Dec-2019".to_string()));
}

#[test]
fn test_normalize_sample_records() {
    let data = fs::read_to_string(fixture_path()).expect("Failed to read sample file");
    let raw = parse_lines(data.lines()).expect("Failed to parse");
    let dates = DateNormalizer::new().expect("default patterns").normalize(&raw);

    assert_eq!(dates.len(), 5);

    // collection date wins over submission dates
    assert_eq!(canonical(dates.get("MN908947")), Some("2019-12"));
    // earliest of three submissions, not the first listed
    assert_eq!(canonical(dates.get("OQ291490")), Some("2022-11-15"));
    assert_eq!(
        dates.get("KX369547"),
        Some(&DateOutcome::Invalid {
            raw: "missing".to_string()
        })
    );
    assert_eq!(dates.get("AF086833"), Some(&DateOutcome::Missing));
    assert_eq!(canonical(dates.get("MT019529")), Some("2019-12-23"));

    let summary = dates.summary();
    assert_eq!(summary.records, 5);
    assert_eq!(summary.dated, 3);
    assert_eq!(summary.missing, 1);
    assert_eq!(summary.invalid, 1);
}

#[test]
fn test_fallback_minimum_regardless_of_order() {
    let raw = parse_lines([
        "LOCUS       ZZ000001  100 bp",
        "  JOURNAL   Submitted (01-MAR-2020) Lab A",
        "  JOURNAL   Submitted (05-NOV-2019) Lab B",
        "  JOURNAL   Submitted (10-JAN-2020) Lab C",
    ])
    .expect("Failed to parse");
    let dates = DateNormalizer::new().expect("default patterns").normalize(&raw);

    assert_eq!(canonical(dates.get("ZZ000001")), Some("2019-11-05"));
}

#[test]
fn test_primary_precedence() {
    let raw = parse_lines([
        "LOCUS       ZZ000001  100 bp",
        "  JOURNAL   Submitted (05-NOV-2017) Lab B",
        "                     /collection_date=\"2018-06\"",
        "  JOURNAL   Submitted (01-MAR-2016) Lab A",
    ])
    .expect("Failed to parse");
    let dates = DateNormalizer::new().expect("default patterns").normalize(&raw);

    assert_eq!(canonical(dates.get("ZZ000001")), Some("2018-06"));
}

#[test]
fn test_end_of_stream_flush() {
    // no trailing "//" and no following LOCUS
    let raw = parse_lines([
        "LOCUS       ZZ000001  100 bp",
        "/collection_date=\"2001\"",
        "LOCUS       ZZ000002  100 bp",
        "  JOURNAL   Submitted (29-FEB-2020) Lab",
    ])
    .expect("Failed to parse");

    let dates = DateNormalizer::new().expect("default patterns").normalize(&raw);
    assert_eq!(canonical(dates.get("ZZ000001")), Some("2001"));
    assert_eq!(canonical(dates.get("ZZ000002")), Some("2020-02-29"));
}

#[test]
fn test_invalid_entry_does_not_abort_batch() {
    let raw = parse_lines([
        "LOCUS       ZZ000001  100 bp",
        "/collection_date=\"not-a-date\"",
        "LOCUS       ZZ000002  100 bp",
        "/collection_date=\"15-Mar-2021\"",
    ])
    .expect("Failed to parse");
    let dates = DateNormalizer::new().expect("default patterns").normalize(&raw);

    let invalid = dates.invalid();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].accession, "ZZ000001");
    assert_eq!(invalid[0].raw, "not-a-date");
    assert_eq!(canonical(dates.get("ZZ000002")), Some("2021-03-15"));
}

#[test]
fn test_malformed_header_aborts_parse() {
    let data = fs::read_to_string(fixture_path()).expect("Failed to read sample file");
    let corrupted = format!("{data}LOCUS\n");

    let err = parse_lines(corrupted.lines()).expect_err("corrupt header must fail");
    assert!(err.is_fatal());
    assert!(err.to_string().contains("Malformed LOCUS header"));
}
