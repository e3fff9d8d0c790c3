use std::fs;
use std::path::PathBuf;

use sheetdiff_io::{CsvSink, CsvSource, DEFAULT_DELIMITER};
use sheetdiff_recon::{BufferReporter, Diff, DiffInput, DiffOptions, DiffOutput, Outcome, Sheet};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn source(name: &str) -> CsvSource<std::io::Cursor<Vec<u8>>> {
    CsvSource::from_path(&fixtures_dir().join(name), DEFAULT_DELIMITER).unwrap()
}

// -------------------------------------------------------------------------
// Full run
// -------------------------------------------------------------------------

#[test]
fn diff_of_fixture_files() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("diff.csv");
    let options = DiffOptions {
        zero_matches_null: false,
        show_missing: true,
        ..DiffOptions::new("a")
    };

    let mut report = BufferReporter::default();
    let outcome = Diff::new(options)
        .run(
            DiffInput::new("dataA", source("dataA.csv")),
            DiffInput::new("dataB", source("dataB.csv")),
            DiffOutput::new("output data", || CsvSink::to_path(&out_path, DEFAULT_DELIMITER)),
            &mut report,
        )
        .unwrap();

    assert!(matches!(outcome, Outcome::Written(_)));
    assert_eq!(fs::read_to_string(&out_path).unwrap(), fixture("expected_diff.csv"));
    assert_eq!(report.info_text(), fixture("expected_report.txt"));
    assert!(report.errors.is_empty());
}

#[test]
fn parallel_run_writes_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("diff.csv");
    let options = DiffOptions {
        zero_matches_null: false,
        show_missing: true,
        parallel: true,
        ..DiffOptions::new("a")
    };

    Diff::new(options)
        .run(
            DiffInput::new("dataA", source("dataA.csv")),
            DiffInput::new("dataB", source("dataB.csv")),
            DiffOutput::new("output data", || CsvSink::to_path(&out_path, DEFAULT_DELIMITER)),
            &mut BufferReporter::default(),
        )
        .unwrap();

    assert_eq!(fs::read_to_string(&out_path).unwrap(), fixture("expected_diff.csv"));
}

#[test]
fn identical_files_leave_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("diff.csv");

    let mut report = BufferReporter::default();
    let outcome = Diff::new(DiffOptions::new("a"))
        .run(
            DiffInput::new("dataA", source("dataA.csv")),
            DiffInput::new("copy", source("dataA.csv")),
            DiffOutput::new("diff.csv", || CsvSink::to_path(&out_path, DEFAULT_DELIMITER)),
            &mut report,
        )
        .unwrap();

    assert_eq!(outcome, Outcome::Identical);
    assert!(!out_path.exists());
    assert_eq!(
        report.info.last().map(String::as_str),
        Some("The files are identical; no diff file written.")
    );
}

#[test]
fn unknown_id_column_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("diff.csv");

    let mut report = BufferReporter::default();
    let err = Diff::new(DiffOptions::new("nope"))
        .run(
            DiffInput::new("dataA", source("dataA.csv")),
            DiffInput::new("dataB", source("dataB.csv")),
            DiffOutput::new("diff.csv", || CsvSink::to_path(&out_path, DEFAULT_DELIMITER)),
            &mut report,
        )
        .unwrap_err();

    assert!(err.to_string().starts_with("dataA:"), "{err}");
    assert_eq!(report.errors, ["Failed to parse CSV data from dataA"]);
    assert!(!out_path.exists());
}

// -------------------------------------------------------------------------
// Parse / write round trip
// -------------------------------------------------------------------------

#[test]
fn parse_then_write_reproduces_input() {
    for name in ["dataA.csv", "dataB.csv"] {
        let id = "a";
        let sheet = Sheet::parse(id, source(name)).unwrap();

        let mut sink = CsvSink::from_writer(Vec::new(), DEFAULT_DELIMITER);
        sheet.write(&mut sink).unwrap();
        let written = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert_eq!(written, format!("{}\n", fixture(name)), "{name}");
    }
}

#[test]
fn diff_output_parses_back() {
    let expected = fixture("expected_diff.csv");
    let sheet = Sheet::parse("a", CsvSource::from_str(&expected, DEFAULT_DELIMITER)).unwrap();

    assert_eq!(sheet.headers(), ["a", "b", "c", "col X"]);
    assert!(sheet.contains("<<100"));
    assert_eq!(sheet.row("3").unwrap().value("col X"), Some("three, three<<>>three,three"));
    // Marker rows pad out to the full header on the way back in.
    assert_eq!(sheet.row(">>>>>>").unwrap().values(), [">>>>>>", "", "", ""]);
}
