//! End-to-end runs of the command runners over transport files on disk.

#[path = "../../sas-xpt/tests/common/mod.rs"]
mod fixture;

use std::fs;
use std::path::{Path, PathBuf};

use sas_cli::commands::{run_columns, run_convert, run_info, run_test};
use sas_cli::input::{InputFormat, detect_format};
use sas_convert::{ConvertOptions, RowLimit};
use tempfile::TempDir;

use fixture::{Cell, Var, XptFixture};

fn write_fixture(dir: &TempDir, name: &str, fixture: &XptFixture) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, fixture.build()).expect("write fixture");
    path
}

fn visits() -> XptFixture {
    XptFixture::v5(
        "VS",
        vec![
            Var::text("USUBJID", 8).label("Subject"),
            Var::number("VSDT", "DATE").label("Visit Date"),
            Var::number("VSTM", "TIME"),
            Var::number("WEIGHT", ""),
        ],
    )
    .label("Vital Signs")
    .row(vec![
        Cell::Text("S-001"),
        Cell::Number(21_979.0),
        Cell::Number(30_600.0),
        Cell::Number(70.1 + 0.2),
    ])
    .row(vec![
        Cell::Text("S-002"),
        Cell::Missing(b'.'),
        Cell::Number(3661.0),
        Cell::Number(82.0),
    ])
    .row(vec![
        Cell::Text("S, 003"),
        Cell::Number(0.0),
        Cell::Number(0.0),
        Cell::Missing(b'A'),
    ])
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

#[test]
fn converts_transport_file_to_csv() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_fixture(&dir, "vs.xpt", &visits());
    let output = dir.path().join("vs.csv");

    let summary = run_convert(&input, Some(&output), &ConvertOptions::default()).expect("convert");
    assert_eq!(summary.table, "VS");
    assert_eq!(summary.rows_written, 3);

    insta::assert_snapshot!(read(&output).trim_end(), @r#"
    USUBJID,VSDT,VSTM,WEIGHT
    S-001,2020-03-05,08:30:00,70.3
    S-002,,01:01:01,82
    "S, 003",1960-01-01,00:00:00,
    "#);
}

#[test]
fn limit_and_delimiter_apply() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_fixture(&dir, "vs.xpt", &visits());
    let output = dir.path().join("vs.csv");
    let options = ConvertOptions::default()
        .with_row_limit(RowLimit::Rows(1))
        .with_delimiter(b';');

    let summary = run_convert(&input, Some(&output), &options).expect("convert");
    assert_eq!(summary.rows_written, 1);
    assert_eq!(
        read(&output),
        "USUBJID;VSDT;VSTM;WEIGHT\nS-001;2020-03-05;08:30:00;70.3\n"
    );
}

#[test]
fn lists_columns() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_fixture(&dir, "vs.xpt", &visits());
    let output = dir.path().join("columns.csv");

    let count = run_columns(&input, Some(&output), &ConvertOptions::default()).expect("columns");
    assert_eq!(count, 4);
    insta::assert_snapshot!(read(&output).trim_end(), @r"
    Id,Name,Label,Format,Type,Length
    1,USUBJID,Subject,,String,8
    2,VSDT,Visit Date,DATE,Number,8
    3,VSTM,,TIME,Number,8
    4,WEIGHT,,,Number,8
    ");
}

#[test]
fn reports_info_and_test() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_fixture(&dir, "vs.xpt", &visits());

    let info = run_info(&input).expect("info");
    assert_eq!(info.name, "VS");
    assert_eq!(info.label.as_deref(), Some("Vital Signs"));
    assert_eq!(info.row_count, 3);
    assert_eq!(info.column_count, 4);

    let report = run_test(&input).expect("test");
    assert_eq!(report.rows_read, 3);
    assert!(report.counts_match());
}

#[test]
fn out_of_calendar_date_fails_the_run() {
    // A DATE value beyond the calendar stays a float, which a DATE column cannot render
    let fixture = XptFixture::v5("BAD", vec![Var::number("D", "DATE")])
        .row(vec![Cell::Number(1e300)]);
    let dir = TempDir::new().expect("temp dir");
    let input = write_fixture(&dir, "bad.xpt", &fixture);
    let output = dir.path().join("bad.csv");

    let err = run_convert(&input, Some(&output), &ConvertOptions::default()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("convert"), "{message}");
    assert_eq!(read(&output), "D\n");
}

#[test]
fn rejects_sas7bdat_input() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("dm.sas7bdat");
    let mut bytes = vec![0u8; 12];
    bytes.extend_from_slice(&[
        0xc2, 0xea, 0x81, 0x60, 0xb3, 0x14, 0x11, 0xcf, 0xbd, 0x92, 0x08, 0x00, 0x09, 0xc7, 0x31,
        0x8c, 0x18, 0x1f, 0x10, 0x11,
    ]);
    bytes.resize(1024, 0);
    fs::write(&path, bytes).expect("write");

    assert_eq!(detect_format(&path).expect("detect"), InputFormat::Sas7bdat);
    let err = run_info(&path).unwrap_err();
    assert!(format!("{err:#}").contains("SAS7BDAT"));
}

#[test]
fn rejects_unknown_input() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("notes.txt");
    fs::write(&path, "Name,Age\nAnn,41\n").expect("write");

    assert_eq!(detect_format(&path).expect("detect"), InputFormat::Unknown);
    assert!(run_test(&path).is_err());
}

#[test]
fn missing_input_is_an_error() {
    let err = run_info(Path::new("/nonexistent/vs.xpt")).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/vs.xpt"));
}
