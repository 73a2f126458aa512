//! End-to-end conversion tests over in-memory tables.

use std::io;

use chrono::NaiveDate;
use sas_convert::{
    ConvertError, CsvSink, RenderError, RowLimit, RowSink, convert, list_columns, table_info,
    test_rows,
};
use sas_model::{CellValue, Column, MemorySource, Row, TableProperties};

fn csv_of(source: MemorySource, limit: RowLimit) -> (String, sas_convert::Result<u64>) {
    let mut sink = CsvSink::new(Vec::new());
    let result = convert(source, &mut sink, limit).map(|summary| summary.rows_written);
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    (text, result)
}

fn counter_rows(count: i64) -> Vec<Row> {
    (1..=count)
        .map(|n| vec![Some(CellValue::Integer(n))])
        .collect()
}

/// Sink that records rows and how often it was flushed.
#[derive(Default)]
struct RecordingSink {
    rows: Vec<Vec<String>>,
    flushes: usize,
}

impl RowSink for RecordingSink {
    fn write_row(&mut self, fields: &[String]) -> io::Result<()> {
        self.rows.push(fields.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn converts_name_and_age_table() {
    let source = MemorySource::new(
        "PEOPLE",
        vec![Column::string(1, "Name", 10), Column::number(2, "Age")],
        vec![
            vec![Some(CellValue::text("Alice")), Some(CellValue::Integer(34))],
            vec![Some(CellValue::text("Bob")), None],
            vec![Some(CellValue::text("Carol")), Some(CellValue::Float(27.5))],
        ],
    );

    let (csv, result) = csv_of(source, RowLimit::Unlimited);

    assert_eq!(result.unwrap(), 3);
    assert_eq!(csv, "Name,Age\nAlice,34\nBob,\nCarol,27.5\n");
}

#[test]
fn renders_every_format_mask() {
    let ts = NaiveDate::from_ymd_opt(2020, 3, 5)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let source = MemorySource::new(
        "LB",
        vec![
            Column::string(1, "USUBJID", 12).with_format("DATE"),
            Column::number(2, "LBDT").with_format("DATE"),
            Column::number(3, "LBDTM").with_format("DATETIME"),
            Column::number(4, "LBTM").with_format("TIME"),
            Column::number(5, "LBSTRESN").with_format("BEST"),
        ],
        vec![vec![
            Some(CellValue::text("01-701-1015")),
            Some(CellValue::Timestamp(ts)),
            Some(CellValue::Timestamp(ts)),
            Some(CellValue::Integer(3661)),
            Some(CellValue::Float(0.1 + 0.2)),
        ]],
    );

    let (csv, result) = csv_of(source, RowLimit::Unlimited);

    result.unwrap();
    insta::assert_snapshot!(csv.trim_end(), @r"
    USUBJID,LBDT,LBDTM,LBTM,LBSTRESN
    01-701-1015,2020-03-05,2020-03-05 00:00:00,01:01:01,0.3
    ");
}

#[test]
fn row_limit_stops_pulling_rows() {
    let mut source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(10));
    let mut sink = RecordingSink::default();

    let summary = convert(&mut source, &mut sink, RowLimit::Rows(3)).unwrap();

    assert_eq!(summary.rows_written, 3);
    assert_eq!(sink.rows.len(), 4);
    assert_eq!(sink.rows[0], vec!["N".to_string()]);
    assert_eq!(sink.rows[3], vec!["3".to_string()]);
    assert_eq!(source.rows_pulled(), 3);
    assert_eq!(sink.flushes, 1);
}

#[test]
fn zero_limit_writes_header_only() {
    let source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(5));
    let (csv, result) = csv_of(source, RowLimit::Rows(0));
    assert_eq!(result.unwrap(), 0);
    assert_eq!(csv, "N\n");
}

#[test]
fn limit_above_row_count_emits_everything() {
    let source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(2));
    let (csv, result) = csv_of(source, RowLimit::Rows(100));
    assert_eq!(result.unwrap(), 2);
    assert_eq!(csv, "N\n1\n2\n");
}

#[test]
fn short_row_fails_before_it_is_emitted() {
    let source = MemorySource::new(
        "T",
        vec![Column::string(1, "A", 1), Column::string(2, "B", 1)],
        vec![
            vec![Some(CellValue::text("a")), Some(CellValue::text("b"))],
            vec![Some(CellValue::text("c"))],
            vec![Some(CellValue::text("d")), Some(CellValue::text("e"))],
        ],
    );
    let mut sink = RecordingSink::default();

    let err = convert(source, &mut sink, RowLimit::Unlimited).unwrap_err();

    assert!(matches!(
        err,
        ConvertError::RowLength {
            row: 2,
            expected: 2,
            actual: 1
        }
    ));
    assert_eq!(sink.rows.len(), 2);
    assert_eq!(sink.flushes, 1);
}

#[test]
fn render_error_aborts_the_run() {
    let source = MemorySource::new(
        "T",
        vec![Column::number(1, "VISTM").with_format("TIME")],
        vec![
            vec![Some(CellValue::Integer(60))],
            vec![Some(CellValue::Float(60.5))],
        ],
    );

    let (csv, result) = csv_of(source, RowLimit::Unlimited);

    match result.unwrap_err() {
        ConvertError::Render {
            row,
            column,
            source,
        } => {
            assert_eq!(row, 2);
            assert_eq!(column, "VISTM");
            assert!(matches!(source, RenderError::ShapeMismatch { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(csv, "VISTM\n00:01:00\n");
}

#[test]
fn source_error_is_propagated() {
    let source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(3))
        .failing_at(1, "corrupt page");

    let (csv, result) = csv_of(source, RowLimit::Unlimited);

    let err = result.unwrap_err();
    assert!(matches!(err, ConvertError::Source(_)));
    assert_eq!(err.to_string(), "failed to read source");
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("row 1 failed to decode: corrupt page".to_string())
    );
    assert_eq!(csv, "N\n1\n");
}

#[test]
fn empty_table_writes_header() {
    let source = MemorySource::new(
        "EMPTY",
        vec![Column::string(1, "A", 1), Column::number(2, "B")],
        Vec::new(),
    );
    let (csv, result) = csv_of(source, RowLimit::Unlimited);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(csv, "A,B\n");
}

#[test]
fn info_reads_metadata_only() {
    let source = MemorySource::new(
        "DM",
        vec![Column::string(1, "USUBJID", 8), Column::number(2, "AGE")],
        counter_rows(4),
    )
    .with_properties(TableProperties::new("DM", 250).with_label("Demographics"));

    let info = table_info(&source);

    assert_eq!(info.name, "DM");
    assert_eq!(info.label.as_deref(), Some("Demographics"));
    assert_eq!(info.row_count, 250);
    assert_eq!(info.column_count, 2);
    assert_eq!(source.rows_pulled(), 0);
    insta::assert_json_snapshot!(info, @r#"
    {
      "name": "DM",
      "label": "Demographics",
      "row_count": 250,
      "column_count": 2
    }
    "#);
}

#[test]
fn test_mode_counts_rows() {
    let source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(10));
    let report = test_rows(source).unwrap();
    assert_eq!(report.name, "T");
    assert_eq!(report.rows_read, 10);
    assert!(report.counts_match());
}

#[test]
fn test_mode_reports_count_drift() {
    let source = MemorySource::new("T", vec![Column::number(1, "N")], counter_rows(3))
        .with_properties(TableProperties::new("T", 5));
    let report = test_rows(source).unwrap();
    assert_eq!(report.declared_rows, 5);
    assert_eq!(report.rows_read, 3);
    assert!(!report.counts_match());
}

#[test]
fn test_mode_rejects_malformed_rows() {
    let source = MemorySource::new(
        "T",
        vec![Column::number(1, "N")],
        vec![
            vec![Some(CellValue::Integer(1))],
            vec![Some(CellValue::Integer(2)), None],
        ],
    );
    let err = test_rows(source).unwrap_err();
    assert!(matches!(err, ConvertError::RowLength { row: 2, .. }));
}

#[test]
fn lists_columns() {
    let source = MemorySource::new(
        "AE",
        vec![
            Column::string(1, "USUBJID", 20).with_label("Unique Subject Identifier"),
            Column::number(2, "AESTDT")
                .with_label("Start Date, Imputed")
                .with_format("DATE"),
            Column::number(3, "AESEQ"),
        ],
        counter_rows(1),
    );
    let mut sink = CsvSink::new(Vec::new());

    let count = list_columns(&source, &mut sink).unwrap();
    let csv = String::from_utf8(sink.into_inner().unwrap()).unwrap();

    assert_eq!(count, 3);
    assert_eq!(source.rows_pulled(), 0);
    insta::assert_snapshot!(csv.trim_end(), @r#"
    Id,Name,Label,Format,Type,Length
    1,USUBJID,Unique Subject Identifier,,String,20
    2,AESTDT,"Start Date, Imputed",DATE,Number,8
    3,AESEQ,,,Number,8
    "#);
}
