#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_xlsxwriter::Workbook;

use tabular_ingest::ingestion::excel::parse_excel;
use tabular_ingest::schema::Schema;
use tabular_ingest::types::Value;
use tabular_ingest::IngestError;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-ingest-{name}-{nanos}.xlsx"))
}

fn workbook_bytes(path: &PathBuf, wb: &mut Workbook) -> Vec<u8> {
    wb.save(path).unwrap();
    let bytes = std::fs::read(path).unwrap();
    let _ = std::fs::remove_file(path);
    bytes
}

fn write_people_workbook() -> Workbook {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();

    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "score").unwrap();
    ws.write_string(0, 3, "active").unwrap();

    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    ws.write_number(1, 2, 98.5).unwrap();
    ws.write_boolean(1, 3, true).unwrap();

    ws.write_number(2, 0, 2).unwrap();
    ws.write_string(2, 1, "Grace").unwrap();
    ws.write_number(2, 2, 87.25).unwrap();
    ws.write_boolean(2, 3, false).unwrap();

    wb
}

#[test]
fn parse_excel_first_sheet_happy_path() {
    let path = tmp_file("people");
    let bytes = workbook_bytes(&path, &mut write_people_workbook());

    let table = parse_excel(&bytes).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["id", "name", "score", "active"]
    );

    // xlsx stores all numbers as floats.
    assert_eq!(
        table.column("id").unwrap().values,
        vec![Value::Float64(1.0), Value::Float64(2.0)]
    );
    assert_eq!(
        table.column("name").unwrap().values,
        vec![
            Value::Utf8("Ada".to_string()),
            Value::Utf8("Grace".to_string())
        ]
    );
    assert_eq!(
        table.column("active").unwrap().values,
        vec![Value::Bool(true), Value::Bool(false)]
    );
}

#[test]
fn parse_excel_schema_excludes_bool_column() {
    let path = tmp_file("roles");
    let bytes = workbook_bytes(&path, &mut write_people_workbook());

    let table = parse_excel(&bytes).unwrap();
    let schema = Schema::analyze(&table);

    assert!(schema.is_numeric("id"));
    assert!(schema.is_numeric("score"));
    assert!(schema.is_categorical("name"));
    assert!(!schema.is_numeric("active"));
    assert!(!schema.is_categorical("active"));
}

#[test]
fn parse_excel_rejects_duplicate_header() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "a").unwrap();
    ws.write_string(0, 1, "a").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_number(1, 1, 2).unwrap();

    let path = tmp_file("dup");
    let bytes = workbook_bytes(&path, &mut wb);

    let err = parse_excel(&bytes).unwrap_err();
    assert!(matches!(err, IngestError::DuplicateColumn { .. }));
}

#[test]
fn parse_excel_rejects_not_a_workbook() {
    let err = parse_excel(b"definitely not a workbook").unwrap_err();
    assert!(matches!(err, IngestError::Excel(_)));
}
