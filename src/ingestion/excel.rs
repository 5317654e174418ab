#![cfg(feature = "excel")]

//! Excel workbook parsing (first worksheet).

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{IngestError, IngestResult};
use crate::types::{Column, Table, Value};

/// Parse workbook bytes into a [`Table`] from the first sheet.
///
/// Behavior:
/// - The first non-empty row is the header row; trailing empty header
///   cells are dropped, and header names must be unique
/// - Cells keep the workbook's own typing (string/int/float/bool); date
///   and duration cells become [`Value::DateTime`], formula-error cells
///   become null
pub fn parse_excel(payload: &[u8]) -> IngestResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(payload))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::Malformed {
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook.worksheet_range(&sheet)?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let header_idx = rows
        .iter()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| IngestError::Malformed {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?;

    let mut header: Vec<String> = rows[header_idx].iter().map(header_cell_to_string).collect();
    while header.last().is_some_and(|h| h.trim().is_empty()) {
        header.pop();
    }
    super::check_unique_columns(header.iter().map(String::as_str))?;

    let mut columns: Vec<Column> = header
        .into_iter()
        .map(|name| Column::new(name, Vec::new()))
        .collect();
    for row in rows.iter().skip(header_idx + 1) {
        for (idx, col) in columns.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            col.values.push(convert_cell(cell));
        }
    }

    Ok(Table::new(columns))
}

fn header_cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::Utf8(trimmed.to_string())
            }
        }
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::DateTime(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::DateTime(s.clone()),
        // Formula error cells carry no usable value.
        Data::Error(_) => Value::Null,
    }
}
