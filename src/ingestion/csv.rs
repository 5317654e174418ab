//! CSV parsing with column-level type inference.

use crate::error::IngestResult;
use crate::types::{Column, Table, Value};

/// Parse CSV bytes into a [`Table`].
///
/// Rules:
///
/// - The first record is the header row; header names must be unique.
/// - Ragged records (fewer or more fields than the header) are an error.
/// - Each column's type is inferred over its non-empty cells: all integers
///   → Int64, else all floats → Float64, else all `true`/`false` → Bool,
///   else text. Empty cells are null.
pub fn parse_csv(payload: &[u8]) -> IngestResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(payload);

    let headers = rdr.headers()?.clone();
    super::check_unique_columns(headers.iter())?;

    // Column-major raw cells; the csv reader rejects ragged records itself.
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result?;
        for (idx, raw) in record.iter().enumerate() {
            cells[idx].push(raw.trim().to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_column(&raw)))
        .collect();

    Ok(Table::new(columns))
}

/// Type a whole column at once so a lone non-numeric cell demotes the
/// column to text rather than producing mixed cells.
fn infer_column(raw: &[String]) -> Vec<Value> {
    let non_empty = || raw.iter().filter(|s| !s.is_empty());

    let typed: fn(&str) -> Option<Value> = if non_empty().next().is_none() {
        |_| None
    } else if non_empty().all(|s| s.parse::<i64>().is_ok()) {
        |s| s.parse::<i64>().ok().map(Value::Int64)
    } else if non_empty().all(|s| s.parse::<f64>().is_ok()) {
        |s| s.parse::<f64>().ok().map(Value::Float64)
    } else if non_empty().all(|s| parse_bool(s).is_some()) {
        |s| parse_bool(s).map(Value::Bool)
    } else {
        |s| Some(Value::Utf8(s.to_string()))
    };

    raw.iter()
        .map(|s| {
            if s.is_empty() {
                Value::Null
            } else {
                typed(s).unwrap_or(Value::Null)
            }
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
