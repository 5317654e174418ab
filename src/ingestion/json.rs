//! JSON parsing.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Column names are the records' top-level keys in first-seen order;
//! records missing a key contribute nulls. Nested arrays/objects are not
//! tabular cells and are rejected.

use serde_json::{Map, Value as JsonValue};

use crate::error::{IngestError, IngestResult};
use crate::types::{Column, Table, Value};

/// Parse JSON bytes into a [`Table`].
pub fn parse_json(payload: &[u8]) -> IngestResult<Table> {
    let text = std::str::from_utf8(payload).map_err(|e| IngestError::Malformed {
        message: format!("json payload is not utf-8: {e}"),
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IngestError::Malformed {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<JsonValue>(trimmed) {
        match v {
            JsonValue::Array(items) => build_table(&items),
            JsonValue::Object(_) => build_table(std::slice::from_ref(&v)),
            _ => Err(IngestError::Malformed {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut records = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<JsonValue>(line).map_err(|e| {
                IngestError::Malformed {
                    message: format!("invalid ndjson at line {}: {e}", i + 1),
                }
            })?;
            records.push(v);
        }
        build_table(&records)
    }
}

fn build_table(records: &[JsonValue]) -> IngestResult<Table> {
    // Union of keys across records, in first-seen order. Key order inside a
    // record is the document's (serde_json `preserve_order`).
    let mut names: Vec<String> = Vec::new();
    for (idx0, record) in records.iter().enumerate() {
        let obj = as_object(idx0 + 1, record)?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|n| Column::new(n, Vec::with_capacity(records.len())))
        .collect();

    for (idx0, record) in records.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = as_object(row_num, record)?;
        for col in &mut columns {
            let cell = match obj.get(&col.name) {
                Some(v) => convert_json_value(row_num, &col.name, v)?,
                None => Value::Null,
            };
            col.values.push(cell);
        }
    }

    Ok(Table::new(columns))
}

fn as_object(row: usize, v: &JsonValue) -> IngestResult<&Map<String, JsonValue>> {
    v.as_object().ok_or_else(|| IngestError::Malformed {
        message: format!("row {row} is not a json object"),
    })
}

fn convert_json_value(row: usize, column: &str, v: &JsonValue) -> IngestResult<Value> {
    match v {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int64(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float64(f))
            } else {
                Err(IngestError::Malformed {
                    message: format!("row {row} column '{column}': number out of range"),
                })
            }
        }
        JsonValue::String(s) => Ok(Value::Utf8(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(IngestError::Malformed {
            message: format!("row {row} column '{column}': nested values are not tabular"),
        }),
    }
}
