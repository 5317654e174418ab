//! Dataset summaries backing the dashboard's preview and chart menus.
//!
//! These are the computations the UI layer renders from an ingested table:
//! a head preview, per-column missing counts, categorical value counts for
//! bar charts, simple numeric reductions, and a Pearson correlation matrix
//! over the numeric columns for the heatmap. Chart rendering itself lives
//! with the UI collaborator, not here.

use std::collections::BTreeMap;

use crate::schema::Schema;
use crate::types::{Column, Table, Value};

/// First `n` rows of `table`, preserving column order.
pub fn head(table: &Table, n: usize) -> Table {
    let columns = table
        .columns()
        .iter()
        .map(|c| Column::new(c.name.clone(), c.values.iter().take(n).cloned().collect()))
        .collect();
    Table::new(columns)
}

/// Per-column count of null cells, in column order.
pub fn missing_counts(table: &Table) -> Vec<(String, usize)> {
    table
        .columns()
        .iter()
        .map(|c| {
            let nulls = c.values.iter().filter(|v| v.is_null()).count();
            (c.name.clone(), nulls)
        })
        .collect()
}

/// Distinct non-null values of `column` with occurrence counts, most
/// frequent first (ties broken by label).
///
/// Returns `None` if the column does not exist.
pub fn value_counts(table: &Table, column: &str) -> Option<Vec<(String, usize)>> {
    let col = table.column(column)?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for v in &col.values {
        if v.is_null() {
            continue;
        }
        *counts.entry(v.to_string()).or_insert(0) += 1;
    }

    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Some(out)
}

/// Mean of a column's numeric cells, ignoring nulls.
///
/// `None` when the column is missing or has no numeric cells.
pub fn mean(table: &Table, column: &str) -> Option<f64> {
    let nums = numeric_cells(table, column)?;
    if nums.is_empty() {
        return None;
    }
    Some(nums.iter().sum::<f64>() / nums.len() as f64)
}

/// Minimum of a column's numeric cells, ignoring nulls.
pub fn min(table: &Table, column: &str) -> Option<f64> {
    numeric_cells(table, column)?.into_iter().reduce(f64::min)
}

/// Maximum of a column's numeric cells, ignoring nulls.
pub fn max(table: &Table, column: &str) -> Option<f64> {
    numeric_cells(table, column)?.into_iter().reduce(f64::max)
}

fn numeric_cells(table: &Table, column: &str) -> Option<Vec<f64>> {
    let col = table.column(column)?;
    Some(col.values.iter().filter_map(Value::as_f64).collect())
}

/// Pearson correlation matrix over the schema's numeric columns.
///
/// Returns the participating column names (in table order) and a square
/// matrix aligned with them. Pairwise-complete: for each pair, only rows
/// where both cells are numeric contribute. Entries with fewer than two
/// complete pairs or zero variance are NaN.
pub fn correlation_matrix(table: &Table, schema: &Schema) -> (Vec<String>, Vec<Vec<f64>>) {
    let names: Vec<String> = table
        .column_names()
        .filter(|n| schema.is_numeric(n))
        .map(str::to_string)
        .collect();

    let cols: Vec<Vec<Option<f64>>> = names
        .iter()
        .filter_map(|n| table.column(n))
        .map(|c| c.values.iter().map(Value::as_f64).collect())
        .collect();

    let k = names.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&cols[i], &cols[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    (names, matrix)
}

fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
