//! Column-role inference: the numeric/categorical partition of a table.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{Table, Value};

/// The numeric/categorical partition of a table's columns.
///
/// Downstream chart menus are parameterized on this: histograms, box plots
/// and scatter plots select from `numeric_columns`; bar charts of value
/// counts select from `categorical_columns`. The two sets are disjoint and
/// together a subset of the table's column names; columns of other inferred
/// kinds (booleans, dates, all-null columns) belong to neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Columns whose non-null cells are all numeric.
    pub numeric_columns: BTreeSet<String>,
    /// Columns with at least one textual cell and no non-textual,
    /// non-numeric cells.
    pub categorical_columns: BTreeSet<String>,
}

impl Schema {
    /// Partition `table`'s columns by inferred role.
    ///
    /// Total function with no failure mode: an empty table (or one with
    /// only header names) yields empty sets.
    pub fn analyze(table: &Table) -> Self {
        let mut numeric = BTreeSet::new();
        let mut categorical = BTreeSet::new();

        for col in table.columns() {
            match infer_role(&col.values) {
                Some(Role::Numeric) => {
                    numeric.insert(col.name.clone());
                }
                Some(Role::Categorical) => {
                    categorical.insert(col.name.clone());
                }
                None => {}
            }
        }

        Self {
            numeric_columns: numeric,
            categorical_columns: categorical,
        }
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric_columns.contains(name)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical_columns.contains(name)
    }
}

enum Role {
    Numeric,
    Categorical,
}

/// Role of one column, judged over its non-null cells.
///
/// All numeric → numeric. Any textual cell (with the rest textual or
/// numeric) → categorical, matching how a text source types a column that
/// fails full numeric coercion. Bool or date cells disqualify a column from
/// both sets, as do columns with no non-null cells at all.
fn infer_role(values: &[Value]) -> Option<Role> {
    let mut saw_numeric = false;
    let mut saw_text = false;

    for v in values {
        match v {
            Value::Null => {}
            Value::Int64(_) | Value::Float64(_) => saw_numeric = true,
            Value::Utf8(_) => saw_text = true,
            Value::Bool(_) | Value::DateTime(_) => return None,
        }
    }

    if saw_text {
        Some(Role::Categorical)
    } else if saw_numeric {
        Some(Role::Numeric)
    } else {
        None
    }
}
