use crate::error::RowError;
use crate::row::Row;
use crate::{DIFF_MARKER_A, DIFF_MARKER_B};

/// A diff row plus whether any of its cells actually differed.
#[derive(Debug, Clone)]
pub struct CellDiff {
    pub row: Row,
    pub has_diff: bool,
}

/// Compares two rows cell by cell over the reconciled columns.
#[derive(Debug, Clone)]
pub struct RowDiffer<'a> {
    columns: &'a [String],
    id_column: &'a str,
    zero_matches_null: bool,
}

impl<'a> RowDiffer<'a> {
    /// `columns` are the reconciled (common, sorted) columns and must contain
    /// `id_column`.
    pub fn new(columns: &'a [String], id_column: &'a str, zero_matches_null: bool) -> Self {
        Self {
            columns,
            id_column,
            zero_matches_null,
        }
    }

    /// Diff `a` against `b`. Both rows are expected to share the same id.
    ///
    /// Equal cells yield their value when `show_identical` is set and `""`
    /// otherwise. Differing cells yield `v1<<` and/or `>>v2`, each half only
    /// when that side is non-empty.
    pub fn diff(&self, a: &Row, b: &Row, show_identical: bool) -> Result<CellDiff, RowError> {
        let mut has_diff = false;
        let values: Vec<String> = self
            .columns
            .iter()
            .map(|h| {
                if h == self.id_column {
                    return a.id().to_string();
                }
                let v1 = a.value(h).unwrap_or("");
                let v2 = b.value(h).unwrap_or("");

                if v1 == v2 {
                    return if show_identical { v1.to_string() } else { String::new() };
                }
                if self.zero_matches_null && is_zero_and_empty(v1, v2) {
                    return if show_identical { "0".to_string() } else { String::new() };
                }

                let mut cell = String::with_capacity(v1.len() + v2.len() + 4);
                if !v1.is_empty() {
                    cell.push_str(v1);
                    cell.push_str(DIFF_MARKER_A);
                }
                if !v2.is_empty() {
                    cell.push_str(DIFF_MARKER_B);
                    cell.push_str(v2);
                }
                has_diff = true;
                cell
            })
            .collect();

        let row = Row::new(values.as_slice(), self.columns, self.id_column)?;
        Ok(CellDiff { row, has_diff })
    }
}

/// `v1 + v2 == "0"`: one side is "0" and the other is empty.
fn is_zero_and_empty(v1: &str, v2: &str) -> bool {
    matches!((v1, v2), ("0", "") | ("", "0"))
}
