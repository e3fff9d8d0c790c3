use std::collections::HashSet;

use crate::sheet::Sheet;

/// Column sets of two sheets, reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSets {
    /// Columns present in both sheets, sorted. Defines the diff column order.
    pub common: Vec<String>,
    /// Columns of A that B lacks, in A's order.
    pub missing_from_b: Vec<String>,
    /// Columns of B that A lacks, in B's order.
    pub missing_from_a: Vec<String>,
}

impl HeaderSets {
    /// True when both sheets declare exactly the same columns.
    pub fn same_columns(&self) -> bool {
        self.missing_from_a.is_empty() && self.missing_from_b.is_empty()
    }
}

/// Intersect the column sets of `a` and `b`.
///
/// Returns `None` when they share no column at all.
pub fn reconcile_headers(a: &Sheet, b: &Sheet) -> Option<HeaderSets> {
    let mut common: Vec<String> = a
        .headers()
        .iter()
        .filter(|h| b.has_column(h))
        .cloned()
        .collect();
    common.sort();

    if common.is_empty() {
        return None;
    }

    let shared: HashSet<&str> = common.iter().map(String::as_str).collect();
    let exclusive = |sheet: &Sheet| -> Vec<String> {
        sheet
            .headers()
            .iter()
            .filter(|h| !shared.contains(h.as_str()))
            .cloned()
            .collect()
    };

    Some(HeaderSets {
        missing_from_b: exclusive(a),
        missing_from_a: exclusive(b),
        common,
    })
}
