use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::error::RowError;

/// One record, keyed by its value in the identity column.
///
/// Columns keep their header order. Equality, hashing and ordering look at the
/// id value only: two rows with the same id are equal whatever their other
/// cells hold.
#[derive(Debug, Clone)]
pub struct Row {
    id_column: String,
    id: String,
    columns: Vec<String>,
    values: Vec<String>,
    index: HashMap<String, usize>,
    // Frozen at construction, never recomputed from current values.
    empty: bool,
}

impl Row {
    /// Build a row from raw field values and their headers.
    ///
    /// There may be fewer values than headers; trailing columns get `""`.
    pub fn new<V, H>(values: &[V], headers: &[H], id_column: &str) -> Result<Self, RowError>
    where
        V: AsRef<str>,
        H: AsRef<str>,
    {
        let fields = values.iter().map(|v| Some(v.as_ref().to_string())).collect();
        Self::from_fields(fields, headers, id_column)
    }

    /// Build a row where individual values may be absent (`None`).
    ///
    /// Absent values are normalized to `""`, except for the identity column
    /// which must not be `None`. Headers past the end of `values` get `""`,
    /// the identity column included.
    pub fn from_fields<H>(
        values: Vec<Option<String>>,
        headers: &[H],
        id_column: &str,
    ) -> Result<Self, RowError>
    where
        H: AsRef<str>,
    {
        if values.len() > headers.len() {
            return Err(RowError::HeadersValuesMismatch {
                headers: headers.len(),
                values: values.len(),
            });
        }

        let mut columns: Vec<String> = Vec::with_capacity(headers.len());
        let mut cells: Vec<Option<String>> = Vec::with_capacity(headers.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        let mut populated = 0usize;

        let mut values = values.into_iter();
        for header in headers {
            let header = header.as_ref();
            // Headers past the last value pad with "", only an explicit `None` is absent.
            let value = values.next().unwrap_or_else(|| Some(String::new()));
            if value.as_deref().is_some_and(|v| !v.is_empty()) {
                populated += 1;
            }
            // A repeated header overwrites the value but keeps its first position.
            match index.get(header) {
                Some(&pos) => cells[pos] = value,
                None => {
                    index.insert(header.to_string(), columns.len());
                    columns.push(header.to_string());
                    cells.push(value);
                }
            }
        }

        let id_pos = *index
            .get(id_column)
            .ok_or_else(|| RowError::NoIdColumn(id_column.to_string()))?;
        let id = cells[id_pos]
            .clone()
            .ok_or_else(|| RowError::MissingId(id_column.to_string()))?;

        Ok(Self {
            id_column: id_column.to_string(),
            id,
            columns,
            values: cells.into_iter().map(Option::unwrap_or_default).collect(),
            index,
            empty: populated < 2,
        })
    }

    /// Copy `row` under a new id. Emptiness is carried over, not recomputed.
    pub fn with_id(row: &Row, new_id: impl Into<String>) -> Self {
        let mut copy = row.clone();
        copy.set_id(new_id);
        copy
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Replace the id value (and the identity cell with it).
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if let Some(&pos) = self.index.get(&self.id_column) {
            self.values[pos] = id.clone();
        }
        self.id = id;
    }

    /// Value for `column`, or `None` if the row has no such column.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.index.get(column).map(|&pos| self.values[pos].as_str())
    }

    pub fn headers(&self) -> &[String] {
        &self.columns
    }

    /// Values in this row's own column order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// True when fewer than two cells held a value at construction time.
    ///
    /// The identity cell counts, so a row holding only its id and one other
    /// value is still empty.
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Row {}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Row {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Row {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 3] = ["a", "b", "c"];

    fn check_row(r: &Row, headers: &[&str], values: &[&str], id_column: &str, id: &str) {
        assert_eq!(r.headers(), headers);
        for (i, h) in headers.iter().enumerate() {
            let expected = values.get(i).copied().unwrap_or("");
            assert_eq!(r.value(h), Some(expected), "value for {h}");
        }
        assert_eq!(r.id_column(), id_column);
        assert_eq!(r.value(id_column), Some(id));
        assert_eq!(r.id(), id);
    }

    #[test]
    fn constructors() {
        let values = ["1", "2", "3"];
        let r1 = Row::new(&values, &HEADERS, "a").unwrap();
        let r2 = Row::new(&values, &HEADERS, "b").unwrap();
        let r3 = Row::new(&values, &HEADERS, "c").unwrap();
        let r4 = Row::with_id(&r3, "4");
        let r5 = Row::new(&["1"], &["a"], "a").unwrap();

        check_row(&r1, &HEADERS, &values, "a", "1");
        check_row(&r2, &HEADERS, &values, "b", "2");
        check_row(&r3, &HEADERS, &values, "c", "3");
        check_row(&r4, &HEADERS, &["1", "2", "4"], "c", "4");
        check_row(&r5, &["a"], &["1"], "a", "1");
        // the source row is untouched by with_id
        assert_eq!(r3.id(), "3");
    }

    #[test]
    fn too_many_values() {
        let err = Row::new(&["1", "2"], &["a"], "a").unwrap_err();
        assert_eq!(err, RowError::HeadersValuesMismatch { headers: 1, values: 2 });
    }

    #[test]
    fn short_values_pad_with_empty() {
        let r1 = Row::new(&["1", "2"], &HEADERS, "a").unwrap();
        let r2 = Row::new(&["1"], &HEADERS, "a").unwrap();
        let r3 = Row::new(&["1", "2"], &HEADERS, "b").unwrap();

        check_row(&r1, &HEADERS, &["1", "2"], "a", "1");
        check_row(&r2, &HEADERS, &["1"], "a", "1");
        check_row(&r3, &HEADERS, &["1", "2"], "b", "2");
        assert_eq!(r2.values(), ["1", "", ""]);
    }

    #[test]
    fn short_values_before_id_column_give_empty_id() {
        let r = Row::new(&["1"], &HEADERS, "c").unwrap();
        check_row(&r, &HEADERS, &["1"], "c", "");
        assert!(r.is_empty());
    }

    #[test]
    fn absent_id_value() {
        let err = Row::from_fields(vec![None], &["a"], "a").unwrap_err();
        assert_eq!(err, RowError::MissingId("a".into()));
    }

    #[test]
    fn absent_non_id_value_is_empty_string() {
        let r = Row::from_fields(vec![Some("1".into()), None], &["a", "b"], "a").unwrap();
        assert_eq!(r.value("b"), Some(""));
    }

    #[test]
    fn id_column_not_in_headers() {
        let err = Row::new(&["1"], &["a"], "b").unwrap_err();
        assert_eq!(err, RowError::NoIdColumn("b".into()));
    }

    #[test]
    fn set_id_updates_identity_cell() {
        let mut r = Row::new(&["1", "2", "3"], &HEADERS, "a").unwrap();
        r.set_id("testId");
        assert_eq!(r.id(), "testId");
        assert_eq!(r.value("a"), Some("testId"));
        assert_eq!(r.values(), ["testId", "2", "3"]);
    }

    #[test]
    fn duplicate_header_overwrites_in_place() {
        let r = Row::new(&["1", "x", "y"], &["a", "b", "b"], "a").unwrap();
        assert_eq!(r.headers(), ["a", "b"]);
        assert_eq!(r.value("b"), Some("y"));
    }

    #[test]
    fn equality_is_by_id_only() {
        let values = ["1", "2", "3"];
        let r1 = Row::new(&values, &HEADERS, "a").unwrap();
        let mut r2 = Row::new(&values, &HEADERS, "a").unwrap();
        assert_eq!(r1, r2);

        let r3 = Row::new(&values, &HEADERS, "b").unwrap();
        assert_ne!(r1, r3);

        r2.set_id("4");
        assert_ne!(r1, r2);

        // Different contents, same id: still equal (and Ordering::Equal).
        let r4 = Row::new(&["1"], &["a"], "a").unwrap();
        assert_eq!(r1, r4);
        assert_eq!(r1.cmp(&r4), Ordering::Equal);
    }

    #[test]
    fn ordering_is_lexicographic_on_id() {
        let min = i32::MIN.to_string();
        let max = i32::MAX.to_string();
        let ids = ["-1", min.as_str(), "0", "1", max.as_str()];
        let rows: Vec<Row> = ids
            .iter()
            .map(|id| Row::new(&[*id, "x", "3"], &HEADERS, "a").unwrap())
            .collect();

        for i in 0..rows.len() {
            if i > 0 {
                assert!(rows[i] > rows[i - 1], "{i}");
            }
            if i + 1 < rows.len() {
                assert!(rows[i] < rows[i + 1], "{i}");
            }
            assert_eq!(rows[i].cmp(&rows[i]), Ordering::Equal);
        }
    }

    #[test]
    fn emptiness_needs_two_populated_cells() {
        assert!(!Row::new(&["0", "3", "3"], &HEADERS, "a").unwrap().is_empty());
        assert!(Row::new(&["", "3", ""], &HEADERS, "b").unwrap().is_empty());
        assert!(Row::new(&["3"], &["a"], "a").unwrap().is_empty());
        // the id counts as one of the two
        assert!(!Row::new(&["1", "x", ""], &HEADERS, "a").unwrap().is_empty());
        assert!(Row::new(&["1", "", ""], &HEADERS, "a").unwrap().is_empty());
        // two non-id values, empty id
        assert!(!Row::new(&["", "x", "y"], &HEADERS, "a").unwrap().is_empty());
    }

    #[test]
    fn emptiness_is_frozen_across_id_changes() {
        let mut empty = Row::new(&["", "x", ""], &HEADERS, "a").unwrap();
        assert!(empty.is_empty());
        empty.set_id("now-populated");
        assert!(empty.is_empty());

        let full = Row::new(&["1", "x", "y"], &HEADERS, "a").unwrap();
        let relabeled = Row::with_id(&full, "");
        assert!(!relabeled.is_empty());
    }
}
