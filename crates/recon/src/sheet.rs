use std::collections::{HashMap, HashSet};

use crate::error::{SheetError, SourceError};
use crate::row::Row;
use crate::source::{RecordSink, RecordSource};

/// One dataset: an identity column, the union of all row columns in
/// first-seen order, and rows indexed by id in insertion order.
#[derive(Debug, Clone)]
pub struct Sheet {
    id_column: String,
    columns: Vec<String>,
    column_set: HashSet<String>,
    rows: Vec<Row>,
    index: HashMap<String, usize>,
}

impl Sheet {
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            columns: Vec::new(),
            column_set: HashSet::new(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a sheet from a record source: first record is the header row,
    /// every following record is a data row.
    pub fn parse<S: RecordSource>(id_column: &str, mut source: S) -> Result<Self, SheetError> {
        let mut sheet = Sheet::new(id_column);

        let header = source.next_record()?.ok_or(SheetError::EmptyInput)?;
        sheet.add_columns(header.as_slice());
        if !sheet.column_set.contains(id_column) {
            return Err(SheetError::IdColumnNotFound(id_column.to_string()));
        }

        let mut record_no = 1;
        while let Some(record) = source.next_record()? {
            record_no += 1;
            let row = Row::new(record.as_slice(), sheet.columns.as_slice(), id_column)
                .map_err(|err| SheetError::Record {
                    record: record_no,
                    source: err,
                })?;
            sheet.insert(row);
        }

        log::debug!(
            "parsed sheet: {} columns, {} rows ({} records)",
            sheet.columns.len(),
            sheet.rows.len(),
            record_no - 1
        );
        Ok(sheet)
    }

    /// Emit the column set, then each row's values in the row's own column
    /// order, then terminate the sink.
    pub fn write<S: RecordSink>(&self, mut sink: S) -> Result<(), SourceError> {
        sink.write_record(&self.columns)?;
        for row in &self.rows {
            sink.write_record(row.values())?;
        }
        sink.finish()
    }

    /// Add a row, widening the column set with the row's columns. A row with
    /// an id already present replaces the earlier one in place.
    pub fn add_row(&mut self, row: Row) -> Result<(), SheetError> {
        if row.id_column() != self.id_column {
            return Err(SheetError::RowIdColumnMismatch {
                expected: self.id_column.clone(),
                found: row.id_column().to_string(),
            });
        }
        self.add_columns(row.headers());
        self.insert(row);
        Ok(())
    }

    pub(crate) fn add_columns<H: AsRef<str>>(&mut self, headers: &[H]) {
        for h in headers {
            let h = h.as_ref();
            if !self.column_set.contains(h) {
                self.column_set.insert(h.to_string());
                self.columns.push(h.to_string());
            }
        }
    }

    fn insert(&mut self, row: Row) {
        match self.index.get(row.id()) {
            Some(&pos) => self.rows[pos] = row,
            None => {
                self.index.insert(row.id().to_string(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn headers(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_set.contains(column)
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.index.get(id).map(|&pos| &self.rows[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows keyed on a column other than the sheet's id column are dropped.
impl Extend<Row> for Sheet {
    fn extend<I: IntoIterator<Item = Row>>(&mut self, iter: I) {
        for row in iter {
            if let Err(err) = self.add_row(row) {
                log::warn!("dropping row: {err}");
            }
        }
    }
}
