//! Boundary between the engine and the physical CSV layer.
//!
//! The engine only sees tokenized records. Quoting, escaping and file handles
//! live behind these traits (see the `sheetdiff-io` crate).

use std::collections::VecDeque;

use crate::error::SourceError;

/// Yields a header record followed by zero or more data records.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError>;
}

/// Accepts the header record once, then one record per row.
pub trait RecordSink {
    fn write_record(&mut self, fields: &[String]) -> Result<(), SourceError>;

    /// Flush and terminate the destination.
    fn finish(&mut self) -> Result<(), SourceError>;
}

/// In-memory source over pre-tokenized records.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    records: VecDeque<Vec<String>>,
}

impl VecSource {
    pub fn new(records: Vec<Vec<String>>) -> Self {
        Self { records: records.into() }
    }

    /// Convenience for tests: `VecSource::from_rows(&[&["id", "x"], &["1", "a"]])`.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        Ok(self.records.pop_front())
    }
}

/// In-memory sink that keeps every written record.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub records: Vec<Vec<String>>,
    pub finished: bool,
}

impl RecordSink for VecSink {
    fn write_record(&mut self, fields: &[String]) -> Result<(), SourceError> {
        self.records.push(fields.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SourceError> {
        self.finished = true;
        Ok(())
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        (**self).next_record()
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write_record(&mut self, fields: &[String]) -> Result<(), SourceError> {
        (**self).write_record(fields)
    }

    fn finish(&mut self) -> Result<(), SourceError> {
        (**self).finish()
    }
}
