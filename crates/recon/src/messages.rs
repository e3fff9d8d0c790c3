//! User-facing report lines.

use std::fmt;

/// Terminates every list written to the report channel.
pub const LIST_END: &str = "<end>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ColumnsMissing(String),
    RecordsNotFound(String),
    NoMatchingCols,
    NoMatchingRecords,
    CommonRecordsIdentical,
    SameRecords,
    SameHeaders,
    IdenticalFile,
    WroteDiffs(String),
    ParseCsvFail(String),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnsMissing(input) => write!(f, "Columns missing from {input}:"),
            Self::RecordsNotFound(input) => write!(f, "Records not found in {input}:"),
            Self::NoMatchingCols => write!(f, "No matching columns found between the input files."),
            Self::NoMatchingRecords => write!(f, "No matching records found between the input files."),
            Self::CommonRecordsIdentical => write!(f, "All common records are identical."),
            Self::SameRecords => write!(f, "Both files contain the same records."),
            Self::SameHeaders => write!(f, "Both files contain the same columns."),
            Self::IdenticalFile => write!(f, "The files are identical; no diff file written."),
            Self::WroteDiffs(output) => write!(f, "Diffs written to: {output}"),
            Self::ParseCsvFail(input) => write!(f, "Failed to parse CSV data from {input}"),
        }
    }
}
