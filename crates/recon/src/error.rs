use std::fmt;

/// Failure building a single [`crate::row::Row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// More values than column headers.
    HeadersValuesMismatch { headers: usize, values: usize },
    /// The identity column is not among the row's headers.
    NoIdColumn(String),
    /// The identity column is present but its value is absent.
    MissingId(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeadersValuesMismatch { headers, values } => {
                write!(f, "row has {values} values but only {headers} headers")
            }
            Self::NoIdColumn(col) => write!(f, "id column '{col}' is not in the row headers"),
            Self::MissingId(col) => write!(f, "row has no value for id column '{col}'"),
        }
    }
}

impl std::error::Error for RowError {}

/// Failure reported by a record source or sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Underlying read/write failed.
    Io(String),
    /// The physical input could not be tokenized.
    Malformed { record: usize, message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Malformed { record, message } => {
                write!(f, "malformed record {record}: {message}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Structural failure while building or rendering a [`crate::sheet::Sheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// The source yielded no header record.
    EmptyInput,
    /// The header record does not declare the identity column.
    IdColumnNotFound(String),
    /// A data record (1-based, header = record 1) failed to become a row.
    Record { record: usize, source: RowError },
    /// A row keyed on a different identity column was added.
    RowIdColumnMismatch { expected: String, found: String },
    Source(SourceError),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input is empty (no header record)"),
            Self::IdColumnNotFound(col) => write!(f, "id column '{col}' not found in headers"),
            Self::Record { record, source } => write!(f, "record {record}: {source}"),
            Self::RowIdColumnMismatch { expected, found } => {
                write!(f, "row keyed on '{found}' added to sheet keyed on '{expected}'")
            }
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Record { source, .. } => Some(source),
            Self::Source(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SourceError> for SheetError {
    fn from(err: SourceError) -> Self {
        Self::Source(err)
    }
}

/// Fatal failure of a diff run. Policy outcomes (no common columns, identical
/// files, ...) are not errors; see [`crate::pipeline::Outcome`].
#[derive(Debug)]
pub enum DiffError {
    /// One of the two inputs could not be parsed into a sheet.
    Parse { input: String, source: SheetError },
    /// The diff sheet could not be written.
    Output { output: String, source: SourceError },
    /// A diff row could not be built for the record with this id.
    Row { id: String, source: RowError },
    /// The diff sheet could not be assembled from its rows.
    Assemble(SheetError),
    /// Config parse / validation error.
    Config(String),
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { input, source } => write!(f, "{input}: {source}"),
            Self::Output { output, source } => write!(f, "{output}: {source}"),
            Self::Row { id, source } => write!(f, "record '{id}': {source}"),
            Self::Assemble(err) => write!(f, "assembling diff: {err}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for DiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Output { source, .. } => Some(source),
            Self::Row { source, .. } => Some(source),
            Self::Assemble(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<SheetError> for DiffError {
    fn from(err: SheetError) -> Self {
        Self::Assemble(err)
    }
}
