//! `sheetdiff-recon`: key-based diff of two tabular datasets.
//!
//! Pure engine crate: reads records from a [`source::RecordSource`], writes the
//! diff to a [`source::RecordSink`], and narrates the run through a
//! [`report::Reporter`]. No CLI or file IO dependencies.

pub mod collector;
pub mod config;
pub mod differ;
pub mod error;
pub mod headers;
pub mod messages;
pub mod missing;
pub mod pipeline;
pub mod report;
pub mod row;
pub mod sheet;
pub mod source;

/// Appended to a cell value from input A that differs from B.
pub const DIFF_MARKER_A: &str = "<<";
/// Prefixed to a cell value from input B that differs from A.
pub const DIFF_MARKER_B: &str = ">>";
/// Opens the block of records missing from A.
pub const RECORD_MARKER_A: &str = "<<<<<<";
/// Opens the block of records missing from B.
pub const RECORD_MARKER_B: &str = ">>>>>>";

pub use config::DiffConfig;
pub use error::{DiffError, RowError, SheetError, SourceError};
pub use pipeline::{Diff, DiffInput, DiffOptions, DiffOutput, DiffSummary, Outcome};
pub use report::{BufferReporter, Reporter};
pub use row::Row;
pub use sheet::Sheet;
pub use source::{RecordSink, RecordSource};
