// CSV collaborators for the diff engine

pub mod csv;

pub use crate::csv::{read_file_as_utf8, CsvSink, CsvSource, DEFAULT_DELIMITER};
