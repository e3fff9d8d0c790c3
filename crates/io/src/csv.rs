// CSV record source and sink

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use sheetdiff_recon::error::SourceError;
use sheetdiff_recon::source::{RecordSink, RecordSource};

pub const DEFAULT_DELIMITER: u8 = b',';

/// Reads RFC 4180 records. The header row is handed out as an ordinary
/// record; rows may be ragged.
pub struct CsvSource<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    read: usize,
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Self {
            reader,
            record: csv::StringRecord::new(),
            read: 0,
        }
    }

    /// Records handed out so far.
    pub fn records_read(&self) -> usize {
        self.read
    }
}

impl CsvSource<Cursor<Vec<u8>>> {
    /// Read the whole file up front, decoding non-UTF-8 input as Windows-1252.
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self, SourceError> {
        let content = read_file_as_utf8(path)?;
        log::debug!("read {} bytes from {}", content.len(), path.display());
        Ok(Self::from_reader(Cursor::new(content.into_bytes()), delimiter))
    }

    pub fn from_str(content: &str, delimiter: u8) -> Self {
        Self::from_reader(Cursor::new(content.as_bytes().to_vec()), delimiter)
    }
}

impl<R: Read> RecordSource for CsvSource<R> {
    fn next_record(&mut self) -> Result<Option<Vec<String>>, SourceError> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => Ok(None),
            Ok(true) => {
                self.read += 1;
                Ok(Some(self.record.iter().map(str::to_string).collect()))
            }
            Err(err) => Err(source_error(err, self.read + 1)),
        }
    }
}

fn source_error(err: csv::Error, record: usize) -> SourceError {
    match err.kind() {
        csv::ErrorKind::Io(e) => SourceError::Io(e.to_string()),
        _ => SourceError::Malformed {
            record,
            message: err.to_string(),
        },
    }
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, SourceError> {
    let io_err = |e: std::io::Error| SourceError::Io(format!("{}: {e}", path.display()));
    let mut file = File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Writes records with `\n` terminators, quoting only fields that need it.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

fn writer_builder(delimiter: u8) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    // Marker rows are a single field, so records vary in width.
    builder
        .delimiter(delimiter)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary);
    builder
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W, delimiter: u8) -> Self {
        Self {
            writer: writer_builder(delimiter).from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, SourceError> {
        self.writer
            .into_inner()
            .map_err(|e| SourceError::Io(e.error().to_string()))
    }
}

impl CsvSink<File> {
    /// Create (or truncate) `path`.
    pub fn to_path(path: &Path, delimiter: u8) -> Result<Self, SourceError> {
        let writer = writer_builder(delimiter)
            .from_path(path)
            .map_err(|e| SourceError::Io(format!("{}: {e}", path.display())))?;
        Ok(Self { writer })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, fields: &[String]) -> Result<(), SourceError> {
        self.writer
            .write_record(fields)
            .map_err(|e| SourceError::Io(e.to_string()))
    }

    fn finish(&mut self) -> Result<(), SourceError> {
        self.writer.flush().map_err(|e| SourceError::Io(e.to_string()))
    }
}
