use rayon::prelude::*;

use crate::collector::SheetCollector;
use crate::differ::RowDiffer;
use crate::error::{DiffError, SheetError, SourceError};
use crate::headers::reconcile_headers;
use crate::messages::Message;
use crate::missing::missing_records;
use crate::report::Reporter;
use crate::row::Row;
use crate::sheet::Sheet;
use crate::source::{RecordSink, RecordSource};
use crate::{DIFF_MARKER_A, DIFF_MARKER_B, RECORD_MARKER_A, RECORD_MARKER_B};

/// Options for one diff run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    pub id_column: String,
    pub zero_matches_null: bool,
    pub show_identical: bool,
    pub show_missing: bool,
    pub parallel: bool,
}

impl DiffOptions {
    /// Defaults: zero matches null, identical cells shown, missing-record
    /// blocks off, sequential.
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            zero_matches_null: true,
            show_identical: true,
            show_missing: false,
            parallel: false,
        }
    }
}

/// A named input; the name is what the report refers to.
#[derive(Debug, Clone, Copy)]
pub struct DiffInput<'n, S> {
    pub name: &'n str,
    pub source: S,
}

impl<'n, S> DiffInput<'n, S> {
    pub fn new(name: &'n str, source: S) -> Self {
        Self { name, source }
    }
}

/// The named output and a factory that opens it. `open` is only called once
/// the run has decided to write.
pub struct DiffOutput<'n, F> {
    pub name: &'n str,
    pub open: F,
}

impl<'n, F> DiffOutput<'n, F> {
    pub fn new(name: &'n str, open: F) -> Self {
        Self { name, open }
    }
}

/// What a successful run amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The inputs share no column.
    NoCommonColumns,
    /// No record id survived into the diff.
    NoMatchingRecords,
    /// Same columns, same records, same cells. Nothing was written.
    Identical,
    Written(DiffSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Diff rows for records present in both inputs (marker blocks excluded).
    pub diff_rows: usize,
    /// Ids only present in B, sorted.
    pub missing_from_a: Vec<String>,
    /// Ids only present in A, sorted.
    pub missing_from_b: Vec<String>,
    pub columns_missing_from_a: Vec<String>,
    pub columns_missing_from_b: Vec<String>,
    pub has_diff: bool,
}

/// Diff of the records both sheets share, plus whether any cell differed.
#[derive(Debug, Clone)]
pub struct CommonDiff {
    pub sheet: Sheet,
    pub has_diff: bool,
}

/// Key-based diff of two tabular inputs.
#[derive(Debug, Clone)]
pub struct Diff {
    options: DiffOptions,
}

impl Diff {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Parse both inputs, then diff them as [`Diff::run_sheets`] does.
    pub fn run<A, B, F, S>(
        &self,
        a: DiffInput<'_, A>,
        b: DiffInput<'_, B>,
        output: DiffOutput<'_, F>,
        reporter: &mut dyn Reporter,
    ) -> Result<Outcome, DiffError>
    where
        A: RecordSource,
        B: RecordSource,
        F: FnOnce() -> Result<S, SourceError>,
        S: RecordSink,
    {
        let (name_a, name_b) = (a.name, b.name);
        let sheet_a = self.parse(a, reporter)?;
        let sheet_b = self.parse(b, reporter)?;
        self.run_sheets(
            DiffInput::new(name_a, &sheet_a),
            DiffInput::new(name_b, &sheet_b),
            output,
            reporter,
        )
    }

    fn parse<S: RecordSource>(
        &self,
        input: DiffInput<'_, S>,
        reporter: &mut dyn Reporter,
    ) -> Result<Sheet, DiffError> {
        match Sheet::parse(&self.options.id_column, input.source) {
            Ok(sheet) => {
                log::debug!("{}: {} rows, {} columns", input.name, sheet.len(), sheet.headers().len());
                Ok(sheet)
            }
            Err(source) => {
                reporter.error(&Message::ParseCsvFail(input.name.to_string()).to_string());
                Err(DiffError::Parse {
                    input: input.name.to_string(),
                    source,
                })
            }
        }
    }

    /// Diff two already built sheets. Both must be keyed on the configured id
    /// column.
    pub fn run_sheets<F, S>(
        &self,
        a: DiffInput<'_, &Sheet>,
        b: DiffInput<'_, &Sheet>,
        output: DiffOutput<'_, F>,
        reporter: &mut dyn Reporter,
    ) -> Result<Outcome, DiffError>
    where
        F: FnOnce() -> Result<S, SourceError>,
        S: RecordSink,
    {
        let opts = &self.options;
        for sheet in [a.source, b.source] {
            if sheet.id_column() != opts.id_column {
                return Err(DiffError::Assemble(SheetError::RowIdColumnMismatch {
                    expected: opts.id_column.clone(),
                    found: sheet.id_column().to_string(),
                }));
            }
        }

        let Some(headers) = reconcile_headers(a.source, b.source) else {
            reporter.message(&Message::NoMatchingCols);
            return Ok(Outcome::NoCommonColumns);
        };
        log::debug!("{} common columns", headers.common.len());
        reporter.list(&Message::ColumnsMissing(a.name.to_string()), &as_strs(&headers.missing_from_a));
        reporter.list(&Message::ColumnsMissing(b.name.to_string()), &as_strs(&headers.missing_from_b));

        let differ = RowDiffer::new(&headers.common, &opts.id_column, opts.zero_matches_null);
        let CommonDiff { mut sheet, has_diff } = self.diff_common(&differ, a.source, b.source)?;
        if sheet.is_empty() {
            reporter.message(&Message::NoMatchingRecords);
            return Ok(Outcome::NoMatchingRecords);
        }
        let diff_rows = sheet.len();

        let missing_a = missing_records(&differ, a.source, b.source)?;
        let missing_b = missing_records(&differ, b.source, a.source)?;
        log::debug!(
            "{diff_rows} diff rows, {} missing from {}, {} missing from {}",
            missing_a.len(),
            a.name,
            missing_b.len(),
            b.name
        );
        let ids_a: Vec<&str> = missing_a.iter().map(Row::id).collect();
        let ids_b: Vec<&str> = missing_b.iter().map(Row::id).collect();
        reporter.list(&Message::RecordsNotFound(a.name.to_string()), &ids_a);
        reporter.list(&Message::RecordsNotFound(b.name.to_string()), &ids_b);

        if !has_diff {
            reporter.message(&Message::CommonRecordsIdentical);
            if missing_a.is_empty() && missing_b.is_empty() {
                reporter.message(&Message::SameRecords);
                if headers.same_columns() {
                    reporter.message(&Message::SameHeaders);
                    reporter.message(&Message::IdenticalFile);
                    return Ok(Outcome::Identical);
                }
            }
        }

        let summary = DiffSummary {
            diff_rows,
            missing_from_a: ids_a.iter().map(|s| s.to_string()).collect(),
            missing_from_b: ids_b.iter().map(|s| s.to_string()).collect(),
            columns_missing_from_a: headers.missing_from_a.clone(),
            columns_missing_from_b: headers.missing_from_b.clone(),
            has_diff,
        };

        if opts.show_missing {
            self.append_block(&mut sheet, RECORD_MARKER_A, DIFF_MARKER_A, &missing_a)?;
            self.append_block(&mut sheet, RECORD_MARKER_B, DIFF_MARKER_B, &missing_b)?;
        }

        let sink = (output.open)().map_err(|source| DiffError::Output {
            output: output.name.to_string(),
            source,
        })?;
        sheet.write(sink).map_err(|source| DiffError::Output {
            output: output.name.to_string(),
            source,
        })?;
        log::info!("wrote {} rows to {}", sheet.len(), output.name);
        reporter.message(&Message::WroteDiffs(output.name.to_string()));

        Ok(Outcome::Written(summary))
    }

    /// Diff every row of `a` whose id also appears in `b`, in `a`'s order.
    /// Rows without any populated cell besides the id are dropped unless
    /// identical cells are shown.
    pub fn diff_common(
        &self,
        differ: &RowDiffer<'_>,
        a: &Sheet,
        b: &Sheet,
    ) -> Result<CommonDiff, DiffError> {
        let collector = SheetCollector::new(self.options.id_column.clone());
        let show_identical = self.options.show_identical;
        let diff_pair = |row_a: &Row, row_b: &Row| {
            differ
                .diff(row_a, row_b, show_identical)
                .map_err(|source| DiffError::Row {
                    id: row_a.id().to_string(),
                    source,
                })
        };

        if !self.options.parallel {
            let mut sheet = collector.supply();
            let mut has_diff = false;
            for row_a in a.rows() {
                let Some(row_b) = b.row(row_a.id()) else {
                    continue;
                };
                let diff = diff_pair(row_a, row_b)?;
                has_diff |= diff.has_diff;
                if show_identical || !diff.row.is_empty() {
                    collector.accumulate(&mut sheet, diff.row)?;
                }
            }
            return Ok(CommonDiff { sheet, has_diff });
        }

        log::trace!("diffing {} rows on {} threads", a.len(), rayon::current_num_threads());
        let (sheet, has_diff) = a
            .rows()
            .par_iter()
            .filter_map(|row_a| b.row(row_a.id()).map(|row_b| (row_a, row_b)))
            .map(|(row_a, row_b)| diff_pair(row_a, row_b))
            .try_fold(
                || (collector.supply(), false),
                |(mut sheet, any), diff| {
                    let diff = diff?;
                    if show_identical || !diff.row.is_empty() {
                        collector.accumulate(&mut sheet, diff.row)?;
                    }
                    Ok::<_, DiffError>((sheet, any || diff.has_diff))
                },
            )
            .try_reduce(
                || (collector.supply(), false),
                |(left, l), (right, r)| Ok((collector.combine(left, right)?, l || r)),
            )?;
        Ok(CommonDiff { sheet, has_diff })
    }

    /// Marker row, then `rows` relabeled with `prefix` + id.
    fn append_block(
        &self,
        sheet: &mut Sheet,
        marker: &str,
        prefix: &str,
        rows: &[Row],
    ) -> Result<(), DiffError> {
        let id_column = self.options.id_column.as_str();
        let marker_row = Row::new(&[marker], &[id_column], id_column).map_err(|source| {
            DiffError::Row {
                id: marker.to_string(),
                source,
            }
        })?;
        sheet.add_row(marker_row)?;
        for row in rows {
            sheet.add_row(Row::with_id(row, format!("{prefix}{}", row.id())))?;
        }
        Ok(())
    }
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
