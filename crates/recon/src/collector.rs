use crate::error::SheetError;
use crate::row::Row;
use crate::sheet::Sheet;

/// Folds rows into a [`Sheet`].
///
/// `combine` is associative and order-preserving, so partial sheets built
/// from adjacent partitions can be merged in any grouping and still yield the
/// sequential result.
#[derive(Debug, Clone)]
pub struct SheetCollector {
    id_column: String,
}

impl SheetCollector {
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
        }
    }

    /// Empty accumulator.
    pub fn supply(&self) -> Sheet {
        Sheet::new(self.id_column.clone())
    }

    pub fn accumulate(&self, sheet: &mut Sheet, row: Row) -> Result<(), SheetError> {
        sheet.add_row(row)
    }

    /// Insert every row of `right` into `left`. Last writer wins per id;
    /// `left`'s order comes first, followed by ids new in `right`. Columns of
    /// `right` are carried over even when its rows end up overwritten.
    pub fn combine(&self, mut left: Sheet, right: Sheet) -> Result<Sheet, SheetError> {
        left.add_columns(right.headers());
        for row in right.into_rows() {
            left.add_row(row)?;
        }
        Ok(left)
    }

    pub fn collect<I>(&self, rows: I) -> Result<Sheet, SheetError>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut sheet = self.supply();
        for row in rows {
            self.accumulate(&mut sheet, row)?;
        }
        Ok(sheet)
    }
}
