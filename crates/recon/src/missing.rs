use crate::differ::RowDiffer;
use crate::error::DiffError;
use crate::row::Row;
use crate::sheet::Sheet;

/// Rows of `against` whose id is absent from `from`, sorted by id and
/// projected onto the reconciled columns as a self-diff.
pub fn missing_records(
    differ: &RowDiffer<'_>,
    from: &Sheet,
    against: &Sheet,
) -> Result<Vec<Row>, DiffError> {
    let mut absent: Vec<&Row> = against
        .rows()
        .iter()
        .filter(|r| !from.contains(r.id()))
        .collect();
    absent.sort();

    absent
        .into_iter()
        .map(|r| {
            differ
                .diff(r, r, true)
                .map(|d| d.row)
                .map_err(|source| DiffError::Row {
                    id: r.id().to_string(),
                    source,
                })
        })
        .collect()
}
