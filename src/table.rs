//! Homogeneous, immutable, row-major tables.
//!
//! [`Table`] is the data container exchanged with a compute engine: input
//! observations, weights, and every materialized output are tables. Rows are
//! observations, columns are features.

use std::ops::Range;

use thiserror::Error;

/// Errors raised when building or reading a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Buffer length does not equal `rows * columns`.
    #[error("buffer of {len} values cannot be wrapped as {rows}x{columns}")]
    ShapeMismatch {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        columns: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// Rows passed to [`Table::from_rows`] have different lengths.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        /// Offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },

    /// Requested row range lies outside the table.
    #[error("row range {start}..{end} out of bounds for {rows} rows")]
    RowRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Table row count.
        rows: usize,
    },
}

/// A dense `rows × columns` table stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    values: Vec<T>,
    rows: usize,
    columns: usize,
}

impl<T: Copy> Table<T> {
    /// Wrap a flat row-major buffer.
    ///
    /// The buffer must hold exactly `rows * columns` values. A table with zero
    /// columns must also have zero rows.
    pub fn wrap(values: impl Into<Vec<T>>, rows: usize, columns: usize) -> Result<Self, TableError> {
        let values = values.into();
        let len = values.len();
        if rows.checked_mul(columns) != Some(len) || (columns == 0 && rows != 0) {
            return Err(TableError::ShapeMismatch { rows, columns, len });
        }
        Ok(Self {
            values,
            rows,
            columns,
        })
    }

    /// A single-column table, one value per row.
    pub fn column(values: impl Into<Vec<T>>) -> Self {
        let values = values.into();
        let rows = values.len();
        Self {
            values,
            rows,
            columns: 1,
        }
    }

    /// An empty table with the given column count.
    pub fn empty(columns: usize) -> Self {
        Self {
            values: Vec::new(),
            rows: 0,
            columns,
        }
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, TableError> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * columns);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(TableError::RaggedRows {
                    row: i,
                    expected: columns,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Self::wrap(values, rows.len(), columns)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.row_count()`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.values[i * self.columns..(i + 1) * self.columns]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.values.chunks_exact(self.columns.max(1))
    }

    /// Single cell, or `None` when out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<T> {
        if row < self.rows && column < self.columns {
            Some(self.values[row * self.columns + column])
        } else {
            None
        }
    }

    /// Copy rows `range` into a flat row-major buffer.
    pub fn pull_rows(&self, range: Range<usize>) -> Result<Vec<T>, TableError> {
        if range.start > range.end || range.end > self.rows {
            return Err(TableError::RowRange {
                start: range.start,
                end: range.end,
                rows: self.rows,
            });
        }
        Ok(self.values[range.start * self.columns..range.end * self.columns].to_vec())
    }

    /// The whole table as a flat row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_checks_shape() {
        assert!(Table::wrap(vec![1.0, 2.0, 3.0], 3, 1).is_ok());
        assert_eq!(
            Table::wrap(vec![1.0, 2.0, 3.0, 4.0], 3, 1),
            Err(TableError::ShapeMismatch {
                rows: 3,
                columns: 1,
                len: 4
            })
        );
        assert!(Table::<f64>::wrap(Vec::new(), 2, 0).is_err());
        assert!(Table::<f64>::wrap(Vec::new(), 0, 0).is_ok());
    }

    #[test]
    fn rows_are_row_major() {
        let t = Table::wrap(vec![0.0, 5.0, 0.0, 1.0, 1.0, 4.0], 2, 3).unwrap();
        assert_eq!(t.row(0), &[0.0, 5.0, 0.0]);
        assert_eq!(t.row(1), &[1.0, 1.0, 4.0]);
        assert_eq!(t.rows().count(), 2);
        assert_eq!(t.get(1, 2), Some(4.0));
        assert_eq!(t.get(2, 0), None);
    }

    #[test]
    fn pull_rows_range() {
        let t = Table::wrap(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
        assert_eq!(t.pull_rows(1..3).unwrap(), vec![3, 4, 5, 6]);
        assert_eq!(t.pull_rows(0..0).unwrap(), Vec::<i32>::new());
        assert!(t.pull_rows(2..4).is_err());
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let ok = Table::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(ok.row_count(), 2);
        assert_eq!(ok.column_count(), 2);

        let err = Table::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_table_has_no_rows() {
        let t = Table::<f64>::empty(4);
        assert!(t.is_empty());
        assert_eq!(t.column_count(), 4);
        assert_eq!(t.rows().count(), 0);
    }
}
