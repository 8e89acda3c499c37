//! Rank-2 host matrix

use crate::error::{checked_cell_count, ForgeResult, MatForgeError};

/// Row-major 2-D matrix of `f32` cells in host memory
///
/// Fields are private so that `cells.len() == rows * columns` holds for every
/// value that exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Mat2D {
    rows: usize,
    columns: usize,
    cells: Vec<f32>,
}

impl Mat2D {
    /// Build a matrix from a flat row-major buffer.
    ///
    /// Copies the first `rows * columns` values of `values`; element `(i, j)`
    /// comes from `values[i * columns + j]`. Extra trailing values are ignored.
    ///
    /// # Errors
    /// - `InvalidDimensions` if either dimension is zero
    /// - `OutOfRange` if `values` is shorter than `rows * columns`
    pub fn from_slice(values: &[f32], rows: usize, columns: usize) -> ForgeResult<Self> {
        let count = checked_cell_count(rows, columns)?;
        if values.len() < count {
            return Err(MatForgeError::OutOfRange {
                required: count,
                actual: values.len(),
            });
        }

        tracing::trace!(rows, columns, "Mat2D::from_slice: copying {} cells", count);
        Ok(Self {
            rows,
            columns,
            cells: values[..count].to_vec(),
        })
    }

    /// Take ownership of a buffer whose length is exactly `rows * columns`
    pub fn from_vec(cells: Vec<f32>, rows: usize, columns: usize) -> ForgeResult<Self> {
        let count = checked_cell_count(rows, columns)?;
        if cells.len() != count {
            return Err(MatForgeError::ShapeMismatch {
                expected: count,
                actual: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Zero-filled matrix
    pub fn zeros(rows: usize, columns: usize) -> ForgeResult<Self> {
        let count = checked_cell_count(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            cells: vec![0.0; count],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed matrix; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Size of the cell buffer in bytes
    pub fn byte_size(&self) -> usize {
        std::mem::size_of_val(self.cells.as_slice())
    }

    /// Row-major cell buffer
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Cell at `(row, column)`, or `None` when out of bounds
    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Borrow one row
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.cells[start..start + self.columns])
    }

    /// Iterate rows in order
    pub fn iter_rows(&self) -> std::slice::ChunksExact<'_, f32> {
        self.cells.chunks_exact(self.columns)
    }

    /// Consume the matrix and return its buffer
    pub fn into_cells(self) -> Vec<f32> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_copies_row_major() {
        let m = Mat2D::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.cells(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.get(0, 2), Some(3.0));
        assert_eq!(m.get(1, 0), Some(4.0));
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_from_slice_ignores_trailing_values() {
        let m = Mat2D::from_slice(&[1.0, 2.0, 3.0, 4.0, 99.0], 2, 2).unwrap();
        assert_eq!(m.cells(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_from_slice_short_buffer_is_out_of_range() {
        let err = Mat2D::from_slice(&[1.0, 2.0, 3.0, 4.0], 2, 3).unwrap_err();
        assert!(matches!(
            err,
            MatForgeError::OutOfRange {
                required: 6,
                actual: 4
            }
        ));
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Mat2D::from_slice(&[1.0], 0, 1),
            Err(MatForgeError::InvalidDimensions { rows: 0, columns: 1 })
        ));
        assert!(matches!(
            Mat2D::zeros(3, 0),
            Err(MatForgeError::InvalidDimensions { rows: 3, columns: 0 })
        ));
    }

    #[test]
    fn test_from_vec_requires_exact_length() {
        assert!(Mat2D::from_vec(vec![0.0; 6], 3, 2).is_ok());
        assert!(matches!(
            Mat2D::from_vec(vec![0.0; 7], 3, 2),
            Err(MatForgeError::ShapeMismatch {
                expected: 6,
                actual: 7
            })
        ));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let m = Mat2D::zeros(2, 2).unwrap();
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
        assert!(m.row(2).is_none());
    }

    #[test]
    fn test_byte_size_and_rows() {
        let m = Mat2D::zeros(3, 4).unwrap();
        assert_eq!(m.byte_size(), 48);
        assert_eq!(m.iter_rows().count(), 3);
        assert!(m.iter_rows().all(|r| r.len() == 4));
    }
}
