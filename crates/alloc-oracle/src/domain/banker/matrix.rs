//! Flat Row-Major Matrix
//!
//! # Memory Layout
//!
//! ```text
//! rows = 2, cols = 3
//!
//! data: [ a00 a01 a02 | a10 a11 a12 ]
//!         └─ row 0 ─┘   └─ row 1 ─┘
//! cell (i, j) = data[i * cols + j]
//! ```
//!
//! Shape is validated once by the constructors; afterwards every row slice
//! has exactly `cols` cells. A matrix with zero rows carries no column
//! information and is compatible with any column count.
//!
//! Both `rows` and `rows * cols` are bounded by [`MAX_CELLS`], the most
//! `u64` cells a single allocation can hold, so per-row scratch vectors
//! sized from a validated matrix never overflow either.

use std::mem::size_of;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// Dense `rows x cols` matrix of unit counts
///
/// Serialized as nested rows (`[[1, 0], [2, 3]]`) and validated on the way
/// back in.
///
/// # Example
///
/// ```rust
/// use alloc_oracle::Matrix;
///
/// let m = Matrix::from_rows(vec![vec![7, 5, 3], vec![3, 2, 2]]).unwrap();
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.cols(), 3);
/// assert_eq!(m[(1, 0)], 3);
/// assert_eq!(m.row(0), &[7, 5, 3]);
///
/// assert!(Matrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u64>,
}

/// Largest row count and cell count a matrix may have
pub const MAX_CELLS: usize = isize::MAX as usize / size_of::<u64>();

fn cell_count(rows: usize, cols: usize) -> OracleResult<usize> {
    rows.checked_mul(cols)
        .filter(|&cells| cells <= MAX_CELLS && rows <= MAX_CELLS)
        .ok_or(OracleError::MatrixTooLarge { rows, cols })
}

impl Matrix {
    /// All-zero matrix
    ///
    /// # Panics
    ///
    /// Panics if the shape exceeds [`MAX_CELLS`]; use
    /// [`Matrix::try_zeros`] for untrusted dimensions.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        match Self::try_zeros(rows, cols) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{err}"),
        }
    }

    /// All-zero matrix, rejecting shapes that cannot be allocated
    ///
    /// # Errors
    ///
    /// `MatrixTooLarge` if `rows` or `rows * cols` exceeds [`MAX_CELLS`].
    pub fn try_zeros(rows: usize, cols: usize) -> OracleResult<Self> {
        let cells = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0; cells],
        })
    }

    /// Build from nested rows
    ///
    /// # Errors
    ///
    /// `RaggedMatrix` if any row length differs from the first row's.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> OracleResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(OracleError::RaggedMatrix {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build from row-major cells
    ///
    /// # Errors
    ///
    /// - `MatrixTooLarge` if `rows` or `rows * cols` exceeds [`MAX_CELLS`]
    /// - `FlatLengthMismatch` if `data.len() != rows * cols`
    pub fn from_flat(rows: usize, cols: usize, data: Vec<u64>) -> OracleResult<Self> {
        let expected = cell_count(rows, cols)?;
        if data.len() != expected {
            return Err(OracleError::FlatLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows (processes)
    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (resource kinds)
    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell `(row, col)` if in range
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row `i` as a slice of exactly `cols` cells
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows`.
    #[inline]
    pub fn row(&self, i: usize) -> &[u64] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, i: usize) -> &mut [u64] {
        assert!(i < self.rows, "row {i} out of range for {} rows", self.rows);
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Row-major cells
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// True if this matrix can stand for `rows` processes over `cols` kinds
    #[inline]
    pub fn has_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && (self.rows == 0 || self.cols == cols)
    }

    /// Entrywise `self - other`
    ///
    /// Used to derive `need = max_demand - allocation`.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the shapes differ
    /// - `AllocationExceedsDemand` at the first cell where `other > self`
    pub fn checked_sub(&self, other: &Self) -> OracleResult<Self> {
        if self.rows != other.rows {
            return Err(OracleError::DimensionMismatch {
                what: "matrix rows",
                expected: self.rows,
                actual: other.rows,
            });
        }
        if !other.has_shape(self.rows, self.cols) {
            return Err(OracleError::DimensionMismatch {
                what: "matrix columns",
                expected: self.cols,
                actual: other.cols,
            });
        }

        let mut data = Vec::with_capacity(self.data.len());
        for (idx, (&lhs, &rhs)) in self.data.iter().zip(&other.data).enumerate() {
            let cell = lhs
                .checked_sub(rhs)
                .ok_or(OracleError::AllocationExceedsDemand {
                    process: idx / self.cols,
                    resource: idx % self.cols,
                })?;
            data.push(cell);
        }

        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = u64;

    fn index(&self, (row, col): (usize, usize)) -> &u64 {
        assert!(col < self.cols, "column {col} out of range for {} columns", self.cols);
        &self.row(row)[col]
    }
}

impl TryFrom<Vec<Vec<u64>>> for Matrix {
    type Error = OracleError;

    fn try_from(rows: Vec<Vec<u64>>) -> OracleResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<u64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.iter_rows().map(<[u64]>::to_vec).collect()
    }
}
