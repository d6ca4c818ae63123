//! Global sparse storage.
//!
//! Element blocks are collected as COO triplets and compressed to CSR once.
//! Assembled matrices always store the full diagonal, so constraint
//! elimination can write a unit pivot in place without changing the
//! sparsity pattern.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csr::CsrMatrix as NalgebraCsr;

/// Row-compressed global matrix.
pub type CsrMatrix = NalgebraCsr<f64>;

/// COO accumulator for the global matrix.
///
/// Repeated (row, col) pairs are summed in insertion order on conversion, so
/// a fixed insertion sequence always yields the same matrix.
#[derive(Debug, Clone)]
pub struct TripletMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletMatrix {
    /// Empty `n_rows` × `n_cols` accumulator.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self::with_capacity(n_rows, n_cols, 0)
    }

    /// Empty accumulator with room for `nnz_estimate` triplets.
    pub fn with_capacity(n_rows: usize, n_cols: usize, nnz_estimate: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::with_capacity(nnz_estimate),
            cols: Vec::with_capacity(nnz_estimate),
            values: Vec::with_capacity(nnz_estimate),
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.n_cols
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(Error::DimensionMismatch(format!(
                "entry ({}, {}) outside {}x{} matrix",
                row, col, self.n_rows, self.n_cols
            )));
        }
        Ok(())
    }

    /// Accumulate `value` at (row, col). Exact zeros are skipped.
    pub fn add(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        if value != 0.0 {
            self.rows.push(row);
            self.cols.push(col);
            self.values.push(value);
        }
        Ok(())
    }

    /// Scatter a dense element block; entry (i, j) lands at
    /// (dofs[i], dofs[j]).
    ///
    /// Nothing is inserted if any index is out of range.
    pub fn add_submatrix(&mut self, dofs: &[usize], block: &DMatrix<f64>) -> Result<()> {
        if block.shape() != (dofs.len(), dofs.len()) {
            return Err(Error::DimensionMismatch(format!(
                "{}x{} block for {} DOF indices",
                block.nrows(),
                block.ncols(),
                dofs.len()
            )));
        }
        for &dof in dofs {
            self.check_index(dof, dof)?;
        }

        for (j, &col) in dofs.iter().enumerate() {
            for (&row, &value) in dofs.iter().zip(block.column(j).iter()) {
                if value != 0.0 {
                    self.rows.push(row);
                    self.cols.push(col);
                    self.values.push(value);
                }
            }
        }
        Ok(())
    }

    /// Reserve a structural entry on every diagonal position.
    pub fn add_diagonal_structure(&mut self) {
        for i in 0..self.n_rows.min(self.n_cols) {
            self.rows.push(i);
            self.cols.push(i);
            self.values.push(0.0);
        }
    }

    /// Triplets collected so far, before duplicates are merged.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Compress to CSR, summing duplicates.
    pub fn to_csr(self) -> Result<CsrMatrix> {
        let coo = CooMatrix::try_from_triplets(
            self.n_rows,
            self.n_cols,
            self.rows,
            self.cols,
            self.values,
        )
        .map_err(|e| Error::DimensionMismatch(format!("invalid triplet data: {}", e)))?;

        Ok(CsrMatrix::from(&coo))
    }
}

/// y = A x for a CSR matrix.
pub fn csr_mul_vec(matrix: &CsrMatrix, x: &[f64]) -> Result<Vec<f64>> {
    if x.len() != matrix.ncols() {
        return Err(Error::DimensionMismatch(format!(
            "vector of length {} for {} columns",
            x.len(),
            matrix.ncols()
        )));
    }
    Ok(matrix
        .row_iter()
        .map(|row| {
            row.col_indices()
                .iter()
                .zip(row.values())
                .map(|(&c, &v)| v * x[c])
                .sum()
        })
        .collect())
}
