//! Essential (Dirichlet) boundary conditions.
//!
//! Prescribed values are imposed by row/column elimination on the assembled
//! system:
//!
//! ```text
//! f_r  -= K_rc · ū_c     for every free row r, constrained column c
//! K_rc  = K_cr = 0       for every constrained c, r ≠ c
//! K_cc  = 1,  f_c = ū_c
//! ```
//!
//! The reduced matrix stays symmetric and the free equations keep the
//! coupling to non-zero prescribed values. Applying the same set twice, or in
//! a different order, gives the same system.

use crate::error::{Error, Result};
use crate::sparse::CsrMatrix;
use log::debug;
use nalgebra_sparse::SparseEntry;

/// A prescribed value on one global DOF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dirichlet {
    /// Global DOF index.
    pub dof: usize,
    /// Prescribed value.
    pub value: f64,
}

impl Dirichlet {
    /// Constraint on a global DOF.
    pub fn new(dof: usize, value: f64) -> Self {
        Self { dof, value }
    }

    /// Constraint on `component` of `node` for a field with `dofs_per_node`
    /// unknowns per node.
    pub fn at_node(
        node: usize,
        component: usize,
        dofs_per_node: usize,
        value: f64,
    ) -> Result<Self> {
        if component >= dofs_per_node {
            return Err(Error::DimensionMismatch(format!(
                "component {} on a field with {} DOFs per node",
                component, dofs_per_node
            )));
        }
        Ok(Self::new(node * dofs_per_node + component, value))
    }

    /// Zero every component of the given nodes.
    pub fn clamp(nodes: &[usize], dofs_per_node: usize) -> Vec<Self> {
        nodes
            .iter()
            .flat_map(|&node| {
                (0..dofs_per_node).map(move |c| Self::new(node * dofs_per_node + c, 0.0))
            })
            .collect()
    }
}

/// Impose `constraints` on `matrix` and `rhs` in place.
///
/// A DOF listed more than once keeps its last value.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the matrix is not square, `rhs` has the
///   wrong length, a DOF is out of range, or a constrained DOF has no stored
///   diagonal entry. Nothing is modified in that case.
pub fn apply_dirichlet(
    matrix: &mut CsrMatrix,
    rhs: &mut [f64],
    constraints: &[Dirichlet],
) -> Result<()> {
    let n = matrix.nrows();
    if matrix.ncols() != n || rhs.len() != n {
        return Err(Error::DimensionMismatch(format!(
            "{}x{} matrix with right-hand side of length {}",
            n,
            matrix.ncols(),
            rhs.len()
        )));
    }

    let mut prescribed: Vec<Option<f64>> = vec![None; n];
    for bc in constraints {
        if bc.dof >= n {
            return Err(Error::DimensionMismatch(format!(
                "constrained DOF {} out of range ({} DOFs)",
                bc.dof, n
            )));
        }
        if !matches!(matrix.get_entry(bc.dof, bc.dof), Some(SparseEntry::NonZero(_))) {
            return Err(Error::DimensionMismatch(format!(
                "no stored diagonal entry for constrained DOF {}",
                bc.dof
            )));
        }
        prescribed[bc.dof] = Some(bc.value);
    }

    // move known values to the right-hand side of the free equations
    for (r, row) in matrix.row_iter().enumerate() {
        if prescribed[r].is_some() {
            continue;
        }
        for (&c, &k) in row.col_indices().iter().zip(row.values()) {
            if let Some(value) = prescribed[c] {
                rhs[r] -= k * value;
            }
        }
    }

    for (r, mut row) in matrix.row_iter_mut().enumerate() {
        let row_fixed = prescribed[r].is_some();
        let (cols, values) = row.cols_and_values_mut();
        for (&c, k) in cols.iter().zip(values.iter_mut()) {
            if row_fixed || prescribed[c].is_some() {
                *k = if r == c { 1.0 } else { 0.0 };
            }
        }
    }

    let mut n_fixed = 0;
    for (dof, value) in prescribed.iter().enumerate() {
        if let Some(value) = value {
            rhs[dof] = *value;
            n_fixed += 1;
        }
    }

    debug!("applied {} Dirichlet constraints on {} DOFs", n_fixed, n);
    Ok(())
}
