//! Direct solvers for the constrained system K u = f.
//!
//! # Backends
//!
//! - [`CholeskySolver`]: Sparse Cholesky factorization using the faer library.
//!   Stiffness and conductance matrices are symmetric positive definite once
//!   enough DOFs are constrained, so this is the default for real meshes.
//! - [`DenseLuSolver`]: nalgebra dense LU, for small systems and tests.
//!
//! A system that is missing constraints (rigid-body motion, floating
//! temperature) fails the Cholesky pivot check and is reported as
//! [`Error::SingularMatrix`].

use crate::error::{Error, Result};
use crate::sparse::CsrMatrix;
use faer::linalg::cholesky::llt::factor::LltError;
use faer::prelude::*;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::linalg::LltError as SparseLltError;
use faer::sparse::{SparseColMat, Triplet};
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Backend that solves K u = f for a square CSR matrix.
pub trait Solver: Send + Sync {
    /// Return u. A matrix the backend cannot factor is reported as
    /// [`Error::SingularMatrix`].
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>>;

    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;
}

/// Which backend [`select_solver`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverType {
    /// Sparse Cholesky.
    Direct,
    /// Dense LU.
    DenseLu,
    /// Dense LU below [`SolverConfig::auto_threshold`] DOFs, sparse Cholesky above.
    #[default]
    Auto,
}

/// Backend choice.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Backend, or automatic choice by size.
    pub solver_type: SolverType,
    /// DOF count from which [`SolverType::Auto`] switches to Cholesky.
    pub auto_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            solver_type: SolverType::Auto,
            auto_threshold: 500,
        }
    }
}

fn check_system(matrix: &CsrMatrix, rhs: &[f64]) -> Result<()> {
    if matrix.nrows() != matrix.ncols() {
        return Err(Error::Solver(format!(
            "matrix must be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    if matrix.nrows() != rhs.len() {
        return Err(Error::DimensionMismatch(format!(
            "right-hand side of length {} for {} unknowns",
            rhs.len(),
            matrix.nrows()
        )));
    }
    Ok(())
}

/// Direct solver using nalgebra dense LU factorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseLuSolver;

impl DenseLuSolver {
    /// Dense LU backend.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for DenseLuSolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        check_system(matrix, rhs)?;
        let n = matrix.nrows();
        if n == 0 {
            return Ok(vec![]);
        }

        DMatrix::from(matrix)
            .lu()
            .solve(&DVector::from_column_slice(rhs))
            .map(|u| u.iter().copied().collect())
            .ok_or_else(|| Error::SingularMatrix("LU factorization found a zero pivot".into()))
    }

    fn name(&self) -> &str {
        "Dense LU"
    }
}

/// Copy a CSR matrix into faer's column-major sparse format.
fn csr_to_faer_csc(csr: &CsrMatrix) -> Result<SparseColMat<usize, f64>> {
    let triplets: Vec<Triplet<usize, usize, f64>> = csr
        .triplet_iter()
        .map(|(r, c, &v)| Triplet::new(r, c, v))
        .collect();
    SparseColMat::try_new_from_triplets(csr.nrows(), csr.ncols(), &triplets)
        .map_err(|e| Error::Solver(format!("failed to convert matrix: {:?}", e)))
}

/// faer sparse LLᵀ with a fresh symbolic analysis per solve.
///
/// Only the lower triangle is read, so the matrix must be symmetric.
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

impl CholeskySolver {
    /// Sparse Cholesky backend.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for CholeskySolver {
    fn solve(&self, matrix: &CsrMatrix, rhs: &[f64]) -> Result<Vec<f64>> {
        check_system(matrix, rhs)?;
        let n = matrix.nrows();
        if n == 0 {
            return Ok(vec![]);
        }

        let csc = csr_to_faer_csc(matrix)?;
        let csc_ref = csc.as_ref();

        let symbolic = SymbolicLlt::try_new(csc_ref.symbolic(), faer::Side::Lower)
            .map_err(|e| Error::Solver(format!("symbolic Cholesky analysis failed: {:?}", e)))?;

        let llt = Llt::try_new_with_symbolic(symbolic, csc_ref, faer::Side::Lower).map_err(
            |e| match e {
                SparseLltError::Generic(err) => {
                    Error::Solver(format!("sparse Cholesky error: {:?}", err))
                }
                SparseLltError::Numeric(LltError::NonPositivePivot { index }) => {
                    Error::SingularMatrix(format!(
                        "matrix is not positive definite at pivot {} (missing constraints?)",
                        index
                    ))
                }
            },
        )?;

        let mut u = faer::Mat::from_fn(n, 1, |i, _| rhs[i]);
        llt.solve_in_place(u.as_mut());
        Ok(u.col(0).iter().copied().collect())
    }

    fn name(&self) -> &str {
        "faer Sparse Cholesky (LLᵀ)"
    }
}

/// Backend for a system of `n_dofs` unknowns.
pub fn select_solver(config: &SolverConfig, n_dofs: usize) -> Box<dyn Solver> {
    let solver: Box<dyn Solver> = match config.solver_type {
        SolverType::Direct => Box::new(CholeskySolver::new()),
        SolverType::DenseLu => Box::new(DenseLuSolver::new()),
        SolverType::Auto if n_dofs < config.auto_threshold => Box::new(DenseLuSolver::new()),
        SolverType::Auto => Box::new(CholeskySolver::new()),
    };
    debug!("selected {} for {} DOFs", solver.name(), n_dofs);
    solver
}
