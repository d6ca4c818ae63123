//! fem2d-core - isoparametric 2D finite elements
//!
//! Linear static analysis on unstructured 2D meshes with:
//! - Three-node triangles, four-node quadrilaterals and six-node triangles
//! - Steady heat conduction (one unknown per node) and plane stress/strain
//!   elasticity (two unknowns per node) through one integration loop
//! - Parallel element computation using Rayon
//! - Sparse assembly (triplet → CSR) and Dirichlet elimination with lifting
//! - Direct solvers (faer sparse Cholesky, nalgebra dense LU)
//! - Center-point stress and heat-flux recovery with nodal averaging
//!
//! # Architecture
//!
//! - [`Element`] trait: element stiffness, gradient operator and body load
//! - [`Physics`]: selects the field (conduction or elasticity) per analysis
//! - [`Mesh`]: connectivity and nodal coordinates
//! - [`Material`] / [`ThermalMaterial`]: constitutive properties
//! - [`Solver`] trait: linear system solution strategies
//! - [`LinearAnalysis`]: assemble → load → constrain → solve

pub mod types;
pub mod element;
pub mod mesh;
pub mod material;
pub mod sparse;
pub mod assembly;
pub mod boundary;
pub mod solver;
pub mod stress;
pub mod analysis;
pub mod error;

pub use types::{Point2, PlaneStrain, PlaneStress};
pub use element::{create_element, Element, Physics};
pub use mesh::{ElementType, Mesh};
pub use material::{Material, PlaneCondition, ThermalMaterial};
pub use sparse::CsrMatrix;
pub use solver::{select_solver, Solver, SolverConfig};
pub use assembly::{assemble, AssemblyOptions, GlobalSystem};
pub use boundary::{apply_dirichlet, Dirichlet};
pub use analysis::{LinearAnalysis, Solution};
pub use error::{Error, Result};
