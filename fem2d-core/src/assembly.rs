//! Parallel finite element assembly.
//!
//! Assembles the global stiffness matrix and load vector from element
//! contributions. Element matrices are computed with Rayon, then scattered
//! into the triplet builder sequentially in element order, so the summation
//! order and therefore the result are identical for serial and parallel runs.

use crate::boundary::{apply_dirichlet, Dirichlet};
use crate::element::{create_element, Element, Physics};
use crate::error::{Error, Result};
use crate::mesh::{element_dofs, ElementType, Mesh};
use crate::solver::Solver;
use crate::sparse::{CsrMatrix, TripletMatrix};
use crate::types::Point2;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use std::collections::HashMap;

/// Assembly options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Compute element matrices on the Rayon thread pool.
    pub parallel: bool,
    /// Quadrature order override; `None` uses each element type's default.
    pub quadrature_order: Option<usize>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            quadrature_order: None,
        }
    }
}

/// Assembled system ready for constraints and solving.
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    /// Global stiffness (conductance) matrix, full diagonal stored.
    pub stiffness: CsrMatrix,
    /// Right-hand side (load) vector.
    pub rhs: Vec<f64>,
    /// Unknowns per node.
    pub dofs_per_node: usize,
}

impl GlobalSystem {
    /// Number of DOFs in the system.
    pub fn n_dofs(&self) -> usize {
        self.rhs.len()
    }

    /// Add a point load (or point heat source) on one nodal component.
    pub fn add_nodal_load(&mut self, node: usize, component: usize, value: f64) -> Result<()> {
        if component >= self.dofs_per_node {
            return Err(Error::DimensionMismatch(format!(
                "component {} on a field with {} DOFs per node",
                component, self.dofs_per_node
            )));
        }
        let dof = node * self.dofs_per_node + component;
        let n = self.rhs.len();
        let slot = self.rhs.get_mut(dof).ok_or_else(|| {
            Error::DimensionMismatch(format!("node {} out of range ({} DOFs)", node, n))
        })?;
        *slot += value;
        Ok(())
    }

    /// Add the consistent load of a uniform source over every element.
    pub fn add_body_load(
        &mut self,
        mesh: &Mesh,
        physics: &Physics,
        source: &[f64],
        options: &AssemblyOptions,
    ) -> Result<()> {
        if physics.dofs_per_node() != self.dofs_per_node {
            return Err(Error::DimensionMismatch(format!(
                "physics has {} DOFs per node, system has {}",
                physics.dofs_per_node(),
                self.dofs_per_node
            )));
        }
        let loads = element_loads(mesh, physics, source, options)?;
        scatter_vector(&mut self.rhs, &loads, mesh.elements(), self.dofs_per_node)
    }

    /// Impose Dirichlet constraints on the matrix and right-hand side.
    pub fn apply_dirichlet(&mut self, constraints: &[Dirichlet]) -> Result<()> {
        apply_dirichlet(&mut self.stiffness, &mut self.rhs, constraints)
    }

    /// Solve the system with the given solver.
    pub fn solve(&self, solver: &dyn Solver) -> Result<Vec<f64>> {
        debug!("solving {} DOFs with {}", self.n_dofs(), solver.name());
        solver.solve(&self.stiffness, &self.rhs)
    }
}

/// Add element matrices into a global triplet builder.
///
/// `element_matrices[e]` is scattered at the DOFs of `connectivity[e]`,
/// strictly in element order.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the slices disagree in length, a block does
/// not match its DOF count, or a DOF lies outside the builder.
pub fn scatter_matrix<C: AsRef<[usize]>>(
    global: &mut TripletMatrix,
    element_matrices: &[DMatrix<f64>],
    connectivity: &[C],
    dofs_per_node: usize,
) -> Result<()> {
    if element_matrices.len() != connectivity.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} element matrices for {} elements",
            element_matrices.len(),
            connectivity.len()
        )));
    }
    for (e, (ke, nodes)) in element_matrices.iter().zip(connectivity).enumerate() {
        let dofs = element_dofs(nodes.as_ref(), dofs_per_node);
        global
            .add_submatrix(&dofs, ke)
            .map_err(|err| err.at_element(e))?;
    }
    Ok(())
}

/// Add element vectors into a global vector.
pub fn scatter_vector<C: AsRef<[usize]>>(
    global: &mut [f64],
    element_vectors: &[DVector<f64>],
    connectivity: &[C],
    dofs_per_node: usize,
) -> Result<()> {
    if element_vectors.len() != connectivity.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} element vectors for {} elements",
            element_vectors.len(),
            connectivity.len()
        )));
    }
    for (e, (fe, nodes)) in element_vectors.iter().zip(connectivity).enumerate() {
        let dofs = element_dofs(nodes.as_ref(), dofs_per_node);
        if fe.len() != dofs.len() {
            return Err(Error::DimensionMismatch(format!(
                "element {}: vector of length {} for {} DOFs",
                e,
                fe.len(),
                dofs.len()
            )));
        }
        if let Some(&bad) = dofs.iter().find(|&&d| d >= global.len()) {
            return Err(Error::DimensionMismatch(format!(
                "element {}: DOF {} out of range ({} DOFs)",
                e,
                bad,
                global.len()
            )));
        }
        for (&dof, &value) in dofs.iter().zip(fe.iter()) {
            global[dof] += value;
        }
    }
    Ok(())
}

/// One formulation per element type present in the mesh.
fn formulations(
    mesh: &Mesh,
    physics: &Physics,
    options: &AssemblyOptions,
) -> Result<HashMap<ElementType, Box<dyn Element>>> {
    let mut map: HashMap<ElementType, Box<dyn Element>> = HashMap::new();
    for conn in mesh.elements() {
        if !map.contains_key(&conn.element_type) {
            let element = create_element(conn.element_type, physics, options.quadrature_order)?;
            map.insert(conn.element_type, element);
        }
    }
    Ok(map)
}

/// Evaluate `f(index, element, coords)` on every element, in parallel if
/// requested.
///
/// Results keep element order; the first failing element (by index) wins.
pub(crate) fn map_elements<T, F>(
    mesh: &Mesh,
    physics: &Physics,
    options: &AssemblyOptions,
    f: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize, &dyn Element, &[Point2]) -> Result<T> + Sync,
{
    let elements = formulations(mesh, physics, options)?;

    let compute = |idx: usize| -> Result<T> {
        let conn = &mesh.elements()[idx];
        let element = elements.get(&conn.element_type).ok_or_else(|| {
            Error::Mesh(format!("no formulation for {:?}", conn.element_type))
        })?;
        let coords: Vec<_> = conn.nodes.iter().map(|&n| mesh.nodes()[n]).collect();
        f(idx, element.as_ref(), &coords).map_err(|err| {
            if let Error::DegenerateElement { det, .. } = &err {
                warn!("element {} is degenerate (det J = {:e})", idx, det);
            }
            err.at_element(idx)
        })
    };

    let results: Vec<Result<T>> = if options.parallel {
        (0..mesh.n_elements()).into_par_iter().map(compute).collect()
    } else {
        (0..mesh.n_elements()).map(compute).collect()
    };
    results.into_iter().collect()
}

/// Element stiffness matrices in element order.
pub fn element_matrices(
    mesh: &Mesh,
    physics: &Physics,
    options: &AssemblyOptions,
) -> Result<Vec<DMatrix<f64>>> {
    map_elements(mesh, physics, options, |_, element, coords| element.stiffness(coords))
}

/// Consistent element loads for a uniform source, in element order.
pub fn element_loads(
    mesh: &Mesh,
    physics: &Physics,
    source: &[f64],
    options: &AssemblyOptions,
) -> Result<Vec<DVector<f64>>> {
    map_elements(mesh, physics, options, |_, element, coords| {
        element.body_load(coords, source)
    })
}

/// Assemble the global stiffness matrix and a zero load vector.
///
/// This is the main entry point for FEA assembly. It:
/// 1. Computes element stiffness matrices (in parallel by default)
/// 2. Scatters them in element order into a triplet builder
/// 3. Converts to CSR, summing duplicates
///
/// Any element failure aborts the whole assembly.
///
/// # Example
///
/// ```
/// use fem2d_core::assembly::{assemble, AssemblyOptions};
/// use fem2d_core::element::Physics;
/// use fem2d_core::material::ThermalMaterial;
/// use fem2d_core::mesh::{ElementType, Mesh};
/// use fem2d_core::types::Point2;
///
/// let mut mesh = Mesh::new();
/// mesh.add_node(Point2::new(0.0, 0.0));
/// mesh.add_node(Point2::new(1.0, 0.0));
/// mesh.add_node(Point2::new(0.0, 1.0));
/// mesh.add_element(ElementType::Tri3, vec![0, 1, 2]).unwrap();
///
/// let physics = Physics::Conduction(ThermalMaterial::new(1.0).unwrap());
/// let system = assemble(&mesh, &physics, &AssemblyOptions::default()).unwrap();
/// assert_eq!(system.n_dofs(), 3);
/// ```
pub fn assemble(mesh: &Mesh, physics: &Physics, options: &AssemblyOptions) -> Result<GlobalSystem> {
    let dofs_per_node = physics.dofs_per_node();
    let n_dofs = mesh.n_dofs(dofs_per_node);

    let matrices = element_matrices(mesh, physics, options)?;

    let nnz_estimate: usize = matrices.iter().map(|k| k.len()).sum::<usize>() + n_dofs;
    let mut triplet = TripletMatrix::with_capacity(n_dofs, n_dofs, nnz_estimate);
    scatter_matrix(&mut triplet, &matrices, mesh.elements(), dofs_per_node)?;
    triplet.add_diagonal_structure();

    debug!(
        "assembled {} elements, {} DOFs, {} triplets",
        mesh.n_elements(),
        n_dofs,
        triplet.nnz()
    );

    Ok(GlobalSystem {
        stiffness: triplet.to_csr()?,
        rhs: vec![0.0; n_dofs],
        dofs_per_node,
    })
}
