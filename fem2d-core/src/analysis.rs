//! End-to-end linear static analysis.
//!
//! Bundles a mesh, the physics, loads and constraints, then runs
//! assemble → loads → constraints → solve.
//!
//! # Example
//!
//! ```
//! use fem2d_core::analysis::LinearAnalysis;
//! use fem2d_core::element::Physics;
//! use fem2d_core::material::ThermalMaterial;
//! use fem2d_core::mesh::{ElementType, Mesh};
//! use fem2d_core::types::Point2;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_nodes([
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ]);
//! mesh.add_element(ElementType::Quad4, vec![0, 1, 2, 3]).unwrap();
//!
//! let physics = Physics::Conduction(ThermalMaterial::new(1.0).unwrap());
//! let solution = LinearAnalysis::new(&mesh, physics)
//!     .prescribe(0, 0, 10.0)
//!     .prescribe(3, 0, 10.0)
//!     .run()
//!     .unwrap();
//! assert!((solution.node_value(2, 0).unwrap() - 10.0).abs() < 1e-12);
//! ```

use crate::assembly::{assemble, AssemblyOptions};
use crate::boundary::Dirichlet;
use crate::element::Physics;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::solver::{select_solver, SolverConfig};
use crate::stress::{nodal_von_mises, recover_element_stresses, recover_heat_flux, StressField};
use log::debug;
use nalgebra::Vector2;

/// A concentrated load on one nodal component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodalLoad {
    /// Node index.
    pub node: usize,
    /// Component (0 = x, 1 = y; 0 for scalar fields).
    pub component: usize,
    /// Load value.
    pub value: f64,
}

/// Linear static analysis on a single mesh.
#[derive(Debug, Clone)]
pub struct LinearAnalysis<'a> {
    mesh: &'a Mesh,
    physics: Physics,
    loads: Vec<NodalLoad>,
    body_source: Option<Vec<f64>>,
    constraints: Vec<Dirichlet>,
    invalid_constraint: Option<Error>,
    assembly: AssemblyOptions,
    solver: SolverConfig,
}

impl<'a> LinearAnalysis<'a> {
    /// Analysis with no loads or constraints and default options.
    pub fn new(mesh: &'a Mesh, physics: Physics) -> Self {
        Self {
            mesh,
            physics,
            loads: Vec::new(),
            body_source: None,
            constraints: Vec::new(),
            invalid_constraint: None,
            assembly: AssemblyOptions::default(),
            solver: SolverConfig::default(),
        }
    }

    /// Add a concentrated nodal load.
    pub fn load(mut self, node: usize, component: usize, value: f64) -> Self {
        self.loads.push(NodalLoad {
            node,
            component,
            value,
        });
        self
    }

    /// Uniform source over the whole mesh (heat generation or body force).
    pub fn body_source(mut self, source: Vec<f64>) -> Self {
        self.body_source = Some(source);
        self
    }

    /// Prescribe the value of one nodal component.
    ///
    /// A component the physics does not have is reported by [`run`](Self::run).
    pub fn prescribe(mut self, node: usize, component: usize, value: f64) -> Self {
        let ndpn = self.physics.dofs_per_node();
        match Dirichlet::at_node(node, component, ndpn, value) {
            Ok(constraint) => self.constraints.push(constraint),
            Err(err) => {
                self.invalid_constraint.get_or_insert(err);
            }
        }
        self
    }

    /// Add constraints on global DOFs.
    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Dirichlet>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Assembly options.
    pub fn assembly_options(mut self, options: AssemblyOptions) -> Self {
        self.assembly = options;
        self
    }

    /// Solver configuration.
    pub fn solver_config(mut self, config: SolverConfig) -> Self {
        self.solver = config;
        self
    }

    /// Physics in use.
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Assemble, apply loads and constraints, and solve.
    pub fn run(&self) -> Result<Solution> {
        if let Some(err) = &self.invalid_constraint {
            return Err(err.clone());
        }
        let ndpn = self.physics.dofs_per_node();
        let mut system = assemble(self.mesh, &self.physics, &self.assembly)?;

        if let Some(source) = &self.body_source {
            system.add_body_load(self.mesh, &self.physics, source, &self.assembly)?;
        }
        for load in &self.loads {
            system.add_nodal_load(load.node, load.component, load.value)?;
        }

        system.apply_dirichlet(&self.constraints)?;

        let solver = select_solver(&self.solver, system.n_dofs());
        let values = system.solve(solver.as_ref())?;
        debug!(
            "solved {} DOFs ({} loads, {} constraints)",
            values.len(),
            self.loads.len(),
            self.constraints.len()
        );

        Ok(Solution {
            values,
            dofs_per_node: ndpn,
        })
    }

    /// Center-point stresses of an elasticity solution.
    pub fn element_stresses(&self, solution: &Solution) -> Result<StressField> {
        match &self.physics {
            Physics::Elasticity {
                material,
                condition,
                ..
            } => recover_element_stresses(self.mesh, material, *condition, solution.values()),
            Physics::Conduction(_) => Err(Error::WrongPhysics(
                "stress recovery needs an elasticity analysis".into(),
            )),
        }
    }

    /// Nodal-averaged von Mises stress of an elasticity solution.
    pub fn nodal_von_mises(&self, solution: &Solution) -> Result<Vec<f64>> {
        match &self.physics {
            Physics::Elasticity {
                material,
                condition,
                ..
            } => nodal_von_mises(self.mesh, material, *condition, solution.values()),
            Physics::Conduction(_) => Err(Error::WrongPhysics(
                "von Mises stress needs an elasticity analysis".into(),
            )),
        }
    }

    /// Element heat flux of a conduction solution.
    pub fn heat_flux(&self, solution: &Solution) -> Result<Vec<Vector2<f64>>> {
        match &self.physics {
            Physics::Conduction(thermal) => {
                recover_heat_flux(self.mesh, thermal, solution.values())
            }
            Physics::Elasticity { .. } => Err(Error::WrongPhysics(
                "heat flux needs a conduction analysis".into(),
            )),
        }
    }
}

/// Nodal solution of a linear analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    dofs_per_node: usize,
}

impl Solution {
    /// Global node-major solution vector.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume and return the solution vector.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Unknowns per node.
    pub fn dofs_per_node(&self) -> usize {
        self.dofs_per_node
    }

    /// Value of one nodal component.
    pub fn node_value(&self, node: usize, component: usize) -> Option<f64> {
        if component >= self.dofs_per_node {
            return None;
        }
        self.values.get(node * self.dofs_per_node + component).copied()
    }
}
