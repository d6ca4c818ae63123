//! Element formulations.
//!
//! Assembly and recovery only see [`Element`] trait objects; which
//! topology and field sit behind one is decided by [`create_element`].
//!
//! - [`shape`] - Shape functions on the reference triangle and square
//! - [`gauss`] - Quadrature rules
//! - [`jacobian`] - Reference-to-physical mapping
//! - [`field`] - Scalar (conduction) and vector (elasticity) field strategies
//! - [`isoparametric`] - The generic integration loop
//! - [`bar`] - 1D two-node bar

use crate::error::Result;
use crate::material::{Material, PlaneCondition, ThermalMaterial};
use crate::mesh::ElementType;
use crate::types::Point2;
use nalgebra::{DMatrix, DVector};

pub mod bar;
pub mod field;
pub mod gauss;
pub mod isoparametric;
pub mod jacobian;
pub mod shape;

pub use bar::bar2_stiffness;
pub use field::{Conduction, Field, PlaneElasticity};
pub use gauss::{gauss_1d, gauss_quad, gauss_tri, quadrature, GaussPoint, QuadratureFamily};
pub use isoparametric::IsoparametricElement;
pub use jacobian::Jacobian;
pub use shape::ShapeFunctions;

/// Which field is solved for and with what material.
#[derive(Debug, Clone, PartialEq)]
pub enum Physics {
    /// Steady heat conduction, one temperature per node.
    Conduction(ThermalMaterial),
    /// Plane elasticity, two displacements per node.
    Elasticity {
        /// Isotropic material.
        material: Material,
        /// Plane stress or plane strain.
        condition: PlaneCondition,
        /// Out-of-plane thickness.
        thickness: f64,
    },
}

impl Physics {
    /// Plane stress elasticity.
    pub fn plane_stress(material: Material, thickness: f64) -> Self {
        Physics::Elasticity {
            material,
            condition: PlaneCondition::Stress,
            thickness,
        }
    }

    /// Plane strain elasticity.
    pub fn plane_strain(material: Material, thickness: f64) -> Self {
        Physics::Elasticity {
            material,
            condition: PlaneCondition::Strain,
            thickness,
        }
    }

    /// Unknowns per node.
    pub fn dofs_per_node(&self) -> usize {
        match self {
            Physics::Conduction(_) => 1,
            Physics::Elasticity { .. } => 2,
        }
    }
}

/// One element formulation, shared by all elements of a topology.
///
/// Implementors hold no per-element state; geometry is passed in on every
/// call, so a single instance serves the whole Rayon element stage.
pub trait Element: Send + Sync {
    /// Element topology.
    fn element_type(&self) -> ElementType;

    /// Nodes per element.
    fn n_nodes(&self) -> usize {
        self.element_type().n_nodes()
    }

    /// Degrees of freedom per node (1 for conduction, 2 for elasticity).
    fn dofs_per_node(&self) -> usize;

    /// Rows (and columns) of the element matrix.
    fn n_dofs(&self) -> usize {
        self.n_nodes() * self.dofs_per_node()
    }

    /// ∫ Bᵀ D B t dA over the element with nodes at `coords`, node-major.
    fn stiffness(&self, coords: &[Point2]) -> Result<DMatrix<f64>>;

    /// Gradient operator B and det(J) at a parametric point.
    fn operator_at(&self, coords: &[Point2], xi: f64, eta: f64) -> Result<(DMatrix<f64>, f64)>;

    /// Material matrix D used between Bᵀ and B.
    fn material_matrix(&self) -> DMatrix<f64>;

    /// Consistent nodal load for a uniform source, one value per nodal unknown.
    fn body_load(&self, coords: &[Point2], source: &[f64]) -> Result<DVector<f64>>;

    /// Area from the same quadrature rule.
    fn area(&self, coords: &[Point2]) -> Result<f64>;
}

impl<F: Field> Element for IsoparametricElement<F> {
    fn element_type(&self) -> ElementType {
        IsoparametricElement::element_type(self)
    }

    fn dofs_per_node(&self) -> usize {
        self.field().dofs_per_node()
    }

    fn stiffness(&self, coords: &[Point2]) -> Result<DMatrix<f64>> {
        IsoparametricElement::stiffness(self, coords)
    }

    fn operator_at(&self, coords: &[Point2], xi: f64, eta: f64) -> Result<(DMatrix<f64>, f64)> {
        IsoparametricElement::operator_at(self, coords, xi, eta)
    }

    fn material_matrix(&self) -> DMatrix<f64> {
        self.field().material_matrix()
    }

    fn body_load(&self, coords: &[Point2], source: &[f64]) -> Result<DVector<f64>> {
        IsoparametricElement::body_load(self, coords, source)
    }

    fn area(&self, coords: &[Point2]) -> Result<f64> {
        IsoparametricElement::area(self, coords)
    }
}

/// Build the formulation for an element type and physics.
///
/// `order` overrides the default quadrature rule of the element type.
pub fn create_element(
    element_type: ElementType,
    physics: &Physics,
    order: Option<usize>,
) -> Result<Box<dyn Element>> {
    match physics {
        Physics::Conduction(thermal) => Ok(Box::new(IsoparametricElement::new(
            element_type,
            Conduction::new(thermal),
            order,
        )?)),
        Physics::Elasticity {
            material,
            condition,
            thickness,
        } => Ok(Box::new(IsoparametricElement::new(
            element_type,
            PlaneElasticity::new(material, *condition, *thickness)?,
            order,
        )?)),
    }
}
