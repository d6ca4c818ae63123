//! Derived fields from a solved system.
//!
//! For every element, in parallel: gather the element's nodal values, take
//! ε = B u_e at the element center and σ = D ε.
//!
//! The center is (0, 0) for quadrilaterals and the centroid (1/3, 1/3) for
//! triangles. Nodal output averages the center values of all incident
//! elements with equal weight. That smooths element-wise jumps for display;
//! it is not a superconvergent recovery.
//!
//! The same machinery gives the heat flux q = -k ∇T for conduction results.

use crate::assembly::{map_elements, AssemblyOptions};
use crate::element::{Element, Physics};
use crate::error::{Error, Result};
use crate::material::{Material, PlaneCondition, ThermalMaterial};
use crate::mesh::Mesh;
use crate::types::{PlaneStrain, PlaneStress, Point2};
use nalgebra::{DVector, Vector2, Vector3};

/// Center-point strain and stress of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStress {
    /// Element index in the mesh.
    pub element_id: usize,
    /// Strain at the element center.
    pub strain: PlaneStrain,
    /// Stress at the element center.
    pub stress: PlaneStress,
}

impl ElementStress {
    /// Von Mises equivalent stress at the element center.
    pub fn von_mises(&self) -> f64 {
        self.stress.von_mises()
    }
}

/// Center-point stresses of a whole mesh, by element index.
#[derive(Debug, Clone, PartialEq)]
pub struct StressField {
    /// One entry per element.
    pub element_stresses: Vec<ElementStress>,
}

impl StressField {
    /// Entry of one element.
    pub fn element(&self, elem_id: usize) -> Option<&ElementStress> {
        self.element_stresses.get(elem_id)
    }

    /// Number of entries.
    pub fn n_elements(&self) -> usize {
        self.element_stresses.len()
    }

    /// Von Mises stress per element.
    pub fn von_mises_stresses(&self) -> Vec<f64> {
        self.element_stresses.iter().map(|es| es.von_mises()).collect()
    }

    /// Largest element von Mises stress, 0 for an empty field.
    pub fn max_von_mises(&self) -> f64 {
        self.element_stresses
            .iter()
            .map(|es| es.von_mises())
            .fold(0.0, f64::max)
    }
}

/// Gather the values of `nodes` from a global node-major vector.
pub fn element_values(
    global: &[f64],
    nodes: &[usize],
    dofs_per_node: usize,
) -> Result<DVector<f64>> {
    let mut values = DVector::zeros(nodes.len() * dofs_per_node);
    for (a, &node) in nodes.iter().enumerate() {
        for c in 0..dofs_per_node {
            let dof = node * dofs_per_node + c;
            values[a * dofs_per_node + c] = *global.get(dof).ok_or_else(|| {
                Error::DimensionMismatch(format!(
                    "solution of length {} has no DOF {}",
                    global.len(),
                    dof
                ))
            })?;
        }
    }
    Ok(values)
}

/// B u_e at a parametric point: strain for elasticity, ∇T for conduction.
pub fn element_gradient(
    element: &dyn Element,
    coords: &[Point2],
    values: &DVector<f64>,
    point: (f64, f64),
) -> Result<DVector<f64>> {
    let (b, _) = element.operator_at(coords, point.0, point.1)?;
    if b.ncols() != values.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} element values for {} DOFs",
            values.len(),
            b.ncols()
        )));
    }
    Ok(b * values)
}

/// Strain [ε_xx, ε_yy, γ_xy] of an elasticity element at a parametric point.
pub fn element_strain(
    element: &dyn Element,
    coords: &[Point2],
    displacements: &DVector<f64>,
    point: (f64, f64),
) -> Result<PlaneStrain> {
    let g = element_gradient(element, coords, displacements, point)?;
    if g.len() != 3 {
        return Err(Error::DimensionMismatch(format!(
            "strain needs a 3-row operator, element has {}",
            g.len()
        )));
    }
    Ok(PlaneStrain(Vector3::new(g[0], g[1], g[2])))
}

/// Center-point strain and stress of every element, from the node-major
/// displacement vector (u_x, u_y per node).
pub fn recover_element_stresses(
    mesh: &Mesh,
    material: &Material,
    condition: PlaneCondition,
    displacements: &[f64],
) -> Result<StressField> {
    // thickness scales integrals only, not the pointwise operator
    let physics = Physics::Elasticity {
        material: material.clone(),
        condition,
        thickness: 1.0,
    };
    let d = material.constitutive(condition);

    let element_stresses = map_elements(
        mesh,
        &physics,
        &AssemblyOptions::default(),
        |idx, element, coords| {
            let conn = &mesh.elements()[idx];
            let u_e = element_values(displacements, &conn.nodes, 2)?;
            let strain = element_strain(element, coords, &u_e, conn.element_type.center())?;
            Ok(ElementStress {
                element_id: idx,
                strain,
                stress: strain.stress(&d),
            })
        },
    )?;

    Ok(StressField { element_stresses })
}

/// Average one value per element onto the nodes.
///
/// Each node receives the arithmetic mean over the elements that contain it;
/// nodes with no incident element get 0.
pub fn nodal_average(mesh: &Mesh, element_values: &[f64]) -> Result<Vec<f64>> {
    if element_values.len() != mesh.n_elements() {
        return Err(Error::DimensionMismatch(format!(
            "{} element values for {} elements",
            element_values.len(),
            mesh.n_elements()
        )));
    }

    let mut sums = vec![0.0; mesh.n_nodes()];
    for (conn, &value) in mesh.elements().iter().zip(element_values) {
        for &node in &conn.nodes {
            sums[node] += value;
        }
    }

    Ok(sums
        .into_iter()
        .zip(mesh.node_valence())
        .map(|(sum, count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect())
}

/// Nodal stress tensors, each component averaged like [`nodal_average`].
pub fn nodal_stresses(mesh: &Mesh, stress_field: &StressField) -> Result<Vec<PlaneStress>> {
    let component = |i: usize| -> Result<Vec<f64>> {
        let values: Vec<f64> = stress_field
            .element_stresses
            .iter()
            .map(|es| es.stress.0[i])
            .collect();
        nodal_average(mesh, &values)
    };
    let (sx, sy, txy) = (component(0)?, component(1)?, component(2)?);
    Ok((0..mesh.n_nodes())
        .map(|n| PlaneStress::new(sx[n], sy[n], txy[n]))
        .collect())
}

/// Nodal von Mises stress: the mean of the element-center von Mises values
/// of the incident elements.
pub fn nodal_von_mises(
    mesh: &Mesh,
    material: &Material,
    condition: PlaneCondition,
    displacements: &[f64],
) -> Result<Vec<f64>> {
    let field = recover_element_stresses(mesh, material, condition, displacements)?;
    nodal_average(mesh, &field.von_mises_stresses())
}

/// Center-point heat flux q = -k ∇T for every element.
pub fn recover_heat_flux(
    mesh: &Mesh,
    material: &ThermalMaterial,
    temperatures: &[f64],
) -> Result<Vec<Vector2<f64>>> {
    let physics = Physics::Conduction(*material);
    map_elements(
        mesh,
        &physics,
        &AssemblyOptions::default(),
        |idx, element, coords| {
            let conn = &mesh.elements()[idx];
            let t_e = element_values(temperatures, &conn.nodes, 1)?;
            let grad = element_gradient(element, coords, &t_e, conn.element_type.center())?;
            Ok(Vector2::new(grad[0], grad[1]) * -material.conductivity)
        },
    )
}
