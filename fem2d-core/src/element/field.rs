//! Field strategies for the isoparametric integrator.
//!
//! A [`Field`] decides how many unknowns live on each node, how physical shape
//! function gradients are arranged into the gradient operator B, and which
//! material matrix D sits between Bᵀ and B. The integration loop itself lives
//! in [`IsoparametricElement`](super::isoparametric::IsoparametricElement).

use crate::error::{Error, Result};
use crate::material::{Material, PlaneCondition, ThermalMaterial};
use crate::types::ConstitutiveMatrix;
use nalgebra::DMatrix;

/// Physics-specific part of an element formulation.
pub trait Field: Send + Sync {
    /// Unknowns per node (1 for scalar fields, 2 for in-plane displacement).
    fn dofs_per_node(&self) -> usize;

    /// Rows of the gradient operator (2 for a flux, 3 for Voigt strain).
    fn operator_rows(&self) -> usize;

    /// Write B for the given physical gradients into `b`.
    ///
    /// `b` is `operator_rows() x (n_nodes * dofs_per_node())` and zeroed.
    fn fill_operator(&self, dn_dx: &[f64], dn_dy: &[f64], b: &mut DMatrix<f64>);

    /// D, square of size `operator_rows()`.
    fn material_matrix(&self) -> DMatrix<f64>;

    /// Out-of-plane thickness multiplying every integral.
    fn thickness(&self) -> f64 {
        1.0
    }
}

/// Steady isotropic heat conduction: B = ∇N, D = k I.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conduction {
    /// Thermal conductivity k.
    pub conductivity: f64,
}

impl Conduction {
    /// Scalar field for a conductor.
    pub fn new(material: &ThermalMaterial) -> Self {
        Self {
            conductivity: material.conductivity,
        }
    }
}

impl Field for Conduction {
    fn dofs_per_node(&self) -> usize {
        1
    }

    fn operator_rows(&self) -> usize {
        2
    }

    fn fill_operator(&self, dn_dx: &[f64], dn_dy: &[f64], b: &mut DMatrix<f64>) {
        for (a, (&gx, &gy)) in dn_dx.iter().zip(dn_dy).enumerate() {
            b[(0, a)] = gx;
            b[(1, a)] = gy;
        }
    }

    fn material_matrix(&self) -> DMatrix<f64> {
        DMatrix::identity(2, 2) * self.conductivity
    }
}

/// Plane elasticity with displacement unknowns (u_x, u_y) per node.
///
/// ```text
/// B_a = | ∂N_a/∂x     0     |   ε_xx
///       |    0     ∂N_a/∂y  |   ε_yy
///       | ∂N_a/∂y  ∂N_a/∂x  |   γ_xy
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneElasticity {
    /// Constitutive matrix mapping [ε_xx, ε_yy, γ_xy] to [σ_xx, σ_yy, τ_xy].
    pub d: ConstitutiveMatrix,
    /// Out-of-plane thickness.
    pub thickness: f64,
}

impl PlaneElasticity {
    /// Vector field for an isotropic material.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaterial`] if `thickness` is not positive.
    pub fn new(material: &Material, condition: PlaneCondition, thickness: f64) -> Result<Self> {
        if thickness <= 0.0 || thickness.is_nan() {
            return Err(Error::InvalidMaterial(format!(
                "thickness must be positive, got {}",
                thickness
            )));
        }
        Ok(Self {
            d: material.constitutive(condition),
            thickness,
        })
    }
}

impl Field for PlaneElasticity {
    fn dofs_per_node(&self) -> usize {
        2
    }

    fn operator_rows(&self) -> usize {
        3
    }

    fn fill_operator(&self, dn_dx: &[f64], dn_dy: &[f64], b: &mut DMatrix<f64>) {
        for (a, (&gx, &gy)) in dn_dx.iter().zip(dn_dy).enumerate() {
            let (cu, cv) = (2 * a, 2 * a + 1);
            b[(0, cu)] = gx;
            b[(1, cv)] = gy;
            b[(2, cu)] = gy;
            b[(2, cv)] = gx;
        }
    }

    fn material_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_iterator(3, 3, self.d.iter().copied())
    }

    fn thickness(&self) -> f64 {
        self.thickness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_conduction_operator_layout() {
        let field = Conduction { conductivity: 2.0 };
        let mut b = DMatrix::zeros(2, 3);
        field.fill_operator(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut b);
        assert_eq!(b, DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(field.material_matrix(), DMatrix::identity(2, 2) * 2.0);
        assert_relative_eq!(field.thickness(), 1.0);
    }

    #[test]
    fn test_elasticity_operator_layout() {
        let field = PlaneElasticity::new(&Material::steel(), PlaneCondition::Stress, 0.1).unwrap();
        let mut b = DMatrix::zeros(3, 4);
        field.fill_operator(&[1.0, 2.0], &[3.0, 4.0], &mut b);
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(3, 4, &[
            1.0, 0.0, 2.0, 0.0,
            0.0, 3.0, 0.0, 4.0,
            3.0, 1.0, 4.0, 2.0,
        ]);
        assert_eq!(b, expected);
        assert_relative_eq!(field.thickness(), 0.1);
    }

    #[test]
    fn test_elasticity_material_matrix_matches_constitutive() {
        let mat = Material::aluminum();
        let field = PlaneElasticity::new(&mat, PlaneCondition::Strain, 1.0).unwrap();
        let d = field.material_matrix();
        let expected = mat.constitutive_plane_strain();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(d[(i, j)], expected[(i, j)]);
            }
        }
    }

    #[test]
    fn test_invalid_thickness() {
        let mat = Material::steel();
        assert!(PlaneElasticity::new(&mat, PlaneCondition::Stress, 0.0).is_err());
        assert!(PlaneElasticity::new(&mat, PlaneCondition::Stress, -1.0).is_err());
    }
}
