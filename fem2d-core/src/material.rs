//! Constitutive models.
//!
//! Isotropic linear elastic solids for plane problems and isotropic
//! conductors for steady heat conduction. A constitutive matrix is built once
//! per analysis and shared read-only by every element.

use crate::error::{Error, Result};
use crate::types::ConstitutiveMatrix;
use nalgebra::Matrix2;

/// Out-of-plane assumption for 2D elasticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneCondition {
    /// Thin plates: σ_zz = 0.
    #[default]
    Stress,
    /// Long prismatic bodies: ε_zz = 0.
    Strain,
}

/// Isotropic linear elastic solid.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Young's modulus E.
    pub youngs_modulus: f64,
    /// Poisson's ratio ν.
    pub poissons_ratio: f64,
}

impl Material {
    /// Elastic solid from E and ν.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMaterial`] unless E > 0 and -1 < ν < 0.5.
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if youngs_modulus <= 0.0 || youngs_modulus.is_nan() {
            return Err(Error::InvalidMaterial(format!(
                "Young's modulus {} is not positive",
                youngs_modulus
            )));
        }
        if poissons_ratio <= -1.0 || poissons_ratio >= 0.5 || poissons_ratio.is_nan() {
            return Err(Error::InvalidMaterial(format!(
                "Poisson's ratio {} outside (-1, 0.5)",
                poissons_ratio
            )));
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Shear modulus μ = E / 2(1 + ν).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Lamé's first parameter λ = Eν / (1 + ν)(1 - 2ν).
    pub fn lame_lambda(&self) -> f64 {
        let nu = self.poissons_ratio;
        self.youngs_modulus * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }

    /// D for σ_zz = 0, mapping (ε_xx, ε_yy, γ_xy) to (σ_xx, σ_yy, τ_xy).
    pub fn constitutive_plane_stress(&self) -> ConstitutiveMatrix {
        let nu = self.poissons_ratio;
        let scale = self.youngs_modulus / (1.0 - nu * nu);
        #[rustfmt::skip]
        let shape = ConstitutiveMatrix::new(
            1.0, nu,  0.0,
            nu,  1.0, 0.0,
            0.0, 0.0, 0.5 * (1.0 - nu),
        );
        shape * scale
    }

    /// D for ε_zz = 0, written with the Lamé parameters.
    pub fn constitutive_plane_strain(&self) -> ConstitutiveMatrix {
        let lambda = self.lame_lambda();
        let mu = self.shear_modulus();
        let normal = lambda + 2.0 * mu;
        let mut d = ConstitutiveMatrix::zeros();
        d[(0, 0)] = normal;
        d[(1, 1)] = normal;
        d[(0, 1)] = lambda;
        d[(1, 0)] = lambda;
        d[(2, 2)] = mu;
        d
    }

    /// D for the chosen out-of-plane assumption.
    pub fn constitutive(&self, condition: PlaneCondition) -> ConstitutiveMatrix {
        match condition {
            PlaneCondition::Stress => self.constitutive_plane_stress(),
            PlaneCondition::Strain => self.constitutive_plane_strain(),
        }
    }

    /// Mild steel, E = 200 GPa, ν = 0.3.
    pub fn steel() -> Self {
        Self {
            youngs_modulus: 200e9,
            poissons_ratio: 0.3,
        }
    }

    /// 6061-T6 aluminium, E = 68.9 GPa, ν = 0.33.
    pub fn aluminum() -> Self {
        Self {
            youngs_modulus: 68.9e9,
            poissons_ratio: 0.33,
        }
    }
}

/// Isotropic conductor for steady heat conduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalMaterial {
    /// Thermal conductivity k.
    pub conductivity: f64,
}

impl ThermalMaterial {
    /// Conductor with conductivity `k > 0`.
    pub fn new(conductivity: f64) -> Result<Self> {
        if conductivity <= 0.0 || conductivity.is_nan() {
            return Err(Error::InvalidMaterial(format!(
                "conductivity {} is not positive",
                conductivity
            )));
        }
        Ok(Self { conductivity })
    }

    /// k I.
    pub fn conductivity_matrix(&self) -> Matrix2<f64> {
        Matrix2::identity() * self.conductivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_out_of_range_constants() {
        for (e, nu) in [
            (0.0, 0.2),
            (-5.0, 0.2),
            (f64::NAN, 0.2),
            (1.0, 0.5),
            (1.0, -1.0),
            (1.0, 0.75),
            (1.0, f64::NAN),
        ] {
            assert!(
                matches!(Material::new(e, nu), Err(Error::InvalidMaterial(_))),
                "accepted E = {}, ν = {}",
                e,
                nu
            );
        }
        assert!(Material::new(1.0, -0.9).is_ok());
    }

    #[test]
    fn test_plane_stress_entries() {
        let mat = Material::new(91.0, 0.3).unwrap();
        let d = mat.constitutive_plane_stress();
        // E / (1 - ν²) = 100
        assert_relative_eq!(d[(0, 0)], 100.0, max_relative = 1e-12);
        assert_relative_eq!(d[(1, 1)], 100.0, max_relative = 1e-12);
        assert_relative_eq!(d[(0, 1)], 30.0, max_relative = 1e-12);
        assert_relative_eq!(d[(2, 2)], 35.0, max_relative = 1e-12);
        assert_relative_eq!(d[(0, 2)], 0.0);
    }

    #[test]
    fn test_plane_strain_entries() {
        // E = 2.6, ν = 0.3: λ = 1.5, μ = 1
        let mat = Material::new(2.6, 0.3).unwrap();
        assert_relative_eq!(mat.lame_lambda(), 1.5, max_relative = 1e-12);
        assert_relative_eq!(mat.shear_modulus(), 1.0, max_relative = 1e-12);
        let d = mat.constitutive(PlaneCondition::Strain);
        assert_relative_eq!(d[(0, 0)], 3.5, max_relative = 1e-12);
        assert_relative_eq!(d[(0, 1)], 1.5, max_relative = 1e-12);
        assert_relative_eq!(d[(2, 2)], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_shear_term_is_shear_modulus() {
        let mat = Material::aluminum();
        for condition in [PlaneCondition::Stress, PlaneCondition::Strain] {
            let d = mat.constitutive(condition);
            assert_relative_eq!(d[(2, 2)], mat.shear_modulus(), max_relative = 1e-12);
            assert_relative_eq!(d, d.transpose());
        }
    }

    #[test]
    fn test_strain_condition_is_stiffer() {
        let mat = Material::steel();
        let stress = mat.constitutive_plane_stress();
        let strain = mat.constitutive_plane_strain();
        assert!(strain[(0, 0)] > stress[(0, 0)]);
        assert!(strain[(1, 0)] > stress[(1, 0)]);
    }

    #[test]
    fn test_incompressible_limit_blows_up_plane_strain_only() {
        let mat = Material::new(1.0, 0.4999).unwrap();
        assert!(mat.constitutive_plane_strain()[(0, 0)] > 1e3);
        assert!(mat.constitutive_plane_stress()[(0, 0)] < 2.0);
    }

    #[test]
    fn test_thermal_material() {
        let m = ThermalMaterial::new(4.0).unwrap().conductivity_matrix();
        assert_relative_eq!(m, Matrix2::new(4.0, 0.0, 0.0, 4.0));
        assert!(ThermalMaterial::new(0.0).is_err());
        assert!(ThermalMaterial::new(-1.0).is_err());
        assert!(ThermalMaterial::new(f64::NAN).is_err());
    }
}
