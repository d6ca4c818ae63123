//! Core data types for 2D FEA operations.
//!
//! This module defines fundamental types used throughout fem2d:
//! - Geometric primitives (points in the plane)
//! - In-plane strain and stress vectors in Voigt notation

use nalgebra::{Matrix2, Vector2, Vector3};

/// A point in the plane.
pub type Point2 = Vector2<f64>;

/// In-plane constitutive matrix in Voigt notation.
///
/// Maps [ε_xx, ε_yy, γ_xy] to [σ_xx, σ_yy, τ_xy].
pub type ConstitutiveMatrix = nalgebra::Matrix3<f64>;

/// In-plane stress in Voigt notation.
///
/// Components are ordered as: [σ_xx, σ_yy, τ_xy]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStress(pub Vector3<f64>);

impl PlaneStress {
    /// Create a new stress state from Voigt components.
    pub fn new(sxx: f64, syy: f64, txy: f64) -> Self {
        Self(Vector3::new(sxx, syy, txy))
    }

    /// Zero stress state.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// Von Mises equivalent stress under plane stress (σ_zz = 0).
    ///
    /// ```text
    /// σ_vm = sqrt(σx² - σx·σy + σy² + 3τxy²)
    /// ```
    pub fn von_mises(&self) -> f64 {
        let (sx, sy, txy) = (self.0[0], self.0[1], self.0[2]);
        (sx * sx - sx * sy + sy * sy + 3.0 * txy * txy).sqrt()
    }

    /// Full 2x2 symmetric stress matrix.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        let s = &self.0;
        Matrix2::new(s[0], s[2], s[2], s[1])
    }
}

/// In-plane strain in Voigt notation.
///
/// Components are ordered as: [ε_xx, ε_yy, γ_xy]
/// where γ = 2ε is the engineering shear strain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStrain(pub Vector3<f64>);

impl PlaneStrain {
    /// Create a new strain state from Voigt components.
    pub fn new(exx: f64, eyy: f64, gxy: f64) -> Self {
        Self(Vector3::new(exx, eyy, gxy))
    }

    /// Zero strain state.
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    /// In-plane area change (ε_xx + ε_yy).
    pub fn areal(&self) -> f64 {
        self.0[0] + self.0[1]
    }

    /// Full 2x2 symmetric strain matrix.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        let e = &self.0;
        // off-diagonal terms are γ/2 = ε
        Matrix2::new(e[0], e[2] / 2.0, e[2] / 2.0, e[1])
    }

    /// Stress through a constitutive matrix: σ = D * ε.
    pub fn stress(&self, d: &ConstitutiveMatrix) -> PlaneStress {
        PlaneStress(d * self.0)
    }
}
