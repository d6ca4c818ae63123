//! Isoparametric mapping from reference to physical coordinates.
//!
//! ```text
//! J = | ∂x/∂ξ  ∂y/∂ξ |      | ∂N/∂x |         | ∂N/∂ξ |
//!     | ∂x/∂η  ∂y/∂η |      | ∂N/∂y | = J⁻¹ · | ∂N/∂η |
//! ```

use crate::error::{Error, Result};
use crate::types::Point2;
use nalgebra::{Matrix2, Vector2};

/// Jacobian of the reference-to-physical map at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jacobian {
    /// J with rows (∂/∂ξ, ∂/∂η) and columns (x, y).
    pub matrix: Matrix2<f64>,
    /// det(J), always positive.
    pub det: f64,
    /// J⁻¹.
    pub inverse: Matrix2<f64>,
}

impl Jacobian {
    /// Build the Jacobian from nodal coordinates and parametric derivatives.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if the three slices disagree in length
    /// - [`Error::DegenerateElement`] if det(J) ≤ 0 (inverted, collapsed or
    ///   clockwise element); the element index is left for the caller to fill
    pub fn new(coords: &[Point2], d_xi: &[f64], d_eta: &[f64]) -> Result<Self> {
        if coords.len() != d_xi.len() || coords.len() != d_eta.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} nodal coordinates for {}/{} shape derivatives",
                coords.len(),
                d_xi.len(),
                d_eta.len()
            )));
        }

        let mut j = Matrix2::<f64>::zeros();
        for ((p, &dxi), &deta) in coords.iter().zip(d_xi).zip(d_eta) {
            j[(0, 0)] += dxi * p.x;
            j[(0, 1)] += dxi * p.y;
            j[(1, 0)] += deta * p.x;
            j[(1, 1)] += deta * p.y;
        }

        let det = j.determinant();
        if det <= 0.0 || det.is_nan() {
            return Err(Error::DegenerateElement { element: None, det });
        }

        let inverse = Matrix2::new(j[(1, 1)], -j[(0, 1)], -j[(1, 0)], j[(0, 0)]) / det;

        Ok(Self {
            matrix: j,
            det,
            inverse,
        })
    }

    /// Map parametric derivatives to physical gradients (∂N/∂x, ∂N/∂y).
    pub fn physical_gradients(&self, d_xi: &[f64], d_eta: &[f64]) -> (Vec<f64>, Vec<f64>) {
        d_xi.iter()
            .zip(d_eta)
            .map(|(&a, &b)| {
                let g = self.inverse * Vector2::new(a, b);
                (g.x, g.y)
            })
            .unzip()
    }
}
