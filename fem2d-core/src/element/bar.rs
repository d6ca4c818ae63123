//! Two-node axial bar.
//!
//! Used as a 1D reference for the isoparametric machinery and for truss-like
//! verification problems.

use crate::error::{Error, Result};
use nalgebra::Matrix2;

/// Stiffness of a bar between `x1` and `x2`.
///
/// ```text
/// K = (E A / L) | 1  -1 |
///               |-1   1 |
/// ```
///
/// # Errors
///
/// - [`Error::DegenerateElement`] if L = x2 - x1 is not positive
/// - [`Error::InvalidMaterial`] if E or A is not positive
pub fn bar2_stiffness(x1: f64, x2: f64, youngs_modulus: f64, area: f64) -> Result<Matrix2<f64>> {
    let length = x2 - x1;
    if length <= 0.0 || length.is_nan() {
        return Err(Error::DegenerateElement {
            element: None,
            det: length,
        });
    }
    if youngs_modulus <= 0.0 || area <= 0.0 || youngs_modulus.is_nan() || area.is_nan() {
        return Err(Error::InvalidMaterial(format!(
            "bar needs positive E and A, got E = {}, A = {}",
            youngs_modulus, area
        )));
    }

    let k = youngs_modulus * area / length;
    Ok(Matrix2::new(k, -k, -k, k))
}
