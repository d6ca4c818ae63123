//! Quadrature rules on the reference domains.
//!
//! - line: Gauss-Legendre on [-1, 1], 1 to 3 points
//! - quadrilateral: tensor products on [-1, 1]², weights summing to 4
//! - triangle: centroid and 3-point rules on the unit triangle, weights
//!   summing to 1/2
//!
//! # Example
//!
//! ```
//! use fem2d_core::element::gauss::{gauss_quad, gauss_tri};
//!
//! // 2x2 rule on the reference square
//! for gp in gauss_quad(2).unwrap() {
//!     // integrate at (gp.xi(), gp.eta()) with weight gp.weight
//! }
//!
//! // 3-point rule on the reference triangle
//! let rule = gauss_tri(3).unwrap();
//! assert_eq!(rule.len(), 3);
//! ```
//!
//! Requesting a rule that is not implemented returns
//! [`Error::UnsupportedQuadratureOrder`]; no rule is ever silently substituted.

use crate::error::{Error, Result};

/// Sample point and weight of a rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    /// Natural coordinates [ξ, η].
    pub coords: [f64; 2],
    /// Integration weight.
    pub weight: f64,
}

impl GaussPoint {
    /// Point at (ξ, η).
    pub fn new(xi: f64, eta: f64, weight: f64) -> Self {
        Self {
            coords: [xi, eta],
            weight,
        }
    }

    /// ξ.
    #[inline]
    pub fn xi(&self) -> f64 {
        self.coords[0]
    }

    /// η.
    #[inline]
    pub fn eta(&self) -> f64 {
        self.coords[1]
    }
}

/// Reference domain a rule integrates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadratureFamily {
    /// [-1, 1]², order = points per direction.
    Quadrilateral,
    /// Unit triangle, order = number of points.
    Triangle,
}

impl QuadratureFamily {
    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            QuadratureFamily::Quadrilateral => "quadrilateral",
            QuadratureFamily::Triangle => "triangle",
        }
    }
}

/// Rule for a family and order.
pub fn quadrature(family: QuadratureFamily, order: usize) -> Result<Vec<GaussPoint>> {
    match family {
        QuadratureFamily::Quadrilateral => gauss_quad(order),
        QuadratureFamily::Triangle => gauss_tri(order),
    }
}

/// 1D Gauss-Legendre quadrature points and weights.
///
/// Returns (point, weight) pairs for integration on [-1, 1].
/// `n` points integrate polynomials up to degree 2n - 1 exactly.
pub fn gauss_1d(n: usize) -> Result<Vec<(f64, f64)>> {
    match n {
        1 => Ok(vec![(0.0, 2.0)]),
        2 => {
            let p = 1.0 / 3.0_f64.sqrt();
            Ok(vec![(-p, 1.0), (p, 1.0)])
        }
        3 => {
            let p = (3.0 / 5.0_f64).sqrt();
            Ok(vec![(-p, 5.0 / 9.0), (0.0, 8.0 / 9.0), (p, 5.0 / 9.0)])
        }
        _ => Err(Error::UnsupportedQuadratureOrder {
            family: "line",
            order: n,
        }),
    }
}

/// Quadrilateral Gauss quadrature points for 2D elements.
///
/// Tensor product of two `n`-point 1D rules, ξ outer and η inner.
/// Returns n² points whose weights sum to 4.
pub fn gauss_quad(n: usize) -> Result<Vec<GaussPoint>> {
    let rule_1d = gauss_1d(n).map_err(|_| Error::UnsupportedQuadratureOrder {
        family: QuadratureFamily::Quadrilateral.name(),
        order: n,
    })?;

    let mut points = Vec::with_capacity(n * n);
    for &(xi, w_xi) in &rule_1d {
        for &(eta, w_eta) in &rule_1d {
            points.push(GaussPoint::new(xi, eta, w_xi * w_eta));
        }
    }
    Ok(points)
}

/// Triangle Gauss quadrature points for 2D elements.
///
/// Points are (ξ, η) on the unit triangle with vertices (0,0), (1,0), (0,1);
/// weights sum to 1/2.
///
/// - order 1: centroid, exact for degree 1
/// - order 3: interior points (1/6, 1/6), (2/3, 1/6), (1/6, 2/3), exact for degree 2
pub fn gauss_tri(order: usize) -> Result<Vec<GaussPoint>> {
    match order {
        1 => Ok(vec![GaussPoint::new(1.0 / 3.0, 1.0 / 3.0, 0.5)]),
        3 => {
            let w = 1.0 / 6.0;
            Ok(vec![
                GaussPoint::new(1.0 / 6.0, 1.0 / 6.0, w),
                GaussPoint::new(2.0 / 3.0, 1.0 / 6.0, w),
                GaussPoint::new(1.0 / 6.0, 2.0 / 3.0, w),
            ])
        }
        _ => Err(Error::UnsupportedQuadratureOrder {
            family: QuadratureFamily::Triangle.name(),
            order,
        }),
    }
}
