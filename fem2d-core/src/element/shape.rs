//! Shape functions on the reference elements.
//!
//! # Reference Domains
//!
//! - Triangles (Tri3, Tri6): ξ, η ≥ 0, ξ + η ≤ 1, corners at (0,0), (1,0), (0,1)
//! - Quadrilateral (Quad4): ξ, η ∈ [-1, 1]², corners counter-clockwise from (-1,-1)
//!
//! Every evaluator returns the values together with their parametric
//! derivatives, one entry per element node.

use crate::mesh::ElementType;

/// Shape function values and parametric derivatives at one point.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFunctions {
    /// N_i(ξ, η).
    pub values: Vec<f64>,
    /// ∂N_i/∂ξ.
    pub d_xi: Vec<f64>,
    /// ∂N_i/∂η.
    pub d_eta: Vec<f64>,
}

impl ShapeFunctions {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Linear triangle: N = [1 - ξ - η, ξ, η].
pub fn tri3(xi: f64, eta: f64) -> ShapeFunctions {
    ShapeFunctions {
        values: vec![1.0 - xi - eta, xi, eta],
        d_xi: vec![-1.0, 1.0, 0.0],
        d_eta: vec![-1.0, 0.0, 1.0],
    }
}

/// Bilinear quadrilateral.
///
/// ```text
/// N_i = ¼ (1 + ξ_i ξ)(1 + η_i η)
/// ```
pub fn quad4(xi: f64, eta: f64) -> ShapeFunctions {
    ShapeFunctions {
        values: vec![
            0.25 * (1.0 - xi) * (1.0 - eta),
            0.25 * (1.0 + xi) * (1.0 - eta),
            0.25 * (1.0 + xi) * (1.0 + eta),
            0.25 * (1.0 - xi) * (1.0 + eta),
        ],
        d_xi: vec![
            -0.25 * (1.0 - eta),
            0.25 * (1.0 - eta),
            0.25 * (1.0 + eta),
            -0.25 * (1.0 + eta),
        ],
        d_eta: vec![
            -0.25 * (1.0 - xi),
            -0.25 * (1.0 + xi),
            0.25 * (1.0 + xi),
            0.25 * (1.0 - xi),
        ],
    }
}

/// Quadratic triangle in area coordinates L1 = 1 - ξ - η, L2 = ξ, L3 = η.
///
/// ```text
///   3
///   |\
///   5  4
///   |    \
///   1--6--2
/// ```
///
/// Corners: N_i = L_i (2 L_i - 1). Mid-side: N4 = 4 L2 L3, N5 = 4 L3 L1,
/// N6 = 4 L1 L2.
pub fn tri6(xi: f64, eta: f64) -> ShapeFunctions {
    let l1 = 1.0 - xi - eta;
    let l2 = xi;
    let l3 = eta;

    // dL1 = (-1, -1), dL2 = (1, 0), dL3 = (0, 1)
    let c1 = 4.0 * l1 - 1.0;
    let c2 = 4.0 * l2 - 1.0;
    let c3 = 4.0 * l3 - 1.0;

    ShapeFunctions {
        values: vec![
            l1 * (2.0 * l1 - 1.0),
            l2 * (2.0 * l2 - 1.0),
            l3 * (2.0 * l3 - 1.0),
            4.0 * l2 * l3,
            4.0 * l3 * l1,
            4.0 * l1 * l2,
        ],
        d_xi: vec![
            -c1,
            c2,
            0.0,
            4.0 * l3,
            -4.0 * l3,
            4.0 * (l1 - l2),
        ],
        d_eta: vec![
            -c1,
            0.0,
            c3,
            4.0 * l2,
            4.0 * (l1 - l3),
            -4.0 * l2,
        ],
    }
}

impl ElementType {
    /// Evaluate this element's shape functions at (ξ, η).
    pub fn shape_functions(self, xi: f64, eta: f64) -> ShapeFunctions {
        match self {
            ElementType::Tri3 => tri3(xi, eta),
            ElementType::Quad4 => quad4(xi, eta),
            ElementType::Tri6 => tri6(xi, eta),
        }
    }

    /// Parametric coordinates of the element nodes.
    pub fn reference_nodes(self) -> &'static [(f64, f64)] {
        match self {
            ElementType::Tri3 => &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            ElementType::Quad4 => &[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
            ElementType::Tri6 => &[
                (0.0, 0.0),
                (1.0, 0.0),
                (0.0, 1.0),
                (0.5, 0.5),
                (0.0, 0.5),
                (0.5, 0.0),
            ],
        }
    }
}
