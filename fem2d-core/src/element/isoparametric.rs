//! Generic isoparametric element.
//!
//! One integration loop serves every {Tri3, Quad4, Tri6} × {scalar, vector}
//! combination:
//!
//! ```text
//! K = Σ_gp  Bᵀ · D · B · det(J) · w · t
//! ```
//!
//! The element topology supplies shape functions and the default rule; the
//! [`Field`] supplies B, D and t.

use crate::element::field::Field;
use crate::element::gauss::{quadrature, GaussPoint};
use crate::element::jacobian::Jacobian;
use crate::error::{Error, Result};
use crate::mesh::ElementType;
use crate::types::Point2;
use nalgebra::{DMatrix, DVector};

/// Isoparametric element of a given topology and field.
#[derive(Debug, Clone)]
pub struct IsoparametricElement<F: Field> {
    element_type: ElementType,
    field: F,
    rule: Vec<GaussPoint>,
}

impl<F: Field> IsoparametricElement<F> {
    /// Create an element using `order`, or the type's default rule if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedQuadratureOrder`] for an unknown rule.
    pub fn new(element_type: ElementType, field: F, order: Option<usize>) -> Result<Self> {
        let order = order.unwrap_or_else(|| element_type.default_quadrature_order());
        let rule = quadrature(element_type.family(), order)?;
        Ok(Self {
            element_type,
            field,
            rule,
        })
    }

    /// Element topology.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Field strategy.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Integration points in use.
    pub fn rule(&self) -> &[GaussPoint] {
        &self.rule
    }

    /// Unknowns on the element.
    pub fn n_dofs(&self) -> usize {
        self.element_type.n_nodes() * self.field.dofs_per_node()
    }

    fn check_coords(&self, coords: &[Point2]) -> Result<()> {
        let expected = self.element_type.n_nodes();
        if coords.len() != expected {
            return Err(Error::DimensionMismatch(format!(
                "{:?} requires {} nodal coordinates, got {}",
                self.element_type,
                expected,
                coords.len()
            )));
        }
        Ok(())
    }

    /// Gradient operator B and det(J) at a parametric point.
    pub fn operator_at(&self, coords: &[Point2], xi: f64, eta: f64) -> Result<(DMatrix<f64>, f64)> {
        self.check_coords(coords)?;
        let sf = self.element_type.shape_functions(xi, eta);
        let jac = Jacobian::new(coords, &sf.d_xi, &sf.d_eta)?;
        let (dn_dx, dn_dy) = jac.physical_gradients(&sf.d_xi, &sf.d_eta);

        let mut b = DMatrix::zeros(self.field.operator_rows(), self.n_dofs());
        self.field.fill_operator(&dn_dx, &dn_dy, &mut b);
        Ok((b, jac.det))
    }

    /// Element stiffness (conductance) matrix.
    pub fn stiffness(&self, coords: &[Point2]) -> Result<DMatrix<f64>> {
        let n = self.n_dofs();
        let d = self.field.material_matrix();
        let t = self.field.thickness();
        let mut k = DMatrix::zeros(n, n);

        for gp in &self.rule {
            let (b, det_j) = self.operator_at(coords, gp.xi(), gp.eta())?;
            let db = &d * &b;
            k += b.transpose() * db * (gp.weight * det_j * t);
        }

        Ok(k)
    }

    /// Consistent nodal load ∫ Nᵀ s t dA for a uniform source.
    ///
    /// `source` holds one value per nodal unknown: a heat generation rate for
    /// conduction, a body force (b_x, b_y) for elasticity.
    pub fn body_load(&self, coords: &[Point2], source: &[f64]) -> Result<DVector<f64>> {
        self.check_coords(coords)?;
        let ndpn = self.field.dofs_per_node();
        if source.len() != ndpn {
            return Err(Error::DimensionMismatch(format!(
                "source has {} components, field has {} per node",
                source.len(),
                ndpn
            )));
        }

        let t = self.field.thickness();
        let mut f = DVector::zeros(self.n_dofs());
        for gp in &self.rule {
            let sf = self.element_type.shape_functions(gp.xi(), gp.eta());
            let jac = Jacobian::new(coords, &sf.d_xi, &sf.d_eta)?;
            let scale = gp.weight * jac.det * t;
            for (a, n_a) in sf.values.iter().enumerate() {
                for (c, s) in source.iter().enumerate() {
                    f[a * ndpn + c] += n_a * s * scale;
                }
            }
        }
        Ok(f)
    }

    /// Element area Σ det(J) w.
    pub fn area(&self, coords: &[Point2]) -> Result<f64> {
        self.check_coords(coords)?;
        let mut area = 0.0;
        for gp in &self.rule {
            let sf = self.element_type.shape_functions(gp.xi(), gp.eta());
            let jac = Jacobian::new(coords, &sf.d_xi, &sf.d_eta)?;
            area += gp.weight * jac.det;
        }
        Ok(area)
    }
}
