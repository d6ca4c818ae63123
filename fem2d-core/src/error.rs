//! Error types for fem2d operations.

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, assembling or solving a system.
///
/// Every variant is a deterministic function of the input, so none of them is
/// worth retrying. The whole run aborts before the solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Non-positive Jacobian determinant: the element is inverted, degenerate
    /// or its nodes are not ordered counter-clockwise.
    #[error(
        "degenerate element{}: Jacobian determinant {det:e} is not positive",
        fmt_element(.element)
    )]
    DegenerateElement {
        /// Index of the offending element, when known.
        element: Option<usize>,
        /// Determinant (or length, for bars) found at the failing sample.
        det: f64,
    },

    /// Integration order outside the implemented rules.
    #[error("unsupported quadrature order {order} for {family}")]
    UnsupportedQuadratureOrder {
        /// Reference domain the rule was requested for.
        family: &'static str,
        /// Requested order.
        order: usize,
    },

    /// Index out of range, or sizes that disagree with the DOF map.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Post-processing requested for a field the analysis did not solve,
    /// e.g. stresses from a conduction run.
    #[error("wrong physics: {0}")]
    WrongPhysics(String),

    /// Solver errors.
    #[error("solver error: {0}")]
    Solver(String),

    /// Matrix singularity or conditioning issues.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),
}

impl Error {
    /// Attach an element index to a [`Error::DegenerateElement`] that does not
    /// carry one yet. Other variants are returned unchanged.
    pub fn at_element(self, index: usize) -> Self {
        match self {
            Error::DegenerateElement { element: None, det } => Error::DegenerateElement {
                element: Some(index),
                det,
            },
            Error::DimensionMismatch(msg) => {
                Error::DimensionMismatch(format!("element {}: {}", index, msg))
            }
            other => other,
        }
    }
}

fn fmt_element(element: &Option<usize>) -> String {
    match element {
        Some(idx) => format!(" {}", idx),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_element_tags_degenerate() {
        let err = Error::DegenerateElement {
            element: None,
            det: -0.25,
        }
        .at_element(7);
        assert_eq!(
            err,
            Error::DegenerateElement {
                element: Some(7),
                det: -0.25
            }
        );
        assert!(err.to_string().contains("element 7"));
    }

    #[test]
    fn test_at_element_keeps_existing_index() {
        let err = Error::DegenerateElement {
            element: Some(1),
            det: 0.0,
        }
        .at_element(9);
        assert_eq!(
            err,
            Error::DegenerateElement {
                element: Some(1),
                det: 0.0
            }
        );
    }

    #[test]
    fn test_unsupported_order_message() {
        let err = Error::UnsupportedQuadratureOrder {
            family: "triangle",
            order: 2,
        };
        assert_eq!(err.to_string(), "unsupported quadrature order 2 for triangle");
    }

    #[test]
    fn test_wrong_physics_message() {
        let err = Error::WrongPhysics("heat flux needs a conduction analysis".into());
        assert_eq!(err.to_string(), "wrong physics: heat flux needs a conduction analysis");
        assert_eq!(err.clone().at_element(3), err);
    }
}
