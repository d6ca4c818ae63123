//! Unstructured 2D meshes.
//!
//! Nodal coordinates plus typed connectivity. Node ordering within an
//! element is counter-clockwise; for [`ElementType::Tri6`] the three corners come
//! first, followed by the mid-side nodes of edges 2-3, 3-1 and 1-2.

use crate::element::gauss::QuadratureFamily;
use crate::error::{Error, Result};
use crate::types::Point2;

/// Nodes of one element, in local order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementConnectivity {
    /// Topology of the element.
    pub element_type: ElementType,
    /// Global node indices.
    pub nodes: Vec<usize>,
}

impl AsRef<[usize]> for ElementConnectivity {
    fn as_ref(&self) -> &[usize] {
        &self.nodes
    }
}

/// Element topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 3-node linear triangle.
    Tri3,
    /// 4-node bilinear quadrilateral.
    Quad4,
    /// 6-node quadratic triangle.
    Tri6,
}

impl ElementType {
    /// Nodes per element.
    pub fn n_nodes(self) -> usize {
        match self {
            ElementType::Tri3 => 3,
            ElementType::Quad4 => 4,
            ElementType::Tri6 => 6,
        }
    }

    /// Reference domain of the parametric coordinates.
    pub fn family(self) -> QuadratureFamily {
        match self {
            ElementType::Quad4 => QuadratureFamily::Quadrilateral,
            ElementType::Tri3 | ElementType::Tri6 => QuadratureFamily::Triangle,
        }
    }

    /// Integration order that integrates the stiffness of an undistorted
    /// element exactly.
    pub fn default_quadrature_order(self) -> usize {
        match self {
            ElementType::Tri3 => 1,
            ElementType::Quad4 => 2,
            ElementType::Tri6 => 3,
        }
    }

    /// Parametric center used as the stress sampling point.
    pub fn center(self) -> (f64, f64) {
        match self {
            ElementType::Quad4 => (0.0, 0.0),
            ElementType::Tri3 | ElementType::Tri6 => (1.0 / 3.0, 1.0 / 3.0),
        }
    }
}

/// Nodes and elements of one analysis.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Node positions.
    nodes: Vec<Point2>,
    /// Elements in insertion order.
    elements: Vec<ElementConnectivity>,
}

impl Mesh {
    /// Mesh with no nodes or elements.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Empty mesh with reserved storage.
    pub fn with_capacity(n_nodes: usize, n_elements: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n_nodes),
            elements: Vec::with_capacity(n_elements),
        }
    }

    /// Build a single-type mesh from coordinate and connectivity arrays.
    pub fn from_arrays(
        nodes: Vec<Point2>,
        element_type: ElementType,
        connectivity: &[Vec<usize>],
    ) -> Result<Self> {
        let mut mesh = Self::with_capacity(nodes.len(), connectivity.len());
        mesh.nodes = nodes;
        for nodes in connectivity {
            mesh.add_element(element_type, nodes.clone())?;
        }
        Ok(mesh)
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self, point: Point2) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Append nodes in order.
    pub fn add_nodes(&mut self, points: impl IntoIterator<Item = Point2>) {
        self.nodes.extend(points);
    }

    /// Append an element and return its index.
    pub fn add_element(&mut self, element_type: ElementType, nodes: Vec<usize>) -> Result<usize> {
        if nodes.len() != element_type.n_nodes() {
            return Err(Error::Mesh(format!(
                "{:?} takes {} nodes, got {}",
                element_type,
                element_type.n_nodes(),
                nodes.len()
            )));
        }

        let n_nodes = self.nodes.len();
        if let Some(&missing) = nodes.iter().find(|&&n| n >= n_nodes) {
            return Err(Error::DimensionMismatch(format!(
                "node {} does not exist ({} nodes)",
                missing, n_nodes
            )));
        }

        self.elements.push(ElementConnectivity {
            element_type,
            nodes,
        });
        Ok(self.elements.len() - 1)
    }

    /// Node count.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Element count.
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Size of the global system for the given DOF multiplicity.
    pub fn n_dofs(&self, dofs_per_node: usize) -> usize {
        self.nodes.len() * dofs_per_node
    }

    /// All node positions.
    pub fn nodes(&self) -> &[Point2] {
        &self.nodes
    }

    /// Position of one node.
    pub fn node(&self, idx: usize) -> Option<&Point2> {
        self.nodes.get(idx)
    }

    /// All elements.
    pub fn elements(&self) -> &[ElementConnectivity] {
        &self.elements
    }

    /// One element.
    pub fn element(&self, idx: usize) -> Option<&ElementConnectivity> {
        self.elements.get(idx)
    }

    /// Node positions of one element, in local order.
    pub fn element_coords(&self, elem_idx: usize) -> Option<Vec<Point2>> {
        let elem = self.elements.get(elem_idx)?;
        Some(elem.nodes.iter().map(|&i| self.nodes[i]).collect())
    }

    /// Global DOF indices of an element, `node * dofs_per_node + component`,
    /// node-major.
    pub fn dof_indices(&self, elem_idx: usize, dofs_per_node: usize) -> Option<Vec<usize>> {
        let elem = self.elements.get(elem_idx)?;
        Some(element_dofs(&elem.nodes, dofs_per_node))
    }

    /// Number of elements touching each node.
    pub fn node_valence(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for elem in &self.elements {
            for &node in &elem.nodes {
                counts[node] += 1;
            }
        }
        counts
    }

    /// Lower-left and upper-right corners of the bounding box.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.nodes.first()?;
        Some(self.nodes[1..].iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// DOF indices for a list of nodes.
pub fn element_dofs(nodes: &[usize], dofs_per_node: usize) -> Vec<usize> {
    nodes
        .iter()
        .flat_map(|&node| (0..dofs_per_node).map(move |d| node * dofs_per_node + d))
        .collect()
}
