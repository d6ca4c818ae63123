//! Structured rectangle meshes for integration tests.

#![allow(dead_code)]

use fem2d_core::mesh::{ElementType, Mesh};
use fem2d_core::types::Point2;

const TOL: f64 = 1e-12;

/// Uniform grid coordinates from 0 to `length`.
pub fn uniform(length: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|i| length * i as f64 / n as f64).collect()
}

/// Geometrically graded coordinates from 0 to `length`, each cell `ratio`
/// times the previous one.
pub fn graded(length: f64, n: usize, ratio: f64) -> Vec<f64> {
    let cells: Vec<f64> = (0..n).map(|i| ratio.powi(i as i32)).collect();
    let total: f64 = cells.iter().sum();
    let mut coords = vec![0.0];
    let mut x = 0.0;
    for h in cells {
        x += length * h / total;
        coords.push(x);
    }
    if let Some(last) = coords.last_mut() {
        *last = length;
    }
    coords
}

/// Tensor-product mesh over the grid lines `xs` × `ys`.
///
/// Quad4 cells are used as-is. Tri3 and Tri6 split each cell along the
/// diagonal from its lower-left to upper-right corner; Tri6 mid-side nodes sit
/// at edge midpoints.
pub fn structured(xs: &[f64], ys: &[f64], element_type: ElementType) -> Mesh {
    structured_with(xs, ys, element_type, |_, _, p| p)
}

/// Like [`structured`], with `shift(i, j, p)` moving each corner node
/// (i, j) before elements are built. Only for Quad4 and Tri3.
pub fn structured_with(
    xs: &[f64],
    ys: &[f64],
    element_type: ElementType,
    shift: impl Fn(usize, usize, Point2) -> Point2,
) -> Mesh {
    let nx = xs.len() - 1;
    let ny = ys.len() - 1;

    if element_type == ElementType::Tri6 {
        // refine to a (2nx+1) × (2ny+1) grid with midpoints on odd lines
        let fine = |c: &[f64]| -> Vec<f64> {
            (0..2 * c.len() - 1)
                .map(|k| {
                    if k % 2 == 0 {
                        c[k / 2]
                    } else {
                        0.5 * (c[k / 2] + c[k / 2 + 1])
                    }
                })
                .collect()
        };
        let fx = fine(xs);
        let fy = fine(ys);
        let stride = fx.len();
        let nodes: Vec<Point2> = fy
            .iter()
            .flat_map(|&y| fx.iter().map(move |&x| Point2::new(x, y)))
            .collect();
        let id = |i: usize, j: usize| j * stride + i;

        let mut connectivity = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let (i0, j0) = (2 * i, 2 * j);
                connectivity.push(vec![
                    id(i0, j0),
                    id(i0 + 2, j0),
                    id(i0 + 2, j0 + 2),
                    id(i0 + 2, j0 + 1),
                    id(i0 + 1, j0 + 1),
                    id(i0 + 1, j0),
                ]);
                connectivity.push(vec![
                    id(i0, j0),
                    id(i0 + 2, j0 + 2),
                    id(i0, j0 + 2),
                    id(i0 + 1, j0 + 2),
                    id(i0, j0 + 1),
                    id(i0 + 1, j0 + 1),
                ]);
            }
        }
        return Mesh::from_arrays(nodes, ElementType::Tri6, &connectivity).unwrap();
    }

    let stride = nx + 1;
    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for (j, &y) in ys.iter().enumerate() {
        for (i, &x) in xs.iter().enumerate() {
            nodes.push(shift(i, j, Point2::new(x, y)));
        }
    }
    let id = |i: usize, j: usize| j * stride + i;

    let mut connectivity = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1));
            match element_type {
                ElementType::Quad4 => connectivity.push(vec![a, b, c, d]),
                _ => {
                    connectivity.push(vec![a, b, c]);
                    connectivity.push(vec![a, c, d]);
                }
            }
        }
    }
    Mesh::from_arrays(nodes, element_type, &connectivity).unwrap()
}

/// Uniform `nx` × `ny` mesh of the rectangle [0, lx] × [0, ly].
pub fn rectangle(lx: f64, ly: f64, nx: usize, ny: usize, element_type: ElementType) -> Mesh {
    structured(&uniform(lx, nx), &uniform(ly, ny), element_type)
}

/// Nodes whose coordinates satisfy `predicate`.
pub fn nodes_where(mesh: &Mesh, predicate: impl Fn(&Point2) -> bool) -> Vec<usize> {
    mesh.nodes()
        .iter()
        .enumerate()
        .filter(|(_, p)| predicate(p))
        .map(|(i, _)| i)
        .collect()
}

/// Nodes on the line x = `x`.
pub fn nodes_at_x(mesh: &Mesh, x: f64) -> Vec<usize> {
    nodes_where(mesh, |p| (p.x - x).abs() < TOL)
}

/// Nodes on the line y = `y`.
pub fn nodes_at_y(mesh: &Mesh, y: f64) -> Vec<usize> {
    nodes_where(mesh, |p| (p.y - y).abs() < TOL)
}

/// Nodes on the outline of the mesh's bounding box.
pub fn boundary_nodes(mesh: &Mesh) -> Vec<usize> {
    let (lo, hi) = mesh.bounds().unwrap();
    nodes_where(mesh, |p| {
        (p.x - lo.x).abs() < TOL
            || (p.x - hi.x).abs() < TOL
            || (p.y - lo.y).abs() < TOL
            || (p.y - hi.y).abs() < TOL
    })
}
