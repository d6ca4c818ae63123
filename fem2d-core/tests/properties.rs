//! Property tests over randomly shaped elements and element orderings.

mod common;

use approx::assert_relative_eq;
use fem2d_core::assembly::{assemble, AssemblyOptions};
use fem2d_core::element::{create_element, Physics};
use fem2d_core::material::{Material, ThermalMaterial};
use fem2d_core::mesh::{ElementType, Mesh};
use fem2d_core::types::Point2;
use nalgebra::{DMatrix, SymmetricEigen};
use proptest::prelude::*;

fn physics_pair() -> [Physics; 2] {
    [
        Physics::Conduction(ThermalMaterial::new(1.0).unwrap()),
        Physics::plane_stress(Material::new(1.0, 0.3).unwrap(), 1.0),
    ]
}

/// Corner jitter small enough that the reference shape stays convex.
fn jitter(n: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-0.1..0.1f64, -0.1..0.1f64), n)
}

fn placement() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.2..5.0f64, -10.0..10.0f64, -10.0..10.0f64)
}

fn place(
    reference: &[(f64, f64)],
    offsets: &[(f64, f64)],
    (scale, dx, dy): (f64, f64, f64),
) -> Vec<Point2> {
    reference
        .iter()
        .zip(offsets)
        .map(|(&(x, y), &(ox, oy))| Point2::new(scale * (x + ox) + dx, scale * (y + oy) + dy))
        .collect()
}

/// Quadratic triangle with straight sides through the given corners.
fn with_midpoints(c: &[Point2]) -> Vec<Point2> {
    vec![
        c[0],
        c[1],
        c[2],
        (c[1] + c[2]) / 2.0,
        (c[2] + c[0]) / 2.0,
        (c[0] + c[1]) / 2.0,
    ]
}

fn check_stiffness(element_type: ElementType, coords: &[Point2]) {
    for physics in physics_pair() {
        let element = create_element(element_type, &physics, None).unwrap();
        let k = element.stiffness(coords).unwrap();
        let scale = k.amax();

        let asym = (&k - k.transpose()).amax();
        assert!(asym <= 1e-12 * scale, "asymmetry {} for {:?}", asym, element_type);

        let eigenvalues = SymmetricEigen::new(k).eigenvalues;
        let min = eigenvalues.min();
        assert!(min > -1e-10 * scale, "negative eigenvalue {} for {:?}", min, element_type);

        let zero = eigenvalues.iter().filter(|&&l| l.abs() < 1e-9 * scale).count();
        let rigid = if physics.dofs_per_node() == 1 { 1 } else { 3 };
        assert_eq!(zero, rigid, "{:?} eigenvalues {}", element_type, eigenvalues);
    }
}

fn dense(mesh: &Mesh, physics: &Physics) -> DMatrix<f64> {
    let system = assemble(mesh, physics, &AssemblyOptions::default()).unwrap();
    DMatrix::from(&system.stiffness)
}

proptest! {
    #[test]
    fn quad4_stiffness_is_symmetric_psd(offsets in jitter(4), at in placement()) {
        let reference = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        check_stiffness(ElementType::Quad4, &place(&reference, &offsets, at));
    }

    #[test]
    fn tri3_stiffness_is_symmetric_psd(offsets in jitter(3), at in placement()) {
        let reference = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        check_stiffness(ElementType::Tri3, &place(&reference, &offsets, at));
    }

    #[test]
    fn tri6_stiffness_is_symmetric_psd(offsets in jitter(3), at in placement()) {
        let reference = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let corners = place(&reference, &offsets, at);
        check_stiffness(ElementType::Tri6, &with_midpoints(&corners));
    }

    #[test]
    fn assembly_is_order_independent(
        order in Just((0..8).collect::<Vec<usize>>()).prop_shuffle(),
        element_type in prop_oneof![Just(ElementType::Quad4), Just(ElementType::Tri3)],
    ) {
        let mesh = common::rectangle(2.0, 1.0, 4, 2, element_type);
        let connectivity: Vec<Vec<usize>> = mesh
            .elements()
            .iter()
            .map(|e| e.nodes.clone())
            .collect();
        // only the first eight elements are shuffled for Tri3 meshes
        let mut permuted: Vec<Vec<usize>> =
            order.iter().map(|&i| connectivity[i].clone()).collect();
        permuted.extend(connectivity.iter().skip(8).cloned());
        let shuffled = Mesh::from_arrays(mesh.nodes().to_vec(), element_type, &permuted).unwrap();

        for physics in physics_pair() {
            let a = dense(&mesh, &physics);
            let b = dense(&shuffled, &physics);
            assert_relative_eq!(a, b, epsilon = 1e-12 * a.amax());
        }
    }

    #[test]
    fn center_node_patch_is_exact(dx in -0.3..0.3f64, dy in -0.3..0.3f64) {
        // four quads around one movable interior node
        let mesh = common::structured_with(
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0, 2.0],
            ElementType::Quad4,
            |i, j, p| if i == 1 && j == 1 { Point2::new(p.x + dx, p.y + dy) } else { p },
        );
        let physics = Physics::Conduction(ThermalMaterial::new(1.0).unwrap());
        let mut analysis = fem2d_core::analysis::LinearAnalysis::new(&mesh, physics);
        for node in common::boundary_nodes(&mesh) {
            let p = mesh.nodes()[node];
            analysis = analysis.prescribe(node, 0, 1.0 + p.x - 2.0 * p.y);
        }
        let solution = analysis.run().unwrap();
        let center = mesh.nodes()[4];
        assert_relative_eq!(
            solution.node_value(4, 0).unwrap(),
            1.0 + center.x - 2.0 * center.y,
            epsilon = 1e-12
        );
    }
}
