//! Prebuilt framed DAGs used by tests and the CLI.
//!
//! The catalogue mirrors the worked examples the project grew up on: small
//! multigraphs whose polytopes are known shapes (a square of two triangles,
//! a cube, ...) plus the caracol family.

use super::FramedDag;

/// 3 vertices, two parallel edges `0 -> 1`, two parallel edges `1 -> 2`.
/// Exactly 4 routes, 2 maximal cliques of size 3, polytope dimension 2.
pub fn square() -> FramedDag {
    let mut dag = FramedDag::new(3);
    for (s, e) in [(0, 1), (0, 1), (1, 2), (1, 2)] {
        dag.add_edge(s, e).expect("square preset is acyclic");
    }
    dag
}

/// 2 vertices joined by a single edge. One route, one clique, dimension 0.
pub fn single_edge() -> FramedDag {
    let mut dag = FramedDag::new(2);
    dag.add_edge(0, 1).expect("single edge is acyclic");
    dag
}

/// 4 vertices in a chain with every chain edge doubled; the polytope is a
/// 3-cube.
pub fn cube() -> FramedDag {
    let mut dag = FramedDag::new(4);
    for (s, e) in [(0, 1), (0, 1), (1, 2), (1, 2), (2, 3), (2, 3)] {
        dag.add_edge(s, e).expect("cube preset is acyclic");
    }
    dag
}

/// The cube DAG with the in-edge framing at vertex 2 flipped, which changes
/// the triangulation without changing the route set.
pub fn cube_reframed() -> FramedDag {
    let mut dag = cube();
    assert!(dag.reorder_in_edges(2, vec![3, 2]));
    dag
}

/// 4 vertices with a chord: edges 0->2, 0->1, 0->1, 1->2, 2->3, 2->3, 1->3.
pub fn chorded() -> FramedDag {
    let mut dag = FramedDag::new(4);
    for (s, e) in [(0, 2), (0, 1), (0, 1), (1, 2), (2, 3), (2, 3), (1, 3)] {
        dag.add_edge(s, e).expect("chorded preset is acyclic");
    }
    dag
}

/// Caracol DAG on `num_verts` vertices: a source fan, a spine, and a sink fan.
pub fn caracol(num_verts: usize) -> FramedDag {
    let mut dag = FramedDag::new(num_verts);
    for i in (1..num_verts.saturating_sub(1)).rev() {
        dag.add_edge(0, i).expect("caracol fan edge is acyclic");
    }
    for i in 0..num_verts.saturating_sub(1) {
        dag.add_edge(i, i + 1).expect("caracol spine edge is acyclic");
    }
    for i in (1..num_verts.saturating_sub(1)).rev() {
        dag.add_edge(i, num_verts - 1)
            .expect("caracol sink edge is acyclic");
    }
    dag
}

/// Look a preset up by name (CLI surface).
pub fn by_name(name: &str) -> Option<FramedDag> {
    match name {
        "square" => Some(square()),
        "single-edge" => Some(single_edge()),
        "cube" => Some(cube()),
        "cube-reframed" => Some(cube_reframed()),
        "chorded" => Some(chorded()),
        "caracol-5" => Some(caracol(5)),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &[
    "square",
    "single-edge",
    "cube",
    "cube-reframed",
    "chorded",
    "caracol-5",
];
