use super::presets;
use super::{DagError, FramedDag};
use proptest::prelude::*;

#[test]
fn add_edge_returns_fresh_ids() {
    let mut dag = FramedDag::new(3);
    assert_eq!(dag.add_edge(0, 1), Ok(0));
    assert_eq!(dag.add_edge(0, 1), Ok(1));
    assert_eq!(dag.add_edge(1, 2), Ok(2));
    assert_eq!(dag.num_edges(), 3);
    assert_eq!(dag.get_out_edges(0), Some(&[0, 1][..]));
    assert_eq!(dag.get_in_edges(1), Some(&[0, 1][..]));
}

#[test]
fn add_edge_rejects_bad_vertices() {
    let mut dag = FramedDag::new(2);
    assert_eq!(
        dag.add_edge(2, 0),
        Err(DagError::NoSuchVertex {
            vertex: 2,
            field: "start"
        })
    );
    assert_eq!(
        dag.add_edge(0, 5),
        Err(DagError::NoSuchVertex {
            vertex: 5,
            field: "end"
        })
    );
    assert_eq!(dag.num_edges(), 0);
}

#[test]
fn add_edge_rejects_cycles() {
    let mut dag = FramedDag::new(3);
    dag.add_edge(0, 1).unwrap();
    dag.add_edge(1, 2).unwrap();
    assert_eq!(dag.add_edge(2, 0), Err(DagError::IllegalCycle { start: 2, end: 0 }));
    assert_eq!(dag.add_edge(1, 0), Err(DagError::IllegalCycle { start: 1, end: 0 }));
    // Parallel edges are fine; self-loops are cycles of length one.
    assert!(dag.add_edge(0, 1).is_ok());
    assert!(matches!(dag.add_edge(1, 1), Err(DagError::IllegalCycle { .. })));
}

#[test]
fn precedes_follows_paths_not_just_edges() {
    let mut dag = FramedDag::new(4);
    dag.add_edge(0, 1).unwrap();
    dag.add_edge(1, 2).unwrap();
    dag.add_edge(2, 3).unwrap();
    assert_eq!(dag.precedes(0, 3), Ok(true));
    assert_eq!(dag.precedes(3, 0), Ok(false));
    assert_eq!(dag.precedes(1, 1), Ok(false));
    assert!(dag.precedes(0, 9).is_err());
}

#[test]
fn reorder_requires_a_permutation() {
    let mut dag = presets::square();
    let before = dag.get_out_edges(0).unwrap().to_vec();

    assert!(!dag.reorder_out_edges(0, vec![0]));
    assert!(!dag.reorder_out_edges(0, vec![0, 0]));
    assert!(!dag.reorder_out_edges(0, vec![0, 2]));
    assert!(!dag.reorder_out_edges(7, vec![0, 1]));
    assert_eq!(dag.get_out_edges(0).unwrap(), before.as_slice());

    assert!(dag.reorder_out_edges(0, vec![1, 0]));
    assert_eq!(dag.get_out_edges(0), Some(&[1, 0][..]));
}

#[test]
fn remove_edge_renumbers_framings() {
    let mut dag = presets::cube();
    assert!(!dag.remove_edge(6));
    assert!(dag.remove_edge(1));
    assert_eq!(dag.num_edges(), 5);
    // Former edges 2..5 slide down by one everywhere.
    assert_eq!(dag.get_out_edges(0), Some(&[0][..]));
    assert_eq!(dag.get_out_edges(1), Some(&[1, 2][..]));
    assert_eq!(dag.get_in_edges(3), Some(&[3, 4][..]));
    assert_eq!(dag.get_edge(1).unwrap().start, 1);
}

#[test]
fn source_and_sink_must_be_unique() {
    let dag = presets::square();
    assert_eq!(dag.source(), Some(0));
    assert_eq!(dag.sink(), Some(2));
    assert!(dag.is_valid());

    // Two isolated vertices: two sources, two sinks.
    let lonely = FramedDag::new(2);
    assert_eq!(lonely.source(), None);
    assert_eq!(lonely.sink(), None);
    assert!(!lonely.is_valid());

    let mut forked = FramedDag::new(3);
    forked.add_edge(0, 2).unwrap();
    forked.add_edge(1, 2).unwrap();
    assert_eq!(forked.source(), None);
    assert_eq!(forked.sink(), Some(2));
}

proptest! {
    /// Forward edges on a vertex chain can never introduce a cycle, and every
    /// accepted edge id is fresh and dense.
    #[test]
    fn forward_edges_always_accepted(edges in prop::collection::vec((0usize..6, 0usize..6), 1..20)) {
        let mut dag = FramedDag::new(6);
        let mut accepted = 0;
        for (a, b) in edges {
            let (lo, hi) = (a.min(b), a.max(b));
            if lo == hi {
                continue;
            }
            let id = dag.add_edge(lo, hi).unwrap();
            prop_assert_eq!(id, accepted);
            accepted += 1;
        }
        prop_assert_eq!(dag.num_edges(), accepted);
    }

    /// Any true permutation of a framing is accepted and installed verbatim.
    #[test]
    fn reorder_accepts_every_permutation(seed in 0u64..1000) {
        let mut dag = presets::cube();
        let mut order = dag.get_out_edges(1).unwrap().to_vec();
        // Cheap deterministic shuffle.
        if seed % 2 == 1 {
            order.reverse();
        }
        prop_assert!(dag.reorder_out_edges(1, order.clone()));
        prop_assert_eq!(dag.get_out_edges(1).unwrap(), order.as_slice());
    }
}
