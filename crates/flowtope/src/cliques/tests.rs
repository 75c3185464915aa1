use super::{DagCliques, TopologyError};
use crate::dag::{presets, FramedDag};

#[test]
fn square_cliques_in_canonical_order() {
    let cliques = DagCliques::new(&presets::square()).unwrap();
    assert_eq!(cliques.routes().len(), 4);
    assert_eq!(cliques.clique_size(), 3);
    let as_lists: Vec<&[usize]> = cliques
        .cliques()
        .iter()
        .map(|c| c.routes.as_slice())
        .collect();
    // Route 0 is the bottom route of both triangles, route 3 the top one; the
    // middle slot holds whichever diagonal route the triangle uses.
    assert_eq!(as_lists, vec![&[0, 1, 3][..], &[0, 2, 3]]);
}

#[test]
fn single_edge_has_one_singleton_clique() {
    let cliques = DagCliques::new(&presets::single_edge()).unwrap();
    assert_eq!(cliques.routes().len(), 1);
    assert_eq!(cliques.clique_size(), 1);
    assert_eq!(cliques.cliques().len(), 1);
    assert_eq!(cliques.cliques()[0].routes, vec![0]);
    assert_eq!(cliques.exceptional_routes(), &[0]);
}

#[test]
fn cube_has_six_cliques_of_size_four() {
    let cliques = DagCliques::new(&presets::cube()).unwrap();
    assert_eq!(cliques.routes().len(), 8);
    assert_eq!(cliques.cliques().len(), 6);
    assert_eq!(cliques.clique_size(), 4);
    // The all-bottom and all-top routes belong to every clique.
    assert_eq!(cliques.exceptional_routes(), &[0, 7]);
}

#[test]
fn clique_size_is_uniform_across_presets() {
    for name in presets::NAMES {
        let dag = presets::by_name(name).unwrap();
        let cliques = DagCliques::new(&dag).unwrap();
        for clique in cliques.cliques() {
            assert_eq!(
                clique.routes.len(),
                cliques.clique_size(),
                "ragged clique in preset {name}"
            );
        }
        // Canonical order is an order, not a multiset change.
        for clique in cliques.cliques() {
            let mut sorted = clique.routes.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), clique.routes.len());
        }
    }
}

#[test]
fn cliques_cover_routes_and_meet_in_the_exceptional_set() {
    for name in presets::NAMES {
        let dag = presets::by_name(name).unwrap();
        let cliques = DagCliques::new(&dag).unwrap();
        // Union: every route is a vertex of some top-dimensional simplex.
        let mut covered = vec![false; cliques.routes().len()];
        for clique in cliques.cliques() {
            for &r in &clique.routes {
                covered[r] = true;
            }
        }
        for (r, &hit) in covered.iter().enumerate() {
            assert!(hit, "route {r} missing from every clique in preset {name}");
        }
        // Intersection: the routes common to all cliques are exactly the
        // exceptional ones.
        let intersection: Vec<usize> = (0..cliques.routes().len())
            .filter(|r| cliques.cliques().iter().all(|c| c.routes.contains(r)))
            .collect();
        assert_eq!(
            intersection,
            cliques.exceptional_routes(),
            "exceptional set drifted in preset {name}"
        );
    }
}

#[test]
fn square_exceptional_routes() {
    let cliques = DagCliques::new(&presets::square()).unwrap();
    assert_eq!(cliques.exceptional_routes(), &[0, 3]);
}

#[test]
fn square_mutations_swap_the_diagonal() {
    let cliques = DagCliques::new(&presets::square()).unwrap();
    // The two triangles differ in their middle route (1 vs 2); the shared
    // boundary routes point each clique back at itself.
    assert_eq!(cliques.mutations()[0], vec![0, 1, 0]);
    assert_eq!(cliques.mutations()[1], vec![1, 0, 1]);
    assert_eq!(cliques.mutate_by_route_idx(0, 1), Some(1));
    assert_eq!(cliques.mutate_by_route_idx(1, 2), Some(0));
    assert_eq!(cliques.mutate_by_route_idx(0, 2), None);
}

#[test]
fn mutations_are_mutually_inverse() {
    for name in presets::NAMES {
        let dag = presets::by_name(name).unwrap();
        let cliques = DagCliques::new(&dag).unwrap();
        for c in 0..cliques.cliques().len() {
            for slot in 0..cliques.clique_size() {
                let d = cliques.mutate_by_slot(c, slot);
                if d == c {
                    continue;
                }
                // The route swapped in by the mutation must point straight back.
                let swapped_in = cliques.cliques()[d]
                    .routes
                    .iter()
                    .copied()
                    .find(|r| !cliques.cliques()[c].routes.contains(r))
                    .expect("neighboring cliques differ by one route");
                assert_eq!(
                    cliques.mutate_by_route_idx(d, swapped_in),
                    Some(c),
                    "mutation not involutive in preset {name}"
                );
            }
        }
    }
}

#[test]
fn cube_cliques_have_two_boundary_slots_each() {
    let cliques = DagCliques::new(&presets::cube()).unwrap();
    for c in 0..cliques.cliques().len() {
        let boundary = (0..cliques.clique_size())
            .filter(|&slot| cliques.mutate_by_slot(c, slot) == c)
            .count();
        // Only the exceptional routes (in every clique) cannot be swapped out.
        assert_eq!(boundary, 2);
    }
}

#[test]
fn square_clique_order_relation() {
    let cliques = DagCliques::new(&presets::square()).unwrap();
    assert!(cliques.clique_leq(0, 0));
    assert!(cliques.clique_leq(0, 1));
    assert!(!cliques.clique_leq(1, 0));
    assert!(cliques.clique_leq(1, 1));
}

#[test]
fn clique_order_is_a_partial_order() {
    for name in presets::NAMES {
        let dag = presets::by_name(name).unwrap();
        let cliques = DagCliques::new(&dag).unwrap();
        let n = cliques.cliques().len();
        for i in 0..n {
            assert!(cliques.clique_leq(i, i));
            for j in 0..n {
                if i != j && cliques.clique_leq(i, j) {
                    assert!(
                        !cliques.clique_leq(j, i),
                        "antisymmetry violated for ({i}, {j}) in preset {name}"
                    );
                }
                for k in 0..n {
                    if cliques.clique_leq(i, j) && cliques.clique_leq(j, k) {
                        assert!(
                            cliques.clique_leq(i, k),
                            "transitivity violated for ({i}, {j}, {k}) in preset {name}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn routes_at_filters_a_clique_by_edge() {
    let cliques = DagCliques::new(&presets::square()).unwrap();
    // Clique 0 is [0, 1, 3]; routes 0 and 1 start with edge 0, routes 1 and 3
    // end with edge 3.
    assert_eq!(cliques.routes_at(0, 0), vec![0, 1]);
    assert_eq!(cliques.routes_at(3, 0), vec![1, 3]);
    assert_eq!(cliques.routes_at(1, 0), vec![3]);
}

#[test]
fn multi_source_dag_is_rejected() {
    let mut dag = FramedDag::new(3);
    dag.add_edge(0, 2).unwrap();
    dag.add_edge(1, 2).unwrap();
    assert_eq!(
        DagCliques::new(&dag).unwrap_err(),
        TopologyError::NoUniqueSource { found: 2 }
    );
}

#[test]
fn multi_sink_dag_is_rejected() {
    let mut dag = FramedDag::new(3);
    dag.add_edge(0, 1).unwrap();
    dag.add_edge(0, 2).unwrap();
    assert_eq!(
        DagCliques::new(&dag).unwrap_err(),
        TopologyError::NoUniqueSink { found: 2 }
    );
}

#[test]
fn single_vertex_dag_has_no_routes_or_cliques() {
    let cliques = DagCliques::new(&FramedDag::new(1)).unwrap();
    assert!(cliques.routes().is_empty());
    assert!(cliques.cliques().is_empty());
    assert_eq!(cliques.clique_size(), 0);
    assert!(cliques.exceptional_routes().is_empty());
}

#[test]
fn construction_snapshots_the_dag() {
    let mut dag = presets::square();
    let cliques = DagCliques::new(&dag).unwrap();
    dag.remove_edge(0);
    assert_eq!(cliques.dag().num_edges(), 4);
    assert_eq!(cliques.routes().len(), 4);
}
