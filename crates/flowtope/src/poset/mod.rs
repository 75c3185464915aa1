//! Covering relation and extremal elements of the clique poset.
//!
//! The clique order `leq` is computed in `cliques`; this module extracts the
//! structure a Hasse diagram is drawn from: the transitive reduction, the
//! unique minimal and maximal cliques, and for each covering pair the two
//! routes mutated across it. Visual layout is a renderer concern and absent.

use crate::cliques::Clique;


/// Covering-relation view of the clique partial order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HasseDiagram {
    pub poset_size: usize,
    /// `covering[i][j]`: clique `i` is covered by clique `j`.
    pub covering_relation: Vec<Vec<bool>>,
    /// Clique below every other clique.
    pub minimal_elt: usize,
    /// Clique below no other clique.
    pub maximal_elt: usize,
    /// For each covering pair `(i, j)`, the `(lower, higher)` route ids
    /// mutated across it; `None` off the covering relation.
    pub cover_routes: Vec<Vec<Option<(usize, usize)>>>,
}

impl HasseDiagram {
    /// Derive the covering relation from a reflexive-transitive `leq` matrix.
    ///
    /// The input comes from a polytope triangulation, so the poset has a
    /// unique minimum (below everything) and a unique maximum (below nothing
    /// else); this is assumed, not validated.
    pub fn from_poset(leq: &[Vec<bool>], cliques: &[Clique]) -> Self {
        let n = leq.len();
        let mut covering = vec![vec![false; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || !leq[i][j] {
                    continue;
                }
                let through_middle =
                    (0..n).any(|k| k != i && k != j && leq[i][k] && leq[k][j]);
                covering[i][j] = !through_middle;
            }
        }

        let mut minimal_elt = 0;
        let mut maximal_elt = 0;
        for i in 0..n {
            let num_geq = (0..n).filter(|&j| leq[i][j]).count();
            if num_geq == 1 {
                maximal_elt = i;
            }
            if num_geq == n {
                minimal_elt = i;
            }
        }

        let mut cover_routes = vec![vec![None; n]; n];
        for i in 0..n {
            for j in 0..n {
                if !covering[i][j] {
                    continue;
                }
                let lower = cliques[i]
                    .routes
                    .iter()
                    .find(|r| !cliques[j].routes.contains(r));
                let higher = cliques[j]
                    .routes
                    .iter()
                    .find(|r| !cliques[i].routes.contains(r));
                if let (Some(&lo), Some(&hi)) = (lower, higher) {
                    cover_routes[i][j] = Some((lo, hi));
                }
            }
        }

        Self {
            poset_size: n,
            covering_relation: covering,
            minimal_elt,
            maximal_elt,
            cover_routes,
        }
    }
}
