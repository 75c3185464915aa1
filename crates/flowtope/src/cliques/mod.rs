//! Maximal cliques of pairwise-compatible routes.
//!
//! `DagCliques` is the batch result of the whole combinatorial pipeline: the
//! route set, the shared-subroute index, every maximal clique (each one a
//! top-dimensional simplex of the polytope triangulation), the single-route
//! mutation table between neighboring cliques, the clique partial order, and
//! the exceptional routes common to every clique.
//!
//! Construction is all-or-nothing against a snapshot of the DAG; editing the
//! source DAG afterwards does not disturb an already-built value.

use std::fmt;

use crate::dag::FramedDag;
use crate::poset::HasseDiagram;
use crate::routes::{enumerate_routes, Route, SharedSubroute, SharedSubrouteIndex};

#[cfg(test)]
mod tests;

/// Rejection of a DAG that is structurally unfit for route enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    NoUniqueSource { found: usize },
    NoUniqueSink { found: usize },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::NoUniqueSource { found } => {
                write!(f, "expected exactly one source, found {found}")
            }
            TopologyError::NoUniqueSink { found } => {
                write!(f, "expected exactly one sink, found {found}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// A maximal set of pairwise-compatible routes, in canonical order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clique {
    pub routes: Vec<usize>,
}

/// The full combinatorial structure of a framed DAG's route complex.
#[derive(Clone, Debug)]
pub struct DagCliques {
    dag: FramedDag,
    routes: Vec<Route>,
    subroutes: SharedSubrouteIndex,
    cliques: Vec<Clique>,
    clique_size: usize,
    mutations: Vec<Vec<usize>>,
    leq: Vec<Vec<bool>>,
    hasse: HasseDiagram,
    exceptional_routes: Vec<usize>,
}

impl DagCliques {
    /// Run the batch pipeline against a snapshot of `dag`.
    pub fn new(dag: &FramedDag) -> Result<Self, TopologyError> {
        let source = dag.source().ok_or(TopologyError::NoUniqueSource {
            found: dag.sources().len(),
        })?;
        let sink = dag.sink().ok_or(TopologyError::NoUniqueSink {
            found: dag.sinks().len(),
        })?;
        let dag = dag.clone();

        let routes = enumerate_routes(&dag, source, sink);
        let subroutes = SharedSubrouteIndex::build(&dag, &routes);
        let cliques = enumerate_cliques(&dag, source, &routes, &subroutes);
        let clique_size = cliques.first().map_or(0, |c| c.routes.len());
        let mutations = mutation_table(&cliques, clique_size);

        let n = cliques.len();
        let mut leq = vec![vec![false; n]; n];
        for (i, row) in leq.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = i == j
                    || cliques[i].routes.iter().all(|&r1| {
                        cliques[j]
                            .routes
                            .iter()
                            .all(|&r2| !subroutes.up_incompatible(r1, r2))
                    });
            }
        }
        let hasse = HasseDiagram::from_poset(&leq, &cliques);

        let exceptional_routes = (0..routes.len())
            .filter(|r| cliques.iter().all(|c| c.routes.contains(r)))
            .collect();

        Ok(Self {
            dag,
            routes,
            subroutes,
            cliques,
            clique_size,
            mutations,
            leq,
            hasse,
            exceptional_routes,
        })
    }

    pub fn dag(&self) -> &FramedDag {
        &self.dag
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn cliques(&self) -> &[Clique] {
        &self.cliques
    }

    pub fn clique_size(&self) -> usize {
        self.clique_size
    }

    pub fn mutations(&self) -> &[Vec<usize>] {
        &self.mutations
    }

    pub fn leq_matrix(&self) -> &[Vec<bool>] {
        &self.leq
    }

    pub fn hasse(&self) -> &HasseDiagram {
        &self.hasse
    }

    pub fn exceptional_routes(&self) -> &[usize] {
        &self.exceptional_routes
    }

    pub fn clique_leq(&self, c1: usize, c2: usize) -> bool {
        self.leq[c1][c2]
    }

    pub fn shared_subroutes(&self, r1: usize, r2: usize) -> &[SharedSubroute] {
        self.subroutes.shared(r1, r2)
    }

    pub fn subroute_index(&self) -> &SharedSubrouteIndex {
        &self.subroutes
    }

    /// Route ids of `clique` that pass through `edge`.
    pub fn routes_at(&self, edge: usize, clique: usize) -> Vec<usize> {
        self.cliques[clique]
            .routes
            .iter()
            .copied()
            .filter(|&r| self.routes[r].edges.contains(&edge))
            .collect()
    }

    /// Neighboring clique after swapping out `route` (a route id); `None`
    /// if the clique does not contain that route.
    pub fn mutate_by_route_idx(&self, clique: usize, route: usize) -> Option<usize> {
        let slot = self.cliques[clique].routes.iter().position(|&r| r == route)?;
        Some(self.mutations[clique][slot])
    }

    /// Neighboring clique across `slot`; the clique's own id on a boundary
    /// facet.
    pub fn mutate_by_slot(&self, clique: usize, slot: usize) -> usize {
        self.mutations[clique][slot]
    }

    /// Reassemble a previously computed value from validated parts (record
    /// layer only).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        dag: FramedDag,
        routes: Vec<Route>,
        subroutes: SharedSubrouteIndex,
        cliques: Vec<Clique>,
        clique_size: usize,
        mutations: Vec<Vec<usize>>,
        leq: Vec<Vec<bool>>,
        hasse: HasseDiagram,
        exceptional_routes: Vec<usize>,
    ) -> Self {
        Self {
            dag,
            routes,
            subroutes,
            cliques,
            clique_size,
            mutations,
            leq,
            hasse,
            exceptional_routes,
        }
    }
}

/// Level-synchronous maximal-clique search: grow every set by all compatible
/// route ids strictly above its maximum; once a whole level admits no
/// extension, that level is the maximal cliques. Uniform clique size is a
/// structural property of the route complex, not enforced here.
fn enumerate_cliques(
    dag: &FramedDag,
    source: usize,
    routes: &[Route],
    subroutes: &SharedSubrouteIndex,
) -> Vec<Clique> {
    let mut level: Vec<Vec<usize>> = (0..routes.len()).map(|r| vec![r]).collect();
    if level.is_empty() {
        return Vec::new();
    }
    loop {
        let mut next = Vec::new();
        for set in &level {
            let start = set.iter().copied().max().unwrap_or(0) + 1;
            for candidate in start..routes.len() {
                if set.iter().all(|&r| subroutes.compatible(r, candidate)) {
                    let mut grown = set.clone();
                    grown.push(candidate);
                    next.push(grown);
                }
            }
        }
        if next.is_empty() {
            return level
                .iter()
                .map(|set| order_clique(set, dag, source, routes, subroutes))
                .collect();
        }
        level = next;
    }
}

/// Canonical intra-clique order: per edge, sort the clique's routes through
/// that edge by their framing order at the edge's shared run, then
/// concatenate the per-edge lists following the source's out-edge framing.
/// Each clique route starts with exactly one source out-edge, so the
/// concatenation lists every route once.
fn order_clique(
    route_ids: &[usize],
    dag: &FramedDag,
    source: usize,
    routes: &[Route],
    subroutes: &SharedSubrouteIndex,
) -> Clique {
    let mut per_edge: Vec<Vec<usize>> = Vec::with_capacity(dag.num_edges());
    for edge in 0..dag.num_edges() {
        let mut on_edge: Vec<usize> = (0..route_ids.len())
            .filter(|&i| routes[route_ids[i]].edges.contains(&edge))
            .collect();
        on_edge.sort_by(|&a, &b| local_edge_order(edge, route_ids[a], route_ids[b], subroutes));
        per_edge.push(on_edge);
    }

    let mut ordered = Vec::with_capacity(route_ids.len());
    for &edge in dag.get_out_edges(source).unwrap_or(&[]) {
        for &i in &per_edge[edge] {
            ordered.push(route_ids[i]);
        }
    }
    Clique { routes: ordered }
}

/// Compare two routes at `edge` via their shared run through it: `in_order`,
/// falling back to `out_order` when the run starts at the source. Pairs with
/// no run through the edge are a stable tie.
fn local_edge_order(
    edge: usize,
    r1: usize,
    r2: usize,
    subroutes: &SharedSubrouteIndex,
) -> std::cmp::Ordering {
    for run in subroutes.shared(r1, r2) {
        if run.edges.contains(&edge) {
            let order = if run.in_order == 0 {
                run.out_order
            } else {
                run.in_order
            };
            return order.cmp(&0);
        }
    }
    std::cmp::Ordering::Equal
}

/// For every clique pair differing in exactly one route, point the differing
/// slot of each at the other; untouched slots keep the clique's own id.
fn mutation_table(cliques: &[Clique], clique_size: usize) -> Vec<Vec<usize>> {
    let mut table: Vec<Vec<usize>> = (0..cliques.len())
        .map(|i| vec![i; clique_size])
        .collect();
    for c1 in 0..cliques.len() {
        for c2 in c1 + 1..cliques.len() {
            let shared = cliques[c1]
                .routes
                .iter()
                .filter(|r| cliques[c2].routes.contains(r))
                .count();
            if shared + 1 != clique_size {
                continue;
            }
            let slot_of = |from: &Clique, other: &Clique| {
                from.routes
                    .iter()
                    .position(|r| !other.routes.contains(r))
                    .expect("cliques differing by one route have a unique odd slot")
            };
            table[c1][slot_of(&cliques[c1], &cliques[c2])] = c2;
            table[c2][slot_of(&cliques[c2], &cliques[c1])] = c1;
        }
    }
    table
}
