//! Routes and their pairwise shared subroutes.
//!
//! A route is a maximal source-to-sink path, stored as an edge-id sequence.
//! For every ordered pair of routes we decompose the overlap into maximal
//! runs of literally equal edge ids and record, at each end of a run, which
//! route's adjacent edge sits later in the framing there. Those two ternary
//! flags are the whole basis of route compatibility and of the clique poset.

use crate::dag::FramedDag;


/// A maximal source-to-sink path. Immutable once enumerated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub edges: Vec<usize>,
}

impl Route {
    /// The vertex sequence the route visits: start of the first edge, then
    /// every edge's end vertex.
    pub fn vertices(&self, dag: &FramedDag) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        if let Some(edge) = self.edges.first().and_then(|&e| dag.get_edge(e)) {
            out.push(edge.start);
        }
        for &e in &self.edges {
            if let Some(edge) = dag.get_edge(e) {
                out.push(edge.end);
            }
        }
        out
    }
}

/// Enumerate every route of a valid DAG by frontier expansion: one partial
/// path per source out-edge, each extended by every out-edge of its terminal
/// vertex until it reaches the sink. Discovery order is the route order used
/// everywhere downstream.
///
/// Precondition (checked by the callers that own validity): `source` and
/// `sink` are the DAG's unique source and sink.
pub fn enumerate_routes(dag: &FramedDag, source: usize, sink: usize) -> Vec<Route> {
    let mut routes = Vec::new();
    let mut partial: Vec<Vec<usize>> = dag
        .get_out_edges(source)
        .unwrap_or(&[])
        .iter()
        .map(|&e| vec![e])
        .collect();

    while !partial.is_empty() {
        let mut next = Vec::new();
        for path in partial {
            let last = *path.last().expect("partial paths are non-empty");
            let end = dag.get_edge(last).expect("edge ids come from the dag").end;
            if end == sink {
                routes.push(Route { edges: path });
            } else {
                for &e in dag.get_out_edges(end).unwrap_or(&[]) {
                    let mut longer = path.clone();
                    longer.push(e);
                    next.push(longer);
                }
            }
        }
        partial = next;
    }
    routes
}

/// One maximal run of identical consecutive edges shared by an ordered route
/// pair, with the relative framing order of the two routes at each end.
///
/// `in_order`/`out_order` are `1` when the first route's adjacent edge sits
/// later in the relevant framing than the second route's, `-1` when earlier,
/// and `0` only when the run touches the source (resp. sink) and there is no
/// adjacent edge to compare.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SharedSubroute {
    pub in_vert: usize,
    pub out_vert: usize,
    /// Edges of (route 1, route 2) immediately before the run, if any.
    pub in_edges: Option<(usize, usize)>,
    /// Edges of (route 1, route 2) immediately after the run, if any.
    pub out_edges: Option<(usize, usize)>,
    pub edges: Vec<usize>,
    pub in_order: i8,
    pub out_order: i8,
}

/// Pairwise shared-subroute decomposition of a route set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedSubrouteIndex {
    num_routes: usize,
    /// Row-major `num_routes × num_routes` table of run lists.
    table: Vec<Vec<SharedSubroute>>,
}

impl SharedSubrouteIndex {
    pub fn build(dag: &FramedDag, routes: &[Route]) -> Self {
        let vert_seqs: Vec<Vec<usize>> = routes.iter().map(|r| r.vertices(dag)).collect();
        let mut table = Vec::with_capacity(routes.len() * routes.len());
        for r1 in 0..routes.len() {
            for r2 in 0..routes.len() {
                table.push(shared_runs(
                    dag,
                    &routes[r1].edges,
                    &routes[r2].edges,
                    &vert_seqs[r1],
                    &vert_seqs[r2],
                ));
            }
        }
        Self {
            num_routes: routes.len(),
            table,
        }
    }

    /// Rebuild from persisted rows (already validated by the record layer).
    pub fn from_table(num_routes: usize, table: Vec<Vec<SharedSubroute>>) -> Self {
        debug_assert_eq!(table.len(), num_routes * num_routes);
        Self { num_routes, table }
    }

    pub fn num_routes(&self) -> usize {
        self.num_routes
    }

    /// Shared runs of the ordered pair `(r1, r2)`.
    pub fn shared(&self, r1: usize, r2: usize) -> &[SharedSubroute] {
        &self.table[r1 * self.num_routes + r2]
    }

    /// Two routes are compatible unless some shared run crosses: strictly
    /// opposite non-zero framing order on the two ends.
    pub fn compatible(&self, r1: usize, r2: usize) -> bool {
        self.shared(r1, r2)
            .iter()
            .all(|run| i32::from(run.in_order) * i32::from(run.out_order) >= 0)
    }

    /// Directional predicate feeding the clique poset: `r1` enters a shared
    /// run above `r2` and leaves below it. Not symmetric.
    pub fn up_incompatible(&self, r1: usize, r2: usize) -> bool {
        self.shared(r1, r2)
            .iter()
            .any(|run| run.in_order > 0 && run.out_order < 0)
    }
}

/// Scan `r1`'s vertex sequence for vertices shared with `r2`, extending each
/// hit into a maximal run of equal edge ids. The scan resumes directly after
/// each consumed run; a route visits no vertex twice, so runs never merge.
fn shared_runs(
    dag: &FramedDag,
    r1_edges: &[usize],
    r2_edges: &[usize],
    r1_verts: &[usize],
    r2_verts: &[usize],
) -> Vec<SharedSubroute> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < r1_verts.len() {
        let vert = r1_verts[i];
        let Some(j0) = r2_verts.iter().position(|&v| v == vert) else {
            i += 1;
            continue;
        };
        let start1 = i;
        let start2 = j0;
        let mut j = j0;

        let mut edges = Vec::new();
        while i < r1_edges.len() && j < r2_edges.len() && r1_edges[i] == r2_edges[j] {
            edges.push(r1_edges[i]);
            i += 1;
            j += 1;
        }
        let (end1, end2) = (i, j);

        let mut in_edges = None;
        let mut out_edges = None;
        let mut in_order: i8 = 0;
        let mut out_order: i8 = 0;

        if start1 != 0 {
            let e1 = r1_edges[start1 - 1];
            let e2 = r2_edges[start2 - 1];
            in_edges = Some((e1, e2));
            let framing = dag
                .get_in_edges(vert)
                .expect("run vertices belong to the dag");
            in_order = framing_order(framing, e1, e2);
        }
        if end1 < r1_edges.len() {
            let e1 = r1_edges[end1];
            let e2 = r2_edges[end2];
            out_edges = Some((e1, e2));
            let framing = dag
                .get_out_edges(r1_verts[end1])
                .expect("run vertices belong to the dag");
            out_order = framing_order(framing, e1, e2);
        }

        runs.push(SharedSubroute {
            in_vert: r1_verts[start1],
            out_vert: r1_verts[end1],
            in_edges,
            out_edges,
            edges,
            in_order,
            out_order,
        });
        i += 1;
    }
    runs
}

/// `1` if `e1` sits later than `e2` in `framing`, else `-1`.
fn framing_order(framing: &[usize], e1: usize, e2: usize) -> i8 {
    let pos = |e| framing.iter().position(|&f| f == e);
    match (pos(e1), pos(e2)) {
        (Some(p1), Some(p2)) if p1 > p2 => 1,
        _ => -1,
    }
}
