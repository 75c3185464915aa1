//! Persisted boundary records.
//!
//! The framed DAG travels as its framings alone: `{num_verts, out_edges,
//! in_edges}`. Edge endpoints are derived on load by cross-referencing which
//! vertex lists each id as outgoing vs. incoming, and every malformed shape
//! (an id with no start, two ends, a hole in the id space, ragged tables, a
//! directed cycle) is a typed [`DataError`] naming the violated invariant.
//!
//! `DagCliquesRecord` and `FlowPolytopeRecord` persist finished batch
//! results; reloading reconstructs values whose query methods behave exactly
//! like the freshly computed originals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cliques::{Clique, DagCliques};
use crate::dag::{Edge, FramedDag};
use crate::polytope::FlowPolytope;
use crate::poset::HasseDiagram;
use crate::routes::{Route, SharedSubroute, SharedSubrouteIndex};


/// Malformed persisted data; always recoverable, never partial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataError {
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// Edge id listed by no vertex in the given direction.
    MissingEndpoint { edge: usize, field: &'static str },
    /// Edge id listed by more than one vertex in the given direction.
    DuplicateEndpoint { edge: usize, field: &'static str },
    /// Edge id space has a hole: this id appears in no framing at all.
    NonContiguousEdgeIds { edge: usize },
    /// The framings close a directed cycle; `edge` leaves a vertex on it.
    CyclicEdges { edge: usize },
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        max: usize,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::LengthMismatch {
                field,
                expected,
                found,
            } => write!(f, "field `{field}` has length {found}, expected {expected}"),
            DataError::MissingEndpoint { edge, field } => {
                write!(f, "edge {edge} has no {field} vertex")
            }
            DataError::DuplicateEndpoint { edge, field } => {
                write!(f, "edge {edge} has more than one {field} vertex")
            }
            DataError::NonContiguousEdgeIds { edge } => {
                write!(f, "edge id space is not contiguous: id {edge} is unused")
            }
            DataError::CyclicEdges { edge } => {
                write!(f, "edge {edge} leaves a vertex on a directed cycle")
            }
            DataError::IndexOutOfRange { field, index, max } => {
                write!(f, "field `{field}` holds index {index}, valid range is 0..{max}")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Framed DAG as persisted: vertex count plus both framings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramedDagRecord {
    pub num_verts: usize,
    pub out_edges: Vec<Vec<usize>>,
    pub in_edges: Vec<Vec<usize>>,
}

impl FramedDagRecord {
    pub fn of(dag: &FramedDag) -> Self {
        Self {
            num_verts: dag.num_verts(),
            out_edges: (0..dag.num_verts())
                .map(|v| dag.get_out_edges(v).unwrap_or(&[]).to_vec())
                .collect(),
            in_edges: (0..dag.num_verts())
                .map(|v| dag.get_in_edges(v).unwrap_or(&[]).to_vec())
                .collect(),
        }
    }

    /// Derive the edge table and rebuild the DAG.
    pub fn load(&self) -> Result<FramedDag, DataError> {
        for (field, framing) in [("out_edges", &self.out_edges), ("in_edges", &self.in_edges)] {
            if framing.len() != self.num_verts {
                return Err(DataError::LengthMismatch {
                    field,
                    expected: self.num_verts,
                    found: framing.len(),
                });
            }
        }

        let num_edges = self
            .out_edges
            .iter()
            .chain(self.in_edges.iter())
            .flatten()
            .max()
            .map_or(0, |&m| m + 1);

        let mut starts: Vec<Option<usize>> = vec![None; num_edges];
        let mut ends: Vec<Option<usize>> = vec![None; num_edges];
        for vert in 0..self.num_verts {
            for &e in &self.out_edges[vert] {
                if starts[e].replace(vert).is_some() {
                    return Err(DataError::DuplicateEndpoint {
                        edge: e,
                        field: "start",
                    });
                }
            }
            for &e in &self.in_edges[vert] {
                if ends[e].replace(vert).is_some() {
                    return Err(DataError::DuplicateEndpoint {
                        edge: e,
                        field: "end",
                    });
                }
            }
        }

        let mut edges = Vec::with_capacity(num_edges);
        for e in 0..num_edges {
            let edge = match (starts[e], ends[e]) {
                (Some(start), Some(end)) => Edge { start, end },
                (None, None) => return Err(DataError::NonContiguousEdgeIds { edge: e }),
                (None, Some(_)) => {
                    return Err(DataError::MissingEndpoint {
                        edge: e,
                        field: "start",
                    })
                }
                (Some(_), None) => {
                    return Err(DataError::MissingEndpoint {
                        edge: e,
                        field: "end",
                    })
                }
            };
            edges.push(edge);
        }

        // Kahn peel: in an acyclic graph every vertex eventually reaches
        // in-degree zero. An edge whose start vertex never does sits on or
        // downstream of a directed cycle the framings smuggled in.
        let mut in_degree = vec![0usize; self.num_verts];
        for edge in &edges {
            in_degree[edge.end] += 1;
        }
        let mut ready: Vec<usize> = (0..self.num_verts)
            .filter(|&v| in_degree[v] == 0)
            .collect();
        let mut peeled = vec![false; self.num_verts];
        while let Some(vert) = ready.pop() {
            peeled[vert] = true;
            for &e in &self.out_edges[vert] {
                let end = edges[e].end;
                in_degree[end] -= 1;
                if in_degree[end] == 0 {
                    ready.push(end);
                }
            }
        }
        if let Some(e) = (0..edges.len()).find(|&e| !peeled[edges[e].start]) {
            return Err(DataError::CyclicEdges { edge: e });
        }

        Ok(FramedDag::from_parts(
            self.num_verts,
            edges,
            self.out_edges.clone(),
            self.in_edges.clone(),
        ))
    }
}

/// Covering-relation data as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasseRecord {
    pub poset_size: usize,
    pub covering_relation: Vec<Vec<bool>>,
    pub minimal_elt: usize,
    pub maximal_elt: usize,
    pub cover_routes: Vec<Vec<Option<(usize, usize)>>>,
}

impl HasseRecord {
    pub fn of(hasse: &HasseDiagram) -> Self {
        Self {
            poset_size: hasse.poset_size,
            covering_relation: hasse.covering_relation.clone(),
            minimal_elt: hasse.minimal_elt,
            maximal_elt: hasse.maximal_elt,
            cover_routes: hasse.cover_routes.clone(),
        }
    }
}

/// The full combinatorial batch result as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagCliquesRecord {
    pub dag: FramedDagRecord,
    pub routes: Vec<Vec<usize>>,
    pub cliques: Vec<Vec<usize>>,
    pub clique_size: usize,
    pub exceptional_routes: Vec<usize>,
    pub mutations: Vec<Vec<usize>>,
    pub clique_leq_matrix: Vec<Vec<bool>>,
    pub shared_subroutes: Vec<Vec<Vec<SharedSubroute>>>,
    pub hasse: HasseRecord,
}

impl DagCliquesRecord {
    pub fn of(cliques: &DagCliques) -> Self {
        let n = cliques.routes().len();
        Self {
            dag: FramedDagRecord::of(cliques.dag()),
            routes: cliques.routes().iter().map(|r| r.edges.clone()).collect(),
            cliques: cliques.cliques().iter().map(|c| c.routes.clone()).collect(),
            clique_size: cliques.clique_size(),
            exceptional_routes: cliques.exceptional_routes().to_vec(),
            mutations: cliques.mutations().to_vec(),
            clique_leq_matrix: cliques.leq_matrix().to_vec(),
            shared_subroutes: (0..n)
                .map(|r1| {
                    (0..n)
                        .map(|r2| cliques.shared_subroutes(r1, r2).to_vec())
                        .collect()
                })
                .collect(),
            hasse: HasseRecord::of(cliques.hasse()),
        }
    }

    /// Validate shapes and index ranges, then reassemble the live value.
    pub fn load(&self) -> Result<DagCliques, DataError> {
        let dag = self.dag.load()?;
        let num_routes = self.routes.len();
        let num_cliques = self.cliques.len();

        for route in &self.routes {
            check_indices("routes", route, dag.num_edges())?;
        }
        for clique in &self.cliques {
            check_len("cliques", clique.len(), self.clique_size)?;
            check_indices("cliques", clique, num_routes)?;
        }
        check_indices("exceptional_routes", &self.exceptional_routes, num_routes)?;

        check_len("mutations", self.mutations.len(), num_cliques)?;
        for row in &self.mutations {
            check_len("mutations", row.len(), self.clique_size)?;
            check_indices("mutations", row, num_cliques)?;
        }
        check_len("clique_leq_matrix", self.clique_leq_matrix.len(), num_cliques)?;
        for row in &self.clique_leq_matrix {
            check_len("clique_leq_matrix", row.len(), num_cliques)?;
        }

        check_len("shared_subroutes", self.shared_subroutes.len(), num_routes)?;
        let mut table = Vec::with_capacity(num_routes * num_routes);
        for row in &self.shared_subroutes {
            check_len("shared_subroutes", row.len(), num_routes)?;
            for runs in row {
                table.push(runs.clone());
            }
        }

        check_len("hasse.covering_relation", self.hasse.covering_relation.len(), num_cliques)?;
        check_len("hasse.cover_routes", self.hasse.cover_routes.len(), num_cliques)?;
        check_len("hasse.poset_size", self.hasse.poset_size, num_cliques)?;
        if num_cliques > 0 {
            for (field, elt) in [
                ("hasse.minimal_elt", self.hasse.minimal_elt),
                ("hasse.maximal_elt", self.hasse.maximal_elt),
            ] {
                if elt >= num_cliques {
                    return Err(DataError::IndexOutOfRange {
                        field,
                        index: elt,
                        max: num_cliques,
                    });
                }
            }
        }

        let hasse = HasseDiagram {
            poset_size: self.hasse.poset_size,
            covering_relation: self.hasse.covering_relation.clone(),
            minimal_elt: self.hasse.minimal_elt,
            maximal_elt: self.hasse.maximal_elt,
            cover_routes: self.hasse.cover_routes.clone(),
        };

        Ok(DagCliques::from_parts(
            dag,
            self.routes
                .iter()
                .map(|edges| Route {
                    edges: edges.clone(),
                })
                .collect(),
            SharedSubrouteIndex::from_table(num_routes, table),
            self.cliques
                .iter()
                .map(|routes| Clique {
                    routes: routes.clone(),
                })
                .collect(),
            self.clique_size,
            self.mutations.clone(),
            self.clique_leq_matrix.clone(),
            hasse,
            self.exceptional_routes.clone(),
        ))
    }
}

/// Reduced polytope embedding as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowPolytopeRecord {
    pub dim: usize,
    pub vertices: Vec<Vec<f64>>,
    pub external_simplices: Vec<Vec<usize>>,
}

impl FlowPolytopeRecord {
    pub fn of(polytope: &FlowPolytope) -> Self {
        Self {
            dim: polytope.dim,
            vertices: polytope
                .vertices
                .iter()
                .map(|v| v.iter().copied().collect())
                .collect(),
            external_simplices: polytope.external_simplices.clone(),
        }
    }

    pub fn load(&self) -> Result<FlowPolytope, DataError> {
        for coords in &self.vertices {
            check_len("vertices", coords.len(), self.dim)?;
        }
        for simplex in &self.external_simplices {
            check_indices("external_simplices", simplex, self.vertices.len())?;
        }
        Ok(FlowPolytope {
            dim: self.dim,
            vertices: self
                .vertices
                .iter()
                .map(|coords| nalgebra::DVector::from_vec(coords.clone()))
                .collect(),
            external_simplices: self.external_simplices.clone(),
        })
    }
}

fn check_len(field: &'static str, found: usize, expected: usize) -> Result<(), DataError> {
    if found != expected {
        return Err(DataError::LengthMismatch {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_indices(field: &'static str, indices: &[usize], max: usize) -> Result<(), DataError> {
    for &index in indices {
        if index >= max {
            return Err(DataError::IndexOutOfRange { field, index, max });
        }
    }
    Ok(())
}
