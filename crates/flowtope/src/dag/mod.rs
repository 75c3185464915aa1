//! Framed directed acyclic graphs.
//!
//! A framed DAG is a finite DAG together with, at every vertex, a fixed order
//! on the incident out-edges and (separately) the incident in-edges. The
//! framing is what downstream modules compare against when they decide which
//! of two routes passes "above" the other, so the orderings here are load
//! bearing, not cosmetic.
//!
//! Edge ids are dense: removing edge `k` shifts every id above `k` down by
//! one, in the edge table and in every framing.

pub mod presets;

use std::fmt;

#[cfg(test)]
mod tests;

/// Errors surfaced by structural DAG edits and queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DagError {
    /// A vertex index outside `[0, num_verts)` was supplied for `field`.
    NoSuchVertex { vertex: usize, field: &'static str },
    /// Adding the edge would close a directed cycle.
    IllegalCycle { start: usize, end: usize },
}

impl fmt::Display for DagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DagError::NoSuchVertex { vertex, field } => {
                write!(f, "no vertex with index {vertex} (field `{field}`)")
            }
            DagError::IllegalCycle { start, end } => write!(
                f,
                "edge {start} -> {end} rejected: end already precedes start"
            ),
        }
    }
}

impl std::error::Error for DagError {}

/// A directed edge, identified elsewhere by its dense index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
}

/// A DAG with a fixed vertex count and an explicit edge order at each vertex.
///
/// Invariant: `out_edges[v]` (resp. `in_edges[v]`) is always a permutation of
/// exactly the ids of edges leaving (resp. entering) `v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramedDag {
    num_verts: usize,
    edges: Vec<Edge>,
    out_edges: Vec<Vec<usize>>,
    in_edges: Vec<Vec<usize>>,
}

impl FramedDag {
    /// An edgeless DAG on `num_verts` vertices.
    pub fn new(num_verts: usize) -> Self {
        Self {
            num_verts,
            edges: Vec::new(),
            out_edges: vec![Vec::new(); num_verts],
            in_edges: vec![Vec::new(); num_verts],
        }
    }

    /// Assemble from fully validated parts (record layer only). The framing
    /// permutation invariant is the caller's responsibility.
    pub(crate) fn from_parts(
        num_verts: usize,
        edges: Vec<Edge>,
        out_edges: Vec<Vec<usize>>,
        in_edges: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            num_verts,
            edges,
            out_edges,
            in_edges,
        }
    }

    pub fn num_verts(&self) -> usize {
        self.num_verts
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn valid_vert(&self, v: usize) -> bool {
        v < self.num_verts
    }

    pub fn valid_edge(&self, e: usize) -> bool {
        e < self.edges.len()
    }

    pub fn get_edge(&self, e: usize) -> Option<Edge> {
        self.edges.get(e).copied()
    }

    /// Out-edge framing at `vert`, in order.
    pub fn get_out_edges(&self, vert: usize) -> Option<&[usize]> {
        self.out_edges.get(vert).map(Vec::as_slice)
    }

    /// In-edge framing at `vert`, in order.
    pub fn get_in_edges(&self, vert: usize) -> Option<&[usize]> {
        self.in_edges.get(vert).map(Vec::as_slice)
    }

    /// Append an edge `start -> end`, placing it last in both framings.
    /// Returns the new edge id.
    pub fn add_edge(&mut self, start: usize, end: usize) -> Result<usize, DagError> {
        for (v, field) in [(start, "start"), (end, "end")] {
            if !self.valid_vert(v) {
                return Err(DagError::NoSuchVertex { vertex: v, field });
            }
        }
        // Reachability catches longer cycles; `start == end` is the one cycle
        // that exists only after insertion.
        if start == end || self.precedes(end, start)? {
            return Err(DagError::IllegalCycle { start, end });
        }
        let id = self.edges.len();
        self.edges.push(Edge { start, end });
        self.out_edges[start].push(id);
        self.in_edges[end].push(id);
        Ok(id)
    }

    /// Delete edge `idx` and renumber every id above it downward by one.
    /// Returns `false` if no such edge exists.
    pub fn remove_edge(&mut self, idx: usize) -> bool {
        if !self.valid_edge(idx) {
            return false;
        }
        self.edges.remove(idx);
        let renumber = |list: &mut Vec<usize>| {
            list.retain(|&e| e != idx);
            for e in list.iter_mut() {
                if *e > idx {
                    *e -= 1;
                }
            }
        };
        for v in 0..self.num_verts {
            renumber(&mut self.out_edges[v]);
            renumber(&mut self.in_edges[v]);
        }
        true
    }

    /// Whether a directed path `start -> ... -> end` exists. Breadth-first
    /// frontier expansion over the edge table; terminates on any DAG.
    pub fn precedes(&self, start: usize, end: usize) -> Result<bool, DagError> {
        for (v, field) in [(start, "start"), (end, "end")] {
            if !self.valid_vert(v) {
                return Err(DagError::NoSuchVertex { vertex: v, field });
            }
        }
        let mut layer = vec![start];
        while !layer.is_empty() {
            let mut next = Vec::new();
            for edge in &self.edges {
                if layer.contains(&edge.start) {
                    if edge.end == end {
                        return Ok(true);
                    }
                    next.push(edge.end);
                }
            }
            layer = next;
        }
        Ok(false)
    }

    /// Replace the out-edge framing at `vert`. Rejected (returning `false`,
    /// leaving the framing untouched) unless `new_order` is a permutation of
    /// the current framing.
    pub fn reorder_out_edges(&mut self, vert: usize, new_order: Vec<usize>) -> bool {
        if !self.valid_vert(vert) || !is_permutation_of(&self.out_edges[vert], &new_order) {
            return false;
        }
        self.out_edges[vert] = new_order;
        true
    }

    /// In-edge analogue of [`reorder_out_edges`](Self::reorder_out_edges).
    pub fn reorder_in_edges(&mut self, vert: usize, new_order: Vec<usize>) -> bool {
        if !self.valid_vert(vert) || !is_permutation_of(&self.in_edges[vert], &new_order) {
            return false;
        }
        self.in_edges[vert] = new_order;
        true
    }

    /// All vertices with no in-edges.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.num_verts)
            .filter(|&v| self.in_edges[v].is_empty())
            .collect()
    }

    /// All vertices with no out-edges.
    pub fn sinks(&self) -> Vec<usize> {
        (0..self.num_verts)
            .filter(|&v| self.out_edges[v].is_empty())
            .collect()
    }

    /// The unique source, if there is exactly one.
    pub fn source(&self) -> Option<usize> {
        match self.sources().as_slice() {
            [s] => Some(*s),
            _ => None,
        }
    }

    /// The unique sink, if there is exactly one.
    pub fn sink(&self) -> Option<usize> {
        match self.sinks().as_slice() {
            [s] => Some(*s),
            _ => None,
        }
    }

    /// Valid for downstream route/clique/polytope construction: exactly one
    /// source and one sink. For this shape that also forces weak connectivity.
    pub fn is_valid(&self) -> bool {
        self.source().is_some() && self.sink().is_some()
    }
}

fn is_permutation_of(current: &[usize], replacement: &[usize]) -> bool {
    if current.len() != replacement.len() {
        return false;
    }
    let mut a = current.to_vec();
    let mut b = replacement.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
