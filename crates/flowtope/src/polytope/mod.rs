//! Geometric realization of the route complex.
//!
//! Routes embed as 0/1 indicator vectors over the edge set; the polytope is
//! their convex hull, which lives in an affine subspace of dimension
//! `num_edges - num_verts + 1`. We pick a basis from the poset-maximal
//! clique, change coordinates onto it via Gauss-Jordan elimination, and (for
//! renderable dimensions 2 and 3) round the result with the bounding
//! ellipsoid fit from `ellipsoid`. The exceptional simplex common to every
//! clique can additionally be collapsed to a point, giving the quotient
//! polytope in its orthogonal complement.

pub mod ellipsoid;
pub mod linalg;

use std::fmt;

use nalgebra::DVector;

use crate::cliques::DagCliques;


/// Numeric tolerances for the reduction pipeline.
#[derive(Clone, Copy, Debug)]
pub struct NumCfg {
    /// Pivot threshold for Gauss-Jordan / rref singularity detection.
    pub eps_pivot: f64,
    /// Below this a vector counts as collapsed to zero.
    pub eps_zero: f64,
    /// Convergence tolerance of the ellipsoid weight iteration.
    pub ellipsoid_tol: f64,
}

impl Default for NumCfg {
    fn default() -> Self {
        Self {
            eps_pivot: 1e-9,
            eps_zero: 1e-7,
            ellipsoid_tol: 0.01,
        }
    }
}

/// Degenerate numerical input; fatal to polytope construction, never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumericError {
    /// The clique basis failed to row-reduce (no usable pivot in `column`).
    DegenerateBasis { column: usize },
    /// A matrix inversion hit a numerically zero determinant.
    SingularMatrix { what: &'static str },
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::DegenerateBasis { column } => {
                write!(f, "clique basis is degenerate at column {column}")
            }
            NumericError::SingularMatrix { what } => {
                write!(f, "singular matrix while inverting {what}")
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// Reduced-dimension embedding of the flow polytope: one vertex per route,
/// plus the boundary simplices the renderer draws.
///
/// `external_simplices` is rendering data, not mathematics: in dimension 2
/// every top-dimensional simplex is listed, since a flat polytope has no
/// useful interior/exterior split.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPolytope {
    pub dim: usize,
    pub vertices: Vec<DVector<f64>>,
    pub external_simplices: Vec<Vec<usize>>,
}

impl FlowPolytope {
    /// Build the polytope for a computed clique structure with default
    /// tolerances.
    pub fn from_cliques(cliques: &DagCliques) -> Result<Self, NumericError> {
        Self::from_cliques_with(cliques, &NumCfg::default())
    }

    pub fn from_cliques_with(cliques: &DagCliques, cfg: &NumCfg) -> Result<Self, NumericError> {
        let dag = cliques.dag();
        let ambient = dag.num_edges();
        let dim = ambient + 1 - dag.num_verts();

        let indicators: Vec<DVector<f64>> = cliques
            .routes()
            .iter()
            .map(|route| {
                let mut v = DVector::zeros(ambient);
                for &e in &route.edges {
                    v[e] = 1.0;
                }
                v
            })
            .collect();

        if indicators.is_empty() {
            // A single-vertex DAG is valid but has no routes; nothing to embed.
            return Ok(Self {
                dim,
                vertices: Vec::new(),
                external_simplices: Vec::new(),
            });
        }

        // Basis from the poset-maximal clique: center on its first route so
        // the remaining `dim` indicator differences span the polytope.
        let max_clique = &cliques.cliques()[cliques.hasse().maximal_elt];
        let center = &indicators[max_clique.routes[0]];
        let basis: Vec<DVector<f64>> = max_clique.routes[1..]
            .iter()
            .map(|&r| &indicators[r] - center)
            .collect();

        let mut vertices: Vec<DVector<f64>> = if dim == 0 {
            indicators.iter().map(|_| DVector::zeros(0)).collect()
        } else {
            let e = linalg::basis_projection(&basis, ambient, cfg.eps_pivot)?;
            let proj = e.rows(0, dim);
            indicators.iter().map(|v| &proj * (v - center)).collect()
        };

        if dim == 2 || dim == 3 {
            ellipsoid::normalize_shape(&mut vertices, cfg)?;
        }

        let external_simplices = external_simplices(cliques, dim);

        Ok(Self {
            dim,
            vertices,
            external_simplices,
        })
    }

    /// Collapse the exceptional simplex to a point and re-embed in the
    /// orthogonal complement of its span. `None` when fewer than two routes
    /// are exceptional (nothing to collapse).
    pub fn quotient(&self, cliques: &DagCliques) -> Result<Option<Self>, NumericError> {
        self.quotient_with(cliques, &NumCfg::default())
    }

    pub fn quotient_with(
        &self,
        cliques: &DagCliques,
        cfg: &NumCfg,
    ) -> Result<Option<Self>, NumericError> {
        let exceptional: Vec<&DVector<f64>> = cliques
            .exceptional_routes()
            .iter()
            .map(|&r| &self.vertices[r])
            .collect();
        if exceptional.len() <= 1 {
            return Ok(None);
        }
        let qdim = self.dim + 1 - exceptional.len();

        let mut centroid = DVector::zeros(self.dim);
        for v in &exceptional {
            centroid += *v;
        }
        centroid /= exceptional.len() as f64;

        // Orthonormal basis of the collapsed directions.
        let span_dirs: Vec<DVector<f64>> = exceptional.iter().map(|v| *v - &centroid).collect();
        let span = linalg::orthonormalize(&span_dirs, cfg.eps_zero);

        // Null space of the "project onto exceptional span" matrix is the
        // orthogonal complement we re-embed into.
        let mut projection = nalgebra::DMatrix::zeros(self.dim, self.dim);
        for i in 0..self.dim {
            let mut e_i = DVector::zeros(self.dim);
            e_i[i] = 1.0;
            projection.set_column(i, &linalg::project_onto_span(&e_i, &span));
        }
        let complement = linalg::orthonormalize(
            &linalg::null_space_basis(&projection, cfg.eps_pivot),
            cfg.eps_zero,
        );

        let mut vertices: Vec<DVector<f64>> = self
            .vertices
            .iter()
            .map(|v| {
                let shifted = v - &centroid;
                DVector::from_iterator(complement.len(), complement.iter().map(|b| shifted.dot(b)))
            })
            .collect();

        // Facet filtering reads the raw quotient coordinates: collapsed
        // routes sit exactly at the origin only before normalization moves
        // the ellipsoid center.
        let external_simplices = match qdim {
            2 => cliques.cliques().iter().map(|c| c.routes.clone()).collect(),
            3 => cliques
                .cliques()
                .iter()
                .map(|c| {
                    c.routes
                        .iter()
                        .copied()
                        .filter(|&r| vertices[r].norm() > cfg.eps_zero)
                        .collect()
                })
                .collect(),
            _ => Vec::new(),
        };

        if qdim == 2 || qdim == 3 {
            ellipsoid::normalize_shape(&mut vertices, cfg)?;
        }

        Ok(Some(Self {
            dim: qdim,
            vertices,
            external_simplices,
        }))
    }

    /// Whether the embedding can be handed to the renderer as-is. Not an
    /// error state; callers check before drawing.
    pub fn renderable(&self) -> bool {
        self.dim == 2 || self.dim == 3
    }
}

/// Boundary simplices: in dimension 2, every clique; otherwise, for each
/// clique, one facet per mutation slot that points back at the clique itself
/// (no neighbor across that facet means true polytope boundary).
fn external_simplices(cliques: &DagCliques, dim: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    for (idx, clique) in cliques.cliques().iter().enumerate() {
        if dim == 2 {
            out.push(clique.routes.clone());
            continue;
        }
        for slot in 0..clique.routes.len() {
            if cliques.mutate_by_slot(idx, slot) != idx {
                continue;
            }
            out.push(
                clique
                    .routes
                    .iter()
                    .enumerate()
                    .filter(|&(s, _)| s != slot)
                    .map(|(_, &r)| r)
                    .collect(),
            );
        }
    }
    out
}
