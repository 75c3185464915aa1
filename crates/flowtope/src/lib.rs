//! Flow polytopes of framed DAGs.
//!
//! The pipeline runs in stages, one module each: `dag` holds the editable
//! framed DAG, `routes` enumerates maximal source-to-sink paths and their
//! pairwise shared subroutes, `cliques` batches the maximal compatible route
//! sets together with their mutation table and partial order, `poset` reduces
//! that order to its covering relation, and `polytope` embeds the whole thing
//! as a reduced-dimension convex polytope ready for rendering. `record` is the
//! serialization boundary.

pub mod api;
pub mod cliques;
pub mod dag;
pub mod polytope;
pub mod poset;
pub mod record;
pub mod routes;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
