//! Curated re-exports for callers that want the whole pipeline in one import.

pub use crate::cliques::{Clique, DagCliques, TopologyError};
pub use crate::dag::{presets, DagError, Edge, FramedDag};
pub use crate::polytope::{FlowPolytope, NumCfg, NumericError};
pub use crate::poset::HasseDiagram;
pub use crate::record::{
    DagCliquesRecord, DataError, FlowPolytopeRecord, FramedDagRecord, HasseRecord,
};
pub use crate::routes::{enumerate_routes, Route, SharedSubroute, SharedSubrouteIndex};
