//! LATMAP: lattice abstract-domain toolkit for map-based analyses.
//!
//! Building blocks for flow-sensitive dataflow analyses that track facts
//! per storage slot: a pluggable value-lattice trait, a symbolic entity
//! model (access paths qualified by heap instance locations), and map
//! abstract domains whose merge reconciles entities that refer to the
//! same slot through different objects on different control-flow paths.
//! The CFG walker, worklist driver, and concrete analyses (nullability,
//! points-to, copy propagation, ...) are the embedder's; this crate only
//! supplies the merge and ordering operators they call at join points
//! and back-edges.

pub mod domain;
pub mod entity;
pub mod ids;
pub mod location;

pub use domain::*;
pub use entity::{AccessPath, AnalysisEntity, Selector};
pub use ids::{AllocId, FieldId, IdRef, SymbolId};
pub use location::{InstanceLocation, LocationSite};
