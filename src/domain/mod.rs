//! Abstract domains: value lattices and the map-shaped flow states
//! built over them.
//!
//! Terminology note: a "domain" here is the operator bundle (join,
//! ordering, unknown value) for one lattice of abstract values, not the
//! values themselves. The map domains lift a value domain to whole
//! per-program-point states; the fixpoint driver that walks the CFG and
//! decides when to invoke them lives outside this crate.

pub mod lattice;
pub use lattice::*;
pub mod map;
pub use map::*;
pub mod entity_map;
pub use entity_map::*;
