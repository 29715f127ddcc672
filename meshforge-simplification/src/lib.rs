//! Mesh simplification for meshforge
//!
//! Greedy edge-collapse decimation driven by squared edge length — a cheap
//! proxy for true quadric error, accepted as a known quality limitation.
//! Runs before BVH construction so the spatial index covers the final
//! triangle set.

pub mod edge_collapse;
pub mod union_find;

pub use edge_collapse::*;
pub use union_find::*;
