//! Mesh ingestion for meshforge
//!
//! Turns raw triangle-soup faces from an external parser into a compact,
//! GPU-ready [`TriangleMesh`](meshforge_core::TriangleMesh):
//! - vertex welding by position
//! - smooth vertex normal synthesis when the source supplies none

pub mod normals;
pub mod weld;

pub use normals::*;
pub use weld::*;
