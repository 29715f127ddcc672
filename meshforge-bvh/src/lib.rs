//! Bounding volume hierarchy construction for meshforge
//!
//! Builds a flat, index-addressed BVH over a mesh's triangle set using a
//! binned Surface Area Heuristic. The node array and the triangle-index
//! permutation array are laid out for direct GPU upload; ray traversal is
//! the renderer's job and happens downstream.

pub mod builder;
pub mod node;

pub use builder::*;
pub use node::*;
