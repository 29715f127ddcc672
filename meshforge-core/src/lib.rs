//! Core data structures for the meshforge geometry pipeline
//!
//! This crate provides the fundamental types shared by the ingestion,
//! simplification and BVH crates: vertices, triangles, materials, the mesh
//! container, axis-aligned bounding boxes and the packed GPU-facing records.

pub mod aabb;
pub mod error;
pub mod gpu;
pub mod material;
pub mod mesh;
pub mod point;

pub use aabb::*;
pub use error::*;
pub use gpu::*;
pub use material::*;
pub use mesh::*;
pub use point::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
