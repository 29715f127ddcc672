//! Packed GPU-facing records
//!
//! These mirror the CPU-side types with fixed layouts suitable for direct
//! buffer upload. The renderer consumes them as raw bytes via `bytemuck`.

use crate::{Triangle, Vertex};
use bytemuck::{Pod, Zeroable};

/// Vertex packed as 8 floats: position.xyz, u, normal.xyz, v (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct GpuVertex {
    pub pos: [f32; 3],
    pub u: f32,
    pub normal: [f32; 3],
    pub v: f32,
}

unsafe impl Pod for GpuVertex {}
unsafe impl Zeroable for GpuVertex {}

impl From<&Vertex> for GpuVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            pos: [v.position.x, v.position.y, v.position.z],
            u: v.uv[0],
            normal: [v.normal.x, v.normal.y, v.normal.z],
            v: v.uv[1],
        }
    }
}

/// Triangle packed as 3 vertex indices plus the material index (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct GpuTriangle {
    pub indices: [u32; 3],
    pub material: u32,
}

unsafe impl Pod for GpuTriangle {}
unsafe impl Zeroable for GpuTriangle {}

impl From<&Triangle> for GpuTriangle {
    fn from(t: &Triangle) -> Self {
        Self {
            indices: t.indices,
            material: t.material,
        }
    }
}

/// Pack a vertex slice for upload
pub fn pack_vertices(vertices: &[Vertex]) -> Vec<GpuVertex> {
    vertices.iter().map(GpuVertex::from).collect()
}

/// Pack a triangle slice for upload
pub fn pack_triangles(triangles: &[Triangle]) -> Vec<GpuTriangle> {
    triangles.iter().map(GpuTriangle::from).collect()
}
