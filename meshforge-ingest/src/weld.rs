//! Position-based vertex welding
//!
//! Collapses raw per-face vertices that share a position into a compact
//! vertex array. The dedup key hashes position bits only, so two source
//! vertices at the same position with different UVs (a texture seam) weld
//! into one — a known, accepted loss of seam detail. Hash collisions are
//! likewise treated as identical vertices with no secondary equality
//! check.

use crate::normals;
use meshforge_core::{Error, Material, Result, Triangle, TriangleMesh, Vector3f, Vertex};
use nalgebra::Point3;
use std::collections::HashMap;

/// One corner of a source face, as handed over by the geometry parser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceCorner {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub uv: Option<[f32; 2]>,
}

impl SourceCorner {
    pub fn position_only(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
        }
    }
}

/// A raw face from the parser: corner list plus an optional material id
#[derive(Debug, Clone)]
pub struct SourceFace {
    pub corners: Vec<SourceCorner>,
    pub material: Option<u32>,
}

impl SourceFace {
    pub fn triangle(corners: [SourceCorner; 3], material: Option<u32>) -> Self {
        Self {
            corners: corners.to_vec(),
            material,
        }
    }
}

/// Diagnostics from a welding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldStats {
    /// Raw corners seen across all accepted faces
    pub raw_corners: usize,
    /// Distinct vertices after welding
    pub welded_vertices: usize,
    /// Faces skipped for not being triangles
    pub skipped_faces: usize,
}

fn position_key(p: &[f32; 3]) -> u64 {
    let h1 = p[0].to_bits() as u64;
    let h2 = p[1].to_bits() as u64;
    let h3 = p[2].to_bits() as u64;
    h1 ^ (h2 << 1) ^ (h3 << 2)
}

/// Weld a raw face list into a compact mesh.
///
/// Non-triangle faces are skipped with a diagnostic, not a hard failure.
/// An empty source material list gets a synthesized default. If the
/// source supplied no usable normals, smooth normals are synthesized.
/// Zero welded vertices is the one condition surfaced as a load error.
pub fn weld_faces(faces: &[SourceFace], materials: Vec<Material>) -> Result<(TriangleMesh, WeldStats)> {
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();
    let mut vertex_map: HashMap<u64, u32> = HashMap::new();
    let mut stats = WeldStats::default();

    for face in faces {
        if face.corners.len() != 3 {
            stats.skipped_faces += 1;
            log::warn!(
                "skipping non-triangle face with {} vertices",
                face.corners.len()
            );
            continue;
        }

        let material = face.material.unwrap_or(0);
        let mut indices = [0u32; 3];

        for (slot, corner) in indices.iter_mut().zip(&face.corners) {
            stats.raw_corners += 1;
            let key = position_key(&corner.position);
            let index = *vertex_map.entry(key).or_insert_with(|| {
                let index = vertices.len() as u32;
                vertices.push(Vertex {
                    position: Point3::from(corner.position),
                    normal: corner.normal.map_or(Vector3f::zeros(), Vector3f::from),
                    uv: corner.uv.unwrap_or([0.0, 0.0]),
                });
                index
            });
            *slot = index;
        }

        triangles.push(Triangle {
            indices,
            material,
        });
    }

    if vertices.is_empty() {
        return Err(Error::InvalidData(
            "no vertices after welding".to_string(),
        ));
    }

    let materials = if materials.is_empty() {
        vec![Material::default()]
    } else {
        materials
    };

    let mut mesh = TriangleMesh {
        vertices,
        triangles,
        materials,
    };

    stats.welded_vertices = mesh.vertex_count();
    log::debug!(
        "welded {} raw corners into {} vertices ({} faces skipped)",
        stats.raw_corners,
        stats.welded_vertices,
        stats.skipped_faces
    );

    if normals::needs_normals(&mesh) {
        normals::compute_normals(&mut mesh);
    }

    Ok((mesh, stats))
}
