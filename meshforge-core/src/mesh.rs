//! Mesh data structures and functionality

use crate::{Aabb, Error, Material, Point3f, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Threshold below which a face normal is considered degenerate
const DEGENERATE_NORMAL_LEN: f32 = 1e-6;

/// A mesh vertex: position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3f,
    pub normal: Vector3f,
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn at(position: Point3f) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::zeros(),
            uv: [0.0, 0.0],
        }
    }
}

/// A triangle: three vertex indices plus a material index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub material: u32,
}

impl Triangle {
    pub fn new(i0: u32, i1: u32, i2: u32, material: u32) -> Self {
        Self {
            indices: [i0, i1, i2],
            material,
        }
    }

    /// A triangle with two equal indices has zero area
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || c == a
    }
}

/// Per-triangle face normal retained for collision queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceNormal {
    pub normal: Vector3f,
    pub indices: [u32; 3],
}

/// Bounding box and face normals kept alive after the vertex/triangle
/// buffers are released to the GPU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionData {
    pub bounds: Aabb,
    pub face_normals: Vec<FaceNormal>,
}

/// A triangle mesh with welded vertices, indexed triangles and materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
}

impl TriangleMesh {
    /// Create a new empty mesh with a single default material
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            materials: vec![Material::default()],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Add a vertex, returning its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn add_material(&mut self, material: Material) -> u32 {
        let index = self.materials.len() as u32;
        self.materials.push(material);
        index
    }

    /// Look up a material, signaling out-of-range access as an error
    /// rather than panicking on a hot path.
    pub fn material(&self, index: usize) -> Result<&Material> {
        self.materials.get(index).ok_or(Error::MaterialOutOfRange {
            index,
            count: self.materials.len(),
        })
    }

    pub fn material_mut(&mut self, index: usize) -> Result<&mut Material> {
        let count = self.materials.len();
        self.materials
            .get_mut(index)
            .ok_or(Error::MaterialOutOfRange { index, count })
    }

    pub fn has_material(&self, index: usize) -> bool {
        index < self.materials.len()
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
    }

    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) {
        self.triangles = triangles;
    }

    /// Smallest box containing every vertex
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }

    /// Uniformly scale all vertex positions about the origin
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            v.position.coords *= factor;
        }
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let offset = Vector3f::new(x, y, z);
        for v in &mut self.vertices {
            v.position += offset;
        }
    }

    /// Center the mesh on the origin in x/z while keeping its bottom at y = 0
    pub fn center_on_origin(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let bounds = self.bounding_box();
        let center = bounds.center();
        self.translate(-center.x, -bounds.min.y, -center.z);
    }

    /// Compute the bounding box and per-triangle face normals retained for
    /// collision queries. Degenerate triangles get the default up normal.
    pub fn collision_data(&self) -> Option<CollisionData> {
        if self.is_empty() {
            return None;
        }

        let face_normals = self
            .triangles
            .iter()
            .map(|tri| {
                let p0 = self.vertices[tri.indices[0] as usize].position;
                let p1 = self.vertices[tri.indices[1] as usize].position;
                let p2 = self.vertices[tri.indices[2] as usize].position;

                let cross = (p1 - p0).cross(&(p2 - p0));
                let len = cross.norm();
                let normal = if len > DEGENERATE_NORMAL_LEN {
                    cross / len
                } else {
                    Vector3f::new(0.0, 1.0, 0.0)
                };

                FaceNormal {
                    normal,
                    indices: tri.indices,
                }
            })
            .collect();

        Some(CollisionData {
            bounds: self.bounding_box(),
            face_normals,
        })
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.materials.clear();
    }

    /// Release the vertex and triangle buffers after GPU upload.
    ///
    /// Materials are kept since they are small and may still be updated;
    /// collision data computed beforehand stays valid on its own.
    pub fn clear_cpu_data(&mut self) {
        self.vertices = Vec::new();
        self.triangles = Vec::new();
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
