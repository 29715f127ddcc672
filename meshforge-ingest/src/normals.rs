//! Smooth vertex normal synthesis
//!
//! Face normals are accumulated into vertices weighted by the interior
//! angle at each vertex, which avoids bias from irregular tessellation
//! density, then normalized.

use meshforge_core::{TriangleMesh, Vector3f};

/// A supplied normal below this squared length counts as missing
const MISSING_NORMAL_SQ: f32 = 1e-6;

/// Face normals and accumulated vertex normals shorter than this are
/// degenerate
const DEGENERATE_LEN: f32 = 1e-4;

/// True if any vertex is missing a usable normal
pub fn needs_normals(mesh: &TriangleMesh) -> bool {
    mesh.vertices
        .iter()
        .any(|v| v.normal.norm_squared() < MISSING_NORMAL_SQ)
}

/// Interior angle between two edge vectors leaving a common vertex.
///
/// The cosine is clamped to [-1, 1] so floating-point overshoot cannot
/// produce NaN from `acos`.
fn corner_angle(a: &Vector3f, b: &Vector3f) -> f32 {
    let (la, lb) = (a.norm(), b.norm());
    if la < DEGENERATE_LEN || lb < DEGENERATE_LEN {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).clamp(-1.0, 1.0).acos()
}

/// Overwrite every vertex normal with a smooth, angle-weighted average of
/// the adjacent face normals.
///
/// Source faces are wound clockwise as seen from outside, so the raw edge
/// cross product points inward; it is negated to get outward normals.
/// Triangles with near-zero area contribute nothing. Vertices that end up
/// with no usable accumulation fall back to the default up normal.
pub fn compute_normals(mesh: &mut TriangleMesh) {
    for v in &mut mesh.vertices {
        v.normal = Vector3f::zeros();
    }

    for tri in &mesh.triangles {
        let [i0, i1, i2] = tri.indices;
        let p0 = mesh.vertices[i0 as usize].position;
        let p1 = mesh.vertices[i1 as usize].position;
        let p2 = mesh.vertices[i2 as usize].position;

        let face = -(p1 - p0).cross(&(p2 - p0));
        let len = face.norm();
        if len < DEGENERATE_LEN {
            continue;
        }
        let face = face / len;

        let w0 = corner_angle(&(p1 - p0), &(p2 - p0));
        let w1 = corner_angle(&(p0 - p1), &(p2 - p1));
        let w2 = corner_angle(&(p0 - p2), &(p1 - p2));

        mesh.vertices[i0 as usize].normal += face * w0;
        mesh.vertices[i1 as usize].normal += face * w1;
        mesh.vertices[i2 as usize].normal += face * w2;
    }

    for v in &mut mesh.vertices {
        let len = v.normal.norm();
        if len > DEGENERATE_LEN {
            v.normal /= len;
        } else {
            v.normal = Vector3f::new(0.0, 1.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshforge_core::{Point3f, Triangle, TriangleMesh, Vertex};

    /// Single triangle in the y = 0 plane whose winding yields a +y normal
    fn flat_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 0.0, 1.0)));
        mesh.add_triangle(Triangle::new(0, 1, 2, 0));
        mesh
    }

    #[test]
    fn test_needs_normals() {
        let mut mesh = flat_triangle();
        assert!(needs_normals(&mesh));
        compute_normals(&mut mesh);
        assert!(!needs_normals(&mesh));
    }

    #[test]
    fn test_winding_gives_outward_normal() {
        let mut mesh = flat_triangle();
        compute_normals(&mut mesh);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal.x, 0.0, epsilon = 1e-5);
            assert_relative_eq!(v.normal.y, 1.0, epsilon = 1e-5);
            assert_relative_eq!(v.normal.z, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_unit_length_invariant() {
        let mut mesh = TriangleMesh::new();
        // A small fan of tilted triangles around a shared apex
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 1.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 0.0, 1.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(-1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 0.0, -1.0)));
        mesh.add_triangle(Triangle::new(0, 1, 2, 0));
        mesh.add_triangle(Triangle::new(0, 2, 3, 0));
        mesh.add_triangle(Triangle::new(0, 3, 4, 0));
        mesh.add_triangle(Triangle::new(0, 4, 1, 0));

        compute_normals(&mut mesh);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal.norm(), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_degenerate_fallback() {
        let mut mesh = TriangleMesh::new();
        // Collinear vertices: zero-area triangle contributes nothing
        mesh.add_vertex(Vertex::at(Point3f::new(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3f::new(2.0, 0.0, 0.0)));
        mesh.add_triangle(Triangle::new(0, 1, 2, 0));

        compute_normals(&mut mesh);
        for v in &mesh.vertices {
            assert_eq!(v.normal, Vector3f::new(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn test_isolated_vertex_fallback() {
        let mut mesh = flat_triangle();
        // Vertex referenced by no triangle
        mesh.add_vertex(Vertex::at(Point3f::new(5.0, 5.0, 5.0)));
        compute_normals(&mut mesh);
        assert_eq!(mesh.vertices[3].normal, Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_overwrites_existing_normals() {
        let mut mesh = flat_triangle();
        for v in &mut mesh.vertices {
            v.normal = Vector3f::new(1.0, 0.0, 0.0);
        }
        compute_normals(&mut mesh);
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal.y, 1.0, epsilon = 1e-5);
        }
    }
}
