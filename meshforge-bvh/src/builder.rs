//! Recursive binned-SAH BVH builder
//!
//! Nodes live in a single growable array addressed by integer index; the
//! triangle-index permutation array is partitioned in place as the tree is
//! subdivided, so every leaf owns a contiguous slice of it.

use crate::node::BvhNode;
use bytemuck::Zeroable;
use meshforge_core::{Aabb, Error, Point3f, Result, TriangleMesh};

/// Nodes with this many triangles or fewer stay leaves
const LEAF_SIZE: u32 = 4;

/// Evenly spaced SAH candidate split positions per axis
const SAH_CANDIDATES: u32 = 8;

/// Axes with less extent than this are not worth splitting
const MIN_AXIS_EXTENT: f32 = 1e-6;

/// Cross-product magnitude below which a triangle counts as degenerate
const DEGENERATE_AREA: f32 = 1e-6;

/// A flat BVH over a mesh's triangle set.
///
/// Expected build cost is O(N log N); pathological centroid distributions
/// can degrade toward O(N²), an accepted property of binned SAH.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    tri_indices: Vec<u32>,
}

impl Bvh {
    /// Build a BVH over the mesh's current triangle set.
    ///
    /// Out-of-range triangle indices are rejected up front, before they
    /// could corrupt bound computation. Zero-area triangles are counted
    /// as a diagnostic but remain in the structure.
    pub fn build(mesh: &TriangleMesh) -> Result<Self> {
        if mesh.triangles.is_empty() {
            return Err(Error::InvalidData(
                "cannot build a BVH over an empty triangle set".to_string(),
            ));
        }

        let vertex_count = mesh.vertex_count();
        for (ti, tri) in mesh.triangles.iter().enumerate() {
            for &vi in &tri.indices {
                if vi as usize >= vertex_count {
                    return Err(Error::IndexOutOfRange {
                        triangle: ti,
                        vertex: vi,
                        count: vertex_count,
                    });
                }
            }
        }

        let tri_count = mesh.triangle_count();
        let mut centroids = Vec::with_capacity(tri_count);
        let mut degenerate = 0usize;
        for tri in &mesh.triangles {
            let p0 = mesh.vertices[tri.indices[0] as usize].position;
            let p1 = mesh.vertices[tri.indices[1] as usize].position;
            let p2 = mesh.vertices[tri.indices[2] as usize].position;

            if (p1 - p0).cross(&(p2 - p0)).norm() < DEGENERATE_AREA {
                degenerate += 1;
            }
            centroids.push(Point3f::from((p0.coords + p1.coords + p2.coords) / 3.0));
        }
        if degenerate > 0 {
            log::warn!("{degenerate} degenerate (zero-area) triangles in BVH input");
        }

        let mut builder = Builder {
            mesh,
            centroids,
            nodes: Vec::with_capacity(tri_count * 2),
            tri_indices: (0..tri_count as u32).collect(),
        };

        let mut root = BvhNode::zeroed();
        root.first = 0;
        root.count = tri_count as u32;
        builder.nodes.push(root);
        builder.update_node_bounds(0);
        builder.subdivide(0);

        Ok(Self {
            nodes: builder.nodes,
            tri_indices: builder.tri_indices,
        })
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The triangle-index permutation array; leaf ranges are contiguous,
    /// non-overlapping slices of it.
    pub fn tri_indices(&self) -> &[u32] {
        &self.tri_indices
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[0]
    }

    /// Node array as raw bytes for GPU upload
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Permutation array as raw bytes for GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tri_indices)
    }
}

/// Transient build state; the centroid cache lives only as long as this
struct Builder<'a> {
    mesh: &'a TriangleMesh,
    centroids: Vec<Point3f>,
    nodes: Vec<BvhNode>,
    tri_indices: Vec<u32>,
}

impl Builder<'_> {
    /// Recompute a node's box from the vertices of its triangle slice
    fn update_node_bounds(&mut self, node_idx: usize) {
        let node = self.nodes[node_idx];
        let mut bounds = Aabb::empty();
        for &ti in &self.tri_indices[node.first as usize..(node.first + node.count) as usize] {
            let tri = &self.mesh.triangles[ti as usize];
            for &vi in &tri.indices {
                bounds.grow(&self.mesh.vertices[vi as usize].position);
            }
        }
        self.nodes[node_idx].set_bounds(&bounds);
    }

    /// SAH cost of splitting `node` at `pos` on `axis`: triangles whose
    /// centroid lies strictly left of `pos` go left.
    fn evaluate_sah(&self, node: &BvhNode, axis: usize, pos: f32) -> f32 {
        let mut left = Aabb::empty();
        let mut right = Aabb::empty();
        let mut left_count = 0u32;
        let mut right_count = 0u32;

        for &ti in &self.tri_indices[node.first as usize..(node.first + node.count) as usize] {
            let tri = &self.mesh.triangles[ti as usize];
            let (side, count) = if self.centroids[ti as usize][axis] < pos {
                (&mut left, &mut left_count)
            } else {
                (&mut right, &mut right_count)
            };
            *count += 1;
            for &vi in &tri.indices {
                side.grow(&self.mesh.vertices[vi as usize].position);
            }
        }

        if left_count == 0 || right_count == 0 {
            return f32::MAX;
        }
        left_count as f32 * left.half_area() + right_count as f32 * right.half_area()
    }

    fn subdivide(&mut self, node_idx: usize) {
        let node = self.nodes[node_idx];
        if node.count <= LEAF_SIZE {
            return;
        }

        let bounds = node.bounds();
        let extent = bounds.extent();

        let mut best_axis = 0usize;
        let mut best_pos = 0.0f32;
        let mut best_cost = f32::MAX;

        for axis in 0..3 {
            if extent[axis] < MIN_AXIS_EXTENT {
                continue;
            }
            for b in 1..=SAH_CANDIDATES {
                let pos =
                    bounds.min[axis] + extent[axis] * b as f32 / (SAH_CANDIDATES + 1) as f32;
                let cost = self.evaluate_sah(&node, axis, pos);
                if cost < best_cost {
                    best_cost = cost;
                    best_axis = axis;
                    best_pos = pos;
                }
            }
        }

        // SAH may terminate recursion above the leaf-size floor
        let no_split_cost = node.count as f32 * bounds.half_area();
        if best_cost >= no_split_cost {
            return;
        }

        // Two-pointer in-place partition of the node's permutation slice
        let mut i = node.first as i64;
        let mut j = i + node.count as i64 - 1;
        while i <= j {
            let ti = self.tri_indices[i as usize];
            if self.centroids[ti as usize][best_axis] < best_pos {
                i += 1;
            } else {
                self.tri_indices.swap(i as usize, j as usize);
                j -= 1;
            }
        }

        // An empty side would recurse forever on the same range
        let left_count = (i - node.first as i64) as u32;
        if left_count == 0 || left_count == node.count {
            return;
        }

        let left_idx = self.nodes.len();
        let mut left = BvhNode::zeroed();
        left.first = node.first;
        left.count = left_count;
        let mut right = BvhNode::zeroed();
        right.first = i as u32;
        right.count = node.count - left_count;
        self.nodes.push(left);
        self.nodes.push(right);

        self.nodes[node_idx].first = left_idx as u32;
        self.nodes[node_idx].count = 0;

        self.update_node_bounds(left_idx);
        self.update_node_bounds(left_idx + 1);
        self.subdivide(left_idx);
        self.subdivide(left_idx + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshforge_core::{Triangle, TriangleMesh, Vertex};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn soup_mesh(positions: &[[f32; 3]]) -> TriangleMesh {
        assert_eq!(positions.len() % 3, 0);
        let mut mesh = TriangleMesh::new();
        for p in positions {
            mesh.add_vertex(Vertex::at(Point3f::from(*p)));
        }
        for t in 0..positions.len() / 3 {
            let base = (t * 3) as u32;
            mesh.add_triangle(Triangle::new(base, base + 1, base + 2, 0));
        }
        mesh
    }

    fn random_soup(tri_count: usize, seed: u64) -> TriangleMesh {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(tri_count * 3);
        for _ in 0..tri_count {
            let cx: f32 = rng.gen_range(-10.0..10.0);
            let cy: f32 = rng.gen_range(-10.0..10.0);
            let cz: f32 = rng.gen_range(-10.0..10.0);
            for _ in 0..3 {
                positions.push([
                    cx + rng.gen_range(-0.5..0.5),
                    cy + rng.gen_range(-0.5..0.5),
                    cz + rng.gen_range(-0.5..0.5),
                ]);
            }
        }
        soup_mesh(&positions)
    }

    /// Every leaf's triangles lie within its box; internal children sum
    /// to the parent count and partition its permutation range exactly.
    fn check_invariants(bvh: &Bvh, mesh: &TriangleMesh, node_idx: usize) {
        let node = &bvh.nodes()[node_idx];
        if node.is_leaf() {
            let bounds = node.bounds();
            let range = node.first as usize..(node.first + node.count) as usize;
            for &ti in &bvh.tri_indices()[range] {
                for &vi in &mesh.triangles[ti as usize].indices {
                    let p = mesh.vertices[vi as usize].position;
                    assert!(
                        bounds.contains(&p),
                        "leaf {node_idx} does not contain vertex {vi}"
                    );
                }
            }
        } else {
            let left = &bvh.nodes()[node.first as usize];
            let right = &bvh.nodes()[node.first as usize + 1];
            let (lo, hi) = subtree_range(bvh, node_idx);
            let (llo, lhi) = subtree_range(bvh, node.first as usize);
            let (rlo, rhi) = subtree_range(bvh, node.first as usize + 1);
            assert_eq!(lhi, rlo, "children ranges must be contiguous");
            assert_eq!((lo, hi), (llo, rhi), "children must partition parent");
            assert!(left.is_leaf() || left.count == 0);
            assert!(right.is_leaf() || right.count == 0);
            check_invariants(bvh, mesh, node.first as usize);
            check_invariants(bvh, mesh, node.first as usize + 1);
        }
    }

    /// Permutation range covered by a subtree, with count consistency
    fn subtree_range(bvh: &Bvh, node_idx: usize) -> (u32, u32) {
        let node = &bvh.nodes()[node_idx];
        if node.is_leaf() {
            (node.first, node.first + node.count)
        } else {
            let (llo, lhi) = subtree_range(bvh, node.first as usize);
            let (rlo, rhi) = subtree_range(bvh, node.first as usize + 1);
            assert_eq!(lhi, rlo);
            (llo, rhi)
        }
    }

    fn subtree_count(bvh: &Bvh, node_idx: usize) -> u32 {
        let node = &bvh.nodes()[node_idx];
        if node.is_leaf() {
            node.count
        } else {
            subtree_count(bvh, node.first as usize) + subtree_count(bvh, node.first as usize + 1)
        }
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let mesh = TriangleMesh::new();
        assert!(matches!(Bvh::build(&mesh), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut mesh = soup_mesh(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        mesh.add_triangle(Triangle::new(0, 1, 99, 0));
        let err = Bvh::build(&mesh).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                triangle: 1,
                vertex: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_small_mesh_single_leaf() {
        let mesh = random_soup(4, 1);
        let bvh = Bvh::build(&mesh).unwrap();
        assert_eq!(bvh.nodes().len(), 1);
        assert!(bvh.root().is_leaf());
        assert_eq!(bvh.root().count, 4);
    }

    #[test]
    fn test_root_covers_all_triangles() {
        let mesh = random_soup(50, 2);
        let bvh = Bvh::build(&mesh).unwrap();
        assert_eq!(subtree_count(&bvh, 0), 50);

        let root_bounds = bvh.root().bounds();
        assert_eq!(root_bounds, mesh.bounding_box());
    }

    #[test]
    fn test_permutation_is_valid() {
        let mesh = random_soup(64, 3);
        let bvh = Bvh::build(&mesh).unwrap();
        let mut seen = bvh.tri_indices().to_vec();
        seen.sort_unstable();
        let expected: Vec<u32> = (0..64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_invariants_random_soup() {
        for seed in 0..4 {
            let mesh = random_soup(200, seed);
            let bvh = Bvh::build(&mesh).unwrap();
            check_invariants(&bvh, &mesh, 0);
        }
    }

    #[test]
    fn test_degenerate_triangles_kept() {
        // A flat line of zero-area triangles still builds, all retained
        let mut positions = Vec::new();
        for i in 0..6 {
            let x = i as f32;
            positions.push([x, 0.0, 0.0]);
            positions.push([x + 1.0, 0.0, 0.0]);
            positions.push([x + 2.0, 0.0, 0.0]);
        }
        let mesh = soup_mesh(&positions);
        let bvh = Bvh::build(&mesh).unwrap();
        assert_eq!(subtree_count(&bvh, 0), 6);
        check_invariants(&bvh, &mesh, 0);
    }

    #[test]
    fn test_identical_centroids_stay_leaf() {
        // All centroids coincide: no candidate can separate them, so the
        // defensive guard keeps one leaf instead of recursing forever.
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut positions = Vec::new();
        for _ in 0..8 {
            positions.extend_from_slice(&tri);
        }
        let mesh = soup_mesh(&positions);
        let bvh = Bvh::build(&mesh).unwrap();
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.root().count, 8);
    }

    #[test]
    fn test_gpu_byte_views() {
        let mesh = random_soup(16, 4);
        let bvh = Bvh::build(&mesh).unwrap();
        assert_eq!(bvh.node_bytes().len(), bvh.nodes().len() * 32);
        assert_eq!(bvh.index_bytes().len(), 16 * 4);
    }
}
