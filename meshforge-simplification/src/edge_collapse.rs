//! Greedy edge-collapse decimation
//!
//! Collapse cost is squared edge length, kept cheap with lazy priority
//! invalidation: a popped edge whose length has grown past 1.5x its
//! queued value is re-inserted with the fresh cost instead of rebuilding
//! the queue after every merge. Vertex merges go through a union-find so
//! triangle remapping is a root lookup, and per-vertex adjacency lists
//! keep each update local to the collapsed edge's neighborhood.

use crate::union_find::UnionFind;
use itertools::Itertools;
use meshforge_core::{Point3f, Triangle, TriangleMesh, Vector3f, Vertex};
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Decimation never reduces below this many triangles
const MIN_TRIANGLES: usize = 4;

/// Re-queue a popped edge whose squared cost grew past this factor
/// (edge length grew more than 1.5x)
const STALE_COST_FACTOR: f32 = 2.25;

/// Accumulated normals shorter than this are left as-is during a collapse
const MIN_NORMAL_LEN: f32 = 1e-6;

/// Diagnostics from a decimation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimationStats {
    pub input_triangles: usize,
    pub output_triangles: usize,
    pub target_triangles: usize,
    pub collapsed_edges: usize,
}

/// An undirected collapse candidate ordered by cost, smallest first
#[derive(Debug, Clone, Copy)]
struct EdgeCost {
    v1: u32,
    v2: u32,
    cost: f32,
}

impl PartialEq for EdgeCost {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}
impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost pops first
        other.cost.total_cmp(&self.cost)
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn squared_length(positions: &[Point3f], a: u32, b: u32) -> f32 {
    (positions[a as usize] - positions[b as usize]).norm_squared()
}

/// Reduce the mesh toward `target_ratio` of its current triangle count.
///
/// A ratio of 1 or more is a no-op; ratios are clamped to [0.01, 1] and
/// the target floor is four triangles. The pass may finish above target
/// when no further collapsible edges exist (disconnected components).
/// The vertex and triangle arrays are replaced wholesale and normals are
/// re-synthesized from scratch on the reduced mesh.
pub fn decimate(mesh: &mut TriangleMesh, target_ratio: f32) -> DecimationStats {
    let input = mesh.triangle_count();
    let mut stats = DecimationStats {
        input_triangles: input,
        output_triangles: input,
        target_triangles: input,
        collapsed_edges: 0,
    };
    if mesh.is_empty() || target_ratio >= 1.0 {
        return stats;
    }

    let ratio = target_ratio.clamp(0.01, 1.0);
    let target = ((input as f32 * ratio) as usize).max(MIN_TRIANGLES);
    stats.target_triangles = target;
    log::info!("decimating mesh from {input} to ~{target} triangles");

    let vertex_count = mesh.vertex_count();
    let mut roots = UnionFind::new(vertex_count);
    let mut positions: Vec<Point3f> = mesh.vertices.iter().map(|v| v.position).collect();
    let mut normals: Vec<Vector3f> = mesh.vertices.iter().map(|v| v.normal).collect();
    let mut triangles: Vec<Triangle> = mesh.triangles.clone();

    // Per-vertex incident triangles: collapses touch O(degree) triangles
    // instead of rescanning the mesh
    let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
    for (ti, tri) in triangles.iter().enumerate() {
        for &vi in &tri.indices {
            adjacency[vi as usize].push(ti as u32);
        }
    }

    let mut valid = vec![true; triangles.len()];
    let mut valid_count = triangles.len();

    let mut queue: PriorityQueue<usize, EdgeCost> = PriorityQueue::new();
    let mut next_id = 0usize;
    let seed_edges: Vec<(u32, u32)> = triangles
        .iter()
        .flat_map(|t| {
            let [a, b, c] = t.indices;
            [ordered(a, b), ordered(b, c), ordered(c, a)]
        })
        .unique()
        .collect();
    for (a, b) in seed_edges {
        let cost = squared_length(&positions, a, b);
        queue.push(next_id, EdgeCost { v1: a, v2: b, cost });
        next_id += 1;
    }

    let mut affected: Vec<u32> = Vec::with_capacity(64);

    while valid_count > target && !queue.is_empty() {
        let Some((_, edge)) = queue.pop() else { break };

        let mut v1 = roots.find(edge.v1);
        let mut v2 = roots.find(edge.v2);
        if v1 == v2 {
            continue;
        }
        // Smaller root survives the merge
        if v1 > v2 {
            std::mem::swap(&mut v1, &mut v2);
        }

        // Lazy invalidation: merges nearby may have stretched this edge
        let current = squared_length(&positions, v1, v2);
        if current > edge.cost * STALE_COST_FACTOR {
            queue.push(next_id, EdgeCost { v1, v2, cost: current });
            next_id += 1;
            continue;
        }

        // Collapse v2 into v1 at the edge midpoint
        positions[v1 as usize] =
            Point3f::from((positions[v1 as usize].coords + positions[v2 as usize].coords) * 0.5);
        let summed = normals[v1 as usize] + normals[v2 as usize];
        let len = summed.norm();
        if len > MIN_NORMAL_LEN {
            normals[v1 as usize] = summed / len;
        }
        roots.union_into(v2, v1);
        stats.collapsed_edges += 1;

        affected.clear();
        affected.extend(adjacency[v1 as usize].iter().copied().filter(|&t| valid[t as usize]));
        affected.extend(adjacency[v2 as usize].iter().copied().filter(|&t| valid[t as usize]));

        let merged = std::mem::take(&mut adjacency[v2 as usize]);
        adjacency[v1 as usize].extend(merged);

        for &ti in &affected {
            if !valid[ti as usize] {
                continue;
            }
            let tri = &mut triangles[ti as usize];
            for slot in &mut tri.indices {
                *slot = roots.find(*slot);
            }
            if tri.is_degenerate() {
                valid[ti as usize] = false;
                valid_count -= 1;
            } else {
                // Fresh candidates for the edges now touching the
                // surviving root
                for e in 0..3 {
                    let a = tri.indices[e];
                    let b = tri.indices[(e + 1) % 3];
                    if a == v1 || b == v1 {
                        let cost = squared_length(&positions, a, b);
                        let (v1, v2) = ordered(a, b);
                        queue.push(next_id, EdgeCost { v1, v2, cost });
                        next_id += 1;
                    }
                }
            }
        }
    }

    // Compact: resolve every surviving triangle through the union-find and
    // rebuild the vertex array from the roots actually referenced
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut new_vertices: Vec<Vertex> = Vec::new();
    let mut new_triangles: Vec<Triangle> = Vec::with_capacity(valid_count);

    for (ti, tri) in triangles.iter().enumerate() {
        if !valid[ti] {
            continue;
        }
        let mut out = Triangle {
            indices: [0; 3],
            material: tri.material,
        };
        for (slot, &vi) in out.indices.iter_mut().zip(&tri.indices) {
            let root = roots.find(vi);
            *slot = *remap.entry(root).or_insert_with(|| {
                let idx = new_vertices.len() as u32;
                new_vertices.push(Vertex {
                    position: positions[root as usize],
                    normal: normals[root as usize],
                    uv: mesh.vertices[root as usize].uv,
                });
                idx
            });
        }
        if !out.is_degenerate() {
            new_triangles.push(out);
        }
    }

    mesh.set_vertices(new_vertices);
    mesh.set_triangles(new_triangles);

    // The running averaged normals are only collapse-time approximations;
    // re-synthesize for clean final shading
    meshforge_ingest::compute_normals(mesh);

    stats.output_triangles = mesh.triangle_count();
    log::info!(
        "decimation complete: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    stats
}
