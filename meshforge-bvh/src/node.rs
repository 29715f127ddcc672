//! BVH node record

use bytemuck::{Pod, Zeroable};
use meshforge_core::{Aabb, Point3f};

/// A BVH node: bounding box plus a discriminated index field.
///
/// If `count > 0` the node is a leaf and `first` points into the
/// triangle-index permutation array. If `count == 0` the node is internal
/// and `first` is the index of its left child; the right child is always
/// `first + 1`.
///
/// The layout is the GPU-facing record: 32 bytes, 16-byte aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(16))]
pub struct BvhNode {
    pub min: [f32; 3],
    pub first: u32,
    pub max: [f32; 3],
    pub count: u32,
}

unsafe impl Pod for BvhNode {}
unsafe impl Zeroable for BvhNode {}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            min: Point3f::from(self.min),
            max: Point3f::from(self.max),
        }
    }

    pub(crate) fn set_bounds(&mut self, bounds: &Aabb) {
        self.min = bounds.min.coords.into();
        self.max = bounds.max.coords.into();
    }
}
