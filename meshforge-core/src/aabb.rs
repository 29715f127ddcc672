//! Axis-aligned bounding boxes

use crate::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its min/max corners.
///
/// The empty box has inverted corners so that growing it by any point
/// produces a valid box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// The empty box (grows correctly from any point)
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3f::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Smallest box containing all given points
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point3f>>(points: I) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// Expand the box to contain a point
    pub fn grow(&mut self, p: &Point3f) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.grow(&other.min);
        out.grow(&other.max);
        out
    }

    /// Per-axis extent (max - min)
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    /// Sum of the pairwise products of the extents.
    ///
    /// A constant multiple of the true surface area, which is all the SAH
    /// needs for cost comparison.
    pub fn half_area(&self) -> f32 {
        let e = self.extent();
        e.x * e.y + e.y * e.z + e.z * e.x
    }

    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn contains(&self, p: &Point3f) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
