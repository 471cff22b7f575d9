//! Axis-aligned bounding boxes for broadphase pruning.

use glam::{Affine2, Vec2};

/// Axis-aligned bounding box. `min` is component-wise less than or equal to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from two corners in any order.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(Vec2::new(min_x, min_y), Vec2::new(max_x, max_y))
    }

    /// Degenerate box around a single point.
    #[inline]
    pub fn from_point(point: Vec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every vertex. Returns `None` for an empty set.
    pub fn from_vertices<I>(vertices: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = vertices.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::from_point(first);
        for v in iter {
            aabb.min = aabb.min.min(v);
            aabb.max = aabb.max.max(v);
        }
        Some(aabb)
    }

    /// Box around every vertex after applying `matrix`.
    pub fn from_transformed_vertices<I>(vertices: I, matrix: &Affine2) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        Self::from_vertices(vertices.into_iter().map(|v| matrix.transform_point2(v)))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Test whether two boxes overlap. Touching boundaries count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box covering this box at its start and after moving by `motion`.
    #[inline]
    pub fn swept(&self, motion: Vec2) -> Aabb {
        self.union(&self.translated(motion))
    }

    #[inline]
    pub fn translated(&self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Bound this box after an affine map.
    ///
    /// Transforms the center and projects the half extents through the
    /// absolute linear part, so rotated boxes stay conservative without
    /// visiting every corner.
    pub fn transformed(&self, matrix: &Affine2) -> Aabb {
        let center = matrix.transform_point2(self.center());
        let half = self.half_extents();

        let abs_col0 = matrix.matrix2.x_axis.abs();
        let abs_col1 = matrix.matrix2.y_axis.abs();
        let extent = abs_col0 * half.x + abs_col1 * half.y;

        Aabb {
            min: center - extent,
            max: center + extent,
        }
    }
}
