//! 2D transforms for shapes.

use glam::{Affine2, Mat2, Vec2};

/// Position, rotation, and scale of a shape. Stored separately so the narrow
/// phase can cheaply detect axis-aligned and uniformly scaled poses.
///
/// Positions live on the integer grid: every constructor truncates the
/// position toward zero, so `(1.5, -0.5)` is stored as `(1, 0)`. Rotation and
/// scale are kept as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    position: Vec2,
    /// Counter-clockwise rotation in radians.
    rotation: f32,
    scale: Vec2,
}

/// Snap a position onto the integer grid.
#[inline]
fn snap(position: Vec2) -> Vec2 {
    position.trunc()
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position: snap(position),
            rotation,
            scale,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0, Vec2::ONE)
    }

    /// Same rotation and scale at a new position.
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::new(position, self.rotation, self.scale)
    }

    /// Grid-snapped position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Convert to an affine matrix (translation * rotation * scale).
    #[inline]
    pub fn matrix(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// The linear (rotation and scale) part of [`Self::matrix`].
    #[inline]
    pub fn linear(&self) -> Mat2 {
        self.matrix().matrix2
    }

    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix().transform_point2(point)
    }

    #[inline]
    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        self.matrix().transform_vector2(vector)
    }

    /// Apply `child` in the local space of `self`.
    ///
    /// Rotations add and scales multiply, which is exact for uniform scale.
    /// The composed position is snapped like any other.
    pub fn compose(&self, child: &Transform2D) -> Transform2D {
        Transform2D::new(
            self.transform_point(child.position),
            self.rotation + child.rotation,
            self.scale * child.scale,
        )
    }

    /// Whether the transform keeps shape edges parallel to the world axes.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation == 0.0
    }

    #[inline]
    pub fn has_uniform_scale(&self) -> bool {
        self.scale.x == self.scale.y
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Vec2> for Transform2D {
    fn from(position: Vec2) -> Self {
        Self::from_position(position)
    }
}
