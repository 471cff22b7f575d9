//! Error types for collision queries.

use thiserror::Error;

/// Result alias used by fallible constructors and queries.
pub type CollisionResult<T> = Result<T, CollisionError>;

/// Precondition violations reported by the collision API.
///
/// Numerical edge cases (touching shapes, coincident support points, EPA
/// running out of iterations) are never reported here. They resolve to
/// ordinary results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// The penetration query needs the triangle produced by a successful GJK run.
    #[error("simplex must be a 2-simplex (3 vertices), got {count} vertices")]
    InvalidSimplex {
        /// Number of vertices in the simplex that was passed in.
        count: usize,
    },

    /// A polygon needs at least three vertices to enclose an area.
    #[error("polygon requires at least 3 vertices, got {count}")]
    DegeneratePolygon {
        /// Number of vertices that were supplied.
        count: usize,
    },

    /// A compound shape needs at least one member to have a bounding box.
    #[error("compound shape has no members")]
    EmptyCompound,

    /// Spatial hash cells must have a finite, positive size.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f32),
}
