//! Tuning shared by the narrow phase, broad phase and pipeline.

/// Vertex capacity of the EPA polytope: three seed vertices plus one per iteration.
pub const POLYTOPE_CAPACITY: usize = 35;

/// Tuning for the collision pipeline.
#[derive(Debug, Clone)]
pub struct CollisionConfig {
    /// Iteration cap for GJK. Running out reports no intersection. Default: 32.
    pub gjk_max_iterations: usize,
    /// Iteration cap for EPA, clamped to the polytope capacity. Default: 32.
    pub epa_max_iterations: usize,
    /// EPA convergence tolerance, relative to the polytope extent. Default: 1e-5.
    pub epa_tolerance: f32,
    /// Spatial hash cell size used by [`crate::CollisionWorld`]. Default: 64.
    pub cell_size: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gjk_max_iterations: 32,
            epa_max_iterations: POLYTOPE_CAPACITY - 3,
            epa_tolerance: 1e-5,
            cell_size: 64.0,
        }
    }
}
