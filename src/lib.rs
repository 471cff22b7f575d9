//! rein-collide
//!
//! 2D collision detection: GJK intersection tests, EPA penetration vectors,
//! a spatial hash broadphase and swept rectangle queries.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **transform / aabb / config** - Grid-snapped poses, axis-aligned boxes, tuning
//! 2. **collider** - Shape variants, compounds, support functions
//! 3. **minkowski** - Minkowski difference and the GJK simplex
//! 4. **gjk / epa** - Intersection test and minimum translation vector
//! 5. **narrowphase** - Closed-form fast paths with GJK fallback
//! 6. **broadphase** - Spatial hash over caller-supplied ids
//! 7. **sweep** - Continuous queries for moving rectangles
//! 8. **world** - Frame pipeline producing contacts
//!
//! ```
//! use rein_collide::glam::Vec2;
//! use rein_collide::{epa, gjk, Rectangle, Transform2D};
//!
//! let square = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
//! let a = Transform2D::IDENTITY;
//! // Positions snap to whole units, so this body sits at (1, 0).
//! let b = Transform2D::from_position(Vec2::new(1.5, 0.0));
//!
//! let simplex = gjk::find_collision_simplex(&square, &a, &square, &b).unwrap();
//! let mtv = epa::intersect(&square, &a, &square, &b, &simplex).unwrap();
//! assert!((mtv - Vec2::new(1.0, 0.0)).length() < 1e-4);
//! ```

pub mod aabb;
pub mod broadphase;
pub mod collider;
pub mod config;
pub mod contact;
pub mod epa;
pub mod error;
pub mod gjk;
pub mod minkowski;
pub mod narrowphase;
pub mod sweep;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use aabb::Aabb;
pub use broadphase::SpatialHash;
pub use collider::{
    shapes_equivalent, Circle, Collider, Line, MultiShape, Point, Polygon, Rectangle, Shape,
    SupportMap,
};
pub use config::{CollisionConfig, POLYTOPE_CAPACITY};
pub use contact::Contact;
pub use error::{CollisionError, CollisionResult};
pub use minkowski::{MinkowskiDifference, Simplex};
pub use narrowphase::{test_collider_collision, test_collision};
pub use sweep::{sweep_test, sweep_test_point, SweepResult};
pub use transform::Transform2D;
pub use world::CollisionWorld;

// Re-export glam for convenience
pub use glam;
