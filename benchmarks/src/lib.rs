//! Scene builders shared by the collision benchmarks.

use glam::Vec2;
use rein_collide::{
    Circle, Collider, CollisionConfig, CollisionWorld, Polygon, Rectangle, SpatialHash,
    Transform2D,
};

/// Deterministic jitter in `[0, 1)` so layouts are reproducible without an RNG.
pub fn jitter(i: usize) -> f32 {
    let x = (i as u32).wrapping_mul(2_654_435_761);
    (x >> 8) as f32 / (1u32 << 24) as f32
}

/// Position of body `i` on a jittered grid with `spacing` between cells.
pub fn grid_position(i: usize, columns: usize, spacing: f32) -> Vec2 {
    let x = (i % columns) as f32 * spacing + jitter(i) * spacing * 0.5;
    let y = (i / columns) as f32 * spacing + jitter(i + 7919) * spacing * 0.5;
    Vec2::new(x, y)
}

/// Alternating boxes, circles and hexagons.
pub fn mixed_collider(i: usize) -> Collider {
    match i % 3 {
        0 => Rectangle::centered(2.0 + jitter(i), 2.0).into(),
        1 => Circle::new(1.0 + jitter(i) * 0.5).into(),
        _ => hexagon(1.2).into(),
    }
}

pub fn hexagon(radius: f32) -> Polygon {
    let vertices = (0..6).map(|k| Vec2::from_angle(k as f32 * std::f32::consts::FRAC_PI_3) * radius);
    Polygon::new(vertices).expect("hexagon is a valid polygon")
}

/// `n` bodies packed closely enough that many neighbours overlap.
pub fn setup_dense_hash(n: usize, cell_size: f32) -> SpatialHash<usize> {
    let mut hash = SpatialHash::new(cell_size).expect("valid cell size");
    let columns = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let transform = Transform2D::new(grid_position(i, columns, 2.5), jitter(i) * 3.0, Vec2::ONE);
        hash.insert(i, mixed_collider(i), transform);
    }
    hash
}

/// `n` bodies spread out so few pairs survive the broadphase.
pub fn setup_sparse_hash(n: usize, cell_size: f32) -> SpatialHash<usize> {
    let mut hash = SpatialHash::new(cell_size).expect("valid cell size");
    let columns = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        hash.insert(i, mixed_collider(i), Transform2D::from_position(grid_position(i, columns, 20.0)));
    }
    hash
}

/// A world holding the dense layout.
pub fn setup_world(n: usize) -> CollisionWorld<usize> {
    let mut world = CollisionWorld::new(CollisionConfig {
        cell_size: 8.0,
        ..Default::default()
    })
    .expect("valid config");
    let columns = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let transform = Transform2D::new(grid_position(i, columns, 2.5), jitter(i) * 3.0, Vec2::ONE);
        world.insert(i, mixed_collider(i), transform);
    }
    world
}
