//! Swept rectangle queries against the broadphase.

use std::hash::Hash;

use glam::Vec2;

use crate::aabb::Aabb;
use crate::broadphase::SpatialHash;
use crate::collider::{Collider, Rectangle, Shape, SupportMap};
use crate::transform::Transform2D;

/// Outcome of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult<T> {
    pub hit: bool,
    /// Displacement that brings the mover up to, but not into, the obstacle.
    pub motion: Vec2,
    /// Obstacle that stopped the sweep.
    pub id: Option<T>,
}

impl<T> SweepResult<T> {
    pub fn miss() -> Self {
        Self {
            hit: false,
            motion: Vec2::ZERO,
            id: None,
        }
    }
}

/// Move an axis-aligned rectangle along `ray` and report the first
/// axis-aligned rectangle it would touch.
///
/// Obstacles are plain rectangles or compounds holding exactly one
/// rectangle; other shapes are skipped. On a hit the motion stops one unit
/// short on every axis the ray moves along.
pub fn sweep_test<T>(
    hash: &SpatialHash<T>,
    rectangle: &Rectangle,
    transform: &Transform2D,
    ray: Vec2,
) -> SweepResult<T>
where
    T: Eq + Hash + Clone,
{
    let mover = rectangle.bounding_box(transform);
    let swept = mover.swept(ray);

    let mut nearest: Option<(f32, &T)> = None;

    for (id, collider, collider_transform) in hash.retrieve_aabb(swept) {
        let Some(obstacle) = rectangle_bounds(collider, collider_transform) else {
            continue;
        };
        let Some(time) = entry_time(&mover, &obstacle, ray) else {
            continue;
        };
        if nearest.map_or(true, |(best, _)| time < best) {
            nearest = Some((time, id));
        }
    }

    match nearest {
        Some((time, id)) => SweepResult {
            hit: true,
            motion: ray * time - axis_sign(ray),
            id: Some(id.clone()),
        },
        None => SweepResult::miss(),
    }
}

/// [`sweep_test`] for a single point.
pub fn sweep_test_point<T>(
    hash: &SpatialHash<T>,
    transform: &Transform2D,
    ray: Vec2,
) -> SweepResult<T>
where
    T: Eq + Hash + Clone,
{
    sweep_test(hash, &Rectangle::from_min_max(Vec2::ZERO, Vec2::ZERO), transform, ray)
}

/// World box of a rectangle obstacle, if the collider is one.
fn rectangle_bounds(collider: &Collider, transform: &Transform2D) -> Option<Aabb> {
    match collider {
        Collider::Convex(Shape::Rectangle(rectangle)) => Some(rectangle.bounding_box(transform)),
        Collider::Compound(multi) => multi
            .single_rectangle()
            .map(|(rectangle, offset)| rectangle.bounding_box(&transform.compose(offset))),
        Collider::Convex(_) => None,
    }
}

/// Fraction of `ray` at which `mover` enters `obstacle` on its last axis, if
/// within `[0, 1]`.
///
/// Exit times are not compared, so an obstacle picked up by the swept box
/// counts even when the path only clips its corner region.
fn entry_time(mover: &Aabb, obstacle: &Aabb, ray: Vec2) -> Option<f32> {
    let x_entry = axis_entry(mover.min.x, mover.max.x, obstacle.min.x, obstacle.max.x, ray.x);
    let y_entry = axis_entry(mover.min.y, mover.max.y, obstacle.min.y, obstacle.max.y, ray.y);

    let entry = x_entry.max(y_entry);
    (0.0..=1.0).contains(&entry).then_some(entry)
}

/// Entry time along one axis. A still axis never blocks.
fn axis_entry(min: f32, max: f32, other_min: f32, other_max: f32, motion: f32) -> f32 {
    if motion > 0.0 {
        (other_min - max) / motion
    } else if motion < 0.0 {
        (other_max - min) / motion
    } else {
        f32::MIN
    }
}

/// Per-axis sign with zero for a still axis.
fn axis_sign(v: Vec2) -> Vec2 {
    let sign = |c: f32| {
        if c > 0.0 {
            1.0
        } else if c < 0.0 {
            -1.0
        } else {
            0.0
        }
    };
    Vec2::new(sign(v.x), sign(v.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Circle, MultiShape};

    fn at(x: f32, y: f32) -> Transform2D {
        Transform2D::from_position(Vec2::new(x, y))
    }

    fn course() -> SpatialHash<i32> {
        let mut hash = SpatialHash::new(16.0).unwrap();
        hash.insert(1, Rectangle::new(-2.0, -2.0, 4.0, 4.0), at(6.0, 0.0));
        hash.insert(2, Rectangle::new(-2.0, -2.0, 4.0, 4.0), at(12.0, 0.0));
        hash.insert(3, Rectangle::new(-6.0, -2.0, 12.0, 4.0), at(-6.0, 20.0));
        hash
    }

    #[test]
    fn test_sweep_hits_nearest() {
        let hash = course();
        let mover = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let result = sweep_test(&hash, &mover, &at(-6.0, 0.0), Vec2::new(12.0, 0.0));

        assert!(result.hit);
        assert_eq!(result.id, Some(1));
        assert!((result.motion - Vec2::new(7.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_sweep_away_misses() {
        let hash = course();
        let mover = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let result = sweep_test(&hash, &mover, &at(-6.0, 0.0), Vec2::new(-12.0, 0.0));
        assert!(!result.hit);
        assert_eq!(result, SweepResult::miss());
    }

    #[test]
    fn test_sweep_vertical() {
        let hash = course();
        let mover = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let result = sweep_test(&hash, &mover, &at(-6.0, 0.0), Vec2::new(0.0, 20.0));

        assert!(result.hit);
        assert_eq!(result.id, Some(3));
        assert!((result.motion - Vec2::new(0.0, 15.0)).length() < 1e-4);
    }

    #[test]
    fn test_sweep_too_short() {
        let hash = course();
        let mover = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let result = sweep_test(&hash, &mover, &at(-6.0, 0.0), Vec2::new(4.0, 0.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_sweep_diagonal_uses_latest_entry() {
        let mut hash = SpatialHash::new(16.0).unwrap();
        // Obstacle spans [3, 5] x [8, 10].
        hash.insert(1, Rectangle::new(0.0, 0.0, 2.0, 2.0), at(3.0, 8.0));
        let mover = Rectangle::new(0.0, 0.0, 2.0, 2.0);
        let result = sweep_test(&hash, &mover, &Transform2D::IDENTITY, Vec2::new(8.0, 8.0));

        // x enters at 1/8, y at 6/8; the later one wins.
        assert!(result.hit);
        assert_eq!(result.id, Some(1));
        assert!((result.motion - Vec2::new(5.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_entry_time_ignores_exit() {
        let mover = Aabb::from_min_max(0.0, 0.0, 2.0, 2.0);
        let obstacle = Aabb::from_min_max(3.0, 8.0, 5.0, 10.0);
        assert_eq!(entry_time(&mover, &obstacle, Vec2::new(8.0, 8.0)), Some(0.75));
        // Entry past the end of the ray.
        assert_eq!(entry_time(&mover, &obstacle, Vec2::new(4.0, 4.0)), None);
        // Moving away.
        assert_eq!(entry_time(&mover, &obstacle, Vec2::new(-8.0, -8.0)), None);
    }

    #[test]
    fn test_sweep_single_rectangle_compound() {
        let mut hash = SpatialHash::new(16.0).unwrap();
        let compound = MultiShape::new(vec![(
            Shape::from(Rectangle::new(-2.0, -2.0, 4.0, 4.0)),
            at(2.0, 0.0),
        )])
        .unwrap();
        hash.insert(5, compound, at(4.0, 0.0));
        hash.insert(6, Circle::new(1.0), at(3.0, 0.0));

        let mover = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let result = sweep_test(&hash, &mover, &at(-6.0, 0.0), Vec2::new(12.0, 0.0));

        // The compound's rectangle spans x in [4, 8]; the circle is ignored.
        assert_eq!(result.id, Some(5));
        assert!((result.motion - Vec2::new(7.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_sweep_point() {
        let hash = course();
        let result = sweep_test_point(&hash, &at(-10.0, 0.0), Vec2::new(20.0, 0.0));
        assert!(result.hit);
        assert_eq!(result.id, Some(1));
        // Contact at x = 4, stopping one unit short.
        assert!((result.motion - Vec2::new(13.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_axis_sign() {
        assert_eq!(axis_sign(Vec2::new(3.0, 0.0)), Vec2::new(1.0, 0.0));
        assert_eq!(axis_sign(Vec2::new(-0.5, -2.0)), Vec2::new(-1.0, -1.0));
    }
}
