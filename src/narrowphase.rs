//! Narrowphase dispatch: closed-form fast paths, falling back to GJK.

use glam::Vec2;

use crate::collider::{Circle, Collider, Point, Rectangle, Shape, SupportMap};
use crate::config::CollisionConfig;
use crate::epa;
use crate::gjk;
use crate::transform::Transform2D;

/// Test whether two posed shapes overlap. Touching counts as overlap.
///
/// Axis-aligned rectangle pairs, points against axis-aligned rectangles and
/// uniformly scaled circles are answered in closed form; everything else
/// goes through GJK.
pub fn test_collision(
    shape_a: &Shape,
    transform_a: &Transform2D,
    shape_b: &Shape,
    transform_b: &Transform2D,
) -> bool {
    test_collision_with_config(
        shape_a,
        transform_a,
        shape_b,
        transform_b,
        &CollisionConfig::default(),
    )
}

/// [`test_collision`] with explicit GJK settings for the fallback path.
pub fn test_collision_with_config(
    shape_a: &Shape,
    transform_a: &Transform2D,
    shape_b: &Shape,
    transform_b: &Transform2D,
    config: &CollisionConfig,
) -> bool {
    match (shape_a, shape_b) {
        (Shape::Rectangle(a), Shape::Rectangle(b))
            if transform_a.is_axis_aligned() && transform_b.is_axis_aligned() =>
        {
            test_rectangle_overlap(a, transform_a, b, transform_b)
        }
        (Shape::Point(point), Shape::Rectangle(rectangle)) if transform_b.is_axis_aligned() => {
            test_point_rectangle_overlap(point, transform_a, rectangle, transform_b)
        }
        (Shape::Rectangle(rectangle), Shape::Point(point)) if transform_a.is_axis_aligned() => {
            test_point_rectangle_overlap(point, transform_b, rectangle, transform_a)
        }
        (Shape::Circle(a), Shape::Circle(b))
            if transform_a.has_uniform_scale() && transform_b.has_uniform_scale() =>
        {
            test_circle_overlap(a, transform_a, b, transform_b)
        }
        _ => gjk::find_collision_simplex_with_config(
            shape_a,
            transform_a,
            shape_b,
            transform_b,
            config,
        )
        .is_some(),
    }
}

/// Overlap test for two rectangles whose transforms carry no rotation.
pub fn test_rectangle_overlap(
    rectangle_a: &Rectangle,
    transform_a: &Transform2D,
    rectangle_b: &Rectangle,
    transform_b: &Transform2D,
) -> bool {
    rectangle_a
        .bounding_box(transform_a)
        .overlaps(&rectangle_b.bounding_box(transform_b))
}

/// Containment test for a point and a rectangle whose transform carries no rotation.
pub fn test_point_rectangle_overlap(
    point: &Point,
    point_transform: &Transform2D,
    rectangle: &Rectangle,
    rectangle_transform: &Transform2D,
) -> bool {
    rectangle
        .bounding_box(rectangle_transform)
        .contains_point(point_transform.transform_point(point.position))
}

/// Distance test for two circles under uniform scale.
pub fn test_circle_overlap(
    circle_a: &Circle,
    transform_a: &Transform2D,
    circle_b: &Circle,
    transform_b: &Transform2D,
) -> bool {
    let radius_a = circle_a.radius * transform_a.scale().x.abs();
    let radius_b = circle_b.radius * transform_b.scale().x.abs();
    let radius_sum = radius_a + radius_b;
    transform_a.position().distance_squared(transform_b.position()) <= radius_sum * radius_sum
}

/// Overlap test for colliders. Compound members are tested pairwise with
/// their offsets composed onto the body transform; any overlapping pair counts.
pub fn test_collider_collision(
    collider_a: &Collider,
    transform_a: &Transform2D,
    collider_b: &Collider,
    transform_b: &Transform2D,
) -> bool {
    test_collider_collision_with_config(
        collider_a,
        transform_a,
        collider_b,
        transform_b,
        &CollisionConfig::default(),
    )
}

/// [`test_collider_collision`] with explicit GJK settings.
pub fn test_collider_collision_with_config(
    collider_a: &Collider,
    transform_a: &Transform2D,
    collider_b: &Collider,
    transform_b: &Transform2D,
    config: &CollisionConfig,
) -> bool {
    first_overlapping_pair(collider_a, transform_a, collider_b, transform_b, config).is_some()
}

/// Minimum translation vector for two overlapping shapes, or `None` when
/// they are apart.
///
/// Pairs the fast paths accept as touching but GJK cannot enclose report a
/// zero vector.
pub fn contact_vector(
    shape_a: &Shape,
    transform_a: &Transform2D,
    shape_b: &Shape,
    transform_b: &Transform2D,
    config: &CollisionConfig,
) -> Option<Vec2> {
    if !test_collision_with_config(shape_a, transform_a, shape_b, transform_b, config) {
        return None;
    }
    let mtv = gjk::find_collision_simplex_with_config(
        shape_a,
        transform_a,
        shape_b,
        transform_b,
        config,
    )
    .and_then(|simplex| {
        epa::intersect_with_config(shape_a, transform_a, shape_b, transform_b, &simplex, config)
            .ok()
    })
    .unwrap_or(Vec2::ZERO);
    Some(mtv)
}

/// [`contact_vector`] for colliders. Compound pairs report the vector of the
/// first overlapping member pair.
pub fn collider_contact_vector(
    collider_a: &Collider,
    transform_a: &Transform2D,
    collider_b: &Collider,
    transform_b: &Transform2D,
    config: &CollisionConfig,
) -> Option<Vec2> {
    let (shape_a, ta, shape_b, tb) =
        first_overlapping_pair(collider_a, transform_a, collider_b, transform_b, config)?;
    contact_vector(shape_a, &ta, shape_b, &tb, config)
}

/// Flatten a collider into convex members with world transforms.
fn members<'a>(
    collider: &'a Collider,
    transform: &'a Transform2D,
) -> Box<dyn Iterator<Item = (&'a Shape, Transform2D)> + 'a> {
    match collider {
        Collider::Convex(shape) => Box::new(std::iter::once((shape, *transform))),
        Collider::Compound(multi) => Box::new(multi.transformed_pairs(transform)),
    }
}

fn first_overlapping_pair<'a>(
    collider_a: &'a Collider,
    transform_a: &'a Transform2D,
    collider_b: &'a Collider,
    transform_b: &'a Transform2D,
    config: &CollisionConfig,
) -> Option<(&'a Shape, Transform2D, &'a Shape, Transform2D)> {
    members(collider_a, transform_a).find_map(|(shape_a, ta)| {
        members(collider_b, transform_b)
            .find(|(shape_b, tb)| test_collision_with_config(shape_a, &ta, shape_b, tb, config))
            .map(|(shape_b, tb)| (shape_a, ta, shape_b, tb))
    })
}
