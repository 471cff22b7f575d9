//! GJK intersection test in 2D.

use glam::Vec2;
use tracing::debug;

use crate::collider::SupportMap;
use crate::config::CollisionConfig;
use crate::minkowski::{MinkowskiDifference, Simplex, DEGENERATE_EPSILON};
use crate::transform::Transform2D;

/// Test whether two posed shapes overlap. Touching counts as overlap.
pub fn intersects<A, B>(
    shape_a: &A,
    transform_a: &Transform2D,
    shape_b: &B,
    transform_b: &Transform2D,
) -> bool
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    find_collision_simplex(shape_a, transform_a, shape_b, transform_b).is_some()
}

/// Run GJK and return the triangle enclosing the origin if the shapes overlap.
///
/// The simplex is the seed [`crate::epa::intersect`] needs for the
/// penetration vector.
pub fn find_collision_simplex<A, B>(
    shape_a: &A,
    transform_a: &Transform2D,
    shape_b: &B,
    transform_b: &Transform2D,
) -> Option<Simplex>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    find_collision_simplex_with_config(
        shape_a,
        transform_a,
        shape_b,
        transform_b,
        &CollisionConfig::default(),
    )
}

/// [`find_collision_simplex`] with an explicit iteration cap.
///
/// Running out of iterations reports no intersection, as does a difference
/// whose two seed points coincide. A collinear terminal triangle is kept when
/// the origin lies on it; EPA reports a zero vector for such seeds.
pub fn find_collision_simplex_with_config<A, B>(
    shape_a: &A,
    transform_a: &Transform2D,
    shape_b: &B,
    transform_b: &Transform2D,
    config: &CollisionConfig,
) -> Option<Simplex>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let diff = MinkowskiDifference::new(shape_a, transform_a, shape_b, transform_b);

    // Seed with the extreme points along the x axis.
    let c = diff.support(Vec2::X);
    let b = diff.support(Vec2::NEG_X);
    let cb = c - b;
    if cb.length_squared() < DEGENERATE_EPSILON {
        return None;
    }

    let mut simplex = Simplex::line(b, c);
    let mut direction = perpendicular(cb, -c);

    for _ in 0..config.gjk_max_iterations {
        let a = simplex.support_in_direction(&diff, direction);
        if a.dot(direction) < 0.0 {
            return None;
        }

        if enclose_origin(&mut simplex, a, &mut direction) {
            // Collinear points pass every side test; check the segment directly.
            if simplex.is_flat() && !simplex.contains_origin() {
                return None;
            }
            return Some(simplex);
        }
    }

    debug!(
        "GJK gave up after {} iterations, reporting no intersection",
        config.gjk_max_iterations
    );
    None
}

/// Triple product `(a x b) x c` restricted to the plane.
#[inline]
fn triple_product(a: Vec2, b: Vec2, c: Vec2) -> Vec2 {
    a.perp_dot(b) * c.perp()
}

/// Perpendicular to `edge` on the side of `toward`, or an arbitrary
/// perpendicular when `toward` is collinear with the edge.
#[inline]
fn perpendicular(edge: Vec2, toward: Vec2) -> Vec2 {
    let d = triple_product(edge, toward, edge);
    if d.length_squared() < DEGENERATE_EPSILON {
        Vec2::new(edge.y, -edge.x)
    } else {
        d
    }
}

#[inline]
fn same_direction(a: Vec2, b: Vec2) -> bool {
    a.dot(b) > 0.0
}

/// Extend `simplex` with the new support point `a` and update the search
/// direction. Returns true once the triangle encloses the origin, leaving
/// that triangle in `simplex`.
fn enclose_origin(simplex: &mut Simplex, a: Vec2, direction: &mut Vec2) -> bool {
    match simplex.count() {
        1 => {
            let b = simplex.a();
            let ab = b - a;
            let ao = -a;
            if same_direction(ab, ao) {
                *simplex = Simplex::line(a, b);
                *direction = perpendicular(ab, ao);
            } else {
                *simplex = Simplex::point(a);
                *direction = ao;
            }
            false
        }
        2 => {
            let (b, c) = (simplex.a(), simplex.vertices()[1]);
            let ao = -a;
            let ab = b - a;
            let ac = c - a;
            let ab_perp = perpendicular(ab, -ac);
            let ac_perp = perpendicular(ac, -ab);

            if same_direction(ab_perp, ao) {
                if same_direction(ab, ao) {
                    *simplex = Simplex::line(a, b);
                    *direction = ab_perp;
                } else {
                    *simplex = Simplex::point(a);
                    *direction = ao;
                }
                false
            } else if same_direction(ac_perp, ao) {
                if same_direction(ac, ao) {
                    *simplex = Simplex::line(a, c);
                    *direction = ac_perp;
                } else {
                    *simplex = Simplex::point(a);
                    *direction = ao;
                }
                false
            } else {
                *simplex = Simplex::triangle(b, c, a);
                true
            }
        }
        _ => false,
    }
}
