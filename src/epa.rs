//! Expanding Polytope Algorithm: penetration vector from a GJK simplex.

use glam::Vec2;
use tracing::debug;

use crate::collider::SupportMap;
use crate::error::{CollisionError, CollisionResult};
use crate::minkowski::{MinkowskiDifference, Simplex};
use crate::transform::Transform2D;
use crate::config::{CollisionConfig, POLYTOPE_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Polytope edge closest to the origin.
#[derive(Debug, Clone, Copy)]
struct Edge {
    distance: f32,
    normal: Vec2,
    /// Index of the edge's second vertex; new vertices are inserted here.
    index: usize,
}

/// Convex polygon grown by EPA, stored in a fixed stack buffer.
struct Polytope {
    vertices: [Vec2; POLYTOPE_CAPACITY],
    len: usize,
    winding: Winding,
}

impl Polytope {
    fn from_simplex(simplex: &Simplex) -> Self {
        let mut vertices = [Vec2::ZERO; POLYTOPE_CAPACITY];
        let seed = simplex.vertices();
        vertices[..seed.len()].copy_from_slice(seed);
        let winding = if simplex.signed_area2() > 0.0 {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        };
        Self {
            vertices,
            len: seed.len(),
            winding,
        }
    }

    #[inline]
    fn outward_normal(&self, edge: Vec2) -> Vec2 {
        let normal = match self.winding {
            Winding::CounterClockwise => Vec2::new(edge.y, -edge.x),
            Winding::Clockwise => Vec2::new(-edge.y, edge.x),
        };
        normal.normalize_or_zero()
    }

    fn closest_edge(&self) -> Option<Edge> {
        let mut closest: Option<Edge> = None;
        for i in 0..self.len {
            let j = (i + 1) % self.len;
            let normal = self.outward_normal(self.vertices[j] - self.vertices[i]);
            if normal == Vec2::ZERO {
                continue;
            }
            let distance = normal.dot(self.vertices[i]);
            if closest.map_or(true, |edge| distance < edge.distance) {
                closest = Some(Edge {
                    distance,
                    normal,
                    index: j,
                });
            }
        }
        closest
    }

    /// Insert `vertex` before `index`. The caller bounds the vertex count.
    fn insert(&mut self, index: usize, vertex: Vec2) {
        debug_assert!(self.len < POLYTOPE_CAPACITY);
        self.vertices.copy_within(index..self.len, index + 1);
        self.vertices[index] = vertex;
        self.len += 1;
    }

    /// Largest coordinate magnitude, at least one.
    fn extent(&self) -> f32 {
        self.vertices[..self.len]
            .iter()
            .map(|v| v.abs().max_element())
            .fold(1.0, f32::max)
    }
}

/// Minimum translation vector for two overlapping shapes.
///
/// `simplex` must be the triangle returned by
/// [`crate::gjk::find_collision_simplex`] for the same pair. The result
/// points from A toward B and its length is the penetration depth, so moving
/// A by its negation separates the shapes.
pub fn intersect<A, B>(
    shape_a: &A,
    transform_a: &Transform2D,
    shape_b: &B,
    transform_b: &Transform2D,
    simplex: &Simplex,
) -> CollisionResult<Vec2>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    intersect_with_config(
        shape_a,
        transform_a,
        shape_b,
        transform_b,
        simplex,
        &CollisionConfig::default(),
    )
}

/// [`intersect`] with explicit iteration and tolerance settings.
///
/// The iteration count is clamped to what the polytope buffer can hold. When
/// the loop ends without converging, the latest estimate is returned. A
/// collinear seed means the shapes only touch, and yields a zero vector.
pub fn intersect_with_config<A, B>(
    shape_a: &A,
    transform_a: &Transform2D,
    shape_b: &B,
    transform_b: &Transform2D,
    simplex: &Simplex,
    config: &CollisionConfig,
) -> CollisionResult<Vec2>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    if !simplex.is_two_simplex() {
        return Err(CollisionError::InvalidSimplex {
            count: simplex.count(),
        });
    }

    if simplex.is_flat() {
        debug!("EPA seed is collinear, reporting zero penetration");
        return Ok(Vec2::ZERO);
    }

    let diff = MinkowskiDifference::new(shape_a, transform_a, shape_b, transform_b);
    let mut polytope = Polytope::from_simplex(simplex);
    let tolerance = config.epa_tolerance * polytope.extent();
    let max_iterations = config
        .epa_max_iterations
        .min(POLYTOPE_CAPACITY - simplex.count());

    let mut intersection = Vec2::ZERO;

    for _ in 0..max_iterations {
        let Some(edge) = polytope.closest_edge() else {
            break;
        };
        let support = diff.support(edge.normal);
        let distance = support.dot(edge.normal);
        intersection = edge.normal * distance;

        if (distance - edge.distance).abs() <= tolerance {
            return Ok(intersection);
        }

        polytope.insert(edge.index, support);
    }

    debug!(
        "EPA did not converge within {} iterations, returning best estimate",
        max_iterations
    );
    Ok(intersection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Circle, Line, Point, Rectangle};
    use crate::gjk::find_collision_simplex;
    use approx::assert_relative_eq;

    /// Move `t` back along `mtv` a little past it, rounded out to whole units.
    fn pushed_out(t: &Transform2D, mtv: Vec2) -> Transform2D {
        let step = (mtv * 1.01).abs().ceil() * mtv.signum();
        t.with_position(t.position() - step)
    }

    #[test]
    fn test_epa_rectangles() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let b = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(1.5, 0.0));

        let simplex = find_collision_simplex(&a, &ta, &b, &tb).unwrap();
        let mtv = intersect(&a, &ta, &b, &tb, &simplex).unwrap();

        // B snaps to (1, 0), so the squares overlap by a whole unit.
        assert_relative_eq!(mtv.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(mtv.y, 0.0, epsilon = 1e-4);

        let moved = pushed_out(&ta, mtv);
        assert!(find_collision_simplex(&a, &moved, &b, &tb).is_none());
    }

    #[test]
    fn test_epa_negative_offset_truncates_toward_zero() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(0.0, -1.9));

        let simplex = find_collision_simplex(&a, &ta, &a, &tb).unwrap();
        let mtv = intersect(&a, &ta, &a, &tb, &simplex).unwrap();

        assert_relative_eq!(mtv.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(mtv.y, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_epa_separates_rectangles() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(0.0, 1.0));
        let wide = Rectangle::new(-3.0, -1.0, 6.0, 2.0);

        let simplex = find_collision_simplex(&wide, &ta, &a, &tb).unwrap();
        let mtv = intersect(&wide, &ta, &a, &tb, &simplex).unwrap();
        assert_relative_eq!(mtv.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(mtv.y, 1.0, epsilon = 1e-4);

        let moved = pushed_out(&ta, mtv);
        assert!(find_collision_simplex(&wide, &moved, &a, &tb).is_none());
    }

    #[test]
    fn test_epa_circles() {
        let a = Circle::new(2.0);
        let b = Circle::new(1.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(1.0, 1.0));

        let simplex = find_collision_simplex(&a, &ta, &b, &tb).unwrap();
        let mtv = intersect(&a, &ta, &b, &tb, &simplex).unwrap();

        // Depth is the radius sum minus the center distance, along the center line.
        let depth = 3.0 - 2.0_f32.sqrt();
        let expected = Vec2::new(1.0, 1.0).normalize() * depth;
        assert!((mtv - expected).length() < 0.01, "{mtv} != {expected}");

        let moved = pushed_out(&ta, mtv);
        assert!(find_collision_simplex(&a, &moved, &b, &tb).is_none());
    }

    #[test]
    fn test_epa_line_through_rectangle() {
        let line = Line::new(Vec2::new(-4.0, -1.0), Vec2::new(4.0, -1.0));
        let rect = Rectangle::new(-2.0, -2.0, 4.0, 4.0);
        let t = Transform2D::IDENTITY;

        let simplex = find_collision_simplex(&line, &t, &rect, &t).unwrap();
        let mtv = intersect(&line, &t, &rect, &t, &simplex).unwrap();

        // The shortest way out moves the line down below the rectangle.
        assert_relative_eq!(mtv.length(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(mtv.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_epa_collinear_seed_is_zero() {
        let point = Point::new(Vec2::ZERO);
        let line = Line::new(Vec2::new(-2.0, -2.0), Vec2::new(2.0, 2.0));
        let tp = Transform2D::from_position(Vec2::new(1.0, 1.0));
        let t = Transform2D::IDENTITY;

        let simplex = find_collision_simplex(&point, &tp, &line, &t).unwrap();
        assert_eq!(intersect(&point, &tp, &line, &t, &simplex).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_epa_rejects_small_simplex() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let t = Transform2D::IDENTITY;
        let err = intersect(&a, &t, &a, &t, &Simplex::line(Vec2::X, Vec2::Y)).unwrap_err();
        assert_eq!(err, CollisionError::InvalidSimplex { count: 2 });
    }

    #[test]
    fn test_epa_zero_iterations_returns_estimate() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(1.5, 0.0));
        let simplex = find_collision_simplex(&a, &ta, &a, &tb).unwrap();
        let config = CollisionConfig {
            epa_max_iterations: 0,
            ..Default::default()
        };
        let mtv = intersect_with_config(&a, &ta, &a, &tb, &simplex, &config).unwrap();
        assert_eq!(mtv, Vec2::ZERO);
    }

    #[test]
    fn test_epa_iterations_clamped_to_capacity() {
        let a = Rectangle::new(-1.0, -1.0, 2.0, 2.0);
        let ta = Transform2D::IDENTITY;
        let tb = Transform2D::from_position(Vec2::new(1.0, 0.0));
        let simplex = find_collision_simplex(&a, &ta, &a, &tb).unwrap();
        let config = CollisionConfig {
            epa_max_iterations: usize::MAX,
            ..Default::default()
        };
        let mtv = intersect_with_config(&a, &ta, &a, &tb, &simplex, &config).unwrap();
        assert!((mtv - Vec2::new(1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_polytope_fills_to_capacity() {
        let simplex = Simplex::triangle(Vec2::new(-3.0, -1.0), Vec2::new(3.0, -1.0), Vec2::new(0.0, 3.0));
        let mut polytope = Polytope::from_simplex(&simplex);
        for i in 0..POLYTOPE_CAPACITY - 3 {
            polytope.insert(1, Vec2::new(i as f32, -2.0));
        }
        assert_eq!(polytope.len, POLYTOPE_CAPACITY);
    }

    #[test]
    fn test_polytope_insert_keeps_order() {
        let simplex = Simplex::triangle(Vec2::new(-3.0, -1.0), Vec2::new(3.0, -1.0), Vec2::new(0.0, 3.0));
        let mut polytope = Polytope::from_simplex(&simplex);
        assert_eq!(polytope.winding, Winding::CounterClockwise);

        let edge = polytope.closest_edge().unwrap();
        assert!(edge.normal.dot(Vec2::new(0.0, -1.0)) > 0.99);
        assert_relative_eq!(edge.distance, 1.0);

        polytope.insert(edge.index, Vec2::new(0.0, -2.0));
        assert_eq!(polytope.len, 4);
        assert_eq!(polytope.vertices[1], Vec2::new(0.0, -2.0));
        assert_eq!(polytope.vertices[2], Vec2::new(3.0, -1.0));
    }
}
