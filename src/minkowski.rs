//! Minkowski difference of two posed shapes, and the simplex GJK builds on it.

use glam::Vec2;

use crate::aabb::Aabb;
use crate::collider::SupportMap;
use crate::transform::Transform2D;

/// Squared lengths below this are treated as zero.
pub(crate) const DEGENERATE_EPSILON: f32 = 1e-10;

/// `A - B` for two posed shapes, evaluated lazily through support points.
///
/// The origin lies inside the difference exactly when the shapes overlap.
#[derive(Debug, Clone, Copy)]
pub struct MinkowskiDifference<'a, A: ?Sized, B: ?Sized> {
    shape_a: &'a A,
    transform_a: Transform2D,
    shape_b: &'a B,
    transform_b: Transform2D,
}

impl<'a, A, B> MinkowskiDifference<'a, A, B>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    pub fn new(
        shape_a: &'a A,
        transform_a: &Transform2D,
        shape_b: &'a B,
        transform_b: &Transform2D,
    ) -> Self {
        Self {
            shape_a,
            transform_a: *transform_a,
            shape_b,
            transform_b: *transform_b,
        }
    }

    /// Farthest point of the difference along `direction`.
    #[inline]
    pub fn support(&self, direction: Vec2) -> Vec2 {
        self.shape_a.support(direction, &self.transform_a)
            - self.shape_b.support(-direction, &self.transform_b)
    }
}

/// Up to three points of a Minkowski difference.
///
/// One point is a zero-simplex, two a one-simplex (segment), three a
/// two-simplex (triangle). Only a two-simplex produced by a successful GJK
/// run encloses the origin.
#[derive(Debug, Clone, Copy)]
pub struct Simplex {
    vertices: [Vec2; 3],
    len: usize,
}

impl Simplex {
    #[inline]
    pub fn point(a: Vec2) -> Self {
        Self {
            vertices: [a, Vec2::ZERO, Vec2::ZERO],
            len: 1,
        }
    }

    #[inline]
    pub fn line(a: Vec2, b: Vec2) -> Self {
        Self {
            vertices: [a, b, Vec2::ZERO],
            len: 2,
        }
    }

    #[inline]
    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self {
            vertices: [a, b, c],
            len: 3,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_zero_simplex(&self) -> bool {
        self.len == 1
    }

    #[inline]
    pub fn is_one_simplex(&self) -> bool {
        self.len == 2
    }

    #[inline]
    pub fn is_two_simplex(&self) -> bool {
        self.len == 3
    }

    #[inline]
    pub fn a(&self) -> Vec2 {
        self.vertices[0]
    }

    #[inline]
    pub fn b(&self) -> Option<Vec2> {
        (self.len > 1).then_some(self.vertices[1])
    }

    #[inline]
    pub fn c(&self) -> Option<Vec2> {
        (self.len > 2).then_some(self.vertices[2])
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices[..self.len]
    }

    /// Support point of `diff`, the difference this simplex was built from.
    #[inline]
    pub fn support_in_direction<A, B>(
        &self,
        diff: &MinkowskiDifference<'_, A, B>,
        direction: Vec2,
    ) -> Vec2
    where
        A: SupportMap + ?Sized,
        B: SupportMap + ?Sized,
    {
        diff.support(direction)
    }

    /// Twice the signed area of the triangle; zero for anything smaller.
    pub(crate) fn signed_area2(&self) -> f32 {
        if !self.is_two_simplex() {
            return 0.0;
        }
        let [a, b, c] = self.vertices;
        (b - a).perp_dot(c - a)
    }

    /// Whether the points are collinear (or coincide). Always true below
    /// three points.
    pub fn is_flat(&self) -> bool {
        let vertices = self.vertices();
        let longest = (0..vertices.len())
            .map(|i| (vertices[(i + 1) % vertices.len()] - vertices[i]).length_squared())
            .fold(0.0_f32, f32::max);
        self.signed_area2().abs() <= f32::EPSILON * longest
    }

    /// Whether the origin lies inside or on the convex hull of the points.
    pub fn contains_origin(&self) -> bool {
        match *self.vertices() {
            [a] => a.length_squared() <= DEGENERATE_EPSILON,
            [a, b] => segment_contains_origin(a, b),
            [a, b, c] if self.is_flat() => {
                // Collinear: the farthest pair spans the third point.
                let (p, q) = [(a, b), (b, c), (c, a)]
                    .into_iter()
                    .fold((a, a), |best, (p, q)| {
                        if (q - p).length_squared() > (best.1 - best.0).length_squared() {
                            (p, q)
                        } else {
                            best
                        }
                    });
                segment_contains_origin(p, q)
            }
            [a, b, c] => {
                let area = self.signed_area2();
                [(a, b), (b, c), (c, a)]
                    .into_iter()
                    .all(|(p, q)| (q - p).perp_dot(-p) * area >= 0.0)
            }
            _ => false,
        }
    }
}

/// Whether the origin is within `sqrt(DEGENERATE_EPSILON)` of the segment.
fn segment_contains_origin(start: Vec2, end: Vec2) -> bool {
    let edge = end - start;
    let length_squared = edge.length_squared();
    let t = if length_squared <= DEGENERATE_EPSILON {
        0.0
    } else {
        ((-start).dot(edge) / length_squared).clamp(0.0, 1.0)
    };
    (start + edge * t).length_squared() <= DEGENERATE_EPSILON
}

impl PartialEq for Simplex {
    /// Simplices are equal when they hold the same points in any order.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.vertices().iter().all(|v| other.vertices().contains(v))
            && other.vertices().iter().all(|v| self.vertices().contains(v))
    }
}

impl SupportMap for Simplex {
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        let matrix = transform.matrix();
        let mut best = matrix.transform_point2(self.vertices[0]);
        let mut best_dot = best.dot(direction);
        for v in &self.vertices[1..self.len] {
            let p = matrix.transform_point2(*v);
            let d = p.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = p;
            }
        }
        best
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        let matrix = transform.matrix();
        Aabb::from_transformed_vertices(self.vertices().iter().copied(), &matrix)
            .unwrap_or_else(|| Aabb::from_point(transform.position()))
    }
}
