//! Collider shapes and their support functions.
//!
//! Every convex shape exposes two capabilities: a support function (the
//! farthest point along a direction, all GJK and EPA need) and a world-space
//! bounding box (all the broadphase needs).

use std::sync::Arc;

use glam::Vec2;

use crate::aabb::Aabb;
use crate::error::{CollisionError, CollisionResult};
use crate::transform::Transform2D;

/// Shape capability consumed by the narrowphase and broadphase.
pub trait SupportMap {
    /// Farthest point of the transformed shape along `direction` (world space).
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2;

    /// World-space bounding box of the transformed shape.
    fn bounding_box(&self, transform: &Transform2D) -> Aabb;
}

/// Map a world direction into shape-local space.
///
/// For a linear map `M`, the support of `M * S` along `d` is `M * support_S(Mᵀ d)`.
#[inline]
fn local_direction(direction: Vec2, transform: &Transform2D) -> Vec2 {
    transform.linear().transpose() * direction
}

/// A single point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub position: Vec2,
}

impl Point {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

impl SupportMap for Point {
    #[inline]
    fn support(&self, _direction: Vec2, transform: &Transform2D) -> Vec2 {
        transform.transform_point(self.position)
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        Aabb::from_point(transform.transform_point(self.position))
    }
}

/// Circle centered on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl SupportMap for Circle {
    #[inline]
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        let local_dir = local_direction(direction, transform).normalize_or_zero();
        transform.transform_point(local_dir * self.radius)
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        // Exact extents of the transformed ellipse: radius times each row length.
        let m = transform.linear();
        let row_x = Vec2::new(m.x_axis.x, m.y_axis.x);
        let row_y = Vec2::new(m.x_axis.y, m.y_axis.y);
        let extent = Vec2::new(row_x.length(), row_y.length()) * self.radius;
        Aabb {
            min: transform.position() - extent,
            max: transform.position() + extent,
        }
    }
}

/// Line segment between two local points.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec2; 2] {
        [self.start, self.end]
    }
}

impl PartialEq for Line {
    /// Segments are equal regardless of endpoint order.
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl SupportMap for Line {
    #[inline]
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        let start = transform.transform_point(self.start);
        let end = transform.transform_point(self.end);
        if start.dot(direction) > end.dot(direction) {
            start
        } else {
            end
        }
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        Aabb::new(
            transform.transform_point(self.start),
            transform.transform_point(self.end),
        )
    }
}

/// Rectangle given by its local min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rectangle {
    /// Rectangle with its min corner at `(x, y)`.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_min_max(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle of the given size centered on the local origin.
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;
        Self::from_min_max(-half, half)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Corners in cyclic order starting from `min`.
    #[inline]
    pub fn vertices(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb {
            min: self.min,
            max: self.max,
        }
    }
}

impl SupportMap for Rectangle {
    #[inline]
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        let local_dir = local_direction(direction, transform);
        let corner = Vec2::new(
            if local_dir.x >= 0.0 {
                self.max.x
            } else {
                self.min.x
            },
            if local_dir.y >= 0.0 {
                self.max.y
            } else {
                self.min.y
            },
        );
        transform.transform_point(corner)
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        self.local_aabb().transformed(&transform.matrix())
    }
}

/// Convex polygon with at least three local vertices.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Arc<[Vec2]>,
    local_aabb: Aabb,
}

impl Polygon {
    /// Build a polygon. The vertices must describe a convex shape without
    /// duplicates; their order does not matter to the support function.
    pub fn new<I>(vertices: I) -> CollisionResult<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let vertices: Arc<[Vec2]> = vertices.into_iter().collect();
        if vertices.len() < 3 {
            return Err(CollisionError::DegeneratePolygon {
                count: vertices.len(),
            });
        }
        let local_aabb = Aabb::from_vertices(vertices.iter().copied())
            .ok_or(CollisionError::DegeneratePolygon { count: 0 })?;
        Ok(Self {
            vertices,
            local_aabb,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }
}

impl PartialEq for Polygon {
    /// Polygons are equal when they hold the same vertex set, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.vertices.len() == other.vertices.len()
            && self.vertices.iter().all(|v| other.vertices.contains(v))
            && other.vertices.iter().all(|v| self.vertices.contains(v))
    }
}

impl SupportMap for Polygon {
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        let local_dir = local_direction(direction, transform);
        let mut best = self.vertices[0];
        let mut best_dot = best.dot(local_dir);
        for v in &self.vertices[1..] {
            let d = v.dot(local_dir);
            if d > best_dot {
                best_dot = d;
                best = *v;
            }
        }
        transform.transform_point(best)
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        self.local_aabb.transformed(&transform.matrix())
    }
}

/// Closed set of convex shape variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Circle(Circle),
    Line(Line),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl SupportMap for Shape {
    #[inline]
    fn support(&self, direction: Vec2, transform: &Transform2D) -> Vec2 {
        match self {
            Shape::Point(s) => s.support(direction, transform),
            Shape::Circle(s) => s.support(direction, transform),
            Shape::Line(s) => s.support(direction, transform),
            Shape::Rectangle(s) => s.support(direction, transform),
            Shape::Polygon(s) => s.support(direction, transform),
        }
    }

    fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        match self {
            Shape::Point(s) => s.bounding_box(transform),
            Shape::Circle(s) => s.bounding_box(transform),
            Shape::Line(s) => s.bounding_box(transform),
            Shape::Rectangle(s) => s.bounding_box(transform),
            Shape::Polygon(s) => s.bounding_box(transform),
        }
    }
}

macro_rules! impl_shape_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }

            impl From<$variant> for Collider {
                fn from(shape: $variant) -> Self {
                    Collider::Convex(Shape::$variant(shape))
                }
            }
        )*
    };
}

impl_shape_from!(Point, Circle, Line, Rectangle, Polygon);

/// Structural equality that also matches a 4-vertex polygon against the
/// rectangle with the same corners.
pub fn shapes_equivalent(a: &Shape, b: &Shape) -> bool {
    match (a, b) {
        (Shape::Polygon(p), Shape::Rectangle(r)) | (Shape::Rectangle(r), Shape::Polygon(p)) => {
            polygon_matches_rectangle(p, r)
        }
        _ => a == b,
    }
}

/// Compare as cyclic vertex sequences: same corner set, and every polygon edge
/// runs along an axis so the polygon traces the rectangle outline in either
/// winding rather than crossing itself.
fn polygon_matches_rectangle(polygon: &Polygon, rectangle: &Rectangle) -> bool {
    let corners = rectangle.vertices();
    let verts = polygon.vertices();
    if verts.len() != 4 {
        return false;
    }
    if !corners.iter().all(|c| verts.contains(c)) {
        return false;
    }
    (0..4).all(|i| {
        let a = verts[i];
        let b = verts[(i + 1) % 4];
        (a.x == b.x) != (a.y == b.y)
    })
}

/// Several convex shapes moving as one body, each with a local offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiShape {
    pairs: Vec<(Shape, Transform2D)>,
    local_aabb: Aabb,
}

impl MultiShape {
    pub fn new(pairs: Vec<(Shape, Transform2D)>) -> CollisionResult<Self> {
        let local_aabb = pairs
            .iter()
            .map(|(shape, transform)| shape.bounding_box(transform))
            .reduce(|acc, aabb| acc.union(&aabb))
            .ok_or(CollisionError::EmptyCompound)?;
        Ok(Self { pairs, local_aabb })
    }

    #[inline]
    pub fn shape_transform_pairs(&self) -> &[(Shape, Transform2D)] {
        &self.pairs
    }

    /// Members with their offsets composed onto `transform`.
    pub fn transformed_pairs<'a>(
        &'a self,
        transform: &'a Transform2D,
    ) -> impl Iterator<Item = (&'a Shape, Transform2D)> + 'a {
        self.pairs
            .iter()
            .map(move |(shape, offset)| (shape, transform.compose(offset)))
    }

    pub fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        self.local_aabb.transformed(&transform.matrix())
    }

    /// The sole member when this compound is exactly one rectangle.
    pub fn single_rectangle(&self) -> Option<(&Rectangle, &Transform2D)> {
        match self.pairs.as_slice() {
            [(Shape::Rectangle(rectangle), offset)] => Some((rectangle, offset)),
            _ => None,
        }
    }
}

/// What the broadphase stores per id: one convex shape or a compound.
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    Convex(Shape),
    Compound(MultiShape),
}

impl Collider {
    pub fn bounding_box(&self, transform: &Transform2D) -> Aabb {
        match self {
            Collider::Convex(shape) => shape.bounding_box(transform),
            Collider::Compound(multi) => multi.bounding_box(transform),
        }
    }

    #[inline]
    pub fn as_convex(&self) -> Option<&Shape> {
        match self {
            Collider::Convex(shape) => Some(shape),
            Collider::Compound(_) => None,
        }
    }
}

impl From<Shape> for Collider {
    fn from(shape: Shape) -> Self {
        Collider::Convex(shape)
    }
}

impl From<MultiShape> for Collider {
    fn from(multi: MultiShape) -> Self {
        Collider::Compound(multi)
    }
}
