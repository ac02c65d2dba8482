//! Scalar fields the extractor samples.
//!
//! Any `Fn(Point) -> Value` is a [`ScalarField`], so a closure is usually all you need.
//! The closed-form shapes below use the signed-distance formulas from
//! <https://iquilezles.org/articles/distfunctions/>.

use crate::types::{Point, Value, Vector};

/// A total, deterministic scalar field.
///
/// Negative inside the surface, positive outside. The extractor only relies on sign
/// consistency relative to its iso value, not on true distance semantics. It samples
/// points slightly outside the extraction bounds when estimating normals, so
/// implementations must accept any finite point.
pub trait ScalarField {
    fn distance(&self, p: Point) -> Value;
}

impl<F> ScalarField for F
where
    F: Fn(Point) -> Value,
{
    #[inline]
    fn distance(&self, p: Point) -> Value {
        self(p)
    }
}

/// A field with the same value everywhere. Produces no surface unless the value equals the iso value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub Value);

impl ScalarField for Constant {
    #[inline]
    fn distance(&self, _p: Point) -> Value {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: Value,
}

impl Sphere {
    pub fn new(center: Point, radius: Value) -> Self {
        Self { center, radius }
    }
}

impl ScalarField for Sphere {
    #[inline]
    fn distance(&self, p: Point) -> Value {
        (p - self.center).norm() - self.radius
    }
}

/// An axis-aligned box centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub half_extents: Vector,
}

impl Cuboid {
    pub fn new(half_extents: Vector) -> Self {
        Self { half_extents }
    }
}

impl ScalarField for Cuboid {
    #[inline]
    fn distance(&self, p: Point) -> Value {
        let q = p.coords.abs() - self.half_extents;
        let outside = q.sup(&Vector::zeros()).norm();
        let inside = q.max().min(0.0);
        outside + inside
    }
}

/// A torus centered on the origin, lying in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Distance from the center to the middle of the tube.
    pub major: Value,
    /// Radius of the tube.
    pub minor: Value,
}

impl Torus {
    pub fn new(major: Value, minor: Value) -> Self {
        Self { major, minor }
    }
}

impl ScalarField for Torus {
    #[inline]
    fn distance(&self, p: Point) -> Value {
        let qx = p.x.hypot(p.z) - self.major;
        qx.hypot(p.y) - self.minor
    }
}

/// Runtime choice between the built-in shapes, e.g. when a user picks one from a menu.
///
/// Prefer the concrete types when the shape is known at compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Cuboid(Cuboid),
    Torus(Torus),
}

impl ScalarField for Shape {
    #[inline]
    fn distance(&self, p: Point) -> Value {
        match self {
            Shape::Sphere(s) => s.distance(p),
            Shape::Cuboid(c) => c.distance(p),
            Shape::Torus(t) => t.distance(p),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Cuboid> for Shape {
    fn from(c: Cuboid) -> Self {
        Shape::Cuboid(c)
    }
}

impl From<Torus> for Shape {
    fn from(t: Torus) -> Self {
        Shape::Torus(t)
    }
}
