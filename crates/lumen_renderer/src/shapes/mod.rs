//! Surfaces the tracer can hit.
//!
//! Every primitive implements [`Surface`]; [`Geometry`] is the closed set of
//! primitives and [`Shape`] pairs one with the shader that colors it.

mod cube;
mod mesh;
mod plane;
mod sphere;
mod triangle;

pub use cube::Cube;
pub use mesh::MeshShape;
pub use plane::BoundedPlane;
pub use sphere::Sphere;
pub use triangle::TriangleShape;

use std::fmt;
use std::sync::Arc;

use lumen_math::{Aabb, Ray, Vec2, Vec3};

use crate::shaders::ShapeShader;

/// Index of a shape inside a [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// Where a ray met a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Point of intersection
    pub point: Vec3,
    /// Distance from the ray origin (rays have unit directions)
    pub t: f32,
    /// Sub-surface that was hit: cube face or mesh triangle, 0 otherwise
    pub part: usize,
}

impl SurfaceHit {
    pub fn new(ray: &Ray, t: f32, part: usize) -> Self {
        Self {
            point: ray.at(t),
            t,
            part,
        }
    }
}

/// Capability interface shared by all primitives.
pub trait Surface {
    /// Nearest intersection in front of the ray origin.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit>;

    /// Unit outward normal at a hit reported by [`Surface::intersect`].
    fn normal(&self, hit: &SurfaceHit) -> Vec3;

    /// Texture coordinates in `[0, 1]²` at a hit.
    fn uv(&self, hit: &SurfaceHit) -> Vec2;

    /// World-space bounds.
    fn bounds(&self) -> Aabb;
}

/// The closed set of primitives.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    Plane(BoundedPlane),
    Cube(Cube),
    Triangle(TriangleShape),
    Mesh(MeshShape),
}

impl Surface for Geometry {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        match self {
            Geometry::Sphere(s) => s.intersect(ray),
            Geometry::Plane(p) => p.intersect(ray),
            Geometry::Cube(c) => c.intersect(ray),
            Geometry::Triangle(t) => t.intersect(ray),
            Geometry::Mesh(m) => m.intersect(ray),
        }
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        match self {
            Geometry::Sphere(s) => s.normal(hit),
            Geometry::Plane(p) => p.normal(hit),
            Geometry::Cube(c) => c.normal(hit),
            Geometry::Triangle(t) => t.normal(hit),
            Geometry::Mesh(m) => m.normal(hit),
        }
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        match self {
            Geometry::Sphere(s) => s.uv(hit),
            Geometry::Plane(p) => p.uv(hit),
            Geometry::Cube(c) => c.uv(hit),
            Geometry::Triangle(t) => t.uv(hit),
            Geometry::Mesh(m) => m.uv(hit),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            Geometry::Sphere(s) => s.bounds(),
            Geometry::Plane(p) => p.bounds(),
            Geometry::Cube(c) => c.bounds(),
            Geometry::Triangle(t) => t.bounds(),
            Geometry::Mesh(m) => m.bounds(),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(s: Sphere) -> Self {
        Geometry::Sphere(s)
    }
}

impl From<BoundedPlane> for Geometry {
    fn from(p: BoundedPlane) -> Self {
        Geometry::Plane(p)
    }
}

impl From<Cube> for Geometry {
    fn from(c: Cube) -> Self {
        Geometry::Cube(c)
    }
}

impl From<TriangleShape> for Geometry {
    fn from(t: TriangleShape) -> Self {
        Geometry::Triangle(t)
    }
}

impl From<MeshShape> for Geometry {
    fn from(m: MeshShape) -> Self {
        Geometry::Mesh(m)
    }
}

/// A primitive plus the shader that decides how it reacts to light.
///
/// Shaders are shared: many shapes may point at the same one.
#[derive(Clone)]
pub struct Shape {
    pub geometry: Geometry,
    pub shader: Arc<dyn ShapeShader>,
}

impl Shape {
    pub fn new(geometry: impl Into<Geometry>, shader: Arc<dyn ShapeShader>) -> Self {
        Self {
            geometry: geometry.into(),
            shader,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl Surface for Shape {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.geometry.intersect(ray)
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        self.geometry.normal(hit)
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        self.geometry.uv(hit)
    }

    fn bounds(&self) -> Aabb {
        self.geometry.bounds()
    }
}
