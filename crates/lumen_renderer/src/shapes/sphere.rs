//! Sphere primitive.

use lumen_math::{geometry, Aabb, Ray, Vec2, Vec3};
use std::f32::consts::PI;

use super::{Surface, SurfaceHit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are taken by magnitude.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// UV coordinates for a point on the unit sphere.
    ///
    /// theta: angle down from +Y, phi: angle around Y from -X.
    fn sphere_uv(p: Vec3) -> Vec2 {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI).clamp(Vec2::ZERO, Vec2::ONE)
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let t = geometry::ray_sphere(ray, self.center, self.radius)?;
        Some(SurfaceHit::new(ray, t, 0))
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        (hit.point - self.center).try_normalize().unwrap_or(Vec3::Y)
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        Self::sphere_uv(self.normal(hit))
    }

    fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::from_points(self.center - r, self.center + r)
    }
}
