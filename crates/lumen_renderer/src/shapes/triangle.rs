//! Triangle primitive with optional per-vertex normals and UVs.
//!
//! Intersection is a plane hit followed by the sub-area containment test
//! from [`lumen_math::geometry::Triangle`].

use lumen_core::MeshTriangle;
use lumen_math::{geometry, Aabb, Ray, Vec2, Vec3};

use super::{Surface, SurfaceHit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleShape {
    triangle: geometry::Triangle,
    /// Pre-computed face normal (unit length)
    face_normal: Vec3,
    normals: Option<[Vec3; 3]>,
    uvs: Option<[Vec2; 3]>,
}

impl TriangleShape {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let triangle = geometry::Triangle::new(v0, v1, v2);
        Self {
            triangle,
            face_normal: triangle.normal(),
            normals: None,
            uvs: None,
        }
    }

    /// Smooth shading normals, interpolated across the face.
    ///
    /// Three identical normals carry no information and are dropped.
    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = (normals[0] != normals[1] || normals[1] != normals[2]).then_some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        self.triangle.vertices
    }

    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    /// Barycentric weights of a point on the triangle.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        self.triangle.barycentric(point)
    }
}

impl From<MeshTriangle> for TriangleShape {
    fn from(data: MeshTriangle) -> Self {
        let [a, b, c] = data.positions;
        let mut shape = TriangleShape::new(a, b, c);
        if let Some(normals) = data.normals {
            shape = shape.with_normals(normals);
        }
        if let Some(uvs) = data.uvs {
            shape = shape.with_uvs(uvs);
        }
        shape
    }
}

impl Surface for TriangleShape {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let t = self.triangle.intersect(ray)?;
        Some(SurfaceHit::new(ray, t, 0))
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        match self.normals {
            Some(normals) => self
                .triangle
                .interpolate(hit.point, normals)
                .try_normalize()
                .unwrap_or(self.face_normal),
            None => self.face_normal,
        }
    }

    /// Interpolated UVs, or the barycentric weights of vertices 1 and 2.
    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        let uv = match self.uvs {
            Some(uvs) => self.triangle.interpolate(hit.point, uvs),
            None => {
                let w = self.triangle.barycentric(hit.point);
                Vec2::new(w.y, w.z)
            }
        };
        uv.clamp(Vec2::ZERO, Vec2::ONE)
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_point_cloud(self.triangle.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> TriangleShape {
        TriangleShape::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = tri().intersect(&ray).unwrap();

        assert!((hit.t - 1.0).abs() < 0.001);
        assert!((tri().normal(&hit) - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_triangle_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri().intersect(&ray).is_none());

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri().intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_never_hit() {
        let line = TriangleShape::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), -Vec3::Z);
        assert!(line.intersect(&ray).is_none());
    }

    #[test]
    fn test_interpolated_normals() {
        let shape = TriangleShape::new(Vec3::ZERO, Vec3::X, Vec3::Y)
            .with_normals([Vec3::Z, Vec3::X, Vec3::Z]);
        let hit = SurfaceHit {
            point: Vec3::X,
            t: 1.0,
            part: 0,
        };
        assert!((shape.normal(&hit) - Vec3::X).length() < 1e-4);

        // Identical normals fall back to the face normal
        let flat = TriangleShape::new(Vec3::ZERO, Vec3::X, Vec3::Y).with_normals([Vec3::Y; 3]);
        assert_eq!(flat.normal(&hit), Vec3::Z);
    }

    #[test]
    fn test_uv_interpolation_and_fallback() {
        let shape = TriangleShape::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let hit = SurfaceHit {
            point: Vec3::new(0.25, 0.5, 0.0),
            t: 1.0,
            part: 0,
        };
        assert!((shape.uv(&hit) - Vec2::new(0.25, 0.5)).length() < 1e-5);

        let mapped = shape.with_uvs([Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)]);
        // weights (0.25, 0.25, 0.5)
        assert!((mapped.uv(&hit) - Vec2::new(0.75, 0.5)).length() < 1e-5);
    }
}
