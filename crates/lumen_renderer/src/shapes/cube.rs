//! Box built from six bounded planes.

use lumen_core::{SceneError, SceneResult};
use lumen_math::{geometry, Aabb, Ray, Transform, Vec2, Vec3};

use super::{BoundedPlane, Surface, SurfaceHit};

/// A parallelepiped with perpendicular edges `a`, `b`, `c` from `corner`.
///
/// Face normals point outward. Hits report the face index in `part`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    faces: [BoundedPlane; 6],
}

impl Cube {
    /// Fails unless all three edge pairs are perpendicular.
    pub fn new(corner: Vec3, a: Vec3, b: Vec3, c: Vec3) -> SceneResult<Self> {
        for (x, y) in [(a, b), (b, c), (a, c)] {
            if !geometry::are_perpendicular(x, y) {
                return Err(SceneError::NonPerpendicularAxes { a: x, b: y });
            }
        }

        Ok(Self {
            faces: Self::build_faces(corner, a, b, c),
        })
    }

    /// Unit cube centered on the transform's position, then scaled and rotated.
    pub fn from_transform(transform: &Transform) -> Self {
        let scaled = transform.with_scale(transform.scale.abs().max(Vec3::splat(f32::EPSILON)));
        Self {
            faces: Self::build_faces(
                scaled.transform_point(Vec3::splat(-0.5)),
                scaled.transform_vector(Vec3::X),
                scaled.transform_vector(Vec3::Y),
                scaled.transform_vector(Vec3::Z),
            ),
        }
    }

    /// Axis-aligned box from its minimum corner and size.
    pub fn axis_aligned(min: Vec3, size: Vec3) -> Self {
        let size = size.abs().max(Vec3::splat(f32::EPSILON));
        Self {
            faces: Self::build_faces(min, Vec3::X * size.x, Vec3::Y * size.y, Vec3::Z * size.z),
        }
    }

    // Edges must already be perpendicular and non-zero.
    fn build_faces(corner: Vec3, a: Vec3, b: Vec3, c: Vec3) -> [BoundedPlane; 6] {
        // Face winding below assumes a right-handed edge basis.
        let (b, c) = if a.cross(b).dot(c) < 0.0 { (c, b) } else { (b, c) };
        let opposite = corner + a + b + c;
        let face = BoundedPlane::from_axes_unchecked;

        [
            face(corner, b, a),
            face(corner, c, b),
            face(corner, a, c),
            face(opposite, -a, -b),
            face(opposite, -b, -c),
            face(opposite, -c, -a),
        ]
    }

    pub fn faces(&self) -> &[BoundedPlane; 6] {
        &self.faces
    }
}

impl Surface for Cube {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, face)| face.intersect(ray).map(|hit| SurfaceHit { part: i, ..hit }))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        self.faces[hit.part.min(5)].normal(hit)
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        self.faces[hit.part.min(5)].uv(hit)
    }

    fn bounds(&self) -> Aabb {
        self.faces
            .iter()
            .fold(Aabb::EMPTY, |acc, face| Aabb::surrounding(&acc, &face.bounds()))
    }
}
