//! Triangle mesh placed in the world by a transform.
//!
//! World-space triangles and the bounding box are derived from
//! `(MeshData, Transform)` by [`MeshShape::build`] and rebuilt whenever the
//! transform changes. Intersection rejects early on the box, then scans the
//! triangles and keeps the nearest hit.

use lumen_core::MeshData;
use lumen_math::{Aabb, Ray, Transform, TransformParts, Vec2, Vec3};

use super::{Surface, SurfaceHit, TriangleShape};

#[derive(Debug, Clone)]
pub struct MeshShape {
    data: MeshData,
    transform: Transform,
    triangles: Vec<TriangleShape>,
    bounds: Aabb,
}

impl MeshShape {
    pub fn new(data: MeshData, transform: Transform) -> Self {
        let (triangles, bounds) = Self::build(&data, &transform);
        log::debug!(
            "Built mesh with {} triangles, bounds {:?}..{:?}",
            triangles.len(),
            bounds.min(),
            bounds.max()
        );
        Self {
            data,
            transform,
            triangles,
            bounds,
        }
    }

    /// World-space triangles and their bounds for `data` placed by `transform`.
    pub fn build(data: &MeshData, transform: &Transform) -> (Vec<TriangleShape>, Aabb) {
        // Normals use the inverse scale so they stay perpendicular under
        // non-uniform scaling.
        let to_world_normal = |n: Vec3| {
            transform
                .apply(n / transform.scale, TransformParts::ROTATION)
                .normalize_or_zero()
        };

        let triangles: Vec<TriangleShape> = data
            .triangles()
            .map(|mut tri| {
                tri.positions = tri.positions.map(|p| transform.transform_point(p));
                tri.normals = tri.normals.map(|n| n.map(to_world_normal));
                TriangleShape::from(tri)
            })
            .collect();

        let degenerate = triangles
            .iter()
            .filter(|t| t.face_normal() == Vec3::ZERO)
            .count();
        if degenerate > 0 {
            log::warn!("Mesh has {degenerate} zero-area triangles; they will never be hit");
        }

        let bounds = Aabb::from_point_cloud(triangles.iter().flat_map(|t| t.vertices()));
        (triangles, bounds)
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Move the mesh, rebuilding triangles and bounds.
    pub fn set_transform(&mut self, transform: Transform) {
        let (triangles, bounds) = Self::build(&self.data, &transform);
        self.transform = transform;
        self.triangles = triangles;
        self.bounds = bounds;
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn triangles(&self) -> &[TriangleShape] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Surface for MeshShape {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        if !self.bounds.hit(ray) {
            return None;
        }

        let mut nearest: Option<(f32, SurfaceHit)> = None;
        for (i, triangle) in self.triangles.iter().enumerate() {
            if let Some(hit) = triangle.intersect(ray) {
                let distance_sq = (hit.point - ray.origin).length_squared();
                if nearest.map_or(true, |(best, _)| distance_sq < best) {
                    nearest = Some((distance_sq, SurfaceHit { part: i, ..hit }));
                }
            }
        }
        nearest.map(|(_, hit)| hit)
    }

    fn normal(&self, hit: &SurfaceHit) -> Vec3 {
        self.triangles
            .get(hit.part)
            .map_or(Vec3::Y, |triangle| triangle.normal(hit))
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        self.triangles
            .get(hit.part)
            .map_or(Vec2::ZERO, |triangle| triangle.uv(hit))
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Quat;

    /// Two stacked quads facing +Z at z = 0 and z = -1.
    fn layered() -> MeshData {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ];
        // Far layer first so the nearest-hit scan has to replace it.
        let indices = vec![4, 5, 6, 5, 7, 6, 0, 1, 2, 1, 3, 2];
        MeshData::new(positions, indices).unwrap()
    }

    #[test]
    fn test_nearest_triangle_wins() {
        let mesh = MeshShape::new(layered(), Transform::IDENTITY);
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), -Vec3::Z);

        let hit = mesh.intersect(&ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
        assert_eq!(hit.part, 2);
        assert!((mesh.normal(&hit) - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_bounds_early_out() {
        let mesh = MeshShape::new(layered(), Transform::IDENTITY);
        let ray = Ray::new(Vec3::new(3.0, 3.0, 5.0), -Vec3::Z);
        assert!(mesh.intersect(&ray).is_none());
    }

    #[test]
    fn test_transform_rebuilds_bounds() {
        let mut mesh = MeshShape::new(layered(), Transform::IDENTITY);
        assert!((mesh.bounds().min() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-3);

        mesh.set_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        assert!((mesh.bounds().min() - Vec3::new(10.0, 0.0, -1.0)).length() < 1e-3);

        let ray = Ray::new(Vec3::new(10.5, 0.25, 5.0), -Vec3::Z);
        assert!(mesh.intersect(&ray).is_some());
        let old = Ray::new(Vec3::new(0.25, 0.25, 5.0), -Vec3::Z);
        assert!(mesh.intersect(&old).is_none());
    }

    #[test]
    fn test_normals_follow_rotation() {
        let data = layered().with_smooth_normals();
        let transform = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let mesh = MeshShape::new(data, transform);

        // +Z rotated a quarter turn about Y becomes +X
        let ray = Ray::new(Vec3::new(5.0, 0.25, -0.25), -Vec3::X);
        let hit = mesh.intersect(&ray).unwrap();
        assert!((mesh.normal(&hit) - Vec3::X).length() < 1e-3);
    }
}
