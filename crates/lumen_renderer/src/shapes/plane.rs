//! Finite rectangle spanned by two perpendicular axes.

use lumen_core::{SceneError, SceneResult};
use lumen_math::{geometry, Aabb, Ray, Vec2, Vec3};

use super::{Surface, SurfaceHit};

/// The rectangle `origin + s·axis_a + r·axis_b` for `s, r ∈ [0, 1]`.
///
/// Its normal is `axis_a × axis_b`; both faces can be hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedPlane {
    origin: Vec3,
    axis_a: Vec3,
    axis_b: Vec3,
    normal: Vec3,
}

impl BoundedPlane {
    /// Fails when the axes are not perpendicular (or either is zero).
    pub fn new(origin: Vec3, axis_a: Vec3, axis_b: Vec3) -> SceneResult<Self> {
        if !geometry::are_perpendicular(axis_a, axis_b) {
            return Err(SceneError::NonPerpendicularAxes { a: axis_a, b: axis_b });
        }
        Ok(Self::from_axes_unchecked(origin, axis_a, axis_b))
    }

    /// Skips the perpendicularity check; callers guarantee valid axes.
    pub(super) fn from_axes_unchecked(origin: Vec3, axis_a: Vec3, axis_b: Vec3) -> Self {
        Self {
            origin,
            axis_a,
            axis_b,
            normal: axis_a.cross(axis_b).normalize_or_zero(),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn axes(&self) -> (Vec3, Vec3) {
        (self.axis_a, self.axis_b)
    }

    /// The four corners in winding order.
    pub fn corners(&self) -> [Vec3; 4] {
        [
            self.origin,
            self.origin + self.axis_a,
            self.origin + self.axis_a + self.axis_b,
            self.origin + self.axis_b,
        ]
    }
}

impl Surface for BoundedPlane {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let t = geometry::ray_bounded_plane(ray, self.origin, self.axis_a, self.axis_b)?;
        Some(SurfaceHit::new(ray, t, 0))
    }

    fn normal(&self, _hit: &SurfaceHit) -> Vec3 {
        self.normal
    }

    fn uv(&self, hit: &SurfaceHit) -> Vec2 {
        let offset = hit.point - self.origin;
        Vec2::new(
            offset.dot(self.axis_a) / self.axis_a.length_squared(),
            offset.dot(self.axis_b) / self.axis_b.length_squared(),
        )
        .clamp(Vec2::ZERO, Vec2::ONE)
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_point_cloud(self.corners())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> BoundedPlane {
        BoundedPlane::new(Vec3::ZERO, Vec3::new(50.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 50.0)).unwrap()
    }

    #[test]
    fn test_rejects_non_perpendicular_axes() {
        let err = BoundedPlane::new(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, SceneError::NonPerpendicularAxes { .. }));
        assert!(BoundedPlane::new(Vec3::ZERO, Vec3::ZERO, Vec3::X).is_err());
    }

    #[test]
    fn test_plane_hit_and_uv() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(10.0, 5.0, 40.0), -Vec3::Y);

        let hit = plane.intersect(&ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
        assert!((plane.uv(&hit) - Vec2::new(0.2, 0.8)).length() < 1e-4);
        // X × Z points down
        assert_eq!(plane.normal(&hit), -Vec3::Y);
    }

    #[test]
    fn test_plane_outside_rectangle() {
        let plane = floor();
        let ray = Ray::new(Vec3::new(60.0, 5.0, 10.0), -Vec3::Y);
        assert!(plane.intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_bounds() {
        let bounds = floor().bounds();
        assert_eq!(bounds.x.min, 0.0);
        assert_eq!(bounds.z.max, 50.0);
        assert!(bounds.y.size() > 0.0);
    }
}
