//! Ray intersection routines for the primitive surfaces.
//!
//! All routines return the ray parameter `t` of the nearest hit in front of
//! the ray origin. Rays carry unit directions, so `t` is a world distance.

use crate::{Ray, Vec3, EPSILON};

/// True when `a` and `b` are perpendicular within [`EPSILON`].
///
/// The test runs on normalized vectors so long axes are judged by angle,
/// not by the magnitude of their dot product. A zero vector is never
/// perpendicular to anything.
pub fn are_perpendicular(a: Vec3, b: Vec3) -> bool {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).abs() <= EPSILON,
        _ => false,
    }
}

/// Mirror `incident` about `normal`.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    incident - 2.0 * incident.dot(n) * n
}

/// The point reached by travelling forever from `origin` along `direction`.
///
/// Components with no motion keep the origin value instead of becoming NaN.
pub fn point_at_infinity(origin: Vec3, direction: Vec3) -> Vec3 {
    let axis = |o: f32, d: f32| {
        if d > 0.0 {
            f32::INFINITY
        } else if d < 0.0 {
            f32::NEG_INFINITY
        } else {
            o
        }
    };
    Vec3::new(
        axis(origin.x, direction.x),
        axis(origin.y, direction.y),
        axis(origin.z, direction.z),
    )
}

/// Nearest intersection with a sphere.
///
/// A ray whose closest approach to the center is within [`EPSILON`] of the
/// radius still reports the tangent point. Origins inside the sphere hit
/// the far side.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = ray.direction.dot(oc);
    let c = oc.length_squared() - radius * radius;

    // discriminant = r² − d², with d the closest approach; d ≤ r + ε.
    let discriminant = b * b - c;
    if discriminant < -(2.0 * radius + EPSILON) * EPSILON {
        return None;
    }
    let sqrtd = discriminant.max(0.0).sqrt();

    let near = -b - sqrtd;
    let far = -b + sqrtd;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Intersection with the infinite plane through `point` with `normal`.
///
/// Rays parallel to the plane (|n·d| below [`EPSILON`]) never hit.
pub fn ray_plane(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let n = normal.try_normalize()?;
    let denominator = n.dot(ray.direction);
    if denominator.abs() < EPSILON {
        return None;
    }

    let t = n.dot(point - ray.origin) / denominator;
    (t >= 0.0).then_some(t)
}

/// Intersection with the finite rectangle `origin + s·a + r·b`, `s, r ∈ [0, 1]`.
pub fn ray_bounded_plane(ray: &Ray, origin: Vec3, axis_a: Vec3, axis_b: Vec3) -> Option<f32> {
    let t = ray_plane(ray, origin, axis_a.cross(axis_b))?;
    let offset = ray.at(t) - origin;

    let within = |axis: Vec3| {
        let length = axis.length();
        let projection = offset.dot(axis) / length;
        (-EPSILON..=length + EPSILON).contains(&projection)
    };

    (within(axis_a) && within(axis_b)).then_some(t)
}

/// A triangle given by three vertices, wound counter-clockwise around its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unnormalized normal `(v1 − v0) × (v2 − v0)`; its length is twice the area.
    pub fn scaled_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Unit face normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        self.scaled_normal().normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        self.scaled_normal().length() * 0.5
    }

    /// Signed barycentric weights of `point` from the three sub-triangle areas.
    ///
    /// Weights sum to one for points on the triangle's plane and go negative
    /// on the far side of an edge. A degenerate triangle gives all zeros.
    pub fn barycentric(&self, point: Vec3) -> Vec3 {
        let n = self.scaled_normal();
        let denom = n.length_squared();
        if denom <= f32::EPSILON {
            return Vec3::ZERO;
        }

        let [a, b, c] = self.vertices;
        let sub = |p: Vec3, q: Vec3| (p - point).cross(q - point).dot(n) / denom;
        Vec3::new(sub(b, c), sub(c, a), sub(a, b))
    }

    /// Containment test for a point already on the triangle's plane.
    ///
    /// Each edge's sub-area, `(vi − p) × (vj − p)`, must face the same way as
    /// the combined normal.
    pub fn contains(&self, point: Vec3) -> bool {
        let weights = self.barycentric(point);
        weights != Vec3::ZERO && weights.min_element() >= -EPSILON
    }

    /// Nearest intersection: plane hit followed by the containment test.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let t = ray_plane(ray, self.vertices[0], self.scaled_normal())?;
        self.contains(ray.at(t)).then_some(t)
    }

    /// Interpolate per-vertex values by barycentric weights.
    pub fn interpolate<T>(&self, point: Vec3, values: [T; 3]) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T> + Copy,
    {
        let w = self.barycentric(point);
        values[0] * w.x + values[1] * w.y + values[2] * w.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_unit(rng: &mut StdRng) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if let Some(n) = v.try_normalize() {
                return n;
            }
        }
    }

    #[test]
    fn test_are_perpendicular() {
        assert!(are_perpendicular(Vec3::new(50.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 50.0)));
        assert!(!are_perpendicular(Vec3::X, Vec3::new(1.0, 1.0, 0.0)));
        assert!(!are_perpendicular(Vec3::ZERO, Vec3::X));
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_point_at_infinity() {
        let p = point_at_infinity(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, -1.0, 2.0));
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, f32::NEG_INFINITY);
        assert_eq!(p.z, f32::INFINITY);
        assert!(!p.is_nan());
    }

    #[test]
    fn test_ray_sphere_hit_on_surface() {
        let mut rng = StdRng::seed_from_u64(3);
        let center = Vec3::new(1.0, -2.0, 4.0);
        let radius = 2.5;

        let mut hits = 0;
        for _ in 0..1000 {
            let origin = center + random_unit(&mut rng) * rng.gen_range(3.0..20.0);
            let target = center + random_unit(&mut rng) * rng.gen_range(0.0..4.0);
            let ray = Ray::towards(origin, target);

            if let Some(t) = ray_sphere(&ray, center, radius) {
                hits += 1;
                assert!(t >= 0.0);
                let p = ray.at(t);
                assert!(((p - center).length() - radius).abs() < 1e-3);
            }
        }
        assert!(hits > 0);
    }

    #[test]
    fn test_ray_sphere_cases() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        // Behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray_sphere(&ray, Vec3::ZERO, 1.0).is_none());

        // From inside: far side
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-5);

        // Tangent
        let ray = Ray::new(Vec3::new(1.0, 0.0, 5.0), -Vec3::Z);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((ray.at(t) - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_ray_sphere_grazing_small_radii() {
        for radius in [0.001_f32, 0.01, 0.1, 0.5] {
            // Closest approach just outside the surface
            let offset = (radius * radius + 0.9e-5).sqrt();
            let ray = Ray::new(Vec3::new(offset, 0.0, 5.0), -Vec3::Z);
            let hit = ray_sphere(&ray, Vec3::ZERO, radius);
            if let Some(t) = hit {
                let error = (ray.at(t).length() - radius).abs();
                assert!(error <= 2.0 * EPSILON, "radius {radius}: hit {error} off the surface");
            }
            if radius <= 0.1 {
                assert!(hit.is_none(), "radius {radius}: ray passes {offset} from the center");
            }

            // Closest approach well inside
            let ray = Ray::new(Vec3::new(0.9 * radius, 0.0, 10.0 * radius), -Vec3::Z);
            let t = ray_sphere(&ray, Vec3::ZERO, radius).unwrap();
            assert!((ray.at(t).length() - radius).abs() <= 1e-3 * radius);
        }
    }

    #[test]
    fn test_ray_plane_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(ray_plane(&ray, Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_bounded_plane() {
        let a = Vec3::new(50.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 50.0);

        let ray = Ray::new(Vec3::new(10.0, 5.0, 10.0), -Vec3::Y);
        let t = ray_bounded_plane(&ray, Vec3::ZERO, a, b).unwrap();
        assert!((t - 5.0).abs() < 1e-5);

        // Hit from below too
        let ray = Ray::new(Vec3::new(10.0, -5.0, 10.0), Vec3::Y);
        assert!(ray_bounded_plane(&ray, Vec3::ZERO, a, b).is_some());

        // Outside the rectangle
        let ray = Ray::new(Vec3::new(-1.0, 5.0, 10.0), -Vec3::Y);
        assert!(ray_bounded_plane(&ray, Vec3::ZERO, a, b).is_none());
        let ray = Ray::new(Vec3::new(10.0, 5.0, 51.0), -Vec3::Y);
        assert!(ray_bounded_plane(&ray, Vec3::ZERO, a, b).is_none());
    }

    #[test]
    fn test_triangle_barycentric() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let w = tri.barycentric(Vec3::new(0.25, 0.25, 0.0));
        assert!((w - Vec3::new(0.5, 0.25, 0.25)).length() < 1e-5);
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
        assert!((tri.area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_contains() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!(tri.contains(Vec3::new(0.2, 0.2, 0.0)));
        assert!(tri.contains(Vec3::new(0.5, 0.0, 0.0)));
        assert!(!tri.contains(Vec3::new(0.6, 0.6, 0.0)));
        assert!(!tri.contains(Vec3::new(-0.1, 0.5, 0.0)));
    }

    #[test]
    fn test_triangle_intersect() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        );

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let t = tri.intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 0.001);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_interpolate() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let value = tri.interpolate(Vec3::new(1.0, 0.0, 0.0), [Vec3::X, Vec3::Y, Vec3::Z]);
        assert!((value - Vec3::Y).length() < 1e-5);
    }
}
