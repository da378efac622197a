use crate::Vec3;

/// A ray in 3D space.
///
/// The direction is re-normalized on construction, so `at(t)` measures
/// distance along the ray in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. A zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray from `origin` passing through `target`.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the orthogonal projection of `point` onto the ray.
    #[inline]
    pub fn parameter_of(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction)
    }
}
