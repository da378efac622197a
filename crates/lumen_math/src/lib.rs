//! Lumen math - vectors, rays, bounds and intersection routines.
//!
//! Everything above this crate works in `f32` world space using glam types.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
pub mod geometry;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Transform, TransformParts};

/// Tolerance for perpendicularity, tangency and on-plane tests.
pub const EPSILON: f32 = 1e-5;

/// Returns true when `a` and `b` are within [`EPSILON`] of each other on every axis.
#[inline]
pub fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() <= EPSILON
}
