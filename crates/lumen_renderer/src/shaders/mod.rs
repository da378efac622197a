//! Shading interfaces.
//!
//! A [`ShapeShader`] decides how a surface reacts to light: which directions
//! the trace continues in and how incoming contributions combine into one
//! color. A [`PixelShader`] turns a pixel into camera rays and folds the
//! traced results back into a display color.

mod standard;
mod stratified;

pub use standard::{split_contributions, StandardShader};
pub use stratified::StratifiedPixelShader;

use lumen_core::{DisplayColor, RtColor};
use lumen_math::{geometry, Ray, UVec2, Vec3};

use crate::emission::EmissionChain;
use crate::shapes::{Shape, Surface, SurfaceHit};
use crate::Camera;

/// Surface response to light. Shared between shapes and render threads.
pub trait ShapeShader: Send + Sync {
    /// Normal used for shading at `hit`. Defaults to the geometric normal.
    fn normal(&self, shape: &Shape, hit: &SurfaceHit) -> Vec3 {
        shape.normal(hit)
    }

    /// Directions the trace continues in from `hit`.
    ///
    /// Defaults to the mirror reflection of the incoming direction.
    fn outgoing_rays(&self, shape: &Shape, hit: &SurfaceHit, incoming: &Ray) -> Vec<Vec3> {
        vec![geometry::reflect(incoming.direction, shape.normal(hit))]
    }

    /// Combine the contributions reaching `hit` into the color leaving it
    /// along `outgoing`.
    fn bounce_color(
        &self,
        shape: &Shape,
        hit: &SurfaceHit,
        contributions: &[EmissionChain],
        outgoing: Vec3,
    ) -> RtColor;

    /// Color that arrives after travelling `distance` from the surface.
    fn destination_color(&self, color: RtColor, _distance: f32) -> RtColor {
        color
    }
}

/// Maps pixels to camera rays and traced results to display colors.
pub trait PixelShader: Send + Sync {
    /// Rays to trace for `pixel`.
    ///
    /// Panics if `pixel` lies outside the camera resolution.
    fn emitted_rays(&self, camera: &Camera, pixel: UVec2) -> Vec<Ray>;

    /// Fold the traced samples of `pixel` into one color.
    fn final_pixel_color(
        &self,
        camera: &Camera,
        pixel: UVec2,
        samples: &[EmissionChain],
    ) -> DisplayColor;
}

/// `normal` flipped, if needed, to lie on the same side as `toward`.
pub fn face_forward(normal: Vec3, toward: Vec3) -> Vec3 {
    if normal.dot(toward) < 0.0 {
        -normal
    } else {
        normal
    }
}
