//! Lambertian shader with mirror reflection, textures and normal maps.

use std::sync::Arc;

use lumen_core::{RawColor, RtColor, Texture};
use lumen_math::{geometry, Ray, Transform, Vec3};

use super::{face_forward, ShapeShader};
use crate::emission::EmissionChain;
use crate::light::Falloff;
use crate::shapes::{Shape, Surface, SurfaceHit};

/// Default surface shader.
///
/// Direct light and reflected light are summed separately, each
/// contribution weighted by its Lambert factor. The reflected total is
/// scaled by `reflectiveness` before being added to the direct total.
#[derive(Debug, Clone)]
pub struct StandardShader {
    /// Per-channel tint
    pub albedo: Vec3,
    /// Share of reflected light kept, in `[0, 1]`
    pub reflectiveness: f32,
    /// Share of intensity removed, in `[0, 1]`
    pub absorbance: f32,
    pub texture: Option<Arc<Texture>>,
    /// Weight of the texture against the lit color
    pub texture_strength: f32,
    /// Tangent-space normals, +Z out of the surface
    pub normal_map: Option<Arc<Texture>>,
    /// Attenuation of the color this surface passes on
    pub falloff: Falloff,
}

impl Default for StandardShader {
    fn default() -> Self {
        Self {
            albedo: Vec3::ONE,
            reflectiveness: 0.0,
            absorbance: 0.0,
            texture: None,
            texture_strength: 1.0,
            normal_map: None,
            falloff: Falloff::None,
        }
    }
}

impl StandardShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_albedo(mut self, albedo: Vec3) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn with_reflectiveness(mut self, reflectiveness: f32) -> Self {
        self.reflectiveness = reflectiveness.clamp(0.0, 1.0);
        self
    }

    pub fn with_absorbance(mut self, absorbance: f32) -> Self {
        self.absorbance = absorbance.clamp(0.0, 1.0);
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>, strength: f32) -> Self {
        self.texture = Some(texture);
        self.texture_strength = strength.max(0.0);
        self
    }

    pub fn with_normal_map(mut self, normal_map: Arc<Texture>) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    fn apply_texture(&self, color: RtColor, shape: &Shape, hit: &SurfaceHit) -> RtColor {
        let Some(texture) = &self.texture else {
            return color;
        };
        let sampled = texture.sample(shape.uv(hit)).to_unit();
        let s = self.texture_strength;
        RtColor::from_rgb(color.intensity(), (sampled * s + color.rgb()) / (1.0 + s))
    }
}

impl ShapeShader for StandardShader {
    fn normal(&self, shape: &Shape, hit: &SurfaceHit) -> Vec3 {
        let geometric = shape.normal(hit);
        let Some(normal_map) = &self.normal_map else {
            return geometric;
        };

        let tangent = normal_map.sample(shape.uv(hit)).to_unit() * 2.0 - Vec3::ONE;
        let rotated = Transform::rotation_between(Vec3::Z, geometric) * tangent;
        rotated.try_normalize().unwrap_or(geometric)
    }

    /// Mirror reflection about the shading normal, so normal maps bend
    /// reflections as well as lighting.
    fn outgoing_rays(&self, shape: &Shape, hit: &SurfaceHit, incoming: &Ray) -> Vec<Vec3> {
        vec![geometry::reflect(incoming.direction, self.normal(shape, hit))]
    }

    fn bounce_color(
        &self,
        shape: &Shape,
        hit: &SurfaceHit,
        contributions: &[EmissionChain],
        outgoing: Vec3,
    ) -> RtColor {
        let normal = face_forward(self.normal(shape, hit), outgoing);
        let (light, reflected) = split_contributions(normal, contributions);

        let lit = (light + reflected * self.reflectiveness)
            .to_bounded()
            .scale_intensity(1.0 - self.absorbance)
            .tint(self.albedo);
        self.apply_texture(lit, shape, hit)
    }

    fn destination_color(&self, color: RtColor, distance: f32) -> RtColor {
        self.falloff.apply(color, distance)
    }
}

/// Lambert-weighted sums of `(direct light, reflected light)` arriving at a
/// surface with the given viewer-facing `normal`.
///
/// Contributions with a zero direction are taken at full weight.
pub fn split_contributions(normal: Vec3, contributions: &[EmissionChain]) -> (RawColor, RawColor) {
    let mut light = RawColor::ZERO;
    let mut reflected = RawColor::ZERO;

    for contribution in contributions {
        let weighted = contribution.color().to_raw() * lambert(normal, contribution.ray.direction);
        if !weighted.is_finite() {
            continue;
        }
        if contribution.is_light() {
            light += weighted;
        } else {
            reflected += weighted;
        }
    }
    (light, reflected)
}

fn lambert(normal: Vec3, direction: Vec3) -> f32 {
    if direction == Vec3::ZERO {
        return 1.0;
    }
    normal.dot(-direction).max(0.0)
}
