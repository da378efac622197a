//! Uniform stratified supersampling.

use lumen_core::{DisplayColor, RawColor};
use lumen_math::{Ray, UVec2, Vec2};

use super::PixelShader;
use crate::emission::EmissionChain;
use crate::Camera;

/// Places `rays_per_pixel.x × rays_per_pixel.y` samples on an even grid
/// inside each pixel and averages what they bring back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedPixelShader {
    pub rays_per_pixel: UVec2,
}

impl StratifiedPixelShader {
    /// At least one ray is cast along each axis.
    pub fn new(rays_per_pixel: UVec2) -> Self {
        Self {
            rays_per_pixel: rays_per_pixel.max(UVec2::ONE),
        }
    }

    pub fn sample_count(&self) -> usize {
        (self.rays_per_pixel.x * self.rays_per_pixel.y) as usize
    }

    /// Camera ray through sub-sample `sample` of `pixel`.
    pub fn sample_ray(&self, camera: &Camera, pixel: UVec2, sample: UVec2) -> Ray {
        assert_in_bounds(camera, pixel);
        assert!(
            sample.cmplt(self.rays_per_pixel).all(),
            "sample {sample} outside {} rays per pixel",
            self.rays_per_pixel
        );

        let offset = (sample.as_vec2() + Vec2::ONE) / (self.rays_per_pixel.as_vec2() + Vec2::ONE);
        let fraction = (pixel.as_vec2() + offset) / camera.resolution().as_vec2();
        Ray::towards(camera.eye(), camera.screen_point(fraction))
    }
}

impl Default for StratifiedPixelShader {
    fn default() -> Self {
        Self::new(UVec2::ONE)
    }
}

impl PixelShader for StratifiedPixelShader {
    fn emitted_rays(&self, camera: &Camera, pixel: UVec2) -> Vec<Ray> {
        let n = self.rays_per_pixel;
        let mut rays = Vec::with_capacity(self.sample_count());
        for j in 0..n.y {
            for i in 0..n.x {
                rays.push(self.sample_ray(camera, pixel, UVec2::new(i, j)));
            }
        }
        rays
    }

    fn final_pixel_color(
        &self,
        camera: &Camera,
        pixel: UVec2,
        samples: &[EmissionChain],
    ) -> DisplayColor {
        assert_in_bounds(camera, pixel);

        let finite: Vec<RawColor> = samples
            .iter()
            .map(|sample| sample.color().to_raw())
            .filter(RawColor::is_finite)
            .collect();
        if finite.is_empty() {
            return camera.background().to_display();
        }

        let count = finite.len() as f32;
        (finite.into_iter().sum::<RawColor>() / count).to_display()
    }
}

fn assert_in_bounds(camera: &Camera, pixel: UVec2) {
    assert!(
        pixel.cmplt(camera.resolution()).all(),
        "pixel {pixel} outside resolution {}",
        camera.resolution()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emission::{ColoredRay, Emitter};
    use lumen_core::RtColor;
    use lumen_math::{Transform, Vec3};

    fn camera() -> Camera {
        Camera::new(Transform::IDENTITY, UVec2::new(4, 2))
    }

    fn sample(color: RtColor) -> EmissionChain {
        EmissionChain::leaf(Emitter::Background, ColoredRay::from_infinity(Vec3::ZERO, Vec3::Z, color))
    }

    #[test]
    fn test_ray_count_and_spread() {
        let camera = camera();
        let shader = StratifiedPixelShader::new(UVec2::new(3, 2));
        let rays = shader.emitted_rays(&camera, UVec2::new(1, 1));
        assert_eq!(rays.len(), 6);

        for ray in &rays {
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
            assert_eq!(ray.origin, camera.eye());
        }
        // Distinct samples
        for (i, a) in rays.iter().enumerate() {
            for b in &rays[i + 1..] {
                assert!((a.direction - b.direction).length() > 1e-4);
            }
        }
    }

    #[test]
    fn test_single_sample_hits_pixel_center() {
        let camera = camera();
        let shader = StratifiedPixelShader::default();
        let ray = shader.emitted_rays(&camera, UVec2::new(0, 0))[0];
        let center = camera.screen_point(Vec2::new(0.5 / 4.0, 0.5 / 2.0));
        assert!((ray.direction - (center - camera.eye()).normalize()).length() < 1e-5);
    }

    #[test]
    #[should_panic(expected = "outside resolution")]
    fn test_out_of_range_pixel_panics() {
        let camera = camera();
        StratifiedPixelShader::default().emitted_rays(&camera, UVec2::new(4, 0));
    }

    #[test]
    #[should_panic(expected = "rays per pixel")]
    fn test_out_of_range_sample_panics() {
        let camera = camera();
        StratifiedPixelShader::new(UVec2::new(2, 2)).sample_ray(&camera, UVec2::ZERO, UVec2::new(0, 2));
    }

    #[test]
    fn test_average() {
        let camera = camera();
        let shader = StratifiedPixelShader::new(UVec2::new(2, 1));
        let samples = [sample(RtColor::WHITE), sample(RtColor::BLACK)];
        let color = shader.final_pixel_color(&camera, UVec2::ZERO, &samples);
        assert_eq!(color, DisplayColor::new(128, 128, 128));
    }

    #[test]
    fn test_no_samples_gives_background() {
        let background = DisplayColor::new(12, 34, 56);
        let camera = camera().with_background(RtColor::from_display(background));
        let color = StratifiedPixelShader::default().final_pixel_color(&camera, UVec2::ZERO, &[]);
        assert_eq!(color, background);
    }
}
