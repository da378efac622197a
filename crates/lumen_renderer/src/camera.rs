//! Camera for ray generation.
//!
//! The camera looks along its transform's forward axis. The image plane sits
//! `scale.z` in front of the eye and is `scale.x` wide and `scale.y` tall.
//! Its four corners are derived from the transform by
//! [`ScreenCorners::from_transform`] and re-derived whenever the transform
//! changes.

use std::fmt;
use std::sync::Arc;

use lumen_core::{RenderSettings, RtColor};
use lumen_math::{Transform, UVec2, Vec2, Vec3};

use crate::shaders::{PixelShader, StratifiedPixelShader};

/// Corners of the image plane in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCorners {
    pub top_left: Vec3,
    pub top_right: Vec3,
    pub bottom_left: Vec3,
    pub bottom_right: Vec3,
}

impl ScreenCorners {
    pub fn from_transform(transform: &Transform) -> Self {
        let forward = transform.forward();
        let up = transform.up();
        // Image x grows toward forward × up so the picture is not mirrored.
        let right = forward.cross(up);

        let center = transform.position + forward * transform.scale.z;
        let half_width = right * (transform.scale.x * 0.5);
        let half_height = up * (transform.scale.y * 0.5);

        Self {
            top_left: center - half_width + half_height,
            top_right: center + half_width + half_height,
            bottom_left: center - half_width - half_height,
            bottom_right: center + half_width - half_height,
        }
    }

    /// Point at `fraction` of the screen, `(0, 0)` top-left and `(1, 1)`
    /// bottom-right.
    pub fn point(&self, fraction: Vec2) -> Vec3 {
        self.top_left
            + (self.top_right - self.top_left) * fraction.x
            + (self.bottom_left - self.top_left) * fraction.y
    }
}

/// Camera for generating rays into the scene.
#[derive(Clone)]
pub struct Camera {
    transform: Transform,
    resolution: UVec2,
    pixel_shader: Arc<dyn PixelShader>,
    bounce_limit: u32,
    background: RtColor,
    // Cached from `transform`
    corners: ScreenCorners,
}

impl Camera {
    /// A camera with one ray per pixel, two bounces and a black background.
    pub fn new(transform: Transform, resolution: UVec2) -> Self {
        Self {
            corners: ScreenCorners::from_transform(&transform),
            transform,
            resolution,
            pixel_shader: Arc::new(StratifiedPixelShader::default()),
            bounce_limit: 2,
            background: RtColor::BLACK,
        }
    }

    /// Resolution, sampling, bounce limit and background from `settings`.
    pub fn from_settings(transform: Transform, settings: &RenderSettings) -> Self {
        Self::new(transform, settings.resolution())
            .with_pixel_shader(Arc::new(StratifiedPixelShader::new(settings.samples_per_pixel())))
            .with_bounce_limit(settings.bounce_limit)
            .with_background(RtColor::from_display(settings.background))
    }

    pub fn with_pixel_shader(mut self, pixel_shader: Arc<dyn PixelShader>) -> Self {
        self.pixel_shader = pixel_shader;
        self
    }

    pub fn with_bounce_limit(mut self, bounce_limit: u32) -> Self {
        self.bounce_limit = bounce_limit;
        self
    }

    pub fn with_background(mut self, background: RtColor) -> Self {
        self.background = background;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Move the camera, re-deriving the screen corners.
    pub fn set_transform(&mut self, transform: Transform) {
        self.corners = ScreenCorners::from_transform(&transform);
        self.transform = transform;
    }

    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    pub fn pixel_shader(&self) -> &dyn PixelShader {
        self.pixel_shader.as_ref()
    }

    pub fn bounce_limit(&self) -> u32 {
        self.bounce_limit
    }

    pub fn background(&self) -> RtColor {
        self.background
    }

    pub fn corners(&self) -> &ScreenCorners {
        &self.corners
    }

    pub fn eye(&self) -> Vec3 {
        self.transform.position
    }

    pub fn screen_point(&self, fraction: Vec2) -> Vec3 {
        self.corners.point(fraction)
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("transform", &self.transform)
            .field("resolution", &self.resolution)
            .field("bounce_limit", &self.bounce_limit)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}
