//! Light sources and distance falloff.
//!
//! Shadows are binary: a point either sees the light or receives black.

use lumen_core::RtColor;
use lumen_math::{Ray, Vec3};

use crate::emission::ColoredRay;
use crate::World;

/// Index of a light inside a [`World`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(pub usize);

/// How intensity drops with distance.
///
/// Within `reference` units there is no attenuation; the factor never
/// exceeds 1. Light from infinitely far away is not attenuated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Falloff {
    #[default]
    None,
    InverseDistance { reference: f32 },
    InverseSquare { reference: f32 },
}

impl Falloff {
    pub fn factor(&self, distance: f32) -> f32 {
        if !distance.is_finite() || distance <= 0.0 {
            return 1.0;
        }
        match *self {
            Falloff::None => 1.0,
            Falloff::InverseDistance { reference } => (reference / distance).min(1.0),
            Falloff::InverseSquare { reference } => (reference / distance).powi(2).min(1.0),
        }
    }

    pub fn apply(&self, color: RtColor, distance: f32) -> RtColor {
        color.scale_intensity(self.factor(distance))
    }
}

/// A light at a point, attenuated by distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: RtColor,
    pub falloff: Falloff,
}

impl PointLight {
    pub fn new(position: Vec3, color: RtColor) -> Self {
        Self {
            position,
            color,
            falloff: Falloff::InverseSquare { reference: 10.0 },
        }
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Shadowed when an occluder lies strictly nearer than the light.
    pub fn reaching_ray(&self, world: &World, point: Vec3) -> ColoredRay {
        let ray = ColoredRay::new(self.position, point, self.color);
        let distance = ray.distance();

        let occluded = distance > 0.0
            && world
                .closest_shape_hit(&Ray::towards(point, self.position))
                .is_some_and(|occluder| occluder.hit.t < distance);

        if occluded {
            ray.with_destination_color(RtColor::BLACK)
        } else {
            ray.with_destination_color(self.falloff.apply(self.color, distance))
        }
    }
}

/// A distant light shining along a fixed direction, like the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalLight {
    /// Direction the light travels
    pub direction: Vec3,
    pub color: RtColor,
}

impl GlobalLight {
    pub fn new(direction: Vec3, color: RtColor) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
        }
    }

    /// Shadowed when anything lies between `point` and infinity.
    pub fn reaching_ray(&self, world: &World, point: Vec3) -> ColoredRay {
        let ray = ColoredRay::from_infinity(point, self.direction, self.color);
        let occluded = world
            .closest_shape_hit(&Ray::new(point, -self.direction))
            .is_some();

        if occluded {
            ray.with_destination_color(RtColor::BLACK)
        } else {
            ray
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    Point(PointLight),
    Global(GlobalLight),
}

impl LightSource {
    /// The light arriving at `point`, black when shadowed.
    pub fn reaching_ray(&self, world: &World, point: Vec3) -> ColoredRay {
        match self {
            LightSource::Point(light) => light.reaching_ray(world, point),
            LightSource::Global(light) => light.reaching_ray(world, point),
        }
    }
}

impl From<PointLight> for LightSource {
    fn from(light: PointLight) -> Self {
        LightSource::Point(light)
    }
}

impl From<GlobalLight> for LightSource {
    fn from(light: GlobalLight) -> Self {
        LightSource::Global(light)
    }
}
