//! The causal record of how light reached a point.
//!
//! Light in a [`ColoredRay`] travels from `origin` along `direction` and
//! arrives at `point_of_contact`. An [`EmissionChain`] node says who emitted
//! that light and keeps the contributions that produced it as `parents`, so
//! a traced camera ray becomes a tree bounded by the bounce limit.

use lumen_core::RtColor;
use lumen_math::{geometry, Vec3};

use crate::light::LightId;
use crate::shapes::ShapeId;

/// Who last emitted the light carried by a chain node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emitter {
    Light(LightId),
    Shape(ShapeId),
    /// A ray that escaped the scene
    Background,
}

/// Light travelling between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredRay {
    pub origin: Vec3,
    /// Unit direction of travel, zero when origin and contact coincide
    pub direction: Vec3,
    /// Color as emitted
    pub source_color: RtColor,
    /// Color after attenuation, as received at the point of contact
    pub destination_color: RtColor,
    pub point_of_contact: Vec3,
}

impl ColoredRay {
    /// Light from `origin` to `point_of_contact`, unattenuated.
    pub fn new(origin: Vec3, point_of_contact: Vec3, color: RtColor) -> Self {
        Self {
            origin,
            direction: (point_of_contact - origin).normalize_or_zero(),
            source_color: color,
            destination_color: color,
            point_of_contact,
        }
    }

    /// Light arriving at `point_of_contact` from infinitely far away along `direction`.
    pub fn from_infinity(point_of_contact: Vec3, direction: Vec3, color: RtColor) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            origin: geometry::point_at_infinity(point_of_contact, -direction),
            direction,
            source_color: color,
            destination_color: color,
            point_of_contact,
        }
    }

    pub fn with_destination_color(mut self, color: RtColor) -> Self {
        self.destination_color = color;
        self
    }

    /// Distance travelled; infinite for light from infinity.
    pub fn distance(&self) -> f32 {
        if !self.origin.is_finite() {
            return f32::INFINITY;
        }
        (self.point_of_contact - self.origin).length()
    }
}

/// One node of the emission tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionChain {
    pub emitter: Emitter,
    pub ray: ColoredRay,
    pub parents: Vec<EmissionChain>,
}

impl EmissionChain {
    pub fn new(emitter: Emitter, ray: ColoredRay, parents: Vec<EmissionChain>) -> Self {
        Self {
            emitter,
            ray,
            parents,
        }
    }

    /// A node with no contributions (light sources and background).
    pub fn leaf(emitter: Emitter, ray: ColoredRay) -> Self {
        Self::new(emitter, ray, Vec::new())
    }

    /// Color received at the end of this node's ray.
    pub fn color(&self) -> RtColor {
        self.ray.destination_color
    }

    pub fn is_light(&self) -> bool {
        matches!(self.emitter, Emitter::Light(_))
    }

    /// Number of levels in the tree, 1 for a leaf.
    pub fn depth(&self) -> usize {
        1 + self.parents.iter().map(EmissionChain::depth).max().unwrap_or(0)
    }

    /// Contributions that came straight from light sources.
    pub fn light_parents(&self) -> impl Iterator<Item = &EmissionChain> {
        self.parents.iter().filter(|p| p.is_light())
    }
}
