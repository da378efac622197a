//! Color representations.
//!
//! Light is carried as an intensity plus three channel values. Two forms
//! exist so light sums are never clamped halfway through:
//!
//! - [`RtColor`]: bounded, intensity in `[0, MAX_INTENSITY]`, channels in `[0, 1]`
//! - [`RawColor`]: unbounded accumulator with intensity-weighted channels
//!
//! [`DisplayColor`] is the 8-bit result written to images.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Upper bound of [`RtColor::intensity`]; a display channel of 255 means
/// a channel of 1.0 at this intensity.
pub const MAX_INTENSITY: f32 = 100.0;

#[inline]
fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// 8-bit RGB color as written to the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct DisplayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DisplayColor {
    pub const BLACK: DisplayColor = DisplayColor::new(0, 0, 0);
    pub const WHITE: DisplayColor = DisplayColor::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels scaled to `[0, 1]`.
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

impl From<[u8; 3]> for DisplayColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<DisplayColor> for [u8; 3] {
    fn from(color: DisplayColor) -> Self {
        color.to_array()
    }
}

/// Bounded color: every constructor clamps, non-finite inputs become zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtColor {
    intensity: f32,
    rgb: Vec3,
}

impl RtColor {
    pub const BLACK: RtColor = RtColor {
        intensity: 0.0,
        rgb: Vec3::ZERO,
    };

    pub const WHITE: RtColor = RtColor {
        intensity: MAX_INTENSITY,
        rgb: Vec3::ONE,
    };

    pub fn new(intensity: f32, r: f32, g: f32, b: f32) -> Self {
        Self::from_rgb(intensity, Vec3::new(r, g, b))
    }

    pub fn from_rgb(intensity: f32, rgb: Vec3) -> Self {
        let clamp_channel = |c: f32| finite_or_zero(c).clamp(0.0, 1.0);
        Self {
            intensity: finite_or_zero(intensity).clamp(0.0, MAX_INTENSITY),
            rgb: Vec3::new(clamp_channel(rgb.x), clamp_channel(rgb.y), clamp_channel(rgb.z)),
        }
    }

    /// Full-intensity color with the display channels mapped to `[0, 1]`.
    pub fn from_display(color: DisplayColor) -> Self {
        Self::from_rgb(MAX_INTENSITY, color.to_unit())
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn rgb(&self) -> Vec3 {
        self.rgb
    }

    pub fn with_intensity(self, intensity: f32) -> Self {
        Self::from_rgb(intensity, self.rgb)
    }

    /// Multiply the intensity, clamping the result.
    pub fn scale_intensity(self, factor: f32) -> Self {
        self.with_intensity(self.intensity * factor)
    }

    /// Multiply the channels component-wise, clamping the result.
    pub fn tint(self, tint: Vec3) -> Self {
        Self::from_rgb(self.intensity, self.rgb * tint)
    }

    pub fn is_black(&self) -> bool {
        self.intensity == 0.0 || self.rgb == Vec3::ZERO
    }

    pub fn to_raw(self) -> RawColor {
        RawColor::new(self.intensity, self.rgb * self.intensity)
    }

    pub fn to_display(self) -> DisplayColor {
        self.to_raw().to_display()
    }
}

impl Default for RtColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<DisplayColor> for RtColor {
    fn from(color: DisplayColor) -> Self {
        Self::from_display(color)
    }
}

/// Unbounded color accumulator.
///
/// `rgb` holds channel × intensity, so summing two raw colors weights each
/// channel by its share of the combined intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawColor {
    pub intensity: f32,
    pub rgb: Vec3,
}

impl RawColor {
    pub const ZERO: RawColor = RawColor {
        intensity: 0.0,
        rgb: Vec3::ZERO,
    };

    pub fn new(intensity: f32, rgb: Vec3) -> Self {
        Self { intensity, rgb }
    }

    pub fn is_finite(&self) -> bool {
        self.intensity.is_finite() && self.rgb.is_finite()
    }

    /// Back to a bounded color. Zero or non-finite intensity gives black.
    pub fn to_bounded(self) -> RtColor {
        if !self.intensity.is_finite() || self.intensity <= 0.0 {
            return RtColor::BLACK;
        }
        RtColor::from_rgb(self.intensity, self.rgb / self.intensity)
    }

    /// Map to 8 bits: `rgb / MAX_INTENSITY × 255`, rounded and clamped.
    pub fn to_display(self) -> DisplayColor {
        let channel = |c: f32| {
            let v = finite_or_zero(c / MAX_INTENSITY * 255.0);
            v.round().clamp(0.0, 255.0) as u8
        };
        DisplayColor::new(channel(self.rgb.x), channel(self.rgb.y), channel(self.rgb.z))
    }
}

impl Add for RawColor {
    type Output = RawColor;

    fn add(self, rhs: RawColor) -> RawColor {
        RawColor::new(self.intensity + rhs.intensity, self.rgb + rhs.rgb)
    }
}

impl AddAssign for RawColor {
    fn add_assign(&mut self, rhs: RawColor) {
        *self = *self + rhs;
    }
}

impl Sub for RawColor {
    type Output = RawColor;

    fn sub(self, rhs: RawColor) -> RawColor {
        RawColor::new(self.intensity - rhs.intensity, self.rgb - rhs.rgb)
    }
}

impl Neg for RawColor {
    type Output = RawColor;

    fn neg(self) -> RawColor {
        RawColor::new(-self.intensity, -self.rgb)
    }
}

impl Mul<f32> for RawColor {
    type Output = RawColor;

    fn mul(self, rhs: f32) -> RawColor {
        RawColor::new(self.intensity * rhs, self.rgb * rhs)
    }
}

impl Div<f32> for RawColor {
    type Output = RawColor;

    fn div(self, rhs: f32) -> RawColor {
        RawColor::new(self.intensity / rhs, self.rgb / rhs)
    }
}

impl Sum for RawColor {
    fn sum<I: Iterator<Item = RawColor>>(iter: I) -> RawColor {
        iter.fold(RawColor::ZERO, Add::add)
    }
}
