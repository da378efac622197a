//! Render settings consumed by the renderer.
//!
//! Settings are plain data with serde support so the binary can read them
//! from a JSON file. Missing fields fall back to [`RenderSettings::default`].

use std::path::Path;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::color::DisplayColor;
use crate::error::{SceneError, SceneResult};

/// Everything a render pass needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width and height in pixels
    pub resolution: [u32; 2],
    /// Stratified rays per pixel along X and Y
    pub samples_per_pixel: [u32; 2],
    /// Maximum reflection depth
    pub bounce_limit: u32,
    /// Chunk grid along X and Y; must divide the resolution
    pub chunks: [u32; 2],
    /// Render chunks on the thread pool instead of the calling thread
    pub multithreaded: bool,
    /// Color of rays that escape the scene
    pub background: DisplayColor,
    /// Octree subdivision depth, 0 for a flat shape list
    pub octree_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: [640, 480],
            samples_per_pixel: [1, 1],
            bounce_limit: 2,
            chunks: [4, 4],
            multithreaded: true,
            background: DisplayColor::BLACK,
            octree_depth: 0,
        }
    }
}

impl RenderSettings {
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn resolution(&self) -> UVec2 {
        UVec2::from_array(self.resolution)
    }

    pub fn samples_per_pixel(&self) -> UVec2 {
        UVec2::from_array(self.samples_per_pixel)
    }

    pub fn chunks(&self) -> UVec2 {
        UVec2::from_array(self.chunks)
    }

    /// Check the settings describe a renderable image.
    pub fn validate(&self) -> SceneResult<()> {
        let resolution = self.resolution();
        let chunks = self.chunks();

        if resolution.min_element() == 0 {
            return Err(SceneError::InvalidSettings(format!(
                "resolution {resolution} has a zero dimension"
            )));
        }
        if self.samples_per_pixel().min_element() == 0 {
            return Err(SceneError::InvalidSettings(
                "samples_per_pixel must be at least 1 on each axis".to_string(),
            ));
        }
        if chunks.min_element() == 0 || resolution % chunks != UVec2::ZERO {
            return Err(SceneError::ChunkGridMismatch { resolution, chunks });
        }
        Ok(())
    }
}
