//! Construction-time errors for scenes and render configuration.

use glam::{UVec2, Vec3};
use thiserror::Error;

/// Errors raised while building a scene or validating render settings.
///
/// These are caller configuration mistakes; nothing here is retried.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Axes {a} and {b} are not perpendicular")]
    NonPerpendicularAxes { a: Vec3, b: Vec3 },

    #[error("{what} index count {len} is not a multiple of 3")]
    InvalidIndexCount { what: &'static str, len: usize },

    #[error("{what} index count {len} does not match {expected} triangle indices")]
    MismatchedIndexCount {
        what: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("{what} index {index} is out of bounds for {len} entries")]
    IndexOutOfBounds {
        what: &'static str,
        index: u32,
        len: usize,
    },

    #[error("Resolution {resolution} is not divisible by chunk grid {chunks}")]
    ChunkGridMismatch { resolution: UVec2, chunks: UVec2 },

    #[error("Render finished without assembling an image")]
    RenderIncomplete,

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;
