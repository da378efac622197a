//! Lumen core - the data the renderer consumes and produces.
//!
//! This crate provides:
//!
//! - **Colors**: bounded `RtColor`, unbounded `RawColor` accumulator, 8-bit `DisplayColor`
//! - **Mesh input**: validated vertex/index arrays (`MeshData`)
//! - **Textures**: `Texture` grids and the load-once `TextureRegistry`
//! - **Settings**: `RenderSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::RenderSettings;
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! settings.validate()?;
//! ```

pub mod color;
pub mod error;
pub mod mesh;
pub mod settings;
pub mod texture;

// Re-export commonly used types
pub use color::{DisplayColor, RawColor, RtColor, MAX_INTENSITY};
pub use error::{SceneError, SceneResult};
pub use mesh::{MeshData, MeshTriangle};
pub use settings::RenderSettings;
pub use texture::{Texture, TextureError, TextureRegistry, TextureResult};
