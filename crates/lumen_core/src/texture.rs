//! Texture storage and the load-once texture registry.
//!
//! Textures are immutable grids of display colors. The registry owns one
//! `Arc<Texture>` per location key and hands out clones of it, so every
//! shader that names the same file shares the same pixels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use thiserror::Error;

use crate::color::DisplayColor;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Texture is {width}x{height} but has {len} pixels")]
    DimensionMismatch { width: u32, height: u32, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture, stored row-major with row 0 at `v = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<DisplayColor>,
    /// Where the pixels came from (for logging)
    source: String,
}

impl Texture {
    /// Create a texture from row-major pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<DisplayColor>,
        source: impl Into<String>,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::DimensionMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            source: source.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: DisplayColor) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            source: "<solid>".to_string(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Pixel at integer coordinates, `None` outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<DisplayColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Nearest-pixel lookup. UVs outside `[0, 1]` are clamped to the edge.
    pub fn sample(&self, uv: Vec2) -> DisplayColor {
        let u = if uv.x.is_finite() { uv.x.clamp(0.0, 1.0) } else { 0.0 };
        let v = if uv.y.is_finite() { uv.y.clamp(0.0, 1.0) } else { 0.0 };

        let x = (u * (self.width - 1) as f32).round() as u32;
        let y = (v * (self.height - 1) as f32).round() as u32;

        self.pixels[(y.min(self.height - 1) * self.width + x.min(self.width - 1)) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<DisplayColor>()
    }
}

/// Cache of shared textures keyed by location.
///
/// Owned by whoever builds the scene; shaders hold the `Arc`s it returns.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Register an already-decoded texture.
    ///
    /// If `key` is already present the existing texture wins and is returned.
    pub fn insert(&mut self, key: impl Into<String>, texture: Texture) -> Arc<Texture> {
        self.textures
            .entry(key.into())
            .or_insert_with(|| Arc::new(texture))
            .clone()
    }

    /// Get the texture for `key`, building it with `make` on first use.
    pub fn get_or_insert_with<F>(&mut self, key: &str, make: F) -> Arc<Texture>
    where
        F: FnOnce() -> Texture,
    {
        if let Some(texture) = self.textures.get(key) {
            return texture.clone();
        }
        self.insert(key, make())
    }

    /// Load a texture from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = load_texture_file(&full_path)?;

        let texture = self.insert(path, texture);
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB, cache {:.1} KB)",
            texture.source(),
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0,
            self.total_size_bytes() as f32 / 1024.0
        );
        Ok(texture)
    }

    /// Get a cached texture without loading.
    pub fn get(&self, key: &str) -> Option<Arc<Texture>> {
        self.textures.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Get total memory usage of cached textures.
    pub fn total_size_bytes(&self) -> usize {
        self.textures.values().map(|t| t.size_bytes()).sum()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Decode an image file into 8-bit RGB pixels.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb
        .pixels()
        .map(|p| DisplayColor::new(p[0], p[1], p[2]))
        .collect();

    Texture::new(width, height, pixels, path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        let pixels = vec![
            DisplayColor::new(255, 0, 0),
            DisplayColor::new(0, 255, 0),
            DisplayColor::new(0, 0, 255),
            DisplayColor::WHITE,
        ];
        Texture::new(2, 2, pixels, "checker").unwrap()
    }

    #[test]
    fn test_texture_dimensions_checked() {
        let err = Texture::new(2, 2, vec![DisplayColor::BLACK; 3], "bad").unwrap_err();
        assert!(matches!(err, TextureError::DimensionMismatch { len: 3, .. }));
    }

    #[test]
    fn test_sample_corners_and_clamp() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), DisplayColor::new(255, 0, 0));
        assert_eq!(tex.sample(Vec2::new(1.0, 0.0)), DisplayColor::new(0, 255, 0));
        assert_eq!(tex.sample(Vec2::new(0.0, 1.0)), DisplayColor::new(0, 0, 255));
        assert_eq!(tex.sample(Vec2::new(3.0, 7.0)), DisplayColor::WHITE);
        assert_eq!(tex.sample(Vec2::new(-1.0, f32::NAN)), DisplayColor::new(255, 0, 0));
    }

    #[test]
    fn test_pixel_index() {
        let tex = checker();
        assert_eq!(tex.pixel(1, 1), Some(DisplayColor::WHITE));
        assert_eq!(tex.pixel(2, 0), None);
    }

    #[test]
    fn test_registry_shares_instances() {
        let mut registry = TextureRegistry::new();
        assert!(registry.is_empty());

        let first = registry.insert("checker", checker());
        let second = registry.insert("checker", Texture::solid_color(DisplayColor::BLACK));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.pixel(0, 0), Some(DisplayColor::new(255, 0, 0)));
        assert_eq!(registry.len(), 1);

        let third = registry.get_or_insert_with("checker", || panic!("already cached"));
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_registry_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("lumen_texture_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gradient.png");

        let img = image::RgbImage::from_fn(4, 2, |x, y| image::Rgb([x as u8 * 60, y as u8 * 200, 7]));
        img.save(&path).unwrap();

        let mut registry = TextureRegistry::with_base_dir(&dir);
        let a = registry.load("gradient.png").unwrap();
        let b = registry.load("gradient.png").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.source(), path.to_string_lossy());
        assert_eq!(registry.total_size_bytes(), 4 * 2 * 3);
        assert_eq!(a.width(), 4);
        assert_eq!(a.height(), 2);
        assert_eq!(a.pixel(3, 1), Some(DisplayColor::new(180, 200, 7)));

        assert!(registry.load("missing.png").is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
