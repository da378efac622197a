//! Drives a full render pass over the chunk grid.
//!
//! Synchronous mode renders chunks one after another on the calling thread.
//! Concurrent mode spawns one rayon task per chunk; each task writes only its
//! own result slot and completion flag, and the task that finishes last
//! assembles the image and hands it to the completion callback.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use image::{Rgb, RgbImage};
use lumen_core::{DisplayColor, RenderSettings, SceneError, SceneResult};
use lumen_math::UVec2;

use crate::chunk::{partition, render_chunk, Chunk, ChunkResult};
use crate::World;

/// Finished render output, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<DisplayColor>,
}

impl Image {
    /// Create an image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![DisplayColor::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[DisplayColor] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<DisplayColor> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Set one pixel; coordinates outside the image are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: DisplayColor) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Copy a rendered chunk into place.
    pub fn blit(&mut self, result: &ChunkResult) {
        for (pixel, &color) in result.chunk.pixels().zip(&result.pixels) {
            self.set(pixel.x, pixel.y, color);
        }
    }

    /// Packed 8-bit RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.get(x, y).unwrap_or(DisplayColor::BLACK).to_array())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One chunk after another on the calling thread
    Synchronous,
    /// One rayon task per chunk
    #[default]
    Concurrent,
}

/// How a render pass is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Chunk grid; must divide the camera resolution
    pub chunks: UVec2,
    pub mode: ExecutionMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chunks: UVec2::ONE,
            mode: ExecutionMode::default(),
        }
    }
}

impl RenderOptions {
    pub fn new(chunks: UVec2, mode: ExecutionMode) -> Self {
        Self { chunks, mode }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mode = if settings.multithreaded {
            ExecutionMode::Concurrent
        } else {
            ExecutionMode::Synchronous
        };
        Self::new(settings.chunks(), mode)
    }
}

/// Render the world's camera view and return the assembled image.
pub fn render(world: &World, options: RenderOptions) -> SceneResult<Image> {
    let mut output = None;
    render_with(world, options, |image| output = Some(image))?;
    output.ok_or(SceneError::RenderIncomplete)
}

/// Render the world's camera view, passing the assembled image to
/// `on_complete` once every chunk has finished.
///
/// Returns after the callback has run. Fails before any work starts if the
/// chunk grid does not divide the camera resolution.
pub fn render_with<F>(world: &World, options: RenderOptions, on_complete: F) -> SceneResult<()>
where
    F: FnOnce(Image) + Send,
{
    let resolution = world.camera().resolution();
    let chunks = partition(resolution, options.chunks)?;

    log::info!(
        "Rendering {}x{} in {} chunks ({:?})",
        resolution.x,
        resolution.y,
        chunks.len(),
        options.mode
    );
    let start = Instant::now();

    match options.mode {
        ExecutionMode::Synchronous => {
            let mut image = Image::new(resolution.x, resolution.y);
            for (i, chunk) in chunks.iter().enumerate() {
                image.blit(&render_chunk(world, chunk));
                log::info!("{}/{} done", i + 1, chunks.len());
            }
            on_complete(image);
        }
        ExecutionMode::Concurrent => render_concurrent(world, resolution, &chunks, on_complete),
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(())
}

fn render_concurrent<F>(world: &World, resolution: UVec2, chunks: &[Chunk], on_complete: F)
where
    F: FnOnce(Image) + Send,
{
    let slots: Vec<OnceLock<ChunkResult>> = chunks.iter().map(|_| OnceLock::new()).collect();
    let done: Vec<AtomicBool> = chunks.iter().map(|_| AtomicBool::new(false)).collect();
    let remaining = AtomicUsize::new(chunks.len());
    let on_complete = Mutex::new(Some(on_complete));

    rayon::scope(|scope| {
        for chunk in chunks {
            let (slots, done, remaining, on_complete) = (&slots, &done, &remaining, &on_complete);
            scope.spawn(move |_| {
                // A slot is only ever filled by its own chunk's task.
                if slots[chunk.index].set(render_chunk(world, chunk)).is_err() {
                    log::warn!("Chunk {} rendered twice; keeping the first result", chunk.index);
                }
                done[chunk.index].store(true, Ordering::Release);
                log::debug!("Chunk {} ({}, {}) done", chunk.index, chunk.x, chunk.y);

                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let image = assemble(resolution, slots, done);
                    let callback = on_complete
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                    if let Some(callback) = callback {
                        callback(image);
                    }
                }
            });
        }
    });
}

fn assemble(resolution: UVec2, slots: &[OnceLock<ChunkResult>], done: &[AtomicBool]) -> Image {
    let mut image = Image::new(resolution.x, resolution.y);
    for (slot, flag) in slots.iter().zip(done) {
        if !flag.load(Ordering::Acquire) {
            continue;
        }
        if let Some(result) = slot.get() {
            image.blit(result);
        }
    }
    image
}
