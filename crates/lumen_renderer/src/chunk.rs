//! Chunk-based tile rendering.
//!
//! Divides the image into an even grid of chunks that can be rendered
//! independently and in parallel.

use lumen_core::{DisplayColor, SceneError, SceneResult};
use lumen_math::UVec2;

use crate::tracer::trace_pixel;
use crate::World;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// X coordinate of the chunk's top-left corner
    pub x: u32,
    /// Y coordinate of the chunk's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this chunk in the render order
    pub index: usize,
}

impl Chunk {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    pub fn contains(&self, pixel: UVec2) -> bool {
        (self.x..self.x + self.width).contains(&pixel.x) && (self.y..self.y + self.height).contains(&pixel.y)
    }

    /// Global pixel coordinates covered by this chunk, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = UVec2> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| UVec2::new(x, y)))
    }
}

/// Split `resolution` into a `chunks.x × chunks.y` grid.
///
/// The resolution must be non-zero and divide evenly by the grid. Chunks
/// are returned nearest-the-center first, with `index` following that
/// order.
pub fn partition(resolution: UVec2, chunks: UVec2) -> SceneResult<Vec<Chunk>> {
    if resolution.min_element() == 0 || chunks.min_element() == 0 || resolution % chunks != UVec2::ZERO {
        return Err(SceneError::ChunkGridMismatch { resolution, chunks });
    }

    let size = resolution / chunks;
    let mut result = Vec::with_capacity((chunks.x * chunks.y) as usize);
    for row in 0..chunks.y {
        for column in 0..chunks.x {
            result.push(Chunk::new(
                column * size.x,
                row * size.y,
                size.x,
                size.y,
                result.len(),
            ));
        }
    }

    sort_spiral(&mut result, resolution);
    for (i, chunk) in result.iter_mut().enumerate() {
        chunk.index = i;
    }
    Ok(result)
}

/// Sort chunks by distance from the image center.
///
/// The sort is stable, so equally distant chunks keep row-major order.
fn sort_spiral(chunks: &mut [Chunk], resolution: UVec2) {
    let center_x = resolution.x as f32 / 2.0;
    let center_y = resolution.y as f32 / 2.0;

    let distance = |c: &Chunk| {
        let cx = c.x as f32 + c.width as f32 / 2.0;
        let cy = c.y as f32 + c.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };
    chunks.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Result of rendering a chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkResult {
    pub chunk: Chunk,
    /// Pixel colors in row-major order within the chunk
    pub pixels: Vec<DisplayColor>,
}

impl ChunkResult {
    pub fn new(chunk: Chunk, pixels: Vec<DisplayColor>) -> Self {
        Self { chunk, pixels }
    }
}

/// Trace every pixel of `chunk`.
pub fn render_chunk(world: &World, chunk: &Chunk) -> ChunkResult {
    let pixels = chunk.pixels().map(|pixel| trace_pixel(world, pixel)).collect();
    ChunkResult::new(*chunk, pixels)
}
