//! Lumen renderer - recursive CPU ray tracing.
//!
//! A Whitted-style tracer: camera rays find their nearest surface, reflect
//! up to a fixed bounce limit, and collect binary-shadowed light from every
//! light source. Each traced ray yields an [`EmissionChain`] recording where
//! its light came from, and shaders fold those chains into colors.
//!
//! Images are rendered as a grid of independent chunks, either on the
//! calling thread or across the rayon pool.

mod camera;
mod chunk;
mod emission;
mod light;
mod octree;
mod renderer;
mod tracer;
mod world;

pub mod shaders;
pub mod shapes;

pub use camera::{Camera, ScreenCorners};
pub use chunk::{partition, render_chunk, Chunk, ChunkResult};
pub use emission::{ColoredRay, EmissionChain, Emitter};
pub use light::{Falloff, GlobalLight, LightId, LightSource, PointLight};
pub use octree::Octree;
pub use renderer::{render, render_with, ExecutionMode, Image, RenderOptions};
pub use shaders::{PixelShader, ShapeShader, StandardShader, StratifiedPixelShader};
pub use shapes::{BoundedPlane, Cube, Geometry, MeshShape, Shape, ShapeId, Sphere, Surface, SurfaceHit, TriangleShape};
pub use tracer::{trace, trace_pixel, SURFACE_BIAS};
pub use world::{ShapeHit, World};

/// Re-export math types from lumen_math
pub use lumen_math::{Aabb, Quat, Ray, Transform, UVec2, Vec2, Vec3};
