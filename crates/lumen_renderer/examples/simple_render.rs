//! Simple ray tracer example.
//!
//! Renders a reflective sphere, a cube and a small triangle mesh over a
//! floor, then saves the result as a PNG.

use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_core::{MeshData, RtColor};
use lumen_renderer::{
    render, BoundedPlane, Camera, Cube, ExecutionMode, GlobalLight, MeshShape, PointLight, Quat,
    RenderOptions, Shape, Sphere, StandardShader, StratifiedPixelShader, Transform, UVec2, Vec3,
    World,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = std::time::Instant::now();
    let world = build_scene()?;
    log::info!("Scene built in {:?}", start.elapsed());

    let image = render(&world, RenderOptions::new(UVec2::new(8, 5), ExecutionMode::Concurrent))?;

    let filename = "simple_render.png";
    image
        .to_rgb_image()
        .save(filename)
        .with_context(|| format!("Failed to save {filename}"))?;
    log::info!("Saved to {filename}");
    Ok(())
}

fn build_scene() -> Result<World> {
    let camera = Camera::new(
        Transform::facing(
            Vec3::new(0.0, 4.0, -12.0),
            Vec3::new(0.0, -0.25, 1.0),
            Vec3::new(1.6, 1.0, 1.2),
        ),
        UVec2::new(800, 500),
    )
    .with_pixel_shader(Arc::new(StratifiedPixelShader::new(UVec2::new(2, 2))))
    .with_bounce_limit(3)
    .with_background(RtColor::new(60.0, 0.5, 0.7, 1.0));

    let mut world = World::new(camera).with_octree(3);

    let floor = Arc::new(StandardShader::new().with_reflectiveness(0.2));
    let mirror = Arc::new(StandardShader::new().with_reflectiveness(0.9));
    let clay = Arc::new(
        StandardShader::new()
            .with_albedo(Vec3::new(0.9, 0.4, 0.2))
            .with_reflectiveness(0.1),
    );

    world.add_shape(Shape::new(
        BoundedPlane::new(
            Vec3::new(-20.0, 0.0, -20.0),
            Vec3::new(0.0, 0.0, 40.0),
            Vec3::new(40.0, 0.0, 0.0),
        )?,
        floor,
    ));
    world.add_shape(Shape::new(Sphere::new(Vec3::new(0.0, 1.5, 0.0), 1.5), mirror));
    world.add_shape(Shape::new(
        Cube::from_transform(&Transform::new(
            Vec3::new(-3.5, 1.0, 1.0),
            Quat::from_rotation_y(0.5),
            Vec3::splat(2.0),
        )),
        clay.clone(),
    ));

    // Square pyramid
    let pyramid = MeshData::new(
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(0.0, 2.0, 0.0),
        ],
        vec![0, 4, 1, 1, 4, 2, 2, 4, 3, 3, 4, 0],
    )?;
    world.add_shape(Shape::new(
        MeshShape::new(pyramid, Transform::from_position(Vec3::new(3.5, 0.0, 1.0))),
        clay,
    ));

    world.add_light(PointLight::new(Vec3::new(-4.0, 8.0, -6.0), RtColor::WHITE));
    world.add_light(GlobalLight::new(
        Vec3::new(0.3, -1.0, 0.5),
        RtColor::new(40.0, 1.0, 0.95, 0.8),
    ));

    log::info!("Created {} shapes", world.shape_count());
    Ok(world)
}
