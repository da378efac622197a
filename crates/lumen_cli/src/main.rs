//! `lumen` - render the demo scene to a PNG.
//!
//! Usage: `lumen [settings.json] [output.png]`
//!
//! Without a settings file the defaults from `RenderSettings` are used.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use lumen_core::{RenderSettings, RtColor};
use lumen_math::{Quat, Transform, Vec3};
use lumen_renderer::{
    render, BoundedPlane, Camera, Cube, GlobalLight, PointLight, RenderOptions, Shape, Sphere,
    StandardShader, World,
};

const DEFAULT_OUTPUT: &str = "render.png";

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => RenderSettings::from_json_file(&path)
            .with_context(|| format!("Failed to read settings from {path}"))?,
        None => RenderSettings::default(),
    };
    let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    settings.validate().context("Invalid render settings")?;
    log::info!("Settings: {settings:?}");

    let start = Instant::now();
    let world = demo_scene(&settings)?;
    log::info!("Scene built in {:?} ({} shapes)", start.elapsed(), world.shape_count());

    let image = render(&world, RenderOptions::from_settings(&settings))?;
    image
        .to_rgb_image()
        .save(&output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    log::info!("Saved {}x{} image to {}", image.width(), image.height(), output.display());
    Ok(())
}

/// Three spheres, a cube and a floor under one point light and a dim sun.
fn demo_scene(settings: &RenderSettings) -> Result<World> {
    let resolution = settings.resolution().as_vec2();
    let aspect = resolution.x / resolution.y;

    let camera = Camera::from_settings(
        Transform::facing(
            Vec3::new(0.0, 3.5, -10.0),
            Vec3::new(0.0, -0.2, 1.0),
            Vec3::new(aspect, 1.0, 1.2),
        ),
        settings,
    );
    let mut world = World::new(camera).with_octree(settings.octree_depth);

    let matte = Arc::new(StandardShader::new().with_reflectiveness(0.15));
    let mirror = Arc::new(StandardShader::new().with_reflectiveness(0.85));
    let red = Arc::new(
        StandardShader::new()
            .with_albedo(Vec3::new(0.9, 0.2, 0.2))
            .with_reflectiveness(0.3),
    );

    world.add_shape(Shape::new(
        BoundedPlane::new(
            Vec3::new(-15.0, 0.0, -15.0),
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::new(30.0, 0.0, 0.0),
        )?,
        matte,
    ));
    world.add_shapes([
        Shape::new(Sphere::new(Vec3::new(0.0, 1.5, 1.0), 1.5), mirror.clone()),
        Shape::new(Sphere::new(Vec3::new(-3.0, 1.0, 0.0), 1.0), red.clone()),
        Shape::new(Sphere::new(Vec3::new(3.0, 0.75, -1.0), 0.75), mirror),
        Shape::new(
            Cube::from_transform(&Transform::new(
                Vec3::new(2.5, 1.0, 3.0),
                Quat::from_rotation_y(0.6),
                Vec3::splat(2.0),
            )),
            red,
        ),
    ]);

    world.add_light(PointLight::new(Vec3::new(-5.0, 9.0, -5.0), RtColor::WHITE));
    world.add_light(GlobalLight::new(
        Vec3::new(-0.4, -1.0, 0.3),
        RtColor::new(25.0, 1.0, 0.95, 0.85),
    ));
    Ok(world)
}
