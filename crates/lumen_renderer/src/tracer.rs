//! Recursive Whitted-style tracing.
//!
//! [`trace`] follows one ray into the world and returns the emission tree
//! describing how light reached its origin. A branch ends when the ray
//! escapes (background), or when the bounce budget is spent, in which case
//! the hit is shaded from direct light alone.

use lumen_core::DisplayColor;
use lumen_math::{Ray, UVec2};

use crate::emission::{ColoredRay, EmissionChain, Emitter};
use crate::shaders::face_forward;
use crate::shapes::Surface;
use crate::World;

/// Distance a hit point is pushed off its surface before secondary rays
/// leave it, so they cannot re-hit the same surface.
pub const SURFACE_BIAS: f32 = 1e-4;

/// Trace `ray` with at most `bounces` further reflections.
pub fn trace(world: &World, ray: &Ray, bounces: u32) -> EmissionChain {
    let found = world
        .closest_shape_hit(ray)
        .and_then(|found| Some((found, world.shape(found.id)?)));

    let Some((found, shape)) = found else {
        let background = world.camera().background();
        return EmissionChain::leaf(
            Emitter::Background,
            ColoredRay::from_infinity(ray.origin, -ray.direction, background),
        );
    };

    let hit = found.hit;
    let offset_normal = face_forward(shape.normal(&hit), -ray.direction);
    let origin = hit.point + offset_normal * SURFACE_BIAS;

    let mut parents = Vec::new();
    if bounces > 0 {
        for direction in shape.shader.outgoing_rays(shape, &hit, ray) {
            parents.push(trace(world, &Ray::new(origin, direction), bounces - 1));
        }
    }
    for (id, light) in world.lights() {
        parents.push(EmissionChain::leaf(
            Emitter::Light(id),
            light.reaching_ray(world, origin),
        ));
    }

    let color = shape.shader.bounce_color(shape, &hit, &parents, -ray.direction);
    let outgoing = ColoredRay::new(hit.point, ray.origin, color);
    let arriving = shape.shader.destination_color(color, outgoing.distance());

    EmissionChain::new(
        Emitter::Shape(found.id),
        outgoing.with_destination_color(arriving),
        parents,
    )
}

/// Run the camera's pixel shader end to end for one pixel.
///
/// Panics if `pixel` lies outside the camera resolution.
pub fn trace_pixel(world: &World, pixel: UVec2) -> DisplayColor {
    let camera = world.camera();
    let shader = camera.pixel_shader();

    let samples: Vec<EmissionChain> = shader
        .emitted_rays(camera, pixel)
        .iter()
        .map(|ray| trace(world, ray, camera.bounce_limit()))
        .collect();
    shader.final_pixel_color(camera, pixel, &samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::{split_contributions, StandardShader};
    use crate::shapes::{BoundedPlane, Shape, Sphere};
    use crate::{Camera, PointLight};
    use lumen_core::RtColor;
    use lumen_math::{Transform, Vec3};
    use std::sync::Arc;

    /// A mirror sphere over a reflective floor, lit from above.
    fn scene(bounce_limit: u32) -> World {
        let camera = Camera::new(
            Transform::facing(Vec3::new(0.0, 4.0, -10.0), Vec3::new(0.0, -0.3, 1.0), Vec3::new(2.0, 2.0, 2.0)),
            UVec2::new(16, 16),
        )
        .with_bounce_limit(bounce_limit)
        .with_background(RtColor::new(100.0, 0.2, 0.3, 0.9));

        let mut world = World::new(camera);
        let shiny = Arc::new(StandardShader::new().with_reflectiveness(0.6));
        world.add_shape(Shape::new(
            BoundedPlane::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 20.0), Vec3::new(20.0, 0.0, 0.0))
                .unwrap(),
            shiny.clone(),
        ));
        world.add_shape(Shape::new(Sphere::new(Vec3::new(0.0, 1.5, 0.0), 1.5), shiny));
        world.add_light(PointLight::new(Vec3::new(-6.0, 8.0, -6.0), RtColor::WHITE));
        world
    }

    fn floor_ray() -> Ray {
        Ray::towards(Vec3::new(-2.0, 3.0, -6.0), Vec3::new(-1.5, 0.0, -1.0))
    }

    #[test]
    fn test_miss_returns_background() {
        let world = scene(2);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        let chain = trace(&world, &ray, 2);

        assert_eq!(chain.emitter, Emitter::Background);
        assert!(chain.parents.is_empty());
        assert_eq!(chain.color(), world.camera().background());
        assert_eq!(chain.ray.point_of_contact, ray.origin);
        assert_eq!(chain.ray.direction, -Vec3::Y);
        assert_eq!(chain.ray.distance(), f32::INFINITY);
    }

    #[test]
    fn test_hit_node_points_back_at_origin() {
        let world = scene(1);
        let ray = floor_ray();
        let chain = trace(&world, &ray, 1);

        assert!(matches!(chain.emitter, Emitter::Shape(_)));
        assert_eq!(chain.ray.point_of_contact, ray.origin);
        assert!((chain.ray.direction + ray.direction).length() < 1e-4);
        // One reflection plus one light
        assert_eq!(chain.parents.len(), 2);
        assert_eq!(chain.light_parents().count(), 1);
    }

    #[test]
    fn test_tracing_is_repeatable() {
        let world = scene(3);
        let ray = floor_ray();
        assert_eq!(trace(&world, &ray, 3), trace(&world, &ray, 3));
        for y in 0..16 {
            for x in 0..16 {
                let pixel = UVec2::new(x, y);
                assert_eq!(trace_pixel(&world, pixel), trace_pixel(&world, pixel));
            }
        }
    }

    #[test]
    fn test_zero_bounces_uses_direct_light_only() {
        let world = scene(0);
        let chain = trace(&world, &floor_ray(), 0);
        assert!(!chain.parents.is_empty());
        assert!(chain.parents.iter().all(EmissionChain::is_light));
        assert!(chain.depth() <= 2);
    }

    #[test]
    fn test_bounces_never_change_direct_term() {
        let world = scene(0);
        let ray = floor_ray();
        let normal = Vec3::Y;

        let (direct, reflected) = split_contributions(normal, &trace(&world, &ray, 0).parents);
        assert!(direct.intensity > 0.0);
        assert_eq!(reflected.intensity, 0.0);

        for bounces in 1..4 {
            let chain = trace(&world, &ray, bounces);
            let (light, _) = split_contributions(normal, &chain.parents);
            assert_eq!(light, direct, "direct term changed at {bounces} bounces");
            assert!(chain.depth() <= bounces as usize + 2);
        }
    }

    #[test]
    fn test_secondary_rays_start_off_the_surface() {
        let world = scene(1);
        let chain = trace(&world, &floor_ray(), 1);
        let reflection = chain
            .parents
            .iter()
            .find(|p| !p.is_light())
            .unwrap();
        // The reflected light arrives at the biased point above the floor.
        assert!(reflection.ray.point_of_contact.y > 0.0);
        assert!(reflection.ray.point_of_contact.y <= 2.0 * SURFACE_BIAS);
    }
}
