//! The scene container.
//!
//! A `World` owns its shapes, lights and camera. Ids are slot indices and
//! stay valid after other shapes or lights are removed. Nearest-hit queries
//! use a flat scan, or the octree when a subdivision depth is set.

use lumen_math::{Aabb, Ray};

use crate::light::{LightId, LightSource};
use crate::octree::Octree;
use crate::shapes::{Shape, ShapeId, Surface, SurfaceHit};
use crate::Camera;

/// A ray's nearest hit and which shape it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    pub id: ShapeId,
    pub hit: SurfaceHit,
}

#[derive(Debug, Clone)]
pub struct World {
    shapes: Vec<Option<Shape>>,
    lights: Vec<Option<LightSource>>,
    camera: Camera,
    octree: Option<Octree>,
    subdivision_depth: u32,
}

impl World {
    pub fn new(camera: Camera) -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            camera,
            octree: None,
            subdivision_depth: 0,
        }
    }

    /// Use an octree of the given depth for hit queries.
    pub fn with_octree(mut self, depth: u32) -> Self {
        self.set_subdivision_depth(depth);
        self
    }

    /// Change the octree depth; 0 switches back to a flat scan.
    pub fn set_subdivision_depth(&mut self, depth: u32) {
        self.subdivision_depth = depth;
        self.rebuild_octree();
    }

    pub fn subdivision_depth(&self) -> u32 {
        self.subdivision_depth
    }

    pub fn octree(&self) -> Option<&Octree> {
        self.octree.as_ref()
    }

    fn rebuild_octree(&mut self) {
        self.octree = (self.subdivision_depth > 0).then(|| {
            Octree::build(
                self.shapes().map(|(id, shape)| (id.0, shape.bounds())),
                self.subdivision_depth,
            )
        });
    }

    /// Add a shape. It goes into the existing octree when it fits inside
    /// the current root bounds; otherwise the octree is rebuilt around it.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId(self.shapes.len());
        let bounds = shape.bounds();
        self.shapes.push(Some(shape));

        let fits = match &self.octree {
            Some(octree) => octree.fits(&bounds),
            None => return id,
        };
        if fits {
            if let Some(octree) = &mut self.octree {
                octree.insert(id.0, &bounds);
            }
        } else {
            self.rebuild_octree();
        }
        id
    }

    pub fn add_shapes<I: IntoIterator<Item = Shape>>(&mut self, shapes: I) -> Vec<ShapeId> {
        shapes.into_iter().map(|shape| self.add_shape(shape)).collect()
    }

    /// Remove a shape and rebuild the octree. Other ids are unaffected.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.shapes.get_mut(id.0)?.take();
        if removed.is_some() && self.octree.is_some() {
            self.rebuild_octree();
        }
        removed
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)?.as_ref()
    }

    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|shape| (ShapeId(i), shape)))
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.iter().flatten().count()
    }

    pub fn add_light(&mut self, light: impl Into<LightSource>) -> LightId {
        self.lights.push(Some(light.into()));
        LightId(self.lights.len() - 1)
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<LightSource> {
        self.lights.get_mut(id.0)?.take()
    }

    pub fn light(&self, id: LightId) -> Option<&LightSource> {
        self.lights.get(id.0)?.as_ref()
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightId, &LightSource)> {
        self.lights
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|light| (LightId(i), light)))
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Union of every shape's bounds.
    pub fn bounds(&self) -> Aabb {
        self.shapes()
            .fold(Aabb::EMPTY, |acc, (_, shape)| Aabb::surrounding(&acc, &shape.bounds()))
    }

    /// Nearest shape hit in front of the ray origin.
    ///
    /// Equally distant hits resolve to the lowest id in both query modes.
    pub fn closest_shape_hit(&self, ray: &Ray) -> Option<ShapeHit> {
        match &self.octree {
            Some(octree) => octree
                .closest_hit(ray, |i| self.shape(ShapeId(i))?.intersect(ray))
                .map(|(i, hit)| ShapeHit { id: ShapeId(i), hit }),
            None => self.closest_shape_hit_flat(ray),
        }
    }

    fn closest_shape_hit_flat(&self, ray: &Ray) -> Option<ShapeHit> {
        let mut best: Option<ShapeHit> = None;
        for (id, shape) in self.shapes() {
            if let Some(hit) = shape.intersect(ray) {
                if best.map_or(true, |b| hit.t < b.hit.t) {
                    best = Some(ShapeHit { id, hit });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::StandardShader;
    use crate::shapes::{BoundedPlane, Cube, Sphere, TriangleShape};
    use lumen_math::{Transform, UVec2, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn camera() -> Camera {
        Camera::new(Transform::IDENTITY, UVec2::new(8, 8))
    }

    fn shape(geometry: impl Into<crate::shapes::Geometry>) -> Shape {
        Shape::new(geometry, Arc::new(StandardShader::new()))
    }

    fn cluttered_world() -> World {
        let mut world = World::new(camera());
        world.add_shape(shape(
            BoundedPlane::new(Vec3::new(-20.0, 0.0, -20.0), Vec3::new(0.0, 0.0, 40.0), Vec3::new(40.0, 0.0, 0.0))
                .unwrap(),
        ));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..30 {
            let center = Vec3::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(0.5..8.0),
                rng.gen_range(-15.0..15.0),
            );
            world.add_shape(shape(Sphere::new(center, rng.gen_range(0.3..2.0))));
        }
        world.add_shape(shape(Cube::axis_aligned(Vec3::new(2.0, 0.0, 2.0), Vec3::splat(3.0))));
        world.add_shape(shape(TriangleShape::new(
            Vec3::new(-5.0, 0.0, 5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(0.0, 8.0, 5.0),
        )));
        world
    }

    #[test]
    fn test_flat_and_octree_agree_single_sphere() {
        let mut world = World::new(camera());
        world.add_shape(shape(Sphere::new(Vec3::ZERO, 1.0)));
        let ray = Ray::towards(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

        for depth in 0..4 {
            world.set_subdivision_depth(depth);
            let hit = world.closest_shape_hit(&ray).unwrap();
            assert_eq!(hit.id, ShapeId(0));
            assert!((hit.hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_flat_and_octree_agree_tiny_sphere() {
        let mut world = World::new(camera());
        let id = world.add_shape(shape(Sphere::new(Vec3::ZERO, 0.001)));
        let near_miss = Ray::new(Vec3::new(0.00316, 0.0, 5.0), -Vec3::Z);
        let hit_ray = Ray::new(Vec3::new(0.0005, 0.0, 0.01), -Vec3::Z);

        for depth in 0..4 {
            world.set_subdivision_depth(depth);
            assert_eq!(world.closest_shape_hit(&near_miss), None, "depth {depth}");

            let hit = world.closest_shape_hit(&hit_ray).unwrap();
            assert_eq!(hit.id, id);
            assert!((hit.hit.point.length() - 0.001).abs() < 1e-6);
        }
    }

    #[test]
    fn test_flat_and_octree_agree_random_rays() {
        let flat = cluttered_world();
        let mut rng = StdRng::seed_from_u64(99);
        let rays: Vec<Ray> = (0..500)
            .map(|_| {
                let origin = Vec3::new(
                    rng.gen_range(-30.0..30.0),
                    rng.gen_range(1.0..30.0),
                    rng.gen_range(-30.0..30.0),
                );
                let target = Vec3::new(
                    rng.gen_range(-15.0..15.0),
                    rng.gen_range(0.0..8.0),
                    rng.gen_range(-15.0..15.0),
                );
                Ray::towards(origin, target)
            })
            .collect();

        for depth in 1..=4 {
            let indexed = cluttered_world().with_octree(depth);
            for ray in &rays {
                let a = flat.closest_shape_hit(ray);
                let b = indexed.closest_shape_hit(ray);
                assert_eq!(a, b, "depth {depth} disagrees for {ray:?}");
            }
        }
    }

    #[test]
    fn test_add_shape_outside_bounds_rebuilds() {
        let mut world = World::new(camera()).with_octree(3);
        world.add_shape(shape(Sphere::new(Vec3::ZERO, 1.0)));
        let far = world.add_shape(shape(Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0)));

        assert!(world.octree().unwrap().fits(&world.shape(far).unwrap().bounds()));

        let ray = Ray::new(Vec3::new(100.0, 0.0, 10.0), -Vec3::Z);
        assert_eq!(world.closest_shape_hit(&ray).unwrap().id, far);
    }

    #[test]
    fn test_remove_shape_keeps_ids() {
        let mut world = World::new(camera()).with_octree(2);
        let near = world.add_shape(shape(Sphere::new(Vec3::new(0.0, 0.0, 2.0), 0.5)));
        let far = world.add_shape(shape(Sphere::new(Vec3::ZERO, 0.5)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);

        assert_eq!(world.closest_shape_hit(&ray).unwrap().id, near);
        assert!(world.remove_shape(near).is_some());
        assert!(world.remove_shape(near).is_none());
        assert_eq!(world.shape_count(), 1);
        assert_eq!(world.closest_shape_hit(&ray).unwrap().id, far);
    }

    #[test]
    fn test_lights() {
        let mut world = World::new(camera());
        let a = world.add_light(crate::PointLight::new(Vec3::Y, lumen_core::RtColor::WHITE));
        let b = world.add_light(crate::GlobalLight::new(-Vec3::Y, lumen_core::RtColor::WHITE));

        assert_eq!(world.lights().count(), 2);
        world.remove_light(a);
        let remaining: Vec<LightId> = world.lights().map(|(id, _)| id).collect();
        assert_eq!(remaining, vec![b]);
    }
}
