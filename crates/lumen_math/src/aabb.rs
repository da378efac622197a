use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used for mesh early-outs and the octree.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Minimum extent on every axis; flat shapes get this much thickness.
    pub const MIN_EXTENT: f32 = 0.0001;

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest box containing every point. Empty input gives [`Aabb::EMPTY`].
    pub fn from_point_cloud<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut any = false;
        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if any {
            Self::from_points(min, max)
        } else {
            Self::EMPTY
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(self.x.midpoint(), self.y.midpoint(), self.z.midpoint())
    }

    /// Slab test. Returns the `(entry, exit)` ray parameters clipped to `t >= 0`,
    /// or `None` when the ray misses the box or the box is behind the origin.
    pub fn entry_exit(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }

        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction == 0.0 {
                // Parallel to the slab: either always inside or never.
                if !slab.contains(origin) {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t0.max(t_min);
            t_max = t1.min(t_max);
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Test if a ray intersects this AABB in front of its origin.
    pub fn hit(&self, ray: &Ray) -> bool {
        self.entry_exit(ray).is_some()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }

    /// True when the two boxes share any volume (touching counts).
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    /// Grow the box by `delta` on every side.
    pub fn padded(&self, delta: f32) -> Aabb {
        Aabb::new(self.x.pad(delta), self.y.pad(delta), self.z.pad(delta))
    }

    /// One of the eight equal sub-boxes. Bit 0 of `index` selects the upper
    /// half on X, bit 1 on Y, bit 2 on Z.
    pub fn octant(&self, index: usize) -> Aabb {
        let center = self.centroid();
        let half = |interval: Interval, mid: f32, upper: bool| {
            if upper {
                Interval::new(mid, interval.max)
            } else {
                Interval::new(interval.min, mid)
            }
        };
        Aabb::new(
            half(self.x, center.x, index & 1 != 0),
            half(self.y, center.y, index & 2 != 0),
            half(self.z, center.z, index & 4 != 0),
        )
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 != 0 { hi.x } else { lo.x },
                if i & 2 != 0 { hi.y } else { lo.y },
                if i & 4 != 0 { hi.z } else { lo.z },
            )
        })
    }

    /// Pad intervals to avoid zero-width AABBs (flat planes and triangles).
    fn pad_to_minimums(&mut self) {
        let delta = Self::MIN_EXTENT;
        for interval in [&mut self.x, &mut self.y, &mut self.z] {
            if interval.size() < delta {
                *interval = interval.pad(delta * 0.5);
            }
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
