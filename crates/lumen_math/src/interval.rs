/// A closed range of `f32` values, used for ray parameters and box extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if the two intervals share at least one value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Widens the interval by `delta` on each side.
    pub fn pad(&self, delta: f32) -> Interval {
        Interval::new(self.min - delta, self.max + delta)
    }

    /// Smallest interval containing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
