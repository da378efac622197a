//! Uniform octree over shape bounds.
//!
//! The root box is split into eight equal octants down to a fixed depth.
//! A shape is stored in every leaf its bounds overlap, so a shape spanning a
//! split plane appears in several leaves. Branches are only created along
//! paths that received a shape.
//!
//! Queries visit children in order of ray entry distance and skip any child
//! whose entry lies beyond the best hit found so far. Ties between equally
//! distant hits resolve to the lowest id, which keeps results identical to a
//! flat scan of every shape in id order.

use lumen_math::{Aabb, Ray};

use crate::shapes::SurfaceHit;

/// Slack added around node boxes so hits on split planes are never lost to
/// rounding.
const NODE_PADDING: f32 = 1e-3;

#[derive(Debug, Clone)]
enum Node {
    Leaf(Vec<usize>),
    Branch(Box<[OctreeNode; 8]>),
}

#[derive(Debug, Clone)]
struct OctreeNode {
    bounds: Aabb,
    node: Node,
}

impl OctreeNode {
    fn empty(bounds: Aabb) -> Self {
        Self {
            bounds,
            node: Node::Leaf(Vec::new()),
        }
    }

    fn padded_bounds(&self) -> Aabb {
        self.bounds.padded(NODE_PADDING)
    }

    fn insert(&mut self, id: usize, shape_bounds: &Aabb, remaining_depth: u32) {
        if remaining_depth == 0 {
            if let Node::Leaf(ids) = &mut self.node {
                ids.push(id);
            }
            return;
        }

        if matches!(&self.node, Node::Leaf(ids) if ids.is_empty()) {
            let bounds = self.bounds;
            self.node = Node::Branch(Box::new(std::array::from_fn(|i| {
                OctreeNode::empty(bounds.octant(i))
            })));
        }

        if let Node::Branch(children) = &mut self.node {
            for child in children.iter_mut() {
                if child.padded_bounds().overlaps(shape_bounds) {
                    child.insert(id, shape_bounds, remaining_depth - 1);
                }
            }
        }
    }

    fn closest_hit<F>(&self, ray: &Ray, intersect: &mut F, best: &mut Option<(usize, SurfaceHit)>)
    where
        F: FnMut(usize) -> Option<SurfaceHit>,
    {
        match &self.node {
            Node::Leaf(ids) => {
                for &id in ids {
                    if let Some(hit) = intersect(id) {
                        if is_better(id, &hit, best) {
                            *best = Some((id, hit));
                        }
                    }
                }
            }
            Node::Branch(children) => {
                let mut order: Vec<(f32, &OctreeNode)> = children
                    .iter()
                    .filter_map(|child| child.padded_bounds().entry_exit(ray).map(|(entry, _)| (entry, child)))
                    .collect();
                order.sort_by(|a, b| a.0.total_cmp(&b.0));

                for (entry, child) in order {
                    if matches!(best, Some((_, hit)) if entry > hit.t) {
                        break;
                    }
                    child.closest_hit(ray, intersect, best);
                }
            }
        }
    }

    fn leaf_count(&self) -> usize {
        match &self.node {
            Node::Leaf(_) => 1,
            Node::Branch(children) => children.iter().map(OctreeNode::leaf_count).sum(),
        }
    }
}

fn is_better(id: usize, hit: &SurfaceHit, best: &Option<(usize, SurfaceHit)>) -> bool {
    match best {
        None => true,
        Some((best_id, best_hit)) => hit.t < best_hit.t || (hit.t == best_hit.t && id < *best_id),
    }
}

/// Spatial index from shape ids to the octants they occupy.
#[derive(Debug, Clone)]
pub struct Octree {
    root: OctreeNode,
    depth: u32,
}

impl Octree {
    /// Build over `(id, bounds)` pairs. The root box is the padded union of
    /// every shape's bounds.
    pub fn build<I>(shapes: I, depth: u32) -> Self
    where
        I: IntoIterator<Item = (usize, Aabb)>,
    {
        let shapes: Vec<(usize, Aabb)> = shapes.into_iter().collect();
        let bounds = shapes
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b));
        let bounds = if bounds.is_empty() {
            bounds
        } else {
            bounds.padded(NODE_PADDING)
        };

        let mut octree = Self {
            root: OctreeNode::empty(bounds),
            depth,
        };
        for (id, shape_bounds) in &shapes {
            octree.insert(*id, shape_bounds);
        }

        log::debug!(
            "Built octree: {} shapes, depth {}, {} leaves",
            shapes.len(),
            depth,
            octree.root.leaf_count()
        );
        octree
    }

    pub fn bounds(&self) -> Aabb {
        self.root.bounds
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// True when `shape_bounds` can be inserted without growing the root.
    pub fn fits(&self, shape_bounds: &Aabb) -> bool {
        !self.root.bounds.is_empty() && self.root.bounds.contains_box(shape_bounds)
    }

    /// Insert into every overlapping leaf. Callers check [`Octree::fits`]
    /// first; parts outside the root box are not indexed.
    pub fn insert(&mut self, id: usize, shape_bounds: &Aabb) {
        self.root.insert(id, shape_bounds, self.depth);
    }

    /// Nearest hit along `ray`; `intersect` tests one shape id.
    pub fn closest_hit<F>(&self, ray: &Ray, mut intersect: F) -> Option<(usize, SurfaceHit)>
    where
        F: FnMut(usize) -> Option<SurfaceHit>,
    {
        if !self.root.padded_bounds().hit(ray) {
            return None;
        }
        let mut best = None;
        self.root.closest_hit(ray, &mut intersect, &mut best);
        best
    }
}
