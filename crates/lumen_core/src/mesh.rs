//! Triangle mesh input data.
//!
//! Loaders hand the renderer flat arrays: vertex positions, triangle index
//! triples and, optionally, separately indexed normals and UVs. `MeshData`
//! validates those arrays once so the renderer can index them freely.

use glam::{Vec2, Vec3};
use lumen_math::Aabb;

use crate::error::{SceneError, SceneResult};

/// Validated mesh arrays.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
    normal_indices: Vec<u32>,
    uvs: Vec<Vec2>,
    uv_indices: Vec<u32>,
}

/// One triangle's worth of resolved mesh data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    /// Per-vertex normals, absent when the mesh has none for this face.
    pub normals: Option<[Vec3; 3]>,
    pub uvs: Option<[Vec2; 3]>,
}

fn check_indices(what: &'static str, indices: &[u32], len: usize) -> SceneResult<()> {
    if indices.len() % 3 != 0 {
        return Err(SceneError::InvalidIndexCount {
            what,
            len: indices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= len) {
        return Err(SceneError::IndexOutOfBounds { what, index, len });
    }
    Ok(())
}

impl MeshData {
    /// Create mesh data from positions and triangle index triples.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> SceneResult<Self> {
        check_indices("Triangle", &indices, positions.len())?;
        Ok(Self {
            positions,
            indices,
            ..Default::default()
        })
    }

    /// Attach per-vertex normals, indexed separately from positions.
    pub fn with_normals(mut self, normals: Vec<Vec3>, normal_indices: Vec<u32>) -> SceneResult<Self> {
        check_indices("Normal", &normal_indices, normals.len())?;
        self.check_matches("Normal", &normal_indices)?;
        self.normals = normals;
        self.normal_indices = normal_indices;
        Ok(self)
    }

    /// Attach UV coordinates, indexed separately from positions.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>, uv_indices: Vec<u32>) -> SceneResult<Self> {
        check_indices("UV", &uv_indices, uvs.len())?;
        self.check_matches("UV", &uv_indices)?;
        self.uvs = uvs;
        self.uv_indices = uv_indices;
        Ok(self)
    }

    fn check_matches(&self, what: &'static str, indices: &[u32]) -> SceneResult<()> {
        if indices.len() != self.indices.len() {
            return Err(SceneError::MismatchedIndexCount {
                what,
                len: indices.len(),
                expected: self.indices.len(),
            });
        }
        Ok(())
    }

    /// Compute smooth normals by averaging the face normals around each vertex.
    ///
    /// Replaces any attached normals; normal indices mirror the position indices.
    pub fn with_smooth_normals(mut self) -> Self {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for face in self.indices.chunks_exact(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|i| i as usize);
            let face_normal = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normal_indices = self.indices.clone();
        self.normals = normals;
        self
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn has_normals(&self) -> bool {
        !self.normal_indices.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uv_indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of every vertex, in mesh space.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_point_cloud(self.positions.iter().copied())
    }

    /// Resolve triangle `i`.
    ///
    /// A face whose three normal indices are identical has no custom
    /// normals; the renderer falls back to the face normal.
    pub fn triangle(&self, i: usize) -> MeshTriangle {
        let base = i * 3;
        let gather = |indices: &[u32]| [indices[base], indices[base + 1], indices[base + 2]];

        let positions = gather(&self.indices).map(|v| self.positions[v as usize]);

        let normals = self.has_normals().then(|| gather(&self.normal_indices)).and_then(|n| {
            if n[0] == n[1] && n[1] == n[2] {
                None
            } else {
                Some(n.map(|v| self.normals[v as usize]))
            }
        });

        let uvs = self
            .has_uvs()
            .then(|| gather(&self.uv_indices).map(|v| self.uvs[v as usize]));

        MeshTriangle {
            positions,
            normals,
            uvs,
        }
    }

    /// All triangles in index order.
    pub fn triangles(&self) -> impl Iterator<Item = MeshTriangle> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }
}
