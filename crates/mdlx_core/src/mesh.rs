//! Mesh geometry representation for the MDLX scene graph.
//!
//! Meshes produced by the MDL importers are fully face-expanded: every
//! triangle corner owns its own vertex, so `indices` is always `0..n`.

use mdlx_math::{Aabb, Mat4, Vec3};

/// Influence of one bone on one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexWeight {
    /// Index into the mesh's vertex arrays
    pub vertex: u32,

    /// Influence, 1.0 for rigid skinning
    pub weight: f32,
}

/// A bone that deforms part of a mesh.
#[derive(Clone, Debug)]
pub struct MeshBone {
    /// Name of the skeleton node this bone drives
    pub name: String,

    /// Mesh space to bone space transform
    pub offset_matrix: Mat4,

    /// Vertices influenced by this bone
    pub weights: Vec<VertexWeight>,
}

/// A triangle mesh with one material.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Mesh name, usually the group it came from
    pub name: String,

    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional, one per vertex)
    pub normals: Option<Vec<Vec3>>,

    /// Primary UV channel (optional - one [u, v] per vertex)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Secondary UV channel, present when two skins are layered
    pub uvs2: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Index into `Scene::materials`
    pub material_index: usize,

    /// Index of the source group inside the model file
    pub group_index: usize,

    /// Bones influencing this mesh (empty for static meshes)
    pub bones: Vec<MeshBone>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            name: String::new(),
            positions,
            normals,
            uvs: None,
            uvs2: None,
            indices,
            material_index: 0,
            group_index: 0,
            bones: Vec::new(),
            bounds,
        }
    }

    /// Create a new mesh with UV coordinates.
    pub fn new_with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<[f32; 2]>>,
    ) -> Self {
        Self {
            uvs,
            ..Self::new(positions, indices, normals)
        }
    }

    /// Builder-style name setter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        Aabb::from_positions(positions)
    }

    /// Flip normals that point into the mesh.
    ///
    /// Compares the box around all `position + normal` points with the box
    /// around the positions alone. Outward normals grow the box; if it did
    /// not grow, the normals are negated. Returns true if they were.
    pub fn flip_normals_if_inward(&mut self) -> bool {
        let Some(normals) = self.normals.as_mut() else {
            return false;
        };
        if normals.len() != self.positions.len() || self.positions.is_empty() {
            return false;
        }

        let plain = Aabb::from_positions(&self.positions);
        let pushed = self
            .positions
            .iter()
            .zip(normals.iter())
            .fold(Aabb::EMPTY, |aabb, (p, n)| aabb.include_point(*p + *n));

        if pushed.volume() > plain.volume() {
            return false;
        }

        for n in normals.iter_mut() {
            *n = -*n;
        }
        log::info!("Mesh '{}': normals point inward, flipped them", self.name);
        true
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Check if the mesh has bone weights.
    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
