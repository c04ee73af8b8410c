//! Scene graph types for MDLX.
//!
//! A `Scene` owns flat lists of meshes, materials and textures plus a node
//! tree stored as an arena: nodes refer to each other and to meshes by index.

use mdlx_math::{Aabb, Mat4, Quat, Vec3};

use crate::mesh::Mesh;
use crate::texture::EmbeddedTexture;

/// Lighting model requested by a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShadingMode {
    #[default]
    Gouraud,
    Phong,
}

/// One diffuse texture layer of a material.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureSlot {
    /// File path, or `*<n>` for the n-th embedded texture of the scene
    pub path: String,

    /// UV channel this layer samples (0 = `uvs`, 1 = `uvs2`)
    pub uv_source: u32,
}

impl TextureSlot {
    pub fn new(path: impl Into<String>, uv_source: u32) -> Self {
        Self {
            path: path.into(),
            uv_source,
        }
    }

    /// Reference to an embedded texture by index.
    pub fn embedded(index: usize) -> Self {
        Self::new(format!("*{}", index), 0)
    }

    /// Index of the embedded texture, if this slot points at one.
    pub fn embedded_index(&self) -> Option<usize> {
        self.path.strip_prefix('*')?.parse().ok()
    }
}

/// A classic fixed-function material.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name
    pub name: String,

    /// Lighting model
    pub shading: ShadingMode,

    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: Vec3,

    /// Specular color (RGB, 0-1)
    pub specular_color: Vec3,

    /// Ambient color (RGB, 0-1)
    pub ambient_color: Vec3,

    /// Emissive color (RGB, for light-emitting surfaces)
    pub emissive_color: Vec3,

    /// Opacity (0=transparent, 1=opaque)
    pub opacity: f32,

    /// Specular exponent, only meaningful for Phong
    pub shininess: Option<f32>,

    /// Diffuse texture layers
    pub diffuse_textures: Vec<TextureSlot>,

    /// Index of another skin this material stands in for
    pub skin_reference: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            shading: ShadingMode::Gouraud,
            diffuse_color: Vec3::new(0.6, 0.6, 0.6),
            specular_color: Vec3::new(0.6, 0.6, 0.6),
            ambient_color: Vec3::new(0.05, 0.05, 0.05),
            emissive_color: Vec3::ZERO,
            opacity: 1.0,
            shininess: None,
            diffuse_textures: Vec::new(),
            skin_reference: None,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// Check if this material uses any textures.
    pub fn has_textures(&self) -> bool {
        !self.diffuse_textures.is_empty()
    }

    /// First diffuse texture layer.
    pub fn diffuse_texture(&self) -> Option<&TextureSlot> {
        self.diffuse_textures.first()
    }
}

/// A node of the scene hierarchy.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,

    /// Local transform relative to the parent
    pub transform: Mat4,

    /// Parent node index, `None` for the root
    pub parent: Option<usize>,

    /// Child node indices
    pub children: Vec<usize>,

    /// Indices into `Scene::meshes`
    pub meshes: Vec<usize>,
}

impl Node {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            parent,
            children: Vec::new(),
            meshes: Vec::new(),
        }
    }
}

/// Keyframe holding a vector value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorKey {
    pub time: f64,
    pub value: Vec3,
}

/// Keyframe holding a rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuatKey {
    pub time: f64,
    pub value: Quat,
}

/// Keyframes driving a single node.
#[derive(Clone, Debug, Default)]
pub struct NodeAnimation {
    /// Name of the animated node
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scale_keys: Vec<VectorKey>,
}

impl NodeAnimation {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position_keys.is_empty() && self.rotation_keys.is_empty() && self.scale_keys.is_empty()
    }

    /// Time of the last key on any track.
    pub fn end_time(&self) -> f64 {
        let positions = self.position_keys.iter().map(|k| k.time);
        let rotations = self.rotation_keys.iter().map(|k| k.time);
        let scales = self.scale_keys.iter().map(|k| k.time);
        positions.chain(rotations).chain(scales).fold(0.0, f64::max)
    }
}

/// A keyframed animation clip.
#[derive(Clone, Debug, Default)]
pub struct Animation {
    pub name: String,

    /// Length in ticks
    pub duration: f64,

    /// Playback rate; 0 means unspecified
    pub ticks_per_second: f64,

    pub channels: Vec<NodeAnimation>,
}

/// A complete imported model.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    /// Tag of the file format the scene was decoded from
    pub source_format: String,

    /// Materials used in the scene
    pub materials: Vec<Material>,

    /// Meshes; each refers to one material
    pub meshes: Vec<Mesh>,

    /// Textures embedded in the model file
    pub textures: Vec<EmbeddedTexture>,

    /// Node arena
    pub nodes: Vec<Node>,

    /// Index of the root node
    pub root: usize,

    pub animations: Vec<Animation>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a node and return its index.
    ///
    /// A node without a parent becomes the scene root.
    pub fn add_node(&mut self, name: impl Into<String>, parent: Option<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::new(name, parent));
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.root = id,
        }
        id
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> usize {
        let id = self.materials.len();
        self.materials.push(material);
        id
    }

    /// Add a mesh to the scene and return its ID.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        let id = self.meshes.len();
        self.meshes.push(mesh);
        id
    }

    /// Add an embedded texture and return its ID.
    pub fn add_texture(&mut self, texture: EmbeddedTexture) -> usize {
        let id = self.textures.len();
        self.textures.push(texture);
        id
    }

    /// Root node, if any node exists.
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(self.root)
    }

    /// Find a node by name.
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Children of a node, resolved.
    pub fn children_of(&self, node: usize) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|&c| self.nodes.get(c))
    }

    /// Get material count.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get mesh count.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Get total triangle count across all meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count()).sum()
    }

    /// Get total vertex count across all meshes.
    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    /// Bounding box of all meshes in model space.
    pub fn world_bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .filter(|m| !m.bounds.is_empty())
            .fold(Aabb::EMPTY, |acc, m| Aabb::surrounding(&acc, &m.bounds))
    }
}
