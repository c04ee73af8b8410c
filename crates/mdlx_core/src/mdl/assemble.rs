//! Scene assembly for the single-mesh formats (Quake 1, MDL2..MDL6).

use mdlx_math::Vec3;

use super::format::Subformat;
use crate::mesh::Mesh;
use crate::scene::{Material, Scene, ShadingMode, TextureSlot};
use crate::texture::EmbeddedTexture;

/// Face-expanded geometry of one mesh, three corners per triangle.
#[derive(Debug, Default)]
pub(crate) struct CornerBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
}

impl CornerBuffers {
    pub fn with_capacity(corners: usize) -> Self {
        Self {
            positions: Vec::with_capacity(corners),
            normals: Vec::with_capacity(corners),
            uvs: Vec::with_capacity(corners),
        }
    }

    pub fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
    }

    pub fn corner_count(&self) -> usize {
        self.positions.len()
    }
}

/// Index list for face-expanded corners with the winding reversed.
pub(crate) fn reversed_winding(corners: usize) -> Vec<u32> {
    (0..corners as u32 / 3)
        .flat_map(|t| [t * 3 + 2, t * 3 + 1, t * 3])
        .collect()
}

/// The one material of a single-mesh file.
fn single_mesh_material(textured: bool) -> Material {
    let mut material = Material {
        name: "MDL_Material".to_string(),
        shading: ShadingMode::Gouraud,
        diffuse_color: Vec3::ONE,
        specular_color: Vec3::ONE,
        ambient_color: Vec3::splat(0.05),
        ..Default::default()
    };
    if textured {
        material.diffuse_textures.push(TextureSlot::embedded(0));
    }
    material
}

/// Build a scene holding one mesh on the root node.
pub(crate) fn single_mesh_scene(
    name: &str,
    format: Subformat,
    corners: CornerBuffers,
    textures: Vec<EmbeddedTexture>,
) -> Scene {
    let mut scene = Scene::new(name);
    scene.source_format = format.name().to_string();

    let material = scene.add_material(single_mesh_material(!textures.is_empty()));
    for texture in textures {
        scene.add_texture(texture);
    }

    let indices = reversed_winding(corners.corner_count());
    let mut mesh = Mesh::new_with_uvs(
        corners.positions,
        indices,
        Some(corners.normals),
        Some(corners.uvs),
    )
    .with_name(name);
    mesh.material_index = material;

    let mesh = scene.add_mesh(mesh);
    let root = scene.add_node(name, None);
    scene.nodes[root].meshes.push(mesh);
    scene
}
