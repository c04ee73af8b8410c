//! MDL7 face expansion and material splitting.
//!
//! Faces are expanded to three corners each, with corner `c` of face `t`
//! stored at `3 * t + c`. Faces are then grouped by material. A face that
//! layers two skins gets a joined material carrying both textures, the
//! second one sampling the second UV channel.

use std::collections::BTreeMap;

use mdlx_math::{swap_yz, Vec3};

use super::bones::Bone;
use super::group::{GroupGeometry, GroupHeader, Vertex, VertexNormal, NO_BONE, NO_MATERIAL};
use super::header::ElementSizes;
use crate::mdl::assemble::reversed_winding;
use crate::mdl::error::clamp_index;
use crate::mdl::normals::decode_normal;
use crate::mesh::{Mesh, MeshBone, VertexWeight};
use crate::scene::{Material, TextureSlot};

/// Output normal of a main or frame vertex, `None` if it stores none.
pub(crate) fn vertex_normal(vertex: &Vertex) -> Option<Vec3> {
    match vertex.normal {
        VertexNormal::Missing => None,
        VertexNormal::Table(index) => Some(swap_yz(decode_normal(index as usize))),
        VertexNormal::Full(n) => Some(swap_yz(n).normalize_or_zero()),
    }
}

/// Face-expanded geometry of one group.
#[derive(Clone, Debug, Default)]
pub(crate) struct FaceCorners {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub uvs2: Option<Vec<[f32; 2]>>,
    /// Clamped vertex index each corner was built from
    pub source_vertices: Vec<usize>,
    /// Driving bone of each corner
    pub bones: Vec<u16>,
    /// Material indices of each face, second one `NO_MATERIAL` if unused
    pub face_materials: Vec<[u32; 2]>,
}

impl FaceCorners {
    /// Move one frame vertex onto every corner built from `vertex`.
    pub fn replace_vertex(&mut self, vertex: usize, position: Vec3, normal: Option<Vec3>) {
        for (corner, &source) in self.source_vertices.iter().enumerate() {
            if source != vertex {
                continue;
            }
            self.positions[corner] = position;
            if let (Some(normals), Some(normal)) = (self.normals.as_mut(), normal) {
                normals[corner] = normal;
            }
        }
    }
}

/// Expand the triangles of a group into corners.
pub(crate) fn expand_faces(
    group: &GroupHeader,
    geometry: &GroupGeometry,
    sizes: &ElementSizes,
) -> FaceCorners {
    let corner_count = geometry.triangles.len() * 3;
    let has_normals = sizes.mainvertex >= 16;
    let has_uvs = sizes.triangle >= 12 && !geometry.uvs.is_empty();
    let has_second = sizes.triangle >= 26 && !geometry.uvs.is_empty();

    let mut out = FaceCorners {
        positions: Vec::with_capacity(corner_count),
        normals: has_normals.then(|| Vec::with_capacity(corner_count)),
        uvs: has_uvs.then(|| Vec::with_capacity(corner_count)),
        uvs2: has_second.then(|| Vec::with_capacity(corner_count)),
        source_vertices: Vec::with_capacity(corner_count),
        bones: Vec::with_capacity(corner_count),
        face_materials: Vec::with_capacity(geometry.triangles.len()),
    };

    let uv_at = |index: u16| {
        let index = clamp_index(index as usize, geometry.uvs.len(), "MDL7 UV coord list");
        let [u, v] = geometry.uvs[index];
        (index, [u, 1.0 - v])
    };

    let mut needs_second = false;
    for triangle in &geometry.triangles {
        for c in 0..3 {
            let index = clamp_index(triangle.vertices[c] as usize, group.num_verts, "MDL7 vertex list");
            let vertex = &geometry.vertices[index];

            out.positions.push(swap_yz(vertex.position));
            out.source_vertices.push(index);
            out.bones.push(vertex.index);
            if let Some(normals) = out.normals.as_mut() {
                normals.push(vertex_normal(vertex).unwrap_or(Vec3::ZERO));
            }

            let mut first_uv = [0.0, 0.0];
            if let (Some(uvs), Some(set)) = (out.uvs.as_mut(), triangle.first) {
                first_uv = uv_at(set.uvs[c]).1;
                uvs.push(first_uv);
            }
            if let (Some(uvs2), Some(set)) = (out.uvs2.as_mut(), triangle.second) {
                let (index, uv) = uv_at(set.uvs[c]);
                if index != 0 && uv != first_uv {
                    needs_second = true;
                }
                uvs2.push(uv);
            }
        }

        let first = triangle.first.map_or(NO_MATERIAL, |s| s.material);
        let second = triangle.second.map_or(NO_MATERIAL, |s| s.material);
        if second != NO_MATERIAL && second != first {
            needs_second = true;
        }
        out.face_materials.push([first, second]);
    }

    if !needs_second {
        out.uvs2 = None;
        for materials in out.face_materials.iter_mut() {
            materials[1] = NO_MATERIAL;
        }
    }
    out
}

/// Material a face split refers to.
///
/// Skins come first in the final material list, joined materials after
/// them, so the derived ordering matches the output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum MaterialRef {
    Skin(usize),
    Joined(usize),
}

/// Materials synthesized for two-layer faces, keyed by their skin pair.
#[derive(Clone, Debug, Default)]
pub(crate) struct JoinedMaterials {
    pairs: Vec<(usize, usize)>,
    pub materials: Vec<Material>,
}

impl JoinedMaterials {
    /// Index of the joined material for `(first, second)`, created on first use.
    pub fn get_or_join(&mut self, skins: &[Material], first: usize, second: usize) -> usize {
        if let Some(existing) = self.pairs.iter().position(|&p| p == (first, second)) {
            return existing;
        }
        self.pairs.push((first, second));
        self.materials.push(join_skins(&skins[first], &skins[second]));
        self.materials.len() - 1
    }
}

/// Copy `first` and layer the diffuse texture of `second` on top.
fn join_skins(first: &Material, second: &Material) -> Material {
    let mut joined = first.clone();
    joined.skin_reference = None;
    for slot in joined.diffuse_textures.iter_mut() {
        slot.uv_source = 0;
    }
    if let Some(slot) = second.diffuse_texture() {
        joined.diffuse_textures.push(TextureSlot::new(slot.path.clone(), 1));
    }
    joined
}

/// Group the faces of a group by material, skins first.
///
/// `skins` must not be empty.
pub(crate) fn split_by_material(
    corners: &FaceCorners,
    skins: &[Material],
    joined: &mut JoinedMaterials,
) -> BTreeMap<MaterialRef, Vec<usize>> {
    let count = skins.len();
    let mut splits: BTreeMap<MaterialRef, Vec<usize>> = BTreeMap::new();

    for (face, &[first, second]) in corners.face_materials.iter().enumerate() {
        let first = clamp_material(first, count);
        let target = if second == NO_MATERIAL {
            MaterialRef::Skin(first)
        } else {
            let second = clamp_material(second, count);
            if second == first {
                MaterialRef::Skin(first)
            } else {
                MaterialRef::Joined(joined.get_or_join(skins, first, second))
            }
        };
        splits.entry(target).or_default().push(face);
    }
    splits
}

/// Clamp a material index. MED writes -1 for faces of single skin models,
/// which falls back to the last material without a warning.
fn clamp_material(index: u32, count: usize) -> usize {
    if index == NO_MATERIAL {
        return count.saturating_sub(1);
    }
    clamp_index(index as usize, count, "MDL7 material list")
}

/// Build the mesh holding `faces` of a group.
pub(crate) fn build_mesh(
    name: &str,
    group_index: usize,
    corners: &FaceCorners,
    faces: &[usize],
    bones: &[Bone],
) -> Mesh {
    let pick = |data: &[Vec3]| -> Vec<Vec3> {
        faces.iter().flat_map(|&f| data[f * 3..f * 3 + 3].iter().copied()).collect()
    };
    let pick_uv = |data: &[[f32; 2]]| -> Vec<[f32; 2]> {
        faces.iter().flat_map(|&f| data[f * 3..f * 3 + 3].iter().copied()).collect()
    };

    let positions = pick(&corners.positions);
    let indices = reversed_winding(positions.len());
    let normals = corners.normals.as_deref().map(pick);

    let mut mesh = Mesh::new_with_uvs(positions, indices, normals, corners.uvs.as_deref().map(pick_uv))
        .with_name(name);
    mesh.uvs2 = corners.uvs2.as_deref().map(pick_uv);
    mesh.group_index = group_index;

    if !bones.is_empty() {
        let corner_bones = faces.iter().flat_map(|&f| corners.bones[f * 3..f * 3 + 3].iter().copied());
        mesh.bones = assign_weights(corner_bones, bones);
    }
    mesh
}

/// Rigid skinning: every vertex is fully driven by its one bone.
fn assign_weights(corner_bones: impl Iterator<Item = u16>, bones: &[Bone]) -> Vec<MeshBone> {
    let mut weights: Vec<Vec<VertexWeight>> = vec![Vec::new(); bones.len()];
    for (vertex, bone) in corner_bones.enumerate() {
        if bone == NO_BONE {
            continue;
        }
        let mut bone = bone as usize;
        if bone >= bones.len() {
            log::error!("Index overflow in MDL7 bone list ({} >= {})", bone, bones.len());
            bone = bones.len() - 1;
        }
        weights[bone].push(VertexWeight {
            vertex: vertex as u32,
            weight: 1.0,
        });
    }

    weights
        .into_iter()
        .zip(bones)
        .filter(|(w, _)| !w.is_empty())
        .map(|(weights, bone)| MeshBone {
            name: bone.name.clone(),
            offset_matrix: bone.offset_matrix(),
            weights,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdl::mdl7::group::{SkinSet, Triangle};
    use crate::mdl::mdl7::header::{BONETRANS_SIZE, FRAME_SIZE};
    use crate::scene::ShadingMode;

    fn sizes(triangle: usize) -> ElementSizes {
        ElementSizes {
            bone: 36,
            skin: 28,
            colorvalue: 16,
            material: 68,
            skinpoint: 8,
            triangle,
            mainvertex: 16,
            framevertex: 16,
            bonetrans: BONETRANS_SIZE,
            frame: FRAME_SIZE,
        }
    }

    fn vertex(x: f32, bone: u16) -> Vertex {
        Vertex {
            position: Vec3::new(x, 0.0, 1.0),
            index: bone,
            normal: VertexNormal::Table(5),
        }
    }

    fn triangle(vertices: [u16; 3], first: u32, second: u32) -> Triangle {
        Triangle {
            vertices,
            first: Some(SkinSet {
                uvs: [0, 1, 2],
                material: first,
            }),
            second: Some(SkinSet {
                uvs: [0, 1, 2],
                material: second,
            }),
        }
    }

    fn group(num_verts: usize, num_tris: usize) -> GroupHeader {
        GroupHeader {
            name: "g".to_string(),
            num_skins: 0,
            num_uvs: 3,
            num_tris,
            num_verts,
            num_frames: 0,
        }
    }

    fn geometry(triangles: Vec<Triangle>) -> GroupGeometry {
        GroupGeometry {
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            triangles,
            vertices: vec![vertex(0.0, 0), vertex(1.0, 1), vertex(2.0, NO_BONE)],
        }
    }

    fn skin(name: &str, texture: Option<&str>) -> Material {
        let mut material = Material::new(name, Vec3::ONE);
        if let Some(path) = texture {
            material.diffuse_textures.push(TextureSlot::new(path, 0));
        }
        material
    }

    #[test]
    fn test_expand_single_layer() {
        let geometry = geometry(vec![triangle([0, 1, 2], 0, NO_MATERIAL)]);
        let corners = expand_faces(&group(3, 1), &geometry, &sizes(26));

        assert_eq!(corners.positions.len(), 3);
        // Z up file position (x, 0, 1) becomes (x, 1, 0)
        assert_eq!(corners.positions[1], Vec3::new(1.0, 1.0, 0.0));
        assert!((corners.normals.as_ref().unwrap()[0] - Vec3::Y).length() < 0.0001);
        // V is flipped
        assert_eq!(corners.uvs.as_ref().unwrap()[2], [1.0, 0.0]);
        assert!(corners.uvs2.is_none());
        assert_eq!(corners.bones, vec![0, 1, NO_BONE]);
    }

    #[test]
    fn test_vertex_index_clamped() {
        let geometry = geometry(vec![triangle([0, 1, 9], 0, NO_MATERIAL)]);
        let corners = expand_faces(&group(3, 1), &geometry, &sizes(26));
        assert_eq!(corners.source_vertices, vec![0, 1, 2]);
    }

    #[test]
    fn test_no_uvs_without_channel() {
        let geometry = geometry(vec![triangle([0, 1, 2], 0, NO_MATERIAL)]);
        let corners = expand_faces(&group(3, 1), &geometry, &sizes(6));
        assert!(corners.uvs.is_none());
        assert!(corners.uvs2.is_none());
    }

    #[test]
    fn test_material_index_clamped_to_last() {
        let geometry = geometry(vec![triangle([0, 1, 2], 5, NO_MATERIAL)]);
        let corners = expand_faces(&group(3, 1), &geometry, &sizes(26));
        let skins = vec![skin("a", None), skin("b", None), skin("c", None)];

        let mut joined = JoinedMaterials::default();
        let splits = split_by_material(&corners, &skins, &mut joined);
        assert_eq!(splits.get(&MaterialRef::Skin(2)), Some(&vec![0]));
        assert!(joined.materials.is_empty());
    }

    #[test]
    fn test_joined_material_reused() {
        let geometry = geometry(vec![
            triangle([0, 1, 2], 0, 1),
            triangle([2, 1, 0], 1, 1),
            triangle([1, 2, 0], 0, 1),
        ]);
        let corners = expand_faces(&group(3, 3), &geometry, &sizes(26));
        assert!(corners.uvs2.is_some());

        let mut base = skin("base", Some("base.png"));
        base.shading = ShadingMode::Phong;
        base.diffuse_color = Vec3::new(0.8, 0.2, 0.1);
        base.specular_color = Vec3::new(0.3, 0.3, 0.3);
        base.ambient_color = Vec3::new(0.2, 0.1, 0.0);
        base.opacity = 0.5;
        base.shininess = Some(12.0);
        let skins = vec![base, skin("detail", Some("detail.png"))];
        let mut joined = JoinedMaterials::default();
        let splits = split_by_material(&corners, &skins, &mut joined);

        assert_eq!(joined.materials.len(), 1);
        assert_eq!(splits.get(&MaterialRef::Joined(0)), Some(&vec![0, 2]));
        assert_eq!(splits.get(&MaterialRef::Skin(1)), Some(&vec![1]));

        let material = &joined.materials[0];
        assert_eq!(material.name, "base");
        assert_eq!(material.shading, ShadingMode::Phong);
        assert_eq!(material.diffuse_color, skins[0].diffuse_color);
        assert_eq!(material.specular_color, skins[0].specular_color);
        assert_eq!(material.ambient_color, skins[0].ambient_color);
        assert_eq!(material.opacity, 0.5);
        assert_eq!(material.shininess, Some(12.0));
        assert_eq!(material.diffuse_textures[0], TextureSlot::new("base.png", 0));
        assert_eq!(material.diffuse_textures[1], TextureSlot::new("detail.png", 1));
    }

    #[test]
    fn test_mesh_and_weights() {
        let geometry = geometry(vec![triangle([0, 1, 2], 0, NO_MATERIAL), triangle([2, 1, 0], 0, NO_MATERIAL)]);
        let corners = expand_faces(&group(3, 2), &geometry, &sizes(26));
        let bones = vec![
            Bone {
                name: "root".to_string(),
                parent: None,
                position: Vec3::ZERO,
                offset: Vec3::ZERO,
            },
            Bone {
                name: "arm".to_string(),
                parent: Some(0),
                position: Vec3::X,
                offset: -Vec3::X,
            },
        ];

        let mesh = build_mesh("g", 4, &corners, &[1], &bones);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![2, 1, 0]);
        assert_eq!(mesh.group_index, 4);
        assert_eq!(mesh.positions[0], Vec3::new(2.0, 1.0, 0.0));

        // Face 1 corners use bones NO_BONE, 1, 0
        assert_eq!(mesh.bones.len(), 2);
        assert_eq!(mesh.bones[0].name, "root");
        assert_eq!(mesh.bones[0].weights, vec![VertexWeight { vertex: 2, weight: 1.0 }]);
        assert_eq!(mesh.bones[1].weights[0].vertex, 1);
    }

    #[test]
    fn test_bone_overflow_clamped() {
        let bones = vec![Bone {
            name: "only".to_string(),
            parent: None,
            position: Vec3::ZERO,
            offset: Vec3::ZERO,
        }];
        let assigned = assign_weights([0u16, 3, NO_BONE].into_iter(), &bones);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].weights.len(), 2);
    }

    #[test]
    fn test_replace_vertex() {
        let geometry = geometry(vec![triangle([0, 1, 2], 0, NO_MATERIAL), triangle([2, 1, 0], 0, NO_MATERIAL)]);
        let mut corners = expand_faces(&group(3, 2), &geometry, &sizes(26));
        corners.replace_vertex(2, Vec3::splat(7.0), None);
        assert_eq!(corners.positions[2], Vec3::splat(7.0));
        assert_eq!(corners.positions[3], Vec3::splat(7.0));
        assert_eq!(corners.positions[0], Vec3::new(0.0, 1.0, 0.0));
    }
}
