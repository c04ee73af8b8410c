//! 3D GameStudio A7 `MDL7` decoder.
//!
//! File layout:
//!
//! ```text
//! header | bones | group 0 | group 1 | ...
//! group:   header | skins | uvs | triangles | vertices | frames
//! ```
//!
//! Skins accumulate across groups into one material list. Each group
//! becomes a node with one mesh per material it uses. Bone transforms
//! stored in the frames of group 0 become a single animation clip.

mod assemble;
mod bones;
mod faces;
mod frames;
mod group;
mod header;
mod skins;

use assemble::{assemble_scene, GroupMeshes, Mdl7Parts};
use bones::read_bones;
use faces::{build_mesh, expand_faces, split_by_material, FaceCorners, JoinedMaterials};
use frames::{read_frames, FrameArea, FrameContext};
use group::{GroupGeometry, GroupHeader};
use header::Mdl7Header;
use skins::read_skin;

use super::config::ImportConfig;
use super::cursor::Cursor;
use super::error::MdlResult;
use crate::scene::{Material, NodeAnimation, Scene};

pub(crate) fn read_mdl7(data: &[u8], name: &str, config: &ImportConfig) -> MdlResult<Scene> {
    let mut cursor = Cursor::new(data);
    let header = Mdl7Header::read(&mut cursor)?;
    log::debug!(
        "MDL7 version {}: {} bones, {} groups",
        header.version,
        header.num_bones,
        header.num_groups
    );
    let bones = read_bones(&mut cursor, &header)?;

    let mut channels: Vec<NodeAnimation> = bones.iter().map(|b| NodeAnimation::new(b.name.clone())).collect();
    let mut skins = Vec::new();
    let mut textures = Vec::new();
    let mut joined = JoinedMaterials::default();
    let mut groups = Vec::with_capacity(header.num_groups);

    let mut frame_ctx = FrameContext {
        header: &header,
        bones: &bones,
        keyframe: config.keyframe as usize,
        channels: &mut channels,
    };

    for group_index in 0..header.num_groups {
        let group = GroupHeader::read(&mut cursor)?;
        log::debug!(
            "MDL7 group {} '{}': {} skins, {} triangles, {} vertices, {} frames",
            group_index,
            group.name,
            group.num_skins,
            group.num_tris,
            group.num_verts,
            group.num_frames
        );

        for _ in 0..group.num_skins {
            let material = read_skin(&mut cursor, &header, skins.len(), &mut textures)?;
            skins.push(material);
        }
        if skins.is_empty() {
            skins.push(Material {
                name: "DefaultMaterial".to_string(),
                ..Default::default()
            });
        }

        let geometry = GroupGeometry::read(&mut cursor, &group, &header.sizes)?;
        let mut corners = if group.has_geometry() {
            expand_faces(&group, &geometry, &header.sizes)
        } else {
            FaceCorners::default()
        };

        let area = read_frames(&mut cursor, &mut frame_ctx, &group, group_index, &mut corners)?;

        let node_name = if group.name.is_empty() {
            format!("Group_{}", group_index)
        } else {
            group.name.clone()
        };
        let meshes = split_by_material(&corners, &skins, &mut joined)
            .into_iter()
            .map(|(material, faces)| (material, build_mesh(&node_name, group_index, &corners, &faces, &bones)))
            .collect();
        groups.push(GroupMeshes {
            name: node_name,
            meshes,
        });

        if area == FrameArea::Overflow {
            break;
        }
    }

    let parts = Mdl7Parts {
        skins,
        joined: joined.materials,
        textures,
        bones,
        groups,
        channels,
    };
    Ok(assemble_scene(name, parts))
}
