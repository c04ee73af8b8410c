//! MDL7 scene assembly.

use super::bones::Bone;
use super::faces::MaterialRef;
use crate::mdl::error::clamp_index;
use crate::mdl::format::Subformat;
use crate::mesh::Mesh;
use crate::scene::{Animation, Material, NodeAnimation, Scene};
use crate::texture::EmbeddedTexture;

pub(crate) const MESH_ROOT: &str = "<mesh_root>";
pub(crate) const SKELETON_ROOT: &str = "<skeleton_root>";
const ANIMATION_NAME: &str = "BoneAnimation";

/// Meshes decoded from one group.
#[derive(Debug)]
pub(crate) struct GroupMeshes {
    pub name: String,
    pub meshes: Vec<(MaterialRef, Mesh)>,
}

/// Everything the group loop collected.
#[derive(Debug, Default)]
pub(crate) struct Mdl7Parts {
    pub skins: Vec<Material>,
    pub joined: Vec<Material>,
    pub textures: Vec<EmbeddedTexture>,
    pub bones: Vec<Bone>,
    pub groups: Vec<GroupMeshes>,
    pub channels: Vec<NodeAnimation>,
}

pub(crate) fn assemble_scene(name: &str, parts: Mdl7Parts) -> Scene {
    let mut scene = Scene::new(name);
    scene.source_format = Subformat::GameStudio7.name().to_string();

    let skin_count = parts.skins.len();
    let (materials, remap) = resolve_skin_references(parts.skins, parts.joined);
    for material in materials {
        scene.add_material(material);
    }
    for texture in parts.textures {
        scene.add_texture(texture);
    }

    let material_index = |r: MaterialRef| match r {
        MaterialRef::Skin(i) => remap[i],
        MaterialRef::Joined(j) => remap[skin_count + j],
    };

    let groups: Vec<GroupMeshes> = parts.groups.into_iter().filter(|g| !g.meshes.is_empty()).collect();
    let has_skeleton = !parts.bones.is_empty();

    if groups.len() == 1 && !has_skeleton {
        // A single group needs no wrapper node
        for group in groups {
            let root = scene.add_node(group.name, None);
            attach_meshes(&mut scene, root, group.meshes, &material_index);
        }
    } else {
        let root = scene.add_node(MESH_ROOT, None);
        for group in groups {
            let node = scene.add_node(group.name, Some(root));
            attach_meshes(&mut scene, node, group.meshes, &material_index);
        }
        if has_skeleton {
            add_skeleton(&mut scene, root, &parts.bones);
        }
    }

    let channels: Vec<NodeAnimation> = parts.channels.into_iter().filter(|c| !c.is_empty()).collect();
    if !channels.is_empty() {
        let duration = channels.iter().map(NodeAnimation::end_time).fold(0.0, f64::max);
        scene.animations.push(Animation {
            name: ANIMATION_NAME.to_string(),
            duration,
            ticks_per_second: 0.0,
            channels,
        });
    }

    scene
}

fn attach_meshes(
    scene: &mut Scene,
    node: usize,
    meshes: Vec<(MaterialRef, Mesh)>,
    material_index: &impl Fn(MaterialRef) -> usize,
) {
    for (material, mut mesh) in meshes {
        mesh.material_index = material_index(material);
        let mesh = scene.add_mesh(mesh);
        scene.nodes[node].meshes.push(mesh);
    }
}

/// Drop skins that only refer to another skin.
///
/// Returns the final materials and, for every skin followed by every joined
/// material, its index in that list. Referring skins map to the index of
/// the skin at the end of their reference chain.
fn resolve_skin_references(skins: Vec<Material>, joined: Vec<Material>) -> (Vec<Material>, Vec<usize>) {
    let skin_count = skins.len();
    let mut materials = skins;
    materials.extend(joined);

    let targets: Vec<usize> = (0..materials.len())
        .map(|m| reference_target(&materials, skin_count, m))
        .collect();

    let mut new_index = vec![usize::MAX; materials.len()];
    let mut kept = Vec::with_capacity(materials.len());
    for (m, mut material) in materials.into_iter().enumerate() {
        if targets[m] == m {
            material.skin_reference = None;
            new_index[m] = kept.len();
            kept.push(material);
        }
    }

    let remap = targets.iter().map(|&t| new_index[t]).collect();
    (kept, remap)
}

/// Follow a chain of skin references to the skin that holds the data.
///
/// A chain that loops back on itself keeps its starting skin.
fn reference_target(materials: &[Material], skin_count: usize, start: usize) -> usize {
    let mut current = start;
    for _ in 0..=materials.len() {
        match materials[current].skin_reference {
            None => return current,
            Some(next) => current = clamp_index(next, skin_count, "MDL7 skin reference list"),
        }
    }
    log::warn!("MDL7 skin '{}' is part of a reference cycle", materials[start].name);
    start
}

/// Add `<skeleton_root>` below `parent` with one node per bone.
///
/// Bones are placed depth first in index order. Bones that can not be
/// reached from a root, because their parents form a cycle, are left out.
fn add_skeleton(scene: &mut Scene, parent: usize, bones: &[Bone]) {
    let skeleton_root = scene.add_node(SKELETON_ROOT, Some(parent));

    let mut children = vec![Vec::new(); bones.len()];
    let mut roots = Vec::new();
    for (i, bone) in bones.iter().enumerate() {
        match bone.parent {
            Some(p) => children[p].push(i),
            None => roots.push(i),
        }
    }

    let mut placed = vec![false; bones.len()];
    let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&b| (b, skeleton_root)).collect();
    while let Some((bone, node_parent)) = stack.pop() {
        if placed[bone] {
            continue;
        }
        placed[bone] = true;
        let node = scene.add_node(bones[bone].name.clone(), Some(node_parent));
        stack.extend(children[bone].iter().rev().map(|&c| (c, node)));
    }

    for (bone, placed) in bones.iter().zip(placed) {
        if !placed {
            log::warn!("MDL7 bone '{}' is not connected to a root bone", bone.name);
        }
    }
}
