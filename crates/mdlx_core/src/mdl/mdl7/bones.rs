//! MDL7 skeleton.
//!
//! Bones are stored as a flat array where every record names its parent by
//! index. Parents are resolved in passes, one per possible parent index,
//! starting with the "no parent" marker.

use mdlx_math::{swap_yz, Mat4, Vec3};

use super::header::Mdl7Header;
use crate::mdl::cursor::Cursor;
use crate::mdl::error::MdlResult;

/// Parent index of a root bone.
pub(crate) const NO_PARENT: u16 = 0xFFFF;

#[derive(Clone, Debug)]
pub(crate) struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Position from the file, Z up
    pub position: Vec3,
    /// Translation part of the offset matrix, Z up
    pub offset: Vec3,
}

impl Bone {
    pub fn offset_matrix(&self) -> Mat4 {
        Mat4::from_translation(swap_yz(self.offset))
    }
}

#[derive(Clone, Debug)]
struct BoneRecord {
    name: String,
    parent: u16,
    position: Vec3,
}

/// Read the bone array that follows the header.
///
/// An unknown bone record size is not fatal: the bones are skipped and the
/// model imports without a skeleton.
pub(crate) fn read_bones(cursor: &mut Cursor<'_>, header: &Mdl7Header) -> MdlResult<Vec<Bone>> {
    let count = header.num_bones;
    if count == 0 {
        return Ok(Vec::new());
    }

    let size = header.sizes.bone;
    if !matches!(size, 16 | 36 | 48) {
        log::warn!("Unknown MDL7 bone_stc_size {}, ignoring the skeleton", size);
        cursor.skip(count.saturating_mul(size))?;
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let mut rec = cursor.record(size)?;
        let parent = rec.read_u16()?;
        rec.skip(2)?;
        let position = rec.read_vec3()?;
        let name = if size == 16 {
            format!("UnnamedBone_{}", i)
        } else {
            rec.read_fixed_str(size - 16)?
        };
        records.push(BoneRecord {
            name,
            parent,
            position,
        });
    }

    Ok(resolve_hierarchy(records))
}

/// Link every bone to its parent and compute its offset.
///
/// Pass `k` handles the bones whose parent index equals the k-th counter
/// value (`NO_PARENT`, then 0, 1, ...), for at most one pass per bone. The
/// offset is the negated position the parent had when it was resolved,
/// minus the bone's own position; a parent not resolved yet counts as the
/// origin. Bones whose parent index never comes up are logged and stay
/// unlinked with a zero offset.
fn resolve_hierarchy(records: Vec<BoneRecord>) -> Vec<Bone> {
    let count = records.len();
    let mut resolved = vec![false; count];
    let mut resolved_position = vec![Vec3::ZERO; count];
    let mut bones: Vec<Bone> = records
        .iter()
        .map(|r| Bone {
            name: r.name.clone(),
            parent: None,
            position: r.position,
            offset: Vec3::ZERO,
        })
        .collect();

    let mut counter = NO_PARENT;
    for _ in 0..count.min(NO_PARENT as usize) {
        for (i, record) in records.iter().enumerate() {
            if record.parent != counter {
                continue;
            }
            let mut offset = Vec3::ZERO;
            if counter != NO_PARENT {
                let parent = counter as usize;
                offset = -resolved_position[parent];
                bones[i].parent = Some(parent);
            }
            bones[i].offset = offset - record.position;
            resolved_position[i] = record.position;
            resolved[i] = true;
        }
        counter = counter.wrapping_add(1);
    }

    for (i, bone) in bones.iter().enumerate() {
        if !resolved[i] {
            log::warn!(
                "MDL7 bone '{}' has unresolved parent index {}, it becomes a root",
                bone.name,
                records[i].parent
            );
        }
    }

    bones
}
