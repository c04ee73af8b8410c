//! MDL7 frames: replacement vertices and bone transforms.

use mdlx_math::{swap_yz, Mat4, Mat4Ext};

use super::bones::Bone;
use super::faces::{vertex_normal, FaceCorners};
use super::group::{GroupHeader, Vertex};
use super::header::Mdl7Header;
use crate::mdl::cursor::Cursor;
use crate::mdl::error::{MdlError, MdlResult};
use crate::scene::{NodeAnimation, QuatKey, VectorKey};

/// What happened to the frame area of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameArea {
    Complete,
    /// A frame ran past the declared data size; nothing after it is read
    Overflow,
}

/// State shared by the frame readers of all groups.
pub(crate) struct FrameContext<'a> {
    pub header: &'a Mdl7Header,
    pub bones: &'a [Bone],
    /// Frame whose vertices replace the group's main vertices
    pub keyframe: usize,
    /// One channel per bone
    pub channels: &'a mut [NodeAnimation],
}

/// Read the frames of one group.
pub(crate) fn read_frames(
    cursor: &mut Cursor<'_>,
    ctx: &mut FrameContext<'_>,
    group: &GroupHeader,
    group_index: usize,
    corners: &mut FaceCorners,
) -> MdlResult<FrameArea> {
    let header = ctx.header;
    let sizes = &header.sizes;
    let mut warned_keys = false;

    for frame in 0..group.num_frames {
        let start = cursor.position();
        let mut rec = cursor.record(sizes.frame)?;
        rec.skip(16)?;
        let vertex_count = rec.read_u32()? as usize;
        let transform_count = rec.read_u32()? as usize;

        let area = sizes
            .frame
            .saturating_add(vertex_count.saturating_mul(sizes.framevertex))
            .saturating_add(transform_count.saturating_mul(sizes.bonetrans));
        if start.saturating_add(area) > header.data_size {
            log::warn!("Index overflow in frame area. Ignoring all frames and all further mesh groups");
            return Ok(FrameArea::Overflow);
        }

        for _ in 0..vertex_count {
            let vertex = Vertex::read(cursor, sizes.framevertex)?;
            if frame == ctx.keyframe {
                replace_vertex(group, corners, &vertex);
            }
        }

        for _ in 0..transform_count {
            let mut rec = cursor.record(sizes.bonetrans)?;
            let mut cols = [0.0f32; 16];
            for m in cols.iter_mut() {
                *m = rec.read_f32()?;
            }
            let bone = rec.read_u16()? as usize;

            if group_index != 0 {
                if !warned_keys {
                    log::warn!("Ignoring animation keyframes in groups != 0");
                    warned_keys = true;
                }
                continue;
            }
            if bone >= ctx.bones.len() {
                log::warn!("Index overflow in MDL7 bone transform list ({} >= {})", bone, ctx.bones.len());
                continue;
            }

            let matrix = Mat4::from_cols_array(&cols).swap_yz_basis();
            let srt = matrix.try_decompose().ok_or_else(|| MdlError::DecompositionFailure {
                bone: ctx.bones[bone].name.clone(),
                frame: frame as u32,
            })?;

            let time = frame as f64;
            let channel = &mut ctx.channels[bone];
            channel.position_keys.push(VectorKey {
                time,
                value: srt.translation,
            });
            channel.rotation_keys.push(QuatKey {
                time,
                value: srt.rotation,
            });
            channel.scale_keys.push(VectorKey {
                time,
                value: srt.scale,
            });
        }
    }

    Ok(FrameArea::Complete)
}

/// Replace every corner built from the frame vertex's target.
///
/// Scans all corners per frame vertex. A frame vertex without a normal
/// keeps the corner's existing one.
fn replace_vertex(group: &GroupHeader, corners: &mut FaceCorners, vertex: &Vertex) {
    let target = vertex.index as usize;
    if target >= group.num_verts {
        log::warn!("Index overflow in MDL7 frame vertex list ({} >= {})", target, group.num_verts);
        return;
    }
    corners.replace_vertex(target, swap_yz(vertex.position), vertex_normal(vertex));
}
