//! Quake 1 `IDPO` decoder.

use mdlx_math::swap_yz;

use super::assemble::{single_mesh_scene, CornerBuffers};
use super::config::ImportConfig;
use super::cursor::Cursor;
use super::error::{clamp_index, MdlError, MdlResult};
use super::format::Subformat;
use super::frames::{read_simple_frame, resolve_keyframe, FrameVertex, VertexPacking};
use super::header::Header;
use super::normals::decode_normal;
use super::skins::read_quake1_skins;
use crate::scene::Scene;

#[derive(Clone, Copy, Debug)]
struct TexCoord {
    on_seam: bool,
    s: i32,
    t: i32,
}

#[derive(Clone, Copy, Debug)]
struct Triangle {
    faces_front: bool,
    vertices: [i32; 3],
}

pub(crate) fn read_quake1(data: &[u8], name: &str, config: &ImportConfig) -> MdlResult<Scene> {
    let mut cursor = Cursor::new(data);
    let header = Header::read(&mut cursor)?;
    header.check_quake1_limits();

    let textures = read_quake1_skins(&mut cursor, &header)?;

    let mut texcoords = Vec::with_capacity(header.num_verts);
    for _ in 0..header.num_verts {
        texcoords.push(TexCoord {
            on_seam: cursor.read_i32()? != 0,
            s: cursor.read_i32()?,
            t: cursor.read_i32()?,
        });
    }

    let mut triangles = Vec::with_capacity(header.num_tris);
    for _ in 0..header.num_tris {
        triangles.push(Triangle {
            faces_front: cursor.read_i32()? != 0,
            vertices: [cursor.read_i32()?, cursor.read_i32()?, cursor.read_i32()?],
        });
    }

    let keyframe = resolve_keyframe(config.keyframe, header.num_frames);
    let vertices = read_keyframe(&mut cursor, &header, keyframe)?;

    let width = header.skin_width as f32;
    let height = header.skin_height as f32;
    let has_skin_size = header.skin_width != 0 && header.skin_height != 0;

    let mut corners = CornerBuffers::with_capacity(triangles.len() * 3);
    for triangle in &triangles {
        for &index in &triangle.vertices {
            let index = usize::try_from(index).unwrap_or(usize::MAX);
            let index = clamp_index(index, header.num_verts, "Q1-MDL vertex list");

            let vertex = &vertices[index];
            let position = swap_yz(header.unpack(vertex.packed));
            let normal = swap_yz(decode_normal(vertex.normal as usize));

            let tc = texcoords[index];
            let mut s = tc.s as f32;
            let t = tc.t as f32;
            if !triangle.faces_front && tc.on_seam {
                s += width * 0.5;
            }
            let uv = if has_skin_size {
                [(s + 0.5) / width, 1.0 - (t + 0.5) / height]
            } else {
                [s, t]
            };

            corners.push(position, normal, uv);
        }
    }

    Ok(single_mesh_scene(name, Subformat::Quake1, corners, textures))
}

/// Walk the frame list up to `keyframe` and return its vertices.
///
/// Frame groups keep several poses; the first one stands for the group.
fn read_keyframe(
    cursor: &mut Cursor<'_>,
    header: &Header,
    keyframe: usize,
) -> MdlResult<Vec<FrameVertex>> {
    let simple_size = VertexPacking::Byte.frame_size(header.num_verts);

    for frame in 0..=keyframe {
        let frame_type = cursor.read_i32()?;
        let wanted = frame == keyframe;

        if frame_type == 0 {
            if wanted {
                return read_simple_frame(cursor, header, VertexPacking::Byte);
            }
            cursor.skip(simple_size)?;
            continue;
        }

        let count = cursor.read_i32()?;
        let count = usize::try_from(count)
            .ok()
            .filter(|&c| c > 0)
            .ok_or_else(|| MdlError::MalformedHeader(format!("Frame group has {} frames", count)))?;

        // bbox min and max, then one interval per sub-frame
        cursor.skip(8)?;
        cursor.skip(count.saturating_mul(4))?;
        if wanted {
            return read_simple_frame(cursor, header, VertexPacking::Byte);
        }
        cursor.skip(count.saturating_mul(simple_size))?;
    }

    // The loop always returns on its last iteration
    Err(MdlError::MalformedHeader("No frames found".to_string()))
}
