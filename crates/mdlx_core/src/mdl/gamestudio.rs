//! 3D GameStudio `MDL2` to `MDL6` decoder.
//!
//! These files keep the Quake 1 header but change the skin, texture
//! coordinate, triangle and frame records:
//!
//! - texture coordinates are 16 bit and count `synctype` entries
//! - triangles index positions and texture coordinates separately
//! - MDL4 and later may store frames with 16 bit vertex coordinates
//! - MDL5 texture coordinates are in texels of the first skin

use mdlx_math::swap_yz;

use super::assemble::{single_mesh_scene, CornerBuffers};
use super::config::ImportConfig;
use super::cursor::Cursor;
use super::error::{clamp_index, MdlResult};
use super::format::Subformat;
use super::frames::{read_simple_frame, resolve_keyframe, FrameVertex, VertexPacking};
use super::header::Header;
use super::normals::decode_normal;
use super::skins::read_gamestudio_skins;
use crate::scene::Scene;
use crate::texture::EmbeddedTexture;

#[derive(Clone, Copy, Debug)]
struct Triangle {
    vertices: [u16; 3],
    uvs: [u16; 3],
}

pub(crate) fn read_gamestudio(
    data: &[u8],
    name: &str,
    version: u8,
    config: &ImportConfig,
) -> MdlResult<Scene> {
    let mut cursor = Cursor::new(data);
    let header = Header::read(&mut cursor)?;

    let textures = read_gamestudio_skins(&mut cursor, &header, version)?;

    // synctype holds the number of texture coordinates
    let mut texcoords = Vec::with_capacity(header.synctype);
    for _ in 0..header.synctype {
        texcoords.push([cursor.read_i16()? as f32, cursor.read_i16()? as f32]);
    }

    let mut triangles = Vec::with_capacity(header.num_tris);
    for _ in 0..header.num_tris {
        triangles.push(Triangle {
            vertices: [cursor.read_u16()?, cursor.read_u16()?, cursor.read_u16()?],
            uvs: [cursor.read_u16()?, cursor.read_u16()?, cursor.read_u16()?],
        });
    }

    let keyframe = resolve_keyframe(config.keyframe, header.num_frames);
    let vertices = read_keyframe(&mut cursor, &header, version, keyframe)?;

    if texcoords.is_empty() {
        log::warn!("MDL{} file has no texture coordinates", version);
    }

    let scale_uvs = version != 5 && header.skin_width != 0 && header.skin_height != 0;
    let width = header.skin_width as f32;
    let height = header.skin_height as f32;

    let mut corners = CornerBuffers::with_capacity(triangles.len() * 3);
    for triangle in &triangles {
        for c in 0..3 {
            let index = clamp_index(
                triangle.vertices[c] as usize,
                header.num_verts,
                "MDL3/4/5/6 vertex list",
            );
            let vertex = &vertices[index];
            let position = swap_yz(header.unpack(vertex.packed));
            let normal = swap_yz(decode_normal(vertex.normal as usize));

            let uv = if texcoords.is_empty() {
                [0.0, 0.0]
            } else {
                let index = clamp_index(triangle.uvs[c] as usize, texcoords.len(), "MDL3/4/5/6 UV coord list");
                let [s, t] = texcoords[index];
                if scale_uvs {
                    [(s + 0.5) / width, 1.0 - (t + 0.5) / height]
                } else {
                    [s, t]
                }
            };

            corners.push(position, normal, uv);
        }
    }

    if version == 5 && !textures.is_empty() {
        rescale_mdl5_uvs(&mut corners, &textures[0]);
    }

    Ok(single_mesh_scene(name, Subformat::GameStudio(version), corners, textures))
}

/// Walk the frame list up to `keyframe` and return its vertices.
///
/// Every frame starts with a type word. MDL2 and MDL3 always use byte
/// packed vertices; later versions switch to short packing when the type
/// is non-zero.
fn read_keyframe(
    cursor: &mut Cursor<'_>,
    header: &Header,
    version: u8,
    keyframe: usize,
) -> MdlResult<Vec<FrameVertex>> {
    let mut frame = 0;
    loop {
        let frame_type = cursor.read_u32()?;
        let packing = if frame_type == 0 || version <= 3 {
            VertexPacking::Byte
        } else {
            VertexPacking::Short
        };

        if frame == keyframe {
            return read_simple_frame(cursor, header, packing);
        }
        cursor.skip(packing.frame_size(header.num_verts))?;
        frame += 1;
    }
}

/// MDL5 stores texture coordinates in texels of the first skin.
fn rescale_mdl5_uvs(corners: &mut CornerBuffers, texture: &EmbeddedTexture) {
    let (width, height) = match texture.dimensions() {
        Some((w, h)) if w != 0 && h != 0 => (w as f32, h as f32),
        _ => {
            log::warn!("MDL5 skin size is unknown, keeping texture coordinates unscaled");
            return;
        }
    };

    for uv in corners.uvs.iter_mut() {
        uv[0] /= width;
        uv[1] = 1.0 - uv[1] / height;
    }
}
