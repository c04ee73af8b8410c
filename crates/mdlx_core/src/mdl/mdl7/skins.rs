//! MDL7 skins.
//!
//! Every skin record turns into one material. The low nibble of the skin
//! type selects the texture payload; the high bits flag an optional
//! material color block and an optional effect definition.

use mdlx_math::Vec3;

use super::header::{Mdl7Header, MATERIAL_SIZE};
use crate::mdl::cursor::Cursor;
use crate::mdl::error::{MdlError, MdlResult};
use crate::mdl::skins::read_texels;
use crate::scene::{Material, ShadingMode, TextureSlot};
use crate::texture::{EmbeddedTexture, TexelFormat};

/// Skin refers to another skin, whose index is stored as the width.
const SKIN_REFERENCE: u8 = 0x1;
/// Embedded DDS file, `width` bytes long.
const SKIN_DDS: u8 = 0x6;
/// Zero terminated path of an external texture.
const SKIN_FILE: u8 = 0x7;
/// A material color block follows the texture.
const SKIN_MATERIAL: u8 = 0x10;
/// A length prefixed effect definition follows.
const SKIN_EFFECT: u8 = 0x20;

const MAX_PATH_LEN: usize = 1024;

/// Read one skin and return its material.
///
/// An embedded texture is appended to `textures` and referenced by index.
pub(crate) fn read_skin(
    cursor: &mut Cursor<'_>,
    header: &Mdl7Header,
    index: usize,
    textures: &mut Vec<EmbeddedTexture>,
) -> MdlResult<Material> {
    let mut rec = cursor.record(header.sizes.skin)?;
    let skin_type = rec.read_u8()?;
    rec.skip(3)?;
    let width = read_dimension(&mut rec)?;
    let height = read_dimension(&mut rec)?;
    let name = rec.read_fixed_str(16)?;

    let mut material = Material {
        name: if name.is_empty() {
            format!("MDL7_Skin_{}", index)
        } else {
            name
        },
        ..Default::default()
    };

    let mut texture = None;
    match skin_type & 0x0F {
        SKIN_REFERENCE => material.skin_reference = Some(width as usize),
        SKIN_DDS => {
            if height != 1 {
                log::warn!("Embedded DDS skin with height {}, MED writes 1", height);
            }
            let data = cursor.read_bytes(width as usize)?;
            texture = Some(EmbeddedTexture::dds(data.to_vec()));
        }
        SKIN_FILE => {
            if height != 1 {
                log::warn!("External texture skin with height {}, MED writes 1", height);
            }
            let path = cursor.read_cstr(MAX_PATH_LEN)?;
            material.diffuse_textures.push(TextureSlot::new(path, 0));
        }
        masked if masked != 0 || skin_type == 0 || (width != 0 && height != 0) => {
            if width == 0 || height == 0 {
                log::warn!("MDL7 skin '{}' has no size, using a placeholder texture", material.name);
                texture = Some(EmbeddedTexture::placeholder());
            } else {
                let (format, mipmapped) = TexelFormat::from_skin_type(masked as u32)
                    .ok_or_else(|| MdlError::UnsupportedFeature(format!("MDL7 skin type {}", masked)))?;
                texture = Some(read_texels(cursor, format, mipmapped, width, height)?);
            }
        }
        _ => {}
    }

    if skin_type & SKIN_MATERIAL != 0 {
        read_material_colors(&mut cursor.record(MATERIAL_SIZE)?, &mut material)?;
    }

    if skin_type & SKIN_EFFECT != 0 {
        let len = cursor.read_i32()?;
        let len = usize::try_from(len).map_err(|_| {
            MdlError::MalformedHeader(format!("MDL7 effect definition of length {}", len))
        })?;
        cursor.skip(len)?;
    }

    if let Some(texture) = texture {
        material.diffuse_textures.push(TextureSlot::embedded(textures.len()));
        textures.push(texture);
    }

    Ok(material)
}

fn read_dimension(cursor: &mut Cursor<'_>) -> MdlResult<u32> {
    let value = cursor.read_i32()?;
    u32::try_from(value)
        .map_err(|_| MdlError::MalformedHeader(format!("Negative MDL7 skin size {}", value)))
}

fn read_color(cursor: &mut Cursor<'_>) -> MdlResult<[f32; 4]> {
    Ok([
        cursor.read_f32()?,
        cursor.read_f32()?,
        cursor.read_f32()?,
        cursor.read_f32()?,
    ])
}

/// Colors are stored diffuse, ambient, specular, emissive, then the power.
fn read_material_colors(cursor: &mut Cursor<'_>, material: &mut Material) -> MdlResult<()> {
    let rgb = |c: [f32; 4]| Vec3::new(c[0], c[1], c[2]);

    let diffuse = read_color(cursor)?;
    let ambient = read_color(cursor)?;
    let specular = read_color(cursor)?;
    let emissive = read_color(cursor)?;
    let power = cursor.read_f32()?;

    material.diffuse_color = rgb(diffuse);
    material.ambient_color = rgb(ambient);
    material.specular_color = rgb(specular);
    material.emissive_color = rgb(emissive);
    // MED writes the opacity into the ambient alpha
    material.opacity = ambient[3];

    if power != 0.0 {
        material.shading = ShadingMode::Phong;
        material.shininess = Some(power);
    } else {
        material.shading = ShadingMode::Gouraud;
    }
    Ok(())
}
