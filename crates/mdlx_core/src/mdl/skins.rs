//! Skin sections of Quake 1 and GameStudio MDL2..MDL6 files.

use super::cursor::Cursor;
use super::error::{MdlError, MdlResult};
use super::header::Header;
use crate::texture::{texel_data_size, EmbeddedTexture, TexelFormat};

/// GameStudio skin type for an embedded DDS file.
const SKIN_TYPE_DDS: u32 = 6;

/// Read `num_skins` Quake 1 skins.
///
/// Skin groups (animated skins) store several images; only the first one
/// becomes a texture.
pub(crate) fn read_quake1_skins(
    cursor: &mut Cursor<'_>,
    header: &Header,
) -> MdlResult<Vec<EmbeddedTexture>> {
    let texels = header.skin_texels();
    let mut textures = Vec::with_capacity(header.num_skins);

    for _ in 0..header.num_skins {
        let group = cursor.read_i32()?;
        if group == 0 {
            let data = cursor.read_bytes(texels)?;
            textures.push(palette_texture(header, data));
            continue;
        }

        let count = cursor.read_i32()?;
        let count = usize::try_from(count).map_err(|_| {
            MdlError::MalformedHeader(format!("Skin group has {} images", count))
        })?;
        if count == 0 {
            log::warn!("Quake 1 MDL skin group without images");
            continue;
        }

        // One interval per image, then the images themselves
        cursor.skip(count.saturating_mul(4))?;
        let first = cursor.read_bytes(texels)?;
        cursor.skip((count - 1).saturating_mul(texels))?;
        textures.push(palette_texture(header, first));
    }

    Ok(textures)
}

fn palette_texture(header: &Header, data: &[u8]) -> EmbeddedTexture {
    EmbeddedTexture::new(
        header.skin_width,
        header.skin_height,
        TexelFormat::Palette8,
        false,
        data.to_vec(),
    )
}

/// Read `num_skins` GameStudio skins.
///
/// MDL2..MDL4 skins use the header's skin size and a small set of texel
/// layouts. MDL5 and later store a size per skin and may carry mipmaps or
/// a complete DDS file.
pub(crate) fn read_gamestudio_skins(
    cursor: &mut Cursor<'_>,
    header: &Header,
    version: u8,
) -> MdlResult<Vec<EmbeddedTexture>> {
    let mut textures = Vec::with_capacity(header.num_skins);

    for _ in 0..header.num_skins {
        let skin_type = cursor.read_u32()?;

        let texture = if version < 5 {
            let format = match skin_type {
                0 => TexelFormat::Palette8,
                2 => TexelFormat::Rgb565,
                3 => TexelFormat::Argb4444,
                other => {
                    return Err(MdlError::UnsupportedFeature(format!(
                        "MDL{} skin type {}",
                        version, other
                    )))
                }
            };
            read_texels(cursor, format, false, header.skin_width, header.skin_height)?
        } else {
            let width = cursor.read_u32()?;
            let height = cursor.read_u32()?;
            if skin_type == SKIN_TYPE_DDS {
                // The width field holds the size of the DDS file
                EmbeddedTexture::dds(cursor.read_bytes(width as usize)?.to_vec())
            } else {
                let (format, mipmapped) = TexelFormat::from_skin_type(skin_type).ok_or_else(|| {
                    MdlError::UnsupportedFeature(format!("MDL{} skin type {}", version, skin_type))
                })?;
                read_texels(cursor, format, mipmapped, width, height)?
            }
        };
        textures.push(texture);
    }

    Ok(textures)
}

/// Read a texel block of a known layout and size.
pub(crate) fn read_texels(
    cursor: &mut Cursor<'_>,
    format: TexelFormat,
    mipmapped: bool,
    width: u32,
    height: u32,
) -> MdlResult<EmbeddedTexture> {
    let size = texel_data_size(format, mipmapped, width, height).ok_or_else(|| {
        MdlError::UnsupportedFeature(format!("{} texels without a size", format.hint()))
    })?;
    let data = cursor.read_bytes(size)?;
    Ok(EmbeddedTexture::new(width, height, format, mipmapped, data.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdl::fixtures::{ByteWriter, QuakeHeaderFixture};

    fn header(skins: i32, width: i32, height: i32) -> Header {
        let mut fixture = QuakeHeaderFixture::new(*b"IDPO", 3, 1, 1);
        fixture.num_skins = skins;
        fixture.skin_width = width;
        fixture.skin_height = height;
        let bytes = fixture.write_to_vec();
        Header::read(&mut Cursor::new(&bytes)).unwrap()
    }

    #[test]
    fn test_quake1_single_and_group_skins() {
        let header = header(2, 2, 2);
        let mut w = ByteWriter::new();
        w.i32(0).bytes(&[1, 2, 3, 4]);
        w.i32(1).i32(2).f32(0.1).f32(0.2).bytes(&[5, 6, 7, 8]).bytes(&[9, 9, 9, 9]);
        w.u8(0xAA);
        let bytes = w.into_vec();

        let mut cursor = Cursor::new(&bytes);
        let textures = read_quake1_skins(&mut cursor, &header).unwrap();
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[0].data, vec![1, 2, 3, 4]);
        assert_eq!(textures[1].data, vec![5, 6, 7, 8]);
        assert_eq!(textures[1].format, TexelFormat::Palette8);
        assert_eq!(cursor.read_u8().unwrap(), 0xAA);
    }

    #[test]
    fn test_gamestudio4_rejects_unknown_type() {
        let header = header(1, 2, 2);
        let mut w = ByteWriter::new();
        w.u32(5).bytes(&[0; 16]);
        let bytes = w.into_vec();
        match read_gamestudio_skins(&mut Cursor::new(&bytes), &header, 4) {
            Err(MdlError::UnsupportedFeature(msg)) => assert!(msg.contains("skin type 5")),
            other => panic!("expected UnsupportedFeature, got {:?}", other),
        }
    }

    #[test]
    fn test_gamestudio5_skin_sizes() {
        let header = header(2, 0, 0);
        let mut w = ByteWriter::new();
        // 2x2 RGB565 with mipmaps: 8 + ((1 + 0 + 0) << 1) bytes
        w.u32(10).u32(2).u32(2).bytes(&[0; 10]);
        w.u32(6).u32(24).u32(0).bytes(&[0; 24]);
        let bytes = w.into_vec();

        let mut cursor = Cursor::new(&bytes);
        let textures = read_gamestudio_skins(&mut cursor, &header, 5).unwrap();
        assert_eq!(textures[0].format, TexelFormat::Rgb565);
        assert!(textures[0].mipmapped);
        assert_eq!(textures[0].data.len(), 10);
        assert_eq!(textures[1].format, TexelFormat::Dds);
        assert_eq!(textures[1].data.len(), 24);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_huge_skin_dimensions_overrun() {
        let header = header(1, 0, 0);
        let mut w = ByteWriter::new();
        w.u32(10).u32(u32::MAX).u32(u32::MAX).bytes(&[0; 16]);
        let bytes = w.into_vec();
        assert!(matches!(
            read_gamestudio_skins(&mut Cursor::new(&bytes), &header, 5),
            Err(MdlError::BufferOverrun { .. })
        ));
    }

    #[test]
    fn test_truncated_skin_overruns() {
        let header = header(1, 4, 4);
        let mut w = ByteWriter::new();
        w.i32(0).bytes(&[0; 10]);
        let bytes = w.into_vec();
        assert!(matches!(
            read_quake1_skins(&mut Cursor::new(&bytes), &header),
            Err(MdlError::BufferOverrun { .. })
        ));
    }
}
