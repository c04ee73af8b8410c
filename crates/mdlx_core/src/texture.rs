//! Embedded texture records.
//!
//! Model files in the MDL family carry their skins inline. The importer does
//! not decode texels; it records the layout and keeps the raw bytes so a
//! renderer (or an image crate) can decode them later.

use byteorder::{ByteOrder, LittleEndian};

/// Skin type flag marking a mipmapped texel block.
pub const MIPMAP_FLAG: u32 = 0x08;

/// Texel layout of an embedded skin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TexelFormat {
    /// 8 bit indices into the Quake 1 palette
    Palette8,
    /// 16 bit R5G6B5
    Rgb565,
    /// 16 bit A4R4G4B4
    Argb4444,
    /// 24 bit B8G8R8
    Rgb888,
    /// 32 bit B8G8R8A8
    Argb8888,
    /// A complete DDS file; dimensions live in its own header
    Dds,
}

impl TexelFormat {
    /// Map a GameStudio skin type to a texel layout and mipmap flag.
    ///
    /// Types 1 (skin reference) and 7 (external file) carry no texels and
    /// are not mapped here.
    pub fn from_skin_type(skin_type: u32) -> Option<(TexelFormat, bool)> {
        let mipmapped = skin_type & MIPMAP_FLAG != 0;
        let format = match skin_type {
            0 => TexelFormat::Palette8,
            2 | 10 => TexelFormat::Rgb565,
            3 | 11 => TexelFormat::Argb4444,
            4 | 12 => TexelFormat::Rgb888,
            5 | 13 => TexelFormat::Argb8888,
            6 => TexelFormat::Dds,
            _ => return None,
        };
        Some((format, mipmapped))
    }

    /// Short format hint, in the spirit of a file extension.
    pub fn hint(&self) -> &'static str {
        match self {
            TexelFormat::Palette8 => "pal8",
            TexelFormat::Rgb565 => "rgb565",
            TexelFormat::Argb4444 => "argb4444",
            TexelFormat::Rgb888 => "rgb888",
            TexelFormat::Argb8888 => "argb8888",
            TexelFormat::Dds => "dds",
        }
    }
}

/// Number of bytes a texel block occupies in the file.
///
/// Mipmapped blocks append the smaller levels using the writer's own
/// rounding, reproduced here exactly. Returns `None` for DDS, whose size is
/// stored explicitly. Sizes that do not fit a `usize` come back as
/// `usize::MAX`, which no buffer can satisfy.
pub fn texel_data_size(format: TexelFormat, mipmapped: bool, width: u32, height: u32) -> Option<usize> {
    let n = width as u64 * height as u64;
    let mips = (n >> 2) + (n >> 4) + (n >> 6);
    let size = match format {
        TexelFormat::Palette8 => Some(n),
        TexelFormat::Rgb565 | TexelFormat::Argb4444 => {
            let base = n.checked_mul(2);
            if mipmapped {
                base.and_then(|b| b.checked_add(mips.checked_mul(2)?))
            } else {
                base
            }
        }
        TexelFormat::Rgb888 => {
            let base = n.checked_mul(3);
            if mipmapped {
                base.and_then(|b| b.checked_add(mips.checked_mul(3)?))
            } else {
                base
            }
        }
        TexelFormat::Argb8888 => {
            let base = n.checked_mul(4);
            if mipmapped {
                base.and_then(|b| b.checked_add(n.checked_add(mips)?.checked_mul(4)?))
            } else {
                base
            }
        }
        TexelFormat::Dds => return None,
    };
    Some(size.and_then(|s| usize::try_from(s).ok()).unwrap_or(usize::MAX))
}

/// A texture stored inside the model file.
#[derive(Clone, Debug)]
pub struct EmbeddedTexture {
    /// Width in texels (0 for DDS, see [`EmbeddedTexture::dds_dimensions`])
    pub width: u32,

    /// Height in texels (0 for DDS)
    pub height: u32,

    /// Texel layout of `data`
    pub format: TexelFormat,

    /// Whether `data` is followed by smaller mip levels
    pub mipmapped: bool,

    /// Raw, undecoded texel bytes
    pub data: Vec<u8>,
}

impl EmbeddedTexture {
    /// Create a texture from raw texel bytes.
    pub fn new(width: u32, height: u32, format: TexelFormat, mipmapped: bool, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            mipmapped,
            data,
        }
    }

    /// Wrap a complete embedded DDS file.
    pub fn dds(data: Vec<u8>) -> Self {
        Self::new(0, 0, TexelFormat::Dds, false, data)
    }

    /// 8x8 black and white checker, used when a skin declares no size.
    pub fn placeholder() -> Self {
        let mut data = Vec::with_capacity(8 * 8 * 4);
        for y in 0..8u32 {
            for x in 0..8u32 {
                let v = if (x % 2 == 0) != (y % 2 == 0) { 0xFF } else { 0x00 };
                data.extend_from_slice(&[v, v, v, 0xFF]);
            }
        }
        Self::new(8, 8, TexelFormat::Argb8888, false, data)
    }

    /// Width and height read from an embedded DDS header.
    ///
    /// GameStudio files store the height three words in and the width right
    /// after it. Returns `None` for other formats or truncated data.
    pub fn dds_dimensions(&self) -> Option<(u32, u32)> {
        if self.format != TexelFormat::Dds || self.data.len() < 20 {
            return None;
        }
        let height = LittleEndian::read_u32(&self.data[12..16]);
        let width = LittleEndian::read_u32(&self.data[16..20]);
        Some((width, height))
    }

    /// Width and height, sniffing the DDS header where needed.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self.format {
            TexelFormat::Dds => self.dds_dimensions(),
            _ => Some((self.width, self.height)),
        }
    }
}
