//! Fixed header shared by Quake 1 and GameStudio MDL2..MDL6 files.

use mdlx_math::Vec3;

use super::cursor::Cursor;
use super::error::{MdlError, MdlResult};

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 84;

const QUAKE1_VERSION: i32 = 6;
const QUAKE1_MAX_VERTS: usize = 1024;
const QUAKE1_MAX_TRIS: usize = 2048;
const QUAKE1_MAX_FRAMES: usize = 256;

/// Header of a Quake 1 or GameStudio MDL2..MDL6 file.
///
/// Counts are validated to be non-negative when the header is read.
#[derive(Clone, Debug)]
pub struct Header {
    pub ident: [u8; 4],
    pub version: i32,

    /// Per-axis scale applied to packed vertex coordinates
    pub scale: Vec3,

    /// Offset added after scaling
    pub translate: Vec3,

    pub bounding_radius: f32,
    pub eye_position: Vec3,

    pub num_skins: usize,
    pub skin_width: u32,
    pub skin_height: u32,
    pub num_verts: usize,
    pub num_tris: usize,
    pub num_frames: usize,

    /// Sync type for Quake 1; number of texture coordinates for GameStudio
    pub synctype: usize,

    pub flags: i32,
    pub size: f32,
}

fn count(value: i32, field: &str) -> MdlResult<usize> {
    usize::try_from(value)
        .map_err(|_| MdlError::MalformedHeader(format!("{} is negative ({})", field, value)))
}

impl Header {
    /// Read and validate the header at the start of the file.
    pub fn read(cursor: &mut Cursor<'_>) -> MdlResult<Self> {
        let mut r = cursor.record(HEADER_SIZE)?;

        let ident = r.peek_magic()?;
        r.skip(4)?;
        let version = r.read_i32()?;
        let scale = r.read_vec3()?;
        let translate = r.read_vec3()?;
        let bounding_radius = r.read_f32()?;
        let eye_position = r.read_vec3()?;

        let header = Self {
            ident,
            version,
            scale,
            translate,
            bounding_radius,
            eye_position,
            num_skins: count(r.read_i32()?, "number of skins")?,
            skin_width: count(r.read_i32()?, "skin width")? as u32,
            skin_height: count(r.read_i32()?, "skin height")? as u32,
            num_verts: count(r.read_i32()?, "number of vertices")?,
            num_tris: count(r.read_i32()?, "number of triangles")?,
            num_frames: count(r.read_i32()?, "number of frames")?,
            synctype: count(r.read_i32()?, "synctype")?,
            flags: r.read_i32()?,
            size: r.read_f32()?,
        };

        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> MdlResult<()> {
        if self.num_frames == 0 {
            return Err(MdlError::MalformedHeader("No frames found".to_string()));
        }
        if self.num_verts == 0 {
            return Err(MdlError::MalformedHeader("No vertices found".to_string()));
        }
        if self.num_tris == 0 {
            return Err(MdlError::MalformedHeader("No triangles found".to_string()));
        }
        Ok(())
    }

    /// Limits the Quake engine itself enforced. Exceeding them is legal
    /// for the decoder, so these only warn.
    pub fn check_quake1_limits(&self) {
        if self.version != QUAKE1_VERSION {
            log::warn!("Quake 1 MDL version is {}, expected {}", self.version, QUAKE1_VERSION);
        }
        if self.num_verts > QUAKE1_MAX_VERTS {
            log::warn!("Quake 1 MDL has {} vertices, more than the engine limit", self.num_verts);
        }
        if self.num_tris > QUAKE1_MAX_TRIS {
            log::warn!("Quake 1 MDL has {} triangles, more than the engine limit", self.num_tris);
        }
        if self.num_frames > QUAKE1_MAX_FRAMES {
            log::warn!("Quake 1 MDL has {} frames, more than the engine limit", self.num_frames);
        }
        if self.num_skins > 0 && (self.skin_width == 0 || self.skin_height == 0) {
            log::warn!("Quake 1 MDL has skins but the skin size is zero");
        }
    }

    /// Bytes in one skin image at the header's skin size.
    pub fn skin_texels(&self) -> usize {
        self.skin_width as usize * self.skin_height as usize
    }

    /// Expand a packed vertex coordinate into file space.
    pub fn unpack(&self, packed: [f32; 3]) -> Vec3 {
        Vec3::from_array(packed) * self.scale + self.translate
    }
}
