//! MDL7 file header.
//!
//! Unlike the older formats the MDL7 header declares the byte size of every
//! record type that follows. The decoder reads fixed field layouts, so a
//! size it cannot handle means the file was written by an incompatible
//! exporter and the import stops.

use crate::mdl::cursor::Cursor;
use crate::mdl::error::{MdlError, MdlResult};

pub(crate) const HEADER_SIZE: usize = 48;

/// Four 32 bit floats.
pub(crate) const COLORVALUE_SIZE: usize = 16;
/// Two 32 bit floats.
pub(crate) const SKINPOINT_SIZE: usize = 8;
/// Type, width, height and a 16 byte name.
pub(crate) const SKIN_SIZE: usize = 28;
/// Four colors and the specular power.
pub(crate) const MATERIAL_SIZE: usize = 4 * COLORVALUE_SIZE + 4;
/// A 4x4 matrix, a bone index and padding.
pub(crate) const BONETRANS_SIZE: usize = 16 * 4 + 4;
/// Name and the two element counts.
pub(crate) const FRAME_SIZE: usize = 16 + 4 + 4;

/// Three vertex indices.
pub(crate) const MIN_TRIANGLE_SIZE: usize = 6;
/// Position and a vertex or bone index.
pub(crate) const MIN_VERTEX_SIZE: usize = 14;

/// Record sizes declared by the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ElementSizes {
    pub bone: usize,
    pub skin: usize,
    pub colorvalue: usize,
    pub material: usize,
    pub skinpoint: usize,
    pub triangle: usize,
    pub mainvertex: usize,
    pub framevertex: usize,
    pub bonetrans: usize,
    pub frame: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Mdl7Header {
    pub version: i32,
    pub num_bones: usize,
    pub num_groups: usize,
    /// Offset, from the start of the file, where the model data ends
    pub data_size: usize,
    pub sizes: ElementSizes,
}

impl Mdl7Header {
    pub fn read(cursor: &mut Cursor<'_>) -> MdlResult<Self> {
        let mut rec = cursor.record(HEADER_SIZE)?;
        rec.skip(4)?;
        let version = rec.read_i32()?;
        let num_bones = read_count(&mut rec, "bones")?;
        let num_groups = read_count(&mut rec, "groups")?;
        let data_size = read_count(&mut rec, "data size")?;
        // entity and medit lumps
        rec.skip(8)?;

        let sizes = ElementSizes {
            bone: rec.read_u16()? as usize,
            skin: rec.read_u16()? as usize,
            colorvalue: rec.read_u16()? as usize,
            material: rec.read_u16()? as usize,
            skinpoint: rec.read_u16()? as usize,
            triangle: rec.read_u16()? as usize,
            mainvertex: rec.read_u16()? as usize,
            framevertex: rec.read_u16()? as usize,
            bonetrans: rec.read_u16()? as usize,
            frame: rec.read_u16()? as usize,
        };

        let header = Self {
            version,
            num_bones,
            num_groups,
            data_size,
            sizes,
        };
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> MdlResult<()> {
        let s = &self.sizes;
        expect_size("colorvalue", s.colorvalue, COLORVALUE_SIZE)?;
        expect_size("skinpoint", s.skinpoint, SKINPOINT_SIZE)?;
        expect_size("skin", s.skin, SKIN_SIZE)?;
        expect_size("material", s.material, MATERIAL_SIZE)?;
        expect_size("frame", s.frame, FRAME_SIZE)?;

        expect_min_size("triangle", s.triangle, MIN_TRIANGLE_SIZE)?;
        expect_min_size("mainvertex", s.mainvertex, MIN_VERTEX_SIZE)?;
        expect_min_size("framevertex", s.framevertex, MIN_VERTEX_SIZE)?;
        if self.num_bones > 0 {
            expect_min_size("bonetrans", s.bonetrans, BONETRANS_SIZE)?;
        }

        if self.num_groups == 0 {
            return Err(MdlError::MalformedHeader(
                "MDL7 file contains no mesh groups".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_count(cursor: &mut Cursor<'_>, what: &str) -> MdlResult<usize> {
    let value = cursor.read_i32()?;
    usize::try_from(value)
        .map_err(|_| MdlError::MalformedHeader(format!("Negative MDL7 {}: {}", what, value)))
}

fn expect_size(what: &str, declared: usize, expected: usize) -> MdlResult<()> {
    if declared == expected {
        Ok(())
    } else {
        Err(MdlError::MalformedHeader(format!(
            "{}_stc_size is {}, expected {}",
            what, declared, expected
        )))
    }
}

fn expect_min_size(what: &str, declared: usize, minimum: usize) -> MdlResult<()> {
    if declared >= minimum {
        Ok(())
    } else {
        Err(MdlError::MalformedHeader(format!(
            "{}_stc_size is {}, at least {} is required",
            what, declared, minimum
        )))
    }
}
